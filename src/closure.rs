//! Closure hash index, occurrence equivalence, and early-termination lookup.

use std::collections::{HashMap, HashSet};

use crate::dfs_code::DfsCode;
use crate::graph::{Eid, GraphId, GraphSource};
use crate::projection::{decode_iso, eid_set_at_step, invert_iso, Projected, ProjectionArena};

/// A recorded closed pattern. Its projections are retained for the
/// lifetime of the run: later closure-equivalence checks walk back into
/// them.
#[derive(Debug, Clone)]
pub struct ClosedPattern {
    pub id: usize,
    pub code: DfsCode,
    pub graph_ids: Vec<GraphId>,
    pub support: usize,
    pub projected: Projected,
}

/// Two patterns (a parent code and one of its own extensions, computed in
/// the same recursive step) have *equivalent occurrence* iff they cover the
/// same transaction graphs, the child has no more projections than the
/// parent, and every child projection's immediate parent link lands on a
/// distinct parent projection — i.e. dropping the child's last step is a
/// bijection onto the parent's entire projected set.
///
/// This is the general bijection-between-occurrences condition specialized
/// to the case that matters in the recursion: the child's code is literally
/// the parent's code plus one step, so "bijection between child code-edges
/// and a subset of parent code-edges" collapses to "does every child
/// projection's truncation reproduce a distinct parent projection".
///
/// This is *not* the closedness test: closedness (glossary: "a frequent
/// pattern with no extension of equal support") is decided in
/// `Miner::dfs` by comparing support counts directly. This stronger,
/// occurrence-level equivalence is the primitive the closure index's
/// early-termination lookup (`ClosureIndex::is_occurrence_equivalent_to_known`)
/// is built on.
pub fn equivalent_occurrence(
    parent_graph_ids: &[GraphId],
    parent_projected: &Projected,
    child_graph_ids: &[GraphId],
    child_projected: &Projected,
    arena: &ProjectionArena,
) -> bool {
    if parent_graph_ids != child_graph_ids {
        return false;
    }
    if child_projected.len() > parent_projected.len() {
        return false;
    }
    let parent_set: HashSet<_> = parent_projected.entries.iter().copied().collect();
    let mut matched: HashSet<_> = HashSet::new();
    for &child_tail in &child_projected.entries {
        let node = arena.node(child_tail);
        let Some(prev) = node.previous else {
            return false;
        };
        if !parent_set.contains(&prev) {
            return false;
        }
        matched.insert(prev);
    }
    matched.len() == parent_set.len()
}

/// Maps the per-step `Set<Eid>` key to the closed patterns that produced
/// exactly that set at some step of their own code.
#[derive(Debug, Default)]
pub struct ClosureIndex {
    by_key: HashMap<Vec<Eid>, Vec<usize>>,
    patterns: Vec<ClosedPattern>,
}

impl ClosureIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn patterns(&self) -> &[ClosedPattern] {
        &self.patterns
    }

    /// Register a newly recorded closed pattern: one index entry per code
    /// step, keyed by the set of `Eid`s appearing at that step across all
    /// of the pattern's projections.
    pub fn register(&mut self, pattern: ClosedPattern, arena: &ProjectionArena) {
        let id = self.patterns.len();
        for step in 0..pattern.code.len() {
            let key = eid_set_at_step(pattern.code.len(), arena, &pattern.projected, step);
            self.by_key.entry(key).or_default().push(id);
        }
        self.patterns.push(pattern);
    }

    /// Exemplar graph for a candidate: the transaction graph in which it
    /// has the fewest projections.
    fn exemplar_gid(&self, pattern: &ClosedPattern, arena: &ProjectionArena) -> Option<GraphId> {
        let mut counts: HashMap<GraphId, usize> = HashMap::new();
        for &p in &pattern.projected.entries {
            *counts.entry(arena.node(p).eid.gid).or_default() += 1;
        }
        counts.into_iter().min_by_key(|&(_, c)| c).map(|(g, _)| g)
    }

    /// Attempt to show `code`/`projected` is occurrence-equivalent to some
    /// already-registered closed pattern, using only the exemplar graph.
    /// Returns `true` on the first match found.
    pub fn is_occurrence_equivalent_to_known(
        &self,
        code: &DfsCode,
        graph_ids: &[GraphId],
        projected: &Projected,
        arena: &ProjectionArena,
        db: &dyn GraphSource,
    ) -> bool {
        if code.is_empty() {
            return false;
        }
        let key = eid_set_at_step(code.len(), arena, projected, code.len() - 1);
        let Some(candidates) = self.by_key.get(&key) else {
            return false;
        };
        for &cid in candidates {
            let cand = &self.patterns[cid];
            if cand.graph_ids != graph_ids {
                continue;
            }
            if projected.len() > cand.projected.len() {
                continue;
            }
            if self.isomorphic_into_exemplar(code, projected, cand, arena, db) {
                return true;
            }
        }
        false
    }

    fn isomorphic_into_exemplar(
        &self,
        code: &DfsCode,
        projected: &Projected,
        cand: &ClosedPattern,
        arena: &ProjectionArena,
        db: &dyn GraphSource,
    ) -> bool {
        let Some(exemplar) = self.exemplar_gid(cand, arena) else {
            return false;
        };
        let Some(&c_tail) = projected
            .entries
            .iter()
            .find(|&&p| arena.node(p).eid.gid == exemplar)
        else {
            return false;
        };
        let Some(&cand_tail) = cand
            .projected
            .entries
            .iter()
            .find(|&&p| arena.node(p).eid.gid == exemplar)
        else {
            return false;
        };

        let c_iso = decode_iso(code, arena, c_tail, db);
        let cand_iso = decode_iso(&cand.code, arena, cand_tail, db);
        let cand_inv = invert_iso(&cand_iso);

        for ee in &code.edges {
            let gsrc = c_iso[ee.v1 as usize];
            let gdst = c_iso[ee.v2 as usize];
            let (Some(&csrc), Some(&cdst)) = (cand_inv.get(&gsrc), cand_inv.get(&gdst)) else {
                return false;
            };
            if !cand.code.contains_edge(csrc, cdst) {
                return false;
            }
        }
        true
    }
}
