//! Mining driver and recursion.

use std::collections::{HashMap, HashSet};

use log::{debug, info};

use crate::canonical::is_canonical;
use crate::closure::{ClosedPattern, ClosureIndex};
use crate::config::MiningParams;
use crate::dfs_code::DfsCode;
use crate::extension::extensions;
use crate::failure::{self, FailureTrie};
use crate::graph::{GraphDatabase, GraphId, GraphSource, Label, VertexId};
use crate::projection::{Projected, ProjectionArena};
use crate::pruning::PruningMatrix;

/// Advisory statistics; never affect the reported patterns themselves.
#[derive(Debug, Default, Clone, Copy)]
pub struct MiningStats {
    pub graphs_removed: usize,
    pub vertices_pruned: usize,
    pub edges_pruned_by_label_pair: usize,
    pub edges_pruned_by_edge_label: usize,
    pub early_terminations: usize,
    pub failure_triggers: usize,
}

/// Everything the driver produced: the closed patterns (single-vertex ones
/// first, in the order they were discovered, followed by multi-edge ones in
/// discovery order) and the advisory statistics.
#[derive(Debug, Default)]
pub struct MiningReport {
    pub patterns: Vec<ClosedPattern>,
    pub stats: MiningStats,
}

/// Run the full pipeline: prune, precompute, optionally emit single-vertex
/// patterns, then recurse from the empty code.
pub fn mine(db: GraphDatabase, params: &MiningParams) -> MiningReport {
    mine_with_flags(db, params, false, false)
}

/// Same pipeline as [`mine`], but with the closure-index early-termination
/// lookup and/or the early-termination-failure analyzer forced off.
///
/// This exists for the differential-testing oracle property of spec §8:
/// disabling both optimizations must yield exactly the same set of closed
/// patterns as running with them enabled, since they are pure performance
/// optimizations over the same recursion.
pub fn mine_with_flags(
    mut db: GraphDatabase,
    params: &MiningParams,
    disable_early_term: bool,
    disable_failure: bool,
) -> MiningReport {
    let mut stats = MiningStats::default();
    let n = db.len();
    if n == 0 || params.max_edges == 0 {
        return MiningReport {
            patterns: Vec::new(),
            stats,
        };
    }
    let min_sup = params.min_sup(n);

    let frequent_labels = frequent_vertex_labels(&db, min_sup);
    for g in db.iter_mut() {
        let before = g.num_vertices();
        g.retain_vertices(|_, l| frequent_labels.contains(&l));
        stats.vertices_pruned += before - g.num_vertices();
    }
    // Vertex-label pruning can reduce a transaction graph to nothing; such a
    // graph can never support any pattern, so it is dropped outright rather
    // than carried through the rest of the pipeline as a no-op entry.
    stats.graphs_removed = db.retain(|g| g.num_vertices() > 0);

    let matrix = PruningMatrix::build(&db);
    for g in db.iter_mut() {
        for (_idx, v1, v2, le) in g.edges_iter() {
            let l1 = g.label(v1);
            let l2 = g.label(v2);
            if matrix.pair_support_count(l1, l2) < min_sup {
                stats.edges_pruned_by_label_pair += 1;
            }
            if matrix.edge_label_support_count(le) < min_sup {
                stats.edges_pruned_by_edge_label += 1;
            }
        }
        g.retain_edges(|l1, l2, le| {
            matrix.pair_support_count(l1, l2) >= min_sup
                && matrix.edge_label_support_count(le) >= min_sup
        });
    }
    for g in db.iter_mut() {
        g.finalize();
    }

    debug!(
        "pruning removed {} graphs, {} vertices, {} edges (label-pair), {} edges (edge-label)",
        stats.graphs_removed,
        stats.vertices_pruned,
        stats.edges_pruned_by_label_pair,
        stats.edges_pruned_by_edge_label
    );

    let mut patterns = Vec::new();
    let mut arena = ProjectionArena::new();
    let mut next_id = 0usize;

    if params.output_single_vertices {
        patterns.extend(single_vertex_patterns(
            &db,
            min_sup,
            &mut arena,
            &mut next_id,
        ));
    }

    let mut miner = Miner {
        db: &db,
        arena,
        closure_index: ClosureIndex::new(),
        failure_trie: FailureTrie::new(),
        min_sup,
        max_edges: params.max_edges,
        next_id,
        stats,
        disable_early_term,
        disable_failure,
    };
    let all_ids: Vec<GraphId> = db.graph_ids().to_vec();
    miner.dfs(&DfsCode::new(), &all_ids, &Projected::default());

    let Miner {
        closure_index,
        stats,
        ..
    } = miner;
    patterns.extend(closure_index.patterns().iter().cloned());
    // Patterns are emitted in order of ascending support. Stable sort keeps
    // patterns of equal support in discovery order, which is itself
    // deterministic since extensions iterate in a fixed lexicographic order.
    patterns.sort_by_key(|p| p.support);

    info!(
        "mining complete: {} patterns, {} early terminations, {} failure triggers",
        patterns.len(),
        stats.early_terminations,
        stats.failure_triggers
    );

    MiningReport { patterns, stats }
}

fn frequent_vertex_labels(db: &GraphDatabase, min_sup: usize) -> HashSet<Label> {
    let mut counts: HashMap<Label, HashSet<GraphId>> = HashMap::new();
    for g in db.iter() {
        for v in 0..g.num_vertices() as VertexId {
            counts.entry(g.label(v)).or_default().insert(g.gid());
        }
    }
    counts
        .into_iter()
        .filter(|(_, gids)| gids.len() >= min_sup)
        .map(|(l, _)| l)
        .collect()
}

/// A label `L` is one-vertex closed iff the sum of projections of every
/// *frequent* empty-code
/// extension whose `l1 == L` does not equal the total number of vertices
/// labeled `L` (comparing total occurrence counts, not occurrence sets).
fn single_vertex_patterns(
    db: &GraphDatabase,
    min_sup: usize,
    arena: &mut ProjectionArena,
    next_id: &mut usize,
) -> Vec<ClosedPattern> {
    let mut label_count: HashMap<Label, usize> = HashMap::new();
    let mut label_graphs: HashMap<Label, HashSet<GraphId>> = HashMap::new();
    for g in db.iter() {
        for v in 0..g.num_vertices() as VertexId {
            let l = g.label(v);
            *label_count.entry(l).or_default() += 1;
            label_graphs.entry(l).or_default().insert(g.gid());
        }
    }

    let ext = extensions(&DfsCode::new(), &Projected::default(), db, arena);
    let mut covered: HashMap<Label, usize> = HashMap::new();
    for (ee, proj) in ext.iter() {
        if proj.len() >= min_sup {
            *covered.entry(ee.l1).or_default() += proj.len();
        }
    }

    let mut out = Vec::new();
    let mut labels: Vec<Label> = label_graphs
        .iter()
        .filter(|&(_, gids)| gids.len() >= min_sup)
        .map(|(&l, _)| l)
        .collect();
    labels.sort();
    for l in labels {
        let total = label_count.get(&l).copied().unwrap_or(0);
        let frequent_coverage = covered.get(&l).copied().unwrap_or(0);
        if frequent_coverage != total {
            let mut gids: Vec<GraphId> = label_graphs[&l].iter().copied().collect();
            gids.sort();
            let support = gids.len();
            out.push(ClosedPattern {
                id: *next_id,
                code: single_vertex_code(l),
                graph_ids: gids,
                support,
                projected: Projected::default(),
            });
            *next_id += 1;
        }
    }
    out
}

/// A single-vertex "code": no edges, but we still need a way to carry the
/// vertex's label through to the writer. We represent it as an otherwise
/// empty [`DfsCode`] plus a synthetic self-referential marker the writer
/// special-cases: `DfsCode` with one pseudo forward step `(0, 0, L, L, -1)`
/// is never produced by real mining (v1 must differ from v2), so it is safe
/// to use as the single-vertex sentinel.
fn single_vertex_code(label: Label) -> DfsCode {
    use crate::dfs_code::ExtendedEdge;
    use crate::graph::NO_EDGE_LABEL;
    DfsCode {
        edges: vec![ExtendedEdge {
            v1: 0,
            v2: 0,
            l1: label,
            l2: label,
            le: NO_EDGE_LABEL,
        }],
    }
}

/// True iff `code` is the single-vertex sentinel produced by
/// [`single_vertex_code`].
pub fn is_single_vertex_code(code: &DfsCode) -> Option<Label> {
    if code.edges.len() == 1 && code.edges[0].v1 == code.edges[0].v2 {
        Some(code.edges[0].l1)
    } else {
        None
    }
}

struct Miner<'a> {
    db: &'a GraphDatabase,
    arena: ProjectionArena,
    closure_index: ClosureIndex,
    failure_trie: FailureTrie,
    min_sup: usize,
    max_edges: usize,
    next_id: usize,
    stats: MiningStats,
    disable_early_term: bool,
    disable_failure: bool,
}

impl<'a> Miner<'a> {
    fn dfs(&mut self, code: &DfsCode, graph_ids: &[GraphId], projected: &Projected) {
        let etf_initial = !self.disable_failure && self.failure_trie.contains_unsafe_prefix(&code.edges);
        let early_term = if code.is_empty() || self.disable_early_term {
            false
        } else {
            self.closure_index.is_occurrence_equivalent_to_known(
                code,
                graph_ids,
                projected,
                &self.arena,
                self.db,
            )
        };
        if early_term {
            self.stats.early_terminations += 1;
            if !etf_initial {
                return;
            }
        }

        let ext = extensions(code, projected, self.db, &mut self.arena);

        // maxEdges bounds pattern length by refusing to descend into a
        // child past the bound; it never skips this call's own closure
        // bookkeeping below, since that would make maxEdges = 1 report
        // nothing instead of the single-edge patterns required at that
        // boundary.
        for (ee, child_projected) in ext.iter() {
            let child_graph_ids = child_projected.graph_ids(&self.arena);
            if child_graph_ids.len() >= self.min_sup && code.len() + 1 <= self.max_edges {
                let child_code = code.push(*ee);
                if is_canonical(&child_code) {
                    self.dfs(&child_code, &child_graph_ids, child_projected);
                }
            }
        }

        if code.is_empty() {
            return;
        }

        let triggered = if self.disable_failure {
            false
        } else {
            failure::analyze(
                code,
                projected,
                &ext,
                &self.arena,
                self.db,
                self.min_sup,
                &mut self.failure_trie,
            )
        };
        if triggered {
            self.stats.failure_triggers += 1;
        }
        if etf_initial {
            return;
        }

        // Closed iff no *frequent* extension has the same support as `code`
        // itself (glossary: "a frequent pattern with no extension of equal
        // support"). This is support-count equality, not the stronger
        // occurrence-bijection `equivalent_occurrence` test above (that test
        // only backs the closure index's early-termination lookup).
        let parent_support = graph_ids.len();
        let closed = ext.iter().all(|(_ee, child_projected)| {
            let child_support = child_projected.graph_ids(&self.arena).len();
            child_support < self.min_sup || child_support != parent_support
        });
        if closed {
            let pattern = ClosedPattern {
                id: self.next_id,
                code: code.copy(),
                graph_ids: graph_ids.to_vec(),
                support: graph_ids.len(),
                projected: projected.clone(),
            };
            self.next_id += 1;
            self.closure_index.register(pattern, &self.arena);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::TransactionGraph;

    fn triangle(gid: u32, label: i32) -> TransactionGraph {
        TransactionGraph::new(
            vec![label, label, label],
            vec![(0, 1, 1), (1, 2, 1), (2, 0, 1)],
            GraphId(gid),
        )
    }

    #[test]
    fn graphs_emptied_by_vertex_pruning_are_removed_and_counted() {
        // Two triangles on label 7 (frequent at minSup=2) plus a third graph
        // entirely on label 9 (frequent in only 1 of 3 graphs, below
        // minSup=2): label 9 is pruned away, leaving that graph with no
        // vertices at all and no edges to mine.
        let db = GraphDatabase::new(vec![
            triangle(0, 7),
            triangle(1, 7),
            TransactionGraph::new(vec![9, 9, 9], vec![(0, 1, 1)], GraphId(2)),
        ]);
        let params = MiningParams {
            min_support: 2.0 / 3.0,
            output_single_vertices: false,
            max_edges: usize::MAX,
            output_graph_ids: true,
        };
        let report = mine(db, &params);
        assert_eq!(report.stats.graphs_removed, 1);
    }

    #[test]
    fn two_triangles_close_to_the_full_triangle() {
        // S1: two triangles on label A, minSup = 2.
        let db = GraphDatabase::new(vec![triangle(0, 7), triangle(1, 7)]);
        let params = MiningParams {
            min_support: 1.0,
            output_single_vertices: false,
            max_edges: usize::MAX,
            output_graph_ids: true,
        };
        let report = mine(db, &params);
        assert!(report
            .patterns
            .iter()
            .any(|p| p.code.len() == 3 && p.support == 2));
        // No 1- or 2-edge pattern should be closed: every sub-path extends
        // to the full triangle with equal support.
        assert!(!report
            .patterns
            .iter()
            .any(|p| p.code.len() == 1 || p.code.len() == 2));
    }

    #[test]
    fn max_edges_zero_yields_no_output() {
        let db = GraphDatabase::new(vec![triangle(0, 7)]);
        let params = MiningParams {
            min_support: 1.0,
            output_single_vertices: true,
            max_edges: 0,
            output_graph_ids: true,
        };
        let report = mine(db, &params);
        assert!(report.patterns.is_empty());
    }

    #[test]
    fn empty_database_yields_no_output() {
        let db = GraphDatabase::new(vec![]);
        let params = MiningParams::default();
        let report = mine(db, &params);
        assert!(report.patterns.is_empty());
    }
}
