//! Projection chains: the record of where one DFS code is embedded in one
//! transaction graph.
//!
//! Each projection is a persistent, singly-linked list of physical edges
//! realized by one embedding of a DFS code into one transaction graph.
//! Nodes are append-only and stored in a monotonically growing arena owned
//! by the [`crate::miner::Miner`]; they are referenced by a dense `u32`
//! index rather than a pointer, the same newtype-index convention the
//! teacher graph library uses for its node/edge handles. The arena
//! outlives every pattern recorded during the run (closed patterns retain
//! their projections for later closure-equivalence checks).

use std::collections::HashSet;

use crate::dfs_code::{CodeVertex, DfsCode};
use crate::graph::{Eid, GraphId, GraphSource, VertexId};

/// Index into a [`ProjectionArena`]. `Copy`, dense, no pointer chasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjId(u32);

#[derive(Debug, Clone, Copy)]
pub struct ProjectionNode {
    pub eid: Eid,
    /// Whether the physical edge's stored `(v1, v2)` agrees with the code
    /// step's `(v1, v2)` direction.
    pub reversed: bool,
    pub previous: Option<ProjId>,
}

/// Append-only store of projection nodes, referenced by [`ProjId`].
#[derive(Debug, Clone, Default)]
pub struct ProjectionArena {
    nodes: Vec<ProjectionNode>,
}

impl ProjectionArena {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn push(&mut self, eid: Eid, reversed: bool, previous: Option<ProjId>) -> ProjId {
        let id = ProjId(self.nodes.len() as u32);
        self.nodes.push(ProjectionNode {
            eid,
            reversed,
            previous,
        });
        id
    }

    pub fn node(&self, id: ProjId) -> ProjectionNode {
        self.nodes[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// The projected set `Π`: one chain tail per occurrence, plus the derived
/// set of transaction-graph ids covered. Chains may share tails
/// (structural sharing is automatic since nodes are never cloned, only
/// referenced by index).
#[derive(Debug, Clone, Default)]
pub struct Projected {
    pub entries: Vec<ProjId>,
}

impl Projected {
    pub fn from_entries(entries: Vec<ProjId>) -> Self {
        Projected { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Support = `|graphIds|`.
    pub fn graph_ids(&self, arena: &ProjectionArena) -> Vec<GraphId> {
        let mut ids: Vec<GraphId> = self
            .entries
            .iter()
            .map(|&p| arena.node(p).eid.gid)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        ids.sort();
        ids
    }
}

/// Reconstruct the embedding `iso: code-vertex -> graph-vertex` by walking
/// a projection chain from its tail back to the root, then replaying it in
/// code order.
pub fn decode_iso(
    code: &DfsCode,
    arena: &ProjectionArena,
    tail: ProjId,
    db: &dyn GraphSource,
) -> Vec<VertexId> {
    let mut steps = Vec::with_capacity(code.len());
    let mut cur = Some(tail);
    while let Some(id) = cur {
        let node = arena.node(id);
        steps.push(node);
        cur = node.previous;
    }
    steps.reverse();
    debug_assert_eq!(steps.len(), code.len());

    let mut iso = vec![VertexId::MAX; code.num_vertices()];
    for (i, ee) in code.edges.iter().enumerate() {
        let node = steps[i];
        let graph = db.graph(node.eid.gid);
        let (a, b, _label) = graph.edge_at(node.eid.edge_index);
        let (src, dst) = if node.reversed { (b, a) } else { (a, b) };
        iso[ee.v1 as usize] = src;
        iso[ee.v2 as usize] = dst;
    }
    iso
}

/// The set of physical edge identities realized at a single code step,
/// across every projection in `projected`: one closure-index key per code
/// step.
pub fn eid_set_at_step(
    code_len: usize,
    arena: &ProjectionArena,
    projected: &Projected,
    step: usize,
) -> Vec<Eid> {
    let skip = code_len - 1 - step;
    let mut set: HashSet<Eid> = HashSet::new();
    for &tail in &projected.entries {
        let mut cur = tail;
        for _ in 0..skip {
            cur = arena.node(cur).previous.expect("chain shorter than code");
        }
        set.insert(arena.node(cur).eid);
    }
    let mut v: Vec<Eid> = set.into_iter().collect();
    v.sort();
    v
}

/// Walk every projection in `projected` back `skip` steps and return the
/// deduplicated set of reached [`ProjId`]s, by walking back `skip` nodes in
/// each chain and deduplicating tails.
pub fn dedup_prefix_tails(arena: &ProjectionArena, projected: &Projected, skip: usize) -> Vec<ProjId> {
    let mut set: HashSet<ProjId> = HashSet::new();
    for &tail in &projected.entries {
        let mut cur = tail;
        let mut ok = true;
        for _ in 0..skip {
            match arena.node(cur).previous {
                Some(p) => cur = p,
                None => {
                    ok = false;
                    break;
                }
            }
        }
        if ok {
            set.insert(cur);
        }
    }
    set.into_iter().collect()
}

/// Invert an `iso` vector into `graph-vertex -> code-vertex`.
pub fn invert_iso(iso: &[VertexId]) -> std::collections::HashMap<VertexId, CodeVertex> {
    iso.iter()
        .enumerate()
        .filter(|&(_, &gv)| gv != VertexId::MAX)
        .map(|(cv, &gv)| (gv, cv as CodeVertex))
        .collect()
}
