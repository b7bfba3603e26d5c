//! Immutable transaction graph store.
//!
//! A [`TransactionGraph`] is built once by the reader, pruned once by the
//! driver, then frozen: [`TransactionGraph::finalize`] computes the
//! neighbor index, the label→vertex index and the edge-enumeration table
//! used as the stable identity half of an [`Eid`]. Nothing after that point
//! mutates a graph.

use std::collections::HashMap;

/// Opaque vertex id, local to one [`TransactionGraph`].
pub type VertexId = u32;
/// Integer vertex/edge label. `-1` is reserved as the single-vertex edge-label
/// sentinel used in the text output format.
pub type Label = i32;

pub const NO_EDGE_LABEL: Label = -1;

/// A transaction graph's id, as given in its `t # <gid>` header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphId(pub u32);

/// Identity of one physical edge: the graph it lives in plus its stable
/// index into that graph's edge table. Equality/hashing/ordering are by
/// identity, not by endpoints or label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Eid {
    pub gid: GraphId,
    pub edge_index: u32,
}

#[derive(Debug, Clone, Copy)]
struct RawEdge {
    v1: VertexId,
    v2: VertexId,
    label: Label,
}

/// One transaction graph: a labeled, undirected, simple graph with a stable
/// edge-enumeration table.
#[derive(Debug, Clone)]
pub struct TransactionGraph {
    gid: GraphId,
    vertex_labels: Vec<Label>,
    edges: Vec<RawEdge>,
    adjacency: Vec<Vec<(VertexId, u32)>>,
    label_index: HashMap<Label, Vec<VertexId>>,
}

impl TransactionGraph {
    /// Build from parsed vertex labels (indexed by [`VertexId`]) and a
    /// vertex-pair edge list. Precomputes nothing yet; call [`Self::finalize`]
    /// once pruning has settled the final vertex/edge set.
    pub fn new(vertex_labels: Vec<Label>, edges: Vec<(VertexId, VertexId, Label)>, gid: GraphId) -> Self {
        let edges = edges
            .into_iter()
            .map(|(v1, v2, label)| RawEdge { v1, v2, label })
            .collect();
        let mut g = TransactionGraph {
            gid,
            vertex_labels,
            edges,
            adjacency: Vec::new(),
            label_index: HashMap::new(),
        };
        g.finalize();
        g
    }

    /// Recompute neighbor lists, the label index and keep the edge table's
    /// existing order as the stable identity assignment. Must be called
    /// after any vertex/edge removal (the driver's pruning phase); never
    /// called again afterward.
    pub fn finalize(&mut self) {
        let n = self.vertex_labels.len();
        self.adjacency = vec![Vec::new(); n];
        for (idx, e) in self.edges.iter().enumerate() {
            self.adjacency[e.v1 as usize].push((e.v2, idx as u32));
            self.adjacency[e.v2 as usize].push((e.v1, idx as u32));
        }
        self.label_index.clear();
        for (v, &l) in self.vertex_labels.iter().enumerate() {
            self.label_index.entry(l).or_default().push(v as VertexId);
        }
    }

    /// Remove vertices whose predicate returns `false`, along with every
    /// incident edge, and renumber the remaining vertices densely from 0.
    /// Does not call [`Self::finalize`]; callers batch all pruning then
    /// finalize once.
    pub fn retain_vertices(&mut self, keep: impl Fn(VertexId, Label) -> bool) {
        let n = self.vertex_labels.len();
        let mut remap = vec![None; n];
        let mut new_labels = Vec::new();
        for v in 0..n as VertexId {
            if keep(v, self.vertex_labels[v as usize]) {
                remap[v as usize] = Some(new_labels.len() as VertexId);
                new_labels.push(self.vertex_labels[v as usize]);
            }
        }
        self.edges.retain(|e| remap[e.v1 as usize].is_some() && remap[e.v2 as usize].is_some());
        for e in &mut self.edges {
            e.v1 = remap[e.v1 as usize].unwrap();
            e.v2 = remap[e.v2 as usize].unwrap();
        }
        self.vertex_labels = new_labels;
    }

    /// Drop edges the predicate rejects. Does not renumber vertices.
    pub fn retain_edges(&mut self, keep: impl Fn(Label, Label, Label) -> bool) {
        let labels = &self.vertex_labels;
        self.edges
            .retain(|e| keep(labels[e.v1 as usize], labels[e.v2 as usize], e.label));
    }

    pub fn gid(&self) -> GraphId {
        self.gid
    }

    pub fn num_vertices(&self) -> usize {
        self.vertex_labels.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn label(&self, v: VertexId) -> Label {
        self.vertex_labels[v as usize]
    }

    /// Ordered sequence of `(neighbor, edge index)` pairs.
    pub fn neighbors(&self, v: VertexId) -> &[(VertexId, u32)] {
        &self.adjacency[v as usize]
    }

    pub fn is_neighbor(&self, u: VertexId, v: VertexId) -> bool {
        self.adjacency[u as usize].iter().any(|&(x, _)| x == v)
    }

    pub fn edge_label(&self, u: VertexId, v: VertexId) -> Label {
        self.adjacency[u as usize]
            .iter()
            .find(|&&(x, _)| x == v)
            .map(|&(_, idx)| self.edges[idx as usize].label)
            .expect("edge_label called on non-adjacent vertices")
    }

    pub fn vertices_with_label(&self, l: Label) -> &[VertexId] {
        self.label_index.get(&l).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edge_id(&self, edge_index: u32) -> Eid {
        Eid {
            gid: self.gid,
            edge_index,
        }
    }

    /// Stored `(v1, v2, label)` for a given table index, in file-read order
    /// (not necessarily `v1 < v2`).
    pub fn edge_at(&self, edge_index: u32) -> (VertexId, VertexId, Label) {
        let e = &self.edges[edge_index as usize];
        (e.v1, e.v2, e.label)
    }

    pub fn edges_iter(&self) -> impl Iterator<Item = (u32, VertexId, VertexId, Label)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| (i as u32, e.v1, e.v2, e.label))
    }
}

/// Read-only access to a set of graphs, keyed by [`GraphId`]. Implemented by
/// [`GraphDatabase`] for the real mining run and by [`crate::canonical::SingleGraphSource`]
/// for the canonicality test's abstract-graph-of-one check.
pub trait GraphSource {
    fn graph(&self, gid: GraphId) -> &TransactionGraph;
    /// All graph ids this source covers, ascending.
    fn graph_ids(&self) -> &[GraphId];
}

/// The full, pruned, finalized transaction database.
#[derive(Debug, Clone, Default)]
pub struct GraphDatabase {
    graphs: Vec<TransactionGraph>,
    ids: Vec<GraphId>,
}

impl GraphDatabase {
    pub fn new(mut graphs: Vec<TransactionGraph>) -> Self {
        graphs.sort_by_key(|g| g.gid());
        let ids = graphs.iter().map(|g| g.gid()).collect();
        GraphDatabase { graphs, ids }
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransactionGraph> {
        self.graphs.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut TransactionGraph> {
        self.graphs.iter_mut()
    }

    /// Drop every graph the predicate rejects, returning how many were
    /// removed. Used by the driver's pruning phase to retire graphs that
    /// pruning reduced to nothing (so the advisory "graphs removed"
    /// statistic reflects an actual removal, not vertex/edge counts).
    pub fn retain(&mut self, keep: impl Fn(&TransactionGraph) -> bool) -> usize {
        let before = self.graphs.len();
        self.graphs.retain(|g| keep(g));
        self.ids = self.graphs.iter().map(|g| g.gid()).collect();
        before - self.graphs.len()
    }
}

impl GraphSource for GraphDatabase {
    fn graph(&self, gid: GraphId) -> &TransactionGraph {
        let idx = self
            .ids
            .binary_search(&gid)
            .expect("graph id not present in database");
        &self.graphs[idx]
    }

    fn graph_ids(&self) -> &[GraphId] {
        &self.ids
    }
}
