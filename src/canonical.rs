//! Canonicality test: a code is canonical iff it equals the minimum DFS
//! code of its own abstract graph.

use crate::dfs_code::DfsCode;
use crate::extension::extensions;
use crate::graph::{GraphId, GraphSource, Label, TransactionGraph};
use crate::projection::{Projected, ProjectionArena};

/// A [`GraphSource`] wrapping exactly one graph, used to regenerate the
/// minimum DFS code of a pattern's own abstract graph.
pub struct SingleGraphSource {
    graph: TransactionGraph,
    ids: [GraphId; 1],
}

impl SingleGraphSource {
    pub fn new(graph: TransactionGraph) -> Self {
        let gid = graph.gid();
        SingleGraphSource { graph, ids: [gid] }
    }
}

impl GraphSource for SingleGraphSource {
    fn graph(&self, gid: GraphId) -> &TransactionGraph {
        debug_assert_eq!(gid, self.ids[0]);
        &self.graph
    }

    fn graph_ids(&self) -> &[GraphId] {
        &self.ids
    }
}

/// Materialize the abstract graph a code describes: one vertex per code
/// vertex (carrying whichever label the code assigns it — every step that
/// touches a given code vertex is guaranteed to agree on its label), one
/// edge per code step.
fn build_abstract_graph(code: &DfsCode) -> TransactionGraph {
    let n = code.num_vertices();
    let mut labels: Vec<Option<Label>> = vec![None; n];
    let mut edges = Vec::with_capacity(code.len());
    for ee in &code.edges {
        labels[ee.v1 as usize] = Some(ee.l1);
        labels[ee.v2 as usize] = Some(ee.l2);
        edges.push((ee.v1, ee.v2, ee.le));
    }
    let labels: Vec<Label> = labels
        .into_iter()
        .map(|l| l.expect("every code vertex must be labeled by some step"))
        .collect();
    TransactionGraph::new(labels, edges, GraphId(0))
}

/// Is `code` the lexicographically minimum DFS code of its abstract graph?
pub fn is_canonical(code: &DfsCode) -> bool {
    if code.is_empty() {
        return true;
    }
    let abstract_graph = build_abstract_graph(code);
    let source = SingleGraphSource::new(abstract_graph);
    let mut arena = ProjectionArena::new();
    let mut min_code = DfsCode::new();
    let mut projected = Projected::default();

    for step in &code.edges {
        let ext = extensions(&min_code, &projected, &source, &mut arena);
        let Some((min_ee, min_proj)) = ext.into_iter().next() else {
            return false;
        };
        if min_ee != *step {
            return false;
        }
        min_code = min_code.push(min_ee);
        projected = min_proj;
    }
    true
}
