//! Scenario fixtures S1-S6 from the mining driver's testable properties.

use std::collections::HashSet;

use closegraph::config::MiningParams;
use closegraph::graph::{GraphDatabase, GraphId, TransactionGraph};
use closegraph::miner::{mine, mine_with_flags};

fn db(graphs: Vec<TransactionGraph>) -> GraphDatabase {
    GraphDatabase::new(graphs)
}

fn params(min_support: f64) -> MiningParams {
    MiningParams {
        min_support,
        output_single_vertices: false,
        max_edges: usize::MAX,
        output_graph_ids: true,
    }
}

fn triangle(gid: u32, label: i32, edge_label: i32) -> TransactionGraph {
    TransactionGraph::new(
        vec![label, label, label],
        vec![(0, 1, edge_label), (1, 2, edge_label), (2, 0, edge_label)],
        GraphId(gid),
    )
}

#[test]
fn s1_two_triangles_minsup_2() {
    // A-A-A triangle, twice, minSup = 2.
    let database = db(vec![triangle(0, 1, 5), triangle(1, 1, 5)]);
    let report = mine(database, &params(1.0));
    let closed: Vec<_> = report
        .patterns
        .iter()
        .filter(|p| p.code.len() == 3)
        .collect();
    assert_eq!(closed.len(), 1);
    assert_eq!(closed[0].support, 2);
    assert_eq!(closed[0].graph_ids, vec![GraphId(0), GraphId(1)]);
    // No 1- or 2-edge sub-pattern is closed: each extends to the full
    // triangle without losing support.
    assert!(!report.patterns.iter().any(|p| p.code.len() < 3));
}

#[test]
fn s2_single_path_no_proper_subpath_closed() {
    // A-B-A-B path, one graph, minSup = 1, maxEdges = 3.
    let g = TransactionGraph::new(
        vec![1, 2, 1, 2],
        vec![(0, 1, 9), (1, 2, 9), (2, 3, 9)],
        GraphId(0),
    );
    let mut p = params(1.0);
    p.max_edges = 3;
    let report = mine(db(vec![g]), &p);
    let full: Vec<_> = report
        .patterns
        .iter()
        .filter(|pat| pat.code.len() == 3)
        .collect();
    assert_eq!(full.len(), 1);
    assert!(!report.patterns.iter().any(|pat| pat.code.len() < 3));
}

#[test]
fn s3_two_graphs_only_shared_edge_closed() {
    // G1 = A-B, G2 = A-B-C, minSup = 2.
    let g1 = TransactionGraph::new(vec![1, 2], vec![(0, 1, 9)], GraphId(1));
    let g2 = TransactionGraph::new(vec![1, 2, 3], vec![(0, 1, 9), (1, 2, 9)], GraphId(2));
    let report = mine(db(vec![g1, g2]), &params(1.0));
    assert_eq!(report.patterns.len(), 1);
    let p = &report.patterns[0];
    assert_eq!(p.code.len(), 1);
    assert_eq!(p.support, 2);
    assert_eq!(p.graph_ids, vec![GraphId(1), GraphId(2)]);
}

#[test]
fn s4_diamond_closes_but_not_the_triangle() {
    // Two triangles sharing edge (1,2): vertices 0,1,2,3, edges
    // 0-1, 1-2, 2-0, 1-3, 3-2.
    let g = TransactionGraph::new(
        vec![1, 1, 1, 1],
        vec![(0, 1, 9), (1, 2, 9), (2, 0, 9), (1, 3, 9), (3, 2, 9)],
        GraphId(0),
    );
    let report = mine(db(vec![g]), &params(1.0));
    assert!(report.patterns.iter().any(|p| p.code.len() == 5));
    assert!(!report.patterns.iter().any(|p| p.code.len() == 3));
}

#[test]
fn s5_disconnected_components_do_not_merge() {
    // Two disjoint components: A-A and B-B.
    let g = TransactionGraph::new(vec![1, 1, 2, 2], vec![(0, 1, 9), (2, 3, 9)], GraphId(0));
    let report = mine(db(vec![g]), &params(1.0));
    assert_eq!(report.patterns.len(), 2);
    for p in &report.patterns {
        assert_eq!(p.code.len(), 1);
    }
}

#[test]
fn max_edges_one_yields_only_single_edge_patterns() {
    let mut p = params(1.0);
    p.max_edges = 1;
    let report = mine(db(vec![triangle(0, 1, 9)]), &p);
    assert!(report.patterns.iter().all(|pat| pat.code.len() <= 1));
}

/// A comparable fingerprint of a closed pattern, independent of discovery
/// order, for comparing two differently-configured runs' pattern sets.
fn fingerprint(p: &closegraph::ClosedPattern) -> (Vec<(u32, u32, i32, i32, i32)>, usize, Vec<GraphId>) {
    let edges = p
        .code
        .edges
        .iter()
        .map(|e| (e.v1, e.v2, e.l1, e.l2, e.le))
        .collect();
    (edges, p.support, p.graph_ids.clone())
}

#[test]
fn disabling_early_termination_and_failure_analysis_finds_the_same_patterns() {
    // S6 oracle property: the two optimizations exist purely to skip
    // redundant work. Forcing both off must discover exactly the same
    // closed patterns as running normally, on a fixture exercising both
    // closure early-termination and the diamond's shared-edge ambiguity.
    let g = TransactionGraph::new(
        vec![1, 1, 1, 1],
        vec![(0, 1, 9), (1, 2, 9), (2, 0, 9), (1, 3, 9), (3, 2, 9)],
        GraphId(0),
    );
    let p = params(1.0);
    let with_opts = mine(db(vec![g.clone()]), &p);
    let without_opts = mine_with_flags(db(vec![g]), &p, true, true);

    let a: HashSet<_> = with_opts.patterns.iter().map(fingerprint).collect();
    let b: HashSet<_> = without_opts.patterns.iter().map(fingerprint).collect();
    assert_eq!(a, b);
}

#[test]
fn patterns_are_emitted_in_ascending_support_order() {
    let g1 = TransactionGraph::new(vec![1, 2], vec![(0, 1, 9)], GraphId(1));
    let g2 = TransactionGraph::new(vec![1, 2, 3], vec![(0, 1, 9), (1, 2, 9)], GraphId(2));
    let mut p = params(1.0);
    p.max_edges = usize::MAX;
    let report = mine(db(vec![g1, g2]), &p);
    let supports: Vec<usize> = report.patterns.iter().map(|pat| pat.support).collect();
    let mut sorted = supports.clone();
    sorted.sort();
    assert_eq!(supports, sorted);
}
