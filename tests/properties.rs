//! Property-based invariants: reruns are byte-identical, and every reported
//! pattern regenerates itself as the minimum DFS code of its own abstract
//! graph.

use quickcheck::{quickcheck, Arbitrary, Gen};

use closegraph::canonical::is_canonical;
use closegraph::config::MiningParams;
use closegraph::graph::{GraphDatabase, GraphId, TransactionGraph};
use closegraph::io::write_patterns;
use closegraph::miner::mine;

/// A small random labeled graph: 2-5 vertices, labels and edge labels drawn
/// from a tiny alphabet so duplicate substructure (needed to exercise
/// closure/support logic) is likely.
#[derive(Clone, Debug)]
struct SmallGraph {
    labels: Vec<i32>,
    edges: Vec<(u32, u32, i32)>,
}

impl Arbitrary for SmallGraph {
    fn arbitrary(g: &mut Gen) -> Self {
        let n = (u8::arbitrary(g) % 4) as usize + 2;
        let labels: Vec<i32> = (0..n).map(|_| (u8::arbitrary(g) % 3) as i32).collect();
        let mut edges = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                if bool::arbitrary(g) {
                    let le = (u8::arbitrary(g) % 2) as i32;
                    edges.push((i as u32, j as u32, le));
                }
            }
        }
        SmallGraph { labels, edges }
    }
}

fn to_db(graphs: &[SmallGraph]) -> GraphDatabase {
    let transactions = graphs
        .iter()
        .enumerate()
        .map(|(i, sg)| TransactionGraph::new(sg.labels.clone(), sg.edges.clone(), GraphId(i as u32)))
        .collect();
    GraphDatabase::new(transactions)
}

fn mine_output(graphs: &[SmallGraph]) -> Vec<u8> {
    let db = to_db(graphs);
    let params = MiningParams {
        min_support: 1.0,
        output_single_vertices: true,
        max_edges: usize::MAX,
        output_graph_ids: true,
    };
    let report = mine(db, &params);
    let mut buf = Vec::new();
    write_patterns(&report.patterns, true, &mut buf).unwrap();
    buf
}

quickcheck! {
    fn reruns_are_byte_identical(graphs: Vec<SmallGraph>) -> bool {
        if graphs.is_empty() || graphs.len() > 4 {
            return true;
        }
        mine_output(&graphs) == mine_output(&graphs)
    }
}

quickcheck! {
    fn reported_patterns_regenerate_their_own_minimum_code(graphs: Vec<SmallGraph>) -> bool {
        if graphs.is_empty() || graphs.len() > 4 {
            return true;
        }
        let db = to_db(&graphs);
        let params = MiningParams {
            min_support: 1.0,
            output_single_vertices: false,
            max_edges: usize::MAX,
            output_graph_ids: true,
        };
        let report = mine(db, &params);
        report.patterns.iter().all(|p| is_canonical(&p.code))
    }
}
