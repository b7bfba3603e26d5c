//! End-to-end I/O: parse a transaction database, mine it, and check the
//! written output is well-formed and matches the mined patterns.

use std::io::Cursor;

use closegraph::config::MiningParams;
use closegraph::io::{read_graphs, write_patterns};
use closegraph::miner::mine;

#[test]
fn parses_mines_and_writes_a_small_database() {
    let input = "t # 0\n\
                  v 0 1\n\
                  v 1 1\n\
                  v 2 1\n\
                  e 0 1 5\n\
                  e 1 2 5\n\
                  e 2 0 5\n\
                  t # 1\n\
                  v 0 1\n\
                  v 1 1\n\
                  v 2 1\n\
                  e 0 1 5\n\
                  e 1 2 5\n\
                  e 2 0 5\n";

    let db = read_graphs(Cursor::new(input.as_bytes())).unwrap();
    assert_eq!(db.len(), 2);

    let params = MiningParams {
        min_support: 1.0,
        output_single_vertices: false,
        max_edges: usize::MAX,
        output_graph_ids: true,
    };
    let report = mine(db, &params);
    assert_eq!(report.patterns.len(), 1);

    let mut buf = Vec::new();
    write_patterns(&report.patterns, true, &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();

    assert!(text.starts_with("t # 0 * 2\n"));
    assert!(text.contains("v 0 1\n"));
    assert!(text.contains("e 0 1 5\n"));
    assert!(text.contains("x 0 1\n"));
    assert!(text.trim_end_matches('\n').ends_with("x 0 1"));
}

#[test]
fn rejects_malformed_input_with_location_information() {
    let input = "t # 0\nv 0 1\ne 0 5 9\n";
    let err = read_graphs(Cursor::new(input.as_bytes())).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("line 3"));
}
