//! GraphViz DOT rendering of a closed pattern, for `--dot` output.
//!
//! Deliberately thin: it only sees the public [`ClosedPattern`] surface, the
//! same as any external consumer of the library would.

use std::fmt::Write as _;

use crate::closure::ClosedPattern;
use crate::io::writer::vertex_labels;
use crate::miner::is_single_vertex_code;

/// Render one closed pattern as a GraphViz `graph` block.
pub fn to_dot(pattern: &ClosedPattern) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "graph pattern_{} {{", pattern.id);

    if let Some(label) = is_single_vertex_code(&pattern.code) {
        let _ = writeln!(out, "  0 [label=\"{}\"];", label);
    } else {
        for (vid, label) in vertex_labels(&pattern.code).into_iter().enumerate() {
            let _ = writeln!(out, "  {} [label=\"{}\"];", vid, label);
        }
        for ee in &pattern.code.edges {
            let _ = writeln!(out, "  {} -- {} [label=\"{}\"];", ee.v1, ee.v2, ee.le);
        }
    }

    let _ = writeln!(out, "}}");
    out
}
