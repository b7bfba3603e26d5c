//! Writes closed patterns in the `t`/`v`/`e` output format.

use std::io::{self, Write};

use crate::closure::ClosedPattern;
use crate::dfs_code::DfsCode;
use crate::graph::Label;
use crate::miner::is_single_vertex_code;

pub(crate) fn vertex_labels(code: &DfsCode) -> Vec<Label> {
    let n = code.num_vertices();
    let mut labels: Vec<Option<Label>> = vec![None; n];
    for ee in &code.edges {
        labels[ee.v1 as usize] = Some(ee.l1);
        labels[ee.v2 as usize] = Some(ee.l2);
    }
    labels
        .into_iter()
        .map(|l| l.expect("every code vertex is labeled by some step"))
        .collect()
}

/// Write every pattern, in the order given, each followed by a blank line.
pub fn write_patterns<W: Write>(
    patterns: &[ClosedPattern],
    output_graph_ids: bool,
    w: &mut W,
) -> io::Result<()> {
    for (i, pattern) in patterns.iter().enumerate() {
        writeln!(w, "t # {} * {}", i, pattern.support)?;

        if let Some(label) = is_single_vertex_code(&pattern.code) {
            writeln!(w, "v 0 {}", label)?;
        } else {
            for (vid, label) in vertex_labels(&pattern.code).into_iter().enumerate() {
                writeln!(w, "v {} {}", vid, label)?;
            }
            for ee in &pattern.code.edges {
                writeln!(w, "e {} {} {}", ee.v1, ee.v2, ee.le)?;
            }
        }

        if output_graph_ids {
            let ids: Vec<String> = pattern.graph_ids.iter().map(|g| g.0.to_string()).collect();
            writeln!(w, "x {}", ids.join(" "))?;
        }
        writeln!(w)?;
    }
    Ok(())
}
