//! Early-termination-failure analyzer: five independent structural checks
//! that detect a configuration in which the closure hash index's
//! early-termination optimization would incorrectly suppress discovery of
//! a genuine closed descendant.
//!
//! Each case only inspects the projections of the current code (or, for
//! Case 5, of a reconstructed prefix); none of them reach into the closure
//! index. The first case to trigger is enough: the whole code is inserted
//! into the [`FailureTrie`] and the analyzer stops.

use std::collections::{HashMap, HashSet};

use crate::dfs_code::{CodeVertex, DfsCode, ExtendedEdge};
use crate::extension::ExtensionMap;
use crate::graph::{GraphId, GraphSource, Label, VertexId};
use crate::projection::{dedup_prefix_tails, decode_iso, invert_iso, Projected, ProjectionArena};

/// Prefix trie of "unsafe" code edge sequences.
#[derive(Debug, Default)]
pub struct FailureTrie {
    root: TrieNode,
}

#[derive(Debug, Default)]
struct TrieNode {
    children: HashMap<ExtendedEdge, TrieNode>,
    is_unsafe: bool,
}

impl FailureTrie {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: &DfsCode) {
        let mut node = &mut self.root;
        for ee in &code.edges {
            node = node.children.entry(*ee).or_default();
        }
        node.is_unsafe = true;
    }

    /// True if `edges` (or a proper prefix of it) was previously marked
    /// unsafe — subsequent descendants consult this to suppress early
    /// termination.
    pub fn contains_unsafe_prefix(&self, edges: &[ExtendedEdge]) -> bool {
        let mut node = &self.root;
        if node.is_unsafe {
            return true;
        }
        for ee in edges {
            match node.children.get(ee) {
                Some(next) => {
                    node = next;
                    if node.is_unsafe {
                        return true;
                    }
                }
                None => return false,
            }
        }
        false
    }
}

/// Runs the five cases and, on any hit, inserts `code` into `trie`.
/// Returns whether any case triggered; the driver checks this immediately
/// after calling in to decide whether to suppress further recursion.
pub fn analyze(
    code: &DfsCode,
    projected: &Projected,
    ext: &ExtensionMap,
    arena: &ProjectionArena,
    db: &dyn GraphSource,
    min_sup: usize,
    trie: &mut FailureTrie,
) -> bool {
    let triggered = case1(code, projected, ext, arena, db, min_sup)
        || case2(code, projected, ext, arena, db, min_sup)
        || case3(code, projected, arena, db, min_sup)
        || case4(code, projected, arena, db, min_sup)
        || case5(code, projected, arena, db, min_sup);
    if triggered {
        trie.insert(code);
    }
    triggered
}

fn graph_ids_of(proj: &Projected, arena: &ProjectionArena) -> HashSet<GraphId> {
    proj.entries.iter().map(|&p| arena.node(p).eid.gid).collect()
}

/// Case 1: last step forward. Off-rightmost-path edges from the rightmost
/// graph-vertex, grouped by `(edgeLabel, targetLabel)`.
fn case1(
    code: &DfsCode,
    projected: &Projected,
    ext: &ExtensionMap,
    arena: &ProjectionArena,
    db: &dyn GraphSource,
    min_sup: usize,
) -> bool {
    if code.is_empty() || !code.last_is_forward() {
        return false;
    }
    let rm = code.rightmost();
    let path: HashSet<CodeVertex> = code.rightmost_path().into_iter().collect();
    let mut groups: HashMap<(Label, Label), HashSet<GraphId>> = HashMap::new();

    for &tail in &projected.entries {
        let gid = arena.node(tail).eid.gid;
        let g = db.graph(gid);
        let iso = decode_iso(code, arena, tail, db);
        let inv = invert_iso(&iso);
        let rm_gv = iso[rm as usize];
        for &(nbr, _edge_index) in g.neighbors(rm_gv) {
            if let Some(&cv) = inv.get(&nbr) {
                if !path.contains(&cv) {
                    let key = (g.edge_label(rm_gv, nbr), g.label(nbr));
                    groups.entry(key).or_default().insert(gid);
                }
            }
        }
    }

    for (key, gids) in &groups {
        if gids.len() >= min_sup {
            return true;
        }
        for (ee, ext_proj) in ext.iter() {
            if ee.v1 == rm && ee.is_forward() && (ee.le, ee.l2) == *key {
                let merged: HashSet<GraphId> = gids
                    .union(&graph_ids_of(ext_proj, arena))
                    .copied()
                    .collect();
                if merged.len() >= min_sup {
                    return true;
                }
            }
        }
    }
    false
}

/// Case 2: single-fork variant of Case 1. Same idea, but the candidate
/// source is an earlier rightmost-path vertex; once a qualifying
/// source/target pair is found for a given source vertex, that vertex's
/// group is tested and the search moves on (no attempt to combine multiple
/// forks from the same vertex).
fn case2(
    code: &DfsCode,
    projected: &Projected,
    ext: &ExtensionMap,
    arena: &ProjectionArena,
    db: &dyn GraphSource,
    min_sup: usize,
) -> bool {
    if code.is_empty() {
        return false;
    }
    let path = code.rightmost_path();
    if path.len() < 2 {
        return false;
    }
    let rm = *path.last().unwrap();

    for (i, &v) in path.iter().enumerate() {
        if v == rm {
            continue;
        }
        let mut groups: HashMap<(CodeVertex, Label, Label), HashSet<GraphId>> = HashMap::new();
        for &tail in &projected.entries {
            let gid = arena.node(tail).eid.gid;
            let g = db.graph(gid);
            let iso = decode_iso(code, arena, tail, db);
            let inv = invert_iso(&iso);
            let v_gv = iso[v as usize];
            for &(nbr, _edge_index) in g.neighbors(v_gv) {
                if let Some(&cv) = inv.get(&nbr) {
                    // cv strictly between v and rm on the rightmost path.
                    if path[i + 1..].contains(&cv) && !code.contains_edge(v, cv) {
                        let key = (v, g.edge_label(v_gv, nbr), g.label(nbr));
                        groups.entry(key).or_default().insert(gid);
                    }
                }
            }
        }
        for (key, gids) in &groups {
            if gids.len() >= min_sup {
                return true;
            }
            for (ee, ext_proj) in ext.iter() {
                if ee.v1 == key.0 && ee.is_forward() && (ee.le, ee.l2) == (key.1, key.2) {
                    let merged: HashSet<GraphId> = gids
                        .union(&graph_ids_of(ext_proj, arena))
                        .copied()
                        .collect();
                    if merged.len() >= min_sup {
                        return true;
                    }
                }
            }
        }
    }
    false
}

/// Case 3: the last two rightmost-path edges share `(edgeLabel, L2)`; test
/// the chord back to vertex 0.
fn case3(
    code: &DfsCode,
    projected: &Projected,
    arena: &ProjectionArena,
    db: &dyn GraphSource,
    min_sup: usize,
) -> bool {
    let path_edges = code.rightmost_path_edges();
    if path_edges.len() < 2 {
        return false;
    }
    let last = path_edges[path_edges.len() - 1];
    let prev = path_edges[path_edges.len() - 2];
    if (last.le, last.l2) != (prev.le, prev.l2) {
        return false;
    }
    let rm = code.rightmost();
    let mut gids = HashSet::new();
    for &tail in &projected.entries {
        let gid = arena.node(tail).eid.gid;
        let g = db.graph(gid);
        let iso = decode_iso(code, arena, tail, db);
        let rm_gv = iso[rm as usize];
        let v0_gv = iso[0];
        if rm_gv != v0_gv && g.is_neighbor(rm_gv, v0_gv) && !code.contains_edge(rm, 0) {
            gids.insert(gid);
        }
    }
    gids.len() >= min_sup
}

/// Shared alternate-physical-edge search used by Cases 4 and 5: for each
/// forward rightmost-path edge `(u, w)` strictly after position `pos_b`,
/// look for an unused alternate neighbor of `iso[u]` carrying the same
/// labels as `w` that would realize the same rightmost-path edge
/// differently, "breaking" this occurrence.
fn alternate_edge_breaks(
    code: &DfsCode,
    projected: &Projected,
    arena: &ProjectionArena,
    db: &dyn GraphSource,
    min_sup: usize,
    path: &[CodeVertex],
    pos_b: usize,
) -> bool {
    let mut gids = HashSet::new();
    for &tail in &projected.entries {
        let gid = arena.node(tail).eid.gid;
        let g = db.graph(gid);
        let iso = decode_iso(code, arena, tail, db);
        if iso.iter().any(|&x| x == VertexId::MAX) {
            continue;
        }
        let used: HashSet<VertexId> = iso.iter().copied().collect();
        let mut broke = false;
        for w_idx in (pos_b + 1)..path.len() {
            let u = path[w_idx - 1];
            let w = path[w_idx];
            let u_gv = iso[u as usize];
            let w_gv = iso[w as usize];
            let edge_label = g.edge_label(u_gv, w_gv);
            let w_label = g.label(w_gv);
            for &(nbr, _edge_index) in g.neighbors(u_gv) {
                if nbr != w_gv
                    && !used.contains(&nbr)
                    && g.label(nbr) == w_label
                    && g.edge_label(u_gv, nbr) == edge_label
                {
                    broke = true;
                    break;
                }
            }
            if broke {
                break;
            }
        }
        if broke {
            gids.insert(gid);
        }
    }
    gids.len() >= min_sup
}

/// Case 4: last step backward. Build the opposite-direction
/// rightmost path anchored at the backward edge's target and search for an
/// alternate realization of each forward edge it could break.
fn case4(
    code: &DfsCode,
    projected: &Projected,
    arena: &ProjectionArena,
    db: &dyn GraphSource,
    min_sup: usize,
) -> bool {
    if code.is_empty() || !code.last_is_backward() {
        return false;
    }
    let last = *code.edges.last().unwrap();
    let b = last.v2;
    let path = code.rightmost_path();
    let Some(pos_b) = path.iter().position(|&v| v == b) else {
        return false;
    };
    alternate_edge_breaks(code, projected, arena, db, min_sup, &path, pos_b)
}

/// Case 5: generalization of Case 4 over every prefix of `code`
/// whose final step is backward, gated by a label-structure agreement
/// check between the full code's last rightmost-path edge and the prefix's
/// edge immediately before the loop point.
fn case5(
    code: &DfsCode,
    projected: &Projected,
    arena: &ProjectionArena,
    db: &dyn GraphSource,
    min_sup: usize,
) -> bool {
    let full_path_edges = code.rightmost_path_edges();
    let Some(&full_last) = full_path_edges.last() else {
        return false;
    };

    for k in 1..code.len() {
        if !code.edges[k - 1].is_backward() {
            continue;
        }
        let prefix = code.prefix(k);
        let last_of_prefix = prefix.edges[k - 1];
        let b = last_of_prefix.v2;
        let path = prefix.rightmost_path();
        let Some(pos_b) = path.iter().position(|&v| v == b) else {
            continue;
        };
        if pos_b == 0 {
            continue;
        }
        let before_loop_u = path[pos_b - 1];
        let Some(before_loop_edge) = prefix
            .edges
            .iter()
            .find(|e| e.is_forward() && e.v1 == before_loop_u && e.v2 == b)
        else {
            continue;
        };
        if (full_last.le, full_last.l2) != (before_loop_edge.le, before_loop_edge.l2) {
            continue;
        }

        let skip = code.len() - k;
        let prefix_tails = dedup_prefix_tails(arena, projected, skip);
        let prefix_projected = Projected::from_entries(prefix_tails);
        if alternate_edge_breaks(&prefix, &prefix_projected, arena, db, min_sup, &path, pos_b) {
            return true;
        }
    }
    false
}
