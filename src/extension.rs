//! Extension engine: given a code and its projected set, enumerate every
//! rightmost-path extension and group embeddings by the extended edge they
//! realize.

use std::collections::BTreeMap;

use crate::dfs_code::{DfsCode, ExtendedEdge};
use crate::graph::GraphSource;
use crate::projection::{decode_iso, invert_iso, Projected, ProjectionArena};

/// `EE -> Π'` for every rightmost-path extension, iterable in the §4.2
/// lexicographic order since `ExtendedEdge`'s `Ord` is the total order and
/// `BTreeMap` iterates sorted.
pub type ExtensionMap = BTreeMap<ExtendedEdge, Projected>;

/// Compute every rightmost-path extension of `code` given its current
/// projected set.
pub fn extensions(
    code: &DfsCode,
    projected: &Projected,
    db: &dyn GraphSource,
    arena: &mut ProjectionArena,
) -> ExtensionMap {
    let mut building: BTreeMap<ExtendedEdge, Vec<_>> = BTreeMap::new();

    if code.is_empty() {
        for &gid in db.graph_ids() {
            let g = db.graph(gid);
            for (edge_index, v1, v2, le) in g.edges_iter() {
                let l1 = g.label(v1);
                let l2 = g.label(v2);
                // Forward direction from the edge's stored v1.
                let ee = ExtendedEdge {
                    v1: 0,
                    v2: 1,
                    l1,
                    l2,
                    le,
                };
                let eid = g.edge_id(edge_index);
                let p = arena.push(eid, false, None);
                building.entry(ee).or_default().push(p);

                // The opposite role assignment, unless it would be an
                // identical key realized by the same physical edge twice
                // (symmetric label: emit only once, from `edge.v1`).
                if l1 != l2 {
                    let ee_rev = ExtendedEdge {
                        v1: 0,
                        v2: 1,
                        l1: l2,
                        l2: l1,
                        le,
                    };
                    let p_rev = arena.push(eid, true, None);
                    building.entry(ee_rev).or_default().push(p_rev);
                }
            }
        }
        return finish(building);
    }

    let rm = code.rightmost();
    let rm_path = code.rightmost_path();

    for &tail in &projected.entries {
        let gid = arena.node(tail).eid.gid;
        let g = db.graph(gid);
        if g.num_edges() <= code.len() {
            continue; // edge-count pruning
        }
        let iso = decode_iso(code, arena, tail, db);
        let inv = invert_iso(&iso);
        let rm_gv = iso[rm as usize];

        // Backward extensions: neighbor of rm already on the rightmost
        // path, not its direct predecessor, not already a code edge.
        for &(nbr, edge_index) in g.neighbors(rm_gv) {
            if let Some(&cv) = inv.get(&nbr) {
                if cv != rm
                    && rm_path.contains(&cv)
                    && code.not_pre_of_rm(cv)
                    && !code.contains_edge(rm, cv)
                {
                    let ee = ExtendedEdge {
                        v1: rm,
                        v2: cv,
                        l1: g.label(rm_gv),
                        l2: g.label(nbr),
                        le: g.edge_label(rm_gv, nbr),
                    };
                    let eid = g.edge_id(edge_index);
                    let (a, _b, _l) = g.edge_at(edge_index);
                    let reversed = a != rm_gv;
                    let p = arena.push(eid, reversed, Some(tail));
                    building.entry(ee).or_default().push(p);
                }
            }
        }

        // Forward extensions: neighbor of any rightmost-path vertex not
        // already mapped to a code vertex.
        for &v in &rm_path {
            let v_gv = iso[v as usize];
            for &(nbr, edge_index) in g.neighbors(v_gv) {
                if !inv.contains_key(&nbr) {
                    let ee = ExtendedEdge {
                        v1: v,
                        v2: rm + 1,
                        l1: g.label(v_gv),
                        l2: g.label(nbr),
                        le: g.edge_label(v_gv, nbr),
                    };
                    let eid = g.edge_id(edge_index);
                    let (a, _b, _l) = g.edge_at(edge_index);
                    let reversed = a != v_gv;
                    let p = arena.push(eid, reversed, Some(tail));
                    building.entry(ee).or_default().push(p);
                }
            }
        }
    }

    finish(building)
}

fn finish(building: BTreeMap<ExtendedEdge, Vec<crate::projection::ProjId>>) -> ExtensionMap {
    building
        .into_iter()
        .map(|(ee, entries)| (ee, Projected::from_entries(entries)))
        .collect()
}
