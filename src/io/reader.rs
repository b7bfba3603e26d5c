//! Parses the `t`/`v`/`e` transaction-graph format.

use std::collections::{HashMap, HashSet};
use std::io::BufRead;

use crate::error::{Location, MinerError, ParseError};
use crate::graph::{GraphDatabase, GraphId, Label, TransactionGraph, VertexId};

struct Building {
    gid: GraphId,
    vertex_labels: Vec<Label>,
    /// Vertex ids are opaque (spec §3): this maps a file's raw `<id>` to the
    /// dense [`VertexId`] it was assigned on first sighting, so a
    /// non-contiguous numbering (e.g. `v 10 5`) never fabricates phantom
    /// vertices for the ids it skips.
    id_map: HashMap<u32, VertexId>,
    edges: Vec<(VertexId, VertexId, Label)>,
    seen_edges: HashSet<(VertexId, VertexId)>,
}

impl Building {
    fn finish(self) -> TransactionGraph {
        TransactionGraph::new(self.vertex_labels, self.edges, self.gid)
    }
}

/// Parse a full transaction graph database from `reader`.
///
/// Format, one record per transaction graph:
/// ```text
/// t # <gid>
/// v <id> <label>
/// ...
/// e <v1> <v2> <label>
/// ...
/// ```
/// Records may be separated by blank lines, which are otherwise ignored.
pub fn read_graphs<R: BufRead>(reader: R) -> Result<GraphDatabase, MinerError> {
    let mut graphs = Vec::new();
    let mut current: Option<Building> = None;
    let mut offset = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let loc = Location::new(line_no, offset);
        offset += line.len() + 1;

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let tokens: Vec<&str> = trimmed.split_whitespace().collect();

        match tokens.as_slice() {
            ["t", "#", gid_str] => {
                if let Some(building) = current.take() {
                    graphs.push(building.finish());
                }
                let gid: u32 = gid_str.parse().map_err(|_| ParseError::MalformedField {
                    location: loc,
                    kind: "header",
                    field: "gid",
                })?;
                current = Some(Building {
                    gid: GraphId(gid),
                    vertex_labels: Vec::new(),
                    id_map: HashMap::new(),
                    edges: Vec::new(),
                    seen_edges: HashSet::new(),
                });
            }
            ["v", id_str, label_str] => {
                let building = current.as_mut().ok_or(ParseError::MissingHeader)?;
                let id: u32 = id_str.parse().map_err(|_| ParseError::MalformedField {
                    location: loc,
                    kind: "vertex",
                    field: "id",
                })?;
                let label: Label = label_str.parse().map_err(|_| ParseError::MalformedField {
                    location: loc,
                    kind: "vertex",
                    field: "label",
                })?;
                if building.id_map.contains_key(&id) {
                    return Err(ParseError::DuplicateVertex { location: loc, id }.into());
                }
                let dense = building.vertex_labels.len() as VertexId;
                building.vertex_labels.push(label);
                building.id_map.insert(id, dense);
            }
            ["e", v1_str, v2_str, label_str] => {
                let building = current.as_mut().ok_or(ParseError::MissingHeader)?;
                let v1_raw: u32 = v1_str.parse().map_err(|_| ParseError::MalformedField {
                    location: loc,
                    kind: "edge",
                    field: "v1",
                })?;
                let v2_raw: u32 = v2_str.parse().map_err(|_| ParseError::MalformedField {
                    location: loc,
                    kind: "edge",
                    field: "v2",
                })?;
                let label: Label = label_str.parse().map_err(|_| ParseError::MalformedField {
                    location: loc,
                    kind: "edge",
                    field: "label",
                })?;
                if v1_raw == v2_raw {
                    return Err(ParseError::SelfLoop {
                        location: loc,
                        id: v1_raw,
                    }
                    .into());
                }
                let v1 = *building
                    .id_map
                    .get(&v1_raw)
                    .ok_or(ParseError::ForwardReference {
                        location: loc,
                        id: v1_raw,
                    })?;
                let v2 = *building
                    .id_map
                    .get(&v2_raw)
                    .ok_or(ParseError::ForwardReference {
                        location: loc,
                        id: v2_raw,
                    })?;
                let key = if v1 <= v2 { (v1, v2) } else { (v2, v1) };
                if !building.seen_edges.insert(key) {
                    return Err(ParseError::DuplicateEdge {
                        location: loc,
                        v1: v1_raw,
                        v2: v2_raw,
                    }
                    .into());
                }
                building.edges.push((v1, v2, label));
            }
            _ => {
                return Err(ParseError::UnknownLine {
                    location: loc,
                    line: trimmed.to_string(),
                }
                .into());
            }
        }
    }

    if let Some(building) = current.take() {
        graphs.push(building.finish());
    }

    Ok(GraphDatabase::new(graphs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(s: &str) -> Result<GraphDatabase, MinerError> {
        read_graphs(Cursor::new(s.as_bytes()))
    }

    #[test]
    fn parses_two_transaction_graphs() {
        let db = parse(
            "t # 0\nv 0 1\nv 1 1\nv 2 2\ne 0 1 5\ne 1 2 5\nt # 1\nv 0 1\nv 1 1\ne 0 1 5\n",
        )
        .unwrap();
        assert_eq!(db.len(), 2);
        assert_eq!(db.graph(GraphId(0)).num_vertices(), 3);
        assert_eq!(db.graph(GraphId(0)).num_edges(), 2);
        assert_eq!(db.graph(GraphId(1)).num_edges(), 1);
    }

    #[test]
    fn remaps_non_contiguous_vertex_ids_densely() {
        // Vertex ids 10 and 20 must not fabricate 19 phantom label-0
        // vertices in between: ids are opaque (spec §3), not array indices.
        let db = parse("t # 0\nv 10 5\nv 20 6\ne 10 20 1\n").unwrap();
        let g = db.graph(GraphId(0));
        assert_eq!(g.num_vertices(), 2);
        assert_eq!(g.num_edges(), 1);
        assert!(g.is_neighbor(0, 1));
    }

    #[test]
    fn rejects_self_loop() {
        let err = parse("t # 0\nv 0 1\ne 0 0 5\n").unwrap_err();
        assert!(matches!(err, MinerError::Parse(ParseError::SelfLoop { .. })));
    }

    #[test]
    fn rejects_forward_reference() {
        let err = parse("t # 0\nv 0 1\ne 0 1 5\n").unwrap_err();
        assert!(matches!(
            err,
            MinerError::Parse(ParseError::ForwardReference { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_vertex() {
        let err = parse("t # 0\nv 0 1\nv 0 2\n").unwrap_err();
        assert!(matches!(
            err,
            MinerError::Parse(ParseError::DuplicateVertex { .. })
        ));
    }

    #[test]
    fn rejects_edge_before_header() {
        let err = parse("v 0 1\n").unwrap_err();
        assert!(matches!(err, MinerError::Parse(ParseError::MissingHeader)));
    }

    #[test]
    fn rejects_unknown_line() {
        let err = parse("t # 0\nv 0 1\nq nonsense\n").unwrap_err();
        assert!(matches!(err, MinerError::Parse(ParseError::UnknownLine { .. })));
    }

    #[test]
    fn empty_input_yields_empty_database() {
        let db = parse("").unwrap();
        assert!(db.is_empty());
    }
}
