//! DFS codes: the canonical linear encoding of a connected subgraph.

use crate::graph::Label;

/// A vertex id local to a DFS code (0-based, assigned in discovery order).
pub type CodeVertex = u32;

/// One step of a DFS code: `(v1, v2, L1, L2, Le)`.
///
/// `v1 < v2` is a *forward* step (discovers `v2`); `v1 > v2` is a *backward*
/// step (closes a cycle onto an already-numbered vertex). Equality is over
/// all five fields; ordering follows the tuple `(isBackward, v2, v1, L1, Le, L2)`,
/// with backward steps sorting before forward steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExtendedEdge {
    pub v1: CodeVertex,
    pub v2: CodeVertex,
    pub l1: Label,
    pub l2: Label,
    pub le: Label,
}

impl ExtendedEdge {
    pub fn is_backward(&self) -> bool {
        self.v1 > self.v2
    }

    pub fn is_forward(&self) -> bool {
        self.v1 < self.v2
    }

    fn sort_key(&self) -> (u8, CodeVertex, CodeVertex, Label, Label, Label) {
        let phase = if self.is_backward() { 0 } else { 1 };
        (phase, self.v2, self.v1, self.l1, self.le, self.l2)
    }
}

impl PartialOrd for ExtendedEdge {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ExtendedEdge {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

/// An ordered sequence of [`ExtendedEdge`]s defining a canonical spanning
/// traversal of a connected subgraph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DfsCode {
    pub edges: Vec<ExtendedEdge>,
}

impl DfsCode {
    pub fn new() -> Self {
        Self { edges: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn push(&self, ee: ExtendedEdge) -> DfsCode {
        let mut edges = self.edges.clone();
        edges.push(ee);
        DfsCode { edges }
    }

    /// An independent copy with the same steps.
    pub fn copy(&self) -> DfsCode {
        self.clone()
    }

    /// The highest-numbered code vertex.
    pub fn rightmost(&self) -> CodeVertex {
        self.edges
            .iter()
            .map(|e| e.v1.max(e.v2))
            .max()
            .unwrap_or(0)
    }

    /// Number of distinct vertices referenced by the code (`rightmost() + 1`
    /// for any non-empty code).
    pub fn num_vertices(&self) -> usize {
        if self.edges.is_empty() {
            0
        } else {
            self.rightmost() as usize + 1
        }
    }

    /// Indices (into `self.edges`) of the forward edges forming the
    /// rightmost path, ordered from the edge entering vertex 0's side
    /// (deepest/last in the code) to the edge ending at `rightmost()`...
    /// actually returned in *root-to-leaf* order for caller convenience,
    /// mirroring `rightmost_path()`.
    fn rightmost_path_edge_indices(&self) -> Vec<usize> {
        let mut rmpath = Vec::new();
        let mut old_v: Option<CodeVertex> = None;
        for i in (0..self.edges.len()).rev() {
            let e = &self.edges[i];
            if e.is_forward() && (rmpath.is_empty() || old_v == Some(e.v2)) {
                rmpath.push(i);
                old_v = Some(e.v1);
            }
        }
        rmpath.reverse();
        rmpath
    }

    /// The unique path from vertex 0 to `rightmost()` along forward edges,
    /// as a vertex list ascending from 0.
    pub fn rightmost_path(&self) -> Vec<CodeVertex> {
        let rmpath = self.rightmost_path_edge_indices();
        if rmpath.is_empty() {
            return if self.edges.is_empty() { vec![] } else { vec![0] };
        }
        let mut verts: Vec<CodeVertex> = rmpath.iter().map(|&i| self.edges[i].v1).collect();
        verts.push(self.edges[*rmpath.last().unwrap()].v2);
        verts
    }

    /// The forward edges along the rightmost path, root-to-leaf.
    pub fn rightmost_path_edges(&self) -> Vec<&ExtendedEdge> {
        self.rightmost_path_edge_indices()
            .into_iter()
            .map(|i| &self.edges[i])
            .collect()
    }

    pub fn on_right_most_path(&self, v: CodeVertex) -> bool {
        self.rightmost_path().contains(&v)
    }

    /// `v` is not the immediate predecessor of `rightmost()` on the
    /// rightmost path (the vertex whose forward edge directly introduced
    /// `rightmost()`).
    pub fn not_pre_of_rm(&self, v: CodeVertex) -> bool {
        let path = self.rightmost_path();
        if path.len() < 2 {
            return true;
        }
        v != path[path.len() - 2]
    }

    /// Whether the code already contains an (undirected) edge between `u`
    /// and `v`.
    pub fn contains_edge(&self, u: CodeVertex, v: CodeVertex) -> bool {
        self.edges
            .iter()
            .any(|e| (e.v1 == u && e.v2 == v) || (e.v1 == v && e.v2 == u))
    }

    pub fn last_is_forward(&self) -> bool {
        self.edges.last().map(|e| e.is_forward()).unwrap_or(false)
    }

    pub fn last_is_backward(&self) -> bool {
        self.edges.last().map(|e| e.is_backward()).unwrap_or(false)
    }

    /// The first `k` steps, as an independent code.
    pub fn prefix(&self, k: usize) -> DfsCode {
        DfsCode {
            edges: self.edges[..k].to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ee(v1: u32, v2: u32, l1: i32, l2: i32, le: i32) -> ExtendedEdge {
        ExtendedEdge { v1, v2, l1, l2, le }
    }

    #[test]
    fn backward_sorts_before_forward() {
        let backward = ee(1, 0, 0, 0, 0);
        let forward = ee(0, 2, 0, 0, 0);
        assert!(backward < forward);
    }

    #[test]
    fn rightmost_path_straight_line() {
        // 0-1-2-3 path, all forward.
        let code = DfsCode {
            edges: vec![ee(0, 1, 0, 0, 0), ee(1, 2, 0, 0, 0), ee(2, 3, 0, 0, 0)],
        };
        assert_eq!(code.rightmost(), 3);
        assert_eq!(code.rightmost_path(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn rightmost_path_with_branch_and_backward() {
        // 0-1-2 forward, 1-3 forward (branch off 1), 3-0 backward.
        let code = DfsCode {
            edges: vec![
                ee(0, 1, 0, 0, 0),
                ee(1, 2, 0, 0, 0),
                ee(1, 3, 0, 0, 0),
                ee(3, 0, 0, 0, 0),
            ],
        };
        assert_eq!(code.rightmost(), 3);
        assert_eq!(code.rightmost_path(), vec![0, 1, 3]);
        assert!(code.on_right_most_path(1));
        assert!(!code.on_right_most_path(2));
        assert!(code.contains_edge(3, 0));
        assert!(code.contains_edge(0, 3));
    }

    #[test]
    fn not_pre_of_rm_excludes_direct_parent() {
        let code = DfsCode {
            edges: vec![ee(0, 1, 0, 0, 0), ee(1, 2, 0, 0, 0)],
        };
        assert!(!code.not_pre_of_rm(1));
        assert!(code.not_pre_of_rm(0));
    }
}
