//! Sparse triangular label-pair pruning matrix: counts graph support per
//! vertex-label pair and per edge label, so infrequent edges can be dropped
//! before mining starts.

use std::collections::HashMap;

use crate::graph::{GraphDatabase, GraphId, Label};

/// Symmetric `(label1, label2) -> count` map, stored under the canonical
/// `(min, max)` key, plus per-edge-label counts. Built once from the
/// vertex-label-pruned database, before edges are dropped.
#[derive(Debug, Default)]
pub struct PruningMatrix {
    pair_support: HashMap<(Label, Label), HashMap<GraphId, ()>>,
    edge_label_support: HashMap<Label, HashMap<GraphId, ()>>,
}

fn canonical_pair(a: Label, b: Label) -> (Label, Label) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl PruningMatrix {
    /// Count, per `(label1, label2)` pair and per edge label, the set of
    /// transaction graphs in which that pair/label appears at least once.
    pub fn build(db: &GraphDatabase) -> Self {
        let mut pair_support: HashMap<(Label, Label), HashMap<GraphId, ()>> = HashMap::new();
        let mut edge_label_support: HashMap<Label, HashMap<GraphId, ()>> = HashMap::new();
        for g in db.iter() {
            for (_idx, v1, v2, le) in g.edges_iter() {
                let key = canonical_pair(g.label(v1), g.label(v2));
                pair_support.entry(key).or_default().insert(g.gid(), ());
                edge_label_support.entry(le).or_default().insert(g.gid(), ());
            }
        }
        PruningMatrix {
            pair_support,
            edge_label_support,
        }
    }

    pub fn pair_support_count(&self, a: Label, b: Label) -> usize {
        self.pair_support
            .get(&canonical_pair(a, b))
            .map(HashMap::len)
            .unwrap_or(0)
    }

    pub fn edge_label_support_count(&self, le: Label) -> usize {
        self.edge_label_support.get(&le).map(HashMap::len).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::TransactionGraph;

    #[test]
    fn counts_support_per_label_pair() {
        let g1 = TransactionGraph::new(vec![0, 1], vec![(0, 1, 5)], GraphId(0));
        let g2 = TransactionGraph::new(vec![1, 0], vec![(0, 1, 5)], GraphId(1));
        let g3 = TransactionGraph::new(vec![2, 2], vec![(0, 1, 5)], GraphId(2));
        let db = GraphDatabase::new(vec![g1, g2, g3]);
        let matrix = PruningMatrix::build(&db);
        assert_eq!(matrix.pair_support_count(0, 1), 2);
        assert_eq!(matrix.pair_support_count(1, 0), 2);
        assert_eq!(matrix.pair_support_count(2, 2), 1);
        assert_eq!(matrix.edge_label_support_count(5), 3);
    }
}
