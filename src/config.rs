//! Mining parameters: plain data with explicit validation.
//!
//! Library callers build this directly; the CLI binary builds it from
//! `clap`-parsed arguments. Either way, validation happens once, up front,
//! and never inside the recursion.

use crate::error::{OrderedF64, PreconditionError};

/// Parameters controlling one mining run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MiningParams {
    /// Minimum support as a fraction of transactions, in `(0, 1]`.
    pub min_support: f64,
    /// Emit one closed pattern per frequent single-vertex label.
    pub output_single_vertices: bool,
    /// Upper bound on the number of edges in a reported pattern. `0` disables
    /// mining entirely (no output).
    pub max_edges: usize,
    /// Emit the `x <gid> ...` line for every pattern.
    pub output_graph_ids: bool,
}

impl MiningParams {
    /// Check that `min_support` is in range; does no other work.
    pub fn validate(&self) -> Result<(), PreconditionError> {
        if !(self.min_support > 0.0 && self.min_support <= 1.0) {
            return Err(PreconditionError::InvalidMinSupport(OrderedF64(
                self.min_support,
            )));
        }
        Ok(())
    }

    /// `minSup = ceil(minFreq * N)`, at least 1 once there is at least one
    /// transaction (an empty database is handled separately by the driver).
    pub fn min_sup(&self, num_transactions: usize) -> usize {
        let raw = (self.min_support * num_transactions as f64).ceil() as usize;
        raw.max(1)
    }
}

impl Default for MiningParams {
    fn default() -> Self {
        Self {
            min_support: 1.0,
            output_single_vertices: false,
            max_edges: usize::MAX,
            output_graph_ids: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_and_negative_support() {
        let mut p = MiningParams::default();
        p.min_support = 0.0;
        assert!(p.validate().is_err());
        p.min_support = -0.5;
        assert!(p.validate().is_err());
    }

    #[test]
    fn rejects_support_above_one() {
        let mut p = MiningParams::default();
        p.min_support = 1.5;
        assert!(p.validate().is_err());
    }

    #[test]
    fn accepts_boundary_support() {
        let mut p = MiningParams::default();
        p.min_support = 1.0;
        assert!(p.validate().is_ok());
    }

    #[test]
    fn min_sup_rounds_up() {
        let mut p = MiningParams::default();
        p.min_support = 0.5;
        assert_eq!(p.min_sup(3), 2);
        assert_eq!(p.min_sup(4), 2);
        assert_eq!(p.min_sup(5), 3);
    }
}
