//! `closegraph`: closed frequent subgraph mining over labeled, undirected
//! graph transaction databases.
//!
//! The algorithm is CloseGraph, built on gSpan's canonical DFS-code
//! enumeration: candidate subgraphs are grown one edge at a time along a
//! rightmost-path extension scheme, each candidate is accepted only if its
//! code is the lexicographic minimum among all codes describing the same
//! abstract graph, and a subgraph is reported only if it is *closed* — no
//! single-edge extension of it is supported by exactly the same set of
//! transaction graphs.
//!
//! The mining driver ([`miner::mine`]) is the entry point most callers want;
//! [`io::read_graphs`] and [`io::write_patterns`] handle the on-disk
//! transaction-graph and pattern formats.

pub mod canonical;
pub mod closure;
pub mod config;
pub mod dfs_code;
pub mod dot;
pub mod error;
pub mod extension;
pub mod graph;
pub mod io;
pub mod miner;
pub mod projection;
pub mod pruning;

mod failure;

pub use closure::ClosedPattern;
pub use config::MiningParams;
pub use error::{MinerError, ParseError, PreconditionError};
pub use graph::{GraphDatabase, GraphId, GraphSource, TransactionGraph};
pub use miner::{mine, MiningReport, MiningStats};
