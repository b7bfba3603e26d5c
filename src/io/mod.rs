//! Line-oriented graph database I/O.

pub mod reader;
pub mod writer;

pub use reader::read_graphs;
pub use writer::write_patterns;
