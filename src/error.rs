//! Error taxonomy for the mining pipeline (parse / precondition / I/O).

use std::fmt;

/// A 1-indexed line/offset location in an input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    /// Line number, 1-indexed.
    pub line: usize,
    /// Byte offset from the start of the file.
    pub offset: usize,
}

impl Location {
    pub fn new(line: usize, offset: usize) -> Self {
        Self { line, offset }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} (offset {})", self.line, self.offset)
    }
}

/// Malformed input: unknown token, duplicate vertex/edge, forward reference, etc.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("{location}: unrecognized line: {line:?}")]
    UnknownLine { location: Location, line: String },

    #[error("{location}: malformed {field} in {kind} line")]
    MalformedField {
        location: Location,
        kind: &'static str,
        field: &'static str,
    },

    #[error("{location}: duplicate vertex id {id}")]
    DuplicateVertex { location: Location, id: u32 },

    #[error("{location}: duplicate edge ({v1}, {v2})")]
    DuplicateEdge { location: Location, v1: u32, v2: u32 },

    #[error("{location}: edge references unknown vertex {id}")]
    ForwardReference { location: Location, id: u32 },

    #[error("{location}: edge endpoints are identical ({id})")]
    SelfLoop { location: Location, id: u32 },

    #[error("input ended before a transaction graph header (`t # <gid>`) was seen")]
    MissingHeader,
}

/// Out-of-range parameter, checked before any mining work begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PreconditionError {
    #[error("minSupport must be in (0, 1], got {0}")]
    InvalidMinSupport(OrderedF64),

    #[error("maxEdges must be >= 0, got {0}")]
    NegativeMaxEdges(i64),
}

/// Wrapper so `f64` (not `Eq`) can sit in a `thiserror` display without pulling in a dependency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderedF64(pub f64);

impl Eq for OrderedF64 {}

impl fmt::Display for OrderedF64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Top-level error type returned by every fallible public entry point.
#[derive(Debug, thiserror::Error)]
pub enum MinerError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
