use std::path::PathBuf;

use thiserror::Error;

use crate::dcel::VertexId;

pub type Result<T> = std::result::Result<T, Error>;

/// Why a text file could not be turned into vertices and edges.
/// Line numbers are 1-based.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: expected {expected}, file ends here")]
    Truncated { line: usize, expected: &'static str },
    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount { line: usize, expected: usize, found: usize },
    #[error("line {line}: {token:?} is not a valid {kind}")]
    Number { line: usize, token: String, kind: &'static str },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot open {path}: {source}")]
    Open { path: PathBuf, source: std::io::Error },
    #[error("{path}: {source}")]
    Parse { path: PathBuf, source: ParseError },
    #[error("nothing to plot, the vertex list is empty")]
    EmptyVertexSet,
    #[error("cannot allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },
    #[error("png encoding failed: {0}")]
    Encode(String),
    #[error("cannot write {path}: {source}")]
    Write { path: PathBuf, source: std::io::Error },
    #[error("bad config {path}: {source}")]
    Config { path: PathBuf, source: serde_json::Error },
    #[error("a polygon needs at least 3 vertices, got {0}")]
    DegeneratePolygon(usize),
    #[error("no face contains both {0} and {1}")]
    MissingFace(VertexId, VertexId),
    #[error("split made no progress on {0} remaining vertices")]
    SplitStalled(usize),
}
