use bincode::error::{DecodeError, EncodeError};
use thiserror::Error;

/// Everything that can go wrong, from parsing a facelet string to running out
/// of time in the search.
///
/// Input and invariant errors are raised while decoding and validating a cube
/// definition. Resource errors are raised during table construction and are
/// fatal: without the tables no search can run. `Timeout` and `Unsolvable`
/// are ordinary outcomes of `solve` which the caller inspects.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid facelet string")]
    InvalidFacelet,
    #[error("there is not exactly one facelet of each color")]
    InvalidColorCount,
    #[error("corner colors do not match any corner cubie")]
    UnknownCorner,
    #[error("edge colors do not match any edge cubie")]
    UnknownEdge,
    #[error("twist error: one corner has to be twisted")]
    CornerOriSum,
    #[error("flip error: one edge has to be flipped")]
    EdgeOriSum,
    #[error("parity error: two corners or two edges have to be exchanged")]
    ParityMismatch,
    #[error("invalid scramble string")]
    InvalidScramble,
    #[error("no solution found within the given limits")]
    Timeout,
    #[error("cube state is not solvable")]
    Unsolvable,
    #[error("{table}: expected {expected} symmetry classes, found {found}")]
    ClassCountMismatch {
        table: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("cache io error: {0}")]
    CacheIo(#[from] std::io::Error),
    #[error("cache encode error: {0}")]
    CacheEncode(#[from] EncodeError),
    #[error("cache decode error: {0}")]
    CacheDecode(#[from] DecodeError),
}
