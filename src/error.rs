//! Errors for input that crosses the process boundary.
//!
//! Engine invariant violations are panics; only move text and stored
//! transcripts, which come from outside, are reported as values.

use thiserror::Error;

use crate::moves::OpCode;

/// Malformed move text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("empty move text")]
    Empty,

    #[error("invalid player token {0:?} (expected P<n>)")]
    BadPlayer(String),

    #[error("missing operation after player token")]
    MissingOp,

    #[error("unknown operation {0:?}")]
    UnknownOp(String),

    #[error("invalid operand {0:?} (expected a1-style coordinate or #<pool>)")]
    BadOperand(String),

    #[error("{op} takes {expected} operand(s), found {found}")]
    OperandCount {
        op: OpCode,
        expected: usize,
        found: usize,
    },
}

/// Failure to reproduce a recorded game.
#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("transcript is for variant {found:?}, rules are {expected:?}")]
    VariantMismatch { expected: String, found: String },

    #[error("transcript header missing or malformed: {0}")]
    BadHeader(String),

    #[error("move {index}: {source}")]
    BadMove {
        index: usize,
        source: MoveParseError,
    },

    #[error("move {index}: {mv} is not playable here")]
    IllegalMove { index: usize, mv: String },

    #[error("final digest {actual:#018x} does not match recorded {expected:#018x}")]
    DigestMismatch { expected: u64, actual: u64 },

    #[error("binary transcript error: {0}")]
    Encoding(#[from] bincode::Error),
}

/// Result type alias for replay operations
pub type ReplayResult<T> = Result<T, ReplayError>;
