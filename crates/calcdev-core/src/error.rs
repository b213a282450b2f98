use crate::types::Field;
use thiserror::Error;

/// Reason an operand buffer is not a valid base-10 integer.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    #[error("operand is empty")]
    Empty,

    #[error("operand has no digits")]
    NoDigits,

    #[error("invalid character {byte:#04x} at position {position}")]
    InvalidCharacter { position: usize, byte: u8 },

    #[error("operand does not fit in 64 bits")]
    OutOfRange,
}

/// Conditions that reject a result computation.
///
/// These never escape as failures of the read operation itself; they are
/// reported next to the (empty) output so callers can tell them apart
/// from "already computed".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalcError {
    #[error("Malformed {field}: {reason}")]
    MalformedOperand { field: Field, reason: ParseError },

    #[error("Unknown operator: {token:?}")]
    UnknownOperator { token: String },

    #[error("Arithmetic overflow: {lhs} {symbol} {rhs}")]
    ArithmeticOverflow { lhs: i64, symbol: char, rhs: i64 },
}

impl CalcError {
    /// Short machine-readable tag for the condition.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            CalcError::MalformedOperand { .. } => "malformed_operand",
            CalcError::UnknownOperator { .. } => "unknown_operator",
            CalcError::ArithmeticOverflow { .. } => "arithmetic_overflow",
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown endpoint: {0}")]
    UnknownEndpoint(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
