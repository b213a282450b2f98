//! Operator table and integer arithmetic.

use calcdev_core::{
    CalcError,
    constants::{
        INFINITY_TEXT, MAX_RESULT_LEN, OP_ADD, OP_DIVIDE, OP_MULTIPLY, OP_SUBTRACT,
        RESULT_TERMINATOR,
    },
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary integer operation selected by the `sign` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// Resolve an operator token.
    ///
    /// Only the first byte is significant: `"+"`, `"+\n"` and `"+abc"` all
    /// resolve to [`Operator::Add`]. An empty token or any other first byte
    /// yields `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use calcdev_engine::Operator;
    ///
    /// assert_eq!(Operator::lookup(b"*\n"), Some(Operator::Multiply));
    /// assert_eq!(Operator::lookup(b"%"), None);
    /// assert_eq!(Operator::lookup(b""), None);
    /// ```
    #[must_use]
    pub fn lookup(token: &[u8]) -> Option<Self> {
        match token.first()? {
            &OP_ADD => Some(Operator::Add),
            &OP_SUBTRACT => Some(Operator::Subtract),
            &OP_MULTIPLY => Some(Operator::Multiply),
            &OP_DIVIDE => Some(Operator::Divide),
            _ => None,
        }
    }

    /// Resolve an operator token, reporting unknown tokens.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::UnknownOperator`] carrying the token text when
    /// [`lookup`](Self::lookup) finds no match.
    pub fn resolve(token: &[u8]) -> Result<Self, CalcError> {
        Self::lookup(token).ok_or_else(|| CalcError::UnknownOperator {
            token: String::from_utf8_lossy(token).into_owned(),
        })
    }

    #[must_use]
    pub fn symbol(self) -> char {
        let byte = match self {
            Operator::Add => OP_ADD,
            Operator::Subtract => OP_SUBTRACT,
            Operator::Multiply => OP_MULTIPLY,
            Operator::Divide => OP_DIVIDE,
        };
        char::from(byte)
    }

    /// Apply the operation to two operands.
    ///
    /// Division truncates toward zero. Dividing by zero is not an error and
    /// yields [`Computation::Infinity`].
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::ArithmeticOverflow`] if the result does not fit
    /// in an `i64` (including `i64::MIN / -1`).
    ///
    /// # Examples
    ///
    /// ```
    /// use calcdev_engine::{Computation, Operator};
    ///
    /// assert_eq!(Operator::Divide.apply(-7, 2), Ok(Computation::Value(-3)));
    /// assert_eq!(Operator::Divide.apply(5, 0), Ok(Computation::Infinity));
    /// ```
    pub fn apply(self, lhs: i64, rhs: i64) -> Result<Computation, CalcError> {
        let value = match self {
            Operator::Add => lhs.checked_add(rhs),
            Operator::Subtract => lhs.checked_sub(rhs),
            Operator::Multiply => lhs.checked_mul(rhs),
            Operator::Divide if rhs == 0 => return Ok(Computation::Infinity),
            Operator::Divide => lhs.checked_div(rhs),
        };

        value
            .map(Computation::Value)
            .ok_or(CalcError::ArithmeticOverflow {
                lhs,
                symbol: self.symbol(),
                rhs,
            })
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Outcome of a successful computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Computation {
    Value(i64),
    Infinity,
}

impl Computation {
    /// Wire text: decimal value (or `Infinity`) followed by a newline.
    #[must_use]
    pub fn render(&self) -> Vec<u8> {
        let mut text = Vec::with_capacity(MAX_RESULT_LEN);
        text.extend_from_slice(self.to_string().as_bytes());
        text.push(RESULT_TERMINATOR);
        text
    }
}

impl fmt::Display for Computation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Computation::Value(value) => write!(f, "{value}"),
            Computation::Infinity => f.write_str(INFINITY_TEXT),
        }
    }
}
