//! One-shot result gate.
//!
//! The gate permits exactly one successful result computation per session:
//!
//! ```text
//!          fire()             reset()
//! Armed ───────────► Spent ───────────► Armed
//! ```
//!
//! A session is the lifetime of the calculator state between resets, not
//! the lifetime of an open endpoint. Writes to operand or operator
//! endpoints never re-arm the gate.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    /// No result emitted yet; the next successful read computes.
    #[default]
    Armed,

    /// A result was emitted; reads yield nothing until reset.
    Spent,
}

impl GateState {
    #[inline]
    #[must_use]
    pub fn is_armed(self) -> bool {
        matches!(self, GateState::Armed)
    }

    #[inline]
    #[must_use]
    pub fn is_spent(self) -> bool {
        matches!(self, GateState::Spent)
    }

    /// Transition Armed → Spent.
    ///
    /// Returns `true` if this call fired the gate, `false` if it was already
    /// spent.
    pub fn fire(&mut self) -> bool {
        let fired = self.is_armed();
        *self = GateState::Spent;
        fired
    }

    /// Re-arm the gate, starting a new session.
    pub fn reset(&mut self) {
        *self = GateState::Armed;
    }
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateState::Armed => write!(f, "Armed"),
            GateState::Spent => write!(f, "Spent"),
        }
    }
}
