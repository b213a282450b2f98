//! Shared calculator state.
//!
//! [`CalculatorState`] holds the operand and operator buffers together with
//! the one-shot [`GateState`]. All of it sits behind a single mutex, so
//! concurrent writers to different fields and a concurrent result read are
//! fully serialized. Every critical section is short and bounded by the
//! buffer capacities.
//!
//! # Read path
//!
//! ```text
//! Armed: parse A, parse B ─► resolve operator ─► apply ─► render ─► fire gate ─► deliver prefix
//!           │                     │                 │
//!           └── MalformedOperand  └── UnknownOperator └── ArithmeticOverflow
//!                (gate stays Armed, no output)
//! Spent: no output, no mutation
//! ```
//!
//! # Examples
//!
//! ```
//! use calcdev_core::Field;
//! use calcdev_engine::{CalculatorState, ReadStatus};
//!
//! let state = CalculatorState::new();
//! state.write_field(Field::OperandA, b"7", 1);
//! state.write_field(Field::OperandB, b"2", 1);
//! state.write_field(Field::Operator, b"/", 1);
//!
//! let outcome = state.read_result(64);
//! assert_eq!(outcome.bytes, b"3\n");
//!
//! let again = state.read_result(64);
//! assert!(again.bytes.is_empty());
//! assert_eq!(again.status, ReadStatus::AlreadySpent);
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError};

use calcdev_core::{CalcError, Field, OperandBuffer, OperandPolicy, OperatorBuffer};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::gate::GateState;
use crate::operator::{Computation, Operator};
use crate::parser::parse_operand;

/// Result of a write to a state field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteReport {
    /// Bytes consumed from the caller's data.
    pub consumed: usize,

    pub status: WriteStatus,
}

impl WriteReport {
    /// Report for a write to an endpoint that accepts no writes.
    #[must_use]
    pub fn unsupported() -> Self {
        Self {
            consumed: 0,
            status: WriteStatus::Unsupported,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    /// Everything requested was stored.
    Stored,

    /// The request exceeded the field capacity; only a prefix was stored.
    Truncated { requested: usize },

    /// The endpoint does not accept writes; nothing changed.
    Unsupported,
}

/// Result of a read from an endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOutcome {
    /// Bytes delivered to the caller (possibly empty).
    pub bytes: Vec<u8>,

    pub status: ReadStatus,
}

impl ReadOutcome {
    fn empty(status: ReadStatus) -> Self {
        Self {
            bytes: Vec::new(),
            status,
        }
    }

    /// Outcome of a read from an endpoint that produces no output.
    #[must_use]
    pub fn unsupported() -> Self {
        Self::empty(ReadStatus::Unsupported)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Status reported next to the bytes of a read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadStatus {
    /// A result was computed and delivered; the gate is now spent.
    Delivered {
        computation: Computation,
        /// The caller's buffer was smaller than the formatted result.
        truncated: bool,
    },

    /// The gate already fired this session.
    AlreadySpent,

    /// The computation was refused; the gate stays armed.
    Rejected(CalcError),

    /// The endpoint does not produce output.
    Unsupported,
}

/// Point-in-time view of the state, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateSnapshot {
    pub first: String,
    pub second: String,
    pub sign: String,
    pub gate: GateState,
}

#[derive(Debug, Default)]
struct Inner {
    operand_a: OperandBuffer,
    operand_b: OperandBuffer,
    operator: OperatorBuffer,
    gate: GateState,
}

impl Inner {
    fn compute(&self, policy: OperandPolicy) -> Result<Computation, CalcError> {
        let lhs = parse_field(&self.operand_a, Field::OperandA, policy)?;
        let rhs = parse_field(&self.operand_b, Field::OperandB, policy)?;
        let operator = Operator::resolve(self.operator.as_bytes())?;
        operator.apply(lhs, rhs)
    }
}

fn parse_field(
    buffer: &OperandBuffer,
    field: Field,
    policy: OperandPolicy,
) -> Result<i64, CalcError> {
    match (parse_operand(buffer.as_bytes()), policy) {
        (Ok(value), _) => Ok(value),
        (Err(reason), OperandPolicy::ZeroFallback) => {
            warn!(
                field = %field,
                text = %buffer.to_text(),
                %reason,
                "Operand not converted, substituting 0"
            );
            Ok(0)
        }
        (Err(reason), OperandPolicy::Strict) => Err(CalcError::MalformedOperand { field, reason }),
    }
}

/// Calculator state shared by all endpoints.
#[derive(Debug, Default)]
pub struct CalculatorState {
    inner: Mutex<Inner>,
    policy: OperandPolicy,
}

impl CalculatorState {
    /// Create an empty, armed state with the strict operand policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty, armed state with the given operand policy.
    #[must_use]
    pub fn with_policy(policy: OperandPolicy) -> Self {
        Self {
            inner: Mutex::default(),
            policy,
        }
    }

    #[must_use]
    pub fn policy(&self) -> OperandPolicy {
        self.policy
    }

    // A panic while holding the lock cannot leave a buffer half-written
    // (stores are clear + memcpy), so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace a field with the first `requested_len` bytes of `data`.
    ///
    /// The field is zero-filled first. Bytes beyond the field capacity are
    /// dropped and the report says so. Never fails and never touches other
    /// fields or the gate.
    pub fn write_field(&self, field: Field, data: &[u8], requested_len: usize) -> WriteReport {
        let copy = {
            let mut inner = self.lock();
            match field {
                Field::OperandA => inner.operand_a.store(data, requested_len),
                Field::OperandB => inner.operand_b.store(data, requested_len),
                Field::Operator => inner.operator.store(data, requested_len),
            }
        };

        if copy.truncated() {
            warn!(
                field = %field,
                requested = copy.requested,
                stored = copy.stored,
                "Write truncated to field capacity"
            );
            WriteReport {
                consumed: copy.stored,
                status: WriteStatus::Truncated {
                    requested: copy.requested,
                },
            }
        } else {
            debug!(field = %field, received = copy.stored, "Field updated");
            WriteReport {
                consumed: copy.stored,
                status: WriteStatus::Stored,
            }
        }
    }

    /// Run the result read path, delivering at most `requested_len` bytes.
    ///
    /// While armed, a successful computation fires the gate even if the
    /// caller's buffer only takes a prefix. Rejected computations leave the
    /// gate armed so the inputs can be corrected. While spent, nothing is
    /// computed or mutated.
    pub fn read_result(&self, requested_len: usize) -> ReadOutcome {
        let mut inner = self.lock();
        if inner.gate.is_spent() {
            debug!("Result already emitted this session");
            return ReadOutcome::empty(ReadStatus::AlreadySpent);
        }

        let computation = match inner.compute(self.policy) {
            Ok(computation) => computation,
            Err(error) => {
                warn!(kind = error.kind(), %error, "Result not computed");
                return ReadOutcome::empty(ReadStatus::Rejected(error));
            }
        };

        let mut bytes = computation.render();
        inner.gate.fire();
        drop(inner);

        let truncated = bytes.len() > requested_len;
        bytes.truncate(requested_len);
        info!(sent = bytes.len(), %computation, truncated, "Result sent");

        ReadOutcome {
            bytes,
            status: ReadStatus::Delivered {
                computation,
                truncated,
            },
        }
    }

    /// Clear every field and re-arm the gate.
    pub fn reset(&self) {
        let mut inner = self.lock();
        *inner = Inner::default();
        info!("Calculator state reset");
    }

    #[must_use]
    pub fn gate(&self) -> GateState {
        self.lock().gate
    }

    #[must_use]
    pub fn snapshot(&self) -> StateSnapshot {
        let inner = self.lock();
        StateSnapshot {
            first: inner.operand_a.to_text().into_owned(),
            second: inner.operand_b.to_text().into_owned(),
            sign: inner.operator.to_text().into_owned(),
            gate: inner.gate,
        }
    }
}
