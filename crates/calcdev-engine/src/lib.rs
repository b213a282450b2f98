//! Arithmetic engine for the four-endpoint calculator.
//!
//! Clients write operand text to `first` and `second`, an operator to
//! `sign`, and read the computed value from `result`. This crate holds the
//! state behind those endpoints and the logic that turns it into a result:
//!
//! - [`parse_operand`]: base-10 operand parsing
//! - [`Operator`]: operator table and checked integer arithmetic
//! - [`GateState`]: the one-shot Armed/Spent result gate
//! - [`CalculatorState`]: shared buffers, write path and result read path
//! - [`EndpointRouter`]: endpoint-to-operation dispatch
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use calcdev_core::Endpoint;
//! use calcdev_engine::{CalculatorState, EndpointRouter, ReadStatus};
//!
//! let router = EndpointRouter::new(Arc::new(CalculatorState::new()));
//! router.write(Endpoint::First, b"9\n");
//! router.write(Endpoint::Second, b"0\n");
//! router.write(Endpoint::Sign, b"/\n");
//!
//! let outcome = router.read(Endpoint::Result, 64);
//! assert_eq!(outcome.bytes, b"Infinity\n");
//! assert!(matches!(outcome.status, ReadStatus::Delivered { .. }));
//! ```

pub mod gate;
pub mod operator;
pub mod parser;
pub mod router;
pub mod state;

pub use gate::GateState;
pub use operator::{Computation, Operator};
pub use parser::parse_operand;
pub use router::EndpointRouter;
pub use state::{CalculatorState, ReadOutcome, ReadStatus, StateSnapshot, WriteReport, WriteStatus};
