//! Endpoint dispatch.
//!
//! The [`EndpointRouter`] is the protocol surface of the calculator. It maps
//! each endpoint to the state operation it addresses:
//!
//! | Endpoint | Write | Read |
//! |----------|-------|------|
//! | `first`  | replace operand A | unsupported |
//! | `second` | replace operand B | unsupported |
//! | `sign`   | replace operator  | unsupported |
//! | `result` | unsupported       | result read path |
//!
//! Unsupported operations are no-ops that report zero bytes.

use std::sync::Arc;

use calcdev_core::Endpoint;
use tracing::{info, warn};

use crate::state::{CalculatorState, ReadOutcome, WriteReport};

/// Routes endpoint reads and writes into a shared [`CalculatorState`].
///
/// The router does not own the state exclusively; it is injected so that
/// several routers (or tests) can share or isolate state as needed.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use calcdev_core::Endpoint;
/// use calcdev_engine::{CalculatorState, EndpointRouter};
///
/// let router = EndpointRouter::new(Arc::new(CalculatorState::new()));
/// router.write(Endpoint::First, b"6");
/// router.write(Endpoint::Second, b"7");
/// router.write(Endpoint::Sign, b"*");
///
/// assert_eq!(router.read(Endpoint::Result, 64).bytes, b"42\n");
/// ```
#[derive(Debug, Clone)]
pub struct EndpointRouter {
    state: Arc<CalculatorState>,
}

impl EndpointRouter {
    pub fn new(state: Arc<CalculatorState>) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &Arc<CalculatorState> {
        &self.state
    }

    /// Write all of `data` to an endpoint.
    pub fn write(&self, endpoint: Endpoint, data: &[u8]) -> WriteReport {
        self.write_len(endpoint, data, data.len())
    }

    /// Write the first `requested_len` bytes of `data` to an endpoint.
    pub fn write_len(&self, endpoint: Endpoint, data: &[u8], requested_len: usize) -> WriteReport {
        let Some(field) = endpoint.field() else {
            warn!(%endpoint, "Unsupported operation: write");
            return WriteReport::unsupported();
        };

        let report = self.state.write_field(field, data, requested_len);
        info!(
            %endpoint,
            received = report.consumed,
            "Received characters from the user"
        );
        report
    }

    /// Read up to `requested_len` bytes from an endpoint.
    pub fn read(&self, endpoint: Endpoint, requested_len: usize) -> ReadOutcome {
        if !endpoint.is_readable() {
            warn!(%endpoint, "Unsupported operation: read");
            return ReadOutcome::unsupported();
        }
        self.state.read_result(requested_len)
    }

    /// Clear the state and re-arm the result gate.
    pub fn reset(&self) {
        self.state.reset();
    }
}
