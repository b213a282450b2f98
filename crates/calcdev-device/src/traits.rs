//! Character device trait definition.
//!
//! [`CharDevice`] is the contract between a transport (a TCP session, a
//! shell-like CLI, a test) and a calculator endpoint: open, read, write,
//! release. Every operation is synchronous and completes immediately; none
//! of them block on I/O.
//!
//! Unlike a raw file interface, reads and writes return the widened
//! [`ReadOutcome`]/[`WriteReport`] so callers can tell "already computed"
//! apart from "unknown operator". [`CharDevice::read_into`] gives the plain
//! byte-count view for callers that only care about the bytes.

use calcdev_engine::{ReadOutcome, WriteReport};

use crate::error::Result;
use crate::types::DeviceInfo;

/// Character device abstraction.
///
/// The trait is object-safe; the registry stores devices as
/// `Arc<dyn CharDevice>`.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use calcdev_core::Endpoint;
/// use calcdev_device::{CharDevice, EndpointDevice};
/// use calcdev_engine::{CalculatorState, EndpointRouter};
///
/// # fn main() -> calcdev_device::Result<()> {
/// let router = EndpointRouter::new(Arc::new(CalculatorState::new()));
/// let first = EndpointDevice::new(Endpoint::First, router.clone());
///
/// first.open()?;
/// let report = first.write(b"12\n")?;
/// assert_eq!(report.consumed, 3);
/// first.release()?;
/// # Ok(())
/// # }
/// ```
pub trait CharDevice: Send + Sync + std::fmt::Debug {
    /// Registration metadata (the major number is filled in by the registry).
    fn info(&self) -> DeviceInfo;

    fn open(&self) -> Result<()>;

    fn release(&self) -> Result<()>;

    /// Read up to `requested_len` bytes.
    ///
    /// # Errors
    ///
    /// Implementations return an error only for transport-level failures;
    /// calculator conditions are carried in the outcome status.
    fn read(&self, requested_len: usize) -> Result<ReadOutcome>;

    /// Write `data`, returning how much of it was consumed.
    ///
    /// # Errors
    ///
    /// Implementations return an error only for transport-level failures.
    fn write(&self, data: &[u8]) -> Result<WriteReport>;

    /// Read into `buf`, returning the number of bytes copied.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`read`](Self::read).
    fn read_into(&self, buf: &mut [u8]) -> Result<usize> {
        let outcome = self.read(buf.len())?;
        let count = outcome.len().min(buf.len());
        buf[..count].copy_from_slice(&outcome.bytes[..count]);
        Ok(count)
    }
}
