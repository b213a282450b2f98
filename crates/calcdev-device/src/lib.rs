//! Character-device layer for the calculator.
//!
//! This crate exposes each calculator endpoint as a character device with
//! open/read/write/release operations, and keeps the devices in a registry
//! indexed by major number, the way a host registers device nodes.
//!
//! # Components
//!
//! - [`CharDevice`]: the device contract every transport talks to
//! - [`EndpointDevice`]: a device bound to one endpoint of a shared router
//! - [`DeviceRegistry`]: major/name index with all-or-nothing calculator
//!   registration
//! - [`OpenDevice`]: an opened device, released on drop
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use calcdev_device::DeviceRegistry;
//! use calcdev_engine::{CalculatorState, EndpointRouter};
//!
//! # fn main() -> calcdev_device::Result<()> {
//! let router = EndpointRouter::new(Arc::new(CalculatorState::new()));
//! let registry = DeviceRegistry::with_calculator(router, 91)?;
//!
//! for info in registry.devices() {
//!     println!("{} -> major {:?}", info.name, info.major);
//! }
//! # Ok(())
//! # }
//! ```

pub mod endpoint;
pub mod error;
pub mod registry;
pub mod traits;
pub mod types;

pub use endpoint::EndpointDevice;
pub use error::{DeviceError, Result};
pub use registry::{DeviceRegistry, OpenDevice};
pub use traits::CharDevice;
pub use types::DeviceInfo;
