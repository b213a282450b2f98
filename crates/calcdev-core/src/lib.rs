pub mod buffer;
pub mod constants;
pub mod error;
pub mod types;

pub use buffer::{BoundedBuffer, CopyReport, OperandBuffer, OperatorBuffer, bounded_copy};
pub use error::{CalcError, Error, ParseError, Result};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
