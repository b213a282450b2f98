//! Core constants for the calculator device.
//!
//! The calculator exposes four endpoints, each backed by a fixed-capacity
//! text buffer or by the result read path:
//!
//! | Endpoint | Buffer | Capacity |
//! |----------|--------|----------|
//! | `first`  | operand A | [`OPERAND_CAPACITY`] |
//! | `second` | operand B | [`OPERAND_CAPACITY`] |
//! | `sign`   | operator token | [`OPERATOR_CAPACITY`] |
//! | `result` | none (computed on read) | - |
//!
//! # Usage
//!
//! ```
//! use calcdev_core::constants::*;
//!
//! assert_eq!(OPERAND_CAPACITY, 100);
//! assert_eq!(ENDPOINT_NAMES, ["first", "second", "sign", "result"]);
//! ```

// ============================================================================
// Buffer Capacities
// ============================================================================

/// Capacity in bytes of each operand buffer (`first`, `second`).
pub const OPERAND_CAPACITY: usize = 100;

/// Capacity in bytes of the operator buffer (`sign`).
pub const OPERATOR_CAPACITY: usize = 5;

// ============================================================================
// Endpoint Identity
// ============================================================================

/// Endpoint name for operand A.
pub const ENDPOINT_FIRST: &str = "first";

/// Endpoint name for operand B.
pub const ENDPOINT_SECOND: &str = "second";

/// Endpoint name for the operator token.
pub const ENDPOINT_SIGN: &str = "sign";

/// Endpoint name for the computed result.
pub const ENDPOINT_RESULT: &str = "result";

/// All endpoint names, in registration order.
pub const ENDPOINT_NAMES: [&str; 4] = [
    ENDPOINT_FIRST,
    ENDPOINT_SECOND,
    ENDPOINT_SIGN,
    ENDPOINT_RESULT,
];

/// Default major number of the first endpoint device.
///
/// Endpoints are registered at consecutive majors starting here
/// (91 `first`, 92 `second`, 93 `sign`, 94 `result`).
pub const DEFAULT_BASE_MAJOR: u32 = 91;

// ============================================================================
// Result Formatting
// ============================================================================

/// Text produced when dividing by zero.
pub const INFINITY_TEXT: &str = "Infinity";

/// Terminator appended to every formatted result.
pub const RESULT_TERMINATOR: u8 = b'\n';

/// Longest formatted result: `-9223372036854775808` plus the terminator.
pub const MAX_RESULT_LEN: usize = 21;

// ============================================================================
// Operator Symbols
// ============================================================================

pub const OP_ADD: u8 = b'+';
pub const OP_SUBTRACT: u8 = b'-';
pub const OP_MULTIPLY: u8 = b'*';
pub const OP_DIVIDE: u8 = b'/';
