//! Network transport for the calculator devices.
//!
//! Exposes a [`DeviceRegistry`](calcdev_device::DeviceRegistry) over TCP with
//! a line protocol, so the four endpoints can be driven from `nc` or any
//! line-oriented client.
//!
//! # Components
//!
//! - [`CalcCodec`]: request/response line framing
//! - [`CalcServer`]: accept loop with one task per client
//! - [`handle_request`]: dispatch of a single request onto the registry
//!
//! # Example session
//!
//! ```text
//! > WRITE first 12
//! < OK 2
//! > WRITE second 30
//! < OK 2
//! > WRITE sign +
//! < OK 1
//! > READ result
//! < DATA 42\n
//! > READ result
//! < EMPTY spent
//! ```

mod codec;
mod server;
mod session;

pub use codec::{
    CalcCodec, CodecError, DEFAULT_MAX_LINE_LENGTH, DEFAULT_READ_LEN, Request, RequestError,
    Response,
};
pub use server::{CalcServer, ServerConfig, ServerError, SessionInfo};
pub use session::handle_request;
