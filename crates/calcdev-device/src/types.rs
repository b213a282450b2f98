//! Common types shared across device implementations.

use calcdev_core::Endpoint;
use serde::{Deserialize, Serialize};

/// Registration metadata of a character device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Device name (e.g., "first", "result").
    pub name: String,

    /// Major number the device is registered at, once registered.
    pub major: Option<u32>,

    /// Endpoint served by the device, if it is a calculator endpoint.
    pub endpoint: Option<Endpoint>,
}

impl DeviceInfo {
    /// Create a new DeviceInfo with just a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            major: None,
            endpoint: None,
        }
    }

    /// Set the major number.
    pub fn with_major(mut self, major: u32) -> Self {
        self.major = Some(major);
        self
    }

    /// Set the served endpoint.
    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = Some(endpoint);
        self
    }
}
