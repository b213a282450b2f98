//! Error types for device operations.
//!
//! This module defines error types for the character-device layer that
//! routes client calls into the calculator, covering registration conflicts
//! and lookups of devices that are not registered.

/// Result type alias for device operations.
pub type Result<T> = std::result::Result<T, DeviceError>;

/// Errors that can occur during device registration and dispatch.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// No device is registered under the given name.
    #[error("Device not registered: {name}")]
    NotRegistered { name: String },

    /// No device is registered at the given major number.
    #[error("No device at major {major}")]
    NoSuchMajor { major: u32 },

    /// Another device already holds the major number.
    #[error("Major {major} already in use by {holder}")]
    MajorInUse { major: u32, holder: String },

    /// Another device already uses the name.
    #[error("Device name already registered: {name}")]
    NameInUse { name: String },

    /// Registration of a device failed.
    #[error("{name} device registration failed: {reason}")]
    RegistrationFailed { name: String, reason: String },
}

impl DeviceError {
    /// Create a new not-registered error.
    pub fn not_registered(name: impl Into<String>) -> Self {
        Self::NotRegistered { name: name.into() }
    }

    /// Create a new major-in-use error.
    pub fn major_in_use(major: u32, holder: impl Into<String>) -> Self {
        Self::MajorInUse {
            major,
            holder: holder.into(),
        }
    }

    /// Create a new name-in-use error.
    pub fn name_in_use(name: impl Into<String>) -> Self {
        Self::NameInUse { name: name.into() }
    }

    /// Create a new registration failed error.
    pub fn registration_failed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::RegistrationFailed {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
