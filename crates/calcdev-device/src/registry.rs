//! Device registry.
//!
//! The [`DeviceRegistry`] maps major numbers and names to character devices.
//! [`DeviceRegistry::register_calculator`] registers the four calculator
//! endpoints at consecutive majors and unwinds partial registrations when a
//! later one fails, so the registry never exposes half a calculator.
//!
//! ```text
//! major 91 ──► first  ─┐
//! major 92 ──► second ─┤
//! major 93 ──► sign   ─┼──► EndpointRouter ──► CalculatorState
//! major 94 ──► result ─┘
//! ```
//!
//! # Examples
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
//! registry.open("first")?.write(b"6")?;
//! registry.open("second")?.write(b"7")?;
//! registry.open("sign")?.write(b"*")?;
//!
//! let mut buf = [0u8; 16];
//! let n = registry.open("result")?.read_into(&mut buf)?;
//! assert_eq!(&buf[..n], b"42\n");
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use calcdev_engine::{EndpointRouter, ReadOutcome, WriteReport};
use tracing::{error, info, warn};

use crate::endpoint::EndpointDevice;
use crate::error::{DeviceError, Result};
use crate::traits::CharDevice;
use crate::types::DeviceInfo;

/// Registry of character devices indexed by major number.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: BTreeMap<u32, Arc<dyn CharDevice>>,
    router: Option<EndpointRouter>,
}

impl DeviceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the calculator endpoints registered.
    ///
    /// # Errors
    ///
    /// See [`register_calculator`](Self::register_calculator).
    pub fn with_calculator(router: EndpointRouter, base_major: u32) -> Result<Self> {
        let mut registry = Self::new();
        registry.register_calculator(router, base_major)?;
        Ok(registry)
    }

    /// Register a device at `major`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The major number is already taken
    /// - A device with the same name is already registered
    pub fn register(&mut self, major: u32, device: Arc<dyn CharDevice>) -> Result<()> {
        let name = device.info().name;

        if let Some(holder) = self.devices.get(&major) {
            return Err(DeviceError::major_in_use(major, holder.info().name));
        }
        if self.find(&name).is_some() {
            return Err(DeviceError::name_in_use(name));
        }

        self.devices.insert(major, device);
        info!(device = %name, major, "Device registered");
        Ok(())
    }

    /// Register the four calculator endpoints at `base_major..base_major + 4`.
    ///
    /// If any registration fails, the endpoints registered by this call are
    /// unregistered before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::RegistrationFailed`] naming the endpoint that
    /// could not be registered, or if the major range overflows.
    pub fn register_calculator(&mut self, router: EndpointRouter, base_major: u32) -> Result<()> {
        let mut registered = Vec::with_capacity(4);

        for device in EndpointDevice::all(&router) {
            let name = device.endpoint().name();
            let Some(major) = base_major.checked_add(device.endpoint().index() as u32) else {
                self.rollback(&registered);
                return Err(DeviceError::registration_failed(name, "major number overflow"));
            };

            if let Err(e) = self.register(major, Arc::new(device)) {
                error!(device = name, major, error = %e, "Device registration failed");
                self.rollback(&registered);
                return Err(DeviceError::registration_failed(name, e.to_string()));
            }
            registered.push(major);
        }

        self.router = Some(router);
        Ok(())
    }

    fn rollback(&mut self, majors: &[u32]) {
        for major in majors {
            self.devices.remove(major);
        }
    }

    /// Remove the device at `major`.
    ///
    /// Removing any calculator endpoint detaches the calculator router, so
    /// a partly registered calculator no longer answers reset or state
    /// requests.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::NoSuchMajor`] if nothing is registered there.
    pub fn unregister(&mut self, major: u32) -> Result<Arc<dyn CharDevice>> {
        let device = self
            .devices
            .remove(&major)
            .ok_or(DeviceError::NoSuchMajor { major })?;
        let info = device.info();
        if info.endpoint.is_some() && self.router.take().is_some() {
            warn!(device = %info.name, "Calculator endpoint removed, router detached");
        }
        info!(device = %info.name, major, "Device unregistered");
        Ok(device)
    }

    /// Remove every device.
    pub fn unregister_all(&mut self) {
        let majors: Vec<u32> = self.devices.keys().copied().collect();
        for major in majors {
            if let Err(e) = self.unregister(major) {
                warn!(major, error = %e, "Failed to unregister device");
            }
        }
        self.router = None;
    }

    /// Find a device by name.
    pub fn find(&self, name: &str) -> Option<&Arc<dyn CharDevice>> {
        self.devices.values().find(|device| device.info().name == name)
    }

    /// Get the device at `major`.
    pub fn get(&self, major: u32) -> Option<&Arc<dyn CharDevice>> {
        self.devices.get(&major)
    }

    /// Open a device by name.
    ///
    /// The returned guard releases the device when dropped.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::NotRegistered`] if no device has this name, or
    /// the device's own open error.
    pub fn open(&self, name: &str) -> Result<OpenDevice> {
        let device = self
            .find(name)
            .cloned()
            .ok_or_else(|| DeviceError::not_registered(name))?;
        device.open()?;
        Ok(OpenDevice { device })
    }

    /// Metadata of every registered device, ordered by major.
    pub fn devices(&self) -> Vec<DeviceInfo> {
        self.devices
            .iter()
            .map(|(&major, device)| device.info().with_major(major))
            .collect()
    }

    /// Router of the registered calculator, if any.
    pub fn router(&self) -> Option<&EndpointRouter> {
        self.router.as_ref()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

/// An opened device; released on drop.
#[derive(Debug)]
pub struct OpenDevice {
    device: Arc<dyn CharDevice>,
}

impl OpenDevice {
    pub fn info(&self) -> DeviceInfo {
        self.device.info()
    }

    /// # Errors
    ///
    /// Propagates the device's read error.
    pub fn read(&self, requested_len: usize) -> Result<ReadOutcome> {
        self.device.read(requested_len)
    }

    /// # Errors
    ///
    /// Propagates the device's read error.
    pub fn read_into(&self, buf: &mut [u8]) -> Result<usize> {
        self.device.read_into(buf)
    }

    /// # Errors
    ///
    /// Propagates the device's write error.
    pub fn write(&self, data: &[u8]) -> Result<WriteReport> {
        self.device.write(data)
    }
}

impl Drop for OpenDevice {
    fn drop(&mut self) {
        if let Err(e) = self.device.release() {
            warn!(device = %self.device.info().name, error = %e, "Failed to release device");
        }
    }
}
