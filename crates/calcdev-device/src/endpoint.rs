//! Endpoint devices.
//!
//! One [`EndpointDevice`] per calculator endpoint. Each device forwards its
//! calls to the shared [`EndpointRouter`]; the router decides whether the
//! operation is supported on that endpoint.

use calcdev_core::Endpoint;
use calcdev_engine::{EndpointRouter, ReadOutcome, WriteReport};
use tracing::info;

use crate::error::Result;
use crate::traits::CharDevice;
use crate::types::DeviceInfo;

/// Character device serving one calculator endpoint.
#[derive(Debug, Clone)]
pub struct EndpointDevice {
    endpoint: Endpoint,
    router: EndpointRouter,
}

impl EndpointDevice {
    pub fn new(endpoint: Endpoint, router: EndpointRouter) -> Self {
        Self { endpoint, router }
    }

    /// Create the four endpoint devices in registration order.
    pub fn all(router: &EndpointRouter) -> [EndpointDevice; 4] {
        Endpoint::ALL.map(|endpoint| EndpointDevice::new(endpoint, router.clone()))
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn router(&self) -> &EndpointRouter {
        &self.router
    }
}

impl CharDevice for EndpointDevice {
    fn info(&self) -> DeviceInfo {
        DeviceInfo::new(self.endpoint.name()).with_endpoint(self.endpoint)
    }

    fn open(&self) -> Result<()> {
        info!(device = %self.endpoint, "Device has been opened");
        Ok(())
    }

    fn release(&self) -> Result<()> {
        info!(device = %self.endpoint, "Device successfully closed");
        Ok(())
    }

    fn read(&self, requested_len: usize) -> Result<ReadOutcome> {
        Ok(self.router.read(self.endpoint, requested_len))
    }

    fn write(&self, data: &[u8]) -> Result<WriteReport> {
        Ok(self.router.write(self.endpoint, data))
    }
}
