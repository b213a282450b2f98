//! Request dispatch.
//!
//! Maps protocol requests onto the device registry. Each `WRITE`/`READ`
//! opens the endpoint device for the duration of the request, the same way
//! a shell command opens and closes a device node.

use calcdev_device::DeviceRegistry;
use calcdev_engine::{ReadOutcome, ReadStatus, WriteReport, WriteStatus};
use tracing::{debug, warn};

use crate::codec::{Request, Response};

impl From<WriteReport> for Response {
    fn from(report: WriteReport) -> Self {
        match report.status {
            WriteStatus::Stored => Response::Written {
                consumed: report.consumed,
            },
            WriteStatus::Truncated { requested } => Response::Truncated {
                consumed: report.consumed,
                requested,
            },
            WriteStatus::Unsupported => Response::Unsupported,
        }
    }
}

impl From<ReadOutcome> for Response {
    fn from(outcome: ReadOutcome) -> Self {
        match outcome.status {
            ReadStatus::Delivered { .. } => Response::Data(outcome.bytes),
            ReadStatus::AlreadySpent => Response::Empty("spent"),
            ReadStatus::Unsupported => Response::Empty("unsupported"),
            ReadStatus::Rejected(e) => Response::error(e.kind(), e),
        }
    }
}

/// Execute one request against the registry.
pub fn handle_request(registry: &DeviceRegistry, request: Request) -> Response {
    debug!(?request, "Handling request");

    match request {
        Request::Write { endpoint, payload } => registry
            .open(endpoint.name())
            .and_then(|device| device.write(&payload))
            .map(Response::from)
            .unwrap_or_else(|e| Response::error("device", e)),
        Request::Read { endpoint, len } => registry
            .open(endpoint.name())
            .and_then(|device| device.read(len))
            .map(Response::from)
            .unwrap_or_else(|e| Response::error("device", e)),
        Request::Reset => match registry.router() {
            Some(router) => {
                router.reset();
                Response::ResetDone
            }
            None => no_calculator(),
        },
        Request::State => match registry.router() {
            Some(router) => match serde_json::to_string(&router.state().snapshot()) {
                Ok(json) => Response::State(json),
                Err(e) => Response::error("internal", e),
            },
            None => no_calculator(),
        },
    }
}

fn no_calculator() -> Response {
    warn!("Request needs a calculator but none is registered");
    Response::error("device", "no calculator registered")
}
