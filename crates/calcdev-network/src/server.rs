//! TCP server for the calculator line protocol.
//!
//! Every accepted connection runs in its own task and talks to the shared
//! [`DeviceRegistry`]. All sessions see the same calculator state: a result
//! read by one client is spent for every client until a `RESET`.
//!
//! ```text
//! client A ┐
//!          ├──> CalcServer ──> DeviceRegistry ──> EndpointRouter ──> CalculatorState
//! client B ┘        │
//!                   └──> CalcCodec (line framing)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use calcdev_device::DeviceRegistry;
//! use calcdev_engine::{CalculatorState, EndpointRouter};
//! use calcdev_network::{CalcServer, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let router = EndpointRouter::new(Arc::new(CalculatorState::new()));
//! let registry = Arc::new(DeviceRegistry::with_calculator(router, 91)?);
//!
//! let server = CalcServer::bind(ServerConfig::default(), registry).await?;
//! server.run_until(async {
//!     let _ = tokio::signal::ctrl_c().await;
//! }).await?;
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use calcdev_device::DeviceRegistry;
use chrono::{DateTime, Utc};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;
use tokio_util::codec::Framed;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::codec::{CalcCodec, CodecError, DEFAULT_MAX_LINE_LENGTH, Response};
use crate::session::handle_request;

/// Server configuration.
///
/// # Example
///
/// ```
/// use calcdev_network::ServerConfig;
///
/// let config = ServerConfig {
///     bind_addr: "127.0.0.1:9191".parse().unwrap(),
///     ..ServerConfig::default()
/// };
/// assert_eq!(config.max_connections, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind the server to
    pub bind_addr: SocketAddr,

    /// Maximum number of simultaneous connections
    pub max_connections: usize,

    /// Longest request line accepted before the connection is closed
    pub max_line_length: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 9191)),
            max_connections: 64,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}

/// Errors that can occur during server operations
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind to {addr}: {source}")]
    BindFailed {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
}

/// Metadata of one client session.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub id: Uuid,
    pub remote_addr: SocketAddr,
    pub connected_at: DateTime<Utc>,
}

impl SessionInfo {
    fn new(remote_addr: SocketAddr) -> Self {
        Self {
            id: Uuid::new_v4(),
            remote_addr,
            connected_at: Utc::now(),
        }
    }

    pub fn uptime(&self) -> chrono::Duration {
        Utc::now() - self.connected_at
    }
}

/// TCP server exposing the registered calculator devices.
#[derive(Debug)]
pub struct CalcServer {
    listener: TcpListener,
    registry: Arc<DeviceRegistry>,
    config: ServerConfig,
}

impl CalcServer {
    /// Bind the server to the configured address.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::BindFailed`] if the address cannot be bound.
    pub async fn bind(
        config: ServerConfig,
        registry: Arc<DeviceRegistry>,
    ) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(config.bind_addr)
            .await
            .map_err(|source| ServerError::BindFailed {
                addr: config.bind_addr,
                source,
            })?;

        info!(
            addr = %listener.local_addr()?,
            max_connections = config.max_connections,
            devices = registry.len(),
            "Calculator server listening"
        );

        Ok(Self {
            listener,
            registry,
            config,
        })
    }

    /// Address the listener is bound to.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket address cannot be queried.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Serve connections forever.
    ///
    /// # Errors
    ///
    /// Returns an error only if the listener fails.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_until(std::future::pending()).await
    }

    /// Serve connections until `shutdown` resolves.
    ///
    /// Open sessions are aborted on shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error only if the listener fails.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()>,
    {
        let mut sessions = JoinSet::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!(open_sessions = sessions.len(), "Shutting down calculator server");
                    break;
                }
                accepted = self.listener.accept() => {
                    let (stream, addr) = accepted?;

                    while sessions.try_join_next().is_some() {}

                    if sessions.len() >= self.config.max_connections {
                        error!(
                            addr = %addr,
                            max_connections = self.config.max_connections,
                            "Connection rejected: maximum connections reached"
                        );
                        drop(stream);
                        continue;
                    }

                    if let Err(e) = stream.set_nodelay(true) {
                        warn!("Failed to set TCP_NODELAY for {}: {}", addr, e);
                    }

                    let registry = Arc::clone(&self.registry);
                    let max_line_length = self.config.max_line_length;
                    sessions.spawn(async move {
                        let session = SessionInfo::new(addr);
                        if let Err(e) = serve_connection(stream, &session, &registry, max_line_length).await {
                            warn!(session = %session.id, error = %e, "Session ended with error");
                        }
                    });
                }
            }
        }

        sessions.shutdown().await;
        Ok(())
    }
}

async fn serve_connection(
    stream: TcpStream,
    session: &SessionInfo,
    registry: &DeviceRegistry,
    max_line_length: usize,
) -> Result<(), ServerError> {
    info!(session = %session.id, addr = %session.remote_addr, "Client connected");

    let mut framed = Framed::new(stream, CalcCodec::with_max_line_length(max_line_length));

    let result = loop {
        match framed.next().await {
            Some(Ok(Ok(request))) => {
                let response = handle_request(registry, request);
                framed.send(response).await?;
            }
            Some(Ok(Err(e))) => {
                debug!(session = %session.id, error = %e, "Malformed request");
                framed.send(Response::error("request", e)).await?;
            }
            Some(Err(CodecError::LineTooLong { max })) => {
                warn!(session = %session.id, max, "Request line too long, closing connection");
                framed
                    .send(Response::error("request", format!("line exceeds {max} bytes")))
                    .await?;
                break Ok(());
            }
            Some(Err(e)) => break Err(e.into()),
            None => break Ok(()),
        }
    };

    info!(
        session = %session.id,
        uptime_ms = session.uptime().num_milliseconds(),
        "Client disconnected"
    );
    result
}
