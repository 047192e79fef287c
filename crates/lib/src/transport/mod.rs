//! The network surface: one axum server carrying both transports.
//!
//! `/api/...` is the one-shot request/response surface, `/socket` the
//! persistent streaming surface; both feed the same state intake
//! queue. An optional asset directory is served at the root for the
//! display client.

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use axum::{
    Router,
    routing::{any, get},
};
use tokio::sync::oneshot;
use tower_http::services::ServeDir;
use tracing::{debug, error, info};

use crate::{registry::ConnectionRegistry, state::StateHandle};

pub mod errors;
mod http;
mod ws;

pub use errors::TransportError;

/// Shared handles available to every request handler.
#[derive(Clone)]
pub(crate) struct AppState {
    pub state: StateHandle,
    pub registry: Arc<ConnectionRegistry>,
}

/// Lifecycle state of the listening server.
struct ServerState {
    running: bool,
    shutdown: Option<oneshot::Sender<()>>,
    address: Option<String>,
}

impl ServerState {
    fn new() -> Self {
        ServerState {
            running: false,
            shutdown: None,
            address: None,
        }
    }

    fn started(&mut self, address: String, shutdown: oneshot::Sender<()>) {
        self.running = true;
        self.address = Some(address);
        self.shutdown = Some(shutdown);
    }

    fn stop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.running = false;
        self.address = None;
    }
}

/// The HTTP/WebSocket server in front of one state actor.
pub struct Server {
    state: StateHandle,
    registry: Arc<ConnectionRegistry>,
    assets: Option<PathBuf>,
    server_state: ServerState,
}

impl Server {
    pub fn new(state: StateHandle, registry: Arc<ConnectionRegistry>) -> Self {
        Server {
            state,
            registry,
            assets: None,
            server_state: ServerState::new(),
        }
    }

    /// Serve a directory of client assets at `/`.
    pub fn with_assets(mut self, dir: impl Into<PathBuf>) -> Self {
        self.assets = Some(dir.into());
        self
    }

    fn router(&self) -> Router {
        let app = AppState {
            state: self.state.clone(),
            registry: Arc::clone(&self.registry),
        };

        let mut router = Router::new()
            .route("/socket", get(ws::upgrade))
            .route("/api", any(http::dispatch_root))
            .route("/api/", any(http::dispatch_root))
            .route("/api/{*path}", any(http::dispatch_path));
        if let Some(assets) = &self.assets {
            router = router.fallback_service(ServeDir::new(assets));
        }
        router.with_state(app)
    }

    /// Bind `addr` and start serving in a background task. Returns once
    /// the listener is bound, with the actual address available from
    /// [`Server::local_addr`] (relevant for port 0).
    pub async fn start(&mut self, addr: &str) -> crate::Result<()> {
        if self.server_state.running {
            return Err(TransportError::AlreadyRunning {
                address: addr.to_string(),
            }
            .into());
        }

        let socket_addr: SocketAddr = addr.parse().map_err(|e| TransportError::Bind {
            address: addr.to_string(),
            reason: format!("invalid address: {e}"),
        })?;

        let router = self.router();
        let (addr_tx, addr_rx) = oneshot::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let listener = match tokio::net::TcpListener::bind(socket_addr).await {
                Ok(listener) => listener,
                Err(e) => {
                    let _ = addr_tx.send(Err(e));
                    return;
                }
            };
            let bound = match listener.local_addr() {
                Ok(bound) => bound,
                Err(e) => {
                    let _ = addr_tx.send(Err(e));
                    return;
                }
            };
            let _ = addr_tx.send(Ok(bound));

            if let Err(e) = axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
            {
                error!("server task failed: {e}");
            }
        });

        let bound = addr_rx
            .await
            .map_err(|_| TransportError::Bind {
                address: addr.to_string(),
                reason: "server task died before binding".to_string(),
            })?
            .map_err(|e| TransportError::Bind {
                address: addr.to_string(),
                reason: e.to_string(),
            })?;

        self.server_state.started(bound.to_string(), shutdown_tx);
        info!(address = %bound, "server listening");
        Ok(())
    }

    /// Stop listening and close every live streaming connection.
    pub async fn stop(&mut self) -> crate::Result<()> {
        if !self.server_state.running {
            return Err(TransportError::NotRunning.into());
        }
        self.server_state.stop();

        for (id, sink) in self.registry.drain() {
            sink.close().await;
            debug!(connection = %id, "closed at shutdown");
        }
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.server_state.running
    }

    /// The bound address, once running.
    pub fn local_addr(&self) -> crate::Result<String> {
        self.server_state
            .address
            .clone()
            .ok_or_else(|| TransportError::NotRunning.into())
    }
}
