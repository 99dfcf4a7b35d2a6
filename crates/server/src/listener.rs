//! TCP front end for the orchestrator.
//!
//! Every accepted connection gets its own task, so a slow or stalled client
//! only ever holds up itself. The engine call runs on the blocking pool so
//! connection tasks never compute on the async workers.

use std::future::Future;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

use crate::config::ServerConfig;
use crate::orchestrator::RecommendationOrchestrator;
use crate::protocol::{read_message, write_message, ProtocolError, UserRequest};

pub struct RecommendationServer {
    listener: TcpListener,
    orchestrator: RecommendationOrchestrator,
    max_request_bytes: usize,
}

impl RecommendationServer {
    /// Bind the listening socket. Nothing is served until [`serve`](Self::serve).
    pub async fn bind(config: &ServerConfig, orchestrator: RecommendationOrchestrator) -> Result<Self> {
        config.validate()?;
        let listener = TcpListener::bind(config.bind_addr)
            .await
            .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

        Ok(Self {
            listener,
            orchestrator,
            max_request_bytes: config.max_request_bytes,
        })
    }

    /// The address actually bound (useful when binding port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener.local_addr().context("Failed to read local address")
    }

    /// Serve until the process exits
    pub async fn serve(self) -> Result<()> {
        self.serve_with_shutdown(std::future::pending()).await
    }

    /// Serve until `shutdown` completes.
    ///
    /// Shutdown only stops accepting; connections already accepted run to
    /// completion in their own tasks.
    pub async fn serve_with_shutdown(self, shutdown: impl Future<Output = ()>) -> Result<()> {
        let addr = self.local_addr()?;
        info!("Server listening on {}", addr);

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, no longer accepting connections");
                    return Ok(());
                }
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => {
                            debug!("Client connected: {}", peer);
                            let orchestrator = self.orchestrator.clone();
                            let max_request_bytes = self.max_request_bytes;
                            tokio::spawn(async move {
                                if let Err(e) = handle_connection(stream, orchestrator, max_request_bytes).await {
                                    warn!("Connection from {} failed: {}", peer, e);
                                }
                            });
                        }
                        Err(e) => {
                            // Usually transient (e.g. too many open files); keep accepting
                            error!("Failed to accept connection: {}", e);
                        }
                    }
                }
            }
        }
    }
}

/// Serve exactly one query on one connection
async fn handle_connection(
    stream: TcpStream,
    orchestrator: RecommendationOrchestrator,
    max_request_bytes: usize,
) -> Result<(), ProtocolError> {
    let peer = stream.peer_addr().ok();
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);

    let request: UserRequest = read_message(&mut reader, max_request_bytes).await?;
    debug!("Processing data for user '{}'", request.user_id);

    let data = tokio::task::spawn_blocking(move || orchestrator.get_user_data(&request.user_id))
        .await
        .map_err(|e| ProtocolError::Io(std::io::Error::other(e)))?;

    write_message(&mut writer, &data).await?;
    debug!("Response sent to {:?}", peer);
    Ok(())
}
