//! RPC surface and process protocol.
//!
//! The server binds to loopback, announces its port with a single
//! `PORT=<n>` line on stdout, then serves until the shutdown signal. All
//! diagnostics go to stderr as JSON records.

mod app;
mod handlers;
mod routes;
mod specs;
mod state;
pub mod structs;

use std::io::Write;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::PluginConfig;

pub struct PluginServer {
    listener: TcpListener,
    config: Arc<PluginConfig>,
}

impl PluginServer {
    pub async fn bind(config: PluginConfig) -> Result<Self> {
        let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        Ok(Self { listener, config: Arc::new(config) })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub async fn run(self) -> Result<()> {
        let port = self.local_addr()?.port();

        // The output channel carries exactly this one line, ever.
        let mut stdout = std::io::stdout();
        writeln!(stdout, "PORT={port}")?;
        stdout.flush()?;

        let cancellation_token = CancellationToken::new();
        spawn_signal_watcher(cancellation_token.clone());

        let app = router(cancellation_token.clone(), self.config.clone());
        info!(port, "serving RPCs");

        let shutdown = cancellation_token.clone();
        axum::serve(self.listener, app)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await
            .context("server error")?;

        info!("drained in-flight requests, shutting down");
        Ok(())
    }
}

/// The RPC router. Public so the integration tests can drive the surface
/// without binding a socket.
pub fn router(cancellation_token: CancellationToken, config: Arc<PluginConfig>) -> Router {
    app::get_app(cancellation_token, config)
}

fn spawn_signal_watcher(cancellation_token: CancellationToken) {
    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();
        #[cfg(unix)]
        {
            let mut sigterm = match tokio::signal::unix::signal(
                tokio::signal::unix::SignalKind::terminate(),
            ) {
                Ok(signal) => signal,
                Err(e) => {
                    tracing::error!(error = %e, "failed to install SIGTERM handler");
                    return;
                }
            };
            tokio::select! {
                _ = ctrl_c => {}
                _ = sigterm.recv() => {}
            }
        }
        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
        }
        info!("shutdown signal received");
        cancellation_token.cancel();
    });
}
