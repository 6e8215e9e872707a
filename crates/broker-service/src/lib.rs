//! # VerniyMQ broker service
//!
//! Binds a [`broker_core::service::QueueService`] to two front doors: the
//! custom TCP wire protocol ([`session`]) and a REST admin surface
//! ([`admin`]). Both listeners share one `tokio::sync::broadcast` shutdown
//! signal so `SIGINT`/`SIGTERM` drains both cleanly.

pub mod admin;
pub mod auth;
pub mod config;
pub mod errors;
pub mod session;

use crate::admin::AdminState;
use crate::auth::Authenticator;
use crate::config::BrokerConfig;
use crate::errors::ServiceError;
use broker_core::service::QueueService;
use broker_core::QueueManager;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{info, warn};

/// Run the TCP listener and the admin HTTP server concurrently until
/// `shutdown` resolves.
pub async fn run(
    config: BrokerConfig,
    authenticator: Arc<dyn Authenticator>,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<(), ServiceError> {
    let manager = Arc::new(QueueManager::new(config.tcp.visibility_timeout()));
    let service = Arc::new(QueueService::new(manager));

    let (notify_shutdown, _) = broadcast::channel(1);

    let tcp_task = tokio::spawn(run_tcp_listener(
        config.tcp.host.clone(),
        config.tcp.port,
        service.clone(),
        authenticator,
        notify_shutdown.subscribe(),
    ));
    let admin_task = tokio::spawn(run_admin_http(
        config.admin_http.host.clone(),
        config.admin_http.port,
        service,
        notify_shutdown.subscribe(),
    ));

    tokio::spawn(async move {
        shutdown.await;
        info!("shutdown signal received");
        let _ = notify_shutdown.send(());
    });

    let (tcp_result, admin_result) = tokio::join!(tcp_task, admin_task);
    tcp_result.map_err(|e| ServiceError::ServerFailed {
        message: e.to_string(),
    })??;
    admin_result.map_err(|e| ServiceError::ServerFailed {
        message: e.to_string(),
    })??;
    Ok(())
}

/// Accept loop: every connection is handled on its own task, per the
/// connection-per-task model.
async fn run_tcp_listener(
    host: String,
    port: u16,
    service: Arc<QueueService>,
    authenticator: Arc<dyn Authenticator>,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), ServiceError> {
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e: std::net::AddrParseError| ServiceError::BindFailed {
            address: format!("{host}:{port}"),
            message: e.to_string(),
        })?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServiceError::BindFailed {
            address: addr.to_string(),
            message: e.to_string(),
        })?;
    info!(%addr, "TCP listener started");

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = accepted.map_err(|e| ServiceError::ServerFailed { message: e.to_string() })?;
                let service = service.clone();
                let authenticator = authenticator.clone();
                tokio::spawn(async move {
                    session::handle_connection(stream, service, authenticator).await;
                });
                let _ = peer;
            }
            _ = shutdown.recv() => {
                info!("TCP listener shutting down");
                return Ok(());
            }
        }
    }
}

async fn run_admin_http(
    host: String,
    port: u16,
    service: Arc<QueueService>,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), ServiceError> {
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e: std::net::AddrParseError| ServiceError::BindFailed {
            address: format!("{host}:{port}"),
            message: e.to_string(),
        })?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServiceError::BindFailed {
            address: addr.to_string(),
            message: e.to_string(),
        })?;
    info!(%addr, "admin HTTP server started");

    let router = admin::create_router(AdminState { service });
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            warn!("admin HTTP server shutting down");
        })
        .await
        .map_err(|e| ServiceError::ServerFailed {
            message: e.to_string(),
        })
}
