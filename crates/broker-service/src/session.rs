//! Per-connection state machine: authenticate, issue a session token, then
//! loop reading headers and dispatching commands until `Quit` or a fatal
//! read/session error closes the connection.

use crate::auth::Authenticator;
use broker_core::service::QueueService;
use broker_core::{Error as CoreError, MessageId, QueueName, TenantId};
use broker_protocol::{
    AuthFrame, Command, HeaderFrame, MessageFrame, ResponseHeader, ResponseResult,
    AUTH_FRAME_SIZE, HEADER_FRAME_SIZE, MESSAGE_ID_BYTES,
};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Generate a fresh 32-unit session token. A hyphen-free UUID is exactly 32
/// hex characters, matching `SESSION_TOKEN_UNITS`.
fn generate_session_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Drives a single accepted connection to completion. Errors are handled
/// internally per the session state machine; this only returns once the
/// connection has closed.
pub async fn handle_connection(
    mut stream: TcpStream,
    service: Arc<QueueService>,
    authenticator: Arc<dyn Authenticator>,
) {
    let peer = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    let (tenant, token) = match authenticate(&mut stream, authenticator.as_ref()).await {
        Some(pair) => pair,
        None => {
            debug!(peer = %peer, "session closed during authentication");
            return;
        }
    };
    info!(peer = %peer, tenant = %tenant, "session authenticated");

    loop {
        let mut header_buf = [0u8; HEADER_FRAME_SIZE];
        if let Err(err) = stream.read_exact(&mut header_buf).await {
            debug!(peer = %peer, error = %err, "connection closed reading header");
            return;
        }

        if HeaderFrame::is_blank(&header_buf) {
            continue;
        }

        let header = match HeaderFrame::decode(&header_buf) {
            Ok(header) => header,
            Err(err) => {
                warn!(peer = %peer, error = %err, "malformed header, closing");
                return;
            }
        };

        if header.session_token != token {
            let _ = write_error(&mut stream, "session timeout").await;
            warn!(peer = %peer, tenant = %tenant, "session token mismatch, closing");
            return;
        }

        if header.command == Command::Quit {
            debug!(peer = %peer, tenant = %tenant, "client quit");
            return;
        }

        if let Err(err) = dispatch(&mut stream, &service, &tenant, &header).await {
            warn!(peer = %peer, tenant = %tenant, error = %err, "connection-level I/O failure, closing");
            return;
        }
    }
}

/// Read the auth frame, verify it, and (on success) emit the session token.
/// Returns `None` if the connection should close without further response.
async fn authenticate(
    stream: &mut TcpStream,
    authenticator: &dyn Authenticator,
) -> Option<(TenantId, String)> {
    let mut buf = [0u8; AUTH_FRAME_SIZE];
    stream.read_exact(&mut buf).await.ok()?;
    let auth = AuthFrame::decode(&buf).ok()?;

    if !authenticator.verify(&auth.account_id, &auth.password) {
        return None;
    }

    let token = generate_session_token();
    stream
        .write_all(&broker_protocol::codec::encode_utf32_fixed(&token, 32))
        .await
        .ok()?;
    stream.flush().await.ok()?;

    let tenant = authenticator.tenant_for(&auth.account_id);
    Some((TenantId::new(tenant), token))
}

/// Handle one non-Quit, non-blank command; returns `Err` only for
/// connection-level I/O failures that must close the session.
async fn dispatch(
    stream: &mut TcpStream,
    service: &QueueService,
    tenant: &TenantId,
    header: &HeaderFrame,
) -> std::io::Result<()> {
    match header.command {
        Command::Ping => write_ok(stream, b"pong").await,
        Command::CreateQueue => {
            match service.create_queue(tenant.clone(), header.queue_name.clone()) {
                Ok(()) => write_ok(stream, &[]).await,
                Err(err) => write_error(stream, &err.to_string()).await,
            }
        }
        Command::ListQueue => {
            let names = service.list_queues(tenant);
            let body = names.join("\n");
            write_ok(stream, body.as_bytes()).await
        }
        Command::DeleteQueue => {
            let name = match QueueName::new(header.queue_name.clone()) {
                Ok(name) => name,
                Err(err) => return write_error(stream, &err.to_string()).await,
            };
            match service.delete_queue(tenant, &name) {
                Ok(()) => write_ok(stream, &[]).await,
                Err(err) => write_error(stream, &err.to_string()).await,
            }
        }
        Command::Publish => {
            let mut body = vec![0u8; header.data_size as usize];
            stream.read_exact(&mut body).await?;
            let name = match QueueName::new(header.queue_name.clone()) {
                Ok(name) => name,
                Err(err) => return write_error(stream, &err.to_string()).await,
            };
            match service.publish(tenant, &name, body.into()) {
                Ok(_id) => write_ok(stream, &[]).await,
                Err(err) => write_error(stream, &err.to_string()).await,
            }
        }
        Command::Consume => {
            let name = match QueueName::new(header.queue_name.clone()) {
                Ok(name) => name,
                Err(err) => return write_error(stream, &err.to_string()).await,
            };
            match service.consume(tenant, &name) {
                Ok(message) => {
                    let body = MessageFrame::encode(&message.id.to_bytes26(), &message.data);
                    write_ok(stream, &body).await
                }
                Err(CoreError::QueueEmpty) => write_ok(stream, &[]).await,
                Err(err) => write_error(stream, &err.to_string()).await,
            }
        }
        Command::Delete => {
            let mut id_bytes = [0u8; MESSAGE_ID_BYTES];
            stream.read_exact(&mut id_bytes).await?;
            let name = match QueueName::new(header.queue_name.clone()) {
                Ok(name) => name,
                Err(err) => return write_error(stream, &err.to_string()).await,
            };
            let id_str = String::from_utf8_lossy(&id_bytes).to_string();
            let id = match id_str.parse::<MessageId>() {
                Ok(id) => id,
                Err(err) => return write_error(stream, &err.to_string()).await,
            };
            match service.delete(tenant, &name, id) {
                Ok(()) => write_ok(stream, &[]).await,
                Err(err) => write_error(stream, &err.to_string()).await,
            }
        }
        Command::Quit => unreachable!("Quit is handled before dispatch"),
    }
}

async fn write_ok(stream: &mut TcpStream, body: &[u8]) -> std::io::Result<()> {
    write_response(stream, ResponseResult::Ok, body).await
}

async fn write_error(stream: &mut TcpStream, message: &str) -> std::io::Result<()> {
    write_response(stream, ResponseResult::Error, message.as_bytes()).await
}

async fn write_response(
    stream: &mut TcpStream,
    result: ResponseResult,
    body: &[u8],
) -> std::io::Result<()> {
    let header = ResponseHeader {
        result,
        data_size: body.len() as u64,
    };
    stream.write_all(&header.encode()).await?;
    stream.write_all(body).await?;
    stream.flush().await
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
