//! Shared scaffolding for end-to-end tests: spin up a real TCP listener
//! backed by a fresh `QueueManager`, and thin client-side helpers for the
//! wire protocol.

use broker_core::QueueManager;
use broker_protocol::{
    AuthFrame, Command, HeaderFrame, MessageFrame, ResponseHeader, ResponseResult,
};
use broker_service::auth::{Authenticator, StaticAuthenticator};
use broker_service::session;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub const ACCOUNT_ID: &str = "01HG17X22440GTQW3AS6WHCF0K";
pub const PASSWORD: &str = "P@ssw0rd";

/// Accepts any credentials, scoping each connection's tenant to the account
/// id it presented. Lets a single broker instance exercise multi-tenant
/// scenarios without a real credential backend.
struct MultiTenantAuthenticator;

impl Authenticator for MultiTenantAuthenticator {
    fn verify(&self, _account_id: &str, _password: &str) -> bool {
        true
    }
}

pub async fn spawn_broker(visibility_timeout: Duration) -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let manager = Arc::new(QueueManager::new(visibility_timeout));
    let service = Arc::new(broker_core::service::QueueService::new(manager));
    let authenticator: Arc<dyn Authenticator> = Arc::new(StaticAuthenticator::new(ACCOUNT_ID, PASSWORD));

    tokio::spawn(async move {
        loop {
            let (stream, _) = listener.accept().await.unwrap();
            let service = service.clone();
            let authenticator = authenticator.clone();
            tokio::spawn(session::handle_connection(stream, service, authenticator));
        }
    });
    addr
}

/// Like [`spawn_broker`], but accepts any credentials so distinct tenants
/// can authenticate on the same broker instance.
pub async fn spawn_multi_tenant_broker(visibility_timeout: Duration) -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let manager = Arc::new(QueueManager::new(visibility_timeout));
    let service = Arc::new(broker_core::service::QueueService::new(manager));
    let authenticator: Arc<dyn Authenticator> = Arc::new(MultiTenantAuthenticator);

    tokio::spawn(async move {
        loop {
            let (stream, _) = listener.accept().await.unwrap();
            let service = service.clone();
            let authenticator = authenticator.clone();
            tokio::spawn(session::handle_connection(stream, service, authenticator));
        }
    });
    addr
}

pub async fn connect_and_authenticate_as(
    addr: std::net::SocketAddr,
    account_id: &str,
    password: &str,
) -> (TcpStream, String) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let auth = AuthFrame {
        account_id: account_id.to_string(),
        password: password.to_string(),
    };
    stream.write_all(&auth.encode()).await.unwrap();
    let mut token_bytes = [0u8; 32 * 4];
    stream.read_exact(&mut token_bytes).await.unwrap();
    let token = broker_protocol::codec::decode_utf32_fixed(&token_bytes, "session_token").unwrap();
    (stream, token)
}

pub async fn connect_and_authenticate(addr: std::net::SocketAddr) -> (TcpStream, String) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let auth = AuthFrame {
        account_id: ACCOUNT_ID.to_string(),
        password: PASSWORD.to_string(),
    };
    stream.write_all(&auth.encode()).await.unwrap();
    let mut token_bytes = [0u8; 32 * 4];
    stream.read_exact(&mut token_bytes).await.unwrap();
    let token = broker_protocol::codec::decode_utf32_fixed(&token_bytes, "session_token").unwrap();
    (stream, token)
}

pub async fn send_header(
    stream: &mut TcpStream,
    token: &str,
    command: Command,
    queue_name: &str,
    data_size: u64,
) {
    let header = HeaderFrame {
        session_token: token.to_string(),
        command,
        queue_name: queue_name.to_string(),
        data_size,
    };
    stream.write_all(&header.encode()).await.unwrap();
}

pub async fn read_response(stream: &mut TcpStream) -> (ResponseResult, Vec<u8>) {
    let mut header_bytes = [0u8; broker_protocol::RESPONSE_HEADER_SIZE];
    stream.read_exact(&mut header_bytes).await.unwrap();
    let header = ResponseHeader::decode(&header_bytes).unwrap();
    let mut body = vec![0u8; header.data_size as usize];
    stream.read_exact(&mut body).await.unwrap();
    (header.result, body)
}

pub fn split_message(body: &[u8]) -> ([u8; 26], Vec<u8>) {
    let (id, payload) = MessageFrame::decode(body).unwrap();
    (id, payload.to_vec())
}
