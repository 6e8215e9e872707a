//! End-to-end tests for the TCP session state machine, using a loopback
//! listener instead of mocks so the wire codec is exercised for real.

use super::*;
use crate::auth::StaticAuthenticator;
use broker_core::QueueManager;
use std::time::Duration;
use tokio::net::TcpListener;

const ACCOUNT_ID: &str = "01HG17X22440GTQW3AS6WHCF0K";
const PASSWORD: &str = "P@ssw0rd";

async fn spawn_server() -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let manager = Arc::new(QueueManager::new(Duration::from_millis(100)));
    let service = Arc::new(QueueService::new(manager));
    let authenticator: Arc<dyn Authenticator> =
        Arc::new(StaticAuthenticator::new(ACCOUNT_ID, PASSWORD));

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        handle_connection(stream, service, authenticator).await;
    });
    addr
}

async fn authenticate_client(stream: &mut TcpStream) -> String {
    let auth = AuthFrame {
        account_id: ACCOUNT_ID.to_string(),
        password: PASSWORD.to_string(),
    };
    stream.write_all(&auth.encode()).await.unwrap();
    let mut token_bytes = [0u8; 32 * 4];
    stream.read_exact(&mut token_bytes).await.unwrap();
    broker_protocol::codec::decode_utf32_fixed(&token_bytes, "session_token").unwrap()
}

async fn send_header(stream: &mut TcpStream, token: &str, command: Command, queue_name: &str, data_size: u64) {
    let header = HeaderFrame {
        session_token: token.to_string(),
        command,
        queue_name: queue_name.to_string(),
        data_size,
    };
    stream.write_all(&header.encode()).await.unwrap();
}

async fn read_response(stream: &mut TcpStream) -> (ResponseResult, Vec<u8>) {
    let mut header_bytes = [0u8; broker_protocol::RESPONSE_HEADER_SIZE];
    stream.read_exact(&mut header_bytes).await.unwrap();
    let header = ResponseHeader::decode(&header_bytes).unwrap();
    let mut body = vec![0u8; header.data_size as usize];
    stream.read_exact(&mut body).await.unwrap();
    (header.result, body)
}

#[tokio::test]
async fn create_publish_consume_delete_round_trips() {
    let addr = spawn_server().await;
    let mut client = TcpStream::connect(addr).await.unwrap();
    let token = authenticate_client(&mut client).await;

    send_header(&mut client, &token, Command::CreateQueue, "q1", 0).await;
    let (result, _) = read_response(&mut client).await;
    assert_eq!(result, ResponseResult::Ok);

    send_header(&mut client, &token, Command::Publish, "q1", 5).await;
    client.write_all(b"hello").await.unwrap();
    let (result, _) = read_response(&mut client).await;
    assert_eq!(result, ResponseResult::Ok);

    send_header(&mut client, &token, Command::Consume, "q1", 0).await;
    let (result, body) = read_response(&mut client).await;
    assert_eq!(result, ResponseResult::Ok);
    let (id, payload) = MessageFrame::decode(&body).unwrap();
    assert_eq!(payload, b"hello");

    send_header(&mut client, &token, Command::Delete, "q1", 0).await;
    client.write_all(&id).await.unwrap();
    let (result, _) = read_response(&mut client).await;
    assert_eq!(result, ResponseResult::Ok);

    send_header(&mut client, &token, Command::Consume, "q1", 0).await;
    let (result, body) = read_response(&mut client).await;
    assert_eq!(result, ResponseResult::Ok);
    assert!(body.is_empty());
}

#[tokio::test]
async fn session_token_mismatch_closes_with_error() {
    let addr = spawn_server().await;
    let mut client = TcpStream::connect(addr).await.unwrap();
    let _ = authenticate_client(&mut client).await;

    send_header(&mut client, &"0".repeat(32), Command::Ping, "", 0).await;
    let (result, body) = read_response(&mut client).await;
    assert_eq!(result, ResponseResult::Error);
    assert_eq!(String::from_utf8(body).unwrap(), "session timeout");
}

#[tokio::test]
async fn duplicate_create_queue_surfaces_already_exists_error() {
    let addr = spawn_server().await;
    let mut client = TcpStream::connect(addr).await.unwrap();
    let token = authenticate_client(&mut client).await;

    send_header(&mut client, &token, Command::CreateQueue, "q", 0).await;
    read_response(&mut client).await;

    send_header(&mut client, &token, Command::CreateQueue, "q", 0).await;
    let (result, body) = read_response(&mut client).await;
    assert_eq!(result, ResponseResult::Error);
    assert!(String::from_utf8(body).unwrap().contains("already"));
}

#[tokio::test]
async fn ping_replies_pong() {
    let addr = spawn_server().await;
    let mut client = TcpStream::connect(addr).await.unwrap();
    let token = authenticate_client(&mut client).await;

    send_header(&mut client, &token, Command::Ping, "", 0).await;
    let (result, body) = read_response(&mut client).await;
    assert_eq!(result, ResponseResult::Ok);
    assert_eq!(body, b"pong");
}

#[tokio::test]
async fn quit_closes_connection_without_response() {
    let addr = spawn_server().await;
    let mut client = TcpStream::connect(addr).await.unwrap();
    let token = authenticate_client(&mut client).await;

    send_header(&mut client, &token, Command::Quit, "", 0).await;

    let mut buf = [0u8; 1];
    let n = client.read(&mut buf).await.unwrap();
    assert_eq!(n, 0);
}

#[tokio::test]
async fn bad_credentials_close_without_response() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let manager = Arc::new(QueueManager::new(Duration::from_secs(60)));
    let service = Arc::new(QueueService::new(manager));
    let authenticator: Arc<dyn Authenticator> =
        Arc::new(StaticAuthenticator::new(ACCOUNT_ID, PASSWORD));

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        handle_connection(stream, service, authenticator).await;
    });

    let mut client = TcpStream::connect(addr).await.unwrap();
    let auth = AuthFrame {
        account_id: ACCOUNT_ID.to_string(),
        password: "wrong".to_string(),
    };
    client.write_all(&auth.encode()).await.unwrap();

    let mut buf = [0u8; 1];
    let n = client.read(&mut buf).await.unwrap();
    assert_eq!(n, 0);
}
