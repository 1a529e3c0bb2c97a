//! End-to-end tests over real loopback sockets.

use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use courier::routing::Router;
use courier::server::listener;
use courier::storage::DirStorage;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

const IDLE: Duration = Duration::from_millis(300);

async fn start_server(dir: &std::path::Path) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = Arc::new(Router::standard(Arc::new(DirStorage::new(dir))));
    tokio::spawn(listener::serve(listener, router, IDLE));
    addr
}

struct Reply {
    status_line: String,
    headers: BTreeSet<(String, String)>,
    body: Vec<u8>,
}

impl Reply {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Reads one response off the socket, using Content-Length to find its end.
async fn read_reply(stream: &mut TcpStream) -> Reply {
    let mut buf = Vec::new();
    let head_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
        let mut chunk = [0u8; 1024];
        let n = timeout(Duration::from_secs(5), stream.read(&mut chunk))
            .await
            .expect("no response")
            .unwrap();
        assert!(n > 0, "connection closed mid-response");
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8(buf[..head_end].to_vec()).unwrap();
    let mut lines = head.split("\r\n");
    let status_line = lines.next().unwrap().to_string();
    let headers: BTreeSet<(String, String)> = lines
        .map(|line| {
            let (k, v) = line.split_once(": ").unwrap();
            (k.to_string(), v.to_string())
        })
        .collect();

    let length = headers
        .iter()
        .find(|(k, _)| k == "Content-Length")
        .map(|(_, v)| v.parse::<usize>().unwrap())
        .unwrap_or(0);
    let mut body = buf[head_end + 4..].to_vec();
    while body.len() < length {
        let mut chunk = vec![0u8; length - body.len()];
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed mid-body");
        body.extend_from_slice(&chunk[..n]);
    }

    Reply {
        status_line,
        headers,
        body,
    }
}

async fn assert_closed(stream: &mut TcpStream) {
    let mut rest = Vec::new();
    timeout(Duration::from_secs(5), stream.read_to_end(&mut rest))
        .await
        .expect("connection stayed open")
        .unwrap();
    assert!(rest.is_empty());
}

#[tokio::test]
async fn test_echo_over_tcp() {
    let dir = tempfile::tempdir().unwrap();
    let addr = start_server(dir.path()).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    stream
        .write_all(b"GET /echo/pineapple HTTP/1.1\r\nHost: localhost:4221\r\n\r\n")
        .await
        .unwrap();
    let reply = read_reply(&mut stream).await;

    assert_eq!(reply.status_line, "HTTP/1.1 200 OK");
    let expected: BTreeSet<(String, String)> = [
        ("Content-Type".to_string(), "text/plain".to_string()),
        ("Content-Length".to_string(), "9".to_string()),
    ]
    .into();
    assert_eq!(reply.headers, expected);
    assert_eq!(reply.body, b"pineapple");
}

#[tokio::test]
async fn test_file_round_trip_over_tcp() {
    let dir = tempfile::tempdir().unwrap();
    let addr = start_server(dir.path()).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    stream
        .write_all(b"POST /files/foo.txt HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello")
        .await
        .unwrap();
    let created = read_reply(&mut stream).await;
    assert_eq!(created.status_line, "HTTP/1.1 201 Created");
    assert!(created.headers.is_empty());

    stream
        .write_all(b"GET /files/foo.txt HTTP/1.1\r\n\r\n")
        .await
        .unwrap();
    let read = read_reply(&mut stream).await;
    assert_eq!(read.status_line, "HTTP/1.1 200 OK");
    assert_eq!(read.header("Content-Length"), Some("5"));
    assert_eq!(read.header("Content-Type"), Some("application/octet-stream"));
    assert_eq!(read.body, b"hello");
}

#[tokio::test]
async fn test_missing_file_over_tcp() {
    let dir = tempfile::tempdir().unwrap();
    let addr = start_server(dir.path()).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    stream
        .write_all(b"GET /files/does-not-exist HTTP/1.1\r\n\r\n")
        .await
        .unwrap();
    let reply = read_reply(&mut stream).await;

    assert_eq!(reply.status_line, "HTTP/1.1 404 Not Found");
    assert!(reply.headers.is_empty());
    assert!(reply.body.is_empty());
}

#[tokio::test]
async fn test_encoding_negotiation_over_tcp() {
    let dir = tempfile::tempdir().unwrap();
    let addr = start_server(dir.path()).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    stream
        .write_all(b"GET /echo/abc HTTP/1.1\r\nAccept-Encoding: gzip, br\r\n\r\n")
        .await
        .unwrap();
    let gzip = read_reply(&mut stream).await;
    assert_eq!(gzip.header("Content-Encoding"), Some("gzip"));
    assert_eq!(gzip.body, b"abc");

    stream
        .write_all(b"GET /echo/abc HTTP/1.1\r\nAccept-Encoding: br\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let plain = read_reply(&mut stream).await;
    assert_eq!(plain.header("Content-Encoding"), None);

    assert_closed(&mut stream).await;
}

#[tokio::test]
async fn test_connection_close_over_tcp() {
    let dir = tempfile::tempdir().unwrap();
    let addr = start_server(dir.path()).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    stream
        .write_all(b"GET /user-agent HTTP/1.1\r\nUser-Agent: curl/7.64.1\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let reply = read_reply(&mut stream).await;

    assert_eq!(reply.body, b"curl/7.64.1");
    assert_closed(&mut stream).await;
}

#[tokio::test]
async fn test_idle_timeout_over_tcp() {
    let dir = tempfile::tempdir().unwrap();
    let addr = start_server(dir.path()).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    assert_closed(&mut stream).await;
}

#[tokio::test]
async fn test_concurrent_connections() {
    let dir = tempfile::tempdir().unwrap();
    let addr = start_server(dir.path()).await;

    let clients = (0..8).map(|i| {
        tokio::spawn(async move {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            let request = format!("GET /echo/client-{i} HTTP/1.1\r\nConnection: close\r\n\r\n");
            stream.write_all(request.as_bytes()).await.unwrap();
            let reply = read_reply(&mut stream).await;
            assert_eq!(reply.body, format!("client-{i}").as_bytes());
        })
    });

    for client in clients.collect::<Vec<_>>() {
        client.await.unwrap();
    }
}
