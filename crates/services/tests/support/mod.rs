//! Minimal HTTP/1.1 responder for driving the real client in tests.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub enum Reply {
    Json(u16, String),
    Text(u16, String),
    Hang,
}

type Seen = Arc<Mutex<Vec<(String, Value)>>>;

pub struct TestServer {
    addr: SocketAddr,
    requests: Seen,
}

impl TestServer {
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Request lines seen so far, e.g. `POST /api/game/start`.
    pub fn requests(&self) -> Vec<String> {
        let seen = self.requests.lock().unwrap();
        seen.iter().map(|(line, _)| line.clone()).collect()
    }

    /// JSON body of the request whose line equals `request_line`; `null`
    /// for an empty body.
    pub fn body_of(&self, request_line: &str) -> Option<Value> {
        let seen = self.requests.lock().unwrap();
        seen.iter()
            .find(|(line, _)| line == request_line)
            .map(|(_, body)| body.clone())
    }
}

pub async fn serve(route: fn(&str, &str) -> Reply) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            let seen = Arc::clone(&seen);
            tokio::spawn(async move {
                handle(stream, route, seen).await;
            });
        }
    });

    TestServer { addr, requests }
}

async fn handle(
    mut stream: TcpStream,
    route: fn(&str, &str) -> Reply,
    seen: Seen,
) {
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; 1024];
    let header_end = loop {
        let read = stream.read(&mut chunk).await.unwrap_or(0);
        if read == 0 {
            return;
        }
        buffer.extend_from_slice(&chunk[..read]);
        if let Some(pos) = find(&buffer, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);
    while buffer.len() < header_end + content_length {
        let read = stream.read(&mut chunk).await.unwrap_or(0);
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..read]);
    }

    let request_line = head.lines().next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();
    let raw = &buffer[header_end..buffer.len().min(header_end + content_length)];
    let body = if raw.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(raw)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(raw).into_owned()))
    };
    seen.lock().unwrap().push((format!("{method} {path}"), body));

    let (status, content_type, payload) = match route(&method, &path) {
        Reply::Json(status, payload) => (status, "application/json", payload),
        Reply::Text(status, payload) => (status, "text/plain", payload),
        Reply::Hang => {
            tokio::time::sleep(Duration::from_secs(30)).await;
            return;
        }
    };
    let reason = StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("Unknown");
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{payload}",
        payload.len()
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
