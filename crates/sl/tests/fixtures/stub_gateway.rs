//! Minimal loopback HTTP gateway for integration tests
//!
//! Serves canned JSON per (method, path) and records every request it saw,
//! so tests can assert on what the CLI sent without a real gateway.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

/// One request as seen by the stub
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: String,
    /// Path including the query string, e.g. `/items?email=a%40b.c`
    pub target: String,
    pub body: String,
}

/// Canned responses keyed by `(method, path)` (path without query)
pub type Routes = HashMap<(String, String), (u16, String)>;

/// Handle to a running stub gateway
pub struct StubGateway {
    pub base_url: String,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl StubGateway {
    /// Spawn a stub on an ephemeral loopback port.
    pub fn spawn(routes: Routes) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let seen: Arc<Mutex<Vec<SeenRequest>>> = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = Arc::clone(&seen);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                handle_connection(stream, &routes, &seen_clone);
            }
        });

        Self { base_url, seen }
    }

    /// Every request the stub has served so far.
    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }

    /// Requests matching a method and path prefix.
    pub fn seen_matching(&self, method: &str, path_prefix: &str) -> Vec<SeenRequest> {
        self.seen()
            .into_iter()
            .filter(|r| r.method == method && r.target.starts_with(path_prefix))
            .collect()
    }
}

fn handle_connection(
    stream: TcpStream,
    routes: &Routes,
    seen: &Arc<Mutex<Vec<SeenRequest>>>,
) {
    let Ok(read_half) = stream.try_clone() else {
        return;
    };
    let mut reader = BufReader::new(read_half);

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() || request_line.is_empty() {
        return;
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or_default().to_string();

    // Headers: only Content-Length matters
    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).is_err() {
            return;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            break;
        }
        if let Some(value) = trimmed
            .to_ascii_lowercase()
            .strip_prefix("content-length:")
            .map(str::trim)
        {
            content_length = value.parse().unwrap_or(0);
        }
    }

    let mut body = vec![0u8; content_length];
    if content_length > 0 && reader.read_exact(&mut body).is_err() {
        return;
    }
    let body = String::from_utf8_lossy(&body).to_string();

    seen.lock().unwrap().push(SeenRequest {
        method: method.clone(),
        target: target.clone(),
        body,
    });

    let path = target.split('?').next().unwrap_or_default().to_string();
    let (status, payload) = routes
        .get(&(method, path))
        .cloned()
        .unwrap_or((404, "{\"message\":\"not found\"}".to_string()));

    let reason = if status < 400 { "OK" } else { "Error" };
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{payload}",
        payload.len(),
    );
    let mut stream = stream;
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}
