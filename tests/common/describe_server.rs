//! Minimal HTTP/1.1 server answering `POST /{file-id}/describe` for integration tests.
//!
//! Known file ids get a canned JSON description; anything else gets a 404 with
//! the platform's error envelope. Every request is recorded.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: serde_json::Value,
}

pub struct DescribeServer {
    pub base_url: String,
    pub port: u16,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl DescribeServer {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread. The server runs until the process exits.
pub fn start(files: HashMap<String, serde_json::Value>) -> DescribeServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let files = Arc::new(files);
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let files = Arc::clone(&files);
            let recorded = Arc::clone(&recorded);
            thread::spawn(move || handle(stream, &files, &recorded));
        }
    });
    DescribeServer {
        base_url: format!("http://127.0.0.1:{}/", port),
        port,
        requests,
    }
}

/// A describe answer with the extra per-part fields the real service sends.
pub fn description(id: &str, name: &str, folder: &str, parts: &[(&str, &str, u64)]) -> serde_json::Value {
    let parts: serde_json::Map<String, serde_json::Value> = parts
        .iter()
        .map(|(part_id, md5, size)| {
            (
                part_id.to_string(),
                serde_json::json!({"md5": md5, "size": size, "state": "complete"}),
            )
        })
        .collect();
    serde_json::json!({"id": id, "name": name, "folder": folder, "parts": parts})
}

fn handle(
    mut stream: TcpStream,
    files: &HashMap<String, serde_json::Value>,
    recorded: &Mutex<Vec<RecordedRequest>>,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));

    let Some((head, body)) = read_request(&mut stream) else {
        return;
    };

    let mut lines = head.lines();
    let mut request_line = lines.next().unwrap_or("").split_whitespace();
    let method = request_line.next().unwrap_or("").to_string();
    let path = request_line.next().unwrap_or("").to_string();
    let authorization = lines
        .filter_map(|l| l.split_once(':'))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case("authorization"))
        .map(|(_, v)| v.trim().to_string());

    recorded.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        authorization,
        body: serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null),
    });

    let file_id = path
        .trim_start_matches('/')
        .strip_suffix("/describe")
        .unwrap_or("");

    let (status, payload) = match files.get(file_id) {
        Some(file) if method == "POST" => ("200 OK", file.to_string()),
        _ => (
            "404 Not Found",
            serde_json::json!({
                "error": {
                    "type": "ResourceNotFound",
                    "message": format!("\"{file_id}\" could not be found")
                }
            })
            .to_string(),
        ),
    };

    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        payload.len(),
        payload
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

/// Reads headers, then exactly Content-Length bytes of body.
fn read_request(stream: &mut TcpStream) -> Option<(String, Vec<u8>)> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos;
        }
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => return None,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|l| l.split_once(':'))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buf[header_end + 4..].to_vec();
    while body.len() < content_length {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => body.extend_from_slice(&chunk[..n]),
        }
    }
    body.truncate(content_length);

    Some((head, body))
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
