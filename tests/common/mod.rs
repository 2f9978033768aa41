#![allow(dead_code, deprecated)]

use assert_cmd::Command;
use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

pub fn worklog_cmd() -> Command {
    let mut cmd = Command::cargo_bin("worklog").unwrap();
    for key in [
        "WORKLOG_ROOT",
        "WORKLOG_ACCESS_TOKEN",
        "WORKLOG_LOG",
        "RUST_LOG",
        "EDITOR",
        "VISUAL",
        "HTTP_PROXY",
        "http_proxy",
        "HTTPS_PROXY",
        "https_proxy",
        "ALL_PROXY",
        "all_proxy",
    ] {
        cmd.env_remove(key);
    }
    cmd
}

/// `worklog init` in `root`
pub fn init_journal(root: &Path) {
    worklog_cmd().arg("init").arg(root).assert().success();
}

/// Replace the stored entries with a raw JSON payload
pub fn seed_entries(root: &Path, json: &str) {
    fs::write(root.join(".worklog").join("entries.json"), json).unwrap();
}

pub fn stored_entries(root: &Path) -> serde_json::Value {
    let raw = fs::read_to_string(root.join(".worklog").join("entries.json")).unwrap();
    serde_json::from_str(&raw).unwrap()
}

/// Two entries used across tests: a Monday meeting and a Wednesday bug fix
pub const TWO_ENTRIES: &str = r#"[
  {"id":"e_1","dateISO":"2024-01-01","day":"Monday","notes":"meeting","lastUpdated":1704103200000},
  {"id":"e_2","dateISO":"2024-01-03","day":"Wednesday","notes":"fixed bug","lastUpdated":1704276000000}
]"#;

/// Add an entry through the CLI and return its id
pub fn add_entry(root: &Path, date: &str, notes: &str) -> String {
    let output = worklog_cmd()
        .current_dir(root)
        .args(["add", date, "--notes", notes])
        .output()
        .unwrap();
    assert!(output.status.success(), "add failed: {:?}", output);
    let stdout = String::from_utf8(output.stdout).unwrap();
    stdout
        .split_whitespace()
        .nth(2)
        .expect("entry id in output")
        .to_string()
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Loopback HTTP server answering with scripted responses, one connection
/// per response
pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubServer {
    pub fn start(responses: Vec<(u16, &'static str)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}/drive/root", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);

        thread::spawn(move || {
            for (status, body) in responses {
                let Ok((mut stream, _)) = listener.accept() else {
                    return;
                };
                stream
                    .set_read_timeout(Some(Duration::from_secs(5)))
                    .unwrap();
                if let Some(request) = read_request(&mut stream) {
                    recorded.lock().unwrap().push(request);
                }
                let response = format!(
                    "HTTP/1.1 {} Stub\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
        });

        StubServer { base_url, requests }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn read_request(stream: &mut impl Read) -> Option<RecordedRequest> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        if let Some(pos) = find(&buffer, b"\r\n\r\n") {
            break pos;
        }
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buffer.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let length: usize = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse().ok())
        .unwrap_or(0);
    let mut body = buffer[header_end + 4..].to_vec();
    while body.len() < length {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Some(RecordedRequest {
        method,
        path,
        headers,
        body: String::from_utf8_lossy(&body).to_string(),
    })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
