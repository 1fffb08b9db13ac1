//! One-shot scripted HTTP server for exercising the REST client.
//!
//! Each queued reply answers exactly one connection; every request is
//! recorded with its method, target, headers and body.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const ACCEPT_DEADLINE: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self {
            status,
            content_type: "application/json",
            headers: Vec::new(),
            body: body.to_string().into_bytes(),
        }
    }

    pub fn bytes(body: &[u8]) -> Self {
        Self {
            status: 200,
            content_type: "application/zip",
            headers: Vec::new(),
            body: body.to_vec(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    /// Path plus query string, as sent.
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn body_json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is JSON")
    }
}

pub struct ScriptedServer {
    pub base_url: String,
    handle: Option<JoinHandle<Vec<Recorded>>>,
}

impl ScriptedServer {
    pub fn start(replies: Vec<Reply>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
        listener.set_nonblocking(true).expect("nonblocking listener");
        let base_url = format!("http://{}", listener.local_addr().expect("local addr"));

        let handle = thread::spawn(move || {
            let mut recorded = Vec::new();
            let deadline = Instant::now() + ACCEPT_DEADLINE;
            for reply in replies {
                let mut stream = loop {
                    match listener.accept() {
                        Ok((stream, _)) => break stream,
                        Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                            if Instant::now() > deadline {
                                return recorded;
                            }
                            thread::sleep(Duration::from_millis(5));
                        }
                        Err(_) => return recorded,
                    }
                };
                stream.set_nonblocking(false).expect("blocking stream");
                stream
                    .set_read_timeout(Some(Duration::from_secs(5)))
                    .expect("read timeout");
                if let Some(req) = read_request(&mut stream) {
                    recorded.push(req);
                }
                write_reply(&mut stream, &reply);
            }
            recorded
        });

        Self {
            base_url,
            handle: Some(handle),
        }
    }

    /// Waits for the scripted replies to be consumed and returns what was sent.
    pub fn finish(mut self) -> Vec<Recorded> {
        self.handle
            .take()
            .expect("server still running")
            .join()
            .expect("server thread panicked")
    }
}

fn find_header_end(bytes: &[u8]) -> Option<usize> {
    bytes.windows(4).position(|w| w == b"\r\n\r\n")
}

/// Decodes a chunked body; `None` while the terminating chunk has not arrived.
fn decode_chunked(mut data: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    loop {
        let line_end = data.windows(2).position(|w| w == b"\r\n")?;
        let size_text = std::str::from_utf8(&data[..line_end]).ok()?;
        let size_text = size_text.split(';').next().unwrap_or("").trim();
        let size = usize::from_str_radix(size_text, 16).ok()?;
        data = &data[line_end + 2..];
        if size == 0 {
            return Some(out);
        }
        if data.len() < size + 2 {
            return None;
        }
        out.extend_from_slice(&data[..size]);
        data = &data[size + 2..];
    }
}

fn read_request(stream: &mut TcpStream) -> Option<Recorded> {
    let mut bytes = Vec::new();
    let mut buf = [0u8; 8192];
    let mut head: Option<(usize, Vec<(String, String)>, String, String)> = None;

    loop {
        if head.is_none() {
            if let Some(pos) = find_header_end(&bytes) {
                let text = String::from_utf8_lossy(&bytes[..pos]).into_owned();
                let mut lines = text.lines();
                let mut request_line = lines.next()?.split_whitespace();
                let method = request_line.next()?.to_string();
                let target = request_line.next()?.to_string();
                let headers = lines
                    .filter_map(|l| l.split_once(':'))
                    .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                    .collect();
                head = Some((pos + 4, headers, method, target));
            }
        }

        if let Some((start, headers, method, target)) = &head {
            let body_bytes = &bytes[*start..];
            let lookup = |name: &str| {
                headers
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(name))
                    .map(|(_, v)| v.clone())
            };
            let body = if lookup("transfer-encoding").is_some_and(|v| v.contains("chunked")) {
                decode_chunked(body_bytes)
            } else {
                let len = lookup("content-length")
                    .and_then(|v| v.parse::<usize>().ok())
                    .unwrap_or(0);
                (body_bytes.len() >= len).then(|| body_bytes[..len].to_vec())
            };
            if let Some(body) = body {
                return Some(Recorded {
                    method: method.clone(),
                    target: target.clone(),
                    headers: headers.clone(),
                    body,
                });
            }
        }

        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return None,
            Ok(n) => bytes.extend_from_slice(&buf[..n]),
        }
    }
}

fn write_reply(stream: &mut TcpStream, reply: &Reply) {
    let reason = if (200..300).contains(&reply.status) { "OK" } else { "Error" };
    let mut head = format!(
        "HTTP/1.1 {} {reason}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        reply.status,
        reply.content_type,
        reply.body.len()
    );
    for (name, value) in &reply.headers {
        head.push_str(&format!("{name}: {value}\r\n"));
    }
    head.push_str("\r\n");
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&reply.body);
    let _ = stream.flush();
}
