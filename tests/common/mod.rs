//! A tiny HTTP/1.1 server for tests.
//!
//! Routes map a request path to a canned reply. Every connection gets one
//! response and is closed. Requested paths are recorded in order.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Clone)]
pub enum Reply {
    Body(Vec<u8>),
    Redirect(u16, String),
    RedirectWithoutLocation(u16),
    Status(u16),
    /// `200` whose body of this many bytes arrives one byte every 50 ms.
    Trickle(usize),
}

pub struct TestServer {
    pub base: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    pub fn start(routes: Vec<(&str, Reply)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
        let base = format!("http://{}", listener.local_addr().expect("local addr"));
        let routes: HashMap<String, Reply> = routes
            .into_iter()
            .map(|(path, reply)| (path.to_string(), reply))
            .collect();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let seen = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                handle(stream, &routes, &seen);
            }
        });

        Self { base, requests }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("requests lock").clone()
    }
}

fn handle(stream: TcpStream, routes: &HashMap<String, Reply>, seen: &Mutex<Vec<String>>) {
    let mut reader = BufReader::new(&stream);
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) if line == "\r\n" || line == "\n" => break,
            Ok(_) => continue,
            Err(_) => return,
        }
    }

    let path = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or("/")
        .to_string();
    seen.lock().expect("requests lock").push(path.clone());

    if let Some(Reply::Trickle(len)) = routes.get(&path) {
        trickle(&stream, *len);
        return;
    }

    let (status, extra, body) = match routes.get(&path) {
        Some(Reply::Body(body)) => (200, String::new(), body.clone()),
        Some(Reply::Redirect(code, location)) => {
            (*code, format!("Location: {location}\r\n"), Vec::new())
        }
        Some(Reply::RedirectWithoutLocation(code)) => (*code, String::new(), Vec::new()),
        Some(Reply::Status(code)) => (*code, String::new(), Vec::new()),
        Some(Reply::Trickle(_)) | None => (404, String::new(), b"not found".to_vec()),
    };

    let head = format!(
        "HTTP/1.1 {status} Test\r\nContent-Length: {}\r\nConnection: close\r\n{extra}\r\n",
        body.len()
    );
    let mut writer = &stream;
    let _ = writer.write_all(head.as_bytes());
    let _ = writer.write_all(&body);
    let _ = writer.flush();
}

fn trickle(stream: &TcpStream, len: usize) {
    let mut writer = stream;
    let head = format!("HTTP/1.1 200 Test\r\nContent-Length: {len}\r\nConnection: close\r\n\r\n");
    if writer.write_all(head.as_bytes()).is_err() {
        return;
    }
    for _ in 0..len {
        if writer.write_all(b"x").and_then(|()| writer.flush()).is_err() {
            return;
        }
        thread::sleep(Duration::from_millis(50));
    }
}

/// Address nothing listens on.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}/nothing")
}
