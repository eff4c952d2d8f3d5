//! One HTTP exchange, without redirect handling.
//!
//! A [`Transport`] performs a single GET and writes the raw response head
//! (status line first, then `name: value` lines) and the body into
//! [`ResponseBuffers`]. Interpreting the status is left to the fetcher.

use super::CancelToken;
use crate::config::FetchConfig;
use indicatif::{ProgressBar, ProgressStyle};
use std::borrow::Cow;
use std::io::Read;
use thiserror::Error;
use ureq::Agent;

/// Buffers grow in steps of at least this many bytes.
pub const BUFFER_CHUNK: usize = 16 * 1024;

/// The transport could not complete the request (DNS, connect, TLS, I/O).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Performs a single GET request.
pub trait Transport {
    /// Fetches `url` into `buffers`, which the caller has already cleared.
    /// Redirects must not be followed.
    fn perform(&mut self, url: &str, buffers: &mut ResponseBuffers) -> Result<(), TransportError>;
}

/// Body and header bytes of the current hop, reused across hops.
#[derive(Debug, Default)]
pub struct ResponseBuffers {
    body: Vec<u8>,
    headers: Vec<u8>,
}

impl ResponseBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empties both buffers, keeping their capacity.
    pub fn clear(&mut self) {
        self.body.clear();
        self.headers.clear();
    }

    pub fn append_body(&mut self, bytes: &[u8]) {
        append(&mut self.body, bytes);
    }

    pub fn append_headers(&mut self, bytes: &[u8]) {
        append(&mut self.headers, bytes);
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn headers(&self) -> &[u8] {
        &self.headers
    }

    pub fn headers_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.headers)
    }

    /// Moves the body out, leaving an empty buffer of the same capacity
    /// for the next hop.
    pub fn take_body(&mut self) -> Vec<u8> {
        let capacity = self.body.capacity();
        std::mem::replace(&mut self.body, Vec::with_capacity(capacity))
    }
}

fn append(dst: &mut Vec<u8>, bytes: &[u8]) {
    if dst.capacity() - dst.len() < bytes.len() {
        dst.reserve(bytes.len().max(BUFFER_CHUNK));
    }
    dst.extend_from_slice(bytes);
}

/// Blocking transport backed by a `ureq` agent.
pub struct UreqTransport {
    agent: Agent,
    show_progress: bool,
    cancel: CancelToken,
}

impl UreqTransport {
    pub fn new(config: &FetchConfig) -> Self {
        let agent_config = Agent::config_builder()
            .max_redirects(0)
            .http_status_as_error(false)
            .timeout_global(Some(config.timeout))
            .user_agent(config.user_agent.as_str())
            .build();

        Self {
            agent: Agent::new_with_config(agent_config),
            show_progress: config.show_progress,
            cancel: CancelToken::new(),
        }
    }

    /// Stops body reads as soon as `cancel` fires.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }
}

impl Transport for UreqTransport {
    fn perform(&mut self, url: &str, buffers: &mut ResponseBuffers) -> Result<(), TransportError> {
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| TransportError(e.to_string()))?;

        let status = response.status();
        let mut head = format!(
            "{:?} {} {}\r\n",
            response.version(),
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        );
        for (name, value) in response.headers() {
            head.push_str(name.as_str());
            head.push_str(": ");
            head.push_str(&String::from_utf8_lossy(value.as_bytes()));
            head.push_str("\r\n");
        }
        buffers.append_headers(head.as_bytes());

        let total = response
            .headers()
            .get("content-length")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok());
        let pb = progress_bar(self.show_progress && status.is_success(), total);

        let mut reader = response.into_body().into_reader();
        let mut chunk = [0u8; 8192];
        loop {
            if self.cancel.is_cancelled() {
                pb.abandon();
                return Err(TransportError("interrupted".to_string()));
            }
            let n = reader
                .read(&mut chunk)
                .map_err(|e| TransportError(e.to_string()))?;
            if n == 0 {
                break;
            }
            buffers.append_body(&chunk[..n]);
            pb.inc(n as u64);
        }
        pb.finish_and_clear();

        Ok(())
    }
}

fn progress_bar(visible: bool, total: Option<u64>) -> ProgressBar {
    match total {
        Some(len) if visible => {
            let pb = ProgressBar::new(len);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
            {
                pb.set_style(style.progress_chars("#>-"));
            }
            pb
        }
        _ => ProgressBar::hidden(),
    }
}
