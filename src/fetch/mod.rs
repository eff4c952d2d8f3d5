//! Resilient HTTP fetching.
//!
//! [`Fetcher::fetch`] issues a GET, classifies the response by status code
//! and follows redirect chains until it gets a `200` or a terminal failure:
//!
//! - `200` - success, the body is returned
//! - `3xx` - the `Location` header is followed (bounded number of hops)
//! - anything else - failure carrying the status code
//!
//! Progress is printed as the fetch goes; the return value is the only
//! thing callers should act on.

mod transport;

pub use transport::{BUFFER_CHUNK, ResponseBuffers, Transport, TransportError, UreqTransport};

use crate::config::DEFAULT_MAX_REDIRECTS;
use colored::*;
use regex::Regex;
use std::sync::Arc;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

static STATUS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"HTTP/\d+(?:\.\d+)?\s+(\d{3})").expect("status line regex"));

static LOCATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^location:[ \t]*(\S*)").expect("location regex"));

/// Why a fetch did not produce a body.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("failed to fetch {url}: {reason}")]
    Transport { url: String, reason: String },

    #[error("failed to fetch {url}. Server returned code {code}")]
    UnhandledStatus { url: String, code: u16 },

    #[error("server redirected {url} (code {code}) without a usable Location header")]
    BrokenRedirect { url: String, code: u16 },

    #[error("too many redirects while fetching {url} (limit is {limit})")]
    TooManyRedirects { url: String, limit: usize },

    #[error("fetch of {url} was cancelled")]
    Cancelled { url: String },
}

impl FetchError {
    /// HTTP status code attached to the failure, if there was a response.
    pub fn code(&self) -> Option<u16> {
        match self {
            Self::UnhandledStatus { code, .. } | Self::BrokenRedirect { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// A successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    /// URL that finally answered `200`.
    pub url: String,
    pub body: Vec<u8>,
    /// Redirect targets in the order they were visited.
    pub redirects: Vec<String>,
}

/// Shared flag that stops a fetch before its next hop.
///
/// The binary trips it from its Ctrl-C handler; a transport holding a clone
/// also stops reading the body it is receiving.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Follows redirects over a [`Transport`].
pub struct Fetcher<T: Transport> {
    transport: T,
    buffers: ResponseBuffers,
    max_redirects: usize,
    cancel: CancelToken,
}

impl<T: Transport> Fetcher<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            buffers: ResponseBuffers::new(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            cancel: CancelToken::new(),
        }
    }

    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetches `url`, following redirects.
    pub fn fetch(&mut self, url: &str) -> Result<Fetched, FetchError> {
        println!("{} Attempting to fetch {}", "⚡".yellow(), url);

        let mut current = url.to_string();
        let mut redirects = Vec::new();
        loop {
            if self.cancel.is_cancelled() {
                return Err(FetchError::Cancelled { url: current });
            }

            self.buffers.clear();
            if let Err(e) = self.transport.perform(&current, &mut self.buffers) {
                if self.cancel.is_cancelled() {
                    println!("{} Interrupted while fetching {}", "x".red(), current);
                    return Err(FetchError::Cancelled { url: current });
                }
                println!("{} Failed to fetch {}", "x".red(), current);
                return Err(FetchError::Transport {
                    url: current,
                    reason: e.0,
                });
            }

            let (code, location) = {
                let head = self.buffers.headers_text();
                (status_code(&head), location(&head))
            };

            match code {
                200 => {
                    println!("{} Success!", "✓".green());
                    return Ok(Fetched {
                        url: current,
                        body: self.buffers.take_body(),
                        redirects,
                    });
                }
                300..=399 => {
                    let Some(location) = location else {
                        println!(
                            "{} Failed to fetch {}. Redirect without a target",
                            "x".red(),
                            current
                        );
                        return Err(FetchError::BrokenRedirect { url: current, code });
                    };
                    if redirects.len() >= self.max_redirects {
                        println!("{} Failed to fetch {}. Too many redirects", "x".red(), url);
                        return Err(FetchError::TooManyRedirects {
                            url: url.to_string(),
                            limit: self.max_redirects,
                        });
                    }
                    let next = resolve_location(&current, &location);
                    println!("{} Redirecting to {}", "↪".cyan(), next);
                    redirects.push(next.clone());
                    current = next;
                }
                _ => {
                    println!(
                        "{} Failed to fetch {}. Server returned code {}",
                        "x".red(),
                        current,
                        code
                    );
                    return Err(FetchError::UnhandledStatus { url: current, code });
                }
            }
        }
    }
}

/// Status code from the first `HTTP/<version> <code>` line, or 0.
pub fn status_code(head: &str) -> u16 {
    STATUS_RE
        .captures(head)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0)
}

/// Value of the `Location` header, if present and non-empty.
pub fn location(head: &str) -> Option<String> {
    LOCATION_RE
        .captures(head)
        .map(|caps| caps[1].to_string())
        .filter(|loc| !loc.is_empty())
}

/// Resolves a redirect target against the URL that produced it.
pub fn resolve_location(base: &str, location: &str) -> String {
    if location.contains("://") {
        return location.to_string();
    }
    let Some(scheme_end) = base.find("://") else {
        return location.to_string();
    };
    if let Some(rest) = location.strip_prefix("//") {
        return format!("{}://{}", &base[..scheme_end], rest);
    }

    let authority_start = scheme_end + 3;
    let path_start = base[authority_start..]
        .find(['/', '?', '#'])
        .map_or(base.len(), |i| authority_start + i);
    let origin = &base[..path_start];
    if location.starts_with('/') {
        return format!("{origin}{location}");
    }

    let path = base[path_start..].split(['?', '#']).next().unwrap_or("");
    let dir = path.rfind('/').map_or("/", |i| &path[..=i]);
    format!("{origin}{dir}{location}")
}
