//! Request/response types and the host network interface.
//!
//! The agent never drives the network itself. It begins a fetch through
//! [`NetworkHost`] and receives an opaque ticket; the host performs the
//! transfer on its own schedule and later hands the outcome back through
//! the runtime, keyed by that ticket. Outcomes may arrive in any order.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::sync::atomic::{AtomicU64, Ordering};

/// Fetch ticket counter.
static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

/// Opaque handle identifying one in-flight network fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket(u64);

impl FetchTicket {
    /// Mint the next ticket.
    pub fn next() -> Self {
        Self(NEXT_TICKET.fetch_add(1, Ordering::SeqCst))
    }

    /// Raw value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
    Head,
}

impl RequestMethod {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
            RequestMethod::Head => "HEAD",
        }
    }
}

impl Default for RequestMethod {
    fn default() -> Self {
        Self::Get
    }
}

/// A request the controlled page (or the agent itself) wants fulfilled.
#[derive(Debug, Clone)]
pub struct Request {
    /// Request URL.
    pub url: String,
    /// HTTP method.
    pub method: RequestMethod,
    /// Request headers (name → value).
    pub headers: BTreeMap<String, String>,
    /// Request body, if any.
    pub body: Option<Vec<u8>>,
}

impl Request {
    /// Create a new GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: RequestMethod::Get,
            headers: BTreeMap::new(),
            body: None,
        }
    }
}

/// A captured HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    /// URL the response was fetched from (empty for synthesized values).
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// HTTP status text.
    pub status_text: String,
    /// Response headers (name → value).
    pub headers: BTreeMap<String, String>,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl Response {
    /// Create a new response with the given status.
    pub fn new(status: u16) -> Self {
        Self {
            url: String::new(),
            status,
            status_text: status_text_for(status).to_string(),
            headers: BTreeMap::new(),
            body: Vec::new(),
        }
    }

    /// Attach a body.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Attach the source URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Whether the status indicates success (2xx).
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Status text for a status code.
fn status_text_for(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

/// Network-level fetch failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// Could not reach the origin server.
    ConnectionFailed(String),
    /// The transfer started but was cut short.
    Interrupted(String),
}

impl core::fmt::Display for NetworkError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            NetworkError::ConnectionFailed(msg) => write!(f, "connection failed: {}", msg),
            NetworkError::Interrupted(msg) => write!(f, "transfer interrupted: {}", msg),
        }
    }
}

/// Outcome of a settled network fetch.
pub type FetchOutcome = Result<Response, NetworkError>;

/// Host-provided network interface.
///
/// `begin_fetch` returns immediately. The host owns the transfer from
/// there and must deliver the outcome for the returned ticket exactly
/// once; the agent tolerates late or repeated deliveries by ignoring
/// tickets it no longer tracks.
pub trait NetworkHost {
    /// Start a network fetch for `request`.
    fn begin_fetch(&mut self, request: Request) -> FetchTicket;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tickets_are_unique() {
        let a = FetchTicket::next();
        let b = FetchTicket::next();
        assert_ne!(a, b);
        assert!(b.raw() > a.raw());
    }

    #[test]
    fn get_request_defaults() {
        let req = Request::get("/static/logo.png");
        assert_eq!(req.url, "/static/logo.png");
        assert_eq!(req.method, RequestMethod::Get);
        assert!(req.headers.is_empty());
        assert!(req.body.is_none());
    }

    #[test]
    fn response_ok_range() {
        assert!(Response::new(200).ok());
        assert!(Response::new(204).ok());
        assert!(Response::new(299).ok());
        assert!(!Response::new(304).ok());
        assert!(!Response::new(404).ok());
        assert!(!Response::new(500).ok());
    }

    #[test]
    fn response_status_text() {
        assert_eq!(Response::new(200).status_text, "OK");
        assert_eq!(Response::new(404).status_text, "Not Found");
        assert_eq!(Response::new(999).status_text, "Unknown");
    }

    #[test]
    fn response_builders() {
        let resp = Response::new(200).with_url("/").with_body(b"<html>".to_vec());
        assert_eq!(resp.url, "/");
        assert_eq!(resp.body, b"<html>");
    }

    #[test]
    fn network_error_display() {
        let err = NetworkError::ConnectionFailed("dns".to_string());
        assert_eq!(alloc::format!("{}", err), "connection failed: dns");
    }
}
