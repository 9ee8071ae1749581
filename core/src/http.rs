//! HTTP transport types shared by the builder and executor layers.
//!
//! # Design
//! Requests and responses are plain data. [`crate::AspaceClient`] builds
//! `HttpRequest` values and parses `HttpResponse` values without touching the
//! network; [`crate::Session`] (or any other executor) performs the actual
//! round-trip in between. The split keeps every build/parse path deterministic
//! and testable without a server.
//!
//! All fields use owned types (`String`, `Vec`) so values can be moved across
//! threads or stored freely.

/// Header carrying the session token on every authenticated request.
pub const SESSION_HEADER: &str = "X-ArchivesSpace-Session";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

/// An HTTP request described as plain data.
///
/// Built by `AspaceClient::build_*` methods. `path` is the full URL; the
/// executor adds the session header before dispatch.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
///
/// Constructed by the executor after the round-trip, then handed to
/// `AspaceClient::parse_*` methods for status checking and deserialization.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// True for any 2xx status. Status interpretation is deliberately uniform
    /// across GET/POST/DELETE; no method gets a lenient path.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
