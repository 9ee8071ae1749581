//! Error types for the ArchivesSpace API client.
//!
//! # Design
//! One variant per failure kind so callers can match on what actually went
//! wrong: authentication, transport, HTTP status, JSON codec, id resolution,
//! or an application-level error the server reported inside a 2xx body.
//! Every variant carries enough context (status, body, offending value) to
//! log or retry; nothing is swallowed.

use std::fmt;

use serde_json::Value;

/// Errors returned by [`crate::AspaceClient`] and [`crate::Session`].
#[derive(Debug)]
pub enum ApiError {
    /// The session was constructed with a blank endpoint, username or
    /// password. Fatal: callers should abort startup rather than proceed.
    Config(String),

    /// Login was rejected or the login response carried no session token.
    Auth(String),

    /// The request never completed: DNS, connection, TLS or timeout failure.
    Transport(String),

    /// The server answered with a non-2xx status.
    Http { status: u16, body: String },

    /// The request payload could not be serialized to JSON.
    Serialization(String),

    /// The response body could not be deserialized into the expected shape.
    Deserialization(String),

    /// A record URI did not end in a numeric id segment.
    IdResolve(String),

    /// The server returned 2xx but populated the envelope's `error` field.
    Server(Value),

    /// Update/delete was attempted on a record the server has not assigned
    /// a URI to yet.
    MissingUri(&'static str),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Config(msg) => write!(f, "invalid configuration: {msg}"),
            ApiError::Auth(msg) => write!(f, "authentication failed: {msg}"),
            ApiError::Transport(msg) => write!(f, "transport error: {msg}"),
            ApiError::Http { status, body } => write!(f, "HTTP {status}: {body}"),
            ApiError::Serialization(msg) => write!(f, "serialization failed: {msg}"),
            ApiError::Deserialization(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
            ApiError::IdResolve(uri) => {
                write!(f, "no numeric id in URI {uri:?}")
            }
            ApiError::Server(err) => write!(f, "server reported error: {err}"),
            ApiError::MissingUri(kind) => {
                write!(f, "{kind} record has no server-assigned URI")
            }
        }
    }
}

impl std::error::Error for ApiError {}
