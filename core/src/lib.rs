//! Client library for the ArchivesSpace REST API.
//!
//! # Overview
//! Marshals typed archival records (repositories, agents, accessions and
//! their subrecords) to and from JSON, issues authenticated blocking HTTP
//! requests, and unmarshals responses into typed records or the uniform
//! mutation envelope.
//!
//! # Design
//! - [`AspaceClient`] is stateless — it holds only `base_url`. Each operation
//!   is split into `build_*` (produces an [`HttpRequest`]) and `parse_*`
//!   (consumes an [`HttpResponse`]), so every codec path can be tested
//!   without a server.
//! - [`Session`] owns credentials, the session token and a timeout-bearing
//!   `ureq` agent, and composes build → execute → parse into one call per
//!   REST operation. The token is attached to every request from login until
//!   logout.
//! - Record ids are derived from the trailing segment of server-assigned
//!   URIs ([`uri::resolve_id`]) because several endpoints omit the numeric
//!   id from response bodies.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod session;
pub mod types;
pub mod uri;

pub use client::AspaceClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, SESSION_HEADER};
pub use session::{Session, DEFAULT_TIMEOUT};
pub use types::{
    Accession, Agent, AgentContact, AgentType, AuditInfo, Date, Extent, ExternalId, NamePerson,
    NoteBiogHist, NoteText, Repository, ResponseEnvelope, UserDefined,
};
