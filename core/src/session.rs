//! Authenticated session and blocking request executor.
//!
//! # Design
//! [`Session`] owns the credentials, the session token and a configured
//! `ureq` agent; [`crate::AspaceClient`] does all request building and
//! response parsing. Every call is synchronous: issue the request, read the
//! full body, decode, return. The agent carries an explicit global timeout so
//! no call can hang indefinitely.
//!
//! One `Session` serves one caller at a time: `login`/`logout` take
//! `&mut self`, which rules out concurrent token mutation at compile time.
//! Requests themselves are built per call from immutable parts, so there is
//! no shared in-flight request state.

use std::time::Duration;

use crate::client::AspaceClient;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, SESSION_HEADER};
use crate::types::{Accession, Agent, AgentType, Repository, ResponseEnvelope};

/// Timeout applied to every request unless overridden via
/// [`Session::with_timeout`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// An authenticated connection to one ArchivesSpace backend.
#[derive(Debug)]
pub struct Session {
    client: AspaceClient,
    agent: ureq::Agent,
    username: String,
    password: String,
    token: Option<String>,
}

impl Session {
    /// Create a session with [`DEFAULT_TIMEOUT`].
    ///
    /// A blank endpoint, username or password is a configuration error;
    /// callers should treat it as fatal at startup.
    pub fn new(base_url: &str, username: &str, password: &str) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, username, password, DEFAULT_TIMEOUT)
    }

    /// Create a session with an explicit per-request timeout.
    pub fn with_timeout(
        base_url: &str,
        username: &str,
        password: &str,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        if base_url.trim().is_empty() {
            return Err(ApiError::Config("endpoint URL is empty".to_string()));
        }
        if username.trim().is_empty() {
            return Err(ApiError::Config("username is empty".to_string()));
        }
        if password.trim().is_empty() {
            return Err(ApiError::Config("password is empty".to_string()));
        }

        // Non-2xx statuses must come back as data; the client layer decides
        // what they mean per operation.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();

        Ok(Self {
            client: AspaceClient::new(base_url),
            agent,
            username: username.to_string(),
            password: password.to_string(),
            token: None,
        })
    }

    /// True iff a login has succeeded and the token has not been cleared.
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Authenticate and store the session token for all subsequent calls.
    pub fn login(&mut self) -> Result<(), ApiError> {
        let req = self.client.build_login(&self.username, &self.password);
        let response = self.execute(&req)?;
        let token = self.client.parse_login(response)?;
        tracing::debug!(username = %self.username, "login succeeded");
        self.token = Some(token);
        Ok(())
    }

    /// Invalidate the session server-side, best effort.
    ///
    /// The token is cleared even when the request fails; the caller is
    /// expected to discard the session either way.
    pub fn logout(&mut self) -> Result<(), ApiError> {
        if self.token.is_none() {
            return Ok(());
        }
        let req = self.client.build_logout();
        let result = self.execute(&req);
        self.token = None;
        tracing::debug!("session token cleared");
        result.map(|_| ())
    }

    /// Execute one request, attaching the session token when one is held.
    ///
    /// Transport-level failures (DNS, connection, TLS, timeout) map to
    /// [`ApiError::Transport`]; any received response, whatever its status,
    /// is returned as data for the parse layer to interpret.
    fn execute(&self, req: &HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::debug!(method = ?req.method, path = %req.path, "dispatching request");

        let result = match req.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&req.path);
                for (name, value) in &req.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                if let Some(token) = self.token.as_deref() {
                    builder = builder.header(SESSION_HEADER, token);
                }
                builder.call()
            }
            HttpMethod::Delete => {
                let mut builder = self.agent.delete(&req.path);
                for (name, value) in &req.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                if let Some(token) = self.token.as_deref() {
                    builder = builder.header(SESSION_HEADER, token);
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(&req.path);
                for (name, value) in &req.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                if let Some(token) = self.token.as_deref() {
                    builder = builder.header(SESSION_HEADER, token);
                }
                match req.body.as_deref() {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body,
        })
    }

    // --- repositories ---

    pub fn create_repository(&self, repo: &Repository) -> Result<ResponseEnvelope, ApiError> {
        let req = self.client.build_create_repository(repo)?;
        self.client.parse_envelope(self.execute(&req)?)
    }

    pub fn get_repository(&self, id: u64) -> Result<Repository, ApiError> {
        let req = self.client.build_get_repository(id);
        self.client.parse_get_repository(id, self.execute(&req)?)
    }

    pub fn update_repository(&self, repo: &Repository) -> Result<ResponseEnvelope, ApiError> {
        let req = self.client.build_update_repository(repo)?;
        self.client.parse_envelope(self.execute(&req)?)
    }

    pub fn delete_repository(&self, id: u64) -> Result<ResponseEnvelope, ApiError> {
        let req = self.client.build_delete_repository(id);
        self.client.parse_envelope(self.execute(&req)?)
    }

    pub fn list_repositories(&self) -> Result<Vec<Repository>, ApiError> {
        let req = self.client.build_list_repositories();
        self.client.parse_list_repositories(self.execute(&req)?)
    }

    // --- agents ---

    pub fn create_agent(
        &self,
        agent_type: AgentType,
        agent: &Agent,
    ) -> Result<ResponseEnvelope, ApiError> {
        let req = self.client.build_create_agent(agent_type, agent)?;
        self.client.parse_envelope(self.execute(&req)?)
    }

    pub fn get_agent(&self, agent_type: AgentType, id: u64) -> Result<Agent, ApiError> {
        let req = self.client.build_get_agent(agent_type, id);
        self.client.parse_get_agent(self.execute(&req)?)
    }

    pub fn update_agent(&self, agent: &Agent) -> Result<ResponseEnvelope, ApiError> {
        let req = self.client.build_update_agent(agent)?;
        self.client.parse_envelope(self.execute(&req)?)
    }

    pub fn delete_agent(&self, agent: &Agent) -> Result<ResponseEnvelope, ApiError> {
        let req = self.client.build_delete_agent(agent)?;
        self.client.parse_envelope(self.execute(&req)?)
    }

    /// List the numeric ids of every agent of the given type.
    pub fn list_agents(&self, agent_type: AgentType) -> Result<Vec<u64>, ApiError> {
        let req = self.client.build_list_agent_ids(agent_type);
        self.client.parse_id_list(self.execute(&req)?)
    }

    // --- accessions ---

    pub fn create_accession(
        &self,
        repo_id: u64,
        accession: &Accession,
    ) -> Result<ResponseEnvelope, ApiError> {
        let req = self.client.build_create_accession(repo_id, accession)?;
        self.client.parse_envelope(self.execute(&req)?)
    }

    pub fn get_accession(&self, repo_id: u64, accession_id: u64) -> Result<Accession, ApiError> {
        let req = self.client.build_get_accession(repo_id, accession_id);
        self.client.parse_get_accession(self.execute(&req)?)
    }

    pub fn update_accession(&self, accession: &Accession) -> Result<ResponseEnvelope, ApiError> {
        let req = self.client.build_update_accession(accession)?;
        self.client.parse_envelope(self.execute(&req)?)
    }

    pub fn delete_accession(&self, accession: &Accession) -> Result<ResponseEnvelope, ApiError> {
        let req = self.client.build_delete_accession(accession)?;
        self.client.parse_envelope(self.execute(&req)?)
    }

    /// List the numeric ids of every accession in the repository.
    pub fn list_accessions(&self, repo_id: u64) -> Result<Vec<u64>, ApiError> {
        let req = self.client.build_list_accession_ids(repo_id);
        self.client.parse_id_list(self.execute(&req)?)
    }
}
