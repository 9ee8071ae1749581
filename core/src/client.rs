//! Stateless request builder and response parser for the ArchivesSpace API.
//!
//! # Design
//! `AspaceClient` holds only a `base_url` and carries no mutable state
//! between calls: every operation constructs its full path and query fresh,
//! so one client value can serve any number of callers. Each operation is
//! split into a `build_*` method that produces an [`HttpRequest`] and a
//! `parse_*` method that consumes an [`HttpResponse`]; [`crate::Session`]
//! (or a test harness) executes the round-trip in between.
//!
//! Builders never attach the session token; that is the executor's job.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Accession, Agent, AgentType, Repository, ResponseEnvelope};
use crate::uri::resolve_id;

/// Stateless builder/parser for the ArchivesSpace REST API.
#[derive(Debug, Clone)]
pub struct AspaceClient {
    base_url: String,
}

impl AspaceClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn get(&self, path: String) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}{path}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    fn post_json(&self, path: String, body: String) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}{path}", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        }
    }

    fn delete(&self, path: String) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}{path}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    // --- session ---

    /// Form-encoded credential submission to the login path.
    pub fn build_login(&self, username: &str, password: &str) -> HttpRequest {
        let user = utf8_percent_encode(username, NON_ALPHANUMERIC);
        let body = format!("password={}", utf8_percent_encode(password, NON_ALPHANUMERIC));
        HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/users/{user}/login", self.base_url),
            headers: vec![(
                "content-type".to_string(),
                "application/x-www-form-urlencoded".to_string(),
            )],
            body: Some(body),
        }
    }

    /// Extract the session token from a login response.
    ///
    /// Anything other than a 200 with a JSON body carrying a string
    /// `session` field is an [`ApiError::Auth`].
    pub fn parse_login(&self, response: HttpResponse) -> Result<String, ApiError> {
        if response.status != 200 {
            return Err(ApiError::Auth(format!(
                "login rejected with HTTP {}: {}",
                response.status, response.body
            )));
        }
        let body: serde_json::Value = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::Auth(format!("malformed login response: {e}")))?;
        match body.get("session").and_then(|s| s.as_str()) {
            Some(token) if !token.is_empty() => Ok(token.to_string()),
            _ => Err(ApiError::Auth("login response has no session token".to_string())),
        }
    }

    pub fn build_logout(&self) -> HttpRequest {
        self.get("/logout".to_string())
    }

    // --- repositories ---

    pub fn build_create_repository(&self, repo: &Repository) -> Result<HttpRequest, ApiError> {
        Ok(self.post_json("/repositories".to_string(), encode(repo)?))
    }

    pub fn build_get_repository(&self, id: u64) -> HttpRequest {
        self.get(format!("/repositories/{id}"))
    }

    pub fn build_update_repository(&self, repo: &Repository) -> Result<HttpRequest, ApiError> {
        let uri = repo.uri.as_deref().ok_or(ApiError::MissingUri("repository"))?;
        Ok(self.post_json(uri.to_string(), encode(repo)?))
    }

    pub fn build_delete_repository(&self, id: u64) -> HttpRequest {
        self.delete(format!("/repositories/{id}"))
    }

    pub fn build_list_repositories(&self) -> HttpRequest {
        self.get("/repositories".to_string())
    }

    /// Decode a repository, backfilling the caller-supplied id when the body
    /// carries none (the get-by-id endpoint omits it).
    pub fn parse_get_repository(
        &self,
        id: u64,
        response: HttpResponse,
    ) -> Result<Repository, ApiError> {
        let mut repo: Repository = decode(&response)?;
        if repo.id.is_none() {
            repo.id = Some(id);
        }
        Ok(repo)
    }

    /// Decode the full repository list, deriving each id from its URI.
    pub fn parse_list_repositories(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<Repository>, ApiError> {
        let mut repos: Vec<Repository> = decode(&response)?;
        for repo in &mut repos {
            if repo.id.is_none() {
                if let Some(uri) = repo.uri.as_deref() {
                    repo.id = resolve_id(uri).ok();
                }
            }
        }
        Ok(repos)
    }

    // --- agents ---

    pub fn build_create_agent(
        &self,
        agent_type: AgentType,
        agent: &Agent,
    ) -> Result<HttpRequest, ApiError> {
        Ok(self.post_json(format!("/agents/{agent_type}"), encode(agent)?))
    }

    pub fn build_get_agent(&self, agent_type: AgentType, id: u64) -> HttpRequest {
        self.get(format!("/agents/{agent_type}/{id}"))
    }

    pub fn build_update_agent(&self, agent: &Agent) -> Result<HttpRequest, ApiError> {
        let uri = agent.uri.as_deref().ok_or(ApiError::MissingUri("agent"))?;
        Ok(self.post_json(uri.to_string(), encode(agent)?))
    }

    pub fn build_delete_agent(&self, agent: &Agent) -> Result<HttpRequest, ApiError> {
        let uri = agent.uri.as_deref().ok_or(ApiError::MissingUri("agent"))?;
        Ok(self.delete(uri.to_string()))
    }

    pub fn build_list_agent_ids(&self, agent_type: AgentType) -> HttpRequest {
        self.get(format!("/agents/{agent_type}?all_ids=true"))
    }

    /// Decode an agent and derive its id from the returned URI.
    pub fn parse_get_agent(&self, response: HttpResponse) -> Result<Agent, ApiError> {
        let mut agent: Agent = decode(&response)?;
        let uri = agent.uri.as_deref().ok_or(ApiError::MissingUri("agent"))?;
        agent.id = Some(resolve_id(uri)?);
        Ok(agent)
    }

    // --- accessions ---

    pub fn build_create_accession(
        &self,
        repo_id: u64,
        accession: &Accession,
    ) -> Result<HttpRequest, ApiError> {
        Ok(self.post_json(format!("/repositories/{repo_id}/accessions"), encode(accession)?))
    }

    pub fn build_get_accession(&self, repo_id: u64, accession_id: u64) -> HttpRequest {
        self.get(format!("/repositories/{repo_id}/accessions/{accession_id}"))
    }

    pub fn build_update_accession(&self, accession: &Accession) -> Result<HttpRequest, ApiError> {
        let uri = accession.uri.as_deref().ok_or(ApiError::MissingUri("accession"))?;
        Ok(self.post_json(uri.to_string(), encode(accession)?))
    }

    pub fn build_delete_accession(&self, accession: &Accession) -> Result<HttpRequest, ApiError> {
        let uri = accession.uri.as_deref().ok_or(ApiError::MissingUri("accession"))?;
        Ok(self.delete(uri.to_string()))
    }

    pub fn build_list_accession_ids(&self, repo_id: u64) -> HttpRequest {
        self.get(format!("/repositories/{repo_id}/accessions?all_ids=true"))
    }

    /// Decode an accession and derive its id from the returned URI.
    pub fn parse_get_accession(&self, response: HttpResponse) -> Result<Accession, ApiError> {
        let mut accession: Accession = decode(&response)?;
        let uri = accession.uri.as_deref().ok_or(ApiError::MissingUri("accession"))?;
        accession.id = Some(resolve_id(uri)?);
        Ok(accession)
    }

    // --- shared parsers ---

    /// Decode an id array returned by `all_ids=true` list endpoints.
    pub fn parse_id_list(&self, response: HttpResponse) -> Result<Vec<u64>, ApiError> {
        decode(&response)
    }

    /// Decode the uniform mutation envelope.
    ///
    /// The server sometimes reports failure inside a 2xx body by populating
    /// the envelope's `error` field; that surfaces as [`ApiError::Server`].
    pub fn parse_envelope(&self, response: HttpResponse) -> Result<ResponseEnvelope, ApiError> {
        let envelope: ResponseEnvelope = decode(&response)?;
        if let Some(error) = envelope.error {
            return Err(ApiError::Server(error));
        }
        Ok(envelope)
    }
}

fn encode<T: Serialize>(record: &T) -> Result<String, ApiError> {
    serde_json::to_string(record).map_err(|e| ApiError::Serialization(e.to_string()))
}

/// Strict status check, then JSON decode. All methods are treated uniformly:
/// any non-2xx status is an error before the body is interpreted.
fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    if !response.is_success() {
        return Err(ApiError::Http {
            status: response.status,
            body: response.body.clone(),
        });
    }
    serde_json::from_str(response.body.trim())
        .map_err(|e| ApiError::Deserialization(e.to_string()))
}
