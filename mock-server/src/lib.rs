//! In-memory mock of the ArchivesSpace REST backend.
//!
//! Implements just enough of the surface for client testing: form login
//! that mints a session token, token enforcement on every other route, and
//! repository/agent/accession CRUD answering with the ArchivesSpace mutation
//! envelope. Records are stored as raw JSON values keyed by id; stored
//! records carry their `uri` but no top-level `id` field, matching the real
//! server's get responses.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Form, Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Credentials the mock accepts.
pub const TEST_USERNAME: &str = "admin";
pub const TEST_PASSWORD: &str = "admin";

/// Session header checked on every authenticated route.
pub const SESSION_HEADER: &str = "X-ArchivesSpace-Session";

const AGENT_TYPES: [&str; 4] = ["people", "corporate_entities", "families", "software"];

#[derive(Default)]
pub struct Backend {
    token: Option<String>,
    repositories: HashMap<u64, Value>,
    // agents keyed by type segment, accessions keyed by repository id
    agents: HashMap<String, HashMap<u64, Value>>,
    accessions: HashMap<u64, HashMap<u64, Value>>,
}

pub type Db = Arc<RwLock<Backend>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Backend::default()));
    Router::new()
        .route("/users/{username}/login", post(login))
        .route("/logout", get(logout))
        .route("/repositories", get(list_repositories).post(create_repository))
        .route(
            "/repositories/{id}",
            get(get_repository).post(update_repository).delete(delete_repository),
        )
        .route("/agents/{atype}", get(list_agents).post(create_agent))
        .route(
            "/agents/{atype}/{id}",
            get(get_agent).post(update_agent).delete(delete_agent),
        )
        .route(
            "/repositories/{id}/accessions",
            get(list_accessions).post(create_accession),
        )
        .route(
            "/repositories/{id}/accessions/{aid}",
            get(get_accession).post(update_accession).delete(delete_accession),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn authorized(backend: &Backend, headers: &HeaderMap) -> Result<(), StatusCode> {
    let presented = headers.get(SESSION_HEADER).and_then(|v| v.to_str().ok());
    match (&backend.token, presented) {
        (Some(token), Some(header)) if token == header => Ok(()),
        _ => Err(StatusCode::FORBIDDEN),
    }
}

fn next_id(records: &HashMap<u64, Value>) -> u64 {
    records.keys().max().map_or(1, |max| max + 1)
}

fn envelope(status: &str, id: u64, lock_version: i64, uri: &str) -> Value {
    json!({
        "status": status,
        "id": id,
        "lock_version": lock_version,
        "stale": null,
        "uri": uri,
        "warnings": [],
    })
}

/// 200 body reporting a stale-record conflict, mirroring the real server's
/// habit of wrapping application errors in a success status.
fn stale_error() -> Json<Value> {
    Json(json!({
        "error": {"lock_version": ["The record you tried to update has been modified since you fetched it."]}
    }))
}

fn store(records: &mut HashMap<u64, Value>, id: u64, uri: String, mut record: Value) -> i64 {
    let lock_version = record
        .get("lock_version")
        .and_then(Value::as_i64)
        .unwrap_or(0);
    if let Some(obj) = record.as_object_mut() {
        obj.remove("id");
        obj.insert("uri".to_string(), Value::String(uri));
        obj.insert("lock_version".to_string(), json!(lock_version));
        obj.insert("created_by".to_string(), json!("admin"));
    }
    records.insert(id, record);
    lock_version
}

fn sorted_records(records: &HashMap<u64, Value>) -> Vec<Value> {
    let mut ids: Vec<u64> = records.keys().copied().collect();
    ids.sort_unstable();
    ids.iter().map(|id| records[id].clone()).collect()
}

fn sorted_ids(records: &HashMap<u64, Value>) -> Vec<u64> {
    let mut ids: Vec<u64> = records.keys().copied().collect();
    ids.sort_unstable();
    ids
}

fn wants_ids_only(query: &HashMap<String, String>) -> bool {
    query.get("all_ids").map(String::as_str) == Some("true")
}

// --- session ---

#[derive(Deserialize)]
struct LoginForm {
    password: String,
}

async fn login(
    State(db): State<Db>,
    Path(username): Path<String>,
    Form(form): Form<LoginForm>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if username != TEST_USERNAME || form.password != TEST_PASSWORD {
        return Err((StatusCode::FORBIDDEN, Json(json!({"error": "Login failed"}))));
    }
    let token = Uuid::new_v4().simple().to_string();
    db.write().await.token = Some(token.clone());
    Ok(Json(json!({"session": token})))
}

async fn logout(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    let mut backend = db.write().await;
    authorized(&backend, &headers)?;
    backend.token = None;
    Ok(Json(json!({"status": "Logged out"})))
}

// --- repositories ---

async fn list_repositories(
    State(db): State<Db>,
    headers: HeaderMap,
) -> Result<Json<Vec<Value>>, StatusCode> {
    let backend = db.read().await;
    authorized(&backend, &headers)?;
    Ok(Json(sorted_records(&backend.repositories)))
}

async fn create_repository(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(record): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut backend = db.write().await;
    authorized(&backend, &headers)?;
    let id = next_id(&backend.repositories);
    let uri = format!("/repositories/{id}");
    store(&mut backend.repositories, id, uri.clone(), record);
    Ok(Json(envelope("Created", id, 0, &uri)))
}

async fn get_repository(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Json<Value>, StatusCode> {
    let backend = db.read().await;
    authorized(&backend, &headers)?;
    backend
        .repositories
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update_repository(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(record): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut backend = db.write().await;
    authorized(&backend, &headers)?;
    let stored = backend.repositories.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    if record.get("lock_version") != stored.get("lock_version") {
        return Ok(stale_error());
    }
    let uri = format!("/repositories/{id}");
    let mut updated = record;
    let next_version = updated
        .get("lock_version")
        .and_then(Value::as_i64)
        .unwrap_or(0)
        + 1;
    if let Some(obj) = updated.as_object_mut() {
        obj.insert("lock_version".to_string(), json!(next_version));
    }
    store(&mut backend.repositories, id, uri.clone(), updated);
    Ok(Json(envelope("Updated", id, next_version, &uri)))
}

async fn delete_repository(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Json<Value>, StatusCode> {
    let mut backend = db.write().await;
    authorized(&backend, &headers)?;
    backend
        .repositories
        .remove(&id)
        .ok_or(StatusCode::NOT_FOUND)?;
    backend.accessions.remove(&id);
    Ok(Json(json!({"status": "Deleted", "id": id})))
}

// --- agents ---

fn valid_agent_type(atype: &str) -> Result<(), StatusCode> {
    if AGENT_TYPES.contains(&atype) {
        Ok(())
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

async fn list_agents(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(atype): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    let backend = db.read().await;
    authorized(&backend, &headers)?;
    valid_agent_type(&atype)?;
    let records = backend.agents.get(&atype);
    if wants_ids_only(&query) {
        let ids = records.map(sorted_ids).unwrap_or_default();
        Ok(Json(json!(ids)))
    } else {
        let full = records.map(sorted_records).unwrap_or_default();
        Ok(Json(json!(full)))
    }
}

async fn create_agent(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(atype): Path<String>,
    Json(record): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut backend = db.write().await;
    authorized(&backend, &headers)?;
    valid_agent_type(&atype)?;
    let records = backend.agents.entry(atype.clone()).or_default();
    let id = next_id(records);
    let uri = format!("/agents/{atype}/{id}");
    store(records, id, uri.clone(), record);
    Ok(Json(envelope("Created", id, 0, &uri)))
}

async fn get_agent(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((atype, id)): Path<(String, u64)>,
) -> Result<Json<Value>, StatusCode> {
    let backend = db.read().await;
    authorized(&backend, &headers)?;
    valid_agent_type(&atype)?;
    backend
        .agents
        .get(&atype)
        .and_then(|records| records.get(&id))
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update_agent(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((atype, id)): Path<(String, u64)>,
    Json(record): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut backend = db.write().await;
    authorized(&backend, &headers)?;
    valid_agent_type(&atype)?;
    let records = backend.agents.entry(atype.clone()).or_default();
    let stored = records.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    if record.get("lock_version") != stored.get("lock_version") {
        return Ok(stale_error());
    }
    let uri = format!("/agents/{atype}/{id}");
    let mut updated = record;
    let next_version = updated
        .get("lock_version")
        .and_then(Value::as_i64)
        .unwrap_or(0)
        + 1;
    if let Some(obj) = updated.as_object_mut() {
        obj.insert("lock_version".to_string(), json!(next_version));
    }
    store(records, id, uri.clone(), updated);
    Ok(Json(envelope("Updated", id, next_version, &uri)))
}

async fn delete_agent(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((atype, id)): Path<(String, u64)>,
) -> Result<Json<Value>, StatusCode> {
    let mut backend = db.write().await;
    authorized(&backend, &headers)?;
    valid_agent_type(&atype)?;
    backend
        .agents
        .get_mut(&atype)
        .and_then(|records| records.remove(&id))
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(json!({"status": "Deleted", "id": id})))
}

// --- accessions ---

async fn list_accessions(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(repo_id): Path<u64>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    let backend = db.read().await;
    authorized(&backend, &headers)?;
    let records = backend.accessions.get(&repo_id);
    if wants_ids_only(&query) {
        let ids = records.map(sorted_ids).unwrap_or_default();
        Ok(Json(json!(ids)))
    } else {
        let full = records.map(sorted_records).unwrap_or_default();
        Ok(Json(json!(full)))
    }
}

async fn create_accession(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(repo_id): Path<u64>,
    Json(record): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut backend = db.write().await;
    authorized(&backend, &headers)?;
    let records = backend.accessions.entry(repo_id).or_default();
    let id = next_id(records);
    let uri = format!("/repositories/{repo_id}/accessions/{id}");
    store(records, id, uri.clone(), record);
    Ok(Json(envelope("Created", id, 0, &uri)))
}

async fn get_accession(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((repo_id, id)): Path<(u64, u64)>,
) -> Result<Json<Value>, StatusCode> {
    let backend = db.read().await;
    authorized(&backend, &headers)?;
    backend
        .accessions
        .get(&repo_id)
        .and_then(|records| records.get(&id))
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update_accession(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((repo_id, id)): Path<(u64, u64)>,
    Json(record): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut backend = db.write().await;
    authorized(&backend, &headers)?;
    let records = backend.accessions.entry(repo_id).or_default();
    let stored = records.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    if record.get("lock_version") != stored.get("lock_version") {
        return Ok(stale_error());
    }
    let uri = format!("/repositories/{repo_id}/accessions/{id}");
    let mut updated = record;
    let next_version = updated
        .get("lock_version")
        .and_then(Value::as_i64)
        .unwrap_or(0)
        + 1;
    if let Some(obj) = updated.as_object_mut() {
        obj.insert("lock_version".to_string(), json!(next_version));
    }
    store(records, id, uri.clone(), updated);
    Ok(Json(envelope("Updated", id, next_version, &uri)))
}

async fn delete_accession(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((repo_id, id)): Path<(u64, u64)>,
) -> Result<Json<Value>, StatusCode> {
    let mut backend = db.write().await;
    authorized(&backend, &headers)?;
    backend
        .accessions
        .get_mut(&repo_id)
        .and_then(|records| records.remove(&id))
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(json!({"status": "Deleted", "id": id})))
}
