use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, SESSION_HEADER, TEST_PASSWORD, TEST_USERNAME};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn login(app: &Router) -> String {
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/users/{TEST_USERNAME}/login"))
                .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(format!("password={TEST_PASSWORD}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    body["session"].as_str().unwrap().to_string()
}

fn json_request(method: &str, uri: &str, token: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .header(SESSION_HEADER, token)
        .body(body.to_string())
        .unwrap()
}

fn bare_request(method: &str, uri: &str, token: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(SESSION_HEADER, token)
        .body(String::new())
        .unwrap()
}

// --- session ---

#[tokio::test]
async fn login_returns_session_token() {
    let app = app();
    let token = login(&app).await;
    assert!(!token.is_empty());
}

#[tokio::test]
async fn login_with_wrong_password_is_forbidden() {
    let app = app();
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/users/{TEST_USERNAME}/login"))
                .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body("password=wrong".to_string())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "Login failed");
}

#[tokio::test]
async fn routes_require_session_header() {
    let app = app();
    login(&app).await;
    let resp = app
        .oneshot(Request::builder().uri("/repositories").body(String::new()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn logout_invalidates_the_token() {
    let app = app();
    let token = login(&app).await;

    let resp = app
        .clone()
        .oneshot(bare_request("GET", "/logout", &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .oneshot(bare_request("GET", "/repositories", &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

// --- repositories ---

#[tokio::test]
async fn repository_lifecycle() {
    let app = app();
    let token = login(&app).await;

    // Create answers with the mutation envelope.
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/repositories",
            &token,
            r#"{"repo_code":"MS","name":"Manuscripts","lock_version":0}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let env = body_json(resp).await;
    assert_eq!(env["status"], "Created");
    assert_eq!(env["id"], 1);
    assert_eq!(env["uri"], "/repositories/1");
    assert_eq!(env["warnings"], serde_json::json!([]));

    // Get returns the record with a uri but no top-level id.
    let resp = app
        .clone()
        .oneshot(bare_request("GET", "/repositories/1", &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let record = body_json(resp).await;
    assert_eq!(record["repo_code"], "MS");
    assert_eq!(record["uri"], "/repositories/1");
    assert!(record.get("id").is_none());

    // Update with the current lock version succeeds and bumps it.
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/repositories/1",
            &token,
            r#"{"repo_code":"MS","name":"Manuscripts and Rare Books","lock_version":0}"#,
        ))
        .await
        .unwrap();
    let env = body_json(resp).await;
    assert_eq!(env["status"], "Updated");
    assert_eq!(env["lock_version"], 1);

    // Update with a stale lock version reports an error inside a 200.
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/repositories/1",
            &token,
            r#"{"repo_code":"MS","name":"Stale","lock_version":0}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert!(body.get("error").is_some());

    // Delete, then the record is gone.
    let resp = app
        .clone()
        .oneshot(bare_request("DELETE", "/repositories/1", &token))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["status"], "Deleted");
    assert_eq!(body["id"], 1);

    let resp = app
        .oneshot(bare_request("GET", "/repositories/1", &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- agents ---

#[tokio::test]
async fn agent_creation_and_id_listing() {
    let app = app();
    let token = login(&app).await;

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/agents/people",
            &token,
            r#"{"names":[{"primary_name":"Doiel","lock_version":0}],"lock_version":0}"#,
        ))
        .await
        .unwrap();
    let env = body_json(resp).await;
    assert_eq!(env["status"], "Created");
    assert_eq!(env["uri"], "/agents/people/1");

    let resp = app
        .clone()
        .oneshot(bare_request("GET", "/agents/people?all_ids=true", &token))
        .await
        .unwrap();
    let ids = body_json(resp).await;
    assert_eq!(ids, serde_json::json!([1]));

    // Other agent collections stay empty.
    let resp = app
        .clone()
        .oneshot(bare_request("GET", "/agents/families?all_ids=true", &token))
        .await
        .unwrap();
    let ids = body_json(resp).await;
    assert_eq!(ids, serde_json::json!([]));

    // Unknown agent type is not routable.
    let resp = app
        .oneshot(bare_request("GET", "/agents/robots?all_ids=true", &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- accessions ---

#[tokio::test]
async fn accession_ids_list_in_order() {
    let app = app();
    let token = login(&app).await;

    for n in 1..=4 {
        let resp = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/repositories/2/accessions",
                &token,
                &format!(r#"{{"title":"Accession {n}","lock_version":0}}"#),
            ))
            .await
            .unwrap();
        let env = body_json(resp).await;
        assert_eq!(env["id"], n);
        assert_eq!(env["uri"], format!("/repositories/2/accessions/{n}"));
    }

    let resp = app
        .oneshot(bare_request("GET", "/repositories/2/accessions?all_ids=true", &token))
        .await
        .unwrap();
    let ids = body_json(resp).await;
    assert_eq!(ids, serde_json::json!([1, 2, 3, 4]));
}
