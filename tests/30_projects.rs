mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn create_project_returns_project_and_provisions_settings() {
    let app = common::TestApp::new();

    let (status, body) = app.post("/api/projects", "user_a", json!({ "name": "Demo" })).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["message"], "Project created successfully");
    assert_eq!(body["data"]["name"], "Demo");
    assert_eq!(body["data"]["description"], "");
    assert!(body["data"].get("similarity_threshold").is_none(), "settings leaked into project");
    let id = body["data"]["id"].as_str().unwrap();

    let (status, body) = app.get(&format!("/api/projects/{}/settings", id), "user_a").await;
    assert_eq!(status, StatusCode::OK);
    let settings = &body["data"];
    assert_eq!(settings["project_id"], id);
    assert_eq!(settings["embedding_model"], "text-embedding-3-large");
    assert_eq!(settings["rag_strategy"], "basic");
    assert_eq!(settings["agent_type"], "agentic");
    assert_eq!(settings["chunks_per_search"], 10);
    assert_eq!(settings["final_context_size"], 5);
    assert_eq!(settings["similarity_threshold"], 0.3);
    assert_eq!(settings["number_of_queries"], 5);
    assert_eq!(settings["reranking_enabled"], true);
    assert_eq!(settings["reranking_model"], "rerank-english-v3.0");
    assert_eq!(settings["vector_weight"], 0.7);
    assert_eq!(settings["keyword_weight"], 0.3);
}

#[tokio::test]
async fn create_project_requires_name() {
    let app = common::TestApp::new();

    let (status, body) = app.post("/api/projects", "user_a", json!({ "description": "x" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "name");

    let (status, _) = app.post("/api/projects", "user_a", json!({ "name": "  " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.store.project_count().await, 0);
}

#[tokio::test]
async fn settings_failure_leaves_no_project() {
    let app = common::TestApp::new();
    app.store.fail_settings_inserts(true);

    let (status, body) = app.post("/api/projects", "user_a", json!({ "name": "Demo" })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().starts_with("Project creation failed"));
    assert_eq!(app.store.project_count().await, 0);

    let (_, body) = app.get("/api/projects", "user_a").await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn list_only_returns_callers_projects() {
    let app = common::TestApp::new();
    app.create_project("user_a", "Mine").await;
    app.create_project("user_b", "Theirs").await;

    let (status, body) = app.get("/api/projects", "user_a").await;
    assert_eq!(status, StatusCode::OK);
    let projects = body["data"].as_array().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["name"], "Mine");
}

#[tokio::test]
async fn get_project_is_owner_scoped() {
    let app = common::TestApp::new();
    let id = app.create_project("user_a", "Demo").await;

    let (status, body) = app.get(&format!("/api/projects/{}", id), "user_a").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id.as_str());

    let (status, _) = app.get(&format!("/api/projects/{}", id), "user_b").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_project_and_settings_are_not_found() {
    let app = common::TestApp::new();
    let missing = Uuid::new_v4();

    let (status, _) = app.get(&format!("/api/projects/{}", missing), "user_a").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.get(&format!("/api/projects/{}/settings", missing), "user_a").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn malformed_project_id_is_bad_request() {
    let app = common::TestApp::new();
    let (status, _) = app.get("/api/projects/not-a-uuid", "user_a").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_by_other_caller_leaves_project() {
    let app = common::TestApp::new();
    let id = app.create_project("user_a", "Demo").await;

    let (status, _) = app.delete(&format!("/api/projects/{}", id), "user_b").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(app.store.project_exists(id.parse().unwrap()).await);

    let (status, body) = app.delete(&format!("/api/projects/{}", id), "user_a").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id.as_str());
    assert!(!app.store.project_exists(id.parse().unwrap()).await);

    let (status, _) = app.get(&format!("/api/projects/{}/settings", id), "user_a").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn project_chats_are_newest_first_and_empty_is_ok() {
    let app = common::TestApp::new();
    let id = app.create_project("user_a", "Demo").await;

    let (status, body) = app.get(&format!("/api/projects/{}/chats", id), "user_a").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    for title in ["older", "newer"] {
        let (status, _) = app
            .post("/api/chats", "user_a", json!({ "title": title, "project_id": id }))
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = app.get(&format!("/api/projects/{}/chats", id), "user_a").await;
    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["newer", "older"]);

    let (status, body) = app.get(&format!("/api/projects/{}/chats", id), "user_b").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn settings_are_project_scoped_by_default() {
    let app = common::TestApp::new();
    let id = app.create_project("user_a", "Demo").await;

    let (status, _) = app.get(&format!("/api/projects/{}/settings", id), "user_b").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn settings_owner_check_can_be_enabled() {
    let app = common::TestApp::with_owner_check(true);
    let id = app.create_project("user_a", "Demo").await;

    let (status, _) = app.get(&format!("/api/projects/{}/settings", id), "user_b").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get(&format!("/api/projects/{}/settings", id), "user_a").await;
    assert_eq!(status, StatusCode::OK);
}

fn oversized_project_body() -> String {
    let limit = rag_api_rust::config::AppConfig::from_env().api.max_request_size_bytes;
    json!({ "name": "x".repeat(limit) }).to_string()
}

#[tokio::test]
async fn oversized_body_with_content_length_is_json_413() {
    let app = common::TestApp::new();
    let body = oversized_project_body();

    let request = axum::http::Request::builder()
        .method(axum::http::Method::POST)
        .uri("/api/projects")
        .header(axum::http::header::AUTHORIZATION, format!("Bearer {}", common::token_for("user_a")))
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .header(axum::http::header::CONTENT_LENGTH, body.len())
        .body(axum::body::Body::from(body))
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
    assert_eq!(app.store.project_count().await, 0);
}

#[tokio::test]
async fn oversized_streamed_body_is_json_413() {
    let app = common::TestApp::new();
    let body: serde_json::Value = serde_json::from_str(&oversized_project_body()).unwrap();

    let (status, body) = app.post("/api/projects", "user_a", body).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["success"], false);
    assert_eq!(app.store.project_count().await, 0);
}
