#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use rag_api_rust::auth::{generate_jwt, Claims, JwtVerifier};
use rag_api_rust::config::{AppConfig, AuthConfig};
use rag_api_rust::database::{MemoryStore, Store};
use rag_api_rust::AppState;

pub const TEST_SECRET: &str = "integration-test-secret";

/// In-process router over a fresh in-memory store
pub struct TestApp {
    pub store: MemoryStore,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_owner_check(false)
    }

    pub fn with_owner_check(enabled: bool) -> Self {
        let store = MemoryStore::new();
        let router = router_with_store(Arc::new(store.clone()), enabled);
        Self { store, router }
    }

    /// Send a request; `caller` adds a bearer token for that clerk_id
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        caller: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(clerk_id) = caller {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token_for(clerk_id)));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        send(&self.router, request).await
    }

    pub async fn get(&self, uri: &str, caller: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(caller), None).await
    }

    pub async fn post(&self, uri: &str, caller: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(caller), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, caller: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, Some(caller), None).await
    }

    /// Create a project through the API and return its id
    pub async fn create_project(&self, caller: &str, name: &str) -> String {
        let (status, body) = self
            .post("/api/projects", caller, serde_json::json!({ "name": name }))
            .await;
        assert_eq!(status, StatusCode::OK, "project creation failed: {}", body);
        body["data"]["id"].as_str().expect("project id").to_string()
    }
}

/// Application router over an arbitrary store
pub fn router_with_store(store: Arc<dyn Store>, settings_owner_check: bool) -> Router {
    let verifier = JwtVerifier::from_config(&auth_config()).expect("verifier");
    let state = AppState::new(store, Arc::new(verifier)).with_settings_owner_check(settings_owner_check);
    rag_api_rust::app(state, &AppConfig::from_env())
}

/// Drive one request through the router and decode the JSON body
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

pub fn auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: TEST_SECRET.to_string(),
        jwt_public_key: None,
        jwt_issuer: None,
        jwt_leeway_secs: 0,
        token_expiry_hours: 1,
    }
}

pub fn token_for(clerk_id: &str) -> String {
    generate_jwt(TEST_SECRET, &Claims::new(clerk_id, 1)).expect("token")
}

/// The real server binary on a free port, killed on drop
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    pub fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let child = Command::new(env!("CARGO_BIN_EXE_rag-api-rust"))
            .env("RAG_API_PORT", port.to_string())
            .env("APP_ENV", "development")
            .env("STORAGE_BACKEND", "memory")
            .env("AUTH_JWT_SECRET", TEST_SECRET)
            .env_remove("AUTH_JWT_PUBLIC_KEY")
            .env_remove("AUTH_JWT_ISSUER")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    pub async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == reqwest::StatusCode::OK
                    || resp.status() == reqwest::StatusCode::SERVICE_UNAVAILABLE
                {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub async fn start_server() -> Result<TestServer> {
    let server = TestServer::spawn()?;
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}
