/// Common test utilities for API integration tests
///
/// Every test gets its own router backed by a fresh in-memory store, so
/// tests run without a database and never share state.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use obras_api::app::{build_router, AppState};
use obras_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use obras_shared::{store::memory::MemoryStore, Marketplace};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::Service as _;
use uuid::Uuid;

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

pub const TEST_PASSWORD: &str = "senha-forte-123";

/// A registered user as seen by the tests
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub token: String,
}

impl TestUser {
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Test context containing the router under test
pub struct TestContext {
    pub app: axum::Router,
    pub config: Config,
}

impl TestContext {
    pub fn new() -> Self {
        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
                production: false,
            },
            database: DatabaseConfig {
                url: "postgresql://unused".to_string(),
                max_connections: 1,
            },
            jwt: JwtConfig {
                secret: TEST_SECRET.to_string(),
                expiration_days: 7,
            },
        };

        let market = Marketplace::new(Arc::new(MemoryStore::new()), TEST_SECRET);
        let app = build_router(AppState::new(market, config.clone()));

        TestContext { app, config }
    }

    /// Sends a request and returns the status with the parsed JSON body
    ///
    /// Empty bodies come back as `Value::Null`.
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        auth: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            builder = builder.header("authorization", auth);
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                panic!("non-JSON body ({}): {}", status, String::from_utf8_lossy(&bytes))
            })
        };

        (status, value)
    }

    /// Registers a user with the given role and a unique email
    pub async fn register(&self, name: &str, role: &str) -> TestUser {
        let email = format!("{}-{}@example.com", role, Uuid::new_v4());
        let (status, body) = self
            .send(
                "POST",
                "/api/auth/register",
                None,
                Some(json!({
                    "name": name,
                    "email": email,
                    "password": TEST_PASSWORD,
                    "phone": "11999990000",
                    "role": role,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

        TestUser {
            id: body["user"]["id"].as_str().unwrap().parse().unwrap(),
            token: body["token"].as_str().unwrap().to_string(),
        }
    }

    /// Creates a project as `client` and returns its id
    pub async fn create_project(&self, client: &TestUser, title: &str) -> String {
        let (status, body) = self
            .send(
                "POST",
                "/api/projects",
                Some(&client.auth_header()),
                Some(json!({
                    "title": title,
                    "description": "Serviço completo",
                    "category": "reforma",
                    "location": "São Paulo",
                    "budget_min": 1000.0,
                    "budget_max": 5000.0,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create project failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }

    /// Submits a quote as `provider` and returns its id
    pub async fn submit_quote(&self, provider: &TestUser, project_id: &str, price: f64) -> String {
        let (status, body) = self
            .send(
                "POST",
                "/api/quotes",
                Some(&provider.auth_header()),
                Some(json!({
                    "project_id": project_id,
                    "price": price,
                    "description": "Material incluso",
                    "estimated_duration": "2 semanas",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "submit quote failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }
}
