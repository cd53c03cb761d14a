//! Test helpers for spinning up a full server instance
//!
//! The server runs against in-memory repositories so tests need no external
//! services. The HTTP surface, middleware stack, and gateway are the real
//! production code paths.

use std::sync::Arc;

use reqwest::{Client, Response, StatusCode};
use rooms_api::server::create_app;
use rooms_api::state::AppState;
use rooms_common::{AppConfig, JwtService};
use rooms_core::entities::User;
use rooms_core::{Snowflake, SnowflakeGenerator};
use rooms_db::create_pool_lazy;
use rooms_gateway::ConnectionManager;
use rooms_service::services::{ServiceContext, ServiceContextBuilder};

use crate::fakes::InMemoryStore;
use crate::fixtures::test_config;

/// Test server instance that manages the full application lifecycle
pub struct TestServer {
    /// Base URL of the running server
    pub base_url: String,
    /// HTTP client
    pub client: Client,
    /// Shared in-memory store backing all repositories
    pub store: Arc<InMemoryStore>,
    /// The gateway connection manager, exposed so tests can attach sessions
    pub connection_manager: Arc<ConnectionManager>,
    /// Token issuer matching the server's secret
    jwt_service: Arc<JwtService>,
    server_handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Start a server on an ephemeral port
    pub async fn spawn() -> anyhow::Result<Self> {
        let config = test_config();
        let (state, store, connection_manager, jwt_service) = build_state(&config)?;

        let app = create_app(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let server_handle = tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app).await {
                eprintln!("test server error: {err}");
            }
        });

        Ok(Self {
            base_url: format!("http://{addr}"),
            client: Client::new(),
            store,
            connection_manager,
            jwt_service,
            server_handle,
        })
    }

    /// Register a user in the store and return a bearer token for them
    pub fn register(&self, user: &User) -> anyhow::Result<String> {
        self.store.put_user(user.clone());
        let token = self.jwt_service.issue_token(user.id)?;
        Ok(token)
    }

    /// GET with a bearer token
    pub async fn get(&self, path: &str, token: &str) -> anyhow::Result<Response> {
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .bearer_auth(token)
            .send()
            .await?;
        Ok(response)
    }

    /// GET without authentication
    pub async fn get_unauthenticated(&self, path: &str) -> anyhow::Result<Response> {
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await?;
        Ok(response)
    }

    /// POST a JSON body with a bearer token
    pub async fn post(
        &self,
        path: &str,
        token: &str,
        body: &serde_json::Value,
    ) -> anyhow::Result<Response> {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        Ok(response)
    }

    /// POST with no body
    pub async fn post_empty(&self, path: &str, token: &str) -> anyhow::Result<Response> {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .bearer_auth(token)
            .send()
            .await?;
        Ok(response)
    }

    /// PATCH a JSON body with a bearer token
    pub async fn patch(
        &self,
        path: &str,
        token: &str,
        body: &serde_json::Value,
    ) -> anyhow::Result<Response> {
        let response = self
            .client
            .patch(format!("{}{path}", self.base_url))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        Ok(response)
    }

    /// DELETE with a bearer token
    pub async fn delete(&self, path: &str, token: &str) -> anyhow::Result<Response> {
        let response = self
            .client
            .delete(format!("{}{path}", self.base_url))
            .bearer_auth(token)
            .send()
            .await?;
        Ok(response)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.server_handle.abort();
    }
}

/// Build the application state on top of the in-memory store
fn build_state(
    config: &AppConfig,
) -> anyhow::Result<(
    AppState,
    Arc<InMemoryStore>,
    Arc<ConnectionManager>,
    Arc<JwtService>,
)> {
    let store = Arc::new(InMemoryStore::new());
    let connection_manager = ConnectionManager::new_shared();
    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.token_expiry,
    ));
    let snowflake_generator = Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id));

    let service_context = ServiceContextBuilder::new()
        .user_repo(store.clone())
        .group_repo(store.clone())
        .message_repo(store.clone())
        .broadcaster(connection_manager.clone())
        .jwt_service(jwt_service.clone())
        .snowflake_generator(snowflake_generator)
        .build()
        .map_err(|err| anyhow::anyhow!("service context: {err}"))?;

    // The pool never connects; readiness probes against it report unhealthy,
    // which is itself exercised by the tests.
    let db_config = rooms_db::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
        acquire_timeout: std::time::Duration::from_secs(1),
        ..Default::default()
    };
    let pool = create_pool_lazy(&db_config)?;
    let state = AppState::new(service_context, connection_manager.clone(), pool, config.clone());

    Ok((state, store, connection_manager, jwt_service))
}

/// Build a bare [`ServiceContext`] for tests that drive services directly
pub fn service_context_with(
    store: Arc<InMemoryStore>,
    connection_manager: Arc<ConnectionManager>,
) -> ServiceContext {
    let jwt_service = Arc::new(JwtService::new("gateway-test-secret", 3600));
    let snowflake_generator = Arc::new(SnowflakeGenerator::new(1));

    ServiceContextBuilder::new()
        .user_repo(store.clone())
        .group_repo(store.clone())
        .message_repo(store)
        .broadcaster(connection_manager)
        .jwt_service(jwt_service)
        .snowflake_generator(snowflake_generator)
        .build()
        .expect("all dependencies provided")
}

/// Assert a response status and return the parsed JSON body
pub async fn assert_json(
    response: Response,
    expected: StatusCode,
) -> anyhow::Result<serde_json::Value> {
    let status = response.status();
    let body = response.text().await?;
    assert_eq!(status, expected, "unexpected status, body: {body}");
    let json: serde_json::Value = serde_json::from_str(&body)?;
    Ok(json)
}

/// Assert a response status, discarding the body
pub async fn assert_status(response: Response, expected: StatusCode) -> anyhow::Result<()> {
    let status = response.status();
    let body = response.text().await?;
    assert_eq!(status, expected, "unexpected status, body: {body}");
    Ok(())
}

/// Extract a string `id` field from an `{"data": {...}}` envelope
pub fn data_id(json: &serde_json::Value) -> Snowflake {
    json["data"]["id"]
        .as_str()
        .and_then(|s| Snowflake::parse(s).ok())
        .expect("response data carries an id")
}
