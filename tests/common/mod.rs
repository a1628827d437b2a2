#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use devconnect_api::app::{router, AppState};
use devconnect_api::auth::TokenVerifier;
use devconnect_api::config::GithubConfig;
use devconnect_api::database::{DocumentStore, MemoryStore};
use devconnect_api::models::User;
use devconnect_api::services::GithubClient;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Unroutable GitHub endpoint so the proxy route never leaves the machine
pub const GITHUB_API_URL: &str = "http://127.0.0.1:9";

/// In-process application over a fresh in-memory store
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }
}

impl TestApp {
    pub fn new() -> Result<Self> {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    /// Application over a caller-supplied store
    pub fn with_store(store: Arc<dyn DocumentStore>) -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let github = GithubClient::new(&GithubConfig {
            api_url: GITHUB_API_URL.to_string(),
            ..GithubConfig::default()
        })
        .context("failed to build GitHub client")?;

        let state = AppState::new(
            store,
            TokenVerifier::new(TEST_SECRET, 1),
            github,
        );

        Ok(Self {
            router: router(state.clone()),
            state,
        })
    }

    /// Registers a user and returns it with a valid credential
    pub async fn user(&self, name: &str, email: &str) -> Result<(User, String)> {
        let user = self.state.users.create(name, email, None, None).await?;
        let token = self.state.verifier.issue(user.id)?;
        Ok((user, token))
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("x-auth-token", token);
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&json)?))?,
            None => builder.body(Body::empty())?,
        };

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).with_context(|| {
                format!("non-JSON body: {}", String::from_utf8_lossy(&bytes))
            })?
        };

        Ok(TestResponse { status, body })
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Result<TestResponse> {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> Result<TestResponse> {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    /// POST without a credential, for sign-up and sign-in
    pub async fn post_public(&self, uri: &str, body: Value) -> Result<TestResponse> {
        self.request(Method::POST, uri, None, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Option<Value>) -> Result<TestResponse> {
        self.request(Method::PUT, uri, Some(token), body).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> Result<TestResponse> {
        self.request(Method::DELETE, uri, Some(token), None).await
    }
}
