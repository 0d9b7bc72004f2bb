#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use jamlab::accounts::memory::MemoryAccountStore;
use jamlab::accounts::repo::{AccountStore, StoreResult};
use jamlab::accounts::repo_types::{Account, NewAccount};
use jamlab::app::build_app;
use jamlab::config::{AppConfig, HashConfig, JwtConfig};
use jamlab::state::AppState;

/// Wraps a store and counts reads and writes.
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryAccountStore,
    pub reads: AtomicUsize,
    pub writes: AtomicUsize,
}

impl CountingStore {
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccountStore for CountingStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_email(email).await
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Account>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_id(id).await
    }

    async fn create(&self, account: NewAccount) -> StoreResult<Account> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.create(account).await
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://unused".into(),
        database_max_connections: 1,
        jwt: JwtConfig {
            secret: "test-secret".into(),
            issuer: "jamlab-test".into(),
            audience: "jamlab-test-users".into(),
            ttl_minutes: 5,
        },
        password_hash: HashConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        },
        store_timeout: Duration::from_secs(5),
    }
}

pub fn app_with(store: Arc<dyn AccountStore>) -> Router {
    let state = AppState::from_parts(test_config(), store).expect("state");
    build_app(state)
}

pub fn counting_app() -> (Router, Arc<CountingStore>) {
    let store = Arc::new(CountingStore::default());
    (app_with(store.clone()), store)
}

pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.expect("router is infallible");
    let status = res.status();
    let bytes = res.into_body().collect().await.expect("body").to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, body)
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    post_raw(uri, body.to_string())
}

pub fn post_raw(uri: &str, body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.into()))
        .expect("request")
}

pub fn paul() -> Value {
    serde_json::json!({
        "firstName": "Paul",
        "lastName": "McCartney",
        "email": "paul@example.com",
        "password": "PaulMcCartney13.?"
    })
}
