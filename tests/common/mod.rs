#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use shop_api::auth::JwtAuth;
use shop_api::config::AppConfig;
use shop_api::testing::ScriptedExecutor;
use shop_api::{app, AppState};

pub const TIMESTAMP: &str = "2024-05-01T10:00:00Z";

/// In-process application backed by a scripted executor
pub struct TestApp {
    pub db: Arc<ScriptedExecutor>,
    jwt: JwtAuth,
    router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        let db = Arc::new(ScriptedExecutor::new());
        let jwt = JwtAuth::new("integration-test-secret", 1).expect("test secret is not empty");
        let mut config = AppConfig::development();
        config.server.enable_request_logging = false;

        let router = app(AppState::new(db.clone(), jwt.clone()), &config);
        Self { db, jwt, router }
    }

    pub fn token(&self, user_id: Uuid) -> String {
        self.jwt.issue(user_id).expect("token issues")
    }

    pub async fn request(&self, method: Method, uri: &str, user: Option<Uuid>, body: Option<Value>) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user_id) = user {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token(user_id)));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json)?))?,
            None => builder.body(Body::empty())?,
        };

        self.send(request).await
    }

    /// Drive an already-built request through the router
    pub async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await.context("router failed")?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).with_context(|| format!("non-JSON body: {:?}", bytes))?
        };
        Ok(TestResponse { status, body })
    }

    pub async fn get(&self, uri: &str, user: Option<Uuid>) -> Result<TestResponse> {
        self.request(Method::GET, uri, user, None).await
    }

    pub async fn post(&self, uri: &str, user: Option<Uuid>, body: Value) -> Result<TestResponse> {
        self.request(Method::POST, uri, user, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, user: Option<Uuid>, body: Value) -> Result<TestResponse> {
        self.request(Method::PATCH, uri, user, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, user: Option<Uuid>) -> Result<TestResponse> {
        self.request(Method::DELETE, uri, user, None).await
    }
}

pub fn cart_item_row(id: Uuid, user_id: Uuid, product_id: Uuid, quantity: i64) -> Value {
    serde_json::json!({
        "id": id,
        "user_id": user_id,
        "product_id": product_id,
        "quantity": quantity,
        "created_at": TIMESTAMP,
        "updated_at": TIMESTAMP,
    })
}

pub fn product_row(id: Uuid, seller_id: Uuid, category_id: Uuid) -> Value {
    serde_json::json!({
        "id": id,
        "title": "Desk lamp",
        "description": "Brass desk lamp",
        "price": 19.9,
        "stock": 4,
        "category_id": category_id,
        "subcategory_id": null,
        "seller_id": seller_id,
        "actif": true,
        "created_at": TIMESTAMP,
        "updated_at": TIMESTAMP,
    })
}

pub fn user_row(id: Uuid) -> Value {
    serde_json::json!({
        "id": id,
        "firstname": "Ada",
        "lastname": "Lovelace",
        "email": "ada@example.com",
        "created_at": TIMESTAMP,
        "updated_at": TIMESTAMP,
    })
}
