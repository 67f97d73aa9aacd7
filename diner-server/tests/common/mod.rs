//! Shared harness: the full router over the in-memory store, or over an
//! in-memory SurrealDB via [`TestApp::surreal`]

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use diner_server::db::DbService;
use diner_server::db::repository::Stores;
use diner_server::notifications::LogNotifier;
use diner_server::{Config, ServerState, build_app};
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use shared::models::{ADMIN_ROLE, CapacityOption, TimeSlot, UserCreate};
use tower::ServiceExt;

pub struct TestApp {
    pub app: Router,
    pub state: ServerState,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(Config::for_tests())
    }

    pub fn with_config(config: Config) -> Self {
        Self::with_stores(config, Stores::memory())
    }

    pub async fn surreal() -> Self {
        let service = DbService::memory().await.unwrap();
        Self::with_stores(Config::for_tests(), Stores::surreal(service.db))
    }

    fn with_stores(config: Config, stores: Stores) -> Self {
        diner_server::init_logger();
        let state = ServerState::with_stores(config, stores, Arc::new(LogNotifier));
        let app = build_app(state.clone());
        Self { app, state }
    }

    pub fn token(&self, email: &str) -> String {
        self.state.jwt_service.generate_token(email).unwrap()
    }

    /// Register `email` and grant it the admin role
    pub async fn admin(&self, email: &str) -> String {
        let user = self
            .state
            .stores
            .users
            .insert(UserCreate {
                name: Some("Admin".into()),
                email: email.into(),
                photo: None,
            })
            .await
            .unwrap();
        self.state
            .stores
            .users
            .set_role(&user.id, ADMIN_ROLE)
            .await
            .unwrap();
        self.token(email)
    }

    pub async fn capacity(&self, guests: u32, slots: &[(&str, u32)]) {
        self.state
            .capacity
            .store(CapacityOption {
                guests,
                time_slots: slots
                    .iter()
                    .map(|(slot, capacity)| TimeSlot {
                        slot: (*slot).into(),
                        capacity: *capacity,
                    })
                    .collect(),
            })
            .await
            .unwrap();
    }

    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send("GET", uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, token, Some(body)).await
    }
}
