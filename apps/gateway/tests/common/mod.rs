#![allow(dead_code)]

use std::sync::Arc;

use axum::{body::Body, http::Response, Router};
use foldify_gateway::{
    config::{Config, Environment},
    router,
    state::State,
};
use http_body_util::BodyExt;
use serde_json::Value;

pub const SECRET: &str = "integration-secret";

/// A gateway whose backend refuses connections
pub fn test_state() -> Arc<State> {
    state_with_backend("http://127.0.0.1:9")
}

pub fn state_with_backend(backend_url: &str) -> Arc<State> {
    State::new(Config {
        port: 0,
        backend_url: backend_url.to_string(),
        session_secret: SECRET.to_string(),
        environment: Environment::Development,
    })
}

pub fn test_app() -> Router {
    router(test_state())
}

pub async fn json_body(response: Response<Body>) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
