//! shop HTTP API server.
//!
//! This crate wires the platform-access gateway to axum routes backed by
//! PostgreSQL.

pub mod auth;
pub mod config;
pub mod error;
pub mod users;

use axum::{Router, routing::post};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::auth::AppState;

/// Builds the API router over shared state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/auth/login", post(auth::member_login))
        .route("/admin/auth/login", post(auth::admin_login))
        .route("/users", post(users::create))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
