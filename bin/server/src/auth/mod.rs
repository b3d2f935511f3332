//! Authentication module for the shop server.
//!
//! This module provides:
//! - Member and admin login endpoints issuing session tokens
//! - A PostgreSQL-backed [`UserDirectory`](shop_platform_access::UserDirectory)
//!   scoped to one request's transaction
//!
//! # Authorization Model
//!
//! Tokens are stateless. The login endpoints decide what a token grants:
//! - `POST /auth/login` issues a `member` token to any registered user
//! - `POST /admin/auth/login` issues an `admin` token only to users holding
//!   the `admin` role, and answers 403 otherwise

pub mod db;
pub mod routes;

use shop_platform_access::AuthGateway;
use sqlx::PgPool;

pub use routes::{admin_login, member_login};

/// Shared application state.
pub struct AppState {
    /// Database connection pool.
    pub db_pool: PgPool,
    /// Credential verification and token signing.
    pub gateway: AuthGateway,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(db_pool: PgPool, gateway: AuthGateway) -> Self {
        Self { db_pool, gateway }
    }
}
