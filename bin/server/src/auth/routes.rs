//! Login routes.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use shop_platform_access::{AccessLevel, Credentials, Login, LoginRequest};
use std::sync::Arc;
use tracing::instrument;

use super::{AppState, db::PgUserDirectory};
use crate::error::ApiError;

/// Logs in any registered user and returns a `member` token.
pub async fn member_login(
    State(state): State<Arc<AppState>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    match body {
        Ok(Json(request)) => run_login(&state, request, AccessLevel::Member).await,
        Err(rejection) => ApiError::from(rejection).into_response(),
    }
}

/// Logs in a user holding the `admin` role and returns an `admin` token.
pub async fn admin_login(
    State(state): State<Arc<AppState>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    match body {
        Ok(Json(request)) => run_login(&state, request, AccessLevel::Admin).await,
        Err(rejection) => ApiError::from(rejection).into_response(),
    }
}

/// Runs one login inside its own transaction.
///
/// The response is rendered inside the span, so rejections are logged with
/// the submitted email.
#[instrument(skip_all, fields(email = %request.email, access = %level))]
async fn run_login(state: &AppState, request: LoginRequest, level: AccessLevel) -> Response {
    let result = async {
        let credentials = Credentials::parse(request)?;

        let mut tx = state.db_pool.begin().await?;
        let mut directory = PgUserDirectory::new(&mut *tx);
        let login = match level {
            AccessLevel::Member => {
                state
                    .gateway
                    .authenticate_member(&credentials, &mut directory)
                    .await?
            }
            AccessLevel::Admin => {
                state
                    .gateway
                    .authenticate_admin(&credentials, &mut directory)
                    .await?
            }
        };
        tx.commit().await?;

        tracing::info!(user_id = %login.user.id(), "login succeeded");
        Ok::<Login, ApiError>(login)
    }
    .await;

    result.map(Json).into_response()
}
