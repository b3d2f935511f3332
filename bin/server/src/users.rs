//! User registration route.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shop_platform_access::{NewUser, User, register};
use std::sync::Arc;
use tracing::instrument;

use crate::auth::{AppState, db::PgUserDirectory};
use crate::error::ApiError;

/// Creates an account and returns it with `201 Created`.
pub async fn create(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewUser>, JsonRejection>,
) -> Response {
    match body {
        Ok(Json(request)) => create_user(&state, request).await,
        Err(rejection) => ApiError::from(rejection).into_response(),
    }
}

#[instrument(skip_all, fields(email = %request.email))]
async fn create_user(state: &AppState, request: NewUser) -> Response {
    let result = async {
        // Reject bad input before a transaction is opened; `register` checks again.
        request.check()?;

        let mut tx = state.db_pool.begin().await?;
        let user = register(request, &mut PgUserDirectory::new(&mut *tx)).await?;
        tx.commit().await?;

        tracing::info!(user_id = %user.id(), "user created");
        Ok::<User, ApiError>(user)
    }
    .await;

    result
        .map(|user| (StatusCode::CREATED, Json(user)))
        .into_response()
}
