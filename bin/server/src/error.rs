//! HTTP error responses.
//!
//! Every handler failure ends up as an [`ApiError`], which logs the failure
//! and converts it into a status code with a user-safe JSON body. Details of
//! internal failures stay in the log.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rootcause::prelude::Report;
use serde_json::json;
use shop_platform_access::{LoginError, RegistrationError};

/// Message returned for every internal failure.
const INTERNAL_ERROR: &str = "Internal server error";

/// Errors returned by API handlers.
#[derive(Debug)]
pub enum ApiError {
    /// The request body was missing, not JSON, or had the wrong shape.
    MalformedBody(JsonRejection),
    /// A login attempt failed.
    Login(Report<LoginError>),
    /// Creating an account failed.
    Registration(Report<RegistrationError>),
    /// A transaction could not be opened or committed.
    Database(sqlx::Error),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedBody(rejection)
    }
}

impl From<Report<LoginError>> for ApiError {
    fn from(report: Report<LoginError>) -> Self {
        Self::Login(report)
    }
}

impl From<LoginError> for ApiError {
    fn from(error: LoginError) -> Self {
        Self::Login(error.into())
    }
}

impl From<Report<RegistrationError>> for ApiError {
    fn from(report: Report<RegistrationError>) -> Self {
        Self::Registration(report)
    }
}

impl From<RegistrationError> for ApiError {
    fn from(error: RegistrationError) -> Self {
        Self::Registration(error.into())
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> Self {
        Self::Database(error)
    }
}

fn error_body(status: StatusCode, error: serde_json::Value) -> Response {
    (status, Json(json!({ "error": error }))).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::MalformedBody(rejection) => {
                tracing::warn!(error = %rejection.body_text(), "rejected request body");
                error_body(StatusCode::BAD_REQUEST, json!("Invalid request body"))
            }
            Self::Login(report) => login_response(&report),
            Self::Registration(report) => registration_response(&report),
            Self::Database(e) => {
                tracing::error!(error = %e, "database error");
                error_body(StatusCode::INTERNAL_SERVER_ERROR, json!(INTERNAL_ERROR))
            }
        }
    }
}

fn login_response(report: &Report<LoginError>) -> Response {
    let error = report.current_context();
    if error.is_client_error() {
        tracing::warn!(%error, "login rejected");
    } else {
        tracing::error!(error = ?report, "login failed");
    }

    let (status, message) = match error {
        LoginError::MissingPassword => (StatusCode::BAD_REQUEST, "Invalid password"),
        LoginError::InvalidEmail => (StatusCode::BAD_REQUEST, "Invalid email"),
        LoginError::InvalidCredentials => (StatusCode::BAD_REQUEST, "Invalid credentials"),
        LoginError::AdminRequired { .. } => (StatusCode::FORBIDDEN, "Admin access required"),
        LoginError::Directory
        | LoginError::PasswordVerification { .. }
        | LoginError::Signing { .. } => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR),
    };
    error_body(status, json!(message))
}

fn registration_response(report: &Report<RegistrationError>) -> Response {
    match report.current_context() {
        RegistrationError::PasswordMismatch => {
            tracing::warn!("registration rejected: passwords do not match");
            error_body(
                StatusCode::UNPROCESSABLE_ENTITY,
                json!("passwords do not match!"),
            )
        }
        RegistrationError::Invalid { fields } => {
            tracing::warn!(fields = ?fields.keys().collect::<Vec<_>>(), "registration rejected");
            error_body(StatusCode::UNPROCESSABLE_ENTITY, json!(fields))
        }
        RegistrationError::Hashing { .. } | RegistrationError::Directory => {
            tracing::error!(error = ?report, "registration failed");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, json!(INTERNAL_ERROR))
        }
    }
}
