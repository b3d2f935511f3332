//! Login credentials and their validation.

use serde::Deserialize;
use validator::ValidateEmail;

use crate::error::LoginError;

/// A login request body as submitted by a client.
#[derive(Clone, Deserialize)]
pub struct LoginRequest {
    /// Submitted email address.
    pub email: String,
    /// Submitted plaintext password.
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Credentials that passed validation and may be checked against the store.
#[derive(Clone)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    /// Validates a login request.
    ///
    /// The password is checked first, then the email format. Nothing here
    /// touches the user directory.
    pub fn parse(request: LoginRequest) -> Result<Self, LoginError> {
        if request.password.is_empty() {
            return Err(LoginError::MissingPassword);
        }
        if !request.email.validate_email() {
            return Err(LoginError::InvalidEmail);
        }
        Ok(Self {
            email: request.email,
            password: request.password,
        })
    }

    /// Returns the validated email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the submitted password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}
