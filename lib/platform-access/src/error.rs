//! Error types for the platform-access crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `DirectoryError`: failures of the user store behind [`UserDirectory`](crate::UserDirectory)
//! - `LoginError`: failures of a member or admin login
//! - `RegistrationError`: failures while creating a new account
//! - `TokenConfigError`: invalid signing configuration, raised at startup

use shop_core::UserId;
use std::collections::BTreeMap;
use std::fmt;

/// Errors raised by a [`UserDirectory`](crate::UserDirectory) implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// The backing store could not be queried.
    Unavailable { details: String },
    /// A stored row could not be turned into a domain value.
    CorruptRecord { details: String },
    /// An account with the same email already exists.
    EmailTaken { email: String },
}

impl fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable { details } => {
                write!(f, "user directory unavailable: {details}")
            }
            Self::CorruptRecord { details } => {
                write!(f, "corrupt user record: {details}")
            }
            Self::EmailTaken { email } => {
                write!(f, "an account already exists for {email}")
            }
        }
    }
}

impl std::error::Error for DirectoryError {}

/// Errors from a login attempt.
///
/// The first four variants are caused by the caller; the rest are
/// server-side failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginError {
    /// The submitted password was empty.
    MissingPassword,
    /// The submitted email is not a syntactically valid address.
    InvalidEmail,
    /// No account matched the submitted email and password.
    ///
    /// Does not say which of the two was wrong.
    InvalidCredentials,
    /// The account exists but has no `admin` role.
    AdminRequired { user_id: UserId },
    /// The user directory failed.
    Directory,
    /// Password verification could not be carried out.
    PasswordVerification { details: String },
    /// The session token could not be signed.
    Signing { details: String },
}

impl LoginError {
    /// Returns true if the failure was caused by the submitted request.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingPassword
                | Self::InvalidEmail
                | Self::InvalidCredentials
                | Self::AdminRequired { .. }
        )
    }
}

impl fmt::Display for LoginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPassword => write!(f, "password is empty"),
            Self::InvalidEmail => write!(f, "email is not a valid address"),
            Self::InvalidCredentials => write!(f, "invalid credentials"),
            Self::AdminRequired { user_id } => {
                write!(f, "user {user_id} is not an admin")
            }
            Self::Directory => write!(f, "user lookup failed"),
            Self::PasswordVerification { details } => {
                write!(f, "password verification failed: {details}")
            }
            Self::Signing { details } => {
                write!(f, "could not sign token: {details}")
            }
        }
    }
}

impl std::error::Error for LoginError {}

/// Field-level validation messages, keyed by field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Errors from creating a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// Password and confirmation differ.
    PasswordMismatch,
    /// One or more fields failed validation.
    Invalid { fields: FieldErrors },
    /// The password could not be hashed.
    Hashing { details: String },
    /// The user directory failed.
    Directory,
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PasswordMismatch => write!(f, "passwords do not match"),
            Self::Invalid { fields } => {
                let names: Vec<&str> = fields.keys().map(String::as_str).collect();
                write!(f, "invalid fields: {}", names.join(", "))
            }
            Self::Hashing { details } => {
                write!(f, "could not hash password: {details}")
            }
            Self::Directory => write!(f, "could not store the new user"),
        }
    }
}

impl std::error::Error for RegistrationError {}

/// Invalid token signing configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenConfigError {
    /// No signing secret was configured.
    MissingSecret,
    /// The environment name is empty, so no issuer can be built.
    MissingEnvironment,
}

impl fmt::Display for TokenConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSecret => write!(f, "no JWT signing secret configured"),
            Self::MissingEnvironment => write!(f, "environment name is empty"),
        }
    }
}

impl std::error::Error for TokenConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_credentials_display_is_generic() {
        let message = LoginError::InvalidCredentials.to_string();
        assert_eq!(message, "invalid credentials");
        assert!(!message.contains("email"));
        assert!(!message.contains("password"));
    }

    #[test]
    fn admin_required_display_names_user() {
        let user_id = UserId::new();
        let err = LoginError::AdminRequired { user_id };
        assert!(err.to_string().contains(&user_id.to_string()));
    }

    #[test]
    fn client_errors_are_classified() {
        assert!(LoginError::MissingPassword.is_client_error());
        assert!(LoginError::InvalidEmail.is_client_error());
        assert!(LoginError::InvalidCredentials.is_client_error());
        assert!(
            LoginError::AdminRequired {
                user_id: UserId::new()
            }
            .is_client_error()
        );
        assert!(!LoginError::Directory.is_client_error());
        assert!(
            !LoginError::Signing {
                details: "bad key".to_string()
            }
            .is_client_error()
        );
    }

    #[test]
    fn registration_invalid_display_lists_fields() {
        let mut fields = FieldErrors::new();
        fields.insert("email".to_string(), vec!["Email is not valid".to_string()]);
        fields.insert("password".to_string(), vec!["Password can not be blank".to_string()]);
        let err = RegistrationError::Invalid { fields };
        assert_eq!(err.to_string(), "invalid fields: email, password");
    }

    #[test]
    fn directory_error_display() {
        let err = DirectoryError::EmailTaken {
            email: "a@b.com".to_string(),
        };
        assert!(err.to_string().contains("a@b.com"));
    }
}
