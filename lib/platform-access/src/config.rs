//! Authentication configuration.
//!
//! Loaded once at startup as part of the server configuration and handed
//! to [`TokenIssuer::from_config`](crate::TokenIssuer::from_config). There is no
//! default secret.

use serde::Deserialize;

/// Configuration for token signing.
#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared HS256 signing secret.
    jwt_secret: String,
}

impl AuthConfig {
    /// Creates a configuration with the given signing secret.
    #[must_use]
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
        }
    }

    /// Returns the signing secret.
    #[must_use]
    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[redacted]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_secret() {
        let config = AuthConfig::new("super-secret-value");
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret-value"));
        assert!(debug.contains("redacted"));
    }

    #[test]
    fn deserializes_secret() {
        let config: AuthConfig =
            serde_json::from_str(r#"{"jwt_secret":"abc"}"#).expect("deserialize");
        assert_eq!(config.jwt_secret(), "abc");
    }

    #[test]
    fn secret_is_required() {
        let result: Result<AuthConfig, _> = serde_json::from_str("{}");
        assert!(result.is_err());
    }
}
