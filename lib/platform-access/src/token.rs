//! Session token issuance.
//!
//! Tokens are stateless HS256 JWTs. Nothing is stored server-side; a token
//! is valid as long as its signature checks out and it has not expired.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rootcause::prelude::Report;
use serde::{Deserialize, Serialize};
use shop_core::UserId;
use ulid::Ulid;

use crate::config::AuthConfig;
use crate::error::{LoginError, TokenConfigError};
use crate::role::AccessLevel;

/// How long an issued token stays valid, in seconds (7 days).
pub const TOKEN_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Access level granted by this token.
    pub role: AccessLevel,
    /// The user the token was issued to.
    pub sub: String,
    /// `<environment>.api.shop`.
    pub iss: String,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
    /// Unique token ID.
    pub jti: String,
}

impl Claims {
    /// Parses the subject back into a user ID.
    pub fn user_id(&self) -> Result<UserId, shop_core::ParseIdError> {
        self.sub.parse()
    }
}

/// A freshly signed token together with the claims it encodes.
#[derive(Debug, Clone)]
pub struct SessionToken {
    /// The encoded JWT.
    pub token: String,
    /// The claims inside it.
    pub claims: Claims,
}

/// Signs and verifies session tokens.
///
/// Built once at startup; cheap to share behind an `Arc`.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl TokenIssuer {
    /// Builds an issuer from configuration and the deployment environment name.
    ///
    /// # Errors
    ///
    /// Fails if the secret or the environment name is empty.
    pub fn from_config(
        config: &AuthConfig,
        environment: &str,
    ) -> Result<Self, Report<TokenConfigError>> {
        let secret = config.jwt_secret();
        if secret.trim().is_empty() {
            return Err(TokenConfigError::MissingSecret.into());
        }
        if environment.trim().is_empty() {
            return Err(TokenConfigError::MissingEnvironment.into());
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer: format!("{environment}.api.shop"),
        })
    }

    /// Returns the `iss` claim this issuer writes.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Issues a token for `user_id` at the given access level, valid from now.
    pub fn issue(&self, user_id: UserId, role: AccessLevel) -> Result<SessionToken, LoginError> {
        self.issue_at(user_id, role, Utc::now())
    }

    /// Issues a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        user_id: UserId,
        role: AccessLevel,
        now: DateTime<Utc>,
    ) -> Result<SessionToken, LoginError> {
        let claims = Claims {
            role,
            sub: user_id.to_string(),
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(TOKEN_TTL_SECONDS)).timestamp(),
            jti: Ulid::new().to_string(),
        };

        let header = Header::new(Algorithm::HS256);
        let token = jsonwebtoken::encode(&header, &claims, &self.encoding_key).map_err(|e| {
            LoginError::Signing {
                details: e.to_string(),
            }
        })?;

        Ok(SessionToken { token, claims })
    }

    /// Verifies a token's signature, issuer and expiry and returns its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}
