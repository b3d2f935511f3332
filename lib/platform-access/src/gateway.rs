//! The authentication gateway: member and admin login.
//!
//! Both logins follow the same path:
//!
//! 1. the caller validates the request into [`Credentials`] (no store access),
//! 2. the account is looked up by email,
//! 3. the password is verified against the stored argon2 hash,
//! 4. a signed token is issued.
//!
//! An unknown email and a wrong password both end in
//! [`LoginError::InvalidCredentials`], and both cost one argon2 verification.
//! The admin login additionally loads the account's roles and requires one
//! of them to be [`ADMIN_ROLE`](crate::role::ADMIN_ROLE).

use rootcause::prelude::{Report, ResultExt};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::credentials::Credentials;
use crate::directory::UserDirectory;
use crate::error::LoginError;
use crate::password::{verify_against_unmatchable, verify_password};
use crate::role::AccessLevel;
use crate::token::{Claims, TokenIssuer};
use crate::user::{Account, User};

/// The result of a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct Login {
    /// The signed session token.
    pub token: String,
    /// The logged-in user, without any password material.
    pub user: User,
    /// Claims encoded in `token`.
    #[serde(skip)]
    pub claims: Claims,
}

/// Verifies credentials and issues session tokens.
#[derive(Debug, Clone)]
pub struct AuthGateway {
    tokens: TokenIssuer,
}

impl AuthGateway {
    /// Creates a gateway that signs with `tokens`.
    #[must_use]
    pub fn new(tokens: TokenIssuer) -> Self {
        Self { tokens }
    }

    /// Returns the token issuer.
    #[must_use]
    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Logs in any registered user with a `member` token.
    #[instrument(skip_all, fields(email = %credentials.email()))]
    pub async fn authenticate_member<D>(
        &self,
        credentials: &Credentials,
        directory: &mut D,
    ) -> Result<Login, Report<LoginError>>
    where
        D: UserDirectory + ?Sized,
    {
        let account = directory
            .find_by_email(credentials.email())
            .await
            .context(LoginError::Directory)?;
        let account = check_password(credentials, account).await?;

        self.issue(account.into_user(), AccessLevel::Member)
    }

    /// Logs in a user holding the admin role with an `admin` token.
    #[instrument(skip_all, fields(email = %credentials.email()))]
    pub async fn authenticate_admin<D>(
        &self,
        credentials: &Credentials,
        directory: &mut D,
    ) -> Result<Login, Report<LoginError>>
    where
        D: UserDirectory + ?Sized,
    {
        let account = directory
            .find_by_email_with_roles(credentials.email())
            .await
            .context(LoginError::Directory)?;
        let account = check_password(credentials, account).await?;

        let user = account.into_user();
        if !user.roles().is_admin() {
            return Err(LoginError::AdminRequired { user_id: user.id() }.into());
        }

        self.issue(user, AccessLevel::Admin)
    }

    fn issue(&self, user: User, role: AccessLevel) -> Result<Login, Report<LoginError>> {
        let issued = self.tokens.issue(user.id(), role)?;
        debug!(user_id = %user.id(), %role, jti = %issued.claims.jti, "issued session token");

        Ok(Login {
            token: issued.token,
            user,
            claims: issued.claims,
        })
    }
}

/// Verifies the submitted password on the blocking pool.
///
/// A missing account still pays for one verification.
async fn check_password(
    credentials: &Credentials,
    account: Option<Account>,
) -> Result<Account, Report<LoginError>> {
    let password = credentials.password().to_owned();

    let verified = tokio::task::spawn_blocking(move || match account {
        Some(account) => verify_password(&password, account.password_hash())
            .map(|matched| matched.then_some(account)),
        None => {
            verify_against_unmatchable(&password);
            Ok(None)
        }
    })
    .await
    .map_err(|e| LoginError::PasswordVerification {
        details: e.to_string(),
    })?
    .map_err(|e| LoginError::PasswordVerification {
        details: e.to_string(),
    })?;

    verified.ok_or_else(|| LoginError::InvalidCredentials.into())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use crate::credentials::LoginRequest;
    use crate::error::DirectoryError;
    use crate::password::{HashedPassword, hash_password};
    use crate::role::{Role, RoleSet};
    use async_trait::async_trait;
    use shop_core::RoleId;
    use std::collections::HashMap;

    /// In-memory directory that counts lookups.
    #[derive(Default)]
    pub(crate) struct MemoryDirectory {
        pub(crate) accounts: HashMap<String, Account>,
        pub(crate) lookups: usize,
        pub(crate) fail: bool,
    }

    impl MemoryDirectory {
        pub(crate) fn with_user(mut self, email: &str, password: &str, roles: &[&str]) -> Self {
            let mut user = User::new(email.to_string());
            user.set_roles(RoleSet::from_roles(
                roles
                    .iter()
                    .map(|name| Role::new(RoleId::new(), (*name).to_string()))
                    .collect(),
            ));
            let hash = hash_password(password).expect("hash");
            self.accounts
                .insert(email.to_string(), Account::new(user, hash));
            self
        }

        fn lookup(
            &mut self,
            email: &str,
            with_roles: bool,
        ) -> Result<Option<Account>, Report<DirectoryError>> {
            self.lookups += 1;
            if self.fail {
                return Err(DirectoryError::Unavailable {
                    details: "connection refused".to_string(),
                }
                .into());
            }
            Ok(self.accounts.get(email).cloned().map(|account| {
                if with_roles {
                    account
                } else {
                    let mut user = account.user().clone();
                    user.set_roles(RoleSet::none());
                    Account::new(user, account.password_hash().clone())
                }
            }))
        }
    }

    #[async_trait]
    impl UserDirectory for MemoryDirectory {
        async fn find_by_email(
            &mut self,
            email: &str,
        ) -> Result<Option<Account>, Report<DirectoryError>> {
            self.lookup(email, false)
        }

        async fn find_by_email_with_roles(
            &mut self,
            email: &str,
        ) -> Result<Option<Account>, Report<DirectoryError>> {
            self.lookup(email, true)
        }

        async fn insert(&mut self, account: &Account) -> Result<(), Report<DirectoryError>> {
            if self.fail {
                return Err(DirectoryError::Unavailable {
                    details: "connection refused".to_string(),
                }
                .into());
            }
            let email = account.user().email().to_string();
            if self.accounts.contains_key(&email) {
                return Err(DirectoryError::EmailTaken { email }.into());
            }
            self.accounts.insert(email, account.clone());
            Ok(())
        }
    }

    fn gateway() -> AuthGateway {
        let tokens = TokenIssuer::from_config(&AuthConfig::new("test-jwt-secret"), "test")
            .expect("valid config");
        AuthGateway::new(tokens)
    }

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials::parse(LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })
        .expect("valid credentials")
    }

    #[tokio::test]
    async fn member_login_issues_member_token_for_user() {
        let mut directory = MemoryDirectory::default().with_user("a@b.com", "secret", &[]);
        let gateway = gateway();

        let login = gateway
            .authenticate_member(&credentials("a@b.com", "secret"), &mut directory)
            .await
            .expect("login");

        let claims = gateway.tokens().verify(&login.token).expect("verify");
        assert_eq!(claims.role, AccessLevel::Member);
        assert_eq!(claims.user_id().expect("sub"), login.user.id());
        assert_eq!(claims.iss, "test.api.shop");
        assert_eq!(claims.exp - claims.iat, 604_800);
        assert_eq!(login.user.email(), "a@b.com");
    }

    #[tokio::test]
    async fn member_login_for_admin_still_gets_member_role() {
        let mut directory =
            MemoryDirectory::default().with_user("root@b.com", "secret", &["admin"]);

        let login = gateway()
            .authenticate_member(&credentials("root@b.com", "secret"), &mut directory)
            .await
            .expect("login");

        assert_eq!(login.claims.role, AccessLevel::Member);
    }

    #[tokio::test]
    async fn admin_login_issues_admin_token_with_roles_loaded() {
        let mut directory =
            MemoryDirectory::default().with_user("root@b.com", "secret", &["editor", "admin"]);
        let gateway = gateway();

        let login = gateway
            .authenticate_admin(&credentials("root@b.com", "secret"), &mut directory)
            .await
            .expect("login");

        let claims = gateway.tokens().verify(&login.token).expect("verify");
        assert_eq!(claims.role, AccessLevel::Admin);
        assert_eq!(claims.user_id().expect("sub"), login.user.id());
        assert_eq!(claims.exp - claims.iat, 604_800);
        assert!(login.user.roles().is_admin());
    }

    #[tokio::test]
    async fn admin_login_without_admin_role_is_denied() {
        let mut directory = MemoryDirectory::default().with_user("a@b.com", "secret", &[]);

        let err = gateway()
            .authenticate_admin(&credentials("a@b.com", "secret"), &mut directory)
            .await
            .expect_err("not an admin");

        assert!(matches!(
            err.current_context(),
            LoginError::AdminRequired { .. }
        ));
    }

    #[tokio::test]
    async fn admin_login_with_other_roles_is_denied() {
        let mut directory =
            MemoryDirectory::default().with_user("a@b.com", "secret", &["Admin", "editor"]);

        let err = gateway()
            .authenticate_admin(&credentials("a@b.com", "secret"), &mut directory)
            .await
            .expect_err("not an admin");

        assert!(matches!(
            err.current_context(),
            LoginError::AdminRequired { .. }
        ));
    }

    #[tokio::test]
    async fn user_without_roles_member_succeeds_admin_fails() {
        let mut directory = MemoryDirectory::default().with_user("a@b.com", "secret", &[]);
        let gateway = gateway();
        let credentials = credentials("a@b.com", "secret");

        assert!(
            gateway
                .authenticate_admin(&credentials, &mut directory)
                .await
                .is_err()
        );
        let login = gateway
            .authenticate_member(&credentials, &mut directory)
            .await
            .expect("member login");
        assert_eq!(login.claims.role, AccessLevel::Member);
    }

    #[tokio::test]
    async fn wrong_password_is_invalid_credentials() {
        let mut directory = MemoryDirectory::default().with_user("a@b.com", "secret", &["admin"]);
        let gateway = gateway();

        for result in [
            gateway
                .authenticate_member(&credentials("a@b.com", "wrong"), &mut directory)
                .await,
            gateway
                .authenticate_admin(&credentials("a@b.com", "wrong"), &mut directory)
                .await,
        ] {
            let err = result.expect_err("wrong password");
            assert_eq!(err.current_context(), &LoginError::InvalidCredentials);
        }
    }

    #[tokio::test]
    async fn unknown_email_is_invalid_credentials() {
        let mut directory = MemoryDirectory::default().with_user("a@b.com", "secret", &[]);
        let gateway = gateway();

        for result in [
            gateway
                .authenticate_member(&credentials("nobody@b.com", "secret"), &mut directory)
                .await,
            gateway
                .authenticate_admin(&credentials("nobody@b.com", "secret"), &mut directory)
                .await,
        ] {
            let err = result.expect_err("unknown email");
            assert_eq!(err.current_context(), &LoginError::InvalidCredentials);
        }
        assert_eq!(directory.lookups, 2);
    }

    #[tokio::test]
    async fn directory_failure_is_reported() {
        let mut directory = MemoryDirectory {
            fail: true,
            ..MemoryDirectory::default()
        };

        let err = gateway()
            .authenticate_member(&credentials("a@b.com", "secret"), &mut directory)
            .await
            .expect_err("directory down");

        assert_eq!(err.current_context(), &LoginError::Directory);
        assert!(!err.current_context().is_client_error());
    }

    #[tokio::test]
    async fn corrupt_stored_hash_is_a_server_error() {
        let mut directory = MemoryDirectory::default();
        directory.accounts.insert(
            "a@b.com".to_string(),
            Account::new(
                User::new("a@b.com".to_string()),
                HashedPassword::from_stored("secret".to_string()),
            ),
        );

        let err = gateway()
            .authenticate_member(&credentials("a@b.com", "secret"), &mut directory)
            .await
            .expect_err("plaintext stored password must not match");

        assert!(matches!(
            err.current_context(),
            LoginError::PasswordVerification { .. }
        ));
    }

    #[tokio::test]
    async fn login_serializes_token_and_user_only() {
        let mut directory = MemoryDirectory::default().with_user("a@b.com", "secret", &[]);

        let login = gateway()
            .authenticate_member(&credentials("a@b.com", "secret"), &mut directory)
            .await
            .expect("login");

        let json = serde_json::to_value(&login).expect("serialize");
        let object = json.as_object().expect("object");
        assert_eq!(object.len(), 2);
        assert!(object["token"].is_string());
        assert_eq!(object["user"]["email"], "a@b.com");
        assert!(object["user"].get("password").is_none());
        assert!(object["user"].get("password_hash").is_none());
    }
}
