//! The persistence seam for user accounts.

use async_trait::async_trait;
use shop_core::Result;

use crate::error::DirectoryError;
use crate::user::Account;

/// Read and write access to stored accounts.
///
/// The server implements this over a request-scoped database transaction,
/// so a value of this type lives no longer than one request.
#[async_trait]
pub trait UserDirectory: Send {
    /// Finds the account registered under `email`, without its roles.
    async fn find_by_email(&mut self, email: &str) -> Result<Option<Account>, DirectoryError>;

    /// Finds the account registered under `email` with its roles eagerly loaded.
    async fn find_by_email_with_roles(
        &mut self,
        email: &str,
    ) -> Result<Option<Account>, DirectoryError>;

    /// Stores a new account.
    ///
    /// Fails with [`DirectoryError::EmailTaken`] if the email is already registered.
    async fn insert(&mut self, account: &Account) -> Result<(), DirectoryError>;
}
