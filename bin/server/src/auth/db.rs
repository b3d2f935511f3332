//! PostgreSQL implementation of the user directory.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shop_core::{RoleId, UserId};
use shop_platform_access::{
    Account, DirectoryError, HashedPassword, Role, RoleSet, User, UserDirectory,
};
use sqlx::{FromRow, PgConnection};
use std::str::FromStr;

/// Row type for user queries.
#[derive(FromRow)]
struct UserRow {
    id: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn try_into_account(self, roles: RoleSet) -> Result<Account, DirectoryError> {
        let id = UserId::from_str(&self.id).map_err(|e| DirectoryError::CorruptRecord {
            details: format!("invalid user id '{}': {}", self.id, e),
        })?;
        let user = User::with_all_fields(id, self.email, roles, self.created_at, self.updated_at);
        Ok(Account::new(user, HashedPassword::from_stored(self.password_hash)))
    }
}

/// Row type for a user joined with one of its roles.
///
/// Users without roles come back as a single row with null role columns.
#[derive(FromRow)]
struct UserRoleRow {
    #[sqlx(flatten)]
    user: UserRow,
    role_id: Option<String>,
    role_name: Option<String>,
}

fn try_into_role(id: String, name: String) -> Result<Role, DirectoryError> {
    let role_id = RoleId::from_str(&id).map_err(|e| DirectoryError::CorruptRecord {
        details: format!("invalid role id '{}': {}", id, e),
    })?;
    Ok(Role::new(role_id, name))
}

fn unavailable(e: sqlx::Error) -> DirectoryError {
    DirectoryError::Unavailable {
        details: e.to_string(),
    }
}

/// User directory bound to one request's transaction.
pub struct PgUserDirectory<'t> {
    conn: &'t mut PgConnection,
}

impl<'t> PgUserDirectory<'t> {
    /// Wraps an open connection, normally `&mut *transaction`.
    pub fn new(conn: &'t mut PgConnection) -> Self {
        Self { conn }
    }

    async fn fetch_user(&mut self, email: &str) -> Result<Option<UserRow>, DirectoryError> {
        sqlx::query_as(
            r#"
            SELECT id, email, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&mut *self.conn)
        .await
        .map_err(unavailable)
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory<'_> {
    async fn find_by_email(
        &mut self,
        email: &str,
    ) -> shop_core::Result<Option<Account>, DirectoryError> {
        match self.fetch_user(email).await? {
            Some(row) => Ok(Some(row.try_into_account(RoleSet::none())?)),
            None => Ok(None),
        }
    }

    async fn find_by_email_with_roles(
        &mut self,
        email: &str,
    ) -> shop_core::Result<Option<Account>, DirectoryError> {
        let rows: Vec<UserRoleRow> = sqlx::query_as(
            r#"
            SELECT u.id, u.email, u.password_hash, u.created_at, u.updated_at,
                   r.id AS role_id, r.name AS role_name
            FROM users u
            LEFT JOIN users_roles ur ON ur.user_id = u.id
            LEFT JOIN roles r ON r.id = ur.role_id
            WHERE u.email = $1
            ORDER BY r.name
            "#,
        )
        .bind(email)
        .fetch_all(&mut *self.conn)
        .await
        .map_err(unavailable)?;

        let mut user = None;
        let mut roles = Vec::new();
        for row in rows {
            if let (Some(id), Some(name)) = (row.role_id, row.role_name) {
                roles.push(try_into_role(id, name)?);
            }
            user.get_or_insert(row.user);
        }

        match user {
            Some(row) => Ok(Some(row.try_into_account(RoleSet::from_roles(roles))?)),
            None => Ok(None),
        }
    }

    async fn insert(&mut self, account: &Account) -> shop_core::Result<(), DirectoryError> {
        let user = account.user();
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id().to_string())
        .bind(user.email())
        .bind(account.password_hash().as_str())
        .bind(user.created_at())
        .bind(user.updated_at())
        .execute(&mut *self.conn)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                DirectoryError::EmailTaken {
                    email: user.email().to_string(),
                }
            } else {
                unavailable(e)
            }
        })?;

        Ok(())
    }
}
