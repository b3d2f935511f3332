//! User domain types.
//!
//! [`User`] is the public view of an account and is what login and
//! registration responses carry. It has no password field, so it cannot
//! leak one when serialized. [`Account`] pairs a user with the stored
//! password hash and only exists between the directory and the gateway.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shop_core::UserId;

use crate::password::HashedPassword;
use crate::role::RoleSet;

/// A registered user of the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Internal user ID.
    id: UserId,
    /// Login email address.
    email: String,
    /// Roles granted to the user. Only populated when eagerly loaded.
    #[serde(default, skip_serializing_if = "RoleSet::is_empty")]
    roles: RoleSet,
    /// When the user record was created.
    created_at: DateTime<Utc>,
    /// When the user record was last updated.
    updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user with a generated ID and no roles.
    #[must_use]
    pub fn new(email: String) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            email,
            roles: RoleSet::none(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates a user with all fields specified.
    ///
    /// Use this when reconstituting a user from storage.
    #[must_use]
    pub fn with_all_fields(
        id: UserId,
        email: String,
        roles: RoleSet,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            roles,
            created_at,
            updated_at,
        }
    }

    /// Returns the user's ID.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Returns the user's email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the roles loaded with this user.
    #[must_use]
    pub fn roles(&self) -> &RoleSet {
        &self.roles
    }

    /// Returns when the user was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the user was last updated.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the loaded roles.
    pub fn set_roles(&mut self, roles: RoleSet) {
        self.roles = roles;
    }
}

/// A user together with the stored password hash.
#[derive(Debug, Clone)]
pub struct Account {
    user: User,
    password_hash: HashedPassword,
}

impl Account {
    /// Pairs a user with its stored password hash.
    #[must_use]
    pub fn new(user: User, password_hash: HashedPassword) -> Self {
        Self {
            user,
            password_hash,
        }
    }

    /// Returns the user.
    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Returns the stored password hash.
    #[must_use]
    pub fn password_hash(&self) -> &HashedPassword {
        &self.password_hash
    }

    /// Splits the account, discarding the password hash.
    #[must_use]
    pub fn into_user(self) -> User {
        self.user
    }
}
