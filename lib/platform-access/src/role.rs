//! Role and access-level types.
//!
//! Roles are named rows associated with users (many-to-many). The only name
//! the platform interprets is [`ADMIN_ROLE`]; any user can log in as a
//! member, and only users holding the admin role can log in as admins.

use serde::{Deserialize, Serialize};
use shop_core::RoleId;

/// Name of the role that grants admin access.
pub const ADMIN_ROLE: &str = "admin";

/// A named role granted to a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Role {
    id: RoleId,
    name: String,
}

impl Role {
    /// Creates a role from its stored identifier and name.
    #[must_use]
    pub fn new(id: RoleId, name: String) -> Self {
        Self { id, name }
    }

    /// Returns the role's identifier.
    #[must_use]
    pub fn id(&self) -> RoleId {
        self.id
    }

    /// Returns the role's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if this role grants admin access.
    ///
    /// The name must match exactly; `"Admin"` is not an admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.name == ADMIN_ROLE
    }
}

/// The roles associated with a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet {
    roles: Vec<Role>,
}

impl RoleSet {
    /// Creates an empty role set.
    #[must_use]
    pub fn none() -> Self {
        Self { roles: Vec::new() }
    }

    /// Creates a role set from loaded role rows.
    #[must_use]
    pub fn from_roles(roles: Vec<Role>) -> Self {
        Self { roles }
    }

    /// Returns true if any role in the set grants admin access.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(Role::is_admin)
    }

    /// Returns true if the set holds no roles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Returns the roles as a slice.
    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }
}

/// Access level embedded in an issued session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// Any authenticated account.
    Member,
    /// An account holding the admin role.
    Admin,
}

impl AccessLevel {
    /// Returns the claim value for this level.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
