//! Platform access, authentication, and authorization for the shop backend.
//!
//! This crate provides:
//! - User accounts (`User`, `Account`) and their named roles (`Role`, `RoleSet`)
//! - Credential validation and argon2id password hashing
//! - Session token issuance (`TokenIssuer`, HS256 JWTs with a 7-day lifetime)
//! - The `AuthGateway` implementing member and admin login
//! - Account registration
//!
//! Storage is abstracted behind the `UserDirectory` trait; the server
//! implements it over a request-scoped PostgreSQL transaction.
//!
//! # Access Model
//!
//! - Every registered user can log in as a member and receives a token whose
//!   `role` claim is `member`.
//! - Users holding a role named exactly `admin` can additionally log in as an
//!   admin and receive a token whose `role` claim is `admin`.
//!
//! # Example
//!
//! ```
//! use shop_platform_access::{AccessLevel, AuthConfig, TokenIssuer};
//! use shop_core::UserId;
//!
//! let issuer = TokenIssuer::from_config(&AuthConfig::new("change-me"), "development")
//!     .expect("valid configuration");
//! let issued = issuer.issue(UserId::new(), AccessLevel::Member).expect("signed");
//!
//! assert_eq!(issued.claims.iss, "development.api.shop");
//! assert_eq!(issued.claims.exp - issued.claims.iat, 7 * 24 * 60 * 60);
//! ```

pub mod config;
pub mod credentials;
pub mod directory;
pub mod error;
pub mod gateway;
pub mod password;
pub mod registration;
pub mod role;
pub mod token;
pub mod user;

// Re-export main types at crate root
pub use config::AuthConfig;
pub use credentials::{Credentials, LoginRequest};
pub use directory::UserDirectory;
pub use error::{DirectoryError, FieldErrors, LoginError, RegistrationError, TokenConfigError};
pub use gateway::{AuthGateway, Login};
pub use password::{HashedPassword, hash_password, verify_password};
pub use registration::{NewUser, register};
pub use role::{ADMIN_ROLE, AccessLevel, Role, RoleSet};
pub use token::{Claims, SessionToken, TOKEN_TTL_SECONDS, TokenIssuer};
pub use user::{Account, User};
