//! Password hashing with argon2id.

use argon2::{
    Argon2,
    password_hash::{
        self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

/// Well-formed hash that no password verifies against.
///
/// Verified when an email has no account, so an unknown email costs the
/// same as a wrong password.
const UNMATCHABLE_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// An argon2 PHC string as stored in the `users.password_hash` column.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Wraps a hash loaded from storage.
    #[must_use]
    pub fn from_stored(phc: String) -> Self {
        Self(phc)
    }

    /// Returns the PHC string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("HashedPassword(..)")
    }
}

/// Hash a password using argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<HashedPassword, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(HashedPassword(hash.to_string()))
}

/// Verify a password against a stored hash.
///
/// Returns `Ok(false)` on mismatch and `Err` only if the stored hash is
/// malformed.
pub fn verify_password(
    password: &str,
    hash: &HashedPassword,
) -> Result<bool, password_hash::Error> {
    let parsed = PasswordHash::new(hash.as_str())?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Burn the same work as a real verification, always failing.
pub fn verify_against_unmatchable(password: &str) {
    let unmatchable = HashedPassword(UNMATCHABLE_HASH.to_string());
    let _ = verify_password(password, &unmatchable);
}
