//! bcrypt password hashing.
//!
//! Stored hashes carry their own salt and cost (`$2a$`, `$2b$`, `$2y$` ...), so
//! verification needs nothing but the candidate and the stored string. The
//! digest comparison inside the bcrypt crate is constant-time.

use bcrypt::BcryptError;

/// Check `candidate` against a stored bcrypt hash.
///
/// # Errors
/// Returns an error if `stored_hash` is not a well-formed bcrypt hash.
pub fn verify(candidate: &str, stored_hash: &str) -> Result<bool, BcryptError> {
    bcrypt::verify(candidate, stored_hash)
}

/// Hash a password with the given cost, used to seed the `users` table.
///
/// # Errors
/// Returns an error if `cost` is outside the range bcrypt accepts (4..=31).
pub fn hash(password: &str, cost: u32) -> Result<String, BcryptError> {
    bcrypt::hash(password, cost)
}
