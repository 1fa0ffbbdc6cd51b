use thiserror::Error;

/// Failure kinds of a login attempt.
///
/// `InvalidCredentials` deliberately covers both "no such user" and "wrong
/// password". The `Internal` message is for server logs only.
#[derive(Debug, Error)]
pub enum LoginError {
    #[error("email and password are required")]
    InvalidInput,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("internal error: {0}")]
    Internal(String),
}

impl LoginError {
    /// Outcome label recorded in the login audit trail.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::InvalidCredentials => "invalid_credentials",
            Self::Internal(_) => "internal_error",
        }
    }
}
