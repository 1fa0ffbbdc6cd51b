use super::{CredentialStore, LoginError, password::verify as verify_password};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};
use utoipa::ToSchema;

/// Identity returned on a successful login. Never carries the hash.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub email: String,
}

/// Run one login attempt.
///
/// The store is not consulted when either field is empty, or when the email
/// holds a NUL byte, which no stored email can contain. The store lookup
/// completes before verification starts, and verification runs on the
/// blocking pool since bcrypt is deliberately slow.
///
/// # Errors
/// - [`LoginError::InvalidInput`] if `email` or `password` is empty
/// - [`LoginError::InvalidCredentials`] if the email is unknown or the password does not match
/// - [`LoginError::Internal`] if the store fails or the stored hash is unreadable
#[instrument(skip(store, password))]
pub async fn authenticate(
    store: &dyn CredentialStore,
    email: &str,
    password: SecretString,
) -> Result<AuthenticatedUser, LoginError> {
    if email.is_empty() || password.expose_secret().is_empty() {
        debug!("Missing email or password");

        return Err(LoginError::InvalidInput);
    }

    // Postgres rejects NUL in text parameters
    if email.contains('\0') {
        debug!("User not found");

        return Err(LoginError::InvalidCredentials);
    }

    let user = match store.find_by_email(email).await {
        Ok(Some(user)) => user,

        Ok(None) => {
            debug!("User not found");

            return Err(LoginError::InvalidCredentials);
        }

        Err(e) => {
            error!("Error getting user from credential store: {}", e);

            return Err(LoginError::Internal(e.to_string()));
        }
    };

    let user_id = user.id;
    let stored_hash = user.password_hash;

    let verified = tokio::task::spawn_blocking(move || {
        verify_password(password.expose_secret(), &stored_hash)
    })
    .await
    .map_err(|e| {
        error!("Password verification task failed: {}", e);

        LoginError::Internal(format!("verification task failed: {e}"))
    })?;

    match verified {
        Ok(true) => {
            debug!("Login successful");

            Ok(AuthenticatedUser {
                id: user_id,
                email: user.email,
            })
        }

        Ok(false) => {
            debug!("Password mismatch");

            Err(LoginError::InvalidCredentials)
        }

        // the bcrypt error text embeds the hash, keep it out of the logs
        Err(_) => {
            error!("Stored password hash for user {} is not a valid bcrypt hash", user_id);

            Err(LoginError::Internal(format!(
                "invalid password hash for user {user_id}"
            )))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::auth::memory::MemoryCredentialStore;

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    #[tokio::test]
    async fn authenticate_returns_user_for_correct_password() {
        let store = MemoryCredentialStore::with_user(7, "a@b.com", "secret");

        let user = authenticate(&store, "a@b.com", secret("secret"))
            .await
            .unwrap();

        assert_eq!(
            user,
            AuthenticatedUser {
                id: 7,
                email: "a@b.com".to_string()
            }
        );
        assert_eq!(store.lookups(), 1);
    }

    #[tokio::test]
    async fn authenticate_rejects_wrong_password() {
        let store = MemoryCredentialStore::with_user(7, "a@b.com", "secret");

        let result = authenticate(&store, "a@b.com", secret("wrong")).await;

        assert!(matches!(result, Err(LoginError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn authenticate_rejects_unknown_email() {
        let store = MemoryCredentialStore::with_user(7, "a@b.com", "secret");

        let result = authenticate(&store, "nobody@x.com", secret("anything")).await;

        assert!(matches!(result, Err(LoginError::InvalidCredentials)));
        assert_eq!(store.lookups(), 1);
    }

    #[tokio::test]
    async fn authenticate_lookup_is_case_sensitive() {
        let store = MemoryCredentialStore::with_user(7, "a@b.com", "secret");

        let result = authenticate(&store, "A@B.com", secret("secret")).await;

        assert!(matches!(result, Err(LoginError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn authenticate_empty_fields_skip_store() {
        let store = MemoryCredentialStore::with_user(7, "a@b.com", "secret");

        for (email, password) in [("", "secret"), ("a@b.com", ""), ("", "")] {
            let result = authenticate(&store, email, secret(password)).await;
            assert!(matches!(result, Err(LoginError::InvalidInput)));
        }

        assert_eq!(store.lookups(), 0);
    }

    #[tokio::test]
    async fn authenticate_nul_in_email_is_unknown_user() {
        let store = MemoryCredentialStore::with_user(7, "a@b.com", "secret");

        for email in ["nobody\0@x.com", "a@b.com\0", "\0"] {
            let result = authenticate(&store, email, secret("secret")).await;
            assert!(matches!(result, Err(LoginError::InvalidCredentials)));
        }

        assert_eq!(store.lookups(), 0);
    }

    #[tokio::test]
    async fn authenticate_store_failure_is_internal() {
        let store = MemoryCredentialStore::failing();

        let result = authenticate(&store, "a@b.com", secret("secret")).await;

        assert!(matches!(result, Err(LoginError::Internal(_))));
    }

    #[tokio::test]
    async fn authenticate_malformed_hash_is_internal() {
        let store = MemoryCredentialStore::with_raw_hash(7, "a@b.com", "plaintext-not-a-hash");

        let result = authenticate(&store, "a@b.com", secret("plaintext-not-a-hash")).await;

        match result {
            Err(LoginError::Internal(message)) => {
                assert!(!message.contains("plaintext-not-a-hash"));
            }
            other => panic!("expected internal error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn authenticate_is_repeatable() {
        let store = MemoryCredentialStore::with_user(7, "a@b.com", "secret");

        for _ in 0..2 {
            let user = authenticate(&store, "a@b.com", secret("secret"))
                .await
                .unwrap();
            assert_eq!(user.id, 7);
        }

        assert_eq!(store.lookups(), 2);
    }
}
