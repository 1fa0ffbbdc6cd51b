//! In-memory [`CredentialStore`] for unit tests.

use super::{CredentialStore, StoreError, UserRecord, password};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

const TEST_COST: u32 = 4;

#[derive(Debug, Default)]
pub(crate) struct MemoryCredentialStore {
    users: Vec<UserRecord>,
    lookups: AtomicUsize,
    failing: bool,
}

impl MemoryCredentialStore {
    /// Store holding one user whose password is hashed at the lowest bcrypt cost.
    pub(crate) fn with_user(id: i64, email: &str, plaintext: &str) -> Self {
        let password_hash = match password::hash(plaintext, TEST_COST) {
            Ok(hash) => hash,
            Err(e) => panic!("failed to hash test password: {e}"),
        };

        Self::with_raw_hash(id, email, &password_hash)
    }

    pub(crate) fn with_raw_hash(id: i64, email: &str, password_hash: &str) -> Self {
        Self {
            users: vec![UserRecord {
                id,
                email: email.to_string(),
                password_hash: password_hash.to_string(),
            }],
            ..Self::default()
        }
    }

    /// Store that fails every call, standing in for an unreachable database.
    pub(crate) fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub(crate) fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);

        if self.failing {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }

        Ok(self.users.iter().find(|user| user.email == email).cloned())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        if self.failing {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }

        Ok(())
    }
}
