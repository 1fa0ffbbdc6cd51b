//! Credential verification.
//!
//! [`authenticate`] is the single entry point: it checks input presence, looks
//! the user up through a [`CredentialStore`] and compares the password with
//! [`password::verify`].

pub mod password;
pub mod store;

#[cfg(test)]
pub(crate) mod memory;

mod error;
mod service;

pub use self::error::LoginError;
pub use self::service::{AuthenticatedUser, authenticate};
pub use self::store::{CredentialStore, PgCredentialStore, StoreError, UserRecord};
