//! # hospital-auth
//!
//! Login endpoint for the hospital management application.
//!
//! A single `POST /login` route accepts an email and password, looks the email
//! up in the `users` table and compares the password against the stored bcrypt
//! hash.
//!
//! ## Account enumeration
//!
//! An unknown email and a wrong password produce the same `401` response body.
//! Internal failures are logged server-side and answered with a fixed `500`
//! message; query text and error details never reach the client.
//!
//! ## Passwords
//!
//! Plaintext passwords are held in [`secrecy::SecretString`] from the moment
//! they leave the request body and are never logged, stored or echoed back.

pub mod api;
pub mod auth;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
