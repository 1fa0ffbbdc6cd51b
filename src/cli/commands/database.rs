use crate::api::{
    DEFAULT_ACQUIRE_TIMEOUT_SECONDS, DEFAULT_DB_HOST, DEFAULT_DB_PORT, DEFAULT_MAX_CONNECTIONS,
};
use anyhow::{Context, Result};
use clap::{Arg, Command};
use secrecy::SecretString;

pub const ARG_DB_HOST: &str = "db-host";
pub const ARG_DB_PORT: &str = "db-port";
pub const ARG_DB_USER: &str = "db-user";
pub const ARG_DB_PASSWORD: &str = "db-password";
pub const ARG_DB_NAME: &str = "db-name";
pub const ARG_DB_MAX_CONNECTIONS: &str = "db-max-connections";
pub const ARG_DB_ACQUIRE_TIMEOUT: &str = "db-acquire-timeout";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_DB_HOST)
                .long(ARG_DB_HOST)
                .help("Database host")
                .env("HOSPITAL_AUTH_DB_HOST")
                .default_value(DEFAULT_DB_HOST),
        )
        .arg(
            Arg::new(ARG_DB_PORT)
                .long(ARG_DB_PORT)
                .help("Database port")
                .env("HOSPITAL_AUTH_DB_PORT")
                .default_value(DEFAULT_DB_PORT.to_string())
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_DB_USER)
                .long(ARG_DB_USER)
                .help("Database user")
                .env("HOSPITAL_AUTH_DB_USER")
                .required(true),
        )
        .arg(
            Arg::new(ARG_DB_PASSWORD)
                .long(ARG_DB_PASSWORD)
                .help("Database password")
                .env("HOSPITAL_AUTH_DB_PASSWORD")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_DB_NAME)
                .long(ARG_DB_NAME)
                .help("Database name")
                .env("HOSPITAL_AUTH_DB_NAME")
                .required(true),
        )
        .arg(
            Arg::new(ARG_DB_MAX_CONNECTIONS)
                .long(ARG_DB_MAX_CONNECTIONS)
                .help("Maximum number of pooled database connections")
                .env("HOSPITAL_AUTH_DB_MAX_CONNECTIONS")
                .default_value(DEFAULT_MAX_CONNECTIONS.to_string())
                .value_parser(clap::value_parser!(u32).range(1..)),
        )
        .arg(
            Arg::new(ARG_DB_ACQUIRE_TIMEOUT)
                .long(ARG_DB_ACQUIRE_TIMEOUT)
                .help("Seconds to wait for a pooled connection before failing the request")
                .env("HOSPITAL_AUTH_DB_ACQUIRE_TIMEOUT")
                .default_value(DEFAULT_ACQUIRE_TIMEOUT_SECONDS.to_string())
                .value_parser(clap::value_parser!(u64)),
        )
}

#[derive(Clone)]
pub struct Options {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: SecretString,
    pub name: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_seconds", &self.acquire_timeout_seconds)
            .finish()
    }
}

impl Options {
    /// Read the database options out of validated matches.
    ///
    /// # Errors
    /// Returns an error if a required argument is missing.
    pub fn parse(matches: &clap::ArgMatches) -> Result<Self> {
        let required = |id: &str| -> Result<String> {
            matches
                .get_one::<String>(id)
                .cloned()
                .with_context(|| format!("missing required argument: --{id}"))
        };

        Ok(Self {
            host: required(ARG_DB_HOST)?,
            port: matches.get_one::<u16>(ARG_DB_PORT).copied().unwrap_or(DEFAULT_DB_PORT),
            user: required(ARG_DB_USER)?,
            password: SecretString::from(required(ARG_DB_PASSWORD)?),
            name: required(ARG_DB_NAME)?,
            max_connections: matches
                .get_one::<u32>(ARG_DB_MAX_CONNECTIONS)
                .copied()
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),
            acquire_timeout_seconds: matches
                .get_one::<u64>(ARG_DB_ACQUIRE_TIMEOUT)
                .copied()
                .unwrap_or(DEFAULT_ACQUIRE_TIMEOUT_SECONDS),
        })
    }
}
