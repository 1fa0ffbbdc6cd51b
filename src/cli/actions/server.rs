use crate::{api, cli::commands::database};
use anyhow::{Context, Result};
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub database: database::Options,
}

impl Args {
    /// Turn the parsed flags into the server configuration.
    #[must_use]
    pub fn into_config(self) -> api::Config {
        let db = self.database;

        let database = api::DatabaseConfig::new(db.host, db.user, db.password, db.name)
            .with_port(db.port)
            .with_max_connections(db.max_connections)
            .with_acquire_timeout_seconds(db.acquire_timeout_seconds);

        api::Config::new(self.port, database)
    }
}

/// Execute the server action.
/// # Errors
/// Returns an error if the server fails to bind or serve.
pub async fn execute(args: Args) -> Result<()> {
    let config = args.into_config();

    debug!("Server config: {:?}", config);

    api::new(config).await.context("Server failed")
}
