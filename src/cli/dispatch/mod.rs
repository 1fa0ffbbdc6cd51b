//! Map validated command-line arguments to the action to run.

use crate::api::DEFAULT_PORT;
use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::{ARG_PORT, database};
use anyhow::Result;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(DEFAULT_PORT);
    let database = database::Options::parse(matches)?;

    Ok(Action::Server(Args { port, database }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn server_action_from_args() {
        temp_env::with_vars_unset(["HOSPITAL_AUTH_PORT", "HOSPITAL_AUTH_DB_PORT"], || {
            let matches = crate::cli::commands::new().get_matches_from(vec![
                "hospital-auth",
                "--port",
                "3001",
                "--db-user",
                "root",
                "--db-password",
                "tu_password_de_mysql",
                "--db-name",
                "mi_proyecto_db",
            ]);

            let Action::Server(args) = handler(&matches).unwrap();

            assert_eq!(args.port, 3001);
            assert_eq!(args.database.user, "root");
            assert_eq!(args.database.port, 5432);
            assert_eq!(
                args.database.password.expose_secret(),
                "tu_password_de_mysql"
            );
        });
    }
}
