//! `-v` / `HOSPITAL_AUTH_LOG_LEVEL` handling.

use clap::{Arg, ArgAction, ArgMatches, Command, builder::ValueParser};
use tracing::Level;

pub const ARG_VERBOSITY: &str = "verbosity";

// indexed by verbosity count
const LEVELS: [Level; 5] = [
    Level::ERROR,
    Level::WARN,
    Level::INFO,
    Level::DEBUG,
    Level::TRACE,
];

/// Accept a level name (`warn`, `DEBUG`, ...) or a count, as `-v` would produce.
#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(|value: &str| -> Result<u8, String> {
        if let Ok(count) = value.parse::<u8>() {
            return Ok(count);
        }

        LEVELS
            .iter()
            .position(|level| level.as_str().eq_ignore_ascii_case(value))
            .and_then(|index| u8::try_from(index).ok())
            .ok_or_else(|| {
                format!("invalid log level `{value}`, expected error, warn, info, debug, trace or a number")
            })
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
            .env("HOSPITAL_AUTH_LOG_LEVEL")
            .global(true)
            .action(ArgAction::Count)
            .value_parser(validator_log_level()),
    )
}

/// Level requested on the command line; `None` leaves the default (ERROR).
#[must_use]
pub fn level(matches: &ArgMatches) -> Option<Level> {
    match matches.get_one::<u8>(ARG_VERBOSITY).copied().unwrap_or(0) {
        0 => None,
        count => Some(
            LEVELS
                .get(usize::from(count))
                .copied()
                .unwrap_or(Level::TRACE),
        ),
    }
}
