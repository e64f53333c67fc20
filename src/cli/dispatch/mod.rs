use crate::cli::{
    actions::{server, Action},
    commands::{
        ARG_COOKIE_LIFETIME, ARG_ENV, ARG_PORT, ARG_SECRET_KEY, ARG_SESSION_DIR,
        ARG_SESSION_LIFETIME,
    },
};
use anyhow::{anyhow, Result};
use secrecy::SecretString;
use std::path::PathBuf;

/// Map parsed arguments to an [`Action`].
///
/// # Errors
/// Returns an error if a defaulted argument is somehow missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let get_string = |name: &str| -> Result<String> {
        matches
            .get_one::<String>(name)
            .map(String::to_string)
            .ok_or_else(|| anyhow!("missing required argument: --{name}"))
    };

    Ok(Action::Server(server::Args {
        port: matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080),
        env: get_string(ARG_ENV)?,
        session_dir: PathBuf::from(get_string(ARG_SESSION_DIR)?),
        secret_key: SecretString::from(get_string(ARG_SECRET_KEY)?),
        cookie_lifetime: matches
            .get_one::<u64>(ARG_COOKIE_LIFETIME)
            .copied()
            .unwrap_or(1800),
        session_lifetime: matches
            .get_one::<u64>(ARG_SESSION_LIFETIME)
            .copied()
            .unwrap_or(1800),
    }))
}
