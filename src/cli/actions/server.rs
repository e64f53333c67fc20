use crate::api::{
    self,
    state::{AppConfig, AppState, Profile},
};
use anyhow::Result;
use secrecy::SecretString;
use std::{path::PathBuf, sync::Arc};
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub env: String,
    pub session_dir: PathBuf,
    pub secret_key: SecretString,
    pub cookie_lifetime: u64,
    pub session_lifetime: u64,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the profile is unknown, the session directory cannot
/// be created, or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let profile = Profile::from_name(&args.env)?;

    let config = AppConfig::new(profile)
        .with_session_dir(args.session_dir)
        .with_secret_key(args.secret_key)
        .with_cookie_lifetime_seconds(args.cookie_lifetime)
        .with_session_lifetime_seconds(args.session_lifetime);

    debug!("Profile: {profile:?}, config: {config:?}");

    let state = AppState::new(config)?;

    api::new(args.port, Arc::new(state)).await
}
