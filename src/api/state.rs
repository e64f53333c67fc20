//! Configuration profiles and shared application state.

use crate::api::session::SessionStore;
use anyhow::{anyhow, Context, Result};
use regex::Regex;
use secrecy::SecretString;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// Two capitalized words joined by an underscore, e.g. `John_Doe`.
pub const DEFAULT_USERNAME_REGEX: &str = "^[A-Z][a-z]+_[A-Z][a-z]+$";

const DEFAULT_COOKIE_LIFETIME_SECONDS: u64 = 30 * 60;
const DEFAULT_SESSION_LIFETIME_SECONDS: u64 = 30 * 60;
const DEFAULT_SESSION_DIR: &str = "vizito_sessions";
const DEFAULT_SECRET_KEY: &str = "default_secret_key";

/// Deployment profile selected at startup.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Profile {
    Development,
    Production,
    Testing,
}

impl Profile {
    /// Resolve a profile by name (case-insensitive).
    ///
    /// # Errors
    /// Returns an error for unknown names.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            "testing" => Ok(Self::Testing),
            _ => Err(anyhow!("unknown configuration profile: {name}")),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Testing => "testing",
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    profile: Profile,
    cookie_secure: bool,
    csrf_enabled: bool,
    username_regex: String,
    cookie_lifetime_seconds: u64,
    session_lifetime_seconds: u64,
    session_dir: PathBuf,
    secret_key: SecretString,
}

impl AppConfig {
    /// Profile defaults: only production marks cookies `Secure`, only the
    /// testing profile turns CSRF enforcement off.
    #[must_use]
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            cookie_secure: matches!(profile, Profile::Production),
            csrf_enabled: !matches!(profile, Profile::Testing),
            username_regex: DEFAULT_USERNAME_REGEX.to_string(),
            cookie_lifetime_seconds: DEFAULT_COOKIE_LIFETIME_SECONDS,
            session_lifetime_seconds: DEFAULT_SESSION_LIFETIME_SECONDS,
            session_dir: PathBuf::from(DEFAULT_SESSION_DIR),
            secret_key: SecretString::from(DEFAULT_SECRET_KEY),
        }
    }

    #[must_use]
    pub fn with_username_regex(mut self, pattern: String) -> Self {
        self.username_regex = pattern;
        self
    }

    #[must_use]
    pub fn with_cookie_lifetime_seconds(mut self, seconds: u64) -> Self {
        self.cookie_lifetime_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_session_lifetime_seconds(mut self, seconds: u64) -> Self {
        self.session_lifetime_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_session_dir(mut self, dir: PathBuf) -> Self {
        self.session_dir = dir;
        self
    }

    #[must_use]
    pub fn with_secret_key(mut self, key: SecretString) -> Self {
        self.secret_key = key;
        self
    }

    #[must_use]
    pub const fn profile(&self) -> Profile {
        self.profile
    }

    #[must_use]
    pub const fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }

    #[must_use]
    pub const fn csrf_enabled(&self) -> bool {
        self.csrf_enabled
    }

    #[must_use]
    pub fn username_regex(&self) -> &str {
        &self.username_regex
    }

    #[must_use]
    pub const fn cookie_lifetime_seconds(&self) -> u64 {
        self.cookie_lifetime_seconds
    }

    #[must_use]
    pub const fn session_lifetime_seconds(&self) -> u64 {
        self.session_lifetime_seconds
    }

    #[must_use]
    pub fn session_dir(&self) -> &Path {
        &self.session_dir
    }

    #[must_use]
    pub const fn secret_key(&self) -> &SecretString {
        &self.secret_key
    }
}

/// Shared state threaded through every handler via `Extension<Arc<AppState>>`.
pub struct AppState {
    config: AppConfig,
    username_regex: Regex,
    store: SessionStore,
}

impl AppState {
    /// Compile the username pattern, prepare the session directory, and
    /// build the session store.
    ///
    /// # Errors
    /// Returns an error if the pattern does not compile or the session
    /// directory cannot be created.
    pub fn new(config: AppConfig) -> Result<Self> {
        let username_regex = Regex::new(config.username_regex()).with_context(|| {
            format!("invalid username pattern: {}", config.username_regex())
        })?;

        std::fs::create_dir_all(config.session_dir()).with_context(|| {
            format!(
                "failed to create session directory: {}",
                config.session_dir().display()
            )
        })?;

        let store = SessionStore::new(
            config.session_dir().to_path_buf(),
            Duration::from_secs(config.session_lifetime_seconds()),
        );

        Ok(Self {
            config,
            username_regex,
            store,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub const fn username_regex(&self) -> &Regex {
        &self.username_regex
    }

    #[must_use]
    pub const fn store(&self) -> &SessionStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn profile_from_name_accepts_known_profiles() -> Result<()> {
        assert_eq!(Profile::from_name("development")?, Profile::Development);
        assert_eq!(Profile::from_name("PRODUCTION")?, Profile::Production);
        assert_eq!(Profile::from_name("Testing")?, Profile::Testing);
        assert!(Profile::from_name("staging").is_err());
        Ok(())
    }

    #[test]
    fn config_defaults_per_profile() {
        let dev = AppConfig::new(Profile::Development);
        assert!(!dev.cookie_secure());
        assert!(dev.csrf_enabled());

        let prod = AppConfig::new(Profile::Production);
        assert!(prod.cookie_secure());
        assert!(prod.csrf_enabled());

        let testing = AppConfig::new(Profile::Testing);
        assert!(!testing.cookie_secure());
        assert!(!testing.csrf_enabled());

        assert_eq!(dev.username_regex(), DEFAULT_USERNAME_REGEX);
        assert_eq!(dev.cookie_lifetime_seconds(), 1800);
        assert_eq!(dev.session_lifetime_seconds(), 1800);
        assert_eq!(dev.secret_key().expose_secret(), "default_secret_key");
    }

    #[test]
    fn config_overrides() {
        let config = AppConfig::new(Profile::Development)
            .with_username_regex("^[a-z]+$".to_string())
            .with_cookie_lifetime_seconds(60)
            .with_session_lifetime_seconds(120)
            .with_session_dir(PathBuf::from("/tmp/vizito"))
            .with_secret_key(SecretString::from("k"));

        assert_eq!(config.username_regex(), "^[a-z]+$");
        assert_eq!(config.cookie_lifetime_seconds(), 60);
        assert_eq!(config.session_lifetime_seconds(), 120);
        assert_eq!(config.session_dir(), Path::new("/tmp/vizito"));
        assert_eq!(config.secret_key().expose_secret(), "k");
    }

    #[test]
    fn app_state_rejects_invalid_pattern() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = AppConfig::new(Profile::Testing)
            .with_session_dir(dir.path().to_path_buf())
            .with_username_regex("[".to_string());

        assert!(AppState::new(config).is_err());
    }

    #[test]
    fn app_state_compiles_pattern_and_creates_dir() -> Result<()> {
        let dir = tempfile::tempdir().expect("tempdir");
        let sessions = dir.path().join("sessions");
        let config =
            AppConfig::new(Profile::Testing).with_session_dir(sessions.clone());

        let state = AppState::new(config)?;

        assert!(sessions.is_dir());
        assert!(state.username_regex().is_match("John_Doe"));
        assert!(!state.username_regex().is_match("john_doe"));
        Ok(())
    }
}
