//! Signed session ids and the filesystem session store.
//!
//! The session id is a ULID delivered in its own cookie as `<id>.<sig>`,
//! where the signature is a URL-safe base64 SHA-256 over the secret key and
//! the id. A missing, malformed, or tampered cookie verifies to `None` and
//! is treated as "no session"; it is never an error.
//!
//! Server-side state is one JSON file per session id. Expiry is checked
//! lazily on load: an expired record is removed and reported as absent.

use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::{
    io::ErrorKind,
    path::PathBuf,
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use tracing::warn;
use ulid::Ulid;

/// Cookie carrying the signed session id, separate from the identity cookie.
pub const SESSION_COOKIE_NAME: &str = "session";

/// Mint a fresh opaque session id.
#[must_use]
pub fn mint_session_id() -> String {
    Ulid::new().to_string()
}

/// Produce the cookie value for a session id: `<id>.<sig>`.
#[must_use]
pub fn sign_session_id(key: &SecretString, id: &str) -> String {
    format!("{id}.{}", signature(key, id))
}

/// Verify a session cookie value and return the embedded id.
///
/// Returns `None` for anything that does not parse as `<ulid>.<sig>` with a
/// matching signature.
#[must_use]
pub fn verify_session_cookie(key: &SecretString, value: &str) -> Option<String> {
    let (id, sig) = value.split_once('.')?;
    if Ulid::from_string(id).is_err() {
        return None;
    }
    let expected = signature(key, id);
    if constant_time_eq(expected.as_bytes(), sig.as_bytes()) {
        Some(id.to_string())
    } else {
        None
    }
}

fn signature(key: &SecretString, id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.expose_secret().as_bytes());
    hasher.update(b".");
    hasher.update(id.as_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}

/// Per-session server-side state.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionData {
    pub visit_count: u64,
    pub csrf_token: Option<String>,
    pub expires_at: u64,
}

/// Filesystem-backed session store, one JSON file per session id.
///
/// No locking: a browser session issues one request at a time, and each
/// request reads and rewrites only its own file.
pub struct SessionStore {
    dir: PathBuf,
    lifetime: Duration,
}

impl SessionStore {
    #[must_use]
    pub const fn new(dir: PathBuf, lifetime: Duration) -> Self {
        Self { dir, lifetime }
    }

    /// A blank record expiring one lifetime from now.
    #[must_use]
    pub fn new_data(&self) -> SessionData {
        SessionData {
            visit_count: 0,
            csrf_token: None,
            expires_at: self.deadline(),
        }
    }

    /// Load a session record. Expired or unreadable records are removed and
    /// reported as absent.
    ///
    /// # Errors
    /// Returns an error on filesystem failures other than a missing file.
    pub async fn load(&self, id: &str) -> Result<Option<SessionData>> {
        let path = self.path_for(id)?;

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read session {id}"));
            }
        };

        let Ok(data) = serde_json::from_slice::<SessionData>(&bytes) else {
            warn!("Discarding unreadable session record: {id}");
            self.delete(id).await?;
            return Ok(None);
        };

        if data.expires_at <= now_unix() {
            self.delete(id).await?;
            return Ok(None);
        }

        Ok(Some(data))
    }

    /// Persist a session record, refreshing its expiry.
    ///
    /// # Errors
    /// Returns an error if the record cannot be serialized or written.
    pub async fn save(&self, id: &str, data: &SessionData) -> Result<()> {
        let record = SessionData {
            expires_at: self.deadline(),
            ..data.clone()
        };
        let path = self.path_for(id)?;
        let bytes =
            serde_json::to_vec(&record).with_context(|| format!("failed to encode session {id}"))?;

        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("failed to write session {id}"))
    }

    /// Remove a session record. Absent records are a no-op.
    ///
    /// # Errors
    /// Returns an error on filesystem failures other than a missing file.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let path = self.path_for(id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("failed to delete session {id}")),
        }
    }

    /// Increment the visit counter: read current (0 when absent), add one,
    /// store back, return the new value.
    ///
    /// # Errors
    /// Returns an error on filesystem failures.
    pub async fn increment_visits(&self, id: &str) -> Result<u64> {
        let mut data = match self.load(id).await? {
            Some(data) => data,
            None => self.new_data(),
        };
        data.visit_count += 1;
        self.save(id, &data).await?;
        Ok(data.visit_count)
    }

    fn deadline(&self) -> u64 {
        now_unix().saturating_add(self.lifetime.as_secs())
    }

    // Ids come from verified cookies, but the store is the last line of
    // defense against a crafted id escaping the session directory.
    fn path_for(&self, id: &str) -> Result<PathBuf> {
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(anyhow!("invalid session id: {id}"));
        }
        Ok(self.dir.join(format!("{id}.json")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> SecretString {
        SecretString::from("test_secret_key")
    }

    fn store(dir: &tempfile::TempDir) -> SessionStore {
        SessionStore::new(dir.path().to_path_buf(), Duration::from_secs(60))
    }

    #[test]
    fn sign_and_verify_round_trip() {
        let key = test_key();
        let id = mint_session_id();
        let cookie = sign_session_id(&key, &id);

        assert_eq!(verify_session_cookie(&key, &cookie).as_deref(), Some(&*id));
    }

    #[test]
    fn verify_rejects_tampered_values() {
        let key = test_key();
        let id = mint_session_id();
        let cookie = sign_session_id(&key, &id);

        let other_id = mint_session_id();
        let (_, sig) = cookie.split_once('.').expect("signed value");
        let forged = format!("{other_id}.{sig}");

        assert_eq!(verify_session_cookie(&key, &forged), None);
        assert_eq!(verify_session_cookie(&key, "garbage"), None);
        assert_eq!(verify_session_cookie(&key, &format!("{id}.")), None);
        assert_eq!(verify_session_cookie(&key, "not-a-ulid.sig"), None);
    }

    #[test]
    fn verify_rejects_other_key() {
        let id = mint_session_id();
        let cookie = sign_session_id(&test_key(), &id);
        assert_eq!(
            verify_session_cookie(&SecretString::from("another_key"), &cookie),
            None
        );
    }

    #[tokio::test]
    async fn load_absent_is_none() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = store(&dir);

        assert_eq!(store.load(&mint_session_id()).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn save_then_load_round_trips() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = store(&dir);
        let id = mint_session_id();

        let mut data = store.new_data();
        data.visit_count = 3;
        data.csrf_token = Some("token".to_string());
        store.save(&id, &data).await?;

        let loaded = store.load(&id).await?.expect("record present");
        assert_eq!(loaded.visit_count, 3);
        assert_eq!(loaded.csrf_token.as_deref(), Some("token"));
        Ok(())
    }

    #[tokio::test]
    async fn expired_record_is_removed_and_absent() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = SessionStore::new(dir.path().to_path_buf(), Duration::from_secs(0));
        let id = mint_session_id();

        store.save(&id, &store.new_data()).await?;
        assert_eq!(store.load(&id).await?, None);
        assert!(!dir.path().join(format!("{id}.json")).exists());
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_record_is_discarded() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = store(&dir);
        let id = mint_session_id();

        tokio::fs::write(dir.path().join(format!("{id}.json")), b"not json").await?;
        assert_eq!(store.load(&id).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn delete_is_idempotent() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = store(&dir);
        let id = mint_session_id();

        store.save(&id, &store.new_data()).await?;
        store.delete(&id).await?;
        store.delete(&id).await?;
        assert_eq!(store.load(&id).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn increment_counts_from_zero() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = store(&dir);
        let id = mint_session_id();

        assert_eq!(store.increment_visits(&id).await?, 1);
        assert_eq!(store.increment_visits(&id).await?, 2);
        assert_eq!(store.increment_visits(&id).await?, 3);

        // reset, then the count starts over
        store.delete(&id).await?;
        assert_eq!(store.increment_visits(&id).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn crafted_id_cannot_escape_the_session_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store(&dir);

        assert!(store.load("../etc/passwd").await.is_err());
        assert!(store.delete("").await.is_err());
        assert!(store.save("a/b", &store.new_data()).await.is_err());
    }
}
