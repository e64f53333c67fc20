//! # Vizito
//!
//! `vizito` is a small web service demonstrating cookie-based "login" and a
//! per-session visit counter.
//!
//! ## Identity model
//!
//! There is no user store and no password. The `username` cookie is the sole
//! authentication signal: any value matching the configured
//! `Firstname_Lastname` pattern is accepted at login and trusted afterwards.
//! This is self-assertion by design, not an account system.
//!
//! ## Sessions
//!
//! Server-side state lives in a filesystem session store, one JSON file per
//! session. The session id is an opaque ULID delivered in its own cookie,
//! signed with the configured secret key so a client cannot point the server
//! at an arbitrary file. The only session payload is the visit counter (and
//! a CSRF token when enforcement is enabled).

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
