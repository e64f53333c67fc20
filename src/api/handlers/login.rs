//! Login form and submission.
//!
//! "Login" is self-assertion: a username matching the configured pattern is
//! accepted as-is and stored in the identity cookie. A successful submission
//! also resets the visit counter to zero so the first profile view reads 1.

use super::{current_session_id, current_username, found, found_with_headers, validate_username};
use crate::api::{
    cookie,
    error::AppError,
    pages,
    session::{mint_session_id, sign_session_id, SessionData, SESSION_COOKIE_NAME},
    state::AppState,
};
use anyhow::{Context, Result};
use axum::{
    extract::Extension,
    http::HeaderMap,
    response::{Html, IntoResponse, Response},
    Form,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::{rngs::OsRng, RngCore};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

const CSRF_ERROR_MESSAGE: &str = "Invalid or missing CSRF token, reload the form and retry";

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub csrf_token: String,
}

/// The raw token goes to the form and the session; no hashing is needed
/// because it never outlives either.
fn generate_csrf_token() -> Result<String> {
    let mut bytes = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate csrf token")?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// `GET /login`: already authenticated users are sent to the profile,
/// everyone else gets the form. With CSRF enforcement on, the token is kept
/// in the session and embedded as a hidden field.
///
/// # Errors
/// Returns an error on session store failures.
pub async fn login_form(
    headers: HeaderMap,
    state: Extension<Arc<AppState>>,
) -> Result<Response, AppError> {
    if current_username(&headers).is_some() {
        return Ok(found("/profile"));
    }

    let config = state.config();
    if !config.csrf_enabled() {
        return Ok(Html(pages::login(None, None, config.username_regex())).into_response());
    }

    // The token needs a session to live in; reuse the browser's session or
    // mint one and hand its cookie back with the form.
    let (session_id, session, minted) = match current_session_id(&state, &headers) {
        Some(id) => {
            let data = state.store().load(&id).await?;
            (id, data, false)
        }
        None => (mint_session_id(), None, true),
    };

    let mut session = session.unwrap_or_else(|| state.store().new_data());
    let token = match session.csrf_token.clone() {
        Some(token) => token,
        None => {
            let token = generate_csrf_token()?;
            session.csrf_token = Some(token.clone());
            state.store().save(&session_id, &session).await?;
            token
        }
    };

    let mut response_headers = HeaderMap::new();
    if minted {
        let signed = sign_session_id(config.secret_key(), &session_id);
        cookie::append_set_cookie(
            &mut response_headers,
            cookie::set_cookie(config, SESSION_COOKIE_NAME, &signed, None),
        );
    }

    Ok((
        response_headers,
        Html(pages::login(None, Some(&token), config.username_regex())),
    )
        .into_response())
}

/// `POST /login`: validate, then set the identity cookie, initialize the
/// counter to 0, and redirect to the profile. Validation failures re-render
/// the form with the message and a 200.
///
/// # Errors
/// Returns an error on session store failures.
pub async fn login_submit(
    headers: HeaderMap,
    state: Extension<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    if current_username(&headers).is_some() {
        return Ok(found("/profile"));
    }

    let config = state.config();
    let pattern = config.username_regex();

    let session_id = current_session_id(&state, &headers);
    let session = match &session_id {
        Some(id) => state.store().load(id).await?,
        None => None,
    };
    let expected_token = session.as_ref().and_then(|data| data.csrf_token.as_deref());

    if config.csrf_enabled()
        && (expected_token.is_none() || expected_token != Some(form.csrf_token.as_str()))
    {
        warn!("Rejected login submission with a bad CSRF token");
        return Ok(Html(pages::login(Some(CSRF_ERROR_MESSAGE), expected_token, pattern))
            .into_response());
    }

    // Validate the raw value; the anchored pattern rejects stray whitespace.
    let username = form.username.as_str();
    if let Err(message) = validate_username(state.username_regex(), username) {
        debug!("Rejected username: {username}");
        return Ok(Html(pages::login(Some(message), expected_token, pattern)).into_response());
    }

    // Fresh counter for this login; the form's CSRF token is spent.
    let session_id = session_id.unwrap_or_else(mint_session_id);
    let fresh = SessionData {
        csrf_token: None,
        ..state.store().new_data()
    };
    state.store().save(&session_id, &fresh).await?;

    let mut response_headers = HeaderMap::new();
    cookie::append_set_cookie(
        &mut response_headers,
        cookie::set_cookie(config, super::USERNAME_COOKIE_NAME, username, None),
    );
    let signed = sign_session_id(config.secret_key(), &session_id);
    cookie::append_set_cookie(
        &mut response_headers,
        cookie::set_cookie(config, SESSION_COOKIE_NAME, &signed, None),
    );

    info!("User {username} logged in successfully");

    Ok(found_with_headers("/profile", response_headers))
}

#[cfg(test)]
mod tests {
    use super::generate_csrf_token;

    #[test]
    fn csrf_tokens_are_unique_and_url_safe() {
        let a = generate_csrf_token().expect("token");
        let b = generate_csrf_token().expect("token");
        assert_ne!(a, b);
        assert!(a
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
