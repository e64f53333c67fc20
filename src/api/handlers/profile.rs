use super::{current_session_id, current_username, found};
use crate::api::{
    cookie,
    error::AppError,
    pages,
    session::{mint_session_id, sign_session_id, SESSION_COOKIE_NAME},
    state::AppState,
};
use axum::{
    extract::Extension,
    http::HeaderMap,
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;
use tracing::debug;

/// `GET /profile` is the protected page: anonymous visitors are redirected
/// to the login form, authenticated ones get the visit counter incremented
/// by exactly one and rendered.
///
/// # Errors
/// Returns an error on session store failures.
pub async fn profile(
    headers: HeaderMap,
    state: Extension<Arc<AppState>>,
) -> Result<Response, AppError> {
    let Some(username) = current_username(&headers) else {
        return Ok(found("/login"));
    };

    // An authenticated browser without a usable session cookie (expired,
    // tampered, first visit after a server wipe) gets a fresh one; the count
    // then restarts from 1.
    let (session_id, minted) = match current_session_id(&state, &headers) {
        Some(id) => (id, false),
        None => (mint_session_id(), true),
    };

    let visits = state.store().increment_visits(&session_id).await?;
    debug!("Visit {visits} for session {session_id}");

    let mut response_headers = HeaderMap::new();
    if minted {
        let config = state.config();
        let signed = sign_session_id(config.secret_key(), &session_id);
        cookie::append_set_cookie(
            &mut response_headers,
            cookie::set_cookie(config, SESSION_COOKIE_NAME, &signed, None),
        );
    }

    Ok((response_headers, Html(pages::profile(&username, visits))).into_response())
}
