use super::{current_session_id, found_with_headers, USERNAME_COOKIE_NAME};
use crate::api::{cookie, error::AppError, session::SESSION_COOKIE_NAME, state::AppState};
use axum::{extract::Extension, http::HeaderMap, response::Response};
use std::sync::Arc;
use tracing::info;

/// `GET /logout` deletes the identity cookie, clears the session, and
/// redirects to the login form. Unconditional: logging out while logged out
/// is fine.
///
/// # Errors
/// Returns an error on session store failures.
pub async fn logout(
    headers: HeaderMap,
    state: Extension<Arc<AppState>>,
) -> Result<Response, AppError> {
    if let Some(session_id) = current_session_id(&state, &headers) {
        state.store().delete(&session_id).await?;
    }

    // Always clear both cookies, even if there was no session record.
    let config = state.config();
    let mut response_headers = HeaderMap::new();
    cookie::append_set_cookie(
        &mut response_headers,
        cookie::delete_cookie(config, USERNAME_COOKIE_NAME),
    );
    cookie::append_set_cookie(
        &mut response_headers,
        cookie::delete_cookie(config, SESSION_COOKIE_NAME),
    );

    info!("User logged out");

    Ok(found_with_headers("/login", response_headers))
}
