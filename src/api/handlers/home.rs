use super::{current_username, found};
use crate::api::pages;
use axum::{
    http::HeaderMap,
    response::{Html, IntoResponse, Response},
};

/// `GET /` renders the home page when logged in, otherwise redirects to
/// the login form.
pub async fn home(headers: HeaderMap) -> Response {
    match current_username(&headers) {
        Some(username) => Html(pages::home(&username)).into_response(),
        None => found("/login"),
    }
}
