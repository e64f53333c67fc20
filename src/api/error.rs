//! Unhandled server faults, rendered as the generic 500 page.

use crate::api::pages;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::error;

/// Wrapper turning any `anyhow`-compatible error into a logged 500 response.
///
/// Handlers return `Result<_, AppError>` so `?` covers session store I/O and
/// other faults; the client only ever sees the generic error page.
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Server error: {:#}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(pages::internal_error()),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
