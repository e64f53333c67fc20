pub mod health;
pub use self::health::health;

pub mod home;
pub use self::home::home;

pub mod login;
pub use self::login::{login_form, login_submit};

pub mod logout;
pub use self::logout::logout;

pub mod profile;
pub use self::profile::profile;

// common functions for the handlers
use crate::api::{
    cookie,
    session::{verify_session_cookie, SESSION_COOKIE_NAME},
    state::AppState,
};
use axum::{
    http::{header::LOCATION, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use regex::Regex;

/// Cookie holding the asserted identity, the sole authentication signal.
pub const USERNAME_COOKIE_NAME: &str = "username";

pub const USERNAME_REQUIRED_MESSAGE: &str = "Username is required";
pub const USERNAME_FORMAT_MESSAGE: &str =
    "Username must be in the format Firstname_Lastname (e.g., John_Doe)";

/// Validate a submitted username against the configured pattern.
///
/// # Errors
/// Returns the message to re-render the form with.
pub fn validate_username(regex: &Regex, candidate: &str) -> Result<(), &'static str> {
    if candidate.is_empty() {
        return Err(USERNAME_REQUIRED_MESSAGE);
    }
    if regex.is_match(candidate) {
        Ok(())
    } else {
        Err(USERNAME_FORMAT_MESSAGE)
    }
}

/// Identity asserted by the request, if any. Cookie absent means logged out.
#[must_use]
pub fn current_username(headers: &HeaderMap) -> Option<String> {
    cookie::get_cookie(headers, USERNAME_COOKIE_NAME)
}

/// Session id carried by the request, after signature verification.
#[must_use]
pub fn current_session_id(state: &AppState, headers: &HeaderMap) -> Option<String> {
    cookie::get_cookie(headers, SESSION_COOKIE_NAME)
        .and_then(|value| verify_session_cookie(state.config().secret_key(), &value))
}

/// Literal `302 Found` redirect. `axum::response::Redirect` emits 303/307,
/// and this service's contract is a plain 302.
#[must_use]
pub fn found(location: &'static str) -> Response {
    found_with_headers(location, HeaderMap::new())
}

/// `302 Found` carrying extra headers (cookies to set or clear).
#[must_use]
pub fn found_with_headers(location: &'static str, mut headers: HeaderMap) -> Response {
    headers.insert(LOCATION, HeaderValue::from_static(location));
    (StatusCode::FOUND, headers).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::state::DEFAULT_USERNAME_REGEX;

    fn default_regex() -> Regex {
        Regex::new(DEFAULT_USERNAME_REGEX).expect("default pattern compiles")
    }

    #[test]
    fn validate_username_accepts_firstname_lastname() {
        let regex = default_regex();
        assert!(validate_username(&regex, "John_Doe").is_ok());
        assert!(validate_username(&regex, "Jane_Smith").is_ok());
    }

    #[test]
    fn validate_username_rejects_bad_shapes() {
        let regex = default_regex();
        for candidate in [
            "invalid_username",
            "John_doe",
            "john_Doe",
            "JohnDoe",
            "John Doe",
            "John_Doe_Extra",
            "J_D",
            "JOHN_DOE",
            " John_Doe",
            "John_Doe ",
        ] {
            assert_eq!(
                validate_username(&regex, candidate),
                Err(USERNAME_FORMAT_MESSAGE),
                "{candidate} should be rejected"
            );
        }
    }

    #[test]
    fn validate_username_requires_a_value() {
        let regex = default_regex();
        assert_eq!(
            validate_username(&regex, ""),
            Err(USERNAME_REQUIRED_MESSAGE)
        );
    }

    #[test]
    fn found_is_a_plain_302() {
        let response = found("/login");
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(LOCATION),
            Some(&HeaderValue::from_static("/login"))
        );
    }
}
