//! Cookie accessor.
//!
//! One place builds `Set-Cookie` values and parses the incoming `Cookie`
//! header, so every cookie carries the same attributes: `Path=/`, `HttpOnly`,
//! `SameSite=Lax`, `Max-Age` from the configured lifetime, and `Secure` when
//! the active profile requires it.

use crate::api::state::AppConfig;
use axum::http::{
    header::{InvalidHeaderValue, COOKIE, SET_COOKIE},
    HeaderMap, HeaderValue,
};

/// Build a `Set-Cookie` value. `max_age` falls back to the configured
/// cookie lifetime.
///
/// # Errors
/// Returns an error if the name or value cannot form a header value.
pub fn set_cookie(
    config: &AppConfig,
    name: &str,
    value: &str,
    max_age: Option<u64>,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let max_age = max_age.unwrap_or_else(|| config.cookie_lifetime_seconds());
    let mut cookie = format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}");
    if config.cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Build a removal directive: empty value, already expired.
/// Deleting a cookie the client never had is a no-op on the client side.
///
/// # Errors
/// Returns an error if the name cannot form a header value.
pub fn delete_cookie(config: &AppConfig, name: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if config.cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Append a `Set-Cookie` header, ignoring values that cannot be encoded.
/// `append` rather than `insert`: a response may set several cookies.
pub fn append_set_cookie(headers: &mut HeaderMap, cookie: Result<HeaderValue, InvalidHeaderValue>) {
    if let Ok(value) = cookie {
        headers.append(SET_COOKIE, value);
    }
}

/// Read a cookie from the incoming request headers.
/// Segments without a `=` (flag-style cookies) are skipped, not fatal.
#[must_use]
pub fn get_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let Some((key, val)) = pair.trim().split_once('=') else {
            continue;
        };
        if key.trim() == name {
            return Some(val.trim().to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::state::{AppConfig, Profile};

    fn insecure_config() -> AppConfig {
        AppConfig::new(Profile::Development)
    }

    #[test]
    fn set_cookie_applies_fixed_attributes() {
        let cookie = set_cookie(&insecure_config(), "username", "John_Doe", None)
            .expect("valid header value");
        let cookie = cookie.to_str().expect("ascii");

        assert!(cookie.starts_with("username=John_Doe; "));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=1800"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn set_cookie_is_secure_in_production() {
        let config = AppConfig::new(Profile::Production);
        let cookie = set_cookie(&config, "username", "John_Doe", None).expect("valid header value");
        assert!(cookie.to_str().expect("ascii").ends_with("; Secure"));
    }

    #[test]
    fn set_cookie_honors_explicit_max_age() {
        let cookie = set_cookie(&insecure_config(), "username", "John_Doe", Some(60))
            .expect("valid header value");
        assert!(cookie.to_str().expect("ascii").contains("Max-Age=60"));
    }

    #[test]
    fn delete_cookie_expires_immediately() {
        let cookie = delete_cookie(&insecure_config(), "username").expect("valid header value");
        let cookie = cookie.to_str().expect("ascii");
        assert!(cookie.starts_with("username=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn get_cookie_parses_multiple_pairs() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("a=1; username=John_Doe; b=2"),
        );

        assert_eq!(
            get_cookie(&headers, "username").as_deref(),
            Some("John_Doe")
        );
        assert_eq!(get_cookie(&headers, "a").as_deref(), Some("1"));
        assert_eq!(get_cookie(&headers, "missing"), None);
    }

    #[test]
    fn get_cookie_skips_flag_style_segments() {
        // A cookie set as `document.cookie = "flag"` has no value; pairs
        // after it must still be found.
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("flag; username=John_Doe"));
        assert_eq!(
            get_cookie(&headers, "username").as_deref(),
            Some("John_Doe")
        );

        headers.insert(
            COOKIE,
            HeaderValue::from_static("username=John_Doe; flag; session=abc"),
        );
        assert_eq!(
            get_cookie(&headers, "username").as_deref(),
            Some("John_Doe")
        );
        assert_eq!(get_cookie(&headers, "session").as_deref(), Some("abc"));
        assert_eq!(get_cookie(&headers, "flag"), None);
    }

    #[test]
    fn get_cookie_without_header_is_none() {
        let headers = HeaderMap::new();
        assert_eq!(get_cookie(&headers, "username"), None);
    }
}
