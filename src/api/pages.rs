//! Server-rendered HTML pages.
//!
//! Plain formatted strings behind a shared layout. Anything sourced from a
//! cookie or form field goes through [`escape`] before interpolation.

const ERROR_404_TITLE: &str = "404 Not Found";
const ERROR_404_MESSAGE: &str = "The requested page could not be found.";
const ERROR_500_TITLE: &str = "500 Internal Server Error";
const ERROR_500_MESSAGE: &str = "An unexpected error has occurred. Please try again later.";

/// Minimal HTML escaping for text interpolated into a page.
#[must_use]
pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         </head>\n\
         <body>\n\
         {body}\n\
         </body>\n\
         </html>\n"
    )
}

#[must_use]
pub fn home(username: &str) -> String {
    let username = escape(username);
    let body = format!(
        "<h1>Welcome, {username}!</h1>\n\
         <p><a href=\"/profile\">Profile</a></p>\n\
         <p><a href=\"/logout\">Logout</a></p>"
    );
    layout("Home", &body)
}

/// Login form. `error` is the validation message from a failed submission,
/// `csrf_token` the hidden field value (omitted when enforcement is off).
#[must_use]
pub fn login(error: Option<&str>, csrf_token: Option<&str>, pattern: &str) -> String {
    let error_line = error.map_or_else(String::new, |message| {
        format!("<p class=\"error\">{}</p>\n", escape(message))
    });
    let csrf_field = csrf_token.map_or_else(String::new, |token| {
        format!(
            "<input type=\"hidden\" name=\"csrf_token\" value=\"{}\">\n",
            escape(token)
        )
    });
    let body = format!(
        "<h1>Login</h1>\n\
         {error_line}\
         <form method=\"post\" action=\"/login\">\n\
         {csrf_field}\
         <label for=\"username\">Username</label>\n\
         <input type=\"text\" id=\"username\" name=\"username\" placeholder=\"John_Doe\">\n\
         <button type=\"submit\">Login</button>\n\
         </form>\n\
         <p>Format: <code>{}</code></p>",
        escape(pattern)
    );
    layout("Login", &body)
}

#[must_use]
pub fn profile(username: &str, visits: u64) -> String {
    let username = escape(username);
    let body = format!(
        "<h1>Welcome, {username}!</h1>\n\
         <p>You have visited this page {visits} time(s).</p>\n\
         <p><a href=\"/\">Home</a></p>\n\
         <p><a href=\"/logout\">Logout</a></p>"
    );
    layout("Profile", &body)
}

#[must_use]
pub fn not_found() -> String {
    layout(
        ERROR_404_TITLE,
        &format!("<h1>{ERROR_404_TITLE}</h1>\n<p>{ERROR_404_MESSAGE}</p>"),
    )
}

#[must_use]
pub fn internal_error() -> String {
    layout(
        ERROR_500_TITLE,
        &format!("<h1>{ERROR_500_TITLE}</h1>\n<p>{ERROR_500_MESSAGE}</p>"),
    )
}
