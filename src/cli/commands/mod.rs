use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        PossibleValuesParser, ValueParser,
    },
    Arg, ColorChoice, Command,
};

pub const ARG_PORT: &str = "port";
pub const ARG_ENV: &str = "env";
pub const ARG_SESSION_DIR: &str = "session-dir";
pub const ARG_SECRET_KEY: &str = "secret-key";
pub const ARG_COOKIE_LIFETIME: &str = "cookie-lifetime";
pub const ARG_SESSION_LIFETIME: &str = "session-lifetime";
pub const ARG_VERBOSITY: &str = "verbosity";

#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    Command::new("vizito")
        .about("Cookie-based login demo with a per-session visit counter")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("VIZITO_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_ENV)
                .short('e')
                .long("env")
                .help("Configuration profile")
                .default_value("development")
                .env("VIZITO_ENV")
                .value_parser(PossibleValuesParser::new([
                    "development",
                    "production",
                    "testing",
                ])),
        )
        .arg(
            Arg::new(ARG_SESSION_DIR)
                .long("session-dir")
                .help("Directory holding one session file per session id")
                .default_value("vizito_sessions")
                .env("VIZITO_SESSION_DIR"),
        )
        .arg(
            Arg::new(ARG_SECRET_KEY)
                .long("secret-key")
                .help("Key used to sign session ids")
                .default_value("default_secret_key")
                .hide_default_value(true)
                .env("VIZITO_SECRET_KEY"),
        )
        .arg(
            Arg::new(ARG_COOKIE_LIFETIME)
                .long("cookie-lifetime")
                .help("Identity cookie lifetime in seconds")
                .default_value("1800")
                .env("VIZITO_COOKIE_LIFETIME")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_SESSION_LIFETIME)
                .long("session-lifetime")
                .help("Server-side session lifetime in seconds")
                .default_value("1800")
                .env("VIZITO_SESSION_LIFETIME")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_VERBOSITY)
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("VIZITO_LOG_LEVEL")
                .global(true)
                .action(clap::ArgAction::Count)
                .value_parser(validator_log_level()),
        )
}
