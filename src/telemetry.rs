//! Logging initialisation.
//!
//! Standard output carries the protocol, so logs always go to standard
//! error.

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber.
///
/// `filter` is used when it parses; otherwise `info`.
///
/// # Errors
///
/// Returns a message when a global subscriber is already installed.
pub fn init(filter: &str, json: bool) -> Result<(), String> {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|error| error.to_string())
}
