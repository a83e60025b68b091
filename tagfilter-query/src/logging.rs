//! Logging setup controlled by environment variables.
//!
//! # Environment Variables
//!
//! - `TAGFILTER_DEBUG=true|1|yes` - Enable debug logging
//! - `TAGFILTER_LOG_LEVEL=trace|debug|info|warn|error` - Set a specific level
//! - `TAGFILTER_LOG_FORMAT=json|pretty|compact` - Output format (default: json)
//!
//! The compiler emits through the `tracing` macros and never installs a
//! subscriber itself. Applications either install their own or call
//! [`init`] once at startup, which needs the `tracing-subscriber` feature.
//!
//! ```rust,no_run
//! use tagfilter_query::logging;
//!
//! logging::init();
//! ```

use std::env;
use std::sync::Once;

static INIT: Once = Once::new();

const DEBUG_VAR: &str = "TAGFILTER_DEBUG";
const LEVEL_VAR: &str = "TAGFILTER_LOG_LEVEL";
const FORMAT_VAR: &str = "TAGFILTER_LOG_FORMAT";

/// Check if `TAGFILTER_DEBUG` is set to "true", "1" or "yes" (case-insensitive).
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var(DEBUG_VAR)
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Normalize a level name, or `None` if it is not one.
pub fn parse_level(level: &str) -> Option<&'static str> {
    match level.to_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" => Some("warn"),
        "error" => Some("error"),
        _ => None,
    }
}

/// The configured log level.
///
/// `TAGFILTER_LOG_LEVEL` wins when valid; otherwise "debug" if
/// `TAGFILTER_DEBUG` is enabled, else "warn".
pub fn get_log_level() -> &'static str {
    env::var(LEVEL_VAR)
        .ok()
        .and_then(|level| parse_level(&level))
        .unwrap_or(if is_debug_enabled() { "debug" } else { "warn" })
}

/// The configured log format, defaulting to "json".
pub fn get_log_format() -> &'static str {
    env::var(FORMAT_VAR)
        .map(|f| match f.to_lowercase().as_str() {
            "pretty" => "pretty",
            "compact" => "compact",
            _ => "json",
        })
        .unwrap_or("json")
}

/// Filter directive covering every tagfilter crate at `level`.
pub fn filter_directive(level: &str) -> String {
    format!(
        "tagfilter={level},tagfilter_query={level},tagfilter_cli={level}",
        level = level
    )
}

/// Initialize logging from the environment.
///
/// Does nothing unless `TAGFILTER_DEBUG` or `TAGFILTER_LOG_LEVEL` is set.
/// Subsequent calls are no-ops.
pub fn init() {
    if !is_debug_enabled() && env::var(LEVEL_VAR).is_err() {
        return;
    }
    install(get_log_level());
}

/// Initialize logging at an explicit level, ignoring the level variables.
///
/// Unknown level names fall back to "warn".
pub fn init_with_level(level: &str) {
    install(parse_level(level).unwrap_or("warn"));
}

fn install(level: &'static str) {
    INIT.call_once(|| {
        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let filter = EnvFilter::try_new(filter_directive(level))
                .unwrap_or_else(|_| EnvFilter::new("warn"));
            let format = get_log_format();

            // try_init: another subscriber may already be installed.
            let installed = match format {
                "json" => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().json().with_writer(std::io::stderr))
                    .try_init(),
                "compact" => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().compact().with_writer(std::io::stderr))
                    .try_init(),
                _ => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().pretty().with_writer(std::io::stderr))
                    .try_init(),
            };

            if installed.is_ok() {
                tracing::info!(level, format, "tagfilter logging initialized");
            }
        }

        #[cfg(not(feature = "tracing-subscriber"))]
        {
            let _ = level;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("TRACE"), Some("trace"));
        assert_eq!(parse_level("warn"), Some("warn"));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn test_filter_directive_covers_crates() {
        let directive = filter_directive("debug");
        assert!(directive.contains("tagfilter=debug"));
        assert!(directive.contains("tagfilter_query=debug"));
        assert!(directive.contains("tagfilter_cli=debug"));
    }

    #[test]
    fn test_log_level_default() {
        // SAFETY: these variables are only touched by this test.
        unsafe {
            env::remove_var(DEBUG_VAR);
            env::remove_var(LEVEL_VAR);
        }
        assert!(!is_debug_enabled());
        assert_eq!(get_log_level(), "warn");
    }
}
