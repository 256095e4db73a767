//! Structured logging setup.
//!
//! Console output by default, JSON when `SHELFSCAN_LOG_JSON=true`. `RUST_LOG`
//! directives are honored on top of the configured level.

use std::env;
use std::sync::Once;

use tracing::{Level, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum level for this crate's events
    pub level: Level,

    /// Emit one JSON object per event
    pub use_json: bool,

    /// Unrecognized `SHELFSCAN_LOG_LEVEL` value, reported once logging is up
    pub rejected_level: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            rejected_level: None,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// Read `SHELFSCAN_LOG_LEVEL` and `SHELFSCAN_LOG_JSON`
    pub fn from_env() -> Self {
        let raw_level = env::var("SHELFSCAN_LOG_LEVEL").ok();
        let level = raw_level.as_deref().and_then(parse_level);
        let rejected_level = raw_level.filter(|_| level.is_none());
        let use_json = env::var("SHELFSCAN_LOG_JSON")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        Self {
            level: level.unwrap_or(Level::INFO),
            use_json,
            rejected_level,
        }
    }
}

/// Parse a level name case-insensitively
pub fn parse_level(level_str: &str) -> Option<Level> {
    match level_str.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Install the global subscriber. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let directive = format!("shelfscan={}", config.level);
        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }

        let layer = fmt::layer().with_target(true).with_writer(std::io::stderr);
        if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(layer.json())
                .init();
        } else {
            tracing_subscriber::registry().with(filter).with(layer).init();
        }

        if let Some(value) = &config.rejected_level {
            warn!(
                value = %value,
                "invalid log level, defaulting to INFO (valid: trace, debug, info, warn, error)"
            );
        }
    });
}
