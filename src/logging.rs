//! Structured logging configuration.
//!
//! Uses `tracing` with `tracing-subscriber` for configurable log levels
//! and structured output.
//!
//! ## Environment Variables
//!
//! - `WIRELINE_LOG` or `RUST_LOG`: filter directive (e.g. `debug`,
//!   `wireline=debug,tungstenite=warn`)
//! - `WIRELINE_LOG_FORMAT`: output format (`pretty`, `compact`, `json`)

use tracing_subscriber::{
    EnvFilter,
    fmt,
    prelude::*,
};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable with colors and indentation
    #[default]
    Pretty,
    /// Compact single-line output
    Compact,
    /// JSON output for log aggregation
    Json,
}

impl LogFormat {
    /// Parse from string (case-insensitive).
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Filter directive (e.g. "debug", "wireline=debug,warn")
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "wireline=info,warn".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl LogConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let filter = std::env::var("WIRELINE_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "wireline=info,warn".to_string());

        let format = std::env::var("WIRELINE_LOG_FORMAT")
            .map(|s| LogFormat::parse(&s))
            .unwrap_or_default();

        Self { filter, format }
    }

    /// Frame-level verbosity for `--debug`.
    pub fn debug() -> Self {
        Self {
            filter: "wireline=debug,info".to_string(),
            ..Default::default()
        }
    }
}

/// Initialize the global tracing subscriber. Call once at startup;
/// subsequent calls are ignored.
pub fn init(config: LogConfig) {
    let env_filter = EnvFilter::try_new(&config.filter)
        .unwrap_or_else(|_| EnvFilter::new("wireline=info,warn"));

    match config.format {
        LogFormat::Json => {
            let subscriber = tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr));
            let _ = tracing::subscriber::set_global_default(subscriber);
        }
        LogFormat::Compact => {
            let subscriber = tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().compact().with_writer(std::io::stderr));
            let _ = tracing::subscriber::set_global_default(subscriber);
        }
        LogFormat::Pretty => {
            let subscriber = tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr));
            let _ = tracing::subscriber::set_global_default(subscriber);
        }
    }
}

/// Initialize from the environment, optionally forcing debug verbosity.
pub fn init_from_env(debug: bool) {
    if debug {
        init(LogConfig::debug());
    } else {
        init(LogConfig::from_env());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parsing_is_case_insensitive() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("compact"), LogFormat::Compact);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("unknown"), LogFormat::Pretty);
    }

    #[test]
    fn debug_config_raises_verbosity() {
        let config = LogConfig::debug();
        assert!(config.filter.contains("debug"));
    }
}
