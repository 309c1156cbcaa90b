//! Observability (structured logging)
//!
//! Controllers and repositories emit `tracing` events; this module installs
//! the subscriber that prints them.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Observability configuration
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Filter used when `RUST_LOG` is not set
    pub default_filter: String,

    /// Output format
    pub format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self {
                default_filter: "info,acton_crud=debug".to_string(),
                format: LogFormat::Pretty,
            }
        } else {
            Self {
                default_filter: "info".to_string(),
                format: LogFormat::Json,
            }
        }
    }
}

impl ObservabilityConfig {
    /// Override the fallback filter directive
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.default_filter = filter.into();
        self
    }

    /// Override the output format
    #[must_use]
    pub const fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }
}

/// Initialize logging with defaults
///
/// Pretty output in debug builds, JSON in release builds; `RUST_LOG`
/// overrides the level filter.
///
/// # Example
///
/// ```rust,no_run
/// use acton_crud::observability;
///
/// # fn main() -> anyhow::Result<()> {
/// observability::init()?;
/// tracing::info!("Application started");
/// # Ok(())
/// # }
/// ```
pub fn init() -> anyhow::Result<()> {
    init_with(&ObservabilityConfig::default())
}

/// Initialize logging with an explicit configuration
///
/// Fails if a global subscriber is already installed.
pub fn init_with(config: &ObservabilityConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    match config.format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init()?,
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = ObservabilityConfig::default()
            .with_filter("warn")
            .with_format(LogFormat::Json);

        assert_eq!(config.default_filter, "warn");
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn test_second_init_fails() {
        let config = ObservabilityConfig::default().with_filter("off");
        let first = init_with(&config);
        let second = init_with(&config);
        // Another test may have installed the subscriber first.
        assert!(first.is_err() || second.is_err());
        assert!(second.is_err());
    }
}
