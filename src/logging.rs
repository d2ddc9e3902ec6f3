//=========================================================================
// Logging
//=========================================================================
//
// One-time initialization of the `env_logger` backend behind the `log`
// facade used throughout the engine.
//
// Subsystems log under their own targets:
//   "platform", "platform::input", "scene", "scheduler"
//
// e.g. `RUST_LOG=info,scene=debug tsc`
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Once;

//=== LoggingConfig =======================================================

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax. When it is `None`,
/// `RUST_LOG` is used, falling back to `info`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    /// Configuration with an explicit filter, ignoring `RUST_LOG`.
    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self {
            env_filter: Some(filter.into()),
            ..Self::default()
        }
    }
}

//=== init_logging ========================================================

static INIT: Once = Once::new();

/// Initializes the global logger once. Later calls are ignored.
///
/// Call it early in `main`, before building the engine.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match config.env_filter {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => match std::env::var("RUST_LOG") {
                Ok(filter) => {
                    builder.parse_filters(&filter);
                }
                Err(_) => {
                    builder.filter_level(log::LevelFilter::Info);
                }
            },
        }

        builder.write_style(config.write_style);

        // Another logger (e.g. a test harness) may already be installed.
        if builder.try_init().is_err() {
            log::warn!("A global logger was already installed, keeping it");
            return;
        }

        log::debug!("Logging initialized");
    });
}

//=========================================================================
// Unit Tests
//=========================================================================
