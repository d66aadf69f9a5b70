use sms_core::SmsError;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Install the global tracing subscriber described by `config`.
///
/// `RUST_LOG` wins over the configured level when set. Fails instead of
/// panicking when a subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<(), SmsError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| SmsError::Config(format!("invalid log level {:?}: {}", config.level, e)))?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match config.format.as_str() {
        "json" => builder.json().try_init(),
        "pretty" => builder.pretty().try_init(),
        other => {
            return Err(SmsError::Config(format!(
                "unknown log format {:?} (expected json or pretty)",
                other
            )));
        }
    };
    installed.map_err(|e| SmsError::Config(format!("logging already initialized: {}", e)))
}
