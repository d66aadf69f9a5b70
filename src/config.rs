use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use sms_core::CredentialOptions;
use std::env;

/// Application configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Vendor used to send messages
    pub vendor: Vendor,
    /// Vendor credentials (the `sms` section)
    pub sms: Option<CredentialOptions>,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// SMS vendors this crate can drive
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    #[default]
    Twilio,
    TeleSign,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Log level or filter directive (default: info)
    pub level: String,
    /// Log format: json or pretty (default: json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            // Start with default configuration
            .add_source(Config::try_from(&AppConfig::default())?)
            // Add configuration file based on environment
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add local configuration file (gitignored)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with SMS_ADAPTER_)
            .add_source(Environment::with_prefix("SMS_ADAPTER").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            vendor: Vendor::default(),
            sms: None,
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.vendor, Vendor::Twilio);
        assert!(config.sms.is_none());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn toml_overrides_defaults() {
        let toml = r#"
            vendor = "telesign"

            [sms]
            customer_id = "CUST1"
            api_key = "key"
            timeout = 2500
        "#;
        let config: AppConfig = Config::builder()
            .add_source(Config::try_from(&AppConfig::default()).unwrap())
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.vendor, Vendor::TeleSign);
        let sms = config.sms.unwrap();
        assert_eq!(sms.identifier.as_deref(), Some("CUST1"));
        assert_eq!(sms.secret.as_deref(), Some("key"));
        assert_eq!(sms.timeout_ms, Some(2500));
        assert_eq!(sms.endpoint, None);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn camel_case_vendor_keys_survive_loading() {
        let load = |toml: &str| -> CredentialOptions {
            Config::builder()
                .add_source(Config::try_from(&AppConfig::default()).unwrap())
                .add_source(File::from_str(toml, FileFormat::Toml))
                .build()
                .unwrap()
                .try_deserialize::<AppConfig>()
                .unwrap()
                .sms
                .unwrap()
        };

        let twilio = load("[sms]\naccountSid = \"AC1\"\nauthToken = \"t\"\n");
        assert_eq!(twilio, CredentialOptions::new("AC1", "t"));

        let telesign = load(
            "[sms]\ncustomerId = \"C1\"\napiKey = \"k\"\nrestEndpoint = \"http://x\"\ntimeout = 50\n",
        );
        assert_eq!(
            telesign,
            CredentialOptions::new("C1", "k")
                .with_endpoint("http://x")
                .with_timeout_ms(50)
        );
    }
}
