//! # SMS Adapter
//!
//! Send one SMS through Twilio or TeleSign behind a single [`MessageSender`]
//! contract.
//!
//! ## Features
//!
//! - **Two vendors**: Twilio (`account_sid`/`auth_token`) and TeleSign
//!   (`customer_id`/`api_key`/`rest_endpoint`/`timeout`)
//! - **One credential shape**: structured, positional or shared defaults, normalized per vendor
//! - **Lazy clients**: the vendor client is built on first send and reused
//! - **Configuration**: layered files and `SMS_ADAPTER__*` environment variables
//! - **Observability**: structured logging through `tracing`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sms_adapter::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     sms_adapter::telemetry::init(&config.logging)?;
//!
//!     let sender = Sender::from_config(&config, &CredentialStore::new(), OptionsScope::Instance)?;
//!     let response = sender
//!         .send(&Message::new("+1234567890", "Hello!").with_from("+0987654321"))
//!         .await?;
//!
//!     println!("Message sent with ID: {}", response.id);
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! ```toml
//! vendor = "telesign"
//!
//! [sms]
//! customer_id = "..."
//! api_key = "..."
//! timeout = 1000
//! ```

pub mod config;
pub mod sender;
pub mod telemetry;

pub use config::*;
pub use sender::{Sender, SenderCredentials};
pub use sms_core::MessageSender;

/// Common imports for sms-adapter usage
pub mod prelude {
    pub use crate::config::{AppConfig, LoggingConfig, Vendor};
    pub use crate::sender::{Sender, SenderCredentials};
    pub use sms_core::*;
    pub use sms_telesign::TeleSign;
    pub use sms_twilio::Twilio;
}
