//! # SMS Core
//!
//! Core traits and types for the sms-adapter vendor abstraction.
//!
//! This crate provides the building blocks shared by every vendor crate:
//! - [`MessageSender`] trait for sending one SMS message
//! - [`SmsAdapter`], the generic adapter that resolves credentials, lazily builds
//!   a vendor client and forwards the call
//! - Credential resolution ([`CredentialSource`], [`CredentialStore`])
//! - Common types for messages, responses, and errors
//!
//! ## Example
//!
//! ```rust,ignore
//! use sms_core::{CredentialSource, CredentialStore, Message, MessageSender, SmsAdapter};
//! use sms_twilio::Twilio;
//!
//! let adapter = SmsAdapter::<Twilio>::with_source(
//!     CredentialStore::new(),
//!     CredentialSource::positional("AC123", "tok"),
//! )?;
//! let response = adapter
//!     .send(&Message::new("+15550002222", "hi").with_from("+15550001111"))
//!     .await?;
//! ```

pub mod adapter;
pub mod credentials;

pub use adapter::{OptionsScope, Provider, SmsAdapter, VendorClient};
pub use credentials::{CredentialOptions, CredentialSource, CredentialStore, DEFAULT_TIMEOUT_MS};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Boxed error kept as the cause of vendor failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur during SMS operations
#[derive(Debug, thiserror::Error)]
pub enum SmsError {
    /// No usable credentials, or a required credential is empty
    #[error("configuration error: {0}")]
    Config(String),
    /// The vendor client rejected its construction parameters
    #[error("{provider} client construction failed: {source}")]
    Construction {
        provider: &'static str,
        #[source]
        source: BoxError,
    },
    /// HTTP communication error
    #[error("http error: {0}")]
    Http(#[source] BoxError),
    /// Authentication/authorization error
    #[error("authentication error: {0}")]
    Auth(String),
    /// Invalid request parameters
    #[error("invalid request: {0}")]
    Invalid(String),
    /// SMS provider returned an error
    #[error("provider error: {0}")]
    Provider(String),
}

impl SmsError {
    pub fn construction<E>(provider: &'static str, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        SmsError::Construction {
            provider,
            source: source.into(),
        }
    }

    /// Classify a non-success vendor reply by HTTP status.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => SmsError::Auth(format!("HTTP {}: {}", status, body)),
            _ => SmsError::Provider(format!("HTTP {}: {}", status, body)),
        }
    }
}

/// Generic message as handed to any sender. Every field is optional on input;
/// [`OutboundMessage`] enforces what a send needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Message {
    pub from: Option<String>,
    pub to: Option<String>,
    pub text: Option<String>,
    /// Optional category tag, e.g. the TeleSign message type.
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl Message {
    pub fn new<S: Into<String>>(to: S, text: S) -> Self {
        Self {
            to: Some(to.into()),
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn with_from<S: Into<String>>(mut self, from: S) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn with_kind<S: Into<String>>(mut self, kind: S) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

/// Base fields after validation: `to` and `text` are present and non-blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    pub from: String,
    pub to: String,
    pub text: String,
    pub kind: Option<String>,
}

impl TryFrom<&Message> for OutboundMessage {
    type Error = SmsError;

    fn try_from(message: &Message) -> Result<Self, Self::Error> {
        let to = required(message.to.as_deref(), "destination (`to`)")?;
        let text = required(message.text.as_deref(), "message text")?;
        Ok(Self {
            from: message.from.clone().unwrap_or_default(),
            to,
            text,
            kind: message.kind.clone().filter(|k| !k.trim().is_empty()),
        })
    }
}

fn required(value: Option<&str>, what: &str) -> Result<String, SmsError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.to_string()),
        _ => Err(SmsError::Invalid(format!("missing {}", what))),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendResponse {
    pub id: String,
    /// Name of the vendor that produced the response, e.g. "twilio".
    pub provider: &'static str,
    /// Raw vendor payload, unmodified.
    pub raw: serde_json::Value,
}

/// Capability every vendor adapter offers.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Stable vendor key, e.g. "twilio" or "telesign".
    fn provider(&self) -> &'static str;
    /// Send a single text SMS.
    async fn send(&self, message: &Message) -> Result<SendResponse, SmsError>;
}

/// Utility to create a pseudo id if a provider doesn't return one.
pub fn fallback_id() -> String {
    Uuid::new_v4().to_string()
}

/// Parse a vendor body as JSON, keeping non-JSON bodies as `{"raw": ..}`.
pub fn raw_json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).unwrap_or_else(|_| serde_json::json!({ "raw": body }))
}
