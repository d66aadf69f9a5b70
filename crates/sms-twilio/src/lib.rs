//! # Twilio SMS Vendor
//!
//! Twilio Programmable Messaging backend for sms-adapter.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sms_core::{CredentialSource, CredentialStore, Message, MessageSender, SmsAdapter};
//! use sms_twilio::Twilio;
//!
//! let adapter = SmsAdapter::<Twilio>::with_source(
//!     CredentialStore::new(),
//!     CredentialSource::positional("AC123", "auth_token"),
//! )?;
//! let response = adapter
//!     .send(&Message::new("+1234567890", "Hello from Twilio!").with_from("+0987654321"))
//!     .await?;
//! ```

use async_trait::async_trait;
use serde::Serialize;
use sms_core::{
    CredentialOptions, OutboundMessage, Provider, SendResponse, SmsError, VendorClient,
};
use tracing::debug;
use url::Url;

const PROVIDER: &str = "twilio";

/// Public Twilio API host.
pub const DEFAULT_BASE_URL: &str = "https://api.twilio.com";

/// Normalized Twilio credentials.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TwilioCredentials {
    pub account_sid: String,
    pub auth_token: String,
    /// API base URL; override for testing/mocking.
    pub base_url: String,
}

/// Marker type plugging Twilio into [`sms_core::SmsAdapter`].
#[derive(Debug, Clone, Copy)]
pub struct Twilio;

impl Provider for Twilio {
    const NAME: &'static str = PROVIDER;
    type Credentials = TwilioCredentials;
    type Client = TwilioClient;

    fn normalize(options: CredentialOptions) -> TwilioCredentials {
        TwilioCredentials {
            base_url: options.endpoint_or(DEFAULT_BASE_URL).to_string(),
            account_sid: options.identifier.unwrap_or_default(),
            auth_token: options.secret.unwrap_or_default(),
        }
    }

    fn connect(credentials: &TwilioCredentials) -> Result<TwilioClient, SmsError> {
        TwilioClient::new(credentials)
    }
}

/// Twilio REST client.
#[derive(Clone, Debug)]
pub struct TwilioClient {
    account_sid: String,
    auth_token: String,
    base_url: String,
    http: reqwest::Client,
}

/// Form body of `POST /Accounts/{sid}/Messages.json`.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct CreateMessage<'a> {
    #[serde(rename = "From", skip_serializing_if = "str::is_empty")]
    pub from: &'a str,
    #[serde(rename = "To")]
    pub to: &'a str,
    #[serde(rename = "Body")]
    pub body: &'a str,
}

impl<'a> From<&'a OutboundMessage> for CreateMessage<'a> {
    fn from(message: &'a OutboundMessage) -> Self {
        Self {
            from: &message.from,
            to: &message.to,
            body: &message.text,
        }
    }
}

impl TwilioClient {
    pub fn new(credentials: &TwilioCredentials) -> Result<Self, SmsError> {
        if credentials.account_sid.trim().is_empty() {
            return Err(SmsError::Config("twilio account_sid is empty".into()));
        }
        if credentials.auth_token.trim().is_empty() {
            return Err(SmsError::Config("twilio auth_token is empty".into()));
        }

        let base = Url::parse(&credentials.base_url)
            .map_err(|e| SmsError::construction(PROVIDER, e))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(SmsError::construction(
                PROVIDER,
                format!("unsupported base url scheme: {}", base.scheme()),
            ));
        }

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| SmsError::construction(PROVIDER, e))?;

        Ok(Self {
            account_sid: credentials.account_sid.clone(),
            auth_token: credentials.auth_token.clone(),
            base_url: credentials.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.account_sid
        )
    }

    /// Create a message and return Twilio's JSON reply as-is.
    pub async fn create_message(
        &self,
        request: &CreateMessage<'_>,
    ) -> Result<serde_json::Value, SmsError> {
        debug!(from = request.from, to = request.to, "twilio create message");

        let res = self
            .http
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(request)
            .send()
            .await
            .map_err(|e| SmsError::Http(Box::new(e)))?;

        let status = res.status();
        let raw_text = res.text().await.map_err(|e| SmsError::Http(Box::new(e)))?;
        if !status.is_success() {
            return Err(SmsError::from_status(status.as_u16(), &raw_text));
        }
        Ok(sms_core::raw_json(&raw_text))
    }
}

#[async_trait]
impl VendorClient for TwilioClient {
    async fn dispatch(&self, message: &OutboundMessage) -> Result<SendResponse, SmsError> {
        let raw = self.create_message(&CreateMessage::from(message)).await?;
        let id = raw
            .get("sid")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(sms_core::fallback_id);

        Ok(SendResponse {
            id,
            provider: PROVIDER,
            raw,
        })
    }
}
