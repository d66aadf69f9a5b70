//! # TeleSign SMS Vendor
//!
//! TeleSign Messaging API backend for sms-adapter.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sms_core::{CredentialSource, CredentialStore, Message, MessageSender, SmsAdapter};
//! use sms_telesign::TeleSign;
//!
//! let adapter = SmsAdapter::<TeleSign>::with_source(
//!     CredentialStore::new(),
//!     CredentialSource::positional("customer_id", "api_key"),
//! )?;
//! let response = adapter.send(&Message::new("+1234567890", "Your code is 1234")).await?;
//! ```

use async_trait::async_trait;
use serde::Serialize;
use sms_core::{
    CredentialOptions, OutboundMessage, Provider, SendResponse, SmsError, VendorClient,
};
use std::time::Duration;
use tracing::debug;
use url::Url;

const PROVIDER: &str = "telesign";

pub const DEFAULT_REST_ENDPOINT: &str = "https://rest-api.telesign.com";

/// Message type sent when the message carries no tag (alerts, reminders, notifications).
pub const DEFAULT_MESSAGE_TYPE: &str = "ARN";

/// Normalized TeleSign credentials.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TeleSignCredentials {
    pub customer_id: String,
    pub api_key: String,
    pub rest_endpoint: String,
    pub timeout: Duration,
}

/// Marker type plugging TeleSign into [`sms_core::SmsAdapter`].
#[derive(Debug, Clone, Copy)]
pub struct TeleSign;

impl Provider for TeleSign {
    const NAME: &'static str = PROVIDER;
    type Credentials = TeleSignCredentials;
    type Client = TeleSignClient;

    fn normalize(options: CredentialOptions) -> TeleSignCredentials {
        TeleSignCredentials {
            rest_endpoint: options.endpoint_or(DEFAULT_REST_ENDPOINT).to_string(),
            timeout: Duration::from_millis(options.timeout_ms_or_default()),
            customer_id: options.identifier.unwrap_or_default(),
            api_key: options.secret.unwrap_or_default(),
        }
    }

    fn connect(credentials: &TeleSignCredentials) -> Result<TeleSignClient, SmsError> {
        TeleSignClient::new(credentials)
    }
}

/// TeleSign REST client.
#[derive(Clone, Debug)]
pub struct TeleSignClient {
    customer_id: String,
    api_key: String,
    rest_endpoint: String,
    http: reqwest::Client,
}

/// Form body of `POST /v1/messaging`.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct MessagingRequest<'a> {
    pub phone_number: &'a str,
    pub message: &'a str,
    pub message_type: &'a str,
}

impl<'a> From<&'a OutboundMessage> for MessagingRequest<'a> {
    fn from(message: &'a OutboundMessage) -> Self {
        Self {
            phone_number: &message.to,
            message: &message.text,
            message_type: message.kind.as_deref().unwrap_or(DEFAULT_MESSAGE_TYPE),
        }
    }
}

impl TeleSignClient {
    pub fn new(credentials: &TeleSignCredentials) -> Result<Self, SmsError> {
        if credentials.customer_id.trim().is_empty() {
            return Err(SmsError::Config("telesign customer_id is empty".into()));
        }
        if credentials.api_key.trim().is_empty() {
            return Err(SmsError::Config("telesign api_key is empty".into()));
        }

        let endpoint = Url::parse(&credentials.rest_endpoint)
            .map_err(|e| SmsError::construction(PROVIDER, e))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(SmsError::construction(
                PROVIDER,
                format!("unsupported rest endpoint scheme: {}", endpoint.scheme()),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(credentials.timeout)
            .build()
            .map_err(|e| SmsError::construction(PROVIDER, e))?;

        Ok(Self {
            customer_id: credentials.customer_id.clone(),
            api_key: credentials.api_key.clone(),
            rest_endpoint: credentials.rest_endpoint.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn messaging_url(&self) -> String {
        format!("{}/v1/messaging", self.rest_endpoint)
    }

    /// Send a message and return TeleSign's JSON reply as-is.
    pub async fn message(
        &self,
        request: &MessagingRequest<'_>,
    ) -> Result<serde_json::Value, SmsError> {
        debug!(
            phone_number = request.phone_number,
            message_type = request.message_type,
            "telesign messaging request"
        );

        let res = self
            .http
            .post(self.messaging_url())
            .basic_auth(&self.customer_id, Some(&self.api_key))
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
impl VendorClient for TeleSignClient {
    async fn dispatch(&self, message: &OutboundMessage) -> Result<SendResponse, SmsError> {
        let raw = self.message(&MessagingRequest::from(message)).await?;
        let id = raw
            .get("reference_id")
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
