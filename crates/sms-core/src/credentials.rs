//! Credential resolution and the shared defaults store.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};

use crate::SmsError;

/// Timeout applied by vendors that take one when none is configured.
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;

/// Vendor-neutral credential bundle, the `sms` section of a configuration.
///
/// Vendor key names are accepted as aliases, so `account_sid`/`auth_token` and
/// `customer_id`/`api_key`/`rest_endpoint`/`timeout` both deserialize here, in
/// snake_case, camelCase, or the lowercased form the `config` crate produces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialOptions {
    /// Account SID or customer id
    #[serde(
        alias = "account_sid",
        alias = "accountSid",
        alias = "accountsid",
        alias = "customer_id",
        alias = "customerId",
        alias = "customerid"
    )]
    pub identifier: Option<String>,
    /// Auth token or API key
    #[serde(
        alias = "auth_token",
        alias = "authToken",
        alias = "authtoken",
        alias = "api_key",
        alias = "apiKey",
        alias = "apikey"
    )]
    pub secret: Option<String>,
    /// REST endpoint override
    #[serde(
        alias = "base_url",
        alias = "rest_endpoint",
        alias = "restEndpoint",
        alias = "restendpoint"
    )]
    pub endpoint: Option<String>,
    /// Request timeout in milliseconds
    #[serde(alias = "timeout")]
    pub timeout_ms: Option<u64>,
}

impl CredentialOptions {
    pub fn new<S: Into<String>>(identifier: S, secret: S) -> Self {
        Self {
            identifier: Some(identifier.into()),
            secret: Some(secret.into()),
            ..Self::default()
        }
    }

    pub fn with_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Endpoint, treating an empty string as absent.
    pub fn endpoint_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .unwrap_or(default)
    }

    /// Timeout, treating zero as absent.
    pub fn timeout_ms_or_default(&self) -> u64 {
        self.timeout_ms
            .filter(|t| *t > 0)
            .unwrap_or(DEFAULT_TIMEOUT_MS)
    }
}

/// Where an adapter takes its credentials from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// A complete options bundle.
    Structured(CredentialOptions),
    /// Identifier and secret, optionally endpoint and timeout.
    Positional {
        identifier: String,
        secret: String,
        endpoint: Option<String>,
        timeout_ms: Option<u64>,
    },
    /// Whatever the [`CredentialStore`] currently holds.
    Defaults,
}

impl CredentialSource {
    pub fn positional<S: Into<String>>(identifier: S, secret: S) -> Self {
        CredentialSource::Positional {
            identifier: identifier.into(),
            secret: secret.into(),
            endpoint: None,
            timeout_ms: None,
        }
    }

    /// Turn the source into a bundle, reading the store for `Defaults`.
    pub fn resolve(self, store: &CredentialStore) -> Result<CredentialOptions, SmsError> {
        match self {
            CredentialSource::Structured(options) => Ok(options),
            CredentialSource::Positional {
                identifier,
                secret,
                endpoint,
                timeout_ms,
            } => Ok(CredentialOptions {
                identifier: Some(identifier),
                secret: Some(secret),
                endpoint,
                timeout_ms,
            }),
            CredentialSource::Defaults => store.defaults().ok_or_else(|| {
                SmsError::Config(
                    "no credentials supplied and no shared defaults configured".to_string(),
                )
            }),
        }
    }
}

impl From<CredentialOptions> for CredentialSource {
    fn from(options: CredentialOptions) -> Self {
        CredentialSource::Structured(options)
    }
}

/// Host-owned holder of default credentials. Clones share the same defaults.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    inner: Arc<RwLock<Option<CredentialOptions>>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(options: CredentialOptions) -> Self {
        let store = Self::new();
        store.set_defaults(options);
        store
    }

    pub fn set_defaults(&self, options: CredentialOptions) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(options);
    }

    pub fn defaults(&self) -> Option<CredentialOptions> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear(&self) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
