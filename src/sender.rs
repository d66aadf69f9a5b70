//! Explicit vendor selection.

use async_trait::async_trait;
use sms_core::{
    CredentialSource, CredentialStore, Message, MessageSender, OptionsScope, SendResponse,
    SmsAdapter, SmsError,
};
use sms_telesign::{TeleSign, TeleSignCredentials};
use sms_twilio::{Twilio, TwilioCredentials};
use tracing::debug;

use crate::config::{AppConfig, Vendor};

/// An adapter for whichever vendor the configuration names.
#[derive(Debug)]
pub enum Sender {
    Twilio(SmsAdapter<Twilio>),
    TeleSign(SmsAdapter<TeleSign>),
}

/// Borrowed view of the active vendor's credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SenderCredentials<'a> {
    Twilio(&'a TwilioCredentials),
    TeleSign(&'a TeleSignCredentials),
}

impl Sender {
    /// Build the adapter for `config.vendor` from `config.sms`.
    pub fn from_config(
        config: &AppConfig,
        store: &CredentialStore,
        scope: OptionsScope,
    ) -> Result<Self, SmsError> {
        debug!(vendor = ?config.vendor, ?scope, "building sms sender");
        let options = config.sms.as_ref();
        Ok(match config.vendor {
            Vendor::Twilio => Sender::Twilio(SmsAdapter::new(store.clone(), options, scope)?),
            Vendor::TeleSign => Sender::TeleSign(SmsAdapter::new(store.clone(), options, scope)?),
        })
    }

    pub fn vendor(&self) -> Vendor {
        match self {
            Sender::Twilio(_) => Vendor::Twilio,
            Sender::TeleSign(_) => Vendor::TeleSign,
        }
    }

    /// The normalized credentials of the active vendor.
    pub fn credentials(&self) -> SenderCredentials<'_> {
        match self {
            Sender::Twilio(adapter) => SenderCredentials::Twilio(adapter.credentials()),
            Sender::TeleSign(adapter) => SenderCredentials::TeleSign(adapter.credentials()),
        }
    }

    /// Replace the credentials; an existing client is kept until `initialize(true)`.
    pub fn set_credentials(&mut self, source: CredentialSource) -> Result<(), SmsError> {
        match self {
            Sender::Twilio(adapter) => adapter.set_credentials(source),
            Sender::TeleSign(adapter) => adapter.set_credentials(source),
        }
    }

    /// Build (or with `force`, rebuild) the vendor client ahead of the first send.
    pub fn initialize(&self, force: bool) -> Result<(), SmsError> {
        match self {
            Sender::Twilio(adapter) => adapter.initialize(force).map(drop),
            Sender::TeleSign(adapter) => adapter.initialize(force).map(drop),
        }
    }
}

#[async_trait]
impl MessageSender for Sender {
    fn provider(&self) -> &'static str {
        match self {
            Sender::Twilio(adapter) => adapter.provider(),
            Sender::TeleSign(adapter) => adapter.provider(),
        }
    }

    async fn send(&self, message: &Message) -> Result<SendResponse, SmsError> {
        match self {
            Sender::Twilio(adapter) => adapter.send(message).await,
            Sender::TeleSign(adapter) => adapter.send(message).await,
        }
    }
}
