//! Generic adapter: credentials in, lazily built vendor client, one call out.

use async_trait::async_trait;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, error, info};

use crate::{
    CredentialOptions, CredentialSource, CredentialStore, Message, MessageSender, OutboundMessage,
    SendResponse, SmsError,
};

/// A vendor the adapter can drive.
pub trait Provider: Send + Sync + 'static {
    /// Stable vendor key, e.g. "twilio".
    const NAME: &'static str;
    /// Normalized, vendor-shaped credential record.
    type Credentials: Clone + fmt::Debug + PartialEq + Send + Sync;
    type Client: VendorClient;

    /// Map a bundle onto this vendor's keys, applying defaults for optional ones.
    fn normalize(options: CredentialOptions) -> Self::Credentials;

    /// Build the vendor client. Fails with `Config` on empty required keys and
    /// `Construction` when the vendor rejects the values.
    fn connect(credentials: &Self::Credentials) -> Result<Self::Client, SmsError>;
}

/// The vendor's message-creation call.
#[async_trait]
pub trait VendorClient: Send + Sync + 'static {
    async fn dispatch(&self, message: &OutboundMessage) -> Result<SendResponse, SmsError>;
}

/// Whether an options section passed at construction becomes the shared default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptionsScope {
    /// Use the section for this adapter only.
    #[default]
    Instance,
    /// Copy the section into the store, then resolve from the store.
    Shared,
}

pub struct SmsAdapter<P: Provider> {
    store: CredentialStore,
    credentials: P::Credentials,
    client: Mutex<Option<Arc<P::Client>>>,
}

impl<P: Provider> SmsAdapter<P> {
    /// Construct from the `sms` options section and a scope flag.
    pub fn new(
        store: CredentialStore,
        options: Option<&CredentialOptions>,
        scope: OptionsScope,
    ) -> Result<Self, SmsError> {
        let source = match (scope, options) {
            (OptionsScope::Shared, options) => {
                store.set_defaults(options.cloned().unwrap_or_default());
                debug!(provider = P::NAME, "stored shared sms defaults");
                CredentialSource::Defaults
            }
            (OptionsScope::Instance, Some(options)) => {
                CredentialSource::Structured(options.clone())
            }
            (OptionsScope::Instance, None) => CredentialSource::Defaults,
        };
        Self::with_source(store, source)
    }

    pub fn with_source(store: CredentialStore, source: CredentialSource) -> Result<Self, SmsError> {
        let credentials = P::normalize(source.resolve(&store)?);
        Ok(Self {
            store,
            credentials,
            client: Mutex::new(None),
        })
    }

    pub fn credentials(&self) -> &P::Credentials {
        &self.credentials
    }

    /// Replace the credentials. An already built client is kept until
    /// `initialize(true)`.
    pub fn set_credentials(&mut self, source: CredentialSource) -> Result<(), SmsError> {
        self.credentials = P::normalize(source.resolve(&self.store)?);
        Ok(())
    }

    /// Build the vendor client if there is none, or always when `force` is set.
    pub fn initialize(&self, force: bool) -> Result<Arc<P::Client>, SmsError> {
        let mut slot = self.client.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = slot.as_ref().filter(|_| !force) {
            return Ok(Arc::clone(client));
        }
        let client = Arc::new(P::connect(&self.credentials)?);
        debug!(provider = P::NAME, force, "vendor client created");
        *slot = Some(Arc::clone(&client));
        Ok(client)
    }

    pub fn is_initialized(&self) -> bool {
        self.client
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl<P: Provider> fmt::Debug for SmsAdapter<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmsAdapter")
            .field("provider", &P::NAME)
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<P: Provider> MessageSender for SmsAdapter<P> {
    fn provider(&self) -> &'static str {
        P::NAME
    }

    async fn send(&self, message: &Message) -> Result<SendResponse, SmsError> {
        let outbound = OutboundMessage::try_from(message)?;
        let client = self.initialize(false)?;

        info!("Sending SMS via {} to {}", P::NAME, outbound.to);
        match client.dispatch(&outbound).await {
            Ok(response) => {
                info!("SMS sent via {} with id {}", P::NAME, response.id);
                Ok(response)
            }
            Err(e) => {
                error!("{} send failed: {}", P::NAME, e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct EchoCredentials {
        id: String,
        secret: String,
    }

    struct Echo;

    struct EchoClient {
        sent: Mutex<Vec<OutboundMessage>>,
    }

    #[async_trait]
    impl VendorClient for EchoClient {
        async fn dispatch(&self, message: &OutboundMessage) -> Result<SendResponse, SmsError> {
            self.sent.lock().unwrap().push(message.clone());
            if message.text == "fail" {
                return Err(SmsError::Provider("HTTP 500: down".into()));
            }
            Ok(SendResponse {
                id: "echo-1".into(),
                provider: "echo",
                raw: serde_json::json!({ "to": message.to }),
            })
        }
    }

    impl Provider for Echo {
        const NAME: &'static str = "echo";
        type Credentials = EchoCredentials;
        type Client = EchoClient;

        fn normalize(options: CredentialOptions) -> EchoCredentials {
            EchoCredentials {
                id: options.identifier.unwrap_or_default(),
                secret: options.secret.unwrap_or_default(),
            }
        }

        fn connect(credentials: &EchoCredentials) -> Result<EchoClient, SmsError> {
            if credentials.id.is_empty() {
                return Err(SmsError::Config("echo id is empty".into()));
            }
            Ok(EchoClient {
                sent: Mutex::new(Vec::new()),
            })
        }
    }

    fn adapter() -> SmsAdapter<Echo> {
        SmsAdapter::with_source(
            CredentialStore::new(),
            CredentialSource::positional("id", "secret"),
        )
        .unwrap()
    }

    #[test]
    fn initialize_is_idempotent() {
        let adapter = adapter();
        let first = adapter.initialize(false).unwrap();
        let second = adapter.initialize(false).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn forced_initialize_rebuilds() {
        let adapter = adapter();
        let first = adapter.initialize(false).unwrap();
        let forced = adapter.initialize(true).unwrap();
        assert!(!Arc::ptr_eq(&first, &forced));
        let after = adapter.initialize(false).unwrap();
        assert!(Arc::ptr_eq(&forced, &after));
    }

    #[test]
    fn shared_scope_populates_store() {
        let store = CredentialStore::new();
        let options = CredentialOptions::new("shared", "s");
        let adapter =
            SmsAdapter::<Echo>::new(store.clone(), Some(&options), OptionsScope::Shared).unwrap();
        assert_eq!(adapter.credentials().id, "shared");
        assert_eq!(adapter.credentials().secret, "s");
        assert_eq!(store.defaults(), Some(options));

        let later = SmsAdapter::<Echo>::new(store, None, OptionsScope::Instance).unwrap();
        assert_eq!(later.credentials().id, "shared");
    }

    #[tokio::test]
    async fn shared_scope_without_section_stores_empty_defaults() {
        let store = CredentialStore::new();
        let adapter = SmsAdapter::<Echo>::new(store.clone(), None, OptionsScope::Shared).unwrap();
        assert_eq!(store.defaults(), Some(CredentialOptions::default()));
        assert_eq!(adapter.credentials().id, "");

        let err = adapter
            .send(&Message::new("+15550002222", "hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, SmsError::Config(_)));
        assert!(!adapter.is_initialized());
    }

    #[test]
    fn instance_scope_leaves_store_alone() {
        let store = CredentialStore::new();
        let options = CredentialOptions::new("local", "s");
        let adapter =
            SmsAdapter::<Echo>::new(store.clone(), Some(&options), OptionsScope::Instance)
                .unwrap();
        assert_eq!(adapter.credentials().id, "local");
        assert_eq!(store.defaults(), None);
    }

    #[test]
    fn construction_without_any_source_fails() {
        let err = SmsAdapter::<Echo>::new(CredentialStore::new(), None, OptionsScope::Instance)
            .unwrap_err();
        assert!(matches!(err, SmsError::Config(_)));
    }

    #[test]
    fn set_credentials_keeps_client_until_forced() {
        let mut adapter = adapter();
        let before = adapter.initialize(false).unwrap();
        adapter
            .set_credentials(CredentialSource::positional("other", "x"))
            .unwrap();
        assert_eq!(adapter.credentials().id, "other");
        assert!(Arc::ptr_eq(&before, &adapter.initialize(false).unwrap()));
        assert!(!Arc::ptr_eq(&before, &adapter.initialize(true).unwrap()));
    }

    #[tokio::test]
    async fn send_forwards_validated_fields() {
        let adapter = adapter();
        let response = adapter
            .send(&Message::new("+15550002222", "hi").with_from("+15550001111"))
            .await
            .unwrap();
        assert_eq!(response.id, "echo-1");

        let client = adapter.initialize(false).unwrap();
        let sent = client.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].from, "+15550001111");
        assert_eq!(sent[0].to, "+15550002222");
        assert_eq!(sent[0].text, "hi");
    }

    #[tokio::test]
    async fn send_without_destination_never_builds_client() {
        let adapter = adapter();
        let message = Message {
            text: Some("hi".into()),
            ..Message::default()
        };
        let err = adapter.send(&message).await.unwrap_err();
        assert!(matches!(err, SmsError::Invalid(_)));
        assert!(!adapter.is_initialized());
    }

    #[tokio::test]
    async fn empty_identifier_fails_on_send() {
        let adapter = SmsAdapter::<Echo>::with_source(
            CredentialStore::new(),
            CredentialSource::Structured(CredentialOptions::default()),
        )
        .unwrap();
        let err = adapter
            .send(&Message::new("+15550002222", "hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, SmsError::Config(_)));
        assert!(!adapter.is_initialized());
    }

    #[tokio::test]
    async fn vendor_errors_propagate() {
        let adapter = adapter();
        let err = adapter
            .send(&Message::new("+15550002222", "fail"))
            .await
            .unwrap_err();
        assert!(matches!(err, SmsError::Provider(_)));
    }
}
