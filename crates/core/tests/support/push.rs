use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use caresync_core::{
    AccessTokenProvider, CapabilityProbe, Notifier, PushConnection, PushTransport, SessionStore,
    TransportEvent, ABNORMAL_CLOSE,
};
use caresync_domain::{CareSyncError, Result as DomainResult, ToastNotification};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// In-memory mock for `PushTransport`.
///
/// Hands out a single scripted connection on the first connect and fails
/// every connect after that. The paired [`PushConnectionHandle`] drives the
/// connection from the test side.
pub struct MockPushTransport {
    connection: Mutex<Option<MockPushConnection>>,
    urls: Mutex<Vec<String>>,
}

impl MockPushTransport {
    /// Create a transport whose first connect succeeds.
    pub fn single_connection() -> (Arc<Self>, PushConnectionHandle) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let sent = Arc::new(Mutex::new(Vec::new()));
        let connection = MockPushConnection { events: events_rx, sent: Arc::clone(&sent) };
        let transport = Arc::new(Self {
            connection: Mutex::new(Some(connection)),
            urls: Mutex::new(Vec::new()),
        });
        (transport, PushConnectionHandle { events: events_tx, sent })
    }

    /// URLs connects were attempted against, in order.
    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PushTransport for MockPushTransport {
    async fn connect(&self, url: &str) -> DomainResult<Box<dyn PushConnection>> {
        self.urls.lock().unwrap().push(url.to_string());
        match self.connection.lock().unwrap().take() {
            Some(connection) => Ok(Box::new(connection)),
            None => Err(CareSyncError::Network("conexión rechazada".to_string())),
        }
    }
}

struct MockPushConnection {
    events: UnboundedReceiver<TransportEvent>,
    sent: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl PushConnection for MockPushConnection {
    async fn next_event(&mut self) -> TransportEvent {
        self.events
            .recv()
            .await
            .unwrap_or(TransportEvent::Closed { code: ABNORMAL_CLOSE, clean: false })
    }

    async fn send(&mut self, text: &str) -> DomainResult<()> {
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn close(&mut self) {}
}

/// Test-side remote control for a [`MockPushTransport`] connection.
pub struct PushConnectionHandle {
    events: UnboundedSender<TransportEvent>,
    sent: Arc<Mutex<Vec<String>>>,
}

impl PushConnectionHandle {
    /// Deliver one raw text frame to the client.
    pub fn push_frame(&self, frame: &str) {
        self.events
            .send(TransportEvent::Message(frame.to_string()))
            .expect("connection task gone");
    }

    /// Drop the connection the way a lost network does.
    pub fn close_abnormally(&self) {
        self.events
            .send(TransportEvent::Closed { code: ABNORMAL_CLOSE, clean: false })
            .expect("connection task gone");
    }

    /// Frames the client sent over this connection.
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

/// `CapabilityProbe` mock with a fixed verdict.
pub struct MockCapabilityProbe(bool);

impl MockCapabilityProbe {
    pub fn available() -> Arc<Self> {
        Arc::new(Self(true))
    }

    pub fn unavailable() -> Arc<Self> {
        Arc::new(Self(false))
    }
}

#[async_trait]
impl CapabilityProbe for MockCapabilityProbe {
    async fn check(&self) -> bool {
        self.0
    }
}

/// In-memory mock for `SessionStore`.
#[derive(Default)]
pub struct MockSessionStore(Mutex<HashMap<String, String>>);

impl MockSessionStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

impl SessionStore for MockSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0.lock().unwrap().get(key).cloned()
    }

    fn put(&self, key: &str, value: &str) {
        self.0.lock().unwrap().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.0.lock().unwrap().remove(key);
    }
}

/// `AccessTokenProvider` mock answering with a fixed token.
pub struct MockTokenProvider(Option<String>);

impl MockTokenProvider {
    pub fn with_token(token: &str) -> Arc<Self> {
        Arc::new(Self(Some(token.to_string())))
    }
}

impl AccessTokenProvider for MockTokenProvider {
    fn access_token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// `Notifier` mock collecting every toast for later assertions.
#[derive(Default)]
pub struct MockNotifier(Mutex<Vec<ToastNotification>>);

impl MockNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn toasts(&self) -> Vec<ToastNotification> {
        self.0.lock().unwrap().clone()
    }
}

impl Notifier for MockNotifier {
    fn notify(&self, toast: ToastNotification) {
        self.0.lock().unwrap().push(toast);
    }
}
