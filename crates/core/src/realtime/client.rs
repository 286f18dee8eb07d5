//! Reconnecting client for the realtime push channel.
//!
//! [`EventStreamClient`] owns one logical connection to the push endpoint:
//! it gates connects behind a capability probe whose verdict is remembered
//! in the session store, fans incoming envelopes out to registered
//! listeners, and recovers from abnormal closes with exponentially spaced
//! reconnect attempts. A clean close, an exhausted retry budget or an
//! endpoint marked unavailable all leave the client idle until the next
//! explicit connect.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use caresync_common::resilience::BackoffStrategy;
use caresync_domain::constants::{
    CONNECTED_MESSAGE, MAX_RECONNECT_ATTEMPTS, PUSH_AVAILABILITY_KEY, RECONNECT_BASE_DELAY_MS,
    RECONNECT_MAX_DELAY_MS,
};
use caresync_domain::{EventEnvelope, EventKind, Severity};
use serde_json::Value;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::realtime::ports::{
    CapabilityProbe, PushConnection, PushTransport, TransportEvent, ABNORMAL_CLOSE,
};
use crate::realtime::registry::{ListenerRegistry, SubscriptionId};
use crate::session_ports::{AccessTokenProvider, SessionStore};

/// Lifecycle state of the push connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Delay before the reconnect attempt that follows `prior_failures`
/// consecutive failures: 1s, 2s, 4s, 8s, 16s, capped at 30s.
pub fn reconnect_delay(prior_failures: u32) -> Duration {
    BackoffStrategy::Exponential {
        initial_delay: Duration::from_millis(RECONNECT_BASE_DELAY_MS),
        base: 2.0,
        max_delay: Duration::from_millis(RECONNECT_MAX_DELAY_MS),
    }
    .calculate_delay(prior_failures)
}

/// State shared between the client handle and its background tasks.
struct ClientShared {
    endpoint: String,
    transport: Arc<dyn PushTransport>,
    probe: Arc<dyn CapabilityProbe>,
    session: Arc<dyn SessionStore>,
    tokens: Arc<dyn AccessTokenProvider>,
    registry: ListenerRegistry,
    state: Mutex<ConnectionState>,
    outbound: Mutex<Option<UnboundedSender<String>>>,
    cancel: Mutex<CancellationToken>,
    reconnect_attempts: AtomicU32,
}

/// Pub/sub client over the push channel.
///
/// Listeners may be registered before connecting; they survive reconnects
/// and stay registered until explicitly removed. Connection lifecycle
/// changes are announced to `notification` listeners as synthetic events,
/// the same shape the server uses for free-form notices.
///
/// ```no_run
/// # use caresync_core::EventStreamClient;
/// # use caresync_domain::EventKind;
/// # async fn example(client: EventStreamClient) {
/// client.subscribe(EventKind::AppointmentCreated, |payload| {
///     println!("nueva cita: {payload}");
/// });
/// client.connect("jwt").await;
/// # }
/// ```
pub struct EventStreamClient {
    shared: Arc<ClientShared>,
}

impl EventStreamClient {
    /// Create a client for `endpoint` (the full push URL without the token
    /// query parameter).
    ///
    /// `tokens` supplies credentials for reconnect attempts only; the
    /// initial connect receives its token explicitly.
    pub fn new(
        endpoint: impl Into<String>,
        transport: Arc<dyn PushTransport>,
        probe: Arc<dyn CapabilityProbe>,
        session: Arc<dyn SessionStore>,
        tokens: Arc<dyn AccessTokenProvider>,
    ) -> Self {
        Self {
            shared: Arc::new(ClientShared {
                endpoint: endpoint.into(),
                transport,
                probe,
                session,
                tokens,
                registry: ListenerRegistry::new(),
                state: Mutex::new(ConnectionState::Disconnected),
                outbound: Mutex::new(None),
                cancel: Mutex::new(CancellationToken::new()),
                reconnect_attempts: AtomicU32::new(0),
            }),
        }
    }

    /// Connect with `token`, unless already connecting or connected.
    ///
    /// When the push endpoint has never been probed this checks it first
    /// and remembers the verdict in the session store; an endpoint marked
    /// unavailable skips the connect entirely. Connection failures do not
    /// surface here, they feed the reconnect policy instead.
    pub async fn connect(&self, token: &str) {
        {
            let state = self.shared.state.lock().unwrap();
            if *state != ConnectionState::Disconnected {
                debug!(state = ?*state, "push connect skipped; already active");
                return;
            }
        }
        {
            // A previous disconnect leaves the epoch token cancelled.
            let mut cancel = self.shared.cancel.lock().unwrap();
            if cancel.is_cancelled() {
                *cancel = CancellationToken::new();
            }
        }
        if !self.shared.ensure_capability().await {
            return;
        }
        self.shared.start_connection(token).await;
    }

    /// Tear down the connection and cancel any pending reconnect.
    ///
    /// Resets the retry budget, so a later [`connect`](Self::connect)
    /// starts fresh.
    pub fn disconnect(&self) {
        let cancel = self.shared.cancel.lock().unwrap().clone();
        cancel.cancel();
        *self.shared.outbound.lock().unwrap() = None;
        self.shared.reconnect_attempts.store(0, Ordering::SeqCst);
        *self.shared.state.lock().unwrap() = ConnectionState::Disconnected;
        info!("push channel disconnected");
    }

    /// Register `callback` for events of `kind` and return its removal
    /// handle.
    pub fn subscribe<F>(&self, kind: EventKind, callback: F) -> SubscriptionId
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.shared.registry.subscribe(kind, callback)
    }

    /// Remove the registration identified by `id`.
    pub fn unsubscribe(&self, kind: EventKind, id: SubscriptionId) {
        self.shared.registry.unsubscribe(kind, id);
    }

    /// Number of listeners currently registered for `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.shared.registry.listener_count(kind)
    }

    /// Queue `envelope` for sending. Dropped with a warning when the
    /// channel is not connected.
    pub fn send_message(&self, envelope: &EventEnvelope) {
        let outbound = self.shared.outbound.lock().unwrap();
        let Some(sender) = outbound.as_ref() else {
            warn!("push channel not connected; dropping outbound message");
            return;
        };
        match serde_json::to_string(envelope) {
            Ok(text) => {
                if sender.send(text).is_err() {
                    warn!("push channel shutting down; dropping outbound message");
                }
            }
            Err(err) => warn!(error = %err, "failed to encode outbound push message"),
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.shared.state.lock().unwrap()
    }

    /// Reconnect attempts consumed since the last successful open.
    pub fn reconnect_attempts(&self) -> u32 {
        self.shared.reconnect_attempts.load(Ordering::SeqCst)
    }
}

impl Drop for EventStreamClient {
    fn drop(&mut self) {
        self.shared.cancel.lock().unwrap().cancel();
    }
}

impl ClientShared {
    /// Whether the push endpoint is usable, probing it on first use.
    ///
    /// The session store pins the verdict across connects: "false" blocks
    /// until something clears the key, any other stored value passes.
    async fn ensure_capability(self: &Arc<Self>) -> bool {
        match self.session.get(PUSH_AVAILABILITY_KEY) {
            Some(flag) if flag == "false" => {
                info!("push endpoint marked unavailable; skipping connect");
                false
            }
            Some(_) => true,
            None => self.verify_capability().await,
        }
    }

    /// Probe the endpoint once and persist the verdict.
    async fn verify_capability(self: &Arc<Self>) -> bool {
        let available = self.probe.check().await;
        self.session.put(PUSH_AVAILABILITY_KEY, if available { "true" } else { "false" });
        if !available {
            info!("push endpoint unavailable; realtime notifications disabled");
        }
        available
    }

    /// Open a connection with `token`. No-op unless currently disconnected.
    async fn start_connection(self: &Arc<Self>, token: &str) {
        {
            let mut state = self.state.lock().unwrap();
            if *state != ConnectionState::Disconnected {
                return;
            }
            *state = ConnectionState::Connecting;
        }
        let url = format!("{}?token={}", self.endpoint, token);
        match self.transport.connect(&url).await {
            Ok(connection) => self.handle_open(connection),
            Err(err) => {
                warn!(error = %err, "push connection failed to open");
                *self.state.lock().unwrap() = ConnectionState::Disconnected;
                self.handle_connection_loss(ABNORMAL_CLOSE).await;
            }
        }
    }

    /// Wire up a freshly opened connection and spawn its event loop.
    fn handle_open(self: &Arc<Self>, connection: Box<dyn PushConnection>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        *self.state.lock().unwrap() = ConnectionState::Connected;
        self.reconnect_attempts.store(0, Ordering::SeqCst);
        *self.outbound.lock().unwrap() = Some(sender);
        info!("push channel connected");
        self.dispatch_envelope(&EventEnvelope::notification(CONNECTED_MESSAGE, Severity::Success));

        let shared = Arc::clone(self);
        let cancel = self.cancel.lock().unwrap().clone();
        tokio::spawn(async move {
            shared.run_connection(connection, receiver, cancel).await;
        });
    }

    /// Pump one connection until it closes, then hand off to the close
    /// handling. Cancellation closes the connection and exits without
    /// entering the reconnect path.
    async fn run_connection(
        self: Arc<Self>,
        mut connection: Box<dyn PushConnection>,
        mut outbound: UnboundedReceiver<String>,
        cancel: CancellationToken,
    ) {
        let (code, clean) = loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    connection.close().await;
                    return;
                }
                queued = outbound.recv() => match queued {
                    Some(text) => {
                        if let Err(err) = connection.send(&text).await {
                            warn!(error = %err, "push send failed");
                        }
                    }
                    // Sender cleared; disconnect is in progress.
                    None => {
                        connection.close().await;
                        return;
                    }
                },
                event = connection.next_event() => match event {
                    TransportEvent::Message(text) => self.handle_message(&text),
                    TransportEvent::Closed { code, clean } => break (code, clean),
                    TransportEvent::Error(reason) => {
                        warn!(reason, "push connection errored");
                        break (ABNORMAL_CLOSE, false);
                    }
                },
            }
        };
        self.handle_close(code, clean).await;
    }

    /// Parse one wire frame and fan it out. Unparseable frames are
    /// dropped; one bad frame must not take the connection down.
    fn handle_message(&self, text: &str) {
        match serde_json::from_str::<EventEnvelope>(text) {
            Ok(envelope) => {
                debug!(kind = envelope.kind.as_str(), "push event received");
                self.dispatch_envelope(&envelope);
            }
            Err(err) => warn!(error = %err, "discarding unparseable push frame"),
        }
    }

    fn dispatch_envelope(&self, envelope: &EventEnvelope) {
        self.registry.dispatch(envelope.kind, &envelope.payload);
    }

    async fn handle_close(self: &Arc<Self>, code: u16, clean: bool) {
        *self.state.lock().unwrap() = ConnectionState::Disconnected;
        *self.outbound.lock().unwrap() = None;
        if clean {
            info!(code, "push channel closed");
            return;
        }
        warn!(code, "push channel lost");
        self.handle_connection_loss(code).await;
    }

    /// Decide whether an abnormal close is retried.
    ///
    /// An abnormal close on the very first attempt re-probes the endpoint:
    /// a vanished endpoint is indistinguishable from a dropped connection
    /// at the transport level. Later failures trust the stored verdict.
    async fn handle_connection_loss(self: &Arc<Self>, code: u16) {
        if code == ABNORMAL_CLOSE && self.reconnect_attempts.load(Ordering::SeqCst) == 0 {
            if !self.verify_capability().await {
                return;
            }
            self.schedule_reconnect();
            return;
        }
        if self.session.get(PUSH_AVAILABILITY_KEY).as_deref() == Some("false") {
            info!("push endpoint marked unavailable; not reconnecting");
            return;
        }
        self.schedule_reconnect();
    }

    /// Arm the next reconnect attempt, or give up once the budget is
    /// spent. Listeners hear about the attempt as a synthetic warning
    /// notification.
    fn schedule_reconnect(self: &Arc<Self>) {
        let cancel = self.cancel.lock().unwrap().clone();
        if cancel.is_cancelled() {
            return;
        }
        let prior = self.reconnect_attempts.load(Ordering::SeqCst);
        if prior >= MAX_RECONNECT_ATTEMPTS {
            error!(
                attempts = prior,
                "push reconnect attempts exhausted; staying disconnected"
            );
            return;
        }
        // The delay derives from the failure count before this attempt is
        // recorded: retries wait 1s, 2s, 4s, 8s, 16s.
        let delay = reconnect_delay(prior);
        let attempt = prior + 1;
        self.reconnect_attempts.store(attempt, Ordering::SeqCst);
        warn!(
            attempt,
            max = MAX_RECONNECT_ATTEMPTS,
            delay_ms = delay.as_millis() as u64,
            "scheduling push reconnect"
        );
        self.dispatch_envelope(&EventEnvelope::notification(
            format!("Intentando reconectar ({attempt}/{MAX_RECONNECT_ATTEMPTS})..."),
            Severity::Warning,
        ));

        let shared = Arc::clone(self);
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let Some(token) = shared.tokens.access_token() else {
                        warn!("no access token available; skipping push reconnect");
                        return;
                    };
                    shared.start_connection(&token).await;
                }
            }
        });
    }
}
