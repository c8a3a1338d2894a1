//! EventHub - registry of connected clients and fan-out of booth events.
//!
//! Every client owns a bounded outbound queue. Publishing never waits on a
//! client: a client whose queue is full (or whose receiver is gone) is
//! unregistered on the spot and the broadcast continues with the others.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::activity_log::{LogEntry, LogSink};
use crate::event::{ClientMessage, Event, EventType};

/// Identifier of a connected client
pub type ClientId = Uuid;

/// Callback invoked for inbound `trigger` messages
pub type TriggerHandler = Arc<dyn Fn() + Send + Sync>;

/// Default per-client queue capacity
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

struct ClientEntry {
    role: Option<String>,
    tx: mpsc::Sender<Event>,
}

/// Handle returned by [`EventHub::register`]
///
/// The receiver yields events in publish order and ends once the client is
/// unregistered and the queue has drained.
#[derive(Debug)]
pub struct ClientSubscription {
    /// Client identifier
    pub id: ClientId,
    /// Outbound queue
    pub receiver: mpsc::Receiver<Event>,
}

/// Multi-client event distribution hub
pub struct EventHub {
    clients: Mutex<HashMap<ClientId, ClientEntry>>,
    queue_capacity: usize,
    trigger_handler: RwLock<Option<TriggerHandler>>,
}

impl EventHub {
    /// Create a hub whose clients buffer up to `queue_capacity` events
    #[must_use]
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
            queue_capacity: queue_capacity.max(1),
            trigger_handler: RwLock::new(None),
        }
    }

    fn registry(&self) -> MutexGuard<'_, HashMap<ClientId, ClientEntry>> {
        self.clients.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Wire the callback that inbound `trigger` messages are forwarded to
    pub fn set_trigger_handler(&self, handler: TriggerHandler) {
        let mut slot = self
            .trigger_handler
            .write()
            .unwrap_or_else(|e| e.into_inner());
        *slot = Some(handler);
    }

    /// Add a client; visible to the next broadcast
    pub fn register(&self) -> ClientSubscription {
        let id = Uuid::new_v4();
        let (tx, receiver) = mpsc::channel(self.queue_capacity);
        let total = {
            let mut clients = self.registry();
            clients.insert(id, ClientEntry { role: None, tx });
            clients.len()
        };
        info!(client_id = %id, total, "Client connected");
        ClientSubscription { id, receiver }
    }

    /// Remove a client and drop its queue sender.
    ///
    /// Returns `false` when the client was not registered.
    pub fn unregister(&self, id: ClientId) -> bool {
        let (removed, total) = {
            let mut clients = self.registry();
            let removed = clients.remove(&id).is_some();
            (removed, clients.len())
        };
        if removed {
            info!(client_id = %id, total, "Client disconnected");
        }
        removed
    }

    /// Enqueue `event` for every registered client.
    ///
    /// Returns the number of clients the event was queued for. Clients with a
    /// full or closed queue are dropped and do not count.
    pub fn broadcast(&self, event: Event) -> usize {
        let mut clients = self.registry();
        let mut dropped = Vec::new();
        let mut delivered = 0;

        for (id, entry) in clients.iter() {
            match entry.tx.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    warn!(
                        client_id = %id,
                        role = entry.role.as_deref().unwrap_or("-"),
                        "Client queue full, dropping client"
                    );
                    dropped.push(*id);
                }
                Err(TrySendError::Closed(_)) => {
                    debug!(client_id = %id, "Client queue closed");
                    dropped.push(*id);
                }
            }
        }

        for id in &dropped {
            clients.remove(id);
        }
        if !dropped.is_empty() {
            info!(dropped = dropped.len(), total = clients.len(), "Dropped clients during broadcast");
        }

        delivered
    }

    /// Point-in-time number of registered clients
    #[must_use]
    pub fn client_count(&self) -> usize {
        self.registry().len()
    }

    /// Whether the client is still registered
    #[must_use]
    pub fn is_registered(&self, id: ClientId) -> bool {
        self.registry().contains_key(&id)
    }

    /// Role tag announced by the client, if any
    #[must_use]
    pub fn client_role(&self, id: ClientId) -> Option<String> {
        self.registry().get(&id).and_then(|entry| entry.role.clone())
    }

    /// Store the role tag of a registered client
    pub fn set_role(&self, id: ClientId, role: impl Into<String>) {
        let role = role.into();
        if let Some(entry) = self.registry().get_mut(&id) {
            info!(client_id = %id, role = %role, "Client registered role");
            entry.role = Some(role);
        }
    }

    /// Handle an inbound text frame from a client
    pub fn handle_inbound(&self, id: ClientId, text: &str) {
        match ClientMessage::parse(text) {
            Some(ClientMessage::Register { role }) => self.set_role(id, role),
            Some(ClientMessage::Trigger) => {
                let handler = self
                    .trigger_handler
                    .read()
                    .unwrap_or_else(|e| e.into_inner())
                    .clone();
                match handler {
                    Some(handler) => {
                        debug!(client_id = %id, "Remote trigger received");
                        handler();
                    }
                    None => warn!(client_id = %id, "Trigger received but no handler is wired"),
                }
            }
            None => debug!(client_id = %id, "Ignoring unrecognized client message"),
        }
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}

impl LogSink for EventHub {
    fn publish(&self, entry: &LogEntry) {
        let mut event = Event::from_payload(EventType::Log, entry);
        event.timestamp = entry.timestamp;
        self.broadcast(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn status(state: &str) -> Event {
        Event::new(EventType::Status, json!({ "state": state }))
    }

    #[tokio::test]
    async fn test_fan_out_to_all_clients() {
        let hub = EventHub::new(8);
        let mut a = hub.register();
        let mut b = hub.register();
        let mut c = hub.register();
        assert_eq!(hub.client_count(), 3);

        assert_eq!(hub.broadcast(status("idle")), 3);

        for sub in [&mut a, &mut b, &mut c] {
            let event = sub.receiver.recv().await.unwrap();
            assert_eq!(event.data["state"], "idle");
        }
    }

    #[tokio::test]
    async fn test_per_client_ordering() {
        let hub = EventHub::new(8);
        let mut sub = hub.register();

        for state in ["countdown", "capturing", "processing"] {
            hub.broadcast(status(state));
        }

        for expected in ["countdown", "capturing", "processing"] {
            let event = sub.receiver.recv().await.unwrap();
            assert_eq!(event.data["state"], expected);
        }
    }

    #[tokio::test]
    async fn test_full_queue_drops_client() {
        let hub = EventHub::new(2);
        let mut slow = hub.register();
        let mut fast = hub.register();

        assert_eq!(hub.broadcast(status("a")), 2);
        assert_eq!(fast.receiver.recv().await.unwrap().data["state"], "a");
        assert_eq!(hub.broadcast(status("b")), 2);
        assert_eq!(fast.receiver.recv().await.unwrap().data["state"], "b");

        // slow client has two queued events; the third overflows
        assert_eq!(hub.broadcast(status("c")), 1);
        assert!(!hub.is_registered(slow.id));
        assert!(hub.is_registered(fast.id));
        assert_eq!(fast.receiver.recv().await.unwrap().data["state"], "c");

        hub.broadcast(status("d"));

        // dropped client only sees what was queued before the overflow
        assert_eq!(slow.receiver.recv().await.unwrap().data["state"], "a");
        assert_eq!(slow.receiver.recv().await.unwrap().data["state"], "b");
        assert!(slow.receiver.recv().await.is_none());
    }

    #[test]
    fn test_closed_receiver_is_pruned() {
        let hub = EventHub::new(4);
        let sub = hub.register();
        let id = sub.id;
        drop(sub);

        assert_eq!(hub.broadcast(status("idle")), 0);
        assert!(!hub.is_registered(id));
        assert_eq!(hub.client_count(), 0);
    }

    #[test]
    fn test_unregister_is_idempotent() {
        let hub = EventHub::default();
        let sub = hub.register();

        assert!(hub.unregister(sub.id));
        assert!(!hub.unregister(sub.id));
        assert!(!hub.unregister(Uuid::new_v4()));
        assert_eq!(hub.client_count(), 0);
    }

    #[test]
    fn test_broadcast_without_clients() {
        let hub = EventHub::default();
        assert_eq!(hub.broadcast(status("idle")), 0);
    }

    #[test]
    fn test_register_message_sets_role() {
        let hub = EventHub::default();
        let sub = hub.register();
        assert_eq!(hub.client_role(sub.id), None);

        hub.handle_inbound(sub.id, r#"{"type":"register","data":{"role":"display"}}"#);
        assert_eq!(hub.client_role(sub.id).as_deref(), Some("display"));
    }

    #[test]
    fn test_trigger_message_invokes_handler() {
        let hub = EventHub::default();
        let sub = hub.register();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        hub.set_trigger_handler(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        hub.handle_inbound(sub.id, r#"{"type":"trigger"}"#);
        hub.handle_inbound(sub.id, r#"{"type":"unknown"}"#);
        hub.handle_inbound(sub.id, "garbage");

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_trigger_without_handler_is_ignored() {
        let hub = EventHub::default();
        let sub = hub.register();
        hub.handle_inbound(sub.id, r#"{"type":"trigger"}"#);
        assert!(hub.is_registered(sub.id));
    }

    #[tokio::test]
    async fn test_log_sink_publishes_log_event() {
        let hub = EventHub::default();
        let mut sub = hub.register();
        let entry = LogEntry {
            level: crate::activity_log::LogLevel::Info,
            message: "ready".to_string(),
            source: "system".to_string(),
            timestamp: 42,
        };

        hub.publish(&entry);

        let event = sub.receiver.recv().await.unwrap();
        assert_eq!(event.event_type, EventType::Log);
        assert_eq!(event.data["message"], "ready");
        assert_eq!(event.timestamp, 42);
    }
}
