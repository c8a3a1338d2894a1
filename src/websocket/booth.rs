//! Booth event WebSocket handler
//!
//! Every connection is one [`EventHub`](photobooth_core::EventHub) client:
//! the write pump drains its queue, the read pump forwards text frames to
//! the hub. Whichever pump stops first unregisters the client.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::Extension;
use axum::response::IntoResponse;
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use photobooth_core::{ClientId, ClientSubscription, Event, EventHub, Orchestrator};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Connection timings
#[derive(Debug, Clone, Copy)]
pub struct WsSettings {
    /// Keep-alive ping cadence
    pub ping_interval: Duration,
    /// Deadline for a single outbound frame
    pub write_timeout: Duration,
}

impl Default for WsSettings {
    fn default() -> Self {
        Self {
            ping_interval: Duration::from_secs(30),
            write_timeout: Duration::from_secs(10),
        }
    }
}

/// WebSocket upgrade handler
pub async fn booth_ws_handler(
    ws: WebSocketUpgrade,
    Extension(orchestrator): Extension<Arc<Orchestrator>>,
    Extension(settings): Extension<WsSettings>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, orchestrator, settings))
}

async fn handle_socket(socket: WebSocket, orchestrator: Arc<Orchestrator>, settings: WsSettings) {
    let hub = orchestrator.hub().clone();
    let subscription = hub.register();
    let (sender, receiver) = socket.split();
    serve_client(sender, receiver, hub, subscription, settings).await;
}

/// Run both pumps for one registered client until either stops, then
/// unregister it
pub(crate) async fn serve_client<S, R, E>(
    sender: S,
    receiver: R,
    hub: Arc<EventHub>,
    subscription: ClientSubscription,
    settings: WsSettings,
) where
    S: Sink<Message> + Unpin + Send + 'static,
    S::Error: fmt::Display + Send,
    R: Stream<Item = Result<Message, E>> + Unpin + Send + 'static,
    E: fmt::Display + Send + 'static,
{
    let client_id = subscription.id;
    let mut write_task = tokio::spawn(write_pump(sender, subscription.receiver, settings, client_id));
    let mut read_task = tokio::spawn(read_pump(receiver, hub.clone(), client_id));

    tokio::select! {
        _ = &mut write_task => read_task.abort(),
        _ = &mut read_task => write_task.abort(),
    }

    hub.unregister(client_id);
    debug!(client_id = %client_id, "WebSocket connection ended");
}

async fn write_pump<S>(mut sender: S, mut queue: mpsc::Receiver<Event>, settings: WsSettings, client_id: ClientId)
where
    S: Sink<Message> + Unpin,
    S::Error: fmt::Display,
{
    let mut ping = tokio::time::interval(settings.ping_interval);
    ping.tick().await;

    loop {
        let message = tokio::select! {
            event = queue.recv() => match event {
                Some(event) => match event.to_json() {
                    Ok(json) => Message::Text(json),
                    Err(e) => {
                        warn!(client_id = %client_id, error = %e, "Failed to serialize event");
                        continue;
                    }
                },
                None => {
                    // dropped by the hub (backpressure) or unregistered
                    let _ = tokio::time::timeout(settings.write_timeout, sender.send(Message::Close(None))).await;
                    break;
                }
            },
            _ = ping.tick() => Message::Ping(Vec::new()),
        };

        match tokio::time::timeout(settings.write_timeout, sender.send(message)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                debug!(client_id = %client_id, error = %e, "WebSocket write failed");
                break;
            }
            Err(_) => {
                warn!(client_id = %client_id, "WebSocket write timed out");
                break;
            }
        }
    }
}

async fn read_pump<R, E>(mut receiver: R, hub: Arc<EventHub>, client_id: ClientId)
where
    R: Stream<Item = Result<Message, E>> + Unpin,
    E: fmt::Display,
{
    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => hub.handle_inbound(client_id, &text),
            Ok(Message::Close(_)) => {
                info!(client_id = %client_id, "WebSocket closed by client");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                debug!(client_id = %client_id, error = %e, "WebSocket read failed");
                break;
            }
        }
    }
}
