use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use tokio::sync::{broadcast, mpsc, RwLock};
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::Message;
use tracing::{debug, error, info, warn};
use url::Url;

use super::messages::{classify, Inbound, Outbound};

/// Lifecycle of the duplex channel.
///
/// `Disconnected` is terminal for the session instance: it is only
/// reached through an unexpected close, and resuming requires a new
/// session. A user-initiated `stop()` returns to `Idle` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Idle,
    Connecting,
    Connected,
    Disconnected,
}

/// Notifications delivered to the single subscriber, in arrival order.
#[derive(Debug)]
pub enum ChannelEvent {
    Inbound(Inbound),
    /// The channel closed without a user-initiated stop. Terminal.
    Disconnected,
}

/// Owns the duplex channel to the speech service.
///
/// `start()` is non-blocking: the handshake runs in a spawned task, and a
/// failed handshake surfaces as the `Disconnected` notification. All
/// inbound frames are decoded and forwarded to the subscriber channel
/// handed in at construction, strictly in arrival order.
pub struct ConnectionManager {
    target: Url,
    state: Arc<RwLock<ConnectionState>>,
    events: mpsc::UnboundedSender<ChannelEvent>,
    outbound: Option<mpsc::UnboundedSender<Message>>,
    shutdown: Option<broadcast::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl ConnectionManager {
    pub fn new(target: Url, events: mpsc::UnboundedSender<ChannelEvent>) -> Self {
        Self {
            target,
            state: Arc::new(RwLock::new(ConnectionState::Idle)),
            events,
            outbound: None,
            shutdown: None,
            task: None,
        }
    }

    pub async fn state(&self) -> ConnectionState {
        *self.state.read().await
    }

    pub fn target(&self) -> &Url {
        &self.target
    }

    /// Open the channel. No-op when already connecting or connected.
    pub async fn start(&mut self) {
        {
            let mut state = self.state.write().await;
            match *state {
                ConnectionState::Connecting | ConnectionState::Connected => {
                    debug!("Channel already starting or started");
                    return;
                }
                _ => *state = ConnectionState::Connecting,
            }
        }

        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();
        let (shutdown_tx, mut shutdown_rx) = broadcast::channel::<()>(1);
        self.outbound = Some(outbound_tx);
        self.shutdown = Some(shutdown_tx);

        let state = Arc::clone(&self.state);
        let events = self.events.clone();
        let target = self.target.clone();

        let task = tokio::spawn(async move {
            info!("Opening duplex channel to {}", target);

            let connected = tokio::select! {
                result = connect_async(target.as_str()) => result,
                _ = shutdown_rx.recv() => {
                    debug!("Channel start aborted");
                    *state.write().await = ConnectionState::Idle;
                    return;
                }
            };

            let (ws_stream, _) = match connected {
                Ok(result) => result,
                Err(e) => {
                    error!("Channel handshake failed: {}", e);
                    *state.write().await = ConnectionState::Disconnected;
                    let _ = events.send(ChannelEvent::Disconnected);
                    return;
                }
            };

            *state.write().await = ConnectionState::Connected;
            info!("Duplex channel established");

            let (mut ws_sink, mut ws_stream) = ws_stream.split();

            loop {
                tokio::select! {
                    Some(message) = outbound_rx.recv() => {
                        if let Err(e) = ws_sink.send(message).await {
                            error!("Failed to send on channel: {}", e);
                            break;
                        }
                    }

                    message = ws_stream.next() => {
                        match message {
                            Some(Ok(msg)) => {
                                if events.send(ChannelEvent::Inbound(classify(msg))).is_err() {
                                    debug!("Subscriber gone; closing channel");
                                    break;
                                }
                            }
                            Some(Err(e)) => {
                                error!("Channel error: {}", e);
                                break;
                            }
                            None => {
                                info!("Channel stream ended");
                                break;
                            }
                        }
                    }

                    _ = shutdown_rx.recv() => {
                        debug!("Channel shutdown requested");
                        let _ = ws_sink.send(Message::Close(None)).await;
                        *state.write().await = ConnectionState::Idle;
                        return;
                    }
                }
            }

            *state.write().await = ConnectionState::Disconnected;
            let _ = events.send(ChannelEvent::Disconnected);
        });

        self.task = Some(task);
    }

    /// Close the channel and return to `Idle`. Used for user-initiated
    /// stops that a later `start()` may resume from; no disconnect
    /// notification is emitted.
    pub async fn stop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        self.outbound = None;

        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                error!("Channel task panicked: {}", e);
            }
        }

        // Stop always lands in Idle, even when the channel had already
        // ended on its own; a later start() resumes from here.
        *self.state.write().await = ConnectionState::Idle;
    }

    /// Send one frame. Dropped with a log when the channel is not
    /// connected; the caller owns any retry decision.
    pub async fn send(&self, frame: Outbound) {
        if *self.state.read().await != ConnectionState::Connected {
            debug!("Dropping outbound frame; channel not connected");
            return;
        }

        match &self.outbound {
            Some(tx) => {
                if tx.send(frame.into_message()).is_err() {
                    warn!("Channel task gone; outbound frame dropped");
                }
            }
            None => debug!("Dropping outbound frame; channel not started"),
        }
    }
}
