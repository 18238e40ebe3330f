//! Supervised notification socket.
//!
//! ```text
//!   connect ──▶ pump frames ──┬─ shutdown ──▶ stop
//!      ▲                      │
//!      └── reconnect delay ◀──┴─ closed / error / stale heartbeat
//! ```
//!
//! Only `heartbeat` frames count towards liveness. Outbound messages issued
//! while disconnected are dropped.

use super::heartbeat::{HeartbeatMonitor, HeartbeatStatus};
use super::protocol::{ClientMessage, ServerMessage};
use super::ChannelError;
use crate::config::HeartbeatConfig;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

const EVENT_CAPACITY: usize = 100;
const COMMAND_CAPACITY: usize = 32;

/// One live socket
#[async_trait]
pub trait Connection: Send {
    async fn send(&mut self, text: String) -> Result<(), ChannelError>;

    /// Next text frame, `None` once the peer has closed
    async fn recv(&mut self) -> Option<Result<String, ChannelError>>;

    async fn close(&mut self);
}

#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, url: &str) -> Result<Box<dyn Connection>, ChannelError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    Connected,
    Message(ServerMessage),
    Disconnected { reason: String },
    Reconnecting { delay: Duration },
}

#[derive(Debug)]
enum Command {
    Send(ClientMessage),
    Shutdown,
}

enum Step {
    Frame(Option<Result<String, ChannelError>>),
    Command(Option<Command>),
    Check,
}

enum Exit {
    Shutdown,
    Lost(String),
}

pub struct NotificationChannel<C> {
    connector: C,
    url: String,
    config: HeartbeatConfig,
    events: broadcast::Sender<ChannelEvent>,
}

/// Control side of a running channel
#[derive(Debug, Clone)]
pub struct NotificationHandle {
    commands: mpsc::Sender<Command>,
    events: broadcast::Sender<ChannelEvent>,
}

impl NotificationHandle {
    pub async fn send(&self, message: ClientMessage) -> Result<(), ChannelError> {
        self.commands
            .send(Command::Send(message))
            .await
            .map_err(|_| ChannelError::Closed)
    }

    pub async fn mark_read(&self, notification_id: u64) -> Result<(), ChannelError> {
        self.send(ClientMessage::MarkRead { notification_id }).await
    }

    pub async fn mark_all_read(&self) -> Result<(), ChannelError> {
        self.send(ClientMessage::MarkAllRead).await
    }

    /// Stop the supervisor; a no-op if it already stopped
    pub async fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown).await;
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChannelEvent> {
        self.events.subscribe()
    }
}

impl<C: Connector + 'static> NotificationChannel<C> {
    pub fn new(connector: C, url: impl Into<String>, config: HeartbeatConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            connector,
            url: url.into(),
            config,
            events,
        }
    }

    /// Subscribe before `spawn` to observe the first connection
    pub fn subscribe(&self) -> broadcast::Receiver<ChannelEvent> {
        self.events.subscribe()
    }

    pub fn spawn(self) -> (NotificationHandle, JoinHandle<()>) {
        let (commands, receiver) = mpsc::channel(COMMAND_CAPACITY);
        let handle = NotificationHandle {
            commands,
            events: self.events.clone(),
        };
        let task = tokio::spawn(self.run(receiver));
        (handle, task)
    }

    async fn run(self, mut commands: mpsc::Receiver<Command>) {
        let target = redact_token(&self.url);

        loop {
            let mut conn = match self.connector.connect(&self.url).await {
                Ok(conn) => conn,
                Err(err) => {
                    tracing::warn!(url = %target, error = %err, "notification socket connect failed");
                    self.emit(ChannelEvent::Disconnected {
                        reason: err.to_string(),
                    });
                    if self.wait_to_reconnect(&mut commands).await {
                        continue;
                    }
                    break;
                }
            };

            tracing::info!(url = %target, "notification socket connected");
            self.emit(ChannelEvent::Connected);

            let exit = self.pump(conn.as_mut(), &mut commands).await;
            conn.close().await;

            match exit {
                Exit::Shutdown => break,
                Exit::Lost(reason) => {
                    tracing::warn!(url = %target, %reason, "notification socket lost");
                    self.emit(ChannelEvent::Disconnected { reason });
                    if !self.wait_to_reconnect(&mut commands).await {
                        break;
                    }
                }
            }
        }

        tracing::info!(url = %target, "notification channel stopped");
    }

    async fn pump(&self, conn: &mut dyn Connection, commands: &mut mpsc::Receiver<Command>) -> Exit {
        let period = self.config.check_interval();
        let mut ticker = interval_at(Instant::now() + period, period);
        let mut monitor = HeartbeatMonitor::new(self.config.max_missed);

        loop {
            let step = tokio::select! {
                frame = conn.recv() => Step::Frame(frame),
                command = commands.recv() => Step::Command(command),
                _ = ticker.tick() => Step::Check,
            };

            match step {
                Step::Frame(None) => return Exit::Lost("connection closed".to_string()),
                Step::Frame(Some(Err(err))) => return Exit::Lost(err.to_string()),
                Step::Frame(Some(Ok(text))) => match ServerMessage::parse(&text) {
                    Ok(message) => {
                        if message.is_heartbeat() {
                            monitor.record_heartbeat();
                        }
                        self.emit(ChannelEvent::Message(message));
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "ignoring unrecognized notification frame");
                    }
                },
                Step::Command(None) | Step::Command(Some(Command::Shutdown)) => return Exit::Shutdown,
                Step::Command(Some(Command::Send(message))) => {
                    let text = match message.to_json() {
                        Ok(text) => text,
                        Err(err) => {
                            tracing::error!(error = %err, "failed to encode outbound message");
                            continue;
                        }
                    };
                    if let Err(err) = conn.send(text).await {
                        return Exit::Lost(err.to_string());
                    }
                }
                Step::Check => match monitor.check() {
                    HeartbeatStatus::Alive => {}
                    HeartbeatStatus::Missed(missed) => {
                        tracing::debug!(missed, "no heartbeat since last check");
                    }
                    HeartbeatStatus::Stale => {
                        return Exit::Lost(format!("missed {} heartbeats", monitor.missed()));
                    }
                },
            }
        }
    }

    /// Sleep out the reconnect delay; `false` when shut down meanwhile
    async fn wait_to_reconnect(&self, commands: &mut mpsc::Receiver<Command>) -> bool {
        let delay = self.config.reconnect_delay();
        self.emit(ChannelEvent::Reconnecting { delay });

        let sleep = tokio::time::sleep(delay);
        tokio::pin!(sleep);

        loop {
            tokio::select! {
                _ = &mut sleep => return true,
                command = commands.recv() => match command {
                    Some(Command::Send(message)) => {
                        tracing::warn!(?message, "dropping outbound message while disconnected");
                    }
                    Some(Command::Shutdown) | None => return false,
                },
            }
        }
    }

    fn emit(&self, event: ChannelEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

/// Strip the query string, which carries the access token
pub fn redact_token(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}
