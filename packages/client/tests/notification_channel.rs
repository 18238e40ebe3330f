//! Notification channel supervision with a scripted connector
//!
//! This tests:
//! - Inbound frames become events; outbound commands reach the socket
//! - Reconnect on stale heartbeat, on close and on connect failure
//! - Shutdown while connected and while waiting to reconnect

use async_trait::async_trait;
use folio_client::notifications::{
    ChannelError, ChannelEvent, ClientMessage, Connection, Connector, NotificationChannel,
    NotificationStore, ServerMessage,
};
use folio_client::HeartbeatConfig;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};

struct ScriptedConnection {
    inbound: mpsc::UnboundedReceiver<String>,
    outbound: mpsc::UnboundedSender<String>,
}

#[async_trait]
impl Connection for ScriptedConnection {
    async fn send(&mut self, text: String) -> Result<(), ChannelError> {
        self.outbound
            .send(text)
            .map_err(|err| ChannelError::Transport(err.to_string()))
    }

    async fn recv(&mut self) -> Option<Result<String, ChannelError>> {
        self.inbound.recv().await.map(Ok)
    }

    async fn close(&mut self) {}
}

/// Server side of one scripted connection
struct Peer {
    to_client: mpsc::UnboundedSender<String>,
    from_client: mpsc::UnboundedReceiver<String>,
}

#[derive(Clone, Default)]
struct ScriptedConnector {
    attempts: Arc<Mutex<VecDeque<Result<ScriptedConnection, String>>>>,
}

impl ScriptedConnector {
    fn accept(&self) -> Peer {
        let (to_client, inbound) = mpsc::unbounded_channel();
        let (outbound, from_client) = mpsc::unbounded_channel();
        self.attempts
            .lock()
            .unwrap()
            .push_back(Ok(ScriptedConnection { inbound, outbound }));
        Peer {
            to_client,
            from_client,
        }
    }

    fn refuse(&self, reason: &str) {
        self.attempts
            .lock()
            .unwrap()
            .push_back(Err(reason.to_string()));
    }
}

#[async_trait]
impl Connector for ScriptedConnector {
    async fn connect(&self, _url: &str) -> Result<Box<dyn Connection>, ChannelError> {
        let attempt = self.attempts.lock().unwrap().pop_front();
        match attempt {
            Some(Ok(conn)) => Ok(Box::new(conn)),
            Some(Err(reason)) => Err(ChannelError::Connect(reason)),
            None => Err(ChannelError::Connect("no server".to_string())),
        }
    }
}

fn fast_heartbeat() -> HeartbeatConfig {
    HeartbeatConfig {
        check_interval_ms: 20,
        max_missed: 2,
        reconnect_delay_ms: 10,
    }
}

async fn next_event(events: &mut broadcast::Receiver<ChannelEvent>) -> ChannelEvent {
    tokio::time::timeout(Duration::from_secs(2), events.recv())
        .await
        .expect("timed out waiting for channel event")
        .expect("event stream closed")
}

/// Skip events until one matches
async fn wait_for(
    events: &mut broadcast::Receiver<ChannelEvent>,
    matches: impl Fn(&ChannelEvent) -> bool,
) -> ChannelEvent {
    loop {
        let event = next_event(events).await;
        if matches(&event) {
            return event;
        }
    }
}

#[tokio::test]
async fn test_inbound_and_outbound_frames() {
    let connector = ScriptedConnector::default();
    let mut peer = connector.accept();

    let channel = NotificationChannel::new(connector, "ws://test/ws/notifications?token=t", HeartbeatConfig::default());
    let mut events = channel.subscribe();
    let (handle, task) = channel.spawn();

    assert_eq!(next_event(&mut events).await, ChannelEvent::Connected);

    peer.to_client
        .send(r#"{"type":"initial_notifications","notifications":[{"id":1,"message":"Hi","read":false}]}"#.to_string())
        .unwrap();
    peer.to_client.send("not json".to_string()).unwrap();
    peer.to_client
        .send(r#"{"type":"new_notification","notification":{"id":2,"message":"Comment"}}"#.to_string())
        .unwrap();

    let mut store = NotificationStore::new();
    for _ in 0..2 {
        match next_event(&mut events).await {
            ChannelEvent::Message(message) => store.apply(&message),
            other => panic!("Expected message, got {:?}", other),
        }
    }
    assert_eq!(store.unread_count(), 2);
    assert_eq!(store.items()[0].id, 2);

    let frame = store.mark_read(1).unwrap();
    handle.send(frame).await.unwrap();
    handle.mark_all_read().await.unwrap();

    assert_eq!(
        peer.from_client.recv().await.unwrap(),
        r#"{"type":"mark_read","notification_id":1}"#
    );
    assert_eq!(
        peer.from_client.recv().await.unwrap(),
        ClientMessage::MarkAllRead.to_json().unwrap()
    );

    handle.shutdown().await;
    tokio::time::timeout(Duration::from_secs(2), task)
        .await
        .expect("channel did not stop")
        .unwrap();
}

#[tokio::test]
async fn test_reconnects_after_missed_heartbeats() {
    let connector = ScriptedConnector::default();
    let silent = connector.accept();
    let second = connector.accept();

    let channel = NotificationChannel::new(connector, "ws://test", fast_heartbeat());
    let mut events = channel.subscribe();
    let (handle, task) = channel.spawn();

    assert_eq!(next_event(&mut events).await, ChannelEvent::Connected);

    let ChannelEvent::Disconnected { reason } =
        wait_for(&mut events, |e| matches!(e, ChannelEvent::Disconnected { .. })).await
    else {
        unreachable!();
    };
    assert!(reason.contains("heartbeat"), "unexpected reason: {}", reason);

    assert_eq!(
        next_event(&mut events).await,
        ChannelEvent::Reconnecting {
            delay: Duration::from_millis(10)
        }
    );
    assert_eq!(next_event(&mut events).await, ChannelEvent::Connected);

    drop(silent);
    drop(second);
    handle.shutdown().await;
    let _ = tokio::time::timeout(Duration::from_secs(2), task).await;
}

#[tokio::test]
async fn test_heartbeats_keep_connection_alive() {
    let connector = ScriptedConnector::default();
    let peer = connector.accept();

    let channel = NotificationChannel::new(connector, "ws://test", HeartbeatConfig {
        check_interval_ms: 40,
        max_missed: 3,
        reconnect_delay_ms: 10,
    });
    let mut events = channel.subscribe();
    let (handle, task) = channel.spawn();
    assert_eq!(next_event(&mut events).await, ChannelEvent::Connected);

    // Several check intervals' worth of heartbeats.
    for _ in 0..40 {
        peer.to_client.send(r#"{"type":"heartbeat"}"#.to_string()).unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let mut heartbeats = 0;
    while let Ok(event) = events.try_recv() {
        match event {
            ChannelEvent::Message(ServerMessage::Heartbeat) => heartbeats += 1,
            other => panic!("Unexpected event while alive: {:?}", other),
        }
    }
    assert!(heartbeats > 0);

    handle.shutdown().await;
    let _ = tokio::time::timeout(Duration::from_secs(2), task).await;
}

#[tokio::test]
async fn test_reconnects_after_close_and_connect_failure() {
    let connector = ScriptedConnector::default();
    let first = connector.accept();
    connector.refuse("connection refused");
    let _third = connector.accept();

    let channel = NotificationChannel::new(connector, "ws://test", HeartbeatConfig {
        check_interval_ms: 60_000,
        max_missed: 5,
        reconnect_delay_ms: 10,
    });
    let mut events = channel.subscribe();
    let (handle, task) = channel.spawn();
    assert_eq!(next_event(&mut events).await, ChannelEvent::Connected);

    // Server hangs up.
    drop(first);

    assert_eq!(
        next_event(&mut events).await,
        ChannelEvent::Disconnected {
            reason: "connection closed".to_string()
        }
    );
    assert!(matches!(next_event(&mut events).await, ChannelEvent::Reconnecting { .. }));

    let ChannelEvent::Disconnected { reason } = next_event(&mut events).await else {
        panic!("Expected connect failure");
    };
    assert!(reason.contains("connection refused"));
    assert!(matches!(next_event(&mut events).await, ChannelEvent::Reconnecting { .. }));
    assert_eq!(next_event(&mut events).await, ChannelEvent::Connected);

    handle.shutdown().await;
    tokio::time::timeout(Duration::from_secs(2), task)
        .await
        .expect("channel did not stop")
        .unwrap();
}

#[tokio::test]
async fn test_shutdown_while_waiting_to_reconnect() {
    let connector = ScriptedConnector::default();

    let channel = NotificationChannel::new(connector, "ws://test", HeartbeatConfig {
        check_interval_ms: 60_000,
        max_missed: 5,
        reconnect_delay_ms: 60_000,
    });
    let mut events = channel.subscribe();
    let (handle, task) = channel.spawn();

    assert!(matches!(next_event(&mut events).await, ChannelEvent::Disconnected { .. }));
    assert!(matches!(next_event(&mut events).await, ChannelEvent::Reconnecting { .. }));

    handle.shutdown().await;
    tokio::time::timeout(Duration::from_secs(2), task)
        .await
        .expect("shutdown should interrupt the reconnect delay")
        .unwrap();

    assert!(matches!(
        handle.mark_read(1).await,
        Err(ChannelError::Closed)
    ));
}
