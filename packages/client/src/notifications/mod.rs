//! Real-time notification channel.
//!
//! The backend pushes notifications over a WebSocket at
//! `{ws_v1_base_url}/ws/notifications?token=<access token>` and sends a
//! `heartbeat` frame periodically. The client reconnects when heartbeats
//! stop arriving or the socket drops.

mod channel;
mod heartbeat;
mod protocol;
mod store;
mod ws;

pub use channel::{
    redact_token, ChannelEvent, Connection, Connector, NotificationChannel, NotificationHandle,
};
pub use heartbeat::{HeartbeatMonitor, HeartbeatStatus};
pub use protocol::{ClientMessage, Notification, ServerMessage};
pub use store::NotificationStore;
pub use ws::{WsConnection, WsConnector};

use crate::context::AppContext;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    #[error("Not signed in")]
    NotSignedIn,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Notification channel is closed")]
    Closed,
}

/// Build the channel for the signed-in user
pub fn channel_for<C: Connector + 'static>(
    ctx: &AppContext,
    connector: C,
) -> Result<NotificationChannel<C>, ChannelError> {
    let session = ctx.session().ok_or(ChannelError::NotSignedIn)?;
    let url = ctx.config.notifications_url(&session.access_token);
    Ok(NotificationChannel::new(
        connector,
        url,
        ctx.config.heartbeat.clone(),
    ))
}
