use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use folio_client::notifications::{
    channel_for, ChannelEvent, NotificationStore, ServerMessage, WsConnector,
};
use folio_client::{AppContext, ClientConfig, Session};
use std::path::Path;
use tokio::sync::broadcast::error::RecvError;

#[derive(Debug, Args)]
pub struct ListenArgs {
    /// Access token for the notification socket
    #[arg(long)]
    pub token: String,

    /// Mark everything read once the initial batch arrives
    #[arg(long)]
    pub mark_all_read: bool,
}

pub fn listen(args: ListenArgs, cwd: &Path) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(run(args, cwd))
}

async fn run(args: ListenArgs, cwd: &Path) -> Result<()> {
    let mut ctx = AppContext::new(ClientConfig::load(cwd)?);
    ctx.sign_in(Session::new(args.token, 0, "cli"));

    let channel = channel_for(&ctx, WsConnector)?;
    let mut events = channel.subscribe();
    let (handle, task) = channel.spawn();
    let mut store = NotificationStore::new();

    println!("{}", "🔔 Listening for notifications (Ctrl+C to stop)".bright_blue().bold());

    loop {
        let event = tokio::select! {
            event = events.recv() => event,
            _ = tokio::signal::ctrl_c() => break,
        };

        match event {
            Ok(ChannelEvent::Connected) => println!("  {} connected", "✓".green()),
            Ok(ChannelEvent::Disconnected { reason }) => {
                println!("  {} disconnected: {}", "✗".red(), reason)
            }
            Ok(ChannelEvent::Reconnecting { delay }) => {
                println!("  {} reconnecting in {:?}", "↻".yellow(), delay)
            }
            Ok(ChannelEvent::Message(message)) => {
                store.apply(&message);
                match &message {
                    ServerMessage::InitialNotifications { notifications } => {
                        for notification in notifications {
                            println!("  • {}", notification.message);
                        }
                        if args.mark_all_read && store.unread_count() > 0 {
                            handle.send(store.mark_all_read()).await?;
                        }
                    }
                    ServerMessage::NewNotification { notification } => {
                        println!("  {} {}", "●".bright_green(), notification.message);
                    }
                    ServerMessage::Heartbeat => {}
                }
                tracing::debug!(unread = store.unread_count(), "notification state");
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "fell behind on notification events");
            }
            Err(RecvError::Closed) => break,
        }
    }

    handle.shutdown().await;
    task.await.context("Notification task panicked")?;
    ctx.sign_out();

    Ok(())
}
