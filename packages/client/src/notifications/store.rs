use super::protocol::{ClientMessage, Notification, ServerMessage};

/// Notifications known to the client, newest first
#[derive(Debug, Clone, Default)]
pub struct NotificationStore {
    items: Vec<Notification>,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, message: &ServerMessage) {
        match message {
            ServerMessage::InitialNotifications { notifications } => {
                self.items = notifications.clone();
            }
            ServerMessage::NewNotification { notification } => {
                self.items.retain(|n| n.id != notification.id);
                self.items.insert(0, notification.clone());
            }
            ServerMessage::Heartbeat => {}
        }
    }

    /// Mark locally and return the frame to send, if anything changed
    pub fn mark_read(&mut self, id: u64) -> Option<ClientMessage> {
        let item = self.items.iter_mut().find(|n| n.id == id)?;
        if item.read {
            return None;
        }
        item.read = true;
        Some(ClientMessage::MarkRead { notification_id: id })
    }

    pub fn mark_all_read(&mut self) -> ClientMessage {
        for item in &mut self.items {
            item.read = true;
        }
        ClientMessage::MarkAllRead
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }
}
