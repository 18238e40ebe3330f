//! Toast notifications shown to the user.
//!
//! Non-persistent toasts expire after the configured duration; persistent
//! ones stay until dismissed.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastAction {
    pub label: String,
    /// Identifier handed back to the caller when the button is pressed
    pub action_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
    pub persistent: bool,
    pub action: Option<ToastAction>,
    pub expires_at: Option<Instant>,
}

#[derive(Debug, Clone, Default)]
pub struct ToastOptions {
    pub persistent: bool,
    pub action: Option<ToastAction>,
    /// Overrides the queue's default lifetime
    pub duration: Option<Duration>,
}

impl ToastOptions {
    pub fn persistent() -> Self {
        Self {
            persistent: true,
            ..Self::default()
        }
    }

    pub fn with_action(mut self, label: impl Into<String>, action_id: impl Into<String>) -> Self {
        self.action = Some(ToastAction {
            label: label.into(),
            action_id: action_id.into(),
        });
        self
    }
}

#[derive(Debug)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
    next_id: u64,
    default_duration: Duration,
}

impl ToastQueue {
    pub fn new(default_duration: Duration) -> Self {
        Self {
            toasts: Vec::new(),
            next_id: 1,
            default_duration,
        }
    }

    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>, options: ToastOptions) -> u64 {
        self.push_at(kind, message, options, Instant::now())
    }

    /// Push with an explicit clock reading
    pub fn push_at(
        &mut self,
        kind: ToastKind,
        message: impl Into<String>,
        options: ToastOptions,
        now: Instant,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        let expires_at = if options.persistent {
            None
        } else {
            Some(now + options.duration.unwrap_or(self.default_duration))
        };

        let toast = Toast {
            id,
            kind,
            message: message.into(),
            persistent: options.persistent,
            action: options.action,
            expires_at,
        };
        tracing::debug!(id, kind = ?toast.kind, message = %toast.message, "toast");
        self.toasts.push(toast);

        id
    }

    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Success, message, ToastOptions::default())
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Error, message, ToastOptions::default())
    }

    pub fn warning(&mut self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Warning, message, ToastOptions::default())
    }

    pub fn info(&mut self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Info, message, ToastOptions::default())
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.id != id);
        self.toasts.len() != before
    }

    /// Drop expired toasts; returns how many were removed
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.toasts.len();
        self.toasts
            .retain(|toast| toast.expires_at.map_or(true, |deadline| deadline > now));
        before - self.toasts.len()
    }

    pub fn visible(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn clear(&mut self) {
        self.toasts.clear();
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(crate::config::ToastConfig::default().duration())
    }
}
