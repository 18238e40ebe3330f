//! Application context passed to every service call.

use crate::config::ClientConfig;
use crate::loading::LoadingFlags;
use crate::toast::ToastQueue;
use std::fmt;

/// Signed-in user
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub user_id: u64,
    pub display_name: String,
}

impl Session {
    pub fn new(access_token: impl Into<String>, user_id: u64, display_name: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            user_id,
            display_name: display_name.into(),
        }
    }
}

// Tokens never reach logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("display_name", &self.display_name)
            .finish()
    }
}

#[derive(Debug)]
pub struct AppContext {
    pub config: ClientConfig,
    session: Option<Session>,
    pub loading: LoadingFlags,
    pub toasts: ToastQueue,
}

impl AppContext {
    pub fn new(config: ClientConfig) -> Self {
        let toasts = ToastQueue::new(config.toast.duration());
        Self {
            config,
            session: None,
            loading: LoadingFlags::new(),
            toasts,
        }
    }

    pub fn sign_in(&mut self, session: Session) {
        tracing::info!(user_id = session.user_id, "signed in");
        self.session = Some(session);
    }

    /// Drop the session along with any per-user UI state
    pub fn sign_out(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::info!(user_id = session.user_id, "signed out");
        }
        self.loading.clear();
        self.toasts.clear();
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}
