//! # Folio Client
//!
//! Application services around the editor: configuration, the signed-in
//! session, loading flags, toasts, saving records to the backend, and the
//! notification socket.
//!
//! ```rust,ignore
//! use folio_client::{AppContext, Attachments, ClientConfig, ContentSaver, Session};
//!
//! let mut ctx = AppContext::new(ClientConfig::load(dir)?);
//! ctx.sign_in(Session::new(token, user_id, "Ada"));
//!
//! let mut saver = ContentSaver::new(backend);
//! saver.save(&mut ctx, &mut record, &Attachments::none()).await?;
//! ```

pub mod backend;
pub mod config;
pub mod context;
pub mod loading;
pub mod notifications;
pub mod save;
pub mod toast;

pub use backend::{
    AttachmentError, Attachments, BackendError, ContentBackend, FileAttachment, SavePayload,
};
pub use config::{ClientConfig, ConfigError, HeartbeatConfig, ToastConfig, DEFAULT_CONFIG_NAME};
pub use context::{AppContext, Session};
pub use loading::{LoadingFlags, LoadingGuard};
pub use save::{ContentSaver, SaveError, SaveKind, SaveOutcome};
pub use toast::{Toast, ToastAction, ToastKind, ToastOptions, ToastQueue};
