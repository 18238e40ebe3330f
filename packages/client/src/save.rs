//! Explicit save of a content record.
//!
//! Saves are last-write-wins: there is no version check and no cancellation.
//! A failed save leaves the caller's record untouched and is not retried.

use crate::backend::{AttachmentError, Attachments, BackendError, ContentBackend, SavePayload};
use crate::context::AppContext;
use crate::loading::LoadingFlags;
use folio_editor::{ContentId, ContentRecord, MediaSyncGuard, SyncReport};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("Not signed in")]
    NotSignedIn,

    #[error("Invalid attachments: {0}")]
    Validation(#[from] AttachmentError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveKind {
    Created,
    Updated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub kind: SaveKind,
    pub id: Option<ContentId>,
    /// Present when the response carried media URLs that were merged
    pub media: Option<SyncReport>,
}

pub struct ContentSaver<B> {
    backend: B,
    media_sync: MediaSyncGuard,
}

impl<B: ContentBackend> ContentSaver<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            media_sync: MediaSyncGuard::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Fetch a record for the "edit" action and merge its media URLs once
    pub async fn open(&mut self, ctx: &mut AppContext, id: ContentId) -> Result<ContentRecord, SaveError> {
        if !ctx.is_signed_in() {
            return Err(SaveError::NotSignedIn);
        }

        let mut record = match self.backend.fetch(id).await {
            Ok(record) => record,
            Err(err) => {
                tracing::error!(%id, error = %err, "failed to load content");
                ctx.toasts.error("Could not load content");
                return Err(err.into());
            }
        };

        if let Some(report) = self.media_sync.sync(&mut record) {
            tracing::debug!(%id, ?report, "synced media urls on open");
        }
        Ok(record)
    }

    pub async fn save(
        &mut self,
        ctx: &mut AppContext,
        record: &mut ContentRecord,
        attachments: &Attachments,
    ) -> Result<SaveOutcome, SaveError> {
        if !ctx.is_signed_in() {
            return Err(SaveError::NotSignedIn);
        }

        let mut draft = record.clone();
        {
            let now_millis = chrono::Utc::now().timestamp_millis();
            let mut rng = rand::thread_rng();
            draft.prepare_for_save(now_millis, &mut rng);
        }

        let payload = match SavePayload::build(&draft, attachments) {
            Ok(payload) => payload,
            Err(err) => {
                ctx.toasts.warning(err.to_string());
                return Err(err.into());
            }
        };

        let (flag, kind) = match draft.id {
            Some(id) => (LoadingFlags::updating_content(id), SaveKind::Updated),
            None => (LoadingFlags::creating_content(), SaveKind::Created),
        };
        let guard = ctx.loading.begin(flag);

        tracing::info!(
            id = ?draft.id,
            content_type = draft.content_type.as_str(),
            multipart = payload.is_multipart(),
            "saving content"
        );
        let response = match draft.id {
            Some(id) => self.backend.update(id, payload).await,
            None => self.backend.create(payload).await,
        };
        drop(guard);

        match response {
            Ok(saved) => {
                *record = saved;
                self.media_sync.reset();
                let media = self.media_sync.sync(record).filter(|report| {
                    report.updated + report.appended + report.skipped > 0
                });

                let message = match kind {
                    SaveKind::Created => "Content created",
                    SaveKind::Updated => "Content saved",
                };
                ctx.toasts.success(message);
                tracing::info!(id = ?record.id, ?kind, "content saved");

                Ok(SaveOutcome {
                    kind,
                    id: record.id,
                    media,
                })
            }
            Err(err) => {
                tracing::error!(id = ?draft.id, error = %err, "failed to save content");
                ctx.toasts.error("Failed to save content");
                Err(err.into())
            }
        }
    }
}
