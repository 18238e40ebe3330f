//! # Media URL Sync
//!
//! After an upload the backend returns `media_urls`, one entry per stored
//! file, each tagged with a `public_id` of the form `media_<index>`. The entry
//! for index `i` belongs to block `media<i + 1>`:
//!
//! ```text
//! { public_id: "media_0", url: "http://a", ... }  ──▶  { "media1": "http://a | ..." }
//! ```
//!
//! Existing blocks are overwritten in place, missing ones are appended.
//! Entries whose `public_id` does not end in `media_<digits>` are skipped.

use crate::block::{Block, BlockPayload, MediaPayload};
use crate::body::Body;
use crate::edits::BodyEdit;
use crate::record::{ContentId, ContentRecord};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Backend-confirmed upload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaUrl {
    pub url: String,
    #[serde(rename = "type", default)]
    pub media_type: String,
    pub public_id: String,
    #[serde(default)]
    pub content_type: String,
}

impl MediaUrl {
    /// Id of the media block this entry belongs to
    pub fn block_id(&self) -> Option<u32> {
        media_index(&self.public_id)?.checked_add(1)
    }

    fn to_payload(&self) -> BlockPayload {
        BlockPayload::Media(MediaPayload {
            url: self.url.clone(),
            media_type: self.media_type.clone(),
            public_id: self.public_id.clone(),
            content_type: self.content_type.clone(),
        })
    }
}

fn public_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"media_(\d+)$").expect("valid public id pattern"))
}

/// Zero-based upload index encoded in a `public_id`
pub fn media_index(public_id: &str) -> Option<u32> {
    public_id_pattern()
        .captures(public_id)?
        .get(1)?
        .as_str()
        .parse()
        .ok()
}

/// Multipart part name carrying the file for media block `block_id`
pub fn upload_field_name(block_id: u32) -> String {
    format!("media_{}", block_id.saturating_sub(1))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub updated: usize,
    pub appended: usize,
    pub skipped: usize,
}

/// Merge backend media URLs into `body`
pub fn sync_media_urls(body: &mut Body, media_urls: &[MediaUrl]) -> SyncReport {
    let mut report = SyncReport::default();

    for entry in media_urls {
        let Some(id) = entry.block_id() else {
            tracing::debug!(public_id = %entry.public_id, "skipping media url with unrecognized public id");
            report.skipped += 1;
            continue;
        };

        let block = Block::new(id, entry.to_payload());
        let edit = match body.position_of_key(&block.key()) {
            Some(index) => BodyEdit::Update { index, block },
            None => BodyEdit::Insert {
                index: body.len(),
                block,
            },
        };

        // Both edits are valid by construction: same key for the update,
        // absent key for the insert.
        match edit.apply(body) {
            Ok(()) if matches!(edit, BodyEdit::Update { .. }) => report.updated += 1,
            Ok(()) => report.appended += 1,
            Err(err) => {
                tracing::warn!(error = %err, "media url sync edit rejected");
                report.skipped += 1;
            }
        }
    }

    report
}

/// Runs the sync once per content identity
#[derive(Debug, Default)]
pub struct MediaSyncGuard {
    synced_for: Option<Option<ContentId>>,
}

impl MediaSyncGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sync `record` unless it was already synced under the same id
    pub fn sync(&mut self, record: &mut ContentRecord) -> Option<SyncReport> {
        if self.synced_for == Some(record.id) {
            return None;
        }

        let report = sync_media_urls(&mut record.body, &record.media_urls);
        self.synced_for = Some(record.id);
        Some(report)
    }

    pub fn has_synced(&self) -> bool {
        self.synced_for.is_some()
    }

    /// Forget the last identity so the next call syncs again
    pub fn reset(&mut self) {
        self.synced_for = None;
    }
}
