//! # Folio Editor
//!
//! Content body model and editing engine for Folio posts and articles.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ codec: wire array ⇄ typed blocks            │
//! │  [{ "text1": "Hi#112233" }] ⇄ Block { .. }  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ body + edits: ordered blocks, validated     │
//! │  insert/update/remove/move, undo history    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ session: overlay on one block at a time,    │
//! │  policy per content type (post / article)   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ record: title derivation, media URL sync,   │
//! │  JSON for the backend                        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Typed in memory, keyed on the wire**: blocks are a sum type; the
//!    `{kind}{n}` keys exist only in the codec
//! 2. **Derived counters**: new ids come from the current blocks, never from
//!    cached state
//! 3. **Immediate writes**: the overlay writes straight into the body
//!
//! ## Usage
//!
//! ```rust,ignore
//! use folio_editor::{BlockKind, BlockPayload, BodyPolicy, ContentRecord, ContentType, EditSession};
//!
//! let record = ContentRecord::new(ContentType::Post);
//! let mut session = EditSession::new(record.body.clone(), BodyPolicy::post());
//!
//! session.add_block(BlockKind::Text)?;
//! session.on_change(BlockPayload::text("Hello", None))?;
//! session.close();
//! ```

mod block;
mod body;
mod codec;
mod counters;
mod edits;
mod errors;
mod media_sync;
mod policy;
mod record;
mod session;
mod title;
mod undo_stack;

pub use block::{
    Block, BlockKind, BlockPayload, HexColor, InvalidHexColor, MediaPayload, UnknownBlockKind,
};
pub use body::{AppendPlan, Appended, Body};
pub use codec::{decode_value, encode_block, encode_value, from_wire, parse_key, to_wire};
pub use counters::{next_id, CounterRegistry};
pub use edits::{BodyEdit, EditError};
pub use errors::EditorError;
pub use media_sync::{
    media_index, sync_media_urls, upload_field_name, MediaSyncGuard, MediaUrl, SyncReport,
};
pub use policy::BodyPolicy;
pub use record::{ContentId, ContentRecord, ContentStatus, ContentType, CoverImage};
pub use session::{EditSession, Overlay};
pub use title::{derive_post_title, fallback_title, MAX_TITLE_CHARS};
pub use undo_stack::{EditBatch, UndoStack};
