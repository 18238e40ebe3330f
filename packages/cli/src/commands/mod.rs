pub mod init;
pub mod inspect;
pub mod listen;
pub mod sync;
pub mod title;

pub use init::{init, InitArgs};
pub use inspect::{inspect, InspectArgs};
pub use listen::{listen, ListenArgs};
pub use sync::{sync, SyncArgs};
pub use title::{title, TitleArgs};

use anyhow::{Context, Result};
use folio_editor::{from_wire, Body, ContentRecord};
use serde_json::Value;
use std::path::Path;

/// A JSON file holding either a whole record or a bare body array
pub enum Document {
    Record(ContentRecord),
    Body(Body),
}

impl Document {
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let value: Value = serde_json::from_str(&content)
            .with_context(|| format!("{} is not valid JSON", path.display()))?;

        if value.is_array() {
            return Ok(Document::Body(from_wire(&value)));
        }

        let record = serde_json::from_value(value)
            .with_context(|| format!("{} is neither a body array nor a record", path.display()))?;
        Ok(Document::Record(record))
    }

    pub fn body(&self) -> &Body {
        match self {
            Document::Record(record) => &record.body,
            Document::Body(body) => body,
        }
    }
}

pub fn read_record(path: &Path) -> Result<ContentRecord> {
    match Document::read(path)? {
        Document::Record(record) => Ok(record),
        Document::Body(_) => anyhow::bail!(
            "{} holds a bare body array; a content record is required",
            path.display()
        ),
    }
}
