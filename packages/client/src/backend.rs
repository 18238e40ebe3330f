//! Content backend seam and save payloads.
//!
//! A save goes out as plain JSON unless a cover image or media file is
//! attached, in which case every field travels as a multipart part and the
//! body becomes a JSON string field.

use async_trait::async_trait;
use folio_editor::{upload_field_name, BlockKind, ContentId, ContentRecord};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Content {0} not found")]
    NotFound(ContentId),

    #[error("Invalid response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

/// A file picked by the user, already read into memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FileAttachment {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// Files going out with a save, media keyed by block id
#[derive(Debug, Clone, Default)]
pub struct Attachments {
    pub cover_image: Option<FileAttachment>,
    pub media: BTreeMap<u32, FileAttachment>,
}

impl Attachments {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.cover_image.is_none() && self.media.is_empty()
    }

    pub fn with_cover(mut self, file: FileAttachment) -> Self {
        self.cover_image = Some(file);
        self
    }

    pub fn with_media(mut self, block_id: u32, file: FileAttachment) -> Self {
        self.media.insert(block_id, file);
        self
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttachmentError {
    #[error("No media block media{0} for attached file")]
    MissingMediaBlock(u32),

    #[error("Attached file '{0}' is empty")]
    EmptyFile(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SavePayload {
    Json(Value),
    Multipart {
        fields: BTreeMap<String, String>,
        files: BTreeMap<String, FileAttachment>,
    },
}

impl SavePayload {
    pub fn build(record: &ContentRecord, attachments: &Attachments) -> Result<Self, AttachmentError> {
        for (block_id, file) in &attachments.media {
            if record.body.position_of(BlockKind::Media, *block_id).is_none() {
                return Err(AttachmentError::MissingMediaBlock(*block_id));
            }
            if file.bytes.is_empty() {
                return Err(AttachmentError::EmptyFile(file.file_name.clone()));
            }
        }
        if let Some(cover) = &attachments.cover_image {
            if cover.bytes.is_empty() {
                return Err(AttachmentError::EmptyFile(cover.file_name.clone()));
            }
        }

        if attachments.is_empty() {
            return Ok(SavePayload::Json(json!({
                "title": record.title,
                "status": record.status,
                "content_type": record.content_type,
                "body": record.body,
                "is_featured": record.is_featured,
            })));
        }

        let mut fields = BTreeMap::new();
        fields.insert("title".to_string(), record.title.clone());
        fields.insert("status".to_string(), record.status.as_str().to_string());
        fields.insert(
            "content_type".to_string(),
            record.content_type.as_str().to_string(),
        );
        fields.insert("body".to_string(), folio_editor::to_wire(&record.body).to_string());
        fields.insert("is_featured".to_string(), record.is_featured.to_string());

        let mut files = BTreeMap::new();
        if let Some(cover) = &attachments.cover_image {
            files.insert("cover_image".to_string(), cover.clone());
        }
        for (block_id, file) in &attachments.media {
            files.insert(upload_field_name(*block_id), file.clone());
        }

        Ok(SavePayload::Multipart { fields, files })
    }

    pub fn is_multipart(&self) -> bool {
        matches!(self, SavePayload::Multipart { .. })
    }
}

/// Remote persistence for posts and articles
#[async_trait]
pub trait ContentBackend: Send + Sync {
    async fn create(&self, payload: SavePayload) -> Result<ContentRecord, BackendError>;

    async fn update(&self, id: ContentId, payload: SavePayload) -> Result<ContentRecord, BackendError>;

    async fn fetch(&self, id: ContentId) -> Result<ContentRecord, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_editor::{BlockPayload, ContentType};

    fn record_with_media() -> ContentRecord {
        let mut record = ContentRecord::new(ContentType::Post);
        record.body.append(BlockKind::Text).unwrap();
        record.body.update(0, BlockPayload::text("hi", None)).unwrap();
        record.body.append(BlockKind::Media).unwrap();
        record.title = "hi".to_string();
        record
    }

    fn png() -> FileAttachment {
        FileAttachment::new("a.png", "image/png", vec![1, 2, 3])
    }

    #[test]
    fn test_json_payload_without_files() {
        let payload = SavePayload::build(&record_with_media(), &Attachments::none()).unwrap();
        let SavePayload::Json(value) = payload else {
            panic!("Expected JSON payload");
        };

        assert_eq!(value["title"], "hi");
        assert_eq!(value["content_type"], "post");
        assert_eq!(value["body"][0]["text1"], "hi");
        assert_eq!(value["body"][1]["media1"], "");
    }

    #[test]
    fn test_multipart_payload_with_media() {
        let attachments = Attachments::none().with_media(1, png());
        let payload = SavePayload::build(&record_with_media(), &attachments).unwrap();

        let SavePayload::Multipart { fields, files } = payload else {
            panic!("Expected multipart payload");
        };
        assert!(files.contains_key("media_0"));
        assert_eq!(fields["status"], "draft");

        let body: Value = serde_json::from_str(&fields["body"]).unwrap();
        assert_eq!(body[0]["text1"], "hi");
    }

    #[test]
    fn test_cover_image_forces_multipart() {
        let payload = SavePayload::build(
            &record_with_media(),
            &Attachments::none().with_cover(png()),
        )
        .unwrap();
        assert!(payload.is_multipart());
    }

    #[test]
    fn test_media_file_without_block_is_rejected() {
        let attachments = Attachments::none().with_media(2, png());
        assert_eq!(
            SavePayload::build(&record_with_media(), &attachments),
            Err(AttachmentError::MissingMediaBlock(2))
        );
    }

    #[test]
    fn test_empty_file_is_rejected() {
        let attachments =
            Attachments::none().with_media(1, FileAttachment::new("e.png", "image/png", vec![]));
        assert!(matches!(
            SavePayload::build(&record_with_media(), &attachments),
            Err(AttachmentError::EmptyFile(_))
        ));
    }
}
