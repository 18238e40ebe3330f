//! # Content Blocks
//!
//! A body is an ordered list of blocks. Each block has a kind, a numeric id
//! that is unique within its kind, and a payload whose shape depends on the
//! kind.
//!
//! ```text
//! Block { id: 3, payload: Text { text: "Hello", color: Some(#112233) } }
//!   key()  → "text3"
//!   wire   → { "text3": "Hello#112233" }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The five block kinds a body can contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Header,
    Text,
    Quote,
    Divider,
    Media,
}

impl BlockKind {
    pub const ALL: [BlockKind; 5] = [
        BlockKind::Header,
        BlockKind::Text,
        BlockKind::Quote,
        BlockKind::Divider,
        BlockKind::Media,
    ];

    /// Key prefix used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Header => "header",
            BlockKind::Text => "text",
            BlockKind::Quote => "quote",
            BlockKind::Divider => "divider",
            BlockKind::Media => "media",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Unknown block kind: {0}")]
pub struct UnknownBlockKind(pub String);

impl FromStr for BlockKind {
    type Err = UnknownBlockKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownBlockKind(s.to_string()))
    }
}

/// A `#RRGGBB` color attached to text blocks
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid hex color: {0:?}")]
pub struct InvalidHexColor(pub String);

impl HexColor {
    pub fn parse(value: &str) -> Result<Self, InvalidHexColor> {
        let digits = value
            .strip_prefix('#')
            .ok_or_else(|| InvalidHexColor(value.to_string()))?;

        if digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(Self(value.to_string()))
        } else {
            Err(InvalidHexColor(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for HexColor {
    type Error = InvalidHexColor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        HexColor::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0
    }
}

/// Uploaded (or pending) media referenced by a media block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaPayload {
    pub url: String,
    pub media_type: String,
    pub public_id: String,
    pub content_type: String,
}

impl MediaPayload {
    pub fn is_empty(&self) -> bool {
        self.url.is_empty()
            && self.media_type.is_empty()
            && self.public_id.is_empty()
            && self.content_type.is_empty()
    }
}

/// Kind-specific block content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockPayload {
    Header { text: String },
    Text { text: String, color: Option<HexColor> },
    Quote { text: String },
    Divider,
    Media(MediaPayload),
}

impl BlockPayload {
    /// Content-less payload for a freshly appended block
    pub fn empty(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Header => BlockPayload::Header { text: String::new() },
            BlockKind::Text => BlockPayload::Text {
                text: String::new(),
                color: None,
            },
            BlockKind::Quote => BlockPayload::Quote { text: String::new() },
            BlockKind::Divider => BlockPayload::Divider,
            BlockKind::Media => BlockPayload::Media(MediaPayload::default()),
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            BlockPayload::Header { .. } => BlockKind::Header,
            BlockPayload::Text { .. } => BlockKind::Text,
            BlockPayload::Quote { .. } => BlockKind::Quote,
            BlockPayload::Divider => BlockKind::Divider,
            BlockPayload::Media(_) => BlockKind::Media,
        }
    }

    /// Convenience constructor for a text payload
    pub fn text(text: impl Into<String>, color: Option<HexColor>) -> Self {
        BlockPayload::Text {
            text: text.into(),
            color,
        }
    }
}

/// One entry of a body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: u32,
    #[serde(flatten)]
    pub payload: BlockPayload,
}

impl Block {
    pub fn new(id: u32, payload: BlockPayload) -> Self {
        Self { id, payload }
    }

    pub fn kind(&self) -> BlockKind {
        self.payload.kind()
    }

    /// Wire key, e.g. `text3`
    pub fn key(&self) -> String {
        format!("{}{}", self.kind(), self.id)
    }

    /// A block the user opened but never filled in.
    ///
    /// Text blocks count as abandoned when only a color was picked.
    pub fn is_abandoned(&self) -> bool {
        match &self.payload {
            BlockPayload::Header { text } | BlockPayload::Quote { text } => text.is_empty(),
            BlockPayload::Text { text, .. } => text.is_empty(),
            BlockPayload::Divider => false,
            BlockPayload::Media(media) => media.is_empty(),
        }
    }
}
