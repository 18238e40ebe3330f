//! # Content Record
//!
//! The persisted post or article. A record is created empty by the "new"
//! action, hydrated from backend JSON by the "edit" action, mutated in memory
//! while editing, and pushed back by an explicit save.

use crate::body::Body;
use crate::media_sync::MediaUrl;
use crate::title::{derive_post_title, fallback_title};
use crate::EditorError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(pub u64);

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Post,
    Article,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Post => "post",
            ContentType::Article => "article",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl ContentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::Draft => "draft",
            ContentStatus::Published => "published",
            ContentStatus::Archived => "archived",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverImage {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ContentId>,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub status: ContentStatus,

    pub content_type: ContentType,

    #[serde(default)]
    pub body: Body,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<CoverImage>,

    #[serde(default)]
    pub is_featured: bool,

    /// Uploads confirmed by the backend, merged into `body` by media sync
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media_urls: Vec<MediaUrl>,
}

impl ContentRecord {
    /// Empty draft for the "new" action
    pub fn new(content_type: ContentType) -> Self {
        Self {
            id: None,
            title: String::new(),
            status: ContentStatus::Draft,
            content_type,
            body: Body::new(),
            cover_image: None,
            is_featured: false,
            media_urls: Vec::new(),
        }
    }

    /// Hydrate from backend JSON for the "edit" action
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Prepare the record for a save.
    ///
    /// Posts get their title re-derived from the body every time, replacing
    /// whatever the previous save derived. Articles keep their title.
    pub fn prepare_for_save<R: Rng + ?Sized>(&mut self, now_millis: i64, rng: &mut R) {
        if self.content_type == ContentType::Post {
            self.title = derive_post_title(&self.body)
                .unwrap_or_else(|| fallback_title(now_millis, rng));
        }
    }
}
