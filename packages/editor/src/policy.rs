use crate::block::BlockKind;
use crate::record::ContentType;
use std::collections::BTreeMap;

/// Which blocks a content type offers and what the empty editor says
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyPolicy {
    pub name: &'static str,
    placeholders: BTreeMap<BlockKind, &'static str>,
}

impl BodyPolicy {
    /// Short social posts: text, media and dividers
    pub fn post() -> Self {
        Self {
            name: "post",
            placeholders: BTreeMap::from([
                (BlockKind::Text, "What's on your mind?"),
                (BlockKind::Media, "Add a photo or video"),
                (BlockKind::Divider, ""),
            ]),
        }
    }

    /// Long-form articles: every block kind
    pub fn article() -> Self {
        Self {
            name: "article",
            placeholders: BTreeMap::from([
                (BlockKind::Header, "Section heading"),
                (BlockKind::Text, "Start writing..."),
                (BlockKind::Quote, "Add a quote"),
                (BlockKind::Divider, ""),
                (BlockKind::Media, "Add an image or video"),
            ]),
        }
    }

    pub fn for_content_type(content_type: ContentType) -> Self {
        match content_type {
            ContentType::Post => Self::post(),
            ContentType::Article => Self::article(),
        }
    }

    pub fn allows(&self, kind: BlockKind) -> bool {
        self.placeholders.contains_key(&kind)
    }

    pub fn enabled_kinds(&self) -> impl Iterator<Item = BlockKind> + '_ {
        self.placeholders.keys().copied()
    }

    pub fn placeholder(&self, kind: BlockKind) -> Option<&'static str> {
        self.placeholders
            .get(&kind)
            .copied()
            .filter(|text| !text.is_empty())
    }
}
