//! Title derivation for posts.
//!
//! Posts have no title field in the editor; one is derived from the first
//! text block on every save.

use crate::block::BlockPayload;
use crate::body::Body;
use rand::Rng;

pub const MAX_TITLE_CHARS: usize = 50;

const FALLBACK_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Title taken from the first text block with visible text
pub fn derive_post_title(body: &Body) -> Option<String> {
    body.iter().find_map(|block| match &block.payload {
        BlockPayload::Text { text, .. } if !text.trim().is_empty() => {
            let truncated: String = text.trim().chars().take(MAX_TITLE_CHARS).collect();
            Some(truncated.trim_end().to_string())
        }
        _ => None,
    })
}

/// `post_<millis>_<9 base36 chars>` for posts without any text
pub fn fallback_title<R: Rng + ?Sized>(now_millis: i64, rng: &mut R) -> String {
    let suffix: String = (0..9)
        .map(|_| FALLBACK_ALPHABET[rng.gen_range(0..FALLBACK_ALPHABET.len())] as char)
        .collect();
    format!("post_{}_{}", now_millis, suffix)
}
