//! Named loading flags.
//!
//! Each in-flight call holds a guard under a name such as
//! `updating_content_12`. Several calls may share a name; the flag stays set
//! until the last guard drops. Nothing here prevents overlapping calls.
//!
//! [`LoadingFlags::clear`] starts a new generation. Guards taken before it
//! no longer count toward any flag.

use folio_editor::ContentId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

pub const CREATING_CONTENT: &str = "creating_content";

#[derive(Debug, Default)]
struct FlagState {
    generation: u64,
    counts: HashMap<String, usize>,
}

#[derive(Debug, Clone, Default)]
pub struct LoadingFlags {
    state: Arc<Mutex<FlagState>>,
}

/// Clears its flag when dropped
#[derive(Debug)]
pub struct LoadingGuard {
    name: String,
    generation: u64,
    state: Arc<Mutex<FlagState>>,
}

impl LoadingFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn creating_content() -> String {
        CREATING_CONTENT.to_string()
    }

    pub fn updating_content(id: ContentId) -> String {
        format!("updating_content_{}", id)
    }

    pub fn begin(&self, name: impl Into<String>) -> LoadingGuard {
        let name = name.into();
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        *state.counts.entry(name.clone()).or_insert(0) += 1;

        LoadingGuard {
            name,
            generation: state.generation,
            state: Arc::clone(&self.state),
        }
    }

    pub fn is_loading(&self, name: &str) -> bool {
        self.count(name) > 0
    }

    /// Number of calls currently holding `name`
    pub fn count(&self, name: &str) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .counts
            .get(name)
            .copied()
            .unwrap_or(0)
    }

    pub fn any(&self) -> bool {
        !self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .counts
            .is_empty()
    }

    /// Forget every flag; outstanding guards become no-ops
    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.counts.clear();
        state.generation += 1;
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.generation != self.generation {
            return;
        }
        if let Some(count) = state.counts.get_mut(&self.name) {
            *count -= 1;
            if *count == 0 {
                state.counts.remove(&self.name);
            }
        }
    }
}
