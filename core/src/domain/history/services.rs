use std::collections::VecDeque;

use tracing::{error, warn};

use crate::domain::{
    food_analysis::entities::FoodAnalysisResult,
    storage::{KeyValueStore, StorageKey},
};

/// Number of analyses kept in the local history.
pub const HISTORY_CAPACITY: usize = 5;

/// Bounded, most-recent-first cache of completed analyses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryRingBuffer {
    items: VecDeque<FoodAnalysisResult>,
}

impl HistoryRingBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the stored history. Missing, unparsable or non-array records yield an empty
    /// history, and corrupt records are removed so they are not re-read next time.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let key = StorageKey::History.as_str();

        let raw = match store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::new(),
            Err(e) => {
                warn!(error = %e, "failed to read history, starting empty");
                return Self::new();
            }
        };

        match serde_json::from_str::<Vec<FoodAnalysisResult>>(&raw) {
            Ok(items) => Self {
                items: items.into_iter().take(HISTORY_CAPACITY).collect(),
            },
            Err(e) => {
                warn!(error = %e, "history is corrupt, resetting");
                if let Err(e) = store.remove(key) {
                    warn!(error = %e, "failed to remove corrupt history");
                }
                Self::new()
            }
        }
    }

    pub fn push(&mut self, result: FoodAnalysisResult) {
        self.items.push_front(result);
        self.items.truncate(HISTORY_CAPACITY);
    }

    /// Writes the history, narrowing to the newest entry when the full list is rejected.
    pub fn persist<S: KeyValueStore + ?Sized>(&self, store: &S) {
        let key = StorageKey::History.as_str();

        let full = match serde_json::to_string(&self.items) {
            Ok(full) => full,
            Err(e) => {
                error!(error = %e, "failed to serialize history");
                return;
            }
        };

        let Err(e) = store.set(key, &full) else {
            return;
        };
        warn!(error = %e, "could not store full history, keeping only the latest item");

        let Some(newest) = self.items.front() else {
            return;
        };
        let narrowed = match serde_json::to_string(&[newest]) {
            Ok(narrowed) => narrowed,
            Err(e) => {
                error!(error = %e, "failed to serialize latest history item");
                return;
            }
        };

        if let Err(e) = store.set(key, &narrowed) {
            error!(error = %e, "could not save history");
        }
    }

    pub fn get(&self, index: usize) -> Option<&FoodAnalysisResult> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FoodAnalysisResult> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn to_vec(&self) -> Vec<FoodAnalysisResult> {
        self.items.iter().cloned().collect()
    }
}
