// Persisted score history and its display order.
use std::cmp::Ordering;

use crate::error::StoreError;
use crate::model::GameOutcome;
use crate::util::{cwarn, describe_js_error, format_time};

/// Minimal string key-value storage, the shape of `window.localStorage`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// `window.localStorage`, if the browser grants access to it.
pub struct BrowserStore {
    storage: Option<web_sys::Storage>,
}

impl BrowserStore {
    pub fn open() -> Self {
        let storage = web_sys::window().and_then(|win| win.local_storage().ok().flatten());
        Self { storage }
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let storage = self.storage.as_ref().ok_or(StoreError::Unavailable)?;
        storage.get_item(key).map_err(|e| StoreError::Read {
            key: key.to_owned(),
            message: describe_js_error(&e),
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let storage = self.storage.as_ref().ok_or(StoreError::Unavailable)?;
        storage.set_item(key, value).map_err(|e| StoreError::Write {
            key: key.to_owned(),
            message: describe_js_error(&e),
        })
    }
}

/// All past outcomes, in the order they were recorded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScoreBook {
    outcomes: Vec<GameOutcome>,
}

impl ScoreBook {
    #[cfg(test)]
    pub fn from_outcomes(outcomes: Vec<GameOutcome>) -> Self {
        Self { outcomes }
    }

    /// Reads the stored list. Missing, unreadable or malformed data yields an empty book.
    pub fn load(store: &impl KeyValueStore, key: &str) -> Self {
        match Self::try_load(store, key) {
            Ok(book) => book,
            Err(e) => {
                cwarn(&format!("ignoring stored scores: {e}"));
                Self::default()
            }
        }
    }

    fn try_load(store: &impl KeyValueStore, key: &str) -> Result<Self, StoreError> {
        let Some(raw) = store.get(key)? else {
            return Ok(Self::default());
        };
        let outcomes = serde_json::from_str(&raw).map_err(StoreError::Decode)?;
        Ok(Self { outcomes })
    }

    /// Adds the outcome in memory, then writes the whole list back. The in-memory
    /// list keeps the outcome even when the write fails.
    pub fn append(
        &mut self,
        outcome: GameOutcome,
        store: &impl KeyValueStore,
        key: &str,
    ) -> Result<(), StoreError> {
        self.outcomes.push(outcome);
        let raw = serde_json::to_string(&self.outcomes).map_err(StoreError::Encode)?;
        store.set(key, &raw)
    }

    pub fn outcomes(&self) -> &[GameOutcome] {
        &self.outcomes
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Display order: wins first (fastest first), then losses (most squares first).
    pub fn ranked(&self) -> Vec<GameOutcome> {
        let mut ranked = self.outcomes.clone();
        ranked.sort_by(rank_outcomes);
        ranked
    }
}

pub fn rank_outcomes(a: &GameOutcome, b: &GameOutcome) -> Ordering {
    match (a.won, b.won) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (true, true) => a.time.cmp(&b.time),
        (false, false) => b.squares_reached.cmp(&a.squares_reached),
    }
}

/// Row text for the score panel: `("Won: ", "Time: 12.3")` or `("Lost: ", "10 Squares")`.
pub fn describe_outcome(outcome: &GameOutcome) -> (&'static str, String) {
    if outcome.won {
        ("Won: ", format!("Time: {}", format_time(outcome.time)))
    } else {
        ("Lost: ", format!("{} Squares", outcome.squares_reached))
    }
}
