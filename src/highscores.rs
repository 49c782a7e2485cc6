//! Persisted high score
//!
//! A single integer slot in the key/value store. A missing or unreadable
//! value counts as 0.

use serde::{Deserialize, Serialize};

use crate::platform::KeyValueStore;

/// Best displayed score ever reached on this device
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    /// Store key
    pub const STORAGE_KEY: &'static str = "highscore";

    pub fn new(best: u64) -> Self {
        Self { best }
    }

    /// Read the stored value, tolerating absence and junk
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let Some(raw) = store.get(Self::STORAGE_KEY) else {
            return Self::default();
        };
        if let Ok(score) = serde_json::from_str::<HighScore>(raw.trim()) {
            return score;
        }
        // Older saves may hold a float or a negative value
        match serde_json::from_str::<f64>(raw.trim()) {
            Ok(v) if v.is_finite() && v > 0.0 => Self::new(v.floor() as u64),
            Ok(_) => Self::default(),
            Err(_) => {
                log::warn!("Ignoring unreadable high score {:?}", raw);
                Self::default()
            }
        }
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        match serde_json::to_string(self) {
            Ok(json) => store.set(Self::STORAGE_KEY, &json),
            Err(e) => log::warn!("Failed to encode high score: {}", e),
        }
    }

    /// Fold a finished run in. Returns true on a new record.
    pub fn submit(&mut self, final_score: u64) -> bool {
        if final_score > self.best {
            self.best = final_score;
            true
        } else {
            false
        }
    }

    /// End-of-run bookkeeping: `stored = max(stored, final_score)`.
    /// Always writes back, so a junk slot gets repaired.
    pub fn record<S: KeyValueStore + ?Sized>(store: &mut S, final_score: u64) -> (Self, bool) {
        let mut high = Self::load(store);
        let is_record = high.submit(final_score);
        high.save(store);
        if is_record {
            log::info!("New high score: {}", high.best);
        }
        (high, is_record)
    }
}
