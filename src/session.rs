//! Run lifecycle controller
//!
//! Owns one `GameState`, the latest pointer sample and the high score store.
//! The browser shell and the native runner both drive the game through this.

use crate::highscores::HighScore;
use crate::platform::KeyValueStore;
use crate::sim::{GameEvent, GameState, TickInput, tick};
use crate::snapshot::{RenderSink, RenderSnapshot};
use crate::tuning::Tuning;

/// What one frame produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub events: Vec<GameEvent>,
    /// The run ended this frame with a new best score
    pub new_record: bool,
}

impl FrameReport {
    pub fn crashed(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, GameEvent::Crashed { .. }))
    }
}

pub struct Session<S: KeyValueStore> {
    pub state: GameState,
    input: TickInput,
    store: S,
    high: HighScore,
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(seed: u64, store: S) -> Self {
        Self::with_tuning(seed, Tuning::default(), store)
    }

    pub fn with_tuning(seed: u64, tuning: Tuning, store: S) -> Self {
        let high = HighScore::load(&store);
        log::info!("Session seed {}, stored high score {}", seed, high.best);
        Self {
            state: GameState::with_tuning(seed, tuning),
            input: TickInput::default(),
            store,
            high,
        }
    }

    /// Reset trigger: start a fresh run, abandoning any run in progress
    pub fn new_game(&mut self) {
        self.state.new_game();
    }

    /// Latest pointer x; applied at the next frame
    pub fn set_pointer_x(&mut self, x: Option<f32>) {
        self.input.pointer_x = x;
    }

    pub fn pointer_x(&self) -> Option<f32> {
        self.input.pointer_x
    }

    /// Run one animation frame at timestamp `ts` (ms)
    pub fn frame(&mut self, ts: f64) -> FrameReport {
        tick(&mut self.state, &self.input, ts);
        let events = self.state.drain_events();

        let mut new_record = false;
        for event in &events {
            if let GameEvent::Crashed { final_score, .. } = event {
                new_record = self.record(*final_score);
            }
        }

        FrameReport { events, new_record }
    }

    /// End the current run and fold its score into the high score.
    /// Safe to call again once dead: the stored value never goes down.
    pub fn end_game(&mut self) -> HighScore {
        self.state.end_run(None);
        // Crash bookkeeping happens here, not in the next frame
        self.state
            .events
            .retain(|e| !matches!(e, GameEvent::Crashed { .. }));
        self.record(self.state.display_score());
        self.high
    }

    fn record(&mut self, final_score: u64) -> bool {
        let (high, is_record) = HighScore::record(&mut self.store, final_score);
        self.high = high;
        is_record
    }

    pub fn high_score(&self) -> HighScore {
        self.high
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::build(&self.state, self.high)
    }

    /// Hand the settled frame to a rendering sink
    pub fn present<R: RenderSink>(&self, sink: &mut R, time: f64) -> Result<(), R::Error> {
        sink.present(&self.snapshot(), time)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;

    #[test]
    fn test_new_session_reads_store() {
        let mut store = MemoryStore::new();
        store.set(HighScore::STORAGE_KEY, "31");
        let session = Session::new(1, store);
        assert_eq!(session.high_score().best, 31);
        assert_eq!(session.snapshot().high_score, 31);
    }

    #[test]
    fn test_end_game_twice() {
        let mut session = Session::new(1, MemoryStore::new());
        session.frame(0.0);
        session.frame(900.0);
        session.state.score = 5000.0;

        assert_eq!(session.end_game().best, 50);
        assert!(session.state.is_dead());
        assert_eq!(session.end_game().best, 50);
        assert_eq!(
            session.store().get(HighScore::STORAGE_KEY).as_deref(),
            Some("50")
        );
        // No duplicate crash handling on the next frame
        let report = session.frame(916.0);
        assert!(!report.crashed());
    }

    #[test]
    fn test_pointer_sample_persists_between_frames() {
        let mut session = Session::new(2, MemoryStore::new());
        session.set_pointer_x(Some(100.0));
        session.frame(0.0);
        session.frame(16.0);
        assert_eq!(session.state.player().map(|p| p.x), Some(100.0));
        assert_eq!(session.pointer_x(), Some(100.0));
    }
}
