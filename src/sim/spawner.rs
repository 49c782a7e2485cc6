//! Spawn scheduling
//!
//! Two independent absolute deadlines on the session clock (ms). When a
//! deadline passes, one entity of that kind is due and the deadline moves to
//! `now + random interval`.

use rand::Rng;

use super::rng::rand_range;
use crate::tuning::Tuning;

/// Kind of entity the scheduler asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnKind {
    Rock,
    Clock,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spawner {
    pub next_rock_at: f64,
    pub next_clock_at: f64,
}

impl Spawner {
    /// Prime both deadlines from `origin`
    pub fn primed<R: Rng + ?Sized>(origin: f64, rng: &mut R, tuning: &Tuning) -> Self {
        let mut spawner = Self {
            next_rock_at: origin,
            next_clock_at: origin,
        };
        spawner.reschedule(SpawnKind::Rock, origin, rng, tuning);
        spawner.reschedule(SpawnKind::Clock, origin, rng, tuning);
        spawner
    }

    pub fn reschedule<R: Rng + ?Sized>(
        &mut self,
        kind: SpawnKind,
        now: f64,
        rng: &mut R,
        tuning: &Tuning,
    ) {
        match kind {
            SpawnKind::Rock => {
                let (lo, hi) = tuning.rock_interval;
                self.next_rock_at = now + rand_range(rng, lo, hi) as f64;
            }
            SpawnKind::Clock => {
                let (lo, hi) = tuning.clock_interval;
                self.next_clock_at = now + rand_range(rng, lo, hi) as f64;
            }
        }
    }

    /// Kinds whose deadline has been reached at `now` (rock first).
    /// Does not reschedule; the caller does that after building the entity
    /// so the random draws stay in spawn order.
    pub fn due(&self, now: f64) -> impl Iterator<Item = SpawnKind> {
        let rock = (now >= self.next_rock_at).then_some(SpawnKind::Rock);
        let clock = (now >= self.next_clock_at).then_some(SpawnKind::Clock);
        rock.into_iter().chain(clock)
    }
}
