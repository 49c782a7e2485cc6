//! Game state and core simulation types
//!
//! One `GameState` is one play session: the world of the current run plus
//! the session clock and RNG that survive resets.

use rand_pcg::Pcg32;

use super::entity::{Entity, EntityKind};
use super::rng::{rand_range, seeded};
use super::spawner::{SpawnKind, Spawner};
use crate::consts::*;
use crate::display_score;
use crate::tuning::Tuning;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended; frozen until the next `new_game`
    Dead,
}

/// Things that happened during a tick, for sound, logging and the shell
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    RunStarted,
    RockSpawned { id: u32, x: f32, variant: u8 },
    ClockSpawned { id: u32, x: f32 },
    ClockCollected { id: u32, speed: f32 },
    /// Run ended on a rock; `final_score` is the displayed integer score
    Crashed { rock_id: Option<u32>, final_score: u64 },
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the session RNG was created from
    pub seed: u64,
    rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Total scrolled distance of this run
    pub depth: f64,
    /// Milliseconds survived this run
    pub score: f64,
    pub speed: f32,
    pub spawner: Spawner,
    /// Active entities, player included while alive (sorted by id)
    pub entities: Vec<Entity>,
    /// First animation timestamp seen; session time is measured from here
    pub clock_origin: Option<f64>,
    /// Session time of the previous tick (ms)
    pub last_ts: f64,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    /// Runs started in this session
    pub runs: u32,
    next_id: u32,
}

impl GameState {
    /// New session with the default balance, already in a fresh run
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut state = Self {
            seed,
            rng: seeded(seed),
            tuning,
            phase: GamePhase::Playing,
            depth: 0.0,
            score: 0.0,
            speed: 0.0,
            spawner: Spawner {
                next_rock_at: 0.0,
                next_clock_at: 0.0,
            },
            entities: Vec::new(),
            clock_origin: None,
            last_ts: 0.0,
            events: Vec::new(),
            runs: 0,
            next_id: 1,
        };
        state.new_game();
        state
    }

    /// Reset the world for a new run.
    ///
    /// Entities of an abandoned run are discarded. The session clock keeps
    /// running, so deadlines are primed from the last tick time.
    pub fn new_game(&mut self) {
        self.depth = 0.0;
        self.score = 0.0;
        self.speed = 0.0;
        self.phase = GamePhase::Playing;
        self.entities.clear();
        self.next_id = 1;

        let id = self.next_entity_id();
        self.entities.push(Entity::player(id));
        self.spawner = Spawner::primed(self.last_ts, &mut self.rng, &self.tuning);
        self.runs += 1;
        self.events.push(GameEvent::RunStarted);
        log::info!("Run {} started (seed {})", self.runs, self.seed);
    }

    /// Enter `Dead` and drop every entity.
    /// Returns false if the run was already over.
    pub fn end_run(&mut self, rock_id: Option<u32>) -> bool {
        if self.phase == GamePhase::Dead {
            return false;
        }
        self.phase = GamePhase::Dead;
        self.entities.clear();
        let final_score = self.display_score();
        self.events.push(GameEvent::Crashed {
            rock_id,
            final_score,
        });
        log::info!("Run {} over, final score {}", self.runs, final_score);
        true
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.phase == GamePhase::Dead
    }

    pub fn display_score(&self) -> u64 {
        display_score(self.score)
    }

    pub fn player(&self) -> Option<&Entity> {
        self.entities.iter().find(|e| e.is_player())
    }

    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.is_player())
    }

    /// Create one entity of `kind` at the current depth and move its
    /// deadline to `now + interval`
    pub fn spawn(&mut self, kind: SpawnKind, now: f64) -> u32 {
        let id = self.next_entity_id();
        let x = rand_range(&mut self.rng, SPAWN_MARGIN, WIDTH as i32 - SPAWN_MARGIN) as f32;
        let entity = match kind {
            SpawnKind::Rock => {
                let variant = rand_range(&mut self.rng, 1, ROCK_VARIANTS as i32) as u8;
                self.events.push(GameEvent::RockSpawned { id, x, variant });
                Entity::rock(id, x, variant, self.depth)
            }
            SpawnKind::Clock => {
                self.events.push(GameEvent::ClockSpawned { id, x });
                Entity::clock(id, x, self.depth)
            }
        };
        log::debug!("Spawned {:?} #{} at x={} depth={}", kind, id, x, self.depth);
        self.entities.push(entity);
        self.spawner.reschedule(kind, now, &mut self.rng, &self.tuning);
        id
    }

    /// Take the events collected since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of live entities of each kind: (rocks, clocks)
    pub fn obstacle_counts(&self) -> (usize, usize) {
        self.entities.iter().fold((0, 0), |(r, c), e| match e.kind {
            EntityKind::Rock { .. } => (r + 1, c),
            EntityKind::Clock => (r, c + 1),
            EntityKind::Player { .. } => (r, c),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_session() {
        let state = GameState::new(42);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.entities.len(), 1);
        assert!(state.player().is_some());
        assert_eq!(state.depth, 0.0);
        assert_eq!(state.score, 0.0);
        assert_eq!(state.speed, 0.0);
        assert_eq!(state.runs, 1);
        assert_eq!(state.events, vec![GameEvent::RunStarted]);
    }

    #[test]
    fn test_end_run_once() {
        let mut state = GameState::new(42);
        state.score = 4567.0;
        assert!(state.end_run(Some(9)));
        assert!(state.is_dead());
        assert!(state.entities.is_empty());
        assert!(!state.end_run(None));
        let crashes: Vec<_> = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::Crashed { .. }))
            .collect();
        assert_eq!(
            crashes,
            vec![GameEvent::Crashed {
                rock_id: Some(9),
                final_score: 45
            }]
        );
    }

    #[test]
    fn test_new_game_discards_old_run() {
        let mut state = GameState::new(5);
        state.spawn(SpawnKind::Rock, 0.0);
        state.spawn(SpawnKind::Clock, 0.0);
        assert_eq!(state.obstacle_counts(), (1, 1));

        state.last_ts = 8000.0;
        state.new_game();
        assert_eq!(state.entities.len(), 1);
        assert_eq!(state.obstacle_counts(), (0, 0));
        assert!(state.spawner.next_rock_at >= 8300.0);
        assert!(state.spawner.next_clock_at >= 13_000.0);
        assert_eq!(state.runs, 2);
    }

    #[test]
    fn test_spawn_within_margins() {
        let mut state = GameState::new(77);
        for _ in 0..200 {
            state.spawn(SpawnKind::Rock, 0.0);
        }
        for e in state.entities.iter().filter(|e| !e.is_player()) {
            assert!(e.x >= 64.0 && e.x <= WIDTH - 64.0);
            match e.kind {
                EntityKind::Rock { variant } => assert!((1..=3).contains(&variant)),
                _ => panic!("expected only rocks"),
            }
        }
    }
}
