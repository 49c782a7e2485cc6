//! End-to-end runs through `Session`, the way the shells drive it

use rockfall::consts::*;
use rockfall::platform::{KeyValueStore, MemoryStore};
use rockfall::sim::{Entity, GameEvent, GamePhase};
use rockfall::snapshot::{RenderSink, RenderSnapshot, SpriteKind};
use rockfall::{HighScore, Session};

/// Sink that keeps every frame it is handed
#[derive(Default)]
struct Recorder {
    frames: Vec<(RenderSnapshot, f64)>,
}

impl RenderSink for Recorder {
    type Error = std::convert::Infallible;

    fn present(&mut self, frame: &RenderSnapshot, time: f64) -> Result<(), Self::Error> {
        self.frames.push((frame.clone(), time));
        Ok(())
    }
}

/// Spawn depth that puts an entity's centre on the player row right now
fn depth_on_player_row(depth: f64, radius: f32) -> f64 {
    depth + (PLAYER_Y - HEIGHT - radius) as f64
}

#[test]
fn fresh_start_before_any_frame() {
    let session = Session::new(7, MemoryStore::new());
    let state = &session.state;

    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.entities.len(), 1);
    assert!(state.player().is_some());
    assert_eq!(state.score, 0.0);
    assert_eq!(state.speed, 0.0);

    let snap = session.snapshot();
    assert_eq!(snap.sprites.len(), 1);
    assert_eq!(snap.sprites[0].kind, SpriteKind::Player);
    assert_eq!(snap.score, 0);
    assert_eq!(snap.high_score, 0);
}

#[test]
fn rock_on_the_player_ends_the_run() {
    let mut store = MemoryStore::new();
    store.set(HighScore::STORAGE_KEY, "3");
    let mut session = Session::new(11, store);

    session.frame(500.0);
    session.frame(1000.0);
    assert!((session.state.score - 500.0).abs() < 1e-3);

    let depth = session.state.depth;
    let id = session.state.next_entity_id();
    session.state.entities.push(Entity::rock(
        id,
        WIDTH / 2.0,
        2,
        depth_on_player_row(depth, ROCK_RADIUS),
    ));

    let report = session.frame(1016.0);
    assert!(report.crashed());
    assert!(report.new_record);
    assert!(report.events.contains(&GameEvent::Crashed {
        rock_id: Some(id),
        final_score: 5,
    }));

    assert!(session.state.is_dead());
    assert!(session.state.entities.is_empty());
    assert_eq!(session.high_score().best, 5);
    assert_eq!(
        session.store().get(HighScore::STORAGE_KEY).as_deref(),
        Some("5")
    );

    // Frozen while dead
    let score = session.state.score;
    let report = session.frame(3000.0);
    assert!(report.events.is_empty());
    assert_eq!(session.state.score, score);
    assert_eq!(session.state.last_ts, 2500.0);
}

#[test]
fn clock_on_the_player_slows_down() {
    let mut session = Session::new(12, MemoryStore::new());
    session.frame(0.0);
    session.state.speed = 100.0;

    let depth = session.state.depth;
    let id = session.state.next_entity_id();
    session.state.entities.push(Entity::clock(
        id,
        WIDTH / 2.0,
        depth_on_player_row(depth, CLOCK_RADIUS),
    ));

    let report = session.frame(16.0);
    assert!(!report.crashed());
    // 100 + 16/250 - 20
    assert!((session.state.speed - 80.064).abs() < 1e-3);
    assert!(session.state.entities.iter().all(|e| e.id != id));
    assert!(matches!(
        report.events.as_slice(),
        [GameEvent::ClockCollected { id: got, .. }] if *got == id
    ));
}

#[test]
fn clock_never_drops_speed_below_the_floor() {
    let mut session = Session::new(13, MemoryStore::new());
    session.frame(0.0);

    let depth = session.state.depth;
    let id = session.state.next_entity_id();
    session.state.entities.push(Entity::clock(
        id,
        WIDTH / 2.0,
        depth_on_player_row(depth, CLOCK_RADIUS),
    ));
    session.frame(16.0);
    assert_eq!(session.state.speed, 30.0);
}

#[test]
fn missed_pointer_keeps_player_centred() {
    let mut session = Session::new(14, MemoryStore::new());
    session.frame(0.0);
    assert_eq!(session.state.player().map(|p| p.x), Some(WIDTH / 2.0));

    session.set_pointer_x(Some(-30.0));
    session.frame(16.0);
    assert_eq!(session.state.player().map(|p| p.x), Some(-30.0));
}

#[test]
fn reset_after_death_starts_a_new_run() {
    let mut session = Session::new(15, MemoryStore::new());
    session.frame(0.0);
    session.frame(2000.0);
    session.end_game();
    assert!(session.state.is_dead());

    session.new_game();
    let report = session.frame(2016.0);
    assert_eq!(report.events.first(), Some(&GameEvent::RunStarted));
    assert!(!session.state.is_dead());
    assert_eq!(session.state.runs, 2);
    // Session clock carried over; the new run only sees 16ms
    assert!((session.state.score - 16.0).abs() < 1e-3);
    assert!(session.state.spawner.next_rock_at >= 2000.0 + 300.0);
}

#[test]
fn spawns_arrive_on_schedule() {
    let mut session = Session::new(16, MemoryStore::new());
    // Keep the player out of the way
    session.set_pointer_x(Some(-500.0));

    let mut rocks = 0;
    let mut clocks = 0;
    let mut ts = 0.0;
    while ts <= 12_000.0 {
        for event in session.frame(ts).events {
            match event {
                GameEvent::RockSpawned { x, variant, .. } => {
                    assert!((64.0..=WIDTH - 64.0).contains(&x));
                    assert!((1..=3).contains(&variant));
                    rocks += 1;
                }
                GameEvent::ClockSpawned { .. } => clocks += 1,
                _ => {}
            }
        }
        ts += 16.0;
    }

    // Rock gaps are 300..=1400ms, clock gaps 5000..=6000ms
    assert!((8..=41).contains(&rocks), "rocks: {}", rocks);
    assert!((1..=2).contains(&clocks), "clocks: {}", clocks);
    assert!(!session.state.is_dead());
}

#[test]
fn sink_sees_settled_frames() {
    let mut session = Session::new(17, MemoryStore::new());
    let mut sink = Recorder::default();

    for ts in [0.0, 16.0, 32.0] {
        session.frame(ts);
        session.present(&mut sink, ts).unwrap();
    }
    session.end_game();
    session.present(&mut sink, 48.0).unwrap();

    assert_eq!(sink.frames.len(), 4);
    let (first, t0) = &sink.frames[0];
    assert_eq!(*t0, 0.0);
    assert_eq!(first.sprites[0].pos.y, PLAYER_Y);
    assert!(!first.dead);

    let (last, _) = &sink.frames[3];
    assert!(last.dead);
    assert!(last.sprites.is_empty());
    assert!((0.0..HEIGHT).contains(&last.wall_offset));
}
