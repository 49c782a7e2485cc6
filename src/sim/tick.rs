//! Per-frame simulation tick
//!
//! Advances a session by one animation frame. Time comes in as the raw
//! animation timestamp (ms); the session clock starts at the first one seen,
//! so the first tick always has `dt == 0`.

use super::entity::Impact;
use super::spawner::SpawnKind;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input sampled once per tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest pointer x in canvas coordinates, `None` until the pointer
    /// first moves. Not clamped to the canvas.
    pub pointer_x: Option<f32>,
}

/// Advance the session to animation timestamp `ts`
pub fn tick(state: &mut GameState, input: &TickInput, ts: f64) {
    let origin = *state.clock_origin.get_or_insert(ts);
    let now = ts - origin;
    let dt = (now - state.last_ts).max(0.0);
    state.last_ts = now;

    if state.phase == GamePhase::Playing {
        advance(state, dt, now);
    }

    // Pointer is consumed at exactly one point per tick
    let target_x = input.pointer_x.unwrap_or(WIDTH / 2.0);
    let speed = state.speed;
    if let Some(player) = state.entities.iter_mut().find(|e| e.is_player()) {
        player.x = target_x;
        player.spin(dt as f32, speed, &state.tuning);
    }

    sweep_off_screen(state);
}

/// Speed, depth and score integration, spawning, then collisions
fn advance(state: &mut GameState, dt: f64, now: f64) {
    state.speed = state
        .tuning
        .clamp_speed(state.speed + dt as f32 / state.tuning.speed_ramp);
    state.depth += dt * (state.speed as f64 / 100.0);
    state.score += dt;

    let due: Vec<SpawnKind> = state.spawner.due(now).collect();
    for kind in due {
        state.spawn(kind, now);
    }

    resolve_collisions(state);
}

/// Gather every hit against the player first, then apply them. A rock hit
/// ends the run and makes any clock pickups from the same tick moot.
fn resolve_collisions(state: &mut GameState) {
    let Some(player) = state.player().cloned() else {
        return;
    };
    let depth = state.depth;
    let leniency = state.tuning.rock_leniency;

    let hits: Vec<(u32, Impact)> = state
        .entities
        .iter()
        .filter(|e| !e.is_player())
        .filter(|e| e.is_colliding(&player, depth, leniency))
        .filter_map(|e| e.kind.impact().map(|impact| (e.id, impact)))
        .collect();

    if let Some(&(rock_id, _)) = hits.iter().find(|(_, impact)| *impact == Impact::Fatal) {
        log::debug!("Rock #{} hit the player at depth {}", rock_id, depth);
        state.end_run(Some(rock_id));
        return;
    }

    for (id, _) in hits {
        state.speed = state
            .tuning
            .clamp_speed(state.speed - state.tuning.clock_penalty);
        state.entities.retain(|e| e.id != id);
        state.events.push(GameEvent::ClockCollected {
            id,
            speed: state.speed,
        });
        log::debug!("Clock #{} collected, speed now {}", id, state.speed);
    }
}

/// Drop everything that scrolled fully past the top edge
fn sweep_off_screen(state: &mut GameState) {
    let depth = state.depth;
    state.entities.retain(|e| !e.is_off_screen(depth));
}
