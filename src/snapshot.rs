//! Read-only frame view for the rendering sink
//!
//! Built once per tick after the simulation settles. Renderers never see
//! `GameState` itself.

use glam::Vec2;

use crate::consts::HEIGHT;
use crate::highscores::HighScore;
use crate::sim::{EntityKind, GameState};

/// What to paint for one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    Player,
    /// Rock sprite variant, `1..=3`
    Rock(u8),
    Clock,
}

/// One entity with its draw position resolved
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub id: u32,
    pub kind: SpriteKind,
    /// Centre in canvas coordinates
    pub pos: Vec2,
    pub radius: f32,
    /// Rotation in radians (player only, 0 otherwise)
    pub angle: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderSnapshot {
    pub sprites: Vec<Sprite>,
    /// Displayed score, `floor(score / 100)`
    pub score: u64,
    pub high_score: u64,
    pub dead: bool,
    /// Vertical scroll of the side walls in `[0, HEIGHT)`
    pub wall_offset: f32,
    pub speed: f32,
}

impl RenderSnapshot {
    pub fn build(state: &GameState, high: HighScore) -> Self {
        let depth = state.depth;
        let sprites = state
            .entities
            .iter()
            .map(|e| {
                let (kind, angle) = match e.kind {
                    EntityKind::Player { angle } => (SpriteKind::Player, angle),
                    EntityKind::Rock { variant } => (SpriteKind::Rock(variant), 0.0),
                    EntityKind::Clock => (SpriteKind::Clock, 0.0),
                };
                Sprite {
                    id: e.id,
                    kind,
                    pos: e.pos(depth),
                    radius: e.radius,
                    angle,
                }
            })
            .collect();

        Self {
            sprites,
            score: state.display_score(),
            high_score: high.best,
            dead: state.is_dead(),
            wall_offset: (-depth).rem_euclid(HEIGHT as f64) as f32,
            speed: state.speed,
        }
    }
}

/// Anything that can paint a frame. Results never feed back into the sim.
pub trait RenderSink {
    type Error;

    fn present(&mut self, frame: &RenderSnapshot, time: f64) -> Result<(), Self::Error>;
}
