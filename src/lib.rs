//! Rockfall - dodge the falling rocks, grab the clocks
//!
//! Core modules:
//! - `sim`: Simulation (entities, spawning, collisions, run state)
//! - `session`: Run lifecycle controller owning one simulation session
//! - `snapshot`: Read-only frame view handed to the rendering sink
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser/native platform abstraction
//! - `tuning`: Data-driven game balance

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod snapshot;
pub mod tuning;

pub use highscores::HighScore;
pub use session::Session;
pub use settings::Settings;
pub use snapshot::RenderSnapshot;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Canvas dimensions (world units == canvas pixels)
    pub const WIDTH: f32 = 480.0;
    pub const HEIGHT: f32 = 640.0;

    /// Sprite footprint shared by the player and rocks (diameter)
    pub const ENTITY_SIZE: f32 = 80.0;

    /// Player sits on a fixed screen row
    pub const PLAYER_Y: f32 = 100.0;
    pub const PLAYER_RADIUS: f32 = ENTITY_SIZE / 2.0;

    pub const ROCK_RADIUS: f32 = ENTITY_SIZE / 2.0;
    pub const CLOCK_RADIUS: f32 = 25.0;

    /// Spawns keep this far from either side wall
    pub const SPAWN_MARGIN: i32 = 64;

    /// Number of rock sprite variants
    pub const ROCK_VARIANTS: u8 = 3;

    /// Displayed score is raw score (ms survived) divided by this
    pub const SCORE_DIVISOR: f64 = 100.0;
}

/// Integer score shown to the player and stored as the high score
#[inline]
pub fn display_score(raw: f64) -> u64 {
    (raw / consts::SCORE_DIVISOR).floor().max(0.0) as u64
}
