//! Simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Time only arrives through `tick`
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, storage or platform dependencies

pub mod entity;
pub mod rng;
pub mod spawner;
pub mod state;
pub mod tick;

pub use entity::{Entity, EntityKind, Impact};
pub use rng::rand_range;
pub use spawner::{SpawnKind, Spawner};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
