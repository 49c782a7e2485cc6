//! Movable circular entities and their collision geometry

use glam::Vec2;

use crate::consts::*;
use crate::tuning::Tuning;

/// What an entity is, plus the little per-kind state it carries
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityKind {
    /// The pointer-driven sprite. `angle` is cosmetic spin (radians).
    Player { angle: f32 },
    /// Deadly obstacle, `variant` in `1..=ROCK_VARIANTS` picks the sprite
    Rock { variant: u8 },
    /// Collectible that slows the world down
    Clock,
}

/// Effect of touching the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Impact {
    /// Ends the run
    Fatal,
    /// Speed penalty; the collectible is consumed
    Slowdown,
}

impl EntityKind {
    /// Collide handler, dispatched on the closed set of kinds
    pub fn impact(&self) -> Option<Impact> {
        match self {
            EntityKind::Player { .. } => None,
            EntityKind::Rock { .. } => Some(Impact::Fatal),
            EntityKind::Clock => Some(Impact::Slowdown),
        }
    }
}

/// A circle in world space.
///
/// Non-player entities do not store `y`: it is projected from the world
/// depth they were spawned at, so they drift up the screen as depth grows.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub x: f32,
    pub radius: f32,
    /// World depth at creation
    pub spawn_depth: f64,
}

impl Entity {
    pub fn player(id: u32) -> Self {
        Self {
            id,
            kind: EntityKind::Player { angle: 0.0 },
            x: WIDTH / 2.0,
            radius: PLAYER_RADIUS,
            spawn_depth: 0.0,
        }
    }

    pub fn rock(id: u32, x: f32, variant: u8, depth: f64) -> Self {
        Self {
            id,
            kind: EntityKind::Rock { variant },
            x,
            radius: ROCK_RADIUS,
            spawn_depth: depth,
        }
    }

    pub fn clock(id: u32, x: f32, depth: f64) -> Self {
        Self {
            id,
            kind: EntityKind::Clock,
            x,
            radius: CLOCK_RADIUS,
            spawn_depth: depth,
        }
    }

    #[inline]
    pub fn is_player(&self) -> bool {
        matches!(self.kind, EntityKind::Player { .. })
    }

    /// Screen row of the centre at the given world depth. The scroll
    /// distance is taken in f64 so long runs keep full precision.
    pub fn y(&self, depth: f64) -> f32 {
        if self.is_player() {
            PLAYER_Y
        } else {
            (self.spawn_depth - depth) as f32 + HEIGHT + self.radius
        }
    }

    #[inline]
    pub fn pos(&self, depth: f64) -> Vec2 {
        Vec2::new(self.x, self.y(depth))
    }

    /// Fully scrolled past the top edge. The player never scrolls.
    pub fn is_off_screen(&self, depth: f64) -> bool {
        !self.is_player() && self.y(depth) + self.radius < 0.0
    }

    /// Circle overlap test, directional on purpose: the forgiveness only
    /// applies when `self` is a rock, so callers pass the obstacle first.
    /// Touching exactly at the threshold counts as a hit.
    pub fn is_colliding(&self, target: &Entity, depth: f64, rock_leniency: f32) -> bool {
        let leniency = match self.kind {
            EntityKind::Rock { .. } => rock_leniency,
            _ => 0.0,
        };
        let dist = self.pos(depth).distance(target.pos(depth));
        dist <= self.radius + target.radius - leniency
    }

    /// Advance the player's cosmetic spin. No-op for other kinds.
    ///
    /// Past `spin_base / spin_speed_factor` (175 by default) the period goes
    /// negative and the disc spins backwards; only the exact zero is skipped.
    pub fn spin(&mut self, dt: f32, speed: f32, tuning: &Tuning) {
        if let EntityKind::Player { angle } = &mut self.kind {
            let period = tuning.spin_base - speed * tuning.spin_speed_factor;
            if period != 0.0 {
                *angle = (*angle + dt / period * std::f32::consts::PI) % std::f32::consts::TAU;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LENIENCY: f32 = 7.0;

    #[test]
    fn test_projection_falls_upward_with_depth() {
        let rock = Entity::rock(1, 200.0, 1, 0.0);
        // Spawned just below the bottom edge
        assert_eq!(rock.y(0.0), HEIGHT + ROCK_RADIUS);
        assert_eq!(rock.y(100.0), HEIGHT + ROCK_RADIUS - 100.0);

        let player = Entity::player(0);
        assert_eq!(player.y(0.0), PLAYER_Y);
        assert_eq!(player.y(5000.0), PLAYER_Y);
    }

    #[test]
    fn test_projection_precise_at_large_depth() {
        let depth = 30_000_000.0;
        let rock = Entity::rock(1, 200.0, 1, depth + 0.5);
        assert_eq!(rock.y(depth), HEIGHT + ROCK_RADIUS + 0.5);
        assert_eq!(rock.y(depth + 10.25), HEIGHT + ROCK_RADIUS - 9.75);
    }

    #[test]
    fn test_off_screen() {
        let clock = Entity::clock(2, 100.0, 0.0);
        // y + r < 0  <=>  depth > HEIGHT + 2r
        let edge = (HEIGHT + 2.0 * CLOCK_RADIUS) as f64;
        assert!(!clock.is_off_screen(edge));
        assert!(clock.is_off_screen(edge + 0.5));

        let player = Entity::player(0);
        assert!(!player.is_off_screen(1.0e6));
    }

    #[test]
    fn test_rock_leniency_is_directional() {
        let player = Entity::player(0);
        // Put the rock centre straight below the player, 75 apart:
        // radii sum 80, lenient threshold 73
        let depth = 0.0;
        let mut rock = Entity::rock(1, player.x, 2, 0.0);
        rock.spawn_depth = (PLAYER_Y + 75.0 - HEIGHT - ROCK_RADIUS) as f64;
        assert_eq!(rock.y(depth), PLAYER_Y + 75.0);

        assert!(!rock.is_colliding(&player, depth, LENIENCY));
        assert!(player.is_colliding(&rock, depth, LENIENCY));
    }

    #[test]
    fn test_clock_collision_is_symmetric() {
        let player = Entity::player(0);
        let mut clock = Entity::clock(1, player.x + 30.0, 0.0);
        clock.spawn_depth = (PLAYER_Y + 40.0 - HEIGHT - CLOCK_RADIUS) as f64;
        // distance 50 <= 65
        assert!(clock.is_colliding(&player, 0.0, LENIENCY));
        assert!(player.is_colliding(&clock, 0.0, LENIENCY));
    }

    #[test]
    fn test_touching_counts_as_hit() {
        let a = Entity::player(0);
        let mut b = Entity::player(1);
        b.x = a.x + 80.0;
        assert!(a.is_colliding(&b, 0.0, LENIENCY));
        b.x += 0.01;
        assert!(!a.is_colliding(&b, 0.0, LENIENCY));
    }

    #[test]
    fn test_spin_only_touches_player() {
        let tuning = Tuning::default();
        let mut player = Entity::player(0);
        player.spin(350.0, 0.0, &tuning);
        match player.kind {
            EntityKind::Player { angle } => {
                assert!((angle - std::f32::consts::FRAC_PI_2).abs() < 1e-5)
            }
            _ => unreachable!(),
        }

        let mut rock = Entity::rock(1, 100.0, 3, 0.0);
        rock.spin(350.0, 0.0, &tuning);
        assert_eq!(rock.kind, EntityKind::Rock { variant: 3 });
    }

    fn angle_of(entity: &Entity) -> f32 {
        match entity.kind {
            EntityKind::Player { angle } => angle,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_spin_reverses_near_top_speed() {
        let tuning = Tuning::default();
        let mut player = Entity::player(0);
        // period = 700 - 190 * 4 = -60
        player.spin(100.0, 190.0, &tuning);
        let angle = angle_of(&player);
        assert!(angle < 0.0);
        assert!((angle - (-100.0 / 60.0 * std::f32::consts::PI)).abs() < 1e-4);

        player.spin(16.0, 200.0, &tuning);
        assert!(angle_of(&player) < angle);
    }

    #[test]
    fn test_spin_skips_singular_speed() {
        let tuning = Tuning::default();
        let mut player = Entity::player(0);
        player.spin(16.0, 175.0, &tuning);
        assert_eq!(angle_of(&player), 0.0);
    }

    #[test]
    fn test_impact_dispatch() {
        assert_eq!(EntityKind::Rock { variant: 1 }.impact(), Some(Impact::Fatal));
        assert_eq!(EntityKind::Clock.impact(), Some(Impact::Slowdown));
        assert_eq!(EntityKind::Player { angle: 0.0 }.impact(), None);
    }
}
