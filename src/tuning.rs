//! Data-driven game balance
//!
//! Every gameplay number lives here so a run can be replayed or rebalanced
//! without touching the simulation. `Tuning::default()` is the shipped game.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a balance file was rejected
#[derive(Debug, Clone, PartialEq)]
pub enum TuningError {
    /// Not valid JSON for `Tuning`
    Parse(String),
    /// A `(min, max)` delay range with `min > max`
    InvertedInterval {
        field: &'static str,
        lo: i32,
        hi: i32,
    },
    InvertedSpeedBand { min: f32, max: f32 },
    NonPositiveRamp(f32),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(e) => write!(f, "unreadable tuning: {e}"),
            TuningError::InvertedInterval { field, lo, hi } => {
                write!(f, "{field} is inverted: {lo} > {hi}")
            }
            TuningError::InvertedSpeedBand { min, max } => {
                write!(f, "speed band is inverted: {min} > {max}")
            }
            TuningError::NonPositiveRamp(ramp) => {
                write!(f, "speed_ramp must be positive, got {ramp}")
            }
        }
    }
}

impl std::error::Error for TuningError {}

/// Gameplay balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Delay range (ms, inclusive) between rock spawns
    pub rock_interval: (i32, i32),
    /// Delay range (ms, inclusive) between clock spawns
    pub clock_interval: (i32, i32),
    /// Forgiveness subtracted from the hit distance when a rock is tested
    pub rock_leniency: f32,
    /// Speed band, both ends inclusive
    pub min_speed: f32,
    pub max_speed: f32,
    /// Speed gained per tick is `dt / speed_ramp`
    pub speed_ramp: f32,
    /// Speed lost when a clock is collected
    pub clock_penalty: f32,
    /// Player spin period base: `angle += dt / (spin_base - speed * spin_speed_factor) * PI`
    pub spin_base: f32,
    pub spin_speed_factor: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            rock_interval: (300, 1400),
            clock_interval: (5000, 6000),
            rock_leniency: 7.0,
            min_speed: 30.0,
            max_speed: 200.0,
            speed_ramp: 250.0,
            clock_penalty: 20.0,
            spin_base: 700.0,
            spin_speed_factor: 4.0,
        }
    }
}

impl Tuning {
    /// Reject balance files that would break the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        for (field, (lo, hi)) in [
            ("rock_interval", self.rock_interval),
            ("clock_interval", self.clock_interval),
        ] {
            if lo > hi {
                return Err(TuningError::InvertedInterval { field, lo, hi });
            }
        }
        if self.min_speed > self.max_speed {
            return Err(TuningError::InvertedSpeedBand {
                min: self.min_speed,
                max: self.max_speed,
            });
        }
        if self.speed_ramp <= 0.0 {
            return Err(TuningError::NonPositiveRamp(self.speed_ramp));
        }
        Ok(())
    }

    /// Parse a JSON balance file; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|e| TuningError::Parse(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    #[inline]
    pub fn clamp_speed(&self, speed: f32) -> f32 {
        speed.clamp(self.min_speed, self.max_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "clock_penalty": 35.0 }"#).unwrap();
        assert_eq!(tuning.clock_penalty, 35.0);
        assert_eq!(tuning.rock_interval, (300, 1400));
        assert_eq!(tuning.max_speed, 200.0);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = Tuning::from_json(r#"{ "rock_interval": [900, 100] }"#).unwrap_err();
        assert_eq!(
            err,
            TuningError::InvertedInterval {
                field: "rock_interval",
                lo: 900,
                hi: 100
            }
        );
        assert_eq!(err.to_string(), "rock_interval is inverted: 900 > 100");

        let tuning = Tuning {
            min_speed: 300.0,
            ..Default::default()
        };
        assert_eq!(
            tuning.validate(),
            Err(TuningError::InvertedSpeedBand {
                min: 300.0,
                max: 200.0
            })
        );
    }

    #[test]
    fn test_error_kinds() {
        assert!(matches!(
            Tuning::from_json("{ nope"),
            Err(TuningError::Parse(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "clock_interval": [7000, 6000] }"#),
            Err(TuningError::InvertedInterval {
                field: "clock_interval",
                ..
            })
        ));
        let tuning = Tuning {
            speed_ramp: 0.0,
            ..Default::default()
        };
        let err: Box<dyn std::error::Error> = Box::new(tuning.validate().unwrap_err());
        assert!(err.to_string().contains("speed_ramp"));
    }

    #[test]
    fn test_clamp_speed() {
        let tuning = Tuning::default();
        assert_eq!(tuning.clamp_speed(0.0), 30.0);
        assert_eq!(tuning.clamp_speed(250.0), 200.0);
        assert_eq!(tuning.clamp_speed(120.5), 120.5);
    }
}
