//! Data-driven game balance
//!
//! Every gameplay number the simulation reads lives here so a session can be
//! rebalanced from JSON without touching code.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Board ===
    /// Grid rows
    pub rows: usize,
    /// Rows filled with bubbles at game start
    pub initial_rows: usize,
    /// Number of bubble colors in play (1..=6)
    pub color_count: usize,

    // === Viewport fitting ===
    pub min_radius: f32,
    pub max_radius: f32,
    pub min_cols: usize,
    pub max_cols: usize,
    /// Fraction of the surface width the grid may occupy
    pub width_fill: f32,
    /// Shooter distance above the bottom edge (pixels)
    pub shooter_offset: f32,

    // === Timer ===
    pub time_limit_secs: u32,

    // === Physics ===
    /// Projectile speed (pixels/second)
    pub launch_speed: f32,
    /// Debris gravity (pixels/second²)
    pub debris_gravity: f32,
    /// Gravity applied to colored particles (pixels/second²)
    pub particle_gravity: f32,
    /// Horizontal velocity multiplier applied to debris every tick
    pub horizontal_drag: f32,
    /// Fraction of horizontal speed kept after a debris wall bounce
    pub restitution: f32,

    // === Effects ===
    /// Explosion progress gained per second (progress runs 0 → 1)
    pub explosion_rate: f32,
    /// Delay between consecutive pops of one match (seconds)
    pub explosion_stagger: f32,

    // === Scoring ===
    pub points_per_bubble: u32,
    pub landing_bonus: u32,
    pub win_bonus_per_second: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            rows: 12,
            initial_rows: 5,
            color_count: 6,

            min_radius: 15.0,
            max_radius: 25.0,
            min_cols: 8,
            max_cols: 16,
            width_fill: 0.95,
            shooter_offset: 40.0,

            time_limit_secs: 180,

            launch_speed: 900.0,
            debris_gravity: 2400.0,
            particle_gravity: 1500.0,
            horizontal_drag: 0.98,
            restitution: 0.8,

            explosion_rate: 3.0,
            explosion_stagger: 0.03,

            points_per_bubble: 10,
            landing_bonus: 5,
            win_bonus_per_second: 10,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), EngineError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> EngineError {
            EngineError::InvalidTuning {
                field,
                reason: reason.into(),
            }
        }

        if self.rows == 0 {
            return Err(invalid("rows", "must be at least 1"));
        }
        if self.initial_rows > self.rows {
            return Err(invalid("initial_rows", format!("exceeds rows ({})", self.rows)));
        }
        if !(1..=6).contains(&self.color_count) {
            return Err(invalid("color_count", "must be between 1 and 6"));
        }
        if self.min_radius <= 0.0 || self.min_radius > self.max_radius {
            return Err(invalid(
                "min_radius",
                format!("must be positive and <= max_radius ({})", self.max_radius),
            ));
        }
        if self.min_cols == 0 || self.min_cols > self.max_cols {
            return Err(invalid(
                "min_cols",
                format!("must be positive and <= max_cols ({})", self.max_cols),
            ));
        }
        if !(0.0..=1.0).contains(&self.width_fill) || self.width_fill == 0.0 {
            return Err(invalid("width_fill", "must be in (0, 1]"));
        }
        if self.time_limit_secs == 0 {
            return Err(invalid("time_limit_secs", "must be at least 1"));
        }
        if self.launch_speed <= 0.0 {
            return Err(invalid("launch_speed", "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(invalid("restitution", "must be in [0, 1]"));
        }
        if self.explosion_rate <= 0.0 {
            return Err(invalid("explosion_rate", "must be positive"));
        }
        Ok(())
    }
}
