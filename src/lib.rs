//! Hexpop - a hexagonal-grid bubble shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, matching, detachment, physics, effects)
//! - `engine`: Host-facing game engine (frame loop, events, teardown)
//! - `renderer`: Drawing surface abstraction and frame painter
//! - `platform`: Frame scheduling and browser bindings
//! - `tuning`: Data-driven game balance

pub mod engine;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use engine::{Engine, GameListener, ResizeSubscription};
pub use error::EngineError;
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Fixed engine constants that are not part of the tunable balance
pub mod consts {
    /// Largest physics step; longer frames (tab switches, debugger pauses) are clamped
    pub const MAX_PHYSICS_DT: f32 = 0.1;

    /// Projectile substep length as a fraction of the bubble radius
    pub const PROJECTILE_STEP_FRACTION: f32 = 0.5;

    /// Vertical distance between grid rows, in radii
    pub const ROW_SPACING: f32 = 1.8;

    /// Aim guide ray-march step (pixels) and limits
    pub const GUIDE_STEP: f32 = 20.0;
    pub const GUIDE_MAX_STEPS: usize = 1000;
    pub const GUIDE_MAX_BOUNCES: usize = 5;

    /// Shallowest launch elevation (radians above level); aims below it are
    /// raised so every shot climbs toward the ceiling
    pub const MIN_LAUNCH_ANGLE: f32 = 0.15;

    /// Shooter barrel length and preview bubble offset
    pub const BARREL_LENGTH: f32 = 40.0;
    pub const PREVIEW_OFFSET: f32 = 50.0;

    /// Idle bobbing of anchored bubbles
    pub const BOB_AMPLITUDE: f32 = 2.0;
    pub const BOB_SPEED: f32 = 2.0;
    pub const BOB_ROW_PHASE: f32 = 0.5;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: glam::Vec2, b: glam::Vec2) -> f32 {
    (a - b).length()
}
