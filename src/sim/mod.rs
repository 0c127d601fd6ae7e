//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and
//! deterministic:
//! - Time enters only through the `dt` handed to `tick`
//! - Seeded RNG only
//! - Stable iteration order (row-major over the grid, insertion order elsewhere)
//! - No rendering or platform dependencies

pub mod cluster;
pub mod collision;
pub mod effects;
pub mod grid;
pub mod hex;
pub mod physics;
pub mod snap;
pub mod state;
pub mod tick;
pub mod viewport;

pub use cluster::{MIN_MATCH, find_detached, find_match};
pub use collision::{ProjectileContact, Wall, trace_aim_guide};
pub use grid::BubbleGrid;
pub use hex::GridCoord;
pub use state::{
    Bubble, BubbleColor, BubbleState, GameEvent, GamePhase, GameState, Outcome, Particle, ParticleTint,
    Projectile,
};
pub use tick::tick;
pub use viewport::{Viewport, apply_resize};
