//! Motion integration for the projectile and falling debris

use glam::Vec2;

use super::collision::{ProjectileContact, Wall, projectile_contact, wall_contact};
use super::grid::BubbleGrid;
use super::state::Projectile;
use crate::consts::PROJECTILE_STEP_FRACTION;

/// Outcome of one debris integration step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebrisStep {
    Falling,
    /// Hit a side wall this step and lost some horizontal speed
    Bounced(Wall),
    /// Reached the floor
    Landed,
}

/// Physical constants for debris
#[derive(Debug, Clone, Copy)]
pub struct DebrisParams {
    pub gravity: f32,
    pub drag: f32,
    pub restitution: f32,
    pub width: f32,
    pub height: f32,
}

/// Reflect off a side wall: push back inside and point the horizontal
/// velocity away from the wall
fn bounce(pos: &mut Vec2, vel: &mut Vec2, wall: Wall, radius: f32, width: f32, restitution: f32) {
    match wall {
        Wall::Left => {
            pos.x = radius;
            vel.x = vel.x.abs() * restitution;
        }
        Wall::Right => {
            pos.x = width - radius;
            vel.x = -vel.x.abs() * restitution;
        }
    }
}

/// Move the projectile for `dt` seconds.
///
/// The move is split into substeps no longer than half a radius so a fast shot
/// cannot tunnel through a bubble. Side walls reflect the shot without losing
/// speed. Stops at the first contact and reports it; the projectile is left at
/// the contact position.
pub fn advance_projectile(projectile: &mut Projectile, grid: &BubbleGrid, width: f32, dt: f32) -> Option<ProjectileContact> {
    let travel = projectile.vel.length() * dt;
    let max_step = (projectile.radius * PROJECTILE_STEP_FRACTION).max(f32::EPSILON);
    let steps = (travel / max_step).ceil().max(1.0) as usize;
    let sub_dt = dt / steps as f32;

    for _ in 0..steps {
        projectile.pos += projectile.vel * sub_dt;

        if let Some(wall) = wall_contact(projectile.pos, projectile.radius, width) {
            bounce(&mut projectile.pos, &mut projectile.vel, wall, projectile.radius, width, 1.0);
        }

        if let Some(contact) = projectile_contact(grid, projectile.pos, projectile.radius) {
            return Some(contact);
        }
    }
    None
}

/// Integrate one falling bubble for `dt` seconds.
///
/// Gravity feeds vertical speed first, then position moves, then horizontal
/// drag applies once per step. Landing is checked before walls, so a bubble
/// that lands in a corner lands instead of bouncing.
pub fn integrate_debris(pos: &mut Vec2, vel: &mut Vec2, radius: f32, params: &DebrisParams, dt: f32) -> DebrisStep {
    vel.y += params.gravity * dt;
    pos.y += vel.y * dt;
    pos.x += vel.x * dt;
    vel.x *= params.drag;

    if pos.y > params.height - radius {
        return DebrisStep::Landed;
    }

    match wall_contact(*pos, radius, params.width) {
        Some(wall) => {
            bounce(pos, vel, wall, radius, params.width, params.restitution);
            DebrisStep::Bounced(wall)
        }
        None => DebrisStep::Falling,
    }
}
