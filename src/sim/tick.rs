//! Per-frame simulation tick
//!
//! One call advances the whole session by `dt` seconds in a fixed order:
//! timer, projectile (collision, snap, match, detachment), debris,
//! explosions, particles, idle animation, win check.

use std::collections::HashSet;

use glam::Vec2;
use rand::Rng;

use super::cluster::{find_detached, find_match};
use super::effects::{advance_explosions, update_particles};
use super::physics::{DebrisParams, DebrisStep, advance_projectile, integrate_debris};
use super::snap::resolve_snap;
use super::state::{BubbleState, GamePhase, GameState, Outcome, Projectile};
use crate::consts::{BOB_AMPLITUDE, BOB_ROW_PHASE, BOB_SPEED, MAX_PHYSICS_DT};

/// Initial horizontal speed range of detached debris (pixels/second)
const DEBRIS_SPREAD_X: f32 = 120.0;
/// Initial downward speed range of detached debris (pixels/second)
const DEBRIS_DROP_Y: (f32, f32) = (60.0, 180.0);

/// Advance the game by `dt` seconds of wall time
pub fn tick(state: &mut GameState, dt: f32) {
    if state.phase != GamePhase::Playing {
        return;
    }

    // The countdown follows real time even across long frames
    state.elapsed += f64::from(dt.max(0.0));
    state.update_timer();
    if state.time_left == 0 {
        state.finish(Outcome::TimeUp);
        return;
    }

    let dt = dt.clamp(0.0, MAX_PHYSICS_DT);
    state.anim_time += dt;

    step_projectile(state, dt);
    step_debris(state, dt);
    advance_explosions(state, dt);
    update_particles(&mut state.particles, dt, state.tuning.particle_gravity);
    if state.bobbing {
        bob_anchored(state);
    }

    if state.grid.is_empty() && state.falling.is_empty() {
        let bonus = state.time_left * state.tuning.win_bonus_per_second;
        log::info!("Board cleared with {}s left, bonus {}", state.time_left, bonus);
        state.add_score(bonus);
        state.finish(Outcome::Cleared);
    }
}

fn step_projectile(state: &mut GameState, dt: f32) {
    let Some(mut projectile) = state.projectile.take() else {
        return;
    };

    match advance_projectile(&mut projectile, &state.grid, state.viewport.width, dt) {
        Some(contact) => {
            log::trace!("Projectile contact {:?} at {}", contact, projectile.pos);
            settle_projectile(state, projectile);
        }
        None => state.projectile = Some(projectile),
    }
}

/// Turn a stopped projectile into an anchored bubble and resolve what it
/// sets off: the match it completes and the debris that match leaves hanging.
pub fn settle_projectile(state: &mut GameState, projectile: Projectile) {
    let radius = state.viewport.radius;

    let Some(coord) = resolve_snap(&state.grid, projectile.pos, radius) else {
        log::warn!("No free cell for projectile at {}, discarding it", projectile.pos);
        state.load_next();
        return;
    };
    if !state.place_bubble(coord, projectile.color) {
        log::warn!("Snap cell {coord} rejected the projectile, discarding it");
        state.load_next();
        return;
    }

    let matched = find_match(&state.grid, coord);
    if !matched.is_empty() {
        let stagger = state.tuning.explosion_stagger;
        for (i, cell) in matched.iter().enumerate() {
            if let Some(bubble) = state.grid.remove(*cell) {
                state.exploding.push(bubble.into_exploding(i as f32 * stagger));
            }
        }
        let points = matched.len() as u32 * state.tuning.points_per_bubble;
        state.add_score(points);
        log::info!(
            "Matched {} {:?} at {}, +{} (score {})",
            matched.len(),
            projectile.color,
            coord,
            points,
            state.score
        );

        detach_unsupported(state);
    }

    state.load_next();
}

/// Drop every anchored bubble that lost its path to the top row
fn detach_unsupported(state: &mut GameState) {
    let detached = find_detached(&state.grid, &HashSet::new());
    if detached.is_empty() {
        return;
    }

    for cell in &detached {
        let Some(bubble) = state.grid.remove(*cell) else {
            continue;
        };
        let rng = state.rng_mut();
        let velocity = Vec2::new(
            rng.random_range(-DEBRIS_SPREAD_X..DEBRIS_SPREAD_X),
            rng.random_range(DEBRIS_DROP_Y.0..DEBRIS_DROP_Y.1),
        );
        state
            .emitter()
            .detach_puff(bubble.pos, bubble.color, bubble.radius);
        state.falling.push(bubble.into_falling(velocity));
    }
    log::info!("{} bubbles detached", detached.len());
}

fn step_debris(state: &mut GameState, dt: f32) {
    if state.falling.is_empty() {
        return;
    }

    let params = DebrisParams {
        gravity: state.tuning.debris_gravity,
        drag: state.tuning.horizontal_drag,
        restitution: state.tuning.restitution,
        width: state.viewport.width,
        height: state.viewport.height,
    };
    let airborne = std::mem::take(&mut state.falling);
    let mut still_falling = Vec::with_capacity(airborne.len());

    for mut bubble in airborne {
        let BubbleState::Falling { velocity } = bubble.state else {
            continue;
        };
        let mut vel = velocity;
        let step = integrate_debris(&mut bubble.pos, &mut vel, bubble.radius, &params, dt);

        match step {
            DebrisStep::Landed => {
                state
                    .emitter()
                    .landing_burst(bubble.pos.x, params.height, bubble.color, bubble.radius);
                log::debug!("Bubble {} landed at x={:.1}", bubble.id, bubble.pos.x);
                // Leaving the falling list here is what makes the bonus one-shot
                state.exploding.push(bubble.into_ignited());
                state.add_score(state.tuning.landing_bonus);
            }
            DebrisStep::Bounced(wall) => {
                state
                    .emitter()
                    .bounce_sparks(bubble.pos, wall, bubble.color, bubble.radius);
                still_falling.push(bubble.into_falling(vel));
            }
            DebrisStep::Falling => {
                state.emitter().trail(bubble.pos, vel, bubble.color, bubble.radius);
                still_falling.push(bubble.into_falling(vel));
            }
        }
    }

    state.falling = still_falling;
}

/// Gentle vertical sway of the anchored board
fn bob_anchored(state: &mut GameState) {
    let t = state.anim_time * BOB_SPEED;
    for bubble in state.grid.iter_mut() {
        let rest = bubble.coord.to_pixel(bubble.radius);
        let offset = (t + bubble.coord.row as f32 * BOB_ROW_PHASE).sin() * BOB_AMPLITUDE;
        bubble.pos = Vec2::new(rest.x, rest.y + offset);
    }
}
