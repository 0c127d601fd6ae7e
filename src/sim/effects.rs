//! Explosions and particles
//!
//! Particles never feed back into gameplay. Explosions do: a popping bubble
//! stays in `GameState::exploding` until its progress reaches 1, and the
//! staggered start of each pop is a per-bubble countdown advanced here rather
//! than a timer callback.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::Wall;
use super::state::{BubbleColor, BubbleState, GameState, Particle, ParticleTint};

/// Reference particle lifetime (seconds); fades are computed against it
pub const PARTICLE_LIFE: f32 = 0.6;
/// Reference particle speed (pixels/second)
pub const PARTICLE_SPEED: f32 = 400.0;

const MATCH_SPARKS: usize = 40;
const MATCH_BEAMS: usize = 12;
const PUFF_SPARKS: usize = 15;
const SPLASH_COUNT: usize = 30;
const LANDING_BEAMS: usize = 15;
const DUST_COUNT: usize = 20;
const BOUNCE_SPARKS: usize = 10;
const TRAIL_CHANCE: f64 = 0.6;

/// Spawns particles into a capped list.
///
/// Spawns past the cap are dropped silently, but every spawn still draws from
/// the RNG so the gameplay random stream does not depend on visual settings.
pub struct Emitter<'a> {
    particles: &'a mut Vec<Particle>,
    cap: usize,
    rng: &'a mut Pcg32,
}

impl<'a> Emitter<'a> {
    pub fn new(particles: &'a mut Vec<Particle>, cap: usize, rng: &'a mut Pcg32) -> Self {
        Self { particles, cap, rng }
    }

    fn push(&mut self, particle: Particle) {
        if self.particles.len() < self.cap {
            self.particles.push(particle);
        }
    }

    fn jitter(&mut self, lo: f32, hi: f32) -> f32 {
        self.rng.random_range(lo..hi)
    }

    /// Burst for a bubble popped by a match: colored sparks, white beams and
    /// one large flash ring
    pub fn match_burst(&mut self, pos: Vec2, color: BubbleColor, radius: f32) {
        for i in 0..MATCH_SPARKS {
            let angle = TAU * i as f32 / MATCH_SPARKS as f32 + self.jitter(-0.4, 0.4);
            let speed = PARTICLE_SPEED * self.jitter(0.8, 1.2);
            let vel = Vec2::new(angle.cos() * speed, angle.sin() * speed - 400.0);
            let size = radius * self.jitter(0.5, 0.8);
            let life = PARTICLE_LIFE * self.jitter(0.6, 1.0);
            self.push(Particle::new(pos, vel, size, ParticleTint::Bubble(color), 1.0, life, 3.0));
        }

        for i in 0..MATCH_BEAMS {
            let angle = TAU * i as f32 / MATCH_BEAMS as f32 + self.jitter(-0.1, 0.1);
            let speed = PARTICLE_SPEED * 1.8;
            let vel = Vec2::new(angle.cos() * speed, angle.sin() * speed - 250.0);
            self.push(Particle::new(
                pos,
                vel,
                radius * 1.5,
                ParticleTint::Flash,
                1.0,
                PARTICLE_LIFE * 0.4,
                3.5,
            ));
        }

        self.push(Particle::new(
            pos,
            Vec2::ZERO,
            radius * 4.0,
            ParticleTint::Flash,
            1.0,
            PARTICLE_LIFE * 0.25,
            5.0,
        ));
    }

    /// Small puff where a detached bubble breaks loose
    pub fn detach_puff(&mut self, pos: Vec2, color: BubbleColor, radius: f32) {
        for _ in 0..PUFF_SPARKS {
            let angle = self.jitter(0.0, TAU);
            let speed = PARTICLE_SPEED * 0.5 * self.jitter(0.5, 1.0);
            let lift = self.jitter(0.0, 200.0);
            let vel = Vec2::new(angle.cos() * speed, angle.sin() * speed - lift);
            let size = radius * self.jitter(0.2, 0.4);
            self.push(Particle::new(
                pos,
                vel,
                size,
                ParticleTint::Bubble(color),
                0.8,
                PARTICLE_LIFE * 0.4,
                1.5,
            ));
        }

        self.push(Particle::new(
            pos,
            Vec2::ZERO,
            radius * 2.0,
            ParticleTint::Flash,
            0.7,
            PARTICLE_LIFE * 0.2,
            2.0,
        ));
    }

    /// Burst where debris hits the floor at `floor_y`: a shockwave, an upward
    /// splash, rising beams and low dust
    pub fn landing_burst(&mut self, x: f32, floor_y: f32, color: BubbleColor, radius: f32) {
        let ground = Vec2::new(x, floor_y - 5.0);

        self.push(Particle::new(
            ground,
            Vec2::ZERO,
            radius * 7.0,
            ParticleTint::Flash,
            0.9,
            PARTICLE_LIFE * 0.6,
            4.0,
        ));

        for _ in 0..SPLASH_COUNT {
            let angle = self.jitter(-0.5, 0.5) * PI - PI / 2.0;
            let speed = PARTICLE_SPEED * self.jitter(0.6, 1.4);
            let vel = Vec2::new(angle.cos() * speed, angle.sin() * speed * 1.2);
            let size = radius * self.jitter(0.3, 0.7);
            let alpha = self.jitter(0.9, 1.0);
            let life = PARTICLE_LIFE * self.jitter(0.4, 0.9);
            let scale = self.jitter(2.0, 3.5);
            self.push(Particle::new(ground, vel, size, ParticleTint::Bubble(color), alpha, life, scale));
        }

        for _ in 0..LANDING_BEAMS {
            let angle = -self.jitter(0.85, 1.15) * PI;
            let speed = PARTICLE_SPEED * 2.0;
            let vel = Vec2::new(
                angle.cos() * speed * self.jitter(0.7, 1.3),
                angle.sin() * speed * self.jitter(0.7, 1.3),
            );
            let origin = ground + Vec2::new(self.jitter(-10.0, 10.0), 0.0);
            let size = radius * self.jitter(0.3, 0.7);
            let tint = if self.rng.random_bool(0.5) {
                ParticleTint::Flash
            } else {
                ParticleTint::Bubble(color)
            };
            let alpha = self.jitter(0.8, 1.0);
            let life = PARTICLE_LIFE * self.jitter(0.3, 0.6);
            self.push(Particle::new(origin, vel, size, tint, alpha, life, 2.5));
        }

        for _ in 0..DUST_COUNT {
            let angle = self.jitter(-0.5, 0.5) * PI - PI / 2.0;
            let speed = self.jitter(50.0, 200.0);
            let vel = Vec2::new(angle.cos() * speed, angle.sin() * speed);
            let origin = Vec2::new(x + self.jitter(-15.0, 15.0), floor_y - self.jitter(0.0, 10.0));
            let alpha = self.jitter(0.6, 1.0);
            let life = PARTICLE_LIFE * self.jitter(0.5, 1.0);
            let scale = self.jitter(0.8, 1.3);
            self.push(Particle::new(origin, vel, radius * 0.15, ParticleTint::Dust, alpha, life, scale));
        }
    }

    /// Maybe drop a trail particle behind a falling bubble
    pub fn trail(&mut self, pos: Vec2, vel: Vec2, color: BubbleColor, radius: f32) {
        if !self.rng.random_bool(TRAIL_CHANCE) {
            return;
        }
        let behind = vel.y.atan2(vel.x) - PI;
        let dist = self.jitter(0.0, radius * 0.8 + f32::EPSILON);
        let origin = pos + Vec2::new(behind.cos(), behind.sin()) * dist;
        let drift = Vec2::new(self.jitter(-25.0, 25.0), -self.jitter(40.0, 100.0));
        let alpha = self.jitter(0.7, 1.0);
        let life = self.jitter(0.3, 0.5);
        let scale = self.jitter(0.8, 1.2);
        self.push(Particle::new(origin, drift, radius * 0.25, ParticleTint::Bubble(color), alpha, life, scale));
    }

    /// Sparks thrown back into the board from a wall hit
    pub fn bounce_sparks(&mut self, pos: Vec2, wall: Wall, color: BubbleColor, radius: f32) {
        let base = match wall {
            Wall::Left => -PI / 2.0,
            Wall::Right => PI / 2.0,
        };
        for _ in 0..BOUNCE_SPARKS {
            let angle = base + self.jitter(0.0, PI);
            let speed = PARTICLE_SPEED * 0.3 * self.jitter(0.5, 1.0);
            let vel = Vec2::new(angle.cos() * speed, angle.sin() * speed);
            self.push(Particle::new(
                pos,
                vel,
                radius * 0.15,
                ParticleTint::Bubble(color),
                0.6,
                PARTICLE_LIFE * 0.2,
                1.0,
            ));
        }
    }
}

/// Move, fade and expire particles
pub fn update_particles(particles: &mut Vec<Particle>, dt: f32, gravity: f32) {
    particles.retain_mut(|p| {
        p.pos += p.vel * dt;
        if p.tint.feels_gravity() {
            p.vel.y += gravity * dt;
        }
        p.life -= dt;

        let ratio = (p.life / p.max_life).clamp(0.0, 1.0);
        p.scale = p.base_scale * (0.3 + 0.7 * ratio);
        p.alpha = (ratio.powf(1.5) * 2.0).min(1.0) * p.base_alpha;

        p.life > 0.0
    });
}

/// Advance every popping bubble and delete the finished ones.
///
/// A bubble whose fuse is still burning only counts down; the tick its fuse
/// runs out it spawns its burst and starts gaining progress. Bubbles reaching
/// progress 1 are removed for good.
pub fn advance_explosions(state: &mut GameState, dt: f32) {
    let rate = state.tuning.explosion_rate;
    let mut popping = std::mem::take(&mut state.exploding);

    for bubble in &mut popping {
        let BubbleState::Exploding {
            fuse,
            ignited,
            progress,
        } = &mut bubble.state
        else {
            continue;
        };

        if !*ignited {
            *fuse -= dt;
            if *fuse > 0.0 {
                continue;
            }
            *ignited = true;
            state.emitter().match_burst(bubble.pos, bubble.color, bubble.radius);
        }
        *progress = (*progress + dt * rate).min(1.0);
    }

    popping.retain(|b| !matches!(b.state, BubbleState::Exploding { progress, .. } if progress >= 1.0));
    popping.append(&mut state.exploding);
    state.exploding = popping;
}

/// Drop every popping bubble, including ones whose fuse has not run out
pub fn cancel_explosions(state: &mut GameState) -> usize {
    let pending = state.exploding.len();
    state.exploding.clear();
    pending
}
