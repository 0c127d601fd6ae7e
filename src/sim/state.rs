//! Game state and core simulation types

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::Emitter;
use super::grid::BubbleGrid;
use super::hex::GridCoord;
use super::viewport::Viewport;
use crate::consts::MIN_LAUNCH_ANGLE;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Constructed, waiting for the first start
    Ready,
    /// Timer running
    Playing,
    /// Run ended
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Grid and falling list both emptied before the timer ran out
    Cleared,
    /// Countdown reached zero
    TimeUp,
}

/// Events observed by the host, queued during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    ScoreChanged(u32),
    TimeChanged(u32),
    GameOver,
}

/// Bubble colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BubbleColor {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
}

impl BubbleColor {
    pub const ALL: [BubbleColor; 6] = [
        BubbleColor::Red,
        BubbleColor::Blue,
        BubbleColor::Green,
        BubbleColor::Yellow,
        BubbleColor::Purple,
        BubbleColor::Orange,
    ];

    /// Pick one of the first `count` colors
    pub fn random(rng: &mut impl Rng, count: usize) -> Self {
        let count = count.clamp(1, Self::ALL.len());
        Self::ALL[rng.random_range(0..count)]
    }

    pub fn rgba(self) -> [f32; 4] {
        match self {
            BubbleColor::Red => [1.0, 0.333, 0.333, 1.0],
            BubbleColor::Blue => [0.333, 0.333, 1.0, 1.0],
            BubbleColor::Green => [0.333, 0.667, 0.333, 1.0],
            BubbleColor::Yellow => [1.0, 1.0, 0.333, 1.0],
            BubbleColor::Purple => [0.667, 0.333, 0.667, 1.0],
            BubbleColor::Orange => [1.0, 0.647, 0.0, 1.0],
        }
    }
}

/// Lifecycle state of a bubble.
///
/// The state matches the collection that owns the bubble: the grid only
/// holds `Anchored`, `GameState::falling` only `Falling`, and
/// `GameState::exploding` only `Exploding`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BubbleState {
    Anchored,
    /// Popping. `fuse` counts down to the moment the pop becomes visible
    /// (staggered across one match); `progress` then runs 0 → 1.
    Exploding {
        fuse: f32,
        ignited: bool,
        progress: f32,
    },
    Falling {
        velocity: Vec2,
    },
}

/// A bubble on the board, in free fall, or popping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bubble {
    pub id: u32,
    pub color: BubbleColor,
    /// Last grid cell (the current one while anchored)
    pub coord: GridCoord,
    /// Render-space center
    pub pos: Vec2,
    pub radius: f32,
    pub state: BubbleState,
}

impl Bubble {
    /// A bubble sitting at the canonical center of `coord`
    pub fn anchored(id: u32, color: BubbleColor, coord: GridCoord, radius: f32) -> Self {
        Self {
            id,
            color,
            coord,
            pos: coord.to_pixel(radius),
            radius,
            state: BubbleState::Anchored,
        }
    }

    /// Start popping after `fuse` seconds
    pub fn into_exploding(mut self, fuse: f32) -> Self {
        self.state = BubbleState::Exploding {
            fuse,
            ignited: false,
            progress: 0.0,
        };
        self
    }

    /// Start popping right away, with the ignition effects already spawned
    pub fn into_ignited(mut self) -> Self {
        self.state = BubbleState::Exploding {
            fuse: 0.0,
            ignited: true,
            progress: 0.0,
        };
        self
    }

    pub fn into_falling(mut self, velocity: Vec2) -> Self {
        self.state = BubbleState::Falling { velocity };
        self
    }

    pub fn is_anchored(&self) -> bool {
        matches!(self.state, BubbleState::Anchored)
    }

    /// Explosion progress, once the pop is visible
    pub fn explosion_progress(&self) -> Option<f32> {
        match self.state {
            BubbleState::Exploding {
                ignited: true,
                progress,
                ..
            } => Some(progress),
            _ => None,
        }
    }
}

/// The shot bubble while in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub color: BubbleColor,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

/// Particle tint
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParticleTint {
    Bubble(BubbleColor),
    /// White flashes, beams and halos
    Flash,
    /// Grey landing dust
    Dust,
}

impl ParticleTint {
    /// White light floats; everything else falls
    pub fn feels_gravity(self) -> bool {
        !matches!(self, ParticleTint::Flash)
    }

    pub fn rgba(self) -> [f32; 4] {
        match self {
            ParticleTint::Bubble(color) => color.rgba(),
            ParticleTint::Flash => [1.0, 1.0, 1.0, 1.0],
            ParticleTint::Dust => [0.8, 0.8, 0.8, 1.0],
        }
    }
}

/// A particle for visual effects (never touches gameplay)
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub tint: ParticleTint,
    /// Current alpha / scale, recomputed from remaining life each tick
    pub alpha: f32,
    pub scale: f32,
    pub base_alpha: f32,
    pub base_scale: f32,
    /// Seconds left
    pub life: f32,
    pub max_life: f32,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32, tint: ParticleTint, alpha: f32, life: f32, scale: f32) -> Self {
        Self {
            pos,
            vel,
            radius,
            tint,
            alpha,
            scale,
            base_alpha: alpha,
            base_scale: scale,
            life,
            max_life: life,
        }
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub viewport: Viewport,
    /// Anchored bubbles
    pub grid: BubbleGrid,
    /// Bubble waiting in the shooter
    pub loaded: Option<BubbleColor>,
    /// Preview of the bubble after `loaded`
    pub next: Option<BubbleColor>,
    pub projectile: Option<Projectile>,
    /// Detached debris in free fall
    pub falling: Vec<Bubble>,
    /// Popping bubbles (matched, or debris that hit the floor)
    pub exploding: Vec<Bubble>,
    pub particles: Vec<Particle>,
    pub max_particles: usize,
    pub bobbing: bool,
    /// Launch angle in [0, π], measured from the +x axis with y pointing up
    pub aim_angle: f32,
    pub score: u32,
    /// Seconds played since start
    pub elapsed: f64,
    pub time_left: u32,
    last_reported_time: Option<u32>,
    /// Animation clock for cosmetic effects
    pub anim_time: f32,
    pub phase: GamePhase,
    pub outcome: Option<Outcome>,
    pub shots_fired: u32,
    pub seed: u64,
    rng: Pcg32,
    /// Events produced since the host last drained them
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create an idle session sized for a `width`×`height` surface
    pub fn new(tuning: Tuning, settings: &Settings, width: f32, height: f32, seed: u64) -> Self {
        let viewport = Viewport::fit(width, height, &tuning);
        Self {
            grid: BubbleGrid::new(viewport.rows, viewport.cols),
            viewport,
            loaded: None,
            next: None,
            projectile: None,
            falling: Vec::new(),
            exploding: Vec::new(),
            particles: Vec::new(),
            max_particles: settings.max_particles(),
            bobbing: settings.bobbing(),
            aim_angle: std::f32::consts::FRAC_PI_2,
            score: 0,
            elapsed: 0.0,
            time_left: tuning.time_limit_secs,
            last_reported_time: None,
            anim_time: 0.0,
            phase: GamePhase::Ready,
            outcome: None,
            shots_fired: 0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_id: 1,
            tuning,
        }
    }

    /// (Re)initialize board, timer, score and queues
    pub fn start(&mut self) {
        self.grid = BubbleGrid::new(self.viewport.rows, self.viewport.cols);
        self.projectile = None;
        self.falling.clear();
        self.exploding.clear();
        self.particles.clear();
        self.aim_angle = std::f32::consts::FRAC_PI_2;
        self.score = 0;
        self.elapsed = 0.0;
        self.time_left = self.tuning.time_limit_secs;
        self.last_reported_time = None;
        self.anim_time = 0.0;
        self.outcome = None;
        self.shots_fired = 0;
        self.events.clear();

        let fill_rows = self.tuning.initial_rows.min(self.viewport.rows) as i32;
        for row in 0..fill_rows {
            for col in 0..self.viewport.cols as i32 {
                let color = self.random_color();
                self.place_bubble(GridCoord::new(row, col), color);
            }
        }

        self.next = Some(self.random_color());
        self.load_next();
        self.phase = GamePhase::Playing;
        self.emit(GameEvent::ScoreChanged(0));

        log::info!(
            "Game started: seed={} board={}x{} radius={} bubbles={}",
            self.seed,
            self.viewport.rows,
            self.viewport.cols,
            self.viewport.radius,
            self.grid.len()
        );
    }

    /// Allocate a new bubble ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Particle spawner bound to this session's particle list, cap and RNG
    pub fn emitter(&mut self) -> Emitter<'_> {
        Emitter::new(&mut self.particles, self.max_particles, &mut self.rng)
    }

    pub fn random_color(&mut self) -> BubbleColor {
        BubbleColor::random(&mut self.rng, self.tuning.color_count)
    }

    /// Anchor a new bubble at `coord`; false if the cell is taken or off the board
    pub fn place_bubble(&mut self, coord: GridCoord, color: BubbleColor) -> bool {
        let id = self.next_entity_id();
        let bubble = Bubble::anchored(id, color, coord, self.viewport.radius);
        self.grid.insert(bubble).is_ok()
    }

    /// Move the preview into the shooter and draw a new preview
    pub fn load_next(&mut self) {
        self.loaded = self.next.take();
        self.next = Some(self.random_color());
    }

    pub fn shooter_pos(&self) -> Vec2 {
        self.viewport.shooter_pos(self.tuning.shooter_offset)
    }

    /// Aim at a point in surface coordinates
    pub fn set_aim_target(&mut self, x: f32, y: f32) {
        let shooter = self.shooter_pos();
        let dx = x - shooter.x;
        let dy = shooter.y - y;
        self.aim_angle = dy.atan2(dx).clamp(0.0, std::f32::consts::PI);
    }

    /// Direction a shot leaves the shooter: the aim angle kept at least
    /// `MIN_LAUNCH_ANGLE` above level on either side
    pub fn launch_angle(&self) -> f32 {
        self.aim_angle
            .clamp(MIN_LAUNCH_ANGLE, std::f32::consts::PI - MIN_LAUNCH_ANGLE)
    }

    /// Launch the loaded bubble along the launch angle.
    ///
    /// Returns false (and changes nothing) when nothing is loaded, a shot is
    /// already in flight, or the game is not running.
    pub fn shoot(&mut self) -> bool {
        if self.phase != GamePhase::Playing || self.projectile.is_some() {
            return false;
        }
        let Some(color) = self.loaded.take() else {
            return false;
        };

        let angle = self.launch_angle();
        let dir = Vec2::new(angle.cos(), -angle.sin());
        self.projectile = Some(Projectile {
            color,
            pos: self.shooter_pos(),
            vel: dir * self.tuning.launch_speed,
            radius: self.viewport.radius,
        });
        self.shots_fired += 1;
        log::debug!("Shot {} fired: {:?} at {:.3} rad", self.shots_fired, color, angle);
        true
    }

    pub fn add_score(&mut self, points: u32) {
        if points == 0 {
            return;
        }
        self.score += points;
        self.emit(GameEvent::ScoreChanged(self.score));
    }

    /// Recompute the countdown from elapsed time; queues `TimeChanged` when
    /// the whole-second value moves
    pub fn update_timer(&mut self) {
        let elapsed_secs = self.elapsed.floor().max(0.0) as u32;
        self.time_left = self.tuning.time_limit_secs.saturating_sub(elapsed_secs);
        if self.last_reported_time != Some(self.time_left) {
            self.last_reported_time = Some(self.time_left);
            self.emit(GameEvent::TimeChanged(self.time_left));
        }
    }

    /// End the run. Only the first call has any effect.
    pub fn finish(&mut self, outcome: Outcome) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.outcome = Some(outcome);
        self.emit(GameEvent::GameOver);
        log::info!(
            "Game over ({:?}): score={} time_left={} shots={}",
            outcome,
            self.score,
            self.time_left,
            self.shots_fired
        );
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}
