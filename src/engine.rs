//! Host-facing game engine
//!
//! Owns the session state, the drawing surface and the frame scheduler, and
//! turns host calls (start, aim, shoot, resize, frame, destroy) into
//! simulation steps. Events queued by the simulation are handed to the
//! registered [`GameListener`] after every step.

use crate::error::EngineError;
use crate::platform::{FrameHandle, FrameScheduler};
use crate::renderer::{Surface, SurfaceHost, render};
use crate::settings::Settings;
use crate::sim::effects::cancel_explosions;
use crate::sim::state::{GameEvent, GamePhase, GameState};
use crate::sim::{apply_resize, tick};
use crate::tuning::Tuning;

/// Observer for the three host-visible game events
pub trait GameListener {
    fn on_score_change(&mut self, _score: u32) {}
    fn on_time_change(&mut self, _seconds_left: u32) {}
    fn on_game_over(&mut self) {}
}

/// Detach hook for a host resize listener, run once on `destroy`
pub struct ResizeSubscription {
    detach: Option<Box<dyn FnOnce()>>,
}

impl ResizeSubscription {
    pub fn new(detach: impl FnOnce() + 'static) -> Self {
        Self {
            detach: Some(Box::new(detach)),
        }
    }

    fn detach(mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl std::fmt::Debug for ResizeSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResizeSubscription")
            .field("attached", &self.detach.is_some())
            .finish()
    }
}

pub struct Engine<S: Surface, F: FrameScheduler> {
    state: GameState,
    settings: Settings,
    surface: S,
    scheduler: F,
    listener: Option<Box<dyn GameListener>>,
    pending_frame: Option<FrameHandle>,
    last_frame_ms: Option<f64>,
    resize_subscription: Option<ResizeSubscription>,
    destroyed: bool,
}

impl<S: Surface, F: FrameScheduler> Engine<S, F> {
    /// Build an engine on `host`'s drawing context.
    ///
    /// Fails immediately if the tuning is invalid or the host has no 2D
    /// context to give.
    pub fn new<H>(host: &mut H, scheduler: F, tuning: Tuning, settings: Settings, seed: u64) -> Result<Self, EngineError>
    where
        H: SurfaceHost<Surface = S>,
    {
        tuning.validate()?;
        let surface = host.drawing_context().ok_or(EngineError::NoDrawingContext)?;
        let (width, height) = surface.size();
        let state = GameState::new(tuning, &settings, width, height, seed);

        log::info!(
            "Engine ready: surface {}x{}, {} cols, radius {}",
            width,
            height,
            state.viewport.cols,
            state.viewport.radius
        );

        Ok(Self {
            state,
            settings,
            surface,
            scheduler,
            listener: None,
            pending_frame: None,
            last_frame_ms: None,
            resize_subscription: None,
            destroyed: false,
        })
    }

    pub fn set_listener(&mut self, listener: impl GameListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// (Re)start a game and begin the frame loop
    pub fn start_game(&mut self) {
        if self.destroyed {
            return;
        }
        self.cancel_pending_frame();
        self.state.start();
        self.last_frame_ms = None;
        self.dispatch_events();
        render(&self.state, &self.settings, &mut self.surface);
        self.pending_frame = Some(self.scheduler.request_frame());
    }

    /// Aim at a point in surface coordinates
    pub fn set_aim_angle(&mut self, x: f32, y: f32) {
        if !self.destroyed {
            self.state.set_aim_target(x, y);
        }
    }

    /// Fire the loaded bubble; false if nothing was launched
    pub fn shoot(&mut self) -> bool {
        !self.destroyed && self.state.shoot()
    }

    /// Adapt to a new surface size
    pub fn resize(&mut self, width: f32, height: f32) {
        if self.destroyed {
            return;
        }
        self.surface.resize(width, height);
        apply_resize(&mut self.state, width, height);
        if self.state.phase != GamePhase::Ready {
            render(&self.state, &self.settings, &mut self.surface);
        }
    }

    /// Hand the engine the hook that removes the host's resize listener.
    ///
    /// Replaces (and detaches) any previous subscription. Attaching after
    /// `destroy` detaches right away.
    pub fn attach_resize_listener(&mut self, subscription: ResizeSubscription) {
        if self.destroyed {
            subscription.detach();
            return;
        }
        if let Some(previous) = self.resize_subscription.replace(subscription) {
            previous.detach();
        }
    }

    /// Body of the scheduled frame callback; `now_ms` is the host timestamp
    pub fn frame(&mut self, now_ms: f64) {
        if self.destroyed {
            return;
        }
        self.pending_frame = None;

        let dt = match self.last_frame_ms {
            Some(last) => ((now_ms - last) / 1000.0).max(0.0) as f32,
            None => 0.0,
        };
        self.last_frame_ms = Some(now_ms);

        tick(&mut self.state, dt);
        self.dispatch_events();

        if self.state.phase == GamePhase::Playing {
            render(&self.state, &self.settings, &mut self.surface);
            self.pending_frame = Some(self.scheduler.request_frame());
        }
    }

    /// Tear down: cancel the pending frame, detach the resize listener and
    /// drop pending explosions. Every later call is a no-op.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.cancel_pending_frame();
        if let Some(subscription) = self.resize_subscription.take() {
            subscription.detach();
        }
        let dropped = cancel_explosions(&mut self.state);
        self.state.events.clear();
        self.listener = None;
        self.destroyed = true;
        log::info!("Engine destroyed ({dropped} pending explosions dropped)");
    }

    fn cancel_pending_frame(&mut self) {
        if let Some(handle) = self.pending_frame.take() {
            self.scheduler.cancel_frame(handle);
        }
    }

    fn dispatch_events(&mut self) {
        let events = self.state.drain_events();
        let Some(listener) = self.listener.as_mut() else {
            return;
        };
        for event in events {
            match event {
                GameEvent::ScoreChanged(score) => listener.on_score_change(score),
                GameEvent::TimeChanged(seconds) => listener.on_time_change(seconds),
                GameEvent::GameOver => listener.on_game_over(),
            }
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }

    pub fn has_pending_frame(&self) -> bool {
        self.pending_frame.is_some()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ManualScheduler;
    use crate::renderer::{BatchCanvas, VertexBatch};
    use crate::sim::hex::GridCoord;
    use crate::sim::state::{Bubble, BubbleColor};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Recording(Rc<RefCell<Vec<GameEvent>>>);

    impl GameListener for Recording {
        fn on_score_change(&mut self, score: u32) {
            self.0.borrow_mut().push(GameEvent::ScoreChanged(score));
        }
        fn on_time_change(&mut self, seconds_left: u32) {
            self.0.borrow_mut().push(GameEvent::TimeChanged(seconds_left));
        }
        fn on_game_over(&mut self) {
            self.0.borrow_mut().push(GameEvent::GameOver);
        }
    }

    type TestEngine = Engine<VertexBatch, ManualScheduler>;

    fn engine(tuning: Tuning) -> (TestEngine, Recording) {
        let mut host = BatchCanvas::new(340.0, 700.0);
        let mut engine = Engine::new(&mut host, ManualScheduler::new(), tuning, Settings::default(), 42).unwrap();
        let events = Recording::default();
        engine.set_listener(events.clone());
        (engine, events)
    }

    /// Fire the scheduled frame, if any
    fn pump(engine: &mut TestEngine, now_ms: f64) -> bool {
        if engine.scheduler_mut().take_due().is_some() {
            engine.frame(now_ms);
            true
        } else {
            false
        }
    }

    #[test]
    fn test_construct_without_context_fails() {
        let mut host = BatchCanvas::new(340.0, 700.0);
        host.context_available = false;
        let result = TestEngine::new(&mut host, ManualScheduler::new(), Tuning::default(), Settings::default(), 1);
        assert!(matches!(result, Err(EngineError::NoDrawingContext)));
    }

    #[test]
    fn test_construct_rejects_bad_tuning() {
        let mut host = BatchCanvas::new(340.0, 700.0);
        let tuning = Tuning {
            rows: 0,
            ..Tuning::default()
        };
        let result = TestEngine::new(&mut host, ManualScheduler::new(), tuning, Settings::default(), 1);
        assert!(matches!(result, Err(EngineError::InvalidTuning { field: "rows", .. })));
    }

    #[test]
    fn test_start_reports_score_and_schedules() {
        let (mut engine, events) = engine(Tuning::default());
        engine.start_game();

        assert_eq!(*events.0.borrow(), vec![GameEvent::ScoreChanged(0)]);
        assert!(engine.has_pending_frame());
        assert_eq!(engine.scheduler().pending().len(), 1);
        assert!(engine.surface().vertex_count() > 0, "first frame painted");

        assert!(pump(&mut engine, 1000.0));
        assert_eq!(events.0.borrow().last(), Some(&GameEvent::TimeChanged(180)));
        assert_eq!(engine.scheduler().pending().len(), 1);
    }

    #[test]
    fn test_restart_replaces_pending_frame() {
        let (mut engine, _) = engine(Tuning::default());
        engine.start_game();
        engine.start_game();
        assert_eq!(engine.scheduler().pending().len(), 1);
        assert_eq!(engine.scheduler().canceled, 1);
    }

    #[test]
    fn test_timeout_stops_loop_and_fires_once() {
        let tuning = Tuning {
            time_limit_secs: 1,
            ..Tuning::default()
        };
        let (mut engine, events) = engine(tuning);
        engine.start_game();

        let mut now = 0.0;
        while pump(&mut engine, now) {
            now += 250.0;
            assert!(now < 10_000.0, "loop never stopped");
        }
        // Stray callbacks after the end change nothing
        engine.frame(now + 5000.0);

        let game_overs = events.0.borrow().iter().filter(|e| **e == GameEvent::GameOver).count();
        assert_eq!(game_overs, 1);
        assert!(engine.state().is_over());
        assert!(!engine.has_pending_frame());
    }

    #[test]
    fn test_shoot_goes_through_state() {
        let (mut engine, _) = engine(Tuning::default());
        assert!(!engine.shoot());
        engine.start_game();
        engine.set_aim_angle(0.0, 0.0);
        assert!(engine.state().aim_angle > std::f32::consts::FRAC_PI_2);
        assert!(engine.shoot());
        assert!(!engine.shoot());
    }

    #[test]
    fn test_destroy_tears_everything_down() {
        let (mut engine, events) = engine(Tuning::default());
        let detached = Rc::new(Cell::new(0));
        let hook = Rc::clone(&detached);
        engine.attach_resize_listener(ResizeSubscription::new(move || hook.set(hook.get() + 1)));

        engine.start_game();
        let radius = engine.state().viewport.radius;
        engine.state.exploding.push(
            Bubble::anchored(1, BubbleColor::Red, GridCoord::new(0, 0), radius).into_exploding(5.0),
        );
        events.0.borrow_mut().clear();

        engine.destroy();
        assert!(engine.is_destroyed());
        assert!(!engine.has_pending_frame());
        assert!(engine.scheduler().pending().is_empty());
        assert_eq!(detached.get(), 1);
        assert!(engine.state().exploding.is_empty());

        // Everything after destroy is inert
        engine.destroy();
        engine.start_game();
        engine.frame(10_000.0);
        assert!(!engine.shoot());
        assert_eq!(detached.get(), 1);
        assert!(engine.scheduler().pending().is_empty());
        assert!(events.0.borrow().is_empty());
    }

    #[test]
    fn test_attach_after_destroy_detaches_immediately() {
        let (mut engine, _) = engine(Tuning::default());
        engine.destroy();
        let detached = Rc::new(Cell::new(false));
        let hook = Rc::clone(&detached);
        engine.attach_resize_listener(ResizeSubscription::new(move || hook.set(true)));
        assert!(detached.get());
    }

    #[test]
    fn test_resize_refits_board() {
        let (mut engine, _) = engine(Tuning::default());
        engine.start_game();
        engine.resize(800.0, 600.0);

        assert_eq!(engine.surface().size(), (800.0, 600.0));
        assert_eq!(engine.state().viewport.cols, 15);
        assert_eq!(engine.state().viewport.radius, 25.0);
        assert_eq!(engine.state().shooter_pos().x, 400.0);
    }
}
