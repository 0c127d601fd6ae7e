//! Hexpop entry point
//!
//! On the web this wires the engine to a canvas, mouse input, window resizes
//! and `requestAnimationFrame`. Natively it plays a scripted headless session
//! and prints a JSON summary.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, MouseEvent};

    use hexpop::platform::web::{CanvasHost, CanvasSurface, RafScheduler};
    use hexpop::{Engine, GameListener, ResizeSubscription, Settings, Tuning};

    type WebEngine = Engine<CanvasSurface, RafScheduler>;

    /// Mirrors game events into the page HUD
    struct HudListener {
        document: Document,
    }

    impl HudListener {
        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }
    }

    impl GameListener for HudListener {
        fn on_score_change(&mut self, score: u32) {
            self.set_text("score", &score.to_string());
        }

        fn on_time_change(&mut self, seconds_left: u32) {
            self.set_text("time", &format!("{}:{:02}", seconds_left / 60, seconds_left % 60));
        }

        fn on_game_over(&mut self) {
            log::info!("Game over");
            if let Some(el) = self.document.get_element_by_id("game-over") {
                let _ = el.set_attribute("class", "");
            }
        }
    }

    fn window_size(window: &web_sys::Window) -> (f32, f32) {
        let read = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
        (read(window.inner_width()), read(window.inner_height()))
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Hexpop starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()
            .map_err(|_| JsValue::from_str("not a canvas"))?;

        let (width, height) = window_size(&window);
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let scheduler = RafScheduler::new(window.clone());
        let frame_slot = scheduler.callback_slot();
        let seed = js_sys::Date::now() as u64;
        let mut host = CanvasHost {
            canvas: canvas.clone(),
        };
        let engine: WebEngine = Engine::new(&mut host, scheduler, Tuning::default(), Settings::default(), seed)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let engine = Rc::new(RefCell::new(engine));
        engine.borrow_mut().set_listener(HudListener {
            document: document.clone(),
        });

        log::info!("Engine initialized with seed: {}", seed);

        // Frame callback, reused for every requestAnimationFrame
        {
            let engine = Rc::clone(&engine);
            *frame_slot.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |now: f64| {
                engine.borrow_mut().frame(now);
            }));
        }

        setup_input_handlers(&canvas, Rc::clone(&engine));
        setup_resize_listener(&window, Rc::clone(&engine))?;

        engine.borrow_mut().start_game();
        log::info!("Hexpop running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, engine: Rc<RefCell<WebEngine>>) {
        // Mouse move - aim at the pointer
        {
            let engine = Rc::clone(&engine);
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                engine
                    .borrow_mut()
                    .set_aim_angle(event.offset_x() as f32, event.offset_y() as f32);
            });
            let _ = canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click - aim at the click point and fire
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut engine = engine.borrow_mut();
                engine.set_aim_angle(event.offset_x() as f32, event.offset_y() as f32);
                engine.shoot();
            });
            let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_listener(window: &web_sys::Window, engine: Rc<RefCell<WebEngine>>) -> Result<(), JsValue> {
        let on_resize = {
            let engine = Rc::clone(&engine);
            let window = window.clone();
            Rc::new(Closure::<dyn FnMut()>::new(move || {
                let (width, height) = window_size(&window);
                engine.borrow_mut().resize(width, height);
            }))
        };
        window.add_event_listener_with_callback("resize", (*on_resize).as_ref().unchecked_ref())?;

        let window = window.clone();
        engine
            .borrow_mut()
            .attach_resize_listener(ResizeSubscription::new(move || {
                let _ = window.remove_event_listener_with_callback("resize", (*on_resize).as_ref().unchecked_ref());
            }));
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Hexpop (native) starting headless session...");

    if let Err(err) = native::run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::cell::Cell;
    use std::error::Error;
    use std::rc::Rc;

    use serde::Serialize;

    use hexpop::platform::ManualScheduler;
    use hexpop::renderer::BatchCanvas;
    use hexpop::sim::Outcome;
    use hexpop::{Engine, GameListener, QualityPreset, Settings, Tuning};

    const WIDTH: f32 = 480.0;
    const HEIGHT: f32 = 800.0;
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Frames between scripted shots
    const SHOT_INTERVAL: u64 = 40;
    /// Hard stop well past any time limit
    const MAX_FRAMES: u64 = 60 * 60 * 30;

    #[derive(Serialize)]
    struct Summary {
        seed: u64,
        quality: &'static str,
        score: u32,
        time_left: u32,
        shots_fired: u32,
        outcome: Option<Outcome>,
        anchored_left: usize,
        frames: u64,
        last_frame_vertices: u32,
    }

    /// Logs events and remembers the game-over signal
    struct LogListener {
        over: Rc<Cell<bool>>,
    }

    impl GameListener for LogListener {
        fn on_score_change(&mut self, score: u32) {
            log::debug!("score: {score}");
        }

        fn on_time_change(&mut self, seconds_left: u32) {
            if seconds_left % 30 == 0 {
                log::info!("{seconds_left}s left");
            }
        }

        fn on_game_over(&mut self) {
            self.over.set(true);
        }
    }

    /// A quality preset name (`low`, `medium`, `high`) or a settings JSON path
    fn load_settings(arg: &str) -> Result<Settings, Box<dyn Error>> {
        if let Some(preset) = QualityPreset::parse(arg) {
            return Ok(Settings::from_preset(preset));
        }
        log::info!("Loading settings from {arg}");
        Ok(Settings::from_json(&std::fs::read_to_string(arg)?)?)
    }

    /// Usage: `hexpop [tuning.json] [seed] [quality | settings.json]`
    ///
    /// Pass `-` to keep the default tuning.
    pub fn run() -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args().skip(1);
        let tuning = match args.next().filter(|path| path != "-") {
            Some(path) => {
                log::info!("Loading tuning from {path}");
                Tuning::from_json(&std::fs::read_to_string(&path)?)?
            }
            None => Tuning::default(),
        };
        let seed = match args.next() {
            Some(seed) => seed.parse()?,
            None => 0x5eed,
        };
        let settings = match args.next() {
            Some(arg) => load_settings(&arg)?,
            None => Settings::default(),
        };
        log::info!(
            "Quality {}, particle cap {}",
            settings.quality.as_str(),
            settings.max_particles()
        );
        let quality = settings.quality.as_str();

        let mut host = BatchCanvas::new(WIDTH, HEIGHT);
        let mut engine = Engine::new(&mut host, ManualScheduler::new(), tuning, settings, seed)?;
        let over = Rc::new(Cell::new(false));
        engine.set_listener(LogListener { over: Rc::clone(&over) });

        engine.start_game();

        let mut frames = 0;
        while engine.scheduler_mut().take_due().is_some() && frames < MAX_FRAMES {
            if frames % SHOT_INTERVAL == 0 {
                // Sweep the aim back and forth across the board
                let sweep = (frames / SHOT_INTERVAL) as f32 * 0.7;
                let x = WIDTH / 2.0 + sweep.sin() * WIDTH * 0.4;
                engine.set_aim_angle(x, HEIGHT * 0.25);
                engine.shoot();
            }
            engine.frame(frames as f64 * FRAME_MS);
            frames += 1;
        }

        if !over.get() {
            log::warn!("Session stopped after {frames} frames without a game over");
        }

        let state = engine.state();
        let summary = Summary {
            seed,
            quality,
            score: state.score,
            time_left: state.time_left,
            shots_fired: state.shots_fired,
            outcome: state.outcome,
            anchored_left: state.grid.len(),
            frames,
            last_frame_vertices: engine.surface().vertex_count(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_load_settings_by_preset_name() {
            let settings = load_settings("high").unwrap();
            assert_eq!(settings.quality, QualityPreset::High);
            assert_eq!(settings.max_particles(), 2000);
            assert!(load_settings("no-such-settings.json").is_err());
        }
    }
}
