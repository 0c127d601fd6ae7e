//! Browser bindings: canvas 2D surface and `requestAnimationFrame`

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{FrameHandle, FrameScheduler};
use crate::renderer::{LineStyle, Rgba, Surface, SurfaceHost};

fn css_color(color: Rgba) -> String {
    format!(
        "rgba({}, {}, {}, {})",
        (color[0].clamp(0.0, 1.0) * 255.0).round() as u8,
        (color[1].clamp(0.0, 1.0) * 255.0).round() as u8,
        (color[2].clamp(0.0, 1.0) * 255.0).round() as u8,
        color[3].clamp(0.0, 1.0)
    )
}

/// `Surface` over a canvas 2D context
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    fn circle_path(&self, center: Vec2, radius: f32) -> bool {
        self.ctx.begin_path();
        self.ctx
            .arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU)
            .is_ok()
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> (f32, f32) {
        (self.canvas.width() as f32, self.canvas.height() as f32)
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.canvas.set_width(width.max(0.0) as u32);
        self.canvas.set_height(height.max(0.0) as u32);
    }

    fn clear(&mut self) {
        let (w, h) = self.size();
        self.ctx.clear_rect(0.0, 0.0, w as f64, h as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if self.circle_path(center, radius) {
            self.ctx.set_fill_style_str(&css_color(color));
            self.ctx.fill();
        }
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, line_width: f32, color: Rgba) {
        if self.circle_path(center, radius) {
            self.ctx.set_line_width(line_width as f64);
            self.ctx.set_stroke_style_str(&css_color(color));
            self.ctx.stroke();
        }
    }

    fn polyline(&mut self, points: &[Vec2], line_width: f32, color: Rgba, style: LineStyle) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };

        let dash = js_sys::Array::new();
        if let LineStyle::Dashed { dash: on, gap } = style {
            dash.push(&JsValue::from_f64(on as f64));
            dash.push(&JsValue::from_f64(gap as f64));
        }
        let _ = self.ctx.set_line_dash(&dash);

        self.ctx.begin_path();
        self.ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            self.ctx.line_to(p.x as f64, p.y as f64);
        }
        self.ctx.set_line_width(line_width as f64);
        self.ctx.set_stroke_style_str(&css_color(color));
        self.ctx.stroke();

        let _ = self.ctx.set_line_dash(&js_sys::Array::new());
    }
}

/// `SurfaceHost` over a canvas element
pub struct CanvasHost {
    pub canvas: HtmlCanvasElement,
}

impl SurfaceHost for CanvasHost {
    type Surface = CanvasSurface;

    fn drawing_context(&mut self) -> Option<CanvasSurface> {
        let ctx = self
            .canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(CanvasSurface {
            canvas: self.canvas.clone(),
            ctx,
        })
    }
}

/// Shared slot for the per-frame callback.
///
/// The callback usually needs the engine that owns the scheduler, so it is
/// installed after construction through a clone of this slot.
pub type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// `FrameScheduler` over `requestAnimationFrame`
pub struct RafScheduler {
    window: web_sys::Window,
    callback: FrameCallback,
}

impl RafScheduler {
    pub fn new(window: web_sys::Window) -> Self {
        Self {
            window,
            callback: Rc::new(RefCell::new(None)),
        }
    }

    /// Slot the frame callback must be stored in before the first request
    pub fn callback_slot(&self) -> FrameCallback {
        Rc::clone(&self.callback)
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let slot = self.callback.borrow();
        let Some(callback) = slot.as_ref() else {
            log::warn!("Frame requested before a callback was installed");
            return FrameHandle(0);
        };
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(id) => FrameHandle(id as u64),
            Err(err) => {
                log::warn!("requestAnimationFrame failed: {err:?}");
                FrameHandle(0)
            }
        }
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if handle.0 != 0 {
            let _ = self.window.cancel_animation_frame(handle.0 as i32);
        }
    }
}
