//! Canvas 2D surface

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Color, Surface};

/// `Surface` over a canvas element's 2D context
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    size: Vec2,
    glow_enabled: bool,
}

impl CanvasSurface {
    /// Resize the canvas to the game's surface and grab its 2D context
    pub fn attach(canvas: &HtmlCanvasElement, size: Vec2, glow_enabled: bool) -> Result<Self, JsValue> {
        canvas.set_width(size.x as u32);
        canvas.set_height(size.y as u32);
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;
        log::info!("Canvas attached: {}x{}", size.x, size.y);
        Ok(Self {
            ctx,
            size,
            glow_enabled,
        })
    }

    pub fn set_glow_enabled(&mut self, enabled: bool) {
        self.glow_enabled = enabled;
        if !enabled {
            self.ctx.set_shadow_blur(0.0);
        }
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self) {
        self.ctx
            .clear_rect(0.0, 0.0, self.size.x as f64, self.size.y as f64);
    }

    fn set_fill_color(&mut self, color: Color) {
        self.ctx.set_fill_style_str(color.0);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn fill_circle(&mut self, x: f32, y: f32, r: f32) {
        self.ctx.begin_path();
        self.ctx
            .arc(x as f64, y as f64, r as f64, 0.0, std::f64::consts::TAU)
            .ok();
        self.ctx.fill();
    }

    fn fill_polygon(&mut self, points: &[Vec2]) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.ctx.begin_path();
        self.ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            self.ctx.line_to(p.x as f64, p.y as f64);
        }
        self.ctx.close_path();
        self.ctx.fill();
    }

    fn set_glow(&mut self, color: Color, blur: f32) {
        if self.glow_enabled {
            self.ctx.set_shadow_color(color.0);
            self.ctx.set_shadow_blur(blur as f64);
        }
    }

    fn clear_glow(&mut self) {
        self.ctx.set_shadow_blur(0.0);
    }
}
