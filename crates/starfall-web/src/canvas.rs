use glam::Vec2;
use starfall_core::{Blend, Painter, Rgba};
use std::f64::consts::TAU;
use wasm_bindgen::JsValue;
use web_sys as web;

/// `Painter` backed by a 2D canvas context.
pub struct CanvasPainter {
    ctx: web::CanvasRenderingContext2d,
}

impl CanvasPainter {
    pub fn new(ctx: web::CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    #[inline]
    #[allow(deprecated)]
    fn set_fill(&self, color: Rgba) {
        self.ctx.set_fill_style(&JsValue::from_str(&color.to_string()));
    }

    #[inline]
    #[allow(deprecated)]
    fn set_stroke(&self, width: f32, color: Rgba) {
        self.ctx.set_stroke_style(&JsValue::from_str(&color.to_string()));
        self.ctx.set_line_width(width as f64);
    }

    #[inline]
    fn circle_path(&self, center: Vec2, radius: f32) {
        self.ctx.begin_path();
        _ = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU);
    }
}

#[inline]
fn drawable(radius: f32) -> bool {
    radius.is_finite() && radius > 0.0
}

impl Painter for CanvasPainter {
    fn set_blend(&mut self, blend: Blend) {
        let op = match blend {
            Blend::SourceOver => "source-over",
            Blend::Lighter => "lighter",
        };
        _ = self.ctx.set_global_composite_operation(op);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        self.set_fill(color);
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if !drawable(radius) {
            return;
        }
        self.set_fill(color);
        self.circle_path(center, radius);
        self.ctx.fill();
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.set_stroke(width, color);
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }

    fn stroke_cross(&mut self, center: Vec2, arm: f32, width: f32, color: Rgba) {
        let (x, y, arm) = (center.x as f64, center.y as f64, arm as f64);
        self.set_stroke(width, color);
        self.ctx.begin_path();
        self.ctx.move_to(x - arm, y);
        self.ctx.line_to(x + arm, y);
        self.ctx.move_to(x, y - arm);
        self.ctx.line_to(x, y + arm);
        self.ctx.stroke();
    }

    #[allow(deprecated)]
    fn radial_glow(&mut self, center: Vec2, radius: f32, inner: Rgba, outer: Rgba) {
        if !drawable(radius) {
            return;
        }
        let (x, y) = (center.x as f64, center.y as f64);
        let gradient = match self
            .ctx
            .create_radial_gradient(x, y, 0.0, x, y, radius as f64)
        {
            Ok(g) => g,
            Err(_) => return,
        };
        _ = gradient.add_color_stop(0.0, &inner.to_string());
        _ = gradient.add_color_stop(1.0, &outer.to_string());
        self.ctx.set_fill_style(&gradient);
        self.circle_path(center, radius);
        self.ctx.fill();
    }
}
