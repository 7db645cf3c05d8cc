//! Drawing seam between the simulation and the platform surface.
//!
//! The renderer issues a small set of immediate-mode primitives. The web
//! frontend maps them onto a `CanvasRenderingContext2d`; tests record them.

use crate::color::Rgba;
use glam::Vec2;

/// Compositing mode for subsequent primitives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blend {
    /// Normal alpha compositing.
    SourceOver,
    /// Additive compositing used for glows.
    Lighter,
}

pub trait Painter {
    fn set_blend(&mut self, blend: Blend);

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);

    /// Horizontal and vertical strokes of half-length `arm` through `center`,
    /// drawn as one path.
    fn stroke_cross(&mut self, center: Vec2, arm: f32, width: f32, color: Rgba);

    /// Disc of `radius` filled with a gradient from `inner` at the centre to
    /// `outer` at the rim.
    fn radial_glow(&mut self, center: Vec2, radius: f32, inner: Rgba, outer: Rgba);
}

/// Painter that discards everything; useful for headless stepping.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPainter;

impl Painter for NullPainter {
    fn set_blend(&mut self, _blend: Blend) {}
    fn fill_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32, _color: Rgba) {}
    fn fill_circle(&mut self, _center: Vec2, _radius: f32, _color: Rgba) {}
    fn stroke_line(&mut self, _from: Vec2, _to: Vec2, _width: f32, _color: Rgba) {}
    fn stroke_cross(&mut self, _center: Vec2, _arm: f32, _width: f32, _color: Rgba) {}
    fn radial_glow(&mut self, _center: Vec2, _radius: f32, _inner: Rgba, _outer: Rgba) {}
}
