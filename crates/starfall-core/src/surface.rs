//! Display surface sizing.
//!
//! The host reports its viewport in CSS pixels along with the raw device pixel
//! ratio; the surface is the backing store size in device pixels. The ratio is
//! capped so very dense displays do not multiply the fill cost.

use crate::constants::{DPR_MAX, DPR_MIN, STAR_COUNT_BASE, STAR_REFERENCE_AREA};

/// Host viewport as reported by the platform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub css_width: f64,
    pub css_height: f64,
    pub device_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(css_width: f64, css_height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            css_width,
            css_height,
            device_pixel_ratio,
        }
    }
}

/// Drawing surface in device pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Surface {
    pub width: u32,
    pub height: u32,
    pub dpr: f32,
}

impl Default for Surface {
    /// Empty surface at unit scale, so entities sized before the first
    /// resize still get non-zero speeds and radii.
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            dpr: DPR_MIN as f32,
        }
    }
}

impl Surface {
    pub fn from_viewport(viewport: Viewport) -> Self {
        let dpr = clamp_dpr(viewport.device_pixel_ratio);
        Self {
            width: device_px(viewport.css_width, dpr),
            height: device_px(viewport.css_height, dpr),
            dpr: dpr as f32,
        }
    }

    #[inline]
    pub fn width_f(&self) -> f32 {
        self.width as f32
    }

    #[inline]
    pub fn height_f(&self) -> f32 {
        self.height as f32
    }

    /// Number of stars for this surface, proportional to its area.
    pub fn star_count(&self) -> usize {
        let area = self.width_f() * self.height_f();
        (STAR_COUNT_BASE * area / STAR_REFERENCE_AREA).floor() as usize
    }
}

#[inline]
pub fn clamp_dpr(raw: f64) -> f64 {
    if raw.is_finite() && raw > 0.0 {
        raw.clamp(DPR_MIN, DPR_MAX)
    } else {
        DPR_MIN
    }
}

#[inline]
fn device_px(css: f64, dpr: f64) -> u32 {
    if css.is_finite() && css > 0.0 {
        (css * dpr).floor() as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dpr_is_clamped_into_range() {
        assert_eq!(clamp_dpr(0.5), 1.0);
        assert_eq!(clamp_dpr(1.5), 1.5);
        assert_eq!(clamp_dpr(3.0), 2.25);
        assert_eq!(clamp_dpr(f64::NAN), 1.0);
        assert_eq!(clamp_dpr(0.0), 1.0);
    }

    #[test]
    fn surface_floors_device_pixels() {
        let s = Surface::from_viewport(Viewport::new(333.0, 201.0, 1.5));
        assert_eq!(s.width, 499);
        assert_eq!(s.height, 301);
        assert_eq!(s.dpr, 1.5);
    }

    #[test]
    fn reference_area_yields_base_star_count() {
        let s = Surface::from_viewport(Viewport::new(900.0, 700.0, 1.0));
        assert_eq!(s.star_count(), 140);
    }

    #[test]
    fn default_surface_is_unit_scale() {
        let s = Surface::default();
        assert_eq!((s.width, s.height), (0, 0));
        assert_eq!(s.dpr, 1.0);
    }

    #[test]
    fn empty_viewport_has_no_stars() {
        let s = Surface::from_viewport(Viewport::new(0.0, 700.0, 1.0));
        assert_eq!(s.star_count(), 0);
    }
}
