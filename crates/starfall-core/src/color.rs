use std::fmt;

/// 8-bit RGB colour used for entity tints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn from_array(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }

    #[inline]
    pub fn with_alpha(self, a: f32) -> Rgba {
        Rgba { rgb: self, a }
    }
}

/// Colour with a floating point alpha, formatted the way canvas styles expect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub a: f32,
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = if self.a.is_finite() {
            self.a.clamp(0.0, 1.0)
        } else {
            0.0
        };
        write!(f, "rgba({},{},{},{})", self.rgb.r, self.rgb.g, self.rgb.b, a)
    }
}

// Theme palette shared by rockets and burst accents
pub const PALETTE: [Rgb; 4] = [
    Rgb::new(170, 110, 255), // violet
    Rgb::new(110, 160, 255), // blue
    Rgb::new(255, 110, 220), // pink
    Rgb::new(235, 235, 255), // white-ish
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_as_css_rgba() {
        let c = Rgb::new(5, 3, 12).with_alpha(0.18);
        assert_eq!(c.to_string(), "rgba(5,3,12,0.18)");
    }

    #[test]
    fn alpha_is_clamped_when_formatting() {
        assert_eq!(Rgb::new(1, 2, 3).with_alpha(1.7).to_string(), "rgba(1,2,3,1)");
        assert_eq!(Rgb::new(1, 2, 3).with_alpha(-0.2).to_string(), "rgba(1,2,3,0)");
        assert_eq!(Rgb::new(1, 2, 3).with_alpha(f32::NAN).to_string(), "rgba(1,2,3,0)");
    }
}
