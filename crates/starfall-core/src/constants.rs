// Shared simulation and rendering tuning constants.
//
// Physics constants are expressed per reference frame (60 Hz) and scaled by
// the clamped frame delta; sizes are in CSS pixels and scaled by the surface
// device pixel ratio.

// Frame clock
pub const REFERENCE_FRAME_MS: f64 = 16.6667;
pub const DT_SCALE_MIN: f32 = 0.2; // absorbs very short frames
pub const DT_SCALE_MAX: f32 = 2.2; // absorbs hitches and backgrounded tabs

// Display surface
pub const DPR_MIN: f64 = 1.0;
pub const DPR_MAX: f64 = 2.25;

// Star field
pub const STAR_COUNT_BASE: f32 = 140.0;
pub const STAR_REFERENCE_AREA: f32 = 900.0 * 700.0;
pub const STAR_TWINKLE_RATE: f32 = 0.001; // per ms, times the star's own speed
pub const STAR_SPARKLE_TWINKLE: f32 = 0.92;
pub const STAR_SPARKLE_DEPTH: f32 = 0.7;
pub const STAR_SPARKLE_ARM: f32 = 3.2;
pub const STAR_COLOR: [u8; 3] = [220, 230, 255];

// Background fade
pub const BACKGROUND_RGB: [u8; 3] = [5, 3, 12];
pub const FADE_ALPHA: f32 = 0.18;

// Spawn control
pub const SPAWN_BASE_RATE: f32 = 0.015;
pub const SPAWN_INTENSITY_RATE: f32 = 0.055;
pub const SPAWN_INTENSITY_FLOOR: f32 = 0.08;
pub const DEFAULT_INTENSITY: f32 = 0.05;

// Rockets
pub const ROCKET_TRAIL_LEN: usize = 14;
pub const ROCKET_LIFE_CAP: f32 = 70.0; // reference frames
pub const ROCKET_DAMPING_X: f32 = 0.995;
pub const ROCKET_DAMPING_Y: f32 = 0.998;
pub const ROCKET_SWAY: f32 = 0.01;
pub const ROCKET_GLOW_RADIUS: f32 = 10.0;

// Bursts and particles
pub const BURST_MIN_PARTICLES: usize = 70;
pub const BURST_EXTRA_PARTICLES: f32 = 60.0;
pub const BURST_SPREAD_EXPONENT: f32 = 0.45;
pub const BURST_BASE_COLOR_SHARE: f32 = 0.7;
pub const PARTICLE_TRAIL_LEN: usize = 10;
pub const PARTICLE_SPARKLE_CHANCE: f32 = 0.16;
pub const PARTICLE_FLICKER_RATE: f32 = 0.02; // per ms

// Smoke
pub const SMOKE_COLOR: [u8; 3] = [220, 220, 255];
pub const BURST_SMOKE_ALPHA: f32 = 0.14;
pub const PUFF_ALPHA: f32 = 0.18;
pub const PUFF_RADIUS: f32 = 26.0;
pub const PUFF_MAX_LIFE: f32 = 70.0;
pub const PUFF_JITTER_X: f32 = 18.0;
pub const PUFF_OFFSET_Y: f32 = 60.0;

// Scene intensity profiles
pub const INTENSITY_INTRO: f32 = 0.05;
pub const INTENSITY_MEMORIES: f32 = 0.9;
pub const INTENSITY_CALM: f32 = 0.35;

// Manual fallback: two taps closer than this count as a double tap
pub const DOUBLE_TAP_MS: f64 = 320.0;
