//! Star field and fireworks simulation.
//!
//! `Fireworks` owns every visual entity and advances them on a frame clock
//! measured in 60 Hz reference frames. All entity collections are private;
//! callers interact through `resize`, `set_intensity`, `puff_at_center` and
//! `tick`.
//!
//! Depth `z` in \[0, 1\] is a rendering heuristic only: nearer entities
//! (z → 1) get wider bursts, larger radii, longer lives and bigger glows.

use crate::color::{Rgb, PALETTE};
use crate::constants::*;
use crate::paint::{Blend, Painter};
use crate::surface::{Surface, Viewport};
use crate::trail::Trail;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

const WHITE: Rgb = Rgb::new(255, 255, 255);

#[derive(Clone, Debug)]
struct Star {
    pos: Vec2,
    z: f32,
    radius: f32,
    phase: f32,
    speed: f32,
    alpha: f32,
}

impl Star {
    #[inline]
    fn twinkle(&self, t_ms: f64) -> f32 {
        let arg = self.phase as f64 + t_ms * STAR_TWINKLE_RATE as f64 * self.speed as f64;
        0.55 + 0.45 * arg.sin() as f32
    }
}

#[derive(Clone, Debug)]
struct Rocket {
    pos: Vec2,
    vel: Vec2,
    z: f32,
    target_y: f32,
    life: f32,
    color: Rgb,
    trail: Trail,
}

#[derive(Clone, Debug)]
struct Particle {
    pos: Vec2,
    vel: Vec2,
    z: f32,
    drag: f32,
    gravity: f32,
    life: f32,
    max_life: f32,
    radius: f32,
    color: Rgb,
    sparkle: bool,
    trail: Trail,
}

// Depth is folded into `radius` at creation, so smoke carries no `z`.
#[derive(Clone, Debug)]
struct Smoke {
    pos: Vec2,
    radius: f32,
    alpha: f32,
    life: f32,
    max_life: f32,
}

impl Smoke {
    #[inline]
    fn life01(&self) -> f32 {
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}

/// Frame delta expressed in reference frames, clamped to absorb hitches.
#[inline]
pub fn dt_scale(prev_ms: Option<f64>, now_ms: f64) -> f32 {
    match prev_ms {
        Some(prev) => {
            let scale = ((now_ms - prev) / REFERENCE_FRAME_MS) as f32;
            if scale.is_nan() {
                1.0
            } else {
                scale.clamp(DT_SCALE_MIN, DT_SCALE_MAX)
            }
        }
        None => 1.0,
    }
}

pub struct Fireworks {
    surface: Surface,
    stars: Vec<Star>,
    rockets: Vec<Rocket>,
    particles: Vec<Particle>,
    smokes: Vec<Smoke>,
    intensity: f32,
    spawn_acc: f32,
    last_ms: Option<f64>,
    launched: u64,
    bursts: u64,
    rng: StdRng,
}

impl Fireworks {
    pub fn new(seed: u64) -> Self {
        Self {
            surface: Surface::default(),
            stars: Vec::new(),
            rockets: Vec::new(),
            particles: Vec::new(),
            smokes: Vec::new(),
            intensity: DEFAULT_INTENSITY,
            spawn_acc: 0.0,
            last_ms: None,
            launched: 0,
            bursts: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn star_count(&self) -> usize {
        self.stars.len()
    }

    pub fn rocket_count(&self) -> usize {
        self.rockets.len()
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn smoke_count(&self) -> usize {
        self.smokes.len()
    }

    /// Rockets launched since construction.
    pub fn launched(&self) -> u64 {
        self.launched
    }

    /// Bursts produced since construction.
    pub fn bursts(&self) -> u64 {
        self.bursts
    }

    /// Recompute the surface and regenerate the star field.
    ///
    /// Returns `false` without touching any state when the viewport maps to
    /// the current surface.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        let surface = Surface::from_viewport(viewport);
        if surface == self.surface {
            return false;
        }
        self.surface = surface;
        let (w, h, dpr) = (surface.width_f(), surface.height_f(), surface.dpr);
        let count = surface.star_count();
        let rng = &mut self.rng;
        self.stars = (0..count)
            .map(|_| Star {
                pos: Vec2::new(rng.gen::<f32>() * w, rng.gen::<f32>() * h),
                z: rng.gen::<f32>(),
                radius: (rng.gen::<f32>() * 1.2 + 0.25) * dpr,
                phase: rng.gen::<f32>() * TAU,
                speed: 0.7 + rng.gen::<f32>() * 1.8,
                alpha: 0.15 + rng.gen::<f32>() * 0.55,
            })
            .collect();
        log::info!(
            "[fx] surface {}x{} dpr={:.2} stars={}",
            surface.width,
            surface.height,
            surface.dpr,
            count
        );
        true
    }

    pub fn set_intensity(&mut self, v: f32) {
        self.intensity = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
    }

    /// Queue a single smoke puff just below the surface centre.
    pub fn puff_at_center(&mut self) {
        let dpr = self.surface.dpr.max(1.0);
        let jitter = (self.rng.gen::<f32>() * 2.0 - 1.0) * PUFF_JITTER_X * dpr;
        self.smokes.push(Smoke {
            pos: Vec2::new(
                self.surface.width_f() * 0.5 + jitter,
                self.surface.height_f() * 0.5 + PUFF_OFFSET_Y * dpr,
            ),
            radius: PUFF_RADIUS * dpr,
            alpha: PUFF_ALPHA,
            life: 0.0,
            max_life: PUFF_MAX_LIFE,
        });
    }

    /// Opaque background fill, used once before the first frame.
    pub fn clear<P: Painter + ?Sized>(&self, painter: &mut P) {
        painter.set_blend(Blend::SourceOver);
        painter.fill_rect(
            0.0,
            0.0,
            self.surface.width_f(),
            self.surface.height_f(),
            Rgb::from_array(BACKGROUND_RGB).with_alpha(1.0),
        );
    }

    /// Advance one frame and draw it. Returns the delta scale used.
    pub fn tick<P: Painter + ?Sized>(&mut self, t_ms: f64, painter: &mut P) -> f32 {
        let dt = self.step(t_ms);
        self.draw(t_ms, painter);
        dt
    }

    /// Physics half of `tick`: spawn, integrate and expire entities.
    pub fn step(&mut self, t_ms: f64) -> f32 {
        let dt = dt_scale(self.last_ms, t_ms);
        self.last_ms = Some(t_ms);

        self.spawn_acc += dt * (SPAWN_BASE_RATE + SPAWN_INTENSITY_RATE * self.intensity);
        while self.spawn_acc > 1.0 {
            self.spawn_acc -= 1.0;
            if self.intensity > SPAWN_INTENSITY_FLOOR {
                self.launch_rocket();
            }
        }

        self.step_rockets(t_ms, dt);
        self.step_particles(dt);
        self.smokes.retain_mut(|s| {
            s.life += dt;
            s.life <= s.max_life
        });
        dt
    }

    fn step_rockets(&mut self, t_ms: f64, dt: f32) {
        let sway_scale = ROCKET_SWAY * self.surface.dpr;
        let t_sec = t_ms * 0.001;
        let mut detonated: Vec<(Vec2, f32, Rgb)> = Vec::new();
        self.rockets.retain_mut(|r| {
            r.life += dt;
            r.trail.push(r.pos);
            r.pos += r.vel * dt;
            r.vel.x *= ROCKET_DAMPING_X;
            r.vel.y *= ROCKET_DAMPING_Y;
            r.vel.x += (t_sec + r.life as f64).sin() as f32 * sway_scale;

            let reached = r.pos.y <= r.target_y;
            let timed_out = r.life > ROCKET_LIFE_CAP;
            if reached || timed_out {
                detonated.push((r.pos, r.z, r.color));
                false
            } else {
                true
            }
        });
        for (pos, z, color) in detonated {
            self.burst(pos, z, color);
        }
    }

    fn step_particles(&mut self, dt: f32) {
        self.particles.retain_mut(|p| {
            p.life += dt;
            p.trail.push(p.pos);
            p.vel *= p.drag;
            p.vel.y += p.gravity * dt;
            p.pos += p.vel * dt;
            p.life <= p.max_life
        });
    }

    fn launch_rocket(&mut self) {
        let (w, h, dpr) = (
            self.surface.width_f(),
            self.surface.height_f(),
            self.surface.dpr,
        );
        let rng = &mut self.rng;
        let x = (rng.gen::<f32>() * 0.9 + 0.05) * w;
        let y = h + 10.0 * dpr;
        let z = 0.35 + rng.gen::<f32>() * 0.65;
        let speed = (6.2 + rng.gen::<f32>() * 2.6) * dpr * (0.85 + 0.35 * (1.0 - z));
        let vx = (rng.gen::<f32>() * 2.0 - 1.0) * 0.6 * dpr;
        let target_y = (rng.gen::<f32>() * 0.45 + 0.12) * h;
        let color = PALETTE[rng.gen_range(0..PALETTE.len())];
        self.rockets.push(Rocket {
            pos: Vec2::new(x, y),
            vel: Vec2::new(vx, -speed),
            z,
            target_y,
            life: 0.0,
            color,
            trail: Trail::new(ROCKET_TRAIL_LEN),
        });
        self.launched += 1;
    }

    /// Emit a particle batch and one smoke bloom at `origin`.
    fn burst(&mut self, origin: Vec2, z: f32, base: Rgb) {
        let dpr = self.surface.dpr;
        let rng = &mut self.rng;
        let count = BURST_MIN_PARTICLES + (rng.gen::<f32>() * BURST_EXTRA_PARTICLES) as usize;
        let spread = 2.2 + rng.gen::<f32>() * 1.8;
        self.particles.reserve(count);
        for _ in 0..count {
            let angle = rng.gen::<f32>() * TAU;
            let mag = rng.gen::<f32>().powf(BURST_SPREAD_EXPONENT) * spread * dpr * (0.55 + 0.75 * z);
            let color = if rng.gen::<f32>() < BURST_BASE_COLOR_SHARE {
                base
            } else {
                PALETTE[rng.gen_range(0..PALETTE.len())]
            };
            self.particles.push(Particle {
                pos: origin,
                vel: Vec2::new(angle.cos(), angle.sin()) * mag,
                z,
                drag: 0.985 - rng.gen::<f32>() * 0.01,
                gravity: (0.045 + rng.gen::<f32>() * 0.035) * dpr,
                life: 0.0,
                max_life: (42.0 + rng.gen::<f32>() * 28.0) * (0.9 + 0.6 * z),
                radius: (1.1 + rng.gen::<f32>() * 1.8) * dpr * (0.75 + 0.85 * z),
                color,
                sparkle: rng.gen::<f32>() < PARTICLE_SPARKLE_CHANCE,
                trail: Trail::new(PARTICLE_TRAIL_LEN),
            });
        }
        self.smokes.push(Smoke {
            pos: origin,
            radius: (22.0 + rng.gen::<f32>() * 18.0) * dpr * (0.7 + 0.8 * z),
            alpha: BURST_SMOKE_ALPHA,
            life: 0.0,
            max_life: 56.0 + rng.gen::<f32>() * 30.0,
        });
        self.bursts += 1;
    }

    /// Drawing half of `tick`. Leaves the painter in `SourceOver`.
    pub fn draw<P: Painter + ?Sized>(&self, t_ms: f64, painter: &mut P) {
        let dpr = self.surface.dpr;

        // Partial fade instead of a clear leaves motion trails
        painter.set_blend(Blend::SourceOver);
        painter.fill_rect(
            0.0,
            0.0,
            self.surface.width_f(),
            self.surface.height_f(),
            Rgb::from_array(BACKGROUND_RGB).with_alpha(FADE_ALPHA),
        );
        self.draw_stars(t_ms, painter);

        painter.set_blend(Blend::Lighter);
        for r in &self.rockets {
            let depth = 0.7 + 0.8 * r.z;
            for (a, from, to) in r.trail.segments() {
                painter.stroke_line(
                    from,
                    to,
                    (1.2 + a * 1.8) * dpr * depth,
                    r.color.with_alpha(0.08 + a * 0.14),
                );
            }
            let glow = ROCKET_GLOW_RADIUS * dpr * (0.7 + 0.9 * r.z);
            painter.radial_glow(r.pos, glow, r.color.with_alpha(0.6), r.color.with_alpha(0.0));
        }

        let flicker_t = t_ms * PARTICLE_FLICKER_RATE as f64;
        for p in &self.particles {
            let fade = 1.0 - (p.life / p.max_life).clamp(0.0, 1.0);
            let depth = 0.65 + 0.9 * p.z;
            for (a, from, to) in p.trail.segments() {
                painter.stroke_line(
                    from,
                    to,
                    (0.8 + a * 1.2) * dpr * depth,
                    p.color.with_alpha((0.06 + a * 0.10) * fade),
                );
            }
            let flick = if p.sparkle {
                0.65 + 0.35 * (flicker_t + p.life as f64).sin() as f32
            } else {
                1.0
            };
            painter.fill_circle(
                p.pos,
                p.radius * (0.7 + 0.6 * fade),
                p.color.with_alpha((0.22 + 0.45 * fade) * flick),
            );
            painter.radial_glow(
                p.pos,
                p.radius * (3.2 + 3.2 * fade),
                p.color.with_alpha(0.16 * fade),
                p.color.with_alpha(0.0),
            );
        }

        let smoke = Rgb::from_array(SMOKE_COLOR);
        for s in &self.smokes {
            let life01 = s.life01();
            painter.radial_glow(
                s.pos,
                s.radius * (0.7 + 1.25 * life01),
                smoke.with_alpha(s.alpha * (1.0 - life01)),
                smoke.with_alpha(0.0),
            );
        }
        painter.set_blend(Blend::SourceOver);
    }

    fn draw_stars<P: Painter + ?Sized>(&self, t_ms: f64, painter: &mut P) {
        let dpr = self.surface.dpr;
        let tint = Rgb::from_array(STAR_COLOR);
        for s in &self.stars {
            let tw = s.twinkle(t_ms);
            let alpha = s.alpha * tw;
            painter.fill_circle(s.pos, s.radius * (0.85 + 0.35 * s.z), tint.with_alpha(alpha));
            if tw > STAR_SPARKLE_TWINKLE && s.z > STAR_SPARKLE_DEPTH {
                painter.stroke_cross(
                    s.pos,
                    STAR_SPARKLE_ARM * dpr,
                    0.8 * dpr,
                    WHITE.with_alpha(0.6 * alpha * 0.55),
                );
            }
        }
    }

    #[cfg(test)]
    fn push_rocket(&mut self, pos: Vec2, vel: Vec2, target_y: f32) {
        self.rockets.push(Rocket {
            pos,
            vel,
            z: 0.5,
            target_y,
            life: 0.0,
            color: PALETTE[0],
            trail: Trail::new(ROCKET_TRAIL_LEN),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;

    const FRAME_MS: f64 = REFERENCE_FRAME_MS;

    fn reference_fireworks() -> Fireworks {
        let mut fx = Fireworks::new(7);
        fx.resize(Viewport::new(900.0, 700.0, 1.0));
        fx
    }

    fn run_frames(fx: &mut Fireworks, start_ms: f64, frames: usize) -> f64 {
        let mut t = start_ms;
        for _ in 0..frames {
            fx.step(t);
            t += FRAME_MS;
        }
        t
    }

    #[test]
    fn dt_scale_is_clamped() {
        assert_eq!(dt_scale(None, 5000.0), 1.0);
        assert_eq!(dt_scale(Some(0.0), 10_000.0), DT_SCALE_MAX);
        assert_eq!(dt_scale(Some(1000.0), 1000.5), DT_SCALE_MIN);
        assert_eq!(dt_scale(Some(1000.0), 900.0), DT_SCALE_MIN);
        let one = dt_scale(Some(1000.0), 1000.0 + FRAME_MS);
        assert!((one - 1.0).abs() < 1e-5);
    }

    #[test]
    fn intensity_is_clamped() {
        let mut fx = Fireworks::new(1);
        fx.set_intensity(-1.0);
        assert_eq!(fx.intensity(), 0.0);
        fx.set_intensity(5.0);
        assert_eq!(fx.intensity(), 1.0);
        fx.set_intensity(0.4);
        assert_eq!(fx.intensity(), 0.4);
        fx.set_intensity(f32::NAN);
        assert_eq!(fx.intensity(), 0.0);
    }

    #[test]
    fn rocket_reaching_target_bursts_once() {
        let mut fx = reference_fireworks();
        fx.set_intensity(0.0);
        fx.push_rocket(Vec2::new(450.0, 100.0), Vec2::new(0.0, -5.0), 200.0);
        fx.step(1000.0);
        assert_eq!(fx.rocket_count(), 0);
        assert_eq!(fx.bursts(), 1);
        assert!((70..130).contains(&fx.particle_count()));
        assert_eq!(fx.smoke_count(), 1);

        run_frames(&mut fx, 1000.0 + FRAME_MS, 20);
        assert_eq!(fx.bursts(), 1);
    }

    #[test]
    fn rocket_exceeding_life_cap_bursts_once() {
        let mut fx = reference_fireworks();
        fx.set_intensity(0.0);
        // Stationary rocket with an unreachable target
        fx.push_rocket(Vec2::new(450.0, 600.0), Vec2::ZERO, -1.0e9);
        let t = run_frames(&mut fx, 1000.0, 69);
        assert_eq!(fx.rocket_count(), 1);
        assert_eq!(fx.bursts(), 0);

        run_frames(&mut fx, t, 3);
        assert_eq!(fx.rocket_count(), 0);
        assert_eq!(fx.bursts(), 1);

        run_frames(&mut fx, t + 3.0 * FRAME_MS, 50);
        assert_eq!(fx.bursts(), 1);
    }

    #[test]
    fn particles_never_outlive_max_life() {
        let mut fx = reference_fireworks();
        fx.set_intensity(0.0);
        fx.push_rocket(Vec2::new(450.0, 100.0), Vec2::ZERO, 200.0);
        let mut t = 1000.0;
        for _ in 0..200 {
            fx.step(t);
            assert!(fx.particles.iter().all(|p| p.life <= p.max_life));
            assert!(fx.smokes.iter().all(|s| s.life <= s.max_life));
            t += FRAME_MS;
        }
        // Longest possible particle life is 70 * 1.5 frames
        assert_eq!(fx.particle_count(), 0);
        assert_eq!(fx.smoke_count(), 0);
    }

    #[test]
    fn burst_particles_follow_depth_and_palette() {
        let mut fx = reference_fireworks();
        let base = PALETTE[2];
        fx.burst(Vec2::new(100.0, 100.0), 1.0, base);
        assert!(fx.particles.iter().all(|p| p.radius > 0.0 && p.max_life > 0.0));
        assert!(fx.particles.iter().all(|p| PALETTE.contains(&p.color)));
        let kept = fx.particles.iter().filter(|p| p.color == base).count();
        assert!(kept * 2 > fx.particles.len(), "most particles keep the base colour");
        // Nearest depth caps the speed at spread(4.0) * 1.3
        assert!(fx.particles.iter().all(|p| p.vel.length() <= 4.0 * 1.3 + 1e-3));
    }

    #[test]
    fn spawn_rate_scales_with_intensity() {
        let mut high = reference_fireworks();
        high.set_intensity(1.0);
        let mut low = reference_fireworks();
        low.set_intensity(0.05);
        run_frames(&mut high, 0.0, 600);
        run_frames(&mut low, 0.0, 600);
        assert!(high.launched() > low.launched());
        assert!(high.launched() >= 30, "launched {}", high.launched());
        // 0.05 sits below the spawn floor
        assert_eq!(low.launched(), 0);
    }

    #[test]
    fn ticking_before_resize_still_moves_and_sizes_entities() {
        let mut fx = Fireworks::new(11);
        fx.set_intensity(1.0);
        let mut launched_moving = false;
        let mut t = 0.0;
        for _ in 0..240 {
            fx.step(t);
            launched_moving |= fx.rockets.iter().any(|r| r.vel.y < 0.0);
            assert!(fx.particles.iter().all(|p| p.radius > 0.0));
            t += FRAME_MS;
        }
        assert!(launched_moving);
        assert!(fx.bursts() > 0);
    }

    #[test]
    fn resize_scales_stars_with_area() {
        let mut fx = reference_fireworks();
        assert_eq!(fx.star_count(), 140);
        assert!(fx.resize(Viewport::new(1800.0, 700.0, 1.0)));
        assert_eq!(fx.star_count(), 280);
        // dpr 2 quadruples the device area
        assert!(fx.resize(Viewport::new(900.0, 700.0, 2.0)));
        assert_eq!(fx.star_count(), 560);
    }

    #[test]
    fn resize_with_same_viewport_is_a_no_op() {
        let mut fx = reference_fireworks();
        let before: Vec<Vec2> = fx.stars.iter().map(|s| s.pos).collect();
        assert!(!fx.resize(Viewport::new(900.0, 700.0, 1.0)));
        let after: Vec<Vec2> = fx.stars.iter().map(|s| s.pos).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn puff_lands_below_center() {
        let mut fx = Fireworks::new(3);
        fx.resize(Viewport::new(800.0, 600.0, 2.0));
        fx.puff_at_center();
        assert_eq!(fx.smoke_count(), 1);
        let s = &fx.smokes[0];
        assert!((s.pos.x - 800.0).abs() <= 18.0 * 2.0);
        assert_eq!(s.pos.y, 600.0 + 120.0);
        assert_eq!(s.max_life, PUFF_MAX_LIFE);
    }

    #[derive(Default)]
    struct LinePainter {
        lines: Vec<(f32, f32)>,
        circles: Vec<f32>,
        crosses: usize,
    }

    impl Painter for LinePainter {
        fn set_blend(&mut self, _blend: Blend) {}
        fn fill_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32, _color: Rgba) {}
        fn fill_circle(&mut self, _center: Vec2, _radius: f32, color: Rgba) {
            self.circles.push(color.a);
        }
        fn stroke_line(&mut self, _from: Vec2, _to: Vec2, width: f32, color: Rgba) {
            self.lines.push((width, color.a));
        }
        fn stroke_cross(&mut self, _center: Vec2, _arm: f32, _width: f32, _color: Rgba) {
            self.crosses += 1;
        }
        fn radial_glow(&mut self, _center: Vec2, _radius: f32, _inner: Rgba, _outer: Rgba) {}
    }

    #[test]
    fn rocket_trail_thins_and_fades_with_age() {
        let mut fx = reference_fireworks();
        fx.set_intensity(0.0);
        fx.push_rocket(Vec2::new(450.0, 650.0), Vec2::new(0.0, -2.0), -1.0e9);
        let t = run_frames(&mut fx, 1000.0, 16);
        assert_eq!(fx.rocket_count(), 1);

        let mut painter = LinePainter::default();
        fx.draw(t, &mut painter);
        // Stars never stroke lines, so every line is a trail segment
        assert_eq!(painter.lines.len(), ROCKET_TRAIL_LEN - 1);
        for pair in painter.lines.windows(2) {
            let (older, newer) = (pair[0], pair[1]);
            assert!(newer.0 > older.0, "width {:?} -> {:?}", older, newer);
            assert!(newer.1 > older.1, "alpha {:?} -> {:?}", older, newer);
        }
    }

    #[test]
    fn only_sparkle_particles_flicker() {
        let mut fx = reference_fireworks();
        fx.set_intensity(0.0);
        fx.stars.clear();
        fx.burst(Vec2::new(450.0, 300.0), 0.5, PALETTE[0]);
        assert!(fx.particles.iter().any(|p| p.sparkle));
        assert!(fx.particles.iter().any(|p| !p.sparkle));

        // A quarter period apart the flicker term swings by its full amplitude
        let quarter = std::f64::consts::FRAC_PI_2 / PARTICLE_FLICKER_RATE as f64;
        let mut first = LinePainter::default();
        let mut second = LinePainter::default();
        fx.draw(1000.0, &mut first);
        fx.draw(1000.0 + quarter, &mut second);
        assert_eq!(first.circles.len(), fx.particle_count());
        for ((p, a), b) in fx.particles.iter().zip(&first.circles).zip(&second.circles) {
            if p.sparkle {
                assert!((a - b).abs() > 1e-3, "sparkle alpha {a} vs {b}");
            } else {
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn near_stars_sparkle_when_bright() {
        let mut fx = reference_fireworks();
        fx.set_intensity(1.0);
        let mut painter = LinePainter::default();
        let mut t = 0.0;
        for _ in 0..600 {
            fx.tick(t, &mut painter);
            t += FRAME_MS;
        }
        assert!(painter.crosses > 0);
        assert!(fx.stars.iter().any(|s| s.z > STAR_SPARKLE_DEPTH));
    }

    #[test]
    fn same_seed_gives_same_simulation() {
        let mut a = reference_fireworks();
        let mut b = reference_fireworks();
        a.set_intensity(1.0);
        b.set_intensity(1.0);
        run_frames(&mut a, 0.0, 300);
        run_frames(&mut b, 0.0, 300);
        assert_eq!(a.launched(), b.launched());
        assert_eq!(a.particle_count(), b.particle_count());
    }
}
