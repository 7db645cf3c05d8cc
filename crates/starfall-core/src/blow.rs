//! Microphone blow detection.
//!
//! A leaky integrator over the waveform RMS: sustained input above the quiet
//! floor raises the score, anything else drains it. Brief spikes such as a
//! cough decay away before reaching the trigger, while a real exhale crosses
//! it in roughly 0.3–0.6 s.
//!
//! Acquisition of the input device is asynchronous on every platform, so the
//! detector hands out an [`Activation`] token from [`BlowDetector::begin`] and
//! accepts the result later through [`BlowDetector::complete`]. Tokens from an
//! activation that has since been ended are stale and their device is
//! released immediately.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AcquireError {
    #[error("audio input is not supported in this environment")]
    Unsupported,
    #[error("microphone permission denied: {0}")]
    PermissionDenied(String),
    #[error("audio device error: {0}")]
    Device(String),
}

/// Live waveform provider owned by the detector while listening.
pub trait AmplitudeSource {
    /// Fill `buf` with the latest unsigned 8-bit waveform snapshot centred on
    /// 128. Must not block.
    fn read_time_domain(&mut self, buf: &mut [u8]);

    /// Release the underlying device. Called at most once by the detector but
    /// implementations should tolerate repeats.
    fn release(&mut self);
}

/// Tuned classifier constants. These match one reference device profile and
/// are a fixed policy rather than something to adapt at runtime.
#[derive(Clone, Debug, PartialEq)]
pub struct BlowParams {
    /// RMS at or below this is treated as silence.
    pub quiet_floor: f32,
    /// RMS at which blow strength saturates to 1.
    pub strong: f32,
    /// Score gained per second at full strength.
    pub rise_per_sec: f32,
    /// Score lost per second while below the floor.
    pub decay_per_sec: f32,
    pub score_cap: f32,
    pub trigger: f32,
    /// Samples per waveform snapshot.
    pub window: usize,
}

impl Default for BlowParams {
    fn default() -> Self {
        Self {
            quiet_floor: 0.06,
            strong: 0.12,
            rise_per_sec: 3.0,
            decay_per_sec: 1.8,
            score_cap: 1.2,
            trigger: 1.0,
            window: 1024,
        }
    }
}

/// Root-mean-square deviation of an 8-bit waveform from its midpoint, in
/// \[0, 1\].
pub fn rms_u8(buf: &[u8]) -> f32 {
    if buf.is_empty() {
        return 0.0;
    }
    let sum: f32 = buf
        .iter()
        .map(|&b| {
            let v = (b as f32 - 128.0) / 128.0;
            v * v
        })
        .sum();
    (sum / buf.len() as f32).sqrt()
}

/// Map RMS through the threshold window to a blow strength in \[0, 1\].
#[inline]
pub fn blow_strength(rms: f32, params: &BlowParams) -> f32 {
    ((rms - params.quiet_floor) / (params.strong - params.quiet_floor)).clamp(0.0, 1.0)
}

/// Integrated blow score with its own sample clock.
#[derive(Clone, Debug)]
pub struct BlowScore {
    score: f32,
    last_ms: f64,
}

impl BlowScore {
    pub fn new(now_ms: f64) -> Self {
        Self {
            score: 0.0,
            last_ms: now_ms,
        }
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.score
    }

    /// Integrate one sample of `strength` taken at `now_ms`; returns the new
    /// score. Non-monotonic timestamps integrate as zero elapsed time.
    pub fn integrate(&mut self, strength: f32, now_ms: f64, params: &BlowParams) -> f32 {
        let dt = ((now_ms - self.last_ms) / 1000.0).max(0.0) as f32;
        self.last_ms = now_ms;
        let rate = if strength > 0.0 {
            params.rise_per_sec * strength
        } else {
            -params.decay_per_sec
        };
        self.score = (self.score + rate * dt).clamp(0.0, params.score_cap);
        self.score
    }
}

/// Token for one pending acquisition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Activation {
    generation: u64,
}

enum Phase<S> {
    Idle,
    Pending,
    Listening { source: S, score: BlowScore },
    Fired,
    Unavailable,
}

pub struct BlowDetector<S: AmplitudeSource> {
    phase: Phase<S>,
    generation: u64,
    params: BlowParams,
    buf: Vec<u8>,
}

impl<S: AmplitudeSource> BlowDetector<S> {
    pub fn new(params: BlowParams) -> Self {
        Self {
            phase: Phase::Idle,
            generation: 0,
            buf: vec![128; params.window],
            params,
        }
    }

    pub fn params(&self) -> &BlowParams {
        &self.params
    }

    /// Start an activation. Returns `None` if one is already in progress
    /// (pending, listening, fired or unavailable) until `end` is called.
    pub fn begin(&mut self) -> Option<Activation> {
        match self.phase {
            Phase::Idle => {
                self.phase = Phase::Pending;
                log::info!("[mic] requesting input (generation {})", self.generation);
                Some(Activation {
                    generation: self.generation,
                })
            }
            _ => None,
        }
    }

    /// Deliver the outcome of an acquisition started by `begin`.
    ///
    /// Returns `true` when the detector starts listening. Stale results are
    /// discarded (their source released); failures disable the detector for
    /// the rest of the activation.
    pub fn complete(
        &mut self,
        activation: Activation,
        result: Result<S, AcquireError>,
        now_ms: f64,
    ) -> bool {
        let current = activation.generation == self.generation;
        if !current || !matches!(self.phase, Phase::Pending) {
            if let Ok(mut source) = result {
                source.release();
            }
            log::info!(
                "[mic] discarding stale acquisition (generation {})",
                activation.generation
            );
            return false;
        }
        match result {
            Ok(source) => {
                self.phase = Phase::Listening {
                    source,
                    score: BlowScore::new(now_ms),
                };
                log::info!("[mic] listening");
                true
            }
            Err(e) => {
                log::warn!("[mic] unavailable, relying on manual fallback: {}", e);
                self.phase = Phase::Unavailable;
                false
            }
        }
    }

    /// One classification step. Returns `true` exactly once per activation,
    /// on the sample where the score crosses the trigger; the device is
    /// released at that point.
    pub fn sample(&mut self, now_ms: f64) -> bool {
        let Phase::Listening { source, score } = &mut self.phase else {
            return false;
        };
        source.read_time_domain(&mut self.buf);
        let strength = blow_strength(rms_u8(&self.buf), &self.params);
        let value = score.integrate(strength, now_ms, &self.params);
        if value >= self.params.trigger {
            log::info!("[mic] blow detected (score {:.2})", value);
            self.release_into(Phase::Fired);
            return true;
        }
        false
    }

    /// Leave the activation: releases any device and invalidates pending
    /// acquisitions. Safe to call at any time, any number of times.
    pub fn end(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if !matches!(self.phase, Phase::Idle) {
            log::info!("[mic] detection ended");
        }
        self.release_into(Phase::Idle);
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, Phase::Pending)
    }

    pub fn is_listening(&self) -> bool {
        matches!(self.phase, Phase::Listening { .. })
    }

    pub fn has_fired(&self) -> bool {
        matches!(self.phase, Phase::Fired)
    }

    /// Current integrated score; 0 when not listening.
    pub fn score(&self) -> f32 {
        match &self.phase {
            Phase::Listening { score, .. } => score.value(),
            _ => 0.0,
        }
    }

    fn release_into(&mut self, next: Phase<S>) {
        if let Phase::Listening { mut source, .. } = std::mem::replace(&mut self.phase, next) {
            source.release();
        }
    }
}

impl<S: AmplitudeSource> Drop for BlowDetector<S> {
    fn drop(&mut self) {
        self.release_into(Phase::Idle);
    }
}
