//! Per-frame composition of fireworks, blow detection and scene state.
//!
//! `Show` is what a frontend drives: one `frame` call per display refresh,
//! plus scene changes and manual taps from the UI. The only asynchronous piece,
//! microphone acquisition, is split into `begin_blow_detection` and
//! `complete_blow_detection` so the frontend can await the platform request
//! without holding a borrow across it.

use crate::blow::{AcquireError, Activation, AmplitudeSource, BlowDetector, BlowParams};
use crate::fireworks::Fireworks;
use crate::paint::Painter;
use crate::scene::{CandleStore, ExtinguishReason, SceneChange, SceneController};
use crate::surface::Viewport;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    pub dt_scale: f32,
    /// Set on the frame where blow detection put the candle out.
    pub extinguished: Option<ExtinguishReason>,
}

pub struct Show<S: AmplitudeSource> {
    fireworks: Fireworks,
    detector: BlowDetector<S>,
    scenes: SceneController,
    store: Box<dyn CandleStore>,
}

impl<S: AmplitudeSource> Show<S> {
    pub fn new(seed: u64, params: BlowParams, store: Box<dyn CandleStore>) -> Self {
        let scenes = SceneController::new(store.load());
        let mut fireworks = Fireworks::new(seed);
        fireworks.set_intensity(scenes.scene().intensity());
        Self {
            fireworks,
            detector: BlowDetector::new(params),
            scenes,
            store,
        }
    }

    pub fn fireworks(&self) -> &Fireworks {
        &self.fireworks
    }

    pub fn detector(&self) -> &BlowDetector<S> {
        &self.detector
    }

    pub fn scenes(&self) -> &SceneController {
        &self.scenes
    }

    pub fn resize(&mut self, viewport: Viewport) -> bool {
        self.fireworks.resize(viewport)
    }

    pub fn set_intensity(&mut self, v: f32) {
        self.fireworks.set_intensity(v);
    }

    pub fn clear<P: Painter + ?Sized>(&self, painter: &mut P) {
        self.fireworks.clear(painter);
    }

    /// Switch scene and apply its intensity profile. Leaving the candle scene
    /// ends any blow detection in progress.
    pub fn set_scene(&mut self, index: i32) -> SceneChange {
        let change = self.scenes.set_scene(index);
        self.fireworks.set_intensity(change.current.intensity());
        if change.left_candle() {
            self.detector.end();
        }
        change
    }

    /// Request microphone monitoring for the candle. `None` when the candle
    /// is not listening or a request was already made this activation.
    pub fn begin_blow_detection(&mut self) -> Option<Activation> {
        if !self.scenes.candle_listening() {
            return None;
        }
        self.detector.begin()
    }

    pub fn complete_blow_detection(
        &mut self,
        activation: Activation,
        result: Result<S, AcquireError>,
        now_ms: f64,
    ) -> bool {
        self.detector.complete(activation, result, now_ms)
    }

    pub fn end_blow_detection(&mut self) {
        self.detector.end();
    }

    /// Advance and draw one frame, then sample the microphone if the candle
    /// is listening.
    pub fn frame<P: Painter + ?Sized>(&mut self, t_ms: f64, painter: &mut P) -> FrameReport {
        let dt_scale = self.fireworks.tick(t_ms, painter);
        let mut extinguished = None;
        if self.scenes.candle_listening()
            && self.detector.sample(t_ms)
            && self.extinguish(ExtinguishReason::Blow)
        {
            extinguished = Some(ExtinguishReason::Blow);
        }
        FrameReport {
            dt_scale,
            extinguished,
        }
    }

    /// Put the candle out: persist the flag, release the microphone and puff
    /// smoke. Returns `false` if it was already out.
    pub fn extinguish(&mut self, reason: ExtinguishReason) -> bool {
        if !self.scenes.extinguish(reason) {
            return false;
        }
        self.store.save(true);
        self.detector.end();
        self.fireworks.puff_at_center();
        true
    }

    /// Manual fallback from a click or tap on the candle.
    pub fn flame_tap(&mut self, now_ms: f64, coarse_pointer: bool) -> Option<ExtinguishReason> {
        let reason = self.scenes.flame_tap(now_ms, coarse_pointer)?;
        self.extinguish(reason).then_some(reason)
    }
}
