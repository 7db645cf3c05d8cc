//! Scene progression and candle state.
//!
//! The controller is deliberately thin: it maps the active scene to a spawn
//! intensity, tracks whether the candle is out, and decides when a manual tap
//! counts as the fallback trigger.

use crate::constants::{DOUBLE_TAP_MS, INTENSITY_CALM, INTENSITY_INTRO, INTENSITY_MEMORIES};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scene {
    Intro,
    Memories,
    Candle,
    Reveal,
    Letter,
}

impl Scene {
    pub const ALL: [Scene; 5] = [
        Scene::Intro,
        Scene::Memories,
        Scene::Candle,
        Scene::Reveal,
        Scene::Letter,
    ];

    /// Scene for `index`, clamped to the valid range.
    pub fn from_index(index: i32) -> Self {
        let i = index.clamp(0, Self::ALL.len() as i32 - 1) as usize;
        Self::ALL[i]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Fireworks spawn intensity while this scene is active.
    pub fn intensity(self) -> f32 {
        match self {
            Scene::Intro => INTENSITY_INTRO,
            Scene::Memories => INTENSITY_MEMORIES,
            Scene::Candle | Scene::Reveal | Scene::Letter => INTENSITY_CALM,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtinguishReason {
    Blow,
    Click,
    DoubleTap,
}

/// Persistence for the once-per-session candle flag.
pub trait CandleStore {
    fn load(&self) -> bool;
    fn save(&mut self, out: bool);
}

/// In-memory store; the default when no platform storage is available.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    pub out: bool,
}

impl CandleStore for MemoryStore {
    fn load(&self) -> bool {
        self.out
    }

    fn save(&mut self, out: bool) {
        self.out = out;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneChange {
    pub previous: Scene,
    pub current: Scene,
}

impl SceneChange {
    pub fn left_candle(&self) -> bool {
        self.previous == Scene::Candle && self.current != Scene::Candle
    }
}

#[derive(Clone, Debug)]
pub struct SceneController {
    scene: Scene,
    candle_out: bool,
    last_tap_ms: Option<f64>,
}

impl SceneController {
    pub fn new(candle_out: bool) -> Self {
        Self {
            scene: Scene::Intro,
            candle_out,
            last_tap_ms: None,
        }
    }

    pub fn scene(&self) -> Scene {
        self.scene
    }

    pub fn candle_out(&self) -> bool {
        self.candle_out
    }

    /// Blow detection should run this frame.
    pub fn candle_listening(&self) -> bool {
        self.scene == Scene::Candle && !self.candle_out
    }

    pub fn can_continue(&self) -> bool {
        self.candle_out
    }

    pub fn set_scene(&mut self, index: i32) -> SceneChange {
        let previous = self.scene;
        self.scene = Scene::from_index(index);
        log::info!("[scene] {:?} -> {:?}", previous, self.scene);
        SceneChange {
            previous,
            current: self.scene,
        }
    }

    /// Put the candle out. Returns `false` if it already was.
    pub fn extinguish(&mut self, reason: ExtinguishReason) -> bool {
        if self.candle_out {
            return false;
        }
        self.candle_out = true;
        log::info!("[scene] candle out ({:?})", reason);
        true
    }

    /// Manual fallback. A fine pointer counts a single click; a coarse
    /// (touch) pointer needs a double tap.
    pub fn flame_tap(&mut self, now_ms: f64, coarse_pointer: bool) -> Option<ExtinguishReason> {
        let previous = self.last_tap_ms.replace(now_ms);
        if self.candle_out {
            return None;
        }
        if !coarse_pointer {
            return Some(ExtinguishReason::Click);
        }
        match previous {
            Some(prev) if now_ms - prev < DOUBLE_TAP_MS => Some(ExtinguishReason::DoubleTap),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_index_is_clamped() {
        assert_eq!(Scene::from_index(-3), Scene::Intro);
        assert_eq!(Scene::from_index(2), Scene::Candle);
        assert_eq!(Scene::from_index(99), Scene::Letter);
        assert_eq!(Scene::Reveal.index(), 3);
    }

    #[test]
    fn intensity_profile_per_scene() {
        assert_eq!(Scene::Intro.intensity(), 0.05);
        assert_eq!(Scene::Memories.intensity(), 0.9);
        for s in [Scene::Candle, Scene::Reveal, Scene::Letter] {
            assert_eq!(s.intensity(), 0.35);
        }
    }

    #[test]
    fn listening_only_in_candle_scene_while_lit() {
        let mut c = SceneController::new(false);
        assert!(!c.candle_listening());
        c.set_scene(2);
        assert!(c.candle_listening());
        assert!(!c.can_continue());
        assert!(c.extinguish(ExtinguishReason::Blow));
        assert!(!c.extinguish(ExtinguishReason::Click));
        assert!(!c.candle_listening());
        assert!(c.can_continue());
    }

    #[test]
    fn persisted_candle_starts_out() {
        let mut c = SceneController::new(true);
        c.set_scene(2);
        assert!(!c.candle_listening());
        assert!(c.can_continue());
    }

    #[test]
    fn single_click_on_fine_pointer() {
        let mut c = SceneController::new(false);
        assert_eq!(c.flame_tap(10.0, false), Some(ExtinguishReason::Click));
    }

    #[test]
    fn touch_needs_a_quick_double_tap() {
        let mut c = SceneController::new(false);
        assert_eq!(c.flame_tap(1000.0, true), None);
        assert_eq!(c.flame_tap(1500.0, true), None);
        assert_eq!(c.flame_tap(1700.0, true), Some(ExtinguishReason::DoubleTap));
    }

    #[test]
    fn taps_after_candle_out_are_ignored() {
        let mut c = SceneController::new(true);
        assert_eq!(c.flame_tap(0.0, false), None);
    }

    #[test]
    fn memory_store_round_trips_flag() {
        let mut s = MemoryStore::default();
        assert!(!s.load());
        s.save(true);
        assert!(s.load());
    }
}
