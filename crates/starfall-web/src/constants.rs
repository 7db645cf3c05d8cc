// DOM wiring and WebAudio tuning constants for the web frontend

// Canvas
pub const CANVAS_ID: &str = "fxCanvas";

// Scene navigation
pub const SCENE_SELECTOR: &str = ".scene";
pub const SCENE_ATTR: &str = "data-scene";
pub const ACTIVE_CLASS: &str = "active";

// Buttons and their target scenes
pub const START_BTN: &str = "startBtn";
pub const OPEN_SURPRISE_BTN: &str = "openSurpriseBtn";
pub const CONTINUE_BTN: &str = "continueBtn";
pub const NEXT_BTN: &str = "nextBtn";
pub const RESTART_BTN: &str = "restartBtn";
pub const SCENE_BUTTONS: [(&str, i32); 4] = [
    (START_BTN, 1),
    (OPEN_SURPRISE_BTN, 2),
    (NEXT_BTN, 4),
    (RESTART_BTN, 0),
];
pub const CONTINUE_SCENE: i32 = 3;

// Candle
pub const FLAME_ID: &str = "flame";
pub const CANDLE_ID: &str = "candle";
pub const BLOW_HINT_ID: &str = "blowHint";
pub const FLAME_OFF_CLASS: &str = "off";
pub const HINT_OPACITY_LIT: &str = "1";
pub const HINT_OPACITY_OUT: &str = "0.72"; // de-emphasise once the candle is out
pub const CANDLE_STORAGE_KEY: &str = "kalsoom_candle_out_v1";

// Microphone analyser
pub const ANALYSER_FFT_SIZE: u32 = 1024; // samples per time-domain snapshot
pub const ANALYSER_SMOOTHING: f64 = 0.8;
pub const COARSE_POINTER_QUERY: &str = "(pointer: coarse)";
