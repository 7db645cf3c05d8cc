//! Microphone input through `getUserMedia` and an `AnalyserNode`.

use crate::constants::{ANALYSER_FFT_SIZE, ANALYSER_SMOOTHING};
use starfall_core::{AcquireError, AmplitudeSource, Show};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

/// Live microphone graph: stream -> source node -> analyser.
///
/// Every handle is optional so a partially built graph can be torn down by
/// the same `release` path, which also runs on drop.
pub struct MicInput {
    stream: Option<web::MediaStream>,
    ctx: Option<web::AudioContext>,
    source: Option<web::MediaStreamAudioSourceNode>,
    analyser: Option<web::AnalyserNode>,
}

impl AmplitudeSource for MicInput {
    fn read_time_domain(&mut self, buf: &mut [u8]) {
        match &self.analyser {
            Some(a) => a.get_byte_time_domain_data(buf),
            None => buf.fill(128),
        }
    }

    fn release(&mut self) {
        // Each step runs regardless of earlier failures
        if let Some(stream) = self.stream.take() {
            for track in stream.get_tracks().iter() {
                if let Ok(track) = track.dyn_into::<web::MediaStreamTrack>() {
                    track.stop();
                }
            }
        }
        if let Some(source) = self.source.take() {
            if let Err(e) = source.disconnect() {
                log::warn!("[mic] source disconnect failed: {:?}", e);
            }
        }
        if let Some(analyser) = self.analyser.take() {
            if let Err(e) = analyser.disconnect() {
                log::warn!("[mic] analyser disconnect failed: {:?}", e);
            }
        }
        if let Some(ctx) = self.ctx.take() {
            if let Err(e) = ctx.close() {
                log::warn!("[mic] AudioContext close failed: {:?}", e);
            }
        }
    }
}

impl Drop for MicInput {
    fn drop(&mut self) {
        self.release();
    }
}

fn audio_constraints() -> web::MediaStreamConstraints {
    let audio = js_sys::Object::new();
    for key in ["echoCancellation", "noiseSuppression", "autoGainControl"] {
        _ = js_sys::Reflect::set(&audio, &JsValue::from_str(key), &JsValue::TRUE);
    }
    let constraints = js_sys::Object::new();
    _ = js_sys::Reflect::set(&constraints, &JsValue::from_str("audio"), &audio);
    constraints.unchecked_into()
}

fn classify(e: &JsValue) -> AcquireError {
    let name = js_sys::Reflect::get(e, &JsValue::from_str("name"))
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_default();
    let detail = format!("{:?}", e);
    match name.as_str() {
        "NotAllowedError" | "SecurityError" => AcquireError::PermissionDenied(detail),
        _ => AcquireError::Device(detail),
    }
}

fn device_err(e: JsValue) -> AcquireError {
    AcquireError::Device(format!("{:?}", e))
}

/// Request the microphone and build the analyser graph.
pub async fn acquire() -> Result<MicInput, AcquireError> {
    let window = web::window().ok_or(AcquireError::Unsupported)?;
    let navigator = window.navigator();
    let supported = js_sys::Reflect::get(&navigator, &JsValue::from_str("mediaDevices"))
        .map(|v| !v.is_undefined() && !v.is_null())
        .unwrap_or(false);
    if !supported {
        return Err(AcquireError::Unsupported);
    }
    let devices = navigator
        .media_devices()
        .map_err(|_| AcquireError::Unsupported)?;
    let promise = devices
        .get_user_media_with_constraints(&audio_constraints())
        .map_err(|e| classify(&e))?;
    let stream: web::MediaStream = JsFuture::from(promise)
        .await
        .map_err(|e| classify(&e))?
        .dyn_into()
        .map_err(device_err)?;

    let mut input = MicInput {
        stream: Some(stream.clone()),
        ctx: None,
        source: None,
        analyser: None,
    };
    let ctx = web::AudioContext::new().map_err(device_err)?;
    input.ctx = Some(ctx.clone());
    let analyser = ctx.create_analyser().map_err(device_err)?;
    analyser.set_fft_size(ANALYSER_FFT_SIZE);
    analyser.set_smoothing_time_constant(ANALYSER_SMOOTHING);
    input.analyser = Some(analyser.clone());
    let source = ctx.create_media_stream_source(&stream).map_err(device_err)?;
    input.source = Some(source.clone());
    source
        .connect_with_audio_node(&analyser)
        .map_err(device_err)?;
    Ok(input)
}

/// Start an acquisition for the candle if one is due. The render loop keeps
/// running while the permission prompt is open; a result that arrives after
/// the candle scene was left is discarded by the detector.
pub fn begin_blow_detection(show: &Rc<RefCell<Show<MicInput>>>) {
    let Some(activation) = show.borrow_mut().begin_blow_detection() else {
        return;
    };
    let show = show.clone();
    spawn_local(async move {
        let result = acquire().await;
        show.borrow_mut()
            .complete_blow_detection(activation, result, instant::now());
    });
}
