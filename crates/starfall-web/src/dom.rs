use crate::constants::{CANDLE_STORAGE_KEY, COARSE_POINTER_QUERY};
use starfall_core::{CandleStore, Viewport};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let closure = Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
        _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    } else {
        log::warn!("[dom] missing #{}", element_id);
    }
}

pub fn add_window_listener(event: &str, mut handler: impl FnMut() + 'static) {
    if let Some(window) = web::window() {
        let closure = Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
        _ = window.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

/// Current viewport in CSS pixels plus the raw device pixel ratio.
pub fn viewport(window: &web::Window) -> Viewport {
    let css = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
    };
    Viewport::new(
        css(window.inner_width()),
        css(window.inner_height()),
        window.device_pixel_ratio(),
    )
}

pub fn coarse_pointer() -> bool {
    web::window()
        .and_then(|w| w.match_media(COARSE_POINTER_QUERY).ok().flatten())
        .map(|m| m.matches())
        .unwrap_or(false)
}

/// Candle flag kept in `sessionStorage` so it survives reloads within the tab.
pub struct SessionStore {
    storage: Option<web::Storage>,
}

impl SessionStore {
    pub fn new(window: &web::Window) -> Self {
        let storage = window.session_storage().ok().flatten();
        if storage.is_none() {
            log::warn!("[dom] sessionStorage unavailable; candle state will not persist");
        }
        Self { storage }
    }
}

impl CandleStore for SessionStore {
    fn load(&self) -> bool {
        self.storage
            .as_ref()
            .and_then(|s| s.get_item(CANDLE_STORAGE_KEY).ok().flatten())
            .is_some_and(|v| v == "1")
    }

    fn save(&mut self, out: bool) {
        if let Some(s) = &self.storage {
            let res = if out {
                s.set_item(CANDLE_STORAGE_KEY, "1")
            } else {
                s.remove_item(CANDLE_STORAGE_KEY)
            };
            if let Err(e) = res {
                log::warn!("[dom] sessionStorage write failed: {:?}", e);
            }
        }
    }
}
