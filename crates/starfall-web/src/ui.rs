use crate::constants::*;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Mark the `.scene` element whose `data-scene` matches `index` as active.
pub fn show_scene(document: &web::Document, index: usize) {
    let Ok(list) = document.query_selector_all(SCENE_SELECTOR) else {
        return;
    };
    for i in 0..list.length() {
        let Some(el) = list.get(i).and_then(|n| n.dyn_into::<web::Element>().ok()) else {
            continue;
        };
        let matches = el
            .get_attribute(SCENE_ATTR)
            .and_then(|v| v.parse::<usize>().ok())
            == Some(index);
        let cl = el.class_list();
        _ = if matches {
            cl.add_1(ACTIVE_CLASS)
        } else {
            cl.remove_1(ACTIVE_CLASS)
        };
    }
}

/// Reflect the candle state: flame, continue button and hint.
pub fn reflect_candle(document: &web::Document, out: bool) {
    if let Some(flame) = document.get_element_by_id(FLAME_ID) {
        _ = flame.class_list().toggle_with_force(FLAME_OFF_CLASS, out);
    }
    if let Some(btn) = document
        .get_element_by_id(CONTINUE_BTN)
        .and_then(|el| el.dyn_into::<web::HtmlButtonElement>().ok())
    {
        btn.set_disabled(!out);
    }
    if let Some(hint) = document
        .get_element_by_id(BLOW_HINT_ID)
        .and_then(|el| el.dyn_into::<web::HtmlElement>().ok())
    {
        let opacity = if out { HINT_OPACITY_OUT } else { HINT_OPACITY_LIT };
        _ = hint.style().set_property("opacity", opacity);
    }
}
