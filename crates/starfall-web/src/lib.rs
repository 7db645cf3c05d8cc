#![cfg(target_arch = "wasm32")]
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

use starfall_core::{BlowParams, Scene, Show};

mod canvas;
mod constants;
mod dom;
mod frame;
mod mic;
mod ui;

use constants::*;

type AppShow = Show<mic::MicInput>;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", CANVAS_ID))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!("#{} is not a canvas: {:?}", CANVAS_ID, e))?;
    let ctx = canvas
        .get_context("2d")
        .map_err(|e| anyhow::anyhow!("get_context failed: {:?}", e))?
        .ok_or_else(|| anyhow::anyhow!("2d context unavailable"))?
        .dyn_into::<web::CanvasRenderingContext2d>()
        .map_err(|e| anyhow::anyhow!("unexpected context type: {:?}", e))?;

    let store = dom::SessionStore::new(&window);
    let show: Rc<RefCell<AppShow>> = Rc::new(RefCell::new(Show::new(
        rand::random(),
        BlowParams::default(),
        Box::new(store),
    )));
    let mut painter = canvas::CanvasPainter::new(ctx);

    resize_canvas(&window, &canvas, &show);
    {
        let window_r = window.clone();
        let canvas_r = canvas.clone();
        let show_r = show.clone();
        dom::add_window_listener("resize", move || {
            resize_canvas(&window_r, &canvas_r, &show_r);
        });
    }

    go_to_scene(&document, &show, 0);
    ui::reflect_candle(&document, show.borrow().scenes().candle_out());
    show.borrow().clear(&mut painter);

    for (id, target) in SCENE_BUTTONS {
        let doc = document.clone();
        let show_c = show.clone();
        dom::add_click_listener(&document, id, move || go_to_scene(&doc, &show_c, target));
    }
    {
        let doc = document.clone();
        let show_c = show.clone();
        dom::add_click_listener(&document, CONTINUE_BTN, move || {
            if show_c.borrow().scenes().can_continue() {
                go_to_scene(&doc, &show_c, CONTINUE_SCENE);
            }
        });
    }
    for id in [FLAME_ID, CANDLE_ID] {
        let doc = document.clone();
        let show_c = show.clone();
        dom::add_click_listener(&document, id, move || {
            let tapped = show_c
                .borrow_mut()
                .flame_tap(instant::now(), dom::coarse_pointer());
            if let Some(reason) = tapped {
                log::info!("[candle] out ({:?})", reason);
                ui::reflect_candle(&doc, true);
            }
        });
    }

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        show: show.clone(),
        painter,
        document: document.clone(),
    }));
    let handle = frame::start_loop(frame_ctx);
    {
        let show_c = show.clone();
        dom::add_window_listener("pagehide", move || {
            handle.stop();
            show_c.borrow_mut().end_blow_detection();
        });
    }
    log::info!("[app] ready");
    Ok(())
}

fn resize_canvas(window: &web::Window, canvas: &web::HtmlCanvasElement, show: &Rc<RefCell<AppShow>>) {
    let mut show = show.borrow_mut();
    if show.resize(dom::viewport(window)) {
        let surface = show.fireworks().surface();
        canvas.set_width(surface.width);
        canvas.set_height(surface.height);
    }
}

fn go_to_scene(document: &web::Document, show: &Rc<RefCell<AppShow>>, index: i32) {
    let change = show.borrow_mut().set_scene(index);
    ui::show_scene(document, change.current.index());
    if change.current == Scene::Candle {
        ui::reflect_candle(document, show.borrow().scenes().candle_out());
        mic::begin_blow_detection(show);
    }
}
