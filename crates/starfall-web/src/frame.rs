use crate::canvas::CanvasPainter;
use crate::mic::MicInput;
use crate::ui;
use starfall_core::Show;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub show: Rc<RefCell<Show<MicInput>>>,
    pub painter: CanvasPainter,
    pub document: web::Document,
}

impl FrameContext {
    pub fn frame(&mut self, t_ms: f64) {
        let report = self.show.borrow_mut().frame(t_ms, &mut self.painter);
        if report.extinguished.is_some() {
            ui::reflect_candle(&self.document, true);
        }
    }
}

/// Handle to a running animation loop. Stopping it makes the next frame
/// return without re-arming.
#[derive(Clone)]
pub struct LoopHandle {
    running: Rc<Cell<bool>>,
}

impl LoopHandle {
    pub fn stop(&self) {
        if self.running.replace(false) {
            log::info!("[fx] frame loop stopped");
        }
    }
}

type TickSlot = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) -> LoopHandle {
    let running = Rc::new(Cell::new(true));
    let tick: TickSlot = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let running_tick = running.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move |t_ms: f64| {
        if !running_tick.get() {
            return;
        }
        frame_ctx.borrow_mut().frame(t_ms);
        request_frame(&tick_clone);
    }) as Box<dyn FnMut(f64)>));
    request_frame(&tick);
    LoopHandle { running }
}

fn request_frame(tick: &TickSlot) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
