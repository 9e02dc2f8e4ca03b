//! Browser event wiring: pointer input on the canvas and the control
//! buttons.

mod pointer;

pub use pointer::{wire_input_handlers, InputWiring};

use crate::app::CardApp;
use crate::ar;
use crate::dom;
use crate::frame::Clock;
use crate::xr::WebXrHost;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

pub fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

pub fn wire_control_buttons(
    document: &web::Document,
    app: &Rc<RefCell<CardApp>>,
    clock: &Rc<Clock>,
    xr_host: &Rc<WebXrHost>,
) {
    let app_rotate = app.clone();
    dom::add_click_listener(document, "btn-rotate", move || {
        app_rotate.borrow_mut().toggle_auto_rotate();
    });

    let app_flip = app.clone();
    let clock_flip = clock.clone();
    dom::add_click_listener(document, "btn-flip", move || {
        app_flip.borrow_mut().flip(clock_flip.elapsed());
    });

    let app_reset = app.clone();
    dom::add_click_listener(document, "btn-reset", move || {
        app_reset.borrow_mut().reset();
    });

    let app_ar = app.clone();
    let host = xr_host.clone();
    dom::add_click_listener(document, "btn-ar", move || {
        let app = app_ar.clone();
        let host = host.clone();
        spawn_local(async move {
            ar::toggle_ar(&app, &*host).await;
        });
    });
}
