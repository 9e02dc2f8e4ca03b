use crate::app::CardApp;
use crate::picking::client_to_ndc;
use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[derive(Clone)]
pub struct InputWiring {
    pub canvas: web::HtmlCanvasElement,
    pub app: Rc<RefCell<CardApp>>,
}

/// Pointer position in canvas backing pixels.
#[inline]
fn pointer_canvas_px(ev: &web::MouseEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    let x_css = ev.client_x() as f32 - rect.left() as f32;
    let y_css = ev.client_y() as f32 - rect.top() as f32;
    let sx = (x_css / rect.width().max(1.0) as f32) * canvas.width() as f32;
    let sy = (y_css / rect.height().max(1.0) as f32) * canvas.height() as f32;
    Vec2::new(sx, sy)
}

/// Pointer position in normalized device coordinates, y up.
#[inline]
fn pointer_ndc(ev: &web::MouseEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    client_to_ndc(
        ev.client_x() as f32 - rect.left() as f32,
        ev.client_y() as f32 - rect.top() as f32,
        rect.width() as f32,
        rect.height() as f32,
    )
}

pub fn wire_input_handlers(w: InputWiring) {
    wire_pointermove(&w);
    wire_pointerdown(&w);
    wire_pointerup(&w);
    wire_click(&w);
    wire_wheel(&w);
}

fn wire_pointermove(w: &InputWiring) {
    let w = w.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let ndc = pointer_ndc(&ev, &w.canvas);
        let client = Vec2::new(ev.client_x() as f32, ev.client_y() as f32);
        let mut app = w.app.borrow_mut();
        if app.orbit.is_dragging() {
            let px = pointer_canvas_px(&ev, &w.canvas);
            app.orbit.drag_to(px, w.canvas.height() as f32);
        }
        app.hover(ndc, client);
    }) as Box<dyn FnMut(_)>);

    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

fn wire_pointerdown(w: &InputWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let px = pointer_canvas_px(&ev, &w.canvas);
        w.app.borrow_mut().orbit.begin_drag(px);
        _ = w.canvas.set_pointer_capture(ev.pointer_id());
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener
        .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointerup(w: &InputWiring) {
    let w = w.clone();
    let closure = Closure::wrap(Box::new(move |_ev: web::PointerEvent| {
        w.app.borrow_mut().orbit.end_drag();
    }) as Box<dyn FnMut(_)>);
    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

fn wire_click(w: &InputWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
        let ndc = pointer_ndc(&ev, &w.canvas);
        if w.app.borrow_mut().click(ndc).is_none() {
            log::debug!("[mouse] click missed ({:.2},{:.2})", ndc.x, ndc.y);
        }
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener
        .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_wheel(w: &InputWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::WheelEvent| {
        let delta = ev.delta_y();
        if delta != 0.0 {
            w.app.borrow_mut().orbit.dolly(delta.signum() as f32);
            ev.prevent_default();
        }
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener
        .add_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref());
    closure.forget();
}
