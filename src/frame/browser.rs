//! Display loop: window animation frames normally, the immersive session's
//! frames while one is running.

use crate::app::CardApp;
use crate::frame::{Clock, FrameRequests, FrameSource, NullRenderer};
use crate::render;
use crate::xr::ActiveSlot;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

pub struct FrameContext<'a> {
    pub app: Rc<RefCell<CardApp>>,
    pub gpu: Option<render::GpuState<'a>>,
    pub canvas: web::HtmlCanvasElement,
    pub clock: Rc<Clock>,
    pub xr: ActiveSlot,
}

impl FrameContext<'_> {
    pub fn frame(&mut self, xr_frame: Option<&JsValue>) {
        let elapsed = self.clock.elapsed();
        let (w, h) = (self.canvas.width(), self.canvas.height());
        let mut app = self.app.borrow_mut();
        app.camera.set_viewport(w, h);
        if let (Some(frame), Some(active)) = (xr_frame, self.xr.borrow().as_ref()) {
            app.host_camera = active.viewer_camera(frame);
        }
        match &mut self.gpu {
            Some(g) => {
                g.resize_if_needed(w, h);
                app.frame(elapsed, g);
            }
            None => app.frame(elapsed, &mut NullRenderer::default()),
        }
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("[gpu] WebGPU init error: {:?}", e);
            None
        }
    }
}

pub struct FrameLoop {
    ctx: RefCell<FrameContext<'static>>,
    window_tick: RefCell<Option<Closure<dyn FnMut()>>>,
    requests: RefCell<FrameRequests>,
    xr_tick: RefCell<Option<Closure<dyn FnMut(f64, JsValue)>>>,
}

impl FrameLoop {
    /// Queue the next frame on whichever source is live.
    pub fn schedule(&self) {
        let active = self.ctx.borrow().xr.borrow().clone();
        let plan = self.requests.borrow_mut().plan(active.is_some());
        if let (Some(handle), Some(w)) = (plan.cancel_window, web::window()) {
            _ = w.cancel_animation_frame(handle);
        }
        match (plan.request, active) {
            (Some(FrameSource::Xr), Some(xr)) => {
                let requested = self
                    .xr_tick
                    .borrow()
                    .as_ref()
                    .is_some_and(|tick| xr.request_animation_frame(tick.as_ref().unchecked_ref()));
                if !requested {
                    self.requests.borrow_mut().xr_done();
                }
            }
            (Some(FrameSource::Window), _) => {
                let handle = match (web::window(), self.window_tick.borrow().as_ref()) {
                    (Some(w), Some(tick)) => {
                        w.request_animation_frame(tick.as_ref().unchecked_ref()).ok()
                    }
                    _ => None,
                };
                if let Some(handle) = handle {
                    self.requests.borrow_mut().window_requested(handle);
                }
            }
            _ => {}
        }
    }
}

/// Start animating. The loop keeps itself alive for the page lifetime.
pub fn start_loop(ctx: FrameContext<'static>) -> Rc<FrameLoop> {
    let frame_loop = Rc::new(FrameLoop {
        ctx: RefCell::new(ctx),
        window_tick: RefCell::new(None),
        requests: RefCell::new(FrameRequests::default()),
        xr_tick: RefCell::new(None),
    });

    let loop_window = frame_loop.clone();
    *frame_loop.window_tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        loop_window.requests.borrow_mut().window_done();
        loop_window.ctx.borrow_mut().frame(None);
        loop_window.schedule();
    }) as Box<dyn FnMut()>));

    let loop_xr = frame_loop.clone();
    *frame_loop.xr_tick.borrow_mut() = Some(Closure::wrap(Box::new(
        move |_time: f64, xr_frame: JsValue| {
            loop_xr.requests.borrow_mut().xr_done();
            loop_xr.ctx.borrow_mut().frame(Some(&xr_frame));
            loop_xr.schedule();
        },
    ) as Box<dyn FnMut(f64, JsValue)>));

    frame_loop.schedule();
    frame_loop
}
