//! WebXR host over `navigator.xr`, reached through `js_sys::Reflect` so no
//! unstable web-sys bindings are needed.

use crate::ar::{HostFuture, SessionFeatures, SessionMode, XrHost, XrSession};
use crate::camera::HostCamera;
use crate::dom;
use crate::error::CardError;
use glam::Mat4;
use js_sys::{Array, Float32Array, Function, Object, Reflect};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

fn get(target: &JsValue, key: &str) -> Result<JsValue, JsValue> {
    Reflect::get(target, &JsValue::from_str(key))
}

fn call(target: &JsValue, method: &str, args: &[JsValue]) -> Result<JsValue, JsValue> {
    let f: Function = get(target, method)?.dyn_into()?;
    let args: Array = args.iter().collect();
    f.apply(target, &args)
}

fn describe(e: &JsValue) -> String {
    get(e, "message")
        .ok()
        .and_then(|m| m.as_string())
        .or_else(|| e.as_string())
        .unwrap_or_else(|| format!("{:?}", e))
}

/// The running session as the frame loop sees it.
#[derive(Clone)]
pub struct ActiveXr {
    pub session: JsValue,
    pub reference_space: JsValue,
}

impl ActiveXr {
    /// Viewer pose for an `XRFrame`, first view only.
    pub fn viewer_camera(&self, frame: &JsValue) -> Option<HostCamera> {
        let pose = call(frame, "getViewerPose", &[self.reference_space.clone()]).ok()?;
        if pose.is_null() || pose.is_undefined() {
            return None;
        }
        let views: Array = get(&pose, "views").ok()?.dyn_into().ok()?;
        let view = views.get(0);
        let inverse = get(&get(&view, "transform").ok()?, "inverse").ok()?;
        let view_matrix: Float32Array = get(&inverse, "matrix").ok()?.dyn_into().ok()?;
        let projection: Float32Array = get(&view, "projectionMatrix").ok()?.dyn_into().ok()?;
        Some(HostCamera {
            view: Mat4::from_cols_slice(&view_matrix.to_vec()),
            projection: Mat4::from_cols_slice(&projection.to_vec()),
        })
    }

    /// Queue `callback` for the session's next frame. `false` if the
    /// session refused.
    pub fn request_animation_frame(&self, callback: &Function) -> bool {
        match call(&self.session, "requestAnimationFrame", &[callback.clone().into()]) {
            Ok(_) => true,
            Err(e) => {
                log::warn!("[ar] requestAnimationFrame failed: {}", describe(&e));
                false
            }
        }
    }
}

pub type ActiveSlot = Rc<RefCell<Option<ActiveXr>>>;

type Hook = Rc<RefCell<Option<Rc<dyn Fn()>>>>;

pub struct WebXrHost {
    active: ActiveSlot,
    /// Runs once a session is live and its frames can be requested.
    on_session_start: Hook,
    /// Runs after every session end, once the app has restored itself.
    on_session_end: Hook,
}

impl WebXrHost {
    pub fn new(active: ActiveSlot) -> Self {
        Self {
            active,
            on_session_start: Rc::new(RefCell::new(None)),
            on_session_end: Rc::new(RefCell::new(None)),
        }
    }

    pub fn set_session_start_hook(&self, hook: impl Fn() + 'static) {
        *self.on_session_start.borrow_mut() = Some(Rc::new(hook));
    }

    pub fn set_session_end_hook(&self, hook: impl Fn() + 'static) {
        *self.on_session_end.borrow_mut() = Some(Rc::new(hook));
    }

    fn xr(&self) -> Option<JsValue> {
        let navigator: JsValue = web::window()?.navigator().into();
        get(&navigator, "xr")
            .ok()
            .filter(|xr| !xr.is_undefined() && !xr.is_null())
    }

    fn session_init(features: &SessionFeatures) -> Result<Object, JsValue> {
        let init = Object::new();
        let required: Array = features.required.iter().map(|f| JsValue::from_str(f)).collect();
        let optional: Array = features.optional.iter().map(|f| JsValue::from_str(f)).collect();
        Reflect::set(&init, &"requiredFeatures".into(), &required)?;
        Reflect::set(&init, &"optionalFeatures".into(), &optional)?;
        let root = features
            .dom_overlay_root
            .and_then(|id| dom::window_document()?.get_element_by_id(id));
        if let Some(root) = root {
            let overlay = Object::new();
            Reflect::set(&overlay, &"root".into(), &root)?;
            Reflect::set(&init, &"domOverlay".into(), &overlay)?;
        }
        Ok(init)
    }

    /// Frames are only delivered once the session has a base layer, so
    /// attach a transparent WebGL one over the camera feed.
    fn attach_base_layer(session: &JsValue) -> Result<(), JsValue> {
        let document = dom::window_document().ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas: web::HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
        let attrs = Object::new();
        Reflect::set(&attrs, &"xrCompatible".into(), &JsValue::TRUE)?;
        Reflect::set(&attrs, &"alpha".into(), &JsValue::TRUE)?;
        let gl = canvas
            .get_context_with_context_options("webgl2", &attrs)?
            .ok_or_else(|| JsValue::from_str("webgl2 unavailable"))?;
        let ctor: Function = get(&js_sys::global(), "XRWebGLLayer")?.dyn_into()?;
        let layer = Reflect::construct(&ctor, &Array::of2(session, &gl))?;
        let state = Object::new();
        Reflect::set(&state, &"baseLayer".into(), &layer)?;
        call(session, "updateRenderState", &[state.into()])?;
        Ok(())
    }

    async fn start(
        &self,
        mode: SessionMode,
        features: &SessionFeatures,
    ) -> Result<Rc<dyn XrSession>, JsValue> {
        let xr = self.xr().ok_or_else(|| JsValue::from_str("WebXR not available"))?;
        let init = Self::session_init(features)?;
        let promise = call(&xr, "requestSession", &[mode.as_str().into(), init.into()])?;
        let session = JsFuture::from(js_sys::Promise::from(promise)).await?;

        let space = call(&session, "requestReferenceSpace", &["local-floor".into()]);
        let reference_space = match space {
            Ok(p) => JsFuture::from(js_sys::Promise::from(p)).await,
            Err(e) => Err(e),
        };
        let reference_space = match reference_space {
            Ok(space) => space,
            Err(e) => {
                // Never handed to the app: end it here.
                _ = call(&session, "end", &[]);
                return Err(e);
            }
        };
        if let Err(e) = Self::attach_base_layer(&session) {
            log::warn!("[ar] no base layer: {}", describe(&e));
        }

        *self.active.borrow_mut() = Some(ActiveXr {
            session: session.clone(),
            reference_space,
        });
        // Window frames may pause during an immersive session.
        let hook = self.on_session_start.borrow().clone();
        if let Some(hook) = hook {
            hook();
        }
        Ok(Rc::new(WebXrSession {
            session,
            active: self.active.clone(),
            on_session_end: self.on_session_end.clone(),
        }))
    }
}

impl XrHost for WebXrHost {
    fn is_available(&self) -> bool {
        self.xr().is_some()
    }

    fn supports_immersive_session(&self, mode: SessionMode) -> HostFuture<'_, bool> {
        Box::pin(async move {
            let Some(xr) = self.xr() else {
                return false;
            };
            let promise = match call(&xr, "isSessionSupported", &[mode.as_str().into()]) {
                Ok(p) => p,
                Err(e) => {
                    log::warn!("[ar] isSessionSupported failed: {}", describe(&e));
                    return false;
                }
            };
            match JsFuture::from(js_sys::Promise::from(promise)).await {
                Ok(v) => v.as_bool().unwrap_or(false),
                Err(e) => {
                    log::warn!("[ar] isSessionSupported rejected: {}", describe(&e));
                    false
                }
            }
        })
    }

    fn request_session<'a>(
        &'a self,
        mode: SessionMode,
        features: &'a SessionFeatures,
    ) -> HostFuture<'a, Result<Rc<dyn XrSession>, CardError>> {
        Box::pin(async move {
            self.start(mode, features)
                .await
                .map_err(|e| CardError::ArSessionRequestFailure(describe(&e)))
        })
    }
}

struct WebXrSession {
    session: JsValue,
    active: ActiveSlot,
    on_session_end: Hook,
}

impl XrSession for WebXrSession {
    fn end(&self) {
        if let Err(e) = call(&self.session, "end", &[]) {
            log::warn!("[ar] end failed: {}", describe(&e));
        }
    }

    fn on_end(&self, callback: Box<dyn FnOnce()>) {
        let active = self.active.clone();
        let hook = self.on_session_end.borrow().clone();
        let listener = Closure::once_into_js(move || {
            active.borrow_mut().take();
            callback();
            if let Some(hook) = hook {
                hook();
            }
        });
        let target: &web::EventTarget = self.session.unchecked_ref();
        if let Err(e) = target.add_event_listener_with_callback("end", listener.unchecked_ref()) {
            log::warn!("[ar] could not observe session end: {}", describe(&e));
        }
    }
}
