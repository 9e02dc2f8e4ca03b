//! DOM side of the UI surface: tooltip, banners, status pill and the
//! control layout switch for AR.

use crate::constants::{LOADING_HIDE_MS, NOTIFICATION_MS};
use crate::dom;
use crate::ui::{CursorHint, StatusTone, UiSurface};
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

const BUTTON_IDLE_BG: &str = "linear-gradient(135deg, #00d4ff, #0099cc)";
const BUTTON_ACTIVE_BG: &str = "linear-gradient(135deg, #ff6b6b, #ee5a5a)";
const NOTIFICATION_STYLE: &str = "position:fixed; top:80px; left:50%; transform:translateX(-50%); \
    background:rgba(0, 212, 255, 0.9); color:white; padding:15px 30px; border-radius:10px; \
    font-size:14px; z-index:1000;";
const AR_CONTROLS_STYLE: &str = "position:fixed !important; bottom:20px !important; right:20px !important; \
    left:auto !important; top:auto !important; transform:none !important; width:auto !important; \
    max-width:130px !important; flex-direction:column !important; display:flex !important; \
    gap:10px !important; background:rgba(0,0,0,0.5) !important; padding:15px !important; \
    border-radius:15px !important;";
// Hidden while in AR.
const DESKTOP_ONLY: [&str; 4] = ["btn-rotate", "btn-reset", "info-panel", "ar-status"];

pub struct DomUi {
    document: web::Document,
}

impl DomUi {
    pub fn new(document: web::Document) -> Self {
        Self { document }
    }

    fn set_style(&self, id: &str, property: &str, value: &str) {
        if let Some(el) = dom::html_element(&self.document, id) {
            _ = el.style().set_property(property, value);
        }
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = self.document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }
}

/// Fade the loading screen out shortly after start-up.
pub fn hide_loading_later(document: &web::Document) {
    let document = document.clone();
    dom::set_timeout(LOADING_HIDE_MS, move || {
        if let Some(el) = document.get_element_by_id("loading") {
            _ = el.class_list().add_1("hidden");
        }
    });
}

impl UiSurface for DomUi {
    fn show_tooltip(&mut self, text: &str, x: f32, y: f32) {
        if let Some(el) = dom::html_element(&self.document, "tooltip") {
            el.set_text_content(Some(text));
            _ = el.style().set_property("left", &format!("{x}px"));
            _ = el.style().set_property("top", &format!("{y}px"));
            _ = el.class_list().add_1("visible");
        }
    }

    fn hide_tooltip(&mut self) {
        if let Some(el) = self.document.get_element_by_id("tooltip") {
            _ = el.class_list().remove_1("visible");
        }
    }

    fn set_cursor(&mut self, cursor: CursorHint) {
        let value = match cursor {
            CursorHint::Default => "default",
            CursorHint::Pointer => "pointer",
        };
        if let Some(body) = self.document.body() {
            _ = body.style().set_property("cursor", value);
        }
    }

    fn notify(&mut self, message: &str) {
        let (Ok(el), Some(body)) = (self.document.create_element("div"), self.document.body())
        else {
            return;
        };
        _ = el.set_attribute("style", NOTIFICATION_STYLE);
        el.set_text_content(Some(message));
        if body.append_child(&el).is_err() {
            return;
        }
        dom::set_timeout(NOTIFICATION_MS, move || el.remove());
    }

    fn set_ar_status(&mut self, text: &str, tone: StatusTone) {
        let border = match tone {
            StatusTone::Ready => "#00d4ff",
            StatusTone::Ok => "#00ff88",
            StatusTone::Error => "#ff6b6b",
        };
        self.set_text("ar-status", text);
        self.set_style("ar-status", "border-color", border);
    }

    fn set_auto_rotate_button(&mut self, rotating: bool) {
        let (label, bg) = if rotating {
            ("Stop Rotation", BUTTON_ACTIVE_BG)
        } else {
            ("Auto Rotate", BUTTON_IDLE_BG)
        };
        self.set_text("btn-rotate", label);
        self.set_style("btn-rotate", "background", bg);
    }

    fn set_ar_layout(&mut self, in_ar: bool) {
        if let Some(body) = self.document.body() {
            let classes = body.class_list();
            _ = if in_ar {
                classes.add_1("ar-active")
            } else {
                classes.remove_1("ar-active")
            };
        }
        self.set_text("btn-ar", if in_ar { "Exit AR" } else { "Enter AR" });
        if let Some(controls) = self.document.get_element_by_id("controls") {
            _ = controls.set_attribute("style", if in_ar { AR_CONTROLS_STYLE } else { "" });
        }
        let display = if in_ar { "none" } else { "" };
        for id in DESKTOP_ONLY {
            self.set_style(id, "display", display);
        }
    }

    fn copy_to_clipboard(&mut self, text: &str) {
        let Some(window) = web::window() else {
            return;
        };
        // navigator.clipboard is only bound behind an unstable web-sys cfg.
        let navigator: JsValue = window.navigator().into();
        let clipboard = js_sys::Reflect::get(&navigator, &JsValue::from_str("clipboard"))
            .ok()
            .filter(|c| !c.is_undefined());
        let write = clipboard.as_ref().and_then(|c| {
            js_sys::Reflect::get(c, &JsValue::from_str("writeText"))
                .ok()
                .and_then(|f| f.dyn_into::<js_sys::Function>().ok())
        });
        match (clipboard, write) {
            (Some(c), Some(f)) => {
                if let Err(e) = f.call1(&c, &JsValue::from_str(text)) {
                    log::warn!("[pick] clipboard write failed: {:?}", e);
                }
            }
            _ => log::warn!("[pick] clipboard unavailable"),
        }
    }

    fn open_url(&mut self, url: &str) {
        if let Some(window) = web::window() {
            if let Err(e) = window.open_with_url_and_target(url, "_blank") {
                log::warn!("[pick] window.open failed: {:?}", e);
            }
        }
    }
}
