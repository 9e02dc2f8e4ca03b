//! Interactive 3D business card with an AR viewing mode.
//!
//! The scene, interaction and animation core builds on every target; the
//! browser glue (DOM, WebGPU, WebXR) only on `wasm32`.

pub mod app;
pub mod ar;
pub mod builder;
pub mod camera;
pub mod config;
pub mod constants;
pub mod error;
pub mod frame;
pub mod particles;
pub mod picking;
pub mod placeholder;
pub mod scene;
pub mod ui;
pub mod view;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod events;
#[cfg(target_arch = "wasm32")]
mod overlay;
#[cfg(target_arch = "wasm32")]
mod render;
#[cfg(target_arch = "wasm32")]
mod textures;
#[cfg(target_arch = "wasm32")]
mod xr;

#[cfg(target_arch = "wasm32")]
pub use web_entry::start;

#[cfg(target_arch = "wasm32")]
mod web_entry {
    use crate::app::CardApp;
    use crate::config::CardConfig;
    use crate::error::ConfigError;
    use crate::frame::browser::{self, FrameContext};
    use crate::frame::Clock;
    use crate::xr::{ActiveSlot, WebXrHost};
    use crate::{events, overlay};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::spawn_local;
    use web_sys as web;

    #[wasm_bindgen(start)]
    pub fn start() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();
        log::info!("card-web starting");

        spawn_local(async move {
            if let Err(e) = init().await {
                log::error!("init error: {:?}", e);
            }
        });
        Ok(())
    }

    /// `window.CARD_CONFIG` when the page defines one, else the bundled file.
    fn load_config(window: &web::Window) -> anyhow::Result<CardConfig> {
        let global = js_sys::Reflect::get(window, &JsValue::from_str("CARD_CONFIG"))
            .unwrap_or(JsValue::UNDEFINED);
        if !global.is_undefined() && !global.is_null() {
            let parsed = serde_wasm_bindgen::from_value::<CardConfig>(global)
                .map_err(|e| ConfigError::Host(e.to_string()));
            match parsed {
                Ok(config) => {
                    log::info!("[config] using window.CARD_CONFIG");
                    return Ok(config);
                }
                Err(e) => log::warn!("[config] window.CARD_CONFIG rejected: {}", e),
            }
        }
        log::info!("[config] using bundled card_config.json");
        Ok(CardConfig::bundled()?)
    }

    async fn init() -> anyhow::Result<()> {
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| anyhow::anyhow!("no document"))?;

        let canvas: web::HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| anyhow::anyhow!("missing #canvas"))?
            .dyn_into::<web::HtmlCanvasElement>()
            .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

        let config = load_config(&window)?;
        let mut rng = StdRng::from_entropy();
        let app = CardApp::new(
            config,
            &mut rng,
            Box::new(overlay::DomUi::new(document.clone())),
        );
        let app = Rc::new(RefCell::new(app));
        let clock = Rc::new(Clock::new());

        events::wire_canvas_resize(&canvas);
        events::wire_input_handlers(events::InputWiring {
            canvas: canvas.clone(),
            app: app.clone(),
        });

        let active: ActiveSlot = Rc::new(RefCell::new(None));
        let xr_host = Rc::new(WebXrHost::new(active.clone()));
        events::wire_control_buttons(&document, &app, &clock, &xr_host);

        let gpu = browser::init_gpu(&canvas).await;
        let frame_loop = browser::start_loop(FrameContext {
            app,
            gpu,
            canvas,
            clock,
            xr: active,
        });
        let start_loop = frame_loop.clone();
        xr_host.set_session_start_hook(move || start_loop.schedule());
        // The session's frames stop with it; go back to window frames.
        xr_host.set_session_end_hook(move || frame_loop.schedule());

        overlay::hide_loading_later(&document);
        Ok(())
    }
}
