//! Rasterises texture sources on an offscreen 2D canvas and reads the
//! pixels back for upload.

#![allow(deprecated)] // set_fill_style/set_stroke_style(&JsValue)

use crate::constants::TEXT_CANVAS_PX;
use crate::error::CardError;
use crate::placeholder::{
    qr_cells, ACCENT, BADGE_GLYPH_SCALE, BADGE_INNER, BADGE_OUTER, OUTLINE_PX, QR_GRID,
};
use crate::scene::TextureSource;
use std::f64::consts::TAU;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

/// Tightly packed RGBA8 pixels, top row first.
pub struct Rgba {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

fn canvas_2d(
    width: u32,
    height: u32,
) -> anyhow::Result<(web::HtmlCanvasElement, web::CanvasRenderingContext2d)> {
    let document = crate::dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    canvas.set_width(width.max(1));
    canvas.set_height(height.max(1));
    let ctx: web::CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .ok_or_else(|| anyhow::anyhow!("2d context unavailable"))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok((canvas, ctx))
}

fn read_back(canvas: &web::HtmlCanvasElement, ctx: &web::CanvasRenderingContext2d) -> anyhow::Result<Rgba> {
    let (width, height) = (canvas.width(), canvas.height());
    let data = ctx
        .get_image_data(0.0, 0.0, width as f64, height as f64)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(Rgba {
        width,
        height,
        pixels: data.data().0,
    })
}

/// Pixels for a procedural source. `Image` sources load asynchronously
/// through [`load_image`] and return `None` here.
pub fn rasterize(source: &TextureSource) -> anyhow::Result<Option<Rgba>> {
    match source {
        TextureSource::Text {
            text,
            font_px,
            bold,
            color,
        } => {
            let [w, h] = TEXT_CANVAS_PX;
            let (canvas, ctx) = canvas_2d(w, h)?;
            let weight = if *bold { "bold" } else { "normal" };
            ctx.set_font(&format!("{weight} {font_px}px Segoe UI, Arial, sans-serif"));
            ctx.set_fill_style(&JsValue::from_str(color));
            ctx.set_text_align("center");
            ctx.set_text_baseline("middle");
            ctx.fill_text(text, w as f64 / 2.0, h as f64 / 2.0)
                .map_err(|e| anyhow::anyhow!("{:?}", e))?;
            read_back(&canvas, &ctx).map(Some)
        }
        TextureSource::Badge { label, size_px } => {
            let (canvas, ctx) = canvas_2d(*size_px, *size_px)?;
            let half = *size_px as f64 / 2.0;
            let gradient = ctx
                .create_radial_gradient(half, half, 0.0, half, half, half)
                .map_err(|e| anyhow::anyhow!("{:?}", e))?;
            _ = gradient.add_color_stop(0.0, BADGE_INNER);
            _ = gradient.add_color_stop(1.0, BADGE_OUTER);
            ctx.set_fill_style(&gradient);
            ctx.begin_path();
            _ = ctx.arc(half, half, half, 0.0, TAU);
            ctx.fill();
            ctx.set_stroke_style(&JsValue::from_str(ACCENT));
            ctx.set_line_width(OUTLINE_PX);
            ctx.stroke();

            ctx.set_fill_style(&JsValue::from_str(ACCENT));
            ctx.set_font(&format!("{}px Arial", *size_px as f64 * BADGE_GLYPH_SCALE));
            ctx.set_text_align("center");
            ctx.set_text_baseline("middle");
            _ = ctx.fill_text(label, half, half);
            read_back(&canvas, &ctx).map(Some)
        }
        TextureSource::QrPattern { size_px, seed } => {
            let size = *size_px as f64;
            let (canvas, ctx) = canvas_2d(*size_px, *size_px)?;
            ctx.set_fill_style(&JsValue::from_str("#ffffff"));
            ctx.fill_rect(0.0, 0.0, size, size);
            let cell = size / QR_GRID as f64;
            ctx.set_fill_style(&JsValue::from_str("#000000"));
            for (k, on) in qr_cells(*seed).into_iter().enumerate() {
                if on {
                    let (i, j) = (k / QR_GRID, k % QR_GRID);
                    ctx.fill_rect(i as f64 * cell, j as f64 * cell, cell, cell);
                }
            }
            ctx.set_stroke_style(&JsValue::from_str(ACCENT));
            ctx.set_line_width(OUTLINE_PX);
            ctx.stroke_rect(2.0, 2.0, size - 4.0, size - 4.0);
            read_back(&canvas, &ctx).map(Some)
        }
        TextureSource::Image { .. } => Ok(None),
    }
}

/// Fetch and decode `url`. Failures leave the caller's placeholder in place.
pub async fn load_image(url: &str) -> Result<Rgba, CardError> {
    let fail = |detail: String| CardError::AssetLoadFailure {
        url: url.to_string(),
        detail,
    };
    let image = web::HtmlImageElement::new().map_err(|e| fail(format!("{:?}", e)))?;
    image.set_cross_origin(Some("anonymous"));

    let loaded = js_sys::Promise::new(&mut |resolve, reject| {
        let on_load = Closure::once_into_js(move || {
            _ = resolve.call0(&JsValue::NULL);
        });
        let on_error = Closure::once_into_js(move |e: JsValue| {
            _ = reject.call1(&JsValue::NULL, &e);
        });
        image.set_onload(Some(on_load.unchecked_ref()));
        image.set_onerror(Some(on_error.unchecked_ref()));
    });
    image.set_src(url);
    JsFuture::from(loaded)
        .await
        .map_err(|_| fail("image failed to load".to_string()))?;

    let (width, height) = (image.natural_width(), image.natural_height());
    let (canvas, ctx) = canvas_2d(width, height).map_err(|e| fail(e.to_string()))?;
    ctx.draw_image_with_html_image_element(&image, 0.0, 0.0)
        .map_err(|e| fail(format!("{:?}", e)))?;
    // A tainted canvas (no CORS headers) refuses the read-back.
    read_back(&canvas, &ctx).map_err(|e| fail(e.to_string()))
}
