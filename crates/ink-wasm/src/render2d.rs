//! Canvas2D blit of the session raster.
//!
//! `putImageData` replaces pixels outright, so transparent raster pixels
//! show whatever background the page gives the `<canvas>` element.

use ink_core::RasterBuffer;
use wasm_bindgen::{Clamped, JsValue};
use web_sys::CanvasRenderingContext2d;

pub fn render_raster(ctx: &CanvasRenderingContext2d, raster: &RasterBuffer) -> Result<(), JsValue> {
    let image = web_sys::ImageData::new_with_u8_clamped_array_and_sh(
        Clamped(raster.data()),
        raster.width(),
        raster.height(),
    )?;
    ctx.put_image_data(&image, 0.0, 0.0)
}
