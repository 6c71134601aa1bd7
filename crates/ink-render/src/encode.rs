//! Raster → embeddable PNG data URL for the recognition request.

use base64::{Engine as _, engine::general_purpose};
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use ink_core::{InkError, RasterBuffer, Result};

pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Encode the raster as an RGBA PNG.
pub fn encode_png(raster: &RasterBuffer) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf)
        .write_image(raster.data(), raster.width(), raster.height(), ColorType::Rgba8)
        .map_err(|e| InkError::Encode(e.to_string()))?;
    Ok(buf)
}

/// Encode the raster as `data:image/png;base64,...`.
pub fn to_data_url(raster: &RasterBuffer) -> Result<String> {
    let png = encode_png(raster)?;
    let mut url = String::with_capacity(PNG_DATA_URL_PREFIX.len() + png.len() * 4 / 3 + 4);
    url.push_str(PNG_DATA_URL_PREFIX);
    general_purpose::STANDARD.encode_string(&png, &mut url);
    Ok(url)
}
