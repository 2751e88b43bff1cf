use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::foundation::error::{ExportError, ExportResult};
use crate::scene::model::{BitmapDef, BitmapFormat};

/// Decode a bitmap definition to straight RGBA8.
///
/// A separate alpha plane replaces the decoded alpha when it has exactly one byte per pixel.
pub fn decode_bitmap(def: &BitmapDef) -> ExportResult<image::RgbaImage> {
    let mut rgba = match def.format {
        BitmapFormat::Rgba => image::RgbaImage::from_raw(def.width, def.height, def.data.clone())
            .ok_or_else(|| {
                ExportError::image(format!(
                    "bitmap {}: {} bytes do not fill {}x{} rgba",
                    def.id,
                    def.data.len(),
                    def.width,
                    def.height
                ))
            })?,
        BitmapFormat::Png | BitmapFormat::Jpeg => image::load_from_memory(&def.data)
            .map_err(|e| ExportError::image(format!("bitmap {}: {e}", def.id)))?
            .to_rgba8(),
    };

    if let Some(alpha) = &def.alpha {
        let (w, h) = rgba.dimensions();
        if alpha.len() == (w as usize) * (h as usize) {
            for (px, a) in rgba.pixels_mut().zip(alpha) {
                px.0[3] = *a;
            }
        } else {
            tracing::debug!(id = def.id, "alpha plane size mismatch, ignored");
        }
    }
    Ok(rgba)
}

/// `data:image/png;base64,...` URL of an image.
pub fn png_data_url(img: &image::RgbaImage) -> ExportResult<String> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| ExportError::image(format!("encode png: {e}")))?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(&buf)))
}

#[cfg(test)]
#[path = "../../tests/unit/compose/bitmap.rs"]
mod tests;
