use std::path::Path;

use crate::foundation::error::{ExportError, ExportResult};

/// Largest preview edge in pixels.
const MAX_DIM: u32 = 16_384;

/// Rasterize serialized SVG markup at its intrinsic size to straight-alpha RGBA8.
pub fn rasterize(svg: &str) -> ExportResult<image::RgbaImage> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg, &opts)
        .map_err(|e| ExportError::image(format!("parse svg for preview: {e}")))?;

    let size = tree.size();
    let to_px = |v: f32| -> ExportResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(ExportError::image("svg has invalid width/height"));
        }
        Ok((v.ceil() as u32).max(1))
    };
    let (width, height) = (to_px(size.width())?, to_px(size.height())?);
    if width > MAX_DIM || height > MAX_DIM {
        return Err(ExportError::image(format!(
            "preview size too large: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| ExportError::image("failed to allocate preview pixmap"))?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::identity(),
        &mut pixmap.as_mut(),
    );

    let mut straight = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.pixels() {
        let c = px.demultiply();
        straight.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    image::RgbaImage::from_raw(width, height, straight)
        .ok_or_else(|| ExportError::image("preview buffer size mismatch"))
}

/// Write a PNG preview of `svg` to `out`.
#[tracing::instrument(skip(svg))]
pub fn write_png(svg: &str, out: &Path) -> ExportResult<()> {
    let img = rasterize(svg)?;
    img.save_with_format(out, image::ImageFormat::Png)
        .map_err(|e| ExportError::image(format!("write png '{}': {e}", out.display())))
}
