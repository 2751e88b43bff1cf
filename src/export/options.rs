use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{ExportError, ExportResult};
use crate::shape::exporter::ShapeOptions;
use crate::text::layout::LayoutOptions;

/// Knobs of one export run. Every field has a default, so a partial JSON file is valid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Uniform margin added around the stage in the root `viewBox`, in pixels.
    pub margin: f64,
    /// Outline opaque solid fills with a 1px stroke of the same color.
    pub force_stroke: bool,
    /// Thinnest emitted stroke, in pixels.
    pub min_stroke_width: f64,
    /// Embed bitmaps as PNG data URLs; otherwise bitmaps become empty sized placeholders.
    pub embed_images: bool,
    /// Edit-text layout tunables.
    pub layout: LayoutOptions,
}

impl Default for ExportOptions {
    fn default() -> Self {
        let shape = ShapeOptions::default();
        Self {
            margin: 0.0,
            force_stroke: shape.force_stroke,
            min_stroke_width: shape.min_stroke_width,
            embed_images: true,
            layout: LayoutOptions::default(),
        }
    }
}

impl ExportOptions {
    /// Parse options from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> ExportResult<Self> {
        let opts: Self = serde_json::from_reader(r)
            .map_err(|e| ExportError::validation(format!("parse options JSON: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Parse options from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ExportResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| ExportError::io(path, e))?;
        Self::from_reader(BufReader::new(f))
    }

    /// Reject values that would produce unusable markup.
    pub fn validate(&self) -> ExportResult<()> {
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(ExportError::validation("margin must be finite and >= 0"));
        }
        if !self.min_stroke_width.is_finite() || self.min_stroke_width < 0.0 {
            return Err(ExportError::validation(
                "min_stroke_width must be finite and >= 0",
            ));
        }
        if !self.layout.inset.is_finite() {
            return Err(ExportError::validation("layout.inset must be finite"));
        }
        Ok(())
    }

    /// Options handed to the shape path exporter.
    pub fn shape_options(&self) -> ShapeOptions {
        ShapeOptions {
            force_stroke: self.force_stroke,
            min_stroke_width: self.min_stroke_width,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/options.rs"]
mod tests;
