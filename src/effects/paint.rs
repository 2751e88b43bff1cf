use std::collections::HashMap;

use crate::foundation::core::{affine_to_svg, fmt_num};
use crate::scene::model::{
    CharacterId, FillStyle, Gradient, Interpolation, Matrix, SpreadMode,
};
use crate::svg::document::Element;

/// Half-extent of the gradient square in pixels (16384 twips).
const GRADIENT_EXTENT: f64 = 819.2;

/// Geometry family of a gradient fill.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GradientKind {
    /// Along the x axis of the gradient square.
    Linear,
    /// Centered on the gradient square.
    Radial,
    /// Radial with the focal point shifted along x by a ratio in `-1..=1`.
    Focal(f64),
}

/// Per-document registry of paint servers (gradients and bitmap patterns).
///
/// Gradients are deduplicated by their canonical markup; every pattern gets its own definition.
/// New definitions queue up until the composer drains them into the document with
/// [`PaintRegistry::take_defs`], so they always precede the fragment that references them.
#[derive(Debug, Default)]
pub struct PaintRegistry {
    gradient_ids: HashMap<String, String>,
    bitmaps: HashMap<CharacterId, (u32, u32)>,
    num_gradients: usize,
    num_patterns: usize,
    pending: Vec<Element>,
}

impl PaintRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a materialized bitmap available to pattern fills.
    pub fn register_bitmap(&mut self, id: CharacterId, width: u32, height: u32) {
        self.bitmaps.insert(id, (width, height));
    }

    /// Paint value for a fill: `rgb(..)` for solids, `url(#..)` for paint servers.
    ///
    /// Fails with the missing character id when a bitmap fill references an unknown bitmap.
    pub fn paint(&mut self, fill: &FillStyle) -> Result<String, CharacterId> {
        match fill {
            FillStyle::Solid { color } => Ok(color.to_rgb_string()),
            FillStyle::LinearGradient { matrix, gradient } => {
                Ok(self.gradient_url(GradientKind::Linear, gradient, matrix))
            }
            FillStyle::RadialGradient { matrix, gradient } => {
                Ok(self.gradient_url(GradientKind::Radial, gradient, matrix))
            }
            FillStyle::FocalGradient {
                matrix,
                gradient,
                focal_point,
            } => Ok(self.gradient_url(GradientKind::Focal(*focal_point), gradient, matrix)),
            FillStyle::Bitmap {
                bitmap_id, matrix, ..
            } => self
                .pattern(*bitmap_id, matrix)
                .map(|id| format!("url(#{id})"))
                .ok_or(*bitmap_id),
        }
    }

    fn gradient_url(&mut self, kind: GradientKind, gradient: &Gradient, matrix: &Matrix) -> String {
        format!("url(#{})", self.gradient(kind, gradient, matrix))
    }

    /// Id of the shared gradient definition, creating it on first use.
    pub fn gradient(&mut self, kind: GradientKind, gradient: &Gradient, matrix: &Matrix) -> String {
        let mut el = gradient_element(kind, gradient, matrix);
        let key = el.to_markup();
        if let Some(id) = self.gradient_ids.get(&key) {
            return id.clone();
        }
        self.num_gradients += 1;
        let id = format!("gradient{}", self.num_gradients);
        el.set("id", id.clone());
        self.gradient_ids.insert(key, id.clone());
        self.pending.push(el);
        id
    }

    /// Id of a new pattern tiling bitmap `bitmap_id`, or `None` when the bitmap is unknown.
    pub fn pattern(&mut self, bitmap_id: CharacterId, matrix: &Matrix) -> Option<String> {
        let (w, h) = *self.bitmaps.get(&bitmap_id)?;
        self.num_patterns += 1;
        let id = format!("pat{}", self.num_patterns);
        let use_el = Element::new("use").with("xlink:href", format!("#c{bitmap_id}"));
        let pattern = Element::new("pattern")
            .with("id", id.clone())
            .with("width", w.to_string())
            .with("height", h.to_string())
            .with("patternUnits", "userSpaceOnUse")
            .with("patternTransform", affine_to_svg(matrix.to_pattern_affine()))
            .with_child(use_el);
        self.pending.push(pattern);
        Some(id)
    }

    /// Definitions created since the last call, in creation order.
    pub fn take_defs(&mut self) -> Vec<Element> {
        std::mem::take(&mut self.pending)
    }
}

fn gradient_element(kind: GradientKind, gradient: &Gradient, matrix: &Matrix) -> Element {
    let mut el = match kind {
        GradientKind::Linear => Element::new("linearGradient")
            .with("gradientUnits", "userSpaceOnUse")
            .with("x1", fmt_num(-GRADIENT_EXTENT))
            .with("x2", fmt_num(GRADIENT_EXTENT)),
        GradientKind::Radial | GradientKind::Focal(_) => Element::new("radialGradient")
            .with("gradientUnits", "userSpaceOnUse")
            .with("r", fmt_num(GRADIENT_EXTENT))
            .with("cx", "0")
            .with("cy", "0"),
    };
    if let GradientKind::Focal(ratio) = kind
        && ratio != 0.0
    {
        el.set("fx", fmt_num(GRADIENT_EXTENT * ratio));
        el.set("fy", "0");
    }
    el.set(
        "spreadMethod",
        match gradient.spread {
            SpreadMode::Pad => "pad",
            SpreadMode::Reflect => "reflect",
            SpreadMode::Repeat => "repeat",
        },
    );
    if gradient.interpolation == Interpolation::LinearRgb {
        el.set("color-interpolation", "linearRGB");
    }
    el.set("gradientTransform", affine_to_svg(matrix.to_affine()));
    for rec in &gradient.records {
        let mut stop = Element::new("stop")
            .with("offset", fmt_num(f64::from(rec.ratio) / 255.0))
            .with("stop-color", rec.color.to_rgb_string());
        if rec.color.a < 255 {
            stop.set("stop-opacity", fmt_num(rec.color.alpha()));
        }
        el.push(stop);
    }
    el
}

#[cfg(test)]
#[path = "../../tests/unit/effects/paint.rs"]
mod tests;
