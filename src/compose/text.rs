//! Text definitions as groups of glyph references.

use crate::foundation::core::{Rgba8, TWIPS_PER_PIXEL, affine_to_svg, fmt_num, round_pixels};
use crate::foundation::error::ExportError;
use crate::fonts::cache::{GlyphCache, glyph_elem_id};
use crate::scene::model::{CharacterId, EditTextDef, FontDef, TextAlign, TextDef};
use crate::svg::document::{Element, Node};
use crate::text::html::extract_text;
use crate::text::layout::{FontMetrics, LayoutOptions, TextLayout};

fn glyph_use(glyph_id: &str, size: f64, x: f64, y: f64, color: Rgba8) -> Element {
    let c = color.to_rgb_string();
    let mut style = format!("fill: {c}; stroke: {c}");
    if color.a < 255 {
        let a = fmt_num(color.alpha());
        style.push_str(&format!("; fill-opacity: {a}; stroke-opacity: {a}"));
    }
    Element::new("use")
        .with("xlink:href", format!("#{glyph_id}"))
        .with(
            "transform",
            format!(
                "matrix({s},0,0,{s},{},{})",
                fmt_num(round_pixels(x)),
                fmt_num(round_pixels(y)),
                s = fmt_num(size)
            ),
        )
        .with("style", style)
}

fn text_group(id: CharacterId, kind: &str, bounds: String) -> Element {
    Element::new("g")
        .with("id", format!("c{id}"))
        .with("data-type", kind)
        .with("data-bounds", bounds)
}

/// Static text: one glyph reference per glyph entry.
///
/// Run state (font, color, height, pen position) carries over between records. Glyph positions
/// are in text space; the text matrix maps them into character space through an inner group.
pub(crate) fn static_text(def: &TextDef, glyphs: &GlyphCache<'_>) -> Element {
    let mut group = text_group(def.id, "text", def.bounds.to_bounds().rounded().to_string());

    let mut font_id = None;
    let mut color = Rgba8::black();
    let mut height = 0u16;
    let mut x = 0.0;
    let mut y = 0.0;
    let mut heights = Vec::with_capacity(def.records.len());
    let mut uses = Vec::new();

    for rec in &def.records {
        font_id = rec.font_id.or(font_id);
        color = rec.color.unwrap_or(color);
        height = rec.height.unwrap_or(height);
        if let Some(dx) = rec.x_offset {
            x = f64::from(dx) / TWIPS_PER_PIXEL;
        }
        if let Some(dy) = rec.y_offset {
            y = f64::from(dy) / TWIPS_PER_PIXEL;
        }
        heights.push(height);

        let size = f64::from(height) / TWIPS_PER_PIXEL;
        for glyph in &rec.glyphs {
            match font_id {
                Some(font) if glyphs.has_glyph(font, glyph.index) => {
                    uses.push(glyph_use(
                        &glyph_elem_id(font, glyph.index),
                        size,
                        x,
                        y,
                        color,
                    ));
                }
                _ => {}
            }
            x += f64::from(glyph.advance) / TWIPS_PER_PIXEL;
        }
    }

    if let (Some(min), Some(max)) = (heights.iter().min(), heights.iter().max()) {
        let px = |h: u16| fmt_num(f64::from(h) / TWIPS_PER_PIXEL);
        if min == max {
            group.set("data-font_size", px(*min));
        } else {
            group.set("data-font_size_min", px(*min));
            group.set("data-font_size_max", px(*max));
        }
    }

    match def.matrix {
        Some(m) if m != crate::scene::model::Matrix::identity() => {
            let mut inner = Element::new("g").with("transform", affine_to_svg(m.to_affine()));
            inner.children.extend(uses.into_iter().map(Node::Element));
            group.push(inner);
        }
        _ => group.children.extend(uses.into_iter().map(Node::Element)),
    }
    group
}

/// Edit text: initial contents laid out with the font's advances, glyphs resolved per character.
///
/// Characters whose glyph cannot be found in the font or the glyph store are left out.
pub(crate) fn edit_text(
    def: &EditTextDef,
    font: Option<&FontDef>,
    glyphs: &mut GlyphCache<'_>,
    layout: &LayoutOptions,
    recovered: &mut Vec<ExportError>,
) -> Element {
    let bounds = def.bounds.to_bounds();
    let mut group = text_group(def.id, "edit_text", bounds.rounded().to_string());
    let (text, size) = extract_text(
        def.initial_text.as_deref(),
        f64::from(def.font_height) / TWIPS_PER_PIXEL,
    );
    group.set("data-font_size", fmt_num(size));

    let Some(font) = font else {
        if let Some(id) = def.font_id {
            tracing::warn!(id = def.id, font = id, "edit text references a missing font");
            recovered.push(ExportError::UnresolvedCharacter { id });
        }
        return group;
    };

    let color = def.text_color.unwrap_or_default();
    let metrics = FontMetrics::from_font(font);
    let engine = TextLayout::new(&metrics, layout);
    let align = def.align.unwrap_or(TextAlign::Left);
    for ch in engine.layout(&text, size, align, bounds) {
        let Some(glyph_id) = glyphs.resolve_glyph(font.id, ch.code, recovered) else {
            tracing::trace!(code = ch.code, "no glyph for character");
            continue;
        };
        group.push(glyph_use(&glyph_id, size, ch.x, ch.y, color));
    }
    group
}

#[cfg(test)]
#[path = "../../tests/unit/compose/text.rs"]
mod tests;
