use crate::foundation::error::ExportResult;
use crate::fonts::store::{GlyphOutline, GlyphStore};
use crate::scene::model::{FontDef, Record, Scene};
use crate::shape::exporter::glyph_outline;

/// Counters returned by [`extract_fonts`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExtractStats {
    /// Named fonts visited.
    pub fonts: usize,
    /// Outlines newly added to the store.
    pub glyphs_added: usize,
}

/// Copy every embedded glyph outline (and advance, when the font has layout) into `store`.
///
/// Only named fonts with a code table can be keyed; others are skipped. Outlines already present
/// in the store are left alone.
#[tracing::instrument(skip(scene, store))]
pub fn extract_fonts(scene: &Scene, store: &dyn GlyphStore) -> ExportResult<ExtractStats> {
    let mut stats = ExtractStats::default();
    let mut fonts = Vec::new();
    collect_fonts(&scene.records, &mut fonts);
    for font in fonts {
        let Some(name) = font.name.as_deref().filter(|n| !n.is_empty()) else {
            continue;
        };
        if font.code_table.is_empty() {
            continue;
        }
        stats.fonts += 1;
        let handle = store.font(name)?;
        for (&code, glyph) in font.code_table.iter().zip(&font.glyphs) {
            if handle.has_glyph(code) {
                continue;
            }
            if let Some(d) = glyph_outline(font.id, glyph)? {
                handle.add_glyph(code, &GlyphOutline { d })?;
                stats.glyphs_added += 1;
            }
        }
        if let Some(layout) = &font.layout {
            for (&code, &advance) in font.code_table.iter().zip(&layout.advances) {
                handle.add_advance(code, advance);
            }
        }
        handle.flush()?;
        tracing::debug!(font = name, "extracted font");
    }
    Ok(stats)
}

fn collect_fonts<'a>(records: &'a [Record], out: &mut Vec<&'a FontDef>) {
    for rec in records {
        match rec {
            Record::DefineFont(f) => out.push(f),
            Record::DefineSprite(s) => collect_fonts(&s.records, out),
            _ => {}
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fonts/extract.rs"]
mod tests;
