use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::foundation::core::{TWIPS_PER_PIXEL, fmt_num};
use crate::foundation::error::{ExportError, ExportResult};
use crate::fonts::store::{FontHandle, GlyphStore};
use crate::scene::model::{CharacterId, FontDef};
use crate::shape::exporter::glyph_outline;
use crate::svg::document::Element;

/// Id of a font group in `defs`.
pub fn font_elem_id(font_id: CharacterId) -> String {
    format!("font_{font_id}")
}

/// Id of one glyph path inside a font group.
pub fn glyph_elem_id(font_id: CharacterId, index: u32) -> String {
    format!("font_{font_id}_{index}")
}

#[derive(Default)]
struct FontEntry {
    name: Option<String>,
    em_square: f64,
    /// Code to glyph index for every exported glyph (eager or materialized).
    codes: HashMap<u32, u32>,
    /// Codes already known to be absent everywhere.
    misses: HashSet<u32>,
    /// Glyph indexes with an exported path.
    indexes: HashSet<u32>,
    max_index: Option<u32>,
    handle: Option<Arc<dyn FontHandle>>,
}

/// Per-document map from (font id, code) to exported glyph ids.
///
/// Eagerly exported glyphs come from the font's own table. Anything else is looked up once in the
/// glyph store and materialized under a fresh index; both hits and misses are remembered, so
/// repeated lookups never touch the store again.
pub struct GlyphCache<'s> {
    store: Option<&'s dyn GlyphStore>,
    fonts: HashMap<CharacterId, FontEntry>,
    materialized: Vec<(CharacterId, Element)>,
}

impl<'s> GlyphCache<'s> {
    /// Cache backed by an optional store.
    pub fn new(store: Option<&'s dyn GlyphStore>) -> Self {
        Self {
            store,
            fonts: HashMap::new(),
            materialized: Vec::new(),
        }
    }

    /// Export every glyph of the font's table as `<g id="font_{id}" data-type="font">`.
    pub fn export_font(&mut self, font: &FontDef) -> ExportResult<Element> {
        let em = if font.em_square > 0.0 {
            font.em_square
        } else {
            crate::scene::model::DEFAULT_EM_SQUARE
        };
        let mut entry = FontEntry {
            name: font.name.clone().filter(|n| !n.is_empty()),
            em_square: em,
            ..FontEntry::default()
        };
        let mut group = Element::new("g")
            .with("id", font_elem_id(font.id))
            .with("data-type", "font");

        for (index, glyph) in font.glyphs.iter().enumerate() {
            let index = index as u32;
            let Some(d) = glyph_outline(font.id, glyph)? else {
                continue;
            };
            group.push(glyph_path(font.id, index, em, d));
            entry.indexes.insert(index);
            entry.max_index = entry.max_index.max(Some(index));
            if let Some(&code) = font.code_table.get(index as usize) {
                entry.codes.entry(code).or_insert(index);
            }
        }
        self.fonts.insert(font.id, entry);
        Ok(group)
    }

    /// Glyph id for `code` in font `font_id`, materializing it from the store on first use.
    ///
    /// Store failures are reported once through `recovered`; afterwards the store is ignored for
    /// the rest of the document.
    pub fn resolve_glyph(
        &mut self,
        font_id: CharacterId,
        code: u32,
        recovered: &mut Vec<ExportError>,
    ) -> Option<String> {
        let entry = self.fonts.get_mut(&font_id)?;
        if let Some(&index) = entry.codes.get(&code) {
            return Some(glyph_elem_id(font_id, index));
        }
        if entry.misses.contains(&code) {
            return None;
        }
        let (Some(store), Some(name)) = (self.store, entry.name.as_deref()) else {
            entry.misses.insert(code);
            return None;
        };

        let found = match entry.handle.clone() {
            Some(h) => h.glyph(code),
            None => match store.font(name) {
                Ok(h) => {
                    entry.handle = Some(h.clone());
                    h.glyph(code)
                }
                Err(e) => Err(e),
            },
        };
        let outline = match found {
            Ok(Some(outline)) => outline,
            Ok(None) => {
                entry.misses.insert(code);
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "glyph store disabled for this document");
                recovered.push(match e {
                    ExportError::GlyphStoreUnavailable(_) => e,
                    other => ExportError::GlyphStoreUnavailable(other.to_string()),
                });
                self.store = None;
                entry.misses.insert(code);
                return None;
            }
        };

        let index = entry.max_index.map_or(0, |m| m + 1);
        entry.max_index = Some(index);
        entry.indexes.insert(index);
        entry.codes.insert(code, index);
        let path = glyph_path(font_id, index, entry.em_square, outline.d);
        self.materialized.push((font_id, path));
        tracing::debug!(font_id, code, index, "materialized glyph from store");
        Some(glyph_elem_id(font_id, index))
    }

    /// Glyph paths materialized since the last call, with the font they belong to.
    pub fn take_materialized(&mut self) -> Vec<(CharacterId, Element)> {
        std::mem::take(&mut self.materialized)
    }

    /// `true` when glyph `index` of the font has an exported path.
    pub fn has_glyph(&self, font_id: CharacterId, index: u32) -> bool {
        self.fonts
            .get(&font_id)
            .is_some_and(|f| f.indexes.contains(&index))
    }

    /// `true` when the font was exported in this document.
    pub fn has_font(&self, font_id: CharacterId) -> bool {
        self.fonts.contains_key(&font_id)
    }
}

fn glyph_path(font_id: CharacterId, index: u32, em: f64, d: String) -> Element {
    Element::new("path")
        .with("id", glyph_elem_id(font_id, index))
        .with("transform", format!("scale({})", fmt_num(TWIPS_PER_PIXEL / em)))
        .with("d", d)
}

#[cfg(test)]
#[path = "../../tests/unit/fonts/cache.rs"]
mod tests;
