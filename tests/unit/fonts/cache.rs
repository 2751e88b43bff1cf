use super::*;
use crate::fonts::store::{GlyphOutline, MemoryGlyphStore};
use crate::scene::model::{GlyphDef, ShapeRecord, StyleChange};

fn triangle() -> GlyphDef {
    GlyphDef {
        records: vec![
            ShapeRecord::StyleChange(StyleChange {
                move_to: Some([0, 0]),
                fill_style1: Some(1),
                ..StyleChange::default()
            }),
            ShapeRecord::StraightEdge { dx: 400, dy: 0 },
            ShapeRecord::StraightEdge { dx: 0, dy: 400 },
            ShapeRecord::StraightEdge { dx: -400, dy: -400 },
        ],
    }
}

fn font(name: Option<&str>) -> FontDef {
    FontDef {
        id: 3,
        name: name.map(str::to_string),
        glyphs: vec![triangle(), GlyphDef::default(), triangle()],
        code_table: vec![65, 32, 66],
        layout: None,
        em_square: crate::scene::model::DEFAULT_EM_SQUARE,
    }
}

struct BrokenStore;

impl GlyphStore for BrokenStore {
    fn font(&self, name: &str) -> ExportResult<Arc<dyn FontHandle>> {
        Err(ExportError::GlyphStoreUnavailable(format!("cannot open '{name}'")))
    }
}

#[test]
fn eager_export_skips_empty_glyphs() {
    let mut cache = GlyphCache::new(None);
    let g = cache.export_font(&font(Some("Arial"))).unwrap();
    assert_eq!(g.get("id"), Some("font_3"));
    assert_eq!(g.get("data-type"), Some("font"));
    let ids: Vec<_> = g.elements().filter_map(|e| e.get("id")).collect();
    assert_eq!(ids, ["font_3_0", "font_3_2"]);
    let first = g.elements().next().unwrap();
    assert_eq!(first.get("transform"), Some("scale(0.0009765625)"));
    assert_eq!(first.get("fill"), None);
}

#[test]
fn code_table_hits_resolve_without_store() {
    let mut cache = GlyphCache::new(None);
    cache.export_font(&font(Some("Arial"))).unwrap();
    let mut recovered = Vec::new();
    assert_eq!(cache.resolve_glyph(3, 66, &mut recovered).as_deref(), Some("font_3_2"));
    assert_eq!(cache.resolve_glyph(3, 32, &mut recovered), None);
    assert_eq!(cache.resolve_glyph(99, 65, &mut recovered), None);
}

#[test]
fn store_glyph_is_materialized_once() {
    let store = MemoryGlyphStore::new();
    store
        .font("Arial")
        .unwrap()
        .add_glyph(
            1046,
            &GlyphOutline {
                d: "M0 0 L5 5".to_string(),
            },
        )
        .unwrap();

    let mut cache = GlyphCache::new(Some(&store));
    cache.export_font(&font(Some("Arial"))).unwrap();
    let mut recovered = Vec::new();
    let first = cache.resolve_glyph(3, 1046, &mut recovered);
    let second = cache.resolve_glyph(3, 1046, &mut recovered);
    assert_eq!(first.as_deref(), Some("font_3_3"));
    assert_eq!(first, second);
    assert_eq!(store.glyph_reads(), 1);

    let added = cache.take_materialized();
    assert_eq!(added.len(), 1);
    assert_eq!(added[0].0, 3);
    assert_eq!(added[0].1.get("d"), Some("M0 0 L5 5"));
    assert!(cache.take_materialized().is_empty());

    // misses are remembered as well
    assert_eq!(cache.resolve_glyph(3, 9999, &mut recovered), None);
    assert_eq!(cache.resolve_glyph(3, 9999, &mut recovered), None);
    assert_eq!(store.glyph_reads(), 2);
    assert!(recovered.is_empty());
}

#[test]
fn unnamed_fonts_never_query_the_store() {
    let store = MemoryGlyphStore::new();
    let mut cache = GlyphCache::new(Some(&store));
    cache.export_font(&font(None)).unwrap();
    assert_eq!(cache.resolve_glyph(3, 1046, &mut Vec::new()), None);
    assert!(store.font_names().is_empty());
}

#[test]
fn broken_store_is_reported_once_and_disabled() {
    let store = BrokenStore;
    let mut cache = GlyphCache::new(Some(&store));
    cache.export_font(&font(Some("Arial"))).unwrap();
    let mut recovered = Vec::new();
    assert_eq!(cache.resolve_glyph(3, 1046, &mut recovered), None);
    assert_eq!(cache.resolve_glyph(3, 1047, &mut recovered), None);
    assert_eq!(recovered.len(), 1);
    assert!(recovered[0].is_recoverable());
    // eager glyphs keep working
    assert!(cache.resolve_glyph(3, 65, &mut recovered).is_some());
}

#[test]
fn has_glyph_tracks_exported_indexes_only() {
    let mut cache = GlyphCache::new(None);
    cache.export_font(&font(None)).unwrap();
    assert!(cache.has_glyph(3, 0));
    assert!(!cache.has_glyph(3, 1));
    assert!(cache.has_glyph(3, 2));
    assert!(!cache.has_glyph(4, 0));
}
