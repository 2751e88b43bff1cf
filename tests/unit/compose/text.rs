use super::*;
use crate::scene::model::{
    GlyphDef, GlyphEntry, Matrix, ShapeRecord, StyleChange, TextRecord, TwipRect,
};

fn square() -> GlyphDef {
    GlyphDef {
        records: vec![
            ShapeRecord::StyleChange(StyleChange {
                move_to: Some([0, 0]),
                fill_style1: Some(1),
                ..StyleChange::default()
            }),
            ShapeRecord::StraightEdge { dx: 1000, dy: 0 },
            ShapeRecord::StraightEdge { dx: 0, dy: 1000 },
            ShapeRecord::StraightEdge { dx: -1000, dy: 0 },
            ShapeRecord::StraightEdge { dx: 0, dy: -1000 },
        ],
    }
}

fn font() -> FontDef {
    FontDef {
        id: 3,
        name: None,
        glyphs: vec![square(), square(), GlyphDef::default()],
        code_table: vec![65, 66, 32],
        layout: None,
        em_square: crate::scene::model::DEFAULT_EM_SQUARE,
    }
}

fn hrefs(g: &Element) -> Vec<String> {
    g.elements()
        .filter(|e| e.name == "use")
        .filter_map(|e| e.get("xlink:href").map(str::to_string))
        .collect()
}

#[test]
fn static_text_places_glyphs_along_advances() {
    let mut cache = GlyphCache::new(None);
    cache.export_font(&font()).unwrap();
    let def = TextDef {
        id: 8,
        bounds: TwipRect::new(0, 0, 2000, 400),
        matrix: None,
        records: vec![TextRecord {
            font_id: Some(3),
            color: Some(Rgba8::rgb(255, 0, 0)),
            x_offset: Some(100),
            y_offset: Some(400),
            height: Some(240),
            glyphs: vec![
                GlyphEntry {
                    index: 0,
                    advance: 200,
                },
                GlyphEntry {
                    index: 2,
                    advance: 100,
                },
                GlyphEntry {
                    index: 1,
                    advance: 200,
                },
            ],
        }],
    };
    let g = static_text(&def, &cache);
    assert_eq!(g.get("id"), Some("c8"));
    assert_eq!(g.get("data-type"), Some("text"));
    assert_eq!(g.get("data-bounds"), Some("0 0 100 20"));
    assert_eq!(g.get("data-font_size"), Some("12"));

    let uses: Vec<_> = g.elements().collect();
    assert_eq!(uses.len(), 2);
    assert_eq!(uses[0].get("xlink:href"), Some("#font_3_0"));
    assert_eq!(uses[0].get("transform"), Some("matrix(12,0,0,12,5,20)"));
    assert_eq!(
        uses[0].get("style"),
        Some("fill: rgb(255,0,0); stroke: rgb(255,0,0)")
    );
    assert_eq!(uses[1].get("xlink:href"), Some("#font_3_1"));
    assert_eq!(uses[1].get("transform"), Some("matrix(12,0,0,12,20,20)"));
}

#[test]
fn static_text_matrix_wraps_glyphs_and_sizes_span() {
    let mut cache = GlyphCache::new(None);
    cache.export_font(&font()).unwrap();
    let run = |height| TextRecord {
        font_id: Some(3),
        height: Some(height),
        glyphs: vec![GlyphEntry {
            index: 0,
            advance: 0,
        }],
        ..TextRecord::default()
    };
    let def = TextDef {
        id: 9,
        bounds: TwipRect::new(0, 0, 200, 200),
        matrix: Some(Matrix::translate(40.0, 0.0)),
        records: vec![run(200), run(400)],
    };
    let g = static_text(&def, &cache);
    assert_eq!(g.get("data-font_size_min"), Some("10"));
    assert_eq!(g.get("data-font_size_max"), Some("20"));
    let inner = g.elements().next().unwrap();
    assert_eq!(inner.get("transform"), Some("matrix(1,0,0,1,2,0)"));
    assert_eq!(inner.elements().count(), 2);
}

#[test]
fn edit_text_lays_out_and_skips_unknown_glyphs() {
    let f = font();
    let mut cache = GlyphCache::new(None);
    cache.export_font(&f).unwrap();
    let def = EditTextDef {
        id: 12,
        bounds: TwipRect::new(0, 0, 2000, 400),
        font_id: Some(3),
        font_height: 240,
        text_color: None,
        align: None,
        initial_text: Some("AZB".to_string()),
        variable_name: None,
    };
    let mut recovered = Vec::new();
    let g = edit_text(
        &def,
        Some(&f),
        &mut cache,
        &LayoutOptions::default(),
        &mut recovered,
    );
    assert_eq!(g.get("data-type"), Some("edit_text"));
    assert_eq!(g.get("data-font_size"), Some("12"));
    assert_eq!(hrefs(&g), vec!["#font_3_0", "#font_3_1"]);
    let uses: Vec<_> = g.elements().collect();
    assert_eq!(uses[0].get("transform"), Some("matrix(12,0,0,12,2,12)"));
    assert_eq!(uses[1].get("transform"), Some("matrix(12,0,0,12,14,12)"));
    assert!(recovered.is_empty());
}

#[test]
fn edit_text_with_missing_font_is_empty_and_reported() {
    let mut cache = GlyphCache::new(None);
    let def = EditTextDef {
        id: 12,
        bounds: TwipRect::new(0, 0, 2000, 400),
        font_id: Some(77),
        font_height: 240,
        text_color: None,
        align: None,
        initial_text: Some("A".to_string()),
        variable_name: None,
    };
    let mut recovered = Vec::new();
    let g = edit_text(&def, None, &mut cache, &LayoutOptions::default(), &mut recovered);
    assert_eq!(g.elements().count(), 0);
    assert!(matches!(
        recovered.as_slice(),
        [ExportError::UnresolvedCharacter { id: 77 }]
    ));
}
