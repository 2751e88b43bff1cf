use super::*;
use crate::fonts::store::{GlyphOutline, MemoryGlyphStore};

const SQUARE: &str = r##"{"type": "define_shape", "id": 1,
  "styles": {"fill_styles": [{"type": "solid", "color": "#ff0000"}]},
  "records": [
    {"type": "style_change", "move_to": [0, 0], "fill_style1": 1},
    {"type": "straight_edge", "dx": 200, "dy": 0},
    {"type": "straight_edge", "dx": 0, "dy": 200},
    {"type": "straight_edge", "dx": -200, "dy": 0},
    {"type": "straight_edge", "dx": 0, "dy": -200}
  ]}"##;

fn scene(records: &[&str]) -> Scene {
    let json = format!(
        r#"{{"header": {{"frame_size": {{"x_min": 0, "y_min": 0, "x_max": 11000, "y_max": 8000}}}},
            "records": [{}]}}"#,
        records.join(",")
    );
    Scene::from_reader(json.as_bytes()).unwrap()
}

fn root_hrefs(doc: &Document) -> Vec<String> {
    doc.root
        .elements()
        .flat_map(|g| g.elements())
        .filter_map(|u| u.get("xlink:href").map(str::to_string))
        .collect()
}

#[test]
fn square_shape_is_defined_and_placed_once() {
    let doc = compose(
        &scene(&[SQUARE, r#"{"type": "place_instance", "depth": 1, "character_id": 1}"#]),
        0,
    )
    .unwrap();
    let shape = doc.def("c1").unwrap();
    assert_eq!(shape.get("data-type"), Some("shape"));
    assert_eq!(shape.get("data-bounds"), Some("0 0 10 10"));
    let path = shape.elements().next().unwrap();
    assert_eq!(path.get("d"), Some("M0 0 L10 0 10 10 0 10 0 0"));
    assert_eq!(root_hrefs(&doc), vec!["#c1"]);
    assert!(doc.recovered.is_empty());
    assert_eq!(doc.size, (550.0, 400.0));
}

#[test]
fn instances_follow_ascending_depth() {
    let sprite = r#"{"type": "define_sprite", "id": 2, "records": []}"#;
    let doc = compose(
        &scene(&[
            SQUARE,
            sprite,
            r#"{"type": "place_instance", "depth": 9, "character_id": 2}"#,
            r#"{"type": "place_instance", "depth": 3, "character_id": 1}"#,
        ]),
        0,
    )
    .unwrap();
    assert_eq!(root_hrefs(&doc), vec!["#c1", "#c2"]);
}

#[test]
fn clip_instance_masks_depths_up_to_ceiling() {
    let doc = compose(
        &scene(&[
            SQUARE,
            r#"{"type": "place_instance", "depth": 1, "character_id": 1, "clip_depth": 3}"#,
            r#"{"type": "place_instance", "depth": 2, "character_id": 1}"#,
            r#"{"type": "place_instance", "depth": 3, "character_id": 1}"#,
            r#"{"type": "place_instance", "depth": 4, "character_id": 1}"#,
        ]),
        0,
    )
    .unwrap();
    let masks: Vec<_> = doc.root.elements().map(|g| g.get("mask")).collect();
    assert_eq!(masks, vec![Some("url(#mask1)"), Some("url(#mask1)"), None]);
    assert!(doc.def(MASK_WHITE_FILTER_ID).is_some());
    let mask = doc.def("mask1").unwrap();
    assert_eq!(mask.name, "mask");
    let inner = mask.elements().next().unwrap();
    assert_eq!(inner.get("filter"), Some("url(#mask_white)"));
    // The shared shape keeps its own paint.
    let path = doc.def("c1").unwrap().elements().next().unwrap();
    assert_eq!(path.get("fill"), Some("rgb(255,0,0)"));
}

#[test]
fn missing_character_is_skipped_and_recorded() {
    let doc = compose(
        &scene(&[r#"{"type": "place_instance", "depth": 1, "character_id": 99}"#]),
        0,
    )
    .unwrap();
    assert_eq!(doc.root.elements().count(), 0);
    assert!(matches!(
        doc.recovered.as_slice(),
        [ExportError::UnresolvedCharacter { id: 99 }]
    ));
}

#[test]
fn self_placing_sprite_is_cyclic() {
    let sprite = r#"{"type": "define_sprite", "id": 5, "records": [
        {"type": "place_instance", "depth": 1, "character_id": 5}]}"#;
    let err = compose(&scene(&[sprite]), 0).unwrap_err();
    assert!(matches!(err, ExportError::CyclicDefinition { id: 5 }));
}

#[test]
fn sprite_bounds_union_transformed_children() {
    let sprite = r#"{"type": "define_sprite", "id": 5, "records": [
        {"type": "place_instance", "depth": 1, "character_id": 1,
         "matrix": {"translate_x": 200}},
        {"type": "place_instance", "depth": 2, "character_id": 1,
         "matrix": {"scale_x": 2, "translate_y": 100}},
        {"type": "show_frame"}]}"#;
    let doc = compose(
        &scene(&[
            SQUARE,
            sprite,
            r#"{"type": "place_instance", "depth": 1, "character_id": 5}"#,
        ]),
        0,
    )
    .unwrap();
    let g = doc.def("c5").unwrap();
    assert_eq!(g.get("data-type"), Some("sprite"));
    assert_eq!(g.get("data-bounds"), Some("0 0 20 15"));
    let uses: Vec<_> = g.elements().flat_map(|e| e.elements()).collect();
    assert_eq!(uses[0].get("transform"), Some("matrix(1,0,0,1,10,0)"));
    let shape_pos = doc.defs.iter().position(|d| d.get("id") == Some("c1"));
    let sprite_pos = doc.defs.iter().position(|d| d.get("id") == Some("c5"));
    assert!(shape_pos < sprite_pos);
}

#[test]
fn color_transform_gets_a_filter_and_unsupported_filters_are_dropped() {
    let doc = compose(
        &scene(&[
            SQUARE,
            r#"{"type": "place_instance", "depth": 1, "character_id": 1,
                "color_transform": {"a_mult": 0.5}}"#,
            r#"{"type": "place_instance", "depth": 2, "character_id": 1,
                "filters": [{"kind": "bevel"}]}"#,
        ]),
        0,
    )
    .unwrap();
    let uses: Vec<_> = doc.root.elements().flat_map(|g| g.elements()).collect();
    assert_eq!(uses[0].get("filter"), Some("url(#filter1)"));
    assert_eq!(uses[1].get("filter"), None);
    assert_eq!(doc.def("filter1").map(|f| f.name.as_str()), Some("filter"));
    assert!(matches!(
        doc.recovered.as_slice(),
        [ExportError::UnsupportedFilter { .. }]
    ));
}

#[test]
fn bitmaps_embed_as_png_and_bad_ones_are_skipped() {
    let good = r#"{"type": "define_bitmap", "id": 2, "width": 1, "height": 1,
                   "format": "rgba", "data": "/wAA/w=="}"#;
    let bad = r#"{"type": "define_bitmap", "id": 3, "width": 4, "height": 4,
                  "format": "rgba", "data": "AAAA"}"#;
    let doc = compose(
        &scene(&[
            good,
            bad,
            r#"{"type": "place_instance", "depth": 1, "character_id": 2}"#,
            r#"{"type": "place_instance", "depth": 2, "character_id": 3}"#,
        ]),
        0,
    )
    .unwrap();
    let image = doc.def("c2").unwrap();
    assert_eq!(image.name, "image");
    assert_eq!(image.get("width"), Some("1"));
    assert!(
        image
            .get("xlink:href")
            .unwrap()
            .starts_with("data:image/png;base64,")
    );
    assert!(doc.def("c3").is_none());
    assert_eq!(root_hrefs(&doc), vec!["#c2"]);
    assert!(matches!(doc.recovered[0], ExportError::Image(_)));
    assert!(matches!(
        doc.recovered[1],
        ExportError::UnresolvedCharacter { id: 3 }
    ));
}

#[test]
fn store_glyphs_are_appended_to_their_font() {
    let font = r#"{"type": "define_font", "id": 3, "name": "Arial", "code_table": [65],
      "glyphs": [{"records": [
        {"type": "style_change", "move_to": [0, 0], "fill_style1": 1},
        {"type": "straight_edge", "dx": 400, "dy": 0},
        {"type": "straight_edge", "dx": 0, "dy": 400},
        {"type": "straight_edge", "dx": -400, "dy": -400}]}]}"#;
    let text = r#"{"type": "define_edit_text", "id": 4, "font_id": 3, "font_height": 240,
      "bounds": {"x_min": 0, "y_min": 0, "x_max": 2000, "y_max": 400},
      "initial_text": "ABB"}"#;
    let store = MemoryGlyphStore::new();
    store
        .font("Arial")
        .unwrap()
        .add_glyph(
            66,
            &GlyphOutline {
                d: "M0 0 L1 0 1 1".to_string(),
            },
        )
        .unwrap();

    let composer = Composer::new(ExportOptions::default(), Some(&store));
    let doc = composer
        .compose(
            &scene(&[
                font,
                text,
                r#"{"type": "place_instance", "depth": 1, "character_id": 4}"#,
            ]),
            0,
        )
        .unwrap();
    let ids: Vec<_> = doc
        .def("font_3")
        .unwrap()
        .elements()
        .filter_map(|p| p.get("id"))
        .collect();
    assert_eq!(ids, ["font_3_0", "font_3_1"]);
    let hrefs: Vec<_> = doc
        .def("c4")
        .unwrap()
        .elements()
        .filter_map(|u| u.get("xlink:href"))
        .collect();
    assert_eq!(hrefs, ["#font_3_0", "#font_3_1", "#font_3_1"]);
    assert_eq!(store.glyph_reads(), 1);
}

#[test]
fn margin_grows_view_box_only() {
    let options = ExportOptions {
        margin: 10.0,
        ..ExportOptions::default()
    };
    let doc = Composer::new(options, None).compose(&scene(&[]), 0).unwrap();
    assert_eq!(doc.size, (550.0, 400.0));
    let svg = doc.to_element();
    assert_eq!(svg.get("viewBox"), Some("-10 -10 570 420"));
}

#[test]
fn mismatched_alpha_plane_keeps_the_bitmap() {
    let bitmap = r#"{"type": "define_bitmap", "id": 2, "width": 1, "height": 1,
                     "format": "rgba", "data": "/wAA/w==", "alpha": "AAA="}"#;
    let doc = compose(
        &scene(&[
            bitmap,
            r#"{"type": "place_instance", "depth": 1, "character_id": 2}"#,
        ]),
        0,
    )
    .unwrap();
    assert_eq!(doc.def("c2").map(|e| e.name.as_str()), Some("image"));
    assert_eq!(root_hrefs(&doc), vec!["#c2"]);
    assert!(doc.recovered.is_empty());
}

#[test]
fn sprite_mask_does_not_leak_into_parent_timeline() {
    let sprite = r#"{"type": "define_sprite", "id": 5, "records": [
        {"type": "place_instance", "depth": 1, "character_id": 1, "clip_depth": 3},
        {"type": "place_instance", "depth": 2, "character_id": 1},
        {"type": "show_frame"}]}"#;
    let doc = compose(
        &scene(&[
            SQUARE,
            sprite,
            r#"{"type": "place_instance", "depth": 1, "character_id": 5}"#,
            r#"{"type": "place_instance", "depth": 2, "character_id": 1}"#,
        ]),
        0,
    )
    .unwrap();
    let inner: Vec<_> = doc.def("c5").unwrap().elements().map(|g| g.get("mask")).collect();
    assert_eq!(inner, vec![Some("url(#mask1)")]);
    assert!(doc.root.elements().all(|g| g.get("mask").is_none()));
}
