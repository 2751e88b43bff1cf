use super::*;

#[test]
fn matrix_converts_translation_only_for_placements() {
    let m = Matrix {
        scale_x: 2.0,
        translate_x: 200.0,
        translate_y: -40.0,
        ..Matrix::identity()
    };
    assert_eq!(m.to_affine().as_coeffs(), [2.0, 0.0, 0.0, 1.0, 10.0, -2.0]);
    assert_eq!(
        m.to_pattern_affine().as_coeffs(),
        [0.1, 0.0, 0.0, 0.05, 10.0, -2.0]
    );
}

#[test]
fn color_transform_matrix_normalizes_offsets() {
    let ct = ColorTransform {
        r_mult: 0.5,
        a_add: 255.0,
        ..ColorTransform::default()
    };
    let m = ct.matrix();
    assert_eq!(m[0], 0.5);
    assert_eq!(m[19], 1.0);
    assert_eq!(m[4], 0.0);
}

#[test]
fn records_deserialize_by_type_tag() {
    let json = r#"[
        {"type":"place_instance","depth":3,"character_id":1,"move":true,
         "filters":[{"kind":"blur","blur_x":4,"blur_y":4},{"kind":"something_new"}]},
        {"type":"remove_instance","depth":3},
        {"type":"show_frame"}
    ]"#;
    let recs: Vec<Record> = serde_json::from_str(json).unwrap();
    let Record::PlaceInstance(p) = &recs[0] else {
        panic!("expected placement");
    };
    assert!(p.is_move);
    let filters = p.filters.as_ref().unwrap();
    assert_eq!(filters[1], Filter::Unknown);
    assert_eq!(filters[0].kind_name(), "blur");
    assert!(matches!(recs[2], Record::ShowFrame));
}

#[test]
fn bitmap_bytes_are_base64() {
    let json = r#"{"id":4,"width":1,"height":1,"format":"rgba","data":"AQIDBA=="}"#;
    let b: BitmapDef = serde_json::from_str(json).unwrap();
    assert_eq!(b.data, vec![1, 2, 3, 4]);
    assert!(b.alpha.is_none());
    let back = serde_json::to_string(&b).unwrap();
    assert!(back.contains("AQIDBA=="));
}

#[test]
fn line_style_defaults() {
    let ls: LineStyle = serde_json::from_str("{}").unwrap();
    assert_eq!(ls.width, None);
    assert_eq!(ls.color, Rgba8::black());
    assert_eq!(ls.start_cap, CapStyle::Round);
    assert_eq!(ls.miter_limit, 3.0);
}

#[test]
fn twip_rect_converts_to_pixels() {
    let r = TwipRect::new(0, -20, 200, 100);
    assert_eq!(r.to_bounds(), Bounds::new(0.0, -1.0, 10.0, 5.0));
}
