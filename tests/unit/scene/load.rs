use super::*;

fn scene(records: &str) -> Scene {
    let json = format!(
        r#"{{"header":{{"frame_size":{{"x_min":0,"y_min":0,"x_max":200,"y_max":200}}}},"records":{records}}}"#
    );
    Scene::from_reader(json.as_bytes()).unwrap()
}

#[test]
fn header_defaults_to_one_frame() {
    let s = scene("[]");
    assert_eq!(s.frame_count(), 1);
    s.validate().unwrap();
}

#[test]
fn duplicate_ids_inside_sprites_are_rejected() {
    let s = scene(
        r#"[{"type":"define_shape","id":1,"records":[]},
            {"type":"define_sprite","id":2,"records":[{"type":"define_shape","id":1,"records":[]}]}]"#,
    );
    let err = s.validate().unwrap_err();
    assert!(err.to_string().contains("character id 1"));
}

#[test]
fn short_color_matrix_is_rejected() {
    let s = scene(
        r#"[{"type":"place_instance","depth":1,"character_id":1,
             "filters":[{"kind":"color_matrix","matrix":[1,0,0]}]}]"#,
    );
    assert!(s.validate().is_err());
}

#[test]
fn malformed_json_is_a_validation_error() {
    let err = Scene::from_reader("{".as_bytes()).unwrap_err();
    assert!(matches!(err, ExportError::Validation(_)));
}

#[test]
fn missing_file_reports_path() {
    let err = Scene::from_path("definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("definitely/not/here.json"));
}

#[test]
fn mismatched_alpha_plane_passes_validation() {
    let s = scene(
        r#"[{"type":"define_bitmap","id":1,"width":1,"height":1,"format":"rgba",
             "data":"/wAA/w==","alpha":"AAA="}]"#,
    );
    s.validate().unwrap();
}
