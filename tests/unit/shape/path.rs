use super::*;

fn square() -> Path {
    let mut p = Path::new();
    p.push(PathCommand::MoveTo(Point::new(0.0, 0.0)));
    p.push(PathCommand::LineTo(Point::new(10.0, 0.0)));
    p.push(PathCommand::LineTo(Point::new(10.0, 10.0)));
    p.push(PathCommand::LineTo(Point::new(0.0, 10.0)));
    p.push(PathCommand::LineTo(Point::new(0.0, 0.0)));
    p
}

#[test]
fn data_emits_letters_only_on_change() {
    let mut p = square();
    p.push(PathCommand::QuadTo {
        ctrl: Point::new(5.0, -5.0),
        to: Point::new(10.0, 0.0),
    });
    p.push(PathCommand::QuadTo {
        ctrl: Point::new(0.05, 1.5),
        to: Point::new(-0.0, 0.0),
    });
    assert_eq!(
        p.to_svg_data(),
        "M0 0 L10 0 10 10 0 10 0 0 Q5 -5 10 0 0.05 1.5 0 0"
    );
}

#[test]
fn every_subpath_starts_with_move() {
    let mut p = square();
    p.push(PathCommand::MoveTo(Point::new(2.0, 2.0)));
    p.push(PathCommand::LineTo(Point::new(3.0, 3.0)));
    assert!(p.to_svg_data().ends_with("M2 2 L3 3"));

    let mut implicit = Path::new();
    implicit.push(PathCommand::LineTo(Point::new(1.0, 1.0)));
    assert_eq!(implicit.commands()[0], PathCommand::MoveTo(Point::ZERO));
}

#[test]
fn bounds_follow_transform_and_reset_on_mutation() {
    let mut p = square();
    assert_eq!(p.bounds(), Some(Bounds::new(0.0, 0.0, 10.0, 10.0)));
    p.set_transform(Affine::translate((5.0, 5.0)));
    assert_eq!(p.bounds(), Some(Bounds::new(5.0, 5.0, 15.0, 15.0)));
    assert_eq!(p.global()[0], PathCommand::MoveTo(Point::new(5.0, 5.0)));
    p.push(PathCommand::LineTo(Point::new(20.0, 0.0)));
    assert_eq!(p.bounds().map(|b| b.x_max), Some(25.0));
}

#[test]
fn move_only_path_has_no_drawing() {
    let mut p = Path::new();
    p.push(PathCommand::MoveTo(Point::new(1.0, 1.0)));
    assert!(!p.has_drawing());
    assert_eq!(p.bounds(), None);
}
