use super::*;
use crate::scene::model::{BlurFilter, ColorMatrixFilter};

fn shadow(knockout: bool) -> Filter {
    Filter::DropShadow(DropShadowFilter {
        color: Rgba8::rgba(0, 0, 0, 128),
        blur_x: 4.0,
        blur_y: 4.0,
        angle: 0.0,
        distance: 3.0,
        strength: 1.0,
        inner: false,
        knockout,
    })
}

#[test]
fn nothing_to_do_yields_no_graph() {
    let mut dropped = Vec::new();
    assert!(build_effects(None, &[], &mut dropped).is_none());
    assert!(build_effects(None, &[Filter::Bevel], &mut dropped).is_none());
    assert_eq!(dropped.len(), 1);
}

#[test]
fn color_transform_is_innermost_and_composited_in() {
    let ct = ColorTransform {
        r_mult: 0.5,
        ..ColorTransform::default()
    };
    let blur = Filter::Blur(BlurFilter {
        blur_x: 2.0,
        blur_y: 6.0,
        passes: 1,
    });
    let g = build_effects(Some(&ct), &[blur], &mut Vec::new()).unwrap();
    assert!(matches!(
        &g.nodes[0],
        EffectNode::ColorMatrix {
            input: FilterInput::SourceGraphic,
            ..
        }
    ));
    assert!(matches!(
        &g.nodes[1],
        EffectNode::Composite {
            input2: FilterInput::SourceGraphic,
            op: CompositeOp::In,
            ..
        }
    ));
    let EffectNode::GaussianBlur { input, std_dev, .. } = &g.nodes[2] else {
        panic!("expected blur");
    };
    assert_eq!(*input, FilterInput::Result("cxform1".to_string()));
    assert_eq!(*std_dev, (1.0, 3.0));
}

#[test]
fn drop_shadow_blurs_offsets_floods_and_blends() {
    let g = build_effects(None, &[shadow(false)], &mut Vec::new()).unwrap();
    let names: Vec<_> = g.to_element("filter1").elements().map(|e| e.name.clone()).collect();
    assert_eq!(
        names,
        ["feGaussianBlur", "feOffset", "feFlood", "feComposite", "feBlend"]
    );
    let el = g.to_element("filter1");
    let offset = el.elements().nth(1).unwrap();
    assert_eq!(offset.get("dx"), Some("3"));
    assert_eq!(offset.get("dy"), Some("0"));
    let blend = el.elements().last().unwrap();
    assert_eq!(blend.get("in"), Some("SourceGraphic"));
}

#[test]
fn knockout_shadow_masks_out_the_source() {
    let g = build_effects(None, &[shadow(true)], &mut Vec::new()).unwrap();
    assert!(matches!(
        g.nodes.last(),
        Some(EffectNode::Composite {
            op: CompositeOp::Out,
            input2: FilterInput::SourceGraphic,
            ..
        })
    ));
}

#[test]
fn filters_chain_left_to_right_and_unsupported_are_dropped() {
    let mut identity = vec![0.0; 20];
    identity[0] = 1.0;
    identity[6] = 1.0;
    identity[12] = 1.0;
    identity[18] = 1.0;
    identity[4] = 255.0;
    let filters = [
        Filter::ColorMatrix(ColorMatrixFilter { matrix: identity }),
        Filter::Convolution,
        Filter::Glow(GlowFilter {
            color: Rgba8::rgb(255, 255, 0),
            blur_x: 2.0,
            blur_y: 2.0,
            strength: 2.0,
            inner: false,
            knockout: false,
        }),
        Filter::Unknown,
    ];
    let mut dropped = Vec::new();
    let g = build_effects(None, &filters, &mut dropped).unwrap();
    let EffectNode::ColorMatrix { values, .. } = &g.nodes[0] else {
        panic!("expected matrix");
    };
    assert_eq!(values[4], 1.0);
    let EffectNode::GaussianBlur { input, .. } = &g.nodes[1] else {
        panic!("expected glow blur");
    };
    assert_eq!(*input, FilterInput::Result("matrix0".to_string()));
    let kinds: Vec<_> = dropped.iter().map(|e| e.to_string()).collect();
    assert_eq!(
        kinds,
        [
            "unsupported filter 'convolution'",
            "unsupported filter 'unknown'"
        ]
    );
}

#[test]
fn mask_white_keeps_alpha() {
    let el = mask_white_filter();
    assert_eq!(el.get("id"), Some(MASK_WHITE_FILTER_ID));
    let m = el.elements().next().unwrap();
    assert_eq!(m.get("values"), Some("0 0 0 0 1 0 0 0 0 1 0 0 0 0 1 0 0 0 1 0"));
}
