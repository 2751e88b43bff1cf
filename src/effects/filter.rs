//! Per-instance effect graphs: color transforms and surface filters as SVG filter primitives.

use crate::foundation::core::{Rgba8, fmt_num};
use crate::foundation::error::ExportError;
use crate::scene::model::{ColorTransform, DropShadowFilter, Filter, GlowFilter};
use crate::svg::document::Element;

/// Id of the shared filter that paints mask content opaque white.
pub const MASK_WHITE_FILTER_ID: &str = "mask_white";

/// Input of a filter primitive.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterInput {
    /// The element's own rendering.
    SourceGraphic,
    /// Result of an earlier node.
    Result(String),
}

impl FilterInput {
    fn as_attr(&self) -> &str {
        match self {
            Self::SourceGraphic => "SourceGraphic",
            Self::Result(r) => r,
        }
    }
}

/// `feComposite` operators in use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompositeOp {
    /// Keep `in` where `in2` is opaque.
    In,
    /// Keep `in` where `in2` is transparent.
    Out,
    /// `in` over `in2`, clipped to `in2`.
    Atop,
}

impl CompositeOp {
    fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
            Self::Atop => "atop",
        }
    }
}

/// One filter primitive. Every node names its output so later nodes can consume it.
#[derive(Clone, Debug, PartialEq)]
pub enum EffectNode {
    /// `feColorMatrix type="matrix"`.
    ColorMatrix {
        /// Input.
        input: FilterInput,
        /// 20 row-major values, offsets in `[0, 1]` units.
        values: Vec<f64>,
        /// Output name.
        result: String,
    },
    /// `feComposite`.
    Composite {
        /// Upper input.
        input: FilterInput,
        /// Lower input.
        input2: FilterInput,
        /// Operator.
        op: CompositeOp,
        /// Output name.
        result: String,
    },
    /// `feGaussianBlur`.
    GaussianBlur {
        /// Input.
        input: FilterInput,
        /// Standard deviation per axis.
        std_dev: (f64, f64),
        /// Output name.
        result: String,
    },
    /// `feOffset`.
    Offset {
        /// Input.
        input: FilterInput,
        /// Horizontal shift.
        dx: f64,
        /// Vertical shift.
        dy: f64,
        /// Output name.
        result: String,
    },
    /// `feFlood`.
    Flood {
        /// Flood color (alpha goes to `opacity`).
        color: Rgba8,
        /// Flood opacity.
        opacity: f64,
        /// Output name.
        result: String,
    },
    /// `feBlend mode="normal"`: `input` over `input2`.
    Blend {
        /// Upper input.
        input: FilterInput,
        /// Lower input.
        input2: FilterInput,
        /// Output name.
        result: String,
    },
}

impl EffectNode {
    fn result(&self) -> &str {
        match self {
            Self::ColorMatrix { result, .. }
            | Self::Composite { result, .. }
            | Self::GaussianBlur { result, .. }
            | Self::Offset { result, .. }
            | Self::Flood { result, .. }
            | Self::Blend { result, .. } => result,
        }
    }

    fn to_element(&self) -> Element {
        match self {
            Self::ColorMatrix {
                input,
                values,
                result,
            } => Element::new("feColorMatrix")
                .with("in", input.as_attr())
                .with("type", "matrix")
                .with("values", join_nums(values))
                .with("result", result.clone()),
            Self::Composite {
                input,
                input2,
                op,
                result,
            } => Element::new("feComposite")
                .with("in", input.as_attr())
                .with("in2", input2.as_attr())
                .with("operator", op.as_str())
                .with("result", result.clone()),
            Self::GaussianBlur {
                input,
                std_dev,
                result,
            } => {
                let dev = if std_dev.0 == std_dev.1 {
                    fmt_num(std_dev.0)
                } else {
                    format!("{} {}", fmt_num(std_dev.0), fmt_num(std_dev.1))
                };
                Element::new("feGaussianBlur")
                    .with("in", input.as_attr())
                    .with("stdDeviation", dev)
                    .with("result", result.clone())
            }
            Self::Offset {
                input,
                dx,
                dy,
                result,
            } => Element::new("feOffset")
                .with("in", input.as_attr())
                .with("dx", fmt_num(*dx))
                .with("dy", fmt_num(*dy))
                .with("result", result.clone()),
            Self::Flood {
                color,
                opacity,
                result,
            } => Element::new("feFlood")
                .with("flood-color", color.to_rgb_string())
                .with("flood-opacity", fmt_num(*opacity))
                .with("result", result.clone()),
            Self::Blend {
                input,
                input2,
                result,
            } => Element::new("feBlend")
                .with("in", input.as_attr())
                .with("in2", input2.as_attr())
                .with("mode", "normal")
                .with("result", result.clone()),
        }
    }
}

fn join_nums(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| fmt_num(*v))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Ordered filter primitives; each node reads the output of the chain so far.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EffectGraph {
    /// Nodes in evaluation order.
    pub nodes: Vec<EffectNode>,
}

impl EffectGraph {
    fn current(&self) -> FilterInput {
        self.nodes
            .last()
            .map_or(FilterInput::SourceGraphic, |n| FilterInput::Result(n.result().to_string()))
    }

    fn name(&self, what: &str) -> String {
        format!("{what}{}", self.nodes.len())
    }

    fn push_color_matrix(&mut self, values: Vec<f64>) {
        let result = self.name("matrix");
        let input = self.current();
        self.nodes.push(EffectNode::ColorMatrix {
            input,
            values,
            result,
        });
    }

    fn push_color_transform(&mut self, ct: &ColorTransform) {
        self.push_color_matrix(ct.matrix().to_vec());
        let input = self.current();
        let result = self.name("cxform");
        self.nodes.push(EffectNode::Composite {
            input,
            input2: FilterInput::SourceGraphic,
            op: CompositeOp::In,
            result,
        });
    }

    fn push_blur(&mut self, input: FilterInput, bx: f64, by: f64) -> FilterInput {
        let result = self.name("blur");
        self.nodes.push(EffectNode::GaussianBlur {
            input,
            std_dev: (bx / 2.0, by / 2.0),
            result: result.clone(),
        });
        FilterInput::Result(result)
    }

    /// Flood colored through the alpha of `shaped`, then merged with `base`.
    fn push_halo(&mut self, base: FilterInput, shaped: FilterInput, halo: Halo) {
        let flood = self.name("flood");
        self.nodes.push(EffectNode::Flood {
            color: halo.color,
            opacity: (halo.color.alpha() * halo.strength).clamp(0.0, 1.0),
            result: flood.clone(),
        });
        let colored = self.name("halo");
        self.nodes.push(EffectNode::Composite {
            input: FilterInput::Result(flood),
            input2: shaped,
            op: CompositeOp::In,
            result: colored.clone(),
        });
        let colored = FilterInput::Result(colored);
        let result = self.name("merge");
        let node = match (halo.inner, halo.knockout) {
            (false, false) => EffectNode::Blend {
                input: base,
                input2: colored,
                result,
            },
            (false, true) => EffectNode::Composite {
                input: colored,
                input2: base,
                op: CompositeOp::Out,
                result,
            },
            (true, false) => EffectNode::Composite {
                input: colored,
                input2: base,
                op: CompositeOp::Atop,
                result,
            },
            (true, true) => EffectNode::Composite {
                input: colored,
                input2: base,
                op: CompositeOp::In,
                result,
            },
        };
        self.nodes.push(node);
    }

    fn push_drop_shadow(&mut self, f: &DropShadowFilter) {
        let base = self.current();
        let blurred = self.push_blur(base.clone(), f.blur_x, f.blur_y);
        let offset = self.name("offset");
        self.nodes.push(EffectNode::Offset {
            input: blurred,
            dx: f.distance * f.angle.cos(),
            dy: f.distance * f.angle.sin(),
            result: offset.clone(),
        });
        self.push_halo(
            base,
            FilterInput::Result(offset),
            Halo {
                color: f.color,
                strength: f.strength,
                inner: f.inner,
                knockout: f.knockout,
            },
        );
    }

    fn push_glow(&mut self, f: &GlowFilter) {
        let base = self.current();
        let blurred = self.push_blur(base.clone(), f.blur_x, f.blur_y);
        self.push_halo(
            base,
            blurred,
            Halo {
                color: f.color,
                strength: f.strength,
                inner: f.inner,
                knockout: f.knockout,
            },
        );
    }

    /// `<filter id=..>` wrapping the nodes, with a region large enough for shadows and glows.
    pub fn to_element(&self, id: &str) -> Element {
        let mut el = Element::new("filter")
            .with("id", id)
            .with("x", "-50%")
            .with("y", "-50%")
            .with("width", "200%")
            .with("height", "200%");
        for node in &self.nodes {
            el.push(node.to_element());
        }
        el
    }
}

#[derive(Clone, Copy)]
struct Halo {
    color: Rgba8,
    strength: f64,
    inner: bool,
    knockout: bool,
}

/// Build the effect graph of one placed instance.
///
/// The color transform is applied first (innermost) and composited against the source so fully
/// transparent regions stay transparent. Filters follow in list order. Kinds without an SVG
/// equivalent are dropped and reported through `dropped`. Returns `None` when nothing remains.
pub fn build_effects(
    color_transform: Option<&ColorTransform>,
    filters: &[Filter],
    dropped: &mut Vec<ExportError>,
) -> Option<EffectGraph> {
    let mut graph = EffectGraph::default();
    if let Some(ct) = color_transform {
        graph.push_color_transform(ct);
    }
    for filter in filters {
        match filter {
            Filter::DropShadow(f) => graph.push_drop_shadow(f),
            Filter::Glow(f) => graph.push_glow(f),
            Filter::Blur(f) => {
                let input = graph.current();
                graph.push_blur(input, f.blur_x, f.blur_y);
            }
            Filter::ColorMatrix(f) => {
                let values = f
                    .matrix
                    .iter()
                    .enumerate()
                    .map(|(i, v)| if i % 5 == 4 { v / 255.0 } else { *v })
                    .collect();
                graph.push_color_matrix(values);
            }
            Filter::Bevel
            | Filter::GradientGlow
            | Filter::GradientBevel
            | Filter::Convolution
            | Filter::Unknown => {
                tracing::debug!(kind = filter.kind_name(), "dropping unsupported filter");
                dropped.push(ExportError::UnsupportedFilter {
                    kind: filter.kind_name().to_string(),
                });
            }
        }
    }
    (!graph.nodes.is_empty()).then_some(graph)
}

/// Shared filter forcing mask content to opaque white while keeping its alpha.
pub fn mask_white_filter() -> Element {
    let mut values = vec![0.0; 20];
    values[4] = 1.0;
    values[9] = 1.0;
    values[14] = 1.0;
    values[18] = 1.0;
    Element::new("filter")
        .with("id", MASK_WHITE_FILTER_ID)
        .with_child(
            Element::new("feColorMatrix")
                .with("in", "SourceGraphic")
                .with("type", "matrix")
                .with("values", join_nums(&values)),
        )
}

#[cfg(test)]
#[path = "../../tests/unit/effects/filter.rs"]
mod tests;
