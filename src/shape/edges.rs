//! Edge-map pass: turns style-change/edge records into ordered capability calls.
//!
//! Records describe edges with a fill on either side (`fill_style0` on the left, `fill_style1` on
//! the right). Renderable fills need closed contours with a single winding, so edges are grouped
//! per style (left-side runs reversed), chained end-to-start, and replayed as fills first, then
//! strokes. A `new_styles` record starts a new group drawn on top of the previous ones.

use std::collections::BTreeMap;

use crate::foundation::error::{ExportError, ExportResult};
use crate::scene::model::{CharacterId, FillStyle, LineStyle, ShapeRecord, ShapeStyles};

type TwipPoint = (i32, i32);

/// Capability set a shape is drawn through. Coordinates are absolute twips.
pub trait ShapeSink {
    /// Start a fill run.
    fn begin_fill(&mut self, fill: &FillStyle);
    /// Finish the current fill run.
    fn end_fill(&mut self);
    /// Start a stroke run.
    fn begin_stroke(&mut self, line: &LineStyle);
    /// Finish the current stroke run.
    fn end_stroke(&mut self);
    /// Start a sub-path.
    fn move_to(&mut self, x: i32, y: i32);
    /// Straight segment from the pen.
    fn line_to(&mut self, x: i32, y: i32);
    /// Quadratic segment from the pen.
    fn curve_to(&mut self, cx: i32, cy: i32, ax: i32, ay: i32);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Edge {
    Line {
        from: TwipPoint,
        to: TwipPoint,
    },
    Curve {
        from: TwipPoint,
        ctrl: TwipPoint,
        to: TwipPoint,
    },
}

impl Edge {
    fn from(self) -> TwipPoint {
        match self {
            Self::Line { from, .. } | Self::Curve { from, .. } => from,
        }
    }

    fn to(self) -> TwipPoint {
        match self {
            Self::Line { to, .. } | Self::Curve { to, .. } => to,
        }
    }

    fn reversed(self) -> Self {
        match self {
            Self::Line { from, to } => Self::Line { from: to, to: from },
            Self::Curve { from, ctrl, to } => Self::Curve {
                from: to,
                ctrl,
                to: from,
            },
        }
    }
}

#[derive(Default)]
struct EdgeGroup {
    fills: BTreeMap<usize, Vec<Edge>>,
    lines: BTreeMap<usize, Vec<Edge>>,
}

#[derive(Default)]
struct Walker {
    fills: Vec<FillStyle>,
    lines: Vec<LineStyle>,
    fill_offset: usize,
    line_offset: usize,
    fill0: usize,
    fill1: usize,
    line: usize,
    sub_path: Vec<Edge>,
    groups: Vec<EdgeGroup>,
    current: EdgeGroup,
}

impl Walker {
    fn flush_sub_path(&mut self) {
        let sub_path = std::mem::take(&mut self.sub_path);
        if sub_path.is_empty() {
            return;
        }
        if self.fill0 != 0 {
            let edges = self.current.fills.entry(self.fill0).or_default();
            edges.extend(sub_path.iter().rev().map(|e| e.reversed()));
        }
        if self.fill1 != 0 {
            let edges = self.current.fills.entry(self.fill1).or_default();
            edges.extend(sub_path.iter().copied());
        }
        if self.line != 0 {
            let edges = self.current.lines.entry(self.line).or_default();
            edges.extend(sub_path);
        }
    }

    fn resolve(idx: Option<u32>, offset: usize, len: usize, what: &str, id: CharacterId) -> ExportResult<Option<usize>> {
        let Some(idx) = idx else {
            return Ok(None);
        };
        if idx == 0 {
            return Ok(Some(0));
        }
        let abs = offset + idx as usize;
        if abs > len {
            return Err(ExportError::malformed_path(
                id,
                format!("{what} index {idx} out of range ({} styles)", len - offset),
            ));
        }
        Ok(Some(abs))
    }
}

/// Edge deltas clamp at the twip range instead of wrapping.
fn offset(p: TwipPoint, dx: i32, dy: i32) -> TwipPoint {
    (p.0.saturating_add(dx), p.1.saturating_add(dy))
}

/// Replay `records` through `sink`, fills before strokes, one group per style table.
pub fn drive_shape(
    id: CharacterId,
    styles: &ShapeStyles,
    records: &[ShapeRecord],
    sink: &mut impl ShapeSink,
) -> ExportResult<()> {
    let mut w = Walker {
        fills: styles.fill_styles.clone(),
        lines: styles.line_styles.clone(),
        ..Walker::default()
    };
    let mut pos: TwipPoint = (0, 0);

    for rec in records {
        match rec {
            ShapeRecord::StyleChange(sc) => {
                if sc.fill_style0.is_some() || sc.fill_style1.is_some() || sc.line_style.is_some() {
                    w.flush_sub_path();
                }
                if let Some(new) = &sc.new_styles {
                    w.flush_sub_path();
                    let group = std::mem::take(&mut w.current);
                    w.groups.push(group);
                    w.fill_offset = w.fills.len();
                    w.line_offset = w.lines.len();
                    w.fills.extend(new.fill_styles.iter().cloned());
                    w.lines.extend(new.line_styles.iter().cloned());
                    w.fill0 = 0;
                    w.fill1 = 0;
                    w.line = 0;
                }
                if let Some(idx) =
                    Walker::resolve(sc.fill_style0, w.fill_offset, w.fills.len(), "fill style", id)?
                {
                    w.fill0 = idx;
                }
                if let Some(idx) =
                    Walker::resolve(sc.fill_style1, w.fill_offset, w.fills.len(), "fill style", id)?
                {
                    w.fill1 = idx;
                }
                if let Some(idx) =
                    Walker::resolve(sc.line_style, w.line_offset, w.lines.len(), "line style", id)?
                {
                    w.line = idx;
                }
                if let Some([x, y]) = sc.move_to {
                    pos = (x, y);
                }
            }
            ShapeRecord::StraightEdge { dx, dy } => {
                let to = offset(pos, *dx, *dy);
                w.sub_path.push(Edge::Line { from: pos, to });
                pos = to;
            }
            ShapeRecord::CurvedEdge {
                control_dx,
                control_dy,
                anchor_dx,
                anchor_dy,
            } => {
                let ctrl = offset(pos, *control_dx, *control_dy);
                let to = offset(ctrl, *anchor_dx, *anchor_dy);
                w.sub_path.push(Edge::Curve {
                    from: pos,
                    ctrl,
                    to,
                });
                pos = to;
            }
        }
    }
    w.flush_sub_path();
    let last = std::mem::take(&mut w.current);
    w.groups.push(last);

    for group in &w.groups {
        for (idx, edges) in &group.fills {
            sink.begin_fill(&w.fills[idx - 1]);
            replay(&chain(edges.clone()), sink);
            sink.end_fill();
        }
        for (idx, edges) in &group.lines {
            sink.begin_stroke(&w.lines[idx - 1]);
            replay(edges, sink);
            sink.end_stroke();
        }
    }
    Ok(())
}

/// Order edges so each one starts where the previous ended whenever such an edge exists.
fn chain(mut edges: Vec<Edge>) -> Vec<Edge> {
    let mut out = Vec::with_capacity(edges.len());
    let mut prev: Option<Edge> = None;
    while !edges.is_empty() {
        let idx = prev
            .and_then(|p| edges.iter().position(|e| e.from() == p.to()))
            .unwrap_or(0);
        let edge = edges.remove(idx);
        out.push(edge);
        prev = Some(edge);
    }
    out
}

fn replay(edges: &[Edge], sink: &mut impl ShapeSink) {
    let mut pen: Option<TwipPoint> = None;
    for edge in edges {
        let from = edge.from();
        if pen != Some(from) {
            sink.move_to(from.0, from.1);
        }
        match *edge {
            Edge::Line { to, .. } => sink.line_to(to.0, to.1),
            Edge::Curve { ctrl, to, .. } => sink.curve_to(ctrl.0, ctrl.1, to.0, to.1),
        }
        pen = Some(edge.to());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shape/edges.rs"]
mod tests;
