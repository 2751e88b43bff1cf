use crate::effects::paint::PaintRegistry;
use crate::foundation::core::{Bounds, Point, Rgba8, fmt_num, twips_to_px};
use crate::foundation::error::{ExportError, ExportResult};
use crate::scene::model::{
    CapStyle, CharacterId, FillStyle, GlyphDef, JoinStyle, LineStyle, ShapeRecord, ShapeStyles,
};
use crate::shape::edges::{ShapeSink, drive_shape};
use crate::shape::path::{Path, PathCommand};
use crate::svg::document::Element;

/// Options affecting emitted path paint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeOptions {
    /// Outline opaque solid fills with a 1px stroke of the same color.
    pub force_stroke: bool,
    /// Smallest emitted stroke width in pixels.
    pub min_stroke_width: f64,
}

impl Default for ShapeOptions {
    fn default() -> Self {
        Self {
            force_stroke: false,
            min_stroke_width: 0.5,
        }
    }
}

/// Paint of one style run.
#[derive(Clone, Debug, PartialEq)]
pub enum RunStyle {
    /// Filled contour.
    Fill(FillStyle),
    /// Stroked outline.
    Stroke(LineStyle),
}

/// Geometry of one contiguous style run.
#[derive(Clone, Debug, PartialEq)]
pub struct StyledPath {
    /// Paint of the run.
    pub style: RunStyle,
    /// Rounded pixel geometry.
    pub path: Path,
}

/// Builder for the run currently being drawn; finished at every style boundary.
#[derive(Debug)]
pub struct PathRun {
    style: RunStyle,
    path: Path,
}

impl PathRun {
    /// Open a run with the given paint.
    pub fn new(style: RunStyle) -> Self {
        Self {
            style,
            path: Path::new(),
        }
    }

    /// Append one command (twip coordinates are converted to rounded pixels by the caller).
    pub fn draw(mut self, cmd: PathCommand) -> Self {
        self.path.push(cmd);
        self
    }

    /// Close the run; runs without any drawn segment are dropped.
    pub fn finish(self) -> Option<StyledPath> {
        self.path.has_drawing().then_some(StyledPath {
            style: self.style,
            path: self.path,
        })
    }
}

fn px(x: i32, y: i32) -> Point {
    Point::new(twips_to_px(f64::from(x)), twips_to_px(f64::from(y)))
}

/// [`ShapeSink`] collecting one [`StyledPath`] per style run.
#[derive(Debug, Default)]
pub struct PathCollector {
    current: Option<PathRun>,
    runs: Vec<StyledPath>,
}

impl PathCollector {
    fn start(&mut self, style: RunStyle) {
        self.finish_run();
        self.current = Some(PathRun::new(style));
    }

    fn finish_run(&mut self) {
        if let Some(run) = self.current.take().and_then(PathRun::finish) {
            self.runs.push(run);
        }
    }

    fn draw(&mut self, cmd: PathCommand) {
        self.current = self.current.take().map(|run| run.draw(cmd));
    }

    /// Collected runs in drawing order.
    pub fn into_runs(mut self) -> Vec<StyledPath> {
        self.finish_run();
        self.runs
    }
}

impl ShapeSink for PathCollector {
    fn begin_fill(&mut self, fill: &FillStyle) {
        self.start(RunStyle::Fill(fill.clone()));
    }

    fn end_fill(&mut self) {
        self.finish_run();
    }

    fn begin_stroke(&mut self, line: &LineStyle) {
        self.start(RunStyle::Stroke(line.clone()));
    }

    fn end_stroke(&mut self) {
        self.finish_run();
    }

    fn move_to(&mut self, x: i32, y: i32) {
        self.draw(PathCommand::MoveTo(px(x, y)));
    }

    fn line_to(&mut self, x: i32, y: i32) {
        self.draw(PathCommand::LineTo(px(x, y)));
    }

    fn curve_to(&mut self, cx: i32, cy: i32, ax: i32, ay: i32) {
        self.draw(PathCommand::QuadTo {
            ctrl: px(cx, cy),
            to: px(ax, ay),
        });
    }
}

/// Turn drawing records into style runs.
pub fn collect_paths(
    id: CharacterId,
    styles: &ShapeStyles,
    records: &[ShapeRecord],
) -> ExportResult<Vec<StyledPath>> {
    let mut sink = PathCollector::default();
    drive_shape(id, styles, records, &mut sink)?;
    let runs = sink.into_runs();
    for run in &runs {
        let finite = run.path.commands().iter().all(|c| match *c {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => p.is_finite(),
            PathCommand::QuadTo { ctrl, to } => ctrl.is_finite() && to.is_finite(),
        });
        if !finite {
            return Err(ExportError::malformed_path(id, "non-finite coordinate"));
        }
    }
    Ok(runs)
}

/// Union of the geometry bounds of all runs, rounded.
pub fn runs_bounds(runs: &[StyledPath]) -> Bounds {
    runs.iter()
        .filter_map(|r| r.path.bounds())
        .reduce(Bounds::union)
        .unwrap_or_else(Bounds::zero)
        .rounded()
}

/// Outline of a font glyph: path data of the first run, paint stripped.
///
/// Glyph records carry no style table; their fill side refers to an implicit solid fill.
pub fn glyph_outline(font_id: CharacterId, glyph: &GlyphDef) -> ExportResult<Option<String>> {
    let styles = ShapeStyles {
        fill_styles: vec![FillStyle::Solid {
            color: Rgba8::black(),
        }],
        line_styles: Vec::new(),
    };
    let runs = collect_paths(font_id, &styles, &glyph.records)?;
    Ok(runs.first().map(|r| r.path.to_svg_data()))
}

/// Render runs as `<path>` elements, registering paint servers on the way.
///
/// Runs whose bitmap fill cannot be resolved are skipped and reported in `recovered`.
pub fn render_paths(
    runs: &[StyledPath],
    paints: &mut PaintRegistry,
    opts: ShapeOptions,
    recovered: &mut Vec<ExportError>,
) -> Vec<Element> {
    let mut out = Vec::with_capacity(runs.len());
    for run in runs {
        let mut el = Element::new("path");
        let painted = match &run.style {
            RunStyle::Fill(fill) => fill_attrs(&mut el, fill, paints, opts),
            RunStyle::Stroke(line) => stroke_attrs(&mut el, line, paints, opts),
        };
        if let Err(id) = painted {
            tracing::warn!(bitmap = id, "skipping run with unresolved bitmap fill");
            recovered.push(ExportError::UnresolvedCharacter { id });
            continue;
        }
        el.set("d", run.path.to_svg_data());
        out.push(el);
    }
    out
}

fn fill_attrs(
    el: &mut Element,
    fill: &FillStyle,
    paints: &mut PaintRegistry,
    opts: ShapeOptions,
) -> Result<(), CharacterId> {
    let paint = paints.paint(fill)?;
    el.set("fill", paint.clone());
    match fill {
        FillStyle::Solid { color } if color.a < 255 => {
            el.set("fill-opacity", fmt_num(color.alpha()));
        }
        FillStyle::Solid { .. } if opts.force_stroke => {
            el.set("stroke", paint);
            el.set("stroke-width", "1");
        }
        _ => el.set("stroke", "none"),
    }
    Ok(())
}

fn stroke_attrs(
    el: &mut Element,
    line: &LineStyle,
    paints: &mut PaintRegistry,
    opts: ShapeOptions,
) -> Result<(), CharacterId> {
    el.set("fill", "none");
    match &line.fill {
        Some(fill) => el.set("stroke", paints.paint(fill)?),
        None => {
            el.set("stroke", line.color.to_rgb_string());
            if line.color.a < 255 {
                el.set("stroke-opacity", fmt_num(line.color.alpha()));
            }
        }
    }
    el.set("stroke-width", fmt_num(stroke_width(line, opts.min_stroke_width)));
    el.set(
        "stroke-linecap",
        match line.start_cap {
            CapStyle::Round => "round",
            CapStyle::None => "butt",
            CapStyle::Square => "square",
        },
    );
    el.set(
        "stroke-linejoin",
        match line.join {
            JoinStyle::Round => "round",
            JoinStyle::Bevel => "bevel",
            JoinStyle::Miter => "miter",
        },
    );
    if line.join == JoinStyle::Miter {
        el.set("stroke-miterlimit", fmt_num(line.miter_limit));
    }
    Ok(())
}

/// Emitted stroke width: absent width is 1px, anything thinner than `min` is clamped up.
pub fn stroke_width(line: &LineStyle, min: f64) -> f64 {
    let w = line
        .width
        .map(|w| f64::from(w) / crate::foundation::core::TWIPS_PER_PIXEL)
        .unwrap_or(1.0);
    w.max(min)
}

#[cfg(test)]
#[path = "../../tests/unit/shape/exporter.rs"]
mod tests;
