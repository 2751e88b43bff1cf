use std::cell::OnceCell;

use crate::foundation::core::{Affine, BezPath, Bounds, Point, fmt_num};

/// One drawing command in local (already rounded pixel) coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    /// Start a sub-path.
    MoveTo(Point),
    /// Straight segment.
    LineTo(Point),
    /// Quadratic segment.
    QuadTo {
        /// Control point.
        ctrl: Point,
        /// End point.
        to: Point,
    },
}

impl PathCommand {
    fn letter(self) -> char {
        match self {
            Self::MoveTo(_) => 'M',
            Self::LineTo(_) => 'L',
            Self::QuadTo { .. } => 'Q',
        }
    }

    fn transformed(self, t: Affine) -> Self {
        match self {
            Self::MoveTo(p) => Self::MoveTo(t * p),
            Self::LineTo(p) => Self::LineTo(t * p),
            Self::QuadTo { ctrl, to } => Self::QuadTo {
                ctrl: t * ctrl,
                to: t * to,
            },
        }
    }
}

/// Ordered drawing commands plus an owning transform.
///
/// Global coordinates and bounds are computed on first access and dropped by every mutation.
#[derive(Clone, Debug, Default)]
pub struct Path {
    commands: Vec<PathCommand>,
    transform: Affine,
    global: OnceCell<Vec<PathCommand>>,
    bounds: OnceCell<Option<Bounds>>,
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.commands == other.commands && self.transform == other.transform
    }
}

impl Path {
    /// Empty path with identity transform.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the owning transform.
    pub fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
        self.invalidate();
    }

    /// Owning transform.
    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// Append a command. A path always starts with `MoveTo`: drawing onto an empty path first
    /// moves to the origin.
    pub fn push(&mut self, cmd: PathCommand) {
        if self.commands.is_empty() && !matches!(cmd, PathCommand::MoveTo(_)) {
            self.commands.push(PathCommand::MoveTo(Point::ZERO));
        }
        self.commands.push(cmd);
        self.invalidate();
    }

    /// Commands in local coordinates.
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// `true` when at least one segment is drawn.
    pub fn has_drawing(&self) -> bool {
        self.commands
            .iter()
            .any(|c| !matches!(c, PathCommand::MoveTo(_)))
    }

    /// Commands with the owning transform applied.
    pub fn global(&self) -> &[PathCommand] {
        self.global.get_or_init(|| {
            self.commands
                .iter()
                .map(|c| c.transformed(self.transform))
                .collect()
        })
    }

    /// Tight bounds of the global geometry, `None` for paths without segments.
    pub fn bounds(&self) -> Option<Bounds> {
        *self.bounds.get_or_init(|| {
            if !self.has_drawing() {
                return None;
            }
            let mut bez = BezPath::new();
            for cmd in self.global() {
                match *cmd {
                    PathCommand::MoveTo(p) => bez.move_to(p),
                    PathCommand::LineTo(p) => bez.line_to(p),
                    PathCommand::QuadTo { ctrl, to } => bez.quad_to(ctrl, to),
                }
            }
            Some(Bounds::from(kurbo::Shape::bounding_box(&bez)))
        })
    }

    /// SVG path data: `M` starts every sub-path, `L`/`Q` letters only when the command changes.
    pub fn to_svg_data(&self) -> String {
        let mut out = String::new();
        let mut last: Option<char> = None;
        for cmd in &self.commands {
            let letter = cmd.letter();
            if letter == 'M' || last != Some(letter) {
                out.push(letter);
            }
            last = Some(letter);
            match *cmd {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => push_point(&mut out, p),
                PathCommand::QuadTo { ctrl, to } => {
                    push_point(&mut out, ctrl);
                    push_point(&mut out, to);
                }
            }
            if letter == 'M' {
                last = None;
            }
        }
        out.truncate(out.trim_end().len());
        out
    }

    fn invalidate(&mut self) {
        self.global = OnceCell::new();
        self.bounds = OnceCell::new();
    }
}

fn push_point(out: &mut String, p: Point) {
    out.push_str(&fmt_num(p.x));
    out.push(' ');
    out.push_str(&fmt_num(p.y));
    out.push(' ');
}

#[cfg(test)]
#[path = "../../tests/unit/shape/path.rs"]
mod tests;
