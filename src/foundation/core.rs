use std::fmt;

use crate::foundation::error::{ExportError, ExportResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Source units per output pixel.
pub const TWIPS_PER_PIXEL: f64 = 20.0;

/// Round a pixel value to the fixed sub-pixel precision used for all emitted coordinates.
///
/// Rounding is half away from zero at two decimals; applying it twice is a no-op.
pub fn round_pixels(px: f64) -> f64 {
    (px * 100.0).round() / 100.0
}

/// Convert twips to rounded pixels.
pub fn twips_to_px(twips: f64) -> f64 {
    round_pixels(twips / TWIPS_PER_PIXEL)
}

/// Shortest decimal rendering of a number for markup attributes (`10`, `0.05`, never `-0`).
pub fn fmt_num(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    format!("{v}")
}

/// Axis-aligned rectangle in output pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    /// Left edge.
    pub x_min: f64,
    /// Top edge.
    pub y_min: f64,
    /// Right edge.
    pub x_max: f64,
    /// Bottom edge.
    pub y_max: f64,
}

impl Bounds {
    /// Create bounds from its four edges.
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Empty bounds at the origin.
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Width (may be negative for inverted rectangles).
    pub fn width(self) -> f64 {
        self.x_max - self.x_min
    }

    /// Height (may be negative for inverted rectangles).
    pub fn height(self) -> f64 {
        self.y_max - self.y_min
    }

    /// Grow symmetrically by `margin` on every side.
    pub fn grow(self, margin: f64) -> Self {
        Self::new(
            self.x_min - margin,
            self.y_min - margin,
            self.x_max + margin,
            self.y_max + margin,
        )
    }

    /// Shrink symmetrically by `margin` on every side.
    pub fn shrink(self, margin: f64) -> Self {
        self.grow(-margin)
    }

    /// Inclusive point containment.
    pub fn contains(self, p: Point) -> bool {
        p.x >= self.x_min && p.x <= self.x_max && p.y >= self.y_min && p.y <= self.y_max
    }

    /// Smallest bounds containing both.
    pub fn union(self, other: Self) -> Self {
        Self::new(
            self.x_min.min(other.x_min),
            self.y_min.min(other.y_min),
            self.x_max.max(other.x_max),
            self.y_max.max(other.y_max),
        )
    }

    /// Bounding box of these bounds after applying `affine`.
    pub fn transform(self, affine: Affine) -> Self {
        Self::from(affine.transform_rect_bbox(self.into()))
    }

    /// Same bounds with every edge passed through [`round_pixels`].
    pub fn rounded(self) -> Self {
        Self::new(
            round_pixels(self.x_min),
            round_pixels(self.y_min),
            round_pixels(self.x_max),
            round_pixels(self.y_max),
        )
    }
}

impl From<Rect> for Bounds {
    fn from(r: Rect) -> Self {
        Self::new(r.x0, r.y0, r.x1, r.y1)
    }
}

impl From<Bounds> for Rect {
    fn from(b: Bounds) -> Self {
        Rect::new(b.x_min, b.y_min, b.x_max, b.y_max)
    }
}

/// Serialized as `xmin ymin xmax ymax` (the `data-bounds` attribute format).
impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            fmt_num(self.x_min),
            fmt_num(self.y_min),
            fmt_num(self.x_max),
            fmt_num(self.y_max)
        )
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color with explicit alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque black.
    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    /// Opaque white.
    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    /// Alpha in `[0, 1]`.
    pub fn alpha(self) -> f64 {
        f64::from(self.a) / 255.0
    }

    /// `rgb(r,g,b)` paint string; alpha is emitted separately as an opacity attribute.
    pub fn to_rgb_string(self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }
}

impl Default for Rgba8 {
    fn default() -> Self {
        Self::black()
    }
}

impl<'de> serde::Deserialize<'de> for Rgba8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Obj {
                r: u8,
                g: u8,
                b: u8,
                #[serde(default = "opaque")]
                a: u8,
            },
            Arr(Vec<u8>),
        }

        fn opaque() -> u8 {
            255
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => parse_hex(&s).map_err(serde::de::Error::custom),
            Repr::Obj { r, g, b, a } => Ok(Self::rgba(r, g, b, a)),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Ok(Self::rgb(*r, *g, *b)),
                [r, g, b, a] => Ok(Self::rgba(*r, *g, *b, *a)),
                _ => Err(serde::de::Error::custom(
                    "color array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                )),
            },
        }
    }
}

fn parse_hex(s: &str) -> ExportResult<Rgba8> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    let byte = |i: usize| {
        hex.get(i..i + 2)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .ok_or_else(|| ExportError::validation(format!("invalid hex color '{s}'")))
    };
    match hex.len() {
        6 => Ok(Rgba8::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Ok(Rgba8::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => Err(ExportError::validation(format!(
            "hex color '{s}' must be #rrggbb or #rrggbbaa"
        ))),
    }
}

/// `matrix(a,b,c,d,e,f)` markup for an affine transform.
pub fn affine_to_svg(affine: Affine) -> String {
    let c = affine.as_coeffs();
    format!(
        "matrix({},{},{},{},{},{})",
        fmt_num(c[0]),
        fmt_num(c[1]),
        fmt_num(c[2]),
        fmt_num(c[3]),
        fmt_num(c[4]),
        fmt_num(c[5])
    )
}

/// Return `true` when every coefficient is finite.
pub fn affine_is_finite(affine: Affine) -> bool {
    affine.as_coeffs().iter().all(|v| v.is_finite())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
