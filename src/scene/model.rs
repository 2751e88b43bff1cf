//! Decoded SWF object model consumed by the exporter.
//!
//! Coordinates are kept in twips (1/20 px) exactly as the tag stream stores them; conversion to
//! output pixels happens in the exporter.

use serde::{Deserialize, Serialize};

use crate::foundation::core::{Affine, Bounds, Rgba8, TWIPS_PER_PIXEL};

/// Character identifier shared by definitions and placements.
pub type CharacterId = u16;

/// Z-order key of a placed instance.
pub type Depth = u16;

/// Default font units per em (DefineFont3 glyph space).
pub const DEFAULT_EM_SQUARE: f64 = 20480.0;

fn one() -> f64 {
    1.0
}

fn one_u32() -> u32 {
    1
}

fn default_em() -> f64 {
    DEFAULT_EM_SQUARE
}

fn default_miter() -> f64 {
    3.0
}

/// Rectangle in twips.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwipRect {
    /// Left edge.
    pub x_min: i32,
    /// Top edge.
    pub y_min: i32,
    /// Right edge.
    pub x_max: i32,
    /// Bottom edge.
    pub y_max: i32,
}

impl TwipRect {
    /// Construct from twip edges.
    pub fn new(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Convert to output pixels.
    pub fn to_bounds(self) -> Bounds {
        Bounds::new(
            f64::from(self.x_min) / TWIPS_PER_PIXEL,
            f64::from(self.y_min) / TWIPS_PER_PIXEL,
            f64::from(self.x_max) / TWIPS_PER_PIXEL,
            f64::from(self.y_max) / TWIPS_PER_PIXEL,
        )
    }
}

/// Movie header.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Header {
    /// Stage rectangle.
    pub frame_size: TwipRect,
    /// Number of frames on the main timeline.
    #[serde(default = "one_u32")]
    pub frame_count: u32,
    /// Nominal playback rate.
    #[serde(default)]
    pub frame_rate: f32,
    /// File format version.
    #[serde(default)]
    pub version: u8,
}

/// A decoded document: header plus the main timeline record stream.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scene {
    /// Movie header.
    pub header: Header,
    /// Main timeline records in file order.
    pub records: Vec<Record>,
}

/// One record of a timeline stream.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Record {
    /// Vector shape definition.
    DefineShape(ShapeDef),
    /// Embedded font definition.
    DefineFont(FontDef),
    /// Static text definition.
    DefineText(TextDef),
    /// Editable (dynamic/input) text definition.
    DefineEditText(EditTextDef),
    /// Bitmap definition.
    DefineBitmap(BitmapDef),
    /// Nested timeline definition.
    DefineSprite(SpriteDef),
    /// Place, replace or move an instance at a depth.
    PlaceInstance(Placement),
    /// Remove the instance at a depth.
    RemoveInstance(Removal),
    /// Frame boundary.
    ShowFrame,
}

impl Record {
    /// Character id for definition records.
    pub fn character_id(&self) -> Option<CharacterId> {
        match self {
            Self::DefineShape(d) => Some(d.id),
            Self::DefineFont(d) => Some(d.id),
            Self::DefineText(d) => Some(d.id),
            Self::DefineEditText(d) => Some(d.id),
            Self::DefineBitmap(d) => Some(d.id),
            Self::DefineSprite(d) => Some(d.id),
            Self::PlaceInstance(_) | Self::RemoveInstance(_) | Self::ShowFrame => None,
        }
    }
}

/// Source 2x3 matrix. Translation is in twips.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    /// Horizontal scale (`a`).
    #[serde(default = "one")]
    pub scale_x: f64,
    /// Vertical scale (`d`).
    #[serde(default = "one")]
    pub scale_y: f64,
    /// First skew term (`b`).
    #[serde(default)]
    pub rotate_skew0: f64,
    /// Second skew term (`c`).
    #[serde(default)]
    pub rotate_skew1: f64,
    /// Horizontal translation in twips.
    #[serde(default)]
    pub translate_x: f64,
    /// Vertical translation in twips.
    #[serde(default)]
    pub translate_y: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix {
    /// Identity matrix.
    pub fn identity() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
            rotate_skew0: 0.0,
            rotate_skew1: 0.0,
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }

    /// Translation-only matrix (twips).
    pub fn translate(x: f64, y: f64) -> Self {
        Self {
            translate_x: x,
            translate_y: y,
            ..Self::identity()
        }
    }

    /// Placement space: translation converted to pixels, linear part unchanged.
    pub fn to_affine(self) -> Affine {
        Affine::new([
            self.scale_x,
            self.rotate_skew0,
            self.rotate_skew1,
            self.scale_y,
            self.translate_x / TWIPS_PER_PIXEL,
            self.translate_y / TWIPS_PER_PIXEL,
        ])
    }

    /// Bitmap space: every coefficient converted to pixels.
    pub fn to_pattern_affine(self) -> Affine {
        Affine::new([
            self.scale_x / TWIPS_PER_PIXEL,
            self.rotate_skew0 / TWIPS_PER_PIXEL,
            self.rotate_skew1 / TWIPS_PER_PIXEL,
            self.scale_y / TWIPS_PER_PIXEL,
            self.translate_x / TWIPS_PER_PIXEL,
            self.translate_y / TWIPS_PER_PIXEL,
        ])
    }
}

/// Per-channel color transform: `out = in * mult + add`, add terms in `-255..=255`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorTransform {
    /// Red multiplier.
    #[serde(default = "one")]
    pub r_mult: f64,
    /// Green multiplier.
    #[serde(default = "one")]
    pub g_mult: f64,
    /// Blue multiplier.
    #[serde(default = "one")]
    pub b_mult: f64,
    /// Alpha multiplier.
    #[serde(default = "one")]
    pub a_mult: f64,
    /// Red offset.
    #[serde(default)]
    pub r_add: f64,
    /// Green offset.
    #[serde(default)]
    pub g_add: f64,
    /// Blue offset.
    #[serde(default)]
    pub b_add: f64,
    /// Alpha offset.
    #[serde(default)]
    pub a_add: f64,
}

impl Default for ColorTransform {
    fn default() -> Self {
        Self {
            r_mult: 1.0,
            g_mult: 1.0,
            b_mult: 1.0,
            a_mult: 1.0,
            r_add: 0.0,
            g_add: 0.0,
            b_add: 0.0,
            a_add: 0.0,
        }
    }
}

impl ColorTransform {
    /// Row-major 4x5 color matrix with offsets normalized to `[0, 1]` units.
    pub fn matrix(&self) -> [f64; 20] {
        [
            self.r_mult,
            0.0,
            0.0,
            0.0,
            self.r_add / 255.0,
            0.0,
            self.g_mult,
            0.0,
            0.0,
            self.g_add / 255.0,
            0.0,
            0.0,
            self.b_mult,
            0.0,
            self.b_add / 255.0,
            0.0,
            0.0,
            0.0,
            self.a_mult,
            self.a_add / 255.0,
        ]
    }
}

/// Surface filter attached to a placement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Filter {
    /// Offset, blurred, colored copy behind the content.
    DropShadow(DropShadowFilter),
    /// Gaussian-like blur.
    Blur(BlurFilter),
    /// Blurred colored halo.
    Glow(GlowFilter),
    /// Arbitrary 4x5 color matrix.
    ColorMatrix(ColorMatrixFilter),
    /// Bevel (no markup equivalent).
    Bevel,
    /// Gradient glow (no markup equivalent).
    GradientGlow,
    /// Gradient bevel (no markup equivalent).
    GradientBevel,
    /// Convolution kernel (no markup equivalent).
    Convolution,
    /// Any kind this model does not know.
    #[serde(other)]
    Unknown,
}

impl Filter {
    /// Stable kind name for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::DropShadow(_) => "drop_shadow",
            Self::Blur(_) => "blur",
            Self::Glow(_) => "glow",
            Self::ColorMatrix(_) => "color_matrix",
            Self::Bevel => "bevel",
            Self::GradientGlow => "gradient_glow",
            Self::GradientBevel => "gradient_bevel",
            Self::Convolution => "convolution",
            Self::Unknown => "unknown",
        }
    }
}

/// Drop shadow parameters; blur and distance in pixels, angle in radians.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DropShadowFilter {
    /// Shadow color.
    #[serde(default)]
    pub color: Rgba8,
    /// Horizontal blur.
    #[serde(default)]
    pub blur_x: f64,
    /// Vertical blur.
    #[serde(default)]
    pub blur_y: f64,
    /// Direction of the offset.
    #[serde(default)]
    pub angle: f64,
    /// Offset length.
    #[serde(default)]
    pub distance: f64,
    /// Shadow strength multiplier.
    #[serde(default = "one")]
    pub strength: f64,
    /// Inner shadow.
    #[serde(default)]
    pub inner: bool,
    /// Hide the source content and keep only the shadow.
    #[serde(default)]
    pub knockout: bool,
}

/// Blur parameters in pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlurFilter {
    /// Horizontal blur.
    #[serde(default)]
    pub blur_x: f64,
    /// Vertical blur.
    #[serde(default)]
    pub blur_y: f64,
    /// Box-blur passes.
    #[serde(default = "one_u32")]
    pub passes: u32,
}

/// Glow parameters in pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GlowFilter {
    /// Glow color.
    #[serde(default)]
    pub color: Rgba8,
    /// Horizontal blur.
    #[serde(default)]
    pub blur_x: f64,
    /// Vertical blur.
    #[serde(default)]
    pub blur_y: f64,
    /// Glow strength multiplier.
    #[serde(default = "one")]
    pub strength: f64,
    /// Inner glow.
    #[serde(default)]
    pub inner: bool,
    /// Hide the source content and keep only the glow.
    #[serde(default)]
    pub knockout: bool,
}

/// Raw 4x5 color matrix (20 values, offsets in 0..255 units as stored by the format).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorMatrixFilter {
    /// Row-major values.
    pub matrix: Vec<f64>,
}

/// Place or move an instance.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Target depth.
    pub depth: Depth,
    /// Character to place; absent on pure moves.
    #[serde(default)]
    pub character_id: Option<CharacterId>,
    /// Placement matrix.
    #[serde(default)]
    pub matrix: Option<Matrix>,
    /// Color transform.
    #[serde(default)]
    pub color_transform: Option<ColorTransform>,
    /// Surface filters in application order.
    #[serde(default)]
    pub filters: Option<Vec<Filter>>,
    /// When present this instance masks every depth up to and including the value.
    #[serde(default)]
    pub clip_depth: Option<Depth>,
    /// Modify the instance already at `depth` instead of placing a new one.
    #[serde(default, rename = "move")]
    pub is_move: bool,
    /// Instance name.
    #[serde(default)]
    pub name: Option<String>,
    /// Morph ratio.
    #[serde(default)]
    pub ratio: Option<u16>,
}

/// Remove an instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Removal {
    /// Depth to clear.
    pub depth: Depth,
    /// Character expected at the depth (RemoveObject v1).
    #[serde(default)]
    pub character_id: Option<CharacterId>,
}

/// Shape definition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShapeDef {
    /// Character id.
    pub id: CharacterId,
    /// Declared bounds (informational; exported bounds come from geometry).
    #[serde(default)]
    pub bounds: TwipRect,
    /// Initial style tables.
    #[serde(default)]
    pub styles: ShapeStyles,
    /// Drawing records.
    pub records: Vec<ShapeRecord>,
}

/// Fill and line style tables. Records reference them with 1-based indexes; 0 means none.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyles {
    /// Fill styles.
    #[serde(default)]
    pub fill_styles: Vec<FillStyle>,
    /// Line styles.
    #[serde(default)]
    pub line_styles: Vec<LineStyle>,
}

/// Shape drawing record; edge deltas in twips.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeRecord {
    /// Move the pen and/or switch styles.
    StyleChange(StyleChange),
    /// Straight edge relative to the pen.
    StraightEdge {
        /// Horizontal delta.
        dx: i32,
        /// Vertical delta.
        dy: i32,
    },
    /// Quadratic edge relative to the pen.
    CurvedEdge {
        /// Control point delta from the pen.
        control_dx: i32,
        /// Control point delta from the pen.
        control_dy: i32,
        /// Anchor delta from the control point.
        anchor_dx: i32,
        /// Anchor delta from the control point.
        anchor_dy: i32,
    },
}

/// Style-change record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleChange {
    /// Absolute pen position in twips.
    #[serde(default)]
    pub move_to: Option<[i32; 2]>,
    /// Fill on the left of the edge direction.
    #[serde(default)]
    pub fill_style0: Option<u32>,
    /// Fill on the right of the edge direction.
    #[serde(default)]
    pub fill_style1: Option<u32>,
    /// Line style.
    #[serde(default)]
    pub line_style: Option<u32>,
    /// Replacement style tables; indexes reset against them.
    #[serde(default)]
    pub new_styles: Option<ShapeStyles>,
}

/// Gradient spread mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpreadMode {
    /// Extend edge colors.
    #[default]
    Pad,
    /// Mirror.
    Reflect,
    /// Tile.
    Repeat,
}

/// Gradient interpolation color space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// sRGB.
    #[default]
    Rgb,
    /// Linear RGB.
    LinearRgb,
}

/// Gradient color stop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradientRecord {
    /// Position 0..=255.
    pub ratio: u8,
    /// Stop color.
    pub color: Rgba8,
}

/// Gradient definition shared by fills and line fills.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    /// Spread mode.
    #[serde(default)]
    pub spread: SpreadMode,
    /// Interpolation space.
    #[serde(default)]
    pub interpolation: Interpolation,
    /// Ordered stops.
    pub records: Vec<GradientRecord>,
}

/// Fill style.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FillStyle {
    /// Solid color.
    Solid {
        /// Fill color.
        color: Rgba8,
    },
    /// Linear gradient.
    LinearGradient {
        /// Gradient square to shape space.
        #[serde(default)]
        matrix: Matrix,
        /// Stops and modes.
        gradient: Gradient,
    },
    /// Radial gradient.
    RadialGradient {
        /// Gradient square to shape space.
        #[serde(default)]
        matrix: Matrix,
        /// Stops and modes.
        gradient: Gradient,
    },
    /// Radial gradient with a focal point.
    FocalGradient {
        /// Gradient square to shape space.
        #[serde(default)]
        matrix: Matrix,
        /// Stops and modes.
        gradient: Gradient,
        /// Focal point ratio in `-1..=1`.
        #[serde(default)]
        focal_point: f64,
    },
    /// Bitmap pattern.
    Bitmap {
        /// Bitmap character.
        bitmap_id: CharacterId,
        /// Bitmap to shape space.
        #[serde(default)]
        matrix: Matrix,
        /// Tile the bitmap.
        #[serde(default)]
        repeat: bool,
        /// Smooth sampling.
        #[serde(default)]
        smooth: bool,
    },
}

/// Line cap style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapStyle {
    /// Round cap.
    #[default]
    Round,
    /// No cap.
    None,
    /// Square cap.
    Square,
}

/// Line join style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinStyle {
    /// Round join.
    #[default]
    Round,
    /// Bevel join.
    Bevel,
    /// Miter join.
    Miter,
}

/// Line style.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    /// Width in twips; absent means hairline default.
    #[serde(default)]
    pub width: Option<u16>,
    /// Solid line color (ignored when `fill` is set).
    #[serde(default)]
    pub color: Rgba8,
    /// Start cap.
    #[serde(default)]
    pub start_cap: CapStyle,
    /// End cap.
    #[serde(default)]
    pub end_cap: CapStyle,
    /// Join style.
    #[serde(default)]
    pub join: JoinStyle,
    /// Miter limit factor.
    #[serde(default = "default_miter")]
    pub miter_limit: f64,
    /// Gradient or bitmap line fill.
    #[serde(default)]
    pub fill: Option<FillStyle>,
}

/// Embedded font.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FontDef {
    /// Character id.
    pub id: CharacterId,
    /// Family name used as the glyph store key.
    #[serde(default)]
    pub name: Option<String>,
    /// Glyph outlines, indexed by glyph index.
    #[serde(default)]
    pub glyphs: Vec<GlyphDef>,
    /// Character code of each glyph index.
    #[serde(default)]
    pub code_table: Vec<u32>,
    /// Layout metrics, aligned with `code_table`.
    #[serde(default)]
    pub layout: Option<FontLayout>,
    /// Font units per em.
    #[serde(default = "default_em")]
    pub em_square: f64,
}

/// One glyph outline (shape records with an implied fill).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GlyphDef {
    /// Drawing records in font units.
    pub records: Vec<ShapeRecord>,
}

/// Font layout metrics in font units.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FontLayout {
    /// Advance per glyph index.
    pub advances: Vec<f64>,
    /// Ascent.
    #[serde(default)]
    pub ascent: f64,
    /// Descent.
    #[serde(default)]
    pub descent: f64,
    /// Leading.
    #[serde(default)]
    pub leading: f64,
}

/// Static text definition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TextDef {
    /// Character id.
    pub id: CharacterId,
    /// Text bounds.
    pub bounds: TwipRect,
    /// Text space to character space.
    #[serde(default)]
    pub matrix: Option<Matrix>,
    /// Glyph runs.
    pub records: Vec<TextRecord>,
}

/// Static text run; absent fields keep the value of the previous run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextRecord {
    /// Font character.
    #[serde(default)]
    pub font_id: Option<CharacterId>,
    /// Text color.
    #[serde(default)]
    pub color: Option<Rgba8>,
    /// Run start x in twips.
    #[serde(default)]
    pub x_offset: Option<i32>,
    /// Baseline y in twips.
    #[serde(default)]
    pub y_offset: Option<i32>,
    /// Font height in twips.
    #[serde(default)]
    pub height: Option<u16>,
    /// Glyphs in the run.
    #[serde(default)]
    pub glyphs: Vec<GlyphEntry>,
}

/// Positioned glyph reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphEntry {
    /// Glyph index into the font.
    pub index: u32,
    /// Advance in twips.
    pub advance: i32,
}

/// Horizontal text alignment of edit text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    /// Flush left.
    #[default]
    Left,
    /// Flush right.
    Right,
    /// Centered.
    Center,
    /// Justified (laid out flush left).
    Justify,
}

/// Editable text definition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EditTextDef {
    /// Character id.
    pub id: CharacterId,
    /// Text box.
    pub bounds: TwipRect,
    /// Font character.
    #[serde(default)]
    pub font_id: Option<CharacterId>,
    /// Font height in twips.
    #[serde(default)]
    pub font_height: u16,
    /// Text color; opaque black when absent.
    #[serde(default)]
    pub text_color: Option<Rgba8>,
    /// Alignment; left when absent.
    #[serde(default)]
    pub align: Option<TextAlign>,
    /// Initial contents (plain or HTML).
    #[serde(default)]
    pub initial_text: Option<String>,
    /// Bound variable name.
    #[serde(default)]
    pub variable_name: Option<String>,
}

/// Encoding of bitmap bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BitmapFormat {
    /// Straight RGBA8, row-major, tightly packed.
    Rgba,
    /// PNG file bytes.
    Png,
    /// JPEG file bytes (optionally paired with an alpha plane).
    Jpeg,
}

/// Bitmap definition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BitmapDef {
    /// Character id.
    pub id: CharacterId,
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
    /// Encoding of `data`.
    pub format: BitmapFormat,
    /// Encoded bytes (base64 in JSON).
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    /// One alpha byte per pixel (base64 in JSON).
    #[serde(default, with = "base64_opt_bytes")]
    pub alpha: Option<Vec<u8>>,
}

/// Nested timeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpriteDef {
    /// Character id.
    pub id: CharacterId,
    /// Frames in the nested timeline.
    #[serde(default = "one_u32")]
    pub frame_count: u32,
    /// Nested record stream.
    pub records: Vec<Record>,
}

mod base64_bytes {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&STANDARD.encode(bytes))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(d)?;
        STANDARD.decode(s.as_bytes()).map_err(serde::de::Error::custom)
    }
}

mod base64_opt_bytes {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(bytes: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(b) => s.serialize_some(&STANDARD.encode(b)),
            None => s.serialize_none(),
        }
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<u8>>, D::Error> {
        let Some(s) = Option::<String>::deserialize(d)? else {
            return Ok(None);
        };
        STANDARD
            .decode(s.as_bytes())
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
