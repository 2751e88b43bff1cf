//! swfsvg exports frames of decoded SWF timelines as static SVG documents.
//!
//! The engine walks a decoded [`Scene`] and produces a depth-ordered, masked, filtered and
//! font-resolved [`Document`]:
//!
//! - Load and validate a [`Scene`] (JSON object model of the tag stream)
//! - Compose a frame with [`compose`] or a configured [`Composer`]
//! - Drive whole files with an [`Exporter`], optionally backed by a [`GlyphStore`]
//!
//! Fonts are exported as reusable glyph outlines; glyphs missing from an embedded font are pulled
//! from the glyph store on first use.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Frame composition.
pub mod compose;
/// Filters, color transforms and paint servers.
pub mod effects;
/// File-level export driver.
pub mod export;
/// Font export, glyph cache and glyph store.
pub mod fonts;
/// Decoded scene model and loading.
pub mod scene;
/// Shape records to path markup.
pub mod shape;
/// Output document model.
pub mod svg;
/// Edit-text extraction and layout.
pub mod text;

pub use crate::foundation::core::{
    Affine, BezPath, Bounds, Point, Rect, Rgba8, TWIPS_PER_PIXEL, Vec2, affine_to_svg, fmt_num,
    round_pixels, twips_to_px,
};
pub use crate::foundation::error::{ExportError, ExportResult};

pub use crate::compose::{Composer, compose};
pub use crate::export::options::ExportOptions;
pub use crate::export::session::{BatchStats, Exporter, Source, collect_sources, frames_to_export};
pub use crate::fonts::extract::{ExtractStats, extract_fonts};
pub use crate::fonts::store::{DirGlyphStore, FontHandle, GlyphOutline, GlyphStore, MemoryGlyphStore};
pub use crate::scene::model::Scene;
pub use crate::svg::document::Document;
