/// Per-document glyph registry.
pub mod cache;
/// Font extraction into a glyph store.
pub mod extract;
/// Glyph store interface and implementations.
pub mod store;
