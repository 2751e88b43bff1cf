/// Filter and color-transform pipeline.
pub mod filter;
/// Gradient and pattern paint servers.
pub mod paint;
