/// Edit-text content extraction.
pub mod html;
/// Greedy line layout.
pub mod layout;
