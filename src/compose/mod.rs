mod bitmap;
mod composer;
/// Display-list construction for one frame.
pub mod display_list;
/// Clip-depth mask state machine.
pub mod mask;
mod text;

pub use composer::{Composer, compose};
