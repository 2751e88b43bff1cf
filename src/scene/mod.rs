mod load;
/// Decoded SWF object model.
pub mod model;
