/// Edge-map pass and the capability interface.
pub mod edges;
/// Style runs and their markup.
pub mod exporter;
/// Path geometry.
pub mod path;
