/// Export configuration.
pub mod options;
/// PNG previews.
pub mod raster;
/// Frame selection and file output.
pub mod session;
