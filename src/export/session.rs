use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::compose::Composer;
use crate::export::options::ExportOptions;
use crate::export::raster::write_png;
use crate::fonts::store::GlyphStore;
use crate::foundation::error::{ExportError, ExportResult};
use crate::scene::model::Scene;
use crate::svg::document::Document;

/// Frames to export for a timeline of `frame_count` frames.
///
/// Without a request every frame is exported; a requested frame past the end is clamped to the
/// last one.
pub fn frames_to_export(frame_count: u32, requested: Option<u32>) -> Vec<u32> {
    let last = frame_count.max(1) - 1;
    match requested {
        Some(frame) => vec![frame.min(last)],
        None => (0..=last).collect(),
    }
}

/// Where input scenes come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    /// One scene file.
    File(PathBuf),
    /// Text file listing one scene path per line.
    List(PathBuf),
    /// Every `.json` file of a directory.
    Dir(PathBuf),
}

/// Expand a [`Source`] into scene paths.
pub fn collect_sources(source: &Source) -> ExportResult<Vec<PathBuf>> {
    match source {
        Source::File(path) => Ok(vec![path.clone()]),
        Source::List(list) => {
            let text = std::fs::read_to_string(list).map_err(|e| ExportError::io(list, e))?;
            Ok(text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(PathBuf::from)
                .collect())
        }
        Source::Dir(dir) => {
            let mut out = Vec::new();
            for entry in std::fs::read_dir(dir).map_err(|e| ExportError::io(dir, e))? {
                let path = entry.map_err(|e| ExportError::io(dir, e))?.path();
                if path.is_file() && path.extension().is_some_and(|x| x == "json") {
                    out.push(path);
                }
            }
            out.sort();
            Ok(out)
        }
    }
}

/// Outcome of a batch run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Inputs converted.
    pub converted: usize,
    /// Inputs that failed and were skipped.
    pub failed: usize,
    /// Files written (SVG and PNG).
    pub written: usize,
}

/// File-level export driver.
pub struct Exporter {
    options: ExportOptions,
    store: Option<Arc<dyn GlyphStore>>,
    png: bool,
}

impl Exporter {
    /// Driver without glyph store or previews.
    pub fn new(options: ExportOptions) -> Self {
        Self {
            options,
            store: None,
            png: false,
        }
    }

    /// Resolve glyphs missing from embedded fonts through `store`.
    pub fn with_store(mut self, store: Arc<dyn GlyphStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Write a PNG preview next to every SVG.
    pub fn with_png(mut self, png: bool) -> Self {
        self.png = png;
        self
    }

    /// Compose one frame.
    pub fn export_frame(&self, scene: &Scene, frame: u32) -> ExportResult<Document> {
        Composer::new(self.options.clone(), self.store.as_deref()).compose(scene, frame)
    }

    /// Convert one scene file into `dir_out`.
    ///
    /// A single frame (requested, or the only one) goes to `<stem>.svg`; otherwise every frame
    /// goes to `<stem>/<n>.svg` with `n` counted from 1. Returns the written paths.
    #[tracing::instrument(skip(self))]
    pub fn convert_file(
        &self,
        path_in: &Path,
        dir_out: &Path,
        frame: Option<u32>,
    ) -> ExportResult<Vec<PathBuf>> {
        let scene = Scene::from_path(path_in)?;
        let stem = path_in
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| {
                ExportError::validation(format!("no file name in '{}'", path_in.display()))
            })?;

        let frames = frames_to_export(scene.frame_count(), frame);
        let targets: Vec<(u32, PathBuf)> = if frames.len() == 1 {
            vec![(frames[0], dir_out.join(format!("{stem}.svg")))]
        } else {
            let dir = dir_out.join(&stem);
            frames
                .iter()
                .map(|&f| (f, dir.join(format!("{}.svg", f + 1))))
                .collect()
        };

        let mut written = Vec::with_capacity(targets.len() * 2);
        for (frame, out) in targets {
            let doc = self.export_frame(&scene, frame)?;
            for err in &doc.recovered {
                tracing::debug!(frame, error = %err, "recovered");
            }
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent).map_err(|e| ExportError::io(parent, e))?;
            }
            let svg = doc.to_svg_string();
            std::fs::write(&out, &svg).map_err(|e| ExportError::io(&out, e))?;
            written.push(out.clone());
            if self.png {
                let png = out.with_extension("png");
                match write_png(&svg, &png) {
                    Ok(()) => written.push(png),
                    Err(e) => {
                        tracing::warn!(svg = %out.display(), error = %e, "png preview skipped");
                    }
                }
            }
        }
        tracing::info!(files = written.len(), "converted");
        Ok(written)
    }

    /// Convert many inputs, logging failures and carrying on.
    pub fn convert_all(&self, inputs: &[PathBuf], dir_out: &Path, frame: Option<u32>) -> BatchStats {
        let mut stats = BatchStats::default();
        for input in inputs {
            match self.convert_file(input, dir_out, frame) {
                Ok(files) => {
                    stats.converted += 1;
                    stats.written += files.len();
                }
                Err(e) => {
                    tracing::error!(input = %input.display(), error = %e, "conversion failed");
                    stats.failed += 1;
                }
            }
        }
        stats
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/session.rs"]
mod tests;
