use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::error::{ExportError, ExportResult};
use crate::scene::model::{CharacterId, Filter, Record, Scene};

impl Scene {
    /// Parse a decoded scene from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> ExportResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| ExportError::validation(format!("parse scene JSON: {e}")))
    }

    /// Parse a decoded scene from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ExportResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| ExportError::io(path, e))?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check structural invariants the composer relies on.
    ///
    /// Character ids must be unique across the whole scene (nested timelines included), the stage
    /// must not be inverted, and raw color matrices must carry 20 values.
    pub fn validate(&self) -> ExportResult<()> {
        let fs = self.header.frame_size;
        if fs.x_max < fs.x_min || fs.y_max < fs.y_min {
            return Err(ExportError::validation("frame_size is inverted"));
        }
        if self.header.frame_count == 0 {
            return Err(ExportError::validation("frame_count must be >= 1"));
        }
        let mut seen = HashSet::new();
        validate_records(&self.records, &mut seen)
    }

    /// Number of frames on the main timeline, never less than one.
    pub fn frame_count(&self) -> u32 {
        self.header.frame_count.max(1)
    }
}

fn validate_records(records: &[Record], seen: &mut HashSet<CharacterId>) -> ExportResult<()> {
    for rec in records {
        if let Some(id) = rec.character_id()
            && !seen.insert(id)
        {
            return Err(ExportError::validation(format!(
                "character id {id} is defined more than once"
            )));
        }
        match rec {
            Record::DefineSprite(s) => validate_records(&s.records, seen)?,
            Record::PlaceInstance(p) => {
                for f in p.filters.iter().flatten() {
                    if let Filter::ColorMatrix(m) = f
                        && m.matrix.len() != 20
                    {
                        return Err(ExportError::validation(format!(
                            "color matrix filter at depth {} has {} values (expected 20)",
                            p.depth,
                            m.matrix.len()
                        )));
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/scene/load.rs"]
mod tests;
