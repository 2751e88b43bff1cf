use std::path::PathBuf;

use crate::scene::model::CharacterId;

/// Convenience result type used across swfsvg.
pub type ExportResult<T> = Result<T, ExportError>;

/// Error taxonomy of the export engine.
///
/// Some variants are recovered locally (the instance, filter or glyph is skipped and the error is
/// recorded on [`crate::Document::recovered`]); the rest abort the current document.
#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    /// An instance references a character that is missing or could not be materialized.
    #[error("unresolved character {id}")]
    UnresolvedCharacter {
        /// Referenced character id.
        id: CharacterId,
    },

    /// A filter kind with no SVG equivalent; the filter is dropped.
    #[error("unsupported filter '{kind}'")]
    UnsupportedFilter {
        /// Filter kind name.
        kind: String,
    },

    /// A transform carries a non-finite coefficient.
    #[error("malformed transform on character {id}: {msg}")]
    MalformedTransform {
        /// Character owning the transform.
        id: CharacterId,
        /// Details.
        msg: String,
    },

    /// Shape records cannot be turned into path geometry.
    #[error("malformed path data in character {id}: {msg}")]
    MalformedPathData {
        /// Shape (or font) character id.
        id: CharacterId,
        /// Details.
        msg: String,
    },

    /// A sprite (transitively) contains itself.
    #[error("cyclic definition through character {id}")]
    CyclicDefinition {
        /// Character whose materialization was re-entered.
        id: CharacterId,
    },

    /// The glyph store could not be read or written.
    #[error("glyph store unavailable: {0}")]
    GlyphStoreUnavailable(String),

    /// Invalid scene or option data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Filesystem error with the offending path.
    #[error("io error on '{}': {source}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Bitmap decoding or encoding failed.
    #[error("image error: {0}")]
    Image(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ExportError {
    /// Build a [`ExportError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ExportError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`ExportError::Image`] value.
    pub fn image(msg: impl Into<String>) -> Self {
        Self::Image(msg.into())
    }

    /// Build a [`ExportError::Io`] value.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed_path(id: CharacterId, msg: impl Into<String>) -> Self {
        Self::MalformedPathData {
            id,
            msg: msg.into(),
        }
    }

    pub(crate) fn malformed_transform(id: CharacterId, msg: impl Into<String>) -> Self {
        Self::MalformedTransform {
            id,
            msg: msg.into(),
        }
    }

    /// Return `true` for errors the composer recovers from by skipping one item.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::UnresolvedCharacter { .. }
                | Self::UnsupportedFilter { .. }
                | Self::GlyphStoreUnavailable(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
