//! Clip-depth masking over one timeline walk.

use crate::scene::model::Depth;

/// Masking state of one timeline level.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum MaskState {
    /// No clip instance is active.
    #[default]
    NoMask,
    /// Instances up to and including `ceiling` are masked by `mask_id`.
    Masking {
        /// Deepest masked depth.
        ceiling: Depth,
        /// Id of the `<mask>` definition.
        mask_id: String,
    },
}

/// At most one active mask per timeline level.
///
/// Every timeline walk starts from a fresh stack, so nested sprites never see the parent's mask.
#[derive(Clone, Debug, Default)]
pub struct MaskStack {
    state: MaskState,
}

impl MaskStack {
    /// Stack in the `NoMask` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// A clip instance starts masking every following depth up to `ceiling`.
    pub fn enter(&mut self, ceiling: Depth, mask_id: impl Into<String>) {
        self.state = MaskState::Masking {
            ceiling,
            mask_id: mask_id.into(),
        };
    }

    /// Mask id to apply to a regular instance at `depth`.
    ///
    /// The first instance deeper than the ceiling ends masking.
    pub fn classify(&mut self, depth: Depth) -> Option<&str> {
        if let MaskState::Masking { ceiling, .. } = self.state
            && depth > ceiling
        {
            self.state = MaskState::NoMask;
        }
        match &self.state {
            MaskState::Masking { mask_id, .. } => Some(mask_id.as_str()),
            MaskState::NoMask => None,
        }
    }

    /// Current state.
    pub fn state(&self) -> &MaskState {
        &self.state
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/mask.rs"]
mod tests;
