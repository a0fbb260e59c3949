use thiserror::Error;

use crate::types::MatchPoint;

#[derive(Debug, Error)]
pub enum AlignError {
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("no anchor found within the search window, even after widening once")]
    NoAnchorFound,
    #[error("alignment path too short: {found} match points, {required} required")]
    PathTooShort {
        found: usize,
        required: usize,
        /// The partial path, kept for debugging.
        path: Vec<MatchPoint>,
    },
    #[error(
        "offsets along the path are inconsistent: sd {sd:.3}s exceeds {threshold:.3}s (median {median:.3}s)"
    )]
    OffsetInconsistent { median: f64, sd: f64, threshold: f64 },
}

impl AlignError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Stable failure identifier for callers that serialize results.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "invalid_input",
            Self::NoAnchorFound => "no_anchor_found",
            Self::PathTooShort { .. } => "path_too_short",
            Self::OffsetInconsistent { .. } => "offset_inconsistent",
        }
    }
}
