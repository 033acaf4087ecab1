//! Errors surfaced to the UI layer.

use scacco_core::FenError;

/// Errors that can occur through the [`Game`](crate::Game) facade.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// A position string failed to parse; the previous position is untouched.
    #[error("invalid position: {source}")]
    InvalidPosition {
        /// The underlying FEN parse error.
        #[from]
        source: FenError,
    },
}
