//! Core error types

use thiserror::Error;

/// Errors that indicate caller bugs rather than in-game edge cases.
///
/// In-game edge cases (out-of-range targets, saturated rewards, stalled
/// players) degrade silently instead of erroring.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid board size {0}: must be positive")]
    InvalidSize(i32),
}
