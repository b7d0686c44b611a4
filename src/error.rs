//! Game-specific error types.
//!
//! Recoverable rule conditions (drops during cooldown, stale merge candidates,
//! collisions with walls) are silent skips and never produce an error.  The
//! variants here cover configuration problems, which are reported and fall back
//! to defaults, and integration faults, which systems return as `Err` so Bevy's
//! error handler stops the run instead of continuing with a corrupt registry.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use crate::error::{FusionError, FusionResult};
//!
//! fn radius_of(table: &RankTable, rank: usize) -> FusionResult<f32> {
//!     Ok(table.get(rank)?.radius)
//! }
//! ```

use std::fmt;

/// Top-level error enum for Cosmic Fusion.
#[derive(Debug)]
pub enum FusionError {
    /// A rank index was used that does not exist in the loaded rank table.
    RankOutOfRange {
        /// The rejected index.
        rank: usize,
        /// Number of ranks in the table.
        len: usize,
    },

    /// The configured rank table has no entries.
    EmptyRankTable,

    /// Rank radii must strictly increase with rank index.
    RankOrder {
        /// Index of the first rank whose radius is not larger than its predecessor.
        rank: usize,
    },

    /// A registered planet could not be found in the ECS world.
    EntityNotFound {
        /// Human-readable description of where the lookup occurred.
        context: &'static str,
    },

    /// Configuration constant is outside its safe operating range.
    UnsafeConstant {
        /// Name of the constant (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },

    /// Reading or writing the persisted high score failed.
    Storage {
        /// Path of the file involved.
        path: String,
        /// Underlying I/O or encoding failure, rendered to text.
        reason: String,
    },
}

impl fmt::Display for FusionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FusionError::RankOutOfRange { rank, len } => write!(
                f,
                "rank {} is out of range for a table of {} ranks",
                rank, len
            ),
            FusionError::EmptyRankTable => write!(f, "rank table must contain at least one rank"),
            FusionError::RankOrder { rank } => write!(
                f,
                "rank {} radius must be larger than rank {} radius",
                rank,
                rank.saturating_sub(1)
            ),
            FusionError::EntityNotFound { context } => {
                write!(f, "entity not found during '{}'", context)
            }
            FusionError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "constant '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
            FusionError::Storage { path, reason } => {
                write!(f, "high-score storage at '{}' failed: {}", path, reason)
            }
        }
    }
}

impl std::error::Error for FusionError {}

/// Convenience alias: a `Result` using `FusionError` as the error type.
pub type FusionResult<T> = Result<T, FusionError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error unless `value` is strictly positive.
pub fn validate_positive(name: &'static str, value: f32) -> FusionResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(FusionError::UnsafeConstant {
            name,
            value,
            safe_range: "(0.0, ∞)",
        })
    }
}

/// Returns an error if the attraction constant could overpower world gravity.
///
/// Values above 5.0 pull resting planets sideways out of stacks.
pub fn validate_attraction_const(value: f32) -> FusionResult<()> {
    if !(0.0..=5.0).contains(&value) {
        Err(FusionError::UnsafeConstant {
            name: "ATTRACTION_CONST",
            value,
            safe_range: "[0.0, 5.0]",
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_validation_rejects_zero_and_nan() {
        assert!(validate_positive("X", 1.0).is_ok());
        assert!(validate_positive("X", 0.0).is_err());
        assert!(validate_positive("X", f32::NAN).is_err());
    }

    #[test]
    fn attraction_const_range() {
        assert!(validate_attraction_const(0.4).is_ok());
        assert!(validate_attraction_const(0.0).is_ok());
        assert!(validate_attraction_const(-0.1).is_err());
        assert!(validate_attraction_const(6.0).is_err());
    }

    #[test]
    fn display_names_the_offending_rank() {
        let msg = FusionError::RankOutOfRange { rank: 9, len: 8 }.to_string();
        assert!(msg.contains('9') && msg.contains('8'));
    }
}
