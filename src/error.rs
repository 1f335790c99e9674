// ============================================================================
// spark-effects - Errors
// ============================================================================
//
// Hooks never return these: they sanitize their options and degrade to "no
// visual effect". The errors exist for callers that want to validate
// configuration up front (for example when it is loaded from JSON).
// ============================================================================

use thiserror::Error;

/// Configuration errors for effect options.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EffectsError {
    /// A root margin string that is not 1-4 `px`/`%` lengths.
    #[error("invalid root margin {input:?}: {reason}")]
    InvalidRootMargin { input: String, reason: String },

    /// Intersection threshold outside `[0, 1]`.
    #[error("threshold {0} is outside [0, 1]")]
    ThresholdOutOfRange(f64),

    /// A numeric option that must be finite (and, where noted, positive).
    #[error("{field} must be a finite, non-negative number, got {value}")]
    InvalidNumber { field: &'static str, value: f64 },
}

pub type Result<T> = std::result::Result<T, EffectsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let err = EffectsError::InvalidRootMargin {
            input: "10em".into(),
            reason: "unsupported unit".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid root margin \"10em\": unsupported unit"
        );
        assert_eq!(
            EffectsError::ThresholdOutOfRange(1.5).to_string(),
            "threshold 1.5 is outside [0, 1]"
        );
    }
}
