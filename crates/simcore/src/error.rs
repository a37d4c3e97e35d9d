//! Error types shared by every kernel crate.

use thiserror::Error;

/// Failures surfaced by the kernel entry points.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KernelError {
    /// A configuration or run setting is missing, non-finite or out of range.
    #[error("invalid configuration: `{field}` {reason}")]
    InvalidConfiguration { field: &'static str, reason: String },

    /// A well-formed run still produced a NaN or infinite state.
    #[error("numeric degeneracy at step {step} (t = {time:.3} s): {quantity} is not finite")]
    NumericDegeneracy {
        step: usize,
        time: f64,
        quantity: &'static str,
    },

    /// The parameter scanner was asked for a parameter it cannot sweep.
    #[error("unknown scan parameter: {0}")]
    UnknownParameter(String),
}

impl KernelError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }

    /// True for input-side failures that a caller can fix by changing parameters.
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, Self::InvalidConfiguration { .. })
    }
}

pub type Result<T> = std::result::Result<T, KernelError>;

/// Rejects NaN / infinity.
pub(crate) fn require_finite(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(KernelError::invalid(field, format!("must be finite, got {value}")))
    }
}

/// Rejects anything that is not strictly positive (and finite).
pub fn require_positive(field: &'static str, value: f64) -> Result<()> {
    require_finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(KernelError::invalid(field, format!("must be > 0, got {value}")))
    }
}

/// Rejects negative values (and non-finite ones).
pub fn require_non_negative(field: &'static str, value: f64) -> Result<()> {
    require_finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(KernelError::invalid(field, format!("must be >= 0, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_positive_rejects_zero_and_nan() {
        assert!(require_positive("kv", 190.0).is_ok());
        assert!(require_positive("kv", 0.0).is_err());
        assert!(require_positive("kv", f64::NAN).is_err());
        assert!(require_non_negative("esc", 0.0).is_ok());
        assert!(require_non_negative("esc", -1.0).is_err());
    }

    #[test]
    fn test_error_message_names_field() {
        let err = KernelError::invalid("drive.gear_ratio", "must be > 0, got 0");
        assert!(err.is_invalid_configuration());
        assert_eq!(
            err.to_string(),
            "invalid configuration: `drive.gear_ratio` must be > 0, got 0"
        );
    }
}
