use thiserror::Error;

/// Rejected tunable. Raised only by `validate()` on parameter blocks; the step path never errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParamError {
    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f32 },
    #[error("{field} must be >= 0, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("{field} must be in [{lo}, {hi}], got {value}")]
    OutOfRange { field: &'static str, value: f32, lo: f32, hi: f32 },
}

impl ParamError {
    /// Finite and non-negative.
    pub fn check_non_negative(field: &'static str, value: f32) -> Result<(), ParamError> {
        if !value.is_finite() { return Err(ParamError::NotFinite { field, value }); }
        if value < 0.0 { return Err(ParamError::Negative { field, value }); }
        Ok(())
    }

    pub fn check_range(field: &'static str, value: f32, lo: f32, hi: f32) -> Result<(), ParamError> {
        if !value.is_finite() { return Err(ParamError::NotFinite { field, value }); }
        if value < lo || value > hi { return Err(ParamError::OutOfRange { field, value, lo, hi }); }
        Ok(())
    }

    pub fn check_finite(field: &'static str, value: f32) -> Result<(), ParamError> {
        if !value.is_finite() { return Err(ParamError::NotFinite { field, value }); }
        Ok(())
    }
}
