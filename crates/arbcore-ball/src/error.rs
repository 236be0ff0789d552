//! Errors reported by the ball layer.

use arbcore_float::FloatError;

/// Error type for ball arithmetic and constant lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BallError {
    /// The float kernel rejected an operand or precision.
    #[error(transparent)]
    Float(#[from] FloatError),

    /// No constant is known under this name.
    #[error("unknown constant: {0}")]
    UnknownConstant(String),

    /// No binary operation is known under this name.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_errors_pass_through() {
        let err: BallError = FloatError::InvalidPrecision(0).into();
        assert_eq!(err.to_string(), "invalid precision: 0 bits");
    }

    #[test]
    fn unknown_names_display() {
        assert_eq!(
            BallError::UnknownConstant("tau".into()).to_string(),
            "unknown constant: tau"
        );
        assert_eq!(
            BallError::UnknownOperation("pow".into()).to_string(),
            "unknown operation: pow"
        );
    }
}
