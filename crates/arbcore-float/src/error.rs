//! Errors reported by the float kernel.

/// Caller contract violations detected at the kernel boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FloatError {
    /// A mantissa with no limbs was passed where a nonzero value is required.
    #[error("empty mantissa")]
    EmptyMantissa,

    /// A mantissa whose top limb does not have its top bit set.
    #[error("mantissa is not normalized (top limb {0:#018x})")]
    UnnormalizedMantissa(u64),

    /// Precision must be at least one bit.
    #[error("invalid precision: {0} bits")]
    InvalidPrecision(u64),

    /// Rounding mode name not recognized.
    #[error("unknown rounding mode: {0}")]
    UnknownRounding(String),

    /// An exact operation would need a shift that does not fit in memory.
    #[error("exponent gap too large for an exact result")]
    ExponentOverflow,
}

/// Reject a zero precision.
pub(crate) fn check_prec(prec: u64) -> Result<(), FloatError> {
    if prec == 0 {
        Err(FloatError::InvalidPrecision(prec))
    } else {
        Ok(())
    }
}
