//! Error handling and exit codes.

use arbcore_ball::BallError;
use arbcore_float::FloatError;
use arbcore_poly::PolyError;

/// Process exit codes.
pub mod exit_codes {
    /// Success.
    pub const SUCCESS: i32 = 0;
    /// Computation or I/O failure.
    pub const ERROR_GENERIC: i32 = 1;
    /// Invalid command line or input values.
    pub const ERROR_CONFIG: i32 = 4;
}

/// Command-line usage errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CliError {
    /// None of --constant, --op or --poly/--points was given.
    #[error("nothing to do: pass --constant, --op or --poly with --points")]
    NoAction,

    /// More than one action was given.
    #[error("--constant, --op and --poly are mutually exclusive")]
    ConflictingActions,

    /// An action is missing one of its flags.
    #[error("missing required argument {0}")]
    MissingArgument(&'static str),

    /// A number could not be parsed.
    #[error("invalid number: {0:?}")]
    InvalidNumber(String),

    /// A rational operand has a zero denominator.
    #[error("zero denominator in {0:?}")]
    ZeroDenominator(String),
}

fn float_code(err: &FloatError) -> i32 {
    match err {
        FloatError::InvalidPrecision(_) | FloatError::UnknownRounding(_) => {
            exit_codes::ERROR_CONFIG
        }
        _ => exit_codes::ERROR_GENERIC,
    }
}

fn ball_code(err: &BallError) -> i32 {
    match err {
        BallError::Float(inner) => float_code(inner),
        BallError::UnknownConstant(_) | BallError::UnknownOperation(_) => exit_codes::ERROR_CONFIG,
    }
}

/// Map an application error to the process exit code.
#[must_use]
pub fn exit_code(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<CliError>().is_some() {
        exit_codes::ERROR_CONFIG
    } else if let Some(inner) = err.downcast_ref::<BallError>() {
        ball_code(inner)
    } else if let Some(inner) = err.downcast_ref::<FloatError>() {
        float_code(inner)
    } else if let Some(PolyError::Ball(inner)) = err.downcast_ref::<PolyError>() {
        ball_code(inner)
    } else {
        exit_codes::ERROR_GENERIC
    }
}
