//! Application configuration from CLI flags and environment.

use clap::{Parser, ValueEnum};

use crate::errors::CliError;

/// arbcore: rigorous ball arithmetic, cached constants and fast multipoint
/// polynomial evaluation.
#[derive(Parser, Debug)]
#[command(name = "arbcore", version, about)]
#[allow(clippy::struct_excessive_bools)]
pub struct AppConfig {
    /// Constant to enclose: e, pi or log2.
    #[arg(long)]
    pub constant: Option<String>,

    /// Binary ball operation: add, sub, mul or div.
    #[arg(long)]
    pub op: Option<String>,

    /// Left operand (integer, decimal or p/q).
    #[arg(long, allow_hyphen_values = true)]
    pub lhs: Option<String>,

    /// Right operand (integer, decimal or p/q).
    #[arg(long, allow_hyphen_values = true)]
    pub rhs: Option<String>,

    /// Polynomial coefficients, lowest degree first, comma separated.
    #[arg(long, allow_hyphen_values = true)]
    pub poly: Option<String>,

    /// Evaluation points, comma separated.
    #[arg(long, allow_hyphen_values = true)]
    pub points: Option<String>,

    /// Working precision in bits.
    #[arg(short, long, default_value = "128", env = "ARBCORE_PREC")]
    pub prec: u64,

    /// Rounding mode for --float: down, up, floor, ceil or nearest.
    #[arg(long, default_value = "nearest")]
    pub rounding: String,

    /// Apply --op to the operand midpoints as a single rounded float.
    #[arg(long)]
    pub float: bool,

    /// Scratch buffer provider for float multiplication.
    #[arg(long, value_enum, default_value_t = ProviderKind::ThreadLocal)]
    pub provider: ProviderKind,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode (only output the values).
    #[arg(short, long)]
    pub quiet: bool,

    /// Output file path.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Generate shell completion.
    #[arg(long, value_enum)]
    pub completion: Option<clap_complete::Shell>,
}

/// Scratch buffer provider selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderKind {
    /// Per-thread cached buffers (the library default).
    ThreadLocal,
    /// One cache shared behind a mutex.
    Shared,
    /// A fresh heap allocation for every request above the stack tier.
    Heap,
}

/// What the command line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action<'a> {
    /// Enclose a named constant.
    Constant(&'a str),
    /// Apply a binary operation to two operands.
    Binary {
        /// Operation name.
        op: &'a str,
        /// Left operand text.
        lhs: &'a str,
        /// Right operand text.
        rhs: &'a str,
    },
    /// Evaluate a polynomial at many points.
    Evaluate {
        /// Coefficient list text.
        poly: &'a str,
        /// Point list text.
        points: &'a str,
    },
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// The single action selected by the flags.
    ///
    /// # Errors
    ///
    /// Returns [`CliError`] when no action, several actions, or an
    /// incomplete action is given.
    pub fn action(&self) -> Result<Action<'_>, CliError> {
        let selected = [
            self.constant.is_some(),
            self.op.is_some(),
            self.poly.is_some() || self.points.is_some(),
        ];
        match selected.iter().filter(|&&s| s).count() {
            0 => return Err(CliError::NoAction),
            1 => {}
            _ => return Err(CliError::ConflictingActions),
        }

        if let Some(name) = &self.constant {
            return Ok(Action::Constant(name));
        }
        if let Some(op) = &self.op {
            let lhs = self.lhs.as_deref().ok_or(CliError::MissingArgument("--lhs"))?;
            let rhs = self.rhs.as_deref().ok_or(CliError::MissingArgument("--rhs"))?;
            return Ok(Action::Binary { op, lhs, rhs });
        }
        let poly = self.poly.as_deref().ok_or(CliError::MissingArgument("--poly"))?;
        let points = self
            .points
            .as_deref()
            .ok_or(CliError::MissingArgument("--points"))?;
        Ok(Action::Evaluate { poly, points })
    }
}
