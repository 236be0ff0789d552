//! CLI output formatting.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::time::Duration;

use arbcore_ball::Ball;
use arbcore_float::Rounded;

/// Format a duration for display.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 0.001 {
        format!("{:.2}µs", secs * 1_000_000.0)
    } else if secs < 1.0 {
        format!("{:.2}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.3}s")
    } else {
        let mins = (secs / 60.0).floor() as u64;
        let remaining = secs - (mins as f64 * 60.0);
        format!("{mins}m{remaining:.1}s")
    }
}

/// Relative accuracy of a ball for display.
#[must_use]
pub fn format_accuracy(ball: &Ball) -> String {
    if ball.is_exact() {
        return "exact".to_string();
    }
    match ball.rel_accuracy_bits() {
        Some(bits) => format!("{bits} bits"),
        None => "none".to_string(),
    }
}

/// Renders results as text, honoring the verbose and quiet flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct Presenter {
    verbose: bool,
    quiet: bool,
}

impl Presenter {
    /// Presenter for the given flags. Quiet wins over verbose.
    #[must_use]
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose: verbose && !quiet,
            quiet,
        }
    }

    /// Whether detail lines are printed.
    #[must_use]
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// A single labeled ball.
    #[must_use]
    pub fn ball(&self, label: &str, value: &Ball) -> String {
        if self.quiet {
            return format!("{value}\n");
        }
        let mut out = format!("{label} = {value}\n");
        if self.verbose {
            let _ = writeln!(out, "  accuracy: {}", format_accuracy(value));
        }
        out
    }

    /// A rounded float result.
    #[must_use]
    pub fn rounded(&self, label: &str, value: &Rounded) -> String {
        if self.quiet {
            return format!("{}\n", value.value);
        }
        let exactness = if value.exact { "exact" } else { "inexact" };
        format!("{label} = {} ({exactness})\n", value.value)
    }

    /// One value per evaluation point.
    #[must_use]
    pub fn values(&self, points: &[String], values: &[Ball]) -> String {
        let mut out = String::new();
        for (x, v) in points.iter().zip(values) {
            if self.quiet {
                let _ = writeln!(out, "{v}");
            } else {
                let _ = writeln!(out, "p({}) = {v}", x.trim());
            }
        }
        out
    }

    /// An indented detail line, shown only in verbose mode.
    #[must_use]
    pub fn detail(&self, key: &str, value: impl std::fmt::Display) -> String {
        if self.verbose {
            format!("  {key}: {value}\n")
        } else {
            String::new()
        }
    }
}

/// Write rendered output to a file.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be created or written.
pub fn write_to_file(path: &str, text: &str) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(text.as_bytes())?;
    file.flush()
}
