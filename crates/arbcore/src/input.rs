//! Parsing of numeric operands.
//!
//! Operands are integers (`-12`), decimals with an optional exponent
//! (`0.125`, `1.5e-3`) or quotients of those (`1/3`). Each is read as an exact
//! rational; values that are not dyadic become balls enclosing the rational
//! at the requested precision.

use arbcore_ball::Ball;
use num_bigint::BigInt;
use num_traits::{One, Zero};

use crate::errors::CliError;

/// Largest accepted decimal exponent magnitude.
pub const MAX_DECIMAL_EXPONENT: i64 = 100_000;

/// Exact rational read from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rational {
    /// Signed numerator.
    pub numerator: BigInt,
    /// Denominator, never zero.
    pub denominator: BigInt,
}

fn invalid(text: &str) -> CliError {
    CliError::InvalidNumber(text.to_string())
}

fn pow10(exp: i64) -> BigInt {
    num_traits::pow(BigInt::from(10), usize::try_from(exp).unwrap_or(0))
}

/// Read a decimal literal as `numerator / denominator`.
fn parse_decimal(text: &str) -> Result<Rational, CliError> {
    let trimmed = text.trim();
    let (mantissa, exp) = match trimmed.find(['e', 'E']) {
        Some(i) => {
            let exp: i64 = trimmed[i + 1..].parse().map_err(|_| invalid(text))?;
            (&trimmed[..i], exp)
        }
        None => (trimmed, 0),
    };
    let (negative, unsigned) = match mantissa.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, mantissa.strip_prefix('+').unwrap_or(mantissa)),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let digits = format!("{int_part}{frac_part}");
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(text));
    }
    let frac_len = i64::try_from(frac_part.len()).map_err(|_| invalid(text))?;
    let scale = exp.checked_sub(frac_len).ok_or_else(|| invalid(text))?;
    if !matches!(scale.checked_abs(), Some(a) if a <= MAX_DECIMAL_EXPONENT) {
        return Err(invalid(text));
    }

    let mut numerator = BigInt::parse_bytes(digits.as_bytes(), 10).ok_or_else(|| invalid(text))?;
    if negative {
        numerator = -numerator;
    }
    Ok(if scale >= 0 {
        Rational {
            numerator: numerator * pow10(scale),
            denominator: BigInt::one(),
        }
    } else {
        Rational {
            numerator,
            denominator: pow10(-scale),
        }
    })
}

/// Read an integer, decimal or `p/q` operand.
///
/// # Errors
///
/// Returns [`CliError::InvalidNumber`] for malformed text and
/// [`CliError::ZeroDenominator`] when `q` is zero.
pub fn parse_rational(text: &str) -> Result<Rational, CliError> {
    let (p, q) = match text.split_once('/') {
        Some((p, q)) => (parse_decimal(p)?, parse_decimal(q)?),
        None => (
            parse_decimal(text)?,
            Rational {
                numerator: BigInt::one(),
                denominator: BigInt::one(),
            },
        ),
    };
    if q.numerator.is_zero() {
        return Err(CliError::ZeroDenominator(text.to_string()));
    }
    Ok(Rational {
        numerator: p.numerator * q.denominator,
        denominator: p.denominator * q.numerator,
    })
}

impl Rational {
    /// Ball enclosing this rational at `prec` bits.
    ///
    /// # Errors
    ///
    /// Propagates ball arithmetic errors (only an invalid precision).
    pub fn to_ball(&self, prec: u64) -> anyhow::Result<Ball> {
        let num = Ball::from_bigint(&self.numerator);
        if self.denominator.is_one() {
            return Ok(num);
        }
        Ok(num.div(&Ball::from_bigint(&self.denominator), prec)?)
    }
}

/// Parse one operand into a ball at `prec` bits.
///
/// # Errors
///
/// See [`parse_rational`].
pub fn parse_ball(text: &str, prec: u64) -> anyhow::Result<Ball> {
    parse_rational(text)?.to_ball(prec)
}

/// Parse a comma-separated list of operands.
///
/// # Errors
///
/// Fails on the first malformed entry. An empty or blank list is empty.
pub fn parse_list(text: &str, prec: u64) -> anyhow::Result<Vec<Ball>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    text.split(',').map(|item| parse_ball(item, prec)).collect()
}

#[cfg(test)]
mod tests {
    use arbcore_float::Float;

    use super::*;

    fn rational(n: i64, d: i64) -> Rational {
        Rational {
            numerator: BigInt::from(n),
            denominator: BigInt::from(d),
        }
    }

    #[test]
    fn integers_and_decimals() {
        assert_eq!(parse_rational("42").unwrap(), rational(42, 1));
        assert_eq!(parse_rational(" -7 ").unwrap(), rational(-7, 1));
        assert_eq!(parse_rational("+0.25").unwrap(), rational(25, 100));
        assert_eq!(parse_rational("1.5e2").unwrap(), rational(150, 1));
        assert_eq!(parse_rational("3e-2").unwrap(), rational(3, 100));
        assert_eq!(parse_rational(".5").unwrap(), rational(5, 10));
    }

    #[test]
    fn quotients() {
        assert_eq!(parse_rational("1/3").unwrap(), rational(1, 3));
        assert_eq!(parse_rational("0.5/-2").unwrap(), rational(5, -20));
        assert_eq!(
            parse_rational("1/0.0"),
            Err(CliError::ZeroDenominator("1/0.0".into()))
        );
    }

    #[test]
    fn malformed() {
        for text in ["", "-", "1.2.3", "abc", "1e", "0x10", "1/2/3", "1e999999"] {
            assert!(
                matches!(parse_rational(text), Err(CliError::InvalidNumber(_))),
                "{text:?}"
            );
        }
    }

    #[test]
    fn extreme_exponents_are_rejected() {
        for text in [
            "1.5e-9223372036854775808",
            "1e-9223372036854775808",
            "1e9223372036854775807",
            "0.5e-9223372036854775807",
            "1/1.5e-9223372036854775808",
        ] {
            assert!(
                matches!(parse_rational(text), Err(CliError::InvalidNumber(_))),
                "{text:?} should be rejected"
            );
        }
    }

    #[test]
    fn balls_enclose_the_rational() {
        assert_eq!(parse_ball("-12", 64).unwrap(), Ball::from_i64(-12));
        assert!(parse_ball("0.375", 64).unwrap().is_exact());
        let tenth = parse_ball("0.1", 64).unwrap();
        assert!(!tenth.is_exact());
        let one = tenth.mul(&Ball::from_u64(10), 64).unwrap();
        assert!(one.contains(&Float::one()));
    }

    #[test]
    fn lists() {
        let values = parse_list("1, -2,3/4", 64).unwrap();
        assert_eq!(values.len(), 3);
        assert_eq!(values[1], Ball::from_i64(-2));
        assert!(parse_list("  ", 64).unwrap().is_empty());
        assert!(parse_list("1,,2", 64).is_err());
    }
}
