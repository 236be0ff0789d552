//! Rounding modes and rounding of raw limb arrays to a bit precision.

use std::fmt;
use std::str::FromStr;

use crate::constants::LIMB_HIGH_BIT;
use crate::error::FloatError;
use crate::limb;

/// Rule for choosing a representable value when a result has too many bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Round {
    /// Toward zero.
    Down,
    /// Away from zero.
    Up,
    /// Toward negative infinity.
    Floor,
    /// Toward positive infinity.
    Ceil,
    /// To nearest, ties to even.
    #[default]
    Nearest,
}

impl Round {
    /// All modes, in declaration order.
    pub const ALL: [Self; 5] = [Self::Down, Self::Up, Self::Floor, Self::Ceil, Self::Nearest];

    /// Canonical lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Down => "down",
            Self::Up => "up",
            Self::Floor => "floor",
            Self::Ceil => "ceil",
            Self::Nearest => "nearest",
        }
    }

    /// Whether a truncated magnitude must be incremented.
    fn increments(self, negative: bool, round_bit: bool, sticky: bool, odd: bool) -> bool {
        let inexact = round_bit || sticky;
        match self {
            Self::Down => false,
            Self::Up => inexact,
            Self::Floor => inexact && negative,
            Self::Ceil => inexact && !negative,
            Self::Nearest => round_bit && (sticky || odd),
        }
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Round {
    type Err = FloatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "down" | "zero" | "toward-zero" => Ok(Self::Down),
            "up" | "away" => Ok(Self::Up),
            "floor" | "-inf" => Ok(Self::Floor),
            "ceil" | "+inf" => Ok(Self::Ceil),
            "nearest" | "near" | "even" => Ok(Self::Nearest),
            _ => Err(FloatError::UnknownRounding(s.to_string())),
        }
    }
}

/// Result of rounding a limb array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundedLimbs {
    /// Normalized mantissa: top bit of the top limb set, lowest limb nonzero.
    pub mantissa: Vec<u64>,
    /// Power of two to apply: rounded value = mantissa * 2^shift.
    pub shift: i64,
    /// False iff nonzero bits were discarded.
    pub exact: bool,
}

/// Round the integer held in `src` to `prec` significant bits.
///
/// `src` is little-endian and must have a nonzero top limb. The sign only
/// matters for the directed modes `Floor` and `Ceil`.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
#[must_use]
pub fn round_limbs(src: &[u64], negative: bool, prec: u64, rnd: Round) -> RoundedLimbs {
    let n = src.len();
    let top = src[n - 1];
    debug_assert!(top != 0, "round_limbs needs a nonzero top limb");
    let lz = top.leading_zeros();
    let bits = 64 * n as u64 - u64::from(lz);

    if bits <= prec {
        let mut mantissa = src.to_vec();
        limb::shl_in_place(&mut mantissa, lz);
        let tz = limb::trailing_zero_limbs(&mantissa);
        mantissa.drain(..tz);
        return RoundedLimbs {
            mantissa,
            shift: 64 * tz as i64 - i64::from(lz),
            exact: true,
        };
    }

    let mut discard = bits - prec;
    let round_bit = limb::bit(src, discard - 1);
    let sticky = limb::any_below(src, discard - 1);
    let odd = limb::bit(src, discard);

    let len = prec.div_ceil(64);
    let pad = (64 * len - prec) as u32;
    let mut mantissa = limb::extract_bits(src, discard, prec);
    limb::shl_in_place(&mut mantissa, pad);

    if rnd.increments(negative, round_bit, sticky, odd) {
        let carry = limb::add_scalar(&mut mantissa, 1u64 << pad);
        if carry != 0 {
            // Rounded up to the next power of two.
            mantissa.fill(0);
            if let Some(top) = mantissa.last_mut() {
                *top = LIMB_HIGH_BIT;
            }
            discard += 1;
        }
    }

    let tz = limb::trailing_zero_limbs(&mantissa);
    mantissa.drain(..tz);
    RoundedLimbs {
        mantissa,
        shift: discard as i64 - i64::from(pad) + 64 * tz as i64,
        exact: !(round_bit || sticky),
    }
}
