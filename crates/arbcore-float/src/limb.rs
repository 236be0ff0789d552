//! Limb-level arithmetic on little-endian `u64` slices.

use num_bigint::BigUint;

use crate::constants::MUL_BASECASE_LIMIT;

/// Add with carry: a + b + carry -> (sum, `new_carry`)
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn add_with_carry(a: u64, b: u64, carry: u64) -> (u64, u64) {
    let sum = u128::from(a) + u128::from(b) + u128::from(carry);
    (sum as u64, (sum >> 64) as u64)
}

/// Multiply: a * b -> (low, high)
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn mul_wide(a: u64, b: u64) -> (u64, u64) {
    let prod = u128::from(a) * u128::from(b);
    (prod as u64, (prod >> 64) as u64)
}

/// Add a scalar into a limb slice, returning carry.
pub fn add_scalar(data: &mut [u64], scalar: u64) -> u64 {
    let mut carry = scalar;
    for limb in data.iter_mut() {
        let (sum, c) = add_with_carry(*limb, carry, 0);
        *limb = sum;
        carry = c;
        if carry == 0 {
            break;
        }
    }
    carry
}

/// `rp[..ap.len()] = ap * b`, returning the high limb.
pub fn mul_1(rp: &mut [u64], ap: &[u64], b: u64) -> u64 {
    let mut carry = 0;
    for (r, &a) in rp.iter_mut().zip(ap) {
        let (lo, hi) = mul_wide(a, b);
        let (sum, c) = add_with_carry(lo, carry, 0);
        *r = sum;
        carry = hi + c;
    }
    carry
}

/// `rp[..ap.len()] += ap * b`, returning the high limb.
#[allow(clippy::cast_possible_truncation)]
pub fn addmul_1(rp: &mut [u64], ap: &[u64], b: u64) -> u64 {
    let mut carry = 0u64;
    for (r, &a) in rp.iter_mut().zip(ap) {
        let t = u128::from(a) * u128::from(b) + u128::from(*r) + u128::from(carry);
        *r = t as u64;
        carry = (t >> 64) as u64;
    }
    carry
}

/// Schoolbook product. `rp.len()` must equal `ap.len() + bp.len()`.
pub fn mul_basecase(rp: &mut [u64], ap: &[u64], bp: &[u64]) {
    let an = ap.len();
    debug_assert_eq!(rp.len(), an + bp.len());
    rp[an] = mul_1(&mut rp[..an], ap, bp[0]);
    for (j, &b) in bp.iter().enumerate().skip(1) {
        rp[an + j] = addmul_1(&mut rp[j..j + an], ap, b);
    }
}

/// Full product `rp = ap * bp` with `rp.len() == ap.len() + bp.len()`.
///
/// Short operands use the schoolbook loop; once both operands reach
/// [`MUL_BASECASE_LIMIT`] limbs the product goes through `BigUint`.
pub fn mul(rp: &mut [u64], ap: &[u64], bp: &[u64]) {
    if ap.len().min(bp.len()) < MUL_BASECASE_LIMIT {
        mul_basecase(rp, ap, bp);
        return;
    }
    let product = to_biguint(ap) * to_biguint(bp);
    rp.fill(0);
    for (r, digit) in rp.iter_mut().zip(product.iter_u64_digits()) {
        *r = digit;
    }
}

/// Shift left by `shift` bits (`shift < 64`) in place, returning the bits
/// pushed out of the top limb.
pub fn shl_in_place(data: &mut [u64], shift: u32) -> u64 {
    if shift == 0 {
        return 0;
    }
    let mut carry = 0;
    for limb in data.iter_mut() {
        let next = *limb >> (64 - shift);
        *limb = (*limb << shift) | carry;
        carry = next;
    }
    carry
}

/// Copy `count` bits of `src` starting at bit `lo` into a fresh vector of
/// `ceil(count / 64)` limbs. Bits past the end of `src` read as zero.
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn extract_bits(src: &[u64], lo: u64, count: u64) -> Vec<u64> {
    let len = count.div_ceil(64) as usize;
    let q = (lo / 64) as usize;
    let r = (lo % 64) as u32;
    let limb_at = |i: usize| src.get(i).copied().unwrap_or(0);
    let mut out: Vec<u64> = (0..len)
        .map(|i| {
            let low = limb_at(q + i) >> r;
            if r == 0 {
                low
            } else {
                low | (limb_at(q + i + 1) << (64 - r))
            }
        })
        .collect();
    let top_bits = (count % 64) as u32;
    if top_bits != 0 {
        if let Some(top) = out.last_mut() {
            *top &= (1u64 << top_bits) - 1;
        }
    }
    out
}

/// Value of bit `index` of `src`.
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn bit(src: &[u64], index: u64) -> bool {
    let q = (index / 64) as usize;
    src.get(q).is_some_and(|limb| (limb >> (index % 64)) & 1 == 1)
}

/// Whether any bit strictly below `index` is set.
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn any_below(src: &[u64], index: u64) -> bool {
    let q = ((index / 64) as usize).min(src.len());
    let r = index % 64;
    if src[..q].iter().any(|&l| l != 0) {
        return true;
    }
    r != 0 && q < src.len() && src[q] & ((1u64 << r) - 1) != 0
}

/// Number of low limbs equal to zero.
#[must_use]
pub fn trailing_zero_limbs(src: &[u64]) -> usize {
    src.iter().take_while(|&&l| l == 0).count()
}

/// Convert a little-endian limb slice to a `BigUint`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn to_biguint(limbs: &[u64]) -> BigUint {
    let digits: Vec<u32> = limbs
        .iter()
        .flat_map(|&l| [l as u32, (l >> 32) as u32])
        .collect();
    BigUint::new(digits)
}
