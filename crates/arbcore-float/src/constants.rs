//! Kernel-wide constants.

/// Bits per limb.
pub const LIMB_BITS: u32 = 64;

/// Operand length (in limbs) from which products are delegated to
/// `num-bigint`'s subquadratic multiplication instead of the schoolbook loop.
pub const MUL_BASECASE_LIMIT: usize = 32;

/// Limb with only the top bit set; the top limb of every normalized mantissa
/// is at least this large.
pub const LIMB_HIGH_BIT: u64 = 1 << 63;
