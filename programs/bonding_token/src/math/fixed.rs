//! Unsigned fixed point with 128 fractional bits, held in a `U256`.
//!
//! A value `v` represents `v / 2^128`. Logarithms are taken of an exact
//! integer ratio, so a trade that is tiny next to the supply or reserve still
//! keeps its relative precision. Every operation truncates toward zero, so a
//! chain of them never lands above the exact result. The curve engine relies
//! on that to round every payout in favour of the reserve.

pub use wide::U256;

#[allow(clippy::all)]
mod wide {
    use uint::construct_uint;

    construct_uint! {
        /// 256-bit integer, fixed-point values and their products.
        pub struct U256(4);
    }
}

pub const FRAC_BITS: u32 = 128;
pub const ONE: U256 = U256([0, 0, 1, 0]);

/// ln(2) with 128 fractional bits, rounded down and up respectively.
pub const LN2_FLOOR: U256 = U256([0xC9E3_B398_03F2_F6AF, 0xB172_17F7_D1CF_79AB, 0, 0]);
pub const LN2_CEIL: U256 = U256([0xC9E3_B398_03F2_F6B0, 0xB172_17F7_D1CF_79AB, 0, 0]);

// Enough terms for the tail to drop below one ulp over the reduced ranges
// (|z| <= 1/3 for atanh, s < ln 2 for exp).
const ATANH_TERMS: u64 = 48;
const EXP_TERMS: u64 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedError {
    Overflow,
    DivisionByZero,
}

/// `a * b` for two fixed-point values. Both must stay below `2^128 * 2^128`.
#[inline]
fn mul(a: U256, b: U256) -> Result<U256, FixedError> {
    a.checked_mul(b)
        .map(|product| product >> FRAC_BITS)
        .ok_or(FixedError::Overflow)
}

/// `value * num / den` where `num / den` is a plain ratio.
#[inline]
pub fn mul_ratio(value: U256, num: u64, den: u64) -> Result<U256, FixedError> {
    if den == 0 {
        return Err(FixedError::DivisionByZero);
    }
    value
        .checked_mul(U256::from(num))
        .map(|product| product / U256::from(den))
        .ok_or(FixedError::Overflow)
}

/// Scales an integer amount by a fixed-point factor, truncating to whole units.
#[inline]
pub fn scale(amount: u64, factor: U256) -> Result<u64, FixedError> {
    let scaled = U256::from(amount)
        .checked_mul(factor)
        .ok_or(FixedError::Overflow)?
        >> FRAC_BITS;
    if scaled.bits() > 64 {
        return Err(FixedError::Overflow);
    }
    Ok(scaled.low_u64())
}

/// `floor(a * b / d)` on plain integers.
#[inline]
pub fn mul_div(a: u64, b: u64, d: u64) -> Result<u64, FixedError> {
    if d == 0 {
        return Err(FixedError::DivisionByZero);
    }
    let product = (a as u128) * (b as u128) / (d as u128);
    u64::try_from(product).map_err(|_| FixedError::Overflow)
}

/// `atanh(z)` for `0 <= z <= 1/3` via its odd power series.
fn atanh(z: U256) -> Result<U256, FixedError> {
    let z2 = mul(z, z)?;
    let mut term = z;
    let mut sum = z;
    for n in 1..=ATANH_TERMS {
        term = mul(term, z2)?;
        if term.is_zero() {
            break;
        }
        sum += term / U256::from(2 * n + 1);
    }
    Ok(sum)
}

/// `ln(num / den)` for `num >= den > 0`.
///
/// The ratio is split as `2^k * m` with `m` in `[1, 2)`, and `ln(m)` is
/// evaluated as `2 * atanh(z)`. `z = (num - den * 2^k) / (num + den * 2^k)` is
/// formed from the integers directly, so nothing is lost before the series
/// when `num` and `den` are close.
pub fn ln_ratio(num: u128, den: u128) -> Result<U256, FixedError> {
    if den == 0 {
        return Err(FixedError::DivisionByZero);
    }
    if num <= den {
        return Ok(U256::zero());
    }

    let num = U256::from(num);
    let den = U256::from(den);
    let mut k = num.bits() - den.bits();
    if den << k > num {
        k -= 1;
    }
    let base = den << k;
    // num - base < 2^128, so the shift stays within 256 bits
    let z = ((num - base) << FRAC_BITS) / (num + base);

    let ln_m = atanh(z)? << 1u32;
    Ok(LN2_FLOOR * U256::from(k as u64) + ln_m)
}

/// `e^w - 1` for `w >= 0`.
///
/// `w` is reduced to `k * ln 2 + s` with `s` in `[0, ln 2)`, using ln 2
/// rounded up so that `s` never exceeds its exact value. Fails with
/// `Overflow` once the result no longer fits 64 integer bits.
pub fn expm1(w: U256) -> Result<U256, FixedError> {
    if w.is_zero() {
        return Ok(U256::zero());
    }
    let k = w / LN2_CEIL;
    if k >= U256::from(64u8) {
        return Err(FixedError::Overflow);
    }
    let s = w - k * LN2_CEIL;

    let mut term = s;
    let mut sum = s;
    for n in 2..=EXP_TERMS {
        term = mul(term, s)? / U256::from(n);
        if term.is_zero() {
            break;
        }
        sum += term;
    }

    if k.is_zero() {
        return Ok(sum);
    }
    // ONE + sum < 2^129 and k <= 63
    Ok(((ONE + sum) << k.low_u32()) - ONE)
}

/// `1 - e^(-w)` for `w >= 0`, always strictly below `ONE`.
///
/// Computed as `1 - 1 / (1 + em)` with `em = e^w - 1`, the reciprocal rounded
/// up. Once `e^w` leaves the representable range the exact value is above
/// `1 - 2^-64`, which is returned.
pub fn one_minus_exp_neg(w: U256) -> Result<U256, FixedError> {
    match expm1(w) {
        Ok(em) => {
            // ceil(2^256 / (ONE + em)), at most ONE
            let reciprocal = U256::MAX / (ONE + em) + U256::one();
            Ok(ONE - reciprocal)
        }
        Err(FixedError::Overflow) => Ok(ONE - (ONE >> 64u32)),
        Err(e) => Err(e),
    }
}
