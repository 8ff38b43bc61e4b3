//! Natural log, exponential, and fractional power in wad fixed point
//!
//! `pow_frac` computes `(num/den)^(exp_num/exp_den)` as `exp(e · ln b)`.
//! `ln` reduces its argument into `[1, 2)` by powers of two and evaluates
//! the atanh series `ln m = 2·Σ z^(2k+1)/(2k+1)` with `z = (m−1)/(m+1)`;
//! `exp` reduces modulo `ln 2` and evaluates the Taylor series on the
//! remainder. Both series terminate when the running term underflows wad
//! precision, which happens well inside the iteration caps.

use crate::error::{MathError, Result};
use crate::fixed::{mul_div_floor, narrow, U256, WAD};

/// `ln 2` in wad precision.
pub const LN2_WAD: u128 = 693_147_180_559_945_309;

/// Natural logarithm of a wad-scaled positive value.
///
/// Returns the wad-scaled magnitude and a negative-sign flag, since the
/// result is negative for arguments below one.
pub fn ln_wad(x: u128) -> Result<(u128, bool)> {
    if x == 0 {
        return Err(MathError::LogDomain);
    }

    let mut m = x;
    let mut halvings: u128 = 0;
    let mut doublings: u128 = 0;
    while m >= 2 * WAD {
        m /= 2;
        halvings += 1;
    }
    while m < WAD {
        m *= 2;
        doublings += 1;
    }

    // m in [1, 2): atanh series on z = (m-1)/(m+1), |z| < 1/3
    let z = mul_div_floor(m - WAD, WAD, m + WAD)?;
    let z_squared = mul_div_floor(z, z, WAD)?;
    let mut term = z;
    let mut sum = z;
    let mut denom: u128 = 3;
    while term > 0 && denom < 61 {
        term = mul_div_floor(term, z_squared, WAD)?;
        sum += term / denom;
        denom += 2;
    }
    let ln_mantissa = 2 * sum;

    let positive = ln_mantissa + halvings * LN2_WAD;
    let negative = doublings * LN2_WAD;
    if negative > positive {
        Ok((negative - positive, true))
    } else {
        Ok((positive - negative, false))
    }
}

/// `e^x` for a wad-scaled non-negative exponent.
pub fn exp_wad(x: u128) -> Result<u128> {
    let k = x / LN2_WAD;
    if k >= 128 {
        return Err(MathError::Overflow);
    }
    let r = x % LN2_WAD;

    // Taylor series on r in [0, ln 2)
    let mut term = WAD;
    let mut sum = WAD;
    for i in 1..=32u128 {
        term = mul_div_floor(term, r, WAD)? / i;
        if term == 0 {
            break;
        }
        sum += term;
    }

    narrow(U256::from(sum) << (k as usize))
}

/// `e^(-x)`, saturating to zero when the reciprocal underflows.
fn exp_neg_wad(x: u128) -> Result<u128> {
    match exp_wad(x) {
        Ok(e) => mul_div_floor(WAD, WAD, e),
        Err(MathError::Overflow) => Ok(0),
        Err(e) => Err(e),
    }
}

/// `(num/den)^(exp_num/exp_den)` in wad precision.
///
/// Handles bases below and above one; division always rounds toward zero,
/// so quoted returns never exceed the exact value.
pub fn pow_frac(num: u128, den: u128, exp_num: u128, exp_den: u128) -> Result<u128> {
    if den == 0 || exp_den == 0 {
        return Err(MathError::DivisionByZero);
    }
    if num == 0 {
        return Ok(if exp_num == 0 { WAD } else { 0 });
    }
    if exp_num == 0 || num == den {
        return Ok(WAD);
    }

    let base = mul_div_floor(num, WAD, den)?;
    let (ln_magnitude, ln_negative) = ln_wad(base)?;
    let scaled = mul_div_floor(ln_magnitude, exp_num, exp_den)?;
    if ln_negative {
        exp_neg_wad(scaled)
    } else {
        exp_wad(scaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: u128, expected: u128, tolerance: u128) {
        let diff = actual.abs_diff(expected);
        assert!(
            diff <= tolerance,
            "expected {expected}, got {actual} (diff {diff})"
        );
    }

    #[test]
    fn test_ln_reference_values() {
        let (magnitude, negative) = ln_wad(2 * WAD).unwrap();
        assert!(!negative);
        assert_close(magnitude, LN2_WAD, 10);

        let (magnitude, negative) = ln_wad(WAD / 2).unwrap();
        assert!(negative);
        assert_close(magnitude, LN2_WAD, 10);

        let (magnitude, negative) = ln_wad(WAD).unwrap();
        assert_eq!((magnitude, negative), (0, false));

        // ln(10) = 2.302585092994045684...
        let (magnitude, _) = ln_wad(10 * WAD).unwrap();
        assert_close(magnitude, 2_302_585_092_994_045_684, 100);
    }

    #[test]
    fn test_ln_rejects_zero() {
        assert_eq!(ln_wad(0), Err(MathError::LogDomain));
    }

    #[test]
    fn test_exp_reference_values() {
        assert_eq!(exp_wad(0).unwrap(), WAD);
        // e = 2.718281828459045235...
        assert_close(exp_wad(WAD).unwrap(), 2_718_281_828_459_045_235, 100);
        // e^10 = 22026.465794806716516...
        assert_close(
            exp_wad(10 * WAD).unwrap(),
            22_026_465_794_806_716_516_957,
            1_000_000,
        );
    }

    #[test]
    fn test_exp_overflow() {
        assert_eq!(exp_wad(89 * WAD), Err(MathError::Overflow));
    }

    #[test]
    fn test_pow_exact_roots() {
        // 4^(1/2) = 2
        assert_close(pow_frac(4, 1, 1, 2).unwrap(), 2 * WAD, 100);
        // 8^(2/3) = 4
        assert_close(pow_frac(8, 1, 2, 3).unwrap(), 4 * WAD, 1_000);
        // (1/2)^2 = 1/4
        assert_close(pow_frac(1, 2, 2, 1).unwrap(), WAD / 4, 100);
        // sqrt(1.1) = 1.048808848170151546...
        assert_close(pow_frac(110, 100, 1, 2).unwrap(), 1_048_808_848_170_151_546, 100);
    }

    #[test]
    fn test_pow_identities() {
        assert_eq!(pow_frac(7, 3, 0, 1).unwrap(), WAD);
        assert_eq!(pow_frac(9, 9, 3, 7).unwrap(), WAD);
        assert_eq!(pow_frac(0, 5, 1, 1).unwrap(), 0);
        assert_close(pow_frac(123_456, 1_000, 1, 1).unwrap(), 123_456 * WAD / 1_000, 10_000);
    }

    #[test]
    fn test_pow_bancor_range() {
        // (1 + 0.01)^0.2 = 1.001992047666533...
        assert_close(
            pow_frac(101, 100, 200_000, 1_000_000).unwrap(),
            1_001_992_047_666_533_339,
            1_000,
        );
        // (1 - 0.01)^5 = 0.9509900499
        assert_close(
            pow_frac(99, 100, 1_000_000, 200_000).unwrap(),
            950_990_049_900_000_000,
            1_000,
        );
    }

    #[test]
    fn test_pow_monotone_in_exponent() {
        let lower = pow_frac(3, 2, 1, 4).unwrap();
        let higher = pow_frac(3, 2, 3, 4).unwrap();
        assert!(lower < higher);

        // base below one: larger exponent means smaller result
        let lower = pow_frac(2, 3, 3, 4).unwrap();
        let higher = pow_frac(2, 3, 1, 4).unwrap();
        assert!(lower < higher);
    }
}
