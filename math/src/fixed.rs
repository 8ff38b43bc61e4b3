//! Multiply-divide primitives with explicit rounding direction

use crate::error::{MathError, Result};

// expanded in its own module: the generated impls use an unqualified
// two-parameter `Result`, which must not resolve to this crate's alias
mod wide {
    uint::construct_uint! {
        /// 256-bit integer for overflow-free intermediate products.
        pub struct U256(4);
    }
}

pub use wide::U256;

/// Fixed-point scale: 18 decimal places.
pub const WAD: u128 = 1_000_000_000_000_000_000;

/// Narrow a 256-bit value back to `u128`, failing on overflow.
pub(crate) fn narrow(value: U256) -> Result<u128> {
    if value.bits() > 128 {
        return Err(MathError::Overflow);
    }
    Ok(value.low_u128())
}

/// `floor(a * b / d)`.
pub fn mul_div_floor(a: u128, b: u128, d: u128) -> Result<u128> {
    if d == 0 {
        return Err(MathError::DivisionByZero);
    }
    let product = U256::from(a) * U256::from(b);
    narrow(product / U256::from(d))
}

/// `ceil(a * b / d)`.
pub fn mul_div_ceil(a: u128, b: u128, d: u128) -> Result<u128> {
    if d == 0 {
        return Err(MathError::DivisionByZero);
    }
    let product = U256::from(a) * U256::from(b);
    let divisor = U256::from(d);
    let quotient = product / divisor;
    let rounded = if product % divisor == U256::zero() {
        quotient
    } else {
        quotient + U256::one()
    };
    narrow(rounded)
}
