//! Deterministic fixed-point arithmetic for the bonding curve
//!
//! All fractional values are wad-scaled (`1e18`) unsigned integers.
//! Intermediate products run through a 256-bit integer so no `u128`
//! multiply can silently wrap, and every division direction is explicit.

pub mod error;
pub mod fixed;
pub mod power;

pub use error::{MathError, Result};
pub use fixed::{mul_div_ceil, mul_div_floor, U256, WAD};
pub use power::{exp_wad, ln_wad, pow_frac};
