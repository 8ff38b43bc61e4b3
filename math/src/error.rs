//! Fixed-point kernel error types

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    #[error("arithmetic overflow: result exceeds 128 bits")]
    Overflow,

    #[error("division by zero")]
    DivisionByZero,

    #[error("logarithm of zero is undefined")]
    LogDomain,
}

pub type Result<T> = std::result::Result<T, MathError>;
