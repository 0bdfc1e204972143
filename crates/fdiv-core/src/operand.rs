#![forbid(unsafe_code)]

use std::fmt::{Display, Formatter};

/// Scalar operand accepted by the division kernels.
///
/// Mirrors the two numeric types the legacy helpers handled: machine
/// integers and IEEE 754 doubles. Operand type drives result type and
/// error wording exactly as the legacy interpreter did: an operation
/// touching a `Float` takes the float path even when the other side
/// is an `Int`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand {
    Int(i64),
    Float(f64),
}

impl Operand {
    /// Coerce to f64. Integers above 2^53 round to the nearest
    /// representable double, same as the legacy float coercion.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(value) => value as f64,
            Self::Float(value) => value,
        }
    }

    /// Zero test matching `== 0` in the legacy code: negative zero
    /// counts as zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        match self {
            Self::Int(value) => value == 0,
            Self::Float(value) => value == 0.0,
        }
    }

    /// Integers are always finite; floats delegate to IEEE.
    #[must_use]
    pub fn is_finite(self) -> bool {
        match self {
            Self::Int(_) => true,
            Self::Float(value) => value.is_finite(),
        }
    }

    #[must_use]
    pub fn is_float(self) -> bool {
        matches!(self, Self::Float(_))
    }

    #[must_use]
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
        }
    }
}

impl From<i64> for Operand {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Operand {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl Display for Operand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            // Debug rendering keeps the trailing ".0" on integral
            // floats, matching the legacy repr of float values.
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value:?}"),
        }
    }
}
