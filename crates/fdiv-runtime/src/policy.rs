#![forbid(unsafe_code)]

//! Zero-denominator decision model.
//!
//! A [`ZeroDivisionPolicy`] is chosen by the caller up front and consulted
//! only when a denominator is exactly zero (negative zero included). The
//! policy either lets the operation fail or names the value substituted in
//! place of the undefined quotient.

use serde::{Deserialize, Serialize};

/// What to do when the denominator of a true division is exactly zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ZeroDivisionPolicy {
    /// Fail with a `DivisionByZero` error, carrying the numerator for
    /// diagnostics.
    Raise,
    /// Return the given value unchanged.
    ReturnDefault(f64),
    /// Return an infinity whose sign matches the numerator; a zero
    /// numerator yields `0.0`.
    ReturnSignedInfinity,
}

impl Default for ZeroDivisionPolicy {
    fn default() -> Self {
        Self::Raise
    }
}

/// Resolution of a policy for one concrete zero-denominator case.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZeroResolution {
    /// The operation must fail.
    Raise,
    /// The operation returns this value instead of failing.
    Substitute(f64),
}

impl ZeroDivisionPolicy {
    /// Decide the outcome for a zero-denominator division with the given
    /// numerator.
    ///
    /// `ReturnSignedInfinity` follows the chained comparison of the legacy
    /// helper exactly: `+inf` when `numerator > 0`, `-inf` when
    /// `numerator < 0`, and `0.0` otherwise. A NaN numerator fails both
    /// comparisons and resolves to `0.0`.
    #[must_use]
    pub fn resolve(self, numerator: f64) -> ZeroResolution {
        match self {
            Self::Raise => ZeroResolution::Raise,
            Self::ReturnDefault(value) => ZeroResolution::Substitute(value),
            Self::ReturnSignedInfinity => {
                ZeroResolution::Substitute(signed_infinity_for(numerator))
            }
        }
    }

    /// Stable label for traces and evidence entries.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Raise => "raise",
            Self::ReturnDefault(_) => "return_default",
            Self::ReturnSignedInfinity => "return_signed_infinity",
        }
    }
}

/// Signed-infinity sentinel for a zero-denominator quotient.
#[must_use]
pub fn signed_infinity_for(numerator: f64) -> f64 {
    if numerator > 0.0 {
        f64::INFINITY
    } else if numerator < 0.0 {
        f64::NEG_INFINITY
    } else {
        0.0
    }
}
