#![forbid(unsafe_code)]

//! Runtime mode definitions for Strict (CPython-compatible) and Hardened operation.

use serde::{Deserialize, Serialize};

/// Operational mode governing compatibility/safety trade-offs.
///
/// - **Strict**: Match CPython division behavior as closely as possible;
///   `ZeroDivisionError` message text is replicated exactly, non-finite
///   operands flow through IEEE-754 arithmetic, and a finite quotient that
///   overflows becomes a signed infinity rather than an error.
/// - **Hardened**: Extra safety layer beyond CPython; NaN/Inf operands are
///   rejected before any kernel runs, instead of propagating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuntimeMode {
    Strict,
    Hardened,
}
