#![forbid(unsafe_code)]

//! Division kernels replicating the legacy interpreter's arithmetic.
//!
//! The crate covers the four division operations of the legacy
//! `simple_utils` surface:
//! - true division (always a float result, policy-mediated zero handling)
//! - floored division (integer-preserving, sign toward negative infinity)
//! - modulo (remainder carries the denominator's sign)
//! - divmod (quotient/remainder pair)
//!
//! Strict mode reproduces the legacy interpreter bit-for-bit, including
//! `ZeroDivisionError` message text; Hardened mode adds a finite-operand
//! gate in front of every kernel.

pub mod divide;
pub mod engine;
pub mod operand;
pub mod validation;

pub use divide::{
    DivideError, DivideOptions, DivideReport, DivisionTrace, ZeroDivisionKind, checked_divide,
    checked_floor_divide, checked_modulo, divide, divide_with_report, divmod, floor_divide, modulo,
    take_division_traces,
};
pub use engine::DivisionEngine;
pub use operand::Operand;
pub use validation::{OperandWarning, ValidatedOperands, validate_operands};

/// Division entrypoints represented in traces and evidence entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DivisionKind {
    TrueDivision,
    FloorDivision,
    Modulo,
    DivMod,
}
