#![forbid(unsafe_code)]

use fdiv_runtime::RuntimeMode;

use crate::divide::{DivideError, DivideOptions};
use crate::operand::Operand;

/// Non-fatal findings about the operands of a division request.
///
/// Warnings never change the computed result; they surface inputs the
/// legacy suite singled out as numerically delicate so callers can log
/// or escalate them.
#[derive(Debug, Clone, PartialEq)]
pub enum OperandWarning {
    /// Denominator is subnormal: the quotient can overflow to infinity
    /// even though the denominator is nonzero.
    SubnormalDenominator { magnitude: f64 },
    /// Denominator is IEEE negative zero. It is treated as zero, not as
    /// an infinitesimal negative value.
    NegativeZeroDenominator,
}

/// Operands that passed the mode-dependent gate, plus any warnings.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedOperands {
    pub numerator: Operand,
    pub denominator: Operand,
    pub mode: RuntimeMode,
    pub warnings: Vec<OperandWarning>,
}

/// Gate operands before a division kernel runs.
///
/// Strict mode passes non-finite floats through untouched so IEEE
/// semantics survive where the legacy interpreter relied on them.
/// Hardened mode (or an explicit `check_finite`) rejects NaN and
/// infinities before they reach a kernel.
pub fn validate_operands(
    numerator: Operand,
    denominator: Operand,
    options: &DivideOptions,
) -> Result<ValidatedOperands, DivideError> {
    let should_check = options.check_finite || options.mode == RuntimeMode::Hardened;
    if should_check {
        if !numerator.is_finite() {
            return Err(DivideError::NonFiniteOperand {
                operand: "numerator",
            });
        }
        if !denominator.is_finite() {
            return Err(DivideError::NonFiniteOperand {
                operand: "denominator",
            });
        }
    }

    let mut warnings = Vec::new();
    if let Operand::Float(value) = denominator {
        if value != 0.0 && value.abs() < f64::MIN_POSITIVE {
            warnings.push(OperandWarning::SubnormalDenominator {
                magnitude: value.abs(),
            });
        }
        if value == 0.0 && value.is_sign_negative() {
            warnings.push(OperandWarning::NegativeZeroDenominator);
        }
    }

    Ok(ValidatedOperands {
        numerator,
        denominator,
        mode: options.mode,
        warnings,
    })
}
