#![forbid(unsafe_code)]

//! Stateful division front-end with an audit trail.
//!
//! [`DivisionEngine`] wraps the free-function kernels with a bounded
//! [`ZeroEventLedger`]: every zero-denominator encounter, whether the
//! policy substituted a value or the request raised, leaves an entry.

use fdiv_runtime::{RuntimeMode, ZeroEventEntry, ZeroEventLedger};

use crate::divide::{
    DivideError, DivideOptions, DivideReport, divide_with_report, divmod, floor_divide, modulo,
};
use crate::operand::Operand;

/// Division front-end that remembers its zero-denominator history.
///
/// Each call is independent: the ledger records history for audit but
/// never influences the computed results.
#[derive(Debug, Clone)]
pub struct DivisionEngine {
    options: DivideOptions,
    ledger: ZeroEventLedger,
}

impl DivisionEngine {
    #[must_use]
    pub fn new(options: DivideOptions, ledger_capacity: usize) -> Self {
        Self {
            options,
            ledger: ZeroEventLedger::new(ledger_capacity),
        }
    }

    #[must_use]
    pub const fn options(&self) -> &DivideOptions {
        &self.options
    }

    #[must_use]
    pub const fn mode(&self) -> RuntimeMode {
        self.options.mode
    }

    #[must_use]
    pub const fn ledger(&self) -> &ZeroEventLedger {
        &self.ledger
    }

    /// True division under the engine's options, recording any zero
    /// encounter in the ledger.
    pub fn divide(&mut self, numerator: Operand, denominator: Operand) -> Result<f64, DivideError> {
        match divide_with_report(numerator, denominator, &self.options) {
            Ok(report) => {
                if report.zero_denominator {
                    self.record_zero_event("true_division", numerator, report.substituted);
                }
                Ok(report.value)
            }
            Err(err) => {
                if matches!(err, DivideError::DivisionByZero { .. }) {
                    self.record_zero_event("true_division", numerator, None);
                }
                Err(err)
            }
        }
    }

    /// True division returning the full report, with ledger recording.
    pub fn divide_with_report(
        &mut self,
        numerator: Operand,
        denominator: Operand,
    ) -> Result<DivideReport, DivideError> {
        match divide_with_report(numerator, denominator, &self.options) {
            Ok(report) => {
                if report.zero_denominator {
                    self.record_zero_event("true_division", numerator, report.substituted);
                }
                Ok(report)
            }
            Err(err) => {
                if matches!(err, DivideError::DivisionByZero { .. }) {
                    self.record_zero_event("true_division", numerator, None);
                }
                Err(err)
            }
        }
    }

    /// Floored division; zero denominators raise and are recorded.
    pub fn floor_divide(
        &mut self,
        numerator: Operand,
        denominator: Operand,
    ) -> Result<Operand, DivideError> {
        let options = self.options;
        self.run_raising("floor_division", numerator, move || {
            floor_divide(numerator, denominator, &options)
        })
    }

    /// Remainder; zero denominators raise and are recorded.
    pub fn modulo(
        &mut self,
        numerator: Operand,
        denominator: Operand,
    ) -> Result<Operand, DivideError> {
        let options = self.options;
        self.run_raising("modulo", numerator, move || {
            modulo(numerator, denominator, &options)
        })
    }

    /// Quotient/remainder pair; zero denominators raise and are
    /// recorded.
    pub fn divmod(
        &mut self,
        numerator: Operand,
        denominator: Operand,
    ) -> Result<(Operand, Operand), DivideError> {
        let options = self.options;
        self.run_raising("divmod", numerator, move || {
            divmod(numerator, denominator, &options)
        })
    }

    fn run_raising<T>(
        &mut self,
        operation: &'static str,
        numerator: Operand,
        kernel: impl FnOnce() -> Result<T, DivideError>,
    ) -> Result<T, DivideError> {
        match kernel() {
            Ok(value) => Ok(value),
            Err(err) => {
                if matches!(err, DivideError::DivisionByZero { .. }) {
                    self.record_zero_event(operation, numerator, None);
                }
                Err(err)
            }
        }
    }

    fn record_zero_event(
        &mut self,
        operation: &'static str,
        numerator: Operand,
        substituted: Option<f64>,
    ) {
        let reason = format!(
            "mode={:?}; operation={operation}; policy={}; numerator={numerator}",
            self.options.mode,
            self.options.policy.label(),
        );
        self.ledger.record(ZeroEventEntry {
            mode: self.options.mode,
            operation: operation.to_string(),
            policy: self.options.policy,
            numerator: numerator.as_f64(),
            substituted,
            reason,
        });
    }
}
