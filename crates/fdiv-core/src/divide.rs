#![forbid(unsafe_code)]

use std::collections::VecDeque;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

use fdiv_runtime::{RuntimeMode, ZeroDivisionPolicy, ZeroResolution};

use crate::DivisionKind;
use crate::operand::Operand;
use crate::validation::{OperandWarning, ValidatedOperands, validate_operands};

/// Common options shared by the division entrypoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DivideOptions {
    pub mode: RuntimeMode,
    pub policy: ZeroDivisionPolicy,
    pub check_finite: bool,
}

impl Default for DivideOptions {
    fn default() -> Self {
        Self {
            mode: RuntimeMode::Strict,
            policy: ZeroDivisionPolicy::Raise,
            check_finite: false,
        }
    }
}

impl DivideOptions {
    #[must_use]
    pub fn with_mode(mut self, mode: RuntimeMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: ZeroDivisionPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_check_finite(mut self, check_finite: bool) -> Self {
        self.check_finite = check_finite;
        self
    }
}

/// The seven distinct zero-denominator diagnostics the legacy
/// interpreter produced. Operand types select the variant: a float on
/// either side of the operator yields the float wording. Integer `%`
/// has its own text, while integer `//` and `divmod` share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroDivisionKind {
    IntTrueDivision,
    FloatTrueDivision,
    IntFloorDivision,
    IntModulo,
    FloatFloorDivision,
    FloatModulo,
    FloatDivMod,
}

impl ZeroDivisionKind {
    /// Diagnostic text, character-for-character what the legacy
    /// interpreter raised.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::IntTrueDivision => "division by zero",
            Self::FloatTrueDivision => "float division by zero",
            Self::IntFloorDivision => "integer division or modulo by zero",
            Self::IntModulo => "integer modulo by zero",
            Self::FloatFloorDivision => "float floor division by zero",
            Self::FloatModulo => "float modulo",
            Self::FloatDivMod => "float divmod()",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DivideError {
    /// Zero denominator under [`ZeroDivisionPolicy::Raise`]. Carries the
    /// numerator so callers can build their own fallback value.
    DivisionByZero {
        kind: ZeroDivisionKind,
        numerator: Operand,
    },
    NonFiniteOperand {
        operand: &'static str,
    },
    /// `i64::MIN` floor-divided by `-1`: the true quotient 2^63 is not
    /// representable. The legacy interpreter promoted to a big integer
    /// here; fixed-width arithmetic reports the overflow instead.
    IntegerOverflow {
        operation: &'static str,
    },
}

impl DivideError {
    /// Numerator of the failed request, when the error is a zero
    /// denominator.
    #[must_use]
    pub fn numerator(&self) -> Option<Operand> {
        match self {
            Self::DivisionByZero { numerator, .. } => Some(*numerator),
            Self::NonFiniteOperand { .. } | Self::IntegerOverflow { .. } => None,
        }
    }
}

impl Display for DivideError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DivisionByZero { kind, .. } => write!(f, "{}", kind.message()),
            Self::NonFiniteOperand { operand } => {
                write!(f, "non-finite {operand} rejected by policy")
            }
            Self::IntegerOverflow { operation } => {
                write!(f, "integer overflow in {operation}")
            }
        }
    }
}

impl std::error::Error for DivideError {}

/// True-division result with the audit detail [`divide`] discards.
#[derive(Debug, Clone, PartialEq)]
pub struct DivideReport {
    pub value: f64,
    pub zero_denominator: bool,
    pub substituted: Option<f64>,
    pub warnings: Vec<OperandWarning>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DivisionTrace {
    pub operation_id: String,
    pub kind: DivisionKind,
    pub numerator: f64,
    pub denominator: f64,
    pub policy: &'static str,
    pub zero_denominator: bool,
    pub mode: RuntimeMode,
    pub timing_ns: u128,
}

impl DivisionTrace {
    #[must_use]
    pub fn to_json_line(&self) -> String {
        format!(
            "{{\"operation_id\":\"{}\",\"operation\":\"{}\",\"numerator\":{},\"denominator\":{},\"policy\":\"{}\",\"zero_denominator\":{},\"mode\":\"{}\",\"timing_ns\":{}}}",
            self.operation_id,
            division_kind_name(self.kind),
            json_number(self.numerator),
            json_number(self.denominator),
            self.policy,
            self.zero_denominator,
            runtime_mode_name(self.mode),
            self.timing_ns,
        )
    }
}

/// Retained trace count. The divisions themselves are nanosecond-scale,
/// so an unbounded log would dominate memory in any caller that never
/// drains; the ring keeps the most recent window instead.
pub const TRACE_LOG_CAPACITY: usize = 4096;

static TRACE_LOG: OnceLock<Mutex<VecDeque<DivisionTrace>>> = OnceLock::new();
static OPERATION_COUNTER: AtomicU64 = AtomicU64::new(1);

fn trace_log() -> &'static Mutex<VecDeque<DivisionTrace>> {
    TRACE_LOG.get_or_init(|| Mutex::new(VecDeque::new()))
}

fn next_operation_id() -> String {
    let next = OPERATION_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("div-op-{next:016x}")
}

fn record_trace(trace: DivisionTrace) {
    if let Ok(mut log) = trace_log().lock() {
        if log.len() == TRACE_LOG_CAPACITY {
            log.pop_front();
        }
        log.push_back(trace);
    }
}

/// Drain the retained traces, oldest first, for inspection or JSONL
/// export. At most the last [`TRACE_LOG_CAPACITY`] calls are kept
/// between drains.
#[must_use]
pub fn take_division_traces() -> Vec<DivisionTrace> {
    if let Ok(mut log) = trace_log().lock() {
        return log.drain(..).collect();
    }
    Vec::new()
}

/// True division. The result is always a float, even for two integer
/// operands; a zero denominator is resolved by the configured policy.
pub fn divide(
    numerator: Operand,
    denominator: Operand,
    options: &DivideOptions,
) -> Result<f64, DivideError> {
    let validated = validate_operands(numerator, denominator, options)?;
    let started = Instant::now();
    let outcome = resolve_true_division(&validated, options)?;

    record_trace(DivisionTrace {
        operation_id: next_operation_id(),
        kind: DivisionKind::TrueDivision,
        numerator: numerator.as_f64(),
        denominator: denominator.as_f64(),
        policy: options.policy.label(),
        zero_denominator: outcome.zero_denominator,
        mode: options.mode,
        timing_ns: started.elapsed().as_nanos(),
    });

    Ok(outcome.value)
}

/// True division returning the full [`DivideReport`]: the value plus
/// the zero-path flag, the substituted value if the policy supplied
/// one, and any operand warnings.
pub fn divide_with_report(
    numerator: Operand,
    denominator: Operand,
    options: &DivideOptions,
) -> Result<DivideReport, DivideError> {
    let validated = validate_operands(numerator, denominator, options)?;
    let started = Instant::now();
    let outcome = resolve_true_division(&validated, options)?;

    record_trace(DivisionTrace {
        operation_id: next_operation_id(),
        kind: DivisionKind::TrueDivision,
        numerator: numerator.as_f64(),
        denominator: denominator.as_f64(),
        policy: options.policy.label(),
        zero_denominator: outcome.zero_denominator,
        mode: options.mode,
        timing_ns: started.elapsed().as_nanos(),
    });

    Ok(DivideReport {
        value: outcome.value,
        zero_denominator: outcome.zero_denominator,
        substituted: outcome.substituted,
        warnings: validated.warnings,
    })
}

/// Floored division matching the legacy `//` operator: integer operands
/// produce an integer, a float on either side produces a float.
///
/// Zero denominators always raise here. The substitution policies
/// cover true division only; the legacy helpers never softened `//`.
pub fn floor_divide(
    numerator: Operand,
    denominator: Operand,
    options: &DivideOptions,
) -> Result<Operand, DivideError> {
    let validated = validate_operands(numerator, denominator, options)?;
    let started = Instant::now();

    let result = match (validated.numerator, validated.denominator) {
        (Operand::Int(a), Operand::Int(b)) => {
            if b == 0 {
                return Err(DivideError::DivisionByZero {
                    kind: ZeroDivisionKind::IntFloorDivision,
                    numerator,
                });
            }
            let (quotient, _) = int_floor_divmod(a, b, "floor division")?;
            Operand::Int(quotient)
        }
        _ => {
            let wx = validated.denominator.as_f64();
            if wx == 0.0 {
                return Err(DivideError::DivisionByZero {
                    kind: ZeroDivisionKind::FloatFloorDivision,
                    numerator,
                });
            }
            let (floored, _) = float_floor_divmod(validated.numerator.as_f64(), wx);
            Operand::Float(floored)
        }
    };

    record_trace(DivisionTrace {
        operation_id: next_operation_id(),
        kind: DivisionKind::FloorDivision,
        numerator: numerator.as_f64(),
        denominator: denominator.as_f64(),
        policy: options.policy.label(),
        zero_denominator: false,
        mode: options.mode,
        timing_ns: started.elapsed().as_nanos(),
    });

    Ok(result)
}

/// Remainder matching the legacy `%` operator: the result carries the
/// sign of the denominator.
pub fn modulo(
    numerator: Operand,
    denominator: Operand,
    options: &DivideOptions,
) -> Result<Operand, DivideError> {
    let validated = validate_operands(numerator, denominator, options)?;
    let started = Instant::now();

    let result = match (validated.numerator, validated.denominator) {
        (Operand::Int(a), Operand::Int(b)) => {
            if b == 0 {
                return Err(DivideError::DivisionByZero {
                    kind: ZeroDivisionKind::IntModulo,
                    numerator,
                });
            }
            // Every integer is a multiple of -1, which sidesteps the
            // one quotient that would overflow (i64::MIN // -1).
            let remainder = if b == -1 {
                0
            } else {
                int_floor_divmod(a, b, "modulo")?.1
            };
            Operand::Int(remainder)
        }
        _ => {
            let wx = validated.denominator.as_f64();
            if wx == 0.0 {
                return Err(DivideError::DivisionByZero {
                    kind: ZeroDivisionKind::FloatModulo,
                    numerator,
                });
            }
            Operand::Float(float_modulo(validated.numerator.as_f64(), wx))
        }
    };

    record_trace(DivisionTrace {
        operation_id: next_operation_id(),
        kind: DivisionKind::Modulo,
        numerator: numerator.as_f64(),
        denominator: denominator.as_f64(),
        policy: options.policy.label(),
        zero_denominator: false,
        mode: options.mode,
        timing_ns: started.elapsed().as_nanos(),
    });

    Ok(result)
}

/// Quotient and remainder in one call, matching the legacy `divmod`
/// builtin: `numerator == quotient * denominator + remainder` up to
/// float rounding.
pub fn divmod(
    numerator: Operand,
    denominator: Operand,
    options: &DivideOptions,
) -> Result<(Operand, Operand), DivideError> {
    let validated = validate_operands(numerator, denominator, options)?;
    let started = Instant::now();

    let result = match (validated.numerator, validated.denominator) {
        (Operand::Int(a), Operand::Int(b)) => {
            if b == 0 {
                return Err(DivideError::DivisionByZero {
                    kind: ZeroDivisionKind::IntFloorDivision,
                    numerator,
                });
            }
            let (quotient, remainder) = int_floor_divmod(a, b, "divmod")?;
            (Operand::Int(quotient), Operand::Int(remainder))
        }
        _ => {
            let wx = validated.denominator.as_f64();
            if wx == 0.0 {
                return Err(DivideError::DivisionByZero {
                    kind: ZeroDivisionKind::FloatDivMod,
                    numerator,
                });
            }
            let (floored, remainder) = float_floor_divmod(validated.numerator.as_f64(), wx);
            (Operand::Float(floored), Operand::Float(remainder))
        }
    };

    record_trace(DivisionTrace {
        operation_id: next_operation_id(),
        kind: DivisionKind::DivMod,
        numerator: numerator.as_f64(),
        denominator: denominator.as_f64(),
        policy: options.policy.label(),
        zero_denominator: false,
        mode: options.mode,
        timing_ns: started.elapsed().as_nanos(),
    });

    Ok(result)
}

/// True division that signals a zero denominator with `None` instead of
/// an error. This is the contract of the legacy `safe_divide` helper.
#[must_use]
pub fn checked_divide(numerator: Operand, denominator: Operand) -> Option<f64> {
    if denominator.is_zero() {
        return None;
    }
    Some(numerator.as_f64() / denominator.as_f64())
}

/// `None`-signalling variant of [`floor_divide`]. Also absorbs the
/// `i64::MIN // -1` overflow.
#[must_use]
pub fn checked_floor_divide(numerator: Operand, denominator: Operand) -> Option<Operand> {
    floor_divide(numerator, denominator, &DivideOptions::default()).ok()
}

/// `None`-signalling variant of [`modulo`].
#[must_use]
pub fn checked_modulo(numerator: Operand, denominator: Operand) -> Option<Operand> {
    modulo(numerator, denominator, &DivideOptions::default()).ok()
}

// ── Kernels ─────────────────────────────────────────────────────────

struct TrueDivisionOutcome {
    value: f64,
    zero_denominator: bool,
    substituted: Option<f64>,
}

fn resolve_true_division(
    operands: &ValidatedOperands,
    options: &DivideOptions,
) -> Result<TrueDivisionOutcome, DivideError> {
    if operands.denominator.is_zero() {
        return match options.policy.resolve(operands.numerator.as_f64()) {
            ZeroResolution::Raise => Err(DivideError::DivisionByZero {
                kind: true_division_zero_kind(operands.numerator, operands.denominator),
                numerator: operands.numerator,
            }),
            ZeroResolution::Substitute(value) => Ok(TrueDivisionOutcome {
                value,
                zero_denominator: true,
                substituted: Some(value),
            }),
        };
    }

    Ok(TrueDivisionOutcome {
        value: operands.numerator.as_f64() / operands.denominator.as_f64(),
        zero_denominator: false,
        substituted: None,
    })
}

/// Floored quotient and remainder for integers: the quotient truncates
/// toward negative infinity and the remainder takes the denominator's
/// sign.
fn int_floor_divmod(a: i64, b: i64, operation: &'static str) -> Result<(i64, i64), DivideError> {
    debug_assert!(b != 0, "zero denominators are resolved before kernels run");
    if a == i64::MIN && b == -1 {
        return Err(DivideError::IntegerOverflow { operation });
    }

    let mut quotient = a / b;
    let mut remainder = a - quotient * b;
    if remainder != 0 && (remainder < 0) != (b < 0) {
        quotient -= 1;
        remainder += b;
    }
    Ok((quotient, remainder))
}

/// Floored quotient and remainder for floats.
///
/// `%` in this crate is C `fmod`, whose remainder takes the numerator's
/// sign; the sign fix and the half-ulp correction on the floored
/// quotient reproduce the legacy interpreter bit-for-bit, including the
/// signed-zero results.
fn float_floor_divmod(vx: f64, wx: f64) -> (f64, f64) {
    debug_assert!(wx != 0.0, "zero denominators are resolved before kernels run");
    let mut remainder = vx % wx;
    // fmod is exact, so vx - remainder is mathematically an exact
    // multiple of wx; the division only approximates an integer.
    let mut div = (vx - remainder) / wx;
    if remainder != 0.0 {
        if (wx < 0.0) != (remainder < 0.0) {
            remainder += wx;
            div -= 1.0;
        }
    } else {
        // fmod of signed zeroes differs across platforms; pin the
        // remainder's sign to the denominator's.
        remainder = 0.0f64.copysign(wx);
    }

    let floored = if div != 0.0 {
        let mut f = div.floor();
        if div - f > 0.5 {
            f += 1.0;
        }
        f
    } else {
        // div is zero: keep the sign of the true quotient.
        0.0f64.copysign(vx / wx)
    };
    (floored, remainder)
}

/// Float remainder with the denominator's sign.
fn float_modulo(vx: f64, wx: f64) -> f64 {
    debug_assert!(wx != 0.0, "zero denominators are resolved before kernels run");
    let mut remainder = vx % wx;
    if remainder != 0.0 {
        if (wx < 0.0) != (remainder < 0.0) {
            remainder += wx;
        }
    } else {
        remainder = 0.0f64.copysign(wx);
    }
    remainder
}

fn true_division_zero_kind(numerator: Operand, denominator: Operand) -> ZeroDivisionKind {
    if numerator.is_float() || denominator.is_float() {
        ZeroDivisionKind::FloatTrueDivision
    } else {
        ZeroDivisionKind::IntTrueDivision
    }
}

fn division_kind_name(kind: DivisionKind) -> &'static str {
    match kind {
        DivisionKind::TrueDivision => "true_division",
        DivisionKind::FloorDivision => "floor_division",
        DivisionKind::Modulo => "modulo",
        DivisionKind::DivMod => "divmod",
    }
}

fn runtime_mode_name(mode: RuntimeMode) -> &'static str {
    match mode {
        RuntimeMode::Strict => "Strict",
        RuntimeMode::Hardened => "Hardened",
    }
}

fn json_number(value: f64) -> String {
    // serde_json convention: non-finite doubles serialize as null.
    if value.is_finite() {
        format!("{value:?}")
    } else {
        "null".to_string()
    }
}
