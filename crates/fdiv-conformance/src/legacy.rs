#![forbid(unsafe_code)]

//! Distillation of the legacy `simple_utils` module.
//!
//! The legacy module bound `a = 10`, `b = 0` and divided them at import
//! time, so importing it raised `ZeroDivisionError`. That import-time
//! side effect is not reproduced here; the constants survive as fixture
//! data, and the safe-division wrappers the legacy test suite sketched
//! (conditional infinity, default substitute) map onto the zero-division
//! policies.

use crate::{DivideCase, DividePacketFixture, ExpectedOutcome, FixtureOperand, FixtureZeroPolicy};
use fdiv_runtime::RuntimeMode;

/// Numerator the legacy module assigned to `a`.
pub const LEGACY_A: i64 = 10;
/// Denominator the legacy module assigned to `b`.
pub const LEGACY_B: i64 = 0;

/// Packet pinning the legacy module's import-time scenario and its
/// safe-division variants.
#[must_use]
pub fn legacy_packet() -> DividePacketFixture {
    let cases = vec![
        DivideCase::TrueDivision {
            case_id: "import_division_raises".to_owned(),
            mode: RuntimeMode::Strict,
            numerator: FixtureOperand::Int(LEGACY_A),
            denominator: FixtureOperand::Int(LEGACY_B),
            policy: None,
            check_finite: None,
            expected: ExpectedOutcome::Error {
                error: "division by zero".to_owned(),
            },
        },
        DivideCase::TrueDivision {
            case_id: "module_constants_clean_path".to_owned(),
            mode: RuntimeMode::Strict,
            numerator: FixtureOperand::Int(LEGACY_A),
            denominator: FixtureOperand::Int(2),
            policy: None,
            check_finite: None,
            expected: ExpectedOutcome::Float {
                value: 5.0,
                atol: 0.0,
                rtol: 0.0,
            },
        },
        DivideCase::TrueDivision {
            case_id: "conditional_fallback_positive".to_owned(),
            mode: RuntimeMode::Strict,
            numerator: FixtureOperand::Int(LEGACY_A),
            denominator: FixtureOperand::Int(LEGACY_B),
            policy: Some(FixtureZeroPolicy::ReturnSignedInfinity),
            check_finite: None,
            expected: ExpectedOutcome::SignedInfinity { negative: false },
        },
        DivideCase::TrueDivision {
            case_id: "conditional_fallback_negative".to_owned(),
            mode: RuntimeMode::Strict,
            numerator: FixtureOperand::Int(-LEGACY_A),
            denominator: FixtureOperand::Int(LEGACY_B),
            policy: Some(FixtureZeroPolicy::ReturnSignedInfinity),
            check_finite: None,
            expected: ExpectedOutcome::SignedInfinity { negative: true },
        },
        DivideCase::TrueDivision {
            case_id: "conditional_fallback_zero_numerator".to_owned(),
            mode: RuntimeMode::Strict,
            numerator: FixtureOperand::Int(0),
            denominator: FixtureOperand::Int(LEGACY_B),
            policy: Some(FixtureZeroPolicy::ReturnSignedInfinity),
            check_finite: None,
            expected: ExpectedOutcome::Float {
                value: 0.0,
                atol: 0.0,
                rtol: 0.0,
            },
        },
        DivideCase::TrueDivision {
            case_id: "default_fallback_zero".to_owned(),
            mode: RuntimeMode::Strict,
            numerator: FixtureOperand::Int(LEGACY_A),
            denominator: FixtureOperand::Int(LEGACY_B),
            policy: Some(FixtureZeroPolicy::ReturnDefault { value: 0.0 }),
            check_finite: None,
            expected: ExpectedOutcome::Float {
                value: 0.0,
                atol: 0.0,
                rtol: 0.0,
            },
        },
        DivideCase::TrueDivision {
            case_id: "default_fallback_custom".to_owned(),
            mode: RuntimeMode::Strict,
            numerator: FixtureOperand::Int(LEGACY_A),
            denominator: FixtureOperand::Int(LEGACY_B),
            policy: Some(FixtureZeroPolicy::ReturnDefault { value: -1.0 }),
            check_finite: None,
            expected: ExpectedOutcome::Float {
                value: -1.0,
                atol: 0.0,
                rtol: 0.0,
            },
        },
        DivideCase::TrueDivision {
            case_id: "default_inert_on_clean_path".to_owned(),
            mode: RuntimeMode::Strict,
            numerator: FixtureOperand::Int(LEGACY_A),
            denominator: FixtureOperand::Int(2),
            policy: Some(FixtureZeroPolicy::ReturnDefault { value: 0.0 }),
            check_finite: None,
            expected: ExpectedOutcome::Float {
                value: 5.0,
                atol: 0.0,
                rtol: 0.0,
            },
        },
    ];

    DividePacketFixture {
        packet_id: "FDIV-LEGACY-002".to_owned(),
        family: "legacy_safe_divide".to_owned(),
        cases,
    }
}
