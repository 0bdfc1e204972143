#![no_main]

use arbitrary::Arbitrary;
use fdiv_core::{
    DivideError, DivideOptions, Operand, OperandWarning, divide, divide_with_report,
    take_division_traces,
};
use fdiv_runtime::{RuntimeMode, ZeroDivisionPolicy, ZeroResolution};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct DividePoliciesInput {
    numerator_int: i64,
    numerator_float: f64,
    denominator_int: i64,
    denominator_float: f64,
    numerator_is_float: bool,
    denominator_is_float: bool,
    hardened: bool,
    check_finite: bool,
    policy_selector: u8,
    default_value: f64,
}

fn build_operand(int_value: i64, float_value: f64, as_float: bool) -> Operand {
    if as_float {
        Operand::Float(float_value)
    } else {
        Operand::Int(int_value)
    }
}

fn build_policy(selector: u8, default_value: f64) -> ZeroDivisionPolicy {
    match selector % 3 {
        0 => ZeroDivisionPolicy::Raise,
        1 => ZeroDivisionPolicy::ReturnDefault(default_value),
        _ => ZeroDivisionPolicy::ReturnSignedInfinity,
    }
}

// NaN payloads compare equal here; everything else must match bit for
// bit, signed zeros included.
fn same_operand(left: Operand, right: Operand) -> bool {
    match (left, right) {
        (Operand::Int(a), Operand::Int(b)) => a == b,
        (Operand::Float(a), Operand::Float(b)) => {
            a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan())
        }
        _ => false,
    }
}

fuzz_target!(|input: DividePoliciesInput| {
    let numerator = build_operand(
        input.numerator_int,
        input.numerator_float,
        input.numerator_is_float,
    );
    let denominator = build_operand(
        input.denominator_int,
        input.denominator_float,
        input.denominator_is_float,
    );
    let policy = build_policy(input.policy_selector, input.default_value);
    let mode = if input.hardened {
        RuntimeMode::Hardened
    } else {
        RuntimeMode::Strict
    };
    let options = DivideOptions::default()
        .with_mode(mode)
        .with_policy(policy)
        .with_check_finite(input.check_finite);

    let gate_armed = input.check_finite || input.hardened;
    let non_finite = !numerator.is_finite() || !denominator.is_finite();

    let report = divide_with_report(numerator, denominator, &options);
    let scalar = divide(numerator, denominator, &options);

    match (&report, &scalar) {
        (Ok(report), Ok(value)) => {
            if report.value.to_bits() != value.to_bits() {
                panic!("divide and divide_with_report disagree");
            }
            if report.zero_denominator != denominator.is_zero() {
                panic!("zero-denominator flag drifted from the operands");
            }
            if report.zero_denominator {
                match policy.resolve(numerator.as_f64()) {
                    ZeroResolution::Substitute(expected) => {
                        if report.value.to_bits() != expected.to_bits() {
                            panic!("substituted value drifted from the policy");
                        }
                        if report.substituted.map(f64::to_bits) != Some(expected.to_bits()) {
                            panic!("report lost the substitution record");
                        }
                    }
                    ZeroResolution::Raise => panic!("raise policy returned a value on zero"),
                }
            } else if report.substituted.is_some() {
                panic!("substitution recorded without a zero denominator");
            }

            let expect_subnormal = matches!(
                denominator,
                Operand::Float(w) if w != 0.0 && w.abs() < f64::MIN_POSITIVE
            );
            let expect_negative_zero = matches!(
                denominator,
                Operand::Float(w) if w == 0.0 && w.is_sign_negative()
            );
            let saw_subnormal = report
                .warnings
                .iter()
                .any(|w| matches!(w, OperandWarning::SubnormalDenominator { .. }));
            let saw_negative_zero = report
                .warnings
                .iter()
                .any(|w| matches!(w, OperandWarning::NegativeZeroDenominator));
            if saw_subnormal != expect_subnormal || saw_negative_zero != expect_negative_zero {
                panic!("operand warnings drifted from the denominator shape");
            }
        }
        (Err(report_err), Err(scalar_err)) => {
            if report_err != scalar_err {
                panic!("divide and divide_with_report fail differently");
            }
            match report_err {
                DivideError::DivisionByZero {
                    numerator: carried, ..
                } => {
                    if !denominator.is_zero() {
                        panic!("division-by-zero error without a zero denominator");
                    }
                    if !matches!(policy, ZeroDivisionPolicy::Raise) {
                        panic!("substitution policy raised on zero");
                    }
                    if !same_operand(*carried, numerator) {
                        panic!("error dropped the numerator");
                    }
                }
                DivideError::NonFiniteOperand { .. } => {
                    if !gate_armed {
                        panic!("finite gate fired while disarmed");
                    }
                    if !non_finite {
                        panic!("finite gate fired on finite operands");
                    }
                }
                DivideError::IntegerOverflow { .. } => {
                    panic!("true division cannot overflow");
                }
            }
        }
        _ => panic!("divide and divide_with_report split between Ok and Err"),
    }

    if gate_armed && non_finite && !matches!(report, Err(DivideError::NonFiniteOperand { .. })) {
        panic!("armed finite gate let a non-finite operand through");
    }

    // The trace log is process-global; drain it so long runs stay flat.
    let _ = take_division_traces();
});
