#![no_main]

use arbitrary::Arbitrary;
use fdiv_core::{
    DivideError, DivideOptions, Operand, divmod, floor_divide, modulo, take_division_traces,
};
use fdiv_runtime::RuntimeMode;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct FloorModInput {
    numerator_int: i64,
    numerator_float: f64,
    denominator_int: i64,
    denominator_float: f64,
    numerator_is_float: bool,
    denominator_is_float: bool,
    hardened: bool,
}

fn build_operand(int_value: i64, float_value: f64, as_float: bool) -> Operand {
    if as_float {
        Operand::Float(float_value)
    } else {
        Operand::Int(int_value)
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

fuzz_target!(|input: FloorModInput| {
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
    let mode = if input.hardened {
        RuntimeMode::Hardened
    } else {
        RuntimeMode::Strict
    };
    let options = DivideOptions::default().with_mode(mode);

    let floor = floor_divide(numerator, denominator, &options);
    let remainder = modulo(numerator, denominator, &options);
    let pair = divmod(numerator, denominator, &options);

    match (&floor, &remainder, &pair) {
        (Ok(quotient), Ok(modulus), Ok((pair_quotient, pair_remainder))) => {
            if !same_operand(*quotient, *pair_quotient) {
                panic!("divmod quotient diverged from floor_divide");
            }
            if !same_operand(*modulus, *pair_remainder) {
                panic!("divmod remainder diverged from modulo");
            }

            if let (Operand::Int(a), Operand::Int(b)) = (numerator, denominator) {
                match (*pair_quotient, *pair_remainder) {
                    (Operand::Int(q), Operand::Int(r)) => {
                        if i128::from(q) * i128::from(b) + i128::from(r) != i128::from(a) {
                            panic!("integer decomposition broke");
                        }
                        if r != 0 && (r < 0) != (b < 0) {
                            panic!("integer remainder sign law broke");
                        }
                        if i128::from(r).abs() >= i128::from(b).abs() {
                            panic!("integer remainder magnitude law broke");
                        }
                    }
                    _ => panic!("integer operands produced a float pair"),
                }
            } else if numerator.is_finite() && denominator.is_finite() {
                match (*pair_quotient, *pair_remainder) {
                    (Operand::Float(q), Operand::Float(r)) => {
                        let vx = numerator.as_f64();
                        let wx = denominator.as_f64();
                        if r != 0.0 && (r < 0.0) != (wx < 0.0) {
                            panic!("float remainder sign law broke");
                        }
                        // the sign fix can round |remainder| up to exactly |wx|
                        if r.abs() > wx.abs() {
                            panic!("float remainder magnitude law broke");
                        }
                        if q.is_finite() {
                            let rebuilt = q * wx + r;
                            if (rebuilt - vx).abs() > wx.abs() + vx.abs() * 1e-9 {
                                panic!("float decomposition drifted");
                            }
                        }
                    }
                    _ => panic!("float-family operands produced an integer pair"),
                }
            }
        }
        (Err(floor_err), Err(modulo_err), Err(pair_err)) => {
            if input.hardened && (!numerator.is_finite() || !denominator.is_finite()) {
                for err in [floor_err, modulo_err, pair_err] {
                    if !matches!(err, DivideError::NonFiniteOperand { .. }) {
                        panic!("hardened gate skipped one of the operations");
                    }
                }
            } else {
                if !denominator.is_zero() {
                    panic!("joint failure without a zero denominator");
                }
                for err in [floor_err, modulo_err, pair_err] {
                    match err {
                        DivideError::DivisionByZero {
                            numerator: carried, ..
                        } => {
                            if !same_operand(*carried, numerator) {
                                panic!("zero-division error dropped the numerator");
                            }
                        }
                        _ => panic!("zero denominator surfaced as the wrong error"),
                    }
                }
            }
        }
        (
            Err(DivideError::IntegerOverflow { .. }),
            Ok(modulus),
            Err(DivideError::IntegerOverflow { .. }),
        ) => {
            // i64::MIN % -1 is 0 even though the matching quotient overflows
            if (numerator, denominator) != (Operand::Int(i64::MIN), Operand::Int(-1)) {
                panic!("overflow split outside i64::MIN / -1");
            }
            if !same_operand(*modulus, Operand::Int(0)) {
                panic!("i64::MIN modulo -1 must be zero");
            }
        }
        _ => panic!("floor_divide, modulo, and divmod split inconsistently"),
    }

    // The trace log is process-global; drain it so long runs stay flat.
    let _ = take_division_traces();
});
