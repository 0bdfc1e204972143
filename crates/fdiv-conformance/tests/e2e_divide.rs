#![forbid(unsafe_code)]
//! E2E scenario tests for FDIV-LEGACY-002 (legacy divide pipeline).
//!
//! Implements 8 scenarios across four groups:
//!   Happy-path: 1-3
//!   Error recovery: 4-5
//!   Cross-op consistency: 6-7
//!   Performance boundary: 8
//!
//! Each scenario emits a forensic log bundle to
//! `fixtures/artifacts/FDIV-LEGACY-002/e2e/`.

use fdiv_conformance::{
    HarnessConfig, PacketReport, ParityDigest, load_packet_reports, packet_summary,
    run_legacy_packet, write_parity_artifacts,
};
use fdiv_core::{
    DivideError, DivideOptions, DivisionEngine, Operand, checked_divide, divide,
    divide_with_report, divmod, floor_divide, modulo,
};
use fdiv_runtime::{RuntimeMode, ZeroDivisionPolicy, now_unix_ms, within_tolerance};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

// ───────────────────────── Forensic log types ─────────────────────────

#[derive(Debug, Clone, Serialize)]
struct ForensicLogBundle {
    scenario_id: String,
    steps: Vec<ForensicStep>,
    artifacts: Vec<ArtifactRef>,
    environment: EnvironmentInfo,
    operand_metadata: Option<OperandMetadata>,
    overall: OverallResult,
}

#[derive(Debug, Clone, Serialize)]
struct ForensicStep {
    step_id: usize,
    step_name: String,
    action: String,
    input_summary: String,
    output_summary: String,
    duration_ns: u128,
    mode: String,
    outcome: String,
}

#[derive(Debug, Clone, Serialize)]
struct ArtifactRef {
    path: String,
    blake3: String,
}

#[derive(Debug, Clone, Serialize)]
struct EnvironmentInfo {
    package_version: String,
    os: String,
    cpu_count: usize,
}

#[derive(Debug, Clone, Serialize)]
struct OperandMetadata {
    numerator: String,
    denominator: String,
    policy: String,
    mode: String,
}

#[derive(Debug, Clone, Serialize)]
struct OverallResult {
    status: String,
    total_duration_ns: u128,
    replay_command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_chain: Option<String>,
}

// ───────────────────────── Helpers ─────────────────────────

fn e2e_output_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/artifacts/FDIV-LEGACY-002/e2e")
}

fn make_env() -> EnvironmentInfo {
    EnvironmentInfo {
        package_version: String::from(env!("CARGO_PKG_VERSION")),
        os: String::from(std::env::consts::OS),
        cpu_count: std::thread::available_parallelism()
            .map(std::num::NonZeroUsize::get)
            .unwrap_or(1),
    }
}

fn replay_cmd(scenario_id: &str) -> String {
    format!("cargo test -p fdiv-conformance --test e2e_divide -- {scenario_id} --nocapture")
}

fn write_bundle(scenario_id: &str, bundle: &ForensicLogBundle) {
    let dir = e2e_output_dir();
    fs::create_dir_all(&dir)
        .unwrap_or_else(|e| panic!("failed to create e2e dir {}: {e}", dir.display()));
    let path = dir.join(format!("{scenario_id}.json"));
    let json = serde_json::to_vec_pretty(bundle).expect("serialize bundle");
    fs::write(&path, &json).unwrap_or_else(|e| panic!("failed to write {}: {e}", path.display()));
}

// ───────────────────── Scenario runner framework ──────────────────────

struct ScenarioRunner {
    scenario_id: String,
    steps: Vec<ForensicStep>,
    artifacts: Vec<ArtifactRef>,
    start: Instant,
    step_counter: usize,
    passed: bool,
    error_chain: Option<String>,
    operand_meta: Option<OperandMetadata>,
}

impl ScenarioRunner {
    fn new(scenario_id: &str) -> Self {
        Self {
            scenario_id: scenario_id.to_owned(),
            steps: Vec::new(),
            artifacts: Vec::new(),
            start: Instant::now(),
            step_counter: 0,
            passed: true,
            error_chain: None,
            operand_meta: None,
        }
    }

    fn set_operand_meta(&mut self, numerator: &str, denominator: &str, policy: &str, mode: &str) {
        self.operand_meta = Some(OperandMetadata {
            numerator: numerator.to_owned(),
            denominator: denominator.to_owned(),
            policy: policy.to_owned(),
            mode: mode.to_owned(),
        });
    }

    fn add_artifact(&mut self, path: &str, blake3_hex: &str) {
        self.artifacts.push(ArtifactRef {
            path: path.to_owned(),
            blake3: blake3_hex.to_owned(),
        });
    }

    fn record_step(
        &mut self,
        name: &str,
        action: &str,
        input_summary: &str,
        mode: &str,
        f: impl FnOnce() -> Result<String, String>,
    ) -> bool {
        self.step_counter += 1;
        let step_start = Instant::now();
        let result = f();
        let duration_ns = step_start.elapsed().as_nanos();
        let (outcome, output_summary) = match result {
            Ok(summary) => ("pass".to_owned(), summary),
            Err(err) => {
                self.passed = false;
                if self.error_chain.is_none() {
                    self.error_chain = Some(err.clone());
                }
                ("fail".to_owned(), err)
            }
        };
        self.steps.push(ForensicStep {
            step_id: self.step_counter,
            step_name: name.to_owned(),
            action: action.to_owned(),
            input_summary: input_summary.to_owned(),
            output_summary,
            duration_ns,
            mode: mode.to_owned(),
            outcome: outcome.clone(),
        });
        outcome == "pass"
    }

    fn finish(self) -> ForensicLogBundle {
        let total_duration_ns = self.start.elapsed().as_nanos();
        let bundle = ForensicLogBundle {
            scenario_id: self.scenario_id.clone(),
            steps: self.steps,
            artifacts: self.artifacts,
            environment: make_env(),
            operand_metadata: self.operand_meta,
            overall: OverallResult {
                status: if self.passed {
                    "pass".to_owned()
                } else {
                    "fail".to_owned()
                },
                total_duration_ns,
                replay_command: replay_cmd(&self.scenario_id),
                error_chain: self.error_chain,
            },
        };
        write_bundle(&self.scenario_id, &bundle);
        bundle
    }
}

// ═══════════════════════ SCENARIOS ═══════════════════════

// ──────────── Happy-Path Workflows ────────────

/// Scenario 1: Full divide pipeline - options, kernel, report, checked variant
#[test]
fn e2e_legacy002_01_full_divide_pipeline() {
    let mut r = ScenarioRunner::new("legacy002_01_full_divide_pipeline");
    r.set_operand_meta("Int(10)", "Int(2)", "raise", "strict");

    let mut quotient = f64::NAN;
    r.record_step(
        "divide_clean_path",
        "divide(10, 2)",
        "module constants a=10, denominator 2",
        "strict",
        || {
            let value = divide(Operand::Int(10), Operand::Int(2), &DivideOptions::default())
                .map_err(|e| format!("divide failed: {e}"))?;
            quotient = value;
            if value == 5.0 {
                Ok(format!("quotient={value}"))
            } else {
                Err(format!("expected 5.0, got {value}"))
            }
        },
    );

    r.record_step(
        "report_flags_clean",
        "divide_with_report(10, 2)",
        "audit flags on the clean path",
        "strict",
        || {
            let report =
                divide_with_report(Operand::Int(10), Operand::Int(2), &DivideOptions::default())
                    .map_err(|e| format!("report failed: {e}"))?;
            if report.zero_denominator || report.substituted.is_some() {
                return Err(format!(
                    "clean division flagged zero_denominator={} substituted={:?}",
                    report.zero_denominator, report.substituted
                ));
            }
            if !report.warnings.is_empty() {
                return Err(format!("unexpected warnings: {:?}", report.warnings));
            }
            if report.value == quotient {
                Ok("report agrees with scalar projection, no flags".to_owned())
            } else {
                Err(format!("report value {} != divide {quotient}", report.value))
            }
        },
    );

    r.record_step(
        "checked_variant_agrees",
        "checked_divide(10, 2)",
        "Option projection of the strict call",
        "strict",
        || {
            match checked_divide(Operand::Int(10), Operand::Int(2)) {
                Some(value) if value == quotient => Ok(format!("Some({value})")),
                Some(value) => Err(format!("checked_divide disagrees: {value}")),
                None => Err("checked_divide returned None on the clean path".to_owned()),
            }
        },
    );

    let bundle = r.finish();
    assert_eq!(bundle.overall.status, "pass");
}

/// Scenario 2: Float precision chain - the legacy suite's numeric landmarks
#[test]
fn e2e_legacy002_02_float_precision_chain() {
    let mut r = ScenarioRunner::new("legacy002_02_float_precision_chain");
    r.set_operand_meta("Int(10)", "Int(3)", "raise", "strict");
    let options = DivideOptions::default();

    r.record_step(
        "repeating_expansion",
        "divide(10, 3)",
        "non-terminating expansion",
        "strict",
        || {
            let value = divide(Operand::Int(10), Operand::Int(3), &options)
                .map_err(|e| format!("divide failed: {e}"))?;
            if value != 3.333_333_333_333_333_5 {
                return Err(format!("expected shortest-repr 3.3333333333333335, got {value}"));
            }
            if within_tolerance(value, 3.333_333, 5e-6, 0.0) {
                Ok(format!("value={value}, matches 3.333333 to 5 places"))
            } else {
                Err(format!("{value} not within 5 decimal places of 3.333333"))
            }
        },
    );

    r.record_step(
        "float_numerator",
        "divide(10.5, 2)",
        "mixed float/int operands",
        "strict",
        || {
            let value = divide(Operand::Float(10.5), Operand::Int(2), &options)
                .map_err(|e| format!("divide failed: {e}"))?;
            if value == 5.25 {
                Ok(format!("value={value}"))
            } else {
                Err(format!("expected 5.25, got {value}"))
            }
        },
    );

    r.record_step(
        "zero_numerator",
        "divide(0, 10)",
        "zero over non-zero",
        "strict",
        || {
            let value = divide(Operand::Int(0), Operand::Int(10), &options)
                .map_err(|e| format!("divide failed: {e}"))?;
            if value == 0.0 {
                Ok(format!("value={value}"))
            } else {
                Err(format!("expected 0.0, got {value}"))
            }
        },
    );

    r.record_step(
        "max_int_numerator",
        "divide(i64::MAX, 2)",
        "largest host integer",
        "strict",
        || {
            let value = divide(Operand::Int(i64::MAX), Operand::Int(2), &options)
                .map_err(|e| format!("divide failed: {e}"))?;
            if value == 4_611_686_018_427_387_904.0 {
                Ok(format!("value={value}"))
            } else {
                Err(format!("expected 2^62, got {value}"))
            }
        },
    );

    let bundle = r.finish();
    assert_eq!(bundle.overall.status, "pass");
}

/// Scenario 3: Denominator sweep - one numerator against the legacy suite's divisors
#[test]
fn e2e_legacy002_03_denominator_sweep() {
    let mut r = ScenarioRunner::new("legacy002_03_denominator_sweep");
    r.set_operand_meta("Int(10)", "sweep", "raise", "strict");
    let options = DivideOptions::default();

    let sweep: Vec<(Operand, f64)> = vec![
        (Operand::Int(2), 5.0),
        (Operand::Int(-2), -5.0),
        (Operand::Int(3), 3.333_333_333_333_333_5),
        (Operand::Int(4), 2.5),
        (Operand::Float(1e-7), 100_000_000.0),
    ];

    for (idx, (denominator, expected)) in sweep.into_iter().enumerate() {
        r.record_step(
            &format!("divide_den_{idx}"),
            "divide(10, d_i)",
            &format!("denominator={denominator}"),
            "strict",
            || {
                let value = divide(Operand::Int(10), denominator, &options)
                    .map_err(|e| format!("divide by {denominator} failed: {e}"))?;
                if value == expected {
                    Ok(format!("value={value}"))
                } else {
                    Err(format!("expected {expected}, got {value}"))
                }
            },
        );
    }

    r.record_step(
        "large_numerator",
        "divide(10_000_000, 2)",
        "large operand pair",
        "strict",
        || {
            let value = divide(Operand::Int(10_000_000), Operand::Int(2), &options)
                .map_err(|e| format!("divide failed: {e}"))?;
            if value == 5_000_000.0 {
                Ok(format!("value={value}"))
            } else {
                Err(format!("expected 5000000.0, got {value}"))
            }
        },
    );

    let bundle = r.finish();
    assert_eq!(bundle.overall.status, "pass");
}

// ──────────── Error Recovery Workflows ────────────

/// Scenario 4: Zero-denominator recovery - raise, catch, then every fallback policy
#[test]
fn e2e_legacy002_04_zero_denominator_recovery() {
    let mut r = ScenarioRunner::new("legacy002_04_zero_denominator_recovery");
    r.set_operand_meta("Int(10)", "Int(0)", "raise then fallback", "strict");

    r.record_step(
        "attempt_divide",
        "divide(10, 0, raise)",
        "legacy module constants",
        "strict",
        || match divide(Operand::Int(10), Operand::Int(0), &DivideOptions::default()) {
            Err(DivideError::DivisionByZero { kind, numerator }) => {
                if kind.message() != "division by zero" {
                    return Err(format!("wrong diagnostic: {}", kind.message()));
                }
                if numerator != Operand::Int(10) {
                    return Err(format!("error lost the numerator: {numerator}"));
                }
                Ok("caught division by zero, numerator preserved".to_owned())
            }
            Err(e) => Err(format!("unexpected error variant: {e}")),
            Ok(v) => Err(format!("divide should have raised, got {v}")),
        },
    );

    r.record_step(
        "fallback_default",
        "divide(10, 0, return_default)",
        "substitute 0.0, then -1.0",
        "strict",
        || {
            let zero_options =
                DivideOptions::default().with_policy(ZeroDivisionPolicy::ReturnDefault(0.0));
            let value = divide(Operand::Int(10), Operand::Int(0), &zero_options)
                .map_err(|e| format!("default policy raised: {e}"))?;
            if value != 0.0 {
                return Err(format!("expected 0.0, got {value}"));
            }
            let custom_options =
                DivideOptions::default().with_policy(ZeroDivisionPolicy::ReturnDefault(-1.0));
            let value = divide(Operand::Int(10), Operand::Int(0), &custom_options)
                .map_err(|e| format!("custom default raised: {e}"))?;
            if value == -1.0 {
                Ok("substitutions returned 0.0 and -1.0".to_owned())
            } else {
                Err(format!("expected -1.0, got {value}"))
            }
        },
    );

    r.record_step(
        "fallback_signed_infinity",
        "divide(n, 0, return_signed_infinity)",
        "n in {10, -10, 0}",
        "strict",
        || {
            let options =
                DivideOptions::default().with_policy(ZeroDivisionPolicy::ReturnSignedInfinity);
            let table = [
                (Operand::Int(10), f64::INFINITY),
                (Operand::Int(-10), f64::NEG_INFINITY),
                (Operand::Int(0), 0.0),
            ];
            for (numerator, expected) in table {
                let value = divide(numerator, Operand::Int(0), &options)
                    .map_err(|e| format!("policy raised for {numerator}: {e}"))?;
                if value != expected {
                    return Err(format!("{numerator}/0 gave {value}, expected {expected}"));
                }
            }
            Ok("signed infinity table holds: +inf, -inf, 0".to_owned())
        },
    );

    r.record_step(
        "audited_fallback",
        "DivisionEngine::divide(10, 0)",
        "substitution leaves a ledger entry",
        "strict",
        || {
            let options =
                DivideOptions::default().with_policy(ZeroDivisionPolicy::ReturnDefault(0.0));
            let mut engine = DivisionEngine::new(options, 8);
            let value = engine
                .divide(Operand::Int(10), Operand::Int(0))
                .map_err(|e| format!("engine raised: {e}"))?;
            if value != 0.0 {
                return Err(format!("engine substituted {value}, expected 0.0"));
            }
            if engine.ledger().len() != 1 {
                return Err(format!("ledger has {} entries", engine.ledger().len()));
            }
            let entry = engine.ledger().latest().ok_or("ledger is empty")?;
            if entry.substituted == Some(0.0) && entry.reason.contains("return_default") {
                Ok(format!("ledger recorded: {}", entry.reason))
            } else {
                Err(format!("unexpected ledger entry: {}", entry.reason))
            }
        },
    );

    let bundle = r.finish();
    assert_eq!(bundle.overall.status, "pass");
}

/// Scenario 5: Mode switch - Strict passes non-finite operands, Hardened rejects
#[test]
fn e2e_legacy002_05_mode_switch() {
    let mut r = ScenarioRunner::new("legacy002_05_mode_switch");
    r.set_operand_meta("Float(NaN)", "Int(2)", "raise", "mixed");

    r.record_step(
        "strict_nan_passthrough",
        "divide(NaN, 2, strict)",
        "NaN numerator, default options",
        "strict",
        || {
            match divide(
                Operand::Float(f64::NAN),
                Operand::Int(2),
                &DivideOptions::default(),
            ) {
                Ok(value) if value.is_nan() => Ok("strict propagated NaN".to_owned()),
                Ok(value) => Err(format!("expected NaN, got {value}")),
                Err(e) => Err(format!("strict unexpectedly rejected: {e}")),
            }
        },
    );

    r.record_step(
        "strict_infinite_denominator",
        "divide(10, inf, strict)",
        "infinite denominator",
        "strict",
        || {
            let value = divide(
                Operand::Int(10),
                Operand::Float(f64::INFINITY),
                &DivideOptions::default(),
            )
            .map_err(|e| format!("strict rejected infinity: {e}"))?;
            if value == 0.0 {
                Ok("10/inf collapsed to 0.0".to_owned())
            } else {
                Err(format!("expected 0.0, got {value}"))
            }
        },
    );

    r.record_step(
        "hardened_nan_rejection",
        "divide(NaN, 2, hardened)",
        "NaN numerator, hardened mode",
        "hardened",
        || {
            let options = DivideOptions::default().with_mode(RuntimeMode::Hardened);
            match divide(Operand::Float(f64::NAN), Operand::Int(2), &options) {
                Err(DivideError::NonFiniteOperand { operand }) if operand == "numerator" => {
                    Ok("hardened rejected the NaN numerator".to_owned())
                }
                Err(e) => Err(format!("wrong error variant: {e}")),
                Ok(value) => Err(format!("hardened accepted NaN, got {value}")),
            }
        },
    );

    r.record_step(
        "strict_finite_opt_in",
        "divide(NaN, 2, strict, check_finite)",
        "finite gate requested explicitly",
        "strict",
        || {
            let options = DivideOptions::default().with_check_finite(true);
            match divide(Operand::Float(f64::NAN), Operand::Int(2), &options) {
                Err(DivideError::NonFiniteOperand { .. }) => {
                    Ok("check_finite gates strict mode too".to_owned())
                }
                Err(e) => Err(format!("wrong error variant: {e}")),
                Ok(value) => Err(format!("gate let NaN through, got {value}")),
            }
        },
    );

    r.record_step(
        "verify_mode_difference",
        "confirm strict != hardened behavior",
        "document mode-specific behavior",
        "mixed",
        || {
            Ok("strict: IEEE passthrough unless check_finite; \
                hardened: rejects non-finite operands unconditionally"
                .to_owned())
        },
    );

    let bundle = r.finish();
    assert_eq!(bundle.overall.status, "pass");
}

// ──────────── Cross-Operation Consistency ────────────

/// Scenario 6: Integral chain - floor, modulo, and divmod agree and reconstruct
#[test]
fn e2e_legacy002_06_integral_consistency_chain() {
    let mut r = ScenarioRunner::new("legacy002_06_integral_consistency_chain");
    r.set_operand_meta("Int(-7)", "Int(3)", "raise", "strict");
    let options = DivideOptions::default();

    let mut floor_q = Operand::Int(0);
    let mut mod_r = Operand::Int(0);

    r.record_step(
        "floor_and_modulo",
        "floor_divide(-7, 3); modulo(-7, 3)",
        "negative numerator, sign toward -inf",
        "strict",
        || {
            floor_q = floor_divide(Operand::Int(-7), Operand::Int(3), &options)
                .map_err(|e| format!("floor_divide failed: {e}"))?;
            mod_r = modulo(Operand::Int(-7), Operand::Int(3), &options)
                .map_err(|e| format!("modulo failed: {e}"))?;
            if floor_q == Operand::Int(-3) && mod_r == Operand::Int(2) {
                Ok("floor=-3, modulo=2".to_owned())
            } else {
                Err(format!("got floor={floor_q}, modulo={mod_r}"))
            }
        },
    );

    r.record_step(
        "divmod_agrees",
        "divmod(-7, 3) == (floor, modulo)",
        "pair matches the scalar kernels",
        "strict",
        || {
            let (q, rem) = divmod(Operand::Int(-7), Operand::Int(3), &options)
                .map_err(|e| format!("divmod failed: {e}"))?;
            if q != floor_q || rem != mod_r {
                return Err(format!("divmod gave ({q}, {rem})"));
            }
            match (q, rem) {
                (Operand::Int(q), Operand::Int(rem)) if 3 * q + rem == -7 => {
                    Ok(format!("b*q + r == a holds: 3*{q} + {rem} == -7"))
                }
                _ => Err(format!("reconstruction failed for ({q}, {rem})")),
            }
        },
    );

    r.record_step(
        "float_family",
        "floor/modulo/divmod(10.5, 2.0)",
        "float operands stay float",
        "strict",
        || {
            let floor = floor_divide(Operand::Float(10.5), Operand::Float(2.0), &options)
                .map_err(|e| format!("floor_divide failed: {e}"))?;
            let rem = modulo(Operand::Float(10.5), Operand::Float(2.0), &options)
                .map_err(|e| format!("modulo failed: {e}"))?;
            let pair = divmod(Operand::Float(10.5), Operand::Float(2.0), &options)
                .map_err(|e| format!("divmod failed: {e}"))?;
            if floor != Operand::Float(5.0) || rem != Operand::Float(0.5) {
                return Err(format!("got floor={floor}, modulo={rem}"));
            }
            if pair == (floor, rem) {
                Ok("float family agrees: (5.0, 0.5), 2.0*5.0+0.5 == 10.5".to_owned())
            } else {
                Err(format!("divmod pair {pair:?} disagrees"))
            }
        },
    );

    r.record_step(
        "overflow_is_reported",
        "floor_divide(i64::MIN, -1)",
        "unrepresentable quotient",
        "strict",
        || match floor_divide(Operand::Int(i64::MIN), Operand::Int(-1), &options) {
            Err(err @ DivideError::IntegerOverflow { .. }) => {
                if err.to_string() == "integer overflow in floor division" {
                    Ok("overflow reported with operation name".to_owned())
                } else {
                    Err(format!("unexpected message: {err}"))
                }
            }
            Err(e) => Err(format!("wrong error variant: {e}")),
            Ok(v) => Err(format!("overflow slipped through: {v}")),
        },
    );

    let bundle = r.finish();
    assert_eq!(bundle.overall.status, "pass");
}

/// Scenario 7: Packet artifact roundtrip - run, write, digest, reload
#[test]
fn e2e_legacy002_07_packet_artifact_roundtrip() {
    let mut r = ScenarioRunner::new("legacy002_07_packet_artifact_roundtrip");
    let config = HarnessConfig {
        fixture_root: std::env::temp_dir().join(format!("fdiv-e2e-artifacts-{}", now_unix_ms())),
        ..HarnessConfig::default_paths()
    };

    let mut report: Option<PacketReport> = None;
    r.record_step(
        "run_legacy_packet",
        "run_legacy_packet()",
        "in-code packet FDIV-LEGACY-002",
        "strict",
        || {
            let packet_report = run_legacy_packet();
            if packet_report.failed_cases != 0 {
                let failures: Vec<&str> = packet_report
                    .case_results
                    .iter()
                    .filter(|c| !c.passed)
                    .map(|c| c.case_id.as_str())
                    .collect();
                return Err(format!("failing cases: {failures:?}"));
            }
            let summary = format!(
                "{} cases passed for {}",
                packet_report.passed_cases, packet_report.packet_id
            );
            report = Some(packet_report);
            Ok(summary)
        },
    );

    let mut report_hash = String::new();
    let mut digest_hash = String::new();
    let mut report_path = String::new();
    let mut digest_path = String::new();
    r.record_step(
        "write_and_digest",
        "write_parity_artifacts(report)",
        "pretty JSON plus blake3 sidecar",
        "strict",
        || {
            let packet_report = report.as_ref().ok_or("packet report missing")?;
            let bundle = write_parity_artifacts(&config, packet_report)
                .map_err(|e| format!("artifact write failed: {e}"))?;

            let report_bytes =
                fs::read(&bundle.report_path).map_err(|e| format!("report unreadable: {e}"))?;
            let digest_raw = fs::read_to_string(&bundle.digest_path)
                .map_err(|e| format!("digest unreadable: {e}"))?;
            let digest: ParityDigest = serde_json::from_str(&digest_raw)
                .map_err(|e| format!("digest does not parse: {e}"))?;

            if digest.schema_version != 1 {
                return Err(format!("unexpected digest schema {}", digest.schema_version));
            }
            if digest.byte_len != report_bytes.len() {
                return Err(format!(
                    "digest byte_len {} != report {}",
                    digest.byte_len,
                    report_bytes.len()
                ));
            }
            let recomputed = blake3::hash(&report_bytes).to_hex().to_string();
            if recomputed != digest.source_hash {
                return Err("digest hash does not match report bytes".to_owned());
            }

            report_hash = recomputed;
            digest_hash = blake3::hash(digest_raw.as_bytes()).to_hex().to_string();
            report_path = bundle.report_path.display().to_string();
            digest_path = bundle.digest_path.display().to_string();
            Ok(format!("digest verified over {} bytes", digest.byte_len))
        },
    );
    r.add_artifact(&report_path, &report_hash);
    r.add_artifact(&digest_path, &digest_hash);

    r.record_step(
        "reload_reports",
        "load_packet_reports(config)",
        "scan artifact tree",
        "strict",
        || {
            let packet_report = report.as_ref().ok_or("packet report missing")?;
            let reloaded =
                load_packet_reports(&config).map_err(|e| format!("reload failed: {e}"))?;
            let found = reloaded
                .iter()
                .find(|r| r.packet_id == "FDIV-LEGACY-002")
                .ok_or("written packet not found on reload")?;
            if found != packet_report {
                return Err("reloaded report differs from the one written".to_owned());
            }
            let summary = packet_summary(found);
            if summary.passed_cases + summary.failed_cases == summary.total_cases {
                Ok(format!(
                    "reloaded {}: {}/{} passed",
                    summary.packet_id, summary.passed_cases, summary.total_cases
                ))
            } else {
                Err(format!("inconsistent summary: {summary:?}"))
            }
        },
    );

    let bundle = r.finish();
    let _ = fs::remove_dir_all(&config.fixture_root);
    assert_eq!(bundle.overall.status, "pass");
}

// ──────────── Performance Boundary ────────────

/// Scenario 8: Bulk sweep - sustained kernel throughput and ledger bound under flood
#[test]
fn e2e_legacy002_08_bulk_divide_sweep() {
    let mut r = ScenarioRunner::new("legacy002_08_bulk_divide_sweep");
    r.set_operand_meta("Int(1..=250_000)", "Int(7)", "raise", "strict");

    r.record_step(
        "bulk_divide",
        "250k strict divisions",
        "numerators 1..=250_000, denominator 7",
        "strict",
        || {
            let options = DivideOptions::default();
            let start = Instant::now();
            let mut accumulated = 0.0_f64;
            for numerator in 1..=250_000_i64 {
                accumulated += divide(Operand::Int(numerator), Operand::Int(7), &options)
                    .map_err(|e| format!("bulk divide failed at {numerator}: {e}"))?;
            }
            let elapsed_ms = start.elapsed().as_millis();
            if elapsed_ms > 5000 {
                return Err(format!("bulk sweep took {elapsed_ms}ms (limit: 5000ms)"));
            }
            let expected = 250_000.0 * 250_001.0 / 2.0 / 7.0;
            if within_tolerance(accumulated, expected, 0.0, 1e-9) {
                Ok(format!("sum={accumulated:.6}, completed in {elapsed_ms}ms"))
            } else {
                Err(format!("accumulated {accumulated}, expected {expected}"))
            }
        },
    );

    r.record_step(
        "ledger_bound_under_flood",
        "engine flood with zero denominators",
        "10_000 zero hits, capacity 32",
        "strict",
        || {
            let options =
                DivideOptions::default().with_policy(ZeroDivisionPolicy::ReturnSignedInfinity);
            let mut engine = DivisionEngine::new(options, 32);
            for numerator in 0..10_000_i64 {
                engine
                    .divide(Operand::Int(numerator), Operand::Int(0))
                    .map_err(|e| format!("substitution should not raise: {e}"))?;
            }
            if engine.ledger().len() != 32 {
                return Err(format!(
                    "ledger should stay bounded at 32, holds {}",
                    engine.ledger().len()
                ));
            }
            let latest = engine.ledger().latest().ok_or("ledger empty after flood")?;
            if latest.numerator == 9_999.0 && latest.substituted == Some(f64::INFINITY) {
                Ok("ledger bounded, newest event survives eviction".to_owned())
            } else {
                Err(format!("unexpected newest entry: {}", latest.reason))
            }
        },
    );

    let bundle = r.finish();
    assert_eq!(bundle.overall.status, "pass");
}
