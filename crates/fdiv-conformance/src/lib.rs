#![forbid(unsafe_code)]

pub mod legacy;

use blake3::hash;
use fdiv_core::{DivideError, DivideOptions, Operand, divide, divmod, floor_divide, modulo};
use fdiv_runtime::{RuntimeMode, ZeroDivisionPolicy, now_unix_ms, within_tolerance};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub oracle_root: PathBuf,
    pub fixture_root: PathBuf,
    pub strict_mode: bool,
}

impl HarnessConfig {
    #[must_use]
    pub fn default_paths() -> Self {
        let repo_root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..");
        Self {
            oracle_root: repo_root.join("legacy_simple_utils"),
            fixture_root: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures"),
            strict_mode: true,
        }
    }

    #[must_use]
    pub fn artifact_dir_for(&self, packet_id: &str) -> PathBuf {
        self.fixture_root.join("artifacts").join(packet_id)
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self::default_paths()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessReport {
    pub suite: &'static str,
    pub oracle_present: bool,
    pub fixture_count: usize,
    pub strict_mode: bool,
}

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("fixture load failed for {path}: {source}")]
    FixtureIo { path: PathBuf, source: io::Error },
    #[error("fixture parse failed for {path}: {source}")]
    FixtureParse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("artifact write failed for {path}: {source}")]
    ArtifactIo { path: PathBuf, source: io::Error },
    #[error("artifact serialization failed: {0}")]
    ArtifactEncode(String),
    #[error("failed to launch python oracle `{python_bin}`: {source}")]
    PythonLaunch {
        python_bin: String,
        source: io::Error,
    },
    #[error("python oracle script not found at {path}")]
    PythonScriptMissing { path: PathBuf },
    #[error("python oracle `{python_bin}` failed: {stderr}")]
    PythonFailed { python_bin: String, stderr: String },
    #[error("oracle capture parse failed for {path}: {source}")]
    OracleParse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// On-disk operand encoding. Mirrors [`Operand`] so fixture files stay
/// explicit about the int/float split the legacy operators care about.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FixtureOperand {
    Int(i64),
    Float(f64),
}

impl From<FixtureOperand> for Operand {
    fn from(value: FixtureOperand) -> Self {
        match value {
            FixtureOperand::Int(v) => Self::Int(v),
            FixtureOperand::Float(v) => Self::Float(v),
        }
    }
}

/// On-disk zero-division policy encoding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FixtureZeroPolicy {
    Raise,
    ReturnDefault { value: f64 },
    ReturnSignedInfinity,
}

impl Default for FixtureZeroPolicy {
    fn default() -> Self {
        Self::Raise
    }
}

impl From<FixtureZeroPolicy> for ZeroDivisionPolicy {
    fn from(value: FixtureZeroPolicy) -> Self {
        match value {
            FixtureZeroPolicy::Raise => Self::Raise,
            FixtureZeroPolicy::ReturnDefault { value } => Self::ReturnDefault(value),
            FixtureZeroPolicy::ReturnSignedInfinity => Self::ReturnSignedInfinity,
        }
    }
}

/// Expected result of a fixture case. Non-finite floats cannot ride in
/// JSON numbers, so signed infinities get their own variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExpectedOutcome {
    Float { value: f64, atol: f64, rtol: f64 },
    Int { value: i64 },
    IntPair { quotient: i64, remainder: i64 },
    FloatPair {
        quotient: f64,
        remainder: f64,
        atol: f64,
        rtol: f64,
    },
    SignedInfinity { negative: bool },
    Error { error: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum DivideCase {
    TrueDivision {
        case_id: String,
        mode: RuntimeMode,
        numerator: FixtureOperand,
        denominator: FixtureOperand,
        #[serde(default)]
        policy: Option<FixtureZeroPolicy>,
        #[serde(default)]
        check_finite: Option<bool>,
        expected: ExpectedOutcome,
    },
    FloorDivision {
        case_id: String,
        mode: RuntimeMode,
        numerator: FixtureOperand,
        denominator: FixtureOperand,
        #[serde(default)]
        check_finite: Option<bool>,
        expected: ExpectedOutcome,
    },
    Modulo {
        case_id: String,
        mode: RuntimeMode,
        numerator: FixtureOperand,
        denominator: FixtureOperand,
        #[serde(default)]
        check_finite: Option<bool>,
        expected: ExpectedOutcome,
    },
    Divmod {
        case_id: String,
        mode: RuntimeMode,
        numerator: FixtureOperand,
        denominator: FixtureOperand,
        #[serde(default)]
        check_finite: Option<bool>,
        expected: ExpectedOutcome,
    },
}

impl DivideCase {
    #[must_use]
    pub fn case_id(&self) -> &str {
        match self {
            Self::TrueDivision { case_id, .. }
            | Self::FloorDivision { case_id, .. }
            | Self::Modulo { case_id, .. }
            | Self::Divmod { case_id, .. } => case_id,
        }
    }

    #[must_use]
    pub fn expected(&self) -> &ExpectedOutcome {
        match self {
            Self::TrueDivision { expected, .. }
            | Self::FloorDivision { expected, .. }
            | Self::Modulo { expected, .. }
            | Self::Divmod { expected, .. } => expected,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DividePacketFixture {
    pub packet_id: String,
    pub family: String,
    pub cases: Vec<DivideCase>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaseResult {
    pub case_id: String,
    pub passed: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PacketReport {
    pub packet_id: String,
    pub family: String,
    pub case_results: Vec<CaseResult>,
    pub passed_cases: usize,
    pub failed_cases: usize,
    pub generated_unix_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PacketSummary {
    pub packet_id: String,
    pub family: String,
    pub passed_cases: usize,
    pub failed_cases: usize,
    pub total_cases: usize,
}

/// Integrity sidecar for a written parity report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParityDigest {
    pub schema_version: u8,
    pub source_hash: String,
    pub byte_len: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParityArtifactBundle {
    pub report_path: PathBuf,
    pub digest_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OracleCapture {
    pub packet_id: String,
    pub family: String,
    pub generated_unix_ms: u64,
    pub case_outputs: Vec<OracleCaseOutput>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OracleCaseOutput {
    pub case_id: String,
    pub status: String,
    pub result_kind: String,
    pub result: serde_json::Value,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PythonOracleConfig {
    pub python_bin: PathBuf,
    pub script_path: PathBuf,
    pub required: bool,
}

impl Default for PythonOracleConfig {
    fn default() -> Self {
        let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        Self {
            python_bin: PathBuf::from("python3"),
            script_path: manifest.join("python_oracle/divide_oracle.py"),
            required: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ObservedOutcome {
    Value(Operand),
    Pair(Operand, Operand),
}

#[must_use]
pub fn run_smoke(config: &HarnessConfig) -> HarnessReport {
    let fixture_count = fs::read_dir(&config.fixture_root)
        .ok()
        .into_iter()
        .flat_map(|it| it.filter_map(Result::ok))
        .count();

    HarnessReport {
        suite: "smoke",
        oracle_present: config.oracle_root.exists(),
        fixture_count,
        strict_mode: config.strict_mode,
    }
}

pub fn load_packet(
    config: &HarnessConfig,
    fixture_name: &str,
) -> Result<DividePacketFixture, HarnessError> {
    let fixture_path = config.fixture_root.join(fixture_name);
    let raw = fs::read_to_string(&fixture_path).map_err(|source| HarnessError::FixtureIo {
        path: fixture_path.clone(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| HarnessError::FixtureParse {
        path: fixture_path,
        source,
    })
}

pub fn run_divide_packet(
    config: &HarnessConfig,
    fixture_name: &str,
) -> Result<PacketReport, HarnessError> {
    let fixture = load_packet(config, fixture_name)?;
    Ok(run_packet(&fixture))
}

/// Run every case of an in-memory packet against the division kernels.
#[must_use]
pub fn run_packet(fixture: &DividePacketFixture) -> PacketReport {
    let mut case_results = Vec::with_capacity(fixture.cases.len());
    for case in &fixture.cases {
        let observed = execute_divide_case(case);
        let (passed, message) = compare_divide_case(case.expected(), &observed);
        case_results.push(CaseResult {
            case_id: case.case_id().to_owned(),
            passed,
            message,
        });
    }

    build_packet_report(fixture.packet_id.clone(), fixture.family.clone(), case_results)
}

/// Run the packet distilled from the legacy module's own test suite.
#[must_use]
pub fn run_legacy_packet() -> PacketReport {
    run_packet(&legacy::legacy_packet())
}

#[must_use]
pub fn packet_summary(report: &PacketReport) -> PacketSummary {
    PacketSummary {
        packet_id: report.packet_id.clone(),
        family: report.family.clone(),
        passed_cases: report.passed_cases,
        failed_cases: report.failed_cases,
        total_cases: report.case_results.len(),
    }
}

pub fn write_parity_artifacts(
    config: &HarnessConfig,
    report: &PacketReport,
) -> Result<ParityArtifactBundle, HarnessError> {
    let output_dir = config.artifact_dir_for(&report.packet_id);
    fs::create_dir_all(&output_dir).map_err(|source| HarnessError::ArtifactIo {
        path: output_dir.clone(),
        source,
    })?;

    let report_path = output_dir.join("parity_report.json");
    let report_bytes = serde_json::to_vec_pretty(report)
        .map_err(|e| HarnessError::ArtifactEncode(e.to_string()))?;
    fs::write(&report_path, &report_bytes).map_err(|source| HarnessError::ArtifactIo {
        path: report_path.clone(),
        source,
    })?;

    let digest = ParityDigest {
        schema_version: 1,
        source_hash: hash(&report_bytes).to_hex().to_string(),
        byte_len: report_bytes.len(),
    };
    let digest_path = output_dir.join("parity_report.digest.json");
    let digest_bytes = serde_json::to_vec_pretty(&digest)
        .map_err(|e| HarnessError::ArtifactEncode(e.to_string()))?;
    fs::write(&digest_path, digest_bytes).map_err(|source| HarnessError::ArtifactIo {
        path: digest_path.clone(),
        source,
    })?;

    Ok(ParityArtifactBundle {
        report_path,
        digest_path,
    })
}

pub fn load_packet_reports(config: &HarnessConfig) -> Result<Vec<PacketReport>, HarnessError> {
    let artifact_root = config.fixture_root.join("artifacts");
    if !artifact_root.exists() {
        return Ok(Vec::new());
    }

    let mut reports = Vec::new();
    for packet_dir in fs::read_dir(&artifact_root).map_err(|source| HarnessError::ArtifactIo {
        path: artifact_root.clone(),
        source,
    })? {
        let packet_dir = packet_dir
            .map_err(|source| HarnessError::ArtifactIo {
                path: artifact_root.clone(),
                source,
            })?
            .path();
        if !packet_dir.is_dir() {
            continue;
        }
        let report_path = packet_dir.join("parity_report.json");
        if !report_path.exists() {
            continue;
        }
        let raw = fs::read_to_string(&report_path).map_err(|source| HarnessError::ArtifactIo {
            path: report_path.clone(),
            source,
        })?;
        let report: PacketReport =
            serde_json::from_str(&raw).map_err(|source| HarnessError::FixtureParse {
                path: report_path,
                source,
            })?;
        reports.push(report);
    }

    reports.sort_by(|a, b| a.packet_id.cmp(&b.packet_id));
    Ok(reports)
}

/// Run the packet and then attempt a live-interpreter capture. When the
/// capture fails and the oracle is optional, the failure is recorded as
/// an artifact next to the parity report instead of failing the run.
pub fn run_divide_packet_with_oracle_capture(
    config: &HarnessConfig,
    fixture_name: &str,
    oracle: &PythonOracleConfig,
) -> Result<PacketReport, HarnessError> {
    let report = run_divide_packet(config, fixture_name)?;
    let oracle_result = capture_divide_oracle(config, fixture_name, oracle);
    if let Err(err) = oracle_result {
        if oracle.required {
            return Err(err);
        }
        let artifact_dir = config.artifact_dir_for(&report.packet_id);
        fs::create_dir_all(&artifact_dir).map_err(|source| HarnessError::ArtifactIo {
            path: artifact_dir.clone(),
            source,
        })?;
        let failure_path = artifact_dir.join("oracle_capture.error.txt");
        fs::write(&failure_path, format!("{err}")).map_err(|source| HarnessError::ArtifactIo {
            path: failure_path,
            source,
        })?;
    }

    Ok(report)
}

/// Invoke the live interpreter on a fixture and store the normalized
/// capture next to the parity artifacts.
pub fn capture_divide_oracle(
    config: &HarnessConfig,
    fixture_name: &str,
    oracle: &PythonOracleConfig,
) -> Result<PathBuf, HarnessError> {
    let fixture_path = config.fixture_root.join(fixture_name);
    let fixture = load_packet(config, fixture_name)?;

    let output_dir = config.artifact_dir_for(&fixture.packet_id);
    fs::create_dir_all(&output_dir).map_err(|source| HarnessError::ArtifactIo {
        path: output_dir.clone(),
        source,
    })?;
    let output_path = output_dir.join("oracle_capture.json");

    if !oracle.script_path.exists() {
        return Err(HarnessError::PythonScriptMissing {
            path: oracle.script_path.clone(),
        });
    }

    let python_bin = oracle.python_bin.display().to_string();
    let output = Command::new(&oracle.python_bin)
        .arg(&oracle.script_path)
        .arg("--fixture")
        .arg(&fixture_path)
        .arg("--output")
        .arg(&output_path)
        .arg("--oracle-root")
        .arg(&config.oracle_root)
        .output()
        .map_err(|source| HarnessError::PythonLaunch {
            python_bin: python_bin.clone(),
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
        return Err(HarnessError::PythonFailed { python_bin, stderr });
    }

    let parsed = load_oracle_capture(&output_path)?;
    let normalized = serde_json::to_vec_pretty(&parsed)
        .map_err(|e| HarnessError::ArtifactEncode(e.to_string()))?;
    fs::write(&output_path, normalized).map_err(|source| HarnessError::ArtifactIo {
        path: output_path.clone(),
        source,
    })?;

    Ok(output_path)
}

pub fn load_oracle_capture(path: &Path) -> Result<OracleCapture, HarnessError> {
    let raw = fs::read_to_string(path).map_err(|source| HarnessError::FixtureIo {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| HarnessError::OracleParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Check an interpreter capture against the fixture's expected outcomes.
/// Returns one description per mismatch; an empty vector means the live
/// interpreter agrees with every embedded expectation.
#[must_use]
pub fn verify_capture_against_fixture(
    fixture: &DividePacketFixture,
    capture: &OracleCapture,
) -> Vec<String> {
    let mut mismatches = Vec::new();

    for case in &fixture.cases {
        let Some(output) = capture
            .case_outputs
            .iter()
            .find(|output| output.case_id == case.case_id())
        else {
            mismatches.push(format!("case {} missing from capture", case.case_id()));
            continue;
        };

        match case.expected() {
            ExpectedOutcome::Error { error } => {
                if output.status != "error" {
                    mismatches.push(format!(
                        "case {}: expected interpreter error `{error}`, got status {}",
                        case.case_id(),
                        output.status
                    ));
                } else if output.error.as_deref() != Some(error.as_str()) {
                    mismatches.push(format!(
                        "case {}: interpreter error `{}` differs from expected `{error}`",
                        case.case_id(),
                        output.error.as_deref().unwrap_or("<none>")
                    ));
                }
            }
            ExpectedOutcome::Float { value, atol, rtol } => {
                match output.result.as_f64() {
                    Some(got) if within_tolerance(got, *value, *atol, *rtol) => {}
                    _ => mismatches.push(format!(
                        "case {}: interpreter result {:?} differs from expected float {value}",
                        case.case_id(),
                        output.result
                    )),
                }
            }
            ExpectedOutcome::Int { value } => {
                if output.result.as_i64() != Some(*value) {
                    mismatches.push(format!(
                        "case {}: interpreter result {:?} differs from expected int {value}",
                        case.case_id(),
                        output.result
                    ));
                }
            }
            ExpectedOutcome::IntPair {
                quotient,
                remainder,
            } => {
                let pair = output
                    .result
                    .as_array()
                    .and_then(|a| Some((a.first()?.as_i64()?, a.get(1)?.as_i64()?)));
                if pair != Some((*quotient, *remainder)) {
                    mismatches.push(format!(
                        "case {}: interpreter pair {:?} differs from expected ({quotient}, {remainder})",
                        case.case_id(),
                        output.result
                    ));
                }
            }
            ExpectedOutcome::FloatPair {
                quotient,
                remainder,
                atol,
                rtol,
            } => {
                let pair = output
                    .result
                    .as_array()
                    .and_then(|a| Some((a.first()?.as_f64()?, a.get(1)?.as_f64()?)));
                let matches = pair.is_some_and(|(q, r)| {
                    within_tolerance(q, *quotient, *atol, *rtol)
                        && within_tolerance(r, *remainder, *atol, *rtol)
                });
                if !matches {
                    mismatches.push(format!(
                        "case {}: interpreter pair {:?} differs from expected ({quotient}, {remainder})",
                        case.case_id(),
                        output.result
                    ));
                }
            }
            ExpectedOutcome::SignedInfinity { negative } => {
                let expected_repr = if *negative { "-inf" } else { "inf" };
                if output.result.as_str() != Some(expected_repr) {
                    mismatches.push(format!(
                        "case {}: interpreter result {:?} differs from expected {expected_repr}",
                        case.case_id(),
                        output.result
                    ));
                }
            }
        }
    }

    mismatches
}

fn execute_divide_case(case: &DivideCase) -> Result<ObservedOutcome, DivideError> {
    match case {
        DivideCase::TrueDivision {
            mode,
            numerator,
            denominator,
            policy,
            check_finite,
            ..
        } => {
            let options = DivideOptions::default()
                .with_mode(*mode)
                .with_policy(policy.unwrap_or_default().into())
                .with_check_finite(check_finite.unwrap_or(false));
            let value = divide((*numerator).into(), (*denominator).into(), &options)?;
            Ok(ObservedOutcome::Value(Operand::Float(value)))
        }
        DivideCase::FloorDivision {
            mode,
            numerator,
            denominator,
            check_finite,
            ..
        } => {
            let options = DivideOptions::default()
                .with_mode(*mode)
                .with_check_finite(check_finite.unwrap_or(false));
            let value = floor_divide((*numerator).into(), (*denominator).into(), &options)?;
            Ok(ObservedOutcome::Value(value))
        }
        DivideCase::Modulo {
            mode,
            numerator,
            denominator,
            check_finite,
            ..
        } => {
            let options = DivideOptions::default()
                .with_mode(*mode)
                .with_check_finite(check_finite.unwrap_or(false));
            let value = modulo((*numerator).into(), (*denominator).into(), &options)?;
            Ok(ObservedOutcome::Value(value))
        }
        DivideCase::Divmod {
            mode,
            numerator,
            denominator,
            check_finite,
            ..
        } => {
            let options = DivideOptions::default()
                .with_mode(*mode)
                .with_check_finite(check_finite.unwrap_or(false));
            let (quotient, remainder) =
                divmod((*numerator).into(), (*denominator).into(), &options)?;
            Ok(ObservedOutcome::Pair(quotient, remainder))
        }
    }
}

fn compare_divide_case(
    expected: &ExpectedOutcome,
    observed: &Result<ObservedOutcome, DivideError>,
) -> (bool, String) {
    match (expected, observed) {
        (
            ExpectedOutcome::Float { value, atol, rtol },
            Ok(ObservedOutcome::Value(Operand::Float(got))),
        ) => {
            let diff = (got - value).abs();
            let pass = allclose_scalar(*got, *value, *atol, *rtol);
            let msg = if pass {
                format!("float output matched (diff={diff:.2e})")
            } else {
                format!("float mismatch: expected={value}, got={got}, atol={atol}, rtol={rtol}")
            };
            (pass, msg)
        }
        (ExpectedOutcome::Int { value }, Ok(ObservedOutcome::Value(Operand::Int(got)))) => {
            let pass = got == value;
            let msg = if pass {
                "int output matched exactly".to_owned()
            } else {
                format!("int mismatch: expected={value}, got={got}")
            };
            (pass, msg)
        }
        (
            ExpectedOutcome::IntPair {
                quotient,
                remainder,
            },
            Ok(ObservedOutcome::Pair(Operand::Int(q), Operand::Int(r))),
        ) => {
            let pass = q == quotient && r == remainder;
            let msg = if pass {
                "divmod pair matched exactly".to_owned()
            } else {
                format!(
                    "divmod mismatch: expected=({quotient}, {remainder}), got=({q}, {r})"
                )
            };
            (pass, msg)
        }
        (
            ExpectedOutcome::FloatPair {
                quotient,
                remainder,
                atol,
                rtol,
            },
            Ok(ObservedOutcome::Pair(Operand::Float(q), Operand::Float(r))),
        ) => {
            let pass = allclose_scalar(*q, *quotient, *atol, *rtol)
                && allclose_scalar(*r, *remainder, *atol, *rtol);
            let msg = if pass {
                "divmod pair matched within tolerance".to_owned()
            } else {
                format!(
                    "divmod mismatch: expected=({quotient}, {remainder}), got=({q}, {r}), atol={atol}, rtol={rtol}"
                )
            };
            (pass, msg)
        }
        (
            ExpectedOutcome::SignedInfinity { negative },
            Ok(ObservedOutcome::Value(Operand::Float(got))),
        ) => {
            let pass = got.is_infinite() && got.is_sign_negative() == *negative;
            let msg = if pass {
                "signed infinity matched".to_owned()
            } else {
                format!("infinity mismatch: expected negative={negative}, got={got}")
            };
            (pass, msg)
        }
        (ExpectedOutcome::Error { error }, Err(actual)) => {
            let pass = error == &actual.to_string();
            let msg = if pass {
                "error matched expected contract".to_owned()
            } else {
                format!("error mismatch: expected `{error}`, got `{actual}`")
            };
            (pass, msg)
        }
        (expected, result) => (
            false,
            format!("shape mismatch: expected {expected:?}, got {result:?}"),
        ),
    }
}

fn allclose_scalar(actual: f64, expected: f64, atol: f64, rtol: f64) -> bool {
    if actual.is_nan() && expected.is_nan() {
        return true;
    }
    (actual - expected).abs() <= atol + rtol * expected.abs()
}

fn build_packet_report(
    packet_id: String,
    family: String,
    case_results: Vec<CaseResult>,
) -> PacketReport {
    let passed_cases = case_results.iter().filter(|r| r.passed).count();
    let failed_cases = case_results.len().saturating_sub(passed_cases);
    PacketReport {
        packet_id,
        family,
        case_results,
        passed_cases,
        failed_cases,
        generated_unix_ms: now_unix_ms(),
    }
}
