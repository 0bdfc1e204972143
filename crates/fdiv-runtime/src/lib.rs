#![forbid(unsafe_code)]

//! FrankenDiv runtime: mode axis, zero-division policy model, and audit
//! infrastructure shared by the division kernels and their test suites.
//!
//! ## Module layout
//!
//! | Module     | Contents                                                    |
//! |------------|-------------------------------------------------------------|
//! | `mode`     | [`RuntimeMode`] enum (Strict / Hardened)                    |
//! | `policy`   | [`ZeroDivisionPolicy`], [`ZeroResolution`] decision model   |
//! | `evidence` | [`ZeroEventLedger`], [`ZeroEventEntry`] audit trail         |
//! | `replay`   | [`DivisionProbe`], [`ProbeSequence`] for replay testing     |
//! | `testlog`  | [`TestLogEntry`] structured JSONL test logging              |

pub mod evidence;
pub mod mode;
pub mod policy;
pub mod replay;
pub mod testlog;

// ── Re-exports: preserve the flat public API ────────────────────────
pub use evidence::{ZeroEventEntry, ZeroEventLedger};
pub use mode::RuntimeMode;
pub use policy::{ZeroDivisionPolicy, ZeroResolution, signed_infinity_for};
pub use replay::{DivisionProbe, ProbeSequence};
pub use testlog::{TestLogEntry, TestLogLevel, TestResult};

use std::time::{SystemTime, UNIX_EPOCH};

/// Millisecond Unix timestamp for evidence and log entries.
#[must_use]
pub fn now_unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as u64)
}

/// Assert two f64 values are close within combined absolute and relative
/// tolerance: `|actual - expected| <= atol + rtol * |expected|`.
///
/// This matches the `assert_allclose` semantics the legacy suite leaned on
/// through `assertAlmostEqual`.
pub fn assert_close(actual: f64, expected: f64, atol: f64, rtol: f64) {
    let tol = atol + rtol * expected.abs();
    assert!(
        (actual - expected).abs() <= tol,
        "assert_close failed: actual={actual} expected={expected} diff={} tol={tol} (atol={atol}, rtol={rtol})",
        (actual - expected).abs()
    );
}

/// Check whether a value is within combined tolerance of expected.
#[must_use]
pub fn within_tolerance(actual: f64, expected: f64, atol: f64, rtol: f64) -> bool {
    let tol = atol + rtol * expected.abs();
    (actual - expected).abs() <= tol
}
