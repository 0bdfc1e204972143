#![forbid(unsafe_code)]

//! Operand-pair sequences for replay-based adversarial testing.
//!
//! Provides [`DivisionProbe`] for single evaluations and [`ProbeSequence`]
//! for replaying crafted operand streams through the division engine while
//! verifying invariants at each step.

use serde::{Deserialize, Serialize};

/// One numerator/denominator pair to feed through a division kernel.
///
/// Values are stored as-provided; zero and non-finite screening happens in
/// the kernels, not here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DivisionProbe {
    pub numerator: f64,
    pub denominator: f64,
}

impl DivisionProbe {
    #[must_use]
    pub fn new(numerator: f64, denominator: f64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Returns `true` if both operands are finite (not NaN or Inf).
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.numerator.is_finite() && self.denominator.is_finite()
    }
}

/// Ordered sequence of probes for replay-based testing.
///
/// Adversarial suites replay crafted sequences (NaN injection, subnormal
/// denominators, zero flooding) through the engine and check the ledger
/// and outcomes step by step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeSequence {
    /// Identifier for this sequence (e.g. test case name).
    pub id: String,
    /// Ordered operand pairs to replay.
    pub probes: Vec<DivisionProbe>,
    /// Optional expected outcome labels for each step (for assertion).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_outcomes: Option<Vec<String>>,
}

impl ProbeSequence {
    /// Create a new empty probe sequence with the given identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            probes: Vec::new(),
            expected_outcomes: None,
        }
    }

    /// Append a probe to the sequence.
    pub fn push(&mut self, probe: DivisionProbe) {
        self.probes.push(probe);
    }

    /// Number of probes in the sequence.
    #[must_use]
    pub fn len(&self) -> usize {
        self.probes.len()
    }

    /// Whether the sequence is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// Iterate over probes in order.
    pub fn iter(&self) -> impl Iterator<Item = &DivisionProbe> {
        self.probes.iter()
    }
}
