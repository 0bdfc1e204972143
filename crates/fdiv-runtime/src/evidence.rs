#![forbid(unsafe_code)]

//! Bounded FIFO evidence ledger auditing zero-denominator events.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::mode::RuntimeMode;
use crate::policy::ZeroDivisionPolicy;

/// Complete record of one zero-denominator event for audit/forensic
/// analysis: which operation hit the zero branch, which policy handled it,
/// and what (if anything) was substituted for the undefined quotient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZeroEventEntry {
    pub mode: RuntimeMode,
    /// Kernel label, e.g. `true_division` or `floor_division`.
    pub operation: String,
    pub policy: ZeroDivisionPolicy,
    pub numerator: f64,
    /// `None` when the policy raised instead of substituting.
    pub substituted: Option<f64>,
    pub reason: String,
}

/// Bounded FIFO buffer recording zero-denominator events.
///
/// Capacity is clamped to at least one entry. When full, the oldest
/// entry is evicted before a new entry is appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZeroEventLedger {
    capacity: usize,
    entries: VecDeque<ZeroEventEntry>,
}

impl ZeroEventLedger {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: VecDeque::new(),
        }
    }

    /// Append an entry, evicting the oldest if at capacity.
    pub fn record(&mut self, entry: ZeroEventEntry) {
        if self.entries.len() == self.capacity {
            let _ = self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recently recorded entry.
    #[must_use]
    pub fn latest(&self) -> Option<&ZeroEventEntry> {
        self.entries.back()
    }

    /// Iterate entries oldest-first.
    pub fn entries(&self) -> impl Iterator<Item = &ZeroEventEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Serialize the ledger to JSONL for the audit trail.
    #[must_use]
    pub fn serialize_jsonl(&self) -> String {
        self.entries
            .iter()
            .filter_map(|e| serde_json::to_string(e).ok())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(numerator: f64) -> ZeroEventEntry {
        ZeroEventEntry {
            mode: RuntimeMode::Strict,
            operation: "true_division".to_owned(),
            policy: ZeroDivisionPolicy::ReturnSignedInfinity,
            numerator,
            substituted: Some(f64::INFINITY),
            reason: String::new(),
        }
    }

    #[test]
    fn ledger_is_bounded_fifo() {
        let mut ledger = ZeroEventLedger::new(2);
        for i in 0..4 {
            ledger.record(entry(f64::from(i)));
        }
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.latest().map(|e| e.numerator), Some(3.0));
    }

    #[test]
    fn zero_capacity_is_clamped_to_one() {
        let mut ledger = ZeroEventLedger::new(0);
        assert_eq!(ledger.capacity(), 1);
        ledger.record(entry(1.0));
        ledger.record(entry(2.0));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn jsonl_has_one_line_per_entry() {
        let mut ledger = ZeroEventLedger::new(8);
        ledger.record(entry(10.0));
        ledger.record(ZeroEventEntry {
            substituted: None,
            policy: ZeroDivisionPolicy::Raise,
            ..entry(-10.0)
        });
        let jsonl = ledger.serialize_jsonl();
        assert_eq!(jsonl.lines().count(), 2);
        let first: serde_json::Value =
            serde_json::from_str(jsonl.lines().next().unwrap()).expect("valid JSON");
        assert_eq!(first["operation"], "true_division");
        assert_eq!(first["numerator"], 10.0);
    }
}
