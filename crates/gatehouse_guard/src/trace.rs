//! Decision traces.
//!
//! A trace lists the guards that were actually consulted, in order, and
//! their answers. Guards skipped by short-circuiting do not appear.

use serde::{Deserialize, Serialize};

/// One guard's answer within a chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardOutcome {
    /// Guard name
    pub guard: String,
    /// Whether it passed
    pub allowed: bool,
}

impl GuardOutcome {
    /// Create an outcome
    #[must_use]
    pub fn new(guard: impl Into<String>, allowed: bool) -> Self {
        Self {
            guard: guard.into(),
            allowed,
        }
    }
}

/// Result of evaluating a guard chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Whether the whole chain passed
    pub allowed: bool,
    /// Guards consulted, in evaluation order
    pub evaluated: Vec<GuardOutcome>,
}

impl Decision {
    /// A decision for an empty chain
    #[must_use]
    pub fn vacuous() -> Self {
        Self {
            allowed: true,
            evaluated: Vec::new(),
        }
    }

    /// Record a guard outcome; a denial makes the whole decision a denial
    pub fn record(&mut self, outcome: GuardOutcome) {
        if !outcome.allowed {
            self.allowed = false;
        }
        self.evaluated.push(outcome);
    }

    /// Guard whose denial settled the decision, if denied
    #[must_use]
    pub fn deciding_guard(&self) -> Option<&str> {
        if self.allowed {
            return None;
        }
        self.evaluated
            .iter()
            .find(|o| !o.allowed)
            .map(|o| o.guard.as_str())
    }

    /// Number of guards consulted
    #[must_use]
    pub fn checks(&self) -> usize {
        self.evaluated.len()
    }
}

impl Default for Decision {
    fn default() -> Self {
        Self::vacuous()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vacuous_decision_allows() {
        let decision = Decision::vacuous();
        assert!(decision.allowed);
        assert_eq!(decision.checks(), 0);
        assert!(decision.deciding_guard().is_none());
    }

    #[test]
    fn test_record_denial() {
        let mut decision = Decision::vacuous();
        decision.record(GuardOutcome::new("admin", true));
        decision.record(GuardOutcome::new("company_settings", false));
        assert!(!decision.allowed);
        assert_eq!(decision.deciding_guard(), Some("company_settings"));
        assert_eq!(decision.checks(), 2);
    }

    #[test]
    fn test_decision_serializes() {
        let mut decision = Decision::vacuous();
        decision.record(GuardOutcome::new("owner", true));
        let json = serde_json::to_value(&decision).unwrap();
        assert_eq!(json["evaluated"][0]["guard"], "owner");
        assert_eq!(json["allowed"], true);
    }
}
