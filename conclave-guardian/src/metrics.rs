//! Constitutional compliance scoring.

use crate::violation::{ViolationSeverity, ViolationType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Aggregate compliance metrics, recomputed after every reported
/// violation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceMetrics {
    /// Total violations ever reported.
    pub total_violations: u32,
    /// Count per violation category.
    pub violations_by_type: HashMap<ViolationType, u32>,
    /// Count per severity.
    pub violations_by_severity: HashMap<ViolationSeverity, u32>,
    /// Overall weighted compliance score in `[0.0, 1.0]`.
    pub compliance_score: f64,
    /// Per-principle scores.
    pub privacy_score: f64,
    /// Per-principle scores.
    pub human_rights_score: f64,
    /// Per-principle scores.
    pub decentralization_score: f64,
    /// Per-principle scores.
    pub community_score: f64,
    /// Milliseconds since the Unix epoch of the last recompute.
    pub last_assessment_ms: u64,
}

impl Default for ComplianceMetrics {
    fn default() -> Self {
        Self {
            total_violations: 0,
            violations_by_type: HashMap::new(),
            violations_by_severity: HashMap::new(),
            compliance_score: 1.0,
            privacy_score: 1.0,
            human_rights_score: 1.0,
            decentralization_score: 1.0,
            community_score: 1.0,
            last_assessment_ms: 0,
        }
    }
}

impl ComplianceMetrics {
    /// Record one more violation of the given type/severity.
    pub fn record(&mut self, violation_type: ViolationType, severity: ViolationSeverity) {
        self.total_violations += 1;
        *self.violations_by_type.entry(violation_type).or_insert(0) += 1;
        *self.violations_by_severity.entry(severity).or_insert(0) += 1;
    }

    /// Recompute every score from the current violation counts.
    ///
    /// Per-principle decay: privacy 0.1/violation, human_rights
    /// 0.15/violation, decentralization 0.1/violation, community
    /// 0.05/violation. Overall score is a 0.3/0.3/0.2/0.2 weighted sum
    /// of the four, with an additional severity penalty of
    /// `0.3 * critical + 0.1 * high`, clamped to `[0.0, 1.0]`.
    pub fn recompute(&mut self, now_ms: u64) {
        let count = |t: ViolationType| *self.violations_by_type.get(&t).unwrap_or(&0) as f64;

        self.privacy_score = (1.0 - count(ViolationType::Privacy) * 0.1).max(0.0);
        self.human_rights_score = (1.0 - count(ViolationType::HumanRights) * 0.15).max(0.0);
        self.decentralization_score = (1.0 - count(ViolationType::Decentralization) * 0.1).max(0.0);
        self.community_score = (1.0 - count(ViolationType::Community) * 0.05).max(0.0);

        let weighted = self.privacy_score * 0.3
            + self.human_rights_score * 0.3
            + self.decentralization_score * 0.2
            + self.community_score * 0.2;

        let critical = *self
            .violations_by_severity
            .get(&ViolationSeverity::Critical)
            .unwrap_or(&0) as f64;
        let high = *self
            .violations_by_severity
            .get(&ViolationSeverity::High)
            .unwrap_or(&0) as f64;
        let severity_penalty = critical * 0.3 + high * 0.1;

        self.compliance_score = (weighted - severity_penalty).clamp(0.0, 1.0);
        self.last_assessment_ms = now_ms;
    }
}
