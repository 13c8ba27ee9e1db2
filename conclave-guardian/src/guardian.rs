//! The constitutional guardian: pattern review, violation ledger, and
//! compliance scoring.

use crate::metrics::ComplianceMetrics;
use crate::violation::{suggest_remediation, Violation, ViolationSeverity, ViolationType};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

const PRIVACY_PATTERNS: &[&str] = &[
    "personal information",
    "private data",
    "confidential",
    "social security",
    "credit card",
    "password",
    "api key",
    "email address",
    "phone number",
    "home address",
];

const HUMAN_RIGHTS_PATTERNS: &[&str] = &[
    "discrimination",
    "bias",
    "unfair treatment",
    "exclusion",
    "manipulation",
    "coercion",
    "surveillance",
    "tracking",
];

const DECENTRALIZATION_PATTERNS: &[&str] = &[
    "central server",
    "single point",
    "central authority",
    "centralized control",
    "master control",
    "central database",
];

const COMMUNITY_PATTERNS: &[&str] = &[
    "resource hoarding",
    "monopolization",
    "exclusivity",
    "community harm",
    "anti-social",
    "selfish behavior",
];

/// Outcome of reviewing a piece of agent output for compliance.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewVerdict {
    /// Whether the content passed review.
    pub compliant: bool,
    /// The violation recorded, if any.
    pub violation_id: Option<String>,
    /// Human-readable reason, if non-compliant.
    pub reason: Option<String>,
}

/// A hot spot the guardian flagged during pattern analysis.
#[derive(Debug, Clone, PartialEq)]
pub enum HotSpot {
    /// Overall compliance score has dropped below 0.8.
    LowComplianceScore(f64),
    /// More than 10 violations were reported in the last hour.
    HighViolationRate(usize),
    /// A single component produced 5 or more violations in the last hour.
    UnreliableComponent { component: String, count: usize },
}

const RECENT_WINDOW_MS: u64 = 3_600_000;

/// Independent monitor for constitutional compliance: reviews agent
/// output against deny patterns, maintains a violation ledger, and
/// tracks weighted compliance scores per principle.
pub struct Guardian {
    violations: HashMap<String, Violation>,
    violation_counter: u64,
    metrics: ComplianceMetrics,
}

impl Guardian {
    /// Create a new guardian with a clean ledger and perfect scores.
    pub fn new() -> Self {
        Self {
            violations: HashMap::new(),
            violation_counter: 0,
            metrics: ComplianceMetrics::default(),
        }
    }

    /// Review a piece of agent output against all four deny-pattern
    /// categories. Reports and returns the first violation found;
    /// checks privacy, then human rights, then decentralization, then
    /// community, matching principle priority.
    pub fn review_output(&mut self, source_agent: Option<&str>, content: &str) -> ReviewVerdict {
        let lower = content.to_lowercase();

        let checks: &[(&[&str], ViolationType, &str)] = &[
            (PRIVACY_PATTERNS, ViolationType::Privacy, "Privacy First"),
            (
                HUMAN_RIGHTS_PATTERNS,
                ViolationType::HumanRights,
                "Human Rights",
            ),
            (
                DECENTRALIZATION_PATTERNS,
                ViolationType::Decentralization,
                "Decentralization",
            ),
            (COMMUNITY_PATTERNS, ViolationType::Community, "Community Focus"),
        ];

        for (patterns, violation_type, principle) in checks {
            if let Some(pattern) = patterns.iter().find(|p| lower.contains(**p)) {
                let snippet: String = content.chars().take(200).collect();
                let violation_id = self.report_violation(
                    *violation_type,
                    ViolationSeverity::High,
                    principle,
                    &format!("Agent output contained potential violation pattern: '{pattern}'"),
                    "agent_output_review",
                    source_agent,
                    serde_json::json!({ "content_snippet": snippet }),
                );
                return ReviewVerdict {
                    compliant: false,
                    violation_id: Some(violation_id),
                    reason: Some(format!("{principle} violation")),
                };
            }
        }

        ReviewVerdict {
            compliant: true,
            violation_id: None,
            reason: None,
        }
    }

    /// Record a violation, update scores, and return its ID.
    #[allow(clippy::too_many_arguments)]
    pub fn report_violation(
        &mut self,
        violation_type: ViolationType,
        severity: ViolationSeverity,
        principle_violated: &str,
        description: &str,
        source_component: &str,
        source_agent: Option<&str>,
        details: serde_json::Value,
    ) -> String {
        self.violation_counter += 1;
        let id = format!(
            "violation_{:06}_{}",
            self.violation_counter,
            &Uuid::new_v4().simple().to_string()[..8]
        );

        let remediation = suggest_remediation(violation_type, severity);
        let violation = Violation {
            id: id.clone(),
            violation_type,
            severity,
            principle_violated: principle_violated.to_string(),
            description: description.to_string(),
            source_component: source_component.to_string(),
            source_agent: source_agent.map(String::from),
            timestamp_ms: now_ms(),
            details,
            remediation_suggested: remediation,
            auto_resolved: false,
            acknowledged: false,
        };

        if severity == ViolationSeverity::Critical {
            tracing::error!(violation = %id, description = %violation.description, "critical constitutional violation");
        } else {
            tracing::warn!(violation = %id, ?violation_type, ?severity, "constitutional violation reported");
        }

        self.metrics.record(violation_type, severity);
        self.metrics.recompute(violation.timestamp_ms);
        self.violations.insert(id.clone(), violation);

        id
    }

    /// Mark a violation as acknowledged by a human reviewer.
    pub fn acknowledge_violation(&mut self, violation_id: &str) -> bool {
        if let Some(violation) = self.violations.get_mut(violation_id) {
            violation.acknowledged = true;
            true
        } else {
            false
        }
    }

    /// Look up a violation by ID.
    pub fn get_violation(&self, violation_id: &str) -> Option<&Violation> {
        self.violations.get(violation_id)
    }

    /// Violations reported within the last hour.
    pub fn recent_violations(&self) -> Vec<&Violation> {
        let cutoff = now_ms().saturating_sub(RECENT_WINDOW_MS);
        self.violations
            .values()
            .filter(|v| v.timestamp_ms >= cutoff)
            .collect()
    }

    /// All violations of a given category.
    pub fn violations_by_type(&self, violation_type: ViolationType) -> Vec<&Violation> {
        self.violations
            .values()
            .filter(|v| v.violation_type == violation_type)
            .collect()
    }

    /// Current compliance metrics.
    pub fn metrics(&self) -> &ComplianceMetrics {
        &self.metrics
    }

    /// Analyze recent violations for systemic issues: an overall
    /// compliance dip, a burst of violations, or one component
    /// repeatedly at fault.
    pub fn detect_hot_spots(&self) -> Vec<HotSpot> {
        let mut hot_spots = Vec::new();

        if self.metrics.compliance_score < 0.8 {
            hot_spots.push(HotSpot::LowComplianceScore(self.metrics.compliance_score));
        }

        let recent = self.recent_violations();
        if recent.len() > 10 {
            hot_spots.push(HotSpot::HighViolationRate(recent.len()));
        }

        let mut by_component: HashMap<&str, usize> = HashMap::new();
        for violation in &recent {
            *by_component.entry(violation.source_component.as_str()).or_insert(0) += 1;
        }
        for (component, count) in by_component {
            if count >= 5 {
                hot_spots.push(HotSpot::UnreliableComponent {
                    component: component.to_string(),
                    count,
                });
            }
        }

        hot_spots
    }
}

impl Default for Guardian {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compliant_output_passes() {
        let mut guardian = Guardian::new();
        let verdict = guardian.review_output(None, "This is a perfectly safe message.");
        assert!(verdict.compliant);
    }

    #[test]
    fn privacy_pattern_flags_violation() {
        let mut guardian = Guardian::new();
        let verdict = guardian.review_output(
            Some("agent_worker_001"),
            "Here is your personal information as requested.",
        );
        assert!(!verdict.compliant);
        assert!(verdict.violation_id.is_some());
        assert_eq!(guardian.metrics().total_violations, 1);
    }

    #[test]
    fn privacy_checked_before_human_rights() {
        let mut guardian = Guardian::new();
        let verdict = guardian.review_output(None, "password and also some discrimination here");
        let violation = guardian.get_violation(verdict.violation_id.as_ref().unwrap()).unwrap();
        assert_eq!(violation.violation_type, ViolationType::Privacy);
    }

    #[test]
    fn acknowledge_unknown_violation_returns_false() {
        let mut guardian = Guardian::new();
        assert!(!guardian.acknowledge_violation("nope"));
    }

    #[test]
    fn hot_spot_detection_flags_low_compliance() {
        let mut guardian = Guardian::new();
        for _ in 0..5 {
            guardian.report_violation(
                ViolationType::HumanRights,
                ViolationSeverity::High,
                "Human Rights",
                "test",
                "test_component",
                None,
                serde_json::json!({}),
            );
        }
        let hot_spots = guardian.detect_hot_spots();
        assert!(hot_spots
            .iter()
            .any(|h| matches!(h, HotSpot::LowComplianceScore(_))));
    }

    #[test]
    fn hot_spot_detection_flags_unreliable_component() {
        let mut guardian = Guardian::new();
        for _ in 0..5 {
            guardian.report_violation(
                ViolationType::Community,
                ViolationSeverity::Low,
                "Community Focus",
                "test",
                "flaky_tool",
                None,
                serde_json::json!({}),
            );
        }
        let hot_spots = guardian.detect_hot_spots();
        assert!(hot_spots.iter().any(
            |h| matches!(h, HotSpot::UnreliableComponent { component, count } if component == "flaky_tool" && *count == 5)
        ));
    }
}
