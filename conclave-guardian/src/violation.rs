//! Constitutional violation records and remediation suggestions.

use serde::{Deserialize, Serialize};

/// Which constitutional principle a violation falls under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationType {
    /// Personal or private data exposed without consent.
    Privacy,
    /// Discrimination, bias, manipulation, or unwanted surveillance.
    HumanRights,
    /// Reliance on a central point of control or failure.
    Decentralization,
    /// Harm to community trust or collaboration.
    Community,
    /// A systemic issue the guardian detected in itself or the runtime.
    System,
}

/// How serious a violation is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    /// Minor, usually auto-remediated.
    Low,
    /// Worth tracking, usually auto-remediated.
    Medium,
    /// Requires attention; contributes to compliance score decay.
    High,
    /// Requires immediate escalation to a human.
    Critical,
}

/// A recorded constitutional violation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Unique ID for this violation.
    pub id: String,
    /// The violation category.
    pub violation_type: ViolationType,
    /// How serious it is.
    pub severity: ViolationSeverity,
    /// The constitutional principle violated, in prose.
    pub principle_violated: String,
    /// Human-readable description.
    pub description: String,
    /// The component that detected or caused the violation.
    pub source_component: String,
    /// The agent responsible, if any.
    pub source_agent: Option<String>,
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
    /// Arbitrary structured detail.
    pub details: serde_json::Value,
    /// Suggested remediation steps, most urgent first.
    pub remediation_suggested: Vec<String>,
    /// Whether an automatic remediation ran.
    pub auto_resolved: bool,
    /// Whether a human has acknowledged this violation.
    pub acknowledged: bool,
}

/// Suggest remediation steps for a violation, in priority order.
pub fn suggest_remediation(violation_type: ViolationType, severity: ViolationSeverity) -> Vec<String> {
    let mut suggestions: Vec<String> = match violation_type {
        ViolationType::Privacy => vec![
            "Review data handling procedures",
            "Implement additional privacy controls",
            "Verify user consent for data processing",
            "Consider data minimization techniques",
            "Review encryption and access controls",
        ],
        ViolationType::HumanRights => vec![
            "Review system bias and fairness",
            "Implement accessibility improvements",
            "Ensure user agency and control",
            "Review decision-making transparency",
            "Provide user recourse mechanisms",
        ],
        ViolationType::Decentralization => vec![
            "Implement decentralized alternatives",
            "Remove single points of failure",
            "Distribute authority and control",
            "Enable peer-to-peer operations",
            "Reduce dependency on central services",
        ],
        ViolationType::Community => vec![
            "Strengthen community engagement",
            "Implement resource sharing mechanisms",
            "Encourage collaborative behaviors",
            "Review community impact of actions",
            "Foster inclusive participation",
        ],
        ViolationType::System => vec![
            "Investigate the reporting subsystem",
            "Re-run a full compliance assessment",
        ],
    }
    .into_iter()
    .map(String::from)
    .collect();

    match severity {
        ViolationSeverity::Critical => {
            suggestions.insert(0, "Escalate to human oversight immediately".into());
            suggestions.insert(0, "IMMEDIATE ACTION REQUIRED — system may need to be halted".into());
        }
        ViolationSeverity::High => {
            suggestions.insert(0, "Consider temporary restrictions until resolved".into());
            suggestions.insert(0, "High priority remediation required".into());
        }
        ViolationSeverity::Medium | ViolationSeverity::Low => {}
    }

    suggestions
}

/// Whether automatic remediation applies to a violation of this
/// type and severity (low/medium violations only).
pub fn is_auto_remediable(violation_type: ViolationType, severity: ViolationSeverity) -> bool {
    matches!(severity, ViolationSeverity::Low | ViolationSeverity::Medium)
        && matches!(
            violation_type,
            ViolationType::Privacy | ViolationType::Community
        )
}
