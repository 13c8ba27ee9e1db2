#![deny(missing_docs)]
//! Constitutional compliance monitoring for the conclave runtime.
//!
//! A [`Guardian`] reviews agent output against deny patterns across the
//! four constitutional principles (privacy, human rights,
//! decentralization, community), keeps a violation ledger with
//! suggested remediation, and tracks weighted compliance scores.
//! [`GuardianHook`] wires that review into the turn's inner loop.

mod guardian;
mod hook;
mod metrics;
mod violation;

pub use guardian::{Guardian, HotSpot, ReviewVerdict};
pub use hook::GuardianHook;
pub use metrics::ComplianceMetrics;
pub use violation::{is_auto_remediable, suggest_remediation, Violation, ViolationSeverity, ViolationType};
