use serde::{Deserialize, Serialize};

/// Structured root-cause feedback for a single ticket. Transient: held in
/// session state while the analysis view is open, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAnalysis {
    pub suggestion: String,
    pub estimated_risk: String,
    pub preventive_measures: Vec<String>,
    pub category: String,
}

/// Badge-level classification of the free-text risk label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl AiAnalysis {
    /// Classify `estimated_risk` by case-insensitive substring. Anything
    /// that is neither "high" nor "medium" renders as low.
    pub fn risk_level(&self) -> RiskLevel {
        let risk = self.estimated_risk.to_lowercase();
        if risk.contains("high") {
            RiskLevel::High
        } else if risk.contains("medium") {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}
