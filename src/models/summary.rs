use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Overall risk severity reported by the platform. The platform derives
/// this from the weighted module scores; the console can also derive it
/// locally via [`RiskLevel::from_score`] when styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Platform thresholds: <20 low, <50 medium, <80 high, else critical.
    pub fn from_score(score: f64) -> Self {
        if score < 20.0 {
            Self::Low
        } else if score < 50.0 {
            Self::Medium
        } else if score < 80.0 {
            Self::High
        } else {
            Self::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-module rollup status shown on the module cards. Unrecognized status
/// strings degrade to `Unknown` rather than failing the whole summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleStatus {
    Ok,
    Warning,
    Critical,
    #[serde(other)]
    Unknown,
}

impl ModuleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Warning => "warning",
            Self::Critical => "critical",
            Self::Unknown => "unknown",
        }
    }
}

/// Recommendation priority, ordered from most to least urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Numeric rank where lower values are more urgent: high = 0,
    /// medium = 1, low = 2.
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// A prioritized remediation item. Server ordering is significant and is
/// preserved through rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub module: String,
    pub priority: Priority,
    pub finding: String,
    pub action: String,
}

/// Rollup result for one module within the summary. Owned by the summary
/// document; has no independent identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleSummary {
    pub status: ModuleStatus,
    #[serde(default)]
    pub risk_score: Option<f64>,
}

/// The whole-dashboard summary fetched from `GET /summary`. Immutable once
/// received; each refresh replaces it wholesale, never patches it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryDocument {
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub module_results: HashMap<String, ModuleSummary>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    /// Opaque payload forwarded unchanged to the threat visualization.
    #[serde(default)]
    pub threat_data: Option<Value>,
}
