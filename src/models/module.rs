use serde::{Deserialize, Serialize};

/// The closed set of assessment modules known to the console. Identifiers
/// outside this set are still displayable through the generic detail
/// fallback; they simply never get a typed formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    VulnerabilityScanner,
    PolicyAnalyzer,
    AttackSimulator,
    ComplianceAuditor,
    ThreatMonitor,
    IncidentResponse,
    TrainingPlatform,
}

impl ModuleKind {
    /// Parse a platform module identifier. Returns `None` for identifiers
    /// the console does not recognize; callers fall back to the generic
    /// rendering path, never to an error.
    pub fn parse(identifier: &str) -> Option<Self> {
        match identifier {
            "vulnerability_scanner" => Some(Self::VulnerabilityScanner),
            "policy_analyzer" => Some(Self::PolicyAnalyzer),
            "attack_simulator" => Some(Self::AttackSimulator),
            "compliance_auditor" => Some(Self::ComplianceAuditor),
            "threat_monitor" => Some(Self::ThreatMonitor),
            "incident_response" => Some(Self::IncidentResponse),
            "training_platform" => Some(Self::TrainingPlatform),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VulnerabilityScanner => "vulnerability_scanner",
            Self::PolicyAnalyzer => "policy_analyzer",
            Self::AttackSimulator => "attack_simulator",
            Self::ComplianceAuditor => "compliance_auditor",
            Self::ThreatMonitor => "threat_monitor",
            Self::IncidentResponse => "incident_response",
            Self::TrainingPlatform => "training_platform",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::VulnerabilityScanner => "Vulnerability Scanner",
            Self::PolicyAnalyzer => "Policy Analyzer",
            Self::AttackSimulator => "Attack Simulator",
            Self::ComplianceAuditor => "Compliance Auditor",
            Self::ThreatMonitor => "Threat Monitor",
            Self::IncidentResponse => "Incident Response",
            Self::TrainingPlatform => "Training Platform",
        }
    }
}

impl std::fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
