//! Typed payload shapes for module detail responses (`GET /modules/{name}`).
//! Each shape matches what the corresponding platform module reports; the
//! detail resolver deserializes into these before formatting.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vulnerability {
    pub id: String,
    pub name: String,
    pub severity: String,
    #[serde(default)]
    pub affected_systems: Vec<String>,
    #[serde(default)]
    pub remediation: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VulnerabilityDetail {
    #[serde(default)]
    pub risk_score: Option<f64>,
    #[serde(default)]
    pub vulnerabilities: Vec<Vulnerability>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyGap {
    pub policy: String,
    pub status: String,
    #[serde(default)]
    pub recommendation: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PolicyDetail {
    #[serde(default)]
    pub risk_score: Option<f64>,
    #[serde(default)]
    pub policy_gaps: Vec<PolicyGap>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackVector {
    pub vector: String,
    #[serde(default)]
    pub success_rate: String,
    #[serde(default)]
    pub recommendation: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttackDetail {
    #[serde(default)]
    pub successful_attacks: Vec<AttackVector>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameworkAudit {
    pub name: String,
    #[serde(default)]
    pub compliance_score: String,
    #[serde(default)]
    pub gaps: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComplianceDetail {
    #[serde(default)]
    pub frameworks: Vec<FrameworkAudit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatRecord {
    pub name: String,
    #[serde(default)]
    pub target_industry: String,
    #[serde(default)]
    pub likelihood: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThreatDetail {
    #[serde(default)]
    pub active_threats: Vec<ThreatRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncidentDetail {
    #[serde(default)]
    pub average_response_time: Option<String>,
    #[serde(default)]
    pub automation_level: Option<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrainingDetail {
    #[serde(default)]
    pub employee_completion_rate: Option<String>,
    #[serde(default)]
    pub phishing_simulation_success: Option<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_vulnerability_detail_deserialize() {
        let detail: VulnerabilityDetail = serde_json::from_value(json!({
            "risk_score": 35,
            "vulnerabilities": [
                {"id": "CVE-2023-1234", "name": "SQL Injection Vulnerability",
                 "severity": "high", "affected_systems": ["web-server-01"],
                 "remediation": "Update database middleware"}
            ]
        }))
        .unwrap();
        assert_eq!(detail.vulnerabilities.len(), 1);
        assert_eq!(detail.vulnerabilities[0].id, "CVE-2023-1234");
    }

    #[test]
    fn test_policy_detail_empty_gaps() {
        let detail: PolicyDetail =
            serde_json::from_value(json!({"risk_score": 45})).unwrap();
        assert!(detail.policy_gaps.is_empty());
        assert_eq!(detail.risk_score, Some(45.0));
    }

    #[test]
    fn test_incident_detail_partial_metrics() {
        let detail: IncidentDetail = serde_json::from_value(json!({
            "average_response_time": "45 minutes",
            "recommendations": ["Implement SOAR platform"]
        }))
        .unwrap();
        assert_eq!(detail.average_response_time.as_deref(), Some("45 minutes"));
        assert!(detail.automation_level.is_none());
        assert_eq!(detail.recommendations.len(), 1);
    }
}
