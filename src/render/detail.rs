use console::style;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::ConsoleError;
use crate::models::detail::{
    AttackDetail, ComplianceDetail, IncidentDetail, PolicyDetail, ThreatDetail, TrainingDetail,
    VulnerabilityDetail,
};
use crate::models::ModuleKind;

/// Presentation structure for one module's detail view.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailPanel {
    pub title: String,
    pub body: PanelBody,
    /// Derived figure shown under the table (e.g. policy compliance).
    pub footer: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelBody {
    Table {
        headers: &'static [&'static str],
        rows: Vec<Vec<String>>,
    },
    /// Key/value metrics for modules that report figures, not records.
    Metrics(Vec<(String, String)>),
    /// Explicit empty state: the module ran and found nothing.
    Empty(String),
    /// Generic fallback: pretty-printed raw payload.
    Raw(String),
}

type Formatter = fn(&Value) -> Result<DetailPanel, ConsoleError>;

/// Formatter lookup table. Adding a module kind is a row here plus its
/// payload shape in `models::detail`, not a new branch in the resolver.
static DETAIL_FORMATTERS: &[(ModuleKind, Formatter)] = &[
    (ModuleKind::VulnerabilityScanner, format_vulnerabilities),
    (ModuleKind::PolicyAnalyzer, format_policy_gaps),
    (ModuleKind::AttackSimulator, format_attacks),
    (ModuleKind::ComplianceAuditor, format_compliance),
    (ModuleKind::ThreatMonitor, format_threats),
    (ModuleKind::IncidentResponse, format_incident),
    (ModuleKind::TrainingPlatform, format_training),
];

/// Resolve a module identifier and raw payload to a presentation panel.
/// Dispatch is purely on the identifier: an unrecognized one always gets
/// the generic fallback, even if the payload happens to match a known
/// module's shape.
pub fn resolve_detail(module: &str, payload: &Value) -> Result<DetailPanel, ConsoleError> {
    let Some(kind) = ModuleKind::parse(module) else {
        return Ok(generic_panel(module, payload));
    };
    match DETAIL_FORMATTERS.iter().find(|(k, _)| *k == kind) {
        Some((_, formatter)) => formatter(payload),
        None => Ok(generic_panel(module, payload)),
    }
}

fn generic_panel(module: &str, payload: &Value) -> DetailPanel {
    let raw = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
    DetailPanel {
        title: format!("{module} (raw)"),
        body: PanelBody::Raw(raw),
        footer: None,
    }
}

fn parse<T: DeserializeOwned>(kind: ModuleKind, payload: &Value) -> Result<T, ConsoleError> {
    serde_json::from_value(payload.clone())
        .map_err(|e| ConsoleError::Malformed(format!("unexpected {kind} detail shape: {e}")))
}

fn format_vulnerabilities(payload: &Value) -> Result<DetailPanel, ConsoleError> {
    let detail: VulnerabilityDetail = parse(ModuleKind::VulnerabilityScanner, payload)?;
    let title = ModuleKind::VulnerabilityScanner.display_name().to_string();
    if detail.vulnerabilities.is_empty() {
        return Ok(DetailPanel {
            title,
            body: PanelBody::Empty("No vulnerabilities found".into()),
            footer: None,
        });
    }
    let rows = detail
        .vulnerabilities
        .iter()
        .map(|v| {
            vec![
                v.id.clone(),
                v.name.clone(),
                v.severity.clone(),
                v.affected_systems.join(", "),
                v.remediation.clone(),
            ]
        })
        .collect();
    Ok(DetailPanel {
        title,
        body: PanelBody::Table {
            headers: &["ID", "Name", "Severity", "Affected", "Remediation"],
            rows,
        },
        footer: None,
    })
}

fn format_policy_gaps(payload: &Value) -> Result<DetailPanel, ConsoleError> {
    let detail: PolicyDetail = parse(ModuleKind::PolicyAnalyzer, payload)?;
    let title = ModuleKind::PolicyAnalyzer.display_name().to_string();
    // Compliance is the inverse of the module's risk score.
    let footer = detail
        .risk_score
        .map(|risk| format!("Compliance: {:.0}%", 100.0 - risk));
    if detail.policy_gaps.is_empty() {
        return Ok(DetailPanel {
            title,
            body: PanelBody::Empty("No policy gaps found".into()),
            footer,
        });
    }
    let rows = detail
        .policy_gaps
        .iter()
        .map(|g| vec![g.policy.clone(), g.status.clone(), g.recommendation.clone()])
        .collect();
    Ok(DetailPanel {
        title,
        body: PanelBody::Table {
            headers: &["Policy", "Status", "Recommendation"],
            rows,
        },
        footer,
    })
}

fn format_attacks(payload: &Value) -> Result<DetailPanel, ConsoleError> {
    let detail: AttackDetail = parse(ModuleKind::AttackSimulator, payload)?;
    let title = ModuleKind::AttackSimulator.display_name().to_string();
    if detail.successful_attacks.is_empty() {
        return Ok(DetailPanel {
            title,
            body: PanelBody::Empty("No successful attack vectors".into()),
            footer: None,
        });
    }
    let rows = detail
        .successful_attacks
        .iter()
        .map(|a| vec![a.vector.clone(), a.success_rate.clone(), a.recommendation.clone()])
        .collect();
    Ok(DetailPanel {
        title,
        body: PanelBody::Table {
            headers: &["Vector", "Success rate", "Recommendation"],
            rows,
        },
        footer: None,
    })
}

fn format_compliance(payload: &Value) -> Result<DetailPanel, ConsoleError> {
    let detail: ComplianceDetail = parse(ModuleKind::ComplianceAuditor, payload)?;
    let title = ModuleKind::ComplianceAuditor.display_name().to_string();
    if detail.frameworks.is_empty() {
        return Ok(DetailPanel {
            title,
            body: PanelBody::Empty("No frameworks audited".into()),
            footer: None,
        });
    }
    let rows = detail
        .frameworks
        .iter()
        .map(|f| vec![f.name.clone(), f.compliance_score.clone(), f.gaps.join("; ")])
        .collect();
    Ok(DetailPanel {
        title,
        body: PanelBody::Table {
            headers: &["Framework", "Compliance", "Gaps"],
            rows,
        },
        footer: None,
    })
}

fn format_threats(payload: &Value) -> Result<DetailPanel, ConsoleError> {
    let detail: ThreatDetail = parse(ModuleKind::ThreatMonitor, payload)?;
    let title = ModuleKind::ThreatMonitor.display_name().to_string();
    if detail.active_threats.is_empty() {
        return Ok(DetailPanel {
            title,
            body: PanelBody::Empty("No active threats".into()),
            footer: None,
        });
    }
    let rows = detail
        .active_threats
        .iter()
        .map(|t| vec![t.name.clone(), t.target_industry.clone(), t.likelihood.clone()])
        .collect();
    Ok(DetailPanel {
        title,
        body: PanelBody::Table {
            headers: &["Threat", "Target industry", "Likelihood"],
            rows,
        },
        footer: None,
    })
}

fn format_incident(payload: &Value) -> Result<DetailPanel, ConsoleError> {
    let detail: IncidentDetail = parse(ModuleKind::IncidentResponse, payload)?;
    let title = ModuleKind::IncidentResponse.display_name().to_string();
    let mut metrics = Vec::new();
    if let Some(v) = detail.average_response_time {
        metrics.push(("Average response time".to_string(), v));
    }
    if let Some(v) = detail.automation_level {
        metrics.push(("Automation level".to_string(), v));
    }
    for rec in detail.recommendations {
        metrics.push(("Recommendation".to_string(), rec));
    }
    if metrics.is_empty() {
        return Ok(DetailPanel {
            title,
            body: PanelBody::Empty("No incident response data reported".into()),
            footer: None,
        });
    }
    Ok(DetailPanel {
        title,
        body: PanelBody::Metrics(metrics),
        footer: None,
    })
}

fn format_training(payload: &Value) -> Result<DetailPanel, ConsoleError> {
    let detail: TrainingDetail = parse(ModuleKind::TrainingPlatform, payload)?;
    let title = ModuleKind::TrainingPlatform.display_name().to_string();
    let mut metrics = Vec::new();
    if let Some(v) = detail.employee_completion_rate {
        metrics.push(("Employee completion rate".to_string(), v));
    }
    if let Some(v) = detail.phishing_simulation_success {
        metrics.push(("Phishing simulation success".to_string(), v));
    }
    for rec in detail.recommendations {
        metrics.push(("Recommendation".to_string(), rec));
    }
    if metrics.is_empty() {
        return Ok(DetailPanel {
            title,
            body: PanelBody::Empty("No training metrics reported".into()),
            footer: None,
        });
    }
    Ok(DetailPanel {
        title,
        body: PanelBody::Metrics(metrics),
        footer: None,
    })
}

/// Format a detail panel as styled terminal output.
pub fn format_panel(panel: &DetailPanel) -> String {
    let mut out = format!("\n{}\n", style(&panel.title).cyan().bold());
    match &panel.body {
        PanelBody::Table { headers, rows } => out.push_str(&format_table(headers, rows)),
        PanelBody::Metrics(entries) => {
            let width = entries.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
            for (key, value) in entries {
                out.push_str(&format!("  {}  {}\n", style(format!("{key:<width$}")).dim(), value));
            }
        }
        PanelBody::Empty(message) => {
            out.push_str(&format!("  {}\n", style(message).green()));
        }
        PanelBody::Raw(raw) => {
            for line in raw.lines() {
                out.push_str(&format!("  {line}\n"));
            }
        }
    }
    if let Some(footer) = &panel.footer {
        out.push_str(&format!("\n  {}\n", style(footer).bold()));
    }
    out
}

fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            }
        }
    }

    let mut out = String::from("  ");
    for (i, header) in headers.iter().enumerate() {
        out.push_str(&format!("{}  ", style(format!("{header:<w$}", w = widths[i])).bold()));
    }
    out.push('\n');
    for row in rows {
        out.push_str("  ");
        for (i, cell) in row.iter().enumerate() {
            let w = widths.get(i).copied().unwrap_or(0);
            out.push_str(&format!("{cell:<w$}  "));
        }
        out.push('\n');
    }
    out
}
