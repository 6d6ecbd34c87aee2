use console::style;
use serde_json::Value;

use crate::models::summary::ModuleSummary;
use crate::models::{ModuleKind, ModuleStatus, Recommendation, RiskLevel, SummaryDocument};

/// Panel-level state derived from a summary document. Built whole and
/// swapped whole: a session never mixes panels from two documents.
#[derive(Debug, Clone)]
pub struct SummaryPanels {
    pub risk: RiskPanel,
    pub module_cards: Vec<ModuleCard>,
    pub recommendations: RecommendationPanel,
    /// Opaque handoff for the threat visualization collaborator.
    pub threat_data: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct RiskPanel {
    pub score: f64,
    pub level: RiskLevel,
}

/// One card per module, carrying the drill-down key.
#[derive(Debug, Clone)]
pub struct ModuleCard {
    pub module: String,
    pub kind: Option<ModuleKind>,
    pub status: ModuleStatus,
    pub risk_score: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct RecommendationPanel {
    /// First `max_inline` recommendations, server order preserved.
    pub inline: Vec<Recommendation>,
    /// How many more exist behind the view-more affordance.
    pub hidden: usize,
}

/// Pure transformation from a summary document to panel state. Cards are
/// sorted by module identifier so redraws are stable across refreshes.
pub fn render_summary(doc: &SummaryDocument, max_inline: usize) -> SummaryPanels {
    let mut cards: Vec<ModuleCard> = doc
        .module_results
        .iter()
        .map(|(name, summary): (&String, &ModuleSummary)| ModuleCard {
            module: name.clone(),
            kind: ModuleKind::parse(name),
            status: summary.status,
            risk_score: summary.risk_score,
        })
        .collect();
    cards.sort_by(|a, b| a.module.cmp(&b.module));

    SummaryPanels {
        risk: RiskPanel {
            score: doc.risk_score,
            level: doc.risk_level,
        },
        module_cards: cards,
        recommendations: RecommendationPanel {
            inline: doc.recommendations.iter().take(max_inline).cloned().collect(),
            hidden: doc.recommendations.len().saturating_sub(max_inline),
        },
        threat_data: doc.threat_data.clone(),
    }
}

/// Format the panels as styled terminal output.
pub fn format_panels(panels: &SummaryPanels, organization: &str) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "\n{} {}\n",
        style("Security posture:").bold(),
        style(organization).cyan().bold(),
    ));
    out.push_str(&format!(
        "  Risk score {} ({})\n",
        style(format!("{:.1}", panels.risk.score)).bold(),
        style_risk(panels.risk.level),
    ));

    if !panels.module_cards.is_empty() {
        out.push_str(&format!("\n{}\n", style("Modules").bold()));
        for card in &panels.module_cards {
            let name = card
                .kind
                .map(|k| k.display_name().to_string())
                .unwrap_or_else(|| card.module.clone());
            let score = card
                .risk_score
                .map(|s| format!(" | risk {s:.0}"))
                .unwrap_or_default();
            out.push_str(&format!(
                "  {} {}{}  {}\n",
                status_glyph(card.status),
                name,
                style(score).dim(),
                style(format!("({})", card.module)).dim(),
            ));
        }
    }

    if !panels.recommendations.inline.is_empty() {
        out.push_str(&format!("\n{}\n", style("Top recommendations").bold()));
        for (i, rec) in panels.recommendations.inline.iter().enumerate() {
            out.push_str(&format!(
                "  {}. [{}] {}: {}\n",
                i + 1,
                style_priority(rec),
                rec.finding,
                style(&rec.action).dim(),
            ));
        }
        if panels.recommendations.hidden > 0 {
            out.push_str(&format!(
                "  {}\n",
                style(format!(
                    "… and {} more (rerun with --all to see everything)",
                    panels.recommendations.hidden
                ))
                .dim(),
            ));
        }
    }

    if panels.threat_data.is_some() {
        out.push_str(&format!(
            "\n  {}\n",
            style("Threat overview data forwarded to the threat view").dim(),
        ));
    }

    out
}

fn style_risk(level: RiskLevel) -> String {
    match level {
        RiskLevel::Low => style(level.as_str()).green().to_string(),
        RiskLevel::Medium => style(level.as_str()).yellow().to_string(),
        RiskLevel::High => style(level.as_str()).red().to_string(),
        RiskLevel::Critical => style(level.as_str()).red().bold().to_string(),
    }
}

fn status_glyph(status: ModuleStatus) -> String {
    match status {
        ModuleStatus::Ok => style("✓").green().to_string(),
        ModuleStatus::Warning => style("!").yellow().to_string(),
        ModuleStatus::Critical => style("✗").red().to_string(),
        ModuleStatus::Unknown => style("?").dim().to_string(),
    }
}

fn style_priority(rec: &Recommendation) -> String {
    match rec.priority.rank() {
        0 => style(rec.priority.as_str()).red().to_string(),
        1 => style(rec.priority.as_str()).yellow().to_string(),
        _ => style(rec.priority.as_str()).dim().to_string(),
    }
}
