//! Presentation of dashboard results.
//!
//! Supports log output of the metrics, JSON serialization, and the HTML
//! executive report written to disk.

pub mod charts;
pub mod report;

pub use charts::RadarMode;
pub use report::{ReportOptions, render_report};

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

use crate::analyzers::types::DashboardSummary;

/// Logs the summary using Rust's debug pretty-print format.
pub fn print_pretty(summary: &DashboardSummary) {
    debug!("{:#?}", summary);
}

/// Prints the summary as pretty JSON on stdout.
pub fn print_json(summary: &DashboardSummary) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

/// Emits the dashboard metrics, stage table and area ranking as log events.
pub fn log_summary(summary: &DashboardSummary) {
    let global = summary
        .global_score
        .map(|g| format!("{g:.2}"))
        .unwrap_or_else(|| "sin datos".to_string());

    info!(
        audits = summary.audits,
        global_score = %global,
        plant_leader = %summary.plant_leader,
        "Dashboard metrics"
    );

    for stage in &summary.stages {
        info!(
            stage = %stage.stage,
            score = stage.display_score(),
            has_data = stage.mean.is_some(),
            leader = %stage.leader,
            leader_score = stage.leader_score,
            "Stage"
        );
    }

    for (pos, entry) in summary.ranking.top(5).iter().enumerate() {
        info!(
            rank = pos + 1,
            area = %entry.area,
            score = %format!("{:.2}", entry.score),
            severity = entry.severity.label(),
            "Top area"
        );
    }
    for (pos, entry) in summary.ranking.bottom(5).iter().enumerate() {
        info!(
            rank = pos + 1,
            area = %entry.area,
            score = %format!("{:.2}", entry.score),
            severity = entry.severity.label(),
            "Bottom area"
        );
    }

    info!(
        critical_area = %summary.cards.critical_area,
        critical_score = summary.cards.critical_score,
        leader_area = %summary.cards.leader_area,
        "Report cards"
    );
}

/// Writes the rendered report, creating parent directories as needed.
pub fn write_report(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, html).with_context(|| format!("failed to write {}", path.display()))?;
    debug!(path = %path.display(), bytes = html.len(), "Report written");
    Ok(())
}
