//! Data types produced by the aggregation pipeline.

use serde::Serialize;

use crate::analyzers::grade::{Severity, display_value, severity};
use crate::audit::Stage;

/// Label used when a stage or the plant has no area with data.
pub const NO_LEADER: &str = "N/A";

/// Label used on the report cards when no area has data at all.
pub const NO_DATA: &str = "Sin Datos";

/// Per-stage result over the filtered view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageSummary {
    pub stage: Stage,
    /// Mean of row-level stage scores; `None` when no row has a score.
    pub mean: Option<f64>,
    pub leader: String,
    pub leader_score: f64,
}

impl StageSummary {
    /// Score as plotted: two decimals within its severity band, 0 when
    /// there is no data.
    pub fn display_score(&self) -> f64 {
        self.mean.map(display_value).unwrap_or(0.0)
    }

    pub fn severity(&self) -> Option<Severity> {
        self.mean.map(severity)
    }

    pub fn award(&self) -> String {
        format!("🏆 Candidato: {}", self.leader)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaScore {
    pub area: String,
    pub score: f64,
    pub severity: Severity,
}

impl AreaScore {
    pub fn new(area: impl Into<String>, score: f64) -> Self {
        Self {
            area: area.into(),
            score,
            severity: severity(score),
        }
    }

    pub fn display_score(&self) -> f64 {
        display_value(self.score)
    }
}

/// Areas with data, best first. Equal scores are ordered by area name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AreaRanking {
    pub entries: Vec<AreaScore>,
}

impl AreaRanking {
    pub fn new(mut entries: Vec<AreaScore>) -> Self {
        entries.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.area.cmp(&b.area)));
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn leader(&self) -> Option<&AreaScore> {
        self.entries.first()
    }

    /// Lowest-scoring area; among equals the first by name.
    pub fn critical(&self) -> Option<&AreaScore> {
        let lowest = self.entries.last()?.score;
        self.entries.iter().find(|e| e.score == lowest)
    }

    pub fn top(&self, n: usize) -> &[AreaScore] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// The `n` lowest areas, worst first.
    pub fn bottom(&self, n: usize) -> Vec<&AreaScore> {
        let mut worst: Vec<&AreaScore> = self.entries.iter().collect();
        worst.sort_by(|a, b| a.score.total_cmp(&b.score).then_with(|| a.area.cmp(&b.area)));
        worst.truncate(n);
        worst
    }
}

/// Stage means of one area, in [`Stage::ALL`] order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaProfile {
    pub area: String,
    pub stage_means: Vec<Option<f64>>,
}

impl AreaProfile {
    pub fn display_scores(&self) -> Vec<f64> {
        self.stage_means
            .iter()
            .map(|m| m.map(display_value).unwrap_or(0.0))
            .collect()
    }
}

/// Critical / leader cards of the executive report, computed over the
/// unfiltered dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportCards {
    pub critical_area: String,
    pub critical_score: f64,
    pub critical_severity: Option<Severity>,
    pub leader_area: String,
    pub leader_score: f64,
}

/// Everything the presenter needs for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub audits: usize,
    /// Unweighted mean of the stages that have data; `None` when no stage
    /// has any.
    pub global_score: Option<f64>,
    pub plant_leader: String,
    pub stages: Vec<StageSummary>,
    pub ranking: AreaRanking,
    pub profiles: Vec<AreaProfile>,
    pub cards: ReportCards,
}
