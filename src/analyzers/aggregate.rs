use crate::analyzers::types::{
    AreaProfile, AreaRanking, AreaScore, DashboardSummary, NO_DATA, NO_LEADER, ReportCards,
    StageSummary,
};
use crate::analyzers::grade::display_value;
use crate::analyzers::utility::{mean, mean_present};
use crate::audit::Stage;
use crate::score::ScoredTable;
use std::collections::BTreeMap;

/// Indices of the checklist columns of `stage` in a scored table.
pub fn stage_columns(table: &ScoredTable, stage: Stage) -> Vec<usize> {
    table
        .items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.stage == stage)
        .map(|(i, _)| i)
        .collect()
}

/// Mean over rows of each row's mean across `columns`. Rows with no score
/// in those columns are skipped.
pub fn row_mean(table: &ScoredTable, columns: &[usize]) -> Option<f64> {
    mean_present(
        table
            .records
            .iter()
            .map(|r| mean_present(columns.iter().map(|&c| r.scores.get(c).copied().flatten()))),
    )
}

/// Per-area mean of `columns`: the mean of each column within the area,
/// then the mean of those column means. Rows without an area are ignored.
pub fn area_means(table: &ScoredTable, columns: &[usize]) -> BTreeMap<String, Option<f64>> {
    let mut by_area: BTreeMap<&str, Vec<Vec<f64>>> = BTreeMap::new();

    for row in &table.records {
        if row.record.area.is_empty() {
            continue;
        }
        let series = by_area
            .entry(row.record.area.as_str())
            .or_insert_with(|| vec![Vec::new(); columns.len()]);

        for (slot, &c) in columns.iter().enumerate() {
            if let Some(v) = row.scores.get(c).copied().flatten() {
                series[slot].push(v);
            }
        }
    }

    by_area
        .into_iter()
        .map(|(area, series)| {
            let column_means = series
                .iter()
                .map(|s| (!s.is_empty()).then(|| mean(s)));
            (area.to_string(), mean_present(column_means))
        })
        .collect()
}

/// Ranks the areas that have at least one score in `columns`.
pub fn area_ranking(table: &ScoredTable, columns: &[usize]) -> AreaRanking {
    AreaRanking::new(
        area_means(table, columns)
            .into_iter()
            .filter_map(|(area, score)| score.map(|s| AreaScore::new(area, s)))
            .collect(),
    )
}

pub fn stage_summary(table: &ScoredTable, stage: Stage) -> StageSummary {
    let columns = stage_columns(table, stage);
    let ranking = area_ranking(table, &columns);

    let (leader, leader_score) = match ranking.leader() {
        Some(best) if best.score > 0.0 => (best.area.clone(), display_value(best.score)),
        _ => (NO_LEADER.to_string(), 0.0),
    };

    StageSummary {
        stage,
        mean: row_mean(table, &columns),
        leader,
        leader_score,
    }
}

pub fn stage_summaries(table: &ScoredTable) -> Vec<StageSummary> {
    Stage::ALL
        .into_iter()
        .map(|stage| stage_summary(table, stage))
        .collect()
}

/// Stage means for every area of the table, areas in name order.
pub fn area_profiles(table: &ScoredTable) -> Vec<AreaProfile> {
    let per_stage: Vec<BTreeMap<String, Option<f64>>> = Stage::ALL
        .into_iter()
        .map(|stage| area_means(table, &stage_columns(table, stage)))
        .collect();

    let areas = area_means(table, &[]);
    areas
        .into_keys()
        .map(|area| AreaProfile {
            stage_means: per_stage
                .iter()
                .map(|means| means.get(&area).copied().flatten())
                .collect(),
            area,
        })
        .collect()
}

/// Unweighted mean of the stage means. Each stage counts once regardless
/// of how many checklist items it has; stages without data are left out
/// rather than counted as zero.
pub fn global_score(stages: &[StageSummary]) -> Option<f64> {
    mean_present(stages.iter().map(|s| s.mean))
}

/// Critical and leader areas over every checklist item of the given
/// (unfiltered) table.
pub fn report_cards(table: &ScoredTable) -> ReportCards {
    let ranking = area_ranking(table, &table.all_columns());

    match (ranking.critical(), ranking.leader()) {
        (Some(critical), Some(leader)) => ReportCards {
            critical_area: critical.area.clone(),
            critical_score: display_value(critical.score),
            critical_severity: Some(critical.severity),
            leader_area: leader.area.clone(),
            leader_score: display_value(leader.score),
        },
        _ => ReportCards {
            critical_area: NO_DATA.to_string(),
            critical_score: 0.0,
            critical_severity: None,
            leader_area: NO_DATA.to_string(),
            leader_score: 0.0,
        },
    }
}

/// Builds the full dashboard summary. Stage, ranking and plant-leader
/// figures use `filtered`; the report cards always use `all`.
pub fn summarize(filtered: &ScoredTable, all: &ScoredTable) -> DashboardSummary {
    let stages = stage_summaries(filtered);
    let ranking = area_ranking(filtered, &filtered.all_columns());

    let plant_leader = ranking
        .leader()
        .filter(|_| !filtered.is_empty())
        .map(|l| l.area.clone())
        .unwrap_or_else(|| NO_LEADER.to_string());

    DashboardSummary {
        audits: filtered.len(),
        global_score: global_score(&stages),
        plant_leader,
        stages,
        ranking,
        profiles: area_profiles(filtered),
        cards: report_cards(all),
    }
}
