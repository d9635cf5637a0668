//! One dashboard run (score → filter → aggregate → render) and the refresh loop around it.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::analyzers::aggregate::summarize;
use crate::analyzers::types::DashboardSummary;
use crate::audit::AuditTable;
use crate::filter::{AuditFilter, FilterOptions};
use crate::output::{self, ReportOptions, render_report};
use crate::score::{ScoreMap, ScoredTable};
use crate::services::AuditSource;

/// Everything produced by a single run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub filter: AuditFilter,
    pub options: FilterOptions,
    pub summary: DashboardSummary,
    #[serde(skip)]
    pub filtered: ScoredTable,
    #[serde(skip)]
    pub report_html: String,
}

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    pub score_map: ScoreMap,
    pub report: ReportOptions,
}

impl Pipeline {
    pub fn new(score_map: ScoreMap, report: ReportOptions) -> Self {
        Self { score_map, report }
    }

    /// Runs every stage over a snapshot. Pure apart from reading the logo
    /// file; identical input yields an identical view.
    pub fn run(
        &self,
        raw: &AuditTable,
        filter: &AuditFilter,
        generated_at: DateTime<Utc>,
    ) -> DashboardView {
        let scored = self.score_map.score_table(raw);
        let filtered = filter.apply(&scored);
        let summary = summarize(&filtered, &scored);
        let report_html = render_report(&summary, &filtered, filter, &self.report, generated_at);

        DashboardView {
            filter: filter.clone(),
            options: FilterOptions::from_table(raw),
            summary,
            filtered,
            report_html,
        }
    }

    /// Takes a fresh snapshot from `source` and runs the pipeline on it.
    #[tracing::instrument(
        skip_all,
        fields(source = %source.describe(), area = %filter.area, machine = %filter.machine)
    )]
    pub async fn refresh<S: AuditSource + ?Sized>(
        &self,
        source: &S,
        filter: &AuditFilter,
    ) -> Result<DashboardView> {
        let raw = source.snapshot().await?;
        let view = self.run(&raw, filter, Utc::now());
        info!(
            rows = raw.records.len(),
            filtered = view.summary.audits,
            "Pipeline run complete"
        );
        Ok(view)
    }

    /// Refreshes on a fixed cadence and rewrites the report at `path` after
    /// each run. A failed run is logged and the next tick starts from
    /// scratch. Stops after `runs` ticks (never when 0) or once `shutdown`
    /// resolves, even mid-refresh. Returns the number of ticks taken.
    #[tracing::instrument(
        skip_all,
        fields(path = %path.display(), every_secs = every.as_secs(), runs = runs)
    )]
    pub async fn watch<S, F>(
        &self,
        source: &S,
        filter: &AuditFilter,
        path: &Path,
        every: Duration,
        runs: usize,
        shutdown: F,
    ) -> usize
    where
        S: AuditSource + ?Sized,
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        if runs == 0 {
            info!("Refreshing until Ctrl+C");
        }

        let mut completed = 0usize;
        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = &mut shutdown => {
                    info!("Interrupted, stopping refresh loop");
                    break;
                }
            }

            completed += 1;
            let outcome = tokio::select! {
                result = self.refresh(source, filter) => result,
                _ = &mut shutdown => {
                    info!(run = completed, "Interrupted during refresh");
                    break;
                }
            };

            match outcome.and_then(|view| publish(&view, path)) {
                Ok(()) => info!(run = completed, "Dashboard refreshed"),
                Err(e) => error!(run = completed, error = %format!("{e:#}"), "System error"),
            }

            if runs > 0 && completed >= runs {
                break;
            }
        }

        info!(completed, "Refresh loop finished");
        completed
    }
}

/// Logs the metrics of `view` and writes its report to `path`.
pub fn publish(view: &DashboardView, path: &Path) -> Result<()> {
    output::log_summary(&view.summary);
    output::write_report(path, &view.report_html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditRecord, ChecklistItem, Stage};
    use crate::filter::Selection;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn raw() -> AuditTable {
        let record = |area: &str, machine: &str, answer: &str| AuditRecord {
            timestamp: "2026/01/20".into(),
            area: area.into(),
            machine: machine.into(),
            auditor: "Ana".into(),
            comments: None,
            responses: vec![Some(answer.into()), Some("si cumple".into())],
        };
        AuditTable {
            items: vec![
                ChecklistItem { column: "1S_a [x]".into(), stage: Stage::Seiri },
                ChecklistItem { column: "2S_a [x]".into(), stage: Stage::Seiton },
            ],
            records: vec![
                record("Corte", "M1", "si cumple"),
                record("Prensa", "M2", "no cumple"),
                record("Corte", "M2", "falta mejorar"),
            ],
        }
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 21, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_run_is_deterministic() {
        let pipeline = Pipeline::default();
        let filter = AuditFilter::default();
        assert_eq!(pipeline.run(&raw(), &filter, at()), pipeline.run(&raw(), &filter, at()));
    }

    #[test]
    fn test_filter_keeps_unfiltered_cards() {
        let pipeline = Pipeline::default();
        let all = pipeline.run(&raw(), &AuditFilter::default(), at());
        let corte = pipeline.run(
            &raw(),
            &AuditFilter::new(Selection::Only("Corte".into()), Selection::All),
            at(),
        );

        assert_eq!(corte.summary.audits, 2);
        assert!(corte.filtered.records.iter().all(|r| r.record.area == "Corte"));
        assert_eq!(corte.summary.cards, all.summary.cards);
        assert_eq!(all.summary.cards.critical_area, "Prensa");
        assert_eq!(corte.summary.plant_leader, "Corte");
        assert_eq!(corte.options.areas, vec!["Corte", "Prensa"]);
    }

    /// Fails on its first snapshot, then serves `raw()`.
    struct FlakySource {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl AuditSource for FlakySource {
        async fn snapshot(&self) -> Result<AuditTable> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                anyhow::bail!("sheet unavailable");
            }
            Ok(raw())
        }

        fn describe(&self) -> String {
            "flaky".into()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_survives_failed_tick_and_stops_after_runs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reporte.html");
        std::fs::write(&path, "stale").unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let source = FlakySource { calls: calls.clone() };

        let completed = Pipeline::default()
            .watch(
                &source,
                &AuditFilter::default(),
                &path,
                Duration::from_secs(30),
                3,
                std::future::pending(),
            )
            .await;

        assert_eq!(completed, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Prensa"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_stops_on_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reporte.html");
        let source = FlakySource { calls: Arc::new(AtomicUsize::new(1)) };

        let completed = Pipeline::default()
            .watch(
                &source,
                &AuditFilter::default(),
                &path,
                Duration::from_secs(30),
                0,
                tokio::time::sleep(Duration::from_secs(45)),
            )
            .await;

        // Ticks fire at 0s and 30s; shutdown lands before the 60s tick.
        assert_eq!(completed, 2);
        assert!(path.exists());
    }
}
