use chrono::{TimeZone, Utc};
use fives_dashboard::analyzers::grade::Severity;
use fives_dashboard::analyzers::types::NO_LEADER;
use fives_dashboard::audit::Stage;
use fives_dashboard::filter::{AuditFilter, Selection};
use fives_dashboard::output::{RadarMode, ReportOptions, write_report};
use fives_dashboard::parser::parse_audit_csv;
use fives_dashboard::pipeline::{DashboardView, Pipeline};

const SHEET: &[u8] = include_bytes!("fixtures/audit_sheet.csv");

fn approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

fn run(area: &str, machine: &str) -> DashboardView {
    let table = parse_audit_csv(SHEET).expect("Failed to parse sheet");
    let filter = AuditFilter::new(area.parse().unwrap(), machine.parse().unwrap());
    let at = Utc.with_ymd_and_hms(2026, 1, 21, 12, 0, 0).unwrap();
    Pipeline::default().run(&table, &filter, at)
}

#[test]
fn test_full_pipeline() {
    let view = run("Todos", "Todos");
    let summary = &view.summary;

    assert_eq!(summary.audits, 6);
    approx(summary.global_score.unwrap(), 3.4);
    assert_eq!(summary.plant_leader, "Corte");

    let means: Vec<f64> = summary.stages.iter().map(|s| s.mean.unwrap()).collect();
    for (actual, expected) in means.into_iter().zip([3.4, 3.4, 3.0, 3.4, 3.8]) {
        approx(actual, expected);
    }

    let leaders: Vec<&str> = summary.stages.iter().map(|s| s.leader.as_str()).collect();
    assert_eq!(leaders, vec!["Corte", "Pintura", "Corte", "Pintura", "Corte"]);
    assert_eq!(summary.stages[0].stage, Stage::Seiri);
    assert_eq!(summary.stages[0].leader_score, 5.0);
}

#[test]
fn test_area_ranking_and_cards() {
    let view = run("Todos", "Todos");
    let ranking = &view.summary.ranking;

    let areas: Vec<&str> = ranking.entries.iter().map(|e| e.area.as_str()).collect();
    assert_eq!(areas, vec!["Corte", "Pintura", "Prensa"]);
    assert_eq!(ranking.entries[0].severity, Severity::Good);
    assert_eq!(ranking.entries[1].severity, Severity::Good);
    assert_eq!(ranking.entries[2].severity, Severity::Critical);

    let cards = &view.summary.cards;
    assert_eq!(cards.critical_area, "Prensa");
    assert_eq!(cards.critical_score, 1.67);
    assert_eq!(cards.leader_area, "Corte");
}

#[test]
fn test_area_filter_keeps_cards() {
    let all = run("Todos", "Todos");
    let prensa = run("Prensa", "Todos");

    assert_eq!(prensa.summary.audits, 2);
    assert_eq!(prensa.summary.plant_leader, "Prensa");
    approx(prensa.summary.stages[0].mean.unwrap(), 1.5);
    assert_eq!(prensa.summary.cards, all.summary.cards);
    assert_eq!(prensa.filter.area, Selection::Only("Prensa".into()));
}

#[test]
fn test_filter_without_matches() {
    let view = run("Almacen", "Todos");
    let summary = &view.summary;

    assert_eq!(summary.audits, 0);
    assert_eq!(summary.global_score, None);
    assert_eq!(summary.plant_leader, NO_LEADER);
    assert!(summary.stages.iter().all(|s| s.leader == NO_LEADER));
    assert_eq!(summary.cards.critical_area, "Prensa");
    assert!(view.report_html.contains("Sin datos"));
}

#[test]
fn test_machine_filter_and_report_rows() {
    let view = run("Todos", "M4");

    assert_eq!(view.summary.audits, 2);
    assert!(view.report_html.contains("2026/01/20 11:30:00"));
    assert!(!view.report_html.contains("2026/01/20 12:45:00"));
}

#[test]
fn test_rerun_is_identical() {
    assert_eq!(run("Corte", "Todos"), run("Corte", "Todos"));
}

#[test]
fn test_report_written_to_disk() {
    let table = parse_audit_csv(SHEET).unwrap();
    let pipeline = Pipeline::new(
        Default::default(),
        ReportOptions {
            radar: RadarMode::Animated,
            semaphore: true,
            logo: None,
        },
    );
    let view = pipeline.run(&table, &AuditFilter::default(), Utc::now());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reporte_5s_ejecutivo.html");
    write_report(&path, &view.report_html).unwrap();

    let html = std::fs::read_to_string(&path).unwrap();
    assert_eq!(html.matches("<tr class=\"critical-row\">").count(), 2);
    assert!(html.contains("\"frames\""));
    assert!(html.contains("ÁREA CRÍTICA"));
    assert!(html.contains("<td>Aceite en el piso</td>"));
    // The all-blank row is omitted along with its comment.
    assert!(!html.contains("Auditoria incompleta"));
}
