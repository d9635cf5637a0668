//! Self-contained HTML executive report.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use html_escape::encode_text;
use serde_json::Value;
use std::fmt::Write as _;
use std::path::Path;
use tracing::debug;

use super::charts::{ACCENT, RadarMode, bar_figure, radar_figure};
use crate::analyzers::grade::display_value;
use crate::analyzers::types::{AreaScore, DashboardSummary};
use crate::filter::AuditFilter;
use crate::score::ScoredTable;

pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
const RANKING_SIZE: usize = 5;

/// Presentation toggles shared by every rendered view.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    pub radar: RadarMode,
    pub semaphore: bool,
    pub logo: Option<std::path::PathBuf>,
}

const STYLE: &str = r#"
body { background-color: #0e1117; color: #e0e0e0; font-family: 'Segoe UI', Arial, sans-serif; padding: 40px; }
.container { max-width: 1100px; margin: auto; }
h1 { color: #00ffff; text-align: center; border-bottom: 2px solid #00ffff; padding-bottom: 10px; }
.logo { display: block; margin: 0 auto 20px auto; max-width: 300px; }
.meta { text-align: center; color: gray; font-size: 13px; }
.metrics, .insight-grid { display: flex; gap: 20px; margin: 30px 0; }
.metric, .insight-card { flex: 1; padding: 20px; border-radius: 12px; background: #161b22; border-left: 5px solid #333; box-shadow: 0 4px 6px rgba(0,0,0,0.3); }
.val { font-size: 28px; font-weight: bold; display: block; margin-top: 5px; color: #ffffff; text-transform: uppercase; }
.card { background: #161b22; border-radius: 12px; padding: 25px; margin-bottom: 30px; border: 1px solid #30363d; }
.chart { background: #0d1117; border-radius: 8px; padding: 10px; }
.styled-table { width: 100%; border-collapse: collapse; margin-top: 10px; border-radius: 8px; overflow: hidden; }
.styled-table thead tr { background-color: #00ffff; color: #000000; text-align: left; font-weight: bold; }
.styled-table th, .styled-table td { padding: 15px 20px; }
.styled-table tbody tr { border-bottom: 1px solid #30363d; }
.styled-table tbody tr:nth-of-type(even) { background-color: #0d1117; }
.styled-table tbody tr:hover { background-color: #1c2128; transition: 0.3s; }
.styled-table tbody tr.critical-row { background-color: rgba(255, 75, 75, 0.15); border-left: 4px solid #ff4b4b; }
.sev-critical { color: #ff4b4b; font-weight: bold; }
.sev-caution { color: #ffb300; font-weight: bold; }
.sev-good { color: #00e676; font-weight: bold; }
h3 { color: #00ffff; margin-bottom: 15px; border-left: 3px solid #00ffff; padding-left: 10px; }
"#;

/// Serializes a figure for inlining inside a `<script>` element.
fn script_json(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

fn chart_div(id: &str, figure: &Value) -> String {
    format!(
        "<div id=\"{id}\"></div>\n<script>Plotly.newPlot(\"{id}\", {}, {{\"responsive\": true}});</script>",
        script_json(figure)
    )
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        Some("gif") => "image/gif",
        _ => "image/png",
    }
}

/// Inline `<img>` for the logo, or nothing when the file is unavailable.
fn logo_tag(path: Option<&Path>) -> String {
    let Some(path) = path else {
        return String::new();
    };
    match std::fs::read(path) {
        Ok(bytes) => format!(
            "<img class=\"logo\" alt=\"logo\" src=\"data:{};base64,{}\">",
            mime_for(path),
            STANDARD.encode(bytes)
        ),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Logo not available, skipping");
            String::new()
        }
    }
}

fn format_score(score: Option<f64>) -> String {
    score
        .map(|s| format!("{:.2}", display_value(s)))
        .unwrap_or_else(|| "Sin datos".to_string())
}

fn ranking_rows(entries: &[&AreaScore], semaphore: bool) -> String {
    let mut out = String::new();
    for (pos, entry) in entries.iter().enumerate() {
        let class = if semaphore { entry.severity.css_class() } else { "" };
        let _ = write!(
            out,
            "<tr><td>{}</td><td>{}</td><td class=\"{class}\">{:.2}</td><td class=\"{class}\">{}</td></tr>",
            pos + 1,
            encode_text(&entry.area),
            entry.display_score(),
            entry.severity.label(),
        );
    }
    out
}

fn stage_rows(summary: &DashboardSummary) -> String {
    let mut out = String::new();
    for stage in &summary.stages {
        let _ = write!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td></tr>",
            stage.stage,
            format_score(stage.mean),
            encode_text(&stage.leader),
            stage.leader_score,
        );
    }
    out
}

fn audit_rows(filtered: &ScoredTable, critical_area: &str) -> String {
    let mut out = String::new();
    for row in filtered.records.iter().filter(|r| !r.record.has_no_responses()) {
        let r = &row.record;
        let flagged = r.area == critical_area;
        let _ = write!(
            out,
            "<tr{}><td>{}</td><td>{}{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            if flagged { " class=\"critical-row\"" } else { "" },
            encode_text(&r.timestamp),
            if flagged { "⚠ " } else { "" },
            encode_text(&r.area),
            encode_text(&r.machine),
            encode_text(&r.auditor),
            encode_text(r.comments.as_deref().unwrap_or("")),
        );
    }
    out
}

/// Renders the executive report for one pipeline run.
pub fn render_report(
    summary: &DashboardSummary,
    filtered: &ScoredTable,
    filter: &AuditFilter,
    options: &ReportOptions,
    generated_at: DateTime<Utc>,
) -> String {
    let cards = &summary.cards;
    let critical_color = match (options.semaphore, cards.critical_severity) {
        (true, Some(sev)) => sev.color(),
        _ => "#ff4b4b",
    };

    let radar = chart_div("radar", &radar_figure(summary, options.radar, options.semaphore));
    let bars = chart_div("bars", &bar_figure(summary, options.semaphore));
    let top: Vec<&AreaScore> = summary.ranking.top(RANKING_SIZE).iter().collect();
    let bottom = summary.ranking.bottom(RANKING_SIZE);

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<title>Reporte Ejecutivo de Auditoría 5S</title>
<script src="{cdn}"></script>
<style>{style}</style>
</head>
<body>
<div class="container">
{logo}
<h1>Reporte Ejecutivo de Auditoría 5S</h1>
<p class="meta">Generado: {generated} · Área: {area} · Máquina: {machine}</p>

<div class="metrics">
  <div class="metric" style="border-left-color: {accent};"><small>Auditorías</small><span class="val">{audits}</span></div>
  <div class="metric" style="border-left-color: {accent};"><small>Score Global</small><span class="val">{global}</span></div>
  <div class="metric" style="border-left-color: {accent};"><small>Líder de Planta</small><span class="val">{plant_leader}</span></div>
</div>

<div class="insight-grid">
  <div class="insight-card" style="border-left-color: {critical_color};">
    <small style="color: {critical_color}; font-weight: bold;">ÁREA CRÍTICA (Acción Inmediata)</small>
    <span class="val">{critical}</span>
    <p style="margin:0; opacity: 0.8;">Score Histórico: {critical_score:.2} / 5.00</p>
  </div>
  <div class="insight-card" style="border-left-color: {accent};">
    <small style="color: {accent}; font-weight: bold;">ÁREA LÍDER (Benchmarking)</small>
    <span class="val">{leader}</span>
    <p style="margin:0; opacity: 0.8;">Máximo Desempeño Operativo</p>
  </div>
</div>

<div class="card">
<h3>Análisis de Madurez 5S</h3>
<div class="chart">{radar}</div>
</div>

<div class="card">
<h3>Promedio por Etapa</h3>
<div class="chart">{bars}</div>
<table class="styled-table">
<thead><tr><th>Etapa</th><th>Puntaje</th><th>Mejor Área</th><th>Puntaje Máximo</th></tr></thead>
<tbody>{stage_rows}</tbody>
</table>
</div>

<div class="card">
<h3>Top 5 Áreas</h3>
<table class="styled-table">
<thead><tr><th>#</th><th>Área</th><th>Score</th><th>Estado</th></tr></thead>
<tbody>{top_rows}</tbody>
</table>
<h3>Áreas con Menor Desempeño</h3>
<table class="styled-table">
<thead><tr><th>#</th><th>Área</th><th>Score</th><th>Estado</th></tr></thead>
<tbody>{bottom_rows}</tbody>
</table>
</div>

<div class="card">
<h3>Registro de Actividades Filtradas</h3>
<table class="styled-table">
<thead><tr><th>Fecha</th><th>Área</th><th>Máquina</th><th>Auditor</th><th>Comentarios</th></tr></thead>
<tbody>{audit_rows}</tbody>
</table>
</div>
</div>
</body>
</html>
"#,
        cdn = PLOTLY_CDN,
        style = STYLE,
        logo = logo_tag(options.logo.as_deref()),
        generated = generated_at.format("%Y-%m-%d %H:%M UTC"),
        area = encode_text(&filter.area.to_string()),
        machine = encode_text(&filter.machine.to_string()),
        accent = ACCENT,
        audits = summary.audits,
        global = format_score(summary.global_score),
        plant_leader = encode_text(&summary.plant_leader),
        critical_color = critical_color,
        critical = encode_text(&cards.critical_area),
        critical_score = cards.critical_score,
        leader = encode_text(&cards.leader_area),
        radar = radar,
        bars = bars,
        stage_rows = stage_rows(summary),
        top_rows = ranking_rows(&top, options.semaphore),
        bottom_rows = ranking_rows(&bottom, options.semaphore),
        audit_rows = audit_rows(filtered, &cards.critical_area),
    )
}
