//! Plotly figure specs for the radar and bar charts.
//!
//! Figures are plain JSON handed to `Plotly.newPlot` in the browser.

use clap::ValueEnum;
use serde::Serialize;
use serde_json::{Value, json};

use crate::analyzers::types::DashboardSummary;
use crate::audit::Stage;

pub const ACCENT: &str = "#00FFFF";

/// Bar color for a stage without data.
const NO_DATA_COLOR: &str = "#555555";

/// Palette for area traces when severity coloring is off.
const AREA_PALETTE: &[&str] = &[
    "#00FFFF", "#FF6EC7", "#FFD166", "#06D6A0", "#118AB2", "#EF476F", "#8338EC", "#FB5607",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RadarMode {
    /// One trace with the stage averages of the current view
    #[default]
    Stages,
    /// One trace per area
    Areas,
    /// One animation frame per area
    Animated,
}

fn stage_labels() -> Vec<&'static str> {
    Stage::ALL.iter().map(|s| s.label()).collect()
}

fn radar_layout() -> Value {
    json!({
        "template": "plotly_dark",
        "paper_bgcolor": "rgba(0,0,0,0)",
        "polar": {
            "bgcolor": "rgba(20,20,20,1)",
            "radialaxis": { "range": [0, 5] }
        },
        "showlegend": false,
        "margin": { "t": 40, "b": 40 }
    })
}

fn area_color(summary: &DashboardSummary, area: &str, idx: usize, semaphore: bool) -> &'static str {
    if semaphore {
        if let Some(entry) = summary.ranking.entries.iter().find(|e| e.area == area) {
            return entry.severity.color();
        }
    }
    AREA_PALETTE[idx % AREA_PALETTE.len()]
}

fn area_trace(name: &str, scores: Vec<f64>, color: &str) -> Value {
    json!({
        "type": "scatterpolar",
        "name": name,
        "r": scores,
        "theta": stage_labels(),
        "fill": "toself",
        "line": { "color": color, "width": 2 },
        "hovertemplate": format!("<b>{}</b><br>%{{theta}}: %{{r}}<extra></extra>", name),
    })
}

/// Radar chart of the summary in the requested mode.
pub fn radar_figure(summary: &DashboardSummary, mode: RadarMode, semaphore: bool) -> Value {
    match mode {
        RadarMode::Stages => {
            let custom: Vec<Value> = summary
                .stages
                .iter()
                .map(|s| json!([s.award(), s.leader_score]))
                .collect();
            let scores: Vec<f64> = summary.stages.iter().map(|s| s.display_score()).collect();

            json!({
                "data": [{
                    "type": "scatterpolar",
                    "r": scores,
                    "theta": stage_labels(),
                    "fill": "toself",
                    "fillcolor": "rgba(0, 255, 255, 0.2)",
                    "line": { "color": ACCENT, "width": 3 },
                    "marker": { "size": 12, "color": ACCENT },
                    "customdata": custom,
                    "hovertemplate": "<b>✦ %{theta} ✦</b><br>Promedio: %{r}<br><b>%{customdata[0]}</b><extra></extra>"
                }],
                "layout": radar_layout()
            })
        }
        RadarMode::Areas => {
            let data: Vec<Value> = summary
                .profiles
                .iter()
                .enumerate()
                .map(|(i, p)| {
                    area_trace(&p.area, p.display_scores(), area_color(summary, &p.area, i, semaphore))
                })
                .collect();

            let mut layout = radar_layout();
            layout["showlegend"] = json!(true);
            json!({ "data": data, "layout": layout })
        }
        RadarMode::Animated => {
            let frames: Vec<Value> = summary
                .profiles
                .iter()
                .enumerate()
                .map(|(i, p)| {
                    json!({
                        "name": p.area,
                        "data": [area_trace(&p.area, p.display_scores(), area_color(summary, &p.area, i, semaphore))],
                        "layout": { "title": { "text": p.area } }
                    })
                })
                .collect();

            let first = frames
                .first()
                .map(|f| f["data"].clone())
                .unwrap_or_else(|| json!([]));

            let mut layout = radar_layout();
            layout["updatemenus"] = json!([{
                "type": "buttons",
                "showactive": false,
                "x": 0.05,
                "y": 1.1,
                "buttons": [{
                    "label": "▶",
                    "method": "animate",
                    "args": [null, {
                        "frame": { "duration": 1500, "redraw": true },
                        "fromcurrent": true,
                        "transition": { "duration": 500 }
                    }]
                }]
            }]);
            layout["sliders"] = json!([{
                "currentvalue": { "prefix": "Área: " },
                "steps": summary.profiles.iter().map(|p| json!({
                    "label": p.area,
                    "method": "animate",
                    "args": [[p.area], { "mode": "immediate", "frame": { "redraw": true } }]
                })).collect::<Vec<_>>()
            }]);

            json!({ "data": first, "layout": layout, "frames": frames })
        }
    }
}

/// Bar chart of the stage averages.
pub fn bar_figure(summary: &DashboardSummary, semaphore: bool) -> Value {
    let scores: Vec<f64> = summary.stages.iter().map(|s| s.display_score()).collect();
    let leaders: Vec<&str> = summary.stages.iter().map(|s| s.leader.as_str()).collect();

    let marker = if semaphore {
        let colors: Vec<&str> = summary
            .stages
            .iter()
            .map(|s| s.severity().map_or(NO_DATA_COLOR, |sev| sev.color()))
            .collect();
        json!({ "color": colors, "line": { "color": ACCENT, "width": 1 } })
    } else {
        json!({
            "color": scores,
            "colorscale": "Blues",
            "cmin": 0,
            "cmax": 5,
            "line": { "color": ACCENT, "width": 1 }
        })
    };

    json!({
        "data": [{
            "type": "bar",
            "x": stage_labels(),
            "y": scores,
            "customdata": leaders,
            "marker": marker,
            "hovertemplate": "<b>%{x}</b><br>Puntaje: %{y}<br>Mejor Área: %{customdata}<extra></extra>"
        }],
        "layout": {
            "template": "plotly_dark",
            "paper_bgcolor": "rgba(0,0,0,0)",
            "height": 400,
            "xaxis": { "color": "white" },
            "yaxis": { "range": [0, 5], "color": "white" },
            "margin": { "t": 30 }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::types::{
        AreaProfile, AreaRanking, AreaScore, ReportCards, StageSummary,
    };

    fn summary() -> DashboardSummary {
        let stages = Stage::ALL
            .into_iter()
            .map(|stage| StageSummary {
                stage,
                mean: Some(2.5),
                leader: "Corte".into(),
                leader_score: 4.0,
            })
            .collect();

        DashboardSummary {
            audits: 2,
            global_score: Some(2.5),
            plant_leader: "Corte".into(),
            stages,
            ranking: AreaRanking::new(vec![
                AreaScore::new("Corte", 4.5),
                AreaScore::new("Prensa", 2.0),
            ]),
            profiles: vec![
                AreaProfile { area: "Corte".into(), stage_means: vec![Some(4.5); 5] },
                AreaProfile { area: "Prensa".into(), stage_means: vec![Some(2.0); 5] },
            ],
            cards: ReportCards {
                critical_area: "Prensa".into(),
                critical_score: 2.0,
                critical_severity: None,
                leader_area: "Corte".into(),
                leader_score: 4.5,
            },
        }
    }

    #[test]
    fn test_stage_radar_has_single_trace() {
        let fig = radar_figure(&summary(), RadarMode::Stages, false);
        assert_eq!(fig["data"].as_array().unwrap().len(), 1);
        assert_eq!(fig["data"][0]["theta"][0], "SEIRI");
        assert_eq!(fig["data"][0]["customdata"][0][0], "🏆 Candidato: Corte");
        assert_eq!(fig["layout"]["polar"]["radialaxis"]["range"][1], 5);
    }

    #[test]
    fn test_area_radar_uses_severity_colors() {
        let fig = radar_figure(&summary(), RadarMode::Areas, true);
        let data = fig["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["line"]["color"], "#00e676");
        assert_eq!(data[1]["line"]["color"], "#ff4b4b");
    }

    #[test]
    fn test_animated_radar_has_frame_per_area() {
        let fig = radar_figure(&summary(), RadarMode::Animated, false);
        assert_eq!(fig["frames"].as_array().unwrap().len(), 2);
        assert_eq!(fig["frames"][1]["name"], "Prensa");
        assert_eq!(fig["data"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_bar_colors() {
        let plain = bar_figure(&summary(), false);
        assert_eq!(plain["data"][0]["marker"]["colorscale"], "Blues");

        let semaphore = bar_figure(&summary(), true);
        assert_eq!(semaphore["data"][0]["marker"]["color"][0], "#ff4b4b");
    }

    #[test]
    fn test_bar_severity_uses_unrounded_mean() {
        let mut s = summary();
        s.stages[0].mean = Some(4.196);
        s.stages[1].mean = Some(4.2);
        s.stages[2].mean = None;

        let fig = bar_figure(&s, true);
        let colors = &fig["data"][0]["marker"]["color"];
        assert_eq!(colors[0], "#ffb300");
        assert_eq!(fig["data"][0]["y"][0], 4.19);
        assert_eq!(colors[1], "#00e676");
        assert_eq!(colors[2], NO_DATA_COLOR);
    }
}
