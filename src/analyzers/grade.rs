use serde::Serialize;

use crate::analyzers::utility::round2;

/// Traffic-light class of an average score on the 1–5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Caution,
    Good,
}

pub const CRITICAL_BELOW: f64 = 3.0;
pub const GOOD_FROM: f64 = 4.2;

/// Classifies an average score.
///
/// | Range        | Severity |
/// |--------------|----------|
/// | < 3.0        | Critical |
/// | 3.0 ..< 4.2  | Caution  |
/// | >= 4.2       | Good     |
pub fn severity(avg: f64) -> Severity {
    match avg {
        a if a >= GOOD_FROM => Severity::Good,
        a if a >= CRITICAL_BELOW => Severity::Caution,
        _ => Severity::Critical,
    }
}

/// Two-decimal value to print for `avg`. Rounding never lifts a score
/// into the next band: 4.196 shows as 4.19, not 4.20.
pub fn display_value(avg: f64) -> f64 {
    let rounded = round2(avg);
    if severity(rounded) == severity(avg) {
        rounded
    } else {
        (avg * 100.0).floor() / 100.0
    }
}

impl Severity {
    pub fn color(self) -> &'static str {
        match self {
            Severity::Critical => "#ff4b4b",
            Severity::Caution => "#ffb300",
            Severity::Good => "#00e676",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Critical => "Crítico",
            Severity::Caution => "Precaución",
            Severity::Good => "Óptimo",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Severity::Critical => "sev-critical",
            Severity::Caution => "sev-caution",
            Severity::Good => "sev-good",
        }
    }
}
