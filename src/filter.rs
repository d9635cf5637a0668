//! Area / machine selection applied to a scored table.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::audit::AuditTable;
use crate::score::ScoredTable;

/// Label shown for the catch-all choice.
pub const ALL_LABEL: &str = "Todos";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }
}

impl FromStr for Selection {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(ALL_LABEL) || s.eq_ignore_ascii_case("all") {
            Ok(Selection::All)
        } else {
            Ok(Selection::Only(s.to_string()))
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str(ALL_LABEL),
            Selection::Only(v) => f.write_str(v),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditFilter {
    pub area: Selection,
    pub machine: Selection,
}

impl AuditFilter {
    pub fn new(area: Selection, machine: Selection) -> Self {
        Self { area, machine }
    }

    pub fn is_identity(&self) -> bool {
        self.area.is_all() && self.machine.is_all()
    }

    /// Returns a new table holding only the matching rows, in source order.
    pub fn apply(&self, table: &ScoredTable) -> ScoredTable {
        if self.is_identity() {
            return table.clone();
        }

        ScoredTable {
            items: table.items.clone(),
            records: table
                .records
                .iter()
                .filter(|r| self.area.matches(&r.record.area) && self.machine.matches(&r.record.machine))
                .cloned()
                .collect(),
        }
    }
}

/// Distinct values offered by the area and machine selectors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub areas: Vec<String>,
    pub machines: Vec<String>,
}

impl FilterOptions {
    /// Blank areas and machines are not offered; no selection can match them.
    pub fn from_table(table: &AuditTable) -> Self {
        fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
            values
                .filter(|v| !v.is_empty())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .map(str::to_string)
                .collect()
        }

        Self {
            areas: distinct(table.records.iter().map(|r| r.area.as_str())),
            machines: distinct(table.records.iter().map(|r| r.machine.as_str())),
        }
    }

    /// Choices in selector order, with the catch-all first.
    pub fn area_choices(&self) -> Vec<String> {
        std::iter::once(ALL_LABEL.to_string())
            .chain(self.areas.iter().cloned())
            .collect()
    }

    pub fn machine_choices(&self) -> Vec<String> {
        std::iter::once(ALL_LABEL.to_string())
            .chain(self.machines.iter().cloned())
            .collect()
    }
}
