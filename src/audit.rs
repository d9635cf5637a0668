//! Audit data model: stages, checklist columns and raw audit rows.

use serde::Serialize;
use std::fmt;

pub const TIMESTAMP_COLUMN: &str = "Marca temporal";
pub const AREA_COLUMN: &str = "Area";
pub const MACHINE_COLUMN: &str = "Maquina";
pub const AUDITOR_COLUMN: &str = "Nombre del Auditor";
pub const COMMENTS_PREFIX: &str = "Comentarios";

/// The five 5S stages, in audit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Stage {
    Seiri,
    Seiton,
    Seiso,
    Seiketsu,
    Shitsuke,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Seiri,
        Stage::Seiton,
        Stage::Seiso,
        Stage::Seiketsu,
        Stage::Shitsuke,
    ];

    /// Column-name token that marks a checklist item of this stage.
    pub fn prefix(self) -> &'static str {
        match self {
            Stage::Seiri => "1S_",
            Stage::Seiton => "2S_",
            Stage::Seiso => "3S_",
            Stage::Seiketsu => "4S_",
            Stage::Shitsuke => "5S_",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::Seiri => "SEIRI",
            Stage::Seiton => "SEITON",
            Stage::Seiso => "SEISO",
            Stage::Seiketsu => "SEIKETSU",
            Stage::Shitsuke => "SHITSUKE",
        }
    }

    /// Classifies a (trimmed) column name. Checklist columns carry a stage
    /// token and a bracket; the lowest stage wins if several tokens appear.
    pub fn from_column(name: &str) -> Option<Stage> {
        if !name.contains('[') {
            return None;
        }
        Stage::ALL.into_iter().find(|s| name.contains(s.prefix()))
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A response column of the audit form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistItem {
    pub column: String,
    pub stage: Stage,
}

/// One submitted audit, with raw (unscored) responses aligned to
/// [`AuditTable::items`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuditRecord {
    pub timestamp: String,
    pub area: String,
    pub machine: String,
    pub auditor: String,
    pub comments: Option<String>,
    pub responses: Vec<Option<String>>,
}

impl AuditRecord {
    /// True when no checklist cell was filled in.
    pub fn has_no_responses(&self) -> bool {
        self.responses.iter().all(Option::is_none)
    }
}

/// A full snapshot of the audit sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuditTable {
    pub items: Vec<ChecklistItem>,
    pub records: Vec<AuditRecord>,
}
