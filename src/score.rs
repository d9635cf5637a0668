//! Conversion of categorical checklist answers into numeric scores.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::audit::{AuditRecord, AuditTable, ChecklistItem};

/// The closed set of answers accepted by the audit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Response {
    DoesNotComply,
    NeedsImprovement,
    Complies,
    NotApplicable,
}

impl Response {
    pub fn score(self) -> Option<f64> {
        match self {
            Response::DoesNotComply => Some(1.0),
            Response::NeedsImprovement => Some(3.0),
            Response::Complies => Some(5.0),
            Response::NotApplicable => None,
        }
    }
}

/// Vocabulary used to recognize answers. Keys are stored lowercased.
#[derive(Debug, Clone)]
pub struct ScoreMap {
    entries: HashMap<String, Response>,
}

impl Default for ScoreMap {
    fn default() -> Self {
        let entries = [
            ("no cumple", Response::DoesNotComply),
            ("falta mejorar", Response::NeedsImprovement),
            ("si cumple", Response::Complies),
            ("n/a", Response::NotApplicable),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self { entries }
    }
}

impl ScoreMap {
    /// Registers an extra spelling for an answer.
    pub fn with_alias(mut self, alias: &str, response: Response) -> Self {
        self.entries.insert(normalize(alias), response);
        self
    }

    pub fn with_aliases<'a>(self, aliases: impl IntoIterator<Item = (&'a str, Response)>) -> Self {
        aliases
            .into_iter()
            .fold(self, |map, (alias, response)| map.with_alias(alias, response))
    }

    pub fn response(&self, cell: &str) -> Option<Response> {
        self.entries.get(&normalize(cell)).copied()
    }

    /// Scores a single cell. Empty, unknown and not-applicable answers are
    /// missing rather than an error.
    pub fn score_cell(&self, cell: Option<&str>) -> Option<f64> {
        self.response(cell?)?.score()
    }

    pub fn score_table(&self, table: &AuditTable) -> ScoredTable {
        let records = table
            .records
            .iter()
            .map(|record| ScoredRecord {
                scores: record
                    .responses
                    .iter()
                    .map(|cell| self.score_cell(cell.as_deref()))
                    .collect(),
                record: record.clone(),
            })
            .collect();

        ScoredTable {
            items: table.items.clone(),
            records,
        }
    }
}

fn normalize(cell: &str) -> String {
    cell.trim().to_lowercase()
}

/// An audit row together with its numeric scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecord {
    pub record: AuditRecord,
    pub scores: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoredTable {
    pub items: Vec<ChecklistItem>,
    pub records: Vec<ScoredRecord>,
}

impl ScoredTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn all_columns(&self) -> Vec<usize> {
        (0..self.items.len()).collect()
    }
}
