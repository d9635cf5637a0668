//! CSV parser for the published audit sheet.

use anyhow::{Context, Result, bail};
use csv::ReaderBuilder;
use tracing::debug;

use crate::audit::{
    AREA_COLUMN, AUDITOR_COLUMN, AuditRecord, AuditTable, COMMENTS_PREFIX, ChecklistItem,
    MACHINE_COLUMN, Stage, TIMESTAMP_COLUMN,
};

/// Positions of the metadata columns inside a CSV row.
struct Layout {
    timestamp: usize,
    area: usize,
    machine: usize,
    auditor: usize,
    comments: Option<usize>,
    items: Vec<(usize, ChecklistItem)>,
}

impl Layout {
    fn from_headers(headers: &[String]) -> Result<Self> {
        let find = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h == name)
                .with_context(|| format!("audit sheet is missing expected column '{name}'"))
        };

        let items = headers
            .iter()
            .enumerate()
            .filter_map(|(i, h)| {
                Stage::from_column(h).map(|stage| {
                    (
                        i,
                        ChecklistItem {
                            column: h.clone(),
                            stage,
                        },
                    )
                })
            })
            .collect();

        Ok(Self {
            timestamp: find(TIMESTAMP_COLUMN)?,
            area: find(AREA_COLUMN)?,
            machine: find(MACHINE_COLUMN)?,
            auditor: find(AUDITOR_COLUMN)?,
            comments: headers.iter().position(|h| h.starts_with(COMMENTS_PREFIX)),
            items,
        })
    }
}

fn cell(record: &csv::StringRecord, idx: usize) -> Option<String> {
    record
        .get(idx)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Decodes a CSV export of the audit form into an [`AuditTable`].
///
/// Column names are whitespace-trimmed before matching. Short rows are
/// padded with empty cells.
///
/// # Errors
///
/// Returns an error if the input has no header row, a required metadata
/// column is absent, or the CSV is malformed.
pub fn parse_audit_csv(bytes: &[u8]) -> Result<AuditTable> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(bytes);

    let headers: Vec<String> = rdr
        .headers()
        .context("failed to read audit sheet header")?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    if headers.iter().all(String::is_empty) {
        bail!("audit sheet is empty");
    }

    let layout = Layout::from_headers(&headers)?;
    let mut records = Vec::new();

    for (line, result) in rdr.records().enumerate() {
        let row = result.with_context(|| format!("malformed audit row {}", line + 2))?;

        records.push(AuditRecord {
            timestamp: cell(&row, layout.timestamp).unwrap_or_default(),
            area: cell(&row, layout.area).unwrap_or_default(),
            machine: cell(&row, layout.machine).unwrap_or_default(),
            auditor: cell(&row, layout.auditor).unwrap_or_default(),
            comments: layout.comments.and_then(|i| cell(&row, i)),
            responses: layout.items.iter().map(|(i, _)| cell(&row, *i)).collect(),
        });
    }

    debug!(
        rows = records.len(),
        checklist_items = layout.items.len(),
        "Audit sheet parsed"
    );

    Ok(AuditTable {
        items: layout.items.into_iter().map(|(_, item)| item).collect(),
        records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = "\
Marca temporal , Area,Maquina,Nombre del Auditor,1S_Clasificar [Herramientas],2S_Orden [Pasillos],Comentarios adicionales
2026/01/20 10:00,Corte,M1,Ana,Si cumple,No cumple,ok
2026/01/20 11:00,Prensa,M2,Luis,,Falta mejorar,
";

    #[test]
    fn test_parse_trims_headers_and_classifies_items() {
        let table = parse_audit_csv(SHEET.as_bytes()).unwrap();

        assert_eq!(table.items.len(), 2);
        assert_eq!(table.items[0].stage, Stage::Seiri);
        assert_eq!(table.items[1].stage, Stage::Seiton);
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[0].timestamp, "2026/01/20 10:00");
        assert_eq!(table.records[0].comments.as_deref(), Some("ok"));
    }

    #[test]
    fn test_parse_empty_cells_are_none() {
        let table = parse_audit_csv(SHEET.as_bytes()).unwrap();
        let second = &table.records[1];

        assert_eq!(second.responses[0], None);
        assert_eq!(second.responses[1].as_deref(), Some("Falta mejorar"));
        assert_eq!(second.comments, None);
    }

    #[test]
    fn test_parse_missing_column_is_error() {
        let csv = "Marca temporal,Area,Nombre del Auditor\n1,A,B\n";
        let err = parse_audit_csv(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Maquina"));
    }

    #[test]
    fn test_parse_empty_input_is_error() {
        assert!(parse_audit_csv(b"").is_err());
    }

    #[test]
    fn test_parse_short_rows_are_padded() {
        let csv = "Marca temporal,Area,Maquina,Nombre del Auditor,1S_a [x]\n1,A,M\n";
        let table = parse_audit_csv(csv.as_bytes()).unwrap();
        assert_eq!(table.records[0].auditor, "");
        assert_eq!(table.records[0].responses, vec![None]);
    }
}
