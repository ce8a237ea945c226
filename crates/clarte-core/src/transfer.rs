//! JSON export of the completed history and additive import.
//!
//! Both directions use the same document: a pretty-printed array of
//! [`DatedEntry`] records, newest first. Import never overwrites a day that
//! already has an entry.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entry::{date_key, parse_date_key, DatedEntry, JournalEntry};
use crate::error::TransferError;
use crate::storage::EntryStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExportDocument {
    pub entries: Vec<DatedEntry>,
}

impl ExportDocument {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// `<prefix>_<YYYY-MM-DD>.json`
    pub fn file_name(prefix: &str, today: NaiveDate) -> String {
        format!("{}_{}.json", prefix, date_key(today))
    }
}

/// Outcome of an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub imported: usize,
    /// Days that already had an entry.
    pub skipped_existing: usize,
    /// Records without a usable date or completion time.
    pub skipped_incomplete: usize,
}

impl ImportSummary {
    pub fn message(&self) -> String {
        format!("{} entrée(s) importée(s)", self.imported)
    }
}

/// Every completed entry of the last `horizon_days` days.
///
/// # Errors
/// [`TransferError::EmptyExport`] when there is nothing to export.
pub fn export<S: EntryStore>(
    store: &S,
    today: NaiveDate,
    horizon_days: u32,
) -> Result<ExportDocument, TransferError> {
    let entries = store.list_completed(today, horizon_days)?;
    if entries.is_empty() {
        return Err(TransferError::EmptyExport);
    }
    tracing::info!(entries = entries.len(), "exporting journal");
    Ok(ExportDocument { entries })
}

enum Record {
    Complete(NaiveDate, JournalEntry),
    Incomplete,
}

fn read_record(index: usize, value: Value) -> Result<Record, TransferError> {
    let Value::Object(mut fields) = value else {
        return Err(TransferError::InvalidImportDocument(format!(
            "l'élément {index} n'est pas un objet"
        )));
    };

    let date = fields
        .remove("date")
        .and_then(|v| v.as_str().and_then(parse_date_key));
    let entry: JournalEntry = serde_json::from_value(Value::Object(fields)).map_err(|e| {
        TransferError::InvalidImportDocument(format!("élément {index} : {e}"))
    })?;

    Ok(match date {
        Some(date) if entry.is_completed() => Record::Complete(date, entry),
        _ => Record::Incomplete,
    })
}

/// Merge the records of `json` into `store` without overwriting any day.
///
/// The whole document is validated before the first write, so a malformed
/// document leaves the store untouched.
pub fn import<S: EntryStore>(store: &S, json: &str) -> Result<ImportSummary, TransferError> {
    let document: Value = serde_json::from_str(json)
        .map_err(|e| TransferError::InvalidImportDocument(e.to_string()))?;
    let Value::Array(values) = document else {
        return Err(TransferError::InvalidImportDocument(
            "le document doit être une liste d'entrées".to_string(),
        ));
    };

    let records = values
        .into_iter()
        .enumerate()
        .map(|(index, value)| read_record(index, value))
        .collect::<Result<Vec<_>, _>>()?;

    let mut summary = ImportSummary::default();
    for record in records {
        match record {
            Record::Complete(date, entry) => {
                if store.merge_if_absent(date, &entry)? {
                    summary.imported += 1;
                } else {
                    tracing::debug!(%date, "import skipped existing day");
                    summary.skipped_existing += 1;
                }
            }
            Record::Incomplete => summary.skipped_incomplete += 1,
        }
    }

    tracing::info!(
        imported = summary.imported,
        skipped_existing = summary.skipped_existing,
        skipped_incomplete = summary.skipped_incomplete,
        "import finished"
    );
    Ok(summary)
}
