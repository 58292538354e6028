use crate::models::overlay::{SummaryRow, TableRow, TradeTable};
use crate::models::record::{OperationSummary, TradeRecord};

/// Field names that identify the instrument. The first one found is shown first.
const INSTRUMENT_COLUMNS: [&str; 3] = ["stock", "instrument", "symbol"];

/// Projects schema-less records into display tables.
pub struct TradeTableProjector;

impl TradeTableProjector {
    pub fn new() -> Self {
        Self
    }

    /// Build the trade table.
    ///
    /// Columns come from the first record's keys, with the instrument column
    /// moved to the front. Later records are assumed to share that schema;
    /// a missing key yields an empty cell and extra keys are ignored.
    pub fn project(&self, records: &[TradeRecord]) -> TradeTable {
        let Some(first) = records.first() else {
            return TradeTable::default();
        };

        let mut columns: Vec<String> = first.keys().cloned().collect();
        if let Some(pos) = INSTRUMENT_COLUMNS
            .iter()
            .find_map(|name| columns.iter().position(|c| c.as_str() == *name))
        {
            let instrument = columns.remove(pos);
            columns.insert(0, instrument);
        }

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|col| {
                        let value = record.get(col).map(|v| v.to_string()).unwrap_or_default();
                        (col.clone(), value)
                    })
                    .collect::<TableRow>()
            })
            .collect();

        TradeTable {
            labels: columns.iter().map(|c| column_label(c)).collect(),
            columns,
            rows,
        }
    }

    /// One row per summary field, in the order the server sent them.
    pub fn summarize(&self, operation: &OperationSummary) -> Vec<SummaryRow> {
        operation
            .fields
            .iter()
            .map(|(key, value)| SummaryRow {
                key: key.clone(),
                label: column_label(key),
                value: value.to_string(),
            })
            .collect()
    }
}

impl Default for TradeTableProjector {
    fn default() -> Self {
        Self::new()
    }
}

/// Human-readable header for a field name: separators become spaces,
/// camelCase humps are split, and every word is capitalised.
///
/// `pnl_percentage` → `Pnl Percentage`, `firstOperationDate` → `First Operation Date`.
pub fn column_label(field: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for ch in field.chars() {
        if matches!(ch, '_' | '-' | ' ' | '.') {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        current.push(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
