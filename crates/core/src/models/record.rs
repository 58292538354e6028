use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single cell of a schema-less record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl ScalarValue {
    /// True for null and for blank text.
    pub fn is_empty(&self) -> bool {
        match self {
            ScalarValue::Null => true,
            ScalarValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl std::fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalarValue::Null => Ok(()),
            ScalarValue::Bool(b) => write!(f, "{b}"),
            // Whole numbers (holding days, counts) print without a trailing ".0"
            ScalarValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{n:.0}"),
            ScalarValue::Number(n) => write!(f, "{n}"),
            ScalarValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(s: &str) -> Self {
        ScalarValue::Text(s.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(s: String) -> Self {
        ScalarValue::Text(s)
    }
}

impl From<f64> for ScalarValue {
    fn from(n: f64) -> Self {
        ScalarValue::Number(n)
    }
}

/// Ordered mapping from field name to value. Key order is the order the
/// server sent, which is what column discovery relies on.
pub type Record = IndexMap<String, ScalarValue>;

/// One closed trade as listed in the trade table.
pub type TradeRecord = Record;

const ENTRY_DATE_KEYS: [&str; 4] = [
    "firstOperationDate",
    "first_operation_date",
    "entryDate",
    "entry_date",
];
const EXIT_DATE_KEYS: [&str; 4] = [
    "lastOperationDate",
    "last_operation_date",
    "exitDate",
    "exit_date",
];

/// Summary of the highlighted ("default") operation.
///
/// The schema is open: every field is displayed. The entry and exit dates
/// additionally mark the operation range on the chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationSummary {
    pub fields: Record,
}

impl OperationSummary {
    pub fn new(fields: Record) -> Self {
        Self { fields }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Entry date, if present and non-empty.
    pub fn entry_date(&self) -> Option<String> {
        self.date_field(&ENTRY_DATE_KEYS)
    }

    /// Exit date, if present and non-empty.
    pub fn exit_date(&self) -> Option<String> {
        self.date_field(&EXIT_DATE_KEYS)
    }

    fn date_field(&self, keys: &[&str]) -> Option<String> {
        keys.iter()
            .filter_map(|k| self.fields.get(*k))
            .find(|v| !v.is_empty())
            .map(|v| v.to_string())
    }
}
