use serde::{Deserialize, Serialize};

/// Trading recommendation attached to a date/price point.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SignalAction {
    /// Open a long position
    Long,
    /// Close the open position
    Sell,
    /// Open a short position
    Short,
    /// No recommendation for this point; never drawn
    Nothing,
    /// Any label the server sends that we don't know about
    Other(String),
}

impl SignalAction {
    /// Whether this signal gets an annotation on the chart.
    pub fn is_visible(&self) -> bool {
        !matches!(self, SignalAction::Nothing)
    }
}

impl From<String> for SignalAction {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Long" => SignalAction::Long,
            "Sell" => SignalAction::Sell,
            "Short" => SignalAction::Short,
            "Nothing" => SignalAction::Nothing,
            _ => SignalAction::Other(s),
        }
    }
}

impl From<SignalAction> for String {
    fn from(a: SignalAction) -> Self {
        a.to_string()
    }
}

impl std::fmt::Display for SignalAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalAction::Long => write!(f, "Long"),
            SignalAction::Sell => write!(f, "Sell"),
            SignalAction::Short => write!(f, "Short"),
            SignalAction::Nothing => write!(f, "Nothing"),
            SignalAction::Other(label) => write!(f, "{label}"),
        }
    }
}

/// One entry of the `suggestions` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalEvent {
    /// Category label on the x axis (`YYYY-MM-DD`)
    pub date: String,

    /// Closing price; the server sends null for non-finite values
    #[serde(default)]
    pub price: Option<f64>,

    pub action: SignalAction,

    /// Moving average at this point
    #[serde(default, rename = "avg", alias = "moving_average")]
    pub moving_average: Option<f64>,

    /// Percentage change, when the server computed one
    #[serde(default, alias = "pct_change", alias = "percent_change")]
    pub percentage_change: Option<f64>,

    /// Instrument the signal belongs to (multi-instrument requests)
    #[serde(default)]
    pub stock: Option<String>,
}

impl SignalEvent {
    pub fn new(date: impl Into<String>, price: f64, action: SignalAction) -> Self {
        Self {
            date: date.into(),
            price: Some(price),
            action,
            moving_average: None,
            percentage_change: None,
            stock: None,
        }
    }
}
