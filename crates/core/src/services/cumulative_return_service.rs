use crate::models::record::{ScalarValue, TradeRecord};

/// Compounds per-trade percentages into a running cumulative return.
///
/// Each record's percentage `p` contributes a multiplier of `1 + p/100`;
/// missing or unparsable values contribute 1. The running product is written
/// back as a percentage with two decimals, so "10%", "10%", "-5%" gives
/// "110.00%", "121.00%", "114.95%".
pub struct CumulativeReturnDeriver;

impl CumulativeReturnDeriver {
    pub fn new() -> Self {
        Self
    }

    /// Add `target` to every record, in order.
    pub fn derive(&self, records: &mut [TradeRecord], source: &str, target: &str) {
        let mut running = RunningProduct::new();
        for record in records.iter_mut() {
            let rate = record.get(source).and_then(parse_percentage);
            let cumulative = running.apply(rate);
            record.insert(target.to_string(), ScalarValue::Text(cumulative));
        }
    }
}

impl Default for CumulativeReturnDeriver {
    fn default() -> Self {
        Self::new()
    }
}

struct RunningProduct(f64);

impl RunningProduct {
    fn new() -> Self {
        Self(1.0)
    }

    fn apply(&mut self, rate: Option<f64>) -> String {
        self.0 *= 1.0 + rate.unwrap_or(0.0);
        format!("{:.2}%", self.0 * 100.0)
    }
}

/// Parse a percentage cell into a fraction: "3.25%" → 0.0325, 10 → 0.10.
/// Returns `None` for blanks, nulls and anything that isn't a finite number.
pub fn parse_percentage(value: &ScalarValue) -> Option<f64> {
    let pct = match value {
        ScalarValue::Number(n) => *n,
        ScalarValue::Text(s) => {
            let s = s.trim();
            let s = s.strip_suffix('%').unwrap_or(s).trim();
            s.parse::<f64>().ok()?
        }
        ScalarValue::Null | ScalarValue::Bool(_) => return None,
    };
    pct.is_finite().then_some(pct / 100.0)
}
