use crate::models::overlay::{AnnotationDescriptor, FontStyle};
use crate::models::signal::{SignalAction, SignalEvent};

/// Colour and label offset for one kind of signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionStyle {
    pub color: &'static str,
    /// Vertical label offset in pixels (negative = above the point)
    pub offset: i32,
}

pub const LONG_STYLE: ActionStyle = ActionStyle { color: "forestgreen", offset: -40 };
pub const SELL_STYLE: ActionStyle = ActionStyle { color: "firebrick", offset: 40 };
pub const SHORT_STYLE: ActionStyle = ActionStyle { color: "darkviolet", offset: 40 };
pub const OTHER_STYLE: ActionStyle = ActionStyle { color: "gray", offset: 0 };

impl ActionStyle {
    pub fn for_action(action: &SignalAction) -> Self {
        match action {
            SignalAction::Long => LONG_STYLE,
            SignalAction::Sell => SELL_STYLE,
            SignalAction::Short => SHORT_STYLE,
            SignalAction::Nothing | SignalAction::Other(_) => OTHER_STYLE,
        }
    }
}

/// Turns trade signals into chart annotations.
///
/// Signals are kept in input order; nothing is sorted or de-duplicated,
/// so two signals on the same date give two (overlapping) annotations.
/// `Nothing` signals are skipped.
pub struct SignalAnnotationBuilder;

impl SignalAnnotationBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, signals: &[SignalEvent]) -> Vec<AnnotationDescriptor> {
        signals
            .iter()
            .filter(|s| s.action.is_visible())
            .map(|s| self.annotate(s))
            .collect()
    }

    fn annotate(&self, signal: &SignalEvent) -> AnnotationDescriptor {
        let style = ActionStyle::for_action(&signal.action);
        AnnotationDescriptor {
            x: signal.date.clone(),
            y: signal.price,
            text: signal.action.to_string(),
            hovertext: hover_text(signal),
            showarrow: true,
            arrowhead: 2,
            arrowcolor: style.color.to_string(),
            ax: 0,
            ay: style.offset,
            font: FontStyle {
                color: style.color.to_string(),
            },
        }
    }
}

impl Default for SignalAnnotationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn hover_text(signal: &SignalEvent) -> String {
    let mut parts = Vec::with_capacity(4);
    if let Some(stock) = &signal.stock {
        parts.push(stock.clone());
    }
    parts.push(format!("Price: {}", fmt_number(signal.price)));
    parts.push(format!("Avg: {}", fmt_number(signal.moving_average)));
    if let Some(change) = signal.percentage_change {
        parts.push(format!("Change: {change:.2}%"));
    }
    parts.join("<br>")
}

fn fmt_number(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "n/a".to_string(),
    }
}
