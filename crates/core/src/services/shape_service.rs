use crate::models::overlay::ShapeDescriptor;
use crate::models::record::OperationSummary;

pub const ENTRY_LINE_COLOR: &str = "green";
pub const ENTRY_LINE_DASH: &str = "dash";
pub const EXIT_LINE_COLOR: &str = "red";
pub const EXIT_LINE_DASH: &str = "dot";

/// Marks the highlighted operation's entry and exit on the chart.
pub struct OperationRangeShapeBuilder;

impl OperationRangeShapeBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Two full-height vertical lines (entry, then exit), or nothing when the
    /// operation is absent or either date is missing/empty.
    pub fn build(&self, operation: Option<&OperationSummary>) -> Vec<ShapeDescriptor> {
        let Some(op) = operation else {
            return Vec::new();
        };
        match (op.entry_date(), op.exit_date()) {
            (Some(entry), Some(exit)) => vec![
                ShapeDescriptor::vertical_line(entry, ENTRY_LINE_COLOR, ENTRY_LINE_DASH),
                ShapeDescriptor::vertical_line(exit, EXIT_LINE_COLOR, EXIT_LINE_DASH),
            ],
            _ => Vec::new(),
        }
    }
}

impl Default for OperationRangeShapeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
