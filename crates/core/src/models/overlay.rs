use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Font settings of an annotation label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontStyle {
    pub color: String,
}

/// One arrow-and-label annotation, in the chart library's layout format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationDescriptor {
    pub x: String,
    pub y: Option<f64>,
    pub text: String,
    pub hovertext: String,
    pub showarrow: bool,
    pub arrowhead: u8,
    pub arrowcolor: String,
    /// Horizontal label offset in pixels
    pub ax: i32,
    /// Vertical label offset in pixels; negative puts the label above the point
    pub ay: i32,
    pub font: FontStyle,
}

/// Stroke settings of a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: String,
    pub width: u8,
    pub dash: String,
}

/// A layout shape. Only full-height vertical lines are produced here:
/// `x` in data coordinates, `y` spanning the plot area (`paper` 0..1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeDescriptor {
    #[serde(rename = "type")]
    pub kind: String,
    pub xref: String,
    pub yref: String,
    pub x0: String,
    pub x1: String,
    pub y0: f64,
    pub y1: f64,
    pub line: LineStyle,
}

impl ShapeDescriptor {
    pub fn vertical_line(x: impl Into<String>, color: &str, dash: &str) -> Self {
        let x = x.into();
        Self {
            kind: "line".into(),
            xref: "x".into(),
            yref: "paper".into(),
            x0: x.clone(),
            x1: x,
            y0: 0.0,
            y1: 1.0,
            line: LineStyle {
                color: color.into(),
                width: 2,
                dash: dash.into(),
            },
        }
    }
}

/// Display values of one table row, keyed by column name.
pub type TableRow = IndexMap<String, String>;

/// The trade table as handed to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeTable {
    /// Field names in display order
    pub columns: Vec<String>,
    /// Human-readable header for each entry of `columns`
    pub labels: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl TradeTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One line of the operation-summary table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub key: String,
    pub label: String,
    pub value: String,
}
