use serde_json::{json, Map, Value};

use crate::errors::ChartError;
use crate::models::overlay::{AnnotationDescriptor, ShapeDescriptor};
use crate::models::query::ChartType;

/// Owns the layout keys the page controls, on top of whatever the server sent.
pub struct LayoutService {
    margin_top: u32,
}

impl LayoutService {
    pub fn new(margin_top: u32) -> Self {
        Self { margin_top }
    }

    /// Force autosize, the top margin, axis titles and a categorical x axis.
    /// The range slider is shown for candlestick charts only.
    ///
    /// Other keys of `margin`, `xaxis` and `yaxis` are preserved.
    pub fn apply_base_layout(&self, layout: &mut Map<String, Value>, chart_type: ChartType) {
        layout.insert("autosize".into(), Value::Bool(true));

        update_object(layout, "margin", |margin| {
            margin.insert("t".into(), json!(self.margin_top));
        });
        update_object(layout, "xaxis", |xaxis| {
            xaxis.insert("title".into(), json!("Date"));
            // Dates are categories so non-trading days leave no gaps
            xaxis.insert("type".into(), json!("category"));
            xaxis.insert(
                "rangeslider".into(),
                json!({ "visible": chart_type.shows_range_slider() }),
            );
        });
        update_object(layout, "yaxis", |yaxis| {
            yaxis.insert("title".into(), json!("Price"));
        });
    }

    /// Install signal annotations and operation shapes.
    ///
    /// `annotations` replaces any previous value; `shapes` are appended to the
    /// shapes already present in the layout.
    pub fn merge_overlays(
        &self,
        layout: &mut Map<String, Value>,
        annotations: &[AnnotationDescriptor],
        shapes: &[ShapeDescriptor],
    ) -> Result<(), ChartError> {
        layout.insert("annotations".into(), serde_json::to_value(annotations)?);

        let mut merged = match layout.remove("shapes") {
            Some(Value::Array(existing)) => existing,
            _ => Vec::new(),
        };
        for shape in shapes {
            merged.push(serde_json::to_value(shape)?);
        }
        layout.insert("shapes".into(), Value::Array(merged));
        Ok(())
    }
}

impl Default for LayoutService {
    fn default() -> Self {
        Self::new(50)
    }
}

/// Run `f` on the object stored under `key`, creating it (or replacing a
/// non-object value) first.
fn update_object(
    layout: &mut Map<String, Value>,
    key: &str,
    f: impl FnOnce(&mut Map<String, Value>),
) {
    let mut object = match layout.remove(key) {
        Some(Value::Object(existing)) => existing,
        _ => Map::new(),
    };
    f(&mut object);
    layout.insert(key.to_string(), Value::Object(object));
}
