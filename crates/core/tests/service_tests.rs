// ═══════════════════════════════════════════════════════════════════
// Service Tests — SignalAnnotationBuilder, OperationRangeShapeBuilder,
// TradeTableProjector, CumulativeReturnDeriver, LayoutService
// ═══════════════════════════════════════════════════════════════════

use serde_json::{json, Map, Value};

use trade_chart_core::models::overlay::{AnnotationDescriptor, ShapeDescriptor};
use trade_chart_core::models::query::ChartType;
use trade_chart_core::models::record::{OperationSummary, Record, ScalarValue, TradeRecord};
use trade_chart_core::models::settings::ClientSettings;
use trade_chart_core::models::signal::{SignalAction, SignalEvent};
use trade_chart_core::services::annotation_service::{
    ActionStyle, SignalAnnotationBuilder, LONG_STYLE, OTHER_STYLE, SELL_STYLE, SHORT_STYLE,
};
use trade_chart_core::services::cumulative_return_service::{
    parse_percentage, CumulativeReturnDeriver,
};
use trade_chart_core::services::layout_service::LayoutService;
use trade_chart_core::services::shape_service::OperationRangeShapeBuilder;
use trade_chart_core::services::table_service::TradeTableProjector;

// ═══════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════

fn signal(date: &str, price: f64, action: SignalAction) -> SignalEvent {
    SignalEvent::new(date, price, action)
}

fn record(pairs: &[(&str, ScalarValue)]) -> TradeRecord {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn text(s: &str) -> ScalarValue {
    ScalarValue::Text(s.to_string())
}

fn operation(pairs: &[(&str, ScalarValue)]) -> OperationSummary {
    OperationSummary::new(record(pairs))
}

fn pnl_records(values: &[Option<&str>]) -> Vec<TradeRecord> {
    values
        .iter()
        .map(|v| {
            let mut r = Record::new();
            r.insert("stock".into(), text("AAPL"));
            if let Some(pct) = v {
                r.insert("pnl_pct".into(), text(pct));
            }
            r
        })
        .collect()
}

fn cumulative(records: &[TradeRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r["cumulative_return"].to_string())
        .collect()
}

// ═══════════════════════════════════════════════════════════════════
// SignalAnnotationBuilder
// ═══════════════════════════════════════════════════════════════════

mod annotations {
    use super::*;

    #[test]
    fn nothing_signals_are_skipped_and_order_kept() {
        let signals = vec![
            signal("2025-01-02", 10.0, SignalAction::Nothing),
            signal("2025-01-03", 11.0, SignalAction::Long),
            signal("2025-01-04", 12.0, SignalAction::Nothing),
            signal("2025-01-05", 9.0, SignalAction::Sell),
            signal("2025-01-06", 8.0, SignalAction::Short),
        ];
        let out = SignalAnnotationBuilder::new().build(&signals);
        let dates: Vec<&str> = out.iter().map(|a| a.x.as_str()).collect();
        assert_eq!(dates, vec!["2025-01-03", "2025-01-05", "2025-01-06"]);
        let labels: Vec<&str> = out.iter().map(|a| a.text.as_str()).collect();
        assert_eq!(labels, vec!["Long", "Sell", "Short"]);
    }

    #[test]
    fn output_length_matches_visible_count() {
        let actions = [
            SignalAction::Long,
            SignalAction::Nothing,
            SignalAction::Short,
            SignalAction::Other("Hold".into()),
            SignalAction::Nothing,
            SignalAction::Sell,
        ];
        let signals: Vec<SignalEvent> = actions
            .iter()
            .enumerate()
            .map(|(i, a)| signal(&format!("2025-02-{:02}", i + 1), 5.0, a.clone()))
            .collect();
        let visible = signals.iter().filter(|s| s.action != SignalAction::Nothing).count();
        assert_eq!(SignalAnnotationBuilder::new().build(&signals).len(), visible);
    }

    #[test]
    fn styling_by_action() {
        let signals = vec![
            signal("d1", 1.0, SignalAction::Long),
            signal("d2", 1.0, SignalAction::Sell),
            signal("d3", 1.0, SignalAction::Short),
            signal("d4", 1.0, SignalAction::Other("Hold".into())),
        ];
        let out = SignalAnnotationBuilder::new().build(&signals);

        assert_eq!(out[0].ay, -40);
        assert_eq!(out[0].font.color, "forestgreen");
        assert_eq!(out[1].ay, 40);
        assert_eq!(out[1].font.color, "firebrick");
        assert_eq!(out[2].ay, 40);
        assert_eq!(out[2].font.color, SHORT_STYLE.color);
        assert_eq!(out[3].ay, 0);
        assert_eq!(out[3].font.color, OTHER_STYLE.color);
        assert_eq!(out[3].text, "Hold");

        for a in &out {
            assert_eq!(a.arrowcolor, a.font.color);
            assert_eq!(a.ax, 0);
            assert!(a.showarrow);
        }
    }

    #[test]
    fn style_lookup_table() {
        assert_eq!(ActionStyle::for_action(&SignalAction::Long), LONG_STYLE);
        assert_eq!(ActionStyle::for_action(&SignalAction::Sell), SELL_STYLE);
        assert_eq!(ActionStyle::for_action(&SignalAction::Short), SHORT_STYLE);
        assert_eq!(
            ActionStyle::for_action(&SignalAction::Other("x".into())),
            OTHER_STYLE
        );
    }

    #[test]
    fn positioned_at_date_and_price() {
        let mut s = signal("2025-03-04", 123.456, SignalAction::Long);
        s.moving_average = Some(120.0);
        s.percentage_change = Some(2.5);
        let out = SignalAnnotationBuilder::new().build(&[s]);
        assert_eq!(out[0].x, "2025-03-04");
        assert_eq!(out[0].y, Some(123.456));
        assert_eq!(out[0].hovertext, "Price: 123.46<br>Avg: 120.00<br>Change: 2.50%");
    }

    #[test]
    fn same_date_signals_both_emitted() {
        let signals = vec![
            signal("2025-01-02", 10.0, SignalAction::Sell),
            signal("2025-01-02", 10.0, SignalAction::Long),
        ];
        let out = SignalAnnotationBuilder::new().build(&signals);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].text, "Sell");
        assert_eq!(out[1].text, "Long");
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(SignalAnnotationBuilder::new().build(&[]).is_empty());
    }

    #[test]
    fn serializes_in_layout_format() {
        let out = SignalAnnotationBuilder::new().build(&[signal("d", 1.0, SignalAction::Long)]);
        let value = serde_json::to_value(&out[0]).unwrap();
        assert_eq!(value["x"], json!("d"));
        assert_eq!(value["ay"], json!(-40));
        assert_eq!(value["font"]["color"], json!("forestgreen"));
        let back: AnnotationDescriptor = serde_json::from_value(value).unwrap();
        assert_eq!(back, out[0]);
    }
}

// ═══════════════════════════════════════════════════════════════════
// OperationRangeShapeBuilder
// ═══════════════════════════════════════════════════════════════════

mod shapes {
    use super::*;

    #[test]
    fn absent_operation_gives_nothing() {
        assert!(OperationRangeShapeBuilder::new().build(None).is_empty());
    }

    #[test]
    fn missing_either_date_gives_nothing() {
        let builder = OperationRangeShapeBuilder::new();
        let only_entry = operation(&[("first_operation_date", text("2025-01-02"))]);
        let only_exit = operation(&[("last_operation_date", text("2025-02-02"))]);
        let blank_exit = operation(&[
            ("first_operation_date", text("2025-01-02")),
            ("last_operation_date", text("")),
        ]);
        assert!(builder.build(Some(&only_entry)).is_empty());
        assert!(builder.build(Some(&only_exit)).is_empty());
        assert!(builder.build(Some(&blank_exit)).is_empty());
    }

    #[test]
    fn both_dates_give_entry_and_exit_lines() {
        let op = operation(&[
            ("first_operation_date", text("2025-01-02")),
            ("percent_change", ScalarValue::Number(4.2)),
            ("last_operation_date", text("2025-02-02")),
        ]);
        let shapes = OperationRangeShapeBuilder::new().build(Some(&op));
        assert_eq!(shapes.len(), 2);

        let entry = &shapes[0];
        assert_eq!(entry.x0, "2025-01-02");
        assert_eq!(entry.x1, "2025-01-02");
        assert_eq!(entry.line.color, "green");
        assert_eq!(entry.line.dash, "dash");

        let exit = &shapes[1];
        assert_eq!(exit.x0, "2025-02-02");
        assert_eq!(exit.line.color, "red");
        assert_eq!(exit.line.dash, "dot");

        for s in &shapes {
            assert_eq!(s.kind, "line");
            assert_eq!(s.yref, "paper");
            assert_eq!((s.y0, s.y1), (0.0, 1.0));
        }
    }

    #[test]
    fn dates_are_not_interpreted() {
        // Exit before entry, or non-date text: still two lines.
        let op = operation(&[("entryDate", text("later")), ("exitDate", text("earlier"))]);
        assert_eq!(OperationRangeShapeBuilder::new().build(Some(&op)).len(), 2);
    }

    #[test]
    fn serializes_type_key() {
        let shape = ShapeDescriptor::vertical_line("2025-01-02", "green", "dash");
        let value = serde_json::to_value(&shape).unwrap();
        assert_eq!(value["type"], json!("line"));
        assert_eq!(value["line"]["dash"], json!("dash"));
    }
}

// ═══════════════════════════════════════════════════════════════════
// TradeTableProjector
// ═══════════════════════════════════════════════════════════════════

mod trade_table {
    use super::*;

    #[test]
    fn empty_records_give_empty_table() {
        let table = TradeTableProjector::new().project(&[]);
        assert!(table.columns.is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn columns_come_from_first_record_with_stock_first() {
        let records = vec![record(&[
            ("entry_action", text("Long")),
            ("entry_date", text("2025-01-02")),
            ("stock", text("AAPL")),
            ("pnl_pct", ScalarValue::Number(3.5)),
        ])];
        let table = TradeTableProjector::new().project(&records);
        assert_eq!(table.columns, vec!["stock", "entry_action", "entry_date", "pnl_pct"]);
        assert_eq!(table.labels, vec!["Stock", "Entry Action", "Entry Date", "Pnl Pct"]);
        assert_eq!(table.rows[0]["pnl_pct"], "3.5");
    }

    #[test]
    fn without_instrument_column_order_is_discovery_order() {
        let records = vec![record(&[("b", text("1")), ("a", text("2"))])];
        let table = TradeTableProjector::new().project(&records);
        assert_eq!(table.columns, vec!["b", "a"]);
    }

    #[test]
    fn missing_keys_render_empty_and_extra_keys_are_ignored() {
        let records = vec![
            record(&[("stock", text("AAPL")), ("holding_days", ScalarValue::Number(4.0))]),
            record(&[("stock", text("MSFT")), ("surprise", text("x"))]),
        ];
        let table = TradeTableProjector::new().project(&records);
        assert_eq!(table.columns, vec!["stock", "holding_days"]);
        assert_eq!(table.rows[0]["holding_days"], "4");
        assert_eq!(table.rows[1]["holding_days"], "");
        assert!(!table.rows[1].contains_key("surprise"));
    }

    #[test]
    fn every_row_has_every_column_in_order() {
        let records = vec![
            record(&[("x", text("1")), ("stock", text("A")), ("y", ScalarValue::Null)]),
            record(&[("y", text("3"))]),
        ];
        let table = TradeTableProjector::new().project(&records);
        for row in &table.rows {
            let keys: Vec<&String> = row.keys().collect();
            assert_eq!(keys, table.columns.iter().collect::<Vec<_>>());
        }
        assert_eq!(table.rows[0]["y"], "");
    }

    #[test]
    fn summary_rows_cover_every_field() {
        let op = operation(&[
            ("first_operation_date", text("2025-01-02")),
            ("first_operation_price", ScalarValue::Number(100.0)),
            ("percent_change", ScalarValue::Number(12.34)),
            ("note", ScalarValue::Null),
        ]);
        let rows = TradeTableProjector::new().summarize(&op);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].label, "First Operation Date");
        assert_eq!(rows[0].value, "2025-01-02");
        assert_eq!(rows[1].value, "100");
        assert_eq!(rows[2].key, "percent_change");
        assert_eq!(rows[2].value, "12.34");
        assert_eq!(rows[3].value, "");
    }
}

// ═══════════════════════════════════════════════════════════════════
// CumulativeReturnDeriver
// ═══════════════════════════════════════════════════════════════════

mod cumulative_return {
    use super::*;

    #[test]
    fn compounds_period_returns() {
        let mut records = pnl_records(&[Some("10%"), Some("10%"), Some("-5%")]);
        CumulativeReturnDeriver::new().derive(&mut records, "pnl_pct", "cumulative_return");
        assert_eq!(cumulative(&records), vec!["110.00%", "121.00%", "114.95%"]);
    }

    #[test]
    fn missing_or_empty_value_keeps_previous_total() {
        let mut records = pnl_records(&[Some("10%"), None, Some(""), Some("10%")]);
        CumulativeReturnDeriver::new().derive(&mut records, "pnl_pct", "cumulative_return");
        assert_eq!(
            cumulative(&records),
            vec!["110.00%", "110.00%", "110.00%", "121.00%"]
        );
    }

    #[test]
    fn unparsable_value_is_neutral() {
        let mut records = pnl_records(&[Some("n/a"), Some("3.25%")]);
        CumulativeReturnDeriver::new().derive(&mut records, "pnl_pct", "cumulative_return");
        assert_eq!(cumulative(&records), vec!["100.00%", "103.25%"]);
    }

    #[test]
    fn target_column_is_appended_last() {
        let mut records = pnl_records(&[Some("1%")]);
        CumulativeReturnDeriver::new().derive(&mut records, "pnl_pct", "cumulative_return");
        assert_eq!(records[0].keys().last().map(|k| k.as_str()), Some("cumulative_return"));
    }

    #[test]
    fn empty_slice_is_fine() {
        let mut records: Vec<TradeRecord> = Vec::new();
        CumulativeReturnDeriver::new().derive(&mut records, "pnl_pct", "cumulative_return");
        assert!(records.is_empty());
    }

    #[test]
    fn percentage_parsing() {
        assert_eq!(parse_percentage(&text("10%")), Some(0.1));
        assert_eq!(parse_percentage(&text(" -5 % ")), Some(-0.05));
        assert_eq!(parse_percentage(&text("2.5")), Some(0.025));
        assert_eq!(parse_percentage(&ScalarValue::Number(50.0)), Some(0.5));
        assert_eq!(parse_percentage(&text("")), None);
        assert_eq!(parse_percentage(&text("abc%")), None);
        assert_eq!(parse_percentage(&text("inf%")), None);
        assert_eq!(parse_percentage(&ScalarValue::Null), None);
        assert_eq!(parse_percentage(&ScalarValue::Bool(true)), None);
    }

    #[test]
    fn default_fields_compound_raw_return_not_exit_entry_ratio() {
        // The server sends both the raw return and the exit/entry ratio.
        let mut records = vec![
            record(&[
                ("stock", text("AAPL")),
                ("entry_action", text("long")),
                ("entry_date", text("2025-01-02")),
                ("exit_date", text("2025-01-20")),
                ("pnl_pct", ScalarValue::Number(10.2)),
                ("pnl_percentage", text("110.2%")),
            ]),
            record(&[
                ("stock", text("AAPL")),
                ("entry_action", text("short")),
                ("entry_date", text("2025-02-03")),
                ("exit_date", text("2025-02-14")),
                ("pnl_pct", ScalarValue::Number(-3.0)),
                ("pnl_percentage", text("97.0%")),
            ]),
        ];
        let settings = ClientSettings::default();
        CumulativeReturnDeriver::new().derive(
            &mut records,
            &settings.cumulative_source_field,
            &settings.cumulative_target_field,
        );
        assert_eq!(cumulative(&records), vec!["110.20%", "106.89%"]);
        assert_eq!(records[0]["pnl_percentage"], text("110.2%"));
    }
}

// ═══════════════════════════════════════════════════════════════════
// LayoutService
// ═══════════════════════════════════════════════════════════════════

mod layout {
    use super::*;

    fn layout_from(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn base_layout_for_candlestick() {
        let mut layout = Map::new();
        LayoutService::new(50).apply_base_layout(&mut layout, ChartType::Candlestick);
        assert_eq!(layout["autosize"], json!(true));
        assert_eq!(layout["margin"]["t"], json!(50));
        assert_eq!(layout["xaxis"]["title"], json!("Date"));
        assert_eq!(layout["xaxis"]["type"], json!("category"));
        assert_eq!(layout["xaxis"]["rangeslider"]["visible"], json!(true));
        assert_eq!(layout["yaxis"]["title"], json!("Price"));
    }

    #[test]
    fn base_layout_for_line_hides_range_slider() {
        let mut layout = Map::new();
        LayoutService::default().apply_base_layout(&mut layout, ChartType::Line);
        assert_eq!(layout["xaxis"]["rangeslider"]["visible"], json!(false));
        assert_eq!(layout["xaxis"]["type"], json!("category"));
    }

    #[test]
    fn base_layout_keeps_server_keys() {
        let mut layout = layout_from(json!({
            "title": "Candlestick Chart for AAPL",
            "margin": {"l": 20, "t": 60},
            "xaxis": {"type": "date", "showgrid": false},
            "yaxis": "broken"
        }));
        LayoutService::new(40).apply_base_layout(&mut layout, ChartType::Line);
        assert_eq!(layout["title"], json!("Candlestick Chart for AAPL"));
        assert_eq!(layout["margin"], json!({"l": 20, "t": 40}));
        assert_eq!(layout["xaxis"]["showgrid"], json!(false));
        assert_eq!(layout["xaxis"]["type"], json!("category"));
        assert_eq!(layout["yaxis"], json!({"title": "Price"}));
    }

    #[test]
    fn overlays_replace_annotations_and_append_shapes() {
        let mut layout = layout_from(json!({
            "annotations": [{"text": "stale"}],
            "shapes": [{"type": "rect"}]
        }));
        let annotations =
            SignalAnnotationBuilder::new().build(&[signal("d1", 1.0, SignalAction::Long)]);
        let shapes = vec![
            ShapeDescriptor::vertical_line("d1", "green", "dash"),
            ShapeDescriptor::vertical_line("d2", "red", "dot"),
        ];
        LayoutService::default()
            .merge_overlays(&mut layout, &annotations, &shapes)
            .unwrap();

        let ann = layout["annotations"].as_array().unwrap();
        assert_eq!(ann.len(), 1);
        assert_eq!(ann[0]["text"], json!("Long"));

        let merged = layout["shapes"].as_array().unwrap();
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0], json!({"type": "rect"}));
        assert_eq!(merged[1]["x0"], json!("d1"));
        assert_eq!(merged[2]["line"]["color"], json!("red"));
    }

    #[test]
    fn overlays_on_empty_layout() {
        let mut layout = Map::new();
        LayoutService::default().merge_overlays(&mut layout, &[], &[]).unwrap();
        assert_eq!(layout["annotations"], json!([]));
        assert_eq!(layout["shapes"], json!([]));
    }
}
