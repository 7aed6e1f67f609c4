use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use dataset_insights::services::analysis::{
    analyse_at, detect_column_type, Axis, ChartType, ColumnSummary, ColumnType, Granularity,
};
use dataset_insights::{CellValue, Row};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()
}

fn rows_from(value: serde_json::Value) -> Vec<Row> {
    serde_json::from_value(value).expect("rows")
}

#[test]
fn quantity_and_date_columns() {
    let rows = rows_from(json!([
        {"qty": 5, "date": "2024-01-01"},
        {"qty": 7, "date": "2024-02-01"}
    ]));
    let analysis = analyse_at(&rows, now());
    assert_eq!(analysis.row_count, 2);
    assert_eq!(analysis.columns.len(), 2);

    let qty = &analysis.columns[0];
    assert_eq!(qty.column, "qty");
    assert_eq!(qty.column_type, ColumnType::Number);
    match &qty.summary {
        ColumnSummary::Numeric(s) => {
            assert_eq!((s.min, s.max, s.sum, s.average, s.count), (5.0, 7.0, 12.0, 6.0, 2));
        }
        other => panic!("expected numeric summary, got {:?}", other),
    }

    let date = &analysis.columns[1];
    assert_eq!(date.column_type, ColumnType::Date);
    match &date.summary {
        ColumnSummary::Date(s) => {
            assert_eq!(s.start, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
            assert_eq!(s.end, Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
            // 31 days is more than 30
            assert_eq!(s.granularity, Granularity::Week);
        }
        other => panic!("expected date summary, got {:?}", other),
    }

    assert_eq!(analysis.chart_suggestions.len(), 1);
    assert_eq!(analysis.chart_suggestions[0].chart_type, ChartType::Line);
    assert_eq!(analysis.chart_suggestions[0].label, "qty by date");
}

#[test]
fn first_row_key_order_survives_json_values() {
    let from_value = rows_from(json!([{"qty": 5, "date": "2024-01-01", "area": "north"}]));
    let from_str: Vec<Row> =
        serde_json::from_str(r#"[{"qty": 5, "date": "2024-01-01", "area": "north"}]"#).unwrap();

    let names = |rows: &[Row]| -> Vec<String> {
        analyse_at(rows, now()).columns.into_iter().map(|c| c.column).collect()
    };
    assert_eq!(names(&from_value), vec!["qty", "date", "area"]);
    assert_eq!(names(&from_value), names(&from_str));
}

#[test]
fn all_empty_column_is_string() {
    let rows = vec![Row::new().with("x", CellValue::Null)];
    let analysis = analyse_at(&rows, now());
    let x = &analysis.columns[0];
    assert_eq!(x.column_type, ColumnType::String);
    assert_eq!(x.empty_values, 1);
    assert_eq!(x.unique_values, 0);
    assert!(x.sample_values.is_empty());
    match &x.summary {
        ColumnSummary::Categorical(s) => assert!(s.top_values.is_empty()),
        other => panic!("expected categorical summary, got {:?}", other),
    }
}

#[test]
fn category_with_measure_only_suggests_bars() {
    let rows = rows_from(json!([
        {"region": "north", "sales": 10},
        {"region": "south", "sales": 4},
        {"region": "north", "sales": "12.5"}
    ]));
    let analysis = analyse_at(&rows, now());
    assert!(!analysis.chart_suggestions.is_empty());
    assert!(analysis
        .chart_suggestions
        .iter()
        .all(|s| s.chart_type == ChartType::Bar));
    assert_eq!(analysis.chart_suggestions[0].label, "sales by region");
}

#[test]
fn two_measures_get_one_area_chart() {
    let rows = rows_from(json!([
        {"height": 180, "weight": 80},
        {"height": 165, "weight": 60}
    ]));
    let analysis = analyse_at(&rows, now());
    assert_eq!(analysis.chart_suggestions.len(), 1);
    let area = &analysis.chart_suggestions[0];
    assert_eq!(area.chart_type, ChartType::Area);
    assert_eq!(area.x_axis.as_deref(), Some("height"));
    assert_eq!(area.y_axis, Axis::Column("weight".into()));
    assert_eq!(area.description, "direct comparison");
}

#[test]
fn empty_dataset_gets_a_bare_table() {
    let analysis = analyse_at(&[], now());
    assert_eq!(analysis.row_count, 0);
    assert!(analysis.columns.is_empty());
    assert_eq!(analysis.chart_suggestions.len(), 1);
    assert_eq!(analysis.chart_suggestions[0].chart_type, ChartType::Table);
    assert_eq!(analysis.chart_suggestions[0].y_axis, Axis::Columns(vec![]));
}

#[test]
fn counts_and_summaries_hold_invariants() {
    let rows = rows_from(json!([
        {"id": 1, "city": "Oslo", "when": "2023-01-01", "score": "9"},
        {"id": 2, "city": "", "when": "2023-06-01", "score": null},
        {"id": 3, "city": "Oslo", "when": null, "score": "x"},
        {"id": 4, "city": "Bergen", "score": "3.5"},
        {"id": 5, "city": "Oslo", "when": "2025-03-01", "score": 12}
    ]));
    let analysis = analyse_at(&rows, now());
    assert_eq!(analysis.columns.len(), 4);

    for profile in &analysis.columns {
        let meaningful = rows
            .iter()
            .filter(|row| row.get(&profile.column).map_or(false, CellValue::is_meaningful))
            .count();
        assert_eq!(profile.empty_values + meaningful, rows.len(), "{}", profile.column);
        assert!(profile.sample_values.len() <= 5);

        match &profile.summary {
            ColumnSummary::Numeric(s) if s.count > 0 => {
                assert!(s.min <= s.average && s.average <= s.max);
            }
            ColumnSummary::Date(s) => assert!(s.start <= s.end),
            ColumnSummary::Categorical(s) => {
                assert!(s.top_values.len() <= 5);
                assert!(s.top_values.windows(2).all(|w| w[0].count >= w[1].count));
                let total: usize = s.top_values.iter().map(|v| v.count).sum();
                assert!(total <= meaningful);
            }
            _ => {}
        }
    }

    let when = &analysis.columns[2];
    assert_eq!(when.column_type, ColumnType::Date);
    assert_eq!(when.empty_values, 2);
    match &when.summary {
        ColumnSummary::Date(s) => assert_eq!(s.granularity, Granularity::Year),
        other => panic!("expected date summary, got {:?}", other),
    }

    // 3 of 4 meaningful scores coerce: below the 80% bar
    let score = &analysis.columns[3];
    assert_eq!(score.column_type, ColumnType::String);
    assert_eq!(detect_column_type(&[CellValue::from("9"), CellValue::from("x")]), ColumnType::String);

    let city = &analysis.columns[1];
    match &city.summary {
        ColumnSummary::Categorical(s) => {
            assert_eq!(s.top_values[0].value, "Oslo");
            assert_eq!(s.top_values[0].count, 3);
        }
        other => panic!("expected categorical summary, got {:?}", other),
    }
}

#[test]
fn serializes_with_camel_case_fields() {
    let rows = rows_from(json!([{"qty": 5, "date": "2024-01-01"}]));
    let value = serde_json::to_value(analyse_at(&rows, now())).unwrap();

    assert_eq!(value["rowCount"], json!(1));
    assert_eq!(value["columns"][0]["type"], json!("number"));
    assert_eq!(value["columns"][0]["emptyValues"], json!(0));
    assert_eq!(value["columns"][0]["sampleValues"], json!([5.0]));
    assert_eq!(
        value["columns"][1]["summary"],
        json!({
            "start": "2024-01-01T00:00:00.000Z",
            "end": "2024-01-01T00:00:00.000Z",
            "granularity": "day"
        })
    );
    assert_eq!(
        value["chartSuggestions"][0],
        json!({
            "type": "line",
            "label": "qty by date",
            "xAxis": "date",
            "yAxis": "qty",
            "description": "time series"
        })
    );
}

#[test]
fn repeated_analysis_is_identical() {
    let rows = rows_from(json!([
        {"a": "x", "b": 1, "c": "2024-01-01", "d": 2},
        {"a": "y", "b": 2, "c": "2024-05-01", "d": 3}
    ]));
    let first = serde_json::to_string(&analyse_at(&rows, now())).unwrap();
    let second = serde_json::to_string(&analyse_at(&rows, now())).unwrap();
    assert_eq!(first, second);
}
