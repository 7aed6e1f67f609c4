use super::types::*;

/// Proposes charts from column types alone. Time-series and category rules
/// always both run; the area and table fallbacks only fire when nothing
/// else matched.
pub fn suggest_charts(profiles: &[ColumnProfile]) -> Vec<ChartSuggestion> {
    let columns_of = |wanted: ColumnType| {
        profiles
            .iter()
            .filter(|p| p.column_type == wanted)
            .map(|p| p.column.as_str())
            .collect::<Vec<_>>()
    };
    let date_columns = columns_of(ColumnType::Date);
    let numeric_columns = columns_of(ColumnType::Number);
    let text_columns = columns_of(ColumnType::String);

    let mut suggestions = Vec::new();

    for date in &date_columns {
        for numeric in &numeric_columns {
            suggestions.push(paired(ChartType::Line, date, numeric, "time series"));
        }
    }

    for category in &text_columns {
        for numeric in &numeric_columns {
            suggestions.push(paired(ChartType::Bar, category, numeric, "category comparison"));
        }
    }

    if suggestions.is_empty() {
        if let [first, second, ..] = numeric_columns.as_slice() {
            suggestions.push(ChartSuggestion {
                chart_type: ChartType::Area,
                label: format!("{} vs {}", first, second),
                x_axis: Some(first.to_string()),
                y_axis: Axis::Column(second.to_string()),
                description: "direct comparison".to_string(),
            });
        }
    }

    if suggestions.is_empty() {
        suggestions.push(ChartSuggestion {
            chart_type: ChartType::Table,
            label: "Data table".to_string(),
            x_axis: None,
            y_axis: Axis::Columns(profiles.iter().map(|p| p.column.clone()).collect()),
            description: "basic exploration".to_string(),
        });
    }

    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

fn paired(chart_type: ChartType, x: &str, y: &str, description: &str) -> ChartSuggestion {
    ChartSuggestion {
        chart_type,
        label: format!("{} by {}", y, x),
        x_axis: Some(x.to_string()),
        y_axis: Axis::Column(y.to_string()),
        description: description.to_string(),
    }
}
