//! Visualization field inference.
//!
//! Turns an arbitrary tabular result, with unknown column names and types,
//! into a consistent category/value/series field mapping and chart-ready
//! tuples. Pure functions over [`TabularResult`]; the chart rendering
//! itself is a consumer, not part of this crate.

use crate::result::{ResultRow, TabularResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How a result is displayed.
///
/// Purely presentational: switching the mode never changes the inferred
/// field selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartMode {
    #[default]
    Table,
    Line,
    Column,
    Bar,
    Pie,
}

/// The chosen category/value/series fields and chart mode for a result.
///
/// Invariant: every field names a column present in the result the
/// selection was derived from; [`revalidate`] restores the invariant when
/// the column set changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizationSelection {
    /// Column plotted on the category axis.
    pub category_field: String,
    /// Column providing the numeric values.
    pub value_field: String,
    /// Optional column splitting the data into series.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_field: Option<String>,
    /// Current display mode.
    #[serde(default)]
    pub mode: ChartMode,
}

/// One chart-ready tuple projected from a result row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    /// Category axis value, rendered as text.
    pub category_value: String,
    /// Numeric value; `NaN` when the cell did not coerce. Rows are never
    /// dropped here; rendering filters the sentinel.
    pub numeric_value: f64,
    /// Series label, when a series field is selected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_value: Option<String>,
}

impl ChartPoint {
    /// Whether the numeric value coerced successfully.
    pub fn is_numeric(&self) -> bool {
        self.numeric_value.is_finite()
    }
}

/// Classification of a column by its reference-row value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    NumericLike,
    CategoricalLike,
}

/// Classifies a scalar: numeric-like if it is a number or a string that
/// fully parses to a finite number, categorical-like otherwise.
fn classify(value: &Value) -> FieldKind {
    match value {
        Value::Number(n) => {
            if n.as_f64().map(f64::is_finite).unwrap_or(false) {
                FieldKind::NumericLike
            } else {
                FieldKind::CategoricalLike
            }
        }
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(parsed) if parsed.is_finite() => FieldKind::NumericLike,
            _ => FieldKind::CategoricalLike,
        },
        _ => FieldKind::CategoricalLike,
    }
}

/// Coerces a cell to a number, yielding `NaN` when it cannot.
fn coerce_numeric(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

/// Renders a cell as category/series text.
fn coerce_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Classifies each column of the reference (first) row, in column order.
fn classified_columns(row: &ResultRow) -> Vec<(String, FieldKind)> {
    row.iter()
        .map(|(name, value)| (name.clone(), classify(value)))
        .collect()
}

/// Infers the default field selection for a result.
///
/// Policy, in column order of the first row:
/// - category: first categorical-like column, else the first column;
/// - value: first numeric-like column other than the category, else the
///   first column other than the category, else the category itself, so
///   with two or more columns category and value always differ;
/// - series: second categorical-like column, if one exists.
///
/// Returns `None` when the result has no rows to infer from.
pub fn infer_selection(result: &TabularResult) -> Option<VisualizationSelection> {
    let first_row = result.rows.as_ref()?.first()?;
    let columns = classified_columns(first_row);
    Some(default_selection(&columns, ChartMode::default()))
}

fn default_selection(columns: &[(String, FieldKind)], mode: ChartMode) -> VisualizationSelection {
    let category_field = columns
        .iter()
        .find(|(_, kind)| *kind == FieldKind::CategoricalLike)
        .map(|(name, _)| name.clone())
        .unwrap_or_else(|| columns[0].0.clone());

    let value_field = columns
        .iter()
        .find(|(name, kind)| *kind == FieldKind::NumericLike && *name != category_field)
        .or_else(|| columns.iter().find(|(name, _)| *name != category_field))
        .map(|(name, _)| name.clone())
        .unwrap_or_else(|| category_field.clone());

    let series_field = columns
        .iter()
        .filter(|(_, kind)| *kind == FieldKind::CategoricalLike)
        .nth(1)
        .map(|(name, _)| name.clone());

    VisualizationSelection {
        category_field,
        value_field,
        series_field,
        mode,
    }
}

/// Revalidates a selection against a result whose column set may have
/// changed.
///
/// Fields still present in the new column set are preserved; this is
/// what keeps a manual override alive across compatible results. Fields
/// that no longer resolve are recomputed by the default policy. The
/// display mode always carries over. Returns `None` when the new result
/// has no rows.
pub fn revalidate(
    selection: &VisualizationSelection,
    result: &TabularResult,
) -> Option<VisualizationSelection> {
    let first_row = result.rows.as_ref()?.first()?;
    let columns = classified_columns(first_row);
    let defaults = default_selection(&columns, selection.mode);
    let has = |name: &str| columns.iter().any(|(n, _)| n == name);

    let category_field = if has(&selection.category_field) {
        selection.category_field.clone()
    } else {
        defaults.category_field
    };
    let value_field = if has(&selection.value_field) {
        selection.value_field.clone()
    } else {
        defaults.value_field
    };
    let series_field = match &selection.series_field {
        Some(name) if has(name) => Some(name.clone()),
        Some(_) => defaults.series_field,
        None => None,
    };

    Some(VisualizationSelection {
        category_field,
        value_field,
        series_field,
        mode: selection.mode,
    })
}

/// Projects a result through a selection into chart-ready tuples.
///
/// One tuple per row, in row order. Cells that fail numeric coercion
/// yield `NaN` rather than dropping the row.
pub fn project(result: &TabularResult, selection: &VisualizationSelection) -> Vec<ChartPoint> {
    let Some(rows) = result.rows.as_ref() else {
        return Vec::new();
    };
    rows.iter()
        .map(|row| ChartPoint {
            category_value: coerce_text(row.get(&selection.category_field)),
            numeric_value: coerce_numeric(row.get(&selection.value_field)),
            series_value: selection
                .series_field
                .as_ref()
                .map(|field| coerce_text(row.get(field))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(rows: Vec<serde_json::Value>) -> TabularResult {
        TabularResult::ok(
            rows.into_iter()
                .map(|v| match v {
                    serde_json::Value::Object(map) => map,
                    other => panic!("expected object row, got {other}"),
                })
                .collect(),
        )
    }

    #[test]
    fn test_month_total_inference() {
        let result = result(vec![
            json!({"month": "2024-01", "total": 120}),
            json!({"month": "2024-02", "total": 95}),
        ]);
        let selection = infer_selection(&result).unwrap();
        assert_eq!(selection.category_field, "month");
        assert_eq!(selection.value_field, "total");
        assert!(selection.series_field.is_none());

        let points = project(&result, &selection);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].category_value, "2024-01");
        assert_eq!(points[0].numeric_value, 120.0);
        assert_eq!(points[1].category_value, "2024-02");
        assert_eq!(points[1].numeric_value, 95.0);
    }

    #[test]
    fn test_two_columns_never_collide() {
        // All-numeric, all-categorical, and mixed: category != value.
        let cases = vec![
            vec![json!({"a": 1, "b": 2})],
            vec![json!({"x": "p", "y": "q"})],
            vec![json!({"n": 3, "label": "l"})],
        ];
        for rows in cases {
            let result = result(rows);
            let selection = infer_selection(&result).unwrap();
            assert_ne!(selection.category_field, selection.value_field);
        }
    }

    #[test]
    fn test_single_column_resolves_to_itself() {
        let result = result(vec![json!({"only": 5})]);
        let selection = infer_selection(&result).unwrap();
        assert_eq!(selection.category_field, "only");
        assert_eq!(selection.value_field, "only");
    }

    #[test]
    fn test_numeric_strings_count_as_numeric() {
        let result = result(vec![json!({"region": "north", "amount": "120.5"})]);
        let selection = infer_selection(&result).unwrap();
        assert_eq!(selection.value_field, "amount");
        let points = project(&result, &selection);
        assert_eq!(points[0].numeric_value, 120.5);
    }

    #[test]
    fn test_second_categorical_becomes_series() {
        let result = result(vec![
            json!({"month": "2024-01", "region": "north", "total": 10}),
        ]);
        let selection = infer_selection(&result).unwrap();
        assert_eq!(selection.category_field, "month");
        assert_eq!(selection.series_field.as_deref(), Some("region"));
        assert_eq!(selection.value_field, "total");
    }

    #[test]
    fn test_revalidate_preserves_valid_override() {
        let first = result(vec![json!({"month": "m", "region": "r", "total": 1})]);
        let mut selection = infer_selection(&first).unwrap();
        // Manual override: plot by region instead of month.
        selection.category_field = "region".to_string();
        selection.mode = ChartMode::Pie;

        // Same column set: override survives.
        let same = revalidate(&selection, &first).unwrap();
        assert_eq!(same.category_field, "region");
        assert_eq!(same.mode, ChartMode::Pie);

        // Column gone: recomputed by default policy, mode kept.
        let changed = result(vec![json!({"month": "m", "total": 1})]);
        let recomputed = revalidate(&selection, &changed).unwrap();
        assert_eq!(recomputed.category_field, "month");
        assert_eq!(recomputed.mode, ChartMode::Pie);
    }

    #[test]
    fn test_projection_keeps_uncoercible_rows() {
        let result = result(vec![
            json!({"k": "a", "v": 1}),
            json!({"k": "b", "v": "not a number"}),
            json!({"k": "c", "v": 3}),
        ]);
        let selection = infer_selection(&result).unwrap();
        let points = project(&result, &selection);
        assert_eq!(points.len(), 3);
        assert!(points[0].is_numeric());
        assert!(!points[1].is_numeric());
        assert!(points[2].is_numeric());
    }

    #[test]
    fn test_no_rows_yields_no_selection() {
        let empty = TabularResult::ok(vec![]);
        assert!(infer_selection(&empty).is_none());
        assert!(infer_selection(&TabularResult::failed("boom")).is_none());
    }
}
