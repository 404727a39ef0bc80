pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Result fields that hold one row per event, period, scheme or holding.
const ROW_KEYS: [&str; 4] = ["events", "periods", "schemes", "holdings"];

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The row array of a result object, if it carries one.
pub(crate) fn row_array(result: &Map<String, Value>) -> Option<(&'static str, &[Value])> {
    ROW_KEYS.iter().find_map(|key| match result.get(*key) {
        Some(Value::Array(rows)) => Some((*key, rows.as_slice())),
        _ => None,
    })
}
