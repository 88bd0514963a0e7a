use serde_json::{Map, Value};

use crate::domain::entities::column::{ColumnDescriptor, Record, Row};
use crate::domain::entities::page::EntityId;
use crate::usecase::ports::cache::RecordCache;

/// Escapes a string for safe insertion into HTML, covering the same
/// characters as the templating layer the grid renders with.
pub fn escape_expression(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '`' => escaped.push_str("&#x60;"),
            '=' => escaped.push_str("&#x3D;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn cell_value(record: &Record, label: &str) -> Value {
    match record.get(label) {
        None | Some(Value::Null) => Value::String(String::new()),
        Some(Value::String(text)) => Value::String(escape_expression(text)),
        Some(other) => other.clone(),
    }
}

/// Builds one row, cells placed left to right in descriptor order.
pub fn record_to_row(record: &Record, columns: &[ColumnDescriptor]) -> Row {
    let mut cells = Map::with_capacity(columns.len());
    for column in columns {
        cells.insert(
            column.output_key().to_string(),
            cell_value(record, &column.label),
        );
    }
    Row(cells)
}

/// Converts the server's id list into display rows. Row order follows
/// `ids`; ids the cache cannot answer for are skipped, so the result may be
/// shorter than the input.
pub fn translate(
    ids: &[EntityId],
    columns: &[ColumnDescriptor],
    cache: Option<&dyn RecordCache>,
) -> Vec<Row> {
    let Some(cache) = cache else {
        return Vec::new();
    };
    ids.iter()
        .filter_map(|id| cache.get(*id))
        .map(|record| record_to_row(&record, columns))
        .collect()
}
