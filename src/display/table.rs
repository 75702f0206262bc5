//! Table formatting for consistent command output

use prettytable::{format, Cell, Row, Table};

/// Format a compact table with headers and rows using prettytable-rs clean format
///
/// Every line is indented by two spaces. An empty row set yields an empty string.
pub fn format_compact_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_CLEAN);

    if !headers.is_empty() {
        table.add_row(Row::new(headers.iter().map(|header| Cell::new(header)).collect()));
    }

    for row in rows {
        table.add_row(Row::new(row.iter().map(|cell| Cell::new(cell)).collect()));
    }

    indent(&table.to_string())
}

/// Two-column `label  value` listing without headers
pub fn format_key_values(pairs: &[(&str, String)]) -> String {
    let rows: Vec<Vec<String>> = pairs
        .iter()
        .map(|(key, value)| vec![format!("{}:", key), value.clone()])
        .collect();

    format_compact_table(&[], &rows)
}

fn indent(text: &str) -> String {
    let mut result = String::new();
    for line in text.lines() {
        result.push_str("  ");
        result.push_str(line.trim_end());
        result.push('\n');
    }
    result
}
