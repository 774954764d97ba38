//! Render a result set as a text table. Pure formatting; no I/O.

use serde_json::Value;

use crate::rows::ResultSet;

/// Combine the statement that was run with a table rendering of its
/// result. Headers are drawn from the declared columns, so an empty result
/// still shows its column names.
pub fn render_answer(sql: &str, result: &ResultSet) -> String {
    format!("{sql}\n\n{}", render_table(result))
}

fn render_table(result: &ResultSet) -> String {
    let headers = &result.columns;

    let string_rows: Vec<Vec<String>> = result
        .records
        .iter()
        .map(|record| {
            headers
                .iter()
                .map(|column| record.get(column).map_or_else(String::new, cell_text))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(String::len).collect();
    for row in &string_rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let mut output = String::new();

    if !headers.is_empty() {
        border(&mut output, &widths, '┌', '┬', '┐');
        row_line(&mut output, headers, &widths);
        border(&mut output, &widths, '├', '┼', '┤');
        for row in &string_rows {
            row_line(&mut output, row, &widths);
        }
        border(&mut output, &widths, '└', '┴', '┘');
    }

    let count = string_rows.len();
    let label = if count == 1 { "row" } else { "rows" };
    output.push_str(&format!("({count} {label})"));
    output
}

fn border(output: &mut String, widths: &[usize], left: char, middle: char, right: char) {
    output.push(left);
    for (i, width) in widths.iter().enumerate() {
        output.push_str(&"─".repeat(width + 2));
        output.push(if i == widths.len() - 1 { right } else { middle });
    }
    output.push('\n');
}

fn row_line<S: AsRef<str>>(output: &mut String, cells: &[S], widths: &[usize]) {
    output.push('│');
    for (i, cell) in cells.iter().enumerate() {
        output.push(' ');
        output.push_str(&format!("{:width$}", cell.as_ref(), width = widths[i]));
        output.push(' ');
        output.push('│');
    }
    output.push('\n');
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
