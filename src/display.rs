use std::time::Duration;

/// Formats an elapsed run time with one decimal, e.g. `"12.3s"`.
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.1}s", elapsed.as_secs_f64())
}

/// Shortens `text` to at most `max_chars` characters, marking the cut with `...`.
pub fn truncate(text: &str, max_chars: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() <= max_chars {
        return single_line;
    }
    let keep = max_chars.saturating_sub(3);
    let mut shortened: String = single_line.chars().take(keep).collect();
    shortened.push_str("...");
    shortened
}

/// Prints column-aligned tabular output with headers and rows.
pub fn print_columns(headers: &[&str], rows: &[Vec<String>]) {
    print!("{}", render_columns(headers, rows));
}

/// Renders rows under `headers`, each column padded to its widest cell.
///
/// Columns are separated by two spaces. The last column has no trailing padding.
pub fn render_columns(headers: &[&str], rows: &[Vec<String>]) -> String {
    let col_count = headers.len();
    let mut widths = vec![0usize; col_count];

    for (i, header) in headers.iter().enumerate() {
        widths[i] = header.chars().count();
    }
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < col_count {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let mut out = render_row(headers, &widths);
    for row in rows {
        out.push_str(&render_row(row, &widths));
    }
    out
}

fn render_row(cells: &[impl AsRef<str>], widths: &[usize]) -> String {
    let last = cells.len().saturating_sub(1);
    let parts: Vec<String> = cells
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let cell = cell.as_ref();
            if i == last || i >= widths.len() {
                cell.to_string()
            } else {
                format!("{:<width$}", cell, width = widths[i])
            }
        })
        .collect();
    format!("{}\n", parts.join("  "))
}
