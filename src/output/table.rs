//! Bordered table rendering.

use super::cell_text;
use crate::service::ResultSet;
use unicode_width::UnicodeWidthStr;

/// Renders the header and all rows as a box-drawn table.
///
/// Short rows are padded with `null`. Columns beyond the metadata get an empty
/// header. Returns an empty string when there is nothing to lay out.
pub fn render_table(result: &ResultSet) -> String {
    let column_count = result
        .rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(result.columns.len()))
        .max()
        .unwrap_or(0);
    if column_count == 0 {
        return String::new();
    }

    let header: Vec<&str> = (0..column_count)
        .map(|i| result.columns.get(i).map(|c| c.name.as_str()).unwrap_or(""))
        .collect();
    let rows: Vec<Vec<&str>> = result
        .rows
        .iter()
        .map(|row| {
            (0..column_count)
                .map(|i| cell_text(row.get(i).and_then(Option::as_ref)))
                .collect()
        })
        .collect();

    // Terminal columns, so wide (CJK) characters count twice.
    let mut widths: Vec<usize> = header.iter().map(|h| h.width()).collect();
    for row in &rows {
        for (width, value) in widths.iter_mut().zip(row) {
            *width = (*width).max(value.width());
        }
    }

    let mut output = String::new();
    push_border(&mut output, &widths, ('┌', '┬', '┐'));
    push_row(&mut output, &widths, &header);
    push_border(&mut output, &widths, ('├', '┼', '┤'));
    for row in &rows {
        push_row(&mut output, &widths, row);
    }
    push_border(&mut output, &widths, ('└', '┴', '┘'));
    output
}

fn push_border(output: &mut String, widths: &[usize], (left, mid, right): (char, char, char)) {
    output.push(left);
    for (idx, width) in widths.iter().enumerate() {
        output.push_str(&"─".repeat(width + 2));
        output.push(if idx == widths.len() - 1 { right } else { mid });
    }
    output.push('\n');
}

fn push_row(output: &mut String, widths: &[usize], values: &[&str]) {
    output.push('│');
    for (value, width) in values.iter().zip(widths) {
        output.push(' ');
        output.push_str(value);
        output.push_str(&" ".repeat(width.saturating_sub(value.width())));
        output.push_str(" │");
    }
    output.push('\n');
}
