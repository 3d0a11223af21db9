use super::Table;

/// Render a table as right-aligned columns with a leading row number.
pub(super) fn render(table: &Table) -> String {
    let index: Vec<String> = (0..table.rows.len()).map(|i| i.to_string()).collect();
    let index_width = index.iter().map(String::len).max().unwrap_or(0);

    let widths: Vec<usize> = table
        .headers
        .iter()
        .enumerate()
        .map(|(c, h)| {
            table
                .rows
                .iter()
                .map(|row| row[c].chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    out.push_str(&" ".repeat(index_width));
    for (h, w) in table.headers.iter().zip(&widths) {
        out.push_str(&format!("  {:>w$}", h, w = *w));
    }
    out.push('\n');

    for (i, row) in table.rows.iter().enumerate() {
        out.push_str(&format!("{:<w$}", index[i], w = index_width));
        for (v, w) in row.iter().zip(&widths) {
            out.push_str(&format!("  {:>w$}", v, w = *w));
        }
        out.push('\n');
    }
    out
}
