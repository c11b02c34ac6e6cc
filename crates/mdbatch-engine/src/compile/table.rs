//! Serializes a table into a monospace pipe-delimited text block.
//!
//! Tables are not mapped onto the target's native table primitive; the
//! rendered rows are inserted as plain text and styled with a fixed-width font.

const CELL_SEPARATOR: &str = " | ";
const ROW_OPENER: &str = "| ";
const DIVIDER_CELL: &str = "--- | ";

/// Renders the header row, a divider row and one line per data row.
///
/// Every line ends with `\n`; the caller appends the trailing blank line.
pub fn render(header: &[String], rows: &[Vec<String>]) -> String {
    let mut out = String::new();

    push_row(&mut out, header);

    out.push_str(ROW_OPENER);
    for _ in header {
        out.push_str(DIVIDER_CELL);
    }
    out.push('\n');

    for row in rows {
        push_row(&mut out, row);
    }

    out
}

fn push_row(out: &mut String, cells: &[String]) {
    out.push_str(ROW_OPENER);
    for cell in cells {
        out.push_str(cell);
        out.push_str(CELL_SEPARATOR);
    }
    out.push('\n');
}
