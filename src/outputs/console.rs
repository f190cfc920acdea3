//! Console rendering: one line per row, or a bordered table.

use std::io::Write;

use itertools::Itertools;

use crate::error::Result;
use crate::models::{ReportRow, ReportTable};

/// Every row, header included, as space-separated fields.
pub fn write_plain(table: &ReportTable, out: &mut impl Write) -> Result<()> {
    for row in table.all_rows() {
        writeln!(out, "{}", row.iter().join(" "))?;
    }
    Ok(())
}

/// Bordered, left-aligned table.
pub fn write_pretty(table: &ReportTable, out: &mut impl Write) -> Result<()> {
    out.write_all(render_pretty(table.header(), table.rows()).as_bytes())?;
    Ok(())
}

/// Column widths in characters over the header and `rows`.
fn column_widths(header: &[String], rows: &[ReportRow]) -> Vec<usize> {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    widths
}

/// Render a bordered table of `header` and `rows`.
pub fn render_pretty(header: &[String], rows: &[ReportRow]) -> String {
    let widths = column_widths(header, rows);
    let border = format!(
        "+{}+\n",
        widths.iter().map(|w| "-".repeat(w + 2)).join("+")
    );
    let line = |row: &[String]| {
        format!(
            "| {} |\n",
            row.iter()
                .zip(&widths)
                .map(|(cell, &w)| format!("{cell:<w$}"))
                .join(" | ")
        )
    };

    let mut rendered = String::new();
    rendered.push_str(&border);
    rendered.push_str(&line(header));
    rendered.push_str(&border);
    for row in rows {
        rendered.push_str(&line(row.as_slice()));
    }
    rendered.push_str(&border);
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ReportTable {
        let mut table = ReportTable::new(["Status", "Count"]);
        table.push(["Active", "2"]).unwrap();
        table.push(["Total:", "12"]).unwrap();
        table
    }

    #[test]
    fn test_write_plain() {
        let mut out = Vec::new();
        write_plain(&sample(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Status Count\nActive 2\nTotal: 12\n");
    }

    #[test]
    fn test_write_pretty_aligns_columns() {
        let mut out = Vec::new();
        write_pretty(&sample(), &mut out).unwrap();
        let expected = "\
+--------+-------+
| Status | Count |
+--------+-------+
| Active | 2     |
| Total: | 12    |
+--------+-------+
";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_pretty_counts_chars_not_bytes() {
        let mut table = ReportTable::new(["Статус"]);
        table.push(["ok"]).unwrap();
        let rendered = render_pretty(table.header(), table.rows());
        assert!(rendered.starts_with("+--------+\n| Статус |\n"));
        assert!(rendered.contains("| ok     |"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let table = sample();
        assert_eq!(
            render_pretty(table.header(), table.rows()),
            render_pretty(table.header(), table.rows())
        );
    }
}
