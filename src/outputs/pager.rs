//! Paged table output.
//!
//! The table is split into pages of `page_size` data rows, each rendered
//! with the header. When an input is supplied (interactive terminal) the
//! pager waits for Enter between pages; `q` stops early.

use std::io::{BufRead, Write};

use crate::error::Result;
use crate::models::ReportTable;
use crate::outputs::console::render_pretty;

pub fn write_paged<W: Write, R: BufRead>(
    table: &ReportTable,
    page_size: usize,
    out: &mut W,
    mut input: Option<&mut R>,
) -> Result<()> {
    let pages: Vec<_> = table.rows().chunks(page_size.max(1)).collect();
    let page_count = pages.len();

    for (index, rows) in pages.into_iter().enumerate() {
        write!(out, "{}", render_pretty(table.header(), rows))?;
        writeln!(out, "Page {}/{}", index + 1, page_count)?;

        let is_last = index + 1 == page_count;
        if let (false, Some(reader)) = (is_last, input.as_deref_mut()) {
            write!(out, "-- more (Enter, q to quit) --")?;
            out.flush()?;
            let mut answer = String::new();
            if reader.read_line(&mut answer)? == 0 || answer.trim().eq_ignore_ascii_case("q") {
                break;
            }
        }
    }
    Ok(())
}
