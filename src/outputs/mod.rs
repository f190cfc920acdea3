//! Rendering of report tables.
//!
//! # Submodules
//!
//! - [`console`]: plain lines and bordered tables on stdout
//! - [`pager`]: bordered table split into pages
//! - [`file`]: CSV file under `<base_dir>/results/`
//!
//! Tables without data rows are never rendered.

pub mod console;
pub mod file;
pub mod pager;

use std::io::{self, IsTerminal};

use tracing::{info, instrument};

use crate::cli::{Mode, OutputMode};
use crate::config::ScraperConfig;
use crate::error::Result;
use crate::models::ReportTable;

/// Render `table` the way the caller asked for.
#[instrument(level = "info", skip(table, config), fields(rows = table.len()))]
pub async fn control_output(
    table: &ReportTable,
    output: Option<OutputMode>,
    mode: Mode,
    config: &ScraperConfig,
) -> Result<()> {
    if table.is_empty() {
        info!("Report produced no rows; nothing to output");
        return Ok(());
    }

    match output {
        None => console::write_plain(table, &mut io::stdout().lock())?,
        Some(OutputMode::Pretty) => console::write_pretty(table, &mut io::stdout().lock())?,
        Some(OutputMode::Paged) => {
            let interactive = io::stdin().is_terminal() && io::stdout().is_terminal();
            let mut input = io::stdin().lock();
            let prompt = interactive.then_some(&mut input);
            pager::write_paged(table, config.page_size, &mut io::stdout().lock(), prompt)?;
        }
        Some(OutputMode::File) => {
            file::write_csv(table, mode, &config.results_dir()).await?;
        }
    }
    Ok(())
}
