//! Progress reporting for crawls over a known list of pages.
//!
//! Reports call [`Progress::begin`] with the number of pages, then
//! [`Progress::item_done`] once per page whether it succeeded or was skipped.
//! Progress output never affects ordering or results.

use std::io::Write;

pub trait Progress {
    /// Called once with the number of items about to be processed.
    fn begin(&mut self, _total: usize) {}

    /// Called when one page has been handled.
    fn item_done(&mut self, _label: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Single-line `[done/total]` counter on stderr.
#[derive(Debug, Default)]
pub struct ConsoleProgress {
    total: usize,
    done: usize,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self::default()
    }

    fn render(&self) -> String {
        let percent = if self.total == 0 {
            100
        } else {
            self.done * 100 / self.total
        };
        format!("[{}/{}] {:>3}%", self.done, self.total, percent)
    }
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
    }

    fn item_done(&mut self, _label: &str) {
        self.done += 1;
        let mut err = std::io::stderr().lock();
        let _ = write!(err, "\r{}", self.render());
        let _ = err.flush();
    }

    fn finish(&mut self) {
        if self.total > 0 {
            eprintln!();
        }
    }
}
