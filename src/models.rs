//! Tabular report data.
//!
//! - [`ReportTable`]: a header plus rows, all of the same width
//! - [`StatusTally`]: insertion-ordered counts for the PEP status census

use crate::error::{AppError, Result};

/// One table row; column meaning is fixed per report.
pub type ReportRow = Vec<String>;

/// A header row followed by data rows of the same arity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    header: ReportRow,
    rows: Vec<ReportRow>,
}

impl ReportTable {
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row.
    ///
    /// # Errors
    ///
    /// [`AppError::RowArity`] if the row width differs from the header.
    pub fn push<I, S>(&mut self, row: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: ReportRow = row.into_iter().map(Into::into).collect();
        if row.len() != self.header.len() {
            return Err(AppError::RowArity {
                expected: self.header.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// True when there are no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Header followed by data rows.
    pub fn all_rows(&self) -> impl Iterator<Item = &ReportRow> {
        std::iter::once(&self.header).chain(self.rows.iter())
    }
}

/// Count of PEPs per observed status, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusTally {
    counts: Vec<(String, usize)>,
    total: usize,
}

impl StatusTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, status: &str) {
        self.total += 1;
        match self.counts.iter_mut().find(|(s, _)| s == status) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((status.to_string(), 1)),
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(s, c)| (s.as_str(), *c))
    }

    /// `(status, count)` rows plus a trailing `("Total:", total)` row.
    pub fn into_table(self) -> ReportTable {
        let mut table = ReportTable::new(["Status", "Count"]);
        table
            .rows
            .extend(self.counts.into_iter().map(|(status, count)| vec![status, count.to_string()]));
        table.rows.push(vec!["Total:".to_string(), self.total.to_string()]);
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_rejects_wrong_arity() {
        let mut table = ReportTable::new(["Link", "Version", "Status"]);
        assert!(table.push(["a", "b", "c"]).is_ok());
        let err = table.push(["a", "b"]).unwrap_err();
        assert!(matches!(err, AppError::RowArity { expected: 3, found: 2 }));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_empty_table_has_header_only() {
        let table = ReportTable::new(["A"]);
        assert!(table.is_empty());
        assert_eq!(table.all_rows().count(), 1);
    }

    #[test]
    fn test_tally_keeps_first_seen_order() {
        let mut tally = StatusTally::new();
        for status in ["Final", "Active", "Final", "Draft", "Active", "Final"] {
            tally.record(status);
        }
        let order: Vec<_> = tally.iter().collect();
        assert_eq!(order, [("Final", 3), ("Active", 2), ("Draft", 1)]);
        assert_eq!(tally.total(), 6);
        assert!(tally.iter().all(|(status, _)| status != "Rejected"));
    }

    #[test]
    fn test_tally_into_table_appends_total() {
        let mut tally = StatusTally::new();
        tally.record("Active");
        tally.record("Active");
        let table = tally.into_table();
        assert_eq!(table.header(), ["Status", "Count"]);
        assert_eq!(
            table.rows(),
            [
                vec!["Active".to_string(), "2".to_string()],
                vec!["Total:".to_string(), "2".to_string()],
            ]
        );
    }
}
