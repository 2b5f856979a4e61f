//! Test print followed by the remainder.
//!
//! A bulk job is usually checked by printing the first few labels, then the
//! rest of the file is printed from where the test stopped.

use std::ops::Range;

use tracing::info;

use crate::dispatch::PrintDispatch;
use crate::error::{PrintError, Result};
use crate::pipeline::{BatchPipeline, PrintSummary, TabularJob, check_start_row};

/// Test and remainder printing over one tabular job.
#[derive(Debug)]
pub struct CsvPrintSession<'p, 'j, D> {
    pipeline: &'p BatchPipeline<D>,
    job: TabularJob<'j>,
    start_row: usize,
    test_window: Option<Range<usize>>,
}

impl<'p, 'j, D: PrintDispatch> CsvPrintSession<'p, 'j, D> {
    /// `start_row` is the first data row to print (row 0 is the header).
    pub fn new(pipeline: &'p BatchPipeline<D>, job: TabularJob<'j>, start_row: usize) -> Result<Self> {
        check_start_row(start_row, job.data().len())?;
        Ok(Self {
            pipeline,
            job,
            start_row,
            test_window: None,
        })
    }

    pub fn job(&self) -> &TabularJob<'j> {
        &self.job
    }

    /// Rows covered by the last successful test print.
    pub fn test_window(&self) -> Option<Range<usize>> {
        self.test_window.clone()
    }

    /// Rows the test print would cover for `requested` rows: rounded up to
    /// whole labels, at least one label.
    pub fn test_row_count(&self, requested: usize) -> usize {
        let rows_per_label = self.job.rows_per_label();
        requested.max(1).div_ceil(rows_per_label) * rows_per_label
    }

    /// Data rows left after the test window.
    pub fn remaining_rows(&self) -> usize {
        let from = self
            .test_window
            .as_ref()
            .map_or(self.start_row, |window| window.end);
        self.job.data().len().saturating_sub(from)
    }

    /// Prints the first `requested` rows from the start row.
    pub fn test_print(&mut self, requested: usize) -> Result<PrintSummary> {
        let rows = self.test_row_count(requested);
        let end = (self.start_row + rows).min(self.job.data().len());
        let summary = self.pipeline.print_rows(&self.job, self.start_row, end)?;
        info!(start = self.start_row, end, requested, "test print finished");
        self.test_window = Some(self.start_row..end);
        Ok(summary)
    }

    /// Prints every row after the test window.
    pub fn print_remainder(&mut self) -> Result<PrintSummary> {
        let window = self
            .test_window
            .clone()
            .ok_or(PrintError::TestPrintRequired)?;
        let rows = self.job.data().len();
        if window.end >= rows {
            return Err(PrintError::NoRemainingRows {
                from: window.end,
                rows,
            });
        }
        let summary = self.pipeline.print_rows(&self.job, window.end, rows)?;
        info!(start = window.end, end = rows, "remainder printed");
        Ok(summary)
    }

    /// Prints everything from the start row, without a test print.
    pub fn print_all(&self) -> Result<PrintSummary> {
        self.pipeline
            .print_rows(&self.job, self.start_row, self.job.data().len())
    }
}
