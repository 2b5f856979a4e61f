//! Rendering and batching of print jobs.
//!
//! A tabular job walks the data in windows of `rows_per_label` rows. Each
//! window becomes one label: ungrouped placeholders read the first row of
//! the window, members of a grouped placeholder read one row each. Labels
//! are concatenated into batches and every batch is one dispatch call.

use label_ingest::TabularData;
use label_map::ColumnMapping;
use label_model::{Record, Template, ValueMap};
use label_render::{
    GroupingAnalysis, analyze_groups, render_from_record, render_from_values,
    render_with_overrides, scan_placeholders,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::DEFAULT_BATCH_SIZE;
use crate::dispatch::PrintDispatch;
use crate::error::{PrintError, Result};

/// Counts reported after a print run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PrintSummary {
    /// Labels rendered.
    pub labels: usize,
    /// Dispatch calls made.
    pub batches: usize,
    /// Input rows consumed.
    pub rows: usize,
}

impl PrintSummary {
    pub fn merge(&mut self, other: PrintSummary) {
        self.labels += other.labels;
        self.batches += other.batches;
        self.rows += other.rows;
    }
}

/// Accumulates rendered labels until the batch is full.
#[derive(Debug)]
struct BatchBuffer {
    markup: String,
    labels: usize,
    limit: usize,
}

impl BatchBuffer {
    fn new(limit: usize) -> Self {
        Self {
            markup: String::new(),
            labels: 0,
            limit,
        }
    }

    /// Adds a label; returns the batch when it reaches the limit.
    fn push(&mut self, label: &str) -> Option<String> {
        self.markup.push_str(label);
        self.labels += 1;
        if self.labels >= self.limit {
            self.take()
        } else {
            None
        }
    }

    /// Returns whatever is left.
    fn take(&mut self) -> Option<String> {
        if self.labels == 0 {
            return None;
        }
        self.labels = 0;
        Some(std::mem::take(&mut self.markup))
    }
}

/// A template bound to tabular data through a column mapping.
#[derive(Debug, Clone)]
pub struct TabularJob<'a> {
    template: &'a Template,
    data: &'a TabularData,
    mapping: &'a ColumnMapping,
    grouping: GroupingAnalysis,
    placeholders: Vec<String>,
    baseline: ValueMap,
}

impl<'a> TabularJob<'a> {
    pub fn new(template: &'a Template, data: &'a TabularData, mapping: &'a ColumnMapping) -> Self {
        let placeholders = scan_placeholders(&template.markup);
        let grouping = analyze_groups(&placeholders);
        Self {
            template,
            data,
            mapping,
            grouping,
            placeholders,
            baseline: ValueMap::new(),
        }
    }

    /// Values that seed every label before tabular cells are applied,
    /// usually derived from a source record.
    #[must_use]
    pub fn with_baseline(mut self, baseline: ValueMap) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn template(&self) -> &Template {
        self.template
    }

    pub fn data(&self) -> &TabularData {
        self.data
    }

    pub fn grouping(&self) -> &GroupingAnalysis {
        &self.grouping
    }

    pub fn rows_per_label(&self) -> usize {
        self.grouping.rows_per_label()
    }

    /// Writes the cell at (`row`, `column`) into `values`.
    ///
    /// A short row leaves the seeded value in place.
    fn apply_cell(&self, values: &mut ValueMap, placeholder: &str, row: usize, column: usize) {
        if let Some(cell) = self.data.row(row).and_then(|cells| cells.get(column)) {
            values.set(placeholder, cell.as_str());
        }
    }

    /// Value map for the label whose window starts at `start`.
    ///
    /// Grouped members past `end` or past the data are blank.
    pub fn values_for_label(&self, start: usize, end: usize) -> ValueMap {
        let mut values: ValueMap = self
            .placeholders
            .iter()
            .map(|name| (name.as_str(), ""))
            .collect();
        values.overlay_overrides(self.baseline.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        for name in self.grouping.ungrouped() {
            if let Some(column) = self.mapping.get(name) {
                self.apply_cell(&mut values, name, start, column);
            }
        }

        let limit = end.min(self.data.len());
        for (base, members) in self.grouping.groups() {
            let Some(column) = self.mapping.get(base) else {
                continue;
            };
            for (offset, member) in members.iter().enumerate() {
                let row = start + offset;
                if row < limit {
                    self.apply_cell(&mut values, member, row, column);
                } else {
                    values.set(member.as_str(), "");
                }
            }
        }
        values
    }

    pub fn render_label(&self, start: usize, end: usize) -> String {
        render_from_values(self.template, &self.values_for_label(start, end))
    }
}

/// One record-based label with its own copy count.
#[derive(Clone, Copy)]
pub struct RecordLabel<'r> {
    pub record: &'r dyn Record,
    pub copies: u32,
}

impl std::fmt::Debug for RecordLabel<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordLabel")
            .field("record", &self.record.display_label())
            .field("copies", &self.copies)
            .finish()
    }
}

/// Renders labels and hands them to a [`PrintDispatch`] in batches.
#[derive(Debug)]
pub struct BatchPipeline<D> {
    dispatch: D,
    destination: String,
    copies: u32,
    batch_size: usize,
}

impl<D: PrintDispatch> BatchPipeline<D> {
    /// Creates a pipeline printing to `destination` (the printer address).
    pub fn new(dispatch: D, destination: impl Into<String>) -> Result<Self> {
        let destination = destination.into().trim().to_string();
        if destination.is_empty() {
            return Err(PrintError::MissingDestination);
        }
        Ok(Self {
            dispatch,
            destination,
            copies: 1,
            batch_size: DEFAULT_BATCH_SIZE,
        })
    }

    /// Sets the number of labels per dispatch.
    pub fn with_batch_size(mut self, batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(PrintError::InvalidBatchSize { size: batch_size });
        }
        self.batch_size = batch_size;
        Ok(self)
    }

    /// Sets the copy count sent with every tabular batch.
    pub fn with_copies(mut self, copies: u32) -> Result<Self> {
        check_copies(copies)?;
        self.copies = copies;
        Ok(self)
    }

    pub fn dispatch(&self) -> &D {
        &self.dispatch
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn send(&self, markup: &str, copies: u32, batch: usize) -> Result<()> {
        debug!(batch, copies, bytes = markup.len(), "dispatching batch");
        self.dispatch
            .send(markup, &self.destination, copies)
            .map_err(|source| {
                warn!(batch, destination = %self.destination, error = %source, "dispatch failed");
                PrintError::Dispatch { batch, source }
            })
    }

    /// Prints rows `[start, end)` of a tabular job.
    ///
    /// `start` must be a data row (row 0 is the header); `end` is clamped to
    /// the data.
    pub fn print_rows(&self, job: &TabularJob<'_>, start: usize, end: usize) -> Result<PrintSummary> {
        ensure_markup(job.template)?;
        check_start_row(start, job.data.len())?;
        let end = end.min(job.data.len());
        if end <= start {
            return Err(PrintError::NoRemainingRows {
                from: start,
                rows: job.data.len(),
            });
        }

        let rows_per_label = job.rows_per_label();
        let mut buffer = BatchBuffer::new(self.batch_size);
        let mut summary = PrintSummary {
            rows: end - start,
            ..PrintSummary::default()
        };

        for label_start in (start..end).step_by(rows_per_label) {
            let label = job.render_label(label_start, end);
            summary.labels += 1;
            if let Some(batch) = buffer.push(&label) {
                summary.batches += 1;
                self.send(&batch, self.copies, summary.batches)?;
            }
        }
        if let Some(batch) = buffer.take() {
            summary.batches += 1;
            self.send(&batch, self.copies, summary.batches)?;
        }

        info!(
            template = %job.template.name,
            start,
            end,
            rows_per_label,
            labels = summary.labels,
            batches = summary.batches,
            "printed tabular rows"
        );
        Ok(summary)
    }

    /// Prints one label per record, each sent on its own with its copy
    /// count.
    pub fn print_records(
        &self,
        template: &Template,
        labels: &[RecordLabel<'_>],
    ) -> Result<PrintSummary> {
        ensure_markup(template)?;
        for label in labels {
            check_copies(label.copies)?;
        }

        let mut summary = PrintSummary::default();
        for label in labels {
            let markup = render_from_record(template, Some(label.record));
            summary.labels += 1;
            summary.batches += 1;
            self.send(&markup, label.copies, summary.batches)?;
        }
        info!(template = %template.name, labels = summary.labels, "printed record labels");
        Ok(summary)
    }

    /// Prints one label with manual overrides layered on the record values.
    pub fn print_with_overrides(
        &self,
        template: &Template,
        record: Option<&dyn Record>,
        overrides: &ValueMap,
        copies: u32,
    ) -> Result<PrintSummary> {
        ensure_markup(template)?;
        check_copies(copies)?;
        let markup = render_with_overrides(template, record, overrides);
        self.send(&markup, copies, 1)?;
        info!(template = %template.name, copies, "printed edited label");
        Ok(PrintSummary {
            labels: 1,
            batches: 1,
            rows: 0,
        })
    }

    /// Sends the template markup unrendered, placeholders included.
    pub fn print_raw(&self, template: &Template, copies: u32) -> Result<PrintSummary> {
        ensure_markup(template)?;
        check_copies(copies)?;
        self.send(&template.markup, copies, 1)?;
        info!(template = %template.name, copies, "printed raw template");
        Ok(PrintSummary {
            labels: 1,
            batches: 1,
            rows: 0,
        })
    }
}

fn ensure_markup(template: &Template) -> Result<()> {
    if template.has_markup() {
        Ok(())
    } else {
        Err(PrintError::EmptyTemplate {
            name: template.name.clone(),
        })
    }
}

fn check_copies(copies: u32) -> Result<()> {
    if copies == 0 {
        return Err(PrintError::InvalidCopies { copies });
    }
    Ok(())
}

pub(crate) fn check_start_row(start: usize, rows: usize) -> Result<()> {
    if start == 0 {
        return Err(PrintError::HeaderRowSelected);
    }
    if start >= rows {
        return Err(PrintError::StartRowOutOfRange { start, rows });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use label_map::MatchSource;
    use label_model::EntityType;

    use super::*;

    fn table(rows: &[&[&str]]) -> TabularData {
        TabularData::from_rows(
            rows.iter()
                .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
                .collect(),
        )
    }

    fn mapping(entries: &[(&str, usize)]) -> ColumnMapping {
        let mut mapping = ColumnMapping::default();
        for (name, column) in entries {
            mapping.insert(*name, *column, MatchSource::ColumnReference);
        }
        mapping
    }

    #[test]
    fn buffer_flushes_at_limit() {
        let mut buffer = BatchBuffer::new(2);
        assert_eq!(buffer.push("a"), None);
        assert_eq!(buffer.push("b"), Some("ab".to_string()));
        assert_eq!(buffer.take(), None);
        assert_eq!(buffer.push("c"), None);
        assert_eq!(buffer.take(), Some("c".to_string()));
    }

    #[test]
    fn grouped_members_read_consecutive_rows() {
        let template = Template::new(
            "pair",
            EntityType::new("product"),
            "${NAME}:${QTY_R1},${QTY_R2}",
        );
        let data = table(&[&["NAME", "Q"], &["Widget", "5"], &["Widget", "7"]]);
        let mapping = mapping(&[("NAME", 0), ("QTY", 1)]);
        let job = TabularJob::new(&template, &data, &mapping);

        assert_eq!(job.rows_per_label(), 2);
        assert_eq!(job.render_label(1, 3), "Widget:5,7");
        // window cut short by the requested end
        assert_eq!(job.render_label(1, 2), "Widget:5,");
        // window running past the data
        assert_eq!(job.render_label(2, 3), "Widget:7,");
    }

    #[test]
    fn plain_placeholder_sharing_a_group_base_reads_the_start_row() {
        let template = Template::new(
            "qty",
            EntityType::new("product"),
            "${QTY}|${QTY_R1},${QTY_R2}",
        );
        let data = table(&[&["QTY"], &["5"], &["7"]]);
        let mapping = mapping(&[("QTY", 0)]);
        let job = TabularJob::new(&template, &data, &mapping);

        assert_eq!(job.rows_per_label(), 2);
        assert_eq!(job.render_label(1, 3), "5|5,7");
    }

    #[test]
    fn padded_group_tokens_are_grouped_and_mapped() {
        let template = Template::new(
            "qty",
            EntityType::new("product"),
            "${ QTY_R1 },${ QTY_R2 }",
        );
        let data = table(&[&["QTY"], &["5"], &["7"]]);
        let mapping = mapping(&[("QTY", 0)]);
        let job = TabularJob::new(&template, &data, &mapping);

        assert_eq!(job.rows_per_label(), 2);
        assert_eq!(job.render_label(1, 3), "5,7");
    }

    #[test]
    fn baseline_fills_unmapped_and_short_cells() {
        let template = Template::new("lot", EntityType::new("stock.lot"), "${LOT}|${SKU}|${NOTE}");
        let data = table(&[&["Lot", "Sku"], &["L1"], &["L2", "S2"]]);
        let mapping = mapping(&[("LOT", 0), ("SKU", 1)]);
        let baseline: ValueMap = [("SKU", "default-sku"), ("NOTE", "fragile")]
            .into_iter()
            .collect();
        let job = TabularJob::new(&template, &data, &mapping).with_baseline(baseline);

        assert_eq!(job.render_label(1, 3), "L1|default-sku|fragile");
        assert_eq!(job.render_label(2, 3), "L2|S2|fragile");
    }

    #[test]
    fn unmapped_placeholders_render_empty() {
        let template = Template::new("lot", EntityType::new("stock.lot"), "[${LOT}][${X}]");
        let data = table(&[&["Lot"], &["L1"]]);
        let mapping = mapping(&[("LOT", 0)]);
        let job = TabularJob::new(&template, &data, &mapping);
        insta::assert_snapshot!(job.render_label(1, 2), @"[L1][]");
    }

    #[test]
    fn start_row_checks() {
        assert!(matches!(check_start_row(0, 3), Err(PrintError::HeaderRowSelected)));
        assert!(matches!(
            check_start_row(3, 3),
            Err(PrintError::StartRowOutOfRange { start: 3, rows: 3 })
        ));
        assert!(check_start_row(2, 3).is_ok());
    }
}
