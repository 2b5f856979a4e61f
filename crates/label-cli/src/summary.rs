use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use label_map::{ColumnMapping, column_label};

use crate::types::{RunSummary, ScanReport};

pub fn print_scan(report: &ScanReport) {
    println!("Template: {} ({})", report.template, report.root_entity);
    println!("Rows per label: {}", report.rows_per_label);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Placeholder"),
        header_cell("Group"),
        header_cell("Field path"),
    ]);
    apply_table_style(&mut table);
    for row in &report.placeholders {
        table.add_row(vec![
            Cell::new(&row.placeholder),
            optional_cell(row.group.as_deref()),
            optional_cell(row.path.as_deref()),
        ]);
    }
    println!("{table}");
}

/// Rows of the mapping table: placeholder, column, header, matched by.
pub fn mapping_rows(mapping: &ColumnMapping, headers: &[String]) -> Vec<[String; 4]> {
    mapping
        .iter()
        .map(|(placeholder, column)| {
            [
                placeholder.to_string(),
                format!("{} ({})", column_label(column.index), column.index + 1),
                headers
                    .get(column.index)
                    .cloned()
                    .unwrap_or_else(|| "-".to_string()),
                column.source.as_str().to_string(),
            ]
        })
        .collect()
}

pub fn print_mapping(mapping: &ColumnMapping, headers: &[String]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Placeholder"),
        header_cell("Column"),
        header_cell("Header"),
        header_cell("Matched by"),
    ]);
    apply_table_style(&mut table);
    for row in mapping_rows(mapping, headers) {
        table.add_row(row.to_vec());
    }
    println!("{table}");
}

pub fn print_runs(runs: &[RunSummary]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Run"),
        header_cell("Rows"),
        header_cell("Labels"),
        header_cell("Batches"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=3 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for run in runs {
        table.add_row(vec![
            Cell::new(run.stage),
            Cell::new(run.summary.rows),
            Cell::new(run.summary.labels),
            Cell::new(run.summary.batches),
        ]);
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => Cell::new("-").add_attribute(Attribute::Dim),
    }
}
