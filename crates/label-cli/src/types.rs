use label_print::PrintSummary;

/// Placeholders of one template, as reported by `scan`.
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub template: String,
    pub root_entity: String,
    pub rows_per_label: usize,
    pub placeholders: Vec<PlaceholderRow>,
}

#[derive(Debug, Clone)]
pub struct PlaceholderRow {
    pub placeholder: String,
    /// Base name when the placeholder belongs to a repeating group.
    pub group: Option<String>,
    pub path: Option<String>,
}

/// One completed print run of a command.
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    pub stage: &'static str,
    pub summary: PrintSummary,
}
