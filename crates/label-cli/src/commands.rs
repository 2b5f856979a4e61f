use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{Context, Result, bail};
use label_cli::inputs::{merge_directives, parse_assignments};
use label_cli::logging::redact_value;
use label_cli::templates::{load_records, load_single_record, load_template};
use label_ingest::{TabularOptions, read_tabular_file};
use label_map::{build_column_mapping, suggest_directives};
use label_model::{PlaceholderBinding, Record, Template, ValueMap};
use label_print::{
    BatchPipeline, CsvPrintSession, HttpPrintService, LabelaryClient, PreviewState, PrintConfig,
    PrintSummary, RecordLabel, TabularJob, preview_markup,
};
use label_render::{
    analyze_groups, render_from_record, render_with_overrides, scan_placeholders,
    values_from_record,
};
use tracing::{debug, info, info_span, warn};

use crate::cli::{
    PreviewArgs, PrintArgs, PrintCsvArgs, PrinterArgs, RenderArgs, ScanArgs, TestPrintArgs,
    ValueArgs,
};
use crate::summary::print_mapping;
use crate::types::{PlaceholderRow, RunSummary, ScanReport};

pub fn run_scan(args: &ScanArgs) -> Result<ScanReport> {
    let template = load_template(&args.template)?;
    let scanned = scan_placeholders(&template.markup);
    let grouping = analyze_groups(&scanned);
    let group_of = |name: &str| {
        grouping
            .groups()
            .iter()
            .find(|(_, members)| members.iter().any(|member| member == name))
            .map(|(base, _)| base.clone())
    };
    let placeholders = scanned
        .iter()
        .map(|name| PlaceholderRow {
            placeholder: name.clone(),
            group: group_of(name),
            path: template
                .binding(name)
                .and_then(PlaceholderBinding::effective_path),
        })
        .collect();
    Ok(ScanReport {
        template: template.name.clone(),
        root_entity: template.root_entity.to_string(),
        rows_per_label: grouping.rows_per_label(),
        placeholders,
    })
}

pub fn run_render(args: &RenderArgs) -> Result<()> {
    let template = load_template(&args.template)?;
    let markup = render_values(&template, &args.values)?;
    match &args.output {
        Some(path) => std::fs::write(path, &markup)
            .with_context(|| format!("write {}", path.display()))?,
        None => println!("{markup}"),
    }
    Ok(())
}

pub fn run_print(args: &PrintArgs, config: &PrintConfig) -> Result<Vec<RunSummary>> {
    let template = load_template(&args.template)?;
    let span = info_span!("print", template = %template.name);
    let _guard = span.enter();
    let pipeline = build_pipeline(config, &args.printer, None)?;

    if !args.set.is_empty() {
        let record = args.record.as_deref().map(load_single_record).transpose()?;
        let overrides = parse_assignments(&args.set)?;
        let summary = pipeline
            .print_with_overrides(
                &template,
                record.as_ref().map(|r| r as &dyn Record),
                &overrides,
                args.printer.copies,
            )
            .context("print edited label")?;
        return Ok(vec![RunSummary {
            stage: "Edited label",
            summary,
        }]);
    }

    let Some(path) = &args.records else {
        bail!("either --records or --set is required");
    };
    let records = load_records(path)?;
    let labels: Vec<RecordLabel<'_>> = records
        .iter()
        .map(|record| RecordLabel {
            record,
            copies: args.printer.copies,
        })
        .collect();
    let summary = pipeline
        .print_records(&template, &labels)
        .context("print records")?;
    Ok(vec![RunSummary {
        stage: "Records",
        summary,
    }])
}

pub fn run_print_csv(args: &PrintCsvArgs, config: &PrintConfig) -> Result<Vec<RunSummary>> {
    let template = load_template(&args.template)?;
    let span = info_span!("print_csv", template = %template.name);
    let _guard = span.enter();

    let options = TabularOptions::default()
        .with_delimiter(args.delimiter.clone())
        .with_encoding(args.encoding.clone());
    let data = read_tabular_file(&args.csv, &options)
        .with_context(|| format!("read {}", args.csv.display()))?;

    let scanned = scan_placeholders(&template.markup);
    let grouping = analyze_groups(&scanned);
    let directives = merge_directives(
        suggest_directives(grouping.collapsed(), data.headers()),
        &args.map,
    );
    let mapping = build_column_mapping(data.headers(), &directives);
    print_mapping(&mapping, data.headers());
    for placeholder in mapping.unmapped(&directives) {
        warn!(placeholder = %placeholder, "no column mapped");
    }

    let baseline = match &args.record {
        Some(path) => {
            let record = load_single_record(path)?;
            values_from_record(&template, Some(&record))
        }
        None => ValueMap::new(),
    };
    let pipeline = build_pipeline(config, &args.printer, args.batch_size)?;
    let job = TabularJob::new(&template, &data, &mapping).with_baseline(baseline);
    let mut session = CsvPrintSession::new(&pipeline, job, args.start_row)?;

    if args.all {
        let summary = session.print_all().context("print rows")?;
        return Ok(vec![RunSummary {
            stage: "All rows",
            summary,
        }]);
    }

    let requested = args.test_rows.unwrap_or(config.batch.test_rows);
    let test = session.test_print(requested).context("test print")?;
    let mut runs = vec![RunSummary {
        stage: "Test print",
        summary: test,
    }];
    let remaining = session.remaining_rows();
    if remaining == 0 {
        info!("test print covered every row");
        return Ok(runs);
    }

    if !(args.yes || confirm(&remainder_prompt(&test, remaining))?) {
        info!(remaining, "remainder not printed");
        return Ok(runs);
    }
    let rest = session.print_remainder().context("print remainder")?;
    runs.push(RunSummary {
        stage: "Remainder",
        summary: rest,
    });
    Ok(runs)
}

pub fn run_test_print(args: &TestPrintArgs, config: &PrintConfig) -> Result<Vec<RunSummary>> {
    let template = load_template(&args.template)?;
    let pipeline = build_pipeline(config, &args.printer, None)?;
    let summary = pipeline
        .print_raw(&template, args.printer.copies)
        .context("test print")?;
    Ok(vec![RunSummary {
        stage: "Raw template",
        summary,
    }])
}

pub fn run_preview(args: &PreviewArgs, config: &PrintConfig) -> Result<()> {
    let template = load_template(&args.template)?;
    let markup = if args.values.record.is_none() && args.values.set.is_empty() {
        template.markup.clone()
    } else {
        render_values(&template, &args.values)?
    };
    let client = LabelaryClient::new(&config.preview)?;
    match preview_markup(&client, &template, &markup) {
        PreviewState::Ready(image) => {
            std::fs::write(&args.output, &image)
                .with_context(|| format!("write {}", args.output.display()))?;
            info!(path = %args.output.display(), bytes = image.len(), "preview saved");
            Ok(())
        }
        PreviewState::Unavailable(reason) => bail!("preview unavailable: {reason}"),
    }
}

fn render_values(template: &Template, values: &ValueArgs) -> Result<String> {
    let record = values.record.as_deref().map(load_single_record).transpose()?;
    let record = record.as_ref().map(|r| r as &dyn Record);
    let overrides = parse_assignments(&values.set)?;
    let markup = if overrides.is_empty() {
        render_from_record(template, record)
    } else {
        render_with_overrides(template, record, &overrides)
    };
    debug!(template = %template.name, markup = redact_value(&markup), "rendered label");
    Ok(markup)
}

fn build_pipeline(
    config: &PrintConfig,
    printer: &PrinterArgs,
    batch_size: Option<usize>,
) -> Result<BatchPipeline<HttpPrintService>> {
    let service = HttpPrintService::new(&config.service).context("configure print service")?;
    let pipeline = BatchPipeline::new(service, printer.printer.as_str())?
        .with_batch_size(batch_size.unwrap_or(config.batch.batch_size))?
        .with_copies(printer.copies)?;
    Ok(pipeline)
}

/// The test print summary is shown here; the returned runs are printed once
/// the command finishes.
fn remainder_prompt(test: &PrintSummary, remaining: usize) -> String {
    format!(
        "Test print sent ({} labels from {} rows). Print the remaining {remaining} rows? [y/N] ",
        test.labels, test.rows
    )
}

fn confirm(prompt: &str) -> Result<bool> {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        warn!("stdin is not a terminal; pass --yes to print the remainder");
        return Ok(false);
    }
    confirm_with(prompt, &mut stdin.lock(), &mut io::stderr())
}

fn confirm_with(prompt: &str, input: &mut impl BufRead, output: &mut impl Write) -> Result<bool> {
    write!(output, "{prompt}")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn template_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn confirmation_accepts_yes_only() {
        for (answer, expected) in [("y\n", true), ("YES\n", true), ("n\n", false), ("\n", false)] {
            let mut output = Vec::new();
            let result = confirm_with("go? ", &mut answer.as_bytes(), &mut output).unwrap();
            assert_eq!(result, expected, "{answer:?}");
            assert_eq!(output, b"go? ");
        }
    }

    #[test]
    fn remainder_prompt_carries_the_test_summary() {
        let test = PrintSummary {
            labels: 3,
            batches: 1,
            rows: 6,
        };
        assert_eq!(
            remainder_prompt(&test, 4),
            "Test print sent (3 labels from 6 rows). Print the remaining 4 rows? [y/N] "
        );
    }

    #[test]
    fn scan_reports_groups_and_paths() {
        let file = template_file(
            r#"
name = "Pallet"
root_entity = "stock.quant"
markup = "${NAME} ${QTY_R2} ${QTY_R1}"

[[placeholders]]
placeholder = "NAME"
field_path = "product_id.name"
"#,
        );
        let report = run_scan(&ScanArgs {
            template: file.path().to_path_buf(),
        })
        .unwrap();

        assert_eq!(report.rows_per_label, 2);
        let rows: Vec<(&str, Option<&str>, Option<&str>)> = report
            .placeholders
            .iter()
            .map(|r| (r.placeholder.as_str(), r.group.as_deref(), r.path.as_deref()))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("NAME", None, Some("product_id.name")),
                ("QTY_R1", Some("QTY"), None),
                ("QTY_R2", Some("QTY"), None),
            ]
        );
    }

    #[test]
    fn render_applies_record_and_overrides() {
        let template = template_file(
            r#"
name = "Lot"
root_entity = "stock.lot"
markup = "^FD${LOT}|${NOTE}^FS"

[[placeholders]]
placeholder = "LOT"
field_path = "name"
"#,
        );
        let mut record = NamedTempFile::new().unwrap();
        record.write_all(br#"{"name": "L-42"}"#).unwrap();
        let loaded = load_template(template.path()).unwrap();

        let plain = render_values(
            &loaded,
            &ValueArgs {
                record: Some(record.path().to_path_buf()),
                set: Vec::new(),
            },
        )
        .unwrap();
        assert_eq!(plain, "^FDL-42|^FS");

        let edited = render_values(
            &loaded,
            &ValueArgs {
                record: Some(record.path().to_path_buf()),
                set: vec!["LOT=".to_string(), "NOTE=keep dry".to_string()],
            },
        )
        .unwrap();
        insta::assert_snapshot!(edited, @"^FDL-42|keep dry^FS");
    }
}
