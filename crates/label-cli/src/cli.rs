//! CLI argument definitions for `labelctl`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use label_map::MappingDirective;

#[derive(Parser)]
#[command(
    name = "labelctl",
    version,
    about = "Render label templates and send them to a network print service",
    long_about = "Render printer-language label templates against JSON records or \
                  CSV files and send them to a network print service.\n\n\
                  Print service settings are read from --config, or from the file \
                  named by LABEL_PRINT_CONFIG; LABEL_PRINT_ENDPOINT, LABEL_PRINT_USER \
                  and LABEL_PRINT_PASSWORD override the file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include rendered label values in logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Print service configuration file (TOML).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the placeholders of a template with their bindings and groups.
    Scan(ScanArgs),

    /// Render a template to stdout or a file without printing.
    Render(RenderArgs),

    /// Print one label per JSON record.
    Print(PrintArgs),

    /// Print labels from the rows of a CSV file.
    PrintCsv(PrintCsvArgs),

    /// Send the unrendered template markup to a printer.
    TestPrint(TestPrintArgs),

    /// Save a PNG preview of a template.
    Preview(PreviewArgs),
}

#[derive(Args)]
pub struct ScanArgs {
    /// Template file (TOML).
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,
}

#[derive(Args)]
pub struct ValueArgs {
    /// JSON file with the source record.
    #[arg(long = "record", value_name = "PATH")]
    pub record: Option<PathBuf>,

    /// Override a placeholder value (NAME=VALUE); empty values keep the
    /// record value.
    #[arg(long = "set", value_name = "NAME=VALUE")]
    pub set: Vec<String>,
}

#[derive(Args)]
pub struct RenderArgs {
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,

    #[command(flatten)]
    pub values: ValueArgs,

    /// Write the rendered markup to a file instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct PrinterArgs {
    /// Printer address passed to the print service.
    #[arg(long = "printer", value_name = "ADDRESS")]
    pub printer: String,

    /// Copies per label.
    #[arg(long = "copies", default_value_t = 1)]
    pub copies: u32,
}

#[derive(Args)]
pub struct PrintArgs {
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,

    /// JSON file with one record or an array of records.
    #[arg(long = "records", value_name = "PATH", conflicts_with = "set")]
    pub records: Option<PathBuf>,

    /// Print a single edited label from --record with these overrides
    /// (NAME=VALUE).
    #[arg(long = "set", value_name = "NAME=VALUE")]
    pub set: Vec<String>,

    /// Source record for an edited label.
    #[arg(long = "record", value_name = "PATH", requires = "set")]
    pub record: Option<PathBuf>,

    #[command(flatten)]
    pub printer: PrinterArgs,
}

#[derive(Args)]
pub struct PrintCsvArgs {
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,

    /// CSV file; the first row holds the headers.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    #[command(flatten)]
    pub printer: PrinterArgs,

    /// Map a placeholder (or group base) to a header or column (NAME=COLUMN,
    /// e.g. LOT=B, LOT=2 or "LOT=Lot Number").
    #[arg(long = "map", value_name = "NAME=COLUMN")]
    pub map: Vec<MappingDirective>,

    /// Field delimiter.
    #[arg(long = "delimiter", default_value = ",")]
    pub delimiter: String,

    /// Text encoding (utf-8, utf-8-sig, latin-1, or any WHATWG label).
    #[arg(long = "encoding", default_value = "utf-8")]
    pub encoding: String,

    /// First data row to print; row 0 is the header.
    #[arg(long = "start-row", default_value_t = 1)]
    pub start_row: usize,

    /// Rows in the test print (default from configuration).
    #[arg(long = "test-rows", value_name = "N", conflicts_with = "all")]
    pub test_rows: Option<usize>,

    /// Print every row without a test print.
    #[arg(long = "all")]
    pub all: bool,

    /// Print the remainder after the test print without asking.
    #[arg(long = "yes", short = 'y')]
    pub yes: bool,

    /// Labels per dispatch (default from configuration).
    #[arg(long = "batch-size", value_name = "N")]
    pub batch_size: Option<usize>,

    /// JSON record whose values fill placeholders the CSV does not supply.
    #[arg(long = "record", value_name = "PATH")]
    pub record: Option<PathBuf>,
}

#[derive(Args)]
pub struct TestPrintArgs {
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,

    #[command(flatten)]
    pub printer: PrinterArgs,
}

#[derive(Args)]
pub struct PreviewArgs {
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,

    #[command(flatten)]
    pub values: ValueArgs,

    /// Where to write the PNG image.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_csv_mapping_directives() {
        let cli = Cli::try_parse_from([
            "labelctl",
            "print-csv",
            "label.toml",
            "rows.csv",
            "--printer",
            "10.0.0.5",
            "--map",
            "LOT=B",
            "--map",
            "NAME=Product Name",
            "--test-rows",
            "4",
        ])
        .unwrap();
        let Command::PrintCsv(args) = cli.command else {
            panic!("expected print-csv");
        };
        assert_eq!(args.map.len(), 2);
        assert_eq!(args.map[1].selector.as_deref(), Some("Product Name"));
        assert_eq!(args.test_rows, Some(4));
        assert_eq!(args.start_row, 1);
    }

    #[test]
    fn test_rows_conflict_with_all() {
        let result = Cli::try_parse_from([
            "labelctl",
            "print-csv",
            "label.toml",
            "rows.csv",
            "--printer",
            "p",
            "--all",
            "--test-rows",
            "3",
        ]);
        assert!(result.is_err());
    }
}
