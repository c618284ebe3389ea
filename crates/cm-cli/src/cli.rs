//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use cm_cli::commands::ExportOverrides;
use cm_model::{DEFAULT_CLASSES, Dpi, ExportFormat, parse_class_count};

#[derive(Parser)]
#[command(
    name = "confusion-matrix",
    version,
    about = "Enter a confusion matrix and export it as an annotated heatmap",
    long_about = "Enter a confusion matrix in a TOML session file and export it as an\n\
                  annotated heatmap.\n\n\
                  Rows are actual classes, columns are predicted classes.\n\
                  Supports PNG and JPG at 300 or 600 DPI, and vector PDF."
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Render a session file to PNG, JPG or PDF.
    Export(ExportArgs),

    /// Print the session's matrix as an entry grid.
    Preview(PreviewArgs),

    /// Write a starter session file.
    Template(TemplateArgs),
}

#[derive(Parser)]
pub struct ExportArgs {
    /// Session file (TOML) with classes, labels and counts.
    #[arg(value_name = "SESSION")]
    pub session: PathBuf,

    /// Output format (overrides the session's export table).
    #[arg(long = "format", value_enum)]
    pub format: Option<FormatArg>,

    /// Output resolution (overrides the session's export table).
    #[arg(long = "dpi", value_enum)]
    pub dpi: Option<DpiArg>,

    /// File name without extension (overrides the session's export table).
    #[arg(long = "file-name", value_name = "NAME")]
    pub file_name: Option<String>,

    /// Directory to write into (default: the session file's directory).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// TrueType font for PNG/JPG text (default: embedded sans-serif).
    #[arg(long = "font", value_name = "PATH")]
    pub font: Option<PathBuf>,
}

impl ExportArgs {
    pub fn overrides(&self) -> ExportOverrides {
        ExportOverrides {
            format: self.format.map(ExportFormat::from),
            dpi: self.dpi.map(Dpi::from),
            file_name: self.file_name.clone(),
            output_dir: self.output_dir.clone(),
            font: self.font.clone(),
        }
    }
}

#[derive(Parser)]
pub struct PreviewArgs {
    /// Session file (TOML) to display.
    #[arg(value_name = "SESSION")]
    pub session: PathBuf,
}

#[derive(Parser)]
pub struct TemplateArgs {
    /// Number of classes (2-20).
    #[arg(
        long = "classes",
        default_value_t = DEFAULT_CLASSES,
        value_parser = parse_class_count
    )]
    pub classes: usize,

    /// Write to this file instead of stdout.
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Png,
    #[value(alias = "jpeg")]
    Jpg,
    Pdf,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Png => ExportFormat::Png,
            FormatArg::Jpg => ExportFormat::Jpg,
            FormatArg::Pdf => ExportFormat::Pdf,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DpiArg {
    #[value(name = "300")]
    Dpi300,
    #[value(name = "600")]
    Dpi600,
}

impl From<DpiArg> for Dpi {
    fn from(arg: DpiArg) -> Self {
        match arg {
            DpiArg::Dpi300 => Dpi::Dpi300,
            DpiArg::Dpi600 => Dpi::Dpi600,
        }
    }
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
