use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::catalog::RecordType;

pub const DEFAULT_STORE_DIR: &str = ".workbench/templates";
pub const DEFAULT_USER: &str = "default";

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Profile spreadsheets, map columns to NetSuite fields, and generate import files",
    long_about = None
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Directory holding stored mapping templates
    #[arg(long, global = true, env = "WORKBENCH_STORE", default_value = DEFAULT_STORE_DIR)]
    pub store: PathBuf,
    /// User id that owns stored templates
    #[arg(long, global = true, env = "WORKBENCH_USER", default_value = DEFAULT_USER)]
    pub user: String,
    /// Delimiter for text uploads (supports ',', 'tab', ';', '|')
    #[arg(long, global = true, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of text uploads (defaults to utf-8)
    #[arg(long = "input-encoding", global = true)]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Detect column types and summarize every column of an upload
    Profile(ProfileArgs),
    /// List NetSuite import fields for one or all record types
    Fields(FieldsArgs),
    /// List the transforms a mapping can apply
    Transforms,
    /// Auto-match upload columns to the fields of a record type
    Match(MatchArgs),
    /// Validate mappings and write the NetSuite import CSV
    Export(ExportArgs),
    /// Manage stored mapping templates
    Template(TemplateArgs),
}

#[derive(Debug, Args)]
pub struct ProfileArgs {
    /// Upload to profile (.csv, .tsv, .txt, .xlsx, .xls, .xlsm, .ods, or - for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Print profiles as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct FieldsArgs {
    /// Record type to list (all record types when omitted)
    #[arg(short = 'r', long = "record-type", value_parser = parse_record_type)]
    pub record_type: Option<RecordType>,
    /// Only show required fields
    #[arg(long)]
    pub required: bool,
}

#[derive(Debug, Args)]
pub struct MatchArgs {
    /// Upload whose headers should be matched
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Target record type (e.g. customer, sales-order, "Journal Entry")
    #[arg(short = 'r', long = "record-type", value_parser = parse_record_type)]
    pub record_type: RecordType,
    /// Write the resulting mapping file (.yml/.yaml or .json)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Store the resulting mappings as a named template
    #[arg(long = "save-template")]
    pub save_template: Option<String>,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Upload to export
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Target record type
    #[arg(short = 'r', long = "record-type", value_parser = parse_record_type)]
    pub record_type: RecordType,
    /// Mapping file produced by `match` or edited by hand
    #[arg(long, conflicts_with = "template")]
    pub mapping: Option<PathBuf>,
    /// Stored template to apply, by name or id
    #[arg(long)]
    pub template: Option<String>,
    /// Fill still-unmapped columns with auto-matched fields
    #[arg(long = "auto-match")]
    pub auto_match: bool,
    /// Output CSV path (`-` for stdout)
    #[arg(short = 'o', long = "output", conflicts_with = "output_dir")]
    pub output: Option<PathBuf>,
    /// Directory to write the CSV into under its generated file name
    #[arg(long = "output-dir")]
    pub output_dir: Option<PathBuf>,
    /// Also write the multi-sheet workbook report to this path (a directory gets the generated name)
    #[arg(long)]
    pub workbook: Option<PathBuf>,
    /// Print the first N export rows as a table
    #[arg(long)]
    pub preview: Option<usize>,
    /// Write output even when validation errors are present
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct TemplateArgs {
    #[command(subcommand)]
    pub command: TemplateCommand,
}

#[derive(Debug, Subcommand)]
pub enum TemplateCommand {
    /// List stored templates, most recently updated first
    List {
        /// Print templates as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a stored template's mappings
    Show {
        /// Template name or id
        template: String,
    },
    /// Delete a stored template
    Delete {
        /// Template name or id
        template: String,
    },
    /// Store a mapping file as a template, replacing one with the same name
    Save {
        /// Mapping file (.yml/.yaml or .json)
        #[arg(short = 'm', long = "mapping")]
        mapping: PathBuf,
        /// Template name (defaults to the name inside the mapping file)
        #[arg(long)]
        name: Option<String>,
    },
}

pub fn parse_record_type(value: &str) -> Result<RecordType, String> {
    value.parse::<RecordType>().map_err(|err| {
        let known = RecordType::ALL
            .iter()
            .map(|record_type| record_type.kebab())
            .collect::<Vec<_>>()
            .join(", ");
        format!("{err} (expected one of: {known})")
    })
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
