//! Upload parsing and output helpers.
//!
//! All file I/O outside the template store flows through this module:
//!
//! - **Delimiter resolution**: extension-based auto-detection (`.tsv` → tab,
//!   everything else → comma) with manual override support.
//! - **Encoding**: delimited text is decoded via `encoding_rs`, defaulting
//!   to UTF-8.
//! - **Spreadsheets**: `.xlsx`, `.xlsm`, `.xls`, and `.ods` uploads are read
//!   from their first worksheet through `calamine`.
//! - **stdin/stdout**: the `-` path convention routes through standard streams.

use std::{
    fs::{self, File},
    io::{self, BufReader, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use calamine::{Data, DataType, Reader, open_workbook_auto};
use encoding_rs::{Encoding, UTF_8};
use log::debug;

use crate::{
    data::{Dataset, Row, format_locale_date, format_number},
    error::WorkbenchError,
};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

const DELIMITED_EXTENSIONS: &[&str] = &["csv", "tsv", "txt"];
const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "ods"];

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true);
    builder.from_reader(reader)
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}

pub fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

/// Parses an uploaded file into headers and rows, dispatching on extension.
///
/// `-` reads delimited text from stdin.
pub fn load_dataset(
    path: &Path,
    delimiter: Option<u8>,
    encoding: &'static Encoding,
) -> Result<Dataset> {
    if is_dash(path) {
        let delimiter = delimiter.unwrap_or(DEFAULT_CSV_DELIMITER);
        return read_delimited(io::stdin().lock(), delimiter, encoding);
    }
    let extension = extension_of(path).unwrap_or_default();
    let dataset = if DELIMITED_EXTENSIONS.contains(&extension.as_str()) {
        let file = File::open(path).with_context(|| format!("Opening input file {path:?}"))?;
        let delimiter = resolve_input_delimiter(path, delimiter);
        read_delimited(BufReader::new(file), delimiter, encoding)
            .with_context(|| format!("Parsing {path:?}"))?
    } else if SPREADSHEET_EXTENSIONS.contains(&extension.as_str()) {
        read_spreadsheet(path)?
    } else {
        return Err(WorkbenchError::UnsupportedFileType(extension).into());
    };
    debug!(
        "Loaded {} row(s) across {} column(s) from {path:?}",
        dataset.row_count(),
        dataset.headers.len()
    );
    Ok(dataset)
}

pub fn read_delimited<R>(reader: R, delimiter: u8, encoding: &'static Encoding) -> Result<Dataset>
where
    R: Read,
{
    let mut reader = open_csv_reader(reader, delimiter);
    let headers = decode_record(reader.byte_headers()?, encoding)?;
    let mut records = Vec::new();
    let mut record = csv::ByteRecord::new();
    while reader.read_byte_record(&mut record)? {
        records.push(decode_record(&record, encoding)?);
    }
    if headers.is_empty() || records.is_empty() {
        return Err(WorkbenchError::EmptyUpload.into());
    }
    Ok(Dataset::from_records(headers, records))
}

fn render_cell(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) => value.clone(),
        Data::Int(value) => value.to_string(),
        Data::Float(value) => format_number(*value),
        Data::Bool(value) => value.to_string(),
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_datetime()
            .map(|value| format_locale_date(&value))
            .unwrap_or_else(|| cell.to_string()),
        other => other.to_string(),
    }
}

fn read_spreadsheet(path: &Path) -> Result<Dataset> {
    let mut workbook =
        open_workbook_auto(path).with_context(|| format!("Opening spreadsheet {path:?}"))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(WorkbenchError::EmptyUpload)?
        .with_context(|| format!("Reading first worksheet of {path:?}"))?;
    let grid = range
        .rows()
        .map(|cells| cells.iter().map(render_cell).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    dataset_from_grid(grid)
}

/// Turns a raw spreadsheet grid into a dataset.
///
/// The first row supplies headers (trimmed, blanks dropped). Each header
/// keeps the cells of its own column; fully-empty rows are skipped.
pub fn dataset_from_grid(grid: Vec<Vec<String>>) -> Result<Dataset> {
    if grid.len() < 2 {
        return Err(WorkbenchError::EmptyUpload.into());
    }
    let mut grid = grid.into_iter();
    let header_cells = grid.next().unwrap_or_default();
    let columns = header_cells
        .iter()
        .enumerate()
        .filter_map(|(idx, raw)| {
            let header = raw.trim();
            (!header.is_empty()).then(|| (idx, header.to_string()))
        })
        .collect::<Vec<_>>();
    if columns.is_empty() {
        return Err(WorkbenchError::MissingHeaders.into());
    }

    let rows = grid
        .filter(|cells| cells.iter().any(|cell| !cell.trim().is_empty()))
        .map(|cells| {
            columns
                .iter()
                .map(|(idx, header)| (header.clone(), cells.get(*idx).cloned().unwrap_or_default()))
                .collect::<Row>()
        })
        .collect::<Vec<_>>();
    if rows.is_empty() {
        return Err(WorkbenchError::NoDataRows.into());
    }
    let headers = columns.into_iter().map(|(_, header)| header).collect();
    Ok(Dataset::new(headers, rows))
}

pub fn write_output(path: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match path {
        Some(p) if !is_dash(p) => {
            if let Some(parent) = p.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Creating output directory {parent:?}"))?;
            }
            fs::write(p, bytes).with_context(|| format!("Writing output file {p:?}"))
        }
        _ => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(bytes).context("Writing to stdout")?;
            stdout.flush().context("Flushing stdout")
        }
    }
}
