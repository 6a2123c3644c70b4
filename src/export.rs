use std::{borrow::Cow, collections::HashSet, io};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::{QuoteStyle, Terminator};
use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    catalog::{RecordType, field_label, required_fields_for},
    data::{Row, cell, is_blank},
    mapping::FieldMapping,
};

const UNMAPPED_PREVIEW_LIMIT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Error => "Error",
            Severity::Warning => "Warning",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    #[serde(rename = "type")]
    pub severity: Severity,
    pub message: String,
}

impl ValidationIssue {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub issues: Vec<ValidationIssue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResult {
    pub csv_content: String,
    pub file_name: String,
    pub row_count: usize,
    pub column_count: usize,
    pub issues: Vec<ValidationIssue>,
}

impl ExportResult {
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(ValidationIssue::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|issue| issue.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|issue| !issue.is_error())
    }

    pub fn preview(&self, rows: usize) -> Result<(Vec<String>, Vec<Vec<String>>)> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(self.csv_content.as_bytes());
        let headers = reader
            .headers()
            .context("Reading export headers")?
            .iter()
            .map(str::to_string)
            .collect();
        let mut preview = Vec::new();
        for record in reader.records().take(rows) {
            let record = record.context("Reading export preview row")?;
            preview.push(record.iter().map(str::to_string).collect());
        }
        Ok((headers, preview))
    }
}

pub fn build_export_data(
    rows: &[Row],
    mappings: &[FieldMapping],
    record_type: RecordType,
) -> ExportData {
    let mut issues = Vec::new();
    let active = mappings
        .iter()
        .filter(|mapping| mapping.is_mapped())
        .collect::<Vec<_>>();

    let required = required_fields_for(record_type);
    let mapped_targets = active
        .iter()
        .map(|m| m.target_field.as_str())
        .collect::<HashSet<_>>();
    for field in &required {
        if !mapped_targets.contains(field.field_id) {
            issues.push(ValidationIssue::error(format!(
                "Required field \"{}\" is not mapped",
                field.label
            )));
        }
    }

    let mapped_sources = active
        .iter()
        .map(|m| m.source_column.as_str())
        .collect::<HashSet<_>>();
    let unmapped_sources = rows
        .first()
        .map(|row| {
            row.keys()
                .filter(|header| !mapped_sources.contains(header.as_str()))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    if !unmapped_sources.is_empty() {
        let ellipsis = if unmapped_sources.len() > UNMAPPED_PREVIEW_LIMIT {
            "..."
        } else {
            ""
        };
        issues.push(ValidationIssue::warning(format!(
            "{} source column(s) not mapped: {}{}",
            unmapped_sources.len(),
            unmapped_sources
                .iter()
                .take(UNMAPPED_PREVIEW_LIMIT)
                .join(", "),
            ellipsis
        )));
    }

    if active.is_empty() {
        issues.push(ValidationIssue::error("No columns are mapped"));
    }

    let headers = active
        .iter()
        .map(|m| {
            field_label(record_type, &m.target_field)
                .map(str::to_string)
                .unwrap_or_else(|| m.target_field.clone())
        })
        .collect::<Vec<_>>();

    let output_rows = rows
        .iter()
        .map(|row| {
            active
                .iter()
                .map(|m| m.transform.apply(cell(row, &m.source_column)))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    for field in &required {
        let Some(mapping) = active.iter().find(|m| m.target_field == field.field_id) else {
            continue;
        };
        let empty = rows
            .iter()
            .filter(|row| is_blank(cell(row, &mapping.source_column)))
            .count();
        if empty > 0 {
            issues.push(ValidationIssue::warning(format!(
                "Required field \"{}\" has {} empty value(s)",
                field.label, empty
            )));
        }
    }

    debug!(
        "Built {} export row(s) with {} column(s) and {} issue(s) for {}",
        output_rows.len(),
        headers.len(),
        issues.len(),
        record_type
    );

    ExportData {
        headers,
        rows: output_rows,
        issues,
    }
}

/// Serializes headers and rows as CSV with CRLF separators and no final
/// terminator. Fields are quoted when they hold a comma, quote, or line
/// break, or begin or end with a space.
pub fn to_csv_string(headers: &[String], rows: &[Vec<String>]) -> Result<String> {
    if headers.is_empty() {
        return Ok("\r\n".repeat(rows.len().saturating_sub(1)));
    }
    let mut writer = csv::WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::CRLF)
        .flexible(true)
        .from_writer(Vec::new());
    write_quoted(&mut writer, headers).context("Writing export header")?;
    for (idx, row) in rows.iter().enumerate() {
        write_quoted(&mut writer, row).with_context(|| format!("Writing export row {}", idx + 1))?;
    }
    let mut bytes = writer.into_inner().context("Flushing export CSV")?;
    if bytes.ends_with(b"\r\n") {
        bytes.truncate(bytes.len() - 2);
    }
    String::from_utf8(bytes).context("Export CSV is not valid UTF-8")
}

fn write_quoted<W: io::Write>(writer: &mut csv::Writer<W>, fields: &[String]) -> csv::Result<()> {
    for field in fields {
        writer.write_field(quote_field(field).as_bytes())?;
    }
    writer.write_record(None::<&[u8]>)
}

fn quote_field(value: &str) -> Cow<'_, str> {
    let needs_quotes = value.contains([',', '"', '\r', '\n', '\u{feff}'])
        || value.starts_with(' ')
        || value.ends_with(' ');
    if needs_quotes {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

pub fn export_file_name(record_type: RecordType, timestamp: DateTime<Utc>) -> String {
    format!(
        "netsuite-{}-import-{}.csv",
        record_type.kebab(),
        timestamp.timestamp_millis()
    )
}

pub fn generate_export(
    rows: &[Row],
    mappings: &[FieldMapping],
    record_type: RecordType,
) -> Result<ExportResult> {
    generate_export_at(rows, mappings, record_type, Utc::now())
}

pub fn generate_export_at(
    rows: &[Row],
    mappings: &[FieldMapping],
    record_type: RecordType,
    timestamp: DateTime<Utc>,
) -> Result<ExportResult> {
    let ExportData {
        headers,
        rows: output_rows,
        issues,
    } = build_export_data(rows, mappings, record_type);
    let csv_content = to_csv_string(&headers, &output_rows)?;
    Ok(ExportResult {
        csv_content,
        file_name: export_file_name(record_type, timestamp),
        row_count: output_rows.len(),
        column_count: headers.len(),
        issues,
    })
}
