use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkbenchError {
    #[error("Unknown record type '{0}'")]
    UnknownRecordType(String),
    #[error("File appears to be empty or has no valid data.")]
    EmptyUpload,
    #[error("Could not detect column headers in the first row.")]
    MissingHeaders,
    #[error("Spreadsheet has headers but no data rows.")]
    NoDataRows,
    #[error("Unsupported file type '{0}'. Please upload a .csv, .xlsx, or .xls file.")]
    UnsupportedFileType(String),
    #[error("Mapping template '{0}' not found")]
    TemplateNotFound(String),
    #[error("Invalid user id '{0}'")]
    InvalidUserId(String),
    #[error("Template name cannot be empty")]
    EmptyTemplateName,
    #[error("Export blocked by {0} validation error(s); rerun with --force to write anyway")]
    ExportBlocked(usize),
}
