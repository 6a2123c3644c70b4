use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_xlsxwriter::{
    ColNum, Color, DocProperties, Format, FormatAlign, FormatBorder, RowNum, Workbook, Worksheet,
};

use crate::{
    catalog::RecordType,
    data::Row,
    export::{Severity, ValidationIssue, build_export_data},
    mapping::FieldMapping,
    profile::ColumnProfile,
};

pub const PROFILE_SHEET: &str = "Data Profile";
pub const MAPPING_SHEET: &str = "Field Mappings";
pub const DATA_SHEET: &str = "Cleaned Data";
pub const ISSUES_SHEET: &str = "Validation Issues";

const EMERALD: u32 = 0x10B981;
const AMBER: u32 = 0xF59E0B;
const AMBER_TINT: u32 = 0xFEF3C7;
const RED: u32 = 0xEF4444;
const HEADER_RULE: u32 = 0xD1D5DB;
const TOP_VALUES_IN_PROFILE: usize = 3;
const MIN_DATA_COLUMN_WIDTH: usize = 14;

struct Styles {
    header: Format,
    unmapped: Format,
    error: Format,
    warning: Format,
}

impl Styles {
    fn new() -> Self {
        Self {
            header: Format::new()
                .set_bold()
                .set_font_size(11)
                .set_font_color(Color::White)
                .set_background_color(Color::RGB(EMERALD))
                .set_align(FormatAlign::Left)
                .set_align(FormatAlign::VerticalCenter)
                .set_border_bottom(FormatBorder::Thin)
                .set_border_bottom_color(Color::RGB(HEADER_RULE)),
            unmapped: Format::new()
                .set_background_color(Color::RGB(AMBER_TINT))
                .set_font_color(Color::RGB(AMBER)),
            error: Format::new().set_bold().set_font_color(Color::RGB(RED)),
            warning: Format::new().set_bold().set_font_color(Color::RGB(AMBER)),
        }
    }

    fn severity(&self, severity: Severity) -> &Format {
        match severity {
            Severity::Error => &self.error,
            Severity::Warning => &self.warning,
        }
    }
}

fn row_num(index: usize) -> Result<RowNum> {
    RowNum::try_from(index).with_context(|| format!("Row {index} exceeds worksheet limits"))
}

fn col_num(index: usize) -> Result<ColNum> {
    ColNum::try_from(index).with_context(|| format!("Column {index} exceeds worksheet limits"))
}

fn new_sheet(name: &str) -> Result<Worksheet> {
    let mut sheet = Worksheet::new();
    sheet
        .set_name(name)
        .with_context(|| format!("Naming worksheet '{name}'"))?;
    Ok(sheet)
}

fn write_header_row(sheet: &mut Worksheet, columns: &[(&str, usize)], styles: &Styles) -> Result<()> {
    for (idx, (title, width)) in columns.iter().enumerate() {
        let col = col_num(idx)?;
        sheet.write_string_with_format(0, col, *title, &styles.header)?;
        sheet.set_column_width(col, *width as f64)?;
    }
    Ok(())
}

fn profile_sheet(profiles: &[ColumnProfile], styles: &Styles) -> Result<Worksheet> {
    let mut sheet = new_sheet(PROFILE_SHEET)?;
    write_header_row(
        &mut sheet,
        &[
            ("Column", 22),
            ("Type", 12),
            ("Non-Null", 12),
            ("Null", 10),
            ("Unique", 10),
            ("Min", 18),
            ("Max", 18),
            ("Top Values", 40),
        ],
        styles,
    )?;
    for (idx, profile) in profiles.iter().enumerate() {
        let row = row_num(idx + 1)?;
        sheet.write_string(row, 0, profile.name.as_str())?;
        sheet.write_string(row, 1, profile.detected_type.as_str())?;
        sheet.write_number(row, 2, profile.non_null_count as f64)?;
        sheet.write_number(row, 3, profile.null_count as f64)?;
        sheet.write_number(row, 4, profile.unique_count as f64)?;
        sheet.write_string(row, 5, profile.min.as_deref().unwrap_or(""))?;
        sheet.write_string(row, 6, profile.max.as_deref().unwrap_or(""))?;
        sheet.write_string(row, 7, profile.top_values_summary(TOP_VALUES_IN_PROFILE))?;
    }
    Ok(sheet)
}

fn mapping_sheet(mappings: &[FieldMapping], styles: &Styles) -> Result<Worksheet> {
    let mut sheet = new_sheet(MAPPING_SHEET)?;
    write_header_row(
        &mut sheet,
        &[("Source Column", 25), ("Target Field", 25), ("Transform", 20)],
        styles,
    )?;
    for (idx, mapping) in mappings.iter().enumerate() {
        let row = row_num(idx + 1)?;
        let target = if mapping.is_mapped() {
            mapping.target_field.as_str()
        } else {
            "(unmapped)"
        };
        let cells = [
            mapping.source_column.as_str(),
            target,
            mapping.transform.as_str(),
        ];
        for (col, value) in cells.into_iter().enumerate() {
            let col = col_num(col)?;
            if mapping.is_mapped() {
                sheet.write_string(row, col, value)?;
            } else {
                sheet.write_string_with_format(row, col, value, &styles.unmapped)?;
            }
        }
    }
    Ok(sheet)
}

fn data_sheet(headers: &[String], rows: &[Vec<String>], styles: &Styles) -> Result<Worksheet> {
    let mut sheet = new_sheet(DATA_SHEET)?;
    let columns = headers
        .iter()
        .map(|h| (h.as_str(), (h.chars().count() + 4).max(MIN_DATA_COLUMN_WIDTH)))
        .collect::<Vec<_>>();
    write_header_row(&mut sheet, &columns, styles)?;
    for (row_idx, values) in rows.iter().enumerate() {
        let row = row_num(row_idx + 1)?;
        for (col_idx, value) in values.iter().enumerate() {
            sheet.write_string(row, col_num(col_idx)?, value.as_str())?;
        }
    }
    Ok(sheet)
}

fn issues_sheet(issues: &[ValidationIssue], styles: &Styles) -> Result<Worksheet> {
    let mut sheet = new_sheet(ISSUES_SHEET)?;
    write_header_row(&mut sheet, &[("Severity", 12), ("Message", 60)], styles)?;
    if issues.is_empty() {
        sheet.write_string(1, 0, "Info")?;
        sheet.write_string(1, 1, "No validation issues found.")?;
        return Ok(sheet);
    }
    for (idx, issue) in issues.iter().enumerate() {
        let row = row_num(idx + 1)?;
        sheet.write_string_with_format(
            row,
            0,
            issue.severity.label(),
            styles.severity(issue.severity),
        )?;
        sheet.write_string(row, 1, issue.message.as_str())?;
    }
    Ok(sheet)
}

pub fn build_workbook(
    rows: &[Row],
    mappings: &[FieldMapping],
    record_type: RecordType,
    profiles: &[ColumnProfile],
) -> Result<Vec<u8>> {
    let data = build_export_data(rows, mappings, record_type);
    let styles = Styles::new();

    let mut workbook = Workbook::new();
    workbook.set_properties(
        &DocProperties::new()
            .set_author("NetSuite Workbench")
            .set_title(&format!("{} import workbench", record_type.label())),
    );
    workbook.push_worksheet(profile_sheet(profiles, &styles)?);
    workbook.push_worksheet(mapping_sheet(mappings, &styles)?);
    workbook.push_worksheet(data_sheet(&data.headers, &data.rows, &styles)?);
    workbook.push_worksheet(issues_sheet(&data.issues, &styles)?);
    workbook.save_to_buffer().context("Serializing workbook")
}

pub fn workbook_file_name(record_type: RecordType, timestamp: DateTime<Utc>) -> String {
    format!(
        "workbench-{}-{}.xlsx",
        record_type.kebab(),
        timestamp.format("%Y-%m-%d-%H-%M-%S")
    )
}
