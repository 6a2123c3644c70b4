mod common;

use calamine::{Reader, open_workbook_auto};
use chrono::{TimeZone, Utc};
use netsuite_workbench::{
    catalog::RecordType,
    export::{Severity, build_export_data, generate_export, generate_export_at},
    mapping::FieldMapping,
    profile::profile_columns,
    transform::Transform,
    workbook::{DATA_SHEET, ISSUES_SHEET, MAPPING_SHEET, PROFILE_SHEET, build_workbook},
};

use common::{TestWorkspace, headers, mapping, row};

#[test]
fn unmapped_required_email_is_an_error_but_csv_is_still_produced() {
    let rows = vec![row(&[("Name", "Acme"), ("Mail", "a@acme.io")])];
    let mappings = vec![mapping("Name", "companyname"), FieldMapping::unmapped("Mail")];
    let result = generate_export(&rows, &mappings, RecordType::Customer).unwrap();

    assert!(result.has_errors());
    assert!(
        result
            .errors()
            .any(|issue| issue.message == "Required field \"Email\" is not mapped")
    );
    assert!(
        result
            .warnings()
            .any(|issue| issue.message == "1 source column(s) not mapped: Mail")
    );
    assert_eq!(result.csv_content, "Company Name\r\nAcme");
    assert_eq!(result.row_count, 1);
    assert_eq!(result.column_count, 1);
}

#[test]
fn mapped_and_trimmed_columns_round_trip_cleanly() {
    let rows = vec![row(&[("Full Name", " Jane Doe "), ("E-Mail", " Jane@X.com")])];
    let mappings = vec![
        FieldMapping::new("Full Name", "companyname", Transform::Trim),
        FieldMapping::new("E-Mail", "email", Transform::TrimLowercase),
    ];
    let timestamp = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let result = generate_export_at(&rows, &mappings, RecordType::Customer, timestamp).unwrap();

    assert!(result.issues.is_empty(), "{:?}", result.issues);
    assert_eq!(result.csv_content, "Company Name,Email\r\nJane Doe,jane@x.com");
    assert_eq!(
        result.file_name,
        format!("netsuite-customer-import-{}.csv", timestamp.timestamp_millis())
    );

    let (preview_headers, preview_rows) = result.preview(5).unwrap();
    assert_eq!(preview_headers, headers(&["Company Name", "Email"]));
    assert_eq!(preview_rows, vec![headers(&["Jane Doe", "jane@x.com"])]);
}

#[test]
fn nothing_mapped_reports_every_problem() {
    let rows = vec![row(&[("A", "1"), ("B", "2"), ("C", "3"), ("D", "4")])];
    let mappings = ["A", "B", "C", "D"]
        .map(|name| FieldMapping::unmapped(name))
        .to_vec();
    let data = build_export_data(&rows, &mappings, RecordType::Vendor);
    let messages = data
        .issues
        .iter()
        .map(|issue| (issue.severity, issue.message.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(
        messages,
        vec![
            (Severity::Error, "Required field \"Company Name\" is not mapped"),
            (Severity::Error, "Required field \"Subsidiary\" is not mapped"),
            (Severity::Warning, "4 source column(s) not mapped: A, B, C..."),
            (Severity::Error, "No columns are mapped"),
        ]
    );
    assert!(data.headers.is_empty());
}

#[test]
fn export_without_mapped_columns_has_no_fields() {
    let rows = vec![
        row(&[("A", "1"), ("B", "2")]),
        row(&[("A", "3"), ("B", "4")]),
    ];
    let mappings = vec![FieldMapping::unmapped("A"), FieldMapping::unmapped("B")];
    let result = generate_export(&rows, &mappings, RecordType::Customer).unwrap();

    assert_eq!(result.column_count, 0);
    assert_eq!(result.row_count, 2);
    assert!(result.errors().any(|issue| issue.message == "No columns are mapped"));
    assert_eq!(result.csv_content, "\r\n");

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(result.csv_content.as_bytes());
    for record in reader.records() {
        assert_eq!(record.unwrap().len(), 0);
    }
}

#[test]
fn leading_and_trailing_spaces_are_quoted() {
    let rows = vec![row(&[("Name", " x"), ("Mail", "y@z.io ")])];
    let mappings = vec![mapping("Name", "companyname"), mapping("Mail", "email")];
    let result = generate_export(&rows, &mappings, RecordType::Customer).unwrap();
    assert_eq!(result.csv_content, "Company Name,Email\r\n\" x\",\"y@z.io \"");
    let (_, preview) = result.preview(1).unwrap();
    assert_eq!(preview, vec![headers(&[" x", "y@z.io "])]);
}

#[test]
fn blank_required_values_are_counted() {
    let rows = vec![
        row(&[("Name", "Acme"), ("Mail", "a@acme.io")]),
        row(&[("Name", "  "), ("Mail", "")]),
        row(&[("Name", "Gamma"), ("Mail", "")]),
    ];
    let mappings = vec![mapping("Name", "companyname"), mapping("Mail", "email")];
    let data = build_export_data(&rows, &mappings, RecordType::Customer);
    let warnings = data
        .issues
        .iter()
        .map(|issue| issue.message.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        warnings,
        [
            "Required field \"Company Name\" has 1 empty value(s)",
            "Required field \"Email\" has 2 empty value(s)",
        ]
    );
}

#[test]
fn cells_with_delimiters_are_quoted() {
    let rows = vec![row(&[("Name", "Acme, Inc."), ("Mail", "say \"hi\"@x.io")])];
    let mappings = vec![mapping("Name", "companyname"), mapping("Mail", "email")];
    let result = generate_export(&rows, &mappings, RecordType::Customer).unwrap();
    assert_eq!(
        result.csv_content,
        "Company Name,Email\r\n\"Acme, Inc.\",\"say \"\"hi\"\"@x.io\""
    );
}

#[test]
fn workbook_sheets_mirror_the_export() {
    let workspace = TestWorkspace::new();
    let rows = vec![
        row(&[("Name", "acme"), ("Mail", "a@acme.io"), ("Notes", "x")]),
        row(&[("Name", "beta"), ("Mail", "b@beta.io"), ("Notes", "")]),
    ];
    let mappings = vec![
        FieldMapping::new("Name", "companyname", Transform::Uppercase),
        mapping("Mail", "email"),
        FieldMapping::unmapped("Notes"),
    ];
    let profiles = profile_columns(&headers(&["Name", "Mail", "Notes"]), &rows);
    let bytes = build_workbook(&rows, &mappings, RecordType::Customer, &profiles).unwrap();
    assert!(bytes.starts_with(b"PK"));

    let path = workspace.path().join("report.xlsx");
    std::fs::write(&path, &bytes).unwrap();
    let mut workbook = open_workbook_auto(&path).unwrap();
    assert_eq!(
        workbook.sheet_names(),
        [PROFILE_SHEET, MAPPING_SHEET, DATA_SHEET, ISSUES_SHEET]
    );

    let cleaned = workbook.worksheet_range_at(2).unwrap().unwrap();
    let cleaned_rows = cleaned
        .rows()
        .map(|cells| cells.iter().map(|c| c.to_string()).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    assert_eq!(
        cleaned_rows,
        vec![
            headers(&["Company Name", "Email"]),
            headers(&["ACME", "a@acme.io"]),
            headers(&["BETA", "b@beta.io"]),
        ]
    );

    let mapping_sheet = workbook.worksheet_range_at(1).unwrap().unwrap();
    assert_eq!(
        mapping_sheet.get((3, 1)).map(|c| c.to_string()),
        Some("(unmapped)".to_string())
    );

    let issues = workbook.worksheet_range_at(3).unwrap().unwrap();
    assert_eq!(
        issues.get((1, 1)).map(|c| c.to_string()),
        Some("1 source column(s) not mapped: Notes".to_string())
    );
}

#[test]
fn clean_workbook_reports_no_issues() {
    let rows = vec![row(&[("Name", "Acme"), ("Mail", "a@acme.io")])];
    let mappings = vec![mapping("Name", "companyname"), mapping("Mail", "email")];
    let profiles = profile_columns(&headers(&["Name", "Mail"]), &rows);
    let bytes = build_workbook(&rows, &mappings, RecordType::Customer, &profiles).unwrap();

    let workspace = TestWorkspace::new();
    let path = workspace.path().join("clean.xlsx");
    std::fs::write(&path, &bytes).unwrap();
    let mut workbook = open_workbook_auto(&path).unwrap();
    let issues = workbook.worksheet_range_at(3).unwrap().unwrap();
    assert_eq!(issues.get((1, 0)).map(|c| c.to_string()), Some("Info".into()));
    assert_eq!(
        issues.get((1, 1)).map(|c| c.to_string()),
        Some("No validation issues found.".into())
    );
}
