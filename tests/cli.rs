mod common;

use std::fs;

use assert_cmd::Command;
use netsuite_workbench::template_store::load_template_file;
use predicates::prelude::*;
use predicates::str::contains;

use common::{TestWorkspace, fixture_path};

fn workbench(workspace: &TestWorkspace) -> Command {
    let mut cmd = Command::cargo_bin("netsuite-workbench").expect("binary exists");
    cmd.env("WORKBENCH_STORE", workspace.store())
        .env("WORKBENCH_USER", "tester")
        .env_remove("RUST_LOG");
    cmd
}

fn fixture() -> String {
    fixture_path("customers.csv").to_string_lossy().into_owned()
}

#[test]
fn profile_prints_detected_types() {
    let workspace = TestWorkspace::new();
    workbench(&workspace)
        .args(["profile", "-i", &fixture()])
        .assert()
        .success()
        .stdout(contains("Column"))
        .stdout(contains("E-Mail"))
        .stdout(contains("currency"));
}

#[test]
fn profile_json_is_machine_readable() {
    let workspace = TestWorkspace::new();
    let output = workbench(&workspace)
        .args(["profile", "-i", &fixture(), "--json"])
        .output()
        .expect("run profile");
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json stdout");
    assert_eq!(json[1]["name"], "E-Mail");
    assert_eq!(json[1]["detectedType"], "email");
    assert_eq!(json[1]["nullCount"], 1);
}

#[test]
fn fields_and_transforms_list_catalog_entries() {
    let workspace = TestWorkspace::new();
    workbench(&workspace)
        .args(["fields", "-r", "vendor", "--required"])
        .assert()
        .success()
        .stdout(contains("subsidiary"))
        .stdout(contains("phone").not());
    workbench(&workspace)
        .args(["transforms"])
        .assert()
        .success()
        .stdout(contains("date-mm/dd/yyyy"))
        .stdout(contains("Boolean T/F"));
}

#[test]
fn unknown_record_type_is_a_usage_error() {
    let workspace = TestWorkspace::new();
    workbench(&workspace)
        .args(["fields", "-r", "invoice"])
        .assert()
        .failure()
        .stderr(contains("Unknown record type 'invoice'"));
}

#[test]
fn match_writes_mapping_file_and_stores_template() {
    let workspace = TestWorkspace::new();
    let mapping_path = workspace.path().join("customers.yml");
    workbench(&workspace)
        .args([
            "match",
            "-i",
            &fixture(),
            "-r",
            "customer",
            "-o",
            mapping_path.to_str().unwrap(),
            "--save-template",
            "crm",
        ])
        .assert()
        .success()
        .stdout(contains("creditlimit"));

    let template = load_template_file(&mapping_path).expect("mapping file");
    assert_eq!(template.name, "crm");
    assert_eq!(template.mappings.len(), 5);
    assert_eq!(template.mappings[1].target_field, "email");
    assert!(!template.mappings[4].is_mapped());

    workbench(&workspace)
        .args(["template", "list"])
        .assert()
        .success()
        .stdout(contains("crm"))
        .stdout(contains("4/5"));
}

#[test]
fn export_writes_csv_to_stdout() {
    let workspace = TestWorkspace::new();
    workbench(&workspace)
        .args(["export", "-i", &fixture(), "-r", "customer", "-o", "-"])
        .assert()
        .success()
        .stdout(contains("Company Name,Email,Phone,Credit Limit\r\n"))
        .stdout(contains("Acme Corp,ap@acme.io,(555) 123-4567,\"$1,200.50\"\r\n"))
        .stderr(contains("Required field \"Email\" has 1 empty value(s)"));
}

#[test]
fn export_into_directory_uses_generated_name_and_writes_workbook() {
    let workspace = TestWorkspace::new();
    let out_dir = workspace.path().join("out");
    fs::create_dir_all(&out_dir).unwrap();
    workbench(&workspace)
        .args([
            "export",
            "-i",
            &fixture(),
            "-r",
            "customer",
            "--output-dir",
            out_dir.to_str().unwrap(),
            "--workbook",
            out_dir.to_str().unwrap(),
            "--preview",
            "1",
        ])
        .assert()
        .success()
        .stdout(contains("Acme Corp"))
        .stdout(contains("Beta LLC").not());

    let mut names = fs::read_dir(&out_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    names.sort();
    assert_eq!(names.len(), 2, "{names:?}");
    assert!(names[0].starts_with("netsuite-customer-import-") && names[0].ends_with(".csv"));
    assert!(names[1].starts_with("workbench-customer-") && names[1].ends_with(".xlsx"));
    let workbook = fs::read(out_dir.join(&names[1])).unwrap();
    assert!(workbook.starts_with(b"PK"));
}

#[test]
fn export_errors_block_output_unless_forced() {
    let workspace = TestWorkspace::new();
    let output = workspace.path().join("vendors.csv");
    workbench(&workspace)
        .args([
            "export",
            "-i",
            &fixture(),
            "-r",
            "vendor",
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(contains("Required field \"Subsidiary\" is not mapped"))
        .stderr(contains(
            "error: Export blocked by 1 validation error(s); rerun with --force to write anyway",
        ));
    assert!(!output.exists());

    workbench(&workspace)
        .args([
            "export",
            "-i",
            &fixture(),
            "-r",
            "vendor",
            "-o",
            output.to_str().unwrap(),
            "--force",
        ])
        .assert()
        .success();
    let csv = fs::read_to_string(&output).unwrap();
    assert!(csv.starts_with("Company Name,Email,Phone,Credit Limit\r\n"));
}

#[test]
fn stored_template_drives_export_and_can_be_deleted() {
    let workspace = TestWorkspace::new();
    let mapping_path = workspace.write(
        "mapping.json",
        r#"{
  "name": "trimmed",
  "recordType": "customer",
  "mappings": [
    {"sourceColumn": "Company Name", "targetField": "companyname", "transform": "uppercase"},
    {"sourceColumn": "E-Mail", "targetField": "email", "transform": "none"}
  ]
}"#,
    );
    workbench(&workspace)
        .args(["template", "save", "-m", mapping_path.to_str().unwrap()])
        .assert()
        .success();
    workbench(&workspace)
        .args(["template", "show", "trimmed"])
        .assert()
        .success()
        .stdout(contains("uppercase"));

    workbench(&workspace)
        .args([
            "export",
            "-i",
            &fixture(),
            "-r",
            "customer",
            "--template",
            "trimmed",
            "-o",
            "-",
        ])
        .assert()
        .success()
        .stdout(contains("Company Name,Email\r\nACME CORP,ap@acme.io\r\n"));

    workbench(&workspace)
        .args(["template", "delete", "trimmed"])
        .assert()
        .success();
    workbench(&workspace)
        .args(["template", "show", "trimmed"])
        .assert()
        .failure()
        .stderr(contains("Mapping template 'trimmed' not found"));
}

#[test]
fn missing_template_fails_export() {
    let workspace = TestWorkspace::new();
    workbench(&workspace)
        .args([
            "export",
            "-i",
            &fixture(),
            "-r",
            "customer",
            "--template",
            "ghost",
        ])
        .assert()
        .failure()
        .stderr(contains("Mapping template 'ghost' not found"));
}
