use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use netsuite_workbench::catalog::RecordType;
use netsuite_workbench::data::{Dataset, Row};
use netsuite_workbench::export::generate_export;
use netsuite_workbench::mapping::{FieldMapping, auto_match, default_mappings};
use netsuite_workbench::profile::profile_columns;
use netsuite_workbench::transform::Transform;
use netsuite_workbench::workbook::build_workbook;

fn generate_customers(rows: usize) -> Dataset {
    let headers = ["Company Name", "E-Mail", "Phone", "Credit Limit", "Since", "Active"]
        .map(str::to_string)
        .to_vec();
    let records = (0..rows).map(|i| {
        let active = if i % 3 == 0 { "no" } else { "yes" };
        vec![
            format!("  Company {i} "),
            format!("buyer{i}@example.com"),
            format!("(555) {:03}-{:04}", i % 1000, i % 10_000),
            format!("${},{:03}.{:02}", i % 90 + 1, i % 1000, i % 100),
            format!("{}/{}/2024", i % 12 + 1, i % 28 + 1),
            active.to_string(),
        ]
    });
    Dataset::from_records(headers, records)
}

fn customer_mappings(dataset: &Dataset) -> Vec<FieldMapping> {
    let mut mappings = auto_match(
        &default_mappings(&dataset.headers),
        RecordType::Customer.fields(),
    );
    for mapping in &mut mappings {
        mapping.transform = match mapping.target_field.as_str() {
            "companyname" => Transform::Trim,
            "creditlimit" => Transform::NumberClean,
            _ => Transform::None,
        };
    }
    mappings
}

fn bench_pipeline(c: &mut Criterion) {
    let dataset = generate_customers(20_000);
    let rows: &[Row] = &dataset.rows;
    let mappings = customer_mappings(&dataset);

    let mut group = c.benchmark_group("workbench");
    group.sample_size(20);

    group.bench_function("profile_columns", |b| {
        b.iter(|| profile_columns(black_box(&dataset.headers), black_box(rows)));
    });

    group.bench_function("generate_export", |b| {
        b.iter(|| {
            generate_export(black_box(rows), black_box(&mappings), RecordType::Customer)
                .expect("export")
        });
    });

    let profiles = profile_columns(&dataset.headers, rows);
    group.bench_function("build_workbook", |b| {
        b.iter(|| {
            build_workbook(
                black_box(&rows[..2_000]),
                black_box(&mappings),
                RecordType::Customer,
                &profiles,
            )
            .expect("workbook")
        });
    });

    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
