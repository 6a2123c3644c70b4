use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use log::{error, info, warn};

use crate::{
    Workbench,
    cli::ExportArgs,
    error::WorkbenchError,
    export::{ExportResult, generate_export_at},
    io_utils::{is_dash, write_output},
    mapping::{FieldMapping, apply_template, auto_match, default_mappings, mapped_count},
    profile::profile_columns,
    table,
    template_store::{TemplateStore, load_template_file},
    workbook::{build_workbook, workbook_file_name},
};

pub fn execute(workbench: &Workbench, args: &ExportArgs) -> Result<()> {
    let dataset = workbench.load(&args.input)?;
    let mappings = resolve_mappings(workbench, args, &dataset.headers)?;
    info!(
        "Exporting {} row(s) as {} with {} of {} column(s) mapped",
        dataset.row_count(),
        args.record_type.label(),
        mapped_count(&mappings),
        mappings.len()
    );

    let timestamp = Utc::now();
    let result = generate_export_at(&dataset.rows, &mappings, args.record_type, timestamp)?;
    report_issues(&result);
    if result.has_errors() && !args.force {
        return Err(WorkbenchError::ExportBlocked(result.errors().count()).into());
    }

    let destination = csv_destination(args, &result.file_name);
    let to_stdout = destination.as_deref().is_none_or(is_dash);
    if let Some(rows) = args.preview {
        let (headers, preview) = result.preview(rows)?;
        let rendered = table::render_table(&headers, &preview);
        if to_stdout {
            eprint!("{rendered}");
        } else {
            print!("{rendered}");
        }
    }

    write_output(destination.as_deref(), result.csv_content.as_bytes())?;
    match destination.as_deref().filter(|path| !is_dash(path)) {
        Some(path) => info!(
            "Exported {} row(s) across {} column(s) to {path:?}",
            result.row_count, result.column_count
        ),
        None => info!(
            "Exported {} row(s) across {} column(s) to stdout",
            result.row_count, result.column_count
        ),
    }

    if let Some(target) = &args.workbook {
        let path = if target.is_dir() {
            target.join(workbook_file_name(args.record_type, timestamp))
        } else {
            target.clone()
        };
        let profiles = profile_columns(&dataset.headers, &dataset.rows);
        let bytes = build_workbook(&dataset.rows, &mappings, args.record_type, &profiles)
            .with_context(|| format!("Building workbook for {:?}", args.input))?;
        write_output(Some(path.as_path()), &bytes)?;
        info!("Workbook written to {path:?}");
    }
    Ok(())
}

/// Mapping precedence: a mapping file, then a stored template, then none.
/// Auto-match fills the gaps when asked to, or when nothing was supplied.
fn resolve_mappings(
    workbench: &Workbench,
    args: &ExportArgs,
    headers: &[String],
) -> Result<Vec<FieldMapping>> {
    let template = if let Some(path) = &args.mapping {
        Some(load_template_file(path)?)
    } else if let Some(reference) = &args.template {
        Some(workbench.store.resolve(&workbench.user, reference)?.template)
    } else {
        None
    };

    let supplied = template.is_some();
    let mappings = match template {
        Some(template) => {
            if template.record_type != args.record_type {
                warn!(
                    "Template '{}' targets {} but exporting as {}",
                    template.name,
                    template.record_type.label(),
                    args.record_type.label()
                );
            }
            apply_template(&template, headers)
        }
        None => default_mappings(headers),
    };
    if args.auto_match || !supplied {
        Ok(auto_match(&mappings, args.record_type.fields()))
    } else {
        Ok(mappings)
    }
}

fn csv_destination(args: &ExportArgs, file_name: &str) -> Option<PathBuf> {
    match (&args.output, &args.output_dir) {
        (Some(path), _) => Some(path.clone()),
        (None, Some(dir)) => Some(dir.join(file_name)),
        (None, None) => None,
    }
}

fn report_issues(result: &ExportResult) {
    for issue in result.errors() {
        error!("{}", issue.message);
    }
    for issue in result.warnings() {
        warn!("{}", issue.message);
    }
    info!(
        "Validation found {} error(s) and {} warning(s)",
        result.errors().count(),
        result.warnings().count()
    );
}
