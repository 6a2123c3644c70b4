pub mod catalog;
pub mod cli;
pub mod data;
pub mod detect;
pub mod error;
pub mod export;
pub mod export_cmd;
pub mod io_utils;
pub mod mapping;
pub mod profile;
pub mod table;
pub mod template_cmd;
pub mod template_store;
pub mod transform;
pub mod workbook;

use std::{env, path::Path, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    catalog::{RecordType, field_label},
    cli::{Cli, Commands, GlobalArgs},
    data::Dataset,
    mapping::{FieldMapping, MappingTemplate, auto_match, default_mappings, mapped_count},
    template_store::{FileTemplateStore, TemplateStore},
    transform::Transform,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("netsuite_workbench", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub struct Workbench {
    pub store: FileTemplateStore,
    pub user: String,
    pub delimiter: Option<u8>,
    pub input_encoding: Option<String>,
}

impl Workbench {
    pub fn from_args(args: GlobalArgs) -> Result<Self> {
        template_store::validate_user_id(&args.user)?;
        Ok(Self {
            store: FileTemplateStore::new(args.store),
            user: args.user,
            delimiter: args.delimiter,
            input_encoding: args.input_encoding,
        })
    }

    pub fn load(&self, input: &Path) -> Result<Dataset> {
        let encoding = io_utils::resolve_encoding(self.input_encoding.as_deref())?;
        info!(
            "Reading '{}' (delimiter '{}', encoding {})",
            input.display(),
            printable_delimiter(io_utils::resolve_input_delimiter(input, self.delimiter)),
            encoding.name()
        );
        io_utils::load_dataset(input, self.delimiter, encoding)
            .with_context(|| format!("Loading upload {input:?}"))
    }
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let workbench = Workbench::from_args(cli.global)?;
    match cli.command {
        Commands::Profile(args) => handle_profile(&workbench, &args),
        Commands::Fields(args) => handle_fields(&args),
        Commands::Transforms => handle_transforms(),
        Commands::Match(args) => handle_match(&workbench, &args),
        Commands::Export(args) => export_cmd::execute(&workbench, &args),
        Commands::Template(args) => template_cmd::execute(&workbench, &args.command),
    }
}

fn handle_profile(workbench: &Workbench, args: &cli::ProfileArgs) -> Result<()> {
    let dataset = workbench.load(&args.input)?;
    let profiles = profile::profile_columns(&dataset.headers, &dataset.rows);
    if args.json {
        let json = serde_json::to_string_pretty(&profiles).context("Serializing profiles")?;
        println!("{json}");
    } else {
        let headers = [
            "Column", "Type", "Non-Null", "Null", "Unique", "Duplicates", "Min", "Max",
            "Top Values",
        ];
        let rows = profiles
            .iter()
            .map(|p| {
                vec![
                    p.name.clone(),
                    p.detected_type.to_string(),
                    p.non_null_count.to_string(),
                    p.null_count.to_string(),
                    p.unique_count.to_string(),
                    p.duplicate_count.to_string(),
                    p.min.clone().unwrap_or_default(),
                    p.max.clone().unwrap_or_default(),
                    p.top_values_summary(3),
                ]
            })
            .collect::<Vec<_>>();
        table::print_table(&headers, &rows);
    }
    info!(
        "Profiled {} column(s) across {} row(s)",
        profiles.len(),
        dataset.row_count()
    );
    Ok(())
}

fn handle_fields(args: &cli::FieldsArgs) -> Result<()> {
    let record_types = match args.record_type {
        Some(record_type) => vec![record_type],
        None => RecordType::ALL.to_vec(),
    };
    for (idx, record_type) in record_types.iter().enumerate() {
        if record_types.len() > 1 {
            if idx > 0 {
                println!();
            }
            println!("{} ({})", record_type.label(), record_type.kebab());
        }
        let rows = record_type
            .fields()
            .iter()
            .filter(|field| field.required || !args.required)
            .map(|field| {
                vec![
                    field.field_id.to_string(),
                    field.label.to_string(),
                    field.field_type.as_str().to_string(),
                    if field.required { "yes" } else { "" }.to_string(),
                ]
            })
            .collect::<Vec<_>>();
        table::print_table(&["Field", "Label", "Type", "Required"], &rows);
    }
    Ok(())
}

fn handle_transforms() -> Result<()> {
    let rows = Transform::options()
        .into_iter()
        .map(|option| vec![option.value, option.label])
        .collect::<Vec<_>>();
    table::print_table(&["Transform", "Label"], &rows);
    Ok(())
}

fn handle_match(workbench: &Workbench, args: &cli::MatchArgs) -> Result<()> {
    let dataset = workbench.load(&args.input)?;
    let mappings = auto_match(
        &default_mappings(&dataset.headers),
        args.record_type.fields(),
    );
    print_mappings(args.record_type, &mappings);
    info!(
        "Matched {} of {} column(s) to {} fields",
        mapped_count(&mappings),
        mappings.len(),
        args.record_type.label()
    );

    let name = args
        .save_template
        .clone()
        .or_else(|| {
            args.input
                .file_stem()
                .and_then(|stem| stem.to_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| args.record_type.label().to_string());
    let template = MappingTemplate {
        name,
        record_type: args.record_type,
        mappings,
    };
    if let Some(path) = &args.output {
        template_store::save_template_file(path, &template)
            .with_context(|| format!("Writing mapping file {path:?}"))?;
        info!("Mapping written to {path:?}");
    }
    if args.save_template.is_some() {
        let stored = workbench.store.upsert(&workbench.user, template)?;
        info!(
            "Stored template '{}' ({}) for user '{}'",
            stored.template.name, stored.id, workbench.user
        );
    }
    Ok(())
}

pub(crate) fn print_mappings(record_type: RecordType, mappings: &[FieldMapping]) {
    let rows = mappings
        .iter()
        .map(|mapping| {
            let label = field_label(record_type, &mapping.target_field).unwrap_or_default();
            debug!("{} -> '{}'", mapping.source_column, mapping.target_field);
            vec![
                mapping.source_column.clone(),
                mapping.target_field.clone(),
                label.to_string(),
                mapping.transform.to_string(),
            ]
        })
        .collect::<Vec<_>>();
    table::print_table(&["Source Column", "Target Field", "Label", "Transform"], &rows);
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        other => (other as char).to_string(),
    }
}
