use anyhow::{Context, Result};
use log::info;

use crate::{
    Workbench,
    cli::TemplateCommand,
    error::WorkbenchError,
    mapping::mapped_count,
    print_mappings, table,
    template_store::{TemplateStore, load_template_file},
};

pub fn execute(workbench: &Workbench, command: &TemplateCommand) -> Result<()> {
    let store = &workbench.store;
    let user = workbench.user.as_str();
    match command {
        TemplateCommand::List { json } => {
            let templates = store.list(user)?;
            if *json {
                let rendered =
                    serde_json::to_string_pretty(&templates).context("Serializing templates")?;
                println!("{rendered}");
            } else {
                let rows = templates
                    .iter()
                    .map(|stored| {
                        vec![
                            stored.template.name.clone(),
                            stored.template.record_type.label().to_string(),
                            format!(
                                "{}/{}",
                                mapped_count(&stored.template.mappings),
                                stored.template.mappings.len()
                            ),
                            stored.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                            stored.id.to_string(),
                        ]
                    })
                    .collect::<Vec<_>>();
                table::print_table(&["Name", "Record Type", "Mapped", "Updated", "Id"], &rows);
            }
            info!(
                "{} template(s) stored for user '{user}' under {:?}",
                templates.len(),
                store.root()
            );
        }
        TemplateCommand::Show { template } => {
            let stored = store.resolve(user, template)?;
            println!(
                "{} ({}, {})",
                stored.template.name,
                stored.template.record_type.label(),
                stored.id
            );
            print_mappings(stored.template.record_type, &stored.template.mappings);
        }
        TemplateCommand::Delete { template } => {
            let stored = store.resolve(user, template)?;
            if !store.delete(user, stored.id)? {
                return Err(WorkbenchError::TemplateNotFound(template.clone()).into());
            }
            info!("Deleted template '{}' ({})", stored.template.name, stored.id);
        }
        TemplateCommand::Save { mapping, name } => {
            let mut template = load_template_file(mapping)?;
            if let Some(name) = name {
                template.name = name.clone();
            }
            let stored = store.upsert(user, template)?;
            info!(
                "Stored template '{}' ({}) with {} mapping(s)",
                stored.template.name,
                stored.id,
                stored.template.mappings.len()
            );
        }
    }
    Ok(())
}
