use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    catalog::{FieldDef, RecordType},
    transform::Transform,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMapping {
    pub source_column: String,
    /// Empty when the column is not mapped.
    #[serde(default)]
    pub target_field: String,
    #[serde(default)]
    pub transform: Transform,
}

impl FieldMapping {
    pub fn unmapped(source_column: impl Into<String>) -> Self {
        Self {
            source_column: source_column.into(),
            target_field: String::new(),
            transform: Transform::None,
        }
    }

    pub fn new(
        source_column: impl Into<String>,
        target_field: impl Into<String>,
        transform: Transform,
    ) -> Self {
        Self {
            source_column: source_column.into(),
            target_field: target_field.into(),
            transform,
        }
    }

    pub fn is_mapped(&self) -> bool {
        !self.target_field.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingTemplate {
    pub name: String,
    pub record_type: RecordType,
    pub mappings: Vec<FieldMapping>,
}

pub fn default_mappings(headers: &[String]) -> Vec<FieldMapping> {
    headers.iter().map(FieldMapping::unmapped).collect()
}

pub fn mapped_count(mappings: &[FieldMapping]) -> usize {
    mappings.iter().filter(|m| m.is_mapped()).count()
}

pub fn normalize_name(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

fn field_matches(source: &str, field: &FieldDef) -> bool {
    let id = normalize_name(field.field_id);
    let label = normalize_name(field.label);
    id == source || label == source || id.contains(source) || source.contains(id.as_str())
}

pub fn suggest_field<'a>(source_column: &str, fields: &'a [FieldDef]) -> Option<&'a FieldDef> {
    let source = normalize_name(source_column);
    fields.iter().find(|field| field_matches(&source, field))
}

/// Fills empty targets with the first matching catalog field.
///
/// Entries that already have a target are returned unchanged, so applying
/// this repeatedly is a no-op after the first pass.
pub fn auto_match(mappings: &[FieldMapping], fields: &[FieldDef]) -> Vec<FieldMapping> {
    mappings
        .iter()
        .map(|mapping| {
            if mapping.is_mapped() {
                return mapping.clone();
            }
            match suggest_field(&mapping.source_column, fields) {
                Some(field) => {
                    debug!(
                        "Auto-matched '{}' -> '{}'",
                        mapping.source_column, field.field_id
                    );
                    FieldMapping {
                        target_field: field.field_id.to_string(),
                        ..mapping.clone()
                    }
                }
                None => mapping.clone(),
            }
        })
        .collect()
}

pub fn apply_template(template: &MappingTemplate, headers: &[String]) -> Vec<FieldMapping> {
    headers
        .iter()
        .map(|header| {
            template
                .mappings
                .iter()
                .find(|m| &m.source_column == header)
                .cloned()
                .unwrap_or_else(|| FieldMapping::unmapped(header))
        })
        .collect()
}
