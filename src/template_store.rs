use std::{
    fs::{self, File},
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    catalog::RecordType,
    error::WorkbenchError,
    mapping::{FieldMapping, MappingTemplate},
};

const TEMPLATE_EXTENSION: &str = "yml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTemplate {
    pub id: Uuid,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub template: MappingTemplate,
}

#[derive(Debug, Clone, Default)]
pub struct TemplateUpdate {
    pub name: Option<String>,
    pub record_type: Option<RecordType>,
    pub mappings: Option<Vec<FieldMapping>>,
}

pub trait TemplateStore {
    /// All templates owned by `user_id`, most recently updated first.
    fn list(&self, user_id: &str) -> Result<Vec<StoredTemplate>>;

    fn get(&self, user_id: &str, id: Uuid) -> Result<Option<StoredTemplate>>;

    fn create(&self, user_id: &str, template: MappingTemplate) -> Result<StoredTemplate>;

    fn update(&self, user_id: &str, id: Uuid, update: TemplateUpdate) -> Result<StoredTemplate>;

    fn delete(&self, user_id: &str, id: Uuid) -> Result<bool>;

    fn find_by_name(&self, user_id: &str, name: &str) -> Result<Option<StoredTemplate>> {
        let wanted = name.trim();
        Ok(self
            .list(user_id)?
            .into_iter()
            .find(|stored| stored.template.name == wanted))
    }

    fn upsert(&self, user_id: &str, template: MappingTemplate) -> Result<StoredTemplate> {
        match self.find_by_name(user_id, &template.name)? {
            Some(existing) => self.update(
                user_id,
                existing.id,
                TemplateUpdate {
                    name: None,
                    record_type: Some(template.record_type),
                    mappings: Some(template.mappings),
                },
            ),
            None => self.create(user_id, template),
        }
    }

    fn resolve(&self, user_id: &str, reference: &str) -> Result<StoredTemplate> {
        let found = match Uuid::parse_str(reference.trim()) {
            Ok(id) => self.get(user_id, id)?,
            Err(_) => None,
        };
        match found {
            Some(stored) => Ok(stored),
            None => self
                .find_by_name(user_id, reference)?
                .ok_or_else(|| WorkbenchError::TemplateNotFound(reference.to_string()).into()),
        }
    }
}

/// Rejects ids that are empty or could escape the store root.
pub fn validate_user_id(user_id: &str) -> Result<(), WorkbenchError> {
    let invalid = user_id.trim().is_empty()
        || user_id.contains(['/', '\\', '\0'])
        || user_id.contains("..")
        || user_id == ".";
    if invalid {
        Err(WorkbenchError::InvalidUserId(user_id.to_string()))
    } else {
        Ok(())
    }
}

fn validated_name(name: &str) -> Result<String, WorkbenchError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(WorkbenchError::EmptyTemplateName)
    } else {
        Ok(trimmed.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct FileTemplateStore {
    root: PathBuf,
}

impl FileTemplateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn user_dir(&self, user_id: &str) -> Result<PathBuf> {
        validate_user_id(user_id)?;
        Ok(self.root.join(user_id))
    }

    fn template_path(&self, user_id: &str, id: Uuid) -> Result<PathBuf> {
        Ok(self
            .user_dir(user_id)?
            .join(format!("{id}.{TEMPLATE_EXTENSION}")))
    }

    fn read(path: &Path) -> Result<StoredTemplate> {
        let file = File::open(path).with_context(|| format!("Opening template file {path:?}"))?;
        serde_yaml::from_reader(BufReader::new(file))
            .with_context(|| format!("Parsing template YAML {path:?}"))
    }

    fn write(&self, stored: &StoredTemplate) -> Result<()> {
        let dir = self.user_dir(&stored.user_id)?;
        fs::create_dir_all(&dir).with_context(|| format!("Creating template directory {dir:?}"))?;
        let path = dir.join(format!("{}.{TEMPLATE_EXTENSION}", stored.id));
        let yaml = serde_yaml::to_string(stored).context("Serializing template to YAML")?;
        fs::write(&path, yaml).with_context(|| format!("Writing template file {path:?}"))
    }
}

impl TemplateStore for FileTemplateStore {
    fn list(&self, user_id: &str) -> Result<Vec<StoredTemplate>> {
        let dir = self.user_dir(user_id)?;
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut templates = Vec::new();
        for entry in fs::read_dir(&dir).with_context(|| format!("Reading template directory {dir:?}"))? {
            let path = entry?.path();
            let is_template = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext == TEMPLATE_EXTENSION);
            if is_template {
                templates.push(Self::read(&path)?);
            }
        }
        templates.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(templates)
    }

    fn get(&self, user_id: &str, id: Uuid) -> Result<Option<StoredTemplate>> {
        let path = self.template_path(user_id, id)?;
        if !path.is_file() {
            return Ok(None);
        }
        let stored = Self::read(&path)?;
        Ok((stored.user_id == user_id).then_some(stored))
    }

    fn create(&self, user_id: &str, template: MappingTemplate) -> Result<StoredTemplate> {
        validate_user_id(user_id)?;
        let name = validated_name(&template.name)?;
        let now = Utc::now();
        let stored = StoredTemplate {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            created_at: now,
            updated_at: now,
            template: MappingTemplate { name, ..template },
        };
        self.write(&stored)?;
        debug!("Created template {} ('{}')", stored.id, stored.template.name);
        Ok(stored)
    }

    fn update(&self, user_id: &str, id: Uuid, update: TemplateUpdate) -> Result<StoredTemplate> {
        let mut stored = self
            .get(user_id, id)?
            .ok_or_else(|| WorkbenchError::TemplateNotFound(id.to_string()))?;
        if let Some(name) = update.name {
            stored.template.name = validated_name(&name)?;
        }
        if let Some(record_type) = update.record_type {
            stored.template.record_type = record_type;
        }
        if let Some(mappings) = update.mappings {
            stored.template.mappings = mappings;
        }
        stored.updated_at = Utc::now();
        self.write(&stored)?;
        debug!("Updated template {id}");
        Ok(stored)
    }

    fn delete(&self, user_id: &str, id: Uuid) -> Result<bool> {
        if self.get(user_id, id)?.is_none() {
            return Ok(false);
        }
        let path = self.template_path(user_id, id)?;
        fs::remove_file(&path).with_context(|| format!("Removing template file {path:?}"))?;
        debug!("Deleted template {id}");
        Ok(true)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

pub fn load_template_file(path: &Path) -> Result<MappingTemplate> {
    let file = File::open(path).with_context(|| format!("Opening mapping file {path:?}"))?;
    let reader = BufReader::new(file);
    if is_json(path) {
        serde_json::from_reader(reader).with_context(|| format!("Parsing mapping JSON {path:?}"))
    } else {
        serde_yaml::from_reader(reader).with_context(|| format!("Parsing mapping YAML {path:?}"))
    }
}

pub fn save_template_file(path: &Path, template: &MappingTemplate) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("Creating directory {parent:?}"))?;
    }
    let file = File::create(path).with_context(|| format!("Creating mapping file {path:?}"))?;
    if is_json(path) {
        serde_json::to_writer_pretty(file, template).context("Writing mapping JSON")
    } else {
        serde_yaml::to_writer(file, template).context("Writing mapping YAML")
    }
}
