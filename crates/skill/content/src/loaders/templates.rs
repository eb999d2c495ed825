//! Template catalog loader.
//!
//! Loads skill templates from RON and validates each one before it can reach
//! the compiler.

use std::collections::HashMap;
use std::path::Path;

use skill_core::Template;

use crate::loaders::{LoadResult, read_file};

/// Validated templates, looked up by id and iterated in declaration order.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: Vec<Template>,
    index: HashMap<String, usize>,
}

impl TemplateRegistry {
    /// Loads the templates embedded in this crate.
    pub fn load_embedded() -> LoadResult<Self> {
        let source = include_str!("../../data/templates.ron");
        Self::parse(source, "templates.ron")
    }

    /// Loads templates from a RON file holding a list of templates.
    pub fn load(path: &Path) -> LoadResult<Self> {
        let content = read_file(path)?;
        Self::parse(&content, &path.display().to_string())
    }

    pub fn parse(source: &str, origin: &str) -> LoadResult<Self> {
        let templates: Vec<Template> = ron::from_str(source)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", origin, e))?;
        let registry = Self::from_templates(templates)?;
        tracing::debug!(origin, count = registry.len(), "templates loaded");
        Ok(registry)
    }

    /// Builds a registry, rejecting invalid templates and duplicate ids.
    pub fn from_templates(templates: Vec<Template>) -> LoadResult<Self> {
        let mut index = HashMap::with_capacity(templates.len());
        for (position, template) in templates.iter().enumerate() {
            template
                .validate()
                .map_err(|e| anyhow::anyhow!("Invalid template {}: {}", template.id, e))?;
            if index.insert(template.id.clone(), position).is_some() {
                anyhow::bail!("Duplicate template id {}", template.id);
            }
        }
        Ok(Self { templates, index })
    }

    pub fn get(&self, id: &str) -> Option<&Template> {
        self.index.get(id).map(|&i| &self.templates[i])
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.templates.iter().map(|t| t.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
