//! Saved display templates.
//!
//! A template is a named, immutable snapshot of the canvas. The store keeps
//! them in creation order; names may repeat, identities may not.

use crate::components::Component;
use crate::properties::WebProperties;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for templates.
pub type TemplateId = String;

/// Template errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Template name must not be empty")]
    EmptyName,
    #[error("Template not found: {0}")]
    NotFound(TemplateId),
}

/// A named snapshot of components and page properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    id: TemplateId,
    name: String,
    components: Vec<Component>,
    web_properties: WebProperties,
}

impl Template {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn web_properties(&self) -> &WebProperties {
        &self.web_properties
    }
}

/// Ordered in-memory collection of templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    templates: Vec<Template>,
}

impl TemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot `components` and `web_properties` under `name`.
    ///
    /// The inputs are copied, so later edits to the live canvas never reach
    /// the stored template.
    pub fn create(
        &mut self,
        name: &str,
        components: &[Component],
        web_properties: &WebProperties,
    ) -> Result<&Template, TemplateError> {
        if name.trim().is_empty() {
            return Err(TemplateError::EmptyName);
        }
        let template = Template {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            components: components.to_vec(),
            web_properties: web_properties.clone(),
        };
        log::info!("Saved template {:?} ({})", template.name, template.id);
        self.templates.push(template);
        Ok(&self.templates[self.templates.len() - 1])
    }

    /// Remove the template with `id`. Absent ids are ignored.
    pub fn delete(&mut self, id: &str) -> Option<Template> {
        let index = self.templates.iter().position(|t| t.id == id)?;
        let removed = self.templates.remove(index);
        log::info!("Deleted template {:?} ({})", removed.name, removed.id);
        Some(removed)
    }

    /// Copies of the template's state for seeding the editor.
    pub fn apply(template: &Template) -> (Vec<Component>, WebProperties) {
        (template.components.clone(), template.web_properties.clone())
    }

    pub fn get(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
