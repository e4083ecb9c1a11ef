//! Template registry
//!
//! Explicitly constructed and passed around; there is no process-wide
//! registry, so concurrent sessions can use differently populated ones.

use super::context::TemplateContext;
use super::{Template, code_review, consciousness, ethics, governance};
use crate::core::error::DomainError;
use std::collections::BTreeMap;

/// Builds a template from its context
pub type TemplateBuilder = fn(&TemplateContext) -> Result<Box<dyn Template>, DomainError>;

struct TemplateEntry {
    description: &'static str,
    build: TemplateBuilder,
}

/// Name -> template factory map
#[derive(Default)]
pub struct TemplateRegistry {
    entries: BTreeMap<String, TemplateEntry>,
}

impl TemplateRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry populated with the built-in preset families
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(
            governance::NAME,
            governance::DESCRIPTION,
            governance::build,
        );
        registry.register(
            consciousness::NAME,
            consciousness::DESCRIPTION,
            consciousness::build,
        );
        registry.register(
            code_review::NAME,
            code_review::DESCRIPTION,
            code_review::build,
        );
        registry.register(ethics::NAME, ethics::DESCRIPTION, ethics::build);
        registry
    }

    /// Register (or replace) a template under `name`
    pub fn register(
        &mut self,
        name: impl Into<String>,
        description: &'static str,
        build: TemplateBuilder,
    ) {
        self.entries
            .insert(name.into(), TemplateEntry { description, build });
    }

    /// Instantiate the template `name` with `context`
    pub fn load_template(
        &self,
        name: &str,
        context: &TemplateContext,
    ) -> Result<Box<dyn Template>, DomainError> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| DomainError::TemplateNotFound(name.to_string()))?;
        (entry.build)(context)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// (name, description) pairs in sorted order
    pub fn describe(&self) -> Vec<(&str, &'static str)> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.as_str(), entry.description))
            .collect()
    }
}
