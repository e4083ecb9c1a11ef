//! Template parameters

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key that redirects every voice of a template to one provider
///
/// Lets a caller dry-run any preset against an offline provider.
pub const PROVIDER_OVERRIDE_KEY: &str = "provider";

/// Parameters a template is instantiated with (e.g. `topic`, `focus_areas`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateContext {
    values: Map<String, Value>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(values: Map<String, Value>) -> Self {
        Self { values }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Non-blank string value for `key`
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// String value for `key`, or `default`
    pub fn str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get_str(key).unwrap_or(default)
    }

    /// List value for `key`
    ///
    /// Accepts a JSON array of strings or a comma-separated string.
    pub fn get_list(&self, key: &str) -> Vec<String> {
        match self.values.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            Some(Value::String(s)) => s
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Provider for a voice: the context override if present, else `default`
    pub fn provider_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.str_or(PROVIDER_OVERRIDE_KEY, default)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Map<String, Value>> for TemplateContext {
    fn from(values: Map<String, Value>) -> Self {
        Self::from_map(values)
    }
}
