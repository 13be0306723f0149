use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::template::PlaceholderSyntax;

/// Built-in spreadsheet header -> placeholder table used when no config overrides it.
pub const DEFAULT_BINDINGS: &[(&str, &str)] = &[
    ("Client", "{{CLIENT}}"),
    ("Project", "{{PROJECT}}"),
    ("Date", "{{DATE}}"),
    ("Version", "{{VERSION}}"),
    ("Author", "{{AUTHOR}}"),
    ("Description", "{{DESCRIPTION}}"),
    ("Requirements", "{{REQUIREMENTS}}"),
    ("Deliverables", "{{DELIVERABLES}}"),
    ("Timeline", "{{TIMELINE}}"),
    ("Budget", "{{BUDGET}}"),
    ("Notes", "{{NOTES}}"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldBinding {
    pub field: String,
    pub token: String,
}

impl FieldBinding {
    pub fn new(field: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            token: token.into(),
        }
    }
}

/// Ordered, validated field -> placeholder table. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    bindings: Vec<FieldBinding>,
}

impl FieldMapping {
    pub fn new(bindings: Vec<FieldBinding>) -> Result<Self> {
        if bindings.is_empty() {
            return Err(Error::InvalidMapping(
                "at least one field binding is required".to_string(),
            ));
        }

        let mut fields = HashSet::with_capacity(bindings.len());
        let mut tokens = HashSet::with_capacity(bindings.len());

        for binding in &bindings {
            if binding.field.trim().is_empty() {
                return Err(Error::InvalidMapping("field names must not be blank".to_string()));
            }
            if binding.token.is_empty() {
                return Err(Error::InvalidMapping(format!(
                    "field '{}' has an empty placeholder token",
                    binding.field
                )));
            }
            if !fields.insert(binding.field.as_str()) {
                return Err(Error::InvalidMapping(format!(
                    "field '{}' is mapped more than once",
                    binding.field
                )));
            }
            if !tokens.insert(binding.token.as_str()) {
                return Err(Error::InvalidMapping(format!(
                    "placeholder '{}' is used by more than one field",
                    binding.token
                )));
            }
        }

        Ok(Self { bindings })
    }

    /// Like [`FieldMapping::new`], but also requires every token to be wrapped in `syntax`
    /// so the codec can tell a bound placeholder from an unresolved one.
    pub fn with_syntax(bindings: Vec<FieldBinding>, syntax: &PlaceholderSyntax) -> Result<Self> {
        let mapping = Self::new(bindings)?;

        if let Some(binding) = mapping.iter().find(|binding| !syntax.wraps(&binding.token)) {
            return Err(Error::InvalidMapping(format!(
                "placeholder '{}' for field '{}' must look like {}NAME{}",
                binding.token, binding.field, syntax.open, syntax.close
            )));
        }

        Ok(mapping)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldBinding> {
        self.bindings.iter()
    }

    pub fn bindings(&self) -> &[FieldBinding] {
        &self.bindings
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|binding| binding.token.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|binding| binding.field.as_str())
    }

    pub fn token_for(&self, field: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|binding| binding.field == field)
            .map(|binding| binding.token.as_str())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

pub fn default_bindings() -> Vec<FieldBinding> {
    DEFAULT_BINDINGS
        .iter()
        .map(|(field, token)| FieldBinding::new(*field, *token))
        .collect()
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            bindings: default_bindings(),
        }
    }
}
