use indexmap::IndexMap;
use serde::Serialize;

use crate::template::FieldMapping;

/// One data row keyed by header name, in header order. Missing cells are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record(IndexMap<String, String>);

impl Record {
    pub fn with_capacity(capacity: usize) -> Self {
        Self(IndexMap::with_capacity(capacity))
    }

    /// Value for `field`, or `""` when the column does not exist.
    pub fn get(&self, field: &str) -> &str {
        self.0.get(field).map(String::as_str).unwrap_or_default()
    }

    pub fn value(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Later inserts for the same key overwrite the value but keep the first position.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Headers in column order plus the non-blank data rows in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    pub headers: Vec<String>,
    pub rows: Vec<Record>,
}

impl ParseResult {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Mapped fields with no matching header; those placeholders will render empty.
    pub fn missing_fields<'m>(&self, mapping: &'m FieldMapping) -> Vec<&'m str> {
        mapping
            .fields()
            .filter(|field| !self.headers.iter().any(|header| header == field))
            .collect()
    }
}
