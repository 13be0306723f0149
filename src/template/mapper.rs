use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::codec::{DataBindings, DocumentCodec};
use crate::error::{Error, Result};
use crate::tabular::Record;
use crate::template::{FieldMapping, FilenamePolicy, escape_html, replace_tokens};

/// Where the two template representations live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSources {
    pub preview: PathBuf,
    pub document: PathBuf,
}

#[derive(Debug, Clone)]
struct LoadedTemplates {
    markup: String,
    document: Vec<u8>,
}

/// Fills templates from records through a fixed [`FieldMapping`].
///
/// Templates are set only by the `load_*` methods; a failed load keeps whatever was
/// loaded before.
#[derive(Debug, Clone)]
pub struct TemplateMapper {
    mapping: FieldMapping,
    naming: FilenamePolicy,
    templates: Option<LoadedTemplates>,
}

impl TemplateMapper {
    pub fn new(mapping: FieldMapping, naming: FilenamePolicy) -> Self {
        Self {
            mapping,
            naming,
            templates: None,
        }
    }

    pub fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    pub fn naming(&self) -> &FilenamePolicy {
        &self.naming
    }

    pub fn is_loaded(&self) -> bool {
        self.templates.is_some()
    }

    pub fn load_templates<C: DocumentCodec + ?Sized>(
        &mut self,
        sources: &TemplateSources,
        codec: &C,
    ) -> Result<()> {
        let markup = fs::read_to_string(&sources.preview).map_err(|source| Error::TemplateLoad {
            path: sources.preview.clone(),
            source,
        })?;
        let document = fs::read(&sources.document).map_err(|source| Error::TemplateLoad {
            path: sources.document.clone(),
            source,
        })?;

        self.load_from_bytes(markup, document, codec)?;
        info!(
            preview = %sources.preview.display(),
            document = %sources.document.display(),
            "templates loaded"
        );
        Ok(())
    }

    /// Install both templates after checking they declare the same placeholders and that
    /// every placeholder is mapped to a field.
    pub fn load_from_bytes<C: DocumentCodec + ?Sized>(
        &mut self,
        markup: String,
        document: Vec<u8>,
        codec: &C,
    ) -> Result<()> {
        let in_preview: BTreeSet<String> = codec
            .syntax()
            .scan(&markup)
            .map_err(|offset| Error::UnclosedPlaceholder { offset })?
            .into_iter()
            .map(str::to_string)
            .collect();
        let in_document = codec.placeholders(&document)?;

        let mapped: HashSet<&str> = self.mapping.tokens().collect();
        let unmapped = |found: &BTreeSet<String>| -> Vec<String> {
            found
                .iter()
                .filter(|token| !mapped.contains(token.as_str()))
                .cloned()
                .collect()
        };
        let (unmapped_preview, unmapped_document) = (unmapped(&in_preview), unmapped(&in_document));
        if !unmapped_preview.is_empty() || !unmapped_document.is_empty() {
            return Err(Error::UnmappedPlaceholders {
                in_preview: unmapped_preview,
                in_document: unmapped_document,
            });
        }

        if in_preview != in_document {
            return Err(Error::TemplateMismatch {
                missing_in_preview: in_document.difference(&in_preview).cloned().collect(),
                missing_in_document: in_preview.difference(&in_document).cloned().collect(),
            });
        }

        debug!(placeholders = in_preview.len(), "template placeholder sets agree");
        self.templates = Some(LoadedTemplates { markup, document });
        Ok(())
    }

    pub fn markup_template(&self) -> Result<&str> {
        Ok(&self.loaded()?.markup)
    }

    pub fn document_template(&self) -> Result<&[u8]> {
        Ok(&self.loaded()?.document)
    }

    /// Markup for one record, every value HTML-escaped; absent fields become empty text.
    pub fn fill_for_preview(&self, record: &Record) -> Result<String> {
        let templates = self.loaded()?;
        let replacements: Vec<(&str, String)> = self
            .mapping
            .iter()
            .map(|binding| (binding.token.as_str(), escape_html(record.get(&binding.field))))
            .collect();

        Ok(replace_tokens(&templates.markup, &replacements))
    }

    /// Placeholder -> raw value pairs for the document codec.
    pub fn fill_for_generation(&self, record: &Record) -> Result<DataBindings> {
        self.loaded()?;

        Ok(self
            .mapping
            .iter()
            .map(|binding| {
                (
                    binding.token.clone(),
                    record.get(&binding.field).to_string(),
                )
            })
            .collect())
    }

    pub fn generate_filename(&self, record: &Record, index: usize) -> String {
        self.naming.generate(record, index)
    }

    fn loaded(&self) -> Result<&LoadedTemplates> {
        self.templates.as_ref().ok_or(Error::TemplateNotLoaded)
    }
}

impl Default for TemplateMapper {
    fn default() -> Self {
        Self::new(FieldMapping::default(), FilenamePolicy::default())
    }
}
