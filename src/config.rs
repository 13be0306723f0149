use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::batch::YieldPolicy;
use crate::error::{Error, Result};
use crate::template::{
    FieldBinding, FieldMapping, FilenamePolicy, PlaceholderSyntax, TemplateSources,
    default_bindings,
};

/// Everything the tool needs besides its input data. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub fields: Vec<FieldBinding>,
    pub identity_field: String,
    pub fallback_stem: String,
    pub document_suffix: String,
    pub archive_stem: String,
    pub yield_every: usize,
    pub placeholder_open: String,
    pub placeholder_close: String,
    pub preview_template: PathBuf,
    pub document_template: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        let naming = FilenamePolicy::default();
        let syntax = PlaceholderSyntax::default();

        Self {
            fields: default_bindings(),
            identity_field: naming.identity_field,
            fallback_stem: naming.fallback_stem,
            document_suffix: naming.suffix,
            archive_stem: "Specifications".to_string(),
            yield_every: crate::batch::DEFAULT_YIELD_EVERY,
            placeholder_open: syntax.open,
            placeholder_close: syntax.close,
            preview_template: PathBuf::from("templates/preview.html"),
            document_template: PathBuf::from("templates/template.docx"),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text)
            .map_err(|error| Error::Config(format!("{}: {error}", path.display())))?;

        info!(path = %path.display(), fields = config.fields.len(), "configuration loaded");
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|error| Error::Config(error.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|error| Error::Config(error.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.placeholder_open.is_empty() || self.placeholder_close.is_empty() {
            return Err(Error::Config(
                "placeholder delimiters must not be empty".to_string(),
            ));
        }
        if self.identity_field.trim().is_empty() {
            return Err(Error::Config("identity_field must not be empty".to_string()));
        }
        if self.document_suffix.is_empty() {
            return Err(Error::Config("document_suffix must not be empty".to_string()));
        }
        if self.archive_stem.trim().is_empty() {
            return Err(Error::Config("archive_stem must not be empty".to_string()));
        }

        self.yield_policy()?;
        self.field_mapping()?;
        Ok(())
    }

    pub fn syntax(&self) -> PlaceholderSyntax {
        PlaceholderSyntax::new(&self.placeholder_open, &self.placeholder_close)
    }

    pub fn field_mapping(&self) -> Result<FieldMapping> {
        FieldMapping::with_syntax(self.fields.clone(), &self.syntax())
    }

    pub fn filename_policy(&self) -> FilenamePolicy {
        FilenamePolicy {
            identity_field: self.identity_field.clone(),
            fallback_stem: self.fallback_stem.clone(),
            suffix: self.document_suffix.clone(),
        }
    }

    pub fn yield_policy(&self) -> Result<YieldPolicy> {
        YieldPolicy::every(self.yield_every)
    }

    pub fn template_sources(&self) -> TemplateSources {
        TemplateSources {
            preview: self.preview_template.clone(),
            document: self.document_template.clone(),
        }
    }
}
