mod filename;
mod mapper;
mod mapping;
mod starter;
mod syntax;

pub use filename::{FilenamePolicy, sanitize_stem};
pub use mapper::{TemplateMapper, TemplateSources};
pub use mapping::{DEFAULT_BINDINGS, FieldBinding, FieldMapping, default_bindings};
pub use starter::starter_markup;
pub use syntax::{PlaceholderSyntax, escape_html, escape_xml, replace_tokens};
