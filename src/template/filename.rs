use crate::tabular::Record;

const MAX_STEM_CHARS: usize = 50;

/// How an output document is named from its record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenamePolicy {
    pub identity_field: String,
    pub fallback_stem: String,
    pub suffix: String,
}

impl Default for FilenamePolicy {
    fn default() -> Self {
        Self {
            identity_field: "Client".to_string(),
            fallback_stem: "Document".to_string(),
            suffix: "_Specification.docx".to_string(),
        }
    }
}

impl FilenamePolicy {
    /// Deterministic name for the record at `index` (zero-based), before archive de-duplication.
    pub fn generate(&self, record: &Record, index: usize) -> String {
        let mut stem = sanitize_stem(record.get(&self.identity_field).trim());

        if stem.is_empty() {
            stem = sanitize_stem(&format!("{}_{}", self.fallback_stem, index + 1));
        }

        format!("{stem}{}", self.suffix)
    }
}

/// Keep ASCII alphanumerics, whitespace, `-` and `_`; turn whitespace runs into one `_`;
/// cap the result at 50 characters.
pub fn sanitize_stem(raw: &str) -> String {
    let mut stem = String::with_capacity(raw.len());
    let mut in_whitespace = false;

    for c in raw.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                stem.push('_');
            }
            in_whitespace = true;
        } else if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            stem.push(c);
            in_whitespace = false;
        }
    }

    stem.chars().take(MAX_STEM_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> Record {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn sanitizes_identity_value() {
        let policy = FilenamePolicy::default();
        let name = policy.generate(&record(&[("Client", "Acme & Sons, Inc.")]), 0);

        assert_eq!(name, "Acme_Sons_Inc_Specification.docx");
        let stem = name.strip_suffix("_Specification.docx").expect("suffix present");
        assert!(stem.len() <= 50);
        assert!(
            stem.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        );
    }

    #[test]
    fn falls_back_to_ordinal_when_identity_missing() {
        let policy = FilenamePolicy::default();
        assert_eq!(
            policy.generate(&Record::default(), 2),
            "Document_3_Specification.docx"
        );
        assert_eq!(
            policy.generate(&record(&[("Client", "   ")]), 0),
            "Document_1_Specification.docx"
        );
        assert_eq!(
            policy.generate(&record(&[("Client", "!!!")]), 4),
            "Document_5_Specification.docx"
        );
    }

    #[test]
    fn truncates_long_names() {
        let long = "x".repeat(80);
        let stem = sanitize_stem(&long);
        assert_eq!(stem.len(), 50);
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(sanitize_stem("a \t\n b"), "a_b");
        assert_eq!(sanitize_stem("Jean-Luc_Picard"), "Jean-Luc_Picard");
    }
}
