//! WordprocessingML (.docx) codec.
//!
//! A .docx file is a zip package; placeholders are literal text inside the XML parts that
//! carry visible text. Tokens must sit inside a single run (`<w:t>`), which is what Word
//! produces when a placeholder is typed in one go.

use std::collections::{BTreeSet, HashSet};
use std::io::{Cursor, Read, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

use crate::codec::{DataBindings, DocumentCodec, RenderError};
use crate::template::{FieldMapping, PlaceholderSyntax, escape_xml, replace_tokens};

pub const MAIN_PART: &str = "word/document.xml";

const LINE_BREAK: &str = "</w:t><w:br/><w:t xml:space=\"preserve\">";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocxCodec {
    syntax: PlaceholderSyntax,
}

impl DocxCodec {
    pub fn new(syntax: PlaceholderSyntax) -> Self {
        Self { syntax }
    }

    fn check_resolved(
        &self,
        part: &str,
        xml: &str,
        bound: &HashSet<&str>,
    ) -> Result<(), RenderError> {
        let found = self
            .syntax
            .scan(xml)
            .map_err(|offset| RenderError::UnbalancedDelimiter {
                part: part.to_string(),
                offset,
            })?;

        match found.into_iter().find(|token| !bound.contains(token)) {
            Some(token) => Err(RenderError::UnresolvedPlaceholder {
                part: part.to_string(),
                token: strip_tags(token),
            }),
            None => Ok(()),
        }
    }
}

impl DocumentCodec for DocxCodec {
    fn syntax(&self) -> &PlaceholderSyntax {
        &self.syntax
    }

    fn render(&self, template: &[u8], bindings: &DataBindings) -> Result<Vec<u8>, RenderError> {
        let mut archive = open_package(template)?;

        let replacements: Vec<(String, String)> = bindings
            .iter()
            .map(|(token, value)| (escape_xml(token), run_text(value)))
            .collect();
        let bound: HashSet<&str> = replacements
            .iter()
            .map(|(token, _)| token.as_str())
            .collect();

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = entry_options();

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            let name = entry.name().to_string();

            if entry.is_dir() {
                writer.add_directory(name, options)?;
                continue;
            }

            // The size in the entry header is not trusted for preallocation.
            let mut bytes = Vec::new();
            entry.read_to_end(&mut bytes)?;

            if is_text_part(&name) {
                let xml = String::from_utf8(bytes).map_err(|_| {
                    RenderError::MalformedTemplate(format!("{name} is not valid UTF-8"))
                })?;
                self.check_resolved(&name, &xml, &bound)?;
                bytes = replace_tokens(&xml, &replacements).into_bytes();
            }

            writer.start_file(name, options)?;
            writer.write_all(&bytes)?;
        }

        Ok(writer.finish()?.into_inner())
    }

    fn placeholders(&self, template: &[u8]) -> Result<BTreeSet<String>, RenderError> {
        let mut archive = open_package(template)?;
        let mut declared = BTreeSet::new();

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            if !is_text_part(entry.name()) {
                continue;
            }
            let part = entry.name().to_string();

            let mut xml = String::new();
            entry.read_to_string(&mut xml)?;

            let found = self
                .syntax
                .scan(&xml)
                .map_err(|offset| RenderError::UnbalancedDelimiter {
                    part: part.clone(),
                    offset,
                })?;

            for raw in found {
                let token = unescape_xml(&strip_tags(raw));
                if raw.contains('<') {
                    return Err(RenderError::SplitPlaceholder { part, token });
                }
                declared.insert(token);
            }
        }

        Ok(declared)
    }
}

fn open_package(template: &[u8]) -> Result<ZipArchive<Cursor<&[u8]>>, RenderError> {
    let archive = ZipArchive::new(Cursor::new(template))
        .map_err(|error| RenderError::MalformedTemplate(error.to_string()))?;

    if archive.index_for_name(MAIN_PART).is_none() {
        return Err(RenderError::MissingPart(MAIN_PART.to_string()));
    }

    Ok(archive)
}

fn entry_options() -> SimpleFileOptions {
    // Fixed timestamps keep output byte-identical for identical input.
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
}

fn is_text_part(name: &str) -> bool {
    name == MAIN_PART
        || (name.ends_with(".xml")
            && (name.starts_with("word/header") || name.starts_with("word/footer")))
}

/// Escaped run text; line breaks become Word breaks inside the surrounding run.
fn run_text(value: &str) -> String {
    escape_xml(value)
        .replace("\r\n", "\n")
        .replace('\n', LINE_BREAK)
}

fn strip_tags(xml: &str) -> String {
    let mut text = String::with_capacity(xml.len());
    let mut in_tag = false;
    for c in xml.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text
}

fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Minimal .docx declaring every token of `mapping`, one labelled paragraph per field.
pub fn starter_template(mapping: &FieldMapping) -> Result<Vec<u8>, RenderError> {
    let mut body = String::from(
        "<w:p><w:pPr><w:jc w:val=\"center\"/></w:pPr><w:r><w:rPr><w:b/><w:sz w:val=\"36\"/></w:rPr><w:t>Specification</w:t></w:r></w:p>",
    );
    for binding in mapping.iter() {
        body.push_str("<w:p><w:r><w:rPr><w:b/></w:rPr><w:t xml:space=\"preserve\">");
        body.push_str(&escape_xml(&binding.field));
        body.push_str(": </w:t></w:r><w:r><w:t xml:space=\"preserve\">");
        body.push_str(&escape_xml(&binding.token));
        body.push_str("</w:t></w:r></w:p>");
    }

    let document = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{body}<w:sectPr/></w:body></w:document>"
    );

    let parts: [(&str, &str); 3] = [
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", PACKAGE_RELS),
        (MAIN_PART, document.as_str()),
    ];

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = entry_options();
    for (name, content) in parts {
        writer.start_file(name, options)?;
        writer.write_all(content.as_bytes())?;
    }

    Ok(writer.finish()?.into_inner())
}

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::FieldBinding;

    fn mapping() -> FieldMapping {
        FieldMapping::new(vec![
            FieldBinding::new("Client", "{{CLIENT}}"),
            FieldBinding::new("Notes", "{{NOTES}}"),
        ])
        .expect("valid mapping")
    }

    fn bindings(pairs: &[(&str, &str)]) -> DataBindings {
        pairs
            .iter()
            .map(|(token, value)| (token.to_string(), value.to_string()))
            .collect()
    }

    fn read_part(docx: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(docx)).expect("zip");
        let mut entry = archive.by_name(name).expect("part");
        let mut xml = String::new();
        entry.read_to_string(&mut xml).expect("utf-8");
        xml
    }

    fn package(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in parts {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .expect("start");
            writer.write_all(content.as_bytes()).expect("write");
        }
        writer.finish().expect("finish").into_inner()
    }

    #[test]
    fn fills_tokens_with_escaped_values() {
        let codec = DocxCodec::default();
        let template = starter_template(&mapping()).expect("template");

        let output = codec
            .render(
                &template,
                &bindings(&[("{{CLIENT}}", "Smith & <Sons>"), ("{{NOTES}}", "one\ntwo")]),
            )
            .expect("render");

        let xml = read_part(&output, MAIN_PART);
        assert!(xml.contains("Smith &amp; &lt;Sons&gt;"));
        assert!(xml.contains("one</w:t><w:br/><w:t xml:space=\"preserve\">two"));
        assert!(!xml.contains("{{"));
    }

    #[test]
    fn output_is_deterministic() {
        let codec = DocxCodec::default();
        let template = starter_template(&mapping()).expect("template");
        let values = bindings(&[("{{CLIENT}}", "Acme"), ("{{NOTES}}", "")]);

        let first = codec.render(&template, &values).expect("render");
        let second = codec.render(&template, &values).expect("render");
        assert_eq!(first, second);
    }

    #[test]
    fn unbound_placeholder_is_an_error() {
        let codec = DocxCodec::default();
        let template = starter_template(&mapping()).expect("template");

        let result = codec.render(&template, &bindings(&[("{{CLIENT}}", "Acme")]));
        match result {
            Err(RenderError::UnresolvedPlaceholder { part, token }) => {
                assert_eq!(part, MAIN_PART);
                assert_eq!(token, "{{NOTES}}");
            }
            other => panic!("expected unresolved placeholder, got {other:?}"),
        }
    }

    #[test]
    fn unclosed_delimiter_is_an_error() {
        let template = package(&[(MAIN_PART, "<w:t>{{CLIENT</w:t>")]);
        let result = DocxCodec::default().render(&template, &bindings(&[("{{CLIENT}}", "x")]));
        assert!(matches!(
            result,
            Err(RenderError::UnbalancedDelimiter { .. })
        ));
    }

    #[test]
    fn rejects_non_zip_and_missing_main_part() {
        let codec = DocxCodec::default();
        assert!(matches!(
            codec.render(b"plain text", &DataBindings::new()),
            Err(RenderError::MalformedTemplate(_))
        ));

        let no_document = package(&[("word/styles.xml", "<w:styles/>")]);
        assert!(matches!(
            codec.render(&no_document, &DataBindings::new()),
            Err(RenderError::MissingPart(_))
        ));
    }

    #[test]
    fn fills_headers_and_keeps_other_parts() {
        let template = package(&[
            (MAIN_PART, "<w:t>{{CLIENT}}</w:t>"),
            ("word/header1.xml", "<w:t>Prepared for {{CLIENT}}</w:t>"),
            ("word/styles.xml", "<w:t>{{CLIENT}}</w:t>"),
        ]);

        let output = DocxCodec::default()
            .render(&template, &bindings(&[("{{CLIENT}}", "Acme")]))
            .expect("render");

        assert_eq!(read_part(&output, "word/header1.xml"), "<w:t>Prepared for Acme</w:t>");
        assert_eq!(read_part(&output, "word/styles.xml"), "<w:t>{{CLIENT}}</w:t>");
    }

    #[test]
    fn placeholders_lists_every_delimited_token_in_text_parts() {
        let template = package(&[
            (MAIN_PART, "<w:t>{{CLIENT}} and {{R&amp;D}}</w:t>"),
            ("word/footer2.xml", "<w:t>{{SIGNATURE}}</w:t>"),
            ("word/styles.xml", "<w:t>{{IGNORED}}</w:t>"),
        ]);

        let declared = DocxCodec::default().placeholders(&template).expect("scan");

        assert_eq!(
            declared.into_iter().collect::<Vec<_>>(),
            vec![
                "{{CLIENT}}".to_string(),
                "{{R&D}}".to_string(),
                "{{SIGNATURE}}".to_string()
            ]
        );
    }

    #[test]
    fn placeholder_split_across_runs_is_reported() {
        let template = package(&[(
            MAIN_PART,
            "<w:r><w:t>{{CLI</w:t></w:r><w:r><w:t>ENT}}</w:t></w:r>",
        )]);

        match DocxCodec::default().placeholders(&template) {
            Err(RenderError::SplitPlaceholder { part, token }) => {
                assert_eq!(part, MAIN_PART);
                assert_eq!(token, "{{CLIENT}}");
            }
            other => panic!("expected a split placeholder, got {other:?}"),
        }
    }
}
