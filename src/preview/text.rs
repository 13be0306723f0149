//! Rendered preview markup flattened into terminal lines.

const BLOCK_TAGS: &[&str] = &[
    "address", "article", "blockquote", "br", "dd", "div", "dl", "dt", "footer", "h1", "h2",
    "h3", "h4", "h5", "h6", "header", "hr", "li", "ol", "p", "pre", "section", "table", "tr",
    "ul",
];

const SKIPPED_TAGS: &[&str] = &["head", "script", "style", "title"];

/// Strip tags from `markup`, breaking lines at block elements and decoding entities.
///
/// Runs of whitespace inside a line collapse to one space; blank lines collapse to one.
pub fn markup_to_text(markup: &str) -> Vec<String> {
    let mut raw = String::with_capacity(markup.len());
    let mut skipping: Option<String> = None;
    let mut rest = markup;

    while let Some(start) = rest.find('<') {
        if skipping.is_none() {
            raw.push_str(&rest[..start]);
        }
        let after = &rest[start + 1..];
        let Some(end) = after.find('>') else {
            // A stray '<' with no closing '>' is text.
            if skipping.is_none() {
                raw.push_str(&rest[start..]);
            }
            rest = "";
            break;
        };

        let tag = Tag::parse(&after[..end]);
        rest = &after[end + 1..];

        if let Some(name) = &skipping {
            if tag.closing && tag.name == *name {
                skipping = None;
            }
            continue;
        }

        if !tag.closing && !tag.self_closing && SKIPPED_TAGS.contains(&tag.name.as_str()) {
            skipping = Some(tag.name);
            continue;
        }

        if BLOCK_TAGS.contains(&tag.name.as_str()) {
            raw.push('\n');
            if tag.name == "li" && !tag.closing {
                raw.push_str("- ");
            }
        } else if matches!(tag.name.as_str(), "td" | "th") && tag.closing {
            raw.push_str("  ");
        }
    }
    if skipping.is_none() {
        raw.push_str(rest);
    }

    let mut lines: Vec<String> = Vec::new();
    for line in raw.split('\n') {
        let line = collapse_whitespace(&decode_entities(line));
        if line.is_empty() && lines.last().is_none_or(|previous| previous.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
}

struct Tag {
    name: String,
    closing: bool,
    self_closing: bool,
}

impl Tag {
    fn parse(inner: &str) -> Self {
        let inner = inner.trim();
        let closing = inner.starts_with('/');
        let self_closing = inner.ends_with('/');
        let name = inner
            .trim_start_matches('/')
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        Self {
            name,
            closing,
            self_closing,
        }
    }
}

fn collapse_whitespace(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let candidate = &rest[start..];

        match candidate.find(';').filter(|&end| end <= 10) {
            Some(end) => match decode_entity(&candidate[1..end]) {
                Some(c) => {
                    out.push(c);
                    rest = &candidate[end + 1..];
                }
                None => {
                    out.push('&');
                    rest = &candidate[1..];
                }
            },
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}
