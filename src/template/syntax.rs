use serde::{Deserialize, Serialize};

/// Delimiters that wrap every placeholder token, e.g. `{{` and `}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderSyntax {
    pub open: String,
    pub close: String,
}

impl Default for PlaceholderSyntax {
    fn default() -> Self {
        Self {
            open: "{{".to_string(),
            close: "}}".to_string(),
        }
    }
}

impl PlaceholderSyntax {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    /// True when `token` is exactly one delimited placeholder with a non-empty name.
    pub fn wraps(&self, token: &str) -> bool {
        let Some(inner) = token
            .strip_prefix(self.open.as_str())
            .and_then(|rest| rest.strip_suffix(self.close.as_str()))
        else {
            return false;
        };

        !inner.trim().is_empty() && !inner.contains(&self.open) && !inner.contains(&self.close)
    }

    /// Every delimited placeholder in `text`, in order of appearance.
    ///
    /// Returns the byte offset of the first opening delimiter that is never closed.
    pub fn scan<'t>(&self, text: &'t str) -> Result<Vec<&'t str>, usize> {
        let mut found = Vec::new();
        if self.open.is_empty() || self.close.is_empty() {
            return Ok(found);
        }

        let mut offset = 0;
        while let Some(start) = text[offset..].find(&self.open) {
            let start = offset + start;
            let body = start + self.open.len();
            let Some(end) = text[body..].find(&self.close) else {
                return Err(start);
            };
            let end = body + end + self.close.len();
            found.push(&text[start..end]);
            offset = end;
        }

        Ok(found)
    }
}

/// Replace every literal occurrence of each token in a single left-to-right pass.
///
/// At any position the longest matching token wins, and substituted values are
/// never scanned again.
pub fn replace_tokens<T, V>(text: &str, replacements: &[(T, V)]) -> String
where
    T: AsRef<str>,
    V: AsRef<str>,
{
    let mut ordered: Vec<(&str, &str)> = replacements
        .iter()
        .map(|(token, value)| (token.as_ref(), value.as_ref()))
        .filter(|(token, _)| !token.is_empty())
        .collect();
    ordered.sort_by(|left, right| right.0.len().cmp(&left.0.len()));

    let mut output = String::with_capacity(text.len());
    let mut rest = text;

    while let Some((position, token, value)) = earliest_match(rest, &ordered) {
        output.push_str(&rest[..position]);
        output.push_str(value);
        rest = &rest[position + token.len()..];
    }

    output.push_str(rest);
    output
}

fn earliest_match<'r>(
    haystack: &str,
    ordered: &[(&'r str, &'r str)],
) -> Option<(usize, &'r str, &'r str)> {
    let mut best: Option<(usize, &'r str, &'r str)> = None;

    for &(token, value) in ordered {
        if let Some(position) = haystack.find(token)
            && best.is_none_or(|(current, _, _)| position < current)
        {
            best = Some((position, token, value));
        }
    }

    best
}

pub fn escape_html(value: &str) -> String {
    escape_with(value, "&#39;")
}

pub fn escape_xml(value: &str) -> String {
    escape_with(value, "&apos;")
}

fn escape_with(value: &str, apostrophe: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str(apostrophe),
            _ => escaped.push(c),
        }
    }
    escaped
}
