use crate::template::{FieldMapping, escape_html};

/// HTML preview template declaring every token of `mapping`, one labelled line per field.
pub fn starter_markup(mapping: &FieldMapping) -> String {
    let mut markup = String::from(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Specification</title>\n</head>\n<body>\n<h1>Specification</h1>\n",
    );

    for binding in mapping.iter() {
        markup.push_str("<p><strong>");
        markup.push_str(&escape_html(&binding.field));
        markup.push_str(":</strong> ");
        markup.push_str(&binding.token);
        markup.push_str("</p>\n");
    }

    markup.push_str("</body>\n</html>\n");
    markup
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declares_every_token_once() {
        let mapping = FieldMapping::default();
        let markup = starter_markup(&mapping);

        for token in mapping.tokens() {
            assert_eq!(markup.matches(token).count(), 1, "{token} should appear once");
        }
        assert!(markup.contains("<strong>Client:</strong> {{CLIENT}}"));
    }
}
