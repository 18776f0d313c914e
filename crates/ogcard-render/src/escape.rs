//! Escaping for text embedded in SVG markup.

/// Escape the five XML-reserved characters.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_reserved_characters() {
        assert_eq!(
            escape_xml(r#"Tom & Jerry's <"show">"#),
            "Tom &amp; Jerry&apos;s &lt;&quot;show&quot;&gt;"
        );
    }

    #[test]
    fn leaves_plain_text_alone() {
        assert_eq!(escape_xml("Déjà vu: 100%"), "Déjà vu: 100%");
    }

    #[test]
    fn escapes_existing_entities_verbatim() {
        assert_eq!(escape_xml("&amp;"), "&amp;amp;");
    }
}
