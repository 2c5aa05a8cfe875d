//! Escaping of worksheet lines for embedding in notebook JSON strings.

/// Escape a raw line for embedding as a JSON string literal.
///
/// Returns the line without surrounding quotes or trailing newline.
/// Backslashes are doubled before quotes are escaped; the reverse order
/// would re-escape the backslash introduced by quote escaping.
pub fn escape_code(line: &str) -> String {
    line.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Escape a narrative line and rewrite the markup tokens Sage worksheet
/// exports are known to contain.
///
/// Applies [`escape_code`] first, then a fixed set of substitutions: `<p>`
/// is deleted, `</p>` becomes two spaces (a Markdown line break), `&nbsp;`
/// is deleted, `&amp;` and `&lt;` are decoded. No other tags or entities
/// are recognized; the rule set is intentionally narrow.
pub fn escape_markdown(line: &str) -> String {
    escape_code(line)
        .replace("<p>", "")
        .replace("</p>", "  ")
        .replace("&nbsp;", "")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_text_is_unchanged() {
        let line = "plain narrative text with no special characters";
        assert_eq!(escape_code(line), line);
        assert_eq!(escape_markdown(line), line);
    }

    #[test]
    fn test_backslash_doubled_before_quote_escape() {
        // A reversed implementation would produce a\\\\"b instead.
        assert_eq!(escape_code("a\\\"b"), "a\\\\\\\"b");
    }

    #[test]
    fn test_quote_escape() {
        assert_eq!(escape_code("say \"hi\""), "say \\\"hi\\\"");
    }

    #[test]
    fn test_markup_stripping() {
        // &nbsp; is deleted outright, not replaced by a space.
        assert_eq!(escape_markdown("<p>Hello&nbsp;World</p>"), "HelloWorld  ");
    }

    #[test]
    fn test_entity_decoding() {
        assert_eq!(escape_markdown("a &amp; b"), "a & b");
        assert_eq!(escape_markdown("x &lt; y"), "x < y");
    }

    #[test]
    fn test_unrecognized_entities_pass_through() {
        assert_eq!(escape_markdown("&gt; <em>hi</em>"), "&gt; <em>hi</em>");
    }

    #[test]
    fn test_code_lines_keep_markup() {
        assert_eq!(escape_code("<p>html = '&amp;'</p>"), "<p>html = '&amp;'</p>");
    }
}
