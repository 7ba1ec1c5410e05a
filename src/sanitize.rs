//! Neutralizes untrusted text before it reaches storage, mail bodies, or logs.

/// Cleans a user-supplied string: strips control characters, trims, and
/// entity-encodes HTML. `None` maps to the empty string.
///
/// Decoding happens first so that entity-encoded whitespace and control
/// characters (`&#32;`, `&#x1b;`) are subject to the same stripping and
/// trimming as their literal forms; re-encoding at the end makes the whole
/// function idempotent, so fields can safely pass through it again at
/// email-render time.
pub fn clean(input: Option<&str>) -> String {
    let decoded = html_escape::decode_html_entities(input.unwrap_or_default());
    let without_control: String = decoded
        .chars()
        .filter(|c| !c.is_control() || *c == '\n')
        .collect();
    html_escape::encode_safe(without_control.trim()).into_owned()
}

/// `clean` for optional fields that stay optional: empty results become `None`.
pub fn clean_opt(input: Option<&str>) -> Option<String> {
    let cleaned = clean(input);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Cleans every entry of a tag/ID list, dropping entries that sanitize away.
pub fn clean_list(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|s| clean(Some(s)))
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_maps_to_empty() {
        assert_eq!(clean(None), "");
        assert_eq!(clean_opt(None), None);
    }

    #[test]
    fn trims_and_strips_control_chars() {
        assert_eq!(clean(Some("  Kiruna\u{0007} ")), "Kiruna");
    }

    #[test]
    fn script_tags_never_survive() {
        let out = clean(Some("<script>alert('x')</script>"));
        assert!(!out.contains("<script>"));
        assert!(out.contains("&lt;script&gt;"));
    }

    #[test]
    fn idempotent_on_markup() {
        let inputs = [
            "<b>hello</b>",
            "plain text",
            "a & b < c",
            "  <script>doc</script>  ",
            "&lt;already encoded&gt;",
            "&#32;&#32;hi",
            "&#x1b;hi&#9;",
        ];
        for input in inputs {
            let once = clean(Some(input));
            let twice = clean(Some(&once));
            assert_eq!(once, twice, "input: {input}");
        }
    }

    #[test]
    fn entity_encoded_whitespace_is_trimmed_on_first_pass() {
        assert_eq!(clean(Some("&#32;&#32;hi")), "hi");
        assert_eq!(clean(Some("hi&#32;&#32;")), "hi");
    }

    #[test]
    fn entity_encoded_control_chars_are_stripped() {
        assert_eq!(clean(Some("&#x1b;hi")), "hi");
        assert_eq!(clean(Some("a&#8;b")), "ab");
    }

    #[test]
    fn list_drops_empty_entries() {
        let items = vec!["snowmobile-tour".into(), "   ".into(), "aurora".into()];
        assert_eq!(clean_list(&items), vec!["snowmobile-tour", "aurora"]);
    }
}
