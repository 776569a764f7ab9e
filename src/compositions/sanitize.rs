//! Description sanitization.
//!
//! Descriptions accept only hyperlinks; every other tag is stripped and bare
//! URLs are turned into anchors. Runs on every description write, never only
//! at creation, so edits stay consistent with the derived HTML field.

use std::collections::HashSet;

use linkify::{LinkFinder, LinkKind};

/// Sanitize a raw description into the derived HTML form.
#[must_use]
pub fn sanitize_description(raw: &str) -> String {
    let cleaned = ammonia::Builder::default()
        .tags(HashSet::from(["a"]))
        .link_rel(None)
        .clean(raw)
        .to_string();
    autolink(&cleaned)
}

/// Linkify bare URLs in the text segments outside existing anchors.
///
/// After cleaning, the only markup left is `<a>` elements, so skipping
/// everything from `<a` to the closing `</a>` is sufficient to avoid
/// double-linking.
fn autolink(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(start) = rest.find("<a") {
        out.push_str(&linkify_text(&rest[..start]));
        let end = rest[start..]
            .find("</a>")
            .map_or(rest.len(), |i| start + i + "</a>".len());
        out.push_str(&rest[start..end]);
        rest = &rest[end..];
    }
    out.push_str(&linkify_text(rest));
    out
}

fn linkify_text(text: &str) -> String {
    let mut finder = LinkFinder::new();
    finder.kinds(&[LinkKind::Url]);

    let mut out = String::with_capacity(text.len());
    for span in finder.spans(text) {
        match span.kind() {
            Some(LinkKind::Url) => {
                let url = span.as_str();
                out.push_str(&format!("<a href=\"{url}\">{url}</a>"));
            }
            _ => out.push_str(span.as_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disallowed_tags_are_stripped() {
        assert_eq!(sanitize_description("<b>bold</b> text"), "bold text");
        assert_eq!(sanitize_description("<h1>title</h1>"), "title");
    }

    #[test]
    fn test_script_content_is_removed() {
        let html = sanitize_description("<script>alert('x')</script>safe");
        assert!(!html.contains("alert"));
        assert!(html.contains("safe"));
    }

    #[test]
    fn test_anchors_survive() {
        let html = sanitize_description(r#"<a href="https://example.com">listen</a>"#);
        assert!(html.contains(r#"href="https://example.com""#));
        assert!(html.contains("listen"));
    }

    #[test]
    fn test_bare_urls_become_anchors() {
        let html = sanitize_description("out now: https://example.com/ep");
        assert_eq!(
            html,
            r#"out now: <a href="https://example.com/ep">https://example.com/ep</a>"#
        );
    }

    #[test]
    fn test_existing_anchors_are_not_double_linked() {
        let input = r#"<a href="https://example.com">https://example.com</a>"#;
        let html = sanitize_description(input);
        assert_eq!(html.matches("<a ").count(), 1);
    }

    #[test]
    fn test_plain_text_is_untouched() {
        assert_eq!(sanitize_description("three chords and the truth"), "three chords and the truth");
    }
}
