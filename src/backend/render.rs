//! Text-to-HTML rules for the content cards.
//!
//! Plain-text fields are escaped first and then run through the paragraph
//! transform; only the code field opts into raw pass-through. The transform
//! itself must stay byte-compatible with what the backend's authors expect:
//! a blank line becomes a paragraph break, a single newline becomes `<br>`,
//! and the whole string is wrapped in one `<p>…</p>` pair.

use crate::backend::models::Exercises;

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn paragraphs(text: &str) -> String {
    let body = text.replace("\n\n", "</p><p>").replace('\n', "<br>");
    format!("<p>{body}</p>")
}

/// Escaped text through the paragraph transform. This is the default for
/// theory, case and free-form exercise text.
pub fn format_content(text: &str) -> String {
    paragraphs(&escape_html(text))
}

/// Code samples are intentionally rendered raw inside a `<pre><code>` block.
pub fn format_code(code: &str) -> String {
    format!("<pre><code>{code}</code></pre>")
}

/// A list of exercises becomes numbered paragraphs; a text blob goes through
/// the same transform as any other text field.
pub fn format_exercises(exercises: &Exercises) -> String {
    match exercises {
        Exercises::List(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| format!("<p><strong>{}. </strong>{}</p>", i + 1, escape_html(item)))
            .collect(),
        Exercises::Text(text) => format_content(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraph_transform_is_exact() {
        assert_eq!(format_content("a\n\nb\nc"), "<p>a</p><p>b<br>c</p>");
    }

    #[test]
    fn whole_string_wrapped_once() {
        assert_eq!(format_content("only"), "<p>only</p>");
        assert_eq!(format_content(""), "<p></p>");
    }

    #[test]
    fn text_fields_escape_markup() {
        assert_eq!(format_content("1 < 2"), "<p>1 &lt; 2</p>");
        assert_eq!(
            format_content("<script>x</script>"),
            "<p>&lt;script&gt;x&lt;/script&gt;</p>"
        );
    }

    #[test]
    fn code_passes_through_raw() {
        assert_eq!(
            format_code("let x: Vec<u8> = vec![];"),
            "<pre><code>let x: Vec<u8> = vec![];</code></pre>"
        );
    }

    #[test]
    fn exercise_list_becomes_numbered_paragraphs() {
        let formatted = format_exercises(&Exercises::List(vec!["q1".into(), "q2".into()]));
        assert_eq!(
            formatted,
            "<p><strong>1. </strong>q1</p><p><strong>2. </strong>q2</p>"
        );
    }

    #[test]
    fn exercise_text_matches_content_transform() {
        let formatted = format_exercises(&Exercises::Text("q1\nq2".into()));
        assert_eq!(formatted, format_content("q1\nq2"));
        assert_eq!(formatted, "<p>q1<br>q2</p>");
    }
}
