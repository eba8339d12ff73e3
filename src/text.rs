//! Defines the [`RichText`] span type, the smallest unit of styled content
//! in the Notion data model. Both page titles and block payloads are
//! sequences of these spans.

use serde::Deserialize;

/// A styled run of text with an optional hyperlink. Spans are read-only
/// snapshots; nothing mutates them after decoding.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct RichText {
    /// The text content with all styling stripped.
    pub plain_text: String,

    /// The hyperlink destination, if the span is a link.
    #[serde(default)]
    pub href: Option<String>,

    /// The styling applied to the span.
    #[serde(default)]
    pub annotations: Annotations,
}

impl RichText {
    /// Constructs an unstyled, unlinked span. Mostly useful in tests.
    pub fn plain(text: impl Into<String>) -> RichText {
        RichText {
            plain_text: text.into(),
            ..RichText::default()
        }
    }
}

/// The annotation set of a [`RichText`] span. `color` is the string the API
/// hands back; the value `"default"` (or an absent value) means "no color".
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
    pub color: String,
}

impl Default for Annotations {
    fn default() -> Annotations {
        Annotations {
            bold: false,
            italic: false,
            strikethrough: false,
            underline: false,
            code: false,
            color: String::from("default"),
        }
    }
}

impl Annotations {
    /// Returns the color iff one is actually set.
    pub fn color(&self) -> Option<&str> {
        match self.color.as_str() {
            "" | "default" => None,
            color => Some(color),
        }
    }
}

/// Concatenates the plain text of a sequence of spans, e.g. for page
/// `<title>` elements and feed entry titles.
pub fn plain_text(spans: &[RichText]) -> String {
    spans.iter().map(|s| s.plain_text.as_str()).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_decode_span() -> serde_json::Result<()> {
        let span: RichText = serde_json::from_value(serde_json::json!({
            "type": "text",
            "plain_text": "hello",
            "href": "https://example.org/",
            "annotations": {
                "bold": true,
                "italic": false,
                "strikethrough": false,
                "underline": false,
                "code": true,
                "color": "red"
            }
        }))?;
        assert_eq!(span.plain_text, "hello");
        assert_eq!(span.href.as_deref(), Some("https://example.org/"));
        assert!(span.annotations.bold);
        assert!(span.annotations.code);
        assert!(!span.annotations.italic);
        assert_eq!(span.annotations.color(), Some("red"));
        Ok(())
    }

    #[test]
    fn test_decode_span_minimal() -> serde_json::Result<()> {
        let span: RichText =
            serde_json::from_value(serde_json::json!({ "plain_text": "x" }))?;
        assert_eq!(span, RichText::plain("x"));
        assert_eq!(span.annotations.color(), None);
        Ok(())
    }

    #[test]
    fn test_plain_text_concat() {
        let spans = vec![RichText::plain("a"), RichText::plain("b")];
        assert_eq!(plain_text(&spans), "ab");
    }
}
