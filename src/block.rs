//! Defines the [`Block`] type, one unit of page content, and its
//! type-specific [`Payload`] union.
//!
//! The Notion API discriminates block objects with a `"type"` field whose
//! value doubles as the key the payload sub-object lives under, e.g.
//! `{"type": "paragraph", "paragraph": {"rich_text": […]}}`. That shape
//! doesn't map onto a serde-derived tagged enum, so [`Block::from_value`]
//! decodes the raw object once at the boundary and matches the tag
//! exhaustively. Block kinds this renderer doesn't know keep their literal
//! type string in [`Payload::Other`] so they can render as a visible
//! placeholder instead of failing.

use crate::text::RichText;
use serde::Deserialize;
use serde_json::Value;

/// One content block, as returned by the blocks endpoints.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub id: String,

    /// Whether the block has nested children that must be fetched
    /// separately.
    pub has_children: bool,

    pub payload: Payload,
}

/// The closed set of block variants this renderer understands, plus a
/// catch-all carrying the literal type tag.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    Paragraph(Text),
    Heading1(Text),
    Heading2(Text),
    Heading3(Text),
    BulletedListItem(Text),
    NumberedListItem(Text),
    ToDo(ToDo),
    Toggle(Text),
    ChildPage(ChildPage),
    Divider,
    Quote(Text),
    Code(Text),
    Bookmark(Bookmark),
    Other(String),
}

/// The payload shared by the plain rich-text variants.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Text {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ToDo {
    #[serde(default)]
    pub rich_text: Vec<RichText>,

    #[serde(default)]
    pub checked: bool,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ChildPage {
    pub title: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Bookmark {
    pub url: String,
}

/// The two list-item kinds whose adjacent siblings merge into a single run
/// (see [`crate::tree::merge_runs`]). No other block kind ever merges.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ListKind {
    Bulleted,
    Numbered,
}

impl Payload {
    /// Returns the list kind iff the block is a list item.
    pub fn list_kind(&self) -> Option<ListKind> {
        match self {
            Payload::BulletedListItem(_) => Some(ListKind::Bulleted),
            Payload::NumberedListItem(_) => Some(ListKind::Numbered),
            _ => None,
        }
    }

    /// Returns the rich-text payload iff the block is a list item of
    /// exactly the given kind. Run siblings are rendered through this so a
    /// mismatched sibling contributes no `<li>` of its own.
    pub fn list_text(&self, kind: ListKind) -> Option<&Text> {
        match (self, kind) {
            (Payload::BulletedListItem(text), ListKind::Bulleted) => Some(text),
            (Payload::NumberedListItem(text), ListKind::Numbered) => Some(text),
            _ => None,
        }
    }
}

/// The raw block object: discriminant plus everything else. The payload
/// sub-object stays as an untyped [`Value`] until the tag is matched.
#[derive(Deserialize)]
struct RawBlock {
    id: String,
    has_children: bool,
    #[serde(rename = "type")]
    kind: String,
    #[serde(flatten)]
    rest: serde_json::Map<String, Value>,
}

impl Block {
    /// Decodes a raw API object into a [`Block`]. Fails if the object is
    /// not block-shaped (no `id`/`type`/`has_children`) or if a known
    /// variant's payload doesn't match its documented shape. Unknown
    /// variants succeed as [`Payload::Other`].
    pub fn from_value(value: Value) -> serde_json::Result<Block> {
        let mut raw: RawBlock = serde_json::from_value(value)?;
        let payload_value = raw.rest.remove(&raw.kind).unwrap_or(Value::Null);

        fn decode<T: serde::de::DeserializeOwned>(value: Value) -> serde_json::Result<T> {
            serde_json::from_value(value)
        }

        let payload = match raw.kind.as_str() {
            "paragraph" => Payload::Paragraph(decode(payload_value)?),
            "heading_1" => Payload::Heading1(decode(payload_value)?),
            "heading_2" => Payload::Heading2(decode(payload_value)?),
            "heading_3" => Payload::Heading3(decode(payload_value)?),
            "bulleted_list_item" => Payload::BulletedListItem(decode(payload_value)?),
            "numbered_list_item" => Payload::NumberedListItem(decode(payload_value)?),
            "to_do" => Payload::ToDo(decode(payload_value)?),
            "toggle" => Payload::Toggle(decode(payload_value)?),
            "child_page" => Payload::ChildPage(decode(payload_value)?),
            "divider" => Payload::Divider,
            "quote" => Payload::Quote(decode(payload_value)?),
            "code" => Payload::Code(decode(payload_value)?),
            "bookmark" => Payload::Bookmark(decode(payload_value)?),
            _ => Payload::Other(raw.kind),
        };

        Ok(Block {
            id: raw.id,
            has_children: raw.has_children,
            payload,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_decode_paragraph() -> serde_json::Result<()> {
        let block = Block::from_value(serde_json::json!({
            "object": "block",
            "id": "p1",
            "has_children": false,
            "type": "paragraph",
            "paragraph": { "rich_text": [{ "plain_text": "hello" }] }
        }))?;
        assert_eq!(block.id, "p1");
        assert!(!block.has_children);
        assert_eq!(
            block.payload,
            Payload::Paragraph(Text {
                rich_text: vec![RichText::plain("hello")]
            })
        );
        Ok(())
    }

    #[test]
    fn test_decode_to_do_checked() -> serde_json::Result<()> {
        let block = Block::from_value(serde_json::json!({
            "id": "t1",
            "has_children": false,
            "type": "to_do",
            "to_do": { "rich_text": [{ "plain_text": "ship it" }], "checked": true }
        }))?;
        match block.payload {
            Payload::ToDo(to_do) => assert!(to_do.checked),
            other => panic!("expected to_do, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_decode_divider_and_bookmark() -> serde_json::Result<()> {
        let divider = Block::from_value(serde_json::json!({
            "id": "d1",
            "has_children": false,
            "type": "divider",
            "divider": {}
        }))?;
        assert_eq!(divider.payload, Payload::Divider);

        let bookmark = Block::from_value(serde_json::json!({
            "id": "b1",
            "has_children": false,
            "type": "bookmark",
            "bookmark": { "url": "https://example.org/" }
        }))?;
        assert_eq!(
            bookmark.payload,
            Payload::Bookmark(Bookmark {
                url: String::from("https://example.org/")
            })
        );
        Ok(())
    }

    #[test]
    fn test_decode_unknown_kind_keeps_tag() -> serde_json::Result<()> {
        let block = Block::from_value(serde_json::json!({
            "id": "x1",
            "has_children": false,
            "type": "child_database",
            "child_database": { "title": "inventory" }
        }))?;
        assert_eq!(block.payload, Payload::Other(String::from("child_database")));
        Ok(())
    }

    #[test]
    fn test_decode_rejects_non_block_shape() {
        // No `has_children` member: page- and database-shaped objects must
        // not decode as blocks.
        assert!(Block::from_value(serde_json::json!({
            "id": "x",
            "type": "paragraph",
            "paragraph": { "rich_text": [] }
        }))
        .is_err());
    }

    #[test]
    fn test_list_kind() {
        let bulleted = Payload::BulletedListItem(Text::default());
        let numbered = Payload::NumberedListItem(Text::default());
        assert_eq!(bulleted.list_kind(), Some(ListKind::Bulleted));
        assert_eq!(numbered.list_kind(), Some(ListKind::Numbered));
        assert_eq!(Payload::Divider.list_kind(), None);
        assert!(bulleted.list_text(ListKind::Numbered).is_none());
        assert!(bulleted.list_text(ListKind::Bulleted).is_some());
    }
}
