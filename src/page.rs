//! Defines the [`Page`] type, the metadata record for one blog post as
//! stored in the Notion database. A page is a read-only snapshot; its
//! content blocks are fetched separately (see [`crate::tree`]).
//!
//! Decoding doubles as shape validation: a response that is not page-shaped
//! (a database object, say) is missing the `Name`/`Published` properties and
//! fails to decode, which the client surfaces as a "not a page" error.

use crate::text::RichText;
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

/// Posts are timestamped in Japan Standard Time, matching the locale the
/// blog is published in.
const JST_OFFSET_SECONDS: i32 = 9 * 3600;

/// One row of the blog's Notion database.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Page {
    pub id: String,

    /// RFC 3339 creation timestamp, e.g. `2021-03-16T05:34:00.000Z`.
    pub created_time: String,

    pub properties: Properties,
}

/// The database properties this blog cares about. `Name` and `Published`
/// are required; a record without them is not a post.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Properties {
    #[serde(rename = "Name")]
    pub name: TitleProperty,

    #[serde(rename = "Published")]
    pub published: CheckboxProperty,

    #[serde(rename = "Category", default)]
    pub category: Option<SelectProperty>,

    #[serde(rename = "Tags", default)]
    pub tags: Option<MultiSelectProperty>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct TitleProperty {
    #[serde(default)]
    pub title: Vec<RichText>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct CheckboxProperty {
    #[serde(default)]
    pub checkbox: bool,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct SelectProperty {
    #[serde(default)]
    pub select: Option<SelectOption>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct MultiSelectProperty {
    #[serde(default)]
    pub multi_select: Vec<SelectOption>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SelectOption {
    pub name: String,
}

impl Page {
    /// The title as rich-text spans, for rendering the post heading.
    pub fn title(&self) -> &[RichText] {
        &self.properties.name.title
    }

    /// The title with styling stripped, for `<title>` elements and index
    /// entries.
    pub fn plain_title(&self) -> String {
        crate::text::plain_text(self.title())
    }

    /// Whether the `Published` checkbox is ticked. Unpublished pages must
    /// resolve to "not found" rather than render.
    pub fn published(&self) -> bool {
        self.properties.published.checkbox
    }

    /// The category label, if one is selected.
    pub fn category(&self) -> Option<&str> {
        self.properties
            .category
            .as_ref()
            .and_then(|p| p.select.as_ref())
            .map(|o| o.name.as_str())
    }

    /// The tag labels, in database order. An absent `Tags` property reads
    /// as no tags.
    pub fn tags(&self) -> Vec<&str> {
        match &self.properties.tags {
            Some(p) => p.multi_select.iter().map(|o| o.name.as_str()).collect(),
            None => Vec::new(),
        }
    }

    /// Parses `created_time` into a timestamp in the blog's fixed timezone.
    pub fn created(&self) -> chrono::ParseResult<DateTime<FixedOffset>> {
        let offset = FixedOffset::east_opt(JST_OFFSET_SECONDS).unwrap(); // static offset
        Ok(DateTime::parse_from_rfc3339(&self.created_time)?.with_timezone(&offset))
    }

    /// Formats the creation timestamp the way the rendered page shows it,
    /// e.g. `2021/03/16 14:34`.
    pub fn formatted_date(&self) -> chrono::ParseResult<String> {
        Ok(self.created()?.format("%Y/%m/%d %H:%M").to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn fixture() -> serde_json::Value {
        serde_json::json!({
            "object": "page",
            "id": "b55c9c91-384d-452b-81db-d1ef79372b75",
            "created_time": "2021-03-16T05:34:00.000Z",
            "properties": {
                "Name": {
                    "type": "title",
                    "title": [{ "plain_text": "First post" }]
                },
                "Published": { "type": "checkbox", "checkbox": true },
                "Category": {
                    "type": "select",
                    "select": { "name": "notes" }
                },
                "Tags": {
                    "type": "multi_select",
                    "multi_select": [{ "name": "rust" }, { "name": "blog" }]
                }
            }
        })
    }

    #[test]
    fn test_decode_page() -> serde_json::Result<()> {
        let page: Page = serde_json::from_value(fixture())?;
        assert_eq!(page.plain_title(), "First post");
        assert!(page.published());
        assert_eq!(page.category(), Some("notes"));
        assert_eq!(page.tags(), vec!["rust", "blog"]);
        Ok(())
    }

    #[test]
    fn test_decode_page_without_optional_properties() -> serde_json::Result<()> {
        let mut value = fixture();
        let properties = value["properties"].as_object_mut().unwrap();
        properties.remove("Category");
        properties.remove("Tags");
        let page: Page = serde_json::from_value(value)?;
        assert_eq!(page.category(), None);
        assert!(page.tags().is_empty());
        Ok(())
    }

    #[test]
    fn test_decode_unpublished_page() -> serde_json::Result<()> {
        let mut value = fixture();
        value["properties"]["Published"]["checkbox"] = serde_json::json!(false);
        let page: Page = serde_json::from_value(value)?;
        assert!(!page.published());
        Ok(())
    }

    #[test]
    fn test_decode_rejects_database_shape() {
        // A database object has no page-shaped `properties`; decoding must
        // fail rather than produce a half-formed page.
        let result: serde_json::Result<Page> =
            serde_json::from_value(serde_json::json!({
                "object": "database",
                "id": "x",
                "created_time": "2021-03-16T05:34:00.000Z",
                "title": []
            }));
        assert!(result.is_err());
    }

    #[test]
    fn test_formatted_date_is_jst() -> chrono::ParseResult<()> {
        let page: Page = serde_json::from_value(fixture()).unwrap();
        // 05:34 UTC is 14:34 in UTC+9.
        assert_eq!(page.formatted_date()?, "2021/03/16 14:34");
        Ok(())
    }
}
