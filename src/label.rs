//! Defines the [`Label`] type, which represents a post's tag or category.

use url::Url;

/// A tag or category label attached to a [`crate::page::Page`]. The name is
/// shown verbatim; the slug is what ends up in the index URL so that e.g.
/// `macOS` and `MacOS` resolve to the same index page.
#[derive(Clone, Debug)]
pub struct Label {
    pub name: String,
    pub slug: String,
    pub url: Url,
}

impl Label {
    /// Builds a label whose index page lives at `{base_url}/{slug}/`.
    pub fn new(name: &str, base_url: &Url) -> Result<Label, url::ParseError> {
        let slug = slug::slugify(name);
        Ok(Label {
            name: name.to_owned(),
            url: base_url.join(&format!("{}/", slug))?,
            slug,
        })
    }
}

impl std::hash::Hash for Label {
    /// Implements [`std::hash::Hash`] for [`Label`] by delegating directly
    /// to the `slug` field.
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.slug.hash(state)
    }
}

impl PartialEq for Label {
    /// Implements [`PartialEq`] and [`Eq`] for [`Label`] by delegating
    /// directly to the `slug` field.
    fn eq(&self, other: &Self) -> bool {
        self.slug == other.slug
    }
}
impl Eq for Label {}
