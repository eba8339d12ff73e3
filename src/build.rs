//! Exports the high-level operations that stitch the crate together:
//! [`assemble_page`] fetches one post end to end (metadata, publish gate,
//! block tree), and [`build_site`] renders every published post plus the
//! index pages and the Atom feed.
//!
//! Nothing here retries and nothing renders partially: any fetch failure
//! fails the whole operation. The only deliberately "soft" outcome is
//! [`Error::Unpublished`], which the CLI reports as "not found" rather
//! than as a failure to fetch.

use crate::client::{self, Api, HttpClient};
use crate::config::Config;
use crate::feed::{self, write_feed, FeedConfig};
use crate::html;
use crate::page::Page;
use crate::tree::{self, build_tree, BlockNode};
use crate::write::{
    self, parse_template, PostSummary, Writer, DEFAULT_INDEX_TEMPLATE, DEFAULT_POST_TEMPLATE,
};
use std::fmt;
use std::fs::File;
use std::io;
use tracing::info;

/// Fetches one post: its page metadata, its root block, and its merged
/// block tree. An unpublished page fails with [`Error::Unpublished`]
/// before any content is fetched; no partial page is ever returned.
pub fn assemble_page<A: Api + ?Sized>(api: &A, id: &str) -> Result<(Page, Vec<BlockNode>)> {
    let page = api.retrieve_page(id)?;
    if !page.published() {
        return Err(Error::Unpublished(id.to_owned()));
    }
    let root = api.retrieve_block(id)?;
    let blocks = build_tree(api, &root.id)?;
    Ok((page, blocks))
}

/// Builds the whole site from a [`Config`], talking to the real API.
pub fn build_site(config: &Config) -> Result<()> {
    let api = HttpClient::new(config)?;
    build_site_with(config, &api)
}

/// Builds the whole site against any [`Api`] implementation: every
/// published post page, the main/tag/category index pages, and the feed.
pub fn build_site_with<A: Api + ?Sized>(config: &Config, api: &A) -> Result<()> {
    let post_template = parse_template(DEFAULT_POST_TEMPLATE)?;
    let index_template = parse_template(DEFAULT_INDEX_TEMPLATE)?;
    let writer = Writer {
        post_template: &post_template,
        index_template: &index_template,
        config,
    };

    let pages = api.query_published()?;
    info!("Rendering {} published posts", pages.len());

    let mut posts: Vec<PostSummary> = Vec::with_capacity(pages.len());
    for page in &pages {
        let root = api.retrieve_block(&page.id)?;
        let blocks = build_tree(api, &root.id)?;
        let body = html::render_blocks(&blocks)?;
        posts.push(writer.write_post(page, &body)?);
    }

    // Newest first, like the original blog's index. RFC 3339 timestamps in
    // the same offset sort lexicographically.
    posts.sort_by(|a, b| b.created_time.cmp(&a.created_time));
    writer.write_indices(&posts)?;

    std::fs::create_dir_all(&config.output_directory)?;
    write_feed(
        FeedConfig {
            title: config.title.clone(),
            id: config.home_page.to_string(),
            author: config.author.clone(),
            home_page: config.home_page.clone(),
        },
        &posts,
        File::create(config.output_directory.join("feed.atom"))?,
    )?;

    Ok(())
}

/// Renders a single post document into the given writer. Used by the
/// `page` subcommand.
pub fn render_page<A: Api + ?Sized, W: io::Write>(
    config: &Config,
    api: &A,
    id: &str,
    w: &mut W,
) -> Result<()> {
    let (page, blocks) = assemble_page(api, id)?;
    let post_template = parse_template(DEFAULT_POST_TEMPLATE)?;
    let index_template = parse_template(DEFAULT_INDEX_TEMPLATE)?;
    let writer = Writer {
        post_template: &post_template,
        index_template: &index_template,
        config,
    };
    let summary = writer.summarize(&page)?;
    let body = html::render_blocks(&blocks)?;
    writer.render_post(&page, &summary, &body, w)?;
    Ok(())
}

/// The result of a fallible site-building operation.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for assembling and building. Errors can come from the
/// content API, tree construction, templating/writing, the feed, and
/// other I/O.
#[derive(Debug)]
pub enum Error {
    /// Returned when the requested page exists but its `Published`
    /// checkbox is unticked. Surfaced to callers as "not found", distinct
    /// from a fetch failure.
    Unpublished(String),

    /// Returned for content API failures.
    Client(client::Error),

    /// Returned for errors while building a block tree.
    Tree(tree::Error),

    /// Returned for errors templating or writing output files.
    Write(write::Error),

    /// Returned for errors writing the feed.
    Feed(feed::Error),

    /// Returned for other I/O errors.
    Io(io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Unpublished(id) => write!(f, "Page '{}' is not published", id),
            Error::Client(err) => err.fmt(f),
            Error::Tree(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
            Error::Feed(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Unpublished(_) => None,
            Error::Client(err) => Some(err),
            Error::Tree(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::Feed(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<client::Error> for Error {
    /// Converts [`client::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: client::Error) -> Error {
        Error::Client(err)
    }
}

impl From<tree::Error> for Error {
    /// Converts [`tree::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: tree::Error) -> Error {
        Error::Tree(err)
    }
}

impl From<write::Error> for Error {
    /// Converts [`write::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: write::Error) -> Error {
        Error::Write(err)
    }
}

impl From<feed::Error> for Error {
    /// Converts [`feed::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: feed::Error) -> Error {
        Error::Feed(err)
    }
}

impl From<io::Error> for Error {
    /// Converts [`io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::block::{Block, Payload, Text};
    use crate::client::ChildrenPage;
    use crate::text::RichText;

    struct OnePostApi {
        published: bool,
    }

    fn page(published: bool) -> Page {
        serde_json::from_value(serde_json::json!({
            "id": "p1",
            "created_time": "2021-03-16T05:34:00.000Z",
            "properties": {
                "Name": { "title": [{ "plain_text": "First post" }] },
                "Published": { "checkbox": published }
            }
        }))
        .unwrap()
    }

    impl Api for OnePostApi {
        fn query_published(&self) -> client::Result<Vec<Page>> {
            Ok(vec![page(true)])
        }

        fn retrieve_page(&self, _id: &str) -> client::Result<Page> {
            Ok(page(self.published))
        }

        fn retrieve_block(&self, id: &str) -> client::Result<Block> {
            Ok(Block {
                id: id.to_owned(),
                has_children: true,
                payload: Payload::Other(String::from("child_page")),
            })
        }

        fn children_page(
            &self,
            block_id: &str,
            _cursor: Option<&str>,
        ) -> client::Result<ChildrenPage> {
            let blocks = match block_id {
                "p1" => vec![Block {
                    id: String::from("b1"),
                    has_children: false,
                    payload: Payload::Paragraph(Text {
                        rich_text: vec![RichText::plain("hello")],
                    }),
                }],
                _ => Vec::new(),
            };
            Ok(ChildrenPage {
                blocks,
                next_cursor: None,
            })
        }
    }

    #[test]
    fn test_assemble_page() -> Result<()> {
        let (page, blocks) = assemble_page(&OnePostApi { published: true }, "p1")?;
        assert_eq!(page.plain_title(), "First post");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].block.id, "b1");
        Ok(())
    }

    #[test]
    fn test_assemble_unpublished_page_is_not_found() {
        let result = assemble_page(&OnePostApi { published: false }, "p1");
        assert!(matches!(result, Err(Error::Unpublished(id)) if id == "p1"));
    }
}
