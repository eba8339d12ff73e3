//! The library code for the `quern` static blog generator. The architecture
//! can be generally broken down into two distinct steps:
//!
//! 1. Fetching posts from a Notion database over its HTTP API
//!    ([`crate::client`] and [`crate::tree`])
//! 2. Converting the posts into output files on disk ([`crate::html`] and
//!    [`crate::write`])
//!
//! Of the two, the first step is the more involved. Notion hands back a
//! page's content as a *flat*, paginated listing of child blocks per level of
//! nesting, so reconstructing a renderable document means recursively
//! fetching every level ([`crate::client::list_children`]) and then merging
//! adjacent list items of the same kind into a single run so they can share
//! one `<ul>`/`<ol>` container ([`crate::tree::merge_runs`]). The result is a
//! tree of [`crate::tree::BlockNode`]s owned entirely by the caller.
//!
//! The second step is pretty straight-forward: render each block tree to
//! HTML, apply the post template, group posts by tag and category into index
//! pages, and write everything to disk along with an Atom feed.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod block;
pub mod build;
pub mod client;
pub mod config;
pub mod feed;
pub mod html;
pub mod label;
pub mod page;
pub mod text;
pub mod tree;
pub mod value;
pub mod write;
