//! The Notion API client. [`Api`] is the seam the rest of the crate works
//! against: [`crate::tree::build_tree`] and [`crate::build`] take any
//! implementation, which keeps them testable without a network. The real
//! implementation is [`HttpClient`], a thin blocking HTTP wrapper.
//!
//! All requests are read-only and strictly sequential. Nothing here retries:
//! a transport failure, an auth failure, or a rate limit surfaces to the
//! caller as a fatal error, and partial results are discarded.

use crate::block::Block;
use crate::config::Config;
use crate::page::Page;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use tracing::debug;

const BASE_URL: &str = "https://api.notion.com/v1";
const VERSION_HEADER: &str = "Notion-Version";
const VERSION: &str = "2022-06-28";

/// Read access to the remote content store.
pub trait Api {
    /// Lists the pages of the configured database whose `Published`
    /// checkbox is ticked. The filter is applied server-side.
    fn query_published(&self) -> Result<Vec<Page>>;

    /// Retrieves a single page by id. Fails with [`Error::NotAPage`] if the
    /// entity is not page-shaped (e.g. the id names a database).
    fn retrieve_page(&self, id: &str) -> Result<Page>;

    /// Retrieves a single block by id. Fails with [`Error::NotABlock`] if
    /// the entity is not block-shaped.
    fn retrieve_block(&self, id: &str) -> Result<Block>;

    /// Fetches one page of a block's direct children, resuming from
    /// `cursor` if given. Callers normally want [`list_children`] instead.
    fn children_page(&self, block_id: &str, cursor: Option<&str>) -> Result<ChildrenPage>;
}

/// One page of a child-block listing plus the continuation cursor, if the
/// remote has more.
pub struct ChildrenPage {
    pub blocks: Vec<Block>,
    pub next_cursor: Option<String>,
}

/// Fetches the full ordered sequence of a block's direct children,
/// following continuation cursors until the remote signals the end.
/// Server order is preserved exactly; nothing is reordered or deduplicated.
/// Any page's failure fails the whole listing.
pub fn list_children<A: Api + ?Sized>(api: &A, block_id: &str) -> Result<Vec<Block>> {
    let mut blocks = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let page = api.children_page(block_id, cursor.as_deref())?;
        blocks.extend(page.blocks);
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => return Ok(blocks),
        }
    }
}

/// The HTTP implementation of [`Api`]. Constructed once at startup from the
/// [`Config`]; the token never comes from ambient process state after that.
pub struct HttpClient {
    http: reqwest::blocking::Client,
    token: String,
    database_id: String,
}

impl HttpClient {
    pub fn new(config: &Config) -> Result<HttpClient> {
        Ok(HttpClient {
            http: reqwest::blocking::Client::builder().build()?,
            token: config.token.clone(),
            database_id: config.database_id.clone(),
        })
    }

    fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<Value> {
        debug!("GET {}", url);
        let response = self
            .http
            .get(url)
            .query(query)
            .bearer_auth(&self.token)
            .header(VERSION_HEADER, VERSION)
            .send()?;
        Self::read_response(response)
    }

    fn post(&self, url: &str, body: &Value) -> Result<Value> {
        debug!("POST {}", url);
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .header(VERSION_HEADER, VERSION)
            .json(body)
            .send()?;
        Self::read_response(response)
    }

    fn read_response(response: reqwest::blocking::Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status,
                body: response.text().unwrap_or_default(),
            });
        }
        Ok(response.json()?)
    }
}

/// The listing shape shared by the query and children endpoints.
#[derive(Deserialize)]
struct Listing {
    results: Vec<Value>,
    #[serde(default)]
    next_cursor: Option<String>,
}

impl Api for HttpClient {
    fn query_published(&self) -> Result<Vec<Page>> {
        let listing: Listing = serde_json::from_value(self.post(
            &format!("{}/databases/{}/query", BASE_URL, self.database_id),
            &serde_json::json!({
                "filter": {
                    "and": [{
                        "property": "Published",
                        "checkbox": { "equals": true }
                    }]
                }
            }),
        )?)?;

        let mut pages = Vec::with_capacity(listing.results.len());
        for result in listing.results {
            // The query endpoint can interleave partial objects; only
            // property-bearing results are pages.
            if result.get("properties").is_some() {
                pages.push(serde_json::from_value(result)?);
            }
        }
        Ok(pages)
    }

    fn retrieve_page(&self, id: &str) -> Result<Page> {
        let value = self.get(&format!("{}/pages/{}", BASE_URL, id), &[])?;
        serde_json::from_value(value).map_err(|source| Error::NotAPage {
            id: id.to_owned(),
            source,
        })
    }

    fn retrieve_block(&self, id: &str) -> Result<Block> {
        let value = self.get(&format!("{}/blocks/{}", BASE_URL, id), &[])?;
        Block::from_value(value).map_err(|source| Error::NotABlock {
            id: id.to_owned(),
            source,
        })
    }

    fn children_page(&self, block_id: &str, cursor: Option<&str>) -> Result<ChildrenPage> {
        let url = format!("{}/blocks/{}/children", BASE_URL, block_id);
        let value = match cursor {
            Some(cursor) => self.get(&url, &[("start_cursor", cursor)])?,
            None => self.get(&url, &[])?,
        };
        let listing: Listing = serde_json::from_value(value)?;

        let mut blocks = Vec::with_capacity(listing.results.len());
        for result in listing.results {
            // Skip results that aren't block-shaped at all; a block-shaped
            // result that fails to decode is still an error.
            if result.get("has_children").is_some() {
                blocks.push(Block::from_value(result)?);
            }
        }
        Ok(ChildrenPage {
            blocks,
            next_cursor: listing.next_cursor,
        })
    }
}

/// The result of a fallible client operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a failure talking to the content API.
#[derive(Debug)]
pub enum Error {
    /// Returned for transport-level failures (connect, TLS, timeouts).
    Http(reqwest::Error),

    /// Returned when the remote answers with a non-success status, e.g.
    /// auth failures and rate limits. Carries the response body verbatim.
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Returned when a response body doesn't decode as the expected shape.
    Decode(serde_json::Error),

    /// Returned when the entity behind a page id isn't page-shaped.
    NotAPage { id: String, source: serde_json::Error },

    /// Returned when the entity behind a block id isn't block-shaped.
    NotABlock { id: String, source: serde_json::Error },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Http(err) => err.fmt(f),
            Error::Status { status, body } => {
                write!(f, "Content API returned {}: {}", status, body)
            }
            Error::Decode(err) => write!(f, "Decoding content API response: {}", err),
            Error::NotAPage { id, source } => {
                write!(f, "Entity '{}' is not a page: {}", id, source)
            }
            Error::NotABlock { id, source } => {
                write!(f, "Entity '{}' is not a block: {}", id, source)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(err) => Some(err),
            Error::Status { .. } => None,
            Error::Decode(err) => Some(err),
            Error::NotAPage { source, .. } => Some(source),
            Error::NotABlock { source, .. } => Some(source),
        }
    }
}

impl From<reqwest::Error> for Error {
    /// Converts transport errors into [`Error`]. This allows us to use the
    /// `?` operator for fallible HTTP calls.
    fn from(err: reqwest::Error) -> Error {
        Error::Http(err)
    }
}

impl From<serde_json::Error> for Error {
    /// Converts decode errors into [`Error`]. This allows us to use the `?`
    /// operator when decoding response bodies.
    fn from(err: serde_json::Error) -> Error {
        Error::Decode(err)
    }
}
