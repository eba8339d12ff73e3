//! Support for creating an Atom feed from the published posts.

use crate::config::Author;
use crate::write::PostSummary;
use atom_syndication::{Entry, Error as AtomError, Feed, Link, Person};
use chrono::{DateTime, FixedOffset, ParseError, ParseResult, TimeZone, Utc};
use std::fmt;
use std::io::Write;
use url::Url;

/// Bundled configuration for creating a feed.
pub struct FeedConfig {
    pub title: String,
    pub id: String,
    pub author: Option<Author>,
    pub home_page: Url,
}

/// Creates a feed from some configuration ([`FeedConfig`]) and a list of
/// [`PostSummary`]s and writes the result to a [`std::io::Write`]. This
/// function takes ownership of the provided [`FeedConfig`].
pub fn write_feed<W: Write>(config: FeedConfig, posts: &[PostSummary], w: W) -> Result<()> {
    feed(config, posts)?.write_to(w)?;
    Ok(())
}

fn feed(config: FeedConfig, posts: &[PostSummary]) -> ParseResult<Feed> {
    Ok(Feed {
        entries: feed_entries(&config, posts)?,
        links: vec![alternate_link(config.home_page.as_str())],
        title: config.title.into(),
        id: config.id,
        updated: FixedOffset::east_opt(0)
            .unwrap() // static offset
            .from_utc_datetime(&Utc::now().naive_utc()),
        authors: author_to_people(config.author),
        ..Feed::default()
    })
}

fn feed_entries(config: &FeedConfig, posts: &[PostSummary]) -> ParseResult<Vec<Entry>> {
    posts
        .iter()
        .map(|post| {
            // `created_time` is a full RFC 3339 timestamp, so no
            // reconstruction ceremony is needed.
            let date: DateTime<FixedOffset> = DateTime::parse_from_rfc3339(&post.created_time)?;
            Ok(Entry {
                id: post.url.to_string(),
                title: post.title.clone().into(),
                updated: date,
                published: Some(date),
                authors: author_to_people(config.author.clone()),
                links: vec![alternate_link(post.url.as_str())],
                ..Entry::default()
            })
        })
        .collect()
}

fn alternate_link(href: &str) -> Link {
    Link {
        href: href.to_owned(),
        rel: String::from("alternate"),
        title: None,
        mime_type: None,
        hreflang: None,
        length: None,
    }
}

fn author_to_people(author: Option<Author>) -> Vec<Person> {
    match author {
        Some(author) => vec![Person {
            name: author.name,
            email: author.email,
            uri: None,
        }],
        None => Vec::new(),
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating a feed. Variants include I/O, Atom, and
/// date-time parsing issues.
#[derive(Debug)]
pub enum Error {
    /// Returned when there is a generic I/O error.
    Io(std::io::Error),

    /// Returned when there is an Atom-related error.
    Atom(AtomError),

    /// Returned when there is an issue parsing a post's creation
    /// timestamp.
    DateTimeParse(ParseError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Atom(err) => err.fmt(f),
            Error::DateTimeParse(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Atom(err) => Some(err),
            Error::DateTimeParse(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator in fallible feed operations.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<AtomError> for Error {
    /// Converts [`AtomError`]s into [`Error`]. This allows us to use the
    /// `?` operator in fallible feed operations.
    fn from(err: AtomError) -> Error {
        Error::Atom(err)
    }
}

impl From<ParseError> for Error {
    /// Converts [`ParseError`]s into [`Error`]. This allows us to use the
    /// `?` operator in fallible feed operations.
    fn from(err: ParseError) -> Error {
        Error::DateTimeParse(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn summary(id: &str, created_time: &str) -> PostSummary {
        PostSummary {
            id: id.to_owned(),
            title: format!("Post {}", id),
            url: Url::parse("https://example.org/posts/")
                .unwrap()
                .join(&format!("{}.html", id))
                .unwrap(),
            date: String::from("2021/03/16 14:34"),
            created_time: created_time.to_owned(),
            category: None,
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_feed_entries() -> ParseResult<()> {
        let config = FeedConfig {
            title: String::from("Example Blog"),
            id: String::from("https://example.org/"),
            author: Some(Author {
                name: String::from("A. Writer"),
                email: None,
            }),
            home_page: Url::parse("https://example.org/").unwrap(),
        };
        let entries = feed_entries(
            &config,
            &[summary("1", "2021-03-16T05:34:00.000Z")],
        )?;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title.value, "Post 1");
        assert_eq!(entries[0].id, "https://example.org/posts/1.html");
        assert_eq!(entries[0].authors[0].name, "A. Writer");
        Ok(())
    }

    #[test]
    fn test_write_feed() -> Result<()> {
        let config = FeedConfig {
            title: String::from("Example Blog"),
            id: String::from("https://example.org/"),
            author: None,
            home_page: Url::parse("https://example.org/").unwrap(),
        };
        let mut out: Vec<u8> = Vec::new();
        write_feed(config, &[summary("1", "2021-03-16T05:34:00.000Z")], &mut out)?;
        let xml = String::from_utf8(out).unwrap();
        assert!(xml.contains("Example Blog"));
        assert!(xml.contains("https://example.org/posts/1.html"));
        Ok(())
    }

    #[test]
    fn test_write_feed_rejects_bad_timestamp() {
        let config = FeedConfig {
            title: String::from("Example Blog"),
            id: String::from("https://example.org/"),
            author: None,
            home_page: Url::parse("https://example.org/").unwrap(),
        };
        let mut out: Vec<u8> = Vec::new();
        let result = write_feed(config, &[summary("1", "not a date")], &mut out);
        assert!(matches!(result, Err(Error::DateTimeParse(_))));
    }
}
