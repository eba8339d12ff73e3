//! Responsible for templating and writing HTML pages to disk from fetched
//! [`Page`]s and their rendered block content: one page per post, plus
//! index pages for the whole site and for each tag and category.

use crate::config::Config;
use crate::html;
use crate::label::Label;
use crate::page::Page;
use crate::value::url_value;
use gtmpl::{Context, Template, Value};
use pulldown_cmark::escape::escape_html;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use url::Url;

/// The built-in post template. The fields it can reference are the ones
/// [`Writer::post_value`] provides.
pub const DEFAULT_POST_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{{.plain_title}}</title>
</head>
<body>
<article class="container">
<p class="date">Posted on {{.date}}</p>
<h1 class="name">{{.title}}</h1>
<section>
{{.body}}
<div class="meta">
{{with .category}}<div>Category: <a href="{{.url}}">{{.name}}</a></div>
{{end}}<div>Tags:{{range .tags}} <a href="{{.url}}">{{.name}}</a>{{end}}</div>
</div>
<div><a class="back" href="{{.home_page}}">← Go home</a></div>
</section>
</article>
</body>
</html>
"#;

/// The built-in index template, shared by the main, tag, and category
/// index pages.
pub const DEFAULT_INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{{.title}}</title>
</head>
<body>
<h1>{{.title}}</h1>
<ul class="posts">
{{range .posts}}<li><span class="date">{{.date}}</span> <a href="{{.url}}">{{.title}}</a></li>
{{end}}</ul>
<div><a class="back" href="{{.home_page}}">← Go home</a></div>
</body>
</html>
"#;

/// Parses template source into a [`Template`].
pub fn parse_template(source: &str) -> Result<Template> {
    let mut template = Template::default();
    template.parse(source).map_err(Error::Template)?;
    Ok(template)
}

/// A rendered post's metadata, kept around for index pages and the feed.
#[derive(Clone, Debug)]
pub struct PostSummary {
    pub id: String,
    pub title: String,
    pub url: Url,
    pub date: String,
    pub created_time: String,
    pub category: Option<Label>,
    pub tags: Vec<Label>,
}

/// Responsible for templating and writing post and index pages to disk.
pub struct Writer<'a> {
    /// The template for post pages.
    pub post_template: &'a Template,

    /// The template for index pages.
    pub index_template: &'a Template,

    /// Site settings: URLs the templates link to and the directories the
    /// output files land in.
    pub config: &'a Config,
}

impl Writer<'_> {
    /// Derives the summary record for a page: its output URL plus the
    /// label links for its category and tags.
    pub fn summarize(&self, page: &Page) -> Result<PostSummary> {
        let category = match page.category() {
            Some(name) => Some(Label::new(name, &self.config.categories_url)?),
            None => None,
        };
        let tags = page
            .tags()
            .into_iter()
            .map(|name| Label::new(name, &self.config.tags_url))
            .collect::<std::result::Result<Vec<Label>, url::ParseError>>()?;
        Ok(PostSummary {
            url: self.config.posts_url.join(&format!("{}.html", page.id))?,
            id: page.id.clone(),
            title: page.plain_title(),
            date: page.formatted_date()?,
            created_time: page.created_time.clone(),
            category,
            tags,
        })
    }

    /// Templates one post into the given writer. `body` is the block
    /// content already rendered by [`crate::html::render_blocks`].
    pub fn render_post<W: io::Write>(
        &self,
        page: &Page,
        summary: &PostSummary,
        body: &str,
        w: &mut W,
    ) -> Result<()> {
        let value = self.post_value(page, summary, body)?;
        let context = Context::from(value).map_err(|err| Error::Template(err.to_string()))?;
        self.post_template.execute(w, &context)?;
        Ok(())
    }

    /// Takes one post, templates it, and writes it to
    /// `{posts_directory}/{id}.html`.
    pub fn write_post(&self, page: &Page, body: &str) -> Result<PostSummary> {
        let summary = self.summarize(page)?;
        fs::create_dir_all(&self.config.posts_directory)?;
        let path = self
            .config
            .posts_directory
            .join(format!("{}.html", summary.id));
        self.render_post(page, &summary, body, &mut fs::File::create(path)?)?;
        Ok(summary)
    }

    /// Writes the main index page plus one index page per tag and per
    /// category.
    pub fn write_indices(&self, posts: &[PostSummary]) -> Result<()> {
        let everything: Vec<&PostSummary> = posts.iter().collect();
        self.write_index(
            &self.config.output_directory.join("index.html"),
            &self.config.title,
            &everything,
        )?;

        for (label, members) in index_posts(posts, |p| p.tags.iter()) {
            self.write_index(
                &self.config.tags_directory.join(&label.slug).join("index.html"),
                &format!("Tags: {}", label.name),
                &members,
            )?;
        }
        for (label, members) in index_posts(posts, |p| p.category.iter()) {
            self.write_index(
                &self
                    .config
                    .categories_directory
                    .join(&label.slug)
                    .join("index.html"),
                &format!("Category: {}", label.name),
                &members,
            )?;
        }
        Ok(())
    }

    fn write_index(&self, path: &Path, title: &str, posts: &[&PostSummary]) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let value = self.index_value(title, posts)?;
        let context = Context::from(value).map_err(|err| Error::Template(err.to_string()))?;
        self.index_template
            .execute(&mut fs::File::create(path)?, &context)?;
        Ok(())
    }

    /// Converts a post into the [`Value`] its template executes against.
    fn post_value(&self, page: &Page, summary: &PostSummary, body: &str) -> Result<Value> {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("title".to_owned(), html::render_rich_text(page.title())?.into());
        m.insert("plain_title".to_owned(), escaped(&summary.title)?.into());
        m.insert("date".to_owned(), Value::String(summary.date.clone()));
        m.insert("body".to_owned(), Value::String(body.to_owned()));
        m.insert(
            "category".to_owned(),
            match &summary.category {
                Some(label) => label.into(),
                None => Value::Nil,
            },
        );
        m.insert(
            "tags".to_owned(),
            Value::Array(summary.tags.iter().map(Value::from).collect()),
        );
        m.insert("home_page".to_owned(), url_value(&self.config.home_page));
        m.insert("site_title".to_owned(), escaped(&self.config.title)?.into());
        Ok(Value::Object(m))
    }

    fn index_value(&self, title: &str, posts: &[&PostSummary]) -> Result<Value> {
        let mut entries = Vec::with_capacity(posts.len());
        for post in posts {
            let mut m: HashMap<String, Value> = HashMap::new();
            m.insert("title".to_owned(), escaped(&post.title)?.into());
            m.insert("url".to_owned(), url_value(&post.url));
            m.insert("date".to_owned(), Value::String(post.date.clone()));
            entries.push(Value::Object(m));
        }
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("title".to_owned(), escaped(title)?.into());
        m.insert("posts".to_owned(), Value::Array(entries));
        m.insert("home_page".to_owned(), url_value(&self.config.home_page));
        Ok(Value::Object(m))
    }
}

/// Groups posts by label. `labels` picks which labels of a post to group
/// under (its tags, or its category).
fn index_posts<'a, F, I>(
    posts: &'a [PostSummary],
    labels: F,
) -> HashMap<Label, Vec<&'a PostSummary>>
where
    F: Fn(&'a PostSummary) -> I,
    I: Iterator<Item = &'a Label>,
{
    let mut indices: HashMap<Label, Vec<&'a PostSummary>> = HashMap::new();
    for post in posts {
        for label in labels(post) {
            indices.entry(label.clone()).or_default().push(post);
        }
    }
    indices
}

fn escaped(s: &str) -> io::Result<String> {
    let mut out = String::new();
    escape_html(&mut out, s)?;
    Ok(out)
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// An error during templating.
    Template(String),

    /// An error writing the output files.
    Io(io::Error),

    /// An error building a post or label URL.
    Url(url::ParseError),

    /// An error parsing a page's creation timestamp.
    Date(chrono::ParseError),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
            Error::Url(err) => err.fmt(f),
            Error::Date(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(_) => None,
            Error::Io(err) => Some(err),
            Error::Url(err) => Some(err),
            Error::Date(err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use
    /// the `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`].
    /// This allows us to use the `?` operator for fallible template
    /// operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl From<url::ParseError> for Error {
    /// Converts [`url::ParseError`]s into [`Error`]. This allows us to use
    /// the `?` operator when building output URLs.
    fn from(err: url::ParseError) -> Error {
        Error::Url(err)
    }
}

impl From<chrono::ParseError> for Error {
    /// Converts [`chrono::ParseError`]s into [`Error`]. This allows us to
    /// use the `?` operator when formatting post dates.
    fn from(err: chrono::ParseError) -> Error {
        Error::Date(err)
    }
}
