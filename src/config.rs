//! Site configuration. Site-level settings (root URL, title, author) come
//! from a `quern.yaml` project file discovered by walking parent
//! directories; the Notion integration token and target database id are
//! secrets and come from the process environment instead. Both are read
//! exactly once, at startup, into a [`Config`] that gets injected into the
//! client; nothing else in the crate touches ambient process state.

use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use url::Url;

const PROJECT_FILE: &str = "quern.yaml";

pub const TOKEN_VAR: &str = "NOTION_TOKEN";
pub const DATABASE_VAR: &str = "NOTION_DATABASE_ID";

/// The shape of the `quern.yaml` project file.
#[derive(Deserialize)]
struct Project {
    /// The site's root URL. Should end with a slash; post, tag, and
    /// category URLs are joined under it.
    site_root: Url,

    #[serde(default)]
    title: Option<String>,

    #[serde(default)]
    author: Option<Author>,
}

#[derive(Clone, Deserialize)]
pub struct Author {
    pub name: String,

    #[serde(default)]
    pub email: Option<String>,
}

/// The credentials for the content API, read from the environment.
pub struct Secrets {
    pub token: String,
    pub database_id: String,
}

impl Secrets {
    pub fn from_env() -> Result<Secrets> {
        fn var(name: &'static str) -> Result<String> {
            std::env::var(name).map_err(|_| Error::MissingEnv(name))
        }
        Ok(Secrets {
            token: var(TOKEN_VAR)?,
            database_id: var(DATABASE_VAR)?,
        })
    }
}

/// Everything the generator needs, resolved once at startup.
pub struct Config {
    pub token: String,
    pub database_id: String,
    pub title: String,
    pub author: Option<Author>,
    pub home_page: Url,
    pub posts_url: Url,
    pub tags_url: Url,
    pub categories_url: Url,
    pub output_directory: PathBuf,
    pub posts_directory: PathBuf,
    pub tags_directory: PathBuf,
    pub categories_directory: PathBuf,
}

impl Config {
    /// Looks for `quern.yaml` in `dir` or any of its parent directories.
    pub fn from_directory(
        dir: &Path,
        output_directory: &Path,
        secrets: Secrets,
    ) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.exists() {
            Config::from_project_file(&path, output_directory, secrets)
        } else {
            match dir.parent() {
                Some(parent) => Config::from_directory(parent, output_directory, secrets),
                None => Err(Error::ProjectFileNotFound),
            }
        }
    }

    pub fn from_project_file(
        path: &Path,
        output_directory: &Path,
        secrets: Secrets,
    ) -> Result<Config> {
        let file = File::open(path).map_err(|err| Error::OpenProjectFile {
            path: path.to_owned(),
            err,
        })?;
        let project: Project = serde_yaml::from_reader(file)?;
        Config::from_project(project, output_directory, secrets)
    }

    fn from_project(
        project: Project,
        output_directory: &Path,
        secrets: Secrets,
    ) -> Result<Config> {
        Ok(Config {
            token: secrets.token,
            database_id: secrets.database_id,
            title: project.title.unwrap_or_else(|| String::from("Blog")),
            author: project.author,
            posts_url: project.site_root.join("posts/")?,
            tags_url: project.site_root.join("tags/")?,
            categories_url: project.site_root.join("categories/")?,
            home_page: project.site_root,
            posts_directory: output_directory.join("posts"),
            tags_directory: output_directory.join("tags"),
            categories_directory: output_directory.join("categories"),
            output_directory: output_directory.to_owned(),
        })
    }
}

/// The result of a fallible configuration-loading operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading the configuration.
#[derive(Debug)]
pub enum Error {
    /// Returned when no `quern.yaml` exists in any parent directory.
    ProjectFileNotFound,

    /// Returned for I/O problems opening the project file.
    OpenProjectFile { path: PathBuf, err: std::io::Error },

    /// Returned for errors parsing the project file.
    Parse(serde_yaml::Error),

    /// Returned when a derived URL doesn't parse.
    Url(url::ParseError),

    /// Returned when a required environment variable is missing.
    MissingEnv(&'static str),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ProjectFileNotFound => write!(
                f,
                "Could not find `{}` in any parent directory",
                PROJECT_FILE
            ),
            Error::OpenProjectFile { path, err } => {
                write!(f, "Opening project file '{}': {}", path.display(), err)
            }
            Error::Parse(err) => err.fmt(f),
            Error::Url(err) => err.fmt(f),
            Error::MissingEnv(name) => {
                write!(f, "Missing required environment variable `{}`", name)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ProjectFileNotFound => None,
            Error::OpenProjectFile { path: _, err } => Some(err),
            Error::Parse(err) => Some(err),
            Error::Url(err) => Some(err),
            Error::MissingEnv(_) => None,
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts [`serde_yaml::Error`]s into [`Error`]. This allows us to
    /// use the `?` operator when parsing the project file.
    fn from(err: serde_yaml::Error) -> Error {
        Error::Parse(err)
    }
}

impl From<url::ParseError> for Error {
    /// Converts [`url::ParseError`]s into [`Error`]. This allows us to use
    /// the `?` operator when deriving site URLs.
    fn from(err: url::ParseError) -> Error {
        Error::Url(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn secrets() -> Secrets {
        Secrets {
            token: String::from("secret"),
            database_id: String::from("db"),
        }
    }

    #[test]
    fn test_derives_site_urls() -> Result<()> {
        let project: Project = serde_yaml::from_str(
            "site_root: https://example.org/\ntitle: Example\nauthor:\n  name: A. Writer\n",
        )?;
        let config = Config::from_project(project, Path::new("/tmp/out"), secrets())?;
        assert_eq!(config.title, "Example");
        assert_eq!(config.home_page.as_str(), "https://example.org/");
        assert_eq!(config.posts_url.as_str(), "https://example.org/posts/");
        assert_eq!(config.tags_url.as_str(), "https://example.org/tags/");
        assert_eq!(
            config.categories_url.as_str(),
            "https://example.org/categories/"
        );
        assert_eq!(config.posts_directory, Path::new("/tmp/out/posts"));
        assert_eq!(config.token, "secret");
        assert_eq!(config.database_id, "db");
        Ok(())
    }

    #[test]
    fn test_title_defaults() -> Result<()> {
        let project: Project = serde_yaml::from_str("site_root: https://example.org/\n")?;
        let config = Config::from_project(project, Path::new("/tmp/out"), secrets())?;
        assert_eq!(config.title, "Blog");
        assert!(config.author.is_none());
        Ok(())
    }

    #[test]
    fn test_project_requires_site_root() {
        let result: std::result::Result<Project, _> = serde_yaml::from_str("title: nope\n");
        assert!(result.is_err());
    }
}
