//! Walks the posts directory and turns every markdown document into an
//! [`Article`]. A document that can't be read or built is recorded as a
//! [`Failure`] and the walk carries on.

use crate::article::{self, Article};
use crate::metadata::{self, Document, Frontmatter};
use log::{debug, warn};
use serde_yaml::Mapping;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extension of the documents that are collected.
pub const MARKDOWN_EXTENSION: &str = "md";

/// Documents with exactly this file name, at any depth, are section landing
/// pages rather than articles and are never collected.
pub const INDEX_FILE_NAME: &str = "index.md";

/// A document that couldn't be turned into an [`Article`].
#[derive(Debug)]
pub struct Failure {
    pub path: PathBuf,
    pub error: Error,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.error)
    }
}

/// The outcome of processing a single document.
pub type Outcome = std::result::Result<Article, Failure>;

/// Everything one pass over the posts directory produced.
#[derive(Debug, Default)]
pub struct Collection {
    pub articles: Vec<Article>,
    pub failures: Vec<Failure>,
}

impl Collection {
    /// Splits a sequence of per-document outcomes into articles and failures.
    pub fn from_outcomes(outcomes: impl IntoIterator<Item = Outcome>) -> Self {
        let mut collection = Collection::default();
        for outcome in outcomes {
            match outcome {
                Ok(article) => collection.articles.push(article),
                Err(failure) => collection.failures.push(failure),
            }
        }
        collection
    }
}

/// Collects [`Article`]s from a posts directory.
pub struct Collector<'a> {
    /// The root against which article URLs are computed.
    posts_directory: &'a Path,
}

impl<'a> Collector<'a> {
    pub fn new(posts_directory: &'a Path) -> Collector<'a> {
        Collector { posts_directory }
    }

    /// Walks the posts directory recursively and processes every `.md` file
    /// other than [`INDEX_FILE_NAME`]. Failures are logged and returned
    /// alongside the articles; they never stop the walk.
    pub fn collect(&self) -> Collection {
        Collection::from_outcomes(self.outcomes())
    }

    /// Returns one [`Outcome`] per candidate document, in file-name order.
    pub fn outcomes(&self) -> Vec<Outcome> {
        let mut outcomes = Vec::new();
        for result in WalkDir::new(self.posts_directory).sort_by_file_name() {
            let outcome = match result {
                Err(err) => Err(Failure {
                    path: err
                        .path()
                        .unwrap_or(self.posts_directory)
                        .to_owned(),
                    error: Error::WalkDir(err),
                }),
                Ok(entry) => {
                    if !Self::is_candidate(&entry) {
                        continue;
                    }
                    self.parse_article(entry.path()).map_err(|error| Failure {
                        path: entry.path().to_owned(),
                        error,
                    })
                }
            };
            if let Err(failure) = &outcome {
                warn!("skipping article {}", failure);
            }
            outcomes.push(outcome);
        }
        outcomes
    }

    /// Symlinks are followed when they point at a file. Symlinked
    /// directories aren't descended into.
    fn is_candidate(entry: &walkdir::DirEntry) -> bool {
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        is_file
            && entry.file_name() != INDEX_FILE_NAME
            && entry
                .path()
                .extension()
                .map_or(false, |ext| ext == MARKDOWN_EXTENSION)
    }

    fn parse_article(&self, path: &Path) -> Result<Article> {
        debug!("parsing {}", path.display());
        let contents = fs::read_to_string(path)?;
        let Document { frontmatter, body } = metadata::split(&contents);
        let mapping = match frontmatter {
            Frontmatter::Decoded(mapping) => mapping,
            Frontmatter::Absent => Mapping::new(),
            Frontmatter::Malformed(err) => {
                warn!(
                    "ignoring malformed frontmatter in {}: {}",
                    path.display(),
                    err
                );
                Mapping::new()
            }
            Frontmatter::Rejected(err) => return Err(Error::Frontmatter(err)),
        };

        // `path` was yielded by walking `posts_directory`, so it always has
        // that prefix.
        let relative_path = path.strip_prefix(self.posts_directory).unwrap_or(path);
        Ok(Article::new(relative_path, &mapping, body)?)
    }
}

/// Represents the result of processing a single document.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error processing a single document.
#[derive(Debug)]
pub enum Error {
    /// Returned when the document can't be read (including when it isn't
    /// valid UTF-8).
    Io(std::io::Error),

    /// Returned when the directory walk fails at this entry.
    WalkDir(walkdir::Error),

    /// Returned when the frontmatter is valid YAML but not a mapping.
    Frontmatter(metadata::Error),

    /// Returned when the document's metadata or path is unusable.
    Article(article::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::WalkDir(err) => err.fmt(f),
            Error::Frontmatter(err) => err.fmt(f),
            Error::Article(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::Frontmatter(err) => Some(err),
            Error::Article(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

impl From<article::Error> for Error {
    fn from(err: article::Error) -> Error {
        Error::Article(err)
    }
}
