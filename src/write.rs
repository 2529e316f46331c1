//! Persists the collected articles and the tag and category indices as
//! pretty-printed JSON, plus one listing page per group.
//!
//! Layout, relative to the docs directory:
//!
//! ```text
//! posts/articles.json
//! tags/tags.json
//! tags/{slug}/articles.json
//! tags/{slug}/index.md
//! categories/categories.json
//! categories/{name}/articles.json
//! categories/{name}/index.md
//! ```
//!
//! Every file is overwritten on each run; nothing is merged with what a
//! previous run left behind.

use crate::article::Article;
use crate::index::{Taxonomy, ARTICLES_FILE_NAME};
use crate::listing;
use log::info;
use serde::Serialize;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Name of the generated listing page in each group directory.
pub const LISTING_FILE_NAME: &str = "index.md";

/// Directory (relative to the docs directory) holding `articles.json`.
pub const POSTS_DIRECTORY_NAME: &str = "posts";

/// Responsible for writing index artifacts beneath a docs directory.
pub struct Writer<'a> {
    /// The site's content root; `posts/`, `tags/` and `categories/` live
    /// directly beneath it.
    pub docs_directory: &'a Path,
}

impl Writer<'_> {
    /// Writes the full article records to `posts/articles.json`.
    pub fn write_articles(&self, articles: &[Article]) -> Result<PathBuf> {
        let path = self
            .docs_directory
            .join(POSTS_DIRECTORY_NAME)
            .join(ARTICLES_FILE_NAME);
        write_json(&path, articles)?;
        info!(
            "generated {} with {} articles",
            path.display(),
            articles.len()
        );
        Ok(path)
    }

    /// Writes a taxonomy's top-level index and, for each group, its
    /// `articles.json` and listing page. Group directories are created as
    /// needed; existing ones are reused.
    pub fn write_taxonomy(&self, taxonomy: &Taxonomy) -> Result<()> {
        let kind = taxonomy.kind;
        let root = self.docs_directory.join(kind.directory_name());
        create_dir_all(&root)?;

        let index_path = root.join(kind.index_file_name());
        write_json(&index_path, &taxonomy.index)?;
        info!(
            "generated {} with {} entries",
            index_path.display(),
            taxonomy.index.len()
        );

        for group in &taxonomy.groups {
            let dir = root.join(&group.path_segment);
            create_dir_all(&dir)?;
            write_json(&dir.join(ARTICLES_FILE_NAME), &group.articles)?;

            let page = listing::render(kind, &group.name, &group.fetch_path(kind))?;
            let page_path = dir.join(LISTING_FILE_NAME);
            fs::write(&page_path, page).map_err(|err| Error::Io {
                path: page_path.clone(),
                err,
            })?;
        }
        info!(
            "generated {} {} listings",
            taxonomy.groups.len(),
            kind.directory_name()
        );
        Ok(())
    }
}

fn create_dir_all(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|err| Error::Io {
        path: dir.to_owned(),
        err,
    })
}

/// Serializes `value` as JSON indented by two spaces. Non-ASCII text is
/// written as-is, not escaped.
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let io_error = |err: io::Error| Error::Io {
        path: path.to_owned(),
        err,
    };
    let mut w = BufWriter::new(File::create(path).map_err(io_error)?);
    serde_json::to_writer_pretty(&mut w, value).map_err(|err| Error::Json {
        path: path.to_owned(),
        err,
    })?;
    w.flush().map_err(io_error)
}

/// The result of a fallible write operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a write operation.
#[derive(Debug)]
pub enum Error {
    /// An error creating a directory or writing a file.
    Io { path: PathBuf, err: io::Error },

    /// An error serializing JSON.
    Json {
        path: PathBuf,
        err: serde_json::Error,
    },

    /// An error rendering a listing page.
    Listing(listing::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io { path, err } => {
                write!(f, "writing '{}': {}", path.display(), err)
            }
            Error::Json { path, err } => {
                write!(f, "serializing '{}': {}", path.display(), err)
            }
            Error::Listing(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { err, .. } => Some(err),
            Error::Json { err, .. } => Some(err),
            Error::Listing(err) => Some(err),
        }
    }
}

impl From<listing::Error> for Error {
    /// Converts a [`listing::Error`] into an [`Error`]. This allows us to use
    /// the `?` operator when rendering listing pages.
    fn from(err: listing::Error) -> Error {
        Error::Listing(err)
    }
}
