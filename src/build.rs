//! Exports the pipeline that stitches the indexing steps together and the two
//! entry points the host generator calls, [`on_pre_build`] and [`on_serve`].
//!
//! A run collects every article once ([`crate::collect`]), groups the
//! articles by tag and by category ([`crate::index`]), and then writes three
//! independent sets of outputs ([`crate::write`]): the flat article list, the
//! tag index, and the category index. Nothing is kept between runs.

use crate::collect::{Collection, Collector};
use crate::config::Config;
use crate::index::{index_by_category, index_by_tag, Taxonomy};
use crate::write::{Error as WriteError, Writer};
use log::{error, info, warn};
use std::fmt;
use std::path::Path;

/// Everything derived from one pass over the posts directory.
#[derive(Debug)]
pub struct Site {
    pub collection: Collection,
    pub tags: Taxonomy,
    pub categories: Taxonomy,
}

/// Collects the articles under `posts_directory` and indexes them. Doesn't
/// touch the filesystem beyond reading.
pub fn index_site(posts_directory: &Path) -> Site {
    let collection = Collector::new(posts_directory).collect();
    let tags = index_by_tag(&collection.articles);
    let categories = index_by_category(&collection.articles);

    for (slug, names) in tags.slug_collisions() {
        warn!(
            "tags {:?} share the slug `{}`; only the last one's listing is kept",
            names, slug
        );
    }

    Site {
        collection,
        tags,
        categories,
    }
}

/// Counts describing a completed run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Report {
    pub articles: usize,
    pub failures: usize,
    pub tags: usize,
    pub categories: usize,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} articles ({} skipped), {} tags, {} categories",
            self.articles, self.failures, self.tags, self.categories
        )
    }
}

/// Runs the full pipeline against `config`. Returns `Ok(None)` without
/// writing anything when the posts directory doesn't exist.
///
/// The three output passes are independent: if one fails the others are
/// still attempted, and the first failure is returned.
pub fn build_indices(config: &Config) -> Result<Option<Report>> {
    let posts_directory = config.posts_directory();
    if !posts_directory.is_dir() {
        warn!(
            "posts directory '{}' does not exist; skipping index generation",
            posts_directory.display()
        );
        return Ok(None);
    }

    let site = index_site(&posts_directory);
    let writer = Writer {
        docs_directory: &config.docs_directory,
    };

    let results = vec![
        ("articles", writer.write_articles(&site.collection.articles).map(|_| ())),
        ("tags", writer.write_taxonomy(&site.tags)),
        ("categories", writer.write_taxonomy(&site.categories)),
    ];
    let mut first_error = None;
    for (pass, result) in results {
        if let Err(err) = result {
            error!("writing {} failed: {}", pass, err);
            first_error.get_or_insert(Error::Write { pass, err });
        }
    }
    if let Some(err) = first_error {
        return Err(err);
    }

    Ok(Some(Report {
        articles: site.collection.articles.len(),
        failures: site.collection.failures.len(),
        tags: site.tags.index.len(),
        categories: site.categories.index.len(),
    }))
}

/// Entry point for the host's pre-build hook.
pub fn on_pre_build(config: &Config) -> Result<Option<Report>> {
    info!("indexing posts before build");
    build_indices(config)
}

/// Entry point for the host's dev-server start hook. Performs the same full
/// run as [`on_pre_build`].
pub fn on_serve(config: &Config) -> Result<Option<Report>> {
    info!("indexing posts for the development server");
    build_indices(config)
}

pub type Result<T> = std::result::Result<T, Error>;

/// The error type for an indexing run.
#[derive(Debug)]
pub enum Error {
    /// Returned when one of the output passes fails.
    Write {
        pass: &'static str,
        err: WriteError,
    },
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Write { pass, err } => write!(f, "writing {}: {}", pass, err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Write { err, .. } => Some(err),
        }
    }
}
