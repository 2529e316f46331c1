//! Defines the [`Article`] and [`ArticleRecord`] types and the rules for
//! building an [`Article`] from a document's metadata and body.
//!
//! Every recognized metadata key falls back to a fixed default when it is
//! absent or null. A value of the wrong shape is logged and replaced by the
//! same default:
//!
//! | Key            | Default                           |
//! |----------------|-----------------------------------|
//! | `title`        | the file name without extension   |
//! | `date`         | [`DEFAULT_DATE`]                  |
//! | `category`     | [`DEFAULT_CATEGORY`]              |
//! | `tags`         | no tags                           |
//! | `reading_time` | [`reading_time::estimate`] of body|
//! | `pin`          | `false`                           |
//!
//! The `url` and `content` fields are always derived and can't be set from
//! metadata.

use crate::{reading_time, summary};
use chrono::{DateTime, NaiveDateTime};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::convert::TryFrom;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// The `date` used when a document doesn't declare one.
pub const DEFAULT_DATE: &str = "2000-01-01";

/// The `category` used when a document doesn't declare one.
pub const DEFAULT_CATEGORY: &str = "others";

/// The URL prefix shared by every article.
pub const POSTS_URL_PREFIX: &str = "/posts";

/// A single post as written to `posts/articles.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,

    /// Compared as a string; ISO-8601 dates therefore sort chronologically.
    pub date: String,

    pub category: String,
    pub tags: Vec<String>,

    /// Estimated minutes to read. Always at least one.
    pub reading_time: u32,

    pub pin: bool,

    /// `/posts/{relative path without extension}/`.
    pub url: String,

    /// The plain-text summary (see [`summary::summarize`]).
    pub content: String,
}

/// The projection of an [`Article`] used in per-tag and per-category
/// listings. It omits the summary and the pin flag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,
    pub date: String,
    pub category: String,
    pub tags: Vec<String>,
    pub url: String,
    pub reading_time: u32,
}

impl From<&Article> for ArticleRecord {
    fn from(article: &Article) -> ArticleRecord {
        ArticleRecord {
            title: article.title.clone(),
            date: article.date.clone(),
            category: article.category.clone(),
            tags: article.tags.clone(),
            url: article.url.clone(),
            reading_time: article.reading_time,
        }
    }
}

impl Article {
    /// Builds an [`Article`] for the document at `relative_path` (relative to
    /// the posts directory) from its decoded `metadata` and its `body`.
    pub fn new(
        relative_path: &Path,
        metadata: &Mapping,
        body: &str,
    ) -> Result<Article> {
        let fields = Fields::from_metadata(relative_path, metadata);
        let url = post_url(relative_path)?;
        let title = match fields.title {
            Some(title) => title,
            None => relative_path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .ok_or_else(|| InvalidFileNameError(relative_path.to_owned()))?
                .to_owned(),
        };

        Ok(Article {
            title,
            date: fields.date.unwrap_or_else(|| DEFAULT_DATE.to_owned()),
            category: fields
                .category
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_owned()),
            tags: fields.tags.unwrap_or_default(),
            reading_time: match fields.reading_time {
                Some(minutes) => minutes,
                None => reading_time::estimate(body),
            },
            pin: fields.pin.unwrap_or(false),
            url,
            content: summary::summarize(body, summary::DEFAULT_MAX_LENGTH),
        })
    }
}

/// Derives an article URL from its path relative to the posts directory:
/// `2026-1-1/hello.md` becomes `/posts/2026-1-1/hello/`.
pub fn post_url(relative_path: &Path) -> Result<String> {
    let mut url = String::from(POSTS_URL_PREFIX);
    for component in relative_path.with_extension("").components() {
        match component {
            Component::Normal(segment) => {
                url.push('/');
                url.push_str(segment.to_str().ok_or_else(|| {
                    InvalidFileNameError(relative_path.to_owned())
                })?);
            }
            Component::CurDir => {}
            _ => {
                return Err(InvalidFileNameError(relative_path.to_owned()).into())
            }
        }
    }
    url.push('/');
    Ok(url)
}

/// The recognized metadata fields after coercion. `None` means the default
/// applies.
#[derive(Default)]
struct Fields {
    title: Option<String>,
    date: Option<String>,
    category: Option<String>,
    tags: Option<Vec<String>>,
    reading_time: Option<u32>,
    pin: Option<bool>,
}

impl Fields {
    /// Coerces each recognized key. A value that can't be coerced is logged
    /// and replaced by the key's default; it never rejects the document.
    fn from_metadata(relative_path: &Path, metadata: &Mapping) -> Fields {
        let field = Field {
            relative_path,
            metadata,
        };
        Fields {
            title: field.get("title", scalar, "a scalar"),
            date: field.get("date", date, "a scalar"),
            category: field.get("category", scalar, "a scalar"),
            tags: field.get("tags", tags, "a list of scalars"),
            reading_time: field.get("reading_time", minutes, "a positive number of minutes"),
            pin: field.get("pin", flag, "a boolean"),
        }
    }
}

/// Looks up recognized keys in one document's metadata.
struct Field<'a> {
    relative_path: &'a Path,
    metadata: &'a Mapping,
}

impl Field<'_> {
    fn get<T>(&self, key: &str, coerce: fn(&Value) -> Option<T>, expected: &str) -> Option<T> {
        match self.metadata.get(&Value::String(key.to_owned())) {
            None | Some(Value::Null) => None,
            Some(value) => {
                let coerced = coerce(value);
                if coerced.is_none() {
                    warn!(
                        "{}: metadata field `{}` must be {}; using the default",
                        self.relative_path.display(),
                        key,
                        expected
                    );
                }
                coerced
            }
        }
    }
}

/// Renders a scalar as text. Sequences and mappings are rejected.
fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Like [`scalar`], except that timestamps carrying a time of day are
/// rewritten as `YYYY-MM-DD HH:MM:SS` (plus `+HH:MM` if an offset was given)
/// so that differently written timestamps sort consistently. Date-only
/// values and anything unrecognized are kept verbatim.
fn date(value: &Value) -> Option<String> {
    let raw = scalar(value)?;
    Some(normalize_timestamp(&raw).unwrap_or(raw))
}

fn normalize_timestamp(raw: &str) -> Option<String> {
    const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.format("%Y-%m-%d %H:%M:%S%:z").to_string());
    }
    NAIVE_FORMATS.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(raw, format)
            .ok()
            .map(|timestamp| timestamp.format("%Y-%m-%d %H:%M:%S").to_string())
    })
}

/// Accepts a sequence of scalars or a single scalar (one tag).
fn tags(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Sequence(items) => items.iter().map(scalar).collect(),
        Value::Mapping(_) => None,
        _ => Some(vec![scalar(value)?]),
    }
}

/// Accepts positive integers, floats (rounded half to even), or strings
/// holding a positive integer.
fn minutes(value: &Value) -> Option<u32> {
    let minutes = match value {
        Value::Number(n) => match (n.as_u64(), n.as_f64()) {
            (Some(whole), _) => whole,
            (None, Some(fraction)) if fraction.is_finite() && fraction > 0.0 => {
                fraction.round_ties_even() as u64
            }
            _ => return None,
        },
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u32::try_from(minutes).ok().filter(|&minutes| minutes > 0)
}

/// Accepts booleans and the YAML 1.1 spellings `yes`, `no`, `on`, `off`,
/// `true` and `false` in any case.
fn flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.to_lowercase().as_str() {
            "yes" | "on" | "true" => Some(true),
            "no" | "off" | "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

#[derive(Debug)]
pub struct InvalidFileNameError(PathBuf);

impl fmt::Display for InvalidFileNameError {
    /// Displays an [`InvalidFileNameError`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid file name: {:?}", &self.0)
    }
}

impl std::error::Error for InvalidFileNameError {
    /// Implements the [`std::error::Error`] trait for [`InvalidFileNameError`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

/// Represents the result of building an [`Article`].
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a document that can't be turned into an [`Article`].
#[derive(Debug)]
pub enum Error {
    /// Returned when the document's path can't be expressed as a URL.
    InvalidFileName(InvalidFileNameError),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidFileName(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidFileName(err) => Some(err),
        }
    }
}

impl From<InvalidFileNameError> for Error {
    fn from(err: InvalidFileNameError) -> Error {
        Error::InvalidFileName(err)
    }
}
