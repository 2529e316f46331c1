//! Locates the site's content root. The host generator's project file
//! (`mkdocs.yml`) names it via `docs_dir`; everything else in that file is
//! ignored.

use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// The host generator's project file.
pub const PROJECT_FILE: &str = "mkdocs.yml";

const DEFAULT_DOCS_DIR: &str = "docs";

#[derive(Deserialize)]
struct Project {
    #[serde(default = "default_docs_dir")]
    docs_dir: PathBuf,
}

fn default_docs_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DOCS_DIR)
}

/// The configuration the pipeline receives from its host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// The content root. Articles are read from `{docs_directory}/posts` and
    /// all outputs are written beneath it.
    pub docs_directory: PathBuf,
}

impl Config {
    pub fn new(docs_directory: impl Into<PathBuf>) -> Config {
        Config {
            docs_directory: docs_directory.into(),
        }
    }

    /// Searches `dir` and then each of its ancestors for [`PROJECT_FILE`]
    /// and loads the first one found.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        match dir
            .ancestors()
            .map(|ancestor| ancestor.join(PROJECT_FILE))
            .find(|path| path.is_file())
        {
            Some(path) => Config::from_project_file(&path),
            None => Err(Error::NotFound(dir.to_owned())),
        }
    }

    /// Loads the project file at `path`. A relative `docs_dir` is resolved
    /// against the file's directory.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let file = File::open(path).map_err(|err| Error::Open {
            path: path.to_owned(),
            err,
        })?;
        let project: Project =
            serde_yaml::from_reader(file).map_err(|err| Error::DeserializeYaml {
                path: path.to_owned(),
                err,
            })?;
        let project_root = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(Config::new(project_root.join(project.docs_dir)))
    }

    pub fn posts_directory(&self) -> PathBuf {
        self.docs_directory.join(crate::write::POSTS_DIRECTORY_NAME)
    }
}

/// Represents the result of loading a [`Config`].
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading a [`Config`].
#[derive(Debug)]
pub enum Error {
    /// Returned when no project file exists in the directory or any parent.
    NotFound(PathBuf),

    /// Returned when the project file can't be opened.
    Open { path: PathBuf, err: io::Error },

    /// Returned when the project file isn't valid YAML.
    DeserializeYaml {
        path: PathBuf,
        err: serde_yaml::Error,
    },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::NotFound(dir) => write!(
                f,
                "could not find `{}` in '{}' or any parent directory",
                PROJECT_FILE,
                dir.display()
            ),
            Error::Open { path, err } => {
                write!(f, "opening project file '{}': {}", path.display(), err)
            }
            Error::DeserializeYaml { path, err } => {
                write!(f, "loading project file '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::NotFound(_) => None,
            Error::Open { err, .. } => Some(err),
            Error::DeserializeYaml { err, .. } => Some(err),
        }
    }
}
