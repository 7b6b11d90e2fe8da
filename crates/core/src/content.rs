//! Course Content Storage
//!
//! Loads the ordered list of topics from a JSON file beside the worker's
//! working files. When the file does not exist yet it is bootstrapped from a
//! caller-supplied default set, so later runs load the cached copy instead of
//! regenerating it.

use crate::topic::TopicRecord;
use std::collections::HashSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{info, warn};

/// Failures while reading or bootstrapping the content file.
///
/// These never abort the worker: `ContentStore::load` logs them and carries
/// on with an empty topic set.
#[derive(Debug, thiserror::Error)]
pub enum ContentLoadError {
    #[error("Failed to access content file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse content file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read-only collection of topics, shared by every session on the worker.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    topics: Vec<TopicRecord>,
}

impl ContentStore {
    /// Builds a store directly from records, dropping duplicate ids.
    pub fn from_topics(topics: Vec<TopicRecord>) -> Self {
        let mut seen = HashSet::new();
        let topics = topics
            .into_iter()
            .filter(|topic| {
                let first = seen.insert(topic.id.clone());
                if !first {
                    warn!(id = %topic.id, "Duplicate topic id in content; keeping the first entry");
                }
                first
            })
            .collect();
        Self { topics }
    }

    /// Loads the topics stored at `path`, writing `defaults` there first if
    /// the file is absent.
    ///
    /// Any read or parse failure is logged and yields an empty store.
    pub fn load(path: impl AsRef<Path>, defaults: &[TopicRecord]) -> Self {
        let path = path.as_ref();
        match Self::try_load(path, defaults) {
            Ok(store) => {
                info!(path = %path.display(), topics = store.len(), "Course content loaded");
                store
            }
            Err(e) => {
                warn!(error = %e, "Could not load course content; continuing with no topics");
                Self::default()
            }
        }
    }

    /// Fallible variant of [`ContentStore::load`].
    pub fn try_load(path: &Path, defaults: &[TopicRecord]) -> Result<Self, ContentLoadError> {
        if !path.exists() {
            bootstrap(path, defaults)?;
        }

        let raw = std::fs::read_to_string(path).map_err(|source| ContentLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let topics: Vec<TopicRecord> =
            serde_json::from_str(&raw).map_err(|source| ContentLoadError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::from_topics(topics))
    }

    /// Exact, case-sensitive lookup by id.
    pub fn find(&self, id: &str) -> Option<&TopicRecord> {
        self.topics.iter().find(|topic| topic.id == id)
    }

    pub fn topics(&self) -> &[TopicRecord] {
        &self.topics
    }

    /// Topic ids in load order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.topics.iter().map(|topic| topic.id.as_str())
    }

    /// Comma separated id list, used when telling the user what is available.
    pub fn id_list(&self) -> String {
        self.ids().collect::<Vec<_>>().join(", ")
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

/// Writes `defaults` to `path` unless some other process got there first.
///
/// The content goes to a temporary file in the target directory which is
/// then linked into place without clobbering, so a reader never sees a
/// half-written file.
fn bootstrap(path: &Path, defaults: &[TopicRecord]) -> Result<(), ContentLoadError> {
    warn!(path = %path.display(), "Content file not found; generating default course content");
    let io_err = |source: io::Error| ContentLoadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let json = serde_json::to_string_pretty(defaults).map_err(|source| ContentLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(json.as_bytes()).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;

    match tmp.persist_noclobber(path) {
        Ok(_) => {
            info!(path = %path.display(), "Default course content file created");
            Ok(())
        }
        Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
            info!(path = %path.display(), "Content file was created concurrently; using it");
            Ok(())
        }
        Err(e) => Err(io_err(e.error)),
    }
}
