//! File sets: logical path to content mappings
//!
//! The expansion engine only ever sees a [`FileCollection`]. [`FileSet`] is the
//! collection used by the CLI, loaded from and written back to a directory.

use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// The storage seam used by the expansion driver
pub trait FileCollection {
    /// Every logical path currently in the collection
    fn paths(&self) -> Vec<String>;

    /// Content stored under `path`, `None` when the entry is missing or empty-valued
    fn contents(&self, path: &str) -> Option<&[u8]>;

    /// Overwrite the content of an existing entry. Never inserts; returns
    /// whether `path` was present.
    fn replace_contents(&mut self, path: &str, contents: Vec<u8>) -> bool;
}

/// Ordered mapping from logical path to optional content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSet {
    entries: BTreeMap<String, Option<Vec<u8>>>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, contents: impl Into<Vec<u8>>) {
        self.entries.insert(path.into(), Some(contents.into()));
    }

    /// Add an entry that exists but carries no content
    pub fn insert_without_contents(&mut self, path: impl Into<String>) {
        self.entries.insert(path.into(), None);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Content as UTF-8 text, mostly useful in tests and reports
    pub fn text(&self, path: &str) -> Option<&str> {
        self.contents(path).and_then(|bytes| std::str::from_utf8(bytes).ok())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&[u8]>)> {
        self.entries
            .iter()
            .map(|(path, contents)| (path.as_str(), contents.as_deref()))
    }

    /// Load every file below `root`, keyed by its `/`-separated path relative to `root`.
    ///
    /// `.git` directories are skipped; so are paths that are not valid UTF-8.
    pub fn load_dir(root: &Path) -> Result<Self> {
        let mut files = Self::new();

        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || entry.file_name() != ".git");

        for entry in walker {
            let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(root).with_context(|| {
                format!("{} is outside of {}", entry.path().display(), root.display())
            })?;

            let Some(key) = logical_path(relative) else {
                tracing::warn!("Skipping non UTF-8 path: {}", relative.display());
                continue;
            };

            let contents = fs::read(entry.path())
                .with_context(|| format!("Failed to read {}", entry.path().display()))?;
            files.insert(key, contents);
        }

        tracing::debug!("Loaded {} files from {}", files.len(), root.display());
        Ok(files)
    }

    /// Write entries whose content differs from `original` below `root`.
    ///
    /// Returns the logical paths that were written.
    pub fn write_changed(&self, root: &Path, original: &FileSet) -> Result<Vec<String>> {
        let mut written = Vec::new();

        for (path, contents) in self.iter() {
            let Some(contents) = contents else {
                continue;
            };
            if original.contents(path) == Some(contents) {
                continue;
            }

            let target = root.join(path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(&target, contents)
                .with_context(|| format!("Failed to write {}", target.display()))?;
            tracing::debug!("Wrote {}", target.display());
            written.push(path.to_string());
        }

        Ok(written)
    }
}

fn logical_path(relative: &Path) -> Option<String> {
    let segments = relative
        .components()
        .map(|component| component.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(segments.join("/"))
}

impl<K, V> FromIterator<(K, V)> for FileSet
where
    K: Into<String>,
    V: Into<Vec<u8>>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut files = Self::new();
        for (path, contents) in iter {
            files.insert(path, contents);
        }
        files
    }
}

impl FileCollection for FileSet {
    fn paths(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    fn contents(&self, path: &str) -> Option<&[u8]> {
        self.entries.get(path).and_then(|contents| contents.as_deref())
    }

    fn replace_contents(&mut self, path: &str, contents: Vec<u8>) -> bool {
        match self.entries.get_mut(path) {
            Some(slot) => {
                *slot = Some(contents);
                true
            }
            None => false,
        }
    }
}

impl FileCollection for HashMap<String, Vec<u8>> {
    fn paths(&self) -> Vec<String> {
        self.keys().cloned().collect()
    }

    fn contents(&self, path: &str) -> Option<&[u8]> {
        self.get(path).map(Vec::as_slice)
    }

    fn replace_contents(&mut self, path: &str, contents: Vec<u8>) -> bool {
        match self.get_mut(path) {
            Some(slot) => {
                *slot = contents;
                true
            }
            None => false,
        }
    }
}
