//! Bounded directory traversal and item discovery.
//!
//! [`DirectoryWalker`] yields media files lazily; [`discover`] drains that
//! sequence into a deduplicated list of [`DiscoveredItem`]s before any
//! network work starts.
//!
//! Symbolic links to directories are never descended into, which rules out
//! traversal cycles. Symbolic links to regular files are yielded like files.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use nfo_scout_core::Identifier;
use walkdir::WalkDir;

use crate::error::ScanError;

/// Extensions recognized as video files (lowercase, no dot).
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mkv", "wmv", "mov"];

/// A file found by the walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    pub path: PathBuf,
    /// 0 for files directly inside the root, 1 for one subdirectory down, ...
    pub depth: usize,
}

/// Walks a root directory to a bounded depth, yielding files whose extension
/// is in the filter set.
#[derive(Debug, Clone)]
pub struct DirectoryWalker {
    root: PathBuf,
    max_depth: usize,
    extensions: HashSet<String>,
}

impl DirectoryWalker {
    /// Create a walker. `max_depth = 0` only looks at files directly in `root`.
    pub fn new(root: impl Into<PathBuf>, max_depth: usize, extensions: &[&str]) -> Self {
        Self {
            root: root.into(),
            max_depth,
            extensions: extension_set(extensions),
        }
    }

    /// Walker over [`VIDEO_EXTENSIONS`].
    pub fn videos(root: impl Into<PathBuf>, max_depth: usize) -> Self {
        Self::new(root, max_depth, VIDEO_EXTENSIONS)
    }

    /// Start the traversal. The returned iterator is single-pass.
    ///
    /// Entries within a directory come in file-name order. Unreadable
    /// entries are logged and skipped.
    pub fn walk(self) -> Result<Walk, ScanError> {
        if !self.root.is_dir() {
            return Err(ScanError::NotADirectory(self.root));
        }
        let inner = WalkDir::new(&self.root)
            .follow_links(false)
            .min_depth(1)
            .max_depth(self.max_depth + 1)
            .sort_by_file_name()
            .into_iter();
        Ok(Walk {
            inner,
            extensions: self.extensions,
        })
    }
}

/// Lazy iterator returned by [`DirectoryWalker::walk`].
pub struct Walk {
    inner: walkdir::IntoIter,
    extensions: HashSet<String>,
}

impl Iterator for Walk {
    type Item = WalkEntry;

    fn next(&mut self) -> Option<WalkEntry> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if !is_file_like(&entry) || !has_matching_extension(entry.path(), &self.extensions) {
                continue;
            }

            let depth = entry.depth() - 1;
            return Some(WalkEntry {
                path: entry.into_path(),
                depth,
            });
        }
    }
}

/// Regular files, plus symlinks whose target is a regular file.
fn is_file_like(entry: &walkdir::DirEntry) -> bool {
    let file_type = entry.file_type();
    if file_type.is_file() {
        return true;
    }
    file_type.is_symlink()
        && std::fs::metadata(entry.path())
            .map(|m| m.is_file())
            .unwrap_or(false)
}

/// Build a lowercase extension set (leading dots are ignored).
pub fn extension_set(extensions: &[&str]) -> HashSet<String> {
    extensions
        .iter()
        .map(|e| e.trim_start_matches('.').to_lowercase())
        .collect()
}

fn has_matching_extension(path: &Path, extensions: &HashSet<String>) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.contains(&e.to_lowercase()))
        .unwrap_or(false)
}

/// A media file paired with the identifier extracted from its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredItem {
    pub path: PathBuf,
    pub depth: usize,
    pub identifier: Identifier,
}

impl DiscoveredItem {
    /// Extract the identifier from the file name of `path`.
    pub fn from_path(path: PathBuf, depth: usize) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().into_owned();
        let identifier = nfo_scout_core::extract(&name).ok()?;
        Some(Self {
            path,
            depth,
            identifier,
        })
    }
}

/// A later path whose identifier was already claimed by an earlier one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplicate {
    pub path: PathBuf,
    pub identifier: Identifier,
    /// Path of the item that was kept
    pub kept: PathBuf,
}

/// Result of draining a walk.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Unique items in discovery order
    pub items: Vec<DiscoveredItem>,
    pub duplicates: Vec<Duplicate>,
    /// Media files with no recognizable identifier
    pub unmatched: Vec<PathBuf>,
}

/// Extract identifiers from every walked file and deduplicate them.
pub fn discover(entries: impl IntoIterator<Item = WalkEntry>) -> Discovery {
    let mut found = Vec::new();
    let mut unmatched = Vec::new();

    for entry in entries {
        match DiscoveredItem::from_path(entry.path.clone(), entry.depth) {
            Some(item) => found.push(item),
            None => {
                log::debug!("No identifier in {}", entry.path.display());
                unmatched.push(entry.path);
            }
        }
    }

    let (items, duplicates) = dedup_items(found);
    Discovery {
        items,
        duplicates,
        unmatched,
    }
}

/// Keep the first item for each canonical identifier, preserving order.
pub fn dedup_items(
    items: impl IntoIterator<Item = DiscoveredItem>,
) -> (Vec<DiscoveredItem>, Vec<Duplicate>) {
    let mut seen: HashMap<String, PathBuf> = HashMap::new();
    let mut unique = Vec::new();
    let mut duplicates = Vec::new();

    for item in items {
        match seen.get(item.identifier.canonical()) {
            Some(kept) => duplicates.push(Duplicate {
                path: item.path,
                identifier: item.identifier,
                kept: kept.clone(),
            }),
            None => {
                seen.insert(item.identifier.canonical().to_string(), item.path.clone());
                unique.push(item);
            }
        }
    }

    (unique, duplicates)
}
