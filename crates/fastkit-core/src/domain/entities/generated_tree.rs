use std::path::{Path, PathBuf};

use serde::Serialize;

/// What one generator call produced.
///
/// Contains no business logic, only a record of the effects in the order they
/// happened. Paths are absolute (rooted where the call wrote).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeneratedTree {
    entries: Vec<FsEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum FsEntry {
    Directory(PathBuf),
    File(PathBuf),
    /// Existing file preserved instead of overwritten.
    Skipped(PathBuf),
    /// Shared file edited in place.
    Patched(PathBuf),
}

impl FsEntry {
    pub fn path(&self) -> &Path {
        match self {
            Self::Directory(p) | Self::File(p) | Self::Skipped(p) | Self::Patched(p) => p,
        }
    }
}

impl GeneratedTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entry: FsEntry) {
        if !self.entries.contains(&entry) {
            self.entries.push(entry);
        }
    }

    pub fn extend(&mut self, other: GeneratedTree) {
        for entry in other.entries {
            self.record(entry);
        }
    }

    pub fn entries(&self) -> &[FsEntry] {
        &self.entries
    }

    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().filter_map(|e| match e {
            FsEntry::File(p) => Some(p.as_path()),
            _ => None,
        })
    }

    pub fn directories(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().filter_map(|e| match e {
            FsEntry::Directory(p) => Some(p.as_path()),
            _ => None,
        })
    }

    pub fn skipped(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().filter_map(|e| match e {
            FsEntry::Skipped(p) => Some(p.as_path()),
            _ => None,
        })
    }

    pub fn patched(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().filter_map(|e| match e {
            FsEntry::Patched(p) => Some(p.as_path()),
            _ => None,
        })
    }

    pub fn contains_file(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        self.files().any(|p| p == path)
    }

    pub fn file_count(&self) -> usize {
        self.files().count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_are_deduplicated_and_ordered() {
        let mut tree = GeneratedTree::new();
        tree.record(FsEntry::Directory("/p/app".into()));
        tree.record(FsEntry::File("/p/app/main.py".into()));
        tree.record(FsEntry::File("/p/app/main.py".into()));
        tree.record(FsEntry::Skipped("/p/app/models.py".into()));

        assert_eq!(tree.entries().len(), 3);
        assert_eq!(tree.file_count(), 1);
        assert!(tree.contains_file("/p/app/main.py"));
        assert_eq!(tree.skipped().count(), 1);
    }

    #[test]
    fn extend_merges() {
        let mut a = GeneratedTree::new();
        a.record(FsEntry::File("/p/a".into()));
        let mut b = GeneratedTree::new();
        b.record(FsEntry::File("/p/a".into()));
        b.record(FsEntry::Patched("/p/app/core/config.py".into()));
        a.extend(b);
        assert_eq!(a.entries().len(), 2);
        assert_eq!(a.patched().count(), 1);
    }
}
