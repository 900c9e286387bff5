//! Lazy, filtered walk over the Go sources beneath a root directory.
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::error::ScanError;
use crate::ignore::SourceFilter;

/// A file accepted by the walker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Path to open
    pub path: PathBuf,
    /// Path as printed in suggestions, relative to the walk root
    pub display: String,
}

/// Single-pass iterator over candidate files, in lexical order per directory.
///
/// Entries that fail to stat or read are skipped. Only a root that cannot be
/// opened at all is an error, reported by [`SourceWalker::new`].
pub struct SourceWalker {
    root: PathBuf,
    filter: SourceFilter,
    inner: walkdir::IntoIter,
}

impl SourceWalker {
    pub fn new(root: &Path, filter: SourceFilter) -> Result<Self, ScanError> {
        let unavailable = |source| ScanError::RootUnavailable {
            root: root.to_path_buf(),
            source,
        };
        let meta = fs::metadata(root).map_err(unavailable)?;
        if !meta.is_dir() {
            return Err(unavailable(std::io::Error::other("not a directory")));
        }
        fs::read_dir(root).map_err(unavailable)?;

        let inner = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();
        Ok(Self { root: root.to_path_buf(), filter, inner })
    }

    fn accept(&mut self, entry: &DirEntry) -> Option<Candidate> {
        if entry.file_type().is_dir() {
            let pruned = entry.depth() > 0
                && self.filter.is_pruned_dir(&entry.file_name().to_string_lossy());
            if pruned {
                tracing::debug!(path = %entry.path().display(), "skipping vendored directory");
                self.inner.skip_current_dir();
            }
            return None;
        }

        // Rules apply below the root, so a root that itself sits in a vendor
        // tree is still scanned
        let relative = entry.path().strip_prefix(&self.root).unwrap_or(entry.path());
        if self.filter.is_ignored(relative) {
            return None;
        }
        Some(Candidate {
            path: entry.path().to_path_buf(),
            display: display_path(&self.root, entry.path()),
        })
    }
}

impl Iterator for SourceWalker {
    type Item = Candidate;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if let Some(candidate) = self.accept(&entry) {
                return Some(candidate);
            }
        }
    }
}

/// Render `path` the way a lexical walk from `root` names it: `./` is
/// dropped when walking the current directory, other roots stay as a prefix.
pub fn display_path(root: &Path, path: &Path) -> String {
    let shown = if root == Path::new(".") {
        path.strip_prefix(root).unwrap_or(path)
    } else {
        path
    };
    shown.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "package p\n").unwrap();
    }

    fn walk(root: &Path) -> Vec<String> {
        let prefix = format!("{}/", root.to_string_lossy().replace('\\', "/"));
        SourceWalker::new(root, SourceFilter::default())
            .unwrap()
            .map(|c| c.display.strip_prefix(&prefix).unwrap().to_string())
            .collect()
    }

    #[test]
    fn yields_go_sources_in_lexical_order() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "z.go");
        touch(root, "a.go");
        touch(root, "pkg/b.go");
        touch(root, "pkg/a.go");
        touch(root, "docs/readme.md");

        assert_eq!(walk(root), vec!["a.go", "pkg/a.go", "pkg/b.go", "z.go"]);
    }

    #[test]
    fn skips_vendor_and_generated_files() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "vendor/dep/x.go");
        touch(root, "internal/vendor/y.go");
        touch(root, "api/types.gen.go");
        touch(root, "api/types.go");

        assert_eq!(walk(root), vec!["api/types.go"]);
    }

    #[test]
    fn directory_named_like_source_is_not_a_candidate() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("weird.go")).unwrap();
        touch(root, "weird.go/inner.go");

        assert_eq!(walk(root), vec!["weird.go/inner.go"]);
    }

    #[test]
    fn root_inside_vendor_is_still_scanned() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("vendor").join("dep");
        touch(&root, "x.go");

        assert_eq!(walk(&root), vec!["x.go"]);
    }

    #[test]
    fn missing_root_is_fatal() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let res = SourceWalker::new(&missing, SourceFilter::default());
        assert!(matches!(res, Err(ScanError::RootUnavailable { .. })));
    }

    #[test]
    fn file_root_is_fatal() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "main.go");
        let res = SourceWalker::new(&dir.path().join("main.go"), SourceFilter::default());
        assert!(matches!(res, Err(ScanError::RootUnavailable { .. })));
    }

    #[test]
    fn display_path_strips_current_dir_only() {
        assert_eq!(display_path(Path::new("."), Path::new("./pkg/a.go")), "pkg/a.go");
        assert_eq!(display_path(Path::new("src"), Path::new("src/pkg/a.go")), "src/pkg/a.go");
    }
}
