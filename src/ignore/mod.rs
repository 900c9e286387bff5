use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Component, Path};

/// Directory holding vendored third-party packages
pub const VENDOR_DIR: &str = "vendor";
/// File-name suffix marking generated Go sources
pub const GENERATED_SUFFIX: &str = ".gen.go";
/// Extension of Go source files
pub const GO_EXTENSION: &str = ".go";

/// Decides which walked paths are Go sources worth scanning.
///
/// Built-in rules: nothing under a `vendor` directory, no `*.gen.go`, nothing
/// that is not `*.go`. Optional globs from config are checked on top.
///
/// A `vendor` directory is skipped at any depth below the root, not only as
/// the first path component, so nested module vendors are left out too.
#[derive(Debug, Clone, Default)]
pub struct SourceFilter {
    globset: Option<GlobSet>,
}

impl SourceFilter {
    pub fn new(globset: Option<GlobSet>) -> Self {
        Self { globset }
    }

    /// Directories that are never descended into
    pub fn is_pruned_dir(&self, name: &str) -> bool {
        name == VENDOR_DIR
    }

    /// `path` is relative to the walk root (or prefixed with it)
    pub fn is_ignored(&self, path: &Path) -> bool {
        if in_vendor_dir(path) || is_generated(path) || !is_go_source(path) {
            return true;
        }
        if let Some(gs) = &self.globset {
            if gs.is_match(path) {
                return true;
            }
        }
        false
    }
}

fn in_vendor_dir(path: &Path) -> bool {
    let parent = match path.parent() {
        Some(p) => p,
        None => return false,
    };
    parent
        .components()
        .any(|c| matches!(c, Component::Normal(name) if name == VENDOR_DIR))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn is_generated(path: &Path) -> bool {
    file_name(path).ends_with(GENERATED_SUFFIX)
}

fn is_go_source(path: &Path) -> bool {
    file_name(path).ends_with(GO_EXTENSION)
}

/// Build a GlobSet from string patterns; `None` when there are no patterns
pub fn build_globset<S: AsRef<str>>(patterns: &[S]) -> Result<Option<GlobSet>, globset::Error> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for p in patterns {
        builder.add(Glob::new(p.as_ref())?);
    }
    builder.build().map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ignored(path: &str) -> bool {
        SourceFilter::default().is_ignored(Path::new(path))
    }

    #[test]
    fn accepts_plain_go_sources() {
        assert!(!ignored("main.go"));
        assert!(!ignored("pkg/a.go"));
        assert!(!ignored("pkg/a_test.go"));
        assert!(!ignored("./cmd/tool/main.go"));
    }

    #[test]
    fn rejects_vendor_generated_and_foreign_files() {
        assert!(ignored("vendor/github.com/x/y.go"));
        assert!(ignored("internal/vendor/z.go"));
        assert!(ignored("api/types.gen.go"));
        assert!(ignored("README.md"));
        assert!(ignored("go.mod"));
        assert!(ignored("pkg/a.go.orig"));
    }

    #[test]
    fn vendor_only_counts_as_directory_component() {
        assert!(!ignored("vendor.go"));
        assert!(!ignored("pkg/vendoring/a.go"));
    }

    #[test]
    fn config_globs_are_applied() {
        let gs = build_globset(&["**/testdata/**", "mocks/*.go"]).unwrap();
        let filter = SourceFilter::new(gs);
        assert!(filter.is_ignored(Path::new("pkg/testdata/x.go")));
        assert!(filter.is_ignored(Path::new("mocks/db.go")));
        assert!(!filter.is_ignored(Path::new("pkg/db.go")));
    }

    #[test]
    fn build_globset_reports_bad_patterns() {
        assert!(build_globset::<&str>(&[]).unwrap().is_none());
        assert!(build_globset(&["a/[b"]).is_err());
    }

    #[test]
    fn prunes_vendor_directories_only() {
        let filter = SourceFilter::default();
        assert!(filter.is_pruned_dir("vendor"));
        assert!(!filter.is_pruned_dir("vendors"));
    }
}
