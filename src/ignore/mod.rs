//! Ignore Resolver: decides which paths in a workspace are indexable.
//!
//! Combines, in priority order, built-in defaults (VCS/build/dependency/cache
//! directories, binary and media extensions, a large-file threshold),
//! project `.gitignore`-style patterns, and workspace-specific overrides,
//! using the same `ignore` crate machinery `WalkBuilder` is built on so the
//! same `.gitignore` semantics (first-match-wins, `!` negation) apply
//! whether a path is checked standalone or discovered by a directory walk.

use anyhow::{Context, Result};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::Path;

/// Files larger than this are never indexed, regardless of extension.
pub const MAX_INDEXABLE_BYTES: u64 = 2 * 1024 * 1024;

const BUILTIN_IGNORE_DIRS: &[&str] = &[
    ".git/",
    ".hg/",
    ".svn/",
    "node_modules/",
    "target/",
    "build/",
    "dist/",
    "out/",
    ".venv/",
    "venv/",
    "__pycache__/",
    ".mypy_cache/",
    ".pytest_cache/",
    ".julie/",
    ".idea/",
    ".vscode/",
    "vendor/",
    "bin/obj/",
];

const BUILTIN_IGNORE_EXTENSIONS: &[&str] = &[
    "*.png", "*.jpg", "*.jpeg", "*.gif", "*.bmp", "*.ico", "*.webp", "*.svg",
    "*.mp3", "*.mp4", "*.mov", "*.avi", "*.wav", "*.flac",
    "*.zip", "*.tar", "*.gz", "*.rar", "*.7z",
    "*.so", "*.dll", "*.dylib", "*.exe", "*.o", "*.a", "*.lib",
    "*.pdf", "*.woff", "*.woff2", "*.ttf", "*.eot",
    "*.lock", "*.min.js", "*.min.css",
];

/// Resolves whether a relative path within a workspace should be indexed.
///
/// Construction does the only I/O (reading `.gitignore` files under the
/// root); `is_indexable` is a pure pattern match afterwards.
pub struct IgnoreResolver {
    matcher: Gitignore,
    max_bytes: u64,
}

impl IgnoreResolver {
    /// Build a resolver for `root`, layering built-in defaults, the
    /// project's own `.gitignore` chain, and `overrides` (additional
    /// gitignore-syntax lines, checked last so they can override either).
    pub fn new(root: &Path, overrides: &[String]) -> Result<Self> {
        let mut builder = GitignoreBuilder::new(root);

        for dir in BUILTIN_IGNORE_DIRS {
            builder
                .add_line(None, dir)
                .with_context(|| format!("invalid built-in ignore pattern {dir:?}"))?;
        }
        for ext in BUILTIN_IGNORE_EXTENSIONS {
            builder
                .add_line(None, ext)
                .with_context(|| format!("invalid built-in ignore pattern {ext:?}"))?;
        }

        // `add` reads root/.gitignore plus any nested .gitignore files found
        // while building; harmless if none exist.
        if let Some(err) = builder.add(root.join(".gitignore")) {
            tracing::debug!("No root .gitignore ({err}), continuing with defaults only");
        }

        for pattern in overrides {
            builder
                .add_line(None, pattern)
                .with_context(|| format!("invalid workspace override pattern {pattern:?}"))?;
        }

        let matcher = builder.build().context("Failed to build ignore matcher")?;

        Ok(Self {
            matcher,
            max_bytes: MAX_INDEXABLE_BYTES,
        })
    }

    /// Whether `relative_path` (Unix-style, relative to the workspace root)
    /// should be indexed, given its size in bytes.
    pub fn is_indexable(&self, relative_path: &Path, size_bytes: u64) -> bool {
        if size_bytes > self.max_bytes {
            return false;
        }
        !self
            .matcher
            .matched_path_or_any_parents(relative_path, false)
            .is_ignore()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn builtin_directories_are_ignored() {
        let dir = tempdir().unwrap();
        let resolver = IgnoreResolver::new(dir.path(), &[]).unwrap();
        assert!(!resolver.is_indexable(Path::new("node_modules/pkg/index.js"), 10));
        assert!(resolver.is_indexable(Path::new("src/main.rs"), 10));
    }

    #[test]
    fn oversized_files_are_excluded() {
        let dir = tempdir().unwrap();
        let resolver = IgnoreResolver::new(dir.path(), &[]).unwrap();
        assert!(!resolver.is_indexable(Path::new("src/main.rs"), MAX_INDEXABLE_BYTES + 1));
    }

    #[test]
    fn project_gitignore_is_respected() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".gitignore"), "generated/\n").unwrap();
        let resolver = IgnoreResolver::new(dir.path(), &[]).unwrap();
        assert!(!resolver.is_indexable(Path::new("generated/schema.rs"), 10));
        assert!(resolver.is_indexable(Path::new("src/lib.rs"), 10));
    }

    #[test]
    fn workspace_overrides_can_negate_builtins() {
        let dir = tempdir().unwrap();
        let resolver =
            IgnoreResolver::new(dir.path(), &[String::from("!target/keep.rs")]).unwrap();
        assert!(resolver.is_indexable(Path::new("target/keep.rs"), 10));
        assert!(!resolver.is_indexable(Path::new("target/other.rs"), 10));
    }
}
