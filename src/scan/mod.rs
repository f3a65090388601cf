//! File Scanner: a single-pass directory walk producing the set of
//! indexable paths, their Blake3 content hashes, and the workspace's max
//! mtime in one pass -- the same walk answers both "is anything stale?"
//! and "what needs indexing?" without re-walking the tree twice.

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

use crate::ignore::IgnoreResolver;

/// Result of one scan: every indexable path relative to the workspace root,
/// its Blake3 content hash, and the latest mtime seen across the walk.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub indexable: Vec<PathBuf>,
    pub content_hashes: HashMap<PathBuf, String>,
    pub max_mtime: Option<SystemTime>,
}

/// Walk `root`, consulting `ignore_resolver` for each candidate path, and
/// hash every surviving file's content in parallel.
pub fn scan(root: &Path, ignore_resolver: &IgnoreResolver) -> Result<ScanResult> {
    let mut candidates: Vec<(PathBuf, u64, SystemTime)> = Vec::new();
    let mut max_mtime: Option<SystemTime> = None;

    let walker = WalkDir::new(root)
        .follow_links(false) // symlinks outside the workspace root are never followed
        .into_iter()
        .filter_entry(|entry| {
            // Cheap directory-name prune before we even stat; the resolver
            // re-checks every file anyway, this just avoids descending into
            // obviously-ignored trees like .git or node_modules.
            entry.depth() == 0
                || !matches!(
                    entry.file_name().to_str(),
                    Some(".git") | Some("node_modules") | Some("target") | Some(".julie")
                )
        });

    for entry in walker {
        let entry = entry.context("Failed to read directory entry during scan")?;
        if !entry.file_type().is_file() {
            continue;
        }

        let metadata = entry.metadata().context("Failed to stat file during scan")?;
        let size = metadata.len();
        let mtime = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);

        let relative = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .to_path_buf();

        if !ignore_resolver.is_indexable(&relative, size) {
            continue;
        }

        max_mtime = Some(match max_mtime {
            Some(current) if current >= mtime => current,
            _ => mtime,
        });

        candidates.push((relative, size, mtime));
    }

    let hashes: Vec<(PathBuf, Option<String>)> = candidates
        .par_iter()
        .map(|(relative, _size, _mtime)| {
            let absolute = root.join(relative);
            match std::fs::read(&absolute) {
                Ok(bytes) => (relative.clone(), Some(hex::encode(blake3::hash(&bytes).as_bytes()))),
                Err(e) => {
                    tracing::warn!("Skipping unreadable file {}: {}", absolute.display(), e);
                    (relative.clone(), None)
                }
            }
        })
        .collect();

    let mut content_hashes = HashMap::with_capacity(hashes.len());
    let mut indexable = Vec::with_capacity(hashes.len());
    for (relative, hash) in hashes {
        if let Some(hash) = hash {
            content_hashes.insert(relative.clone(), hash);
            indexable.push(relative);
        }
    }

    Ok(ScanResult {
        indexable,
        content_hashes,
        max_mtime,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn scan_finds_files_and_hashes_content() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("main.rs"), b"fn main() {}").unwrap();
        fs::create_dir(dir.path().join("node_modules")).unwrap();
        fs::write(dir.path().join("node_modules/pkg.js"), b"ignored").unwrap();

        let resolver = IgnoreResolver::new(dir.path(), &[]).unwrap();
        let result = scan(dir.path(), &resolver).unwrap();

        assert_eq!(result.indexable.len(), 1);
        assert_eq!(result.indexable[0], PathBuf::from("main.rs"));
        assert!(result.content_hashes.contains_key(&PathBuf::from("main.rs")));
        assert!(result.max_mtime.is_some());
    }

    #[test]
    fn identical_content_hashes_match() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.rs"), b"same").unwrap();
        fs::write(dir.path().join("b.rs"), b"same").unwrap();

        let resolver = IgnoreResolver::new(dir.path(), &[]).unwrap();
        let result = scan(dir.path(), &resolver).unwrap();

        let hash_a = &result.content_hashes[&PathBuf::from("a.rs")];
        let hash_b = &result.content_hashes[&PathBuf::from("b.rs")];
        assert_eq!(hash_a, hash_b);
    }
}
