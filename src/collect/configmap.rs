//! Mounted ConfigMap files.
//!
//! Walks the ConfigMap root and returns every file's content keyed by its
//! path relative to the root. The walk is best effort: unreadable directory
//! entries and files are skipped and counted, never reported to the client.
//!
//! Directory detection uses `symlink_metadata`, so symlinks are never
//! descended into. A symlink to a file is read through its target; a symlink
//! to a directory fails to read and is skipped. For a typical kubelet mount
//! this reports both the top-level keys and the timestamped `..YYYY_MM_DD...`
//! directory that backs them.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path};

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigMapInfo {
    pub files: BTreeMap<String, String>,
    pub count: usize,
}

/// Result of a ConfigMap walk: the files found plus the number of entries that
/// had to be skipped. Only `info` is ever serialized.
#[derive(Debug, Clone, Default)]
pub struct ConfigMapScan {
    pub info: ConfigMapInfo,
    pub skipped: usize,
}

impl ConfigMapScan {
    /// Walk `root`. A missing root, or one that is not a directory, yields an empty scan.
    pub fn walk(root: &Path) -> Self {
        let mut scan = Self::default();

        match fs::symlink_metadata(root) {
            Ok(meta) if meta.is_dir() => scan.walk_dir(root, root),
            Ok(_) => {
                tracing::debug!(root = %root.display(), "ConfigMap root is not a directory");
            }
            Err(_) => {}
        }

        scan.info.count = scan.info.files.len();
        scan
    }

    fn walk_dir(&mut self, root: &Path, dir: &Path) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!(dir = %dir.display(), error = %e, "Skipping unreadable directory");
                self.skipped += 1;
                return;
            }
        };

        // Sorted so nested traversal order does not depend on the filesystem
        let mut paths = Vec::new();
        for entry in entries {
            match entry {
                Ok(entry) => paths.push(entry.path()),
                Err(e) => {
                    tracing::debug!(dir = %dir.display(), error = %e, "Skipping directory entry");
                    self.skipped += 1;
                }
            }
        }
        paths.sort();

        for path in paths {
            let meta = match fs::symlink_metadata(&path) {
                Ok(meta) => meta,
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "Skipping entry");
                    self.skipped += 1;
                    continue;
                }
            };

            if meta.is_dir() {
                self.walk_dir(root, &path);
                continue;
            }

            match fs::read(&path) {
                Ok(bytes) => {
                    let key = relative_key(root, &path);
                    self.info
                        .files
                        .insert(key, String::from_utf8_lossy(&bytes).into_owned());
                }
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "Skipping unreadable file");
                    self.skipped += 1;
                }
            }
        }
    }
}

/// `root/sub/b.txt` → `sub/b.txt`, always `/`-separated.
fn relative_key(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Snapshot of the ConfigMap files under `root`, walked on the blocking pool.
pub async fn collect_configmaps(root: &Path) -> ConfigMapInfo {
    let root = root.to_path_buf();
    let display_root = root.display().to_string();

    match tokio::task::spawn_blocking(move || ConfigMapScan::walk(&root)).await {
        Ok(scan) => {
            if scan.skipped > 0 {
                tracing::debug!(
                    root = %display_root,
                    files = scan.info.count,
                    skipped = scan.skipped,
                    "ConfigMap walk skipped entries"
                );
            }
            scan.info
        }
        Err(e) => {
            tracing::warn!(root = %display_root, error = %e, "ConfigMap walk task failed");
            ConfigMapInfo::default()
        }
    }
}
