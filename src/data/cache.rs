use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::error::LoadError;
use super::loader::load_file;
use super::model::TelemetryTable;

// ---------------------------------------------------------------------------
// Load memoisation keyed on file identity
// ---------------------------------------------------------------------------

struct CachedTable {
    modified: Option<SystemTime>,
    table: Arc<TelemetryTable>,
}

/// Loaded tables for the lifetime of the process.
///
/// File identity is the canonical path plus the modification time, so an
/// edited file is read again while repeated opens of the same file are free.
/// Failed loads are never cached.
#[derive(Default)]
pub struct TableCache {
    entries: HashMap<PathBuf, CachedTable>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for `path`, reading the file on a miss.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<TelemetryTable>, LoadError> {
        let key = identity(path)?;
        let modified = std::fs::metadata(&key).and_then(|m| m.modified()).ok();

        if let Some(entry) = self.entries.get(&key) {
            if entry.modified == modified {
                log::debug!("Cache hit for {}", key.display());
                return Ok(Arc::clone(&entry.table));
            }
            log::info!("{} changed on disk, reloading", key.display());
        }

        // The key may be a symlink target without the extension the parser
        // is picked by, so read through the path as given.
        let table = Arc::new(load_file(path)?);
        log::info!("Loaded {} rows from {}", table.len(), key.display());
        self.entries.insert(
            key,
            CachedTable {
                modified,
                table: Arc::clone(&table),
            },
        );
        Ok(table)
    }

    /// Drop the entry for `path`; the next lookup reads the file again.
    pub fn invalidate(&mut self, path: &Path) {
        let key = identity(path).unwrap_or_else(|_| path.to_path_buf());
        if self.entries.remove(&key).is_some() {
            log::debug!("Invalidated cache entry for {}", key.display());
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn identity(path: &Path) -> Result<PathBuf, LoadError> {
    path.canonicalize().map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => LoadError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::Io(e),
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::data::loader::tests::sample_csv;

    #[test]
    fn repeated_loads_share_the_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.csv");
        std::fs::write(&path, sample_csv(20)).unwrap();

        let mut cache = TableCache::new();
        let a = cache.get_or_load(&path).unwrap();
        let b = cache.get_or_load(&path).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn equivalent_paths_hit_the_same_entry() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let path = dir.path().join("run.csv");
        std::fs::write(&path, sample_csv(5)).unwrap();

        let mut cache = TableCache::new();
        let a = cache.get_or_load(&path).unwrap();
        let b = cache
            .get_or_load(&dir.path().join("sub").join("..").join("run.csv"))
            .unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn modified_file_is_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.csv");
        std::fs::write(&path, sample_csv(5)).unwrap();

        let mut cache = TableCache::new();
        let a = cache.get_or_load(&path).unwrap();

        std::fs::write(&path, sample_csv(8)).unwrap();
        let file = std::fs::File::options().write(true).open(&path).unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(60))
            .unwrap();

        let b = cache.get_or_load(&path).unwrap();
        assert_eq!(a.len(), 5);
        assert_eq!(b.len(), 8);
    }

    #[test]
    fn invalidate_forces_a_reread() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.csv");
        std::fs::write(&path, sample_csv(5)).unwrap();

        let mut cache = TableCache::new();
        let a = cache.get_or_load(&path).unwrap();
        cache.invalidate(&path);
        assert!(cache.is_empty());
        let b = cache.get_or_load(&path).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(a, b);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_path_uses_its_own_extension() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("run_2024_05_01");
        std::fs::write(&target, sample_csv(6)).unwrap();
        let link = dir.path().join("latest.csv");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let mut cache = TableCache::new();
        let table = cache.get_or_load(&link).unwrap();
        assert_eq!(table.len(), 6);
        assert!(Arc::ptr_eq(&table, &cache.get_or_load(&link).unwrap()));
    }

    #[test]
    fn failures_are_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.csv");

        let mut cache = TableCache::new();
        assert!(matches!(
            cache.get_or_load(&path),
            Err(LoadError::FileNotFound { .. })
        ));

        std::fs::write(&path, "Time,Speed\n0,0\n").unwrap();
        assert!(matches!(
            cache.get_or_load(&path),
            Err(LoadError::Schema { .. })
        ));
        assert!(cache.is_empty());

        std::fs::write(&path, sample_csv(3)).unwrap();
        assert_eq!(cache.get_or_load(&path).unwrap().len(), 3);
    }
}
