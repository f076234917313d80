use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::error::PipelineError;
use super::model::Table;

struct CacheEntry {
    modified: Option<SystemTime>,
    table: Arc<Table>,
}

/// Loaded base tables keyed by path and the file's modification time.
///
/// A changed mtime forces a reload. Failed loads are never stored, so the
/// next access retries from disk.
#[derive(Default)]
pub struct TableCache {
    entries: HashMap<PathBuf, CacheEntry>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for `path`, or run `load` and cache its result.
    pub fn get_or_load<F>(&mut self, path: &Path, load: F) -> Result<Arc<Table>, PipelineError>
    where
        F: FnOnce(&Path) -> Result<Table, PipelineError>,
    {
        let modified = std::fs::metadata(path).and_then(|m| m.modified()).ok();

        if let Some(entry) = self.entries.get(path) {
            if modified.is_some() && entry.modified == modified {
                log::debug!("cache hit for {}", path.display());
                return Ok(Arc::clone(&entry.table));
            }
        }

        match load(path) {
            Ok(table) => {
                let table = Arc::new(table);
                self.entries.insert(
                    path.to_path_buf(),
                    CacheEntry {
                        modified,
                        table: Arc::clone(&table),
                    },
                );
                Ok(table)
            }
            Err(e) => {
                self.entries.remove(path);
                Err(e)
            }
        }
    }

    pub fn invalidate(&mut self, path: &Path) {
        self.entries.remove(path);
    }

    /// Drop every entry except the one for `path`.
    pub fn retain_only(&mut self, path: &Path) {
        self.entries.retain(|p, _| p == path);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;
    use std::cell::Cell;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    fn one_row() -> Table {
        Table::new(vec!["a".into()], vec![vec![CellValue::Integer(1)]])
    }

    #[test]
    fn test_unchanged_file_is_served_from_cache() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.csv");
        fs::write(&path, "a\n1\n").unwrap();

        let calls = Cell::new(0);
        let mut cache = TableCache::new();
        let loader = |_: &Path| {
            calls.set(calls.get() + 1);
            Ok(one_row())
        };

        let first = cache.get_or_load(&path, loader).unwrap();
        let second = cache.get_or_load(&path, loader).unwrap();
        assert_eq!(calls.get(), 1);
        assert!(Arc::ptr_eq(&first, &second));

        cache.invalidate(&path);
        cache.get_or_load(&path, loader).unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.csv");
        fs::write(&path, "a\n1\n").unwrap();

        let mut cache = TableCache::new();
        let err = cache.get_or_load(&path, |p| {
            Err(PipelineError::DataUnavailable {
                path: p.to_path_buf(),
                attempts: Vec::new(),
                io: None,
            })
        });
        assert!(err.is_err());
        assert!(!cache.contains(&path));

        assert!(cache.get_or_load(&path, |_| Ok(one_row())).is_ok());
        assert!(cache.contains(&path));
    }

    #[test]
    fn test_changed_mtime_forces_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.csv");
        fs::write(&path, "a\n1\n").unwrap();

        let calls = Cell::new(0);
        let mut cache = TableCache::new();
        let loader = |_: &Path| {
            calls.set(calls.get() + 1);
            Ok(one_row())
        };

        cache.get_or_load(&path, loader).unwrap();
        cache.get_or_load(&path, loader).unwrap();
        assert_eq!(calls.get(), 1);

        let later = fs::metadata(&path).unwrap().modified().unwrap() + Duration::from_secs(60);
        fs::File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(later)
            .unwrap();

        cache.get_or_load(&path, loader).unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_failed_reload_evicts_stale_entry() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.csv");
        fs::write(&path, "a\n1\n").unwrap();

        let mut cache = TableCache::new();
        cache.get_or_load(&path, |_| Ok(one_row())).unwrap();
        assert!(cache.contains(&path));

        let later = fs::metadata(&path).unwrap().modified().unwrap() + Duration::from_secs(60);
        fs::File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(later)
            .unwrap();

        let err = cache.get_or_load(&path, |p| {
            Err(PipelineError::DataUnavailable {
                path: p.to_path_buf(),
                attempts: Vec::new(),
                io: None,
            })
        });
        assert!(err.is_err());
        assert!(!cache.contains(&path));
    }

    #[test]
    fn test_retain_only_keeps_current_path() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("first.csv");
        let second = dir.path().join("second.csv");
        fs::write(&first, "a\n1\n").unwrap();
        fs::write(&second, "a\n2\n").unwrap();

        let mut cache = TableCache::new();
        cache.get_or_load(&first, |_| Ok(one_row())).unwrap();
        cache.get_or_load(&second, |_| Ok(one_row())).unwrap();
        assert_eq!(cache.len(), 2);

        cache.retain_only(&second);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&second));
    }
}
