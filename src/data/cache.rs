use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use log::info;

use super::error::Result;
use super::loader::load_file;
use super::model::Dataset;

/// Load-once holder for the dashboard's dataset.
///
/// The first successful [`DatasetCache::get_or_load`] parses the file; every
/// later call hands out the same `Arc`. A failed load leaves the cache empty.
/// The source file is treated as static, so there is no invalidation.
#[derive(Debug)]
pub struct DatasetCache {
    path: PathBuf,
    loaded: OnceLock<Arc<Dataset>>,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DatasetCache {
            path: path.into(),
            loaded: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }

    pub fn get_or_load(&self) -> Result<Arc<Dataset>> {
        if let Some(ds) = self.loaded.get() {
            return Ok(Arc::clone(ds));
        }
        let dataset = Arc::new(load_file(&self.path)?);
        info!(
            "Loaded {} records with columns {:?}",
            dataset.len(),
            dataset.schema().columns().iter().map(|c| &c.name).collect::<Vec<_>>()
        );
        Ok(Arc::clone(self.loaded.get_or_init(|| dataset)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "Temperature,Humidity,Wind Speed,UV Index,Weather Type,Location\n\
                       20,60,4,2,Rainy,inland\n";

    #[test]
    fn loads_once_and_reuses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather.csv");
        std::fs::write(&path, CSV).unwrap();

        let cache = DatasetCache::new(&path);
        assert!(!cache.is_loaded());
        let first = cache.get_or_load().unwrap();

        // Removing the file proves the second call never touches disk.
        std::fs::remove_file(&path).unwrap();
        let second = cache.get_or_load().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(cache.is_loaded());
    }

    #[test]
    fn failed_load_leaves_cache_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late.csv");
        let cache = DatasetCache::new(&path);
        assert!(cache.get_or_load().is_err());
        assert!(!cache.is_loaded());

        std::fs::write(&path, CSV).unwrap();
        assert_eq!(cache.get_or_load().unwrap().len(), 1);
    }
}
