use crate::error::DataLoadError;
use crate::{Dataset, load_dataset};
use configuration::DataSources;
use std::sync::{Arc, PoisonError, RwLock};

/// The load-once holder of the joined dataset.
///
/// The first call to [`DatasetCache::get`] reads both input files; later calls
/// hand out the same `Arc<Dataset>` until [`DatasetCache::reload`] or
/// [`DatasetCache::invalidate`] is called. Callers never mutate the dataset;
/// a filtered view is always a fresh copy.
#[derive(Debug)]
pub struct DatasetCache {
    sources: DataSources,
    slot: RwLock<Option<Arc<Dataset>>>,
}

impl DatasetCache {
    pub fn new(sources: DataSources) -> Self {
        Self {
            sources,
            slot: RwLock::new(None),
        }
    }

    pub fn sources(&self) -> &DataSources {
        &self.sources
    }

    /// Returns the cached dataset, loading it on first use.
    pub fn get(&self) -> Result<Arc<Dataset>, DataLoadError> {
        if let Some(dataset) = self.slot.read().unwrap_or_else(PoisonError::into_inner).as_ref() {
            return Ok(Arc::clone(dataset));
        }

        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have filled the slot while we waited for the write lock.
        if let Some(dataset) = slot.as_ref() {
            return Ok(Arc::clone(dataset));
        }
        let dataset = Arc::new(load_dataset(&self.sources)?);
        *slot = Some(Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Re-reads both files and replaces the cached dataset.
    ///
    /// On failure the previously cached dataset stays in place.
    pub fn reload(&self) -> Result<Arc<Dataset>, DataLoadError> {
        let dataset = Arc::new(load_dataset(&self.sources)?);
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&dataset));
        tracing::info!(rows = dataset.rows.len(), "Dataset reloaded.");
        Ok(dataset)
    }

    /// Drops the cached dataset; the next `get` reads the files again.
    pub fn invalidate(&self) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.slot.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }
}
