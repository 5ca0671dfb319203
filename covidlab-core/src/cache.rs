//! In-memory memo of fetch + transform, keyed by country.
//!
//! Keys are title-cased so "egypt" and "EGYPT" share an entry. Entries live
//! until invalidated; nothing expires on its own. Failures are never stored.

use std::collections::HashMap;
use std::sync::Arc;

use crate::series::DailySeries;
use crate::transform::title_case;

#[derive(Debug, Default)]
pub struct SeriesCache {
    entries: HashMap<String, Arc<DailySeries>>,
}

impl SeriesCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(entity: &str) -> String {
        title_case(entity.trim())
    }

    pub fn get(&self, entity: &str) -> Option<Arc<DailySeries>> {
        self.entries.get(&Self::key(entity)).cloned()
    }

    pub fn insert(&mut self, entity: &str, series: DailySeries) -> Arc<DailySeries> {
        let series = Arc::new(series);
        self.entries.insert(Self::key(entity), Arc::clone(&series));
        series
    }

    /// Drop one entry. Returns whether anything was cached for it.
    pub fn invalidate(&mut self, entity: &str) -> bool {
        self.entries.remove(&Self::key(entity)).is_some()
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

#[cfg(test)]
mod tests {
    use super::*;

    fn series(entity: &str) -> DailySeries {
        DailySeries {
            entity: entity.to_string(),
            records: Vec::new(),
            dataset_hash: "h".into(),
        }
    }

    #[test]
    fn keys_are_case_insensitive() {
        let mut cache = SeriesCache::new();
        cache.insert("egypt", series("Egypt"));
        assert!(cache.get("EGYPT").is_some());
        assert!(cache.get(" Egypt ").is_some());
        assert!(cache.get("Peru").is_none());
    }

    #[test]
    fn insert_returns_shared_handle() {
        let mut cache = SeriesCache::new();
        let a = cache.insert("Egypt", series("Egypt"));
        let b = cache.get("egypt").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn invalidate_and_clear() {
        let mut cache = SeriesCache::new();
        cache.insert("Egypt", series("Egypt"));
        cache.insert("Peru", series("Peru"));
        assert_eq!(cache.len(), 2);

        assert!(cache.invalidate("egypt"));
        assert!(!cache.invalidate("egypt"));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }
}
