use std::sync::Arc;

use crate::core::converter::registry::is_known_unit;
use crate::core::storage::{PersistenceStore, HISTORY_KEY};
use crate::shared::settings::DEFAULT_HISTORY_LIMIT;
use crate::shared::types::{ConversionRecord, ConversionSide, Favorite, UnitCategory};

/// Bounded, most-recent-first log of conversions, persisted on every change
pub struct HistoryManager {
    entries: Vec<ConversionRecord>,
    limit: usize,
    store: Arc<PersistenceStore>,
}

impl HistoryManager {
    /// Load persisted history. Stale records are dropped when `prune_stale` is set.
    pub fn load(store: Arc<PersistenceStore>, limit: usize, prune_stale: bool) -> Self {
        if limit == 0 {
            tracing::warn!("[HistoryManager] History limit of 0 is not usable, keeping 1 record");
        }
        let limit = limit.max(1);
        let mut entries: Vec<ConversionRecord> = store.load(HISTORY_KEY).unwrap_or_default();

        if prune_stale {
            let before = entries.len();
            entries.retain(|r| is_known_unit(r.category, &r.from.unit) && is_known_unit(r.category, &r.to.unit));
            if entries.len() < before {
                tracing::info!("[HistoryManager] Dropped {} stale records", before - entries.len());
            }
        }
        entries.truncate(limit);

        tracing::info!("[HistoryManager] Loaded {} records", entries.len());
        Self { entries, limit, store }
    }

    pub fn with_default_limit(store: Arc<PersistenceStore>) -> Self {
        Self::load(store, DEFAULT_HISTORY_LIMIT, true)
    }

    /// Record one conversion: fresh id and timestamp, prepended, capped
    pub fn record(&mut self, from: ConversionSide, to: ConversionSide, category: UnitCategory) -> &ConversionRecord {
        let record = ConversionRecord::new(from, to, category);
        tracing::debug!("[HistoryManager] Recorded {}", record.id);

        self.entries.insert(0, record);
        self.entries.truncate(self.limit);
        self.persist();
        &self.entries[0]
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
        tracing::info!("[HistoryManager] Cleared history");
    }

    pub fn entries(&self) -> &[ConversionRecord] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&ConversionRecord> {
        self.entries.iter().find(|r| r.id == id)
    }

    /// The unit pair of a history row as a favorite
    pub fn favorite_from(&self, id: &str) -> Option<Favorite> {
        self.get(id)
            .map(|r| Favorite::new(r.from.unit.clone(), r.to.unit.clone(), r.category))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) {
        self.store.save(HISTORY_KEY, &self.entries);
    }
}
