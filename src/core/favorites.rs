use std::sync::Arc;

use crate::core::converter::registry::is_known_unit;
use crate::core::storage::{PersistenceStore, FAVORITES_KEY};
use crate::shared::types::{Favorite, UnitCategory};

/// Whether both units of a favorite still exist in the registry
pub fn is_selectable(fav: &Favorite) -> bool {
    is_known_unit(fav.category, &fav.from) && is_known_unit(fav.category, &fav.to)
}

/// Set of bookmarked unit pairs, most recently favorited first
pub struct FavoritesManager {
    entries: Vec<Favorite>,
    store: Arc<PersistenceStore>,
}

impl FavoritesManager {
    pub fn load(store: Arc<PersistenceStore>, prune_stale: bool) -> Self {
        let stored: Vec<Favorite> = store.load(FAVORITES_KEY).unwrap_or_default();

        // Persisted data is not trusted to be a set
        let mut entries: Vec<Favorite> = Vec::with_capacity(stored.len());
        for fav in stored {
            if prune_stale && !is_selectable(&fav) {
                tracing::info!("[FavoritesManager] Dropping stale favorite {} -> {} ({})", fav.from, fav.to, fav.category);
                continue;
            }
            if !entries.iter().any(|f| f.matches(&fav)) {
                entries.push(fav);
            }
        }

        tracing::info!("[FavoritesManager] Loaded {} favorites", entries.len());
        Self { entries, store }
    }

    /// Add the favorite when absent, remove it when present. Returns whether it is now a favorite.
    pub fn toggle(&mut self, fav: Favorite) -> bool {
        let now_favorite = match self.entries.iter().position(|f| f.matches(&fav)) {
            Some(index) => {
                self.entries.remove(index);
                false
            }
            None => {
                self.entries.insert(0, fav);
                true
            }
        };

        self.store.save(FAVORITES_KEY, &self.entries);
        tracing::debug!("[FavoritesManager] Toggled favorite, now {} entries", self.entries.len());
        now_favorite
    }

    /// The conversion context a favorite points at
    pub fn select(&self, fav: &Favorite) -> (UnitCategory, String, String) {
        (fav.category, fav.from.clone(), fav.to.clone())
    }

    pub fn contains(&self, fav: &Favorite) -> bool {
        self.entries.iter().any(|f| f.matches(fav))
    }

    pub fn entries(&self) -> &[Favorite] {
        &self.entries
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
    use crate::core::storage::tests::FailingStore;

    fn manager() -> FavoritesManager {
        FavoritesManager::load(Arc::new(PersistenceStore::in_memory()), true)
    }

    fn m_to_ft() -> Favorite {
        Favorite::new("Meters", "Feet", UnitCategory::Length)
    }

    #[test]
    fn test_toggle_adds_when_absent() {
        let mut favorites = manager();
        assert!(favorites.toggle(m_to_ft()));
        assert!(favorites.contains(&m_to_ft()));
        assert_eq!(favorites.len(), 1);
    }

    #[test]
    fn test_toggle_twice_restores_set() {
        let mut favorites = manager();
        favorites.toggle(Favorite::new("Celsius", "Kelvin", UnitCategory::Temperature));
        let before = favorites.entries().to_vec();

        favorites.toggle(m_to_ft());
        favorites.toggle(m_to_ft());

        assert_eq!(favorites.entries(), before.as_slice());
    }

    #[test]
    fn test_toggle_removes_when_present() {
        let mut favorites = manager();
        favorites.toggle(m_to_ft());
        assert!(!favorites.toggle(m_to_ft()));
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_newest_first_and_direction_matters() {
        let mut favorites = manager();
        favorites.toggle(m_to_ft());
        favorites.toggle(Favorite::new("Feet", "Meters", UnitCategory::Length));

        assert_eq!(favorites.len(), 2);
        assert_eq!(favorites.entries()[0].from, "Feet");
    }

    #[test]
    fn test_select_is_a_pure_read() {
        let mut favorites = manager();
        favorites.toggle(m_to_ft());

        let selected = favorites.select(&m_to_ft());

        assert_eq!(selected, (UnitCategory::Length, "Meters".to_string(), "Feet".to_string()));
        assert_eq!(favorites.len(), 1);
    }

    #[test]
    fn test_load_deduplicates_and_prunes() {
        let store = Arc::new(PersistenceStore::in_memory());
        let _ = store.load::<Vec<Favorite>>(FAVORITES_KEY);
        store.save(FAVORITES_KEY, &vec![
            m_to_ft(),
            m_to_ft(),
            Favorite::new("Stone", "Pounds", UnitCategory::Weight),
        ]);

        let favorites = FavoritesManager::load(store.clone(), true);
        assert_eq!(favorites.entries(), &[m_to_ft()]);

        let kept = FavoritesManager::load(store, false);
        assert_eq!(kept.len(), 2);
        assert!(!is_selectable(&kept.entries()[1]));
    }

    #[test]
    fn test_toggle_survives_failed_save() {
        let mut favorites = FavoritesManager::load(Arc::new(PersistenceStore::new(Arc::new(FailingStore))), true);

        assert!(favorites.toggle(m_to_ft()));
        assert!(favorites.contains(&m_to_ft()));

        assert!(!favorites.toggle(m_to_ft()));
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_toggle_persists() {
        let store = Arc::new(PersistenceStore::in_memory());
        let mut favorites = FavoritesManager::load(store.clone(), true);
        favorites.toggle(m_to_ft());

        let reloaded = FavoritesManager::load(store, true);
        assert_eq!(reloaded.entries(), &[m_to_ft()]);
    }
}
