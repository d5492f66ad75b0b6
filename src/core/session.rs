//! Converter session: the single owner of all converter state
//!
//! A `Session` is created at session start (loading persisted lists) and torn
//! down by dropping it. It consumes user events serially; typed edits are only
//! converted once they settle through the debouncer owned by `SessionRuntime`.

use std::sync::Arc;
use std::time::Duration;

use crate::core::converter::{self, format_result, registry};
use crate::core::debounce::Debouncer;
use crate::core::favorites::{is_selectable, FavoritesManager};
use crate::core::history::HistoryManager;
use crate::core::input::{parse_numeric, strip_grouping, InputBuffer, INITIAL_INPUT};
use crate::core::storage::PersistenceStore;
use crate::shared::events::SessionEvent;
use crate::shared::settings::AppSettings;
use crate::shared::types::{ConversionSide, Favorite, SessionView, UnitCategory};

const START_CATEGORY: UnitCategory = UnitCategory::Length;
const START_FROM: &str = "Meters";
const START_TO: &str = "Feet";

/// What the runtime must do with the debouncer after an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Followup {
    Nothing,
    /// The raw input changed; convert it once it settles
    Debounce(String),
    /// The input was replaced and converted directly; drop any pending edit
    CancelDebounce,
}

pub struct Session {
    category: UnitCategory,
    from_unit: String,
    to_unit: String,
    input: InputBuffer,
    settled_input: String,
    output: String,
    history: HistoryManager,
    favorites: FavoritesManager,
}

impl Session {
    /// Load persisted lists and show the initial conversion
    pub fn open(store: Arc<PersistenceStore>, settings: &AppSettings) -> Self {
        let history = HistoryManager::load(store.clone(), settings.history_limit, settings.prune_stale_entries);
        let favorites = FavoritesManager::load(store, settings.prune_stale_entries);

        let mut session = Self {
            category: START_CATEGORY,
            from_unit: START_FROM.to_string(),
            to_unit: START_TO.to_string(),
            input: InputBuffer::default(),
            settled_input: INITIAL_INPUT.to_string(),
            output: String::new(),
            history,
            favorites,
        };
        session.convert_settled();
        session
    }

    pub fn apply(&mut self, event: SessionEvent) -> Followup {
        tracing::debug!("[Session] Event: {:?}", event);

        match event {
            SessionEvent::SelectCategory(category) => {
                self.set_category(category);
                self.replace_input(INITIAL_INPUT.to_string());
                Followup::CancelDebounce
            }
            SessionEvent::SelectFromUnit(unit) => {
                if self.accept_unit(&unit) {
                    self.from_unit = unit;
                    self.convert_settled();
                }
                Followup::Nothing
            }
            SessionEvent::SelectToUnit(unit) => {
                if self.accept_unit(&unit) {
                    self.to_unit = unit;
                    self.convert_settled();
                }
                Followup::Nothing
            }
            SessionEvent::Keypad(key) => {
                self.input.press(key);
                Followup::Debounce(self.input.as_str().to_string())
            }
            SessionEvent::Type(text) => {
                self.input.set(text);
                Followup::Debounce(self.input.as_str().to_string())
            }
            SessionEvent::SwapUnits => {
                std::mem::swap(&mut self.from_unit, &mut self.to_unit);
                let next_input = strip_grouping(&self.output);
                self.replace_input(next_input);
                Followup::CancelDebounce
            }
            SessionEvent::ToggleCurrentFavorite => {
                let fav = self.current_favorite();
                self.favorites.toggle(fav);
                Followup::Nothing
            }
            SessionEvent::ToggleFavoriteFromHistory(id) => {
                match self.history.favorite_from(&id) {
                    Some(fav) => {
                        self.favorites.toggle(fav);
                    }
                    None => tracing::warn!("[Session] No history record with id {}", id),
                }
                Followup::Nothing
            }
            SessionEvent::ToggleFavorite(fav) => {
                self.favorites.toggle(fav);
                Followup::Nothing
            }
            SessionEvent::ClearHistory => {
                self.history.clear();
                Followup::Nothing
            }
            SessionEvent::SelectFavorite(fav) => {
                self.select_favorite(&fav);
                Followup::Nothing
            }
            SessionEvent::Reset => {
                self.reset();
                Followup::CancelDebounce
            }
        }
    }

    /// A debounced edit survived its window
    pub fn settle(&mut self, value: String) {
        self.settled_input = value;
        self.convert_settled();
    }

    /// Back to the start state. Persisted lists are untouched.
    pub fn reset(&mut self) {
        self.category = START_CATEGORY;
        self.from_unit = START_FROM.to_string();
        self.to_unit = START_TO.to_string();
        self.replace_input(INITIAL_INPUT.to_string());
        tracing::info!("[Session] Reset");
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            category: self.category,
            from_unit: self.from_unit.clone(),
            to_unit: self.to_unit.clone(),
            input_value: self.input.as_str().to_string(),
            output_value: self.output.clone(),
            history: self.history.entries().to_vec(),
            favorites: self.favorites.entries().to_vec(),
            is_current_favorite: self.is_current_favorite(),
        }
    }

    pub fn category(&self) -> UnitCategory {
        self.category
    }

    pub fn from_unit(&self) -> &str {
        &self.from_unit
    }

    pub fn to_unit(&self) -> &str {
        &self.to_unit
    }

    pub fn input(&self) -> &str {
        self.input.as_str()
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn favorites(&self) -> &FavoritesManager {
        &self.favorites
    }

    pub fn is_current_favorite(&self) -> bool {
        self.favorites.contains(&self.current_favorite())
    }

    fn current_favorite(&self) -> Favorite {
        Favorite::new(self.from_unit.clone(), self.to_unit.clone(), self.category)
    }

    fn accept_unit(&self, unit: &str) -> bool {
        let known = registry::is_known_unit(self.category, unit);
        if !known {
            tracing::warn!("[Session] Ignoring unknown {} unit: {}", self.category, unit);
        }
        known
    }

    /// Switch category, keeping units that are valid for it
    fn set_category(&mut self, category: UnitCategory) {
        self.category = category;
        let (default_from, default_to) = registry::default_pair(category);
        if !registry::is_known_unit(category, &self.from_unit) {
            self.from_unit = default_from.to_string();
        }
        if !registry::is_known_unit(category, &self.to_unit) {
            self.to_unit = default_to.to_string();
        }
    }

    /// Replace the input and convert it immediately, bypassing the debounce window
    fn replace_input(&mut self, value: String) {
        self.input.set(value.clone());
        self.settle(value);
    }

    fn select_favorite(&mut self, fav: &Favorite) {
        if !is_selectable(fav) {
            tracing::warn!("[Session] Favorite {} -> {} ({}) references unknown units", fav.from, fav.to, fav.category);
            return;
        }

        let (category, from, to) = self.favorites.select(fav);
        self.category = category;
        self.from_unit = from;
        self.to_unit = to;
        self.convert_settled();
    }

    /// Convert the settled input; a successful conversion is displayed and recorded
    fn convert_settled(&mut self) {
        let Some(value) = parse_numeric(&self.settled_input) else {
            self.output.clear();
            return;
        };

        match converter::convert(value, &self.from_unit, &self.to_unit, self.category) {
            Ok(result) => {
                self.output = format_result(result);
                self.history.record(
                    ConversionSide::new(self.settled_input.clone(), self.from_unit.clone()),
                    ConversionSide::new(self.output.clone(), self.to_unit.clone()),
                    self.category,
                );
            }
            Err(e) => {
                tracing::warn!("[Session] Conversion failed: {}", e);
                self.output.clear();
            }
        }
    }
}

/// Drives a `Session` with a debouncer on the current tokio runtime
pub struct SessionRuntime {
    session: Session,
    debouncer: Debouncer<String>,
}

impl SessionRuntime {
    pub fn new(session: Session, window: Duration) -> Self {
        Self {
            session,
            debouncer: Debouncer::new(window),
        }
    }

    pub fn open(store: Arc<PersistenceStore>, settings: &AppSettings) -> Self {
        let session = Session::open(store, settings);
        Self::new(session, Duration::from_millis(settings.debounce_ms))
    }

    pub fn dispatch(&mut self, event: SessionEvent) {
        match self.session.apply(event) {
            Followup::Debounce(value) => self.debouncer.push(value),
            Followup::CancelDebounce => self.debouncer.cancel(),
            Followup::Nothing => {}
        }
    }

    /// Wait for the next settled edit and convert it. Cancel-safe.
    pub async fn process_settled(&mut self) -> Option<()> {
        let value = self.debouncer.settled().await?;
        self.session.settle(value);
        Some(())
    }

    pub fn has_pending_edit(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn view(&self) -> SessionView {
        self.session.view()
    }
}
