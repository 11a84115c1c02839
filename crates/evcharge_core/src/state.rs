//! The view-state controller: one `AppState` value, advanced by a pure
//! reducer, with the filtered station list kept in sync on every
//! transition that can change it.

use serde::{Deserialize, Serialize};

use crate::favorites::{Favorites, KeyValueStore, load_favorites, save_favorites};
use crate::filter::apply_filters;
use crate::models::{Coordinates, FilterCriteria, FilterField, Station, StationId};

/// İstanbul city centre
pub const DEFAULT_MAP_CENTER: Coordinates = Coordinates::new(41.0082, 28.9784);
pub const DEFAULT_MAP_ZOOM: u8 = 12;
/// Zoom used when the map focuses a single station
pub const STATION_FOCUS_ZOOM: u8 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveTab {
    #[default]
    Map,
    List,
    Route,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub stations: Vec<Station>,
    /// Always `apply_filters(stations, search_query, filters)`
    pub filtered_stations: Vec<Station>,
    pub selected_station: Option<StationId>,
    pub user_location: Option<Coordinates>,
    pub favorites: Favorites,
    pub filters: FilterCriteria,
    pub search_query: String,
    pub map_center: Coordinates,
    pub map_zoom: u8,
    pub active_tab: ActiveTab,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        AppState {
            stations: Vec::new(),
            filtered_stations: Vec::new(),
            selected_station: None,
            user_location: None,
            favorites: Favorites::default(),
            filters: FilterCriteria::default(),
            search_query: String::new(),
            map_center: DEFAULT_MAP_CENTER,
            map_zoom: DEFAULT_MAP_ZOOM,
            active_tab: ActiveTab::default(),
            is_loading: false,
            error: None,
        }
    }
}

impl AppState {
    pub fn new(stations: Vec<Station>, favorites: Favorites) -> Self {
        let mut state = AppState {
            stations,
            favorites,
            ..AppState::default()
        };
        state.refilter();
        state
    }

    pub fn with_map_view(mut self, center: Coordinates, zoom: u8) -> Self {
        self.map_center = center;
        self.map_zoom = zoom;
        self
    }

    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.stations.iter().find(|station| station.id == id)
    }

    pub fn selected(&self) -> Option<&Station> {
        self.selected_station.and_then(|id| self.station(id))
    }

    pub fn is_favorite(&self, id: StationId) -> bool {
        self.favorites.contains(id)
    }

    fn refilter(&mut self) {
        self.filtered_stations = apply_filters(&self.stations, &self.search_query, &self.filters)
            .into_iter()
            .cloned()
            .collect();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Action {
    SetStations(Vec<Station>),
    SetSearchQuery(String),
    UpdateFilter(FilterField),
    SetFilters(FilterCriteria),
    /// Reset the filters and the search query together
    ClearFilters,
    SelectStation(Option<StationId>),
    SetUserLocation(Option<Coordinates>),
    SetMapCenter(Coordinates),
    SetMapZoom(u8),
    SetActiveTab(ActiveTab),
    ToggleFavorite(StationId),
    SetLoading(bool),
    SetError(Option<String>),
}

/// Work the caller must carry out after a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    PersistFavorites(Favorites),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: AppState,
    pub effect: Option<Effect>,
}

pub fn reduce(mut state: AppState, action: Action) -> Transition {
    let mut effect = None;
    let mut refilter = false;

    match action {
        Action::SetStations(stations) => {
            state.stations = stations;
            if state.selected().is_none() {
                state.selected_station = None;
            }
            refilter = true;
        }
        Action::SetSearchQuery(query) => {
            state.search_query = query;
            refilter = true;
        }
        Action::UpdateFilter(field) => {
            state.filters.update(field);
            refilter = true;
        }
        Action::SetFilters(filters) => {
            state.filters = filters;
            refilter = true;
        }
        Action::ClearFilters => {
            state.filters = FilterCriteria::default();
            state.search_query.clear();
            refilter = true;
        }
        Action::SelectStation(None) => state.selected_station = None,
        Action::SelectStation(Some(id)) => match state.station(id).map(|s| s.coordinates) {
            Some(coordinates) => {
                state.selected_station = Some(id);
                state.map_center = coordinates;
                state.map_zoom = STATION_FOCUS_ZOOM;
            }
            None => tracing::debug!("Ignoring selection of unknown station {}", id),
        },
        Action::SetUserLocation(location) => state.user_location = location,
        Action::SetMapCenter(center) => state.map_center = center,
        Action::SetMapZoom(zoom) => state.map_zoom = zoom,
        Action::SetActiveTab(tab) => state.active_tab = tab,
        Action::ToggleFavorite(id) => {
            state.favorites = state.favorites.toggle(id);
            effect = Some(Effect::PersistFavorites(state.favorites.clone()));
        }
        Action::SetLoading(loading) => state.is_loading = loading,
        Action::SetError(error) => state.error = error,
    }

    if refilter {
        state.refilter();
        tracing::debug!(
            "Recomputed visible stations: {} of {}",
            state.filtered_stations.len(),
            state.stations.len()
        );
    }

    Transition { state, effect }
}

/// Owns the application state and the store favorites persist to.
///
/// Every action runs to completion, effects included, before `dispatch`
/// returns.
#[derive(Debug)]
pub struct Controller<S> {
    state: AppState,
    store: S,
}

impl<S: KeyValueStore> Controller<S> {
    /// Restore favorites from `store` (or `default_favorites`) and build the
    /// initial state over `stations`.
    pub fn new(stations: Vec<Station>, store: S, default_favorites: Favorites) -> Self {
        let favorites = load_favorites(&store, default_favorites);
        Controller {
            state: AppState::new(stations, favorites),
            store,
        }
    }

    pub fn with_map_view(mut self, center: Coordinates, zoom: u8) -> Self {
        self.state = std::mem::take(&mut self.state).with_map_view(center, zoom);
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn dispatch(&mut self, action: Action) -> &AppState {
        let Transition { state, effect } = reduce(std::mem::take(&mut self.state), action);
        self.state = state;

        if let Some(Effect::PersistFavorites(favorites)) = effect {
            tracing::info!("Favorites changed: {:?}", favorites.ids());
            if let Err(err) = save_favorites(&mut self.store, &favorites) {
                // The in-memory change stands; it is retried on the next toggle
                tracing::error!("Could not persist favorites: {}", err);
            }
        }
        &self.state
    }
}
