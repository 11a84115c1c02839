//! What the map renderer needs from the application: a view, one marker per
//! visible station and the action a marker click dispatches.

use serde::Serialize;

use crate::models::{Coordinates, Station, StationId, StationStatus};
use crate::state::{Action, AppState};

pub const MARKER_SIZE: u32 = 30;
pub const SELECTED_MARKER_SIZE: u32 = 40;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub station_id: StationId,
    pub coordinates: Coordinates,
    pub status: StationStatus,
    pub color: &'static str,
    pub size: u32,
    pub selected: bool,
    pub favorite: bool,
}

impl Marker {
    pub fn for_station(station: &Station, selected: bool, favorite: bool) -> Self {
        Marker {
            station_id: station.id,
            coordinates: station.coordinates,
            status: station.status,
            color: station.status.marker_color(),
            size: if selected {
                SELECTED_MARKER_SIZE
            } else {
                MARKER_SIZE
            },
            selected,
            favorite,
        }
    }

    pub fn on_click(&self) -> Action {
        Action::SelectStation(Some(self.station_id))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
    pub markers: Vec<Marker>,
    pub user_location: Option<Coordinates>,
}

pub fn map_view(state: &AppState) -> MapView {
    let markers = state
        .filtered_stations
        .iter()
        .map(|station| {
            Marker::for_station(
                station,
                state.selected_station == Some(station.id),
                state.is_favorite(station.id),
            )
        })
        .collect();
    MapView {
        center: state.map_center,
        zoom: state.map_zoom,
        markers,
        user_location: state.user_location,
    }
}
