use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use evcharge_core::catalog::{CONNECTOR_TYPES, ConnectorInfo, OPERATORS};
use evcharge_core::{
    Amenity, ListSort, MapView, PowerLevel, SortKey, SortOrder, Station, StationId, StationStatus,
    directions_url, map_view, share_text, visible_list,
};
use evcharge_planner::{Destination, POPULAR_DESTINATIONS};
use serde::{Deserialize, Serialize};

use crate::{SharedState, error_response, lock};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorOption {
    pub id: &'static str,
    pub name: &'static str,
    pub color: &'static str,
    /// What to send as the operator filter value
    pub filter_value: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerLevelOption {
    pub id: PowerLevel,
    pub min_kw: u32,
    pub max_kw: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmenityOption {
    pub id: Amenity,
    pub icon: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusOption {
    pub id: StationStatus,
    pub label: &'static str,
    pub color: &'static str,
}

/// Vocabulary of the filter form and the route planner form
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub operators: Vec<OperatorOption>,
    pub connector_types: Vec<ConnectorInfo>,
    pub power_levels: Vec<PowerLevelOption>,
    pub amenities: Vec<AmenityOption>,
    pub statuses: Vec<StatusOption>,
    pub popular_destinations: Vec<Destination>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListQuery {
    pub sort: Option<String>,
    pub order: Option<String>,
    pub favorites_only: bool,
}

impl ListQuery {
    /// Unknown sort keys fall back to catalog order, unknown orders to
    /// ascending.
    fn list_sort(&self) -> Option<ListSort> {
        let key = self.sort.as_deref()?.parse::<SortKey>().ok()?;
        let order = self
            .order
            .as_deref()
            .and_then(|order| order.parse::<SortOrder>().ok())
            .unwrap_or_default();
        Some(ListSort::new(key, order))
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionsResponse {
    pub url: String,
    pub share_text: String,
}

pub async fn get_filter_options() -> Json<FilterOptions> {
    Json(FilterOptions {
        operators: OPERATORS
            .iter()
            .map(|operator| OperatorOption {
                id: operator.id,
                name: operator.name,
                color: operator.color,
                filter_value: operator.filter_value(),
            })
            .collect(),
        connector_types: CONNECTOR_TYPES.to_vec(),
        power_levels: PowerLevel::ALL
            .iter()
            .map(|&level| {
                let (min_kw, max_kw) = level.range_kw();
                PowerLevelOption {
                    id: level,
                    min_kw,
                    max_kw,
                }
            })
            .collect(),
        amenities: Amenity::ALL
            .iter()
            .map(|&amenity| AmenityOption {
                id: amenity,
                icon: amenity.icon(),
            })
            .collect(),
        statuses: StationStatus::ALL
            .iter()
            .map(|&status| StatusOption {
                id: status,
                label: status.label(),
                color: status.marker_color(),
            })
            .collect(),
        popular_destinations: POPULAR_DESTINATIONS.to_vec(),
    })
}

/// The station list as the list view shows it
pub async fn list_stations(
    State(app_state): State<SharedState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<Station>> {
    tracing::info!("Listing stations");
    let state = lock(&app_state);
    let stations = visible_list(state.controller.state(), query.list_sort(), query.favorites_only)
        .into_iter()
        .cloned()
        .collect();
    Json(stations)
}

pub async fn get_station(
    State(app_state): State<SharedState>,
    Path(station_id): Path<StationId>,
) -> Response {
    let state = lock(&app_state);
    match state.controller.state().station(station_id) {
        Some(station) => Json(station.clone()).into_response(),
        None => station_not_found(station_id).into_response(),
    }
}

/// Navigation link and share text for one station
pub async fn get_directions(
    State(app_state): State<SharedState>,
    Path(station_id): Path<StationId>,
) -> Response {
    let state = lock(&app_state);
    let Some(station) = state.controller.state().station(station_id) else {
        return station_not_found(station_id).into_response();
    };
    Json(DirectionsResponse {
        url: directions_url(station.coordinates),
        share_text: share_text(station),
    })
    .into_response()
}

pub async fn get_markers(State(app_state): State<SharedState>) -> Json<MapView> {
    let state = lock(&app_state);
    Json(map_view(state.controller.state()))
}

fn station_not_found(station_id: StationId) -> impl IntoResponse {
    tracing::warn!("Station {} not found", station_id);
    error_response(
        StatusCode::NOT_FOUND,
        format!("Station {} not found", station_id),
    )
}
