use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use evcharge_core::catalog::validate_catalog;
use evcharge_core::{
    Action, AppState, Coordinates, FilterField, GeolocationError, Geolocator, StationId, locate,
};
use serde::{Deserialize, Serialize};

use crate::{SharedState, error_response, lock};

/// Filter keys the filter form knows about
const FILTER_KEYS: [&str; 7] = [
    "status",
    "operator",
    "connectorType",
    "powerLevel",
    "priceRange",
    "amenities",
    "fastChargingOnly",
];

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterUpdateRequest {
    pub key: String,
    pub value: serde_json::Value,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesResponse {
    pub favorites: Vec<StationId>,
}

/// The outcome of a browser geolocation request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LocationReport {
    Position(Coordinates),
    Error(GeolocationError),
}

impl Geolocator for LocationReport {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        match self {
            LocationReport::Position(position) => Ok(*position),
            LocationReport::Error(err) => Err(err.clone()),
        }
    }
}

/// Get the full view state
pub async fn get_state(State(app_state): State<SharedState>) -> Json<AppState> {
    let state = lock(&app_state);
    Json(state.controller.state().clone())
}

/// Dispatch one user action to the reducer. A replacement catalog must
/// pass validation and is handed to the route planner as well.
pub async fn dispatch_action(
    State(app_state): State<SharedState>,
    Json(action): Json<Action>,
) -> Response {
    tracing::info!("Dispatching {}", action_name(&action));
    let mut state = lock(&app_state);
    if let Action::SetStations(stations) = &action {
        if let Err(err) = validate_catalog(stations) {
            tracing::warn!("Rejecting catalog: {}", err);
            return error_response(StatusCode::BAD_REQUEST, err.to_string()).into_response();
        }
        state.replace_catalog(stations.clone());
    }
    Json(state.controller.dispatch(action).clone()).into_response()
}

/// Update a single filter field. Unknown keys are ignored.
pub async fn update_filter(
    State(app_state): State<SharedState>,
    Json(payload): Json<FilterUpdateRequest>,
) -> Response {
    if !FILTER_KEYS.contains(&payload.key.as_str()) {
        tracing::debug!("Ignoring unknown filter key '{}'", payload.key);
        let state = lock(&app_state);
        return Json(state.controller.state().clone()).into_response();
    }

    let field = serde_json::json!({"key": payload.key, "value": payload.value});
    let field: FilterField = match serde_json::from_value(field) {
        Ok(field) => field,
        Err(err) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("Invalid value for filter '{}': {}", payload.key, err),
            )
            .into_response();
        }
    };

    tracing::info!("Updating filter {}", payload.key);
    let mut state = lock(&app_state);
    Json(state.controller.dispatch(Action::UpdateFilter(field)).clone()).into_response()
}

pub async fn get_favorites(State(app_state): State<SharedState>) -> Json<FavoritesResponse> {
    let state = lock(&app_state);
    Json(FavoritesResponse {
        favorites: state.controller.state().favorites.ids().to_vec(),
    })
}

/// Toggle a station in or out of the favorites, persisting the change
pub async fn toggle_favorite(
    State(app_state): State<SharedState>,
    Path(station_id): Path<StationId>,
) -> Json<FavoritesResponse> {
    tracing::info!("Toggling favorite {}", station_id);
    let mut state = lock(&app_state);
    let favorites = state
        .controller
        .dispatch(Action::ToggleFavorite(station_id))
        .favorites
        .ids()
        .to_vec();
    Json(FavoritesResponse { favorites })
}

/// Apply the result of the browser's geolocation request
pub async fn report_location(
    State(app_state): State<SharedState>,
    Json(report): Json<LocationReport>,
) -> Json<AppState> {
    let action = locate(&report).await;
    let mut state = lock(&app_state);
    Json(state.controller.dispatch(action).clone())
}

fn action_name(action: &Action) -> &'static str {
    match action {
        Action::SetStations(_) => "setStations",
        Action::SetSearchQuery(_) => "setSearchQuery",
        Action::UpdateFilter(_) => "updateFilter",
        Action::SetFilters(_) => "setFilters",
        Action::ClearFilters => "clearFilters",
        Action::SelectStation(_) => "selectStation",
        Action::SetUserLocation(_) => "setUserLocation",
        Action::SetMapCenter(_) => "setMapCenter",
        Action::SetMapZoom(_) => "setMapZoom",
        Action::SetActiveTab(_) => "setActiveTab",
        Action::ToggleFavorite(_) => "toggleFavorite",
        Action::SetLoading(_) => "setLoading",
        Action::SetError(_) => "setError",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_app;
    use crate::test_support::*;
    use axum::http::StatusCode;
    use evcharge_core::{Choice, PriceRange, StationStatus};
    use tower::util::ServiceExt;

    fn ids(state: &AppState) -> Vec<u32> {
        state.filtered_stations.iter().map(|s| s.id).collect()
    }

    #[tokio::test]
    async fn test_dispatch_status_filter() {
        let app = create_app(test_state());

        let response = app
            .oneshot(json_request(
                "POST",
                "/actions",
                serde_json::json!({
                    "type": "updateFilter",
                    "payload": {"key": "status", "value": "available"}
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let state: AppState = read_json(response).await;
        assert_eq!(state.filters.status, Choice::Only(StationStatus::Available));
        assert_eq!(ids(&state), vec![1, 3, 5, 7]);
    }

    #[tokio::test]
    async fn test_dispatch_unknown_action_is_rejected() {
        let app = create_app(test_state());

        let response = app
            .oneshot(json_request(
                "POST",
                "/actions",
                serde_json::json!({"type": "launchRocket"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    fn station_json(id: u32) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "name": "Maslak Şarj",
            "operator": "Voltrun",
            "address": "Maslak, Sarıyer/İstanbul",
            "coordinates": {"latitude": 41.11, "longitude": 29.02},
            "status": "available",
            "connectorType": "CCS",
            "power": "50 kW",
            "pricePerKwh": 11.5,
            "availableConnectors": 1,
            "totalConnectors": 2,
            "amenities": ["wifi"],
            "operatingHours": "24/7",
            "lastUpdated": "now",
            "rating": 4.1,
            "reviews": 12,
            "fastCharging": true
        })
    }

    #[tokio::test]
    async fn test_set_stations_rejects_invalid_catalog() {
        let app = create_app(test_state());

        let mut broken = station_json(9);
        broken["availableConnectors"] = 9.into();
        broken["rating"] = 42.into();
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/actions",
                serde_json::json!({"type": "setStations", "payload": [broken]}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: crate::ErrorResponse = read_json(response).await;
        assert!(error.error.contains("Station 9"));

        let response = app.oneshot(empty_request("GET", "/state")).await.unwrap();
        let state: AppState = read_json(response).await;
        assert_eq!(state.stations.len(), 8);
    }

    #[tokio::test]
    async fn test_set_stations_replaces_planner_catalog() {
        let app = create_app(test_state());

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/actions",
                serde_json::json!({"type": "setStations", "payload": [station_json(9)]}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let state: AppState = read_json(response).await;
        assert_eq!(ids(&state), vec![9]);

        // the canned itinerary stops at stations 1 and 5, gone from this catalog
        let response = app
            .oneshot(json_request(
                "POST",
                "/route/plan",
                serde_json::json!({"origin": "Levent", "destination": "Ankara"}),
            ))
            .await
            .unwrap();
        let session: serde_json::Value = read_json(response).await;
        assert_eq!(session["status"]["status"], "failed");
        assert_eq!(session["status"]["reason"], "Station 1 is not in the catalog");
    }

    #[tokio::test]
    async fn test_patch_filter() {
        let app = create_app(test_state());

        let response = app
            .oneshot(json_request(
                "PATCH",
                "/filters",
                serde_json::json!({"key": "priceRange", "value": [0, 10]}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let state: AppState = read_json(response).await;
        assert_eq!(state.filters.price_range, PriceRange::new(0.0, 10.0));
        assert_eq!(ids(&state), vec![3, 8]);
    }

    #[tokio::test]
    async fn test_patch_unknown_filter_key_is_ignored() {
        let app = create_app(test_state());

        let response = app
            .oneshot(json_request(
                "PATCH",
                "/filters",
                serde_json::json!({"key": "colour", "value": "blue"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let state: AppState = read_json(response).await;
        assert_eq!(ids(&state), vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[tokio::test]
    async fn test_patch_filter_with_bad_value() {
        let app = create_app(test_state());

        let response = app
            .oneshot(json_request(
                "PATCH",
                "/filters",
                serde_json::json!({"key": "status", "value": "exploded"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: crate::ErrorResponse = read_json(response).await;
        assert!(error.error.contains("status"));
    }

    #[tokio::test]
    async fn test_clear_filters() {
        let app = create_app(test_state());

        app.clone()
            .oneshot(json_request(
                "POST",
                "/actions",
                serde_json::json!({"type": "setSearchQuery", "payload": "taksim"}),
            ))
            .await
            .unwrap();

        let response = app
            .oneshot(json_request(
                "POST",
                "/actions",
                serde_json::json!({"type": "clearFilters"}),
            ))
            .await
            .unwrap();

        let state: AppState = read_json(response).await;
        assert_eq!(state.search_query, "");
        assert_eq!(state.filtered_stations.len(), 8);
    }

    #[tokio::test]
    async fn test_toggle_favorite_twice() {
        let app = create_app(test_state());

        let response = app
            .clone()
            .oneshot(empty_request("POST", "/favorites/3/toggle"))
            .await
            .unwrap();
        let favorites: FavoritesResponse = read_json(response).await;
        assert_eq!(favorites.favorites, vec![1, 5]);

        app.clone()
            .oneshot(empty_request("POST", "/favorites/3/toggle"))
            .await
            .unwrap();

        let response = app
            .oneshot(empty_request("GET", "/favorites"))
            .await
            .unwrap();
        let favorites: FavoritesResponse = read_json(response).await;
        assert_eq!(favorites.favorites, vec![1, 5, 3]);
    }

    #[tokio::test]
    async fn test_report_location() {
        let app = create_app(test_state());

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/location",
                serde_json::json!({"position": {"latitude": 41.03, "longitude": 28.98}}),
            ))
            .await
            .unwrap();
        let state: AppState = read_json(response).await;
        assert_eq!(state.user_location, Some(Coordinates::new(41.03, 28.98)));
        assert_eq!(state.error, None);

        let response = app
            .oneshot(json_request(
                "POST",
                "/location",
                serde_json::json!({"error": "permissionDenied"}),
            ))
            .await
            .unwrap();
        let state: AppState = read_json(response).await;
        assert!(state.error.is_some());
        // the last good fix is kept
        assert_eq!(state.user_location, Some(Coordinates::new(41.03, 28.98)));
    }
}
