//! EV charging station finder host
//!
//! Serves the view state to the browser presentation layer over HTTP and
//! forwards its user events to the reducer.

pub mod config;
mod route;
mod station;
mod view;

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, patch, post, put},
};
use evcharge_core::{Controller, Favorites, KeyValueStore, Station};
use evcharge_planner::{RoutePlanner, RouteSession, TokioScheduler};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;

pub type FavoritesBackend = Box<dyn KeyValueStore + Send>;

/// Everything the handlers share
pub struct ApiState {
    controller: Controller<FavoritesBackend>,
    route: RouteSession,
    planner: Arc<RoutePlanner<TokioScheduler>>,
}

impl ApiState {
    pub fn new(config: &AppConfig, stations: Vec<Station>, store: FavoritesBackend) -> Self {
        let planner = RoutePlanner::new(TokioScheduler, stations.clone())
            .with_delay(config.planning_delay());
        let controller = Controller::new(
            stations,
            store,
            Favorites::from_ids(config.seed_favorites.iter().copied()),
        )
        .with_map_view(config.map_center, config.map_zoom);
        ApiState {
            controller,
            route: RouteSession::new(),
            planner: Arc::new(planner),
        }
    }

    /// Point the route planner at a new catalog. Plans already in flight
    /// finish against the catalog they started with.
    pub(crate) fn replace_catalog(&mut self, stations: Vec<Station>) {
        let planner = RoutePlanner::new(TokioScheduler, stations).with_delay(self.planner.delay());
        self.planner = Arc::new(planner);
    }
}

pub type SharedState = Arc<Mutex<ApiState>>;

/// A panicked handler leaves the state consistent (every transition is a
/// whole-value swap), so a poisoned lock is still usable.
pub(crate) fn lock(state: &SharedState) -> MutexGuard<'_, ApiState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
}

pub(crate) fn error_response(
    status: StatusCode,
    message: impl Into<String>,
) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

/// Create the application router with all endpoints
pub fn create_app(app_state: ApiState) -> Router {
    let shared_state = Arc::new(Mutex::new(app_state));
    Router::new()
        .route("/health", get(health_check))
        .route("/state", get(view::get_state))
        .route("/actions", post(view::dispatch_action))
        .route("/filters", patch(view::update_filter))
        .route("/options", get(station::get_filter_options))
        .route("/stations", get(station::list_stations))
        .route("/stations/{station_id}", get(station::get_station))
        .route(
            "/stations/{station_id}/directions",
            get(station::get_directions),
        )
        .route("/markers", get(station::get_markers))
        .route("/favorites", get(view::get_favorites))
        .route(
            "/favorites/{station_id}/toggle",
            post(view::toggle_favorite),
        )
        .route("/location", post(view::report_location))
        .route("/route", get(route::get_route))
        .route("/route/plan", post(route::plan_route))
        .route("/route/selection", put(route::select_alternative))
        .route("/route/navigation", get(route::get_navigation))
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state)
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use axum::http::StatusCode;
    use tower::util::ServiceExt;

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_app(test_state());

        let response = app
            .oneshot(empty_request("GET", "/health"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_integration_search_then_favorite_then_list() {
        let app = create_app(test_state());

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/actions",
                serde_json::json!({"type": "setSearchQuery", "payload": "Kadıköy"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(empty_request("POST", "/favorites/6/toggle"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(empty_request("GET", "/stations?favoritesOnly=true"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let stations: Vec<Station> = read_json(response).await;
        let ids: Vec<u32> = stations.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![6]);
    }

    #[tokio::test]
    async fn test_integration_plan_route_then_navigate() {
        let app = create_app(test_state());

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/route/plan",
                serde_json::json!({"origin": "Levent", "destination": "Ankara"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(empty_request("GET", "/route/navigation"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = read_json(response).await;
        assert_eq!(
            body["url"],
            "https://www.google.com/maps/dir/?api=1&origin=Levent&destination=41.0858,29.015&travelmode=driving"
        );
    }
}
