use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use evcharge_planner::{PlanError, PlannerStatus, RouteRequest, RouteSession};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{SharedState, error_response, lock};

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectAlternativeRequest {
    pub alternative_id: u32,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationResponse {
    pub url: String,
}

fn plan_error_to_response(err: PlanError) -> Response {
    let status = match err {
        PlanError::MissingOrigin | PlanError::MissingDestination => StatusCode::BAD_REQUEST,
        PlanError::AlreadyPlanning | PlanError::NoRoute => StatusCode::CONFLICT,
        PlanError::StationNotFound { .. } | PlanError::UnknownAlternative { .. } => {
            StatusCode::NOT_FOUND
        }
    };
    error_response(status, err.to_string()).into_response()
}

/// Returns the session to idle if the handler is dropped (client gone)
/// while its request is still planning.
struct AbandonOnDrop {
    app_state: SharedState,
    request_id: Uuid,
}

impl Drop for AbandonOnDrop {
    fn drop(&mut self) {
        let mut state = lock(&self.app_state);
        if let PlannerStatus::Planning { request_id } = state.route.status() {
            if *request_id == self.request_id {
                state.route.abandon();
            }
        }
    }
}

pub async fn get_route(State(app_state): State<SharedState>) -> Json<RouteSession> {
    let state = lock(&app_state);
    Json(state.route.clone())
}

/// Plan a trip. Responds once the planner has finished, with the session
/// in its final state.
pub async fn plan_route(
    State(app_state): State<SharedState>,
    Json(request): Json<RouteRequest>,
) -> Response {
    let planner = lock(&app_state).planner.clone();

    let pending = match planner.plan(&request) {
        Ok(pending) => pending,
        Err(err) => return plan_error_to_response(err),
    };

    let begun = {
        let mut state = lock(&app_state);
        state.route.begin(request)
    };
    let request_id = match begun {
        Ok(request_id) => request_id,
        Err(err) => return plan_error_to_response(err),
    };

    let _abandon = AbandonOnDrop {
        app_state: app_state.clone(),
        request_id,
    };
    let outcome = pending.await;

    let session = {
        let mut state = lock(&app_state);
        state.route.complete(request_id, outcome);
        state.route.clone()
    };
    Json(session).into_response()
}

pub async fn select_alternative(
    State(app_state): State<SharedState>,
    Json(payload): Json<SelectAlternativeRequest>,
) -> Response {
    tracing::info!("Selecting route alternative {}", payload.alternative_id);
    let mut state = lock(&app_state);
    if let Err(err) = state.route.select_alternative(payload.alternative_id) {
        return plan_error_to_response(err);
    }
    Json(state.route.clone()).into_response()
}

pub async fn get_navigation(State(app_state): State<SharedState>) -> Response {
    let state = lock(&app_state);
    match state.route.navigation_url() {
        Some(url) => Json(NavigationResponse { url }).into_response(),
        None => plan_error_to_response(PlanError::NoRoute),
    }
}
