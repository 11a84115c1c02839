use evcharge_core::directions_url_from;
use serde::Serialize;
use uuid::Uuid;

use crate::{PlanError, PlannedRoute, RouteAlternative, RouteRequest, validate};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum PlannerStatus {
    Idle,
    #[serde(rename_all = "camelCase")]
    Planning { request_id: Uuid },
    Planned { route: PlannedRoute },
    Failed { reason: String },
}

/// The route tab's state: Idle -> Planning -> Planned | Failed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSession {
    status: PlannerStatus,
    request: Option<RouteRequest>,
    selected_alternative: Option<u32>,
}

impl Default for RouteSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteSession {
    pub fn new() -> Self {
        RouteSession {
            status: PlannerStatus::Idle,
            request: None,
            selected_alternative: None,
        }
    }

    pub fn status(&self) -> &PlannerStatus {
        &self.status
    }

    pub fn request(&self) -> Option<&RouteRequest> {
        self.request.as_ref()
    }

    pub fn is_planning(&self) -> bool {
        matches!(self.status, PlannerStatus::Planning { .. })
    }

    pub fn route(&self) -> Option<&PlannedRoute> {
        match &self.status {
            PlannerStatus::Planned { route } => Some(route),
            _ => None,
        }
    }

    /// Enter `Planning` for `request`, returning the id its result must
    /// carry. On error nothing changes.
    pub fn begin(&mut self, request: RouteRequest) -> Result<Uuid, PlanError> {
        validate(&request)?;
        if self.is_planning() {
            return Err(PlanError::AlreadyPlanning);
        }
        let request_id = Uuid::new_v4();
        tracing::info!("Route request {} started", request_id);
        self.status = PlannerStatus::Planning { request_id };
        self.request = Some(request);
        self.selected_alternative = None;
        Ok(request_id)
    }

    /// Record the outcome of `request_id`. Outcomes of abandoned or
    /// superseded requests are dropped; returns whether it was applied.
    pub fn complete(
        &mut self,
        request_id: Uuid,
        outcome: Result<PlannedRoute, PlanError>,
    ) -> bool {
        match self.status {
            PlannerStatus::Planning { request_id: current } if current == request_id => {}
            _ => {
                tracing::debug!("Discarding result of stale route request {}", request_id);
                return false;
            }
        }
        self.status = match outcome {
            Ok(route) => {
                self.selected_alternative = route.alternatives.first().map(|a| a.id);
                tracing::info!("Route request {} planned", request_id);
                PlannerStatus::Planned { route }
            }
            Err(err) => {
                tracing::warn!("Route request {} failed: {}", request_id, err);
                PlannerStatus::Failed {
                    reason: err.to_string(),
                }
            }
        };
        true
    }

    /// Give up on an in-flight request; its result will be discarded.
    pub fn abandon(&mut self) {
        if let PlannerStatus::Planning { request_id } = self.status {
            tracing::info!("Route request {} abandoned", request_id);
            self.status = PlannerStatus::Idle;
        }
    }

    pub fn select_alternative(&mut self, id: u32) -> Result<&RouteAlternative, PlanError> {
        let route = self.route().ok_or(PlanError::NoRoute)?;
        if route.alternative(id).is_none() {
            return Err(PlanError::UnknownAlternative { id });
        }
        self.selected_alternative = Some(id);
        self.selected_alternative()
            .ok_or(PlanError::UnknownAlternative { id })
    }

    pub fn selected_alternative(&self) -> Option<&RouteAlternative> {
        let id = self.selected_alternative?;
        self.route()?.alternative(id)
    }

    /// Directions from the request origin to the first charging stop
    pub fn navigation_url(&self) -> Option<String> {
        let route = self.route()?;
        self.selected_alternative()?;
        let first_stop = route.recommended_stops.first()?;
        let origin = self.request.as_ref()?.origin.as_str();
        Some(directions_url_from(origin, first_stop.station.coordinates))
    }
}
