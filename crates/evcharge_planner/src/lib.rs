//! Route planner for EV trips.
//!
//! Planning is simulated: a valid request resolves after a fixed delay to
//! the same itinerary whatever the origin, destination or vehicle. The
//! delay goes through a [`Scheduler`] so callers control the clock.

mod models;
mod session;

pub use crate::models::*;
pub use crate::session::*;

use std::future::Future;
use std::time::Duration;

use evcharge_core::Station;
use thiserror::Error;

/// Simulated planning latency
pub const DEFAULT_PLANNING_DELAY: Duration = Duration::from_secs(2);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("Please enter a starting point")]
    MissingOrigin,
    #[error("Please enter a destination")]
    MissingDestination,
    #[error("A route is already being planned")]
    AlreadyPlanning,
    #[error("Station {station_id} is not in the catalog")]
    StationNotFound { station_id: u32 },
    #[error("Route alternative {id} does not exist")]
    UnknownAlternative { id: u32 },
    #[error("No route has been planned yet")]
    NoRoute,
}

/// Waits on behalf of the planner
pub trait Scheduler: Send + Sync {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Sleeps on the tokio timer, which tests can pause and advance.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}

/// Checked before anything else happens; a rejected request never starts
/// planning.
pub fn validate(request: &RouteRequest) -> Result<(), PlanError> {
    if request.origin.trim().is_empty() {
        return Err(PlanError::MissingOrigin);
    }
    if request.destination.trim().is_empty() {
        return Err(PlanError::MissingDestination);
    }
    Ok(())
}

pub struct RoutePlanner<S> {
    scheduler: S,
    delay: Duration,
    catalog: Vec<Station>,
}

impl<S: Scheduler> RoutePlanner<S> {
    pub fn new(scheduler: S, catalog: Vec<Station>) -> Self {
        RoutePlanner {
            scheduler,
            delay: DEFAULT_PLANNING_DELAY,
            catalog,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Validate `request` now and return the pending plan.
    ///
    /// Dropping the returned future abandons the request.
    pub fn plan<'a>(
        &'a self,
        request: &RouteRequest,
    ) -> Result<impl Future<Output = Result<PlannedRoute, PlanError>> + Send + use<'a, S>, PlanError>
    {
        validate(request)?;
        tracing::info!(
            "Planning route from '{}' to '{}'",
            request.origin,
            request.destination
        );
        Ok(async move {
            self.scheduler.sleep(self.delay).await;
            fixed_route(&self.catalog)
        })
    }

    /// Drive `session` through a full planning cycle.
    pub async fn run(
        &self,
        session: &mut RouteSession,
        request: RouteRequest,
    ) -> Result<PlannedRoute, PlanError> {
        let pending = self.plan(&request)?;
        let request_id = session.begin(request)?;
        let outcome = pending.await;
        session.complete(request_id, outcome.clone());
        outcome
    }
}

fn fixed_route(catalog: &[Station]) -> Result<PlannedRoute, PlanError> {
    let station = |station_id: u32| {
        catalog
            .iter()
            .find(|station| station.id == station_id)
            .cloned()
            .ok_or(PlanError::StationNotFound { station_id })
    };
    let [first, second] = RECOMMENDED_STATION_IDS;

    Ok(PlannedRoute {
        total_distance_km: 485,
        total_time: "5h 20m".into(),
        recommended_stops: vec![
            ChargingStop {
                station: station(first)?,
                arrival_time: "10:30".into(),
                charging_time: "45 min".into(),
                battery_before: 25,
                battery_after: 85,
                distance_km: 180,
            },
            ChargingStop {
                station: station(second)?,
                arrival_time: "13:45".into(),
                charging_time: "30 min".into(),
                battery_before: 20,
                battery_after: 80,
                distance_km: 305,
            },
        ],
        alternatives: vec![
            RouteAlternative {
                id: 1,
                name: "Fastest".into(),
                time: "5h 20m".into(),
                distance_km: 485,
                stops: 2,
                cost: "₺85".into(),
            },
            RouteAlternative {
                id: 2,
                name: "Economical".into(),
                time: "5h 45m".into(),
                distance_km: 495,
                stops: 3,
                cost: "₺72".into(),
            },
            RouteAlternative {
                id: 3,
                name: "Comfort".into(),
                time: "6h 10m".into(),
                distance_km: 510,
                stops: 2,
                cost: "₺90".into(),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use evcharge_core::catalog::sample_stations;
    use tokio::time::{Instant, timeout};

    fn planner() -> RoutePlanner<TokioScheduler> {
        RoutePlanner::new(TokioScheduler, sample_stations())
    }

    /// Resolves at once, for callers that do not care about latency
    struct Immediate;

    impl Scheduler for Immediate {
        async fn sleep(&self, _duration: Duration) {}
    }

    #[test]
    fn test_validate() {
        assert_eq!(
            validate(&RouteRequest::new("", "Ankara")),
            Err(PlanError::MissingOrigin)
        );
        assert_eq!(
            validate(&RouteRequest::new("İstanbul", "   ")),
            Err(PlanError::MissingDestination)
        );
        assert!(validate(&RouteRequest::new("İstanbul", "Ankara")).is_ok());
    }

    #[test]
    fn test_empty_destination_rejected_without_planning() {
        let planner = planner();
        assert!(matches!(
            planner.plan(&RouteRequest::new("İstanbul", "")),
            Err(PlanError::MissingDestination)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_plan_resolves_after_delay() {
        let planner = planner();
        let started = Instant::now();

        let route = planner
            .plan(&RouteRequest::new("İstanbul", "Ankara"))
            .unwrap()
            .await
            .unwrap();

        assert!(started.elapsed() >= DEFAULT_PLANNING_DELAY);
        assert_eq!(route.total_distance_km, 485);
        let stop_ids: Vec<u32> = route.recommended_stops.iter().map(|s| s.station.id).collect();
        assert_eq!(stop_ids, vec![1, 5]);
        assert_eq!(route.alternatives.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_plan_not_ready_before_delay() {
        let planner = planner();
        let pending = planner.plan(&RouteRequest::new("İstanbul", "Ankara")).unwrap();
        let early = timeout(Duration::from_millis(1900), pending).await;
        assert!(early.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_output_ignores_request_parameters() {
        let planner = planner().with_delay(Duration::from_millis(500));
        let a = planner
            .plan(&RouteRequest::new("İzmir", "Bursa"))
            .unwrap()
            .await
            .unwrap();
        let mut request = RouteRequest::new("Antalya", "Ankara");
        request.vehicle_range_km = 120;
        request.current_battery = 15;
        request.avoid_tolls = true;
        let b = planner.plan(&request).unwrap().await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_missing_catalog_station_fails() {
        let catalog: Vec<Station> = sample_stations().into_iter().filter(|s| s.id != 5).collect();
        let planner = RoutePlanner::new(Immediate, catalog);
        let outcome = planner
            .plan(&RouteRequest::new("İstanbul", "Ankara"))
            .unwrap()
            .await;
        assert_eq!(outcome, Err(PlanError::StationNotFound { station_id: 5 }));
    }

    #[tokio::test]
    async fn test_run_updates_session() {
        let planner = RoutePlanner::new(Immediate, sample_stations());
        let mut session = RouteSession::new();

        let route = planner
            .run(&mut session, RouteRequest::new("İstanbul", "Ankara"))
            .await
            .unwrap();

        match session.status() {
            PlannerStatus::Planned { route: planned } => assert_eq!(planned, &route),
            other => panic!("Expected Planned, got {other:?}"),
        }
        assert_eq!(session.selected_alternative().map(|a| a.id), Some(1));
    }

    #[tokio::test]
    async fn test_run_rejects_invalid_request_and_stays_idle() {
        let planner = RoutePlanner::new(Immediate, sample_stations());
        let mut session = RouteSession::new();

        let outcome = planner
            .run(&mut session, RouteRequest::new("İstanbul", ""))
            .await;
        assert_eq!(outcome, Err(PlanError::MissingDestination));
        assert_eq!(session.status(), &PlannerStatus::Idle);
    }
}
