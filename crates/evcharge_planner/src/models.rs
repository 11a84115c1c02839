use evcharge_core::{Coordinates, Station, StationId};
use serde::{Deserialize, Serialize};

/// What the user asked the planner for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouteRequest {
    pub origin: String,
    pub destination: String,
    pub vehicle_range_km: u32,
    /// State of charge at departure, in percent
    pub current_battery: u8,
    pub preferred_stops: u8,
    pub avoid_tolls: bool,
    pub fast_charging_only: bool,
}

impl Default for RouteRequest {
    fn default() -> Self {
        RouteRequest {
            origin: String::new(),
            destination: String::new(),
            vehicle_range_km: 300,
            current_battery: 80,
            preferred_stops: 2,
            avoid_tolls: false,
            fast_charging_only: true,
        }
    }
}

impl RouteRequest {
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        RouteRequest {
            origin: origin.into(),
            destination: destination.into(),
            ..RouteRequest::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargingStop {
    pub station: Station,
    pub arrival_time: String,
    pub charging_time: String,
    /// Battery percentage on arrival
    pub battery_before: u8,
    /// Battery percentage on departure
    pub battery_after: u8,
    /// Distance from the origin in km
    pub distance_km: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteAlternative {
    pub id: u32,
    pub name: String,
    pub time: String,
    pub distance_km: u32,
    pub stops: u8,
    pub cost: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedRoute {
    pub total_distance_km: u32,
    pub total_time: String,
    pub recommended_stops: Vec<ChargingStop>,
    pub alternatives: Vec<RouteAlternative>,
}

impl PlannedRoute {
    pub fn alternative(&self, id: u32) -> Option<&RouteAlternative> {
        self.alternatives.iter().find(|alternative| alternative.id == id)
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Destination {
    pub name: &'static str,
    pub coordinates: Coordinates,
}

/// Shortcuts offered under the destination field
pub const POPULAR_DESTINATIONS: [Destination; 5] = [
    Destination { name: "İstanbul", coordinates: Coordinates::new(41.0082, 28.9784) },
    Destination { name: "Ankara", coordinates: Coordinates::new(39.9334, 32.8597) },
    Destination { name: "İzmir", coordinates: Coordinates::new(38.4237, 27.1428) },
    Destination { name: "Antalya", coordinates: Coordinates::new(36.8969, 30.7133) },
    Destination { name: "Bursa", coordinates: Coordinates::new(40.1826, 29.0665) },
];

/// Stations the canned plan stops at, in driving order
pub(crate) const RECOMMENDED_STATION_IDS: [StationId; 2] = [1, 5];
