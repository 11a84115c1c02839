use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

pub type StationId = u32;

/// A (latitude, longitude) pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Coordinates {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to `other` in kilometres (haversine).
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        const EARTH_RADIUS_KM: f64 = 6371.0;
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lng = (other.longitude - self.longitude).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.latitude.to_radians().cos()
                * other.latitude.to_radians().cos()
                * (d_lng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationStatus {
    Available,
    Occupied,
    Unavailable,
    Maintenance,
}

impl StationStatus {
    pub const ALL: [StationStatus; 4] = [
        StationStatus::Available,
        StationStatus::Occupied,
        StationStatus::Unavailable,
        StationStatus::Maintenance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StationStatus::Available => "available",
            StationStatus::Occupied => "occupied",
            StationStatus::Unavailable => "unavailable",
            StationStatus::Maintenance => "maintenance",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StationStatus::Available => "Available",
            StationStatus::Occupied => "Occupied",
            StationStatus::Unavailable => "Out of service",
            StationStatus::Maintenance => "Under maintenance",
        }
    }

    /// Marker colour used on the map legend and pins
    pub fn marker_color(&self) -> &'static str {
        match self {
            StationStatus::Available => "#10b981",
            StationStatus::Occupied => "#f59e0b",
            StationStatus::Unavailable => "#ef4444",
            StationStatus::Maintenance => "#6b7280",
        }
    }
}

impl fmt::Display for StationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StationStatus {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownValue::new("station status", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Amenity {
    Wifi,
    Cafe,
    Restroom,
    Shopping,
    Restaurant,
    Hotel,
    Valet,
    University,
    Library,
    Cinema,
    Port,
    Museum,
    Ferry,
    SeaView,
    Airport,
    DutyFree,
    Metro,
    Bus,
    TouristArea,
}

impl Amenity {
    pub const ALL: [Amenity; 19] = [
        Amenity::Wifi,
        Amenity::Cafe,
        Amenity::Restroom,
        Amenity::Shopping,
        Amenity::Restaurant,
        Amenity::Hotel,
        Amenity::Valet,
        Amenity::University,
        Amenity::Library,
        Amenity::Cinema,
        Amenity::Port,
        Amenity::Museum,
        Amenity::Ferry,
        Amenity::SeaView,
        Amenity::Airport,
        Amenity::DutyFree,
        Amenity::Metro,
        Amenity::Bus,
        Amenity::TouristArea,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Amenity::Wifi => "wifi",
            Amenity::Cafe => "cafe",
            Amenity::Restroom => "restroom",
            Amenity::Shopping => "shopping",
            Amenity::Restaurant => "restaurant",
            Amenity::Hotel => "hotel",
            Amenity::Valet => "valet",
            Amenity::University => "university",
            Amenity::Library => "library",
            Amenity::Cinema => "cinema",
            Amenity::Port => "port",
            Amenity::Museum => "museum",
            Amenity::Ferry => "ferry",
            Amenity::SeaView => "sea_view",
            Amenity::Airport => "airport",
            Amenity::DutyFree => "duty_free",
            Amenity::Metro => "metro",
            Amenity::Bus => "bus",
            Amenity::TouristArea => "tourist_area",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Amenity::Wifi => "📶",
            Amenity::Cafe => "☕",
            Amenity::Restroom => "🚻",
            Amenity::Shopping => "🛍️",
            Amenity::Restaurant => "🍽️",
            Amenity::Hotel => "🏨",
            Amenity::Valet => "🅿️",
            Amenity::University => "🎓",
            Amenity::Library => "📚",
            Amenity::Cinema => "🎬",
            Amenity::Port => "⚓",
            Amenity::Museum => "🏛️",
            Amenity::Ferry => "⛴️",
            Amenity::SeaView => "🌊",
            Amenity::Airport => "✈️",
            Amenity::DutyFree => "🛒",
            Amenity::Metro => "🚇",
            Amenity::Bus => "🚌",
            Amenity::TouristArea => "📸",
        }
    }
}

impl FromStr for Amenity {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Amenity::ALL
            .into_iter()
            .find(|amenity| amenity.as_str() == s)
            .ok_or_else(|| UnknownValue::new("amenity", s))
    }
}

/// Power bands offered by the filter form.
///
/// The band is carried in [`FilterCriteria`] but is not part of the filter
/// predicate: station power is a display string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerLevel {
    Slow,
    Fast,
    Rapid,
}

impl PowerLevel {
    pub const ALL: [PowerLevel; 3] = [PowerLevel::Slow, PowerLevel::Fast, PowerLevel::Rapid];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerLevel::Slow => "slow",
            PowerLevel::Fast => "fast",
            PowerLevel::Rapid => "rapid",
        }
    }

    /// Band bounds in kW
    pub fn range_kw(&self) -> (u32, u32) {
        match self {
            PowerLevel::Slow => (3, 11),
            PowerLevel::Fast => (22, 50),
            PowerLevel::Rapid => (100, 350),
        }
    }
}

impl fmt::Display for PowerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PowerLevel {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PowerLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| UnknownValue::new("power level", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownValue {
    kind: &'static str,
    value: String,
}

impl UnknownValue {
    fn new(kind: &'static str, value: &str) -> Self {
        UnknownValue {
            kind,
            value: value.to_string(),
        }
    }
}

/// A charging location as published in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub id: StationId,
    pub name: String,
    pub operator: String,
    pub address: String,
    pub coordinates: Coordinates,
    pub status: StationStatus,
    /// Free text, may list several connector types ("CCS & Type 2")
    pub connector_type: String,
    /// Display string, e.g. "22 kW"
    pub power: String,
    pub price_per_kwh: f64,
    pub available_connectors: u32,
    pub total_connectors: u32,
    pub amenities: BTreeSet<Amenity>,
    pub operating_hours: String,
    pub last_updated: String,
    pub rating: f64,
    pub reviews: u32,
    pub fast_charging: bool,
}

/// A filter selection that is either unrestricted or pinned to one value.
///
/// Encoded as the string `"all"` or the value's own string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice<T> {
    All,
    Only(T),
}

impl<T> Choice<T> {
    pub fn only(&self) -> Option<&T> {
        match self {
            Choice::All => None,
            Choice::Only(value) => Some(value),
        }
    }
}

impl<T> Default for Choice<T> {
    fn default() -> Self {
        Choice::All
    }
}

impl<T: fmt::Display> Serialize for Choice<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Choice::All => serializer.serialize_str("all"),
            Choice::Only(value) => serializer.collect_str(value),
        }
    }
}

impl<'de, T> Deserialize<'de> for Choice<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw == "all" {
            return Ok(Choice::All);
        }
        raw.parse().map(Choice::Only).map_err(de::Error::custom)
    }
}

/// Inclusive price bounds per kWh, encoded as `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub const fn new(min: f64, max: f64) -> Self {
        PriceRange { min, max }
    }

    pub fn contains(&self, price: f64) -> bool {
        self.min <= price && price <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        PriceRange::new(0.0, 25.0)
    }
}

impl From<(f64, f64)> for PriceRange {
    fn from((min, max): (f64, f64)) -> Self {
        PriceRange { min, max }
    }
}

impl From<PriceRange> for (f64, f64) {
    fn from(range: PriceRange) -> Self {
        (range.min, range.max)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    pub status: Choice<StationStatus>,
    /// Lower-cased operator name
    pub operator: Choice<String>,
    /// Connector id matched as a substring of the station connector text
    pub connector_type: Choice<String>,
    pub power_level: Choice<PowerLevel>,
    pub price_range: PriceRange,
    /// Matched with OR semantics
    pub amenities: BTreeSet<Amenity>,
    pub fast_charging_only: bool,
}

/// A single-field change to [`FilterCriteria`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "key", content = "value", rename_all = "camelCase")]
pub enum FilterField {
    Status(Choice<StationStatus>),
    Operator(Choice<String>),
    ConnectorType(Choice<String>),
    PowerLevel(Choice<PowerLevel>),
    PriceRange(PriceRange),
    Amenities(BTreeSet<Amenity>),
    FastChargingOnly(bool),
}

impl FilterCriteria {
    pub fn update(&mut self, field: FilterField) {
        match field {
            FilterField::Status(status) => self.status = status,
            FilterField::Operator(operator) => self.operator = operator,
            FilterField::ConnectorType(connector_type) => self.connector_type = connector_type,
            FilterField::PowerLevel(power_level) => self.power_level = power_level,
            FilterField::PriceRange(price_range) => self.price_range = price_range,
            FilterField::Amenities(amenities) => self.amenities = amenities,
            FilterField::FastChargingOnly(fast) => self.fast_charging_only = fast,
        }
    }
}
