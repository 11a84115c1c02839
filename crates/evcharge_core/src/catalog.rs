//! The station catalog: the built-in sample dataset, the operator and
//! connector directories used by the filter form, and loading of external
//! catalog files.

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use crate::CatalogError;
use crate::models::{Amenity, Coordinates, Station, StationId, StationStatus};

/// Favorites a first-time user starts with
pub const SEED_FAVORITES: [StationId; 3] = [1, 3, 5];

#[derive(Debug, Clone, Copy, Serialize)]
pub struct OperatorInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub color: &'static str,
}

impl OperatorInfo {
    /// The value the operator filter expects for this operator
    pub fn filter_value(&self) -> String {
        self.name.to_lowercase()
    }
}

pub const OPERATORS: [OperatorInfo; 7] = [
    OperatorInfo { id: "voltrun", name: "Voltrun", color: "#0ea5e9" },
    OperatorInfo { id: "esarj", name: "Eşarj", color: "#10b981" },
    OperatorInfo { id: "aksa", name: "Aksa Şarj", color: "#f59e0b" },
    OperatorInfo { id: "sharz", name: "Sharz", color: "#8b5cf6" },
    OperatorInfo { id: "beefull", name: "Beefull", color: "#ef4444" },
    OperatorInfo { id: "tav", name: "TAV", color: "#06b6d4" },
    OperatorInfo { id: "ibb", name: "İBB", color: "#84cc16" },
];

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ConnectorInfo {
    pub id: &'static str,
    pub name: &'static str,
}

pub const CONNECTOR_TYPES: [ConnectorInfo; 3] = [
    ConnectorInfo { id: "type2", name: "Type 2" },
    ConnectorInfo { id: "ccs", name: "CCS" },
    ConnectorInfo { id: "chademo", name: "CHAdeMO" },
];

fn amenities(tags: &[Amenity]) -> BTreeSet<Amenity> {
    tags.iter().copied().collect()
}

/// The eight İstanbul stations shipped with the application
pub fn sample_stations() -> Vec<Station> {
    use Amenity::*;

    vec![
        Station {
            id: 1,
            name: "Optimum AVM Şarj İstasyonu".into(),
            operator: "Voltrun".into(),
            address: "Levent Mahallesi, Nispetiye Cad. No:1, Beşiktaş/İstanbul".into(),
            coordinates: Coordinates::new(41.0858, 29.0150),
            status: StationStatus::Available,
            connector_type: "Type 2".into(),
            power: "22 kW".into(),
            price_per_kwh: 12.50,
            available_connectors: 3,
            total_connectors: 4,
            amenities: amenities(&[Wifi, Cafe, Restroom, Shopping]),
            operating_hours: "24/7".into(),
            last_updated: "2 minutes ago".into(),
            rating: 4.5,
            reviews: 127,
            fast_charging: true,
        },
        Station {
            id: 2,
            name: "İstinye Park Şarj Merkezi".into(),
            operator: "Eşarj".into(),
            address: "İstinye Bayırı Cad. İstinye Park AVM, Sarıyer/İstanbul".into(),
            coordinates: Coordinates::new(41.1086, 29.0253),
            status: StationStatus::Occupied,
            connector_type: "CCS".into(),
            power: "50 kW".into(),
            price_per_kwh: 15.75,
            available_connectors: 1,
            total_connectors: 6,
            amenities: amenities(&[Restaurant, Shopping, Valet]),
            operating_hours: "10:00 - 22:00".into(),
            last_updated: "5 minutes ago".into(),
            rating: 4.7,
            reviews: 203,
            fast_charging: true,
        },
        Station {
            id: 3,
            name: "Boğaziçi Üniversitesi Şarj Noktası".into(),
            operator: "Aksa Şarj".into(),
            address: "Bebek, 34342 Beşiktaş/İstanbul".into(),
            coordinates: Coordinates::new(41.0847, 29.0435),
            status: StationStatus::Available,
            connector_type: "Type 2".into(),
            power: "11 kW".into(),
            price_per_kwh: 8.90,
            available_connectors: 2,
            total_connectors: 2,
            amenities: amenities(&[University, Library]),
            operating_hours: "08:00 - 18:00".into(),
            last_updated: "1 minute ago".into(),
            rating: 4.2,
            reviews: 89,
            fast_charging: false,
        },
        Station {
            id: 4,
            name: "Zorlu Center Şarj Merkezi".into(),
            operator: "Sharz".into(),
            address: "Levazım Mah. Koru Sok. No:2, Beşiktaş/İstanbul".into(),
            coordinates: Coordinates::new(41.0689, 29.0109),
            status: StationStatus::Maintenance,
            connector_type: "CCS & Type 2".into(),
            power: "150 kW".into(),
            price_per_kwh: 18.25,
            available_connectors: 0,
            total_connectors: 8,
            amenities: amenities(&[Shopping, Cinema, Restaurant, Hotel]),
            operating_hours: "24/7".into(),
            last_updated: "30 minutes ago".into(),
            rating: 4.8,
            reviews: 456,
            fast_charging: true,
        },
        Station {
            id: 5,
            name: "Galataport Şarj İstasyonu".into(),
            operator: "Beefull".into(),
            address: "Kemankeş Karamustafa Paşa Mah. Rıhtım Cad., Beyoğlu/İstanbul".into(),
            coordinates: Coordinates::new(41.0255, 28.9742),
            status: StationStatus::Available,
            connector_type: "Type 2".into(),
            power: "22 kW".into(),
            price_per_kwh: 13.40,
            available_connectors: 4,
            total_connectors: 6,
            amenities: amenities(&[Port, Restaurant, Museum, Hotel]),
            operating_hours: "24/7".into(),
            last_updated: "just now".into(),
            rating: 4.6,
            reviews: 178,
            fast_charging: true,
        },
        Station {
            id: 6,
            name: "Kadıköy Pier Şarj Noktası".into(),
            operator: "Voltrun".into(),
            address: "Hasanpaşa Mah. Rıhtım Cad. No:16, Kadıköy/İstanbul".into(),
            coordinates: Coordinates::new(40.9673, 29.0233),
            status: StationStatus::Occupied,
            connector_type: "Type 2".into(),
            power: "11 kW".into(),
            price_per_kwh: 10.80,
            available_connectors: 0,
            total_connectors: 3,
            amenities: amenities(&[Ferry, Cafe, SeaView]),
            operating_hours: "06:00 - 24:00".into(),
            last_updated: "7 minutes ago".into(),
            rating: 4.3,
            reviews: 94,
            fast_charging: false,
        },
        Station {
            id: 7,
            name: "Atatürk Havalimanı Şarj Merkezi".into(),
            operator: "TAV".into(),
            address: "Yeşilköy Mah. Havalimanı Cad., Bakırköy/İstanbul".into(),
            coordinates: Coordinates::new(40.9769, 28.8169),
            status: StationStatus::Available,
            connector_type: "CCS & CHAdeMO".into(),
            power: "100 kW".into(),
            price_per_kwh: 16.90,
            available_connectors: 6,
            total_connectors: 12,
            amenities: amenities(&[Airport, Hotel, Restaurant, DutyFree]),
            operating_hours: "24/7".into(),
            last_updated: "3 minutes ago".into(),
            rating: 4.4,
            reviews: 312,
            fast_charging: true,
        },
        Station {
            id: 8,
            name: "Taksim Meydanı Şarj İstasyonu".into(),
            operator: "İBB".into(),
            address: "Gümüşsuyu Mah. Taksim Meydanı, Beyoğlu/İstanbul".into(),
            coordinates: Coordinates::new(41.0369, 28.9850),
            status: StationStatus::Unavailable,
            connector_type: "Type 2".into(),
            power: "22 kW".into(),
            price_per_kwh: 9.50,
            available_connectors: 0,
            total_connectors: 4,
            amenities: amenities(&[Metro, Bus, TouristArea]),
            operating_hours: "24/7".into(),
            last_updated: "15 minutes ago".into(),
            rating: 3.9,
            reviews: 156,
            fast_charging: true,
        },
    ]
}

/// Parse a JSON array of stations and check the catalog invariants.
pub fn load_catalog(json: &str) -> Result<Vec<Station>, CatalogError> {
    let stations: Vec<Station> = serde_json::from_str(json)?;
    validate_catalog(&stations)?;
    tracing::info!("Loaded catalog with {} stations", stations.len());
    Ok(stations)
}

pub fn validate_catalog(stations: &[Station]) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for station in stations {
        let id = station.id;
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId { id });
        }
        if station.available_connectors > station.total_connectors {
            return Err(CatalogError::ConnectorsExceedTotal {
                id,
                available: station.available_connectors,
                total: station.total_connectors,
            });
        }
        if !(0.0..=5.0).contains(&station.rating) {
            return Err(CatalogError::RatingOutOfRange {
                id,
                rating: station.rating,
            });
        }
        if station.price_per_kwh.is_nan() || station.price_per_kwh < 0.0 {
            return Err(CatalogError::InvalidPrice {
                id,
                price: station.price_per_kwh,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_catalog_is_valid() {
        let stations = sample_stations();
        assert_eq!(stations.len(), 8);
        assert!(validate_catalog(&stations).is_ok());
    }

    #[test]
    fn test_seed_favorites_exist_in_catalog() {
        let stations = sample_stations();
        for id in SEED_FAVORITES {
            assert!(stations.iter().any(|s| s.id == id));
        }
    }

    #[test]
    fn test_catalog_round_trips_through_json() {
        let json = serde_json::to_string(&sample_stations()).unwrap();
        let loaded = load_catalog(&json).unwrap();
        assert_eq!(loaded, sample_stations());
    }

    #[test]
    fn test_load_catalog_rejects_broken_invariants() {
        let mut stations = sample_stations();
        stations[2].available_connectors = 5;
        let json = serde_json::to_string(&stations).unwrap();
        match load_catalog(&json) {
            Err(CatalogError::ConnectorsExceedTotal { id, available, total }) => {
                assert_eq!((id, available, total), (3, 5, 2));
            }
            other => panic!("Expected ConnectorsExceedTotal error, got {other:?}"),
        }

        let mut stations = sample_stations();
        stations[0].rating = 5.5;
        assert!(matches!(
            validate_catalog(&stations),
            Err(CatalogError::RatingOutOfRange { id: 1, .. })
        ));

        let mut stations = sample_stations();
        stations[7].id = 1;
        assert!(matches!(
            validate_catalog(&stations),
            Err(CatalogError::DuplicateId { id: 1 })
        ));
    }

    #[test]
    fn test_load_catalog_rejects_unknown_amenity() {
        let json = serde_json::to_string(&sample_stations())
            .unwrap()
            .replace("\"sea_view\"", "\"jacuzzi\"");
        assert!(matches!(load_catalog(&json), Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_operator_filter_values() {
        let values: Vec<String> = OPERATORS.iter().map(|o| o.filter_value()).collect();
        assert!(values.contains(&"voltrun".to_string()));
        assert!(values.contains(&"aksa şarj".to_string()));
    }
}
