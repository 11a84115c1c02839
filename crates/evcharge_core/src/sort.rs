use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{Coordinates, Station};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Distance,
    Rating,
    Price,
    Name,
}

impl FromStr for SortKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "distance" => Ok(SortKey::Distance),
            "rating" => Ok(SortKey::Rating),
            "price" => Ok(SortKey::Price),
            "name" => Ok(SortKey::Name),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListSort {
    pub key: SortKey,
    pub order: SortOrder,
}

impl ListSort {
    pub fn new(key: SortKey, order: SortOrder) -> Self {
        ListSort { key, order }
    }

    fn compare(&self, a: &Station, b: &Station, origin: Option<&Coordinates>) -> Ordering {
        let ordering = match self.key {
            SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortKey::Rating => a.rating.total_cmp(&b.rating),
            SortKey::Price => a.price_per_kwh.total_cmp(&b.price_per_kwh),
            SortKey::Distance => match origin {
                Some(origin) => origin
                    .distance_km(&a.coordinates)
                    .total_cmp(&origin.distance_km(&b.coordinates)),
                // Without a fix on the user, catalog id stands in for distance
                None => a.id.cmp(&b.id),
            },
        };
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// Stable in-place sort; distance is measured from `origin` when known.
pub fn sort_stations(stations: &mut [&Station], sort: ListSort, origin: Option<&Coordinates>) {
    stations.sort_by(|a, b| sort.compare(a, b, origin));
}

/// What the station list shows: the filtered stations, optionally limited
/// to favorites, in the requested order. `None` keeps filter order.
pub fn visible_list(state: &AppState, sort: Option<ListSort>, favorites_only: bool) -> Vec<&Station> {
    let mut stations: Vec<&Station> = state
        .filtered_stations
        .iter()
        .filter(|station| !favorites_only || state.favorites.contains(station.id))
        .collect();
    if let Some(sort) = sort {
        sort_stations(&mut stations, sort, state.user_location.as_ref());
    }
    stations
}
