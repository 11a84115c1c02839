//! Core of the EV charging station finder: the station catalog, search and
//! filtering, list sorting, favorites persistence and the view-state
//! reducer the presentation layer drives.

pub mod catalog;
mod favorites;
mod filter;
mod links;
mod location;
mod map;
mod models;
mod sort;
mod state;

pub use crate::favorites::*;
pub use crate::filter::apply_filters;
pub use crate::links::*;
pub use crate::location::*;
pub use crate::map::*;
pub use crate::models::*;
pub use crate::sort::*;
pub use crate::state::*;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Station id {id} appears more than once")]
    DuplicateId { id: StationId },
    #[error("Station {id} has {available} available connectors but only {total} in total")]
    ConnectorsExceedTotal {
        id: StationId,
        available: u32,
        total: u32,
    },
    #[error("Station {id} has rating {rating}, expected a value between 0 and 5")]
    RatingOutOfRange { id: StationId, rating: f64 },
    #[error("Station {id} has invalid price per kWh {price}")]
    InvalidPrice { id: StationId, price: f64 },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to encode value: {0}")]
    Encode(serde_json::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GeolocationError {
    #[error("permission denied")]
    PermissionDenied,
    #[error("position unavailable")]
    PositionUnavailable,
    #[error("timed out")]
    Timeout,
    #[error("geolocation is not supported")]
    Unsupported,
}
