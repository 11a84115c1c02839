use std::path::PathBuf;
use std::time::Duration;

use evcharge_core::catalog::SEED_FAVORITES;
use evcharge_core::{Coordinates, DEFAULT_MAP_CENTER, DEFAULT_MAP_ZOOM, StationId};
use evcharge_planner::DEFAULT_PLANNING_DELAY;
use serde::{Deserialize, Serialize};

/// Settings for the station finder host. Every field has a default, so an
/// empty JSON object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// Directory of the key-value store favorites persist to
    pub data_dir: PathBuf,
    /// JSON station catalog to use instead of the built-in sample
    pub catalog_path: Option<PathBuf>,
    /// Favorites for a user with nothing stored yet
    pub seed_favorites: Vec<StationId>,
    pub map_center: Coordinates,
    pub map_zoom: u8,
    /// Simulated route planning latency in milliseconds
    pub planning_delay_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_dir: PathBuf::from(".evcharge"),
            catalog_path: None,
            seed_favorites: SEED_FAVORITES.to_vec(),
            map_center: DEFAULT_MAP_CENTER,
            map_zoom: DEFAULT_MAP_ZOOM,
            planning_delay_ms: DEFAULT_PLANNING_DELAY.as_millis() as u64,
        }
    }
}

impl AppConfig {
    pub fn planning_delay(&self) -> Duration {
        Duration::from_millis(self.planning_delay_ms)
    }
}
