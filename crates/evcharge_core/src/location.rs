use std::future::Future;

use crate::GeolocationError;
use crate::models::Coordinates;
use crate::state::Action;

/// Source of the user's current position.
///
/// Each call resolves exactly once; callers do not retry.
pub trait Geolocator {
    fn current_position(&self) -> impl Future<Output = Result<Coordinates, GeolocationError>> + Send;
}

/// The notice shown when the position could not be determined
pub fn location_failure_notice(error: &GeolocationError) -> String {
    match error {
        GeolocationError::Unsupported => {
            "Your browser does not support location services.".to_string()
        }
        other => format!(
            "Could not determine your location ({other}). Please allow location access in your browser settings."
        ),
    }
}

/// Ask `geolocator` for a fix and turn the outcome into the action to
/// dispatch.
pub async fn locate<G: Geolocator>(geolocator: &G) -> Action {
    match geolocator.current_position().await {
        Ok(position) => {
            tracing::info!(
                "User located at {}, {}",
                position.latitude,
                position.longitude
            );
            Action::SetUserLocation(Some(position))
        }
        Err(err) => {
            tracing::warn!("Could not get user location: {}", err);
            Action::SetError(Some(location_failure_notice(&err)))
        }
    }
}
