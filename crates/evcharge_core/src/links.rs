use url::form_urlencoded;

use crate::models::{Coordinates, Station};

const DIRECTIONS_BASE: &str = "https://www.google.com/maps/dir/";

/// Driving directions from wherever the user is to `destination`.
///
/// Coordinates are not range-checked.
pub fn directions_url(destination: Coordinates) -> String {
    format!(
        "{DIRECTIONS_BASE}?api=1&destination={},{}&travelmode=driving",
        destination.latitude, destination.longitude
    )
}

/// Driving directions from a free-text `origin` to `destination`
pub fn directions_url_from(origin: &str, destination: Coordinates) -> String {
    let origin: String = form_urlencoded::byte_serialize(origin.as_bytes()).collect();
    format!(
        "{DIRECTIONS_BASE}?api=1&origin={origin}&destination={},{}&travelmode=driving",
        destination.latitude, destination.longitude
    )
}

/// Plain-text summary used when the platform has no native share sheet
pub fn share_text(station: &Station) -> String {
    format!("{} - {}", station.name, station.address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample_stations;

    #[test]
    fn test_directions_url() {
        let url = directions_url(Coordinates::new(41.0858, 29.0150));
        assert_eq!(
            url,
            "https://www.google.com/maps/dir/?api=1&destination=41.0858,29.015&travelmode=driving"
        );
    }

    #[test]
    fn test_directions_url_does_not_validate_range() {
        let url = directions_url(Coordinates::new(123.0, -500.5));
        assert!(url.contains("destination=123,-500.5&"));
    }

    #[test]
    fn test_directions_url_from_encodes_origin() {
        let url = directions_url_from("Kadıköy İskele", Coordinates::new(40.9769, 28.8169));
        assert!(url.starts_with("https://www.google.com/maps/dir/?api=1&origin=Kad"));
        assert!(!url.contains(' '));
        assert!(url.ends_with("&destination=40.9769,28.8169&travelmode=driving"));
    }

    #[test]
    fn test_share_text() {
        let station = &sample_stations()[2];
        assert_eq!(
            share_text(station),
            "Boğaziçi Üniversitesi Şarj Noktası - Bebek, 34342 Beşiktaş/İstanbul"
        );
    }
}
