use crate::models::{FilterCriteria, Station};

/// Select the stations matching the search query and every active filter.
///
/// The result keeps catalog order. An empty (or whitespace-only) query
/// matches everything; the price range always applies.
pub fn apply_filters<'a>(
    catalog: &'a [Station],
    query: &str,
    criteria: &FilterCriteria,
) -> Vec<&'a Station> {
    let query = query.trim().to_lowercase();
    let operator = criteria.operator.only().map(|o| o.to_lowercase());
    let connector_type = criteria.connector_type.only().map(|c| c.to_lowercase());

    catalog
        .iter()
        .filter(|station| query.is_empty() || matches_query(station, &query))
        .filter(|station| {
            criteria
                .status
                .only()
                .is_none_or(|status| station.status == *status)
        })
        .filter(|station| {
            operator
                .as_deref()
                .is_none_or(|operator| station.operator.to_lowercase() == operator)
        })
        .filter(|station| {
            connector_type.as_deref().is_none_or(|connector| {
                station.connector_type.to_lowercase().contains(connector)
            })
        })
        .filter(|station| !criteria.fast_charging_only || station.fast_charging)
        .filter(|station| criteria.price_range.contains(station.price_per_kwh))
        .filter(|station| {
            criteria.amenities.is_empty()
                || criteria
                    .amenities
                    .iter()
                    .any(|amenity| station.amenities.contains(amenity))
        })
        .collect()
}

/// `query` must already be lower-cased
fn matches_query(station: &Station, query: &str) -> bool {
    [&station.name, &station.address, &station.operator]
        .iter()
        .any(|field| field.to_lowercase().contains(query))
}
