//! Zillow property data client.
//!
//! Highest-priority provider: address autocomplete, property details
//! with the Zestimate value estimate, and a nearby-homes search.
//! Zillow throttles aggressively — callers pace requests through the
//! provider's `RequestPacer` (2 s between requests; see
//! `providers/zillow.toml`).

use crate::{AddressCandidate, PropertyDetails, ProviderError, RawNeighbor, plausible_year_built};

/// Searches for address suggestions matching a free-form query.
///
/// # Errors
///
/// Returns [`ProviderError`] if the HTTP request or response parsing
/// fails, or [`ProviderError::RateLimited`] on HTTP 429.
pub async fn suggest_addresses(
    client: &reqwest::Client,
    base_url: &str,
    query: &str,
) -> Result<Vec<AddressCandidate>, ProviderError> {
    let url = format!("{base_url}/search");
    let resp = client
        .get(&url)
        .query(&[("q", query), ("resultTypes", "address")])
        .send()
        .await?;

    if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(ProviderError::RateLimited);
    }

    let body: serde_json::Value = resp.json().await?;
    Ok(parse_suggestions(&body))
}

/// Fetches property details for a Zillow property ID (zpid).
///
/// Returns `Ok(None)` when the property is unknown.
///
/// # Errors
///
/// Returns [`ProviderError`] if the HTTP request or response parsing
/// fails, or [`ProviderError::RateLimited`] on HTTP 429.
pub async fn get_details(
    client: &reqwest::Client,
    base_url: &str,
    zpid: &str,
    current_year: i32,
) -> Result<Option<PropertyDetails>, ProviderError> {
    let url = format!("{base_url}/property");
    let resp = client.get(&url).query(&[("zpid", zpid)]).send().await?;

    if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(ProviderError::RateLimited);
    }
    if resp.status() == reqwest::StatusCode::NOT_FOUND {
        return Ok(None);
    }

    let body: serde_json::Value = resp.json().await?;
    Ok(parse_details(&body, current_year))
}

/// Searches for properties near a coordinate.
///
/// # Errors
///
/// Returns [`ProviderError`] if the HTTP request or response parsing
/// fails, or [`ProviderError::RateLimited`] on HTTP 429.
pub async fn find_neighbors(
    client: &reqwest::Client,
    base_url: &str,
    latitude: f64,
    longitude: f64,
    radius_m: f64,
    current_year: i32,
) -> Result<Vec<RawNeighbor>, ProviderError> {
    let url = format!("{base_url}/propertyByCoordinates");
    let resp = client
        .get(&url)
        .query(&[
            ("lat", latitude.to_string()),
            ("long", longitude.to_string()),
            // Zillow takes the radius in half-mile units, minimum 1.
            ("d", format!("{:.2}", (radius_m / 804.672).max(1.0))),
        ])
        .send()
        .await?;

    if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(ProviderError::RateLimited);
    }

    let body: serde_json::Value = resp.json().await?;
    Ok(parse_neighbors(&body, current_year))
}

/// Parses the autocomplete response.
///
/// Shape: `{"results": [{"display": "...", "metaData": {"zpid": ...,
/// "lat": ..., "lon": ...}}]}`. Unrecognized shapes yield an empty list.
fn parse_suggestions(body: &serde_json::Value) -> Vec<AddressCandidate> {
    let Some(results) = body["results"].as_array() else {
        return Vec::new();
    };

    results
        .iter()
        .filter_map(|item| {
            let address = item["display"].as_str()?.to_string();
            let meta = &item["metaData"];
            let stable_id = meta["zpid"]
                .as_i64()
                .map(|z| z.to_string())
                .or_else(|| meta["zpid"].as_str().map(String::from))?;
            Some(AddressCandidate {
                address,
                stable_id,
                latitude: meta["lat"].as_f64(),
                longitude: meta["lon"].as_f64(),
            })
        })
        .collect()
}

/// Parses a property-details response.
///
/// The details endpoint returns either a bare property object or a
/// `{"property": {...}}` wrapper. Returns `None` when neither shape
/// matches.
fn parse_details(body: &serde_json::Value, current_year: i32) -> Option<PropertyDetails> {
    let prop = if body["property"].is_object() {
        &body["property"]
    } else if body.is_object() {
        body
    } else {
        return None;
    };

    // An object with none of the expected keys is an unrecognized shape.
    if prop["zestimate"].is_null() && prop["livingArea"].is_null() && prop["yearBuilt"].is_null() {
        return None;
    }

    Some(PropertyDetails {
        year_built: prop["yearBuilt"]
            .as_i64()
            .and_then(|y| plausible_year_built(y, current_year)),
        square_footage: crate::json_u32(&prop["livingArea"]),
        market_price: crate::json_currency(&prop["price"]),
        estimated_value: crate::json_currency(&prop["zestimate"]),
        bedrooms: crate::json_u32(&prop["bedrooms"]),
        bathrooms: crate::json_u32(&prop["bathrooms"]),
    })
}

/// Parses a nearby-homes response.
///
/// The coordinate search returns a bare array, a `{"props": [...]}`
/// wrapper, or a single property object. Unrecognized shapes yield an
/// empty list; items without coordinates are skipped.
fn parse_neighbors(body: &serde_json::Value, current_year: i32) -> Vec<RawNeighbor> {
    let items: Vec<&serde_json::Value> = if let Some(array) = body.as_array() {
        array.iter().collect()
    } else if let Some(array) = body["props"].as_array() {
        array.iter().collect()
    } else if body.is_object() && !body["address"].is_null() {
        vec![body]
    } else {
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| {
            let address = item["address"].as_str()?.to_string();
            Some(RawNeighbor {
                address,
                latitude: item["latitude"].as_f64()?,
                longitude: item["longitude"].as_f64()?,
                market_price: crate::json_currency(&item["price"]),
                zestimate: crate::json_currency(&item["zestimate"]),
                living_area: crate::json_u32(&item["livingArea"]),
                year_built: item["yearBuilt"]
                    .as_i64()
                    .and_then(|y| plausible_year_built(y, current_year)),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_suggestions() {
        let body = serde_json::json!({
            "results": [
                {
                    "display": "101 E Capitol St NE, Washington, DC 20003",
                    "metaData": { "zpid": 426_932_i64, "lat": 38.8898, "lon": -76.9905 }
                },
                {
                    "display": "101 E Capitol Ave, Olympia, WA",
                    "metaData": { "zpid": "55120", "lat": 47.0379, "lon": -122.9007 }
                }
            ]
        });
        let candidates = parse_suggestions(&body);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].stable_id, "426932");
        assert_eq!(candidates[1].stable_id, "55120");
        assert!((candidates[0].latitude.unwrap() - 38.8898).abs() < 1e-6);
    }

    #[test]
    fn suggestions_skip_items_without_zpid() {
        let body = serde_json::json!({
            "results": [{ "display": "Somewhere", "metaData": {} }]
        });
        assert!(parse_suggestions(&body).is_empty());
    }

    #[test]
    fn suggestions_empty_on_unrecognized_shape() {
        assert!(parse_suggestions(&serde_json::json!("oops")).is_empty());
        assert!(parse_suggestions(&serde_json::json!({"weird": 1})).is_empty());
    }

    #[test]
    fn parses_details_wrapped_and_bare() {
        let wrapped = serde_json::json!({
            "property": {
                "zestimate": 512_300, "livingArea": 1_850, "yearBuilt": 1921,
                "bedrooms": 3, "bathrooms": 2
            }
        });
        let details = parse_details(&wrapped, 2025).unwrap();
        assert_eq!(details.estimated_value, Some(512_300));
        assert_eq!(details.square_footage, Some(1_850));
        assert_eq!(details.year_built, Some(1921));

        let bare = serde_json::json!({ "zestimate": 300_000, "livingArea": 1_200 });
        let details = parse_details(&bare, 2025).unwrap();
        assert_eq!(details.estimated_value, Some(300_000));
        assert_eq!(details.year_built, None);
    }

    #[test]
    fn details_nulls_implausible_year() {
        let body = serde_json::json!({ "zestimate": 1, "yearBuilt": 2150 });
        assert_eq!(parse_details(&body, 2025).unwrap().year_built, None);

        let body = serde_json::json!({ "zestimate": 1, "yearBuilt": 1650 });
        assert_eq!(parse_details(&body, 2025).unwrap().year_built, None);
    }

    #[test]
    fn details_none_on_unrecognized_shape() {
        assert!(parse_details(&serde_json::json!([1, 2]), 2025).is_none());
        assert!(parse_details(&serde_json::json!({"error": "no"}), 2025).is_none());
    }

    #[test]
    fn parses_neighbors_array_and_wrapper() {
        let item = serde_json::json!({
            "address": "103 E Capitol St NE",
            "latitude": 38.8899, "longitude": -76.9903,
            "zestimate": 498_000, "livingArea": 1_700, "yearBuilt": 1919
        });
        let as_array = serde_json::json!([item]);
        let as_wrapper = serde_json::json!({ "props": [item] });
        let as_single = item.clone();

        for body in [as_array, as_wrapper, as_single] {
            let neighbors = parse_neighbors(&body, 2025);
            assert_eq!(neighbors.len(), 1, "shape {body} should yield one neighbor");
            assert_eq!(neighbors[0].zestimate, Some(498_000));
            assert_eq!(neighbors[0].year_built, Some(1919));
        }
    }

    #[test]
    fn neighbors_skip_items_without_coordinates() {
        let body = serde_json::json!([{ "address": "NO COORDS" }]);
        assert!(parse_neighbors(&body, 2025).is_empty());
    }

    #[test]
    fn neighbors_empty_on_unrecognized_shape() {
        assert!(parse_neighbors(&serde_json::json!(42), 2025).is_empty());
        assert!(parse_neighbors(&serde_json::json!({"data": {}}), 2025).is_empty());
    }
}
