//! RentCast property data client.
//!
//! Fallback provider: property record search by address, detail lookups
//! with sale history, and a radius listing search for neighbors.
//! RentCast's free tier allows roughly one request every 3 s (see
//! `providers/rentcast.toml`).

use crate::{AddressCandidate, PropertyDetails, ProviderError, RawNeighbor, plausible_year_built};

/// Searches property records matching a free-form address query.
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
    let url = format!("{base_url}/properties");
    let resp = client.get(&url).query(&[("address", query)]).send().await?;

    if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(ProviderError::RateLimited);
    }

    let body: serde_json::Value = resp.json().await?;
    Ok(parse_suggestions(&body))
}

/// Fetches the property record for a RentCast property ID.
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
    property_id: &str,
    current_year: i32,
) -> Result<Option<PropertyDetails>, ProviderError> {
    let url = format!("{base_url}/properties/{property_id}");
    let resp = client.get(&url).send().await?;

    if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(ProviderError::RateLimited);
    }
    if resp.status() == reqwest::StatusCode::NOT_FOUND {
        return Ok(None);
    }

    let body: serde_json::Value = resp.json().await?;
    Ok(parse_details(&body, current_year))
}

/// Searches active sale listings near a coordinate.
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
    let url = format!("{base_url}/listings/sale");
    let resp = client
        .get(&url)
        .query(&[
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            // RentCast takes the radius in miles.
            ("radius", format!("{:.3}", radius_m / 1_609.344)),
        ])
        .send()
        .await?;

    if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(ProviderError::RateLimited);
    }

    let body: serde_json::Value = resp.json().await?;
    Ok(parse_neighbors(&body, current_year))
}

/// Parses a property search response.
///
/// RentCast returns a bare array of property records, or a single record
/// object for an exact-address hit. Unrecognized shapes yield an empty
/// list.
fn parse_suggestions(body: &serde_json::Value) -> Vec<AddressCandidate> {
    let items: Vec<&serde_json::Value> = if let Some(array) = body.as_array() {
        array.iter().collect()
    } else if body.is_object() && !body["formattedAddress"].is_null() {
        vec![body]
    } else {
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| {
            Some(AddressCandidate {
                address: item["formattedAddress"].as_str()?.to_string(),
                stable_id: item["id"].as_str()?.to_string(),
                latitude: item["latitude"].as_f64(),
                longitude: item["longitude"].as_f64(),
            })
        })
        .collect()
}

/// Parses a property record into details.
///
/// The record endpoint returns a single object; some deployments wrap it
/// in a one-element array. Returns `None` for anything else.
fn parse_details(body: &serde_json::Value, current_year: i32) -> Option<PropertyDetails> {
    let record = if body.is_object() {
        body
    } else if let Some(first) = body.as_array().and_then(|a| a.first()) {
        first
    } else {
        return None;
    };

    if record["squareFootage"].is_null()
        && record["yearBuilt"].is_null()
        && record["lastSalePrice"].is_null()
    {
        return None;
    }

    Some(PropertyDetails {
        year_built: record["yearBuilt"]
            .as_i64()
            .and_then(|y| plausible_year_built(y, current_year)),
        square_footage: crate::json_u32(&record["squareFootage"]),
        market_price: crate::json_currency(&record["lastSalePrice"]),
        estimated_value: crate::json_currency(&record["price"]),
        bedrooms: crate::json_u32(&record["bedrooms"]),
        bathrooms: crate::json_u32(&record["bathrooms"]),
    })
}

/// Parses a listing search response.
///
/// A bare array of listings, or `{"listings": [...]}` on newer API
/// versions. Items without coordinates are skipped.
fn parse_neighbors(body: &serde_json::Value, current_year: i32) -> Vec<RawNeighbor> {
    let items: Vec<&serde_json::Value> = if let Some(array) = body.as_array() {
        array.iter().collect()
    } else if let Some(array) = body["listings"].as_array() {
        array.iter().collect()
    } else {
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| {
            Some(RawNeighbor {
                address: item["formattedAddress"].as_str()?.to_string(),
                latitude: item["latitude"].as_f64()?,
                longitude: item["longitude"].as_f64()?,
                market_price: crate::json_currency(&item["price"]),
                zestimate: None,
                living_area: crate::json_u32(&item["squareFootage"]),
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
    fn parses_search_array_and_single_object() {
        let record = serde_json::json!({
            "id": "101-E-Capitol-St-NE",
            "formattedAddress": "101 E Capitol St NE, Washington, DC 20003",
            "latitude": 38.8898, "longitude": -76.9905
        });

        let from_array = parse_suggestions(&serde_json::json!([record]));
        assert_eq!(from_array.len(), 1);
        assert_eq!(from_array[0].stable_id, "101-E-Capitol-St-NE");

        let from_single = parse_suggestions(&record);
        assert_eq!(from_single.len(), 1);
        assert_eq!(from_single[0].address, from_array[0].address);
    }

    #[test]
    fn search_empty_on_unrecognized_shape() {
        assert!(parse_suggestions(&serde_json::json!({"status": "error"})).is_empty());
        assert!(parse_suggestions(&serde_json::json!(7)).is_empty());
    }

    #[test]
    fn parses_details_object_and_wrapped_array() {
        let record = serde_json::json!({
            "yearBuilt": 1921, "squareFootage": 1_850,
            "lastSalePrice": 505_000, "bedrooms": 3, "bathrooms": 2
        });
        let details = parse_details(&record, 2025).unwrap();
        assert_eq!(details.market_price, Some(505_000));
        assert_eq!(details.square_footage, Some(1_850));

        let details = parse_details(&serde_json::json!([record]), 2025).unwrap();
        assert_eq!(details.year_built, Some(1921));
    }

    #[test]
    fn details_nulls_implausible_year() {
        let record = serde_json::json!({ "yearBuilt": 1750, "squareFootage": 900 });
        assert_eq!(parse_details(&record, 2025).unwrap().year_built, None);
    }

    #[test]
    fn details_none_for_empty_record() {
        assert!(parse_details(&serde_json::json!({}), 2025).is_none());
        assert!(parse_details(&serde_json::json!([]), 2025).is_none());
    }

    #[test]
    fn parses_listings() {
        let body = serde_json::json!({
            "listings": [{
                "formattedAddress": "105 E Capitol St NE",
                "latitude": 38.8899, "longitude": -76.9901,
                "price": 610_000, "squareFootage": 2_100, "yearBuilt": 1923
            }]
        });
        let neighbors = parse_neighbors(&body, 2025);
        assert_eq!(neighbors.len(), 1);
        assert_eq!(neighbors[0].market_price, Some(610_000));
        assert_eq!(neighbors[0].zestimate, None);
    }

    #[test]
    fn listings_skip_missing_coordinates() {
        let body = serde_json::json!([{ "formattedAddress": "NOWHERE" }]);
        assert!(parse_neighbors(&body, 2025).is_empty());
    }
}
