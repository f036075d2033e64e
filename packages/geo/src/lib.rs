#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Great-circle geometry and neighbor classification.
//!
//! Pure geometry: haversine distance, initial bearing, and assignment of
//! a [`NeighborCategory`] to a candidate relative to a target building.
//! Includes the same-street parity heuristic that distinguishes "across
//! the street" from merely close.
//!
//! Category distance thresholds differ slightly per data provider, so
//! they are expressed as named [`ThresholdProfile`]s; a classification
//! pass uses exactly one profile.

pub mod street;

use preplan_models::neighbor::{CompassDirection, NeighborCandidate, NeighborCategory};

/// Mean Earth radius in meters. The one radius used engine-wide.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Maximum distance in meters for the across-the-street heuristic,
/// shared by all profiles.
pub const ACROSS_STREET_MAX_M: f64 = 100.0;

/// Distance thresholds (meters) for neighbor categories.
///
/// Two named profiles exist because upstream data providers draw the
/// adjacent band differently; each provider definition names the profile
/// it was calibrated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdProfile {
    /// immediate <= 30 m, adjacent <= 60 m, nearby <= 150 m.
    Standard,
    /// immediate <= 30 m, adjacent <= 80 m, nearby <= 150 m.
    Wide,
}

impl ThresholdProfile {
    /// Upper bound in meters for the `Immediate` category.
    #[must_use]
    pub const fn immediate_m(self) -> f64 {
        30.0
    }

    /// Upper bound in meters for the `Adjacent` category.
    #[must_use]
    pub const fn adjacent_m(self) -> f64 {
        match self {
            Self::Standard => 60.0,
            Self::Wide => 80.0,
        }
    }

    /// Upper bound in meters for the `Nearby` category.
    #[must_use]
    pub const fn nearby_m(self) -> f64 {
        150.0
    }
}

/// Result of classifying a candidate against a target coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    /// Great-circle distance in meters.
    pub distance_m: f64,
    /// Compass direction from target to candidate.
    pub direction: CompassDirection,
    /// Assigned neighbor category.
    pub category: NeighborCategory,
}

/// Great-circle distance between two WGS84 points, in meters.
///
/// Haversine formula with [`EARTH_RADIUS_M`].
#[must_use]
pub fn haversine_distance_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = (lat2 - lat1).to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Initial bearing from the first point to the second, in degrees
/// clockwise from north, normalized to `[0, 360)`.
#[must_use]
pub fn initial_bearing_deg(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let y = delta_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

/// Converts a bearing in degrees to one of 8 compass points.
///
/// Each point owns a 45-degree sector centered on its heading.
#[must_use]
pub fn compass_direction(bearing_deg: f64) -> CompassDirection {
    let normalized = ((bearing_deg % 360.0) + 360.0) % 360.0;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let sector = ((normalized + 22.5) / 45.0).floor() as usize % 8;
    match sector {
        0 => CompassDirection::N,
        1 => CompassDirection::Ne,
        2 => CompassDirection::E,
        3 => CompassDirection::Se,
        4 => CompassDirection::S,
        5 => CompassDirection::Sw,
        6 => CompassDirection::W,
        _ => CompassDirection::Nw,
    }
}

/// Classifies a candidate building relative to a target.
///
/// Decision order:
///
/// 1. same street, opposite house-number parity, and within
///    [`ACROSS_STREET_MAX_M`] → `Across`
/// 2. within `immediate_m` → `Immediate`
/// 3. within `adjacent_m` → `Adjacent`
/// 4. within `nearby_m` → `Nearby`
/// 5. otherwise → `Area`
#[must_use]
pub fn classify(
    target_lat: f64,
    target_lon: f64,
    candidate_lat: f64,
    candidate_lon: f64,
    target_address: &str,
    candidate_address: &str,
    profile: ThresholdProfile,
) -> Classification {
    let distance_m = haversine_distance_m(target_lat, target_lon, candidate_lat, candidate_lon);
    let direction = compass_direction(initial_bearing_deg(
        target_lat,
        target_lon,
        candidate_lat,
        candidate_lon,
    ));

    let category = if distance_m <= ACROSS_STREET_MAX_M
        && street::is_across_street_pair(target_address, candidate_address)
    {
        NeighborCategory::Across
    } else if distance_m <= profile.immediate_m() {
        NeighborCategory::Immediate
    } else if distance_m <= profile.adjacent_m() {
        NeighborCategory::Adjacent
    } else if distance_m <= profile.nearby_m() {
        NeighborCategory::Nearby
    } else {
        NeighborCategory::Area
    };

    Classification {
        distance_m,
        direction,
        category,
    }
}

/// Options for filtering a classified neighbor set.
#[derive(Debug, Clone, Copy)]
pub struct NeighborFilter {
    /// Maximum distance in meters from the target.
    pub radius_m: f64,
    /// Whether `Across` neighbors are kept.
    pub include_across: bool,
    /// Maximum number of results after sorting by ascending distance.
    pub max_results: usize,
}

/// Filters classified candidates to the caller's radius, optionally
/// drops `Across` neighbors, sorts by ascending distance, and truncates
/// to `max_results`.
#[must_use]
pub fn filter_neighbors(
    mut candidates: Vec<NeighborCandidate>,
    filter: &NeighborFilter,
) -> Vec<NeighborCandidate> {
    candidates.retain(|c| {
        c.distance_m <= filter.radius_m
            && (filter.include_across || c.category != NeighborCategory::Across)
    });
    candidates.sort_by(|a, b| {
        a.distance_m
            .partial_cmp(&b.distance_m)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    candidates.truncate(filter.max_results);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    // Two points on E Capitol St NE, Washington DC, ~40 m apart.
    const TARGET: (f64, f64) = (38.889_82, -76.990_55);
    const ACROSS: (f64, f64) = (38.890_18, -76.990_55);

    fn candidate(address: &str, distance_m: f64, category: NeighborCategory) -> NeighborCandidate {
        NeighborCandidate {
            address: address.to_string(),
            latitude: 0.0,
            longitude: 0.0,
            market_price: None,
            zestimate: None,
            living_area: None,
            year_built: None,
            distance_m,
            direction: CompassDirection::N,
            category,
        }
    }

    #[test]
    fn haversine_five_km() {
        // ~5 km of latitude is ~0.04497 degrees.
        let d = haversine_distance_m(38.9, -77.0, 38.944_966, -77.0);
        assert!((d - 5_000.0).abs() < 5.0, "expected ~5000 m, got {d}");
    }

    #[test]
    fn haversine_zero_distance() {
        let d = haversine_distance_m(38.9, -77.0, 38.9, -77.0);
        assert!(d.abs() < 1e-9);
    }

    #[test]
    fn bearing_cardinal_directions() {
        assert_eq!(compass_direction(initial_bearing_deg(38.9, -77.0, 39.0, -77.0)), CompassDirection::N);
        assert_eq!(compass_direction(initial_bearing_deg(38.9, -77.0, 38.8, -77.0)), CompassDirection::S);
        assert_eq!(compass_direction(initial_bearing_deg(38.9, -77.0, 38.9, -76.9)), CompassDirection::E);
        assert_eq!(compass_direction(initial_bearing_deg(38.9, -77.0, 38.9, -77.1)), CompassDirection::W);
    }

    #[test]
    fn compass_sector_boundaries() {
        assert_eq!(compass_direction(0.0), CompassDirection::N);
        assert_eq!(compass_direction(22.4), CompassDirection::N);
        assert_eq!(compass_direction(22.5), CompassDirection::Ne);
        assert_eq!(compass_direction(337.5), CompassDirection::N);
        assert_eq!(compass_direction(337.4), CompassDirection::Nw);
        assert_eq!(compass_direction(359.9), CompassDirection::N);
        assert_eq!(compass_direction(-45.0), CompassDirection::Nw);
    }

    #[test]
    fn five_thousand_meters_is_area() {
        let result = classify(
            38.9,
            -77.0,
            38.944_966,
            -77.0,
            "100 MAIN ST",
            "4000 OAK AVE",
            ThresholdProfile::Standard,
        );
        assert_eq!(result.category, NeighborCategory::Area);
        assert!((result.distance_m - 5_000.0).abs() < 5.0);
    }

    #[test]
    fn opposite_parity_same_street_forty_meters_is_across() {
        let result = classify(
            TARGET.0,
            TARGET.1,
            ACROSS.0,
            ACROSS.1,
            "101 E CAPITOL ST NE",
            "102 E CAPITOL ST NE",
            ThresholdProfile::Standard,
        );
        assert!(
            (30.0..=60.0).contains(&result.distance_m),
            "fixture distance drifted: {}",
            result.distance_m
        );
        assert_eq!(result.category, NeighborCategory::Across);
    }

    #[test]
    fn same_parity_same_street_is_not_across() {
        let result = classify(
            TARGET.0,
            TARGET.1,
            ACROSS.0,
            ACROSS.1,
            "101 E CAPITOL ST NE",
            "103 E CAPITOL ST NE",
            ThresholdProfile::Standard,
        );
        assert_eq!(result.category, NeighborCategory::Adjacent);
    }

    #[test]
    fn profiles_differ_in_adjacent_band() {
        // ~70 m north of target.
        let seventy_north = (TARGET.0 + 0.000_63, TARGET.1);
        let standard = classify(
            TARGET.0,
            TARGET.1,
            seventy_north.0,
            seventy_north.1,
            "101 E CAPITOL ST NE",
            "800 OTHER RD",
            ThresholdProfile::Standard,
        );
        let wide = classify(
            TARGET.0,
            TARGET.1,
            seventy_north.0,
            seventy_north.1,
            "101 E CAPITOL ST NE",
            "800 OTHER RD",
            ThresholdProfile::Wide,
        );
        assert_eq!(standard.category, NeighborCategory::Nearby);
        assert_eq!(wide.category, NeighborCategory::Adjacent);
    }

    #[test]
    fn filter_sorts_truncates_and_respects_radius() {
        let candidates = vec![
            candidate("A", 120.0, NeighborCategory::Nearby),
            candidate("B", 20.0, NeighborCategory::Immediate),
            candidate("C", 500.0, NeighborCategory::Area),
            candidate("D", 45.0, NeighborCategory::Adjacent),
        ];
        let filtered = filter_neighbors(
            candidates,
            &NeighborFilter {
                radius_m: 200.0,
                include_across: true,
                max_results: 2,
            },
        );
        let addresses: Vec<&str> = filtered.iter().map(|c| c.address.as_str()).collect();
        assert_eq!(addresses, vec!["B", "D"]);
    }

    #[test]
    fn filter_can_exclude_across() {
        let candidates = vec![
            candidate("A", 40.0, NeighborCategory::Across),
            candidate("B", 50.0, NeighborCategory::Adjacent),
        ];
        let filtered = filter_neighbors(
            candidates,
            &NeighborFilter {
                radius_m: 200.0,
                include_across: false,
                max_results: 10,
            },
        );
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].address, "B");
    }
}
