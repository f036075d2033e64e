//! Neighbor candidate types produced by the geospatial classifier.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Spatial relationship of a neighbor to the target building.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum NeighborCategory {
    /// Shares a wall or lot line with the target.
    Immediate,
    /// Directly across the street from the target.
    Across,
    /// Next lot over.
    Adjacent,
    /// Same block.
    Nearby,
    /// Within the search radius but not otherwise related.
    Area,
}

/// Eight-point compass direction from the target to a neighbor.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum CompassDirection {
    /// North.
    N,
    /// Northeast.
    Ne,
    /// East.
    E,
    /// Southeast.
    Se,
    /// South.
    S,
    /// Southwest.
    Sw,
    /// West.
    W,
    /// Northwest.
    Nw,
}

/// An unvalidated neighboring building returned by a provider, positioned
/// and categorized relative to a target coordinate.
///
/// Produced by the geospatial classifier over raw provider results;
/// consumed by the enrichment coordinator to become a `PropertyRecord`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighborCandidate {
    /// Street address of the neighbor.
    pub address: String,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Recorded market/sale price, if the provider supplied one.
    pub market_price: Option<i64>,
    /// Automated value estimate, if the provider supplied one.
    pub zestimate: Option<i64>,
    /// Finished living area in square feet, if known.
    pub living_area: Option<u32>,
    /// Year built, if known.
    pub year_built: Option<i32>,
    /// Great-circle distance from the target in meters. Non-negative.
    pub distance_m: f64,
    /// Compass direction from the target.
    pub direction: CompassDirection,
    /// Spatial relationship to the target.
    pub category: NeighborCategory,
}
