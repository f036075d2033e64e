#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Canonical record schema for the fire-preplan valuation engine.
//!
//! This crate defines the shared data model consumed and produced by the
//! engine: building records, life-saved records, neighbor candidates, and
//! the provenance metadata attached during enrichment. The CSV importer
//! and the manual-entry form both normalize into these types before
//! calling the engine, and the report layer consumes them afterwards.

pub mod life;
pub mod neighbor;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Top-level property classification for a building record.
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
pub enum PropertyType {
    /// Dwellings: houses, apartments, mobile homes
    Residential,
    /// Businesses: offices, retail, restaurants, hotels
    Commercial,
    /// Manufacturing and bulk storage facilities
    Industrial,
    /// Schools, hospitals, churches and other civic buildings
    Institutional,
}

impl PropertyType {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Residential,
            Self::Commercial,
            Self::Industrial,
            Self::Institutional,
        ]
    }
}

/// Specific structure type within each top-level [`PropertyType`].
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
pub enum StructureType {
    // ── Residential ─────────────────────────────────────
    /// Detached single-family dwelling
    SingleFamily,
    /// Two-to-four unit dwelling (duplex, triplex, quad)
    MultiFamily,
    /// Five or more units under one roof
    Apartment,
    /// Attached row housing
    Townhouse,
    /// Manufactured or mobile home
    MobileHome,

    // ── Commercial ──────────────────────────────────────
    /// Office building
    Office,
    /// Retail storefront or shopping structure
    Retail,
    /// Restaurant or food-service occupancy
    Restaurant,
    /// Commercial warehouse or distribution space
    Warehouse,
    /// Hotel or motel occupancy
    Hotel,

    // ── Industrial ──────────────────────────────────────
    /// Manufacturing facility
    Factory,
    /// Processing plant (chemical, food, materials)
    ProcessingPlant,
    /// Industrial bulk storage
    Storage,

    // ── Institutional ───────────────────────────────────
    /// School or educational occupancy
    School,
    /// Hospital or medical care facility
    Hospital,
    /// Church or place of assembly
    Church,
}

impl StructureType {
    /// Returns the parent [`PropertyType`] for this structure type.
    #[must_use]
    pub const fn property_type(self) -> PropertyType {
        match self {
            Self::SingleFamily
            | Self::MultiFamily
            | Self::Apartment
            | Self::Townhouse
            | Self::MobileHome => PropertyType::Residential,

            Self::Office | Self::Retail | Self::Restaurant | Self::Warehouse | Self::Hotel => {
                PropertyType::Commercial
            }

            Self::Factory | Self::ProcessingPlant | Self::Storage => PropertyType::Industrial,

            Self::School | Self::Hospital | Self::Church => PropertyType::Institutional,
        }
    }

    /// Returns all structure types belonging to the given property type.
    #[must_use]
    pub fn for_property_type(property_type: PropertyType) -> Vec<Self> {
        Self::all()
            .iter()
            .copied()
            .filter(|s| s.property_type() == property_type)
            .collect()
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::SingleFamily,
            Self::MultiFamily,
            Self::Apartment,
            Self::Townhouse,
            Self::MobileHome,
            Self::Office,
            Self::Retail,
            Self::Restaurant,
            Self::Warehouse,
            Self::Hotel,
            Self::Factory,
            Self::ProcessingPlant,
            Self::Storage,
            Self::School,
            Self::Hospital,
            Self::Church,
        ]
    }
}

/// Construction method of a structure, used as a cost multiplier key.
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
pub enum ConstructionType {
    /// Wood-frame construction
    WoodFrame,
    /// Masonry (brick, block, stone)
    Masonry,
    /// Structural steel frame
    SteelFrame,
    /// Poured or precast concrete
    Concrete,
    /// Mixed construction types
    Mixed,
}

/// Observed condition of a structure, used as a cost multiplier key.
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
pub enum Condition {
    /// Recently built or fully renovated
    Excellent,
    /// Well maintained, normal wear
    Good,
    /// Deferred maintenance visible
    Fair,
    /// Significant deterioration
    Poor,
}

/// Which external provider supplied an enriched field, per record.
///
/// Invariant: a field has a provenance entry if and only if that field is
/// non-null on the record. Maintained by the enrichment coordinator and
/// checked by its tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance(BTreeMap<ProvenanceField, Vec<String>>);

/// Enrichable fields tracked by [`Provenance`].
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
#[strum(serialize_all = "snake_case")]
pub enum ProvenanceField {
    /// Year the structure was built.
    YearBuilt,
    /// Finished square footage.
    SquareFootage,
    /// Market value estimate.
    MarketValue,
}

impl Provenance {
    /// Records that `provider` contributed the given field.
    ///
    /// A provider is recorded at most once per field.
    pub fn record(&mut self, field: ProvenanceField, provider: &str) {
        let providers = self.0.entry(field).or_default();
        if !providers.iter().any(|p| p == provider) {
            providers.push(provider.to_string());
        }
    }

    /// Returns the providers that contributed the given field, if any.
    #[must_use]
    pub fn providers_for(&self, field: ProvenanceField) -> Option<&[String]> {
        self.0.get(&field).map(Vec::as_slice)
    }

    /// Returns `true` if no field has a provenance entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Where a record's data came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// No provider resolved the address; the record carries only the
    /// fields it was ingested with.
    #[default]
    InputOnly,
    /// The named provider validated the address (and possibly enriched
    /// the record).
    Provider(String),
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InputOnly => write!(f, "input-only"),
            Self::Provider(name) => write!(f, "{name}"),
        }
    }
}

/// A building record for emergency-response planning.
///
/// Created from manual entry, a CSV row, or a neighbor candidate.
/// `value` is derived by the cost model and recomputed when `year_built`
/// or `square_footage` is corrected; `data_source` and `provenance` are
/// set by enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    /// Street address. Case-sensitive unique key within a batch.
    pub address: String,
    /// Top-level property classification.
    pub property_type: PropertyType,
    /// Specific structure type; must belong to `property_type`'s option
    /// set (validated at ingestion).
    pub structure_type: StructureType,
    /// Year the structure was built (1800-2025), if known.
    pub year_built: Option<i32>,
    /// Finished square footage, if known.
    pub square_footage: Option<u32>,
    /// Number of stories, if known.
    pub stories: Option<u32>,
    /// Construction method.
    pub construction_type: ConstructionType,
    /// Observed condition.
    pub condition: Condition,
    /// Regional cost adjustment in `[0.1, 3.0]`. Defaults to 1.0.
    #[serde(default = "default_local_multiplier")]
    pub local_multiplier: f64,
    /// Latitude (WGS84), set by address validation.
    pub latitude: Option<f64>,
    /// Longitude (WGS84), set by address validation.
    pub longitude: Option<f64>,
    /// Replacement-cost valuation in whole currency units. `None` when
    /// `year_built` or `square_footage` is absent.
    pub value: Option<i64>,
    /// Market value estimate from an external provider, if enriched.
    pub market_value: Option<i64>,
    /// Where this record's data came from.
    #[serde(default)]
    pub data_source: DataSource,
    /// Which provider supplied each enriched field.
    #[serde(default)]
    pub provenance: Provenance,
    /// Set when no provider could resolve the address, so downstream
    /// consumers can render a transparency notice.
    #[serde(default)]
    pub missing_market_data: bool,
}

const fn default_local_multiplier() -> f64 {
    1.0
}

impl PropertyRecord {
    /// Creates a record with the required fields; optional fields start
    /// absent and `local_multiplier` starts at 1.0.
    #[must_use]
    pub fn new(
        address: impl Into<String>,
        property_type: PropertyType,
        structure_type: StructureType,
        construction_type: ConstructionType,
        condition: Condition,
    ) -> Self {
        Self {
            address: address.into(),
            property_type,
            structure_type,
            year_built: None,
            square_footage: None,
            stories: None,
            construction_type,
            condition,
            local_multiplier: 1.0,
            latitude: None,
            longitude: None,
            value: None,
            market_value: None,
            data_source: DataSource::default(),
            provenance: Provenance::default(),
            missing_market_data: false,
        }
    }

    /// Corrects `year_built`, invalidating the derived `value` so the
    /// caller re-runs valuation.
    pub const fn correct_year_built(&mut self, year_built: Option<i32>) {
        self.year_built = year_built;
        self.value = None;
    }

    /// Corrects `square_footage`, invalidating the derived `value` so the
    /// caller re-runs valuation.
    pub const fn correct_square_footage(&mut self, square_footage: Option<u32>) {
        self.square_footage = square_footage;
        self.value = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn structure_parent_consistency() {
        for structure in StructureType::all() {
            let parent = structure.property_type();
            let members = StructureType::for_property_type(parent);
            assert!(
                members.contains(structure),
                "{structure:?} claims parent {parent:?} but isn't in for_property_type result"
            );
        }
    }

    #[test]
    fn every_property_type_has_structures() {
        for property_type in PropertyType::all() {
            assert!(
                !StructureType::for_property_type(*property_type).is_empty(),
                "{property_type:?} has no structure types"
            );
        }
    }

    #[test]
    fn parses_snake_case_enum_values() {
        assert_eq!(
            StructureType::from_str("single_family").unwrap(),
            StructureType::SingleFamily
        );
        assert_eq!(
            ConstructionType::from_str("wood_frame").unwrap(),
            ConstructionType::WoodFrame
        );
        assert_eq!(Condition::from_str("good").unwrap(), Condition::Good);
        assert!(StructureType::from_str("castle").is_err());
    }

    #[test]
    fn provenance_records_each_provider_once() {
        let mut provenance = Provenance::default();
        provenance.record(ProvenanceField::YearBuilt, "zillow");
        provenance.record(ProvenanceField::YearBuilt, "zillow");
        provenance.record(ProvenanceField::YearBuilt, "rentcast");
        assert_eq!(
            provenance.providers_for(ProvenanceField::YearBuilt),
            Some(&["zillow".to_string(), "rentcast".to_string()][..])
        );
        assert!(provenance.providers_for(ProvenanceField::MarketValue).is_none());
    }

    #[test]
    fn corrections_invalidate_value() {
        let mut record = PropertyRecord::new(
            "100 MAIN ST",
            PropertyType::Residential,
            StructureType::SingleFamily,
            ConstructionType::WoodFrame,
            Condition::Good,
        );
        record.value = Some(228_000);
        record.correct_year_built(Some(1990));
        assert_eq!(record.value, None);

        record.value = Some(200_000);
        record.correct_square_footage(Some(1800));
        assert_eq!(record.value, None);
    }

    #[test]
    fn data_source_display() {
        assert_eq!(DataSource::InputOnly.to_string(), "input-only");
        assert_eq!(
            DataSource::Provider("zillow".to_string()).to_string(),
            "zillow"
        );
    }
}
