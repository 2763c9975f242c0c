//! Error types of the placement engine.

use crate::locator::HexGridSystem;
use crate::location::{LocationType, MaterialType};

/// Errors raised while resolving placements.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlacementError {
    #[error("cyclic placement: item {kind}#{index} is nested inside itself")]
    CyclicPlacement { kind: MaterialType, index: usize },

    #[error("placement of item {kind}#{index} nests deeper than {max} levels")]
    NestingTooDeep {
        kind: MaterialType,
        index: usize,
        max: usize,
    },

    #[error("parent item {parent_kind}#{parent_index} of item {kind}#{index} does not exist")]
    MissingParent {
        kind: MaterialType,
        index: usize,
        parent_kind: MaterialType,
        parent_index: usize,
    },

    #[error("location of item {kind}#{index} has no parent index")]
    ParentNotSet { kind: MaterialType, index: usize },

    #[error("item {kind}#{index} does not exist")]
    MissingItem { kind: MaterialType, index: usize },

    #[error("no locator registered for location type {0}")]
    UnregisteredLocator(LocationType),

    #[error("hexagonal coordinate system {0:?} is not implemented")]
    UnsupportedHexSystem(HexGridSystem),
}

/// Errors raised while registering material or location descriptions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MaterialError {
    #[error("size of material {0} needs at least two of width, height and ratio")]
    UnderspecifiedSize(MaterialType),

    #[error("size of location {0} needs at least two of width, height and ratio")]
    UnderspecifiedLocationSize(LocationType),

    #[error("size of material {0} has a non-positive dimension")]
    InvalidSize(MaterialType),

    #[error("size of location {0} has a non-positive dimension")]
    InvalidLocationSize(LocationType),
}

/// Errors raised while loading engine settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}
