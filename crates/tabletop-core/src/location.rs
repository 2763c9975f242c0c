//! Locations, items and game-state snapshots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Identifier of a location type (one locator per type).
pub type LocationType = u32;

/// Identifier of a material type (cards, coins, dice...).
pub type MaterialType = u32;

/// Identifier of a player.
pub type PlayerId = u32;

/// Identifier carried by an item or a location (card face, token color...).
pub type ItemId = i64;

/// A typed slot descriptor.
///
/// With `x`, `y` and `z` omitted a location describes an *area*: every
/// location sharing the same type, player, parent and id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(rename = "type")]
    pub kind: LocationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<PlayerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<i32>,
    /// Rotation state in degrees around the table normal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f32>,
}

impl Location {
    pub fn new(kind: LocationType) -> Self {
        Self {
            kind,
            player: None,
            parent: None,
            id: None,
            x: None,
            y: None,
            z: None,
            rotation: None,
        }
    }

    pub fn player(mut self, player: PlayerId) -> Self {
        self.player = Some(player);
        self
    }

    pub fn parent(mut self, parent: usize) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn id(mut self, id: ItemId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn x(mut self, x: i32) -> Self {
        self.x = Some(x);
        self
    }

    pub fn y(mut self, y: i32) -> Self {
        self.y = Some(y);
        self
    }

    pub fn z(mut self, z: i32) -> Self {
        self.z = Some(z);
        self
    }

    pub fn rotation(mut self, rotation: f32) -> Self {
        self.rotation = Some(rotation);
        self
    }

    /// Returns true when both locations belong to the same area.
    pub fn same_area(&self, other: &Location) -> bool {
        self.kind == other.kind
            && self.player == other.player
            && self.parent == other.parent
            && self.id == other.id
    }

    /// Returns true when the location names a precise slot rather than an area.
    pub fn is_precise(&self) -> bool {
        self.x.is_some() || self.y.is_some() || self.z.is_some()
    }

    /// Same area and same x/y/z; rotation is ignored.
    pub fn same_slot(&self, other: &Location) -> bool {
        self.same_area(other) && self.x == other.x && self.y == other.y && self.z == other.z
    }

    /// The area this location belongs to.
    pub fn area(&self) -> Location {
        Location {
            x: None,
            y: None,
            z: None,
            rotation: None,
            ..self.clone()
        }
    }

    /// Stable key of the area, used to address per-area caches.
    pub fn area_key(&self) -> String {
        fn part<T: ToString>(value: Option<T>) -> String {
            value.map_or_else(|| "-".to_string(), |v| v.to_string())
        }
        format!(
            "{}:{}:{}:{}",
            self.kind,
            part(self.player),
            part(self.parent),
            part(self.id)
        )
    }
}

/// A placed game piece.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
    pub location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,
}

impl MaterialItem {
    pub fn new(location: Location) -> Self {
        Self {
            id: None,
            location,
            quantity: None,
            selected: None,
        }
    }

    pub fn with_id(mut self, id: ItemId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Number of pieces in the stack, 1 when unset.
    pub fn quantity(&self) -> u32 {
        self.quantity.unwrap_or(1)
    }

    /// Returns true when `other` can merge into this stack: same id, same slot.
    pub fn mergeable_with(&self, other: &MaterialItem) -> bool {
        self.id == other.id && self.location.same_slot(&other.location)
    }
}

/// Immutable view of one game state: items keyed by material type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    #[serde(default)]
    pub items: BTreeMap<MaterialType, Vec<MaterialItem>>,
}

impl GameSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an item and returns its index within its material type.
    pub fn push(&mut self, kind: MaterialType, item: MaterialItem) -> usize {
        let items = self.items.entry(kind).or_default();
        items.push(item);
        items.len() - 1
    }

    pub fn with(mut self, kind: MaterialType, item: MaterialItem) -> Self {
        self.push(kind, item);
        self
    }

    pub fn items(&self, kind: MaterialType) -> &[MaterialItem] {
        self.items.get(&kind).map_or(&[], Vec::as_slice)
    }

    pub fn item(&self, kind: MaterialType, index: usize) -> Option<&MaterialItem> {
        self.items(kind).get(index)
    }

    /// Items of `kind` located in the area of `location`, with their indexes.
    pub fn items_in_area<'a>(
        &'a self,
        kind: MaterialType,
        location: &'a Location,
    ) -> impl Iterator<Item = (usize, &'a MaterialItem)> + 'a {
        self.items(kind)
            .iter()
            .enumerate()
            .filter(move |(_, item)| item.location.same_area(location))
    }
}
