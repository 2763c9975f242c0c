//! Locators: placement policies, one per location type.
//!
//! A locator turns (item, context) into an ordered list of [`TransformOp`].
//! Every hook has a default body, so a strategy only overrides what it needs.
//! Strategies that build on another one (flex on list, deck on list) hold it
//! as a field instead of inheriting from it.

mod deck;
mod delegate;
mod flex;
mod grid;
mod hand;
mod hex;
mod list;
mod pile;
mod placeholder;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::context::{ItemContext, MaterialContext};
use crate::drop::{DragState, DropCandidate, prefer_current_rotation};
use crate::error::PlacementError;
use crate::location::{Location, LocationType, MaterialItem, MaterialType};
use crate::transform::{Coordinates, Pose, TransformOp};

pub use deck::DeckLocator;
pub use delegate::{DelegateLocator, LocatorRoute};
pub use flex::FlexLocator;
pub use grid::GridLocator;
pub use hand::HandLocator;
pub use hex::{HexGridSystem, HexagonalGridLocator, DEFAULT_ANGLE_PENALTY};
pub use list::{ListAlignment, ListLocator, compressed_gap};
pub use pile::{PileCache, PileJitter, PileLocator};
pub use placeholder::PlaceholderLocator;

/// Anchor of a nested item on its host, in percent of the host size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionOnParent {
    pub x: f32,
    pub y: f32,
}

impl PositionOnParent {
    pub const CENTER: PositionOnParent = PositionOnParent { x: 50.0, y: 50.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Default for PositionOnParent {
    fn default() -> Self {
        Self::CENTER
    }
}

/// Settings shared by every locator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LocatorBase {
    /// Origin of the area.
    #[serde(default)]
    pub coordinates: Coordinates,
    /// Base rotation of the area, degrees.
    #[serde(default)]
    pub rotation: f32,
    /// Maximum number of displayed instances in one area.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// Material type hosting the items of this location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_item_type: Option<MaterialType>,
    #[serde(default)]
    pub position_on_parent: PositionOnParent,
}

/// Builder methods for the shared settings.
pub trait LocatorSetup: Sized {
    fn base_mut(&mut self) -> &mut LocatorBase;

    fn at(mut self, coordinates: Coordinates) -> Self {
        self.base_mut().coordinates = coordinates;
        self
    }

    fn rotated(mut self, degrees: f32) -> Self {
        self.base_mut().rotation = degrees;
        self
    }

    fn limited(mut self, limit: usize) -> Self {
        self.base_mut().limit = Some(limit);
        self
    }

    fn on_parent(mut self, parent_item_type: MaterialType) -> Self {
        self.base_mut().parent_item_type = Some(parent_item_type);
        self
    }

    fn anchored(mut self, position: PositionOnParent) -> Self {
        self.base_mut().position_on_parent = position;
        self
    }
}

/// Placement policy of one location type.
pub trait Locator: fmt::Debug + Send + Sync {
    fn base(&self) -> &LocatorBase;

    fn parent_item_type(&self) -> Option<MaterialType> {
        self.base().parent_item_type
    }

    fn limit(&self) -> Option<usize> {
        self.base().limit
    }

    fn position_on_parent(
        &self,
        _location: &Location,
        _ctx: &MaterialContext<'_>,
    ) -> PositionOnParent {
        self.base().position_on_parent
    }

    /// Origin of the area holding `location`.
    fn coordinates(&self, _location: &Location, _ctx: &MaterialContext<'_>) -> Coordinates {
        self.base().coordinates
    }

    /// Static locations of the zone (empty slots, drop areas).
    fn locations(&self, _ctx: &MaterialContext<'_>) -> Vec<Location> {
        Vec::new()
    }

    /// Local position of a location, parent excluded.
    fn location_coordinates(
        &self,
        location: &Location,
        ctx: &MaterialContext<'_>,
    ) -> Result<Coordinates, PlacementError> {
        Ok(self.coordinates(location, ctx))
    }

    fn location_rotation(&self, location: &Location, _ctx: &MaterialContext<'_>) -> f32 {
        self.base().rotation + location.rotation.unwrap_or(0.0)
    }

    /// Local position of an item, parent excluded.
    fn item_coordinates(
        &self,
        item: &MaterialItem,
        ctx: &ItemContext<'_>,
    ) -> Result<Coordinates, PlacementError> {
        self.location_coordinates(&item.location, &ctx.material)
    }

    fn item_rotation(&self, item: &MaterialItem, ctx: &ItemContext<'_>) -> Result<f32, PlacementError> {
        Ok(self.location_rotation(&item.location, &ctx.material))
    }

    /// Ordering key of the instance within its area.
    fn item_index(&self, item: &MaterialItem, ctx: &ItemContext<'_>) -> usize {
        default_item_index(item, ctx)
    }

    /// Number of pieces sharing the area of `location`.
    fn count_items(&self, location: &Location, ctx: &ItemContext<'_>) -> usize {
        count_area_items(location, ctx)
    }

    fn hide(&self, item: &MaterialItem, ctx: &ItemContext<'_>) -> bool {
        self.limit()
            .is_some_and(|limit| self.item_index(item, ctx) >= limit)
    }

    /// Full placement: host chain, anchor, local translation, local rotation.
    fn place_item(
        &self,
        item: &MaterialItem,
        ctx: &ItemContext<'_>,
    ) -> Result<Vec<TransformOp>, PlacementError> {
        let mut ops = match self.parent_item_type() {
            Some(parent_kind) => self.place_on_parent(&item.location, parent_kind, ctx)?,
            None => Vec::new(),
        };
        ops.push(TransformOp::translate(self.item_coordinates(item, ctx)?));
        let rotation = self.item_rotation(item, ctx)?;
        if rotation != 0.0 {
            ops.push(TransformOp::rotate_z(rotation));
        }
        Ok(ops)
    }

    /// Placement of an empty location (drop area, waypoint).
    fn place_location(
        &self,
        location: &Location,
        ctx: &MaterialContext<'_>,
    ) -> Result<Vec<TransformOp>, PlacementError> {
        let mut ops = match (self.parent_item_type(), location.parent) {
            (Some(parent_kind), Some(parent_index)) => {
                let host = ctx.item(parent_kind, parent_index, 0);
                let mut ops = place_host(&host, parent_kind, parent_index, parent_kind, parent_index)?;
                ops.push(TransformOp::translate(
                    self.anchor_offset(location, parent_kind, ctx),
                ));
                ops
            }
            _ => Vec::new(),
        };
        ops.push(TransformOp::translate(self.location_coordinates(location, ctx)?));
        let rotation = self.location_rotation(location, ctx);
        if rotation != 0.0 {
            ops.push(TransformOp::rotate_z(rotation));
        }
        Ok(ops)
    }

    /// Host transform followed by the percentage anchor on the host's face.
    fn place_on_parent(
        &self,
        location: &Location,
        parent_kind: MaterialType,
        ctx: &ItemContext<'_>,
    ) -> Result<Vec<TransformOp>, PlacementError> {
        let parent_index = location.parent.ok_or(PlacementError::ParentNotSet {
            kind: ctx.kind,
            index: ctx.index,
        })?;
        let host = ctx.parent(parent_kind, parent_index)?;
        let mut ops = place_host(&host, parent_kind, parent_index, ctx.kind, ctx.index)?;
        ops.push(TransformOp::translate(
            self.anchor_offset(location, parent_kind, &ctx.material),
        ));
        Ok(ops)
    }

    /// Offset of the anchor from the host's center, on top of its face.
    fn anchor_offset(
        &self,
        location: &Location,
        parent_kind: MaterialType,
        ctx: &MaterialContext<'_>,
    ) -> Coordinates {
        let anchor = self.position_on_parent(location, ctx);
        let thickness = ctx.materials.thickness(parent_kind);
        match ctx.materials.size(parent_kind) {
            Some(size) => Coordinates::new(
                (anchor.x - 50.0) * size.width / 100.0,
                (anchor.y - 50.0) * size.height / 100.0,
                thickness,
            ),
            None => Coordinates::new(0.0, 0.0, thickness),
        }
    }

    /// Picks one of several legal drops on this location type.
    fn select_drop_move(
        &self,
        drag: &DragState,
        candidates: &[DropCandidate<'_>],
        _ctx: &MaterialContext<'_>,
    ) -> Option<usize> {
        prefer_current_rotation(drag, candidates)
    }
}

/// Resolves the host item through its own locator.
fn place_host(
    host: &ItemContext<'_>,
    parent_kind: MaterialType,
    parent_index: usize,
    kind: MaterialType,
    index: usize,
) -> Result<Vec<TransformOp>, PlacementError> {
    let parent = host.stored_item().map_err(|_| PlacementError::MissingParent {
        kind,
        index,
        parent_kind,
        parent_index,
    })?;
    let locator = host
        .material
        .locators
        .get(parent.location.kind)
        .ok_or(PlacementError::UnregisteredLocator(parent.location.kind))?;
    locator.place_item(parent, host)
}

/// First non-negative coordinate among `x`, `y` and `z`.
pub fn precise_index(location: &Location) -> Option<usize> {
    [location.x, location.y, location.z]
        .into_iter()
        .flatten()
        .find_map(|value| usize::try_from(value).ok())
}

/// `location.x`, else `y`, else `z`, else the display slot.
///
/// Negative coordinates are skipped.
pub fn default_item_index(item: &MaterialItem, ctx: &ItemContext<'_>) -> usize {
    precise_index(&item.location).unwrap_or_else(|| display_slot(item, ctx))
}

/// Pieces of earlier items in the same area, plus the instance's display index.
pub fn display_slot(item: &MaterialItem, ctx: &ItemContext<'_>) -> usize {
    let before: u32 = ctx
        .material
        .snapshot
        .items_in_area(ctx.kind, &item.location)
        .filter(|(index, _)| *index < ctx.index)
        .map(|(_, other)| other.quantity())
        .sum();
    before as usize + ctx.display_index
}

/// Sum of quantities of the items of the context's type in the area.
pub fn count_area_items(location: &Location, ctx: &ItemContext<'_>) -> usize {
    ctx.material
        .snapshot
        .items_in_area(ctx.kind, location)
        .map(|(_, item)| item.quantity() as usize)
        .sum()
}

/// Sum of quantities of every item type in the area (used for empty slots).
pub fn count_all_in_area(location: &Location, ctx: &MaterialContext<'_>) -> usize {
    ctx.snapshot
        .items
        .values()
        .flatten()
        .filter(|item| item.location.same_area(location))
        .map(|item| item.quantity() as usize)
        .sum()
}

/// Locators keyed by location type.
#[derive(Debug, Clone, Default)]
pub struct LocatorRegistry {
    locators: HashMap<LocationType, Arc<dyn Locator>>,
}

impl LocatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: LocationType, locator: impl Locator + 'static) {
        self.locators.insert(kind, Arc::new(locator));
    }

    pub fn register_shared(&mut self, kind: LocationType, locator: Arc<dyn Locator>) {
        self.locators.insert(kind, locator);
    }

    pub fn with(mut self, kind: LocationType, locator: impl Locator + 'static) -> Self {
        self.register(kind, locator);
        self
    }

    pub fn get(&self, kind: LocationType) -> Option<&dyn Locator> {
        self.locators.get(&kind).map(AsRef::as_ref)
    }

    /// Registered locators, ordered by location type.
    pub fn iter(&self) -> impl Iterator<Item = (LocationType, &dyn Locator)> {
        let mut entries: Vec<_> = self
            .locators
            .iter()
            .map(|(kind, locator)| (*kind, locator.as_ref()))
            .collect();
        entries.sort_by_key(|(kind, _)| *kind);
        entries.into_iter()
    }

    pub fn len(&self) -> usize {
        self.locators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locators.is_empty()
    }

    /// Pose of a location in table coordinates.
    pub fn location_pose(
        &self,
        location: &Location,
        ctx: &MaterialContext<'_>,
    ) -> Result<Pose, PlacementError> {
        let locator = self
            .get(location.kind)
            .ok_or(PlacementError::UnregisteredLocator(location.kind))?;
        Ok(Pose::from_ops(&locator.place_location(location, ctx)?))
    }
}
