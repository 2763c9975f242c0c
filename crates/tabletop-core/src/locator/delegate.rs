//! Routing locator: picks the actual strategy per location.

use std::fmt;
use std::sync::Arc;

use super::{Locator, LocatorBase, PositionOnParent};
use crate::context::{ItemContext, MaterialContext};
use crate::drop::{DragState, DropCandidate};
use crate::error::PlacementError;
use crate::location::{Location, MaterialItem, MaterialType};
use crate::transform::{Coordinates, TransformOp};

/// Chooses the locator in charge of a location.
pub type LocatorRoute = dyn Fn(&Location, &MaterialContext<'_>) -> Arc<dyn Locator> + Send + Sync;

/// Forwards every hook to the locator returned by `route`.
///
/// Typical use: a player area laid out as a hand for its owner and as a
/// deck for the other players.
pub struct DelegateLocator {
    base: LocatorBase,
    route: Box<LocatorRoute>,
}

impl fmt::Debug for DelegateLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegateLocator").finish_non_exhaustive()
    }
}

impl DelegateLocator {
    pub fn new(
        route: impl Fn(&Location, &MaterialContext<'_>) -> Arc<dyn Locator> + Send + Sync + 'static,
    ) -> Self {
        Self {
            base: LocatorBase::default(),
            route: Box::new(route),
        }
    }

    pub fn target(&self, location: &Location, ctx: &MaterialContext<'_>) -> Arc<dyn Locator> {
        (self.route)(location, ctx)
    }

    fn item_target(&self, item: &MaterialItem, ctx: &ItemContext<'_>) -> Arc<dyn Locator> {
        self.target(&item.location, &ctx.material)
    }
}

impl Locator for DelegateLocator {
    fn base(&self) -> &LocatorBase {
        &self.base
    }

    fn position_on_parent(&self, location: &Location, ctx: &MaterialContext<'_>) -> PositionOnParent {
        self.target(location, ctx).position_on_parent(location, ctx)
    }

    fn coordinates(&self, location: &Location, ctx: &MaterialContext<'_>) -> Coordinates {
        self.target(location, ctx).coordinates(location, ctx)
    }

    fn location_coordinates(
        &self,
        location: &Location,
        ctx: &MaterialContext<'_>,
    ) -> Result<Coordinates, PlacementError> {
        self.target(location, ctx).location_coordinates(location, ctx)
    }

    fn location_rotation(&self, location: &Location, ctx: &MaterialContext<'_>) -> f32 {
        self.target(location, ctx).location_rotation(location, ctx)
    }

    fn item_coordinates(
        &self,
        item: &MaterialItem,
        ctx: &ItemContext<'_>,
    ) -> Result<Coordinates, PlacementError> {
        self.item_target(item, ctx).item_coordinates(item, ctx)
    }

    fn item_rotation(&self, item: &MaterialItem, ctx: &ItemContext<'_>) -> Result<f32, PlacementError> {
        self.item_target(item, ctx).item_rotation(item, ctx)
    }

    fn item_index(&self, item: &MaterialItem, ctx: &ItemContext<'_>) -> usize {
        self.item_target(item, ctx).item_index(item, ctx)
    }

    fn count_items(&self, location: &Location, ctx: &ItemContext<'_>) -> usize {
        self.target(location, &ctx.material).count_items(location, ctx)
    }

    fn hide(&self, item: &MaterialItem, ctx: &ItemContext<'_>) -> bool {
        self.item_target(item, ctx).hide(item, ctx)
    }

    fn place_item(
        &self,
        item: &MaterialItem,
        ctx: &ItemContext<'_>,
    ) -> Result<Vec<TransformOp>, PlacementError> {
        self.item_target(item, ctx).place_item(item, ctx)
    }

    fn place_location(
        &self,
        location: &Location,
        ctx: &MaterialContext<'_>,
    ) -> Result<Vec<TransformOp>, PlacementError> {
        self.target(location, ctx).place_location(location, ctx)
    }

    fn place_on_parent(
        &self,
        location: &Location,
        parent_kind: MaterialType,
        ctx: &ItemContext<'_>,
    ) -> Result<Vec<TransformOp>, PlacementError> {
        self.target(location, &ctx.material)
            .place_on_parent(location, parent_kind, ctx)
    }

    fn select_drop_move(
        &self,
        drag: &DragState,
        candidates: &[DropCandidate<'_>],
        ctx: &MaterialContext<'_>,
    ) -> Option<usize> {
        let location = candidates.first()?.location;
        self.target(location, ctx).select_drop_move(drag, candidates, ctx)
    }
}
