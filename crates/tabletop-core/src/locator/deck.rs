//! Decks: a short list along z where only the top cards are drawn.

use serde::{Deserialize, Serialize};

use super::{ListAlignment, ListLocator, Locator, LocatorBase, LocatorSetup};
use crate::context::ItemContext;
use crate::error::PlacementError;
use crate::location::MaterialItem;
use crate::transform::{Coordinates, PartialCoordinates};

/// Default number of rendered cards.
pub const DEFAULT_DECK_LIMIT: usize = 20;

/// Renders only the top `limit` cards, renumbered so the stack never grows
/// taller than `limit` cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckLocator {
    #[serde(flatten)]
    pub list: ListLocator,
}

impl Default for DeckLocator {
    fn default() -> Self {
        let list = ListLocator::new(PartialCoordinates::xyz(-0.05, -0.05, 0.05))
            .aligned(ListAlignment::Start)
            .limited(DEFAULT_DECK_LIMIT);
        Self { list }
    }
}

impl LocatorSetup for DeckLocator {
    fn base_mut(&mut self) -> &mut LocatorBase {
        &mut self.list.base
    }
}

impl DeckLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gap(mut self, gap: PartialCoordinates) -> Self {
        self.list.gap = gap;
        self
    }

    fn rendered(&self) -> usize {
        self.limit().unwrap_or(DEFAULT_DECK_LIMIT)
    }

    /// Number of cards below the rendered ones.
    fn buried(&self, count: usize) -> usize {
        count.saturating_sub(self.rendered())
    }

    /// Index of the card within the rendered stack, `None` when buried.
    pub fn visible_index(&self, raw_index: usize, count: usize) -> Option<usize> {
        raw_index.checked_sub(self.buried(count))
    }
}

impl Locator for DeckLocator {
    fn base(&self) -> &LocatorBase {
        &self.list.base
    }

    fn item_coordinates(
        &self,
        item: &MaterialItem,
        ctx: &ItemContext<'_>,
    ) -> Result<Coordinates, PlacementError> {
        let origin = self.coordinates(&item.location, &ctx.material);
        let raw = self.item_index(item, ctx);
        let count = self.count_items(&item.location, ctx).max(raw + 1);
        let index = self.visible_index(raw, count).unwrap_or(0);
        Ok(self
            .list
            .slot_coordinates(origin, index, count.min(self.rendered())))
    }

    fn hide(&self, item: &MaterialItem, ctx: &ItemContext<'_>) -> bool {
        let raw = self.item_index(item, ctx);
        let count = self.count_items(&item.location, ctx).max(raw + 1);
        self.visible_index(raw, count).is_none()
    }
}
