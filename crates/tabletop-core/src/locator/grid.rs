//! Items on a grid, filled line by line from the origin.

use serde::{Deserialize, Serialize};

use super::{Locator, LocatorBase, LocatorSetup, compressed_gap, count_all_in_area, default_item_index};
use crate::context::{ItemContext, MaterialContext};
use crate::error::PlacementError;
use crate::location::{Location, MaterialItem};
use crate::transform::{Coordinates, PartialCoordinates};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLocator {
    #[serde(flatten)]
    pub base: LocatorBase,
    #[serde(default = "default_items_per_line")]
    pub items_per_line: usize,
    #[serde(default)]
    pub items_gap: PartialCoordinates,
    #[serde(default)]
    pub lines_gap: PartialCoordinates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_lines_gap: Option<PartialCoordinates>,
}

fn default_items_per_line() -> usize {
    4
}

impl Default for GridLocator {
    fn default() -> Self {
        Self {
            base: LocatorBase::default(),
            items_per_line: default_items_per_line(),
            items_gap: PartialCoordinates::default(),
            lines_gap: PartialCoordinates::default(),
            max_lines_gap: None,
        }
    }
}

impl LocatorSetup for GridLocator {
    fn base_mut(&mut self) -> &mut LocatorBase {
        &mut self.base
    }
}

impl GridLocator {
    pub fn new(items_per_line: usize, items_gap: PartialCoordinates, lines_gap: PartialCoordinates) -> Self {
        Self {
            items_per_line: items_per_line.max(1),
            items_gap,
            lines_gap,
            ..Self::default()
        }
    }

    pub fn max_lines_gap(mut self, max_lines_gap: PartialCoordinates) -> Self {
        self.max_lines_gap = Some(max_lines_gap);
        self
    }

    /// Cell index of a precise location: `line * items_per_line + column`.
    ///
    /// `None` for areas and for negative columns or lines.
    fn precise_cell(&self, location: &Location) -> Option<usize> {
        if !location.is_precise() {
            return None;
        }
        let column = usize::try_from(location.x.unwrap_or(0)).ok()?;
        let line = usize::try_from(location.y.unwrap_or(0)).ok()?;
        Some(line * self.items_per_line.max(1) + column)
    }

    fn cell(&self, origin: Coordinates, index: usize, count: usize) -> Coordinates {
        let per_line = self.items_per_line.max(1);
        let lines = count.max(index + 1).div_ceil(per_line);
        let lines_gap = compressed_gap(self.lines_gap, self.max_lines_gap, None, lines);
        origin
            .add(self.items_gap.or_zero().scale((index % per_line) as f32))
            .add(lines_gap.scale((index / per_line) as f32))
    }
}

impl Locator for GridLocator {
    fn base(&self) -> &LocatorBase {
        &self.base
    }

    fn location_coordinates(
        &self,
        location: &Location,
        ctx: &MaterialContext<'_>,
    ) -> Result<Coordinates, PlacementError> {
        let origin = self.coordinates(location, ctx);
        match self.precise_cell(location) {
            Some(index) => Ok(self.cell(origin, index, count_all_in_area(location, ctx))),
            None => Ok(origin),
        }
    }

    fn item_index(&self, item: &MaterialItem, ctx: &ItemContext<'_>) -> usize {
        self.precise_cell(&item.location)
            .unwrap_or_else(|| default_item_index(item, ctx))
    }

    fn item_coordinates(
        &self,
        item: &MaterialItem,
        ctx: &ItemContext<'_>,
    ) -> Result<Coordinates, PlacementError> {
        let origin = self.coordinates(&item.location, &ctx.material);
        let index = self.item_index(item, ctx);
        Ok(self.cell(origin, index, self.count_items(&item.location, ctx)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::Fixture;

    const CARD: u32 = 1;
    const MARKET: u32 = 3;

    #[test]
    fn test_grid_fills_lines_from_origin() {
        let locator = GridLocator::new(3, PartialCoordinates::x(7.0), PartialCoordinates::y(9.0))
            .at(Coordinates::xy(-10.0, -5.0));
        let mut fixture = Fixture::new();
        for _ in 0..5 {
            fixture.snapshot.push(CARD, MaterialItem::new(Location::new(MARKET)));
        }
        let ctx = fixture.context();
        let at = |index: usize| {
            let item_ctx = ctx.item(CARD, index, 0);
            locator
                .item_coordinates(item_ctx.stored_item().unwrap(), &item_ctx)
                .unwrap()
        };
        assert_eq!(at(0), Coordinates::xy(-10.0, -5.0));
        assert_eq!(at(2), Coordinates::xy(4.0, -5.0));
        assert_eq!(at(4), Coordinates::xy(-3.0, 4.0));
    }

    #[test]
    fn test_precise_location_uses_column_and_line() {
        let locator = GridLocator::new(3, PartialCoordinates::x(7.0), PartialCoordinates::y(9.0));
        let fixture = Fixture::new();
        let ctx = fixture.context();
        let coords = locator
            .location_coordinates(&Location::new(MARKET).x(1).y(2), &ctx)
            .unwrap();
        assert_eq!(coords, Coordinates::xy(7.0, 18.0));
    }

    #[test]
    fn test_precise_item_sits_on_its_slot() {
        let locator = GridLocator::new(3, PartialCoordinates::x(7.0), PartialCoordinates::y(9.0));
        let location = Location::new(MARKET).x(1).y(2);
        let mut fixture = Fixture::new();
        fixture.snapshot.push(CARD, MaterialItem::new(location.clone()));
        let ctx = fixture.context();
        let item_ctx = ctx.item(CARD, 0, 0);
        let item = locator
            .item_coordinates(item_ctx.stored_item().unwrap(), &item_ctx)
            .unwrap();
        let slot = locator.location_coordinates(&location, &ctx).unwrap();
        assert_eq!(item, slot);
        assert_eq!(item, Coordinates::xy(7.0, 18.0));
    }

    #[test]
    fn test_negative_cell_falls_back() {
        let locator = GridLocator::new(3, PartialCoordinates::x(7.0), PartialCoordinates::y(9.0));
        let fixture = Fixture::new();
        let ctx = fixture.context();
        let coords = locator
            .location_coordinates(&Location::new(MARKET).x(-1).y(2), &ctx)
            .unwrap();
        assert_eq!(coords, Coordinates::ZERO);
    }

    #[test]
    fn test_lines_gap_compression() {
        let locator = GridLocator::new(1, PartialCoordinates::default(), PartialCoordinates::y(4.0))
            .max_lines_gap(PartialCoordinates::y(6.0));
        let last = locator.cell(Coordinates::ZERO, 4, 5);
        assert!((last.y - 6.0).abs() < 1e-4);
        let short = locator.cell(Coordinates::ZERO, 1, 2);
        assert!((short.y - 4.0).abs() < 1e-4);
    }
}
