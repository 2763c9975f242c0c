//! Lines of items wrapping after `line_size`.

use serde::{Deserialize, Serialize};

use super::{ListLocator, Locator, LocatorBase, LocatorSetup, compressed_gap};
use crate::context::ItemContext;
use crate::error::PlacementError;
use crate::location::MaterialItem;
use crate::transform::{Coordinates, PartialCoordinates};

/// A list of lines: items flow along `gap` and wrap along `line_gap`.
///
/// The in-line layout is the one of the inner [`ListLocator`] (same
/// alignment and compression); lines always stack from the origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlexLocator {
    #[serde(flatten)]
    pub list: ListLocator,
    #[serde(default = "default_line_size")]
    pub line_size: usize,
    #[serde(default)]
    pub line_gap: PartialCoordinates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_line_gap: Option<PartialCoordinates>,
}

fn default_line_size() -> usize {
    10
}

impl Default for FlexLocator {
    fn default() -> Self {
        Self {
            list: ListLocator::default(),
            line_size: default_line_size(),
            line_gap: PartialCoordinates::default(),
            max_line_gap: None,
        }
    }
}

impl LocatorSetup for FlexLocator {
    fn base_mut(&mut self) -> &mut LocatorBase {
        &mut self.list.base
    }
}

impl FlexLocator {
    pub fn new(list: ListLocator, line_size: usize, line_gap: PartialCoordinates) -> Self {
        Self {
            list,
            line_size: line_size.max(1),
            line_gap,
            max_line_gap: None,
        }
    }

    pub fn max_line_gap(mut self, max_line_gap: PartialCoordinates) -> Self {
        self.max_line_gap = Some(max_line_gap);
        self
    }

    /// Line and position in line of slot `index`.
    pub fn slot(&self, index: usize) -> (usize, usize) {
        let line_size = self.line_size.max(1);
        (index / line_size, index % line_size)
    }
}

impl Locator for FlexLocator {
    fn base(&self) -> &LocatorBase {
        &self.list.base
    }

    fn item_coordinates(
        &self,
        item: &MaterialItem,
        ctx: &ItemContext<'_>,
    ) -> Result<Coordinates, PlacementError> {
        let origin = self.coordinates(&item.location, &ctx.material);
        let index = self.item_index(item, ctx);
        let count = self.count_items(&item.location, ctx).max(index + 1);
        let line_size = self.line_size.max(1);
        let (line, position) = self.slot(index);
        let lines = count.div_ceil(line_size);
        let line_gap = compressed_gap(self.line_gap, self.max_line_gap, None, lines);
        let line_origin = origin.add(line_gap.scale(line as f32));
        Ok(self
            .list
            .slot_coordinates(line_origin, position, count.min(line_size)))
    }
}
