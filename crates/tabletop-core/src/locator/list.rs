//! Items along a line.

use serde::{Deserialize, Serialize};

use super::{Locator, LocatorBase, LocatorSetup, count_all_in_area, precise_index};
use crate::context::{ItemContext, MaterialContext};
use crate::error::PlacementError;
use crate::location::{Location, MaterialItem};
use crate::transform::{Coordinates, PartialCoordinates};

/// Where the line sits relative to the area origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListAlignment {
    /// First item on the origin.
    Start,
    /// Line centered on the origin.
    #[default]
    Center,
    /// Last item on the origin.
    End,
}

/// Gap between consecutive items, compressed so the span never exceeds
/// `max_gap` and so `count` items take no more room than `max_count` would.
pub fn compressed_gap(
    gap: PartialCoordinates,
    max_gap: Option<PartialCoordinates>,
    max_count: Option<usize>,
    count: usize,
) -> Coordinates {
    let mut gap = gap.or_zero();
    if count < 2 {
        return gap;
    }
    let intervals = (count - 1) as f32;
    if let Some(max_count) = max_count.filter(|m| *m >= 1 && count > *m) {
        gap = gap.scale((max_count - 1) as f32 / intervals);
    }
    if let Some(max_gap) = max_gap {
        let clamp = |value: f32, max: Option<f32>| match max {
            Some(max) => value.signum() * value.abs().min(max.abs() / intervals),
            None => value,
        };
        gap = Coordinates::new(
            clamp(gap.x, max_gap.x),
            clamp(gap.y, max_gap.y),
            clamp(gap.z, max_gap.z),
        );
    }
    gap
}

/// Places N items along a line, `gap` apart.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ListLocator {
    #[serde(flatten)]
    pub base: LocatorBase,
    #[serde(default)]
    pub gap: PartialCoordinates,
    /// Maximum span of the whole line, per axis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_gap: Option<PartialCoordinates>,
    /// Beyond this count, items are squeezed into the room of `max_count`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_count: Option<usize>,
    #[serde(default)]
    pub alignment: ListAlignment,
}

impl LocatorSetup for ListLocator {
    fn base_mut(&mut self) -> &mut LocatorBase {
        &mut self.base
    }
}

impl ListLocator {
    pub fn new(gap: PartialCoordinates) -> Self {
        Self {
            gap,
            ..Self::default()
        }
    }

    pub fn max_gap(mut self, max_gap: PartialCoordinates) -> Self {
        self.max_gap = Some(max_gap);
        self
    }

    pub fn max_count(mut self, max_count: usize) -> Self {
        self.max_count = Some(max_count);
        self
    }

    pub fn aligned(mut self, alignment: ListAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn effective_gap(&self, count: usize) -> Coordinates {
        compressed_gap(self.gap, self.max_gap, self.max_count, count)
    }

    /// Position of slot `index` in a line of `count` items starting from `origin`.
    pub fn slot_coordinates(&self, origin: Coordinates, index: usize, count: usize) -> Coordinates {
        let count = count.max(index + 1);
        let shift = match self.alignment {
            ListAlignment::Start => 0.0,
            ListAlignment::Center => (count - 1) as f32 / 2.0,
            ListAlignment::End => (count - 1) as f32,
        };
        let offset = index as f32 - shift;
        origin.add(self.effective_gap(count).scale(offset))
    }
}

impl Locator for ListLocator {
    fn base(&self) -> &LocatorBase {
        &self.base
    }

    fn location_coordinates(
        &self,
        location: &Location,
        ctx: &MaterialContext<'_>,
    ) -> Result<Coordinates, PlacementError> {
        let origin = self.coordinates(location, ctx);
        match precise_index(location) {
            Some(index) => {
                let count = count_all_in_area(location, ctx);
                Ok(self.slot_coordinates(origin, index, count))
            }
            None => Ok(origin),
        }
    }

    fn item_coordinates(
        &self,
        item: &MaterialItem,
        ctx: &ItemContext<'_>,
    ) -> Result<Coordinates, PlacementError> {
        let origin = self.coordinates(&item.location, &ctx.material);
        let index = self.item_index(item, ctx);
        let count = self.count_items(&item.location, ctx);
        Ok(self.slot_coordinates(origin, index, count))
    }
}
