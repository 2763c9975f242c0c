//! A fan of cards, as held in a hand.

use serde::{Deserialize, Serialize};

use super::{Locator, LocatorBase, LocatorSetup};
use crate::context::ItemContext;
use crate::error::PlacementError;
use crate::location::MaterialItem;
use crate::transform::Coordinates;

/// Cards rotate around a pivot `radius` below the origin.
///
/// Adjacent cards are `gap_max_angle` apart until the fan would exceed
/// `max_angle`, then the gap shrinks so the fan spans exactly `max_angle`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandLocator {
    #[serde(flatten)]
    pub base: LocatorBase,
    #[serde(default = "default_radius")]
    pub radius: f32,
    /// Orientation of the whole fan, degrees.
    #[serde(default)]
    pub base_angle: f32,
    #[serde(default = "default_gap_max_angle")]
    pub gap_max_angle: f32,
    #[serde(default = "default_max_angle")]
    pub max_angle: f32,
    #[serde(default = "default_clockwise")]
    pub clockwise: bool,
}

fn default_radius() -> f32 {
    100.0
}

fn default_gap_max_angle() -> f32 {
    3.0
}

fn default_max_angle() -> f32 {
    15.0
}

fn default_clockwise() -> bool {
    true
}

impl Default for HandLocator {
    fn default() -> Self {
        Self {
            base: LocatorBase::default(),
            radius: default_radius(),
            base_angle: 0.0,
            gap_max_angle: default_gap_max_angle(),
            max_angle: default_max_angle(),
            clockwise: default_clockwise(),
        }
    }
}

impl LocatorSetup for HandLocator {
    fn base_mut(&mut self) -> &mut LocatorBase {
        &mut self.base
    }
}

impl HandLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn base_angle(mut self, degrees: f32) -> Self {
        self.base_angle = degrees;
        self
    }

    pub fn angles(mut self, gap_max_angle: f32, max_angle: f32) -> Self {
        self.gap_max_angle = gap_max_angle;
        self.max_angle = max_angle;
        self
    }

    pub fn counter_clockwise(mut self) -> Self {
        self.clockwise = false;
        self
    }

    /// Angle between two adjacent cards in a hand of `count`.
    pub fn gap_angle(&self, count: usize) -> f32 {
        if count < 2 {
            return 0.0;
        }
        self.gap_max_angle.min(self.max_angle / (count - 1) as f32)
    }

    /// Angle of card `index` in a hand of `count`, relative to `base_angle`.
    pub fn card_angle(&self, index: usize, count: usize) -> f32 {
        let count = count.max(index + 1);
        let gap = self.gap_angle(count);
        let spread = gap * (count - 1) as f32;
        let offset = -spread / 2.0 + index as f32 * gap;
        if self.clockwise { offset } else { -offset }
    }

    fn pivot(&self, origin: Coordinates) -> Coordinates {
        origin.add(Coordinates::xy(0.0, self.radius).rotate_z(self.base_angle))
    }

    fn fan(&self, item: &MaterialItem, ctx: &ItemContext<'_>) -> f32 {
        let index = self.item_index(item, ctx);
        let count = self.count_items(&item.location, ctx);
        self.base_angle + self.card_angle(index, count)
    }
}

impl Locator for HandLocator {
    fn base(&self) -> &LocatorBase {
        &self.base
    }

    fn item_coordinates(
        &self,
        item: &MaterialItem,
        ctx: &ItemContext<'_>,
    ) -> Result<Coordinates, PlacementError> {
        let pivot = self.pivot(self.coordinates(&item.location, &ctx.material));
        let angle = self.fan(item, ctx);
        Ok(pivot.add(Coordinates::xy(0.0, -self.radius).rotate_z(angle)))
    }

    fn item_rotation(&self, item: &MaterialItem, ctx: &ItemContext<'_>) -> Result<f32, PlacementError> {
        Ok(self.location_rotation(&item.location, &ctx.material) + self.fan(item, ctx))
    }
}
