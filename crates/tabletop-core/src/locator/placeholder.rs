//! Invisible locations used as the far end of create and delete animations.

use serde::{Deserialize, Serialize};

use super::{Locator, LocatorBase, LocatorSetup};
use crate::context::{ItemContext, MaterialContext};
use crate::error::PlacementError;
use crate::location::{Location, MaterialItem};
use crate::transform::TransformOp;

/// Never displays anything; its coordinates only anchor trajectories.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlaceholderLocator {
    #[serde(flatten)]
    pub base: LocatorBase,
}

impl PlaceholderLocator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocatorSetup for PlaceholderLocator {
    fn base_mut(&mut self) -> &mut LocatorBase {
        &mut self.base
    }
}

impl Locator for PlaceholderLocator {
    fn base(&self) -> &LocatorBase {
        &self.base
    }

    fn hide(&self, _item: &MaterialItem, _ctx: &ItemContext<'_>) -> bool {
        true
    }

    fn place_item(
        &self,
        item: &MaterialItem,
        ctx: &ItemContext<'_>,
    ) -> Result<Vec<TransformOp>, PlacementError> {
        let mut ops = vec![TransformOp::translate(self.item_coordinates(item, ctx)?)];
        let rotation = self.item_rotation(item, ctx)?;
        if rotation != 0.0 {
            ops.push(TransformOp::rotate_z(rotation));
        }
        ops.push(TransformOp::Scale(0.0));
        Ok(ops)
    }

    fn place_location(
        &self,
        location: &Location,
        ctx: &MaterialContext<'_>,
    ) -> Result<Vec<TransformOp>, PlacementError> {
        let mut ops = vec![TransformOp::translate(self.location_coordinates(location, ctx)?)];
        let rotation = self.location_rotation(location, ctx);
        if rotation != 0.0 {
            ops.push(TransformOp::rotate_z(rotation));
        }
        ops.push(TransformOp::Scale(0.0));
        Ok(ops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::Fixture;
    use crate::transform::{Coordinates, Pose};

    #[test]
    fn test_placeholder_is_hidden_and_scaled_out() {
        let mut fixture = Fixture::new();
        fixture.snapshot.push(1, MaterialItem::new(Location::new(9)));
        let locator = PlaceholderLocator::new().at(Coordinates::xy(-30.0, 0.0));
        let ctx = fixture.context();
        let item_ctx = ctx.item(1, 0, 0);
        let item = item_ctx.stored_item().unwrap();
        assert!(locator.hide(item, &item_ctx));
        let pose = Pose::from_ops(&locator.place_item(item, &item_ctx).unwrap());
        assert_eq!(pose.translation, Coordinates::xy(-30.0, 0.0));
        assert!(pose.scale.abs() < f32::EPSILON);

        let stock = Pose::from_ops(&locator.place_location(&Location::new(9), &ctx).unwrap());
        assert_eq!(stock.translation, Coordinates::xy(-30.0, 0.0));
        assert!(stock.scale.abs() < f32::EPSILON);
    }
}
