//! Dice rolls.

use super::{
    Animation, AnimationContext, AnimationParams, ItemAnimation, ItemAnimations, Travel,
    fly_travel, is_instance,
};
use crate::context::ItemContext;
use crate::error::PlacementError;
use crate::moves::ItemMove;

/// The die tumbles in place (or to its new location) and lands on the rolled
/// face after `roll_turns` extra turns.
#[derive(Debug, Clone)]
pub struct RollAnimations {
    params: AnimationParams,
}

impl RollAnimations {
    pub fn new(params: AnimationParams) -> Self {
        Self { params }
    }
}

impl ItemAnimations for RollAnimations {
    fn params(&self) -> &AnimationParams {
        &self.params
    }

    fn item_animation(
        &self,
        item_ctx: &ItemContext<'_>,
        animation: &Animation,
        ctx: &AnimationContext<'_>,
    ) -> Result<Option<ItemAnimation>, PlacementError> {
        let ItemMove::Roll {
            item_type,
            item_index,
            ..
        } = &animation.item_move
        else {
            return Ok(None);
        };
        if !is_instance(item_ctx, *item_type, *item_index) {
            return Ok(None);
        }
        let instance = (*item_index, item_ctx.display_index);
        let travel = Travel {
            kind: *item_type,
            from: instance,
            to: instance,
        };
        let mut trajectory = self.params.trajectory.clone();
        trajectory.spin_turns = self.params.roll_turns;
        fly_travel(&travel, animation, &trajectory, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::fixtures::{COIN, Scene, TABLE};
    use crate::animation::{MaterialAnimations, Motion};
    use crate::location::{GameSnapshot, Location, MaterialItem};
    use crate::settings::EngineSettings;

    #[test]
    fn test_roll_spins_onto_the_rolled_face() {
        let scene = Scene::new(
            GameSnapshot::new().with(COIN, MaterialItem::new(Location::new(TABLE))),
            GameSnapshot::new().with(COIN, MaterialItem::new(Location::new(TABLE).rotation(90.0))),
        );
        let ctx = scene.context();
        let item_move = ItemMove::Roll {
            item_type: COIN,
            item_index: 0,
            location: Location::new(TABLE).rotation(90.0),
        };
        let settings = EngineSettings {
            roll_turns: 2.0,
            ..EngineSettings::default()
        };
        let animations = MaterialAnimations::new(settings);
        let animation = animations.animate(&item_move, &ctx);
        let item_ctx = ctx.before.item(COIN, 0, 0);
        let Some(ItemAnimation {
            motion: Motion::Keyframes(trajectory),
            ..
        }) = animations.item_animation(&item_ctx, &animation, &ctx).unwrap()
        else {
            panic!("rolled die should tumble");
        };
        let origin = trajectory.pose_at(0.0);
        assert!(origin.rotate_z.abs() < 1e-4);
        let landing = trajectory.destination();
        assert!((landing.rotate_z - 810.0).abs() < 1e-3);
        assert!((landing.rotate_x - 720.0).abs() < 1e-3);
    }

    #[test]
    fn test_roll_ignores_other_items() {
        let die = || MaterialItem::new(Location::new(TABLE));
        let scene = Scene::new(
            GameSnapshot::new().with(COIN, die()).with(COIN, die()),
            GameSnapshot::new().with(COIN, die()).with(COIN, die()),
        );
        let ctx = scene.context();
        let item_move = ItemMove::Roll {
            item_type: COIN,
            item_index: 1,
            location: Location::new(TABLE),
        };
        let animations = MaterialAnimations::default();
        let animation = animations.animate(&item_move, &ctx);
        let other = ctx.before.item(COIN, 0, 0);
        assert_eq!(animations.item_animation(&other, &animation, &ctx), Ok(None));
    }
}
