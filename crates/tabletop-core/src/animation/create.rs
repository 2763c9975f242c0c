//! Items appearing on the table.

use super::{
    Animation, AnimationContext, AnimationParams, AnimationPhase, ItemAnimation, ItemAnimations,
    Motion, find_in_slot, find_stack, fly, is_instance, stock_pose,
};
use crate::context::ItemContext;
use crate::error::PlacementError;
use crate::moves::ItemMove;
use crate::placement::item_pose;

/// Created items come from their material's stock location, or fade in.
///
/// A creation that grows an existing stack only animates the new pieces.
#[derive(Debug, Clone)]
pub struct CreateAnimations {
    params: AnimationParams,
}

impl CreateAnimations {
    pub fn new(params: AnimationParams) -> Self {
        Self { params }
    }

    /// Index of the created item in the new state and its first new instance.
    fn created(item_move: &ItemMove, ctx: &AnimationContext<'_>) -> Option<(usize, usize)> {
        let ItemMove::Create { item_type, item } = item_move else {
            return None;
        };
        let merged = find_stack(&ctx.before, *item_type, item.id, &item.location, None);
        match merged {
            Some(index) => {
                let before = ctx.before.snapshot.item(*item_type, index)?.quantity() as usize;
                let target = find_in_slot(&ctx.after, *item_type, item.id, &item.location, None)?;
                Some((target, before))
            }
            None => {
                let count = ctx.after.snapshot.items(*item_type).len();
                Some((count.checked_sub(1)?, 0))
            }
        }
    }
}

impl ItemAnimations for CreateAnimations {
    fn params(&self) -> &AnimationParams {
        &self.params
    }

    fn phase(&self, _item_move: &ItemMove, _ctx: &AnimationContext<'_>) -> Option<AnimationPhase> {
        (!self.params.skip).then_some(AnimationPhase::Post)
    }

    fn item_animation(
        &self,
        item_ctx: &ItemContext<'_>,
        animation: &Animation,
        ctx: &AnimationContext<'_>,
    ) -> Result<Option<ItemAnimation>, PlacementError> {
        let item_type = animation.item_move.item_type();
        let Some((index, first_new)) = Self::created(&animation.item_move, ctx) else {
            return Ok(None);
        };
        if !is_instance(item_ctx, item_type, index) || item_ctx.display_index < first_new {
            return Ok(None);
        }
        let Some(origin) = stock_pose(item_type, &ctx.after)? else {
            return Ok(Some(ItemAnimation {
                duration: animation.duration,
                motion: Motion::FadeIn,
            }));
        };
        let destination = item_pose(&ctx.after, item_type, index, item_ctx.display_index)?;
        fly(origin, destination, &self.params.trajectory, animation.duration, &ctx.after).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::MaterialAnimations;
    use crate::animation::fixtures::{CARD, COIN, Scene, TABLE, on_table};
    use crate::location::{GameSnapshot, Location, MaterialItem};

    #[test]
    fn test_created_card_comes_from_stock() {
        let scene = Scene::new(
            GameSnapshot::new().with(CARD, on_table()),
            GameSnapshot::new().with(CARD, on_table()).with(CARD, on_table()),
        );
        let ctx = scene.context();
        let item_move = ItemMove::Create {
            item_type: CARD,
            item: on_table(),
        };
        let animations = MaterialAnimations::default();
        let animation = animations.animate(&item_move, &ctx);
        assert_eq!(animation.phase, Some(AnimationPhase::Post));
        assert!(animation.pre_duration.abs() < 1e-6);

        let old = ctx.after.item(CARD, 0, 0);
        assert_eq!(animations.item_animation(&old, &animation, &ctx), Ok(None));

        let new = ctx.after.item(CARD, 1, 0);
        let Some(ItemAnimation {
            motion: Motion::Keyframes(trajectory),
            ..
        }) = animations.item_animation(&new, &animation, &ctx).unwrap()
        else {
            panic!("created card should fly in");
        };
        let origin = trajectory.pose_at(0.0);
        assert!((origin.translation.x + 50.0).abs() < 1e-4);
        assert!(origin.scale.abs() < 1e-6);
        assert!((trajectory.destination().scale - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_created_coin_without_stock_fades_in() {
        let coins = |quantity: u32| MaterialItem::new(Location::new(TABLE)).with_quantity(quantity);
        let scene = Scene::new(
            GameSnapshot::new().with(COIN, coins(2)),
            GameSnapshot::new().with(COIN, coins(3)),
        );
        let ctx = scene.context();
        let item_move = ItemMove::Create {
            item_type: COIN,
            item: coins(1),
        };
        let animations = MaterialAnimations::default();
        let animation = animations.animate(&item_move, &ctx);
        let animated: Vec<Option<Motion>> = (0..3)
            .map(|display| {
                let item_ctx = ctx.after.item(COIN, 0, display);
                animations
                    .item_animation(&item_ctx, &animation, &ctx)
                    .unwrap()
                    .map(|a| a.motion)
            })
            .collect();
        assert_eq!(animated, vec![None, None, Some(Motion::FadeIn)]);
    }
}
