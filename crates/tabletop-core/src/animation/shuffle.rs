//! Shuffles: every shuffled item slides to the place of another one.

use super::{
    Animation, AnimationContext, AnimationParams, AnimationPhase, ItemAnimation, ItemAnimations,
    Travel, fly_travel,
};
use crate::context::ItemContext;
use crate::error::PlacementError;
use crate::moves::ItemMove;

#[derive(Debug, Clone)]
pub struct ShuffleAnimations {
    params: AnimationParams,
}

impl ShuffleAnimations {
    pub fn new(params: AnimationParams) -> Self {
        Self { params }
    }
}

impl ItemAnimations for ShuffleAnimations {
    fn params(&self) -> &AnimationParams {
        &self.params
    }

    fn item_animation(
        &self,
        item_ctx: &ItemContext<'_>,
        animation: &Animation,
        ctx: &AnimationContext<'_>,
    ) -> Result<Option<ItemAnimation>, PlacementError> {
        let ItemMove::Shuffle {
            item_type,
            indexes,
            new_indexes,
        } = &animation.item_move
        else {
            return Ok(None);
        };
        let Some(phase) = animation.phase else {
            return Ok(None);
        };
        if item_ctx.kind != *item_type {
            return Ok(None);
        }
        // Pre renders the old indexes, Post the new ones.
        let pair = indexes.iter().zip(new_indexes).find(|(from, to)| match phase {
            AnimationPhase::Pre => **from == item_ctx.index,
            AnimationPhase::Post => **to == item_ctx.index,
        });
        let Some((&from, &to)) = pair else {
            return Ok(None);
        };
        let travel = Travel {
            kind: *item_type,
            from: (from, item_ctx.display_index),
            to: (to, item_ctx.display_index),
        };
        fly_travel(&travel, animation, &self.params.trajectory, ctx)
    }
}
