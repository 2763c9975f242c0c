//! Items leaving the table.

use super::{
    Animation, AnimationContext, AnimationParams, ItemAnimation, ItemAnimations, Motion, fly,
    stock_pose,
};
use crate::context::ItemContext;
use crate::error::PlacementError;
use crate::location::MaterialType;
use crate::moves::ItemMove;
use crate::placement::item_pose;

/// Sends a displayed instance back to its stock location, or fades it out.
fn leave(
    item_ctx: &ItemContext<'_>,
    kind: MaterialType,
    params: &AnimationParams,
    animation: &Animation,
    ctx: &AnimationContext<'_>,
) -> Result<Option<ItemAnimation>, PlacementError> {
    let Some(destination) = stock_pose(kind, &ctx.before)? else {
        return Ok(Some(ItemAnimation {
            duration: animation.duration,
            motion: Motion::FadeOut,
        }));
    };
    let origin = item_pose(&ctx.before, kind, item_ctx.index, item_ctx.display_index)?;
    fly(origin, destination, &params.trajectory, animation.duration, &ctx.before).map(Some)
}

/// An item, or the top `quantity` pieces of its stack, is removed.
#[derive(Debug, Clone)]
pub struct DeleteAnimations {
    params: AnimationParams,
}

impl DeleteAnimations {
    pub fn new(params: AnimationParams) -> Self {
        Self { params }
    }
}

impl ItemAnimations for DeleteAnimations {
    fn params(&self) -> &AnimationParams {
        &self.params
    }

    fn item_animation(
        &self,
        item_ctx: &ItemContext<'_>,
        animation: &Animation,
        ctx: &AnimationContext<'_>,
    ) -> Result<Option<ItemAnimation>, PlacementError> {
        let ItemMove::Delete {
            item_type,
            item_index,
            quantity,
        } = &animation.item_move
        else {
            return Ok(None);
        };
        if item_ctx.kind != *item_type || item_ctx.index != *item_index {
            return Ok(None);
        }
        let Some(item) = ctx.before.snapshot.item(*item_type, *item_index) else {
            return Ok(None);
        };
        let stack = item.quantity();
        let removed = quantity.map_or(stack, |q| q.min(stack));
        let first_removed = (stack - removed) as usize;
        if item_ctx.display_index < first_removed {
            return Ok(None);
        }
        leave(item_ctx, *item_type, &self.params, animation, ctx)
    }
}

/// Several items are removed at once.
#[derive(Debug, Clone)]
pub struct DeleteAsGroupAnimations {
    params: AnimationParams,
}

impl DeleteAsGroupAnimations {
    pub fn new(params: AnimationParams) -> Self {
        Self { params }
    }
}

impl ItemAnimations for DeleteAsGroupAnimations {
    fn params(&self) -> &AnimationParams {
        &self.params
    }

    fn item_animation(
        &self,
        item_ctx: &ItemContext<'_>,
        animation: &Animation,
        ctx: &AnimationContext<'_>,
    ) -> Result<Option<ItemAnimation>, PlacementError> {
        let ItemMove::DeleteAsGroup { item_type, indexes } = &animation.item_move else {
            return Ok(None);
        };
        if item_ctx.kind != *item_type || !indexes.contains(&item_ctx.index) {
            return Ok(None);
        }
        leave(item_ctx, *item_type, &self.params, animation, ctx)
    }
}
