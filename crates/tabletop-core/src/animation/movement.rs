//! Moves of one item or of a group of items.

use super::{
    AnimationContext, AnimationParams, AnimationPhase, Animation, ItemAnimation, ItemAnimations,
    Travel, find_in_slot, find_stack, fly_travel, is_instance,
};
use crate::context::ItemContext;
use crate::error::PlacementError;
use crate::location::MaterialType;
use crate::moves::ItemMove;

/// How a move changes stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveShape {
    /// The item changes location and keeps its index.
    Plain,
    /// The moved pieces join a stack already at the destination.
    Merge,
    /// Part of a stack leaves as a new item.
    Split,
}

/// Shape of a single-item move, `None` for other moves or unknown items.
pub fn classify_move(item_move: &ItemMove, ctx: &AnimationContext<'_>) -> Option<MoveShape> {
    let ItemMove::Move {
        item_type,
        item_index,
        location,
        quantity,
    } = item_move
    else {
        return None;
    };
    let item = ctx.before.snapshot.item(*item_type, *item_index)?;
    let moved = quantity.unwrap_or(item.quantity()).min(item.quantity());
    let shape = if find_stack(&ctx.before, *item_type, item.id, location, Some(*item_index)).is_some() {
        MoveShape::Merge
    } else if moved < item.quantity() {
        MoveShape::Split
    } else {
        MoveShape::Plain
    };
    tracing::debug!(item_type, item_index, ?shape, "[animation] move shape");
    Some(shape)
}

/// Where the moved pieces of a stack come from and go to.
#[derive(Debug, Clone, Copy)]
struct StackMove {
    kind: MaterialType,
    shape: MoveShape,
    origin: usize,
    /// First display instance of the origin stack that moves.
    first_moving: usize,
    moved: usize,
    target: usize,
    /// Display instance of the first moved piece in the target stack.
    target_offset: usize,
}

impl StackMove {
    fn resolve(item_move: &ItemMove, ctx: &AnimationContext<'_>) -> Option<StackMove> {
        let shape = classify_move(item_move, ctx)?;
        let ItemMove::Move {
            item_type,
            item_index,
            location,
            quantity,
        } = item_move
        else {
            return None;
        };
        let item = ctx.before.snapshot.item(*item_type, *item_index)?;
        let origin_quantity = item.quantity() as usize;
        let moved = quantity.map_or(origin_quantity, |q| (q as usize).min(origin_quantity));
        let (target, target_offset) = match shape {
            MoveShape::Plain => (*item_index, 0),
            MoveShape::Merge => {
                let target = find_in_slot(&ctx.after, *item_type, item.id, location, None)?;
                let stack = ctx.after.snapshot.item(*item_type, target)?.quantity() as usize;
                (target, stack.saturating_sub(moved))
            }
            MoveShape::Split => (
                find_in_slot(&ctx.after, *item_type, item.id, location, Some(*item_index))?,
                0,
            ),
        };
        Some(StackMove {
            kind: *item_type,
            shape,
            origin: *item_index,
            first_moving: origin_quantity - moved,
            moved,
            target,
            target_offset,
        })
    }

    /// The travel of the instance `item_ctx`, rendered in `phase`.
    fn travel(&self, item_ctx: &ItemContext<'_>, phase: AnimationPhase) -> Option<Travel> {
        let display = item_ctx.display_index;
        match phase {
            AnimationPhase::Pre => {
                if !is_instance(item_ctx, self.kind, self.origin) || display < self.first_moving {
                    return None;
                }
                Some(Travel {
                    kind: self.kind,
                    from: (self.origin, display),
                    to: (self.target, self.target_offset + display - self.first_moving),
                })
            }
            AnimationPhase::Post => {
                let moving = self.target_offset..self.target_offset + self.moved;
                if !is_instance(item_ctx, self.kind, self.target) || !moving.contains(&display) {
                    return None;
                }
                Some(Travel {
                    kind: self.kind,
                    from: (self.origin, self.first_moving + display - self.target_offset),
                    to: (self.target, display),
                })
            }
        }
    }
}

/// A single item, or part of its stack, changes location.
#[derive(Debug, Clone)]
pub struct MoveAnimations {
    params: AnimationParams,
}

impl MoveAnimations {
    pub fn new(params: AnimationParams) -> Self {
        Self { params }
    }
}

impl ItemAnimations for MoveAnimations {
    fn params(&self) -> &AnimationParams {
        &self.params
    }

    fn phase(&self, item_move: &ItemMove, ctx: &AnimationContext<'_>) -> Option<AnimationPhase> {
        if self.params.skip {
            return None;
        }
        let split = classify_move(item_move, ctx) == Some(MoveShape::Split);
        if split || self.params.post_move {
            Some(AnimationPhase::Post)
        } else {
            Some(AnimationPhase::Pre)
        }
    }

    fn item_animation(
        &self,
        item_ctx: &ItemContext<'_>,
        animation: &Animation,
        ctx: &AnimationContext<'_>,
    ) -> Result<Option<ItemAnimation>, PlacementError> {
        let Some(phase) = animation.phase else {
            return Ok(None);
        };
        let Some(stack) = StackMove::resolve(&animation.item_move, ctx) else {
            return Ok(None);
        };
        let Some(travel) = stack.travel(item_ctx, phase) else {
            return Ok(None);
        };
        let mut trajectory = self.params.trajectory.clone();
        if stack.shape == MoveShape::Merge {
            trajectory.elevation = None;
        }
        fly_travel(&travel, animation, &trajectory, ctx)
    }
}

/// Several items go to the same location; each keeps its index.
#[derive(Debug, Clone)]
pub struct MoveAsGroupAnimations {
    params: AnimationParams,
}

impl MoveAsGroupAnimations {
    pub fn new(params: AnimationParams) -> Self {
        Self { params }
    }
}

impl ItemAnimations for MoveAsGroupAnimations {
    fn params(&self) -> &AnimationParams {
        &self.params
    }

    fn item_animation(
        &self,
        item_ctx: &ItemContext<'_>,
        animation: &Animation,
        ctx: &AnimationContext<'_>,
    ) -> Result<Option<ItemAnimation>, PlacementError> {
        let ItemMove::MoveAsGroup {
            item_type, indexes, ..
        } = &animation.item_move
        else {
            return Ok(None);
        };
        if item_ctx.kind != *item_type || !indexes.contains(&item_ctx.index) {
            return Ok(None);
        }
        let instance = (item_ctx.index, item_ctx.display_index);
        let travel = Travel {
            kind: *item_type,
            from: instance,
            to: instance,
        };
        fly_travel(&travel, animation, &self.params.trajectory, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::fixtures::{CARD, COIN, HAND, Scene, TABLE, in_hand, on_table};
    use crate::animation::{MaterialAnimations, Motion};
    use crate::location::{GameSnapshot, Location};
    use crate::settings::EngineSettings;
    use crate::trajectory::Trajectory;

    const EPS: f32 = 1e-4;

    fn keyframes(animation: Option<ItemAnimation>) -> Trajectory {
        match animation.map(|a| a.motion) {
            Some(Motion::Keyframes(trajectory)) => trajectory,
            other => panic!("expected keyframes, got {other:?}"),
        }
    }

    #[test]
    fn test_plain_move_travels_between_placements() {
        let scene = Scene::new(
            GameSnapshot::new().with(CARD, in_hand()),
            GameSnapshot::new().with(CARD, on_table()),
        );
        let ctx = scene.context();
        let item_move = ItemMove::Move {
            item_type: CARD,
            item_index: 0,
            location: Location::new(TABLE),
            quantity: None,
        };
        assert_eq!(classify_move(&item_move, &ctx), Some(MoveShape::Plain));
        let animations = MaterialAnimations::new(EngineSettings::default());
        let animation = animations.animate(&item_move, &ctx);
        assert_eq!(animation.phase, Some(AnimationPhase::Pre));

        let item_ctx = ctx.before.item(CARD, 0, 0);
        let trajectory = keyframes(animations.item_animation(&item_ctx, &animation, &ctx).unwrap());
        assert!((trajectory.pose_at(0.0).translation.y - 20.0).abs() < EPS);
        assert!((trajectory.destination().translation.y + 20.0).abs() < EPS);
        assert!((trajectory.elevation_at(0.5) - 5.0).abs() < EPS);
    }

    #[test]
    fn test_merge_slides_onto_the_stack() {
        let coin = |location: Location, quantity: u32| {
            crate::location::MaterialItem::new(location)
                .with_id(1)
                .with_quantity(quantity)
        };
        let scene = Scene::new(
            GameSnapshot::new()
                .with(COIN, coin(Location::new(TABLE), 2))
                .with(COIN, coin(Location::new(HAND), 1)),
            GameSnapshot::new().with(COIN, coin(Location::new(TABLE), 3)),
        );
        let ctx = scene.context();
        let item_move = ItemMove::Move {
            item_type: COIN,
            item_index: 1,
            location: Location::new(TABLE),
            quantity: None,
        };
        assert_eq!(classify_move(&item_move, &ctx), Some(MoveShape::Merge));
        let animations = MaterialAnimations::default();
        let animation = animations.animate(&item_move, &ctx);
        assert_eq!(animation.phase, Some(AnimationPhase::Pre));

        let untouched = ctx.before.item(COIN, 0, 0);
        assert_eq!(animations.item_animation(&untouched, &animation, &ctx), Ok(None));

        let moving = ctx.before.item(COIN, 1, 0);
        let trajectory = keyframes(animations.item_animation(&moving, &animation, &ctx).unwrap());
        assert!(trajectory.elevation.is_empty());
        // third piece of a 3-coin line centered on x = 0
        let destination = trajectory.destination().translation;
        assert!((destination.x - 2.0).abs() < EPS);
        assert!((destination.y + 20.0).abs() < EPS);
    }

    #[test]
    fn test_split_animates_after_the_state_change() {
        let coin = |location: Location, quantity: u32| {
            crate::location::MaterialItem::new(location)
                .with_id(1)
                .with_quantity(quantity)
        };
        let scene = Scene::new(
            GameSnapshot::new().with(COIN, coin(Location::new(HAND), 3)),
            GameSnapshot::new()
                .with(COIN, coin(Location::new(HAND), 2))
                .with(COIN, coin(Location::new(TABLE), 1)),
        );
        let ctx = scene.context();
        let item_move = ItemMove::Move {
            item_type: COIN,
            item_index: 0,
            location: Location::new(TABLE),
            quantity: Some(1),
        };
        assert_eq!(classify_move(&item_move, &ctx), Some(MoveShape::Split));
        let animations = MaterialAnimations::default();
        let animation = animations.animate(&item_move, &ctx);
        assert_eq!(animation.phase, Some(AnimationPhase::Post));
        assert!(animation.pre_duration.abs() < EPS);
        assert!(animation.post_duration > 0.0);

        let remaining = ctx.after.item(COIN, 0, 1);
        assert_eq!(animations.item_animation(&remaining, &animation, &ctx), Ok(None));

        let split = ctx.after.item(COIN, 1, 0);
        let trajectory = keyframes(animations.item_animation(&split, &animation, &ctx).unwrap());
        // leaves from the top of the 3-coin hand line
        let origin = trajectory.pose_at(0.0).translation;
        assert!((origin.x - 2.0).abs() < EPS);
        assert!((origin.y - 20.0).abs() < EPS);
        assert!((trajectory.destination().translation.y + 20.0).abs() < EPS);
    }

    #[test]
    fn test_group_move_animates_members_only() {
        let scene = Scene::new(
            GameSnapshot::new()
                .with(CARD, in_hand())
                .with(CARD, in_hand())
                .with(CARD, in_hand()),
            GameSnapshot::new()
                .with(CARD, on_table())
                .with(CARD, in_hand())
                .with(CARD, on_table()),
        );
        let ctx = scene.context();
        let item_move = ItemMove::MoveAsGroup {
            item_type: CARD,
            indexes: vec![0, 2],
            location: Location::new(TABLE),
        };
        let animations = MaterialAnimations::default();
        let animation = animations.animate(&item_move, &ctx);
        assert_eq!(animation.phase, Some(AnimationPhase::Pre));
        let moved: Vec<bool> = (0..3)
            .map(|index| {
                let item_ctx = ctx.before.item(CARD, index, 0);
                animations
                    .item_animation(&item_ctx, &animation, &ctx)
                    .unwrap()
                    .is_some()
            })
            .collect();
        assert_eq!(moved, vec![true, false, true]);
    }
}
