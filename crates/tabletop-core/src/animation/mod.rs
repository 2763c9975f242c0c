//! Animation of moves between two game states.
//!
//! A move is animated in one of two phases:
//! - `Pre`: before the state changes, the piece travels on the old state;
//! - `Post`: once the new state exists (created items, split stacks).
//!
//! Each move kind has a strategy implementing [`ItemAnimations`]. The
//! renderer asks the strategy, for every displayed item instance of the
//! phase's state, whether it is animated and along which trajectory.

mod config;
mod create;
mod delete;
mod movement;
mod roll;
mod shuffle;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::context::{ItemContext, MaterialContext};
use crate::error::PlacementError;
use crate::location::{Location, MaterialType};
use crate::moves::{ItemMove, MoveKind};
use crate::placement::item_pose;
use crate::sound::SoundConfig;
use crate::trajectory::{Trajectory, TrajectoryConfig};
use crate::transform::Pose;

pub use config::{AnimationConfig, MaterialAnimations, MoveFilter};
pub use create::CreateAnimations;
pub use delete::{DeleteAnimations, DeleteAsGroupAnimations};
pub use movement::{MoveAnimations, MoveAsGroupAnimations, MoveShape, classify_move};
pub use roll::RollAnimations;
pub use shuffle::ShuffleAnimations;

/// When a move is animated relative to the state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationPhase {
    Pre,
    Post,
}

/// Game state before and after a move.
#[derive(Debug, Clone, Copy)]
pub struct AnimationContext<'a> {
    pub before: MaterialContext<'a>,
    pub after: MaterialContext<'a>,
}

impl<'a> AnimationContext<'a> {
    pub fn new(before: MaterialContext<'a>, after: MaterialContext<'a>) -> Self {
        Self { before, after }
    }

    /// The state rendered during `phase`.
    pub fn state(&self, phase: AnimationPhase) -> &MaterialContext<'a> {
        match phase {
            AnimationPhase::Pre => &self.before,
            AnimationPhase::Post => &self.after,
        }
    }
}

/// Resolved parameters of one animation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationParams {
    /// Seconds.
    pub duration: f32,
    pub trajectory: TrajectoryConfig,
    pub post_move: bool,
    pub skip: bool,
    /// Full turns of a rolled die.
    pub roll_turns: f32,
}

/// An animation in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub item_move: ItemMove,
    /// Seconds.
    pub duration: f32,
    pub pre_duration: f32,
    pub post_duration: f32,
    /// `None` when the move is not animated.
    pub phase: Option<AnimationPhase>,
    pub sound: Option<SoundConfig>,
    pub params: AnimationParams,
}

/// How one item instance moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Motion {
    Keyframes(Trajectory),
    /// Appears in place (created without a stock location).
    FadeIn,
    /// Disappears in place (deleted without a stock location).
    FadeOut,
}

/// Animation of one displayed item instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAnimation {
    /// Seconds.
    pub duration: f32,
    pub motion: Motion,
}

/// Animation strategy of one move kind.
pub trait ItemAnimations: fmt::Debug + Send + Sync {
    fn params(&self) -> &AnimationParams;

    /// Phase of the move, `None` when it is skipped.
    fn phase(&self, _item_move: &ItemMove, _ctx: &AnimationContext<'_>) -> Option<AnimationPhase> {
        let params = self.params();
        if params.skip {
            None
        } else if params.post_move {
            Some(AnimationPhase::Post)
        } else {
            Some(AnimationPhase::Pre)
        }
    }

    /// Seconds to animate before the state changes.
    fn pre_duration(&self, item_move: &ItemMove, ctx: &AnimationContext<'_>) -> f32 {
        match self.phase(item_move, ctx) {
            Some(AnimationPhase::Pre) => self.params().duration,
            _ => 0.0,
        }
    }

    /// Seconds to animate after the state changed.
    fn post_duration(&self, item_move: &ItemMove, ctx: &AnimationContext<'_>) -> f32 {
        match self.phase(item_move, ctx) {
            Some(AnimationPhase::Post) => self.params().duration,
            _ => 0.0,
        }
    }

    /// Animation of the instance described by `item_ctx`, which lives in the
    /// state of `animation.phase`. `None` when the instance does not move.
    fn item_animation(
        &self,
        item_ctx: &ItemContext<'_>,
        animation: &Animation,
        ctx: &AnimationContext<'_>,
    ) -> Result<Option<ItemAnimation>, PlacementError>;
}

/// Strategy for a move kind.
pub fn strategy(kind: MoveKind, params: AnimationParams) -> Box<dyn ItemAnimations> {
    match kind {
        MoveKind::Create => Box::new(CreateAnimations::new(params)),
        MoveKind::Move => Box::new(MoveAnimations::new(params)),
        MoveKind::MoveAsGroup => Box::new(MoveAsGroupAnimations::new(params)),
        MoveKind::Delete => Box::new(DeleteAnimations::new(params)),
        MoveKind::DeleteAsGroup => Box::new(DeleteAsGroupAnimations::new(params)),
        MoveKind::Roll => Box::new(RollAnimations::new(params)),
        MoveKind::Shuffle => Box::new(ShuffleAnimations::new(params)),
    }
}

/// One piece travelling from a display instance in the old state to one in
/// the new state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Travel {
    pub kind: MaterialType,
    pub from: (usize, usize),
    pub to: (usize, usize),
}

impl Travel {
    pub fn origin(&self, ctx: &AnimationContext<'_>) -> Result<Pose, PlacementError> {
        item_pose(&ctx.before, self.kind, self.from.0, self.from.1)
    }

    pub fn destination(&self, ctx: &AnimationContext<'_>) -> Result<Pose, PlacementError> {
        item_pose(&ctx.after, self.kind, self.to.0, self.to.1)
    }
}

/// Keyframed flight between two poses, waypoints resolved on `state`.
pub(crate) fn fly(
    origin: Pose,
    destination: Pose,
    trajectory: &TrajectoryConfig,
    duration: f32,
    state: &MaterialContext<'_>,
) -> Result<ItemAnimation, PlacementError> {
    Ok(ItemAnimation {
        duration,
        motion: Motion::Keyframes(Trajectory::between(origin, destination, trajectory, state)?),
    })
}

/// Animates a travelling piece with the animation's trajectory.
pub(crate) fn fly_travel(
    travel: &Travel,
    animation: &Animation,
    trajectory: &TrajectoryConfig,
    ctx: &AnimationContext<'_>,
) -> Result<Option<ItemAnimation>, PlacementError> {
    let Some(phase) = animation.phase else {
        return Ok(None);
    };
    let origin = travel.origin(ctx)?;
    let destination = travel.destination(ctx)?;
    fly(origin, destination, trajectory, animation.duration, ctx.state(phase)).map(Some)
}

/// Pose of a material's stock location, if it has one.
pub(crate) fn stock_pose(
    kind: MaterialType,
    state: &MaterialContext<'_>,
) -> Result<Option<Pose>, PlacementError> {
    let Some(stock) = state.materials.stock_location(kind) else {
        return Ok(None);
    };
    state.locators.location_pose(stock, state).map(Some)
}

/// Returns true when `item_ctx` is an instance of item `kind#index`.
pub(crate) fn is_instance(item_ctx: &ItemContext<'_>, kind: MaterialType, index: usize) -> bool {
    item_ctx.kind == kind && item_ctx.index == index
}

/// Index of the first item of `kind` in `state` with `id` at the slot of `location`.
pub(crate) fn find_in_slot(
    state: &MaterialContext<'_>,
    kind: MaterialType,
    id: Option<i64>,
    location: &Location,
    except: Option<usize>,
) -> Option<usize> {
    state
        .snapshot
        .items(kind)
        .iter()
        .enumerate()
        .find(|(index, item)| {
            Some(*index) != except && item.id == id && item.location.same_slot(location)
        })
        .map(|(index, _)| index)
}

/// Like [`find_in_slot`], restricted to stacks (items with an explicit quantity).
pub(crate) fn find_stack(
    state: &MaterialContext<'_>,
    kind: MaterialType,
    id: Option<i64>,
    location: &Location,
    except: Option<usize>,
) -> Option<usize> {
    find_in_slot(state, kind, id, location, except).filter(|index| {
        state
            .snapshot
            .item(kind, *index)
            .is_some_and(|item| item.quantity.is_some())
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::location::{GameSnapshot, Location, MaterialItem};
    use crate::locator::{
        ListLocator, LocatorRegistry, LocatorSetup, PileCache, PlaceholderLocator,
    };
    use crate::material::{MaterialDescription, MaterialRegistry, SizeSpec};
    use crate::transform::{Coordinates, PartialCoordinates};

    use super::AnimationContext;
    use crate::context::MaterialContext;

    pub const CARD: u32 = 1;
    pub const COIN: u32 = 2;
    pub const HAND: u32 = 10;
    pub const TABLE: u32 = 11;
    pub const STOCK: u32 = 12;

    /// Two states sharing registries.
    #[derive(Debug)]
    pub struct Scene {
        pub before: GameSnapshot,
        pub after: GameSnapshot,
        pub locators: LocatorRegistry,
        pub materials: MaterialRegistry,
        pub pile_cache: PileCache,
    }

    impl Scene {
        pub fn new(before: GameSnapshot, after: GameSnapshot) -> Self {
            let locators = LocatorRegistry::new()
                .with(
                    HAND,
                    ListLocator::new(PartialCoordinates::x(2.0)).at(Coordinates::xy(0.0, 20.0)),
                )
                .with(
                    TABLE,
                    ListLocator::new(PartialCoordinates::x(2.0)).at(Coordinates::xy(0.0, -20.0)),
                )
                .with(STOCK, PlaceholderLocator::new().at(Coordinates::xy(-50.0, 0.0)));
            let materials = MaterialRegistry::new()
                .with(
                    CARD,
                    MaterialDescription::new(SizeSpec::new(6.0, 9.0)).with_stock(Location::new(STOCK)),
                )
                .and_then(|m| m.with(COIN, MaterialDescription::new(SizeSpec::new(1.0, 1.0))))
                .unwrap();
            Self {
                before,
                after,
                locators,
                materials,
                pile_cache: PileCache::new(0),
            }
        }

        pub fn context(&self) -> AnimationContext<'_> {
            AnimationContext::new(
                MaterialContext::new(&self.before, &self.locators, &self.materials, &self.pile_cache),
                MaterialContext::new(&self.after, &self.locators, &self.materials, &self.pile_cache),
            )
        }
    }

    pub fn in_hand() -> MaterialItem {
        MaterialItem::new(Location::new(HAND))
    }

    pub fn on_table() -> MaterialItem {
        MaterialItem::new(Location::new(TABLE))
    }
}
