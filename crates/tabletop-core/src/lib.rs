//! Tabletop Core Library
//!
//! Placement engine for board-game pieces: where every item sits on the
//! table, how it travels when a move is played, and which legal move a drag
//! and drop commits to.
//!
//! - [`locator`]: placement strategies (list, flex, grid, hand, pile, deck,
//!   hexagonal grid, placeholder) producing typed [`TransformOp`] lists;
//! - [`placement`]: the display pass over a [`GameSnapshot`];
//! - [`trajectory`] and [`animation`]: keyframed moves between two states;
//! - [`drop`]: drop-target resolution;
//! - [`focus`]: bounds and zoom for a set of pieces.
//!
//! Rule engines, rendering and networking live outside this crate.

#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]

pub mod animation;
pub mod context;
pub mod drop;
pub mod easing;
pub mod error;
pub mod focus;
pub mod location;
pub mod locator;
pub mod material;
pub mod moves;
pub mod placement;
pub mod settings;
pub mod sound;
pub mod trajectory;
pub mod transform;

#[cfg(test)]
mod test_utils;

pub use animation::{
    Animation, AnimationConfig, AnimationContext, AnimationPhase, ItemAnimation, MaterialAnimations,
    Motion,
};
pub use context::{ItemContext, MaterialContext};
pub use drop::{DragState, DropResolution, resolve_drop};
pub use easing::EasingType;
pub use error::{MaterialError, PlacementError, SettingsError};
pub use focus::{Focus, FocusBounds, Zoom};
pub use location::{GameSnapshot, Location, LocationType, MaterialItem, MaterialType};
pub use locator::{Locator, LocatorRegistry, LocatorSetup, PileCache};
pub use material::{MaterialDescription, MaterialRegistry, Size, SizeSpec};
pub use moves::{ItemMove, MoveKind};
pub use placement::{DisplayedItem, DisplayedLocation, displayed_items, displayed_locations};
pub use settings::EngineSettings;
pub use trajectory::{Trajectory, TrajectoryConfig, Waypoint};
pub use transform::{Coordinates, Pose, TransformOp};
