//! Fluent animation configuration.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::{Animation, AnimationContext, AnimationParams, ItemAnimation, strategy};
use crate::context::ItemContext;
use crate::easing::EasingType;
use crate::error::PlacementError;
use crate::moves::ItemMove;
use crate::settings::EngineSettings;
use crate::sound::{SoundSetting, resolve_sound};
use crate::trajectory::{Elevation, TrajectoryConfig, Waypoint, WaypointTarget};

/// Predicate selecting the moves a config applies to.
pub type MoveFilter = dyn Fn(&ItemMove, &AnimationContext<'_>) -> bool + Send + Sync;

#[derive(Debug, Clone, Copy, PartialEq)]
enum ArcSetting {
    Default,
    Flat,
    Lifted(Elevation),
}

/// Animation settings for the moves matching `filter`.
///
/// Anything left unset falls back to [`EngineSettings`].
#[derive(Clone)]
pub struct AnimationConfig {
    filter: Option<Arc<MoveFilter>>,
    duration: Option<Duration>,
    sound: Option<SoundSetting>,
    trajectory: TrajectoryConfig,
    arc: ArcSetting,
    post_move: bool,
    skip: bool,
}

impl fmt::Debug for AnimationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationConfig")
            .field("filtered", &self.filter.is_some())
            .field("duration", &self.duration)
            .field("sound", &self.sound)
            .field("arc", &self.arc)
            .field("waypoints", &self.trajectory.waypoints.len())
            .field("easing", &self.trajectory.easing)
            .field("post_move", &self.post_move)
            .field("skip", &self.skip)
            .finish_non_exhaustive()
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationConfig {
    pub fn new() -> Self {
        Self {
            filter: None,
            duration: None,
            sound: None,
            trajectory: TrajectoryConfig::flat(),
            arc: ArcSetting::Default,
            post_move: false,
            skip: false,
        }
    }

    pub fn filter(
        mut self,
        filter: impl Fn(&ItemMove, &AnimationContext<'_>) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.filter = Some(Arc::new(filter));
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn sound(mut self, sound: impl Into<SoundSetting>) -> Self {
        self.sound = Some(sound.into());
        self
    }

    pub fn no_sound(mut self) -> Self {
        self.sound = Some(SoundSetting::Flag(false));
        self
    }

    /// Replaces the whole trajectory (arc, waypoints, easing, spin).
    ///
    /// Later `arc`, `flat`, `via`, `through` and `easing` calls edit it.
    pub fn trajectory(mut self, trajectory: TrajectoryConfig) -> Self {
        self.arc = trajectory.elevation.map_or(ArcSetting::Flat, ArcSetting::Lifted);
        self.trajectory = trajectory;
        self
    }

    /// Parabolic arc peaking at `height` em.
    pub fn arc(mut self, height: f32) -> Self {
        self.arc = ArcSetting::Lifted(Elevation::new(height));
        self
    }

    pub fn arc_with(mut self, elevation: Elevation) -> Self {
        self.arc = ArcSetting::Lifted(elevation);
        self
    }

    /// Keeps the piece on the table.
    pub fn flat(mut self) -> Self {
        self.arc = ArcSetting::Flat;
        self
    }

    /// Goes through `target` at fraction `at` of the animation.
    pub fn via(mut self, target: impl Into<WaypointTarget>, at: f32) -> Self {
        self.trajectory.waypoints.push(Waypoint::at(at).target(target));
        self
    }

    pub fn through(mut self, waypoints: impl IntoIterator<Item = Waypoint>) -> Self {
        self.trajectory.waypoints.extend(waypoints);
        self
    }

    pub fn easing(mut self, easing: EasingType) -> Self {
        self.trajectory.easing = easing;
        self
    }

    /// Animates after the state changed.
    pub fn post_move(mut self) -> Self {
        self.post_move = true;
        self
    }

    /// No animation at all.
    pub fn skip(mut self) -> Self {
        self.skip = true;
        self
    }

    pub fn matches(&self, item_move: &ItemMove, ctx: &AnimationContext<'_>) -> bool {
        self.filter.as_ref().is_none_or(|filter| filter(item_move, ctx))
    }

    /// Parameters of `item_move` with the gaps filled from `settings`.
    pub fn params(&self, item_move: &ItemMove, settings: &EngineSettings) -> AnimationParams {
        let kind = item_move.kind();
        let trajectory = TrajectoryConfig {
            elevation: match self.arc {
                ArcSetting::Default => settings.arc(),
                ArcSetting::Flat => None,
                ArcSetting::Lifted(elevation) => Some(elevation),
            },
            ..self.trajectory.clone()
        };
        AnimationParams {
            duration: self.duration.unwrap_or_else(|| settings.duration(kind)).as_secs_f32(),
            trajectory,
            post_move: self.post_move,
            skip: self.skip,
            roll_turns: settings.roll_turns,
        }
    }
}

/// Animation configs of one material type.
///
/// The first config whose filter matches a move wins; moves nothing matches
/// use the settings defaults.
#[derive(Debug, Clone, Default)]
pub struct MaterialAnimations {
    settings: EngineSettings,
    configs: Vec<AnimationConfig>,
}

impl MaterialAnimations {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            configs: Vec::new(),
        }
    }

    pub fn with(mut self, config: AnimationConfig) -> Self {
        self.configs.push(config);
        self
    }

    pub fn push(&mut self, config: AnimationConfig) {
        self.configs.push(config);
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    fn config(&self, item_move: &ItemMove, ctx: &AnimationContext<'_>) -> Option<&AnimationConfig> {
        self.configs.iter().find(|config| config.matches(item_move, ctx))
    }

    /// Resolves durations, phase and sound of a move.
    pub fn animate(&self, item_move: &ItemMove, ctx: &AnimationContext<'_>) -> Animation {
        let config = self.config(item_move, ctx);
        let params = config.map_or_else(
            || AnimationConfig::new().params(item_move, &self.settings),
            |config| config.params(item_move, &self.settings),
        );
        let kind = item_move.kind();
        let strategy = strategy(kind, params.clone());
        let phase = strategy.phase(item_move, ctx);
        let material_sound = ctx
            .before
            .materials
            .description(item_move.item_type())
            .and_then(|description| description.sounds.get(&kind));
        let sound = if phase.is_some() {
            resolve_sound([
                config.and_then(|config| config.sound.as_ref()),
                material_sound,
                self.settings.sound(kind),
            ])
        } else {
            None
        };
        let animation = Animation {
            item_move: item_move.clone(),
            duration: params.duration,
            pre_duration: strategy.pre_duration(item_move, ctx),
            post_duration: strategy.post_duration(item_move, ctx),
            phase,
            sound,
            params,
        };
        tracing::debug!(
            kind = ?kind,
            phase = ?animation.phase,
            pre = animation.pre_duration,
            post = animation.post_duration,
            "[animation] move classified"
        );
        animation
    }

    /// Animation of one displayed instance during `animation`.
    pub fn item_animation(
        &self,
        item_ctx: &ItemContext<'_>,
        animation: &Animation,
        ctx: &AnimationContext<'_>,
    ) -> Result<Option<ItemAnimation>, PlacementError> {
        if animation.phase.is_none() {
            return Ok(None);
        }
        strategy(animation.item_move.kind(), animation.params.clone())
            .item_animation(item_ctx, animation, ctx)
    }
}
