//! Keyframe trajectories between two poses.
//!
//! A trajectory has two independent tracks:
//! - the pose track (translation, rotations, scale), anchored at 0, at each
//!   waypoint and at 1;
//! - the elevation track, an outer lift along the table normal.
//!
//! Both are plain keyframe lists `{at, value, easing}` where the easing of a
//! keyframe drives the segment that starts at it, as CSS keyframes do.

use serde::{Deserialize, Serialize};

use crate::context::MaterialContext;
use crate::easing::EasingType;
use crate::error::PlacementError;
use crate::location::Location;
use crate::transform::{Coordinates, Pose, TransformOp, nearest_equivalent_angle};

/// Shape of the elevation arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElevationCurve {
    /// Ease-out up to the peak, ease-in down: an exact parabola.
    #[default]
    Parabolic,
    /// Straight up, straight down.
    Linear,
}

/// Lift of a piece while it travels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Elevation {
    /// Height at the peak, em.
    pub height: f32,
    /// Fraction of the trajectory where the peak is reached.
    #[serde(default = "default_peak")]
    pub peak: f32,
    #[serde(default)]
    pub curve: ElevationCurve,
}

fn default_peak() -> f32 {
    0.5
}

impl Elevation {
    pub fn new(height: f32) -> Self {
        Self {
            height,
            peak: default_peak(),
            curve: ElevationCurve::Parabolic,
        }
    }

    pub fn peak(mut self, peak: f32) -> Self {
        self.peak = peak;
        self
    }

    pub fn curve(mut self, curve: ElevationCurve) -> Self {
        self.curve = curve;
        self
    }
}

/// What a waypoint goes through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaypointTarget {
    /// Absolute table coordinates.
    Coordinates(Coordinates),
    /// The placement of a location, resolved through its locator.
    Location(Location),
}

impl From<Coordinates> for WaypointTarget {
    fn from(coordinates: Coordinates) -> Self {
        Self::Coordinates(coordinates)
    }
}

impl From<Location> for WaypointTarget {
    fn from(location: Location) -> Self {
        Self::Location(location)
    }
}

/// An intermediate point of a trajectory.
///
/// Unset fields follow the straight path; `easing` drives the segment that
/// leads into the waypoint. Waypoints sharing the same `at` make a single
/// keyframe: the target first, then the sum of the offsets, then the last
/// rotation, elevation and easing set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Waypoint {
    pub at: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<WaypointTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<EasingType>,
}

impl Waypoint {
    pub fn at(at: f32) -> Self {
        Self {
            at,
            ..Self::default()
        }
    }

    pub fn target(mut self, target: impl Into<WaypointTarget>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn offset(mut self, offset: Coordinates) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Lift at this waypoint, em.
    ///
    /// Once any waypoint sets one, the configured arc is dropped: the lift
    /// goes in straight lines from 0 through every override and back to 0.
    pub fn elevation(mut self, elevation: f32) -> Self {
        self.elevation = Some(elevation);
        self
    }

    pub fn rotation(mut self, degrees: f32) -> Self {
        self.rotation = Some(degrees);
        self
    }

    pub fn easing(mut self, easing: EasingType) -> Self {
        self.easing = Some(easing);
        self
    }
}

/// How to travel between two poses.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrajectoryConfig {
    /// `None` keeps the piece on the table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<Elevation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub waypoints: Vec<Waypoint>,
    #[serde(default)]
    pub easing: EasingType,
    /// Extra full turns around Z and X on arrival (dice).
    #[serde(default)]
    pub spin_turns: f32,
}

impl TrajectoryConfig {
    pub fn flat() -> Self {
        Self::default()
    }

    pub fn arc(elevation: Elevation) -> Self {
        Self {
            elevation: Some(elevation),
            ..Self::default()
        }
    }
}

/// One pose keyframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub at: f32,
    pub ops: Vec<TransformOp>,
    pub easing: EasingType,
}

/// One elevation keyframe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElevationKeyframe {
    pub at: f32,
    pub z: f32,
    pub easing: EasingType,
}

/// A resolved trajectory.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Trajectory {
    pub keyframes: Vec<Keyframe>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub elevation: Vec<ElevationKeyframe>,
}

struct Anchor {
    at: f32,
    pose: Pose,
    rotation_override: bool,
    easing_in: EasingType,
}

impl Trajectory {
    /// Builds the trajectory from `origin` to `destination`.
    ///
    /// The destination rotations are first moved to the representatives
    /// nearest to the origin so the piece takes the short way around.
    pub fn between(
        origin: Pose,
        destination: Pose,
        config: &TrajectoryConfig,
        ctx: &MaterialContext<'_>,
    ) -> Result<Trajectory, PlacementError> {
        let mut waypoints: Vec<&Waypoint> = config
            .waypoints
            .iter()
            .filter(|w| w.at > 0.0 && w.at < 1.0)
            .collect();
        waypoints.sort_by(|a, b| a.at.total_cmp(&b.at));
        let groups: Vec<&[&Waypoint]> = waypoints
            .chunk_by(|a, b| a.at.total_cmp(&b.at).is_eq())
            .collect();

        let destination = destination.continuing_from(&origin);
        let mut anchors = vec![Anchor {
            at: 0.0,
            pose: origin,
            rotation_override: true,
            easing_in: config.easing,
        }];
        for group in &groups {
            let at = group[0].at;
            let mut pose = origin.lerp(&destination, at);
            for waypoint in *group {
                match &waypoint.target {
                    Some(WaypointTarget::Coordinates(c)) => pose.translation = *c,
                    Some(WaypointTarget::Location(location)) => {
                        pose.translation = ctx.locators.location_pose(location, ctx)?.translation;
                    }
                    None => {}
                }
            }
            for offset in group.iter().filter_map(|w| w.offset) {
                pose.translation = pose.translation.add(offset);
            }
            let rotation = group.iter().rev().find_map(|w| w.rotation);
            if let Some(rotation) = rotation {
                pose.rotate_z = rotation;
            }
            anchors.push(Anchor {
                at,
                pose,
                rotation_override: rotation.is_some(),
                easing_in: group
                    .iter()
                    .rev()
                    .find_map(|w| w.easing)
                    .unwrap_or(config.easing),
            });
        }
        anchors.push(Anchor {
            at: 1.0,
            pose: destination,
            rotation_override: true,
            easing_in: config.easing,
        });
        chain_rotations(&mut anchors, config.spin_turns);

        let keyframes = anchors
            .iter()
            .enumerate()
            .map(|(i, anchor)| Keyframe {
                at: anchor.at,
                ops: anchor.pose.to_ops(),
                easing: anchors.get(i + 1).map_or(config.easing, |next| next.easing_in),
            })
            .collect();

        Ok(Trajectory {
            keyframes,
            elevation: elevation_track(config.elevation, &groups),
        })
    }

    /// Pose at fraction `t` of the trajectory.
    pub fn pose_at(&self, t: f32) -> Pose {
        let Some(first) = self.keyframes.first() else {
            return Pose::IDENTITY;
        };
        let t = t.clamp(0.0, 1.0);
        let segment = self
            .keyframes
            .windows(2)
            .find(|pair| t <= pair[1].at)
            .or_else(|| self.keyframes.windows(2).last());
        match segment {
            Some([from, to]) => {
                let u = segment_progress(from.at, to.at, t);
                Pose::from_ops(&from.ops).lerp(&Pose::from_ops(&to.ops), from.easing.apply(u))
            }
            _ => Pose::from_ops(&first.ops),
        }
    }

    /// Lift at fraction `t` of the trajectory.
    pub fn elevation_at(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        let segment = self
            .elevation
            .windows(2)
            .find(|pair| t <= pair[1].at)
            .or_else(|| self.elevation.windows(2).last());
        match segment {
            Some([from, to]) => {
                let u = from.easing.apply(segment_progress(from.at, to.at, t));
                from.z + (to.z - from.z) * u
            }
            _ => 0.0,
        }
    }

    /// Composed ops at fraction `t`: the lift, then the pose.
    pub fn sample(&self, t: f32) -> Vec<TransformOp> {
        let mut ops = Vec::with_capacity(6);
        if !self.elevation.is_empty() {
            ops.push(TransformOp::translate(Coordinates::new(0.0, 0.0, self.elevation_at(t))));
        }
        ops.extend(self.pose_at(t).to_ops());
        ops
    }

    /// Final pose of the piece.
    pub fn destination(&self) -> Pose {
        self.keyframes
            .last()
            .map_or(Pose::IDENTITY, |k| Pose::from_ops(&k.ops))
    }
}

fn segment_progress(from: f32, to: f32, t: f32) -> f32 {
    if to > from {
        ((t - from) / (to - from)).clamp(0.0, 1.0)
    } else {
        1.0
    }
}

/// Makes rotations piecewise linear between the anchors that set one, each
/// taking the short way from the previous one; spin turns are added last.
fn chain_rotations(anchors: &mut [Anchor], spin_turns: f32) {
    let fixed: Vec<usize> = anchors
        .iter()
        .enumerate()
        .filter(|(_, a)| a.rotation_override)
        .map(|(i, _)| i)
        .collect();
    for pair in fixed.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let start = anchors[from].pose.rotate_z;
        let end = nearest_equivalent_angle(start, anchors[to].pose.rotate_z);
        anchors[to].pose.rotate_z = end;
        let (t0, t1) = (anchors[from].at, anchors[to].at);
        for anchor in &mut anchors[from + 1..to] {
            let u = segment_progress(t0, t1, anchor.at);
            anchor.pose.rotate_z = start + (end - start) * u;
        }
    }
    if spin_turns != 0.0 {
        let spin = 360.0 * spin_turns;
        if let Some(last) = anchors.last_mut() {
            last.pose.rotate_z += spin;
            last.pose.rotate_x += spin;
        }
        let total = anchors.len();
        for anchor in anchors.iter_mut().take(total.saturating_sub(1)).skip(1) {
            anchor.pose.rotate_z += spin * anchor.at;
            anchor.pose.rotate_x += spin * anchor.at;
        }
    }
}

fn elevation_track(elevation: Option<Elevation>, groups: &[&[&Waypoint]]) -> Vec<ElevationKeyframe> {
    let overrides: Vec<(f32, f32)> = groups
        .iter()
        .filter_map(|group| {
            let at = group.first()?.at;
            group.iter().rev().find_map(|w| w.elevation).map(|z| (at, z))
        })
        .collect();
    if !overrides.is_empty() {
        let mut track = vec![ElevationKeyframe {
            at: 0.0,
            z: 0.0,
            easing: EasingType::Linear,
        }];
        track.extend(overrides.into_iter().map(|(at, z)| ElevationKeyframe {
            at,
            z,
            easing: EasingType::Linear,
        }));
        track.push(ElevationKeyframe {
            at: 1.0,
            z: 0.0,
            easing: EasingType::Linear,
        });
        return track;
    }
    let Some(elevation) = elevation.filter(|e| e.height != 0.0) else {
        return Vec::new();
    };
    let (rise, fall) = match elevation.curve {
        ElevationCurve::Parabolic => (EasingType::EaseOut, EasingType::EaseIn),
        ElevationCurve::Linear => (EasingType::Linear, EasingType::Linear),
    };
    vec![
        ElevationKeyframe {
            at: 0.0,
            z: 0.0,
            easing: rise,
        },
        ElevationKeyframe {
            at: elevation.peak.clamp(0.01, 0.99),
            z: elevation.height,
            easing: fall,
        },
        ElevationKeyframe {
            at: 1.0,
            z: 0.0,
            easing: EasingType::Linear,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::{LocatorRegistry, LocatorSetup, PlaceholderLocator};
    use crate::test_utils::Fixture;

    const EPS: f32 = 1e-4;

    fn pose(x: f32, y: f32, rotate_z: f32) -> Pose {
        Pose {
            translation: Coordinates::xy(x, y),
            rotate_z,
            ..Pose::IDENTITY
        }
    }

    fn build(origin: Pose, destination: Pose, config: &TrajectoryConfig) -> Trajectory {
        let fixture = Fixture::new();
        Trajectory::between(origin, destination, config, &fixture.context()).unwrap()
    }

    #[test]
    fn test_two_point_interpolation() {
        let trajectory = build(pose(0.0, 0.0, 0.0), pose(10.0, -4.0, 90.0), &TrajectoryConfig::flat());
        assert_eq!(trajectory.keyframes.len(), 2);
        assert!(trajectory.elevation.is_empty());
        let mid = trajectory.pose_at(0.5);
        assert!((mid.translation.x - 5.0).abs() < EPS);
        assert!((mid.translation.y + 2.0).abs() < EPS);
        assert!((mid.rotate_z - 45.0).abs() < EPS);
        assert_eq!(trajectory.sample(0.5).len(), 5);
    }

    #[test]
    fn test_rotation_takes_short_way() {
        let trajectory = build(pose(0.0, 0.0, 350.0), pose(0.0, 0.0, 10.0), &TrajectoryConfig::flat());
        assert!((trajectory.pose_at(0.5).rotate_z - 360.0).abs() < EPS);
        assert!((trajectory.destination().rotate_z - 370.0).abs() < EPS);
    }

    #[test]
    fn test_parabolic_arc() {
        let config = TrajectoryConfig::arc(Elevation::new(2.0));
        let trajectory = build(Pose::IDENTITY, pose(10.0, 0.0, 0.0), &config);
        for t in [0.0, 0.1, 0.25, 0.5, 0.8, 1.0] {
            let expected = 4.0 * 2.0 * t * (1.0 - t);
            assert!((trajectory.elevation_at(t) - expected).abs() < EPS, "t = {t}");
        }
        let ops = trajectory.sample(0.25);
        assert_eq!(ops.len(), 6);
        assert_eq!(ops[0], TransformOp::translate(Coordinates::new(0.0, 0.0, 1.5)));
    }

    #[test]
    fn test_linear_arc_is_triangular() {
        let config = TrajectoryConfig::arc(Elevation::new(3.0).peak(0.25).curve(ElevationCurve::Linear));
        let trajectory = build(Pose::IDENTITY, pose(10.0, 0.0, 0.0), &config);
        assert!((trajectory.elevation_at(0.125) - 1.5).abs() < EPS);
        assert!((trajectory.elevation_at(0.25) - 3.0).abs() < EPS);
        assert!((trajectory.elevation_at(0.625) - 1.5).abs() < EPS);
    }

    #[test]
    fn test_waypoint_overrides_position_and_elevation() {
        let config = TrajectoryConfig {
            waypoints: vec![
                Waypoint::at(0.5)
                    .target(Coordinates::xy(0.0, 8.0))
                    .offset(Coordinates::xy(1.0, 0.0))
                    .elevation(4.0),
            ],
            ..TrajectoryConfig::arc(Elevation::new(1.0))
        };
        let trajectory = build(Pose::IDENTITY, pose(10.0, 0.0, 0.0), &config);
        assert_eq!(trajectory.keyframes.len(), 3);
        let mid = trajectory.pose_at(0.5);
        assert!((mid.translation.x - 1.0).abs() < EPS);
        assert!((mid.translation.y - 8.0).abs() < EPS);
        let quarter = trajectory.pose_at(0.25);
        assert!((quarter.translation.x - 0.5).abs() < EPS);
        assert!((quarter.translation.y - 4.0).abs() < EPS);
        assert!((trajectory.elevation_at(0.25) - 2.0).abs() < EPS);
        assert!((trajectory.elevation_at(0.5) - 4.0).abs() < EPS);
    }

    #[test]
    fn test_waypoints_sharing_a_fraction_make_one_keyframe() {
        let config = TrajectoryConfig {
            waypoints: vec![
                Waypoint::at(0.5).target(Coordinates::xy(0.0, 8.0)).elevation(1.0),
                Waypoint::at(0.5).offset(Coordinates::xy(1.0, 0.0)).rotation(30.0),
                Waypoint::at(0.5).offset(Coordinates::xy(0.0, 1.0)).elevation(3.0),
            ],
            ..TrajectoryConfig::flat()
        };
        let trajectory = build(Pose::IDENTITY, pose(10.0, 0.0, 0.0), &config);
        assert_eq!(trajectory.keyframes.len(), 3);
        let mid = trajectory.pose_at(0.5);
        assert!((mid.translation.x - 1.0).abs() < EPS);
        assert!((mid.translation.y - 9.0).abs() < EPS);
        assert!((mid.rotate_z - 30.0).abs() < EPS);
        let after = trajectory.pose_at(0.5001);
        assert!((after.translation.x - 1.0).abs() < 0.01);
        assert!((after.translation.y - 9.0).abs() < 0.01);
        assert_eq!(trajectory.elevation.len(), 3);
        assert!((trajectory.elevation_at(0.5) - 3.0).abs() < EPS);
    }

    #[test]
    fn test_elevation_override_replaces_the_arc() {
        let config = TrajectoryConfig {
            waypoints: vec![Waypoint::at(0.25).elevation(2.0)],
            ..TrajectoryConfig::arc(Elevation::new(6.0))
        };
        let trajectory = build(Pose::IDENTITY, pose(10.0, 0.0, 0.0), &config);
        assert!((trajectory.elevation_at(0.25) - 2.0).abs() < EPS);
        assert!((trajectory.elevation_at(0.5) - 4.0 / 3.0).abs() < EPS);
        assert!((trajectory.elevation_at(0.625) - 1.0).abs() < EPS);
        assert!(trajectory.elevation_at(1.0).abs() < EPS);
    }

    #[test]
    fn test_waypoint_on_location() {
        let mut fixture = Fixture::new();
        fixture.locators = LocatorRegistry::new().with(
            3,
            PlaceholderLocator::new().at(Coordinates::xy(-20.0, 6.0)),
        );
        let config = TrajectoryConfig {
            waypoints: vec![Waypoint::at(0.5).target(Location::new(3))],
            ..TrajectoryConfig::flat()
        };
        let trajectory = Trajectory::between(
            Pose::IDENTITY,
            pose(10.0, 0.0, 0.0),
            &config,
            &fixture.context(),
        )
        .unwrap();
        let mid = trajectory.pose_at(0.5);
        assert!((mid.translation.x + 20.0).abs() < EPS);
        assert!((mid.translation.y - 6.0).abs() < EPS);

        let unknown = TrajectoryConfig {
            waypoints: vec![Waypoint::at(0.5).target(Location::new(9))],
            ..TrajectoryConfig::flat()
        };
        let result = Trajectory::between(Pose::IDENTITY, Pose::IDENTITY, &unknown, &fixture.context());
        assert_eq!(result, Err(PlacementError::UnregisteredLocator(9)));
    }

    #[test]
    fn test_rotation_is_piecewise_over_overrides() {
        let config = TrajectoryConfig {
            waypoints: vec![Waypoint::at(0.25), Waypoint::at(0.5).rotation(180.0)],
            ..TrajectoryConfig::flat()
        };
        let trajectory = build(pose(0.0, 0.0, 0.0), pose(0.0, 0.0, 0.0), &config);
        assert!((trajectory.pose_at(0.25).rotate_z - 90.0).abs() < EPS);
        assert!((trajectory.pose_at(0.5).rotate_z - 180.0).abs() < EPS);
        // from 180, the nearest representative of 0 is 360
        assert!((trajectory.destination().rotate_z - 360.0).abs() < EPS);
    }

    #[test]
    fn test_waypoint_easing_drives_incoming_segment() {
        let config = TrajectoryConfig {
            waypoints: vec![Waypoint::at(0.5).easing(EasingType::EaseIn)],
            ..TrajectoryConfig::flat()
        };
        let trajectory = build(Pose::IDENTITY, pose(8.0, 0.0, 0.0), &config);
        assert_eq!(trajectory.keyframes[0].easing, EasingType::EaseIn);
        assert_eq!(trajectory.keyframes[1].easing, EasingType::Linear);
        // half way through the first segment, ease-in covers a quarter
        assert!((trajectory.pose_at(0.25).translation.x - 1.0).abs() < EPS);
    }

    #[test]
    fn test_spin_turns_add_full_turns() {
        let config = TrajectoryConfig {
            spin_turns: 2.0,
            ..TrajectoryConfig::flat()
        };
        let trajectory = build(pose(0.0, 0.0, 0.0), pose(0.0, 0.0, 90.0), &config);
        let end = trajectory.destination();
        assert!((end.rotate_z - 810.0).abs() < EPS);
        assert!((end.rotate_x - 720.0).abs() < EPS);
    }
}
