//! Typed transform operations.
//!
//! Placement code builds ordered lists of [`TransformOp`] and never goes
//! through strings: serialization to the renderer's syntax (CSS here) is a
//! final, separate formatting step. For interpolation an op list is reduced
//! to a [`Pose`], which always expands back to the same op shape.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A position in "em", the abstract length unit of the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Coordinates {
    pub const ZERO: Coordinates = Coordinates::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub const fn xy(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn add(self, other: Coordinates) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    pub fn sub(self, other: Coordinates) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }

    /// Linear interpolation towards `other`.
    pub fn lerp(self, other: Coordinates, t: f32) -> Self {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
            self.z + (other.z - self.z) * t,
        )
    }

    /// Distance on the table plane, ignoring `z`.
    pub fn distance_2d(self, other: Coordinates) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Rotates the in-plane part around the origin (degrees, clockwise on screen).
    pub fn rotate_z(self, degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self::new(
            self.x * cos - self.y * sin,
            self.x * sin + self.y * cos,
            self.z,
        )
    }
}

/// Partial coordinates, as configured on locators: missing axes fall back to 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialCoordinates {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f32>,
}

impl PartialCoordinates {
    pub const fn x(x: f32) -> Self {
        Self {
            x: Some(x),
            y: None,
            z: None,
        }
    }

    pub const fn y(y: f32) -> Self {
        Self {
            x: None,
            y: Some(y),
            z: None,
        }
    }

    pub const fn xyz(x: f32, y: f32, z: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
        }
    }

    pub fn or_zero(self) -> Coordinates {
        Coordinates::new(
            self.x.unwrap_or(0.0),
            self.y.unwrap_or(0.0),
            self.z.unwrap_or(0.0),
        )
    }
}

impl From<Coordinates> for PartialCoordinates {
    fn from(c: Coordinates) -> Self {
        Self::xyz(c.x, c.y, c.z)
    }
}

/// Rotation axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Unit of a rotation angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleUnit {
    #[default]
    Deg,
    Rad,
    Turn,
}

impl AngleUnit {
    pub fn to_degrees(self, angle: f32) -> f32 {
        match self {
            Self::Deg => angle,
            Self::Rad => angle.to_degrees(),
            Self::Turn => angle * 360.0,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Self::Deg => "deg",
            Self::Rad => "rad",
            Self::Turn => "turn",
        }
    }
}

/// A single transform operation. Order matters when composing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TransformOp {
    Translate3d {
        x: f32,
        y: f32,
        z: f32,
    },
    Rotate {
        axis: Axis,
        angle: f32,
        #[serde(default)]
        unit: AngleUnit,
    },
    Scale(f32),
}

impl TransformOp {
    pub fn translate(c: Coordinates) -> Self {
        Self::Translate3d {
            x: c.x,
            y: c.y,
            z: c.z,
        }
    }

    pub fn rotate_z(degrees: f32) -> Self {
        Self::Rotate {
            axis: Axis::Z,
            angle: degrees,
            unit: AngleUnit::Deg,
        }
    }

    pub fn rotate_x(degrees: f32) -> Self {
        Self::Rotate {
            axis: Axis::X,
            angle: degrees,
            unit: AngleUnit::Deg,
        }
    }

    pub fn rotate_y(degrees: f32) -> Self {
        Self::Rotate {
            axis: Axis::Y,
            angle: degrees,
            unit: AngleUnit::Deg,
        }
    }

    /// Returns true if applying the op changes nothing.
    pub fn is_identity(&self) -> bool {
        match *self {
            Self::Translate3d { x, y, z } => x == 0.0 && y == 0.0 && z == 0.0,
            Self::Rotate { angle, .. } => angle == 0.0,
            Self::Scale(s) => (s - 1.0).abs() < f32::EPSILON,
        }
    }
}

impl fmt::Display for TransformOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Translate3d { x, y, z } => write!(f, "translate3d({x}em, {y}em, {z}em)"),
            Self::Rotate { axis, angle, unit } => {
                let axis = match axis {
                    Axis::X => 'X',
                    Axis::Y => 'Y',
                    Axis::Z => 'Z',
                };
                write!(f, "rotate{axis}({angle}{})", unit.suffix())
            }
            Self::Scale(s) => write!(f, "scale({s})"),
        }
    }
}

/// Serializes an op list to a CSS `transform` value.
pub fn css_transform(ops: &[TransformOp]) -> String {
    if ops.is_empty() {
        return "none".to_string();
    }
    ops.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns the representative of `target` (mod 360°) nearest to `origin`.
///
/// The result always satisfies `|result - origin| <= 180`.
pub fn nearest_equivalent_angle(origin: f32, target: f32) -> f32 {
    let delta = (target - origin).rem_euclid(360.0);
    if delta > 180.0 {
        origin + delta - 360.0
    } else {
        origin + delta
    }
}

/// Reduced form of an op list: one translation, one net rotation per axis
/// and one uniform scale.
///
/// Rotations around Z are chained, and every translation is re-expressed in
/// the frame it was applied in, so the visual position is preserved. X and
/// Y rotations (flips, tilts) are summed and treated as the final local
/// orientation of the piece.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub translation: Coordinates,
    pub rotate_z: f32,
    pub rotate_y: f32,
    pub rotate_x: f32,
    pub scale: f32,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    pub const IDENTITY: Pose = Pose {
        translation: Coordinates::ZERO,
        rotate_z: 0.0,
        rotate_y: 0.0,
        rotate_x: 0.0,
        scale: 1.0,
    };

    /// Reduces an ordered op list.
    pub fn from_ops(ops: &[TransformOp]) -> Self {
        let mut pose = Self::IDENTITY;
        for op in ops {
            match *op {
                TransformOp::Translate3d { x, y, z } => {
                    let local = Coordinates::new(x, y, z).rotate_z(pose.rotate_z);
                    pose.translation = pose.translation.add(local.scale(pose.scale));
                }
                TransformOp::Rotate { axis, angle, unit } => {
                    let degrees = unit.to_degrees(angle);
                    match axis {
                        Axis::Z => pose.rotate_z += degrees,
                        Axis::Y => pose.rotate_y += degrees,
                        Axis::X => pose.rotate_x += degrees,
                    }
                }
                TransformOp::Scale(s) => pose.scale *= s,
            }
        }
        pose
    }

    /// Expands back to ops. The shape is always the same five ops, padded
    /// with identities, so two poses interpolate op by op.
    pub fn to_ops(&self) -> Vec<TransformOp> {
        vec![
            TransformOp::translate(self.translation),
            TransformOp::rotate_z(self.rotate_z),
            TransformOp::rotate_y(self.rotate_y),
            TransformOp::rotate_x(self.rotate_x),
            TransformOp::Scale(self.scale),
        ]
    }

    pub fn lerp(&self, other: &Pose, t: f32) -> Pose {
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Pose {
            translation: self.translation.lerp(other.translation, t),
            rotate_z: mix(self.rotate_z, other.rotate_z),
            rotate_y: mix(self.rotate_y, other.rotate_y),
            rotate_x: mix(self.rotate_x, other.rotate_x),
            scale: mix(self.scale, other.scale),
        }
    }

    /// Snaps every rotation of `self` to the equivalent angle nearest to
    /// `origin`, so the piece never unwinds the long way.
    pub fn continuing_from(mut self, origin: &Pose) -> Pose {
        self.rotate_z = nearest_equivalent_angle(origin.rotate_z, self.rotate_z);
        self.rotate_y = nearest_equivalent_angle(origin.rotate_y, self.rotate_y);
        self.rotate_x = nearest_equivalent_angle(origin.rotate_x, self.rotate_x);
        self
    }
}
