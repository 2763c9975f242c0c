//! Hexagonal grids addressed with offset coordinates.

use serde::{Deserialize, Serialize};

use super::{Locator, LocatorBase, LocatorSetup};
use crate::context::MaterialContext;
use crate::drop::{DragState, DropCandidate, prefer_current_rotation};
use crate::error::PlacementError;
use crate::location::Location;
use crate::transform::{Coordinates, Pose, nearest_equivalent_angle};

/// Weight of a half-turn rotation mismatch when ranking drop candidates, in em.
pub const DEFAULT_ANGLE_PENALTY: f32 = 0.5;

/// Candidates closer than this are considered tied.
const TIE_EPSILON: f32 = 1e-4;

/// Coordinate system of the `x`/`y` of a hex location (flat-top hexes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HexGridSystem {
    /// Odd columns shoved down by half a hex.
    #[default]
    OddQ,
    /// Even columns shoved down by half a hex.
    EvenQ,
    OddR,
    EvenR,
    Cube,
}

/// Places items on the center of hex cells. `x` is the column, `y` the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HexagonalGridLocator {
    #[serde(flatten)]
    pub base: LocatorBase,
    #[serde(default)]
    pub system: HexGridSystem,
    /// Hex radius (center to corner), em.
    #[serde(default = "default_size")]
    pub size: f32,
    #[serde(default = "default_angle_penalty")]
    pub angle_penalty: f32,
}

fn default_size() -> f32 {
    1.0
}

fn default_angle_penalty() -> f32 {
    DEFAULT_ANGLE_PENALTY
}

impl Default for HexagonalGridLocator {
    fn default() -> Self {
        Self {
            base: LocatorBase::default(),
            system: HexGridSystem::default(),
            size: default_size(),
            angle_penalty: DEFAULT_ANGLE_PENALTY,
        }
    }
}

impl LocatorSetup for HexagonalGridLocator {
    fn base_mut(&mut self) -> &mut LocatorBase {
        &mut self.base
    }
}

impl HexagonalGridLocator {
    pub fn new(system: HexGridSystem, size: f32) -> Self {
        Self {
            system,
            size,
            ..Self::default()
        }
    }

    pub fn angle_penalty(mut self, penalty: f32) -> Self {
        self.angle_penalty = penalty;
        self
    }

    /// Center of cell (`column`, `row`) relative to the grid origin.
    pub fn cell_center(&self, column: i32, row: i32) -> Result<Coordinates, PlacementError> {
        let shifted = match self.system {
            HexGridSystem::OddQ => 0.5 * column.rem_euclid(2) as f32,
            HexGridSystem::EvenQ => -0.5 * column.rem_euclid(2) as f32,
            system @ (HexGridSystem::OddR | HexGridSystem::EvenR | HexGridSystem::Cube) => {
                return Err(PlacementError::UnsupportedHexSystem(system));
            }
        };
        let sqrt3 = 3.0_f32.sqrt();
        Ok(Coordinates::xy(
            1.5 * column as f32 * self.size,
            sqrt3 * (row as f32 + shifted) * self.size,
        ))
    }

    fn candidate_score(
        &self,
        drag: &DragState,
        pointer: Coordinates,
        candidate: &DropCandidate<'_>,
        ctx: &MaterialContext<'_>,
    ) -> Option<f32> {
        let ops = self.place_location(candidate.location, ctx).ok()?;
        let target = Pose::from_ops(&ops).translation;
        let current = drag.item.location.rotation.unwrap_or(0.0);
        let wanted = candidate.location.rotation.unwrap_or(0.0);
        let mismatch = (nearest_equivalent_angle(current, wanted) - current).abs() / 180.0;
        Some(pointer.distance_2d(target) + self.angle_penalty * mismatch)
    }
}

impl Locator for HexagonalGridLocator {
    fn base(&self) -> &LocatorBase {
        &self.base
    }

    fn location_coordinates(
        &self,
        location: &Location,
        ctx: &MaterialContext<'_>,
    ) -> Result<Coordinates, PlacementError> {
        let origin = self.coordinates(location, ctx);
        let cell = self.cell_center(location.x.unwrap_or(0), location.y.unwrap_or(0))?;
        Ok(origin.add(cell))
    }

    /// Closest candidate to the dragged item's center wins; a rotation
    /// mismatch costs up to `angle_penalty`.
    fn select_drop_move(
        &self,
        drag: &DragState,
        candidates: &[DropCandidate<'_>],
        ctx: &MaterialContext<'_>,
    ) -> Option<usize> {
        let Some(pointer) = drag.pointer_center else {
            return prefer_current_rotation(drag, candidates);
        };
        let mut scored: Vec<(usize, f32)> = candidates
            .iter()
            .enumerate()
            .filter_map(|(i, candidate)| Some((i, self.candidate_score(drag, pointer, candidate, ctx)?)))
            .collect();
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        match scored.as_slice() {
            [] => None,
            [(best, _)] => Some(*best),
            [(best, first), (_, second), ..] => (second - first > TIE_EPSILON).then_some(*best),
        }
    }
}
