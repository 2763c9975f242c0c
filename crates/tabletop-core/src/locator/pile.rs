//! Loose piles: items scattered at random inside a circle.
//!
//! Each (pile, index) slot draws its jitter once from a [`PileCache`] and
//! keeps it, so re-rendering never reshuffles the pile. The cache belongs to
//! the view that renders the table, never to the locator.

use std::collections::HashMap;

use parking_lot::Mutex;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::{Locator, LocatorBase, LocatorSetup};
use crate::context::ItemContext;
use crate::error::PlacementError;
use crate::location::{Location, MaterialItem, MaterialType};
use crate::transform::Coordinates;

/// One persistent draw, normalized: the offset lies in the unit disk and
/// the spin in `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PileJitter {
    pub dx: f32,
    pub dy: f32,
    pub spin: f32,
}

#[derive(Debug)]
struct PileCacheState {
    rng: ChaCha8Rng,
    draws: HashMap<(String, usize), PileJitter>,
}

/// Jitter cache keyed by (pile id, item index).
#[derive(Debug)]
pub struct PileCache {
    state: Mutex<PileCacheState>,
}

impl Default for PileCache {
    fn default() -> Self {
        Self::new(rand::random())
    }
}

impl PileCache {
    /// Creates a cache whose draws are reproducible from `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            state: Mutex::new(PileCacheState {
                rng: ChaCha8Rng::seed_from_u64(seed),
                draws: HashMap::new(),
            }),
        }
    }

    /// Jitter of slot `index` in `pile_id`, drawn on first use.
    pub fn jitter(&self, pile_id: &str, index: usize) -> PileJitter {
        let mut state = self.state.lock();
        let key = (pile_id.to_string(), index);
        if let Some(jitter) = state.draws.get(&key) {
            return *jitter;
        }
        let distance = state.rng.random::<f32>().sqrt();
        let angle = state.rng.random::<f32>() * std::f32::consts::TAU;
        let spin = state.rng.random_range(-1.0..=1.0);
        let jitter = PileJitter {
            dx: distance * angle.cos(),
            dy: distance * angle.sin(),
            spin,
        };
        tracing::trace!(pile_id, index, ?jitter, "[pile] new jitter");
        state.draws.insert(key, jitter);
        jitter
    }

    /// Forgets every draw (the random sequence goes on).
    pub fn clear(&self) {
        self.state.lock().draws.clear();
    }

    pub fn len(&self) -> usize {
        self.state.lock().draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Scatters items within `radius` of the origin, each turned by up to
/// `max_angle` degrees either way, stacked by thickness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PileLocator {
    #[serde(flatten)]
    pub base: LocatorBase,
    #[serde(default = "default_radius")]
    pub radius: f32,
    #[serde(default)]
    pub max_angle: f32,
}

fn default_radius() -> f32 {
    1.0
}

impl Default for PileLocator {
    fn default() -> Self {
        Self {
            base: LocatorBase::default(),
            radius: default_radius(),
            max_angle: 0.0,
        }
    }
}

impl LocatorSetup for PileLocator {
    fn base_mut(&mut self) -> &mut LocatorBase {
        &mut self.base
    }
}

impl PileLocator {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            ..Self::default()
        }
    }

    pub fn max_angle(mut self, degrees: f32) -> Self {
        self.max_angle = degrees;
        self
    }

    /// Identifies the pile an item belongs to.
    pub fn pile_id(&self, kind: MaterialType, location: &Location) -> String {
        format!("{kind}@{}", location.area_key())
    }

    fn jitter(&self, item: &MaterialItem, ctx: &ItemContext<'_>) -> (usize, PileJitter) {
        let index = self.item_index(item, ctx);
        let pile_id = self.pile_id(ctx.kind, &item.location);
        (index, ctx.material.pile_cache.jitter(&pile_id, index))
    }
}

impl Locator for PileLocator {
    fn base(&self) -> &LocatorBase {
        &self.base
    }

    fn item_coordinates(
        &self,
        item: &MaterialItem,
        ctx: &ItemContext<'_>,
    ) -> Result<Coordinates, PlacementError> {
        let origin = self.coordinates(&item.location, &ctx.material);
        let (index, jitter) = self.jitter(item, ctx);
        let thickness = ctx.material.materials.thickness(ctx.kind);
        Ok(origin.add(Coordinates::new(
            jitter.dx * self.radius,
            jitter.dy * self.radius,
            index as f32 * thickness,
        )))
    }

    fn item_rotation(&self, item: &MaterialItem, ctx: &ItemContext<'_>) -> Result<f32, PlacementError> {
        let (_, jitter) = self.jitter(item, ctx);
        Ok(self.location_rotation(&item.location, &ctx.material) + jitter.spin * self.max_angle)
    }
}
