//! Shared fixtures for unit tests.

use crate::context::MaterialContext;
use crate::location::GameSnapshot;
use crate::locator::{LocatorRegistry, PileCache};
use crate::material::MaterialRegistry;

/// Owns everything a [`MaterialContext`] borrows.
#[derive(Debug, Default)]
pub struct Fixture {
    pub snapshot: GameSnapshot,
    pub locators: LocatorRegistry,
    pub materials: MaterialRegistry,
    pub pile_cache: PileCache,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            snapshot: GameSnapshot::new(),
            locators: LocatorRegistry::new(),
            materials: MaterialRegistry::new(),
            pile_cache: PileCache::new(seed),
        }
    }

    pub fn context(&self) -> MaterialContext<'_> {
        MaterialContext::new(&self.snapshot, &self.locators, &self.materials, &self.pile_cache)
    }
}
