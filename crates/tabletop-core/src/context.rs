//! Read-only contexts handed to locators and animations.

use std::fmt;

use crate::error::PlacementError;
use crate::location::{GameSnapshot, MaterialItem, MaterialType, PlayerId};
use crate::locator::{LocatorRegistry, PileCache};
use crate::material::MaterialRegistry;

/// Maximum depth of a parent chain (item on item on item...).
pub const MAX_NESTING_DEPTH: usize = 16;

/// Everything a placement needs to know about one game state.
#[derive(Clone, Copy)]
pub struct MaterialContext<'a> {
    pub snapshot: &'a GameSnapshot,
    pub locators: &'a LocatorRegistry,
    pub materials: &'a MaterialRegistry,
    /// Jitter cache of the view that owns this context.
    pub pile_cache: &'a PileCache,
    /// Player the table is displayed for, if any.
    pub player: Option<PlayerId>,
}

impl fmt::Debug for MaterialContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaterialContext")
            .field("player", &self.player)
            .field("material_types", &self.snapshot.items.len())
            .field("locators", &self.locators.len())
            .finish_non_exhaustive()
    }
}

impl<'a> MaterialContext<'a> {
    pub fn new(
        snapshot: &'a GameSnapshot,
        locators: &'a LocatorRegistry,
        materials: &'a MaterialRegistry,
        pile_cache: &'a PileCache,
    ) -> Self {
        Self {
            snapshot,
            locators,
            materials,
            pile_cache,
            player: None,
        }
    }

    pub fn for_player(mut self, player: PlayerId) -> Self {
        self.player = Some(player);
        self
    }

    /// Same registries, other game state.
    pub fn with_snapshot(mut self, snapshot: &'a GameSnapshot) -> Self {
        self.snapshot = snapshot;
        self
    }

    /// Context of one displayed instance of an item.
    pub fn item(&self, kind: MaterialType, index: usize, display_index: usize) -> ItemContext<'a> {
        ItemContext {
            material: *self,
            kind,
            index,
            display_index,
            ancestors: Vec::new(),
        }
    }
}

/// Context of one displayed instance (`display_index`) of item `kind#index`.
#[derive(Debug, Clone)]
pub struct ItemContext<'a> {
    pub material: MaterialContext<'a>,
    pub kind: MaterialType,
    pub index: usize,
    pub display_index: usize,
    /// Items already on the placement chain, outermost last.
    ancestors: Vec<(MaterialType, usize)>,
}

impl<'a> ItemContext<'a> {
    /// The item as stored in the snapshot.
    pub fn stored_item(&self) -> Result<&'a MaterialItem, PlacementError> {
        self.material
            .snapshot
            .item(self.kind, self.index)
            .ok_or(PlacementError::MissingItem {
                kind: self.kind,
                index: self.index,
            })
    }

    /// Context of the host item `parent_kind#parent_index`.
    ///
    /// Fails when the host is already on the chain or the chain is too deep.
    pub fn parent(
        &self,
        parent_kind: MaterialType,
        parent_index: usize,
    ) -> Result<ItemContext<'a>, PlacementError> {
        let key = (parent_kind, parent_index);
        if key == (self.kind, self.index) || self.ancestors.contains(&key) {
            return Err(PlacementError::CyclicPlacement {
                kind: parent_kind,
                index: parent_index,
            });
        }
        if self.ancestors.len() + 1 >= MAX_NESTING_DEPTH {
            return Err(PlacementError::NestingTooDeep {
                kind: self.kind,
                index: self.index,
                max: MAX_NESTING_DEPTH,
            });
        }
        let mut ancestors = self.ancestors.clone();
        ancestors.push((self.kind, self.index));
        Ok(ItemContext {
            material: self.material,
            kind: parent_kind,
            index: parent_index,
            display_index: 0,
            ancestors,
        })
    }

    /// Nesting depth of this context (0 for a top-level item).
    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }
}
