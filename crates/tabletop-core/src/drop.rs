//! Drop-target resolution.
//!
//! While an item is dragged over a location, the caller passes the legal
//! moves it may commit to. At most one of them is selected: zero matches,
//! or a tie the hovered locator cannot break, resolves to no action.

use crate::context::MaterialContext;
use crate::location::{Location, MaterialItem, MaterialType};
use crate::moves::ItemMove;
use crate::transform::Coordinates;

/// The item being dragged.
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    pub kind: MaterialType,
    pub index: usize,
    pub item: MaterialItem,
    /// Center of the dragged item in table coordinates, when known.
    pub pointer_center: Option<Coordinates>,
}

impl DragState {
    pub fn new(kind: MaterialType, index: usize, item: MaterialItem) -> Self {
        Self {
            kind,
            index,
            item,
            pointer_center: None,
        }
    }

    pub fn at(mut self, center: Coordinates) -> Self {
        self.pointer_center = Some(center);
        self
    }
}

/// A legal move that would drop the dragged item on the hovered location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropCandidate<'m> {
    /// Index of the move in the legal move list.
    pub move_index: usize,
    pub item_move: &'m ItemMove,
    /// Destination of the move.
    pub location: &'m Location,
}

/// The move a drop commits to.
#[derive(Debug, Clone, PartialEq)]
pub struct DropResolution {
    pub move_index: usize,
    pub item_move: ItemMove,
    pub location: Location,
}

impl From<DropCandidate<'_>> for DropResolution {
    fn from(candidate: DropCandidate<'_>) -> Self {
        Self {
            move_index: candidate.move_index,
            item_move: candidate.item_move.clone(),
            location: candidate.location.clone(),
        }
    }
}

/// Legal moves that take the dragged item to `hovered`.
///
/// A precise hovered location must match the move destination slot; an
/// area only needs the same area.
pub fn drop_candidates<'m>(
    drag: &DragState,
    legal_moves: &'m [ItemMove],
    hovered: &Location,
) -> Vec<DropCandidate<'m>> {
    legal_moves
        .iter()
        .enumerate()
        .filter(|(_, item_move)| {
            matches!(item_move, ItemMove::Move { .. } | ItemMove::MoveAsGroup { .. })
                && item_move.affects(drag.kind, drag.index)
        })
        .filter_map(|(move_index, item_move)| {
            let location = item_move.destination()?;
            let hit = if hovered.is_precise() {
                location.same_slot(hovered)
            } else {
                location.same_area(hovered)
            };
            hit.then_some(DropCandidate {
                move_index,
                item_move,
                location,
            })
        })
        .collect()
}

/// Default tie-break: the only candidate keeping the item's rotation.
pub fn prefer_current_rotation(drag: &DragState, candidates: &[DropCandidate<'_>]) -> Option<usize> {
    let current = drag.item.location.rotation.unwrap_or(0.0);
    let mut keeping = candidates
        .iter()
        .enumerate()
        .filter(|(_, candidate)| candidate.location.rotation.unwrap_or(0.0) == current)
        .map(|(i, _)| i);
    match (keeping.next(), keeping.next()) {
        (Some(only), None) => Some(only),
        _ => None,
    }
}

/// Picks the move a drop on `hovered` commits to, if any.
pub fn resolve_drop(
    drag: &DragState,
    legal_moves: &[ItemMove],
    hovered: &Location,
    ctx: &MaterialContext<'_>,
) -> Option<DropResolution> {
    let candidates = drop_candidates(drag, legal_moves, hovered);
    let selected = match candidates.as_slice() {
        [] => {
            tracing::trace!(kind = drag.kind, index = drag.index, "[drop] no legal move here");
            return None;
        }
        [only] => *only,
        _ => {
            let Some(locator) = ctx.locators.get(hovered.kind) else {
                tracing::debug!(location_type = hovered.kind, "[drop] no locator to break the tie");
                return None;
            };
            let Some(choice) = locator.select_drop_move(drag, &candidates, ctx) else {
                tracing::debug!(candidates = candidates.len(), "[drop] ambiguous drop ignored");
                return None;
            };
            *candidates.get(choice)?
        }
    };
    tracing::debug!(move_index = selected.move_index, "[drop] move selected");
    Some(selected.into())
}
