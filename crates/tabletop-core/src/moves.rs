//! Item moves handed to the engine for visualization.
//!
//! The engine never decides which moves are legal: it receives them, with the
//! game state before and after, and only describes how they look.

use serde::{Deserialize, Serialize};

use crate::location::{Location, MaterialItem, MaterialType};

/// Kind of a move, used to pick an animation strategy and a sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    Create,
    Move,
    MoveAsGroup,
    Delete,
    DeleteAsGroup,
    Roll,
    Shuffle,
}

/// A move on the items of one material type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemMove {
    /// A new item appears (appended at the end of its material list).
    Create {
        item_type: MaterialType,
        item: MaterialItem,
    },
    /// An item (or `quantity` pieces of its stack) goes to `location`.
    Move {
        item_type: MaterialType,
        item_index: usize,
        location: Location,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        quantity: Option<u32>,
    },
    /// Several items go to the same location at once.
    MoveAsGroup {
        item_type: MaterialType,
        indexes: Vec<usize>,
        location: Location,
    },
    /// An item (or `quantity` pieces of its stack) is removed.
    Delete {
        item_type: MaterialType,
        item_index: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        quantity: Option<u32>,
    },
    /// Several items are removed at once.
    DeleteAsGroup {
        item_type: MaterialType,
        indexes: Vec<usize>,
    },
    /// A die is rolled; `location.rotation` holds the rolled face.
    Roll {
        item_type: MaterialType,
        item_index: usize,
        location: Location,
    },
    /// The item at `indexes[i]` takes the place of the item at `new_indexes[i]`.
    Shuffle {
        item_type: MaterialType,
        indexes: Vec<usize>,
        new_indexes: Vec<usize>,
    },
}

impl ItemMove {
    pub fn kind(&self) -> MoveKind {
        match self {
            Self::Create { .. } => MoveKind::Create,
            Self::Move { .. } => MoveKind::Move,
            Self::MoveAsGroup { .. } => MoveKind::MoveAsGroup,
            Self::Delete { .. } => MoveKind::Delete,
            Self::DeleteAsGroup { .. } => MoveKind::DeleteAsGroup,
            Self::Roll { .. } => MoveKind::Roll,
            Self::Shuffle { .. } => MoveKind::Shuffle,
        }
    }

    pub fn item_type(&self) -> MaterialType {
        match self {
            Self::Create { item_type, .. }
            | Self::Move { item_type, .. }
            | Self::MoveAsGroup { item_type, .. }
            | Self::Delete { item_type, .. }
            | Self::DeleteAsGroup { item_type, .. }
            | Self::Roll { item_type, .. }
            | Self::Shuffle { item_type, .. } => *item_type,
        }
    }

    /// Destination location, for moves that have one.
    pub fn destination(&self) -> Option<&Location> {
        match self {
            Self::Move { location, .. }
            | Self::MoveAsGroup { location, .. }
            | Self::Roll { location, .. } => Some(location),
            Self::Create { item, .. } => Some(&item.location),
            Self::Delete { .. } | Self::DeleteAsGroup { .. } | Self::Shuffle { .. } => None,
        }
    }

    /// Returns true when the move acts on the existing item `kind#index`.
    pub fn affects(&self, kind: MaterialType, index: usize) -> bool {
        if self.item_type() != kind {
            return false;
        }
        match self {
            Self::Create { .. } => false,
            Self::Move { item_index, .. }
            | Self::Delete { item_index, .. }
            | Self::Roll { item_index, .. } => *item_index == index,
            Self::MoveAsGroup { indexes, .. }
            | Self::DeleteAsGroup { indexes, .. }
            | Self::Shuffle { indexes, .. } => indexes.contains(&index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affects() {
        let mv = ItemMove::MoveAsGroup {
            item_type: 1,
            indexes: vec![2, 4],
            location: Location::new(3),
        };
        assert!(mv.affects(1, 4));
        assert!(!mv.affects(1, 3));
        assert!(!mv.affects(2, 4));
        assert_eq!(mv.kind(), MoveKind::MoveAsGroup);
        assert_eq!(mv.destination(), Some(&Location::new(3)));
    }

    #[test]
    fn test_move_json_shape() {
        let mv: ItemMove = serde_json::from_str(
            r#"{"kind": "move", "item_type": 1, "item_index": 0, "location": {"type": 2}}"#,
        )
        .unwrap();
        assert_eq!(
            mv,
            ItemMove::Move {
                item_type: 1,
                item_index: 0,
                location: Location::new(2),
                quantity: None,
            }
        );
    }
}
