use serde::{Deserialize, Serialize};

use super::{null_as_default, CheckerType};

/// Visual board setup: the board prefab and the prefab for every piece kind.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Path of the board prefab.
    #[serde(deserialize_with = "null_as_default")]
    pub prefab_path: String,
    /// Piece prefabs, in authoring order.
    #[serde(deserialize_with = "null_as_default")]
    pub checker_piece_collection: Vec<CheckerPieceItem>,
}

impl BoardConfig {
    /// Returns true when the board cannot be instantiated: the prefab path is
    /// empty or there are no piece prefabs.
    ///
    /// Nothing calls this on assignment; callers check before using the board.
    pub fn is_invalid(&self) -> bool {
        self.prefab_path.is_empty() || self.checker_piece_collection.is_empty()
    }
}

/// Prefab used to instantiate one kind of piece for one player.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerPieceItem {
    /// Piece kind this prefab renders, written under the `type` key.
    #[serde(rename = "type")]
    pub kind: CheckerType,
    /// Path of the piece prefab.
    #[serde(deserialize_with = "null_as_default")]
    pub prefab_path: String,
    /// Player the prefab is used for.
    pub player_id: i32,
    /// Rotate the instance randomly around its vertical axis when spawned.
    pub use_random_rotation: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> CheckerPieceItem {
        CheckerPieceItem {
            kind: CheckerType::Normal,
            prefab_path: "Pieces/White".to_string(),
            player_id: 1,
            use_random_rotation: true,
        }
    }

    #[test]
    fn empty_prefab_path_is_invalid() {
        let board = BoardConfig {
            prefab_path: String::new(),
            checker_piece_collection: vec![item()],
        };
        assert!(board.is_invalid());
    }

    #[test]
    fn empty_collection_is_invalid() {
        let board = BoardConfig {
            prefab_path: "Board/Prefab1".to_string(),
            checker_piece_collection: Vec::new(),
        };
        assert!(board.is_invalid());
        assert!(BoardConfig::default().is_invalid());
    }

    #[test]
    fn prefab_and_pieces_are_valid() {
        let board = BoardConfig {
            prefab_path: "Board/Prefab1".to_string(),
            checker_piece_collection: vec![item()],
        };
        assert!(!board.is_invalid());
    }
}
