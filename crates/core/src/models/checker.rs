use serde::{Deserialize, Serialize};

use super::{ordinal_enum, Coordinate};

/// Kind of a piece, covering draughts-style checkers and chess men.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CheckerType {
    /// Plain draughts or backgammon piece.
    #[default]
    Normal,
    /// Crowned draughts piece.
    King,
    /// Chess pawn.
    ChessPawn,
    /// Chess knight.
    ChessKnight,
    /// Chess bishop.
    ChessBishop,
    /// Chess rook.
    ChessRook,
    /// Chess queen.
    ChessQueen,
    /// Chess king.
    ChessKing,
}

ordinal_enum!(CheckerType {
    Normal => "NORMAL",
    King => "KING",
    ChessPawn => "CHESS_PAWN",
    ChessKnight => "CHESS_KNIGHT",
    ChessBishop => "CHESS_BISHOP",
    ChessRook => "CHESS_ROOK",
    ChessQueen => "CHESS_QUEEN",
    ChessKing => "CHESS_KING",
});

/// Correlates one logical piece across board states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerId {
    /// Field the piece occupies when the game starts.
    pub start_position: Coordinate,
    /// Sequential index among pieces sharing the start position.
    pub index: i32,
}

/// A starting piece in the logical board setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerModel {
    /// Kind of piece, written under the `type` key.
    #[serde(rename = "type")]
    pub kind: CheckerType,
    /// Owning player.
    pub player_id: i32,
    /// Identity and start position.
    pub id: CheckerId,
}
