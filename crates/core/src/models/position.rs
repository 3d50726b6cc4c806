use serde::{Deserialize, Serialize};

use super::null_as_default;

/// A position on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Coordinate {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
    /// Stack level.
    pub z: i32,
}

impl Coordinate {
    /// Build a coordinate from its three axes.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// Number of field positions along each board axis.
///
/// Shares its wire shape with [`Coordinate`] but is a count, not a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardDimensions {
    /// Number of columns.
    pub x: i32,
    /// Number of rows.
    pub y: i32,
    /// Maximum stack height.
    pub z: i32,
}

impl BoardDimensions {
    /// Build dimensions from per-axis counts.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// True when every axis has at least one field position.
    pub fn is_bounded(&self) -> bool {
        self.x > 0 && self.y > 0 && self.z > 0
    }

    /// Whether `position` falls inside `0..count` on every axis.
    pub fn contains(&self, position: Coordinate) -> bool {
        (0..self.x).contains(&position.x)
            && (0..self.y).contains(&position.y)
            && (0..self.z).contains(&position.z)
    }
}

/// One arrangement of positions that wins the game under
/// [`GameWinRule::CustomWinningPositions`](super::GameWinRule::CustomWinningPositions).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WinPositionCombination {
    /// Fields a single player must occupy at once.
    #[serde(deserialize_with = "null_as_default")]
    pub positions: Vec<Coordinate>,
}

impl From<Vec<Coordinate>> for WinPositionCombination {
    fn from(positions: Vec<Coordinate>) -> Self {
        Self { positions }
    }
}
