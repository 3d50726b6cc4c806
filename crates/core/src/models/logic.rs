use serde::{Deserialize, Serialize};

use super::{null_as_default, ordinal_enum, BoardDimensions, CheckerModel, WinPositionCombination};
use crate::rules::RuleReport;

/// Built-in move generation preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MoveGenerationRule {
    /// Moves are generated from the move-class flags alone.
    #[default]
    Custom,
    /// Preset rules for backgammon games.
    Backgammon,
    /// Preset rules for checkers games.
    Checkers,
    /// Preset rules for chess games.
    Chess,
}

ordinal_enum!(MoveGenerationRule {
    Custom => "Custom",
    Backgammon => "Backgammon",
    Checkers => "Checkers",
    Chess => "Chess",
});

/// Whether a game may end without a winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameWinType {
    /// Exactly one winner; running out of moves never draws.
    #[default]
    OnlyWinnerLoser,
    /// The game is drawn when no player can move.
    AllowDraw,
}

ordinal_enum!(GameWinType {
    OnlyWinnerLoser => "OnlyHasWinnerAndLoser",
    AllowDraw => "AllowDrawWithoutWinnerOrLoser",
});

/// Predicate class deciding the winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameWinRule {
    /// First player whose pieces match one of the custom winning positions.
    #[default]
    CustomWinningPositions,
    /// First player to move every piece from the board to home (backgammon, manji).
    AllPiecesToHome,
    /// Last player with pieces left on the board (checkers).
    LastPiecesStanding,
    /// Chess rules. Draws must be allowed.
    ChessRule,
}

ordinal_enum!(GameWinRule {
    CustomWinningPositions => "CustomWinningPositions",
    AllPiecesToHome => "FirstPlayerThatMovesAllPiecesFromBoardToHome",
    LastPiecesStanding => "LastPlayerPiecesStandingInBoard",
    ChessRule => "ChessWinRule",
});

/// Who opens the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartingPlayer {
    /// Chosen at random when the game starts.
    Random,
    /// A fixed player id.
    Player(i32),
}

/// Board setup and rule parameters driving the game logic.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogicConfig {
    /// Number of players taking part.
    pub player_count: i32,

    /// Whether turns start with a dice roll.
    pub is_dice_available: bool,
    /// Lowest dice face.
    pub dice_min_value: i32,
    /// Highest dice face.
    pub dice_max_value: i32,
    /// Each roll yields two values (backgammon style).
    pub dice_has_second_value: bool,

    /// Board size in field positions per axis.
    pub field_positions_count: BoardDimensions,
    /// Pieces placed on the board at the start of the game.
    #[serde(deserialize_with = "null_as_default")]
    pub checker_pieces: Vec<CheckerModel>,

    /// Zero picks a random player on start; a positive number is a player id.
    pub starting_player: i32,

    /// Generate moves from the pieces currently on the board rather than
    /// from every field.
    pub generate_moves_using_checker_pieces_on_board: bool,
    /// Pieces may enter the board from home.
    pub is_possible_move_home_to_any: bool,
    /// Pieces may leave the board for home.
    pub is_possible_move_any_to_home: bool,
    /// Captured pieces may re-enter the board.
    pub is_possible_move_graveyard_to_any: bool,
    /// Pieces may be captured.
    pub is_possible_move_any_to_graveyard: bool,
    /// Pieces may move between board fields.
    pub is_possible_move_within_board: bool,

    /// A destination may already hold the mover's pieces.
    pub move_destination_can_contain_current_player_pieces: bool,
    /// A destination may hold an opponent's pieces.
    pub move_destination_can_contain_other_player_pieces: bool,

    /// Built-in move generation preset.
    pub game_move_generation_type_rule: MoveGenerationRule,
    /// Whether draws are possible.
    pub game_win_type: GameWinType,
    /// How the winner is decided.
    pub game_win_rule: GameWinRule,

    /// When the current player runs out of moves and no winner is decided
    /// yet, check whether the next player can move before handing over the
    /// turn. Ends two-player games where the last move locked the opponent,
    /// and detects ties.
    pub game_win_check_whether_next_player_has_any_moves: bool,

    /// Winning arrangements for [`GameWinRule::CustomWinningPositions`].
    #[serde(deserialize_with = "null_as_default")]
    pub game_win_custom_winning_positions: Vec<WinPositionCombination>,
}

impl LogicConfig {
    /// Interprets `starting_player`. Negative values are reported by
    /// [`validate`](Self::validate) and read as random here.
    pub fn starting_player(&self) -> StartingPlayer {
        if self.starting_player > 0 {
            StartingPlayer::Player(self.starting_player)
        } else {
            StartingPlayer::Random
        }
    }

    /// Whether any move class is enabled.
    pub fn has_any_move_class(&self) -> bool {
        self.is_possible_move_home_to_any
            || self.is_possible_move_any_to_home
            || self.is_possible_move_graveyard_to_any
            || self.is_possible_move_any_to_graveyard
            || self.is_possible_move_within_board
    }

    /// Advisory coherence check of the rule flags against the selected preset.
    pub fn validate(&self) -> RuleReport {
        crate::rules::validate_logic(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_player_zero_is_random() {
        let mut logic = LogicConfig::default();
        assert_eq!(logic.starting_player(), StartingPlayer::Random);
        logic.starting_player = 2;
        assert_eq!(logic.starting_player(), StartingPlayer::Player(2));
        logic.starting_player = -3;
        assert_eq!(logic.starting_player(), StartingPlayer::Random);
    }

    #[test]
    fn move_classes_are_detected() {
        let mut logic = LogicConfig::default();
        assert!(!logic.has_any_move_class());
        logic.is_possible_move_graveyard_to_any = true;
        assert!(logic.has_any_move_class());
    }
}
