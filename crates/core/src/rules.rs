//! Advisory validation of manifests.
//!
//! The rule flags form a loose bag of booleans and enums. Nothing stops an
//! author from pairing the Chess preset with backgammon dice, so this module
//! checks the combination after the fact. Reports are split into blocking
//! errors and warnings the author may choose to ignore.

use thiserror::Error;

use crate::models::{
    Coordinate, GameWinRule, GameWinType, LibraryItemManifest, LogicConfig, MoveGenerationRule,
};

/// A single finding produced by validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleIssue {
    /// The board prefab path is empty or there are no piece prefabs.
    #[error("board needs a prefab path and at least one piece prefab")]
    InvalidBoard,
    /// An identity field of the manifest is empty.
    #[error("manifest {0} is empty")]
    MissingIdentity(&'static str),
    /// Fewer than one player.
    #[error("player count must be at least 1, got {0}")]
    PlayerCount(i32),
    /// Starting player is negative or names a player that does not exist.
    #[error("starting player {starting} is outside 0..={player_count}")]
    StartingPlayer {
        /// Configured starting player.
        starting: i32,
        /// Configured player count.
        player_count: i32,
    },
    /// Dice range is inverted.
    #[error("dice minimum {min} exceeds maximum {max}")]
    DiceRange {
        /// Configured minimum.
        min: i32,
        /// Configured maximum.
        max: i32,
    },
    /// Second dice value requested without dice.
    #[error("dice second value is set but dice are unavailable")]
    DiceSecondValueWithoutDice,
    /// Custom winning positions rule without any combination.
    #[error("custom winning positions rule has no combinations")]
    NoWinningCombinations,
    /// A winning combination lists no positions.
    #[error("winning combination {0} has no positions")]
    EmptyWinningCombination(usize),
    /// Combinations are configured but the win rule never reads them.
    #[error("winning combinations are ignored by win rule {0}")]
    UnusedWinningCombinations(GameWinRule),
    /// Chess rules need the draw outcome.
    #[error("chess win rule requires draws to be allowed")]
    ChessRuleWithoutDraw,
    /// Chess rules with a preset other than chess.
    #[error("chess win rule requires the Chess preset, got {0}")]
    ChessRuleOutsideChess(MoveGenerationRule),
    /// Custom move generation with nothing to generate.
    #[error("custom move generation has every move class disabled")]
    NoMoveClass,
    /// A flag contradicts the selected preset.
    #[error("{preset} preset requires {field} = {expected}")]
    PresetMismatch {
        /// Selected preset.
        preset: MoveGenerationRule,
        /// Offending field, by its manifest key.
        field: &'static str,
        /// Value the preset needs.
        expected: &'static str,
    },
    /// A piece belongs to a player that does not exist.
    #[error("{collection}[{index}] belongs to player {player_id}, outside 1..={player_count}")]
    PlayerIdOutOfRange {
        /// Manifest key of the collection.
        collection: &'static str,
        /// Position in the collection.
        index: usize,
        /// Offending player id.
        player_id: i32,
        /// Configured player count.
        player_count: i32,
    },
    /// A position lies outside `field_positions_count`.
    #[error(
        "{}[{}] at ({}, {}, {}) lies outside the board",
        .collection,
        .index,
        .position.x,
        .position.y,
        .position.z
    )]
    PositionOutOfBounds {
        /// Manifest key of the collection.
        collection: &'static str,
        /// Position in the collection.
        index: usize,
        /// Offending coordinate.
        position: Coordinate,
    },
}

/// Outcome of validating a manifest or its logic configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleReport {
    /// Blocking problems: the game should not start.
    pub errors: Vec<RuleIssue>,
    /// Suspicious but playable settings.
    pub warnings: Vec<RuleIssue>,
}

impl RuleReport {
    /// No blocking errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Neither errors nor warnings.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    fn merge(&mut self, other: RuleReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

struct Requirement {
    field: &'static str,
    expected: &'static str,
    holds: fn(&LogicConfig) -> bool,
}

const BACKGAMMON: &[Requirement] = &[
    Requirement {
        field: "player_count",
        expected: "2",
        holds: |logic| logic.player_count == 2,
    },
    Requirement {
        field: "is_dice_available",
        expected: "true",
        holds: |logic| logic.is_dice_available,
    },
    Requirement {
        field: "dice_has_second_value",
        expected: "true",
        holds: |logic| logic.dice_has_second_value,
    },
    Requirement {
        field: "game_win_rule",
        expected: "FirstPlayerThatMovesAllPiecesFromBoardToHome",
        holds: |logic| logic.game_win_rule == GameWinRule::AllPiecesToHome,
    },
    Requirement {
        field: "is_possible_move_within_board",
        expected: "true",
        holds: |logic| logic.is_possible_move_within_board,
    },
    Requirement {
        field: "is_possible_move_any_to_home",
        expected: "true",
        holds: |logic| logic.is_possible_move_any_to_home,
    },
    Requirement {
        field: "is_possible_move_graveyard_to_any",
        expected: "true",
        holds: |logic| logic.is_possible_move_graveyard_to_any,
    },
    Requirement {
        field: "is_possible_move_any_to_graveyard",
        expected: "true",
        holds: |logic| logic.is_possible_move_any_to_graveyard,
    },
    Requirement {
        field: "move_destination_can_contain_current_player_pieces",
        expected: "true",
        holds: |logic| logic.move_destination_can_contain_current_player_pieces,
    },
];

const CHECKERS: &[Requirement] = &[
    Requirement {
        field: "player_count",
        expected: "2",
        holds: |logic| logic.player_count == 2,
    },
    Requirement {
        field: "is_dice_available",
        expected: "false",
        holds: |logic| !logic.is_dice_available,
    },
    Requirement {
        field: "game_win_rule",
        expected: "LastPlayerPiecesStandingInBoard",
        holds: |logic| logic.game_win_rule == GameWinRule::LastPiecesStanding,
    },
    Requirement {
        field: "is_possible_move_within_board",
        expected: "true",
        holds: |logic| logic.is_possible_move_within_board,
    },
    Requirement {
        field: "is_possible_move_any_to_graveyard",
        expected: "true",
        holds: |logic| logic.is_possible_move_any_to_graveyard,
    },
    Requirement {
        field: "move_destination_can_contain_current_player_pieces",
        expected: "false",
        holds: |logic| !logic.move_destination_can_contain_current_player_pieces,
    },
    Requirement {
        field: "move_destination_can_contain_other_player_pieces",
        expected: "false",
        holds: |logic| !logic.move_destination_can_contain_other_player_pieces,
    },
];

const CHESS: &[Requirement] = &[
    Requirement {
        field: "player_count",
        expected: "2",
        holds: |logic| logic.player_count == 2,
    },
    Requirement {
        field: "is_dice_available",
        expected: "false",
        holds: |logic| !logic.is_dice_available,
    },
    Requirement {
        field: "game_win_rule",
        expected: "ChessWinRule",
        holds: |logic| logic.game_win_rule == GameWinRule::ChessRule,
    },
    Requirement {
        field: "is_possible_move_within_board",
        expected: "true",
        holds: |logic| logic.is_possible_move_within_board,
    },
    Requirement {
        field: "is_possible_move_any_to_graveyard",
        expected: "true",
        holds: |logic| logic.is_possible_move_any_to_graveyard,
    },
    Requirement {
        field: "move_destination_can_contain_current_player_pieces",
        expected: "false",
        holds: |logic| !logic.move_destination_can_contain_current_player_pieces,
    },
    Requirement {
        field: "move_destination_can_contain_other_player_pieces",
        expected: "true",
        holds: |logic| logic.move_destination_can_contain_other_player_pieces,
    },
];

fn preset_requirements(preset: MoveGenerationRule) -> &'static [Requirement] {
    match preset {
        MoveGenerationRule::Custom => &[],
        MoveGenerationRule::Backgammon => BACKGAMMON,
        MoveGenerationRule::Checkers => CHECKERS,
        MoveGenerationRule::Chess => CHESS,
    }
}

/// Validate the rule parameters of a logic configuration.
pub fn validate_logic(logic: &LogicConfig) -> RuleReport {
    let mut report = RuleReport::default();
    let preset = logic.game_move_generation_type_rule;

    if logic.player_count < 1 {
        report.errors.push(RuleIssue::PlayerCount(logic.player_count));
    }
    if logic.starting_player < 0
        || (logic.player_count >= 1 && logic.starting_player > logic.player_count)
    {
        report.errors.push(RuleIssue::StartingPlayer {
            starting: logic.starting_player,
            player_count: logic.player_count,
        });
    }

    if logic.is_dice_available && logic.dice_min_value > logic.dice_max_value {
        report.errors.push(RuleIssue::DiceRange {
            min: logic.dice_min_value,
            max: logic.dice_max_value,
        });
    }
    if !logic.is_dice_available && logic.dice_has_second_value {
        report.warnings.push(RuleIssue::DiceSecondValueWithoutDice);
    }

    let combinations = &logic.game_win_custom_winning_positions;
    if logic.game_win_rule == GameWinRule::CustomWinningPositions {
        if combinations.is_empty() {
            report.errors.push(RuleIssue::NoWinningCombinations);
        }
        for (index, combination) in combinations.iter().enumerate() {
            if combination.positions.is_empty() {
                report.errors.push(RuleIssue::EmptyWinningCombination(index));
            }
        }
    } else if !combinations.is_empty() {
        report
            .warnings
            .push(RuleIssue::UnusedWinningCombinations(logic.game_win_rule));
    }

    if logic.game_win_rule == GameWinRule::ChessRule {
        if preset != MoveGenerationRule::Chess {
            report.errors.push(RuleIssue::ChessRuleOutsideChess(preset));
        }
        if logic.game_win_type != GameWinType::AllowDraw {
            report.errors.push(RuleIssue::ChessRuleWithoutDraw);
        }
    }
    if preset == MoveGenerationRule::Custom && !logic.has_any_move_class() {
        report.errors.push(RuleIssue::NoMoveClass);
    }

    report.errors.extend(
        preset_requirements(preset)
            .iter()
            .filter(|requirement| !(requirement.holds)(logic))
            .map(|requirement| RuleIssue::PresetMismatch {
                preset,
                field: requirement.field,
                expected: requirement.expected,
            }),
    );

    if logic.player_count >= 1 {
        for (index, piece) in logic.checker_pieces.iter().enumerate() {
            if !(1..=logic.player_count).contains(&piece.player_id) {
                report.warnings.push(RuleIssue::PlayerIdOutOfRange {
                    collection: "checker_pieces",
                    index,
                    player_id: piece.player_id,
                    player_count: logic.player_count,
                });
            }
        }
    }

    let board = logic.field_positions_count;
    if board.is_bounded() {
        for (index, piece) in logic.checker_pieces.iter().enumerate() {
            if !board.contains(piece.id.start_position) {
                report.warnings.push(RuleIssue::PositionOutOfBounds {
                    collection: "checker_pieces",
                    index,
                    position: piece.id.start_position,
                });
            }
        }
        for (index, combination) in combinations.iter().enumerate() {
            if let Some(position) = combination
                .positions
                .iter()
                .copied()
                .find(|position| !board.contains(*position))
            {
                report.warnings.push(RuleIssue::PositionOutOfBounds {
                    collection: "game_win_custom_winning_positions",
                    index,
                    position,
                });
            }
        }
    }

    report
}

/// Validate a whole manifest: identity, board and logic.
pub fn validate_manifest(manifest: &LibraryItemManifest) -> RuleReport {
    let mut report = RuleReport::default();

    if manifest.board_config.is_invalid() {
        report.errors.push(RuleIssue::InvalidBoard);
    }
    if manifest.id.trim().is_empty() {
        report.warnings.push(RuleIssue::MissingIdentity("id"));
    }
    if manifest.title.trim().is_empty() {
        report.warnings.push(RuleIssue::MissingIdentity("title"));
    }

    let player_count = manifest.logic_config.player_count;
    if player_count >= 1 {
        for (index, item) in manifest
            .board_config
            .checker_piece_collection
            .iter()
            .enumerate()
        {
            if !(1..=player_count).contains(&item.player_id) {
                report.warnings.push(RuleIssue::PlayerIdOutOfRange {
                    collection: "checker_piece_collection",
                    index,
                    player_id: item.player_id,
                    player_count,
                });
            }
        }
    }

    report.merge(validate_logic(&manifest.logic_config));
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        BoardConfig, BoardDimensions, CheckerId, CheckerModel, CheckerPieceItem, CheckerType,
        WinPositionCombination,
    };

    fn chess() -> LogicConfig {
        LogicConfig {
            player_count: 2,
            field_positions_count: BoardDimensions::new(8, 8, 1),
            starting_player: 1,
            is_possible_move_within_board: true,
            is_possible_move_any_to_graveyard: true,
            move_destination_can_contain_other_player_pieces: true,
            game_move_generation_type_rule: MoveGenerationRule::Chess,
            game_win_type: GameWinType::AllowDraw,
            game_win_rule: GameWinRule::ChessRule,
            game_win_check_whether_next_player_has_any_moves: true,
            ..Default::default()
        }
    }

    fn checkers() -> LogicConfig {
        LogicConfig {
            player_count: 2,
            field_positions_count: BoardDimensions::new(8, 8, 1),
            is_possible_move_within_board: true,
            is_possible_move_any_to_graveyard: true,
            game_move_generation_type_rule: MoveGenerationRule::Checkers,
            game_win_rule: GameWinRule::LastPiecesStanding,
            game_win_check_whether_next_player_has_any_moves: true,
            ..Default::default()
        }
    }

    fn backgammon() -> LogicConfig {
        LogicConfig {
            player_count: 2,
            is_dice_available: true,
            dice_min_value: 1,
            dice_max_value: 6,
            dice_has_second_value: true,
            field_positions_count: BoardDimensions::new(24, 1, 15),
            is_possible_move_any_to_home: true,
            is_possible_move_graveyard_to_any: true,
            is_possible_move_any_to_graveyard: true,
            is_possible_move_within_board: true,
            move_destination_can_contain_current_player_pieces: true,
            move_destination_can_contain_other_player_pieces: true,
            game_move_generation_type_rule: MoveGenerationRule::Backgammon,
            game_win_rule: GameWinRule::AllPiecesToHome,
            ..Default::default()
        }
    }

    fn tic_tac_toe() -> LogicConfig {
        let row = |y| {
            WinPositionCombination::from(vec![
                Coordinate::new(0, y, 0),
                Coordinate::new(1, y, 0),
                Coordinate::new(2, y, 0),
            ])
        };
        LogicConfig {
            player_count: 2,
            field_positions_count: BoardDimensions::new(3, 3, 1),
            is_possible_move_home_to_any: true,
            game_win_type: GameWinType::AllowDraw,
            game_win_custom_winning_positions: vec![row(0), row(1), row(2)],
            ..Default::default()
        }
    }

    #[test]
    fn faithful_presets_have_no_errors() {
        for logic in [chess(), checkers(), backgammon(), tic_tac_toe()] {
            let report = logic.validate();
            assert!(report.is_valid(), "{:?}: {:?}", logic.game_move_generation_type_rule, report);
        }
    }

    #[test]
    fn chess_preset_rejects_dice_and_own_captures() {
        let mut logic = chess();
        logic.is_dice_available = true;
        logic.move_destination_can_contain_current_player_pieces = true;

        let report = logic.validate();
        assert_eq!(
            report.errors,
            vec![
                RuleIssue::PresetMismatch {
                    preset: MoveGenerationRule::Chess,
                    field: "is_dice_available",
                    expected: "false",
                },
                RuleIssue::PresetMismatch {
                    preset: MoveGenerationRule::Chess,
                    field: "move_destination_can_contain_current_player_pieces",
                    expected: "false",
                },
            ]
        );
    }

    #[test]
    fn checkers_preset_requires_last_standing_rule() {
        let mut logic = checkers();
        logic.game_win_rule = GameWinRule::AllPiecesToHome;

        let report = logic.validate();
        assert_eq!(report.errors.len(), 1);
        assert_eq!(
            report.errors[0].to_string(),
            "Checkers preset requires game_win_rule = LastPlayerPiecesStandingInBoard"
        );
    }

    #[test]
    fn custom_preset_needs_move_classes_and_combinations() {
        let logic = LogicConfig {
            player_count: 2,
            ..Default::default()
        };
        let report = logic.validate();
        assert!(report.errors.contains(&RuleIssue::NoMoveClass));
        assert!(report.errors.contains(&RuleIssue::NoWinningCombinations));
    }

    #[test]
    fn chess_rule_on_custom_preset_is_rejected() {
        let mut logic = tic_tac_toe();
        logic.game_win_rule = GameWinRule::ChessRule;
        logic.game_win_type = GameWinType::OnlyWinnerLoser;

        let report = logic.validate();
        assert!(report
            .errors
            .contains(&RuleIssue::ChessRuleOutsideChess(MoveGenerationRule::Custom)));
        assert!(report.errors.contains(&RuleIssue::ChessRuleWithoutDraw));
        assert!(report
            .warnings
            .contains(&RuleIssue::UnusedWinningCombinations(GameWinRule::ChessRule)));
    }

    #[test]
    fn chess_rule_checks_apply_to_every_preset() {
        let mut logic = backgammon();
        logic.game_win_rule = GameWinRule::ChessRule;

        let report = logic.validate();
        assert_eq!(
            report.errors,
            vec![
                RuleIssue::ChessRuleOutsideChess(MoveGenerationRule::Backgammon),
                RuleIssue::ChessRuleWithoutDraw,
                RuleIssue::PresetMismatch {
                    preset: MoveGenerationRule::Backgammon,
                    field: "game_win_rule",
                    expected: "FirstPlayerThatMovesAllPiecesFromBoardToHome",
                },
            ]
        );

        let mut logic = chess();
        logic.game_win_type = GameWinType::OnlyWinnerLoser;
        assert_eq!(logic.validate().errors, vec![RuleIssue::ChessRuleWithoutDraw]);
    }

    #[test]
    fn counts_and_ranges_are_checked() {
        let mut logic = backgammon();
        logic.dice_min_value = 7;
        logic.starting_player = 3;
        let report = logic.validate();
        assert!(report
            .errors
            .contains(&RuleIssue::DiceRange { min: 7, max: 6 }));
        assert!(report.errors.contains(&RuleIssue::StartingPlayer {
            starting: 3,
            player_count: 2
        }));

        let logic = LogicConfig {
            player_count: 0,
            starting_player: -1,
            is_possible_move_within_board: true,
            game_win_rule: GameWinRule::LastPiecesStanding,
            dice_has_second_value: true,
            ..Default::default()
        };
        let report = logic.validate();
        assert!(report.errors.contains(&RuleIssue::PlayerCount(0)));
        assert!(report.errors.contains(&RuleIssue::StartingPlayer {
            starting: -1,
            player_count: 0
        }));
        assert_eq!(report.warnings, vec![RuleIssue::DiceSecondValueWithoutDice]);
    }

    #[test]
    fn out_of_range_pieces_are_warnings() {
        let mut logic = tic_tac_toe();
        logic.checker_pieces = vec![CheckerModel {
            kind: CheckerType::Normal,
            player_id: 3,
            id: CheckerId {
                start_position: Coordinate::new(5, 0, 0),
                index: 0,
            },
        }];
        logic.game_win_custom_winning_positions[1]
            .positions
            .push(Coordinate::new(0, 4, 0));

        let report = logic.validate();
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 3);
        assert_eq!(
            report.warnings[2].to_string(),
            "game_win_custom_winning_positions[1] at (0, 4, 0) lies outside the board"
        );
    }

    #[test]
    fn manifest_report_includes_board_and_identity() {
        let manifest = LibraryItemManifest {
            id: "m1".to_string(),
            title: String::new(),
            board_config: BoardConfig {
                prefab_path: "Board/Prefab1".to_string(),
                checker_piece_collection: vec![CheckerPieceItem {
                    player_id: 5,
                    ..Default::default()
                }],
            },
            logic_config: checkers(),
            ..Default::default()
        };
        let report = manifest.validate();
        assert!(report.is_valid());
        assert_eq!(
            report.warnings,
            vec![
                RuleIssue::MissingIdentity("title"),
                RuleIssue::PlayerIdOutOfRange {
                    collection: "checker_piece_collection",
                    index: 0,
                    player_id: 5,
                    player_count: 2,
                },
            ]
        );

        let report = LibraryItemManifest::default().validate();
        assert!(report.errors.contains(&RuleIssue::InvalidBoard));
    }
}
