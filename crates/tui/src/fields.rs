//! Editable scalar fields of a manifest, as listed by the inspector.

use anyhow::{bail, Result};
use bgvr_core::models::{
    GameWinRule, GameWinType, LibraryItemManifest, MoveGenerationRule, OrdinalEnum,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Toggle,
    Choice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    Title,
    CoverImage,
    BoardPrefab,
    PlayerCount,
    DiceAvailable,
    DiceMin,
    DiceMax,
    DiceSecondValue,
    BoardX,
    BoardY,
    BoardZ,
    StartingPlayer,
    GenerateFromBoard,
    HomeToAny,
    AnyToHome,
    GraveyardToAny,
    AnyToGraveyard,
    WithinBoard,
    DestinationOwn,
    DestinationOther,
    MoveRule,
    WinType,
    WinRule,
    CheckNextPlayer,
}

enum FieldRef<'a> {
    Text(&'a mut String),
    Integer(&'a mut i32),
    Toggle(&'a mut bool),
    MoveRule(&'a mut MoveGenerationRule),
    WinType(&'a mut GameWinType),
    WinRule(&'a mut GameWinRule),
}

impl Field {
    pub const ALL: [Field; 25] = [
        Field::Id,
        Field::Title,
        Field::CoverImage,
        Field::BoardPrefab,
        Field::PlayerCount,
        Field::DiceAvailable,
        Field::DiceMin,
        Field::DiceMax,
        Field::DiceSecondValue,
        Field::BoardX,
        Field::BoardY,
        Field::BoardZ,
        Field::StartingPlayer,
        Field::GenerateFromBoard,
        Field::HomeToAny,
        Field::AnyToHome,
        Field::GraveyardToAny,
        Field::AnyToGraveyard,
        Field::WithinBoard,
        Field::DestinationOwn,
        Field::DestinationOther,
        Field::MoveRule,
        Field::WinType,
        Field::WinRule,
        Field::CheckNextPlayer,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Id => "Id",
            Field::Title => "Title",
            Field::CoverImage => "Cover image",
            Field::BoardPrefab => "Board prefab",
            Field::PlayerCount => "Player count",
            Field::DiceAvailable => "Dice available",
            Field::DiceMin => "Dice min",
            Field::DiceMax => "Dice max",
            Field::DiceSecondValue => "Dice second value",
            Field::BoardX => "Positions x",
            Field::BoardY => "Positions y",
            Field::BoardZ => "Positions z",
            Field::StartingPlayer => "Starting player",
            Field::GenerateFromBoard => "Moves from board pieces",
            Field::HomeToAny => "Move home → any",
            Field::AnyToHome => "Move any → home",
            Field::GraveyardToAny => "Move graveyard → any",
            Field::AnyToGraveyard => "Move any → graveyard",
            Field::WithinBoard => "Move within board",
            Field::DestinationOwn => "Land on own pieces",
            Field::DestinationOther => "Land on other pieces",
            Field::MoveRule => "Move generation",
            Field::WinType => "Win type",
            Field::WinRule => "Win rule",
            Field::CheckNextPlayer => "Check next player moves",
        }
    }

    /// Heading the field is grouped under.
    pub fn section(self) -> &'static str {
        match self {
            Field::Id | Field::Title | Field::CoverImage => "Identity",
            Field::BoardPrefab => "Board",
            Field::PlayerCount
            | Field::DiceAvailable
            | Field::DiceMin
            | Field::DiceMax
            | Field::DiceSecondValue
            | Field::BoardX
            | Field::BoardY
            | Field::BoardZ => "Setup",
            _ => "Rules",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Field::Id | Field::Title | Field::CoverImage | Field::BoardPrefab => FieldKind::Text,
            Field::PlayerCount
            | Field::DiceMin
            | Field::DiceMax
            | Field::BoardX
            | Field::BoardY
            | Field::BoardZ
            | Field::StartingPlayer => FieldKind::Integer,
            Field::MoveRule | Field::WinType | Field::WinRule => FieldKind::Choice,
            _ => FieldKind::Toggle,
        }
    }

    /// Whether the field is edited through a text prompt.
    pub fn is_prompted(self) -> bool {
        matches!(self.kind(), FieldKind::Text | FieldKind::Integer)
    }

    pub fn display(self, manifest: &LibraryItemManifest) -> String {
        let logic = &manifest.logic_config;
        let flag = |value: bool| (if value { "yes" } else { "no" }).to_string();
        match self {
            Field::Id => manifest.id.clone(),
            Field::Title => manifest.title.clone(),
            Field::CoverImage => manifest.cover_image_file_name.clone(),
            Field::BoardPrefab => manifest.board_config.prefab_path.clone(),
            Field::PlayerCount => logic.player_count.to_string(),
            Field::DiceAvailable => flag(logic.is_dice_available),
            Field::DiceMin => logic.dice_min_value.to_string(),
            Field::DiceMax => logic.dice_max_value.to_string(),
            Field::DiceSecondValue => flag(logic.dice_has_second_value),
            Field::BoardX => logic.field_positions_count.x.to_string(),
            Field::BoardY => logic.field_positions_count.y.to_string(),
            Field::BoardZ => logic.field_positions_count.z.to_string(),
            Field::StartingPlayer => match logic.starting_player {
                0 => "0 (random)".to_string(),
                id => id.to_string(),
            },
            Field::GenerateFromBoard => flag(logic.generate_moves_using_checker_pieces_on_board),
            Field::HomeToAny => flag(logic.is_possible_move_home_to_any),
            Field::AnyToHome => flag(logic.is_possible_move_any_to_home),
            Field::GraveyardToAny => flag(logic.is_possible_move_graveyard_to_any),
            Field::AnyToGraveyard => flag(logic.is_possible_move_any_to_graveyard),
            Field::WithinBoard => flag(logic.is_possible_move_within_board),
            Field::DestinationOwn => {
                flag(logic.move_destination_can_contain_current_player_pieces)
            }
            Field::DestinationOther => flag(logic.move_destination_can_contain_other_player_pieces),
            Field::MoveRule => logic.game_move_generation_type_rule.to_string(),
            Field::WinType => logic.game_win_type.to_string(),
            Field::WinRule => logic.game_win_rule.to_string(),
            Field::CheckNextPlayer => {
                flag(logic.game_win_check_whether_next_player_has_any_moves)
            }
        }
    }

    /// Raw value offered when a prompt opens.
    pub fn initial_input(self, manifest: &LibraryItemManifest) -> String {
        match self {
            Field::StartingPlayer => manifest.logic_config.starting_player.to_string(),
            _ => self.display(manifest),
        }
    }

    fn resolve(self, manifest: &mut LibraryItemManifest) -> FieldRef<'_> {
        let logic = &mut manifest.logic_config;
        match self {
            Field::Id => FieldRef::Text(&mut manifest.id),
            Field::Title => FieldRef::Text(&mut manifest.title),
            Field::CoverImage => FieldRef::Text(&mut manifest.cover_image_file_name),
            Field::BoardPrefab => FieldRef::Text(&mut manifest.board_config.prefab_path),
            Field::PlayerCount => FieldRef::Integer(&mut logic.player_count),
            Field::DiceAvailable => FieldRef::Toggle(&mut logic.is_dice_available),
            Field::DiceMin => FieldRef::Integer(&mut logic.dice_min_value),
            Field::DiceMax => FieldRef::Integer(&mut logic.dice_max_value),
            Field::DiceSecondValue => FieldRef::Toggle(&mut logic.dice_has_second_value),
            Field::BoardX => FieldRef::Integer(&mut logic.field_positions_count.x),
            Field::BoardY => FieldRef::Integer(&mut logic.field_positions_count.y),
            Field::BoardZ => FieldRef::Integer(&mut logic.field_positions_count.z),
            Field::StartingPlayer => FieldRef::Integer(&mut logic.starting_player),
            Field::GenerateFromBoard => {
                FieldRef::Toggle(&mut logic.generate_moves_using_checker_pieces_on_board)
            }
            Field::HomeToAny => FieldRef::Toggle(&mut logic.is_possible_move_home_to_any),
            Field::AnyToHome => FieldRef::Toggle(&mut logic.is_possible_move_any_to_home),
            Field::GraveyardToAny => FieldRef::Toggle(&mut logic.is_possible_move_graveyard_to_any),
            Field::AnyToGraveyard => FieldRef::Toggle(&mut logic.is_possible_move_any_to_graveyard),
            Field::WithinBoard => FieldRef::Toggle(&mut logic.is_possible_move_within_board),
            Field::DestinationOwn => {
                FieldRef::Toggle(&mut logic.move_destination_can_contain_current_player_pieces)
            }
            Field::DestinationOther => {
                FieldRef::Toggle(&mut logic.move_destination_can_contain_other_player_pieces)
            }
            Field::MoveRule => FieldRef::MoveRule(&mut logic.game_move_generation_type_rule),
            Field::WinType => FieldRef::WinType(&mut logic.game_win_type),
            Field::WinRule => FieldRef::WinRule(&mut logic.game_win_rule),
            Field::CheckNextPlayer => {
                FieldRef::Toggle(&mut logic.game_win_check_whether_next_player_has_any_moves)
            }
        }
    }

    /// Apply prompt input to a text or integer field.
    pub fn set_text(self, manifest: &mut LibraryItemManifest, input: &str) -> Result<()> {
        match self.resolve(manifest) {
            FieldRef::Text(value) => {
                *value = input.trim().to_string();
                Ok(())
            }
            FieldRef::Integer(value) => match input.trim().parse::<i32>() {
                Ok(parsed) => {
                    *value = parsed;
                    Ok(())
                }
                Err(_) => bail!("{} expects a whole number, got {:?}", self.label(), input.trim()),
            },
            _ => bail!("{} is not edited as text", self.label()),
        }
    }

    /// Flip a toggle or move a choice to its next value. Returns false for
    /// prompted fields.
    pub fn advance(self, manifest: &mut LibraryItemManifest) -> bool {
        match self.resolve(manifest) {
            FieldRef::Toggle(value) => *value = !*value,
            FieldRef::MoveRule(value) => *value = value.next(),
            FieldRef::WinType(value) => *value = value.next(),
            FieldRef::WinRule(value) => *value = value.next(),
            FieldRef::Text(_) | FieldRef::Integer(_) => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_parse_and_reject_garbage() {
        let mut manifest = LibraryItemManifest::default();
        Field::PlayerCount.set_text(&mut manifest, " 4 ").unwrap();
        assert_eq!(manifest.logic_config.player_count, 4);

        let err = Field::DiceMax.set_text(&mut manifest, "six").unwrap_err();
        assert!(err.to_string().contains("Dice max expects a whole number"));
        assert_eq!(manifest.logic_config.dice_max_value, 0);
    }

    #[test]
    fn text_fields_are_trimmed() {
        let mut manifest = LibraryItemManifest::default();
        Field::BoardPrefab
            .set_text(&mut manifest, "  Boards/Chess  ")
            .unwrap();
        assert_eq!(manifest.board_config.prefab_path, "Boards/Chess");
        assert!(Field::WinRule.set_text(&mut manifest, "x").is_err());
    }

    #[test]
    fn advance_toggles_and_cycles() {
        let mut manifest = LibraryItemManifest::default();
        assert!(Field::WithinBoard.advance(&mut manifest));
        assert!(manifest.logic_config.is_possible_move_within_board);
        assert_eq!(Field::WithinBoard.display(&manifest), "yes");

        assert!(Field::WinRule.advance(&mut manifest));
        assert_eq!(
            manifest.logic_config.game_win_rule,
            GameWinRule::AllPiecesToHome
        );

        assert!(!Field::Title.advance(&mut manifest));
    }

    #[test]
    fn every_field_has_a_section() {
        for field in Field::ALL {
            assert!(!field.section().is_empty());
            assert_eq!(
                field.is_prompted(),
                !matches!(field.kind(), FieldKind::Toggle | FieldKind::Choice)
            );
        }
        assert_eq!(
            Field::StartingPlayer.display(&LibraryItemManifest::default()),
            "0 (random)"
        );
    }
}
