//! Row editing for the list-valued parts of a manifest: piece prefabs,
//! starting pieces and custom winning combinations.

use anyhow::{bail, Result};
use bgvr_core::models::{
    CheckerModel, CheckerPieceItem, CheckerType, Coordinate, LibraryItemManifest, OrdinalEnum,
    WinPositionCombination,
};

use crate::fields::FieldKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    PiecePrefabs,
    StartingPieces,
    WinningCombinations,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Kind,
    PrefabPath,
    PlayerId,
    RandomRotation,
    StartX,
    StartY,
    StartZ,
    Index,
    Positions,
}

/// One editable value: a column of a row in a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub collection: Collection,
    pub row: usize,
    pub column: Column,
}

enum CellValue<'a> {
    Text(&'a str),
    Integer(i32),
    Toggle(bool),
    Kind(CheckerType),
    Positions(&'a [Coordinate]),
}

enum CellRef<'a> {
    Text(&'a mut String),
    Integer(&'a mut i32),
    Toggle(&'a mut bool),
    Kind(&'a mut CheckerType),
    Positions(&'a mut Vec<Coordinate>),
}

impl Collection {
    pub fn label(self) -> &'static str {
        match self {
            Collection::PiecePrefabs => "Piece prefabs",
            Collection::StartingPieces => "Starting pieces",
            Collection::WinningCombinations => "Winning combinations",
        }
    }

    pub fn columns(self) -> &'static [Column] {
        match self {
            Collection::PiecePrefabs => &[
                Column::Kind,
                Column::PrefabPath,
                Column::PlayerId,
                Column::RandomRotation,
            ],
            Collection::StartingPieces => &[
                Column::Kind,
                Column::PlayerId,
                Column::StartX,
                Column::StartY,
                Column::StartZ,
                Column::Index,
            ],
            Collection::WinningCombinations => &[Column::Positions],
        }
    }

    pub fn len(self, manifest: &LibraryItemManifest) -> usize {
        match self {
            Collection::PiecePrefabs => manifest.board_config.checker_piece_collection.len(),
            Collection::StartingPieces => manifest.logic_config.checker_pieces.len(),
            Collection::WinningCombinations => {
                manifest.logic_config.game_win_custom_winning_positions.len()
            }
        }
    }

    /// Append a default row and return its index.
    pub fn add_row(self, manifest: &mut LibraryItemManifest) -> usize {
        match self {
            Collection::PiecePrefabs => manifest
                .board_config
                .checker_piece_collection
                .push(CheckerPieceItem::default()),
            Collection::StartingPieces => manifest
                .logic_config
                .checker_pieces
                .push(CheckerModel::default()),
            Collection::WinningCombinations => manifest
                .logic_config
                .game_win_custom_winning_positions
                .push(WinPositionCombination::default()),
        }
        self.len(manifest) - 1
    }

    /// Remove `row`, keeping the order of the others. False when out of range.
    pub fn remove_row(self, manifest: &mut LibraryItemManifest, row: usize) -> bool {
        if row >= self.len(manifest) {
            return false;
        }
        match self {
            Collection::PiecePrefabs => {
                manifest.board_config.checker_piece_collection.remove(row);
            }
            Collection::StartingPieces => {
                manifest.logic_config.checker_pieces.remove(row);
            }
            Collection::WinningCombinations => {
                manifest
                    .logic_config
                    .game_win_custom_winning_positions
                    .remove(row);
            }
        }
        true
    }

    /// Heading line for `row` in the editor list.
    pub fn row_title(self, manifest: &LibraryItemManifest, row: usize) -> String {
        let title = match self {
            Collection::PiecePrefabs => manifest
                .board_config
                .checker_piece_collection
                .get(row)
                .map(|item| {
                    let path = match item.prefab_path.as_str() {
                        "" => "(no prefab)",
                        path => path,
                    };
                    format!("#{row} {} · player {} · {path}", item.kind, item.player_id)
                }),
            Collection::StartingPieces => {
                manifest.logic_config.checker_pieces.get(row).map(|piece| {
                    let at = piece.id.start_position;
                    format!(
                        "#{row} {} · player {} at ({}, {}, {})",
                        piece.kind, piece.player_id, at.x, at.y, at.z
                    )
                })
            }
            Collection::WinningCombinations => manifest
                .logic_config
                .game_win_custom_winning_positions
                .get(row)
                .map(|combination| format!("#{row} {} positions", combination.positions.len())),
        };
        title.unwrap_or_default()
    }

    /// Every cell of every row, row by row.
    pub fn cells(self, manifest: &LibraryItemManifest) -> Vec<Cell> {
        (0..self.len(manifest))
            .flat_map(|row| {
                self.columns().iter().map(move |&column| Cell {
                    collection: self,
                    row,
                    column,
                })
            })
            .collect()
    }

    pub fn next(self) -> Option<Collection> {
        match self {
            Collection::PiecePrefabs => Some(Collection::StartingPieces),
            Collection::StartingPieces => Some(Collection::WinningCombinations),
            Collection::WinningCombinations => None,
        }
    }
}

impl Column {
    pub fn label(self) -> &'static str {
        match self {
            Column::Kind => "Type",
            Column::PrefabPath => "Prefab path",
            Column::PlayerId => "Player id",
            Column::RandomRotation => "Random rotation",
            Column::StartX => "Start x",
            Column::StartY => "Start y",
            Column::StartZ => "Start z",
            Column::Index => "Index",
            Column::Positions => "Positions (x,y,z; ...)",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Column::Kind => FieldKind::Choice,
            Column::RandomRotation => FieldKind::Toggle,
            Column::PrefabPath | Column::Positions => FieldKind::Text,
            Column::PlayerId | Column::StartX | Column::StartY | Column::StartZ | Column::Index => {
                FieldKind::Integer
            }
        }
    }
}

impl Cell {
    pub fn label(self) -> String {
        format!("{} #{} {}", self.collection.label(), self.row, self.column.label())
    }

    pub fn is_prompted(self) -> bool {
        matches!(self.column.kind(), FieldKind::Text | FieldKind::Integer)
    }

    pub fn display(self, manifest: &LibraryItemManifest) -> String {
        match self.value(manifest) {
            Some(CellValue::Text(value)) => value.to_string(),
            Some(CellValue::Integer(value)) => value.to_string(),
            Some(CellValue::Toggle(value)) => (if value { "yes" } else { "no" }).to_string(),
            Some(CellValue::Kind(kind)) => kind.to_string(),
            Some(CellValue::Positions(positions)) => format_positions(positions),
            None => String::new(),
        }
    }

    fn value(self, manifest: &LibraryItemManifest) -> Option<CellValue<'_>> {
        let logic = &manifest.logic_config;
        match self.collection {
            Collection::PiecePrefabs => {
                let item = manifest.board_config.checker_piece_collection.get(self.row)?;
                match self.column {
                    Column::Kind => Some(CellValue::Kind(item.kind)),
                    Column::PrefabPath => Some(CellValue::Text(&item.prefab_path)),
                    Column::PlayerId => Some(CellValue::Integer(item.player_id)),
                    Column::RandomRotation => Some(CellValue::Toggle(item.use_random_rotation)),
                    _ => None,
                }
            }
            Collection::StartingPieces => {
                let piece = logic.checker_pieces.get(self.row)?;
                let at = piece.id.start_position;
                match self.column {
                    Column::Kind => Some(CellValue::Kind(piece.kind)),
                    Column::PlayerId => Some(CellValue::Integer(piece.player_id)),
                    Column::StartX => Some(CellValue::Integer(at.x)),
                    Column::StartY => Some(CellValue::Integer(at.y)),
                    Column::StartZ => Some(CellValue::Integer(at.z)),
                    Column::Index => Some(CellValue::Integer(piece.id.index)),
                    _ => None,
                }
            }
            Collection::WinningCombinations => {
                let combination = logic.game_win_custom_winning_positions.get(self.row)?;
                match self.column {
                    Column::Positions => Some(CellValue::Positions(&combination.positions)),
                    _ => None,
                }
            }
        }
    }

    fn resolve(self, manifest: &mut LibraryItemManifest) -> Option<CellRef<'_>> {
        let logic = &mut manifest.logic_config;
        match self.collection {
            Collection::PiecePrefabs => {
                let item = manifest
                    .board_config
                    .checker_piece_collection
                    .get_mut(self.row)?;
                match self.column {
                    Column::Kind => Some(CellRef::Kind(&mut item.kind)),
                    Column::PrefabPath => Some(CellRef::Text(&mut item.prefab_path)),
                    Column::PlayerId => Some(CellRef::Integer(&mut item.player_id)),
                    Column::RandomRotation => Some(CellRef::Toggle(&mut item.use_random_rotation)),
                    _ => None,
                }
            }
            Collection::StartingPieces => {
                let piece = logic.checker_pieces.get_mut(self.row)?;
                match self.column {
                    Column::Kind => Some(CellRef::Kind(&mut piece.kind)),
                    Column::PlayerId => Some(CellRef::Integer(&mut piece.player_id)),
                    Column::StartX => Some(CellRef::Integer(&mut piece.id.start_position.x)),
                    Column::StartY => Some(CellRef::Integer(&mut piece.id.start_position.y)),
                    Column::StartZ => Some(CellRef::Integer(&mut piece.id.start_position.z)),
                    Column::Index => Some(CellRef::Integer(&mut piece.id.index)),
                    _ => None,
                }
            }
            Collection::WinningCombinations => {
                let combination = logic.game_win_custom_winning_positions.get_mut(self.row)?;
                match self.column {
                    Column::Positions => Some(CellRef::Positions(&mut combination.positions)),
                    _ => None,
                }
            }
        }
    }

    /// Apply prompt input to a text, integer or positions cell.
    pub fn set_text(self, manifest: &mut LibraryItemManifest, input: &str) -> Result<()> {
        let label = self.label();
        match self.resolve(manifest) {
            Some(CellRef::Text(value)) => *value = input.trim().to_string(),
            Some(CellRef::Integer(value)) => match input.trim().parse::<i32>() {
                Ok(parsed) => *value = parsed,
                Err(_) => bail!("{label} expects a whole number, got {:?}", input.trim()),
            },
            Some(CellRef::Positions(value)) => *value = parse_positions(input)?,
            Some(_) => bail!("{label} is not edited as text"),
            None => bail!("{label} no longer exists"),
        }
        Ok(())
    }

    /// Flip a toggle or move the piece type to the next kind. Returns false
    /// for prompted cells and rows that no longer exist.
    pub fn advance(self, manifest: &mut LibraryItemManifest) -> bool {
        match self.resolve(manifest) {
            Some(CellRef::Toggle(value)) => *value = !*value,
            Some(CellRef::Kind(value)) => *value = value.next(),
            _ => return false,
        }
        true
    }
}

/// Render positions as `x,y,z; x,y,z`, the same form [`parse_positions`] reads.
pub fn format_positions(positions: &[Coordinate]) -> String {
    positions
        .iter()
        .map(|p| format!("{},{},{}", p.x, p.y, p.z))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Parse `x,y,z` triples separated by `;`. Parentheses around a triple are
/// accepted; blank input yields no positions.
pub fn parse_positions(input: &str) -> Result<Vec<Coordinate>> {
    input
        .split(';')
        .map(|part| part.trim().trim_start_matches('(').trim_end_matches(')'))
        .filter(|part| !part.trim().is_empty())
        .map(|part| {
            let axes: Vec<i32> = match part
                .split(',')
                .map(|axis| axis.trim().parse::<i32>())
                .collect::<Result<Vec<_>, _>>()
            {
                Ok(axes) => axes,
                Err(_) => bail!("position {:?} must be whole numbers x,y,z", part.trim()),
            };
            match axes.as_slice() {
                [x, y, z] => Ok(Coordinate::new(*x, *y, *z)),
                _ => bail!("position {:?} needs exactly three axes", part.trim()),
            }
        })
        .collect()
}
