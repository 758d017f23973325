#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Sokoban engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values so renderers and
//! systems can react deterministically. Level data is described through
//! [`Cell`] values pairing a static [`Terrain`] with a [`Spawn`] marker.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Sokoban.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Requests that the player advance a single tile, pushing a crate if one is in the way.
    MovePlayer {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Requests that the catalog select the level at the provided index.
    ///
    /// Indices past the end of the catalog are clamped to the last level.
    GoToLevel {
        /// Zero-based catalog index of the requested level.
        index: usize,
    },
    /// Requests the level following the current one. Ignored on the last level.
    NextLevel,
    /// Requests the level preceding the current one. Ignored on the first level.
    PreviousLevel,
    /// Requests that the current level be reloaded from its spawn markers.
    ResetLevel,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that a fresh board replaced the previous one.
    LevelLoaded {
        /// Catalog index of the level that became active.
        index: usize,
        /// Name of the level taken from its header line.
        name: String,
        /// Number of tile columns in the level.
        columns: u32,
        /// Number of tile rows in the level.
        rows: u32,
    },
    /// Reports that a level could not be loaded and the previous board was kept.
    LevelRejected {
        /// Catalog index of the level that failed to load.
        index: usize,
        /// Reason reported by the loader.
        reason: LevelError,
    },
    /// Confirms that the player moved between two tiles.
    PlayerMoved {
        /// Tile the player occupied before moving.
        from: CellCoord,
        /// Tile the player occupies after the move.
        to: CellCoord,
    },
    /// Confirms that a crate was pushed between two tiles.
    CratePushed {
        /// Tile the crate occupied before the push.
        from: CellCoord,
        /// Tile the crate occupies after the push.
        to: CellCoord,
    },
    /// Reports that a move request was refused by a wall, the level edge or a blocked crate.
    MoveBlocked {
        /// Direction of the refused move.
        direction: Direction,
    },
    /// Announces that the last move covered every target with a crate.
    LevelSolved {
        /// Catalog index of the solved level.
        index: usize,
    },
}

/// Reasons a level may be rejected while parsing or loading.
#[derive(Clone, Debug, Error, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelError {
    /// A character outside the level symbol table appeared in a data row.
    #[error("invalid symbol '{symbol}' at line {line}, column {column}")]
    InvalidSymbol {
        /// Offending character.
        symbol: char,
        /// One-based line number of the row containing the symbol.
        line: usize,
        /// One-based column of the symbol within its row.
        column: usize,
    },
    /// The block preceding or following a header contained no rows.
    #[error("level contains no rows")]
    EmptyLevel,
    /// The level does not carry exactly one player spawn marker.
    #[error("expected exactly one player spawn, found {players}")]
    MalformedLevel {
        /// Number of player spawn markers found in the level.
        players: usize,
    },
}

/// Static classification of a single tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    /// Outside the playable area.
    #[default]
    Space,
    /// Plain walkable floor.
    Floor,
    /// Walkable floor that must be covered by a crate to solve the level.
    Target,
    /// Impassable wall.
    Wall,
}

impl Terrain {
    /// Reports whether the player or a crate may stand on the terrain.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        matches!(self, Self::Floor | Self::Target)
    }

    /// Low-nibble code used by the packed cell encoding.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Space => 0,
            Self::Floor => 1,
            Self::Target => 2,
            Self::Wall => 3,
        }
    }

    /// Decodes a terrain from its low-nibble code.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Space),
            1 => Some(Self::Floor),
            2 => Some(Self::Target),
            3 => Some(Self::Wall),
            _ => None,
        }
    }
}

/// Movable entity that starts on a tile when a level is loaded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Spawn {
    /// Nothing starts on the tile.
    #[default]
    None,
    /// A crate starts on the tile.
    Crate,
    /// The player starts on the tile.
    Player,
}

impl Spawn {
    /// High-nibble code used by the packed cell encoding.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Crate => 1,
            Self::Player => 2,
        }
    }

    /// Decodes a spawn marker from its high-nibble code.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Crate),
            2 => Some(Self::Player),
            _ => None,
        }
    }
}

/// Parse-time description of a tile: its terrain plus an optional spawn marker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    terrain: Terrain,
    spawn: Spawn,
}

impl Cell {
    /// Tile outside the playable area. Used to pad short rows.
    pub const SPACE: Self = Self::new(Terrain::Space, Spawn::None);

    /// Creates a new cell from explicit fields.
    #[must_use]
    pub const fn new(terrain: Terrain, spawn: Spawn) -> Self {
        Self { terrain, spawn }
    }

    /// Static terrain of the cell.
    #[must_use]
    pub const fn terrain(&self) -> Terrain {
        self.terrain
    }

    /// Spawn marker carried by the cell.
    #[must_use]
    pub const fn spawn(&self) -> Spawn {
        self.spawn
    }

    /// Maps a level text symbol to the cell it describes.
    ///
    /// Returns `None` for characters outside the symbol table. A space maps to
    /// floor; callers handle leading indentation separately.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        let cell = match symbol {
            ' ' => Self::new(Terrain::Floor, Spawn::None),
            '$' => Self::new(Terrain::Floor, Spawn::Crate),
            '@' => Self::new(Terrain::Floor, Spawn::Player),
            '.' => Self::new(Terrain::Target, Spawn::None),
            '*' => Self::new(Terrain::Target, Spawn::Crate),
            '+' => Self::new(Terrain::Target, Spawn::Player),
            '#' => Self::new(Terrain::Wall, Spawn::None),
            _ => return None,
        };
        Some(cell)
    }

    /// Maps the cell back to its level text symbol.
    ///
    /// Space cells and combinations the symbol table cannot express return `None`.
    #[must_use]
    pub const fn symbol(&self) -> Option<char> {
        match (self.terrain, self.spawn) {
            (Terrain::Floor, Spawn::None) => Some(' '),
            (Terrain::Floor, Spawn::Crate) => Some('$'),
            (Terrain::Floor, Spawn::Player) => Some('@'),
            (Terrain::Target, Spawn::None) => Some('.'),
            (Terrain::Target, Spawn::Crate) => Some('*'),
            (Terrain::Target, Spawn::Player) => Some('+'),
            (Terrain::Wall, Spawn::None) => Some('#'),
            _ => None,
        }
    }

    /// Packs the cell into a byte: terrain in the low nibble, spawn in the high nibble.
    #[must_use]
    pub const fn packed(&self) -> u8 {
        self.terrain.code() | (self.spawn.code() << 4)
    }

    /// Unpacks a byte produced by [`Cell::packed`].
    #[must_use]
    pub const fn from_packed(value: u8) -> Option<Self> {
        let Some(terrain) = Terrain::from_code(value & 0x0f) else {
            return None;
        };
        let Some(spawn) = Spawn::from_code(value >> 4) else {
            return None;
        };
        Some(Self::new(terrain, spawn))
    }
}

/// Cardinal movement directions available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Every direction in clockwise order starting north.
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Unit offset `(columns, rows)` travelled by one step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// Converts a unit offset back into a direction.
    ///
    /// Zero, diagonal and non-unit offsets have no direction.
    #[must_use]
    pub const fn from_delta(columns: i32, rows: i32) -> Option<Self> {
        match (columns, rows) {
            (0, -1) => Some(Self::North),
            (1, 0) => Some(Self::East),
            (0, 1) => Some(Self::South),
            (-1, 0) => Some(Self::West),
            _ => None,
        }
    }
}

/// Location of a single tile expressed as column and row coordinates.
///
/// The origin is the top-left tile of a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Neighbouring tile one step away in the provided direction.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Self> {
        let (columns, rows) = direction.delta();
        let column = self.column.checked_add_signed(columns)?;
        let row = self.row.checked_add_signed(rows)?;
        Some(Self::new(column, row))
    }

    /// Computes the Manhattan distance between two tile coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }
}

#[cfg(test)]
mod tests {
    use super::{Cell, CellCoord, Command, Direction, LevelError, Spawn, Terrain};
    use serde::{de::DeserializeOwned, Serialize};

    const SYMBOLS: [char; 7] = [' ', '$', '@', '.', '*', '+', '#'];

    #[test]
    fn symbol_table_matches_level_format() {
        assert_eq!(
            Cell::from_symbol('$'),
            Some(Cell::new(Terrain::Floor, Spawn::Crate))
        );
        assert_eq!(
            Cell::from_symbol('+'),
            Some(Cell::new(Terrain::Target, Spawn::Player))
        );
        assert_eq!(
            Cell::from_symbol('#'),
            Some(Cell::new(Terrain::Wall, Spawn::None))
        );
        assert_eq!(Cell::from_symbol('X'), None);
        assert_eq!(Cell::from_symbol('\t'), None);
    }

    #[test]
    fn every_symbol_maps_back_to_itself() {
        for symbol in SYMBOLS {
            let cell = Cell::from_symbol(symbol).expect("symbol is in the table");
            assert_eq!(cell.symbol(), Some(symbol), "symbol {symbol:?}");
        }
    }

    #[test]
    fn space_and_impossible_cells_have_no_symbol() {
        assert_eq!(Cell::SPACE.symbol(), None);
        assert_eq!(Cell::new(Terrain::Wall, Spawn::Crate).symbol(), None);
    }

    #[test]
    fn packed_encoding_uses_nibbles() {
        let crate_on_target = Cell::from_symbol('*').expect("valid symbol");
        assert_eq!(crate_on_target.packed(), 0x12);
        let player = Cell::from_symbol('@').expect("valid symbol");
        assert_eq!(player.packed(), 0x21);
        assert_eq!(Cell::from_packed(0x12), Some(crate_on_target));
        assert_eq!(Cell::from_packed(0x04), None);
        assert_eq!(Cell::from_packed(0x31), None);
    }

    #[test]
    fn direction_deltas_are_unit_vectors() {
        for direction in Direction::ALL {
            let (columns, rows) = direction.delta();
            assert_eq!(columns.abs() + rows.abs(), 1);
            assert_eq!(Direction::from_delta(columns, rows), Some(direction));
        }
        assert_eq!(Direction::from_delta(1, 1), None);
        assert_eq!(Direction::from_delta(0, 0), None);
        assert_eq!(Direction::from_delta(2, 0), None);
    }

    #[test]
    fn step_refuses_to_leave_the_grid_origin() {
        let origin = CellCoord::new(0, 0);
        assert_eq!(origin.step(Direction::West), None);
        assert_eq!(origin.step(Direction::North), None);
        assert_eq!(origin.step(Direction::East), Some(CellCoord::new(1, 0)));
        assert_eq!(origin.step(Direction::South), Some(CellCoord::new(0, 1)));
    }

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn command_round_trips_through_bincode() {
        assert_round_trip(&Command::MovePlayer {
            direction: Direction::West,
        });
        assert_round_trip(&Command::GoToLevel { index: 7 });
    }

    #[test]
    fn level_error_round_trips_through_bincode() {
        assert_round_trip(&LevelError::InvalidSymbol {
            symbol: 'X',
            line: 3,
            column: 2,
        });
    }

    #[test]
    fn level_error_messages_name_the_reason() {
        let error = LevelError::InvalidSymbol {
            symbol: 'X',
            line: 4,
            column: 2,
        };
        assert_eq!(error.to_string(), "invalid symbol 'X' at line 4, column 2");
        assert_eq!(
            LevelError::MalformedLevel { players: 0 }.to_string(),
            "expected exactly one player spawn, found 0"
        );
    }
}
