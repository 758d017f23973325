//! Live board for the active level: static terrain plus movable player and crates.

use std::collections::BTreeSet;

use sokoban_core::{CellCoord, Direction, LevelError, Spawn, Terrain};

use crate::level::Level;

/// Result of a single movement attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The player stepped onto a free tile.
    Walked {
        /// Tile the player left.
        from: CellCoord,
        /// Tile the player entered.
        to: CellCoord,
    },
    /// The player pushed a crate one tile and took its place.
    Pushed {
        /// Tile the player left.
        from: CellCoord,
        /// Tile the player entered, previously holding the crate.
        to: CellCoord,
        /// Tile the crate was pushed onto.
        crate_to: CellCoord,
    },
    /// Nothing moved.
    Blocked,
}

/// Mutable world model for a single level.
///
/// Terrain is copied from the level once and never changes. The player and the
/// crates always stand on [`Terrain::Floor`] or [`Terrain::Target`] tiles and no
/// two crates share a tile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    columns: u32,
    rows: u32,
    terrain: Vec<Terrain>,
    player: CellCoord,
    crates: BTreeSet<CellCoord>,
    moves: u32,
    pushes: u32,
}

impl Board {
    /// Builds a fresh board from the level's terrain and spawn markers.
    ///
    /// Fails with [`LevelError::MalformedLevel`] unless the level carries
    /// exactly one player spawn.
    pub fn load(level: &Level) -> Result<Self, LevelError> {
        let mut terrain = Vec::new();
        let mut players = Vec::new();
        let mut crates = BTreeSet::new();

        for (cell, description) in level.iter_cells() {
            terrain.push(description.terrain());
            match description.spawn() {
                Spawn::Player => players.push(cell),
                Spawn::Crate => {
                    let _ = crates.insert(cell);
                }
                Spawn::None => {}
            }
        }

        let [player] = players.as_slice() else {
            return Err(LevelError::MalformedLevel {
                players: players.len(),
            });
        };

        Ok(Self {
            columns: level.columns(),
            rows: level.rows(),
            terrain,
            player: *player,
            crates,
            moves: 0,
            pushes: 0,
        })
    }

    /// Number of tile columns on the board.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of tile rows on the board.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Terrain at the provided tile; tiles outside the board are [`Terrain::Space`].
    #[must_use]
    pub fn terrain(&self, cell: CellCoord) -> Terrain {
        self.index(cell)
            .and_then(|index| self.terrain.get(index).copied())
            .unwrap_or(Terrain::Space)
    }

    /// Tile currently occupied by the player.
    #[must_use]
    pub const fn player(&self) -> CellCoord {
        self.player
    }

    /// Tiles currently holding crates, in row-major order.
    pub fn crates(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.crates.iter().copied()
    }

    /// Reports whether a crate stands on the provided tile.
    #[must_use]
    pub fn has_crate(&self, cell: CellCoord) -> bool {
        self.crates.contains(&cell)
    }

    /// Tiles marked as targets, in row-major order.
    pub fn targets(&self) -> impl Iterator<Item = CellCoord> + '_ {
        (0..self.rows)
            .flat_map(move |row| (0..self.columns).map(move |column| CellCoord::new(column, row)))
            .filter(move |cell| self.terrain(*cell) == Terrain::Target)
    }

    /// Reports whether every target tile is covered by a crate.
    ///
    /// A board without targets is trivially solved.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.targets().all(|target| self.crates.contains(&target))
    }

    /// Number of successful player steps since the board was loaded.
    #[must_use]
    pub const fn move_count(&self) -> u32 {
        self.moves
    }

    /// Number of crate pushes since the board was loaded.
    #[must_use]
    pub const fn push_count(&self) -> u32 {
        self.pushes
    }

    /// Attempts to move the player one tile, pushing at most one crate.
    ///
    /// The move either commits fully or leaves the board untouched. Walls,
    /// space and the board edge block the player; a crate is only pushed when
    /// the tile behind it is walkable and free of other crates.
    pub fn attempt_move(&mut self, direction: Direction) -> MoveOutcome {
        let from = self.player;
        let Some(to) = self.walkable_neighbour(from, direction) else {
            return MoveOutcome::Blocked;
        };

        if !self.crates.contains(&to) {
            self.player = to;
            self.moves = self.moves.saturating_add(1);
            return MoveOutcome::Walked { from, to };
        }

        let Some(crate_to) = self.walkable_neighbour(to, direction) else {
            return MoveOutcome::Blocked;
        };
        if self.crates.contains(&crate_to) {
            return MoveOutcome::Blocked;
        }

        let _ = self.crates.remove(&to);
        let _ = self.crates.insert(crate_to);
        self.player = to;
        self.moves = self.moves.saturating_add(1);
        self.pushes = self.pushes.saturating_add(1);
        MoveOutcome::Pushed { from, to, crate_to }
    }

    fn walkable_neighbour(&self, cell: CellCoord, direction: Direction) -> Option<CellCoord> {
        cell.step(direction)
            .filter(|neighbour| self.terrain(*neighbour).is_walkable())
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
