#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Sokoban.
//!
//! The [`World`] owns the ordered level catalog, the index of the current
//! level and the live [`Board`] derived from it. Adapters mutate it only
//! through [`apply`] and observe it through the [`query`] module.

mod board;
mod level;

use sokoban_core::{Command, Event, WELCOME_BANNER};
use tracing::{info, warn};

pub use board::{Board, MoveOutcome};
pub use level::{parse, parse_with_report, Level, ParseReport, SkippedLevel};

/// Represents the authoritative Sokoban session: level catalog plus active board.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    levels: Vec<Level>,
    index: usize,
    board: Option<Board>,
}

impl World {
    /// Creates a world over the provided levels and loads the first playable one.
    ///
    /// When no level can be loaded the world starts without a board and
    /// ignores movement until navigation succeeds. Startup events are only
    /// logged; use [`World::with_events`] to receive them.
    #[must_use]
    pub fn new(levels: Vec<Level>) -> Self {
        let mut startup_events = Vec::new();
        Self::with_events(levels, &mut startup_events)
    }

    /// Creates a world like [`World::new`], reporting the `LevelRejected`
    /// events of skipped leading levels and the `LevelLoaded` event of the
    /// first playable one.
    pub fn with_events(levels: Vec<Level>, out_events: &mut Vec<Event>) -> Self {
        let mut world = Self {
            banner: WELCOME_BANNER,
            levels,
            index: 0,
            board: None,
        };
        let _ = world.load_first_playable(0..world.levels.len(), out_events);
        world
    }

    /// Parses the level text and creates a world over the levels that survived.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self::new(parse(text))
    }

    fn load(&mut self, index: usize, out_events: &mut Vec<Event>) -> bool {
        let Some(level) = self.levels.get(index) else {
            return false;
        };

        match Board::load(level) {
            Ok(board) => {
                info!(
                    index,
                    level = %level.name(),
                    columns = board.columns(),
                    rows = board.rows(),
                    "level_loaded"
                );
                out_events.push(Event::LevelLoaded {
                    index,
                    name: level.name().to_owned(),
                    columns: board.columns(),
                    rows: board.rows(),
                });
                self.index = index;
                self.board = Some(board);
                true
            }
            Err(reason) => {
                warn!(index, "rejecting level \"{}\": {}", level.name(), reason);
                out_events.push(Event::LevelRejected { index, reason });
                false
            }
        }
    }

    fn load_first_playable<I>(&mut self, candidates: I, out_events: &mut Vec<Event>) -> bool
    where
        I: IntoIterator<Item = usize>,
    {
        candidates
            .into_iter()
            .any(|index| self.load(index, out_events))
    }

    fn last_index(&self) -> Option<usize> {
        self.levels.len().checked_sub(1)
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::MovePlayer { direction } => {
            let index = world.index;
            let Some(board) = world.board.as_mut() else {
                return;
            };

            let was_solved = board.is_solved();
            match board.attempt_move(direction) {
                MoveOutcome::Walked { from, to } => {
                    out_events.push(Event::PlayerMoved { from, to });
                }
                MoveOutcome::Pushed { from, to, crate_to } => {
                    out_events.push(Event::CratePushed { from: to, to: crate_to });
                    out_events.push(Event::PlayerMoved { from, to });
                }
                MoveOutcome::Blocked => {
                    out_events.push(Event::MoveBlocked { direction });
                }
            }

            if !was_solved && board.is_solved() {
                info!(
                    index,
                    moves = board.move_count(),
                    pushes = board.push_count(),
                    "level_solved"
                );
                out_events.push(Event::LevelSolved { index });
            }
        }
        Command::GoToLevel { index } => {
            let Some(last) = world.last_index() else {
                return;
            };
            let _ = world.load(index.min(last), out_events);
        }
        Command::NextLevel => {
            let Some(last) = world.last_index() else {
                return;
            };
            if world.index < last {
                let _ = world.load_first_playable(world.index + 1..=last, out_events);
            }
        }
        Command::PreviousLevel => {
            if world.index > 0 {
                let _ = world.load_first_playable((0..world.index).rev(), out_events);
            }
        }
        Command::ResetLevel => {
            let _ = world.load(world.index, out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use sokoban_core::{CellCoord, Terrain};

    use super::{Board, Level, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Number of levels held by the catalog.
    #[must_use]
    pub fn level_count(world: &World) -> usize {
        world.levels.len()
    }

    /// Every level held by the catalog in source order.
    #[must_use]
    pub fn levels(world: &World) -> &[Level] {
        &world.levels
    }

    /// Zero-based index of the current level.
    #[must_use]
    pub fn current_index(world: &World) -> usize {
        world.index
    }

    /// Level currently selected by the catalog, if the catalog is not empty.
    #[must_use]
    pub fn current_level(world: &World) -> Option<&Level> {
        world.levels.get(world.index)
    }

    /// Live board of the current level, if one could be loaded.
    #[must_use]
    pub fn board(world: &World) -> Option<&Board> {
        world.board.as_ref()
    }

    /// Tile occupied by the player on the active board.
    #[must_use]
    pub fn player(world: &World) -> Option<CellCoord> {
        world.board.as_ref().map(Board::player)
    }

    /// Tiles holding crates on the active board, in row-major order.
    #[must_use]
    pub fn crate_cells(world: &World) -> Vec<CellCoord> {
        world
            .board
            .as_ref()
            .map(|board| board.crates().collect())
            .unwrap_or_default()
    }

    /// Terrain at the provided tile of the active board.
    #[must_use]
    pub fn terrain(world: &World, cell: CellCoord) -> Terrain {
        world
            .board
            .as_ref()
            .map_or(Terrain::Space, |board| board.terrain(cell))
    }

    /// Reports whether the active board has every target covered.
    ///
    /// A world without a board is never solved.
    #[must_use]
    pub fn is_solved(world: &World) -> bool {
        world.board.as_ref().is_some_and(Board::is_solved)
    }
}
