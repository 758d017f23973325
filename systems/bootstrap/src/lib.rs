#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares the Sokoban experience.

use sokoban_core::{Event, LevelError};
use sokoban_world::{query, Board, World};

/// Summary of a catalog entry shown before play starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelSummary {
    /// Zero-based position of the level in the catalog.
    pub index: usize,
    /// Name taken from the level's header line.
    pub name: String,
    /// Number of tile columns.
    pub columns: u32,
    /// Number of tile rows.
    pub rows: u32,
    /// Reason the level cannot be loaded, if any.
    pub problem: Option<LevelError>,
}

/// Produces data required to greet the player.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Lists every level of the catalog in source order, flagging levels
    /// that parse but cannot be played.
    #[must_use]
    pub fn level_summaries(&self, world: &World) -> Vec<LevelSummary> {
        query::levels(world)
            .iter()
            .enumerate()
            .map(|(index, level)| LevelSummary {
                index,
                name: level.name().to_owned(),
                columns: level.columns(),
                rows: level.rows(),
                problem: Board::load(level).err(),
            })
            .collect()
    }

    /// Player-facing notices for the levels rejected while loading.
    #[must_use]
    pub fn rejection_notices(&self, world: &World, events: &[Event]) -> Vec<String> {
        events
            .iter()
            .filter_map(|event| match event {
                Event::LevelRejected { index, reason } => {
                    let name = query::levels(world)
                        .get(*index)
                        .map_or("", |level| level.name());
                    Some(format!("Level {} \"{name}\" cannot be played: {reason}", index + 1))
                }
                _ => None,
            })
            .collect()
    }
}
