#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Sokoban adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use sokoban_core::{Cell, CellCoord, Event, Spawn, Terrain};
use sokoban_system_movement::FrameInput;
use sokoban_world::{query, World};
use std::time::Duration;
use thiserror::Error;

/// Pixel dimensions of a single tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileSize {
    width: u32,
    height: u32,
}

impl TileSize {
    /// Side length used when adapters do not configure one.
    pub const DEFAULT_LENGTH: u32 = 32;

    /// Creates a new tile size.
    ///
    /// Returns an error when either side is zero.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderingError> {
        if width == 0 || height == 0 {
            return Err(RenderingError::InvalidTileSize { width, height });
        }
        Ok(Self { width, height })
    }

    /// Creates a square tile size.
    pub fn square(length: u32) -> Result<Self, RenderingError> {
        Self::new(length, length)
    }

    /// Tile width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Tile height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

impl Default for TileSize {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_LENGTH,
            height: Self::DEFAULT_LENGTH,
        }
    }
}

/// Describes the tile grid of the active level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileGridPresentation {
    /// Number of columns contained in the grid.
    pub columns: u32,
    /// Number of rows contained in the grid.
    pub rows: u32,
    /// Pixel size of each tile.
    pub tile_size: TileSize,
}

impl TileGridPresentation {
    /// Creates a new tile grid descriptor.
    #[must_use]
    pub const fn new(columns: u32, rows: u32, tile_size: TileSize) -> Self {
        Self {
            columns,
            rows,
            tile_size,
        }
    }

    /// Total width of the grid in pixels.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.tile_size.width as f32
    }

    /// Total height of the grid in pixels.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.tile_size.height as f32
    }

    /// Pixel position of the top-left corner of the provided tile.
    #[must_use]
    pub fn tile_to_pixels(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(
            cell.column() as f32 * self.tile_size.width as f32,
            cell.row() as f32 * self.tile_size.height as f32,
        )
    }

    /// Tile containing the provided pixel position.
    ///
    /// Positions past the right or bottom edge map to tiles beyond the grid so
    /// a pointer anywhere on the canvas still points somewhere. Returns `None`
    /// for negative or non-finite positions, which no tile can represent.
    #[must_use]
    pub fn pixels_to_tile(&self, position: Vec2) -> Option<CellCoord> {
        if !position.is_finite() || position.x < 0.0 || position.y < 0.0 {
            return None;
        }

        let column = (position.x / self.tile_size.width as f32).floor() as u32;
        let row = (position.y / self.tile_size.height as f32).floor() as u32;
        Some(CellCoord::new(column, row))
    }
}

/// Kind of movable object drawn on top of the terrain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteKind {
    /// The player avatar.
    Player,
    /// A pushable crate.
    Crate,
}

/// Movable object positioned on the tile grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpritePresentation {
    /// Kind of object drawn.
    pub kind: SpriteKind,
    /// Tile occupied by the sprite.
    pub cell: CellCoord,
    /// Pixel position of the sprite's top-left corner.
    pub position: Vec2,
}

/// Progress shown next to the board.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelStatus {
    /// Zero-based index of the level.
    pub index: usize,
    /// Name of the level.
    pub name: String,
    /// Player steps taken on the current attempt.
    pub moves: u32,
    /// Crate pushes performed on the current attempt.
    pub pushes: u32,
    /// Whether every target is covered.
    pub solved: bool,
}

/// Scene description combining the terrain layer and the movable sprites.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Tile grid of the active level.
    pub tile_grid: TileGridPresentation,
    /// Terrain of every tile in row-major order.
    pub terrain: Vec<Terrain>,
    /// Player and crate sprites.
    pub sprites: Vec<SpritePresentation>,
    /// Progress on the active level, `None` when no level is loaded.
    pub status: Option<LevelStatus>,
}

impl Scene {
    /// Captures the active board of the world.
    ///
    /// A world without a loaded board yields an empty scene.
    #[must_use]
    pub fn from_world(world: &World, tile_size: TileSize) -> Self {
        let Some(board) = query::board(world) else {
            return Self {
                tile_grid: TileGridPresentation::new(0, 0, tile_size),
                terrain: Vec::new(),
                sprites: Vec::new(),
                status: None,
            };
        };

        let tile_grid = TileGridPresentation::new(board.columns(), board.rows(), tile_size);
        let terrain = (0..board.rows())
            .flat_map(|row| (0..board.columns()).map(move |column| CellCoord::new(column, row)))
            .map(|cell| board.terrain(cell))
            .collect();

        let mut sprites: Vec<SpritePresentation> = board
            .crates()
            .map(|cell| SpritePresentation {
                kind: SpriteKind::Crate,
                cell,
                position: tile_grid.tile_to_pixels(cell),
            })
            .collect();
        sprites.push(SpritePresentation {
            kind: SpriteKind::Player,
            cell: board.player(),
            position: tile_grid.tile_to_pixels(board.player()),
        });

        Self {
            tile_grid,
            terrain,
            sprites,
            status: Some(LevelStatus {
                index: query::current_index(world),
                name: query::current_level(world)
                    .map(|level| level.name().to_owned())
                    .unwrap_or_default(),
                moves: board.move_count(),
                pushes: board.push_count(),
                solved: board.is_solved(),
            }),
        }
    }

    /// Brings the scene up to date with the events emitted by the world.
    ///
    /// Position changes move individual sprites; a level load rebuilds the
    /// whole scene from the world.
    pub fn sync(&mut self, world: &World, events: &[Event]) {
        if events
            .iter()
            .any(|event| matches!(event, Event::LevelLoaded { .. }))
        {
            *self = Self::from_world(world, self.tile_grid.tile_size);
            return;
        }

        for event in events {
            match event {
                Event::PlayerMoved { from, to } => self.move_sprite(SpriteKind::Player, *from, *to),
                Event::CratePushed { from, to } => self.move_sprite(SpriteKind::Crate, *from, *to),
                Event::LevelSolved { .. }
                | Event::MoveBlocked { .. }
                | Event::LevelLoaded { .. }
                | Event::LevelRejected { .. } => {}
            }
        }

        if let (Some(status), Some(board)) = (self.status.as_mut(), query::board(world)) {
            status.moves = board.move_count();
            status.pushes = board.push_count();
            status.solved = board.is_solved();
        }
    }

    fn move_sprite(&mut self, kind: SpriteKind, from: CellCoord, to: CellCoord) {
        let position = self.tile_grid.tile_to_pixels(to);
        if let Some(sprite) = self
            .sprites
            .iter_mut()
            .find(|sprite| sprite.kind == kind && sprite.cell == from)
        {
            sprite.cell = to;
            sprite.position = position;
        }
    }

    /// Sprite of the player, if a level is loaded.
    #[must_use]
    pub fn player(&self) -> Option<&SpritePresentation> {
        self.sprites
            .iter()
            .find(|sprite| sprite.kind == SpriteKind::Player)
    }

    /// Terrain at the provided tile; tiles outside the grid are [`Terrain::Space`].
    #[must_use]
    pub fn terrain_at(&self, cell: CellCoord) -> Terrain {
        if cell.column() >= self.tile_grid.columns || cell.row() >= self.tile_grid.rows {
            return Terrain::Space;
        }
        let index = u64::from(cell.row()) * u64::from(self.tile_grid.columns)
            + u64::from(cell.column());
        usize::try_from(index)
            .ok()
            .and_then(|index| self.terrain.get(index).copied())
            .unwrap_or(Terrain::Space)
    }

    /// Renders the scene with the level file symbols, one line per row.
    ///
    /// Trailing spaces are trimmed so the output parses back into the same level.
    #[must_use]
    pub fn to_ascii(&self) -> String {
        let mut spawns = vec![Spawn::None; self.terrain.len()];
        for sprite in &self.sprites {
            let index = u64::from(sprite.cell.row()) * u64::from(self.tile_grid.columns)
                + u64::from(sprite.cell.column());
            if let Some(spawn) = usize::try_from(index)
                .ok()
                .and_then(|index| spawns.get_mut(index))
            {
                *spawn = match sprite.kind {
                    SpriteKind::Player => Spawn::Player,
                    SpriteKind::Crate => Spawn::Crate,
                };
            }
        }

        let Ok(width) = usize::try_from(self.tile_grid.columns) else {
            return String::new();
        };
        if width == 0 {
            return String::new();
        }

        self.terrain
            .chunks(width)
            .zip(spawns.chunks(width))
            .map(|(terrain, spawns)| {
                let row: String = terrain
                    .iter()
                    .zip(spawns)
                    .map(|(terrain, spawn)| Cell::new(*terrain, *spawn).symbol().unwrap_or(' '))
                    .collect();
                row.trim_end_matches(' ').to_owned()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title shown by the backend.
    pub title: String,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(title: T, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            title: title.into(),
            scene,
        }
    }
}

/// Rendering backend capable of presenting Sokoban scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the monotonic time of the
    /// frame and the input captured by the adapter, and may mutate the scene
    /// before it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene);
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderingError {
    /// Tile sides must be positive.
    #[error("tile size must be positive (received {width}x{height})")]
    InvalidTileSize {
        /// Requested tile width.
        width: u32,
        /// Requested tile height.
        height: u32,
    },
}
