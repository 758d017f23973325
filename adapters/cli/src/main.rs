#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Sokoban experience.

mod script;
mod simulation;
mod terminal;

use std::{
    fs,
    io::{self, Cursor, Write},
    path::PathBuf,
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use sokoban_core::{Command, Event};
use sokoban_rendering::{Presentation, RenderingBackend, Scene, TileSize};
use sokoban_system_bootstrap::Bootstrap;
use sokoban_world::{self as world, parse_with_report, query, World};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{simulation::Simulation, terminal::TerminalBackend};

/// Plays Sokoban levels from a text file in the terminal.
#[derive(Debug, Parser)]
#[command(name = "sokoban", version, about)]
struct CliArgs {
    /// Text file holding one or more levels separated by `;` header lines.
    #[arg(long, value_name = "PATH")]
    levels: PathBuf,
    /// One-based number of the level to start on.
    #[arg(long, value_name = "N", default_value_t = 1)]
    level: usize,
    /// Replays the provided moves instead of reading stdin (U D L R move, n p r navigate).
    #[arg(long, value_name = "SCRIPT")]
    moves: Option<String>,
    /// Prints the level catalog and exits.
    #[arg(long)]
    list: bool,
    /// Side length of a tile in pixels, used to map clicks onto tiles.
    #[arg(long, value_name = "PX", default_value_t = TileSize::DEFAULT_LENGTH)]
    tile_size: u32,
}

/// Entry point for the Sokoban command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();
    run(&args)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn run(args: &CliArgs) -> Result<()> {
    let text = fs::read_to_string(&args.levels)
        .with_context(|| format!("failed to read levels from {}", args.levels.display()))?;
    let report = parse_with_report(&text);
    info!(
        levels = report.levels().len(),
        skipped = report.skipped().len(),
        "catalog_parsed"
    );
    if report.levels().is_empty() {
        bail!("no levels found in {}", args.levels.display());
    }

    let mut startup_events = Vec::new();
    let mut world = World::with_events(report.into_levels(), &mut startup_events);
    let bootstrap = Bootstrap;
    if args.list {
        let stdout = io::stdout();
        return write_catalog(&bootstrap, &world, &mut stdout.lock());
    }
    if query::board(&world).is_none() {
        bail!("no playable levels found in {}", args.levels.display());
    }

    let Some(start) = args.level.checked_sub(1) else {
        bail!("level numbers start at 1");
    };
    if start != query::current_index(&world) {
        world::apply(
            &mut world,
            Command::GoToLevel { index: start },
            &mut startup_events,
        );
    }

    let tile_size = TileSize::square(args.tile_size).context("invalid --tile-size")?;
    let presentation = Presentation::new(
        startup_title(&bootstrap, &world, &startup_events),
        Scene::from_world(&world, tile_size),
    );
    let mut simulation = Simulation::new(world);
    let update = |now, input, scene: &mut Scene| simulation.advance(now, input, scene);

    let stdout = io::stdout();
    match &args.moves {
        Some(script) => {
            let backend = TerminalBackend::scripted(Cursor::new(script.as_bytes()), stdout.lock());
            backend.run(presentation, update)
        }
        None => {
            let backend = TerminalBackend::interactive(io::stdin().lock(), stdout.lock());
            backend.run(presentation, update)
        }
    }
}

fn write_catalog(bootstrap: &Bootstrap, world: &World, out: &mut impl Write) -> Result<()> {
    for summary in bootstrap.level_summaries(world) {
        write!(
            out,
            "{:>4}  {} ({}x{})",
            summary.index + 1,
            summary.name,
            summary.columns,
            summary.rows
        )?;
        match summary.problem {
            Some(problem) => writeln!(out, "  unplayable: {problem}")?,
            None => writeln!(out)?,
        }
    }
    Ok(())
}

fn startup_title(bootstrap: &Bootstrap, world: &World, events: &[Event]) -> String {
    let mut lines = vec![bootstrap.welcome_banner(world).to_owned()];
    lines.extend(bootstrap.rejection_notices(world, events));
    lines.join("\n")
}
