//! Text backend that reads actions line by line and prints a frame after each line.

use std::{
    io::{BufRead, Write},
    time::Duration,
};

use anyhow::{Context, Result};
use sokoban_rendering::{LevelStatus, Presentation, RenderingBackend, Scene};
use sokoban_system_movement::FrameInput;
use tracing::debug;

use crate::script::{parse_line, Token};

/// Simulated time between two frames, longer than every input debounce.
const FRAME_INTERVAL: Duration = Duration::from_millis(200);

const HELP: &str =
    "Move with w/a/s/d or U/D/L/R, n next level, p previous level, r reset, click <x> <y>, q quit.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Interactive,
    Scripted,
}

/// Rendering backend that prints ASCII frames to a writer.
#[derive(Debug)]
pub(crate) struct TerminalBackend<R, W> {
    input: R,
    output: W,
    mode: Mode,
}

impl<R, W> TerminalBackend<R, W>
where
    R: BufRead,
    W: Write,
{
    /// Reads actions typed by a player; malformed lines are reported and skipped.
    pub(crate) fn interactive(input: R, output: W) -> Self {
        Self {
            input,
            output,
            mode: Mode::Interactive,
        }
    }

    /// Replays a move script; malformed scripts abort the run.
    pub(crate) fn scripted(input: R, output: W) -> Self {
        Self {
            input,
            output,
            mode: Mode::Scripted,
        }
    }

    fn render(&mut self, scene: &Scene) -> Result<()> {
        match &scene.status {
            Some(status) => writeln!(self.output, "{}", status_line(status))?,
            None => writeln!(self.output, "no level loaded")?,
        }
        writeln!(self.output, "{}", scene.to_ascii())?;
        writeln!(self.output)?;
        Ok(())
    }
}

fn status_line(status: &LevelStatus) -> String {
    let mut line = format!(
        "Level {} \"{}\"  moves: {}  pushes: {}",
        status.index + 1,
        status.name,
        status.moves,
        status.pushes
    );
    if status.solved {
        line.push_str("  solved!");
    }
    line
}

impl<R, W> RenderingBackend for TerminalBackend<R, W>
where
    R: BufRead,
    W: Write,
{
    fn run<F>(mut self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene),
    {
        let Presentation { title, mut scene } = presentation;
        writeln!(self.output, "{title}")?;
        if self.mode == Mode::Interactive {
            writeln!(self.output, "{HELP}")?;
        }
        self.render(&scene)?;

        let mut now = Duration::ZERO;
        let mut line = String::new();
        loop {
            line.clear();
            if self.input.read_line(&mut line).context("failed to read input")? == 0 {
                break;
            }

            let tokens = match parse_line(&line) {
                Ok(tokens) => tokens,
                Err(error) if self.mode == Mode::Interactive => {
                    writeln!(self.output, "{error:#}")?;
                    continue;
                }
                Err(error) => return Err(error.context("invalid move script")),
            };

            let mut quit = false;
            for token in tokens {
                let input = match token {
                    Token::Frame(input) => input,
                    Token::Click(position) => match scene.tile_grid.pixels_to_tile(position) {
                        Some(cell) => FrameInput {
                            pointer: Some(cell),
                            ..FrameInput::default()
                        },
                        None => {
                            debug!(x = position.x, y = position.y, "click_ignored");
                            continue;
                        }
                    },
                    Token::Quit => {
                        quit = true;
                        break;
                    }
                };
                update_scene(now, input, &mut scene);
                now += FRAME_INTERVAL;
            }

            self.render(&scene)?;
            if quit {
                break;
            }
        }

        self.output.flush().context("failed to flush output")
    }
}
