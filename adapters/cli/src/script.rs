//! Text input understood by the terminal backend.

use anyhow::{bail, Context, Result};
use glam::Vec2;
use sokoban_core::Direction;
use sokoban_system_movement::{FrameInput, NavigationKeys};

const CLICK_PREFIX: &str = "click";

const NEXT: NavigationKeys = NavigationKeys {
    previous: false,
    next: true,
    reset: false,
};
const PREVIOUS: NavigationKeys = NavigationKeys {
    previous: true,
    next: false,
    reset: false,
};
const RESET: NavigationKeys = NavigationKeys {
    previous: false,
    next: false,
    reset: true,
};

/// Single player action decoded from text input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Token {
    /// Input held for one frame.
    Frame(FrameInput),
    /// Pointer pressed at a pixel position.
    Click(Vec2),
    /// Request to leave the game.
    Quit,
}

/// Decodes a line of input.
///
/// A line is either `click <x> <y>` with pixel coordinates or a sequence of
/// single-character actions; whitespace between actions is ignored.
pub(crate) fn parse_line(line: &str) -> Result<Vec<Token>> {
    let line = line.trim();
    if let Some(coordinates) = line.strip_prefix(CLICK_PREFIX) {
        return parse_click(coordinates).map(|position| vec![Token::Click(position)]);
    }

    line.chars()
        .filter(|symbol| !symbol.is_whitespace())
        .map(parse_action)
        .collect()
}

fn parse_click(coordinates: &str) -> Result<Vec2> {
    let mut parts = coordinates.split_whitespace();
    let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
        bail!("expected `click <x> <y>`");
    };
    let x: f32 = x.parse().with_context(|| format!("invalid x coordinate `{x}`"))?;
    let y: f32 = y.parse().with_context(|| format!("invalid y coordinate `{y}`"))?;
    Ok(Vec2::new(x, y))
}

fn parse_action(symbol: char) -> Result<Token> {
    let token = match symbol {
        'U' | 'w' => Token::Frame(FrameInput::key(Direction::North)),
        'D' | 's' => Token::Frame(FrameInput::key(Direction::South)),
        'L' | 'a' => Token::Frame(FrameInput::key(Direction::West)),
        'R' | 'd' => Token::Frame(FrameInput::key(Direction::East)),
        'n' => navigation(NEXT),
        'p' => navigation(PREVIOUS),
        'r' => navigation(RESET),
        'q' => Token::Quit,
        other => bail!("unknown action `{other}`"),
    };
    Ok(token)
}

fn navigation(keys: NavigationKeys) -> Token {
    Token::Frame(FrameInput {
        navigation: keys,
        ..FrameInput::default()
    })
}
