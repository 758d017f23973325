use std::time::Duration;

use sokoban_core::{CellCoord, Command, Direction};
use sokoban_system_movement::{Controls, FrameInput, KeyState, NavigationKeys};
use sokoban_world::{self as world, query, World};

fn at(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn moves(commands: &[Command]) -> Vec<Direction> {
    commands
        .iter()
        .filter_map(|command| match command {
            Command::MovePlayer { direction } => Some(*direction),
            _ => None,
        })
        .collect()
}

#[test]
fn held_key_repeats_at_the_keyboard_rate() {
    let mut controls = Controls::default();
    let player = Some(CellCoord::new(1, 1));
    let input = FrameInput::key(Direction::East);
    let mut commands = Vec::new();

    for millis in [0, 50, 100, 149, 150, 200, 299, 300] {
        controls.handle(&input, at(millis), player, &mut commands);
    }

    assert_eq!(
        moves(&commands),
        [Direction::East, Direction::East, Direction::East],
        "expected moves at 0, 150 and 300 ms"
    );
}

#[test]
fn releasing_a_key_rearms_the_gate() {
    let mut controls = Controls::default();
    let player = Some(CellCoord::new(1, 1));
    let mut commands = Vec::new();

    controls.handle(&FrameInput::key(Direction::North), at(0), player, &mut commands);
    controls.handle(&FrameInput::default(), at(20), player, &mut commands);
    controls.handle(&FrameInput::key(Direction::South), at(40), player, &mut commands);

    assert_eq!(moves(&commands), [Direction::North, Direction::South]);
}

#[test]
fn pointer_takes_precedence_over_keyboard() {
    let mut controls = Controls::default();
    let input = FrameInput {
        keys: KeyState::single(Direction::West),
        pointer: Some(CellCoord::new(8, 2)),
        ..FrameInput::default()
    };
    let mut commands = Vec::new();

    controls.handle(&input, at(0), Some(CellCoord::new(2, 2)), &mut commands);

    assert_eq!(commands, [Command::MovePlayer { direction: Direction::East }]);
}

#[test]
fn diagonal_pointer_falls_back_to_keyboard() {
    let mut controls = Controls::default();
    let input = FrameInput {
        keys: KeyState::single(Direction::South),
        pointer: Some(CellCoord::new(4, 4)),
        ..FrameInput::default()
    };
    let mut commands = Vec::new();

    controls.handle(&input, at(0), Some(CellCoord::new(2, 2)), &mut commands);

    assert_eq!(moves(&commands), [Direction::South]);
}

#[test]
fn pointer_repeats_at_the_pointer_rate() {
    let mut controls = Controls::default();
    let input = FrameInput {
        pointer: Some(CellCoord::new(1, 9)),
        ..FrameInput::default()
    };
    let mut commands = Vec::new();

    for millis in [0, 60, 100, 150, 200] {
        controls.handle(&input, at(millis), Some(CellCoord::new(1, 1)), &mut commands);
    }

    assert_eq!(moves(&commands).len(), 3, "expected moves at 0, 100 and 200 ms");
}

#[test]
fn movement_is_ignored_without_a_player() {
    let mut controls = Controls::default();
    let input = FrameInput {
        navigation: NavigationKeys {
            next: true,
            ..NavigationKeys::default()
        },
        ..FrameInput::key(Direction::East)
    };
    let mut commands = Vec::new();

    controls.handle(&input, at(0), None, &mut commands);

    assert_eq!(commands, [Command::NextLevel]);
}

#[test]
fn navigation_keys_are_debounced() {
    let mut controls = Controls::default();
    let input = FrameInput {
        navigation: NavigationKeys {
            reset: true,
            ..NavigationKeys::default()
        },
        ..FrameInput::default()
    };
    let mut commands = Vec::new();

    for millis in [0, 16, 32, 48, 150] {
        controls.handle(&input, at(millis), None, &mut commands);
    }

    assert_eq!(commands, [Command::ResetLevel, Command::ResetLevel]);
}

#[test]
fn held_key_solves_a_level_through_the_world() {
    let mut world = World::from_text(";corridor\n######\n#@ $.#\n######\n;next\n#@#\n");
    let mut controls = Controls::default();
    let input = FrameInput::key(Direction::East);
    let mut events = Vec::new();

    for frame in 0..30u64 {
        let mut commands = Vec::new();
        controls.handle(&input, at(frame * 16), query::player(&world), &mut commands);
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
    }

    assert!(query::is_solved(&world));
    assert_eq!(query::player(&world), Some(CellCoord::new(3, 1)));
    assert_eq!(query::crate_cells(&world), [CellCoord::new(4, 1)]);
}
