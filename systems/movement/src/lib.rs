#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure input system that turns raw per-frame input into movement and
//! navigation commands.
//!
//! The system owns the debounce gates for pointer, keyboard and navigation
//! keys. Time is supplied by the caller as a monotonic [`Duration`] so that
//! replays and tests stay deterministic.

use std::time::Duration;

use sokoban_core::{CellCoord, Command, Direction};
use tracing::trace;

/// Debounce applied to pointer driven movement.
pub const POINTER_DELAY: Duration = Duration::from_millis(100);

/// Debounce applied to keyboard driven movement.
pub const KEYBOARD_DELAY: Duration = Duration::from_millis(150);

/// Debounce applied to the previous, next and reset keys.
pub const SPECIAL_DELAY: Duration = Duration::from_millis(150);

/// Non-blocking debounce gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputDelay {
    duration: Duration,
    last: Option<Duration>,
}

impl InputDelay {
    /// Creates an armed gate that opens at most once per `duration`.
    #[must_use]
    pub const fn new(duration: Duration) -> Self {
        Self {
            duration,
            last: None,
        }
    }

    /// Returns `true` when at least `duration` passed since the gate last opened.
    ///
    /// Opening the gate restarts the wait. A freshly created or reset gate
    /// opens immediately.
    pub fn elapsed(&mut self, now: Duration) -> bool {
        match self.last {
            Some(last) if now.saturating_sub(last) < self.duration => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// Re-arms the gate so the next call to [`InputDelay::elapsed`] succeeds.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Arrow keys held during a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyState {
    /// Whether the left key is held.
    pub left: bool,
    /// Whether the right key is held.
    pub right: bool,
    /// Whether the up key is held.
    pub up: bool,
    /// Whether the down key is held.
    pub down: bool,
}

impl KeyState {
    /// Key state with only the key matching `direction` held.
    #[must_use]
    pub const fn single(direction: Direction) -> Self {
        Self {
            left: matches!(direction, Direction::West),
            right: matches!(direction, Direction::East),
            up: matches!(direction, Direction::North),
            down: matches!(direction, Direction::South),
        }
    }

    /// Reports whether any arrow key is held.
    #[must_use]
    pub const fn any(&self) -> bool {
        self.left || self.right || self.up || self.down
    }

    fn held(&self) -> impl Iterator<Item = Direction> {
        [
            (self.left, Direction::West),
            (self.right, Direction::East),
            (self.up, Direction::North),
            (self.down, Direction::South),
        ]
        .into_iter()
        .filter_map(|(held, direction)| held.then_some(direction))
    }
}

/// Derives a movement direction from held arrow keys.
///
/// Exactly one held key yields its direction; no keys or several keys yield
/// `None`.
#[must_use]
pub fn direction_from_keys(keys: KeyState) -> Option<Direction> {
    let mut held = keys.held();
    match (held.next(), held.next()) {
        (Some(direction), None) => Some(direction),
        _ => None,
    }
}

/// Derives a movement direction from a pointer pressed over `pointer`.
///
/// The axis with the strictly larger tile distance wins. Equal distances,
/// including a press on the player itself, yield `None`.
#[must_use]
pub fn direction_from_pointer(player: CellCoord, pointer: CellCoord) -> Option<Direction> {
    let columns = i64::from(pointer.column()) - i64::from(player.column());
    let rows = i64::from(pointer.row()) - i64::from(player.row());

    let delta = match columns.abs().cmp(&rows.abs()) {
        std::cmp::Ordering::Greater => (signum(columns), 0),
        std::cmp::Ordering::Less => (0, signum(rows)),
        std::cmp::Ordering::Equal => return None,
    };
    Direction::from_delta(delta.0, delta.1)
}

fn signum(value: i64) -> i32 {
    match value {
        0 => 0,
        value if value > 0 => 1,
        _ => -1,
    }
}

/// Navigation keys held during a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NavigationKeys {
    /// Whether the previous-level key is held.
    pub previous: bool,
    /// Whether the next-level key is held.
    pub next: bool,
    /// Whether the reset key is held.
    pub reset: bool,
}

impl NavigationKeys {
    /// Reports whether any navigation key is held.
    #[must_use]
    pub const fn any(&self) -> bool {
        self.previous || self.next || self.reset
    }

    fn command(&self) -> Option<Command> {
        match (self.previous, self.next, self.reset) {
            (true, false, false) => Some(Command::PreviousLevel),
            (false, true, false) => Some(Command::NextLevel),
            (false, false, true) => Some(Command::ResetLevel),
            _ => None,
        }
    }
}

/// Raw input captured by an adapter for a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Arrow keys held this frame.
    pub keys: KeyState,
    /// Tile under the pointer while it is pressed, `None` when released.
    pub pointer: Option<CellCoord>,
    /// Navigation keys held this frame.
    pub navigation: NavigationKeys,
}

impl FrameInput {
    /// Frame with a single arrow key held.
    #[must_use]
    pub const fn key(direction: Direction) -> Self {
        Self {
            keys: KeyState::single(direction),
            pointer: None,
            navigation: NavigationKeys {
                previous: false,
                next: false,
                reset: false,
            },
        }
    }
}

/// Pure system that debounces input and emits player commands.
#[derive(Clone, Debug)]
pub struct Controls {
    pointer: InputDelay,
    keyboard: InputDelay,
    special: InputDelay,
}

impl Controls {
    /// Creates controls with custom debounce durations.
    #[must_use]
    pub const fn with_delays(pointer: Duration, keyboard: Duration, special: Duration) -> Self {
        Self {
            pointer: InputDelay::new(pointer),
            keyboard: InputDelay::new(keyboard),
            special: InputDelay::new(special),
        }
    }

    /// Consumes one frame of input and emits at most one navigation command
    /// followed by at most one movement command.
    ///
    /// `player` is the tile of the player on the active board; without it
    /// movement input is ignored. Pointer input is considered before the
    /// keyboard and a released input re-arms its gate.
    pub fn handle(
        &mut self,
        input: &FrameInput,
        now: Duration,
        player: Option<CellCoord>,
        out: &mut Vec<Command>,
    ) {
        if let Some(command) = self.navigation(input.navigation, now) {
            trace!(?command, "navigation_requested");
            out.push(command);
        }

        let Some(player) = player else {
            return;
        };

        let direction = self
            .pointer_direction(input.pointer, player, now)
            .or_else(|| self.keyboard_direction(input.keys, now));
        if let Some(direction) = direction {
            trace!(?direction, "move_requested");
            out.push(Command::MovePlayer { direction });
        }
    }

    fn navigation(&mut self, keys: NavigationKeys, now: Duration) -> Option<Command> {
        if !keys.any() {
            self.special.reset();
            return None;
        }
        if !self.special.elapsed(now) {
            return None;
        }
        keys.command()
    }

    fn pointer_direction(
        &mut self,
        pointer: Option<CellCoord>,
        player: CellCoord,
        now: Duration,
    ) -> Option<Direction> {
        let Some(pointer) = pointer else {
            self.pointer.reset();
            return None;
        };
        if !self.pointer.elapsed(now) {
            return None;
        }
        direction_from_pointer(player, pointer)
    }

    fn keyboard_direction(&mut self, keys: KeyState, now: Duration) -> Option<Direction> {
        if !keys.any() {
            self.keyboard.reset();
            return None;
        }
        if !self.keyboard.elapsed(now) {
            return None;
        }
        direction_from_keys(keys)
    }
}

impl Default for Controls {
    fn default() -> Self {
        Self::with_delays(POINTER_DELAY, KEYBOARD_DELAY, SPECIAL_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_opens_immediately_then_waits() {
        let mut delay = InputDelay::new(Duration::from_millis(150));

        assert!(delay.elapsed(Duration::from_millis(10)));
        assert!(!delay.elapsed(Duration::from_millis(100)));
        assert!(!delay.elapsed(Duration::from_millis(159)));
        assert!(delay.elapsed(Duration::from_millis(160)));
        assert!(!delay.elapsed(Duration::from_millis(200)));
    }

    #[test]
    fn reset_rearms_the_delay() {
        let mut delay = InputDelay::new(Duration::from_secs(1));
        assert!(delay.elapsed(Duration::ZERO));
        assert!(!delay.elapsed(Duration::from_millis(1)));

        delay.reset();

        assert!(delay.elapsed(Duration::from_millis(2)));
    }

    #[test]
    fn time_running_backwards_keeps_the_gate_closed() {
        let mut delay = InputDelay::new(Duration::from_millis(100));
        assert!(delay.elapsed(Duration::from_secs(5)));

        assert!(!delay.elapsed(Duration::from_secs(1)));
    }

    #[test]
    fn single_key_yields_its_direction() {
        for direction in Direction::ALL {
            assert_eq!(
                direction_from_keys(KeyState::single(direction)),
                Some(direction)
            );
        }
    }

    #[test]
    fn no_keys_or_several_keys_yield_nothing() {
        assert_eq!(direction_from_keys(KeyState::default()), None);
        assert_eq!(
            direction_from_keys(KeyState {
                left: true,
                up: true,
                ..KeyState::default()
            }),
            None
        );
        assert_eq!(
            direction_from_keys(KeyState {
                left: true,
                right: true,
                ..KeyState::default()
            }),
            None
        );
    }

    #[test]
    fn pointer_picks_the_dominant_axis() {
        let player = CellCoord::new(5, 5);

        assert_eq!(
            direction_from_pointer(player, CellCoord::new(9, 6)),
            Some(Direction::East)
        );
        assert_eq!(
            direction_from_pointer(player, CellCoord::new(0, 3)),
            Some(Direction::West)
        );
        assert_eq!(
            direction_from_pointer(player, CellCoord::new(4, 0)),
            Some(Direction::North)
        );
        assert_eq!(
            direction_from_pointer(player, CellCoord::new(5, 6)),
            Some(Direction::South)
        );
    }

    #[test]
    fn pointer_diagonal_or_on_player_yields_nothing() {
        let player = CellCoord::new(5, 5);

        assert_eq!(direction_from_pointer(player, CellCoord::new(7, 7)), None);
        assert_eq!(direction_from_pointer(player, CellCoord::new(3, 7)), None);
        assert_eq!(direction_from_pointer(player, player), None);
    }

    #[test]
    fn conflicting_navigation_keys_yield_nothing() {
        let keys = NavigationKeys {
            previous: true,
            next: true,
            reset: false,
        };

        assert!(keys.any());
        assert_eq!(keys.command(), None);
    }
}
