#![no_main]

//! Full game fuzzer.
//!
//! Interleaves arbitrary player commands with timer ticks on a generated
//! map. The state checks its own invariants after every simulation step in
//! debug builds; this target also checks them after every command.

use arbitrary::Arbitrary;
use tilewar::game::invariants::check_invariants;
use tilewar::{Command, Direction, GameConfig, GameState, Shape, Speed};
use libfuzzer_sys::fuzz_target;

/// A fuzzer-generated input event.
#[derive(Arbitrary, Debug, Clone, Copy)]
enum FuzzEvent {
    Left,
    Right,
    Up,
    Down,
    UpRight,
    DownLeft,
    Faster,
    Slower,
    Pause,
    Flag,
    ClearAll,
    ClearHalf,
    Build,
    /// Count this many timer ticks.
    Ticks(u8),
}

/// Structured input for game fuzzing.
#[derive(Arbitrary, Debug)]
struct GameInput {
    seed: u64,
    shape: u8,
    events: Vec<FuzzEvent>,
}

fuzz_target!(|input: GameInput| {
    let shape = match input.shape % 3 {
        0 => Shape::Rhombus,
        1 => Shape::Rect,
        _ => Shape::Hex,
    };
    let config = GameConfig {
        seed: input.seed,
        width: 16,
        height: 16,
        shape,
        speed: Speed::Fastest,
        ..GameConfig::default()
    };
    let Ok(mut game) = GameState::new(&config) else {
        return;
    };

    for event in input.events.iter().take(200) {
        let command = match *event {
            FuzzEvent::Left => Command::Move(Direction::Left),
            FuzzEvent::Right => Command::Move(Direction::Right),
            FuzzEvent::Up => Command::Move(Direction::Up),
            FuzzEvent::Down => Command::Move(Direction::Down),
            FuzzEvent::UpRight => Command::Move(Direction::UpRight),
            FuzzEvent::DownLeft => Command::Move(Direction::DownLeft),
            FuzzEvent::Faster => Command::Faster,
            FuzzEvent::Slower => Command::Slower,
            FuzzEvent::Pause => Command::TogglePause,
            FuzzEvent::Flag => Command::ToggleFlag,
            FuzzEvent::ClearAll => Command::ClearFlags,
            FuzzEvent::ClearHalf => Command::ClearHalfFlags,
            FuzzEvent::Build => Command::Build,
            FuzzEvent::Ticks(n) => {
                for _ in 0..n {
                    game.timer_tick();
                }
                continue;
            }
        };
        game.apply(command);

        let violations = check_invariants(&game);
        assert!(
            violations.is_empty(),
            "Invariants violated after {command:?}: {violations:?}"
        );
    }
});
