#![no_main]

//! Simulation step fuzzer.
//!
//! Scatters arbitrary populations and flags over a small grid, then runs
//! marching and the local phase, checking invariants after every step.

use arbitrary::Arbitrary;
use tilewar::game::invariants::check_grid;
use tilewar::game::{
    add_flag, kings_move, simulate, Coord, FlagKind, FlagSet, Grid, Rules, Shape, Tile,
};
use libfuzzer_sys::fuzz_target;

/// One populated tile.
#[derive(Arbitrary, Debug)]
struct Placement {
    i: u8,
    j: u8,
    player: u8,
    citizens: u16,
    settlement: bool,
}

/// Structured input for simulation fuzzing.
#[derive(Arbitrary, Debug)]
struct SimulationInput {
    /// Pick the hexagon stencil instead of the rhombus.
    hex: bool,
    /// Populated tiles.
    placements: Vec<Placement>,
    /// Flags as (player, i, j).
    flags: Vec<(u8, u8, u8)>,
    /// Number of steps to simulate.
    steps: u8,
}

fuzz_target!(|input: SimulationInput| {
    let shape = if input.hex { Shape::Hex } else { Shape::Rhombus };
    let Some(mut grid) = Grid::new(shape, 15, 15) else {
        return;
    };
    let rules = Rules::default();

    // Cap values to avoid excessive runtime
    for p in input.placements.iter().take(40) {
        let c = Coord::new(i32::from(p.i % 15), i32::from(p.j % 15));
        if !grid.class_at(c).is_inhabitable() {
            continue;
        }
        let player = p.player % 4;
        let mut tile = if p.settlement {
            Tile::settlement(player, 0)
        } else {
            Tile::unclaimed()
        };
        let cap = tile.class.capacity();
        tile.set_citizens(player, u32::from(p.citizens).min(cap));
        tile.owner = Some(player);
        grid.set(c, tile);
    }

    let mut flags: Vec<FlagSet> = (0..4).map(|p| FlagSet::new(p, &grid)).collect();
    for &(player, i, j) in input.flags.iter().take(20) {
        let c = Coord::new(i32::from(i % 15), i32::from(j % 15));
        add_flag(&grid, &mut flags[usize::from(player % 4)], c, FlagKind::Power);
    }

    let violations = check_grid(&grid, &flags);
    assert!(violations.is_empty(), "Invariants violated at start: {violations:?}");

    let before: u64 = grid.populations().iter().sum();
    for step in 0..(input.steps % 30) {
        kings_move(&mut grid, &flags, &rules);
        simulate(&mut grid, &rules);

        let violations = check_grid(&grid, &flags);
        assert!(
            violations.is_empty(),
            "Invariants violated after step {step}: {violations:?}"
        );
    }

    // Growth is bounded by capacity everywhere.
    let after: u64 = grid.populations().iter().sum();
    let bound = grid
        .tiles()
        .iter()
        .map(|t| u64::from(t.class.capacity()) * 4)
        .sum::<u64>();
    assert!(after <= before.max(bound), "population {after} exceeds {bound}");
});
