//! Strategic redistribution ("kings move").
//!
//! Once per step every player's citizens march at most one tile. Each flag
//! pulls citizens within `flag_range` steps towards it; citizens outside any
//! flag's pull reinforce fights they already take part in next door, or
//! attack an adjacent tile whose enemies they outnumber.

use std::collections::VecDeque;

use crate::game::migration::{apply_transfers, Transfer};
use crate::game::{Coord, FlagSet, Grid, PlayerId, Rules};

/// Distance marker for tiles outside every flag's pull.
pub const UNREACHED: u16 = u16::MAX;

/// Steps from every tile to the nearest flag in `flags`, walking only
/// through inhabitable tiles and stopping at `range`.
#[must_use]
pub fn flag_field(grid: &Grid, flags: &FlagSet, range: u16) -> Vec<u16> {
    let mut field = vec![UNREACHED; grid.tiles().len()];
    let mut queue = VecDeque::new();
    for (c, _) in flags.iter() {
        let Some(idx) = grid.index(c) else {
            continue;
        };
        if field[idx] == UNREACHED && grid.tiles()[idx].class.is_inhabitable() {
            field[idx] = 0;
            queue.push_back((c, 0u16));
        }
    }

    while let Some((c, dist)) = queue.pop_front() {
        if dist >= range {
            continue;
        }
        for n in grid.neighbors(c) {
            let Some(idx) = grid.index(n) else {
                continue;
            };
            if field[idx] == UNREACHED && grid.tiles()[idx].class.is_inhabitable() {
                field[idx] = dist + 1;
                queue.push_back((n, dist + 1));
            }
        }
    }
    field
}

/// Where the citizens of `player` marching out of `c` go, if anywhere.
fn destination(grid: &Grid, field: &[u16], c: Coord, player: PlayerId) -> Option<Coord> {
    let idx = grid.index(c)?;
    let own = grid.tiles()[idx].citizens(player);
    let distance = |n: Coord| grid.index(n).map_or(UNREACHED, |nidx| field[nidx]);

    let here = field[idx];
    if here != UNREACHED {
        return grid
            .neighbors(c)
            .filter(|&n| distance(n) < here)
            .min_by_key(|&n| distance(n));
    }

    let neighbours = || {
        grid.neighbors(c)
            .filter_map(|n| grid.get(n).map(|t| (n, t)))
            .filter(|(_, t)| t.class.is_inhabitable())
    };

    let reinforce = neighbours()
        .filter(|(_, t)| t.citizens(player) > 0 && t.is_contested())
        .max_by_key(|(_, t)| t.enemies_of(player))
        .map(|(n, _)| n);
    if reinforce.is_some() {
        return reinforce;
    }

    neighbours()
        .filter(|(_, t)| {
            let enemies = t.enemies_of(player);
            enemies > 0 && enemies < own
        })
        .min_by_key(|(_, t)| t.enemies_of(player))
        .map(|(n, _)| n)
}

/// Marching requests of every player, computed on the current grid.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn march_transfers(grid: &Grid, flags: &[FlagSet], rules: &Rules) -> Vec<Transfer> {
    let mut transfers = Vec::new();
    if rules.march_rate <= 0.0 {
        return transfers;
    }

    for set in flags {
        let player = set.owner();
        let field = flag_field(grid, set, rules.flag_range);

        for (c, tile) in grid.iter() {
            if !tile.class.is_inhabitable() || tile.sole_occupant() != Some(player) {
                continue;
            }
            if set.has_any(c) {
                continue;
            }
            let amount = (f64::from(tile.citizens(player)) * rules.march_rate).floor() as u32;
            if amount == 0 {
                continue;
            }
            if let Some(to) = destination(grid, &field, c, player) {
                transfers.push(Transfer {
                    from: c,
                    to,
                    player,
                    amount,
                });
            }
        }
    }
    transfers
}

/// Run the strategic redistribution phase for every player.
///
/// Returns the number of citizens moved.
pub fn kings_move(grid: &mut Grid, flags: &[FlagSet], rules: &Rules) -> u64 {
    let transfers = march_transfers(grid, flags, rules);
    apply_transfers(grid, &transfers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{add_flag, FlagKind, Shape, Tile};

    fn setup() -> (Grid, Vec<FlagSet>) {
        let grid = Grid::new(Shape::Rhombus, 14, 14).unwrap();
        let flags = (0..2).map(|p| FlagSet::new(p, &grid)).collect();
        (grid, flags)
    }

    #[test]
    fn test_flag_field_distances() {
        let (mut grid, mut flags) = setup();
        grid.set(Coord::new(5, 4), Tile::impassable());
        add_flag(&grid, &mut flags[0], Coord::new(5, 5), FlagKind::Power);
        let field = flag_field(&grid, &flags[0], 5);

        let at = |i, j| field[grid.index(Coord::new(i, j)).unwrap()];
        assert_eq!(at(5, 5), 0);
        assert_eq!(at(6, 5), 1);
        assert_eq!(at(7, 6), 3);
        assert_eq!(at(5, 4), UNREACHED);
        // Walks around the mountain.
        assert_eq!(at(5, 3), 4);
        assert_eq!(at(10, 5), 5);
        assert_eq!(at(11, 5), UNREACHED);
    }

    #[test]
    fn test_citizens_march_towards_flag() {
        let (mut grid, mut flags) = setup();
        grid.set(Coord::new(5, 5), Tile::settlement(0, 100));
        grid.set(Coord::new(7, 5), Tile::settlement(0, 100));
        add_flag(&grid, &mut flags[0], Coord::new(5, 5), FlagKind::Power);

        let moved = kings_move(&mut grid, &flags, &Rules::default());
        assert_eq!(moved, 25);
        assert_eq!(grid.get(Coord::new(5, 5)).unwrap().citizens(0), 100);
        assert_eq!(grid.get(Coord::new(6, 5)).unwrap().citizens(0), 25);
        assert_eq!(grid.get(Coord::new(7, 5)).unwrap().citizens(0), 75);
    }

    #[test]
    fn test_no_flags_no_enemies_no_march() {
        let (mut grid, flags) = setup();
        grid.set(Coord::new(5, 5), Tile::settlement(0, 100));
        assert_eq!(kings_move(&mut grid, &flags, &Rules::default()), 0);
    }

    #[test]
    fn test_attack_weaker_neighbour() {
        let (mut grid, flags) = setup();
        grid.set(Coord::new(5, 5), Tile::settlement(0, 100));
        grid.set(Coord::new(6, 5), Tile::settlement(1, 10));
        grid.set(Coord::new(4, 5), Tile::settlement(1, 200));

        let transfers = march_transfers(&grid, &flags, &Rules::default());
        let attack: Vec<_> = transfers.iter().filter(|t| t.player == 0).collect();
        assert_eq!(attack.len(), 1);
        assert_eq!(attack[0].to, Coord::new(6, 5));
        assert_eq!(attack[0].amount, 25);
    }

    #[test]
    fn test_reinforce_own_fight() {
        let (mut grid, flags) = setup();
        grid.set(Coord::new(5, 5), Tile::settlement(0, 40));
        let mut fight = Tile::unclaimed();
        fight.set_citizens(0, 10);
        fight.set_citizens(1, 60);
        grid.set(Coord::new(5, 6), fight);

        let transfers = march_transfers(&grid, &flags, &Rules::default());
        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0].to, Coord::new(5, 6));
    }

    #[test]
    fn test_player_order_does_not_matter() {
        let mut grid = Grid::new(Shape::Rhombus, 14, 14).unwrap();
        let mut flags: Vec<FlagSet> = (0..3).map(|p| FlagSet::new(p, &grid)).collect();
        grid.set(Coord::new(4, 4), Tile::settlement(0, 300));
        grid.set(Coord::new(5, 4), Tile::settlement(0, 120));
        grid.set(Coord::new(6, 4), Tile::settlement(1, 90));
        grid.set(Coord::new(6, 5), Tile::settlement(2, 200));
        grid.set(Coord::new(5, 6), Tile::settlement(2, 60));
        let mut fight = Tile::unclaimed();
        fight.set_citizens(0, 20);
        fight.set_citizens(1, 35);
        fight.set_citizens(2, 15);
        grid.set(Coord::new(5, 5), fight);
        add_flag(&grid, &mut flags[0], Coord::new(5, 5), FlagKind::Power);
        add_flag(&grid, &mut flags[1], Coord::new(5, 5), FlagKind::Power);
        add_flag(&grid, &mut flags[2], Coord::new(4, 6), FlagKind::Power);

        let rules = Rules::default();
        let mut forward = grid.clone();
        let moved_forward = kings_move(&mut forward, &flags, &rules);
        flags.reverse();
        let mut reversed = grid;
        let moved_reversed = kings_move(&mut reversed, &flags, &rules);

        assert!(moved_forward > 0);
        assert_eq!(moved_forward, moved_reversed);
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_march_conserves_population() {
        let (mut grid, mut flags) = setup();
        for (k, c) in [Coord::new(2, 2), Coord::new(3, 2), Coord::new(3, 3)].into_iter().enumerate() {
            grid.set(c, Tile::settlement(0, 50 + 30 * k as u32));
        }
        add_flag(&grid, &mut flags[0], Coord::new(6, 6), FlagKind::Power);
        let before = grid.populations();
        kings_move(&mut grid, &flags, &Rules::default());
        assert_eq!(grid.populations(), before);
    }
}
