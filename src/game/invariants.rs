//! Game invariants - sanity checks that detect bugs.
//!
//! The simulation phases preserve these by construction. A violation means a
//! phase is broken, never that a player did something unusual.

use crate::game::{FlagSet, GameState, Grid, MAX_PLAYERS, TerrainClass};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check the invariants of a grid and the flag sets placed on it.
#[must_use]
pub fn check_grid(grid: &Grid, flags: &[FlagSet]) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    for (coord, tile) in grid.iter() {
        if !tile.class.is_inhabitable() {
            if !tile.is_empty() {
                violations.push(InvariantViolation {
                    message: format!(
                        "{:?} tile at {coord:?} holds {} citizens",
                        tile.class,
                        tile.total_citizens()
                    ),
                });
            }
            continue;
        }

        let cap = tile.class.capacity();
        for p in 0..MAX_PLAYERS {
            let Ok(player) = u8::try_from(p) else {
                continue;
            };
            let own = tile.citizens(player);
            if own > cap {
                violations.push(InvariantViolation {
                    message: format!(
                        "Player {player} has {own} citizens at {coord:?}, capacity {cap}"
                    ),
                });
            }
        }

        if let Some(sole) = tile.sole_occupant()
            && tile.owner != Some(sole)
        {
            violations.push(InvariantViolation {
                message: format!(
                    "Tile at {coord:?} held only by player {sole} is owned by {:?}",
                    tile.owner
                ),
            });
        }

        if tile.class == TerrainClass::Claimed && tile.owner.is_none() {
            violations.push(InvariantViolation {
                message: format!("Settlement at {coord:?} has no owner"),
            });
        }
    }

    for set in flags {
        let mut counted = 0;
        for (coord, _) in set.iter() {
            counted += 1;
            if !grid.class_at(coord).is_inhabitable() {
                violations.push(InvariantViolation {
                    message: format!(
                        "Player {} has a flag on uninhabitable tile {coord:?}",
                        set.owner()
                    ),
                });
            }
        }
        if counted != set.len() {
            violations.push(InvariantViolation {
                message: format!(
                    "Player {} flag count {} disagrees with {counted} stored flags",
                    set.owner(),
                    set.len()
                ),
            });
        }
    }

    violations
}

/// Check all game invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(state: &GameState) -> Vec<InvariantViolation> {
    let mut violations = check_grid(&state.grid, &state.flags);
    if !state.grid.in_bounds(state.cursor) || !state.grid.class_at(state.cursor).is_visible() {
        violations.push(InvariantViolation {
            message: format!("Cursor at {:?} is not on a visible tile", state.cursor),
        });
    }
    violations
}

/// Assert all game invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(state: &GameState) {
    let violations = check_invariants(state);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Game invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_state: &GameState) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{add_flag, Coord, FlagKind, Shape, Tile};

    fn valid_grid() -> Grid {
        let mut grid = Grid::new(Shape::Rhombus, 14, 14).unwrap();
        grid.set(Coord::new(3, 3), Tile::settlement(0, 100));
        grid.set(Coord::new(9, 9), Tile::settlement(1, 100));
        grid
    }

    #[test]
    fn test_valid_grid_passes() {
        let grid = valid_grid();
        let mut flags = vec![FlagSet::new(0, &grid)];
        add_flag(&grid, &mut flags[0], Coord::new(5, 5), FlagKind::Power);
        assert!(check_grid(&grid, &flags).is_empty());
    }

    #[test]
    fn test_citizens_on_mountain_detected() {
        let mut grid = valid_grid();
        let mut rock = Tile::impassable();
        rock.set_citizens(0, 3);
        grid.set(Coord::new(4, 4), rock);
        let violations = check_grid(&grid, &[]);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("Impassable"));
    }

    #[test]
    fn test_capacity_exactly_at_max_passes() {
        let mut grid = valid_grid();
        let cap = TerrainClass::Claimed.capacity();
        grid.set(Coord::new(3, 3), Tile::settlement(0, cap));
        assert!(check_grid(&grid, &[]).is_empty());

        grid.set(Coord::new(3, 3), Tile::settlement(0, cap + 1));
        let violations = check_grid(&grid, &[]);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("capacity"));
    }

    #[test]
    fn test_contested_tile_may_exceed_capacity_in_total() {
        let mut grid = valid_grid();
        let cap = TerrainClass::Unclaimed.capacity();
        let mut fight = Tile::unclaimed();
        fight.set_citizens(0, cap);
        fight.set_citizens(1, cap);
        grid.set(Coord::new(6, 6), fight);
        assert!(check_grid(&grid, &[]).is_empty());
    }

    #[test]
    fn test_wrong_owner_detected() {
        let mut grid = valid_grid();
        if let Some(tile) = grid.get_mut(Coord::new(3, 3)) {
            tile.owner = Some(1);
        }
        let violations = check_grid(&grid, &[]);
        assert!(violations.iter().any(|v| v.message.contains("owned by")));
    }

    #[test]
    fn test_flag_on_mountain_detected() {
        let mut grid = valid_grid();
        let mut flags = vec![FlagSet::new(0, &grid)];
        add_flag(&grid, &mut flags[0], Coord::new(5, 5), FlagKind::Power);
        // The mountain appears under an existing flag.
        grid.set(Coord::new(5, 5), Tile::impassable());
        let violations = check_grid(&grid, &flags);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("flag"));
    }

    #[test]
    fn test_multiple_violations_all_reported() {
        let mut grid = valid_grid();
        let mut rock = Tile::impassable();
        rock.set_citizens(2, 1);
        grid.set(Coord::new(4, 4), rock);
        grid.set(Coord::new(3, 3), Tile::settlement(0, 10_000));
        assert_eq!(check_grid(&grid, &[]).len(), 2);
    }

    #[test]
    fn test_display_prefix() {
        let v = InvariantViolation {
            message: "x".to_string(),
        };
        assert_eq!(v.to_string(), "Invariant violation: x");
    }
}
