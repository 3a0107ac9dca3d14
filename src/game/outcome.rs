//! Win/loss evaluation.

use serde::Serialize;

use crate::game::{Grid, PlayerId};

/// Result of a game from the controlled player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Nobody has won yet.
    Ongoing,
    /// Every other player has been wiped out.
    Victory,
    /// The controlled player has been wiped out.
    Defeat,
}

impl Outcome {
    /// Whether the game has been decided.
    #[must_use]
    pub const fn is_decided(self) -> bool {
        !matches!(self, Outcome::Ongoing)
    }
}

/// Evaluate the grid for `controlled`.
///
/// Defeat takes precedence, so the two results can never both hold: a
/// controlled player with no citizens cannot also be the last one standing.
#[must_use]
pub fn evaluate(grid: &Grid, controlled: PlayerId) -> Outcome {
    let populations = grid.populations();
    if populations[usize::from(controlled)] == 0 {
        return Outcome::Defeat;
    }
    let rivals_alive = populations
        .iter()
        .enumerate()
        .any(|(p, &pop)| p != usize::from(controlled) && pop > 0);
    if rivals_alive {
        Outcome::Ongoing
    } else {
        Outcome::Victory
    }
}

/// Players with at least one citizen left.
#[must_use]
pub fn survivors(grid: &Grid) -> Vec<PlayerId> {
    grid.populations()
        .iter()
        .enumerate()
        .filter(|&(_, &pop)| pop > 0)
        .filter_map(|(p, _)| PlayerId::try_from(p).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Coord, Shape, Tile};

    fn grid() -> Grid {
        Grid::new(Shape::Rhombus, 14, 14).unwrap()
    }

    #[test]
    fn test_ongoing() {
        let mut grid = grid();
        grid.set(Coord::new(1, 1), Tile::settlement(0, 10));
        grid.set(Coord::new(9, 9), Tile::settlement(3, 10));
        assert_eq!(evaluate(&grid, 0), Outcome::Ongoing);
        assert_eq!(survivors(&grid), vec![0, 3]);
    }

    #[test]
    fn test_victory() {
        let mut grid = grid();
        grid.set(Coord::new(1, 1), Tile::settlement(0, 10));
        assert_eq!(evaluate(&grid, 0), Outcome::Victory);
        assert!(Outcome::Victory.is_decided());
    }

    #[test]
    fn test_defeat() {
        let mut grid = grid();
        grid.set(Coord::new(9, 9), Tile::settlement(2, 10));
        assert_eq!(evaluate(&grid, 0), Outcome::Defeat);
    }

    #[test]
    fn test_empty_grid_is_defeat_not_victory() {
        assert_eq!(evaluate(&grid(), 0), Outcome::Defeat);
        assert!(!Outcome::Ongoing.is_decided());
    }
}
