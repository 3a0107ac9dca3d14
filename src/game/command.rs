//! Commands the player at the keyboard can issue.

use crate::game::{Coord, Grid};

/// Cursor movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// One column left.
    Left,
    /// One column right.
    Right,
    /// One row up, keeping the display column as close as possible.
    Up,
    /// One row down, keeping the display column as close as possible.
    Down,
    /// Up and to the right along a hexagon edge. Hexagon maps only.
    UpRight,
    /// Down and to the left along a hexagon edge. Hexagon maps only.
    DownLeft,
}

/// A command issued by the controlled player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Move the cursor.
    Move(Direction),
    /// Raise the speed by one step.
    Faster,
    /// Lower the speed by one step.
    Slower,
    /// Pause, or resume at the speed before the pause.
    TogglePause,
    /// Add or remove a flag under the cursor.
    ToggleFlag,
    /// Remove every flag.
    ClearFlags,
    /// Remove each flag with probability one half.
    ClearHalfFlags,
    /// Found a settlement under the cursor.
    Build,
    /// Leave the game.
    Quit,
}

/// Whether the host loop keeps running after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Keep running.
    Continue,
    /// Stop the loop.
    Quit,
}

/// Cursor position after moving from `cursor` in `direction`.
///
/// Rows are sheared, so vertical steps shift the column on alternate rows to
/// stay under the same screen column. The result is clamped to the grid;
/// moves onto tiles that are not visible leave the cursor where it was.
///
/// The diagonal directions follow the two extra edges of the six-neighbour
/// stencil and leave the cursor in place on four-neighbour maps.
#[must_use]
pub fn step_cursor(grid: &Grid, cursor: Coord, direction: Direction) -> Coord {
    let (mut i, mut j) = (cursor.i, cursor.j);
    match direction {
        Direction::UpRight | Direction::DownLeft => {
            if grid.shape().neighbor_count() < 6 {
                return cursor;
            }
            let next = if direction == Direction::UpRight {
                cursor.offset(1, -1)
            } else {
                cursor.offset(-1, 1)
            };
            return if grid.class_at(next).is_visible() {
                next
            } else {
                cursor
            };
        }
        Direction::Left => i -= 1,
        Direction::Right => i += 1,
        Direction::Up => {
            j -= 1;
            if j % 2 == 1 {
                i += 1;
            }
        }
        Direction::Down => {
            j += 1;
            if j % 2 == 0 {
                i -= 1;
            }
        }
    }
    let next = Coord::new(
        i.clamp(0, (grid.width() - 1).max(0)),
        j.clamp(0, (grid.height() - 1).max(0)),
    );
    if grid.class_at(next).is_visible() {
        next
    } else {
        cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Shape, Tile};

    #[test]
    fn test_horizontal_moves() {
        let grid = Grid::new(Shape::Rhombus, 14, 14).unwrap();
        let c = Coord::new(5, 5);
        assert_eq!(step_cursor(&grid, c, Direction::Left), Coord::new(4, 5));
        assert_eq!(step_cursor(&grid, c, Direction::Right), Coord::new(6, 5));
    }

    #[test]
    fn test_vertical_moves_alternate_shift() {
        let grid = Grid::new(Shape::Rhombus, 14, 14).unwrap();
        // Up onto an odd row shifts right.
        assert_eq!(step_cursor(&grid, Coord::new(5, 6), Direction::Up), Coord::new(6, 5));
        // Up onto an even row keeps the column.
        assert_eq!(step_cursor(&grid, Coord::new(5, 5), Direction::Up), Coord::new(5, 4));
        // Down onto an even row shifts left.
        assert_eq!(step_cursor(&grid, Coord::new(5, 5), Direction::Down), Coord::new(4, 6));
        // Down onto an odd row keeps the column.
        assert_eq!(step_cursor(&grid, Coord::new(5, 6), Direction::Down), Coord::new(5, 7));
    }

    #[test]
    fn test_hex_diagonal_moves() {
        let hex = Grid::new(Shape::Hex, 15, 15).unwrap();
        let c = Coord::new(7, 7);
        assert_eq!(step_cursor(&hex, c, Direction::UpRight), Coord::new(8, 6));
        assert_eq!(step_cursor(&hex, c, Direction::DownLeft), Coord::new(6, 8));
        assert!(hex.neighbors(c).any(|n| n == Coord::new(8, 6)));
        assert!(hex.neighbors(c).any(|n| n == Coord::new(6, 8)));
        // Off the hexagon the cursor stays.
        assert_eq!(step_cursor(&hex, Coord::new(14, 7), Direction::UpRight), Coord::new(14, 7));

        let rhombus = Grid::new(Shape::Rhombus, 14, 14).unwrap();
        assert_eq!(step_cursor(&rhombus, c, Direction::UpRight), c);
        assert_eq!(step_cursor(&rhombus, c, Direction::DownLeft), c);
    }

    #[test]
    fn test_cursor_clamped_to_grid() {
        let grid = Grid::new(Shape::Rhombus, 14, 14).unwrap();
        assert_eq!(step_cursor(&grid, Coord::new(0, 3), Direction::Left), Coord::new(0, 3));
        assert_eq!(step_cursor(&grid, Coord::new(13, 3), Direction::Right), Coord::new(13, 3));
        assert_eq!(step_cursor(&grid, Coord::new(4, 0), Direction::Up), Coord::new(4, 0));
        // The row is clamped after the shift, so the column still moves.
        assert_eq!(step_cursor(&grid, Coord::new(4, 13), Direction::Down), Coord::new(3, 13));
    }

    #[test]
    fn test_cursor_skips_invisible_tiles() {
        let mut grid = Grid::new(Shape::Rhombus, 14, 14).unwrap();
        grid.set(Coord::new(6, 5), Tile::unusable());
        assert_eq!(step_cursor(&grid, Coord::new(5, 5), Direction::Right), Coord::new(5, 5));
        // Mountains are visible.
        grid.set(Coord::new(4, 5), Tile::impassable());
        assert_eq!(step_cursor(&grid, Coord::new(5, 5), Direction::Left), Coord::new(4, 5));
    }
}
