//! Read-only snapshot handed to renderers between simulation steps.

use crate::game::{
    Coord, FlagKind, FlagSet, Grid, Outcome, PlayerId, Speed, TerrainClass, Tile, MAX_PLAYERS,
};

/// Everything a renderer may look at.
#[derive(Debug, Clone, Copy)]
pub struct GridView<'a> {
    /// The grid.
    pub grid: &'a Grid,
    /// Flags of every player, indexed by player.
    pub flags: &'a [FlagSet],
    /// Cursor of the controlled player.
    pub cursor: Coord,
    /// Current speed.
    pub speed: Speed,
    /// Latched game result.
    pub outcome: Outcome,
    /// The player at the keyboard.
    pub controlled: PlayerId,
    /// Simulation steps taken so far.
    pub tick: u64,
}

impl GridView<'_> {
    /// Whether the controlled player has a flag at `c`.
    #[must_use]
    pub fn has_flag(&self, c: Coord) -> bool {
        self.flags
            .get(usize::from(self.controlled))
            .is_some_and(|f| f.contains(c, FlagKind::Power))
    }

    /// Citizens of every player.
    #[must_use]
    pub fn populations(&self) -> [u64; MAX_PLAYERS] {
        self.grid.populations()
    }

    /// Screen column of a tile: rows are sheared by one column per row and
    /// every tile is two columns wide.
    #[must_use]
    pub const fn screen_column(c: Coord) -> i32 {
        2 * c.i + c.j
    }
}

/// Player holding the most citizens on a tile, lowest id first on ties.
#[must_use]
pub fn dominant_player(tile: &Tile) -> Option<PlayerId> {
    tile.occupants().max_by(|&a, &b| {
        tile.citizens(a)
            .cmp(&tile.citizens(b))
            .then_with(|| b.cmp(&a))
    })
}

/// Glyph for the size of a population.
#[must_use]
pub const fn density_glyph(citizens: u32) -> char {
    match citizens {
        0 => ' ',
        1..=9 => '.',
        10..=49 => ':',
        50..=149 => '*',
        150..=299 => '#',
        _ => '@',
    }
}

/// Two-character cell of one tile: a marker (flag or settlement) and a body
/// (terrain, owner digit, or `x` on a contested tile).
#[must_use]
pub fn tile_cell(view: &GridView<'_>, c: Coord) -> [char; 2] {
    let Some(tile) = view.grid.get(c) else {
        return [' ', ' '];
    };
    let marker = if view.has_flag(c) {
        '!'
    } else if tile.class == TerrainClass::Claimed {
        '+'
    } else {
        ' '
    };
    let body = match tile.class {
        TerrainClass::Unusable => ' ',
        TerrainClass::Impassable => '^',
        TerrainClass::Unclaimed | TerrainClass::Claimed => {
            if tile.is_contested() {
                'x'
            } else if let Some(p) = tile.sole_occupant() {
                char::from(b'0' + p)
            } else {
                '.'
            }
        }
    };
    [marker, body]
}

/// Cell for renderers that colour tiles by owner: like [`tile_cell`], but an
/// uncontested population is drawn by its size instead of its owner digit.
#[must_use]
pub fn density_cell(view: &GridView<'_>, c: Coord) -> [char; 2] {
    let [marker, body] = tile_cell(view, c);
    let size = view
        .grid
        .get(c)
        .and_then(|t| t.sole_occupant().map(|p| density_glyph(t.citizens(p))));
    [marker, size.unwrap_or(body)]
}

/// Plain-text picture of the grid, one line per row.
///
/// Row `j` is indented by `j` columns so neighbouring rows interlock the way
/// the sheared coordinates do. Trailing blanks are trimmed.
#[must_use]
pub fn render_text(view: &GridView<'_>) -> String {
    let grid = view.grid;
    let mut out = String::new();
    for j in 0..grid.height() {
        let mut line: String = " ".repeat(usize::try_from(j).unwrap_or(0));
        for i in 0..grid.width() {
            line.extend(tile_cell(view, Coord::new(i, j)));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{add_flag, Shape};

    fn view_of<'a>(grid: &'a Grid, flags: &'a [FlagSet]) -> GridView<'a> {
        GridView {
            grid,
            flags,
            cursor: Coord::new(0, 0),
            speed: Speed::Normal,
            outcome: Outcome::Ongoing,
            controlled: 0,
            tick: 0,
        }
    }

    #[test]
    fn test_density_glyphs_increase() {
        let glyphs: Vec<char> = [0, 5, 20, 100, 200, 400].map(density_glyph).to_vec();
        assert_eq!(glyphs, vec![' ', '.', ':', '*', '#', '@']);
    }

    #[test]
    fn test_density_cell_shows_population_size() {
        let mut grid = Grid::new(Shape::Rhombus, 14, 14).unwrap();
        grid.set(Coord::new(2, 2), Tile::settlement(1, 200));
        grid.set(Coord::new(3, 2), Tile::impassable());
        let mut fight = Tile::unclaimed();
        fight.set_citizens(0, 5);
        fight.set_citizens(1, 5);
        grid.set(Coord::new(4, 2), fight);
        let flags = Vec::new();
        let view = view_of(&grid, &flags);

        assert_eq!(tile_cell(&view, Coord::new(2, 2)), ['+', '1']);
        assert_eq!(density_cell(&view, Coord::new(2, 2)), ['+', '#']);
        assert_eq!(density_cell(&view, Coord::new(3, 2)), [' ', '^']);
        assert_eq!(density_cell(&view, Coord::new(4, 2)), [' ', 'x']);
        assert_eq!(density_cell(&view, Coord::new(5, 2)), [' ', '.']);
    }

    #[test]
    fn test_dominant_player() {
        let mut tile = Tile::unclaimed();
        assert_eq!(dominant_player(&tile), None);
        tile.set_citizens(2, 10);
        tile.set_citizens(5, 30);
        assert_eq!(dominant_player(&tile), Some(5));
        tile.set_citizens(2, 30);
        assert_eq!(dominant_player(&tile), Some(2));
    }

    #[test]
    fn test_render_text_layout() {
        let mut grid = Grid::new(Shape::Rhombus, 14, 14).unwrap();
        grid.set(Coord::new(0, 0), Tile::settlement(3, 50));
        grid.set(Coord::new(1, 0), Tile::impassable());
        let mut fight = Tile::unclaimed();
        fight.set_citizens(0, 5);
        fight.set_citizens(1, 5);
        grid.set(Coord::new(0, 1), fight);
        let mut flags = vec![FlagSet::new(0, &grid)];
        add_flag(&grid, &mut flags[0], Coord::new(2, 0), FlagKind::Power);

        let text = render_text(&view_of(&grid, &flags));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 14);
        assert!(lines[0].starts_with("+3 ^!."));
        assert!(lines[1].starts_with("  x ."));
        assert_eq!(lines[13].len(), 13 + 2 * 14);
    }

    #[test]
    fn test_hex_render_hides_unusable() {
        let grid = Grid::new(Shape::Hex, 15, 15).unwrap();
        let flags = Vec::new();
        let text = render_text(&view_of(&grid, &flags));
        let first = text.lines().next().unwrap();
        // Top row of a hexagon starts halfway across.
        assert!(first.trim_start().len() < 2 * 15);
        assert_eq!(GridView::screen_column(Coord::new(3, 2)), 8);
    }
}
