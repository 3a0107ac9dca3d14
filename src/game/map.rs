//! Grid, tile and coordinate types.

use serde::Serialize;

use crate::game::{PlayerId, Shape, MAX_PLAYERS};

/// Number of unit kinds tracked per player on every tile.
pub const UNIT_KINDS: usize = 1;

/// A coordinate on the grid.
///
/// `i` is the column and `j` the row. Rows are sheared: the display column of
/// a tile is `2 * i + j`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Coord {
    /// Column.
    pub i: i32,
    /// Row.
    pub j: i32,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(i: i32, j: i32) -> Self {
        Self { i, j }
    }

    /// Offset this coordinate by a delta.
    #[must_use]
    pub const fn offset(self, di: i32, dj: i32) -> Self {
        Self::new(self.i + di, self.j + dj)
    }
}

/// Kind of unit a player can hold on a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum UnitKind {
    /// General population; doubles as fighting strength.
    Citizen = 0,
}

impl UnitKind {
    /// Index into a tile's per-player unit row.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Terrain class of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum TerrainClass {
    /// Outside the map shape. Never visible, never holds anything.
    Unusable = 0,
    /// Open land without a settlement. Units may live here but do not grow.
    Unclaimed = 1,
    /// Settled land. Population grows here.
    Claimed = 2,
    /// Mountains. Visible but never holds units.
    Impassable = 3,
}

impl TerrainClass {
    /// Whether units can live on this terrain.
    #[must_use]
    pub const fn is_inhabitable(self) -> bool {
        matches!(self, TerrainClass::Unclaimed | TerrainClass::Claimed)
    }

    /// Whether this terrain is drawn and can hold the cursor.
    #[must_use]
    pub const fn is_visible(self) -> bool {
        !matches!(self, TerrainClass::Unusable)
    }

    /// Maximum total citizens the terrain supports.
    #[must_use]
    pub const fn capacity(self) -> u32 {
        match self {
            TerrainClass::Claimed => 499,
            TerrainClass::Unclaimed => 99,
            TerrainClass::Unusable | TerrainClass::Impassable => 0,
        }
    }
}

/// A single tile of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// Terrain class.
    pub class: TerrainClass,
    /// Settlement claimant, or the last player to hold the tile alone.
    pub owner: Option<PlayerId>,
    /// Unit counts indexed by player, then by [`UnitKind`].
    pub units: [[u32; UNIT_KINDS]; MAX_PLAYERS],
}

impl Tile {
    /// Create an empty tile of the given class.
    #[must_use]
    pub const fn new(class: TerrainClass) -> Self {
        Self {
            class,
            owner: None,
            units: [[0; UNIT_KINDS]; MAX_PLAYERS],
        }
    }

    /// Create an unusable tile.
    #[must_use]
    pub const fn unusable() -> Self {
        Self::new(TerrainClass::Unusable)
    }

    /// Create an empty unclaimed tile.
    #[must_use]
    pub const fn unclaimed() -> Self {
        Self::new(TerrainClass::Unclaimed)
    }

    /// Create an impassable tile.
    #[must_use]
    pub const fn impassable() -> Self {
        Self::new(TerrainClass::Impassable)
    }

    /// Create a settlement held by `player` with the given citizens.
    #[must_use]
    pub const fn settlement(player: PlayerId, citizens: u32) -> Self {
        let mut tile = Self::new(TerrainClass::Claimed);
        tile.owner = Some(player);
        tile.units[player as usize][UnitKind::Citizen.index()] = citizens;
        tile
    }

    /// Citizens held by `player`.
    #[must_use]
    #[inline]
    pub const fn citizens(&self, player: PlayerId) -> u32 {
        self.units[player as usize][UnitKind::Citizen.index()]
    }

    /// Set the citizens held by `player`.
    #[inline]
    pub fn set_citizens(&mut self, player: PlayerId, count: u32) {
        self.units[player as usize][UnitKind::Citizen.index()] = count;
    }

    /// Total citizens on the tile across all players.
    #[must_use]
    pub fn total_citizens(&self) -> u32 {
        self.units
            .iter()
            .map(|row| row[UnitKind::Citizen.index()])
            .fold(0u32, u32::saturating_add)
    }

    /// Citizens on the tile that do not belong to `player`.
    #[must_use]
    pub fn enemies_of(&self, player: PlayerId) -> u32 {
        self.total_citizens() - self.citizens(player)
    }

    /// Players holding at least one citizen here.
    pub fn occupants(&self) -> impl Iterator<Item = PlayerId> + '_ {
        (0..MAX_PLAYERS)
            .filter(|&p| self.units[p][UnitKind::Citizen.index()] > 0)
            .filter_map(|p| PlayerId::try_from(p).ok())
    }

    /// The only player present, if exactly one player holds citizens here.
    #[must_use]
    pub fn sole_occupant(&self) -> Option<PlayerId> {
        let mut occupants = self.occupants();
        let first = occupants.next()?;
        occupants.next().is_none().then_some(first)
    }

    /// Whether two or more players hold citizens here.
    #[must_use]
    pub fn is_contested(&self) -> bool {
        self.occupants().nth(1).is_some()
    }

    /// Room left for `player`'s citizens before the terrain capacity is hit.
    #[must_use]
    pub const fn room_for(&self, player: PlayerId) -> u32 {
        self.class.capacity().saturating_sub(self.citizens(player))
    }

    /// Whether every unit count on the tile is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.iter().flatten().all(|&n| n == 0)
    }
}

/// The simulation grid: a fixed `width × height` array of tiles plus the
/// shape that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    /// Width in tiles (storage columns).
    width: i32,
    /// Height in tiles.
    height: i32,
    /// Map shape; fixes land validity and adjacency.
    shape: Shape,
    /// Tiles stored in row-major order.
    tiles: Vec<Tile>,
}

impl Grid {
    /// Create a grid whose land tiles are unclaimed and everything else is
    /// unusable.
    ///
    /// Returns `None` if width or height is not positive.
    #[must_use]
    pub fn new(shape: Shape, width: i32, height: i32) -> Option<Self> {
        if width <= 0 || height <= 0 {
            return None;
        }

        let tiles = (0..height)
            .flat_map(|j| (0..width).map(move |i| Coord::new(i, j)))
            .map(|c| Tile::new(shape.terrain(c, width, height)))
            .collect();

        Some(Self {
            width,
            height,
            shape,
            tiles,
        })
    }

    /// Width of the grid in tiles.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Height of the grid in tiles.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Shape of the grid.
    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.shape
    }

    /// Raw tiles in row-major order.
    #[must_use]
    #[inline]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Mutable raw tiles in row-major order.
    #[must_use]
    #[inline]
    pub fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }

    /// Check if a coordinate is within the grid bounds.
    #[must_use]
    pub const fn in_bounds(&self, c: Coord) -> bool {
        c.i >= 0 && c.j >= 0 && c.i < self.width && c.j < self.height
    }

    /// Row-major index of a coordinate.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn index(&self, c: Coord) -> Option<usize> {
        if self.in_bounds(c) {
            Some((c.j * self.width + c.i) as usize)
        } else {
            None
        }
    }

    /// Coordinate of a row-major index.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const fn coord_of(&self, index: usize) -> Coord {
        let width = self.width.unsigned_abs() as usize;
        Coord::new((index % width) as i32, (index / width) as i32)
    }

    /// Tile at the coordinate.
    #[must_use]
    pub fn get(&self, c: Coord) -> Option<&Tile> {
        self.index(c).map(|idx| &self.tiles[idx])
    }

    /// Mutable tile at the coordinate.
    #[must_use]
    pub fn get_mut(&mut self, c: Coord) -> Option<&mut Tile> {
        self.index(c).map(|idx| &mut self.tiles[idx])
    }

    /// Terrain class at the coordinate; out-of-grid is unusable.
    #[must_use]
    pub fn class_at(&self, c: Coord) -> TerrainClass {
        self.get(c).map_or(TerrainClass::Unusable, |t| t.class)
    }

    /// Replace the tile at the coordinate.
    ///
    /// Returns `false` if the coordinate is out of bounds.
    pub fn set(&mut self, c: Coord, tile: Tile) -> bool {
        if let Some(idx) = self.index(c) {
            self.tiles[idx] = tile;
            true
        } else {
            false
        }
    }

    /// All coordinates in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + use<> {
        let width = self.width;
        (0..self.height).flat_map(move |j| (0..width).map(move |i| Coord::new(i, j)))
    }

    /// Iterate over all coordinates and tiles.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Tile)> {
        self.tiles
            .iter()
            .enumerate()
            .map(|(idx, tile)| (self.coord_of(idx), tile))
    }

    /// In-grid neighbours of a coordinate under the grid's shape topology.
    pub fn neighbors(&self, c: Coord) -> impl Iterator<Item = Coord> + '_ {
        let (adjacent, count) = self.shape.neighbors(c);
        adjacent
            .into_iter()
            .take(count)
            .filter(move |&n| self.in_bounds(n))
    }

    /// In-grid coordinates within `radius` steps of `c`, row-major.
    pub fn ball(&self, c: Coord, radius: i32) -> impl Iterator<Item = Coord> + '_ {
        let radius = radius.max(0);
        (-radius..=radius)
            .flat_map(move |dj| (-radius..=radius).map(move |di| c.offset(di, dj)))
            .filter(move |&n| self.in_bounds(n) && self.shape.distance(c, n) <= radius)
    }

    /// Citizens of every player summed over inhabitable tiles.
    #[must_use]
    pub fn populations(&self) -> [u64; MAX_PLAYERS] {
        let mut totals = [0u64; MAX_PLAYERS];
        for tile in self.tiles.iter().filter(|t| t.class.is_inhabitable()) {
            for (p, total) in totals.iter_mut().enumerate() {
                *total += u64::from(tile.units[p][UnitKind::Citizen.index()]);
            }
        }
        totals
    }

    /// Count of tiles with the given terrain class.
    #[must_use]
    pub fn count_class(&self, class: TerrainClass) -> usize {
        self.tiles.iter().filter(|t| t.class == class).count()
    }

    /// Land tile closest to the mean land coordinate.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn center(&self) -> Coord {
        let land: Vec<Coord> = self
            .iter()
            .filter(|(_, t)| t.class.is_visible())
            .map(|(c, _)| c)
            .collect();
        if land.is_empty() {
            return Coord::new(self.width / 2, self.height / 2);
        }
        let n = land.len() as f64;
        let mean_i = land.iter().map(|c| f64::from(c.i)).sum::<f64>() / n;
        let mean_j = land.iter().map(|c| f64::from(c.j)).sum::<f64>() / n;
        let target = Coord::new(mean_i.round() as i32, mean_j.round() as i32);
        land.into_iter()
            .min_by_key(|&c| (self.shape.distance(c, target), c.j, c.i))
            .unwrap_or(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terrain_flags() {
        assert!(TerrainClass::Claimed.is_inhabitable());
        assert!(TerrainClass::Unclaimed.is_inhabitable());
        assert!(!TerrainClass::Impassable.is_inhabitable());
        assert!(!TerrainClass::Unusable.is_inhabitable());
        assert!(TerrainClass::Impassable.is_visible());
        assert!(!TerrainClass::Unusable.is_visible());
        assert!(TerrainClass::Claimed.capacity() > TerrainClass::Unclaimed.capacity());
    }

    #[test]
    fn test_tile_occupants() {
        let mut tile = Tile::unclaimed();
        assert_eq!(tile.sole_occupant(), None);
        assert!(!tile.is_contested());
        assert!(tile.is_empty());

        tile.set_citizens(2, 10);
        assert_eq!(tile.sole_occupant(), Some(2));
        assert!(!tile.is_contested());

        tile.set_citizens(5, 3);
        assert_eq!(tile.sole_occupant(), None);
        assert!(tile.is_contested());
        assert_eq!(tile.total_citizens(), 13);
        assert_eq!(tile.enemies_of(2), 3);
        assert_eq!(tile.occupants().collect::<Vec<_>>(), vec![2, 5]);
    }

    #[test]
    fn test_settlement() {
        let tile = Tile::settlement(3, 40);
        assert_eq!(tile.class, TerrainClass::Claimed);
        assert_eq!(tile.owner, Some(3));
        assert_eq!(tile.citizens(3), 40);
        assert_eq!(tile.room_for(3), 459);
    }

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(Shape::Rhombus, 14, 16).unwrap();
        assert_eq!(grid.width(), 14);
        assert_eq!(grid.height(), 16);
        assert_eq!(grid.tiles().len(), 14 * 16);
        assert_eq!(grid.count_class(TerrainClass::Unclaimed), 14 * 16);
    }

    #[test]
    fn test_grid_zero_size() {
        assert!(Grid::new(Shape::Rhombus, 0, 10).is_none());
        assert!(Grid::new(Shape::Hex, 10, -1).is_none());
    }

    #[test]
    fn test_grid_bounds_and_index() {
        let grid = Grid::new(Shape::Rhombus, 14, 14).unwrap();
        assert!(grid.in_bounds(Coord::new(0, 0)));
        assert!(grid.in_bounds(Coord::new(13, 13)));
        assert!(!grid.in_bounds(Coord::new(14, 0)));
        assert!(!grid.in_bounds(Coord::new(0, -1)));
        assert_eq!(grid.index(Coord::new(3, 2)), Some(2 * 14 + 3));
        assert_eq!(grid.coord_of(2 * 14 + 3), Coord::new(3, 2));
        assert_eq!(grid.class_at(Coord::new(-5, 3)), TerrainClass::Unusable);
    }

    #[test]
    fn test_grid_neighbors_clipped_at_edge() {
        let grid = Grid::new(Shape::Rhombus, 14, 14).unwrap();
        let corner: Vec<_> = grid.neighbors(Coord::new(0, 0)).collect();
        assert_eq!(corner.len(), 2);
        let inner: Vec<_> = grid.neighbors(Coord::new(5, 5)).collect();
        assert_eq!(inner.len(), 4);
    }

    #[test]
    fn test_ball_sizes() {
        let rhombus = Grid::new(Shape::Rhombus, 14, 14).unwrap();
        assert_eq!(rhombus.ball(Coord::new(6, 6), 1).count(), 5);
        assert_eq!(rhombus.ball(Coord::new(6, 6), 2).count(), 13);
        assert_eq!(rhombus.ball(Coord::new(0, 0), 1).count(), 3);

        let hex = Grid::new(Shape::Hex, 15, 15).unwrap();
        assert_eq!(hex.ball(Coord::new(7, 7), 1).count(), 7);
        assert_eq!(hex.ball(Coord::new(7, 7), 2).count(), 19);
    }

    #[test]
    fn test_populations() {
        let mut grid = Grid::new(Shape::Rhombus, 14, 14).unwrap();
        grid.set(Coord::new(1, 1), Tile::settlement(0, 30));
        grid.set(Coord::new(2, 1), Tile::settlement(1, 12));
        let mut shared = Tile::unclaimed();
        shared.set_citizens(0, 5);
        shared.set_citizens(1, 7);
        grid.set(Coord::new(3, 1), shared);

        let pops = grid.populations();
        assert_eq!(pops[0], 35);
        assert_eq!(pops[1], 19);
        assert_eq!(pops[2], 0);
    }
}
