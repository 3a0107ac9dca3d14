//! Standing orders players attach to tiles.
//!
//! Each player owns one [`FlagSet`]. Flags never hold units; the march phase
//! and the autopilot read them to decide where citizens go.

use rand::Rng;
use tracing::debug;

use crate::game::{Coord, Grid, PlayerId};

/// Kind of standing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FlagKind {
    /// Reinforce and hold this tile.
    Power = 0,
}

impl FlagKind {
    /// Every flag kind.
    pub const ALL: [FlagKind; 1] = [FlagKind::Power];

    /// Bit of this kind in a tile's flag byte.
    #[must_use]
    pub const fn mask(self) -> u8 {
        1 << (self as u8)
    }
}

/// One player's flags, a kind bitmask per tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSet {
    owner: PlayerId,
    width: i32,
    height: i32,
    bits: Vec<u8>,
    count: usize,
}

impl FlagSet {
    /// Create an empty flag set covering a grid.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn new(owner: PlayerId, grid: &Grid) -> Self {
        let len = (grid.width() * grid.height()).max(0) as usize;
        Self {
            owner,
            width: grid.width(),
            height: grid.height(),
            bits: vec![0; len],
            count: 0,
        }
    }

    /// Player that placed these flags.
    #[must_use]
    pub const fn owner(&self) -> PlayerId {
        self.owner
    }

    #[allow(clippy::cast_sign_loss)]
    const fn slot(&self, c: Coord) -> Option<usize> {
        if c.i < 0 || c.j < 0 || c.i >= self.width || c.j >= self.height {
            None
        } else {
            Some((c.j * self.width + c.i) as usize)
        }
    }

    /// Whether a flag of `kind` sits at `c`.
    #[must_use]
    pub fn contains(&self, c: Coord, kind: FlagKind) -> bool {
        self.slot(c)
            .is_some_and(|idx| self.bits[idx] & kind.mask() != 0)
    }

    /// Whether any flag sits at `c`.
    #[must_use]
    pub fn has_any(&self, c: Coord) -> bool {
        self.slot(c).is_some_and(|idx| self.bits[idx] != 0)
    }

    /// Number of flags across all tiles and kinds.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Whether the set holds no flags.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Flags in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, FlagKind)> + '_ {
        let width = self.width.unsigned_abs() as usize;
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, bits)| **bits != 0)
            .flat_map(move |(idx, &bits)| {
                #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                let c = Coord::new((idx % width) as i32, (idx / width) as i32);
                FlagKind::ALL
                    .into_iter()
                    .filter(move |kind| bits & kind.mask() != 0)
                    .map(move |kind| (c, kind))
            })
    }

    fn insert(&mut self, c: Coord, kind: FlagKind) -> bool {
        let Some(idx) = self.slot(c) else {
            return false;
        };
        if self.bits[idx] & kind.mask() != 0 {
            return false;
        }
        self.bits[idx] |= kind.mask();
        self.count += 1;
        true
    }

    fn remove(&mut self, c: Coord, kind: FlagKind) -> bool {
        let Some(idx) = self.slot(c) else {
            return false;
        };
        if self.bits[idx] & kind.mask() == 0 {
            return false;
        }
        self.bits[idx] &= !kind.mask();
        self.count -= 1;
        true
    }
}

/// Place a flag of `kind` at `c`.
///
/// Returns `true` if a flag was added. Adding an existing flag or flagging a
/// tile that cannot hold units leaves the set unchanged.
pub fn add_flag(grid: &Grid, flags: &mut FlagSet, c: Coord, kind: FlagKind) -> bool {
    if !grid.class_at(c).is_inhabitable() {
        return false;
    }
    flags.insert(c, kind)
}

/// Remove the flag of `kind` at `c`.
///
/// Returns `true` if a flag was removed; removing an absent flag is a no-op.
pub fn remove_flag(grid: &Grid, flags: &mut FlagSet, c: Coord, kind: FlagKind) -> bool {
    if !grid.in_bounds(c) {
        return false;
    }
    flags.remove(c, kind)
}

/// Add the flag if absent, remove it otherwise. Returns whether it is now set.
pub fn toggle_flag(grid: &Grid, flags: &mut FlagSet, c: Coord, kind: FlagKind) -> bool {
    if flags.contains(c, kind) {
        remove_flag(grid, flags, c, kind);
        false
    } else {
        add_flag(grid, flags, c, kind)
    }
}

/// Remove each flag independently with probability `p`.
///
/// `p` is clamped to `[0, 1]`: `1.0` empties the set, `0.0` keeps it intact.
/// Flags are visited in row-major order so a seeded `rng` replays exactly.
/// Returns the number of flags removed.
pub fn remove_flags_with_prob<R: Rng + ?Sized>(
    grid: &Grid,
    flags: &mut FlagSet,
    p: f64,
    rng: &mut R,
) -> usize {
    let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
    let doomed: Vec<(Coord, FlagKind)> = flags
        .iter()
        .filter(|_| rng.gen_bool(p))
        .collect();
    let removed = doomed
        .into_iter()
        .filter(|&(c, kind)| remove_flag(grid, flags, c, kind))
        .count();
    debug!(player = flags.owner(), p, removed, "cleared flags");
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Shape, Tile};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn grid() -> Grid {
        let mut grid = Grid::new(Shape::Rhombus, 14, 14).unwrap();
        grid.set(Coord::new(7, 7), Tile::impassable());
        grid
    }

    #[test]
    fn test_add_flag_is_idempotent() {
        let grid = grid();
        let mut flags = FlagSet::new(0, &grid);
        let c = Coord::new(3, 4);
        assert!(add_flag(&grid, &mut flags, c, FlagKind::Power));
        assert!(!add_flag(&grid, &mut flags, c, FlagKind::Power));
        assert_eq!(flags.len(), 1);
        assert!(flags.contains(c, FlagKind::Power));
    }

    #[test]
    fn test_remove_flag_is_idempotent() {
        let grid = grid();
        let mut flags = FlagSet::new(0, &grid);
        let c = Coord::new(3, 4);
        add_flag(&grid, &mut flags, c, FlagKind::Power);
        assert!(remove_flag(&grid, &mut flags, c, FlagKind::Power));
        assert!(!remove_flag(&grid, &mut flags, c, FlagKind::Power));
        assert!(flags.is_empty());
        assert!(!flags.has_any(c));
    }

    #[test]
    fn test_flags_rejected_off_land() {
        let grid = grid();
        let mut flags = FlagSet::new(0, &grid);
        assert!(!add_flag(&grid, &mut flags, Coord::new(7, 7), FlagKind::Power));
        assert!(!add_flag(&grid, &mut flags, Coord::new(-1, 2), FlagKind::Power));
        assert!(!add_flag(&grid, &mut flags, Coord::new(2, 40), FlagKind::Power));
        assert!(flags.is_empty());
    }

    #[test]
    fn test_toggle_flag() {
        let grid = grid();
        let mut flags = FlagSet::new(1, &grid);
        let c = Coord::new(1, 1);
        assert!(toggle_flag(&grid, &mut flags, c, FlagKind::Power));
        assert!(!toggle_flag(&grid, &mut flags, c, FlagKind::Power));
        assert!(flags.is_empty());
    }

    #[test]
    fn test_iter_row_major() {
        let grid = grid();
        let mut flags = FlagSet::new(0, &grid);
        for c in [Coord::new(5, 2), Coord::new(1, 9), Coord::new(0, 2)] {
            add_flag(&grid, &mut flags, c, FlagKind::Power);
        }
        let coords: Vec<Coord> = flags.iter().map(|(c, _)| c).collect();
        assert_eq!(
            coords,
            vec![Coord::new(0, 2), Coord::new(5, 2), Coord::new(1, 9)]
        );
    }

    #[test]
    fn test_remove_with_prob_extremes() {
        let grid = grid();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut flags = FlagSet::new(0, &grid);
        for i in 0..10 {
            add_flag(&grid, &mut flags, Coord::new(i, 0), FlagKind::Power);
        }
        assert_eq!(remove_flags_with_prob(&grid, &mut flags, 0.0, &mut rng), 0);
        assert_eq!(flags.len(), 10);
        assert_eq!(remove_flags_with_prob(&grid, &mut flags, 1.0, &mut rng), 10);
        assert!(flags.is_empty());
    }

    #[test]
    fn test_remove_with_prob_half_is_seeded() {
        let grid = grid();
        let mut a = FlagSet::new(0, &grid);
        for c in grid.coords().filter(|c| c.j < 4) {
            add_flag(&grid, &mut a, c, FlagKind::Power);
        }
        let mut b = a.clone();
        let removed_a = remove_flags_with_prob(&grid, &mut a, 0.5, &mut ChaCha8Rng::seed_from_u64(1));
        let removed_b = remove_flags_with_prob(&grid, &mut b, 0.5, &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(a, b);
        assert_eq!(removed_a, removed_b);
        assert!(removed_a > 0 && removed_a < 56);
    }
}
