//! Map-shape policy: land validity, adjacency and starting anchors.
//!
//! All shapes live on the same sheared coordinate system, where the display
//! column of `(i, j)` is `2 * i + j`. Rhombus and rectangle maps use the four
//! axis neighbours; hexagon maps add the two diagonal neighbours
//! `(i + 1, j - 1)` and `(i - 1, j + 1)`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::game::{Coord, TerrainClass, MAX_PLAYERS};

/// Smallest accepted width or height.
pub const MIN_DIM: i32 = 14;

/// Largest accepted width or height.
pub const MAX_DIM: i32 = 80;

/// Starting anchors keep this stencil radius of land around them.
const ANCHOR_CLEARANCE: i32 = 2;

/// Rhombus and rectangle maps offer more starts once both sides reach this.
const LARGE_MAP_EXTENT: i32 = 28;

/// Shape of the playable area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    /// Full storage grid; shows as a diamond on screen.
    Rhombus,
    /// Band that shows as a rectangle on screen.
    Rect,
    /// Hexagon around the grid centre.
    Hex,
}

impl Shape {
    /// Number of neighbours each interior tile has.
    #[must_use]
    pub const fn neighbor_count(self) -> usize {
        match self {
            Shape::Hex => 6,
            Shape::Rhombus | Shape::Rect => 4,
        }
    }

    /// Adjacent coordinates, without bounds checks.
    ///
    /// Returns a fixed-size array and count to avoid heap allocation.
    #[must_use]
    #[inline]
    pub const fn neighbors(self, c: Coord) -> ([Coord; 6], usize) {
        let result = [
            c.offset(1, 0),
            c.offset(-1, 0),
            c.offset(0, -1),
            c.offset(0, 1),
            c.offset(1, -1),
            c.offset(-1, 1),
        ];
        (result, self.neighbor_count())
    }

    /// Number of steps between two coordinates under this shape's adjacency.
    #[must_use]
    pub const fn distance(self, a: Coord, b: Coord) -> i32 {
        let di = b.i - a.i;
        let dj = b.j - a.j;
        match self {
            Shape::Hex => (di.abs() + dj.abs() + (di + dj).abs()) / 2,
            Shape::Rhombus | Shape::Rect => di.abs() + dj.abs(),
        }
    }

    /// Storage width for a requested map width.
    ///
    /// Rectangle maps are sheared, so they need `(h + 1) / 2` extra columns
    /// to show the requested width on every row.
    #[must_use]
    pub fn storage_width(self, width: i32, height: i32) -> i32 {
        match self {
            Shape::Rect => (width + (height + 1) / 2).min(MAX_DIM - 1),
            Shape::Rhombus | Shape::Hex => width,
        }
    }

    /// Whether the coordinate is land on a `width × height` storage grid.
    #[must_use]
    pub fn is_land(self, c: Coord, width: i32, height: i32) -> bool {
        if c.i < 0 || c.j < 0 || c.i >= width || c.j >= height {
            return false;
        }
        match self {
            Shape::Rhombus => true,
            Shape::Rect => {
                let inner = width - (height + 1) / 2;
                let column = 2 * c.i + c.j;
                inner > 0 && column >= height - 1 && column < height - 1 + 2 * inner
            }
            Shape::Hex => {
                let center = Coord::new(width / 2, height / 2);
                self.distance(center, c) <= hex_radius(width, height)
            }
        }
    }

    /// Initial terrain of a coordinate: unclaimed land or unusable.
    #[must_use]
    pub fn terrain(self, c: Coord, width: i32, height: i32) -> TerrainClass {
        if self.is_land(c, width, height) {
            TerrainClass::Unclaimed
        } else {
            TerrainClass::Unusable
        }
    }

    /// Number of starting locations the shape offers at this size.
    ///
    /// Non-decreasing in both `width` and `height`.
    #[must_use]
    pub fn available_locations(self, width: i32, height: i32) -> usize {
        let base = match self {
            Shape::Hex => 6,
            Shape::Rhombus | Shape::Rect => {
                if width.min(height) >= LARGE_MAP_EXTENT {
                    8
                } else {
                    4
                }
            }
        };
        base.min(MAX_PLAYERS)
    }

    /// Candidate starting coordinates, one per available location.
    ///
    /// Each anchor is the land tile nearest to a corner or edge target whose
    /// whole clearance ball is land. Fewer anchors are returned only when the
    /// map is too small to fit them.
    #[must_use]
    pub fn anchors(self, width: i32, height: i32) -> Vec<Coord> {
        let count = self.available_locations(width, height);
        let targets = self.anchor_targets(width, height, count);

        let candidates: Vec<Coord> = (0..height)
            .flat_map(|j| (0..width).map(move |i| Coord::new(i, j)))
            .filter(|&c| self.ball_is_land(c, ANCHOR_CLEARANCE, width, height))
            .collect();

        let mut anchors: Vec<Coord> = Vec::with_capacity(targets.len());
        for target in targets {
            let best = candidates
                .iter()
                .filter(|c| !anchors.contains(c))
                .min_by_key(|&&c| (self.distance(c, target), c.j, c.i))
                .copied();
            if let Some(c) = best {
                anchors.push(c);
            }
        }
        anchors
    }

    /// Whether every coordinate within `radius` steps of `c` is land.
    fn ball_is_land(self, c: Coord, radius: i32, width: i32, height: i32) -> bool {
        (-radius..=radius).all(|dj| {
            (-radius..=radius).all(|di| {
                let n = c.offset(di, dj);
                self.distance(c, n) > radius || self.is_land(n, width, height)
            })
        })
    }

    /// Inclusive column range of land on row `j`.
    fn row_span(self, j: i32, width: i32, height: i32) -> Option<(i32, i32)> {
        let mut land = (0..width).filter(|&i| self.is_land(Coord::new(i, j), width, height));
        let lo = land.next()?;
        let hi = land.next_back().unwrap_or(lo);
        Some((lo, hi))
    }

    /// Ideal anchor positions before snapping to valid land.
    fn anchor_targets(self, width: i32, height: i32, count: usize) -> Vec<Coord> {
        let m = ANCHOR_CLEARANCE;
        match self {
            Shape::Hex => {
                let center = Coord::new(width / 2, height / 2);
                let r = (hex_radius(width, height) - m).max(0);
                vec![
                    center.offset(-r, 0),
                    center.offset(r, 0),
                    center.offset(0, -r),
                    center.offset(0, r),
                    center.offset(r, -r),
                    center.offset(-r, r),
                ]
            }
            Shape::Rhombus | Shape::Rect => {
                let top = m;
                let bottom = height - 1 - m;
                let middle = height / 2;
                let span = |j| self.row_span(j, width, height).unwrap_or((0, width - 1));
                let (top_lo, top_hi) = span(top);
                let (bot_lo, bot_hi) = span(bottom);
                let (mid_lo, mid_hi) = span(middle);

                let mut targets = vec![
                    Coord::new(top_lo + m, top),
                    Coord::new(bot_hi - m, bottom),
                    Coord::new(top_hi - m, top),
                    Coord::new(bot_lo + m, bottom),
                ];
                if count > 4 {
                    targets.extend([
                        Coord::new(mid_lo + m, middle),
                        Coord::new(mid_hi - m, middle),
                        Coord::new(i32::midpoint(top_lo, top_hi), top),
                        Coord::new(i32::midpoint(bot_lo, bot_hi), bottom),
                    ]);
                }
                targets
            }
        }
    }
}

/// Radius of the hexagon inscribed in a storage grid.
const fn hex_radius(width: i32, height: i32) -> i32 {
    let extent = if width < height { width } else { height };
    (extent - 1) / 2
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Shape::Rhombus => "rhombus",
            Shape::Rect => "rect",
            Shape::Hex => "hex",
        };
        f.write_str(name)
    }
}

impl FromStr for Shape {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rhombus" | "diamond" => Ok(Shape::Rhombus),
            "rect" | "rectangle" => Ok(Shape::Rect),
            "hex" | "hexagon" => Ok(Shape::Hex),
            other => Err(ConfigError::UnknownShape(other.to_string())),
        }
    }
}
