//! Deterministic map generation.
//!
//! The whole map follows from the request and its seed: terrain, the chosen
//! starting territories, their quality ranks and starting populations.

// Map generation uses intentional casts for population scaling
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::debug;

use crate::error::MapGenError;
use crate::game::{Coord, Grid, PlayerId, Shape, TerrainClass, Tile, CONTROLLED_PLAYER};

/// Share of land tiles that become mountains.
const MOUNTAIN_PROBABILITY: f64 = 0.08;

/// Stencil radius over which a start's inhabitable neighbourhood is counted.
const QUALITY_RADIUS: i32 = 4;

/// Quality points per inhabitable tile near a start.
const QUALITY_PER_TILE: i32 = 10;

/// Quality points lost per step away from the map centre.
const QUALITY_PER_STEP: i32 = 3;

/// Citizens on the home tile of a player with no inequality applied.
pub const BASE_CITIZENS: u32 = 160;

/// Starting population spread for each inequality level.
pub const INEQUALITY_SPREAD: [f64; 5] = [0.0, 0.15, 0.3, 0.5, 0.75];

/// Highest inequality level.
pub const MAX_INEQUALITY: u8 = 4;

/// Fully resolved parameters of one generated map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MapRequest {
    /// Seed of every random choice.
    pub seed: u64,
    /// Storage width.
    pub width: i32,
    /// Height.
    pub height: i32,
    /// Map shape.
    pub shape: Shape,
    /// Number of players.
    pub players: usize,
    /// Quality rank of the controlled player's start, 1 being the best.
    pub quality_rank: usize,
    /// Inequality level, `0..=MAX_INEQUALITY`.
    pub inequality: u8,
}

/// One player's starting territory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StartLocation {
    /// Player starting here.
    pub player: PlayerId,
    /// Home tile at the centre of the territory.
    pub home: Coord,
    /// Quality score of the home tile.
    pub quality: i32,
    /// Rank of the quality among all starts, 1 being the best.
    pub rank: usize,
    /// Citizens placed on the home tile.
    pub citizens: u32,
}

/// A generated map and its starting territories.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedMap {
    /// The initial grid.
    pub grid: Grid,
    /// Starting territories, indexed by player.
    pub starts: Vec<StartLocation>,
    /// Stencil radius of every starting territory.
    pub radius: i32,
}

/// Strategic value of starting at `c`: roomy neighbourhoods near the centre
/// score highest.
#[must_use]
pub fn quality_score(grid: &Grid, c: Coord) -> i32 {
    let room = grid
        .ball(c, QUALITY_RADIUS)
        .filter(|&n| grid.class_at(n).is_inhabitable())
        .count() as i32;
    let from_center = grid.shape().distance(c, grid.center());
    QUALITY_PER_TILE * room - QUALITY_PER_STEP * from_center
}

/// Generate the map described by `request`.
///
/// # Errors
///
/// Returns an error if the grid cannot be built, the shape offers fewer
/// starting locations than players, or the quality rank does not exist.
pub fn generate_map(request: &MapRequest) -> Result<GeneratedMap, MapGenError> {
    let mut rng = ChaCha8Rng::seed_from_u64(request.seed);
    let mut grid = Grid::new(request.shape, request.width, request.height).ok_or(
        MapGenError::EmptyGrid {
            width: request.width,
            height: request.height,
        },
    )?;

    generate_terrain(&mut grid, &mut rng);

    let anchors = request.shape.anchors(request.width, request.height);
    if anchors.len() < request.players || request.players == 0 {
        return Err(MapGenError::NotEnoughLocations {
            found: anchors.len(),
            needed: request.players,
        });
    }
    if request.quality_rank == 0 || request.quality_rank > request.players {
        return Err(MapGenError::RankOutOfRange {
            rank: request.quality_rank,
            players: request.players,
        });
    }

    let scored: Vec<(Coord, i32)> = anchors
        .iter()
        .map(|&c| (c, quality_score(&grid, c)))
        .collect();
    let mut chosen = select_spread(&grid, &scored, request.players);
    chosen.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| (a.0.j, a.0.i).cmp(&(b.0.j, b.0.i))));

    // Rank index for every player: the controlled player takes the requested
    // rank, the others share the rest in seeded order.
    let mut others: Vec<usize> = (0..request.players)
        .filter(|&r| r != request.quality_rank - 1)
        .collect();
    others.shuffle(&mut rng);
    let mut ranks = Vec::with_capacity(request.players);
    ranks.push(request.quality_rank - 1);
    ranks.extend(others);

    let radius = start_radius(&grid, &chosen, &mut rng);
    let spread = INEQUALITY_SPREAD[usize::from(request.inequality.min(MAX_INEQUALITY))];

    let mut starts = Vec::with_capacity(request.players);
    for (player, &rank) in ranks.iter().enumerate() {
        let player = player as PlayerId;
        let u: f64 = rng.gen_range(-1.0..=1.0);
        let citizens = if player == CONTROLLED_PLAYER {
            BASE_CITIZENS
        } else {
            ((f64::from(BASE_CITIZENS) * (1.0 + spread * u)).round() as u32).max(1)
        };
        let (home, quality) = chosen[rank];
        starts.push(StartLocation {
            player,
            home,
            quality,
            rank: rank + 1,
            citizens,
        });
    }

    for start in &starts {
        settle(&mut grid, start, radius);
    }

    debug!(
        seed = request.seed,
        shape = %request.shape,
        players = request.players,
        radius,
        "map generated"
    );
    Ok(GeneratedMap {
        grid,
        starts,
        radius,
    })
}

/// Turn some land into mountains.
fn generate_terrain(grid: &mut Grid, rng: &mut ChaCha8Rng) {
    for tile in grid.tiles_mut() {
        if tile.class == TerrainClass::Unclaimed && rng.gen_bool(MOUNTAIN_PROBABILITY) {
            *tile = Tile::impassable();
        }
    }
}

/// Greedy farthest-point selection of `count` anchors, starting from the
/// best one.
fn select_spread(grid: &Grid, scored: &[(Coord, i32)], count: usize) -> Vec<(Coord, i32)> {
    let shape = grid.shape();
    let mut chosen: Vec<(Coord, i32)> = Vec::with_capacity(count);
    let mut remaining: Vec<(Coord, i32)> = scored.to_vec();

    while chosen.len() < count && !remaining.is_empty() {
        let best = remaining
            .iter()
            .enumerate()
            .max_by(|(ia, (ca, qa)), (ib, (cb, qb))| {
                let spacing = |c: &Coord| {
                    chosen
                        .iter()
                        .map(|(s, _)| shape.distance(*s, *c))
                        .min()
                        .unwrap_or(0)
                };
                spacing(ca)
                    .cmp(&spacing(cb))
                    .then_with(|| qa.cmp(qb))
                    .then_with(|| ib.cmp(ia))
            })
            .map(|(idx, _)| idx);
        let Some(idx) = best else {
            break;
        };
        chosen.push(remaining.remove(idx));
    }
    chosen
}

/// Seeded territory radius, shrunk so that no two territories touch.
fn start_radius(grid: &Grid, chosen: &[(Coord, i32)], rng: &mut ChaCha8Rng) -> i32 {
    let drawn = rng.gen_range(1..=2);
    let shape = grid.shape();
    let closest = chosen
        .iter()
        .enumerate()
        .flat_map(|(k, (a, _))| chosen[k + 1..].iter().map(move |(b, _)| shape.distance(*a, *b)))
        .min();
    match closest {
        Some(d) => drawn.min((d - 1) / 2).max(0),
        None => drawn,
    }
}

/// Clear a start's territory to settlements of its player.
fn settle(grid: &mut Grid, start: &StartLocation, radius: i32) {
    let area: Vec<Coord> = grid
        .ball(start.home, radius)
        .filter(|&c| grid.class_at(c).is_visible())
        .collect();
    for c in area {
        let citizens = if c == start.home {
            start.citizens
        } else {
            start.citizens / 4
        };
        grid.set(c, Tile::settlement(start.player, citizens));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(seed: u64) -> MapRequest {
        MapRequest {
            seed,
            width: 21,
            height: 21,
            shape: Shape::Rhombus,
            players: 4,
            quality_rank: 1,
            inequality: 0,
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = generate_map(&request(42)).unwrap();
        let b = generate_map(&request(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = generate_map(&request(42)).unwrap();
        let b = generate_map(&request(43)).unwrap();
        assert_ne!(a.grid, b.grid);
    }

    #[test]
    fn test_starts_are_settled() {
        let map = generate_map(&request(7)).unwrap();
        assert_eq!(map.starts.len(), 4);
        assert!((1..=2).contains(&map.radius));
        for start in &map.starts {
            let home = map.grid.get(start.home).unwrap();
            assert_eq!(home.class, TerrainClass::Claimed);
            assert_eq!(home.owner, Some(start.player));
            assert_eq!(home.citizens(start.player), start.citizens);
        }
        let mut ranks: Vec<usize> = map.starts.iter().map(|s| s.rank).collect();
        ranks.sort_unstable();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_requested_rank_goes_to_controlled_player() {
        for rank in 1..=4 {
            let map = generate_map(&MapRequest {
                quality_rank: rank,
                ..request(11)
            })
            .unwrap();
            assert_eq!(map.starts[0].rank, rank);
        }
    }

    #[test]
    fn test_inequality_spreads_populations() {
        let flat = generate_map(&request(5)).unwrap();
        assert!(flat.starts.iter().all(|s| s.citizens == BASE_CITIZENS));

        let steep = generate_map(&MapRequest {
            inequality: 4,
            ..request(5)
        })
        .unwrap();
        assert_eq!(steep.starts[0].citizens, BASE_CITIZENS);
        for s in &steep.starts[1..] {
            assert!(s.citizens >= 40 && s.citizens <= 280, "{}", s.citizens);
        }
        // Inequality does not move anyone.
        let homes = |m: &GeneratedMap| m.starts.iter().map(|s| s.home).collect::<Vec<_>>();
        assert_eq!(homes(&flat), homes(&steep));
    }

    #[test]
    fn test_territories_do_not_touch() {
        for (shape, w, h) in [(Shape::Hex, 14, 14), (Shape::Rhombus, 14, 14), (Shape::Hex, 21, 21)] {
            let players = shape.available_locations(w, h);
            for seed in 0..8 {
                let map = generate_map(&MapRequest {
                    seed,
                    width: w,
                    height: h,
                    shape,
                    players,
                    quality_rank: 1,
                    inequality: 2,
                })
                .unwrap();
                for (k, a) in map.starts.iter().enumerate() {
                    for b in &map.starts[k + 1..] {
                        assert!(shape.distance(a.home, b.home) > 2 * map.radius);
                    }
                }
            }
        }
    }

    #[test]
    fn test_too_many_players_rejected() {
        let err = generate_map(&MapRequest {
            players: 5,
            ..request(1)
        })
        .unwrap_err();
        assert!(matches!(err, MapGenError::NotEnoughLocations { found: 4, needed: 5 }));
    }

    #[test]
    fn test_bad_rank_rejected() {
        let err = generate_map(&MapRequest {
            quality_rank: 0,
            ..request(1)
        })
        .unwrap_err();
        assert!(matches!(err, MapGenError::RankOutOfRange { .. }));
    }
}
