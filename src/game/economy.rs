//! Local population dynamics: growth, spread, ownership and settlements.
//!
//! # Growth
//!
//! Only settlements grow, and only while a single player holds them. Growth
//! is logistic against the tile capacity:
//!
//! `Δ = max(1, ⌊pop × growth_rate × (cap − total) / cap⌋)`, never past `cap`.
//!
//! # Spread
//!
//! An uncontested tile offers `⌊pop × spread_rate⌋` citizens to its
//! inhabitable neighbours holding fewer of the same player's citizens,
//! split evenly and scaled to each neighbour's room.

use tracing::debug;

use crate::game::combat::resolve_combat;
use crate::game::migration::{apply_transfers, Transfer};
use crate::game::{Coord, Country, Grid, Rules, TerrainClass};

/// Totals of one local simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EconomyResult {
    /// Citizens destroyed by combat.
    pub destroyed: u64,
    /// Citizens created by growth.
    pub grown: u64,
    /// Citizens that spread to a neighbouring tile.
    pub spread: u64,
    /// Tiles whose owner changed.
    pub captured: usize,
}

/// Citizens a tile with `own` citizens of one player and `total` citizens
/// overall gains from growth on terrain of capacity `cap`.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn growth(own: u32, total: u32, cap: u32, rate: f64) -> u32 {
    if own == 0 || total >= cap || rate <= 0.0 {
        return 0;
    }
    let free = cap - total;
    let raw = (f64::from(own) * rate * f64::from(free) / f64::from(cap)).floor();
    let delta = if raw >= f64::from(u32::MAX) { u32::MAX } else { raw as u32 };
    delta.max(1).min(free)
}

/// Grow every uncontested settlement. Returns the citizens created.
pub fn apply_growth(grid: &mut Grid, rules: &Rules) -> u64 {
    let mut grown = 0u64;
    for tile in grid.tiles_mut() {
        if tile.class != TerrainClass::Claimed {
            continue;
        }
        let Some(player) = tile.sole_occupant() else {
            continue;
        };
        let own = tile.citizens(player);
        let delta = growth(own, tile.total_citizens(), tile.class.capacity(), rules.growth_rate);
        tile.set_citizens(player, own + delta);
        grown += u64::from(delta);
    }
    grown
}

/// Spread requests from every uncontested tile, computed on the current grid.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn spread_transfers(grid: &Grid, rules: &Rules) -> Vec<Transfer> {
    let mut transfers = Vec::new();
    if rules.spread_rate <= 0.0 {
        return transfers;
    }
    for (c, tile) in grid.iter() {
        if !tile.class.is_inhabitable() {
            continue;
        }
        let Some(player) = tile.sole_occupant() else {
            continue;
        };
        let own = tile.citizens(player);
        let offered = (f64::from(own) * rules.spread_rate).floor() as u32;
        if offered == 0 {
            continue;
        }
        let targets: Vec<Coord> = grid
            .neighbors(c)
            .filter(|&n| {
                grid.get(n)
                    .is_some_and(|t| t.class.is_inhabitable() && t.citizens(player) < own)
            })
            .collect();
        if targets.is_empty() {
            continue;
        }
        #[allow(clippy::cast_possible_truncation)]
        let share = offered / targets.len() as u32;
        if share == 0 {
            continue;
        }
        transfers.extend(targets.into_iter().map(|to| Transfer {
            from: c,
            to,
            player,
            amount: share,
        }));
    }
    transfers
}

/// Hand every tile held by a single player to that player.
///
/// Returns the number of tiles whose owner changed.
pub fn update_ownership(grid: &mut Grid) -> usize {
    let mut changed = 0;
    for tile in grid.tiles_mut() {
        if !tile.class.is_inhabitable() {
            continue;
        }
        let Some(player) = tile.sole_occupant() else {
            continue;
        };
        if tile.owner != Some(player) {
            tile.owner = Some(player);
            changed += 1;
        }
    }
    changed
}

/// Run the local phase of one simulation step: combat, growth, spread and
/// ownership, in that order.
pub fn simulate(grid: &mut Grid, rules: &Rules) -> EconomyResult {
    let destroyed = resolve_combat(grid, rules);
    let grown = apply_growth(grid, rules);
    let transfers = spread_transfers(grid, rules);
    let spread = apply_transfers(grid, &transfers);
    let captured = update_ownership(grid);
    EconomyResult {
        destroyed,
        grown,
        spread,
        captured,
    }
}

/// Found a settlement for `country` at `c`.
///
/// The target must be inhabitable, not already a settlement of this country,
/// and free of other players unless this country is present too. The cost is
/// paid by the strongest of the target and its neighbours, which must keep
/// `build_reserve` citizens afterwards. Returns `false` without touching the
/// grid when any condition fails.
pub fn build(grid: &mut Grid, country: &mut Country, c: Coord, rules: &Rules) -> bool {
    let player = country.id;
    let Some(tile) = grid.get(c) else {
        return false;
    };
    if !tile.class.is_inhabitable() {
        return false;
    }
    if tile.class == TerrainClass::Claimed && tile.owner == Some(player) {
        return false;
    }
    if tile.enemies_of(player) > 0 && tile.citizens(player) == 0 {
        return false;
    }

    let needed = rules.build_cost.saturating_add(rules.build_reserve);
    let support = std::iter::once(c)
        .chain(grid.neighbors(c))
        .filter_map(|n| grid.get(n).map(|t| (n, t)))
        .filter(|(_, t)| t.class.is_inhabitable() && t.citizens(player) >= needed)
        .max_by_key(|&(n, t)| (t.citizens(player), std::cmp::Reverse((n.j, n.i))))
        .map(|(n, _)| n);
    let Some(support) = support else {
        return false;
    };

    if let Some(source) = grid.get_mut(support) {
        source.set_citizens(player, source.citizens(player) - rules.build_cost);
    }
    if let Some(target) = grid.get_mut(c) {
        target.class = TerrainClass::Claimed;
        target.owner = Some(player);
    }
    country.builds += 1;
    debug!(player, i = c.i, j = c.j, ?support, "settlement founded");
    true
}
