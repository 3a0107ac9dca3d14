//! Combat resolution.
//!
//! Every contested tile loses population each tick. A player's losses grow
//! with the enemy strength present and with its own share of the tile, so
//! two players bleed the same absolute amount and the larger side survives.

use crate::game::{Grid, PlayerId, Rules, Tile, MAX_PLAYERS};

/// Losses inflicted on one tile during a combat round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CombatResult {
    /// Citizens removed, per player.
    pub losses: [u32; MAX_PLAYERS],
    /// Sole survivor, if the round left exactly one player on the tile.
    pub winner: Option<PlayerId>,
}

impl CombatResult {
    /// Total citizens removed from the tile.
    #[must_use]
    pub fn total_losses(&self) -> u64 {
        self.losses.iter().map(|&l| u64::from(l)).sum()
    }
}

/// Losses a player with `own` citizens takes against `enemies` on a tile
/// holding `total` citizens.
///
/// Always at least one citizen while enemies are present, never more than
/// `own`.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn attrition_loss(own: u32, enemies: u32, total: u32, attrition: f64) -> u32 {
    if own == 0 || enemies == 0 || total == 0 {
        return 0;
    }
    let raw = (attrition.max(0.0) * f64::from(enemies) * f64::from(own) / f64::from(total)).ceil();
    let loss = if raw >= f64::from(u32::MAX) { u32::MAX } else { raw as u32 };
    loss.max(1).min(own)
}

/// Resolve one combat round on a single tile.
///
/// Losses are computed from the counts before the round, so the order in
/// which players are visited does not matter.
pub fn resolve_tile_combat(tile: &mut Tile, rules: &Rules) -> CombatResult {
    let mut result = CombatResult::default();
    if !tile.is_contested() {
        return result;
    }

    let total = tile.total_citizens();
    for p in 0..MAX_PLAYERS {
        #[allow(clippy::cast_possible_truncation)]
        let player = p as PlayerId;
        let own = tile.citizens(player);
        result.losses[p] = attrition_loss(own, total - own, total, rules.attrition);
    }
    for p in 0..MAX_PLAYERS {
        #[allow(clippy::cast_possible_truncation)]
        let player = p as PlayerId;
        let own = tile.citizens(player);
        tile.set_citizens(player, own - result.losses[p]);
    }

    result.winner = tile.sole_occupant();
    result
}

/// Resolve combat on every contested tile of the grid.
///
/// Returns the number of citizens destroyed.
pub fn resolve_combat(grid: &mut Grid, rules: &Rules) -> u64 {
    grid.tiles_mut()
        .iter_mut()
        .filter(|t| t.class.is_inhabitable() && t.is_contested())
        .map(|t| resolve_tile_combat(t, rules).total_losses())
        .sum()
}
