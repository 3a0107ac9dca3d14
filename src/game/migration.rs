//! Simultaneous citizen transfers between tiles.
//!
//! Movement phases first collect every request against an unmodified grid
//! and then apply them together, so the result does not depend on the order
//! in which tiles or players were visited.

use crate::game::{Coord, Grid, PlayerId, MAX_PLAYERS};

/// A request to move citizens of one player between two tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    /// Source tile.
    pub from: Coord,
    /// Destination tile.
    pub to: Coord,
    /// Owner of the moving citizens.
    pub player: PlayerId,
    /// Citizens requested to move.
    pub amount: u32,
}

/// Apply a batch of transfers at once.
///
/// Requests landing on the same destination for the same player share the
/// room that player has left there; when they ask for more, each request is
/// scaled down proportionally (rounding down). Sources lose exactly what
/// arrives, so citizens are conserved. Requests are clamped to what the
/// source holds in the current grid, and requests with an invalid or
/// non-inhabitable endpoint are dropped.
///
/// Returns the number of citizens moved.
pub fn apply_transfers(grid: &mut Grid, transfers: &[Transfer]) -> u64 {
    let slots = grid.tiles().len() * MAX_PLAYERS;
    let mut requested = vec![0u64; slots];

    let valid: Vec<(usize, usize, usize, u32)> = transfers
        .iter()
        .filter(|t| t.amount > 0 && t.from != t.to && usize::from(t.player) < MAX_PLAYERS)
        .filter_map(|t| {
            let from = grid.index(t.from)?;
            let to = grid.index(t.to)?;
            let tiles = grid.tiles();
            if !tiles[from].class.is_inhabitable() || !tiles[to].class.is_inhabitable() {
                return None;
            }
            let amount = t.amount.min(tiles[from].citizens(t.player));
            Some((from, to, usize::from(t.player), amount))
        })
        .collect();

    for &(_, to, p, amount) in &valid {
        requested[to * MAX_PLAYERS + p] += u64::from(amount);
    }

    let grants: Vec<u32> = valid
        .iter()
        .map(|&(_, to, p, amount)| {
            #[allow(clippy::cast_possible_truncation)]
            let room = u64::from(grid.tiles()[to].room_for(p as PlayerId));
            let total = requested[to * MAX_PLAYERS + p];
            if total <= room {
                amount
            } else {
                u32::try_from(u64::from(amount) * room / total).unwrap_or(amount)
            }
        })
        .collect();

    let mut moved = 0u64;
    let mut arrivals = vec![0u32; slots];
    for (&(from, to, p, _), &granted) in valid.iter().zip(&grants) {
        #[allow(clippy::cast_possible_truncation)]
        let player = p as PlayerId;
        let source = &mut grid.tiles_mut()[from];
        let granted = granted.min(source.citizens(player));
        source.set_citizens(player, source.citizens(player) - granted);
        arrivals[to * MAX_PLAYERS + p] += granted;
        moved += u64::from(granted);
    }

    for (slot, &count) in arrivals.iter().enumerate() {
        if count == 0 {
            continue;
        }
        #[allow(clippy::cast_possible_truncation)]
        let player = (slot % MAX_PLAYERS) as PlayerId;
        let tile = &mut grid.tiles_mut()[slot / MAX_PLAYERS];
        tile.set_citizens(player, tile.citizens(player) + count);
    }

    moved
}
