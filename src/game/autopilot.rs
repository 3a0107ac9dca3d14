//! Decisions for countries nobody is steering.
//!
//! An autopilot only ever places and removes flags and founds settlements
//! through [`add_flag`], [`remove_flag`] and [`build`], the same entry points
//! the human player uses. How often it decides, how far it looks around a
//! tile and how eagerly it attacks come from the difficulty [`Profile`].

use std::cmp::Ordering;

use rand::Rng;
use tracing::trace;

use crate::game::{
    add_flag, build, remove_flag, Coord, Country, FlagKind, FlagSet, Grid, PlayerId, Profile,
    Rules, TerrainClass, MAX_PLAYERS,
};

/// Weight of threatened own tiles while the country is behind.
const LOSING_DEFENCE_WEIGHT: f64 = 1.5;

/// Weight of threatened own tiles otherwise.
const DEFENCE_WEIGHT: f64 = 0.5;

/// Whether a country with this profile decides on simulation tick `tick`.
///
/// Countries are staggered by id so they do not all act on the same tick.
#[must_use]
pub fn is_decision_tick(profile: &Profile, id: PlayerId, tick: u64) -> bool {
    (tick + u64::from(id)).is_multiple_of(profile.decision_interval.max(1))
}

/// Whether `player` holds fewer citizens than its strongest rival.
#[must_use]
pub fn is_losing(populations: &[u64; MAX_PLAYERS], player: PlayerId) -> bool {
    let own = populations[usize::from(player)];
    populations
        .iter()
        .enumerate()
        .any(|(p, &pop)| p != usize::from(player) && pop > own)
}

/// Citizens of `player` and of everybody else within `radius` of `c`.
fn strength_around(grid: &Grid, c: Coord, player: PlayerId, radius: i32) -> (u64, u64) {
    grid.ball(c, radius)
        .filter_map(|n| grid.get(n))
        .fold((0, 0), |(own, enemy), t| {
            (
                own + u64::from(t.citizens(player)),
                enemy + u64::from(t.enemies_of(player)),
            )
        })
}

/// Desirability of a flag at `c` for `player`, or `None` if no flag belongs
/// there.
#[allow(clippy::cast_precision_loss)]
fn flag_score(
    grid: &Grid,
    c: Coord,
    player: PlayerId,
    profile: &Profile,
    losing: bool,
) -> Option<f64> {
    let tile = grid.get(c)?;
    if !tile.class.is_inhabitable() || tile.is_empty() {
        return None;
    }
    let enemy_here = tile.enemies_of(player);
    let own_here = tile.citizens(player);

    if enemy_here > 0 {
        let (own_near, _) = strength_around(grid, c, player, profile.lookahead);
        let pressure = own_near as f64 * profile.aggression - f64::from(enemy_here);
        return (pressure > 0.0).then_some(pressure);
    }

    if own_here > 0 && tile.class == TerrainClass::Claimed {
        let (_, threat) = strength_around(grid, c, player, profile.lookahead);
        if threat == 0 {
            return None;
        }
        let weight = if losing {
            LOSING_DEFENCE_WEIGHT
        } else {
            DEFENCE_WEIGHT
        };
        return Some(threat as f64 * weight);
    }
    None
}

/// Best tile for a new settlement of `player`, if any.
fn build_target(grid: &Grid, player: PlayerId, rules: &Rules) -> Option<Coord> {
    let needed = rules.build_cost.saturating_add(rules.build_reserve);
    grid.iter()
        .filter(|(_, t)| t.class == TerrainClass::Unclaimed && t.enemies_of(player) == 0)
        .filter(|&(c, _)| {
            std::iter::once(c)
                .chain(grid.neighbors(c))
                .filter_map(|n| grid.get(n))
                .any(|t| t.citizens(player) >= needed)
        })
        .map(|(c, t)| {
            let room = grid
                .neighbors(c)
                .filter(|&n| grid.class_at(n).is_inhabitable())
                .count();
            (c, (t.citizens(player), room))
        })
        .max_by(|(a, ka), (b, kb)| ka.cmp(kb).then_with(|| (b.j, b.i).cmp(&(a.j, a.i))))
        .map(|(c, _)| c)
}

/// Make one decision for `country`: retarget its flags and found settlements.
///
/// Countries without an autopilot, or with no citizens left, do nothing.
pub fn decide<R: Rng + ?Sized>(
    grid: &mut Grid,
    flags: &mut FlagSet,
    country: &mut Country,
    rules: &Rules,
    rng: &mut R,
) {
    let Some(difficulty) = country.autopilot else {
        return;
    };
    let profile = difficulty.profile();
    let player = country.id;
    let populations = grid.populations();
    if populations[usize::from(player)] == 0 {
        return;
    }
    let losing = is_losing(&populations, player);

    let mut scored: Vec<(Coord, f64)> = grid
        .coords()
        .filter_map(|c| {
            flag_score(grid, c, player, &profile, losing).map(|s| (c, s + rng.gen_range(0.0..1.0)))
        })
        .collect();
    scored.sort_by(|(a, sa), (b, sb)| {
        sb.partial_cmp(sa)
            .unwrap_or(Ordering::Equal)
            .then_with(|| (a.j, a.i).cmp(&(b.j, b.i)))
    });
    scored.truncate(profile.max_flags);
    let wanted: Vec<Coord> = scored.into_iter().map(|(c, _)| c).collect();

    let stale: Vec<Coord> = flags
        .iter()
        .map(|(c, _)| c)
        .filter(|c| !wanted.contains(c))
        .collect();
    for c in stale {
        remove_flag(grid, flags, c, FlagKind::Power);
    }
    for &c in &wanted {
        add_flag(grid, flags, c, FlagKind::Power);
    }

    let mut built = 0;
    for _ in 0..profile.builds_per_decision {
        let Some(target) = build_target(grid, player, rules) else {
            break;
        };
        if !build(grid, country, target, rules) {
            break;
        }
        built += 1;
    }
    trace!(player, losing, flags = flags.len(), built, "autopilot decision");
}

/// Let every autonomous country whose turn it is decide.
pub fn run_autopilots<R: Rng + ?Sized>(
    grid: &mut Grid,
    flags: &mut [FlagSet],
    countries: &mut [Country],
    rules: &Rules,
    tick: u64,
    rng: &mut R,
) {
    for (country, set) in countries.iter_mut().zip(flags.iter_mut()) {
        let Some(difficulty) = country.autopilot else {
            continue;
        };
        if !is_decision_tick(&difficulty.profile(), country.id, tick) {
            continue;
        }
        decide(grid, set, country, rules, rng);
        country.last_decision = Some(tick);
    }
}
