//! Tunable simulation coefficients.

use serde::{Deserialize, Serialize};

/// Coefficients of the per-tick simulation.
///
/// Only the shape of each rule is fixed (capped logistic growth, proportional
/// attrition, one-tile-per-tick movement); the numbers are balance choices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Logistic growth rate on settlements.
    pub growth_rate: f64,
    /// Share of an uncontested tile's citizens offered to its neighbours.
    pub spread_rate: f64,
    /// Share of a tile's citizens that marches one tile per tick.
    pub march_rate: f64,
    /// Steps a flag pulls units from.
    pub flag_range: u16,
    /// Losses per enemy citizen on a contested tile, scaled by own share.
    pub attrition: f64,
    /// Citizens consumed to found a settlement.
    pub build_cost: u32,
    /// Citizens that must remain on the supporting tile after a build.
    pub build_reserve: u32,
    /// Timer ticks between two win/loss checks.
    pub eval_interval: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            growth_rate: 0.08,
            spread_rate: 0.06,
            march_rate: 0.25,
            flag_range: 8,
            attrition: 0.5,
            build_cost: 20,
            build_reserve: 5,
            eval_interval: 100,
        }
    }
}

/// Timer ticks in one wheel turn; the timer counter wraps here.
pub const TIMER_PERIOD: u32 = 1600;

/// Hardware timer interval in milliseconds.
pub const TIMER_INTERVAL_MS: u64 = 10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_deserialize_partial() {
        let rules: Rules = serde_json::from_str(r#"{"spread_rate": 0.0}"#).unwrap();
        assert!(rules.spread_rate.abs() < f64::EPSILON);
        assert_eq!(rules.build_cost, Rules::default().build_cost);
    }

    #[test]
    fn test_eval_interval_divides_period() {
        assert_eq!(TIMER_PERIOD % Rules::default().eval_interval, 0);
    }
}
