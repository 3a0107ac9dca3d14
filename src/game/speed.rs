//! Game speed and the timer divisor table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Game speed, from paused to fastest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speed {
    /// Simulation suspended; commands still apply.
    Pause,
    /// One step every 160 timer ticks.
    Slowest,
    /// One step every 80 timer ticks.
    Slower,
    /// One step every 40 timer ticks.
    Slow,
    /// One step every 20 timer ticks.
    Normal,
    /// One step every 10 timer ticks.
    Fast,
    /// One step every 5 timer ticks.
    Faster,
    /// One step every 2 timer ticks.
    Fastest,
}

const DIVISORS: [Option<u32>; 8] = [
    None,
    Some(160),
    Some(80),
    Some(40),
    Some(20),
    Some(10),
    Some(5),
    Some(2),
];

const ORDER: [Speed; 8] = [
    Speed::Pause,
    Speed::Slowest,
    Speed::Slower,
    Speed::Slow,
    Speed::Normal,
    Speed::Fast,
    Speed::Faster,
    Speed::Fastest,
];

impl Speed {
    /// Timer ticks per simulation step; `None` while paused.
    #[must_use]
    pub const fn divisor(self) -> Option<u32> {
        DIVISORS[self as usize]
    }

    /// One step faster, saturating at [`Speed::Fastest`].
    #[must_use]
    pub const fn faster(self) -> Self {
        let idx = self as usize;
        if idx + 1 < ORDER.len() {
            ORDER[idx + 1]
        } else {
            self
        }
    }

    /// One step slower, saturating at [`Speed::Slowest`].
    #[must_use]
    pub const fn slower(self) -> Self {
        match self {
            Speed::Pause | Speed::Slowest => self,
            _ => ORDER[self as usize - 1],
        }
    }

    /// Whether a simulation step is due on this timer tick.
    #[must_use]
    pub const fn is_due(self, timer: u32) -> bool {
        match self.divisor() {
            Some(divisor) => timer.is_multiple_of(divisor),
            None => false,
        }
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Speed::Pause => "pause",
            Speed::Slowest => "slowest",
            Speed::Slower => "slower",
            Speed::Slow => "slow",
            Speed::Normal => "normal",
            Speed::Fast => "fast",
            Speed::Faster => "faster",
            Speed::Fastest => "fastest",
        };
        f.write_str(name)
    }
}

impl FromStr for Speed {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "p" => Ok(Speed::Pause),
            "sss" | "s3" => Ok(Speed::Slowest),
            "ss" | "s2" => Ok(Speed::Slower),
            "s" | "s1" => Ok(Speed::Slow),
            "n" => Ok(Speed::Normal),
            "f" | "f1" => Ok(Speed::Fast),
            "ff" | "f2" => Ok(Speed::Faster),
            "fff" | "f3" => Ok(Speed::Fastest),
            other => Err(ConfigError::UnknownSpeed(other.to_string())),
        }
    }
}
