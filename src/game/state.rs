//! Game state management.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, trace};

use crate::config::{GameConfig, RUNTIME_STREAM};
use crate::error::ConfigError;
use crate::game::invariants::assert_invariants;
use crate::game::mapgen::{generate_map, MapRequest, StartLocation};
use crate::game::{
    build, evaluate, kings_move, remove_flags_with_prob, run_autopilots, simulate, step_cursor,
    toggle_flag, Command, Control, Coord, Country, FlagKind, FlagSet, Grid, GridView, Outcome,
    PlayerId, Rules, Speed, CONTROLLED_PLAYER, MAX_PLAYERS, TIMER_PERIOD,
};

/// What one timer tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// A simulation step ran.
    pub advanced: bool,
    /// The win/loss check ran.
    pub evaluated: bool,
}

/// Complete game state.
#[derive(Debug, Clone)]
pub struct GameState {
    /// The simulation grid.
    pub grid: Grid,
    /// Flags of every player, indexed by player.
    pub flags: Vec<FlagSet>,
    /// Every country, indexed by player.
    pub countries: Vec<Country>,
    /// Cursor of the controlled player.
    pub cursor: Coord,
    /// Current speed.
    pub speed: Speed,
    /// Speed before the last speed change, restored when unpausing.
    pub prev_speed: Speed,
    /// The player at the keyboard.
    pub controlled: PlayerId,
    /// Seed the game was generated from.
    pub map_seed: u64,
    /// Resolved map parameters.
    pub request: MapRequest,
    /// Simulation coefficients.
    pub rules: Rules,
    /// Latched game result.
    pub outcome: Outcome,
    /// Starting territories, indexed by player.
    pub starts: Vec<StartLocation>,
    /// Simulation steps taken so far.
    pub tick: u64,
    timer: u32,
    rng: ChaCha8Rng,
}

impl GameState {
    /// Set up a new game from a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the map cannot
    /// hold the requested starts.
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        let request = config.resolve()?;
        let map = generate_map(&request)?;

        let controlled = CONTROLLED_PLAYER;
        let countries: Vec<Country> = map
            .starts
            .iter()
            .map(|s| {
                if s.player == controlled && !config.autopilot_controlled {
                    Country::human(s.player)
                } else {
                    Country::autonomous(s.player, config.difficulty)
                }
            })
            .collect();
        let flags = map
            .starts
            .iter()
            .map(|s| FlagSet::new(s.player, &map.grid))
            .collect();
        let cursor = map
            .starts
            .get(usize::from(controlled))
            .map_or_else(|| map.grid.center(), |s| s.home);

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        rng.set_stream(RUNTIME_STREAM);

        info!(
            seed = config.seed,
            shape = %request.shape,
            players = request.players,
            rank = request.quality_rank,
            inequality = request.inequality,
            "game started"
        );

        Ok(Self {
            grid: map.grid,
            flags,
            countries,
            cursor,
            speed: config.speed,
            prev_speed: config.speed,
            controlled,
            map_seed: config.seed,
            request,
            rules: config.rules,
            outcome: Outcome::Ongoing,
            starts: map.starts,
            tick: 0,
            timer: 0,
            rng,
        })
    }

    /// Current timer counter, in `0..TIMER_PERIOD`.
    #[must_use]
    pub const fn timer(&self) -> u32 {
        self.timer
    }

    /// Count one timer tick, advancing the simulation when the speed says so
    /// and checking for a result every evaluation interval.
    pub fn timer_tick(&mut self) -> TickReport {
        self.timer = (self.timer + 1) % TIMER_PERIOD;
        let mut report = TickReport::default();
        if self.speed.is_due(self.timer) {
            self.advance();
            report.advanced = true;
        }
        if self.timer.is_multiple_of(self.rules.eval_interval.max(1)) {
            self.evaluate();
            report.evaluated = true;
        }
        report
    }

    /// Run one simulation step: autopilot decisions, marching, then the local
    /// phase (combat, growth, spread, ownership).
    pub fn advance(&mut self) {
        run_autopilots(
            &mut self.grid,
            &mut self.flags,
            &mut self.countries,
            &self.rules,
            self.tick,
            &mut self.rng,
        );
        let marched = kings_move(&mut self.grid, &self.flags, &self.rules);
        let result = simulate(&mut self.grid, &self.rules);
        self.tick += 1;
        trace!(
            tick = self.tick,
            marched,
            destroyed = result.destroyed,
            grown = result.grown,
            captured = result.captured,
            "simulation step"
        );
        assert_invariants(self);
    }

    /// Check for a result. Once decided, the outcome no longer changes.
    pub fn evaluate(&mut self) -> Outcome {
        if !self.outcome.is_decided() {
            self.outcome = evaluate(&self.grid, self.controlled);
            if self.outcome.is_decided() {
                info!(tick = self.tick, outcome = ?self.outcome, "game decided");
            }
        }
        self.outcome
    }

    /// Apply a command of the controlled player.
    pub fn apply(&mut self, command: Command) -> Control {
        match command {
            Command::Move(direction) => {
                self.cursor = step_cursor(&self.grid, self.cursor, direction);
            }
            Command::Faster => {
                if self.speed != Speed::Pause {
                    self.prev_speed = self.speed;
                }
                self.speed = self.speed.faster();
            }
            Command::Slower => {
                if self.speed != Speed::Pause {
                    self.prev_speed = self.speed;
                }
                self.speed = self.speed.slower();
            }
            Command::TogglePause => {
                if self.speed == Speed::Pause {
                    self.speed = self.prev_speed;
                } else {
                    self.prev_speed = self.speed;
                    self.speed = Speed::Pause;
                }
            }
            Command::ToggleFlag => {
                if let Some(flags) = self.flags.get_mut(usize::from(self.controlled)) {
                    toggle_flag(&self.grid, flags, self.cursor, FlagKind::Power);
                }
            }
            Command::ClearFlags | Command::ClearHalfFlags => {
                let p = if command == Command::ClearFlags { 1.0 } else { 0.5 };
                if let Some(flags) = self.flags.get_mut(usize::from(self.controlled)) {
                    remove_flags_with_prob(&self.grid, flags, p, &mut self.rng);
                }
            }
            Command::Build => {
                if let Some(country) = self.countries.get_mut(usize::from(self.controlled)) {
                    build(&mut self.grid, country, self.cursor, &self.rules);
                }
            }
            Command::Quit => return Control::Quit,
        }
        Control::Continue
    }

    /// Read-only snapshot for renderers.
    #[must_use]
    pub fn view(&self) -> GridView<'_> {
        GridView {
            grid: &self.grid,
            flags: &self.flags,
            cursor: self.cursor,
            speed: self.speed,
            outcome: self.outcome,
            controlled: self.controlled,
            tick: self.tick,
        }
    }

    /// Citizens of every player.
    #[must_use]
    pub fn populations(&self) -> [u64; MAX_PLAYERS] {
        self.grid.populations()
    }

    /// Run up to `steps` simulation steps without a timer, evaluating after
    /// each one, and stop early once the game is decided.
    ///
    /// Returns the steps actually run.
    pub fn run_steps(&mut self, steps: u64) -> u64 {
        let mut ran = 0;
        while ran < steps && !self.outcome.is_decided() {
            self.advance();
            self.evaluate();
            ran += 1;
        }
        ran
    }
}
