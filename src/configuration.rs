//! Config for the evaluator behaviors
//!
//! This module provides configuration options for a tournament run: how many games to play, the
//! limits handed to the match executor, how fast new agents may enter the pool, and what gets
//! printed or logged.
//!
//! Configuration can be created programmatically using [`Configuration::new()`] or by reading
//! environment variables using [`Configuration::from_env()`].
//!
//! # Environment Variables
//!
//! All values are optional. Flags are enabled by the value `"true"` (case-insensitive). Numbers
//! that fail to parse are ignored with a warning.
//!
//! - `ELO_NUM_GAMES` — Games to play in this run (default: `20`)
//! - `ELO_MOVE_TIME` — Thinking time per move, in seconds (default: `30`)
//! - `ELO_RESIGN_SCORE` — Resignation threshold given to the agents (default: `0.1`)
//! - `ELO_ADMISSION_CAP` — Maximum untested agents in the pool (default: `200`)
//! - `ELO_GRADUATED_GAMES` — Games after which an agent is no longer untested (default: `20`)
//! - `ELO_MIN_GAMES_DISPLAY` — Hide agents with fewer games from the standings (default: `0`)
//! - `ELO_SEED` — Seed of the matchmaking RNG (default: random)
//! - `ELO_VERBOSE` — Print standings and results to stdout (default: `true`)
//! - `ELO_LOG` — Enable logging to a file (default: `false`)
//! - `ELO_LOG_DIR` — Directory of the log file (default: current directory)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::roster::{AdmissionPolicy, ADMISSION_CAP, GRADUATED_GAMES};

/// Default number of games per run.
pub const NUM_GAMES: usize = 20;
/// Default thinking time per move.
pub const MOVE_TIME: Duration = Duration::from_secs(30);
/// Default resignation threshold.
pub const RESIGN_SCORE: f64 = 0.1;

/// Configuration for a tournament run.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    pub(crate) num_games: usize,
    pub(crate) move_time: Duration,
    pub(crate) resign_score: f64,
    pub(crate) admission: AdmissionPolicy,
    pub(crate) min_games_display: u32,
    pub(crate) seed: Option<u64>,
    pub(crate) verbose: bool,
    pub(crate) log: bool,
    pub(crate) log_dir: PathBuf,
}

impl Configuration {
    /// Create a new configuration with default parameters.
    ///
    /// By default:
    /// - 20 games are played, with 30 seconds per move and a 0.1 resignation threshold.
    /// - At most 200 agents with fewer than 20 games take part in a run.
    /// - Standings list every agent.
    /// - The matchmaking RNG is seeded from the OS.
    /// - The evaluator prints standings and results to stdout.
    /// - Logging to file is disabled.
    pub fn new() -> Self {
        Self {
            num_games: NUM_GAMES,
            move_time: MOVE_TIME,
            resign_score: RESIGN_SCORE,
            admission: AdmissionPolicy {
                admission_cap: ADMISSION_CAP,
                graduated_games: GRADUATED_GAMES,
            },
            min_games_display: 0,
            seed: None,
            verbose: true,
            log: false,
            log_dir: PathBuf::from("."),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// See the [module documentation](self) for the recognized variables. Unset variables keep
    /// their default value.
    pub fn from_env() -> Self {
        fn get_env_flag(var: &str, default: bool) -> bool {
            match std::env::var(var) {
                Ok(val) => val.eq_ignore_ascii_case("true"),
                Err(_) => default,
            }
        }

        fn get_env_opt<T: FromStr>(var: &str) -> Option<T> {
            let val = std::env::var(var).ok()?;
            val.trim()
                .parse()
                .map_err(|_| warn!("ignoring {var}={val:?}: not a valid number"))
                .ok()
        }

        fn get_env_num<T: FromStr>(var: &str, default: T) -> T {
            get_env_opt(var).unwrap_or(default)
        }

        let defaults = Self::new();
        let move_time = get_env_num("ELO_MOVE_TIME", defaults.move_time.as_secs_f64());
        let move_time = Duration::try_from_secs_f64(move_time).unwrap_or_else(|_| {
            warn!("ignoring ELO_MOVE_TIME={move_time}: not a valid duration");
            defaults.move_time
        });

        Self {
            num_games: get_env_num("ELO_NUM_GAMES", defaults.num_games),
            move_time,
            resign_score: get_env_num("ELO_RESIGN_SCORE", defaults.resign_score),
            admission: AdmissionPolicy {
                admission_cap: get_env_num("ELO_ADMISSION_CAP", defaults.admission.admission_cap),
                graduated_games: get_env_num(
                    "ELO_GRADUATED_GAMES",
                    defaults.admission.graduated_games,
                ),
            },
            min_games_display: get_env_num("ELO_MIN_GAMES_DISPLAY", defaults.min_games_display),
            seed: get_env_opt("ELO_SEED"),
            verbose: get_env_flag("ELO_VERBOSE", defaults.verbose),
            log: get_env_flag("ELO_LOG", defaults.log),
            log_dir: std::env::var_os("ELO_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
        }
    }

    /// Set the number of games played in this run.
    pub fn with_num_games(mut self, value: usize) -> Self {
        self.num_games = value;
        self
    }

    /// Set the thinking time per move given to the executor.
    pub fn with_move_time(mut self, value: Duration) -> Self {
        self.move_time = value;
        self
    }

    /// Set the resignation threshold given to the executor.
    pub fn with_resign_score(mut self, value: f64) -> Self {
        self.resign_score = value;
        self
    }

    /// Set how many untested agents may take part in a run.
    pub fn with_admission_cap(mut self, value: usize) -> Self {
        self.admission.admission_cap = value;
        self
    }

    /// Set the number of games after which an agent stops counting against the admission cap.
    pub fn with_graduated_games(mut self, value: u32) -> Self {
        self.admission.graduated_games = value;
        self
    }

    /// Hide agents with fewer games than `value` from the printed standings.
    pub fn with_min_games_display(mut self, value: u32) -> Self {
        self.min_games_display = value;
        self
    }

    /// Seed the matchmaking RNG, making pairings reproducible.
    pub fn with_seed(mut self, value: u64) -> Self {
        self.seed = Some(value);
        self
    }

    /// Enable or disable console output.
    pub fn with_verbose(mut self, value: bool) -> Self {
        self.verbose = value;
        self
    }

    /// Enable or disable logging to file.
    pub fn with_log(mut self, value: bool) -> Self {
        self.log = value;
        self
    }

    /// Set the directory where the log file is created.
    pub fn with_log_dir(mut self, value: impl Into<PathBuf>) -> Self {
        self.log_dir = value.into();
        self
    }

    pub fn num_games(&self) -> usize {
        self.num_games
    }

    pub fn admission(&self) -> AdmissionPolicy {
        self.admission
    }

    pub fn min_games_display(&self) -> u32 {
        self.min_games_display
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}
