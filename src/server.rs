//! Running a tournament session.
//!
//! This module defines the [`Evaluator`] type, which drives one session over a rating file:
//!
//! - Loading the rating file, or starting a new one seeded with the fixed `random` baseline
//! - Reconciling the live agent list with the stored records (see [`roster`](crate::roster))
//! - Saving right away, so newly admitted agents are durable before the first game
//! - Playing up to `num_games` rounds with a [`TournamentStrategy`], saving after each one
//!
//! A session stops early when the strategy has no pairing left, i.e. when every agent has played
//! enough games. A game aborted for length is skipped; any other executor failure aborts the
//! session, leaving the file as it was after the last completed round.
//!
//! # Behavior & Configuration
//!
//! Behavior is controlled by a [`Configuration`] object: number of games, per-move time and
//! resignation threshold handed to the executor, admission cap, matchmaking seed and console or
//! file output.
//!
//! # Example
//!
//! See crate-level documentation for an example on how to use the `Evaluator`.

use std::path::Path;

use anyhow::Context;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, instrument, trace, warn};

use crate::agent::Agent;
use crate::configuration::Configuration;
use crate::elo::RatingUpdater;
use crate::game_interface::{MatchExecutor, OpeningBook};
use crate::logger::init_logger;
use crate::rating::TournamentState;
use crate::rating_store;
use crate::roster::reconcile;
use crate::tournament_scheduler::{RoundResult, RoundSettings, TournamentScheduler};
use crate::tournament_strategy::TournamentStrategy;

/// What a session did.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    /// State after the last round, as saved.
    pub state: TournamentState,
    /// Games played to completion and rated.
    pub games_played: usize,
    /// Games aborted for length.
    pub games_aborted: usize,
    /// The strategy ran out of pairings before `num_games` rounds.
    pub exhausted: bool,
}

/// Runs tournament sessions for a given [`Configuration`].
pub struct Evaluator {
    config: Configuration,
    updater: RatingUpdater,
}

impl Evaluator {
    /// Create an [`Evaluator`]. Installs the file logger when `config.log` is set.
    #[instrument(skip_all)]
    pub fn new(config: Configuration) -> anyhow::Result<Evaluator> {
        if config.log {
            let file = init_logger(&config.log_dir)?;
            info!("logging to {file:?}");
        }
        trace!(?config);

        Ok(Evaluator {
            config,
            updater: RatingUpdater::default(),
        })
    }

    /// Use another K-factor schedule.
    pub fn with_updater(mut self, updater: RatingUpdater) -> Self {
        self.updater = updater;
        self
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Plays one session of `game` between `agents`, keeping ratings in `path`.
    ///
    /// # Errors
    /// - [`ConfigurationError`](crate::error::ConfigurationError) if two agents share a name.
    ///   Nothing is played nor written.
    /// - [`StoreError`](crate::error::StoreError) if the file cannot be read or written.
    /// - [`TournamentError`](crate::error::TournamentError) if the executor fails.
    #[instrument(skip_all, fields(game = %game))]
    pub fn evaluate<A, S, E>(
        &self,
        game: &str,
        agents: &[A],
        path: impl AsRef<Path>,
        strategy: S,
        executor: &mut E,
        mut openings: Option<&mut (dyn OpeningBook + '_)>,
    ) -> anyhow::Result<SessionReport>
    where
        A: Agent,
        S: TournamentStrategy,
        E: MatchExecutor<A>,
    {
        let path = path.as_ref();
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        // 1. load
        let mut state = rating_store::load_or_new(path, game)?;
        info!(players = state.players.len(), "ratings loaded");

        // 2. bind agents to records
        let roster = reconcile(agents, &mut state, self.config.admission)?;
        for name in roster.dangling() {
            if self.config.verbose {
                println!("\x1b[33mNOT FOUND\x1b[39m {name}");
            }
        }
        if !roster.deferred().is_empty() {
            warn!(
                "{} agents deferred by the admission cap",
                roster.deferred().len()
            );
        }

        // 3. save new records before playing
        rating_store::save(path, &state).context("cannot save ratings before the first game")?;
        if self.config.verbose {
            self.print_standings(&state);
        }

        // 4. main loop
        let settings = RoundSettings {
            move_time: self.config.move_time,
            resign_score: self.config.resign_score,
            verbose: self.config.verbose,
        };
        let mut scheduler = TournamentScheduler::new(
            agents,
            &roster,
            strategy,
            settings,
            path,
            self.config.num_games,
        )
        .with_updater(self.updater.clone());

        let mut games_played = 0;
        let mut games_aborted = 0;
        let mut exhausted = false;
        while !scheduler.is_finished() {
            match scheduler.play_round(&mut state, executor, openings.as_deref_mut(), &mut rng)? {
                RoundResult::Played { .. } => {
                    games_played += 1;
                    if self.config.verbose {
                        self.print_standings(&state);
                    }
                }
                RoundResult::TooLong { .. } => games_aborted += 1,
                RoundResult::Exhausted => exhausted = true,
            }
        }

        info!(games_played, games_aborted, exhausted, "session done");
        if self.config.verbose {
            println!("DONE");
        }
        Ok(SessionReport {
            state,
            games_played,
            games_aborted,
            exhausted,
        })
    }

    fn print_standings(&self, state: &TournamentState) {
        println!("ELO DUMP");
        print!("{}", state.standings_table(self.config.min_games_display));
    }
}
