use std::path::Path;
use std::time::Duration;

use rand::Rng;
use tracing::{error, info, trace, warn};

use crate::agent::Agent;
use crate::elo::{Outcome, RatingUpdater};
use crate::error::{MatchError, TournamentError};
use crate::game_interface::{MatchExecutor, MatchRequest, OpeningBook};
use crate::rating::{RatingRecord, TournamentState};
use crate::rating_store;
use crate::roster::Roster;
use crate::tournament_strategy::TournamentStrategy;

/// Where the scheduler stands in the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Scheduling,
    Playing,
    Updating,
    Persisting,
    Done,
}

/// What a single round amounted to.
#[derive(Debug, Clone, PartialEq)]
pub enum RoundResult {
    /// A game was played and both ratings updated. Indices point into `TournamentState::players`.
    Played {
        first: usize,
        second: usize,
        outcome: Outcome,
    },
    /// The game was aborted for length. Only a log entry was added.
    TooLong { first: usize, second: usize },
    /// The strategy has no pairing left; no game was played.
    Exhausted,
}

/// Limits handed to the executor with every game.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundSettings {
    pub move_time: Duration,
    pub resign_score: f64,
    pub verbose: bool,
}

/// Runs the rounds of one tournament session, one game at a time.
pub struct TournamentScheduler<'a, A, S: TournamentStrategy> {
    agents: &'a [A],
    roster: &'a Roster,
    strategy: S,
    updater: RatingUpdater,
    settings: RoundSettings,
    path: &'a Path,
    max_rounds: usize,
    rounds: usize,
    phase: Phase,
}

impl<'a, A: Agent, S: TournamentStrategy> TournamentScheduler<'a, A, S> {
    /// `roster` must come from reconciling `agents` against the state later passed to
    /// [`play_round`](Self::play_round). The state is saved to `path` after every round.
    pub fn new(
        agents: &'a [A],
        roster: &'a Roster,
        strategy: S,
        settings: RoundSettings,
        path: &'a Path,
        max_rounds: usize,
    ) -> Self {
        TournamentScheduler {
            agents,
            roster,
            strategy,
            updater: RatingUpdater::default(),
            settings,
            path,
            max_rounds,
            rounds: 0,
            phase: if max_rounds == 0 {
                Phase::Done
            } else {
                Phase::Scheduling
            },
        }
    }

    pub fn with_updater(mut self, updater: RatingUpdater) -> Self {
        self.updater = updater;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Rounds started so far, aborted ones included.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// No more rounds will be played.
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Plays one round: pick a pairing, play it, update both ratings, save.
    ///
    /// A game aborted for length only adds a log entry. Any other executor failure is returned
    /// and leaves the file as it was after the previous round.
    pub fn play_round<E, R>(
        &mut self,
        state: &mut TournamentState,
        executor: &mut E,
        openings: Option<&mut (dyn OpeningBook + '_)>,
        rng: &mut R,
    ) -> Result<RoundResult, TournamentError>
    where
        E: MatchExecutor<A>,
        R: Rng,
    {
        if self.is_finished() {
            return Ok(RoundResult::Exhausted);
        }

        self.phase = Phase::Scheduling;
        let pool: Vec<&RatingRecord> = self
            .roster
            .bindings()
            .iter()
            .map(|b| &state.players[b.record])
            .collect();
        let Some((first, second)) = self.strategy.choose_players(&pool, rng) else {
            info!("every agent reached the last bucket, stopping");
            self.phase = Phase::Done;
            return Ok(RoundResult::Exhausted);
        };
        let first = self.roster.bindings()[first];
        let second = self.roster.bindings()[second];
        let agents = self.agents;
        let first_agent = &agents[first.agent];
        let second_agent = &agents[second.agent];
        let Some((first_record, second_record)) =
            pair_mut(&mut state.players, first.record, second.record)
        else {
            return Err(TournamentError::SelfPairing {
                name: first_agent.name().to_owned(),
            });
        };
        self.rounds += 1;

        self.phase = Phase::Playing;
        let opening = openings.and_then(|book| book.opening(rng));
        trace!(first = first_agent.name(), second = second_agent.name(), ?opening);

        let request = MatchRequest {
            first: first_agent,
            second: second_agent,
            move_time: self.settings.move_time,
            opening: opening.as_deref(),
            resign_score: self.settings.resign_score,
            verbose: self.settings.verbose,
        };
        let result = match executor.play(request) {
            Ok(report) => {
                let outcome = report.outcome();
                let summary = summary(outcome, first_record, second_record);
                info!("{summary}");
                if self.settings.verbose {
                    print_summary(&summary);
                }
                state.log.push(summary);

                self.phase = Phase::Updating;
                self.updater.update(first_record, second_record, outcome);

                RoundResult::Played {
                    first: first.record,
                    second: second.record,
                    outcome,
                }
            }
            Err(MatchError::TooLong { reason }) => {
                let entry = format!(
                    "MatchTooLong, {} v {}",
                    first_agent.name(),
                    second_agent.name()
                );
                warn!("{entry}: {reason}");
                if self.settings.verbose {
                    println!("\x1b[33mmatch aborted\x1b[39m {reason}");
                }
                state.log.push(entry);
                RoundResult::TooLong {
                    first: first.record,
                    second: second.record,
                }
            }
            Err(source) => {
                error!("match aborted: {source}");
                if self.settings.verbose {
                    println!("\x1b[31mmatch aborted\x1b[39m {source}");
                }
                self.phase = Phase::Done;
                return Err(TournamentError::Match {
                    first: first_agent.name().to_owned(),
                    second: second_agent.name().to_owned(),
                    source,
                });
            }
        };

        self.phase = Phase::Persisting;
        rating_store::save(self.path, state)?;

        self.phase = if self.rounds >= self.max_rounds {
            Phase::Done
        } else {
            Phase::Scheduling
        };
        Ok(result)
    }
}

/// Line appended to the state log for a finished game, with ratings from before the game.
pub fn summary(outcome: Outcome, first: &RatingRecord, second: &RatingRecord) -> String {
    format!(
        "{outcome}: {} ({:.1}) / {} ({:.1}) ",
        first.name, first.elo, second.name, second.elo
    )
}

/// Two distinct mutable elements of `players`, in the requested order.
fn pair_mut<T>(players: &mut [T], a: usize, b: usize) -> Option<(&mut T, &mut T)> {
    if a == b || a.max(b) >= players.len() {
        return None;
    }
    if a < b {
        let (low, high) = players.split_at_mut(b);
        Some((&mut low[a], &mut high[0]))
    } else {
        let (low, high) = players.split_at_mut(a);
        Some((&mut high[0], &mut low[b]))
    }
}

fn print_summary(summary: &str) {
    // green
    println!("\x1b[32m{summary}\x1b[39m");
}
