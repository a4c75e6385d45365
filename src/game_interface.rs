//! Traits that need to be implemented to plug a game into the evaluator.
//!
//! The tournament knows nothing about the rules of the game: a [`MatchExecutor`] plays one full
//! game between two agents and reports the score of each seat. An [`OpeningBook`] can force the
//! first moves of a game so that matches between deterministic agents do not all look alike.

use std::time::Duration;

use rand::RngCore;

use crate::elo::Outcome;
use crate::error::MatchError;

/// Everything an executor needs to play one game.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRequest<'a, A> {
    /// Agent in the first seat (moves first).
    pub first: &'a A,
    /// Agent in the second seat.
    pub second: &'a A,
    /// Thinking time allowed per move.
    pub move_time: Duration,
    /// Moves to play before the agents take over, if any.
    pub opening: Option<&'a [String]>,
    /// Agents may resign when their winning probability drops below this.
    pub resign_score: f64,
    /// Ask the executor for a move-by-move trace.
    pub verbose: bool,
}

/// Scores of a finished game, in seat order.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchReport {
    /// `(label, score)` of the first seat; `100` for a win.
    pub first: (String, f64),
    /// `(label, score)` of the second seat.
    pub second: (String, f64),
}

impl MatchReport {
    pub fn outcome(&self) -> Outcome {
        Outcome::from_scores(self.first.1, self.second.1)
    }
}

/// What will be given to the evaluator to play games.
pub trait MatchExecutor<A> {
    /// Plays a full game and returns the seat scores.
    ///
    /// # Errors
    /// [`MatchError::TooLong`] when the game was aborted for length: the evaluator skips the round.
    /// Any [`MatchError::Failed`] stops the tournament.
    fn play(&mut self, request: MatchRequest<'_, A>) -> Result<MatchReport, MatchError>;
}

impl<A, F> MatchExecutor<A> for F
where
    F: FnMut(MatchRequest<'_, A>) -> Result<MatchReport, MatchError>,
{
    fn play(&mut self, request: MatchRequest<'_, A>) -> Result<MatchReport, MatchError> {
        self(request)
    }
}

/// Source of forced opening moves.
pub trait OpeningBook {
    /// Moves to start the next game with, or `None` for the standard start position.
    fn opening(&mut self, rng: &mut dyn RngCore) -> Option<Vec<String>>;
}
