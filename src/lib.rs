//! # Elo Tournament
//!
//! A crate for rating game-playing agents with a never-ending tournament, persisting Elo ratings
//! across runs while the agent pool keeps changing.
//!
//! It provides:
//! - Session orchestration (`Evaluator`): load, reconcile, play, rate, save
//! - Matchmaking via the `TournamentStrategy` trait, with the built-in `ClosenessMatchmaker`
//!   favouring under-played agents and opponents of similar strength
//! - An adaptive-K Elo updater with fixed anchor agents
//! - A crash-safe JSON rating file, rewritten after every game
//!
//! Games are played one at a time by a [`MatchExecutor`](game_interface::MatchExecutor): any
//! closure, or the [`RefereeProcess`](match_runner::RefereeProcess) running an external program.
//!
//! # Documentation Overview
//!
//! - For the session lifecycle and error semantics, see the [`server`] module.
//! - For tuning the run, see [`Configuration`](crate::configuration::Configuration).
//! - For pairing rules, see [`tournament_strategy`]; for the rating formula, see [`elo`].
//! - For how the live agent list meets the stored ratings, see [`roster`].
//!
//! # Usage Example
//!
//! ```no_run
//! use elo_tournament::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Configuration::new().with_num_games(50).with_seed(7);
//!     let evaluator = Evaluator::new(config)?;
//!
//!     let agents = ["random", "mcts_100", "mcts_1000"].map(NamedAgent::new);
//!
//!     // Plug your game in here: play one game and report each seat's score.
//!     let mut executor = |request: MatchRequest<'_, NamedAgent>| -> Result<MatchReport, MatchError> {
//!         Ok(MatchReport {
//!             first: (request.first.name.clone(), 100.0),
//!             second: (request.second.name.clone(), 0.0),
//!         })
//!     };
//!
//!     let report = evaluator.evaluate(
//!         "tictactoe",
//!         &agents,
//!         "tictactoe.elo",
//!         ClosenessMatchmaker::default(),
//!         &mut executor,
//!         None,
//!     )?;
//!     print!("{}", report.state.standings_table(0));
//!     Ok(())
//! }
//! ```
pub use anyhow;

pub mod agent;
pub mod agent_collector;
pub mod configuration;
pub mod elo;
pub mod error;
pub mod game_interface;
mod logger;
pub mod match_runner;
pub mod openings;
pub mod rating;
pub mod rating_store;
pub mod roster;
pub mod server;
pub mod tournament_scheduler;
pub mod tournament_strategy;

/// Commonly used types and traits for quick access.
///
/// Import this prelude to get started easily:
/// ```rust
/// use elo_tournament::prelude::*;
/// ```
pub mod prelude {
    pub use crate::agent::{Agent, NamedAgent};
    pub use crate::configuration::Configuration;
    pub use crate::error::{ConfigurationError, MatchError, StoreError, TournamentError};
    pub use crate::game_interface::{MatchExecutor, MatchReport, MatchRequest, OpeningBook};
    pub use crate::match_runner::RefereeProcess;
    pub use crate::openings::WeightedOpenings;
    pub use crate::rating::{RatingRecord, TournamentState};
    pub use crate::server::{Evaluator, SessionReport};
    pub use crate::tournament_strategy::*;
}
