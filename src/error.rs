//! Error types surfaced by the tournament.
//!
//! Top-level operations return [`anyhow::Result`]; the types below are the ones a caller may want
//! to tell apart, and can be recovered with [`anyhow::Error::downcast_ref`].

use std::path::PathBuf;

use thiserror::Error;

/// Problems with the agent roster or tournament settings. Always fatal, raised before any game.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Two configured agents share the same name, so both would bind to one rating record.
    #[error("bad config: more than one agent is named '{name}'")]
    DuplicateAgent {
        /// The colliding name.
        name: String,
    },
    /// Any other invalid setting (malformed roster file, empty bucket list, ...).
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Failures reading or writing the rating file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file could not be read or written.
    #[error("io error on '{path}': {source}")]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Two stored records carry the same name.
    #[error("invalid rating file '{path}': duplicate record '{name}'")]
    DuplicateRecord {
        /// File being parsed.
        path: PathBuf,
        /// The repeated name.
        name: String,
    },
    /// The file content is not a valid rating file.
    #[error("invalid rating file '{path}': {source}")]
    Json {
        /// File being parsed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

/// What a [`MatchExecutor`](crate::game_interface::MatchExecutor) may report instead of a result.
#[derive(Debug, Error)]
pub enum MatchError {
    /// The game exceeded its length limit and was aborted. Recoverable: the round is skipped.
    #[error("match too long: {reason}")]
    TooLong {
        /// Executor-provided description.
        reason: String,
    },
    /// Anything else. Fatal for the tournament.
    #[error("match failed: {0}")]
    Failed(#[from] anyhow::Error),
}

/// Fatal failure of a running tournament.
#[derive(Debug, Error)]
pub enum TournamentError {
    /// The executor failed in a way that cannot be skipped.
    #[error("{first} vs {second} aborted: {source}")]
    Match {
        /// Agent in the first seat.
        first: String,
        /// Agent in the second seat.
        second: String,
        /// Executor error.
        #[source]
        source: MatchError,
    },
    /// The matchmaker paired an agent with itself.
    #[error("'{name}' cannot play against itself")]
    SelfPairing {
        /// Agent chosen for both seats.
        name: String,
    },
    /// The state could not be persisted after a round.
    #[error(transparent)]
    Store(#[from] StoreError),
}
