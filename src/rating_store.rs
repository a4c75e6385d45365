//! Reading and writing the rating file.
//!
//! The file is a pretty-printed JSON object `{game, players: [{name, played, elo, fixed}], log}`.
//! It is the only copy of the ratings and is rewritten as a whole after every round, with
//! players sorted by descending rating so the file itself reads as a ranking.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use crate::error::StoreError;
use crate::rating::{RatingRecord, TournamentState};

/// On-disk layout of a [`TournamentState`], with players in ranking order.
#[derive(Serialize)]
struct RankedState<'a> {
    game: &'a str,
    players: Vec<&'a RatingRecord>,
    log: &'a [String],
}

/// Reads a rating file.
#[instrument]
pub fn load(path: &Path) -> Result<TournamentState, StoreError> {
    let contents = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_owned(),
        source,
    })?;
    let state: TournamentState =
        serde_json::from_str(&contents).map_err(|source| StoreError::Json {
            path: path.to_owned(),
            source,
        })?;
    check_unique_records(path, &state)?;
    debug!(players = state.players.len(), log = state.log.len(), "rating file loaded");
    Ok(state)
}

fn check_unique_records(path: &Path, state: &TournamentState) -> Result<(), StoreError> {
    let mut seen = HashSet::with_capacity(state.players.len());
    for record in &state.players {
        if !seen.insert(record.name.as_str()) {
            error!("rating file {path:?} holds '{}' more than once", record.name);
            return Err(StoreError::DuplicateRecord {
                path: path.to_owned(),
                name: record.name.clone(),
            });
        }
    }
    Ok(())
}

/// Reads a rating file, or starts a fresh state for `game` if the file does not exist yet.
///
/// A file that exists but cannot be parsed is an error: it is never silently replaced.
pub fn load_or_new(path: &Path, game: &str) -> Result<TournamentState, StoreError> {
    if !path.exists() {
        info!("no rating file at {path:?}, starting a new one for '{game}'");
        return Ok(TournamentState::new(game));
    }
    let state = load(path)?;
    if state.game != game {
        warn!(
            "rating file {path:?} belongs to game '{}', expected '{game}'",
            state.game
        );
    }
    Ok(state)
}

/// Writes `state` to `path`, players sorted by descending rating.
///
/// Only the file is sorted: the in-memory order of `state.players` is left untouched so record
/// positions held by a [`Roster`](crate::roster::Roster) stay valid.
///
/// The content goes to a sibling temporary file first, which is then renamed over `path`, so a
/// crash mid-write leaves the previous file intact.
#[instrument(skip(state), fields(players = state.players.len()))]
pub fn save(path: &Path, state: &TournamentState) -> Result<(), StoreError> {
    let ranked = RankedState {
        game: &state.game,
        players: state.standings(0),
        log: &state.log,
    };
    let json = serde_json::to_string_pretty(&ranked).map_err(|source| StoreError::Json {
        path: path.to_owned(),
        source,
    })?;

    let tmp = temporary_path(path);
    std::fs::write(&tmp, json).map_err(|source| StoreError::Io {
        path: tmp.clone(),
        source,
    })?;
    std::fs::rename(&tmp, path).map_err(|source| StoreError::Io {
        path: path.to_owned(),
        source,
    })?;
    debug!("rating file saved");
    Ok(())
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
