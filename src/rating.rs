//! Rating records and the persisted tournament state.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Rating given to an agent the first time it is admitted.
pub const STARTING_ELO: f64 = 1500.0;

/// Name of the baseline agent anchoring the scale.
pub const RANDOM_AGENT: &str = "random";

/// Fixed rating of [`RANDOM_AGENT`].
pub const RANDOM_ELO: f64 = 500.0;

/// Rating of a single agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub name: String,
    /// Number of completed games.
    pub played: u32,
    pub elo: f64,
    /// When set, `elo` never changes.
    #[serde(default)]
    pub fixed: bool,
}

impl RatingRecord {
    /// A freshly admitted, unfixed agent.
    pub fn new(name: impl Into<String>) -> RatingRecord {
        RatingRecord {
            name: name.into(),
            played: 0,
            elo: STARTING_ELO,
            fixed: false,
        }
    }

    /// An anchor agent whose rating never moves.
    pub fn fixed(name: impl Into<String>, elo: f64) -> RatingRecord {
        RatingRecord {
            name: name.into(),
            played: 0,
            elo,
            fixed: true,
        }
    }
}

/// Everything stored in a rating file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentState {
    /// Game (or domain) these ratings belong to.
    pub game: String,
    pub players: Vec<RatingRecord>,
    /// Human readable summaries of past matches, oldest first. Never read back by the tournament.
    #[serde(default)]
    pub log: Vec<String>,
}

impl TournamentState {
    /// State of a game that has never been rated: only the fixed random baseline.
    pub fn new(game: impl Into<String>) -> TournamentState {
        TournamentState {
            game: game.into(),
            players: vec![RatingRecord::fixed(RANDOM_AGENT, RANDOM_ELO)],
            log: vec![],
        }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.players.iter().position(|p| p.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&RatingRecord> {
        self.players.iter().find(|p| p.name == name)
    }

    /// Sorts players by descending rating. Ties keep their current relative order.
    pub fn sort_by_elo(&mut self) {
        self.players.sort_by(|a, b| descending_elo(a, b));
    }

    /// Players ranked by descending rating, keeping only those with at least `min_games` games.
    ///
    /// Fixed agents are always listed since they anchor the scale.
    pub fn standings(&self, min_games: u32) -> Vec<&RatingRecord> {
        let mut ranked: Vec<_> = self
            .players
            .iter()
            .filter(|p| p.fixed || p.played >= min_games)
            .collect();
        ranked.sort_by(|a, b| descending_elo(a, b));
        ranked
    }

    /// Text table of [`standings`](Self::standings).
    pub fn standings_table(&self, min_games: u32) -> String {
        let ranked = self.standings(min_games);
        let width = ranked
            .iter()
            .map(|p| p.name.len())
            .max()
            .unwrap_or(0)
            .max("Agent".len());

        let mut out = format!("{:<width$} {:>8} {:>9}\n", "Agent", "Played", "Elo");
        out.push_str(&"-".repeat(width + 19));
        out.push('\n');
        for p in ranked {
            let marker = if p.fixed { " (fixed)" } else { "" };
            out.push_str(&format!(
                "{:<width$} {:>8} {:>9.1}{marker}\n",
                p.name, p.played, p.elo
            ));
        }
        out
    }
}

fn descending_elo(a: &RatingRecord, b: &RatingRecord) -> Ordering {
    b.elo.partial_cmp(&a.elo).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, played: u32, elo: f64) -> RatingRecord {
        RatingRecord {
            name: name.to_owned(),
            played,
            elo,
            fixed: false,
        }
    }

    #[test]
    fn new_state_is_seeded_with_random() {
        let state = TournamentState::new("hex13");
        assert_eq!(state.game, "hex13");
        assert_eq!(state.players.len(), 1);
        let random = state.get(RANDOM_AGENT).unwrap();
        assert!(random.fixed);
        assert_eq!(random.elo, RANDOM_ELO);
        assert_eq!(random.played, 0);
        assert!(state.log.is_empty());
    }

    #[test]
    fn new_record_starts_at_default() {
        let r = RatingRecord::new("gen_5");
        assert_eq!(r.elo, STARTING_ELO);
        assert_eq!(r.played, 0);
        assert!(!r.fixed);
    }

    #[test]
    fn sort_is_descending() {
        let mut state = TournamentState::new("g");
        state.players.push(record("a", 3, 1200.0));
        state.players.push(record("b", 3, 1800.0));
        state.sort_by_elo();
        let names: Vec<_> = state.players.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["b", "a", RANDOM_AGENT]);
    }

    #[test]
    fn standings_filter_keeps_fixed_agents() {
        let mut state = TournamentState::new("g");
        state.players.push(record("veteran", 40, 1700.0));
        state.players.push(record("rookie", 2, 1900.0));

        let names: Vec<_> = state.standings(10).iter().map(|p| p.name.clone()).collect();
        assert_eq!(names, ["veteran", RANDOM_AGENT]);

        let all = state.standings(0);
        assert_eq!(all[0].name, "rookie");
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn table_lists_every_shown_agent() {
        let mut state = TournamentState::new("g");
        state.players.push(record("veteran", 40, 1712.25));
        let table = state.standings_table(0);
        assert!(table.contains("veteran"));
        assert!(table.contains("1712.2") || table.contains("1712.3"));
        assert!(table.contains("(fixed)"));
    }

    #[test]
    fn missing_optional_fields_deserialize() {
        let json = r#"{"game":"g","players":[{"name":"x","played":1,"elo":1400.0}]}"#;
        let state: TournamentState = serde_json::from_str(json).unwrap();
        assert!(!state.players[0].fixed);
        assert!(state.log.is_empty());
    }
}
