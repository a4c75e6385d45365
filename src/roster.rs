//! Binding the live agent list to the persisted rating records.
//!
//! Each run starts from whatever agents are configured today, which rarely matches the stored
//! records exactly: new generations appear, old ones are retired. [`reconcile`] creates records for
//! newcomers (at most `admission_cap` untested agents in the pool at once), reports records whose
//! agent disappeared, and refuses rosters where two agents share a name.

use std::collections::HashSet;

use tracing::{error, info, instrument, warn};

use crate::agent::Agent;
use crate::error::ConfigurationError;
use crate::rating::{RatingRecord, TournamentState};

/// Default limit on untested agents admitted in a single run.
pub const ADMISSION_CAP: usize = 200;

/// Default number of games after which an agent no longer counts against the admission cap.
pub const GRADUATED_GAMES: u32 = 20;

/// Limits applied while reconciling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionPolicy {
    /// Maximum number of not yet graduated agents bound in one run.
    pub admission_cap: usize,
    /// Games needed before an agent stops consuming admission budget.
    pub graduated_games: u32,
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        AdmissionPolicy {
            admission_cap: ADMISSION_CAP,
            graduated_games: GRADUATED_GAMES,
        }
    }
}

/// One agent of the live roster attached to its rating record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    /// Index in the agent list given to [`reconcile`].
    pub agent: usize,
    /// Index in [`TournamentState::players`].
    pub record: usize,
}

/// Outcome of [`reconcile`]: which agents play this run, and what was left aside.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    bindings: Vec<Binding>,
    admitted: Vec<usize>,
    deferred: Vec<usize>,
    dangling: Vec<String>,
}

impl Roster {
    /// Agents taking part in this run, in roster order.
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Record index bound to the agent at `agent`, if that agent plays this run.
    pub fn record_of(&self, agent: usize) -> Option<usize> {
        self.bindings
            .iter()
            .find(|b| b.agent == agent)
            .map(|b| b.record)
    }

    /// Agents for which a new record was created during this run.
    pub fn admitted(&self) -> &[usize] {
        &self.admitted
    }

    /// Agents left out because the admission cap was reached. They are retried next run.
    pub fn deferred(&self) -> &[usize] {
        &self.deferred
    }

    /// Stored records without a matching agent. They are kept untouched.
    pub fn dangling(&self) -> &[String] {
        &self.dangling
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Binds `agents` to the records of `state`, creating records for new agents.
///
/// Agents are processed in order. A known agent is always bound. An unknown agent gets a new
/// record unless the number of bound agents still under `graduated_games` has already reached
/// `admission_cap`, in which case it sits this run out.
///
/// # Errors
/// [`ConfigurationError::DuplicateAgent`] if two agents share a name. Nothing is modified in
/// that case.
#[instrument(skip_all, fields(agents = agents.len(), records = state.players.len()))]
pub fn reconcile<A: Agent>(
    agents: &[A],
    state: &mut TournamentState,
    policy: AdmissionPolicy,
) -> Result<Roster, ConfigurationError> {
    check_unique_names(agents)?;

    let mut roster = Roster::default();
    let mut untested = 0usize;

    for (index, agent) in agents.iter().enumerate() {
        let name = agent.name();

        let record = match state.position(name) {
            Some(record) => record,
            None if untested >= policy.admission_cap => {
                info!("admission cap reached, '{name}' deferred to a later run");
                roster.deferred.push(index);
                continue;
            }
            None => {
                info!("adding '{name}'");
                state.players.push(RatingRecord::new(name));
                roster.admitted.push(index);
                state.players.len() - 1
            }
        };

        if state.players[record].played < policy.graduated_games {
            untested += 1;
        }
        roster.bindings.push(Binding {
            agent: index,
            record,
        });
    }

    let live: HashSet<&str> = agents.iter().map(Agent::name).collect();
    for record in &state.players {
        if !live.contains(record.name.as_str()) {
            warn!("dangling rating: '{}' has no configured agent", record.name);
            roster.dangling.push(record.name.clone());
        }
    }

    info!(
        bound = roster.bindings.len(),
        admitted = roster.admitted.len(),
        deferred = roster.deferred.len(),
        dangling = roster.dangling.len(),
        "roster reconciled"
    );
    Ok(roster)
}

fn check_unique_names<A: Agent>(agents: &[A]) -> Result<(), ConfigurationError> {
    let mut seen = HashSet::with_capacity(agents.len());
    for agent in agents {
        if !seen.insert(agent.name()) {
            error!("bad config: '{}' configured more than once", agent.name());
            return Err(ConfigurationError::DuplicateAgent {
                name: agent.name().to_owned(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::{RANDOM_AGENT, STARTING_ELO};

    fn state_with(records: &[(&str, u32, f64)]) -> TournamentState {
        let mut state = TournamentState::new("g");
        for &(name, played, elo) in records {
            state.players.push(RatingRecord {
                name: name.to_owned(),
                played,
                elo,
                fixed: false,
            });
        }
        state
    }

    #[test]
    fn new_agent_gets_default_record() {
        let mut state = state_with(&[("A", 30, 1600.0), ("B", 25, 1400.0)]);
        let roster = reconcile(
            &["random", "A", "B", "C"],
            &mut state,
            AdmissionPolicy::default(),
        )
        .unwrap();

        let c = state.get("C").unwrap();
        assert_eq!(c.played, 0);
        assert_eq!(c.elo, STARTING_ELO);
        assert!(!c.fixed);
        assert_eq!(roster.len(), 4);
        assert_eq!(roster.admitted(), &[3]);
        assert!(roster.dangling().is_empty());
        assert_eq!(state.get("A").unwrap().elo, 1600.0);
    }

    #[test]
    fn bindings_point_at_matching_records() {
        let mut state = state_with(&[("A", 30, 1600.0)]);
        let agents = ["A", "new"];
        let roster = reconcile(&agents, &mut state, AdmissionPolicy::default()).unwrap();
        for binding in roster.bindings() {
            assert_eq!(state.players[binding.record].name, agents[binding.agent]);
        }
        assert_eq!(roster.record_of(0), state.position("A"));
    }

    #[test]
    fn duplicate_names_are_fatal() {
        let mut state = state_with(&[("A", 30, 1600.0)]);
        let before = state.clone();
        let err = reconcile(&["A", "B", "A"], &mut state, AdmissionPolicy::default()).unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateAgent { ref name } if name == "A"));
        assert_eq!(state, before);
    }

    #[test]
    fn duplicate_new_names_are_fatal() {
        let mut state = state_with(&[]);
        let err = reconcile(&["X", "X"], &mut state, AdmissionPolicy::default()).unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateAgent { .. }));
    }

    #[test]
    fn missing_agents_are_reported_and_kept() {
        let mut state = state_with(&[("retired", 80, 1750.0)]);
        let roster = reconcile(&["fresh"], &mut state, AdmissionPolicy::default()).unwrap();

        let mut dangling = roster.dangling().to_vec();
        dangling.sort();
        assert_eq!(dangling, [RANDOM_AGENT, "retired"]);
        assert_eq!(state.get("retired").unwrap().elo, 1750.0);
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn admission_cap_defers_extra_newcomers() {
        let mut state = state_with(&[]);
        let policy = AdmissionPolicy {
            admission_cap: 2,
            graduated_games: 20,
        };
        let roster = reconcile(&["n1", "n2", "n3", "n4"], &mut state, policy).unwrap();
        assert_eq!(roster.admitted(), &[0, 1]);
        assert_eq!(roster.deferred(), &[2, 3]);
        assert!(state.get("n3").is_none());
        assert_eq!(roster.record_of(2), None);
    }

    #[test]
    fn untested_known_agents_use_admission_budget() {
        let mut state = state_with(&[("rookie", 3, 1500.0)]);
        let policy = AdmissionPolicy {
            admission_cap: 1,
            graduated_games: 20,
        };
        let roster = reconcile(&["rookie", "newcomer"], &mut state, policy).unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.deferred(), &[1]);
    }

    #[test]
    fn graduated_agents_do_not_use_admission_budget() {
        let mut state = state_with(&[("vet1", 20, 1500.0), ("vet2", 45, 1500.0)]);
        let policy = AdmissionPolicy {
            admission_cap: 1,
            graduated_games: 20,
        };
        let roster = reconcile(&["vet1", "vet2", "n1", "n2"], &mut state, policy).unwrap();
        assert_eq!(roster.len(), 3);
        assert_eq!(roster.admitted(), &[2]);
        assert_eq!(roster.deferred(), &[3]);
    }

    #[test]
    fn known_agents_bind_even_past_the_cap() {
        let mut state = state_with(&[("old", 2, 1500.0)]);
        let policy = AdmissionPolicy {
            admission_cap: 1,
            graduated_games: 20,
        };
        let roster = reconcile(&["n1", "old"], &mut state, policy).unwrap();
        assert_eq!(roster.len(), 2);
        assert!(roster.deferred().is_empty());
    }
}
