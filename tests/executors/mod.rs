//! Scripted executors standing in for a real game.

use std::collections::HashMap;

use elo_tournament::prelude::*;

fn report(request: &MatchRequest<'_, NamedAgent>, first: f64, second: f64) -> MatchReport {
    MatchReport {
        first: (request.first.name.clone(), first),
        second: (request.second.name.clone(), second),
    }
}

/// Stronger agent always wins, equal strength draws. Unlisted agents have strength 0.
pub struct Strength {
    strength: HashMap<String, u32>,
    pub games: Vec<(String, String)>,
}

impl Strength {
    pub fn new(strength: &[(&str, u32)]) -> Strength {
        Strength {
            strength: strength
                .iter()
                .map(|(name, s)| (name.to_string(), *s))
                .collect(),
            games: vec![],
        }
    }

    fn of(&self, agent: &NamedAgent) -> u32 {
        self.strength.get(&agent.name).copied().unwrap_or(0)
    }
}

impl MatchExecutor<NamedAgent> for Strength {
    fn play(&mut self, request: MatchRequest<'_, NamedAgent>) -> Result<MatchReport, MatchError> {
        self.games
            .push((request.first.name.clone(), request.second.name.clone()));
        let (a, b) = (self.of(request.first), self.of(request.second));
        Ok(match a.cmp(&b) {
            std::cmp::Ordering::Greater => report(&request, 100.0, 0.0),
            std::cmp::Ordering::Less => report(&request, 0.0, 100.0),
            std::cmp::Ordering::Equal => report(&request, 50.0, 50.0),
        })
    }
}

/// Plays `ok` games normally (first seat wins), then fails every game.
pub struct FailAfter {
    pub ok: usize,
    pub calls: usize,
    pub too_long: bool,
}

impl MatchExecutor<NamedAgent> for FailAfter {
    fn play(&mut self, request: MatchRequest<'_, NamedAgent>) -> Result<MatchReport, MatchError> {
        self.calls += 1;
        if self.calls <= self.ok {
            return Ok(report(&request, 100.0, 0.0));
        }
        if self.too_long {
            Err(MatchError::TooLong {
                reason: "move limit reached".into(),
            })
        } else {
            Err(MatchError::Failed(anyhow::anyhow!("engine crashed")))
        }
    }
}
