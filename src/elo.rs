//! Elo rating updates with adaptive K factors.
//!
//! Every agent moves by `K * (actual - expected)`, where `K` depends on how established both the
//! agent and its opponent are. Draws are scored as a win for the lower-rated agent, with half
//! the usual K: this is an approximation that pulls ratings together, not a literal outcome.

use std::fmt;

use crate::rating::RatingRecord;

/// Expected score of an agent rated `rating` against one rated `opponent`.
pub fn expected_score(rating: f64, opponent: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent - rating) / 400.0))
}

/// Result of a game, from the point of view of the seating order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    FirstWins,
    SecondWins,
    Draw,
}

impl Outcome {
    /// Classifies the two seat scores reported by a referee: `100` is a win, anything else when
    /// neither side reached it is a draw.
    pub fn from_scores(first: f64, second: f64) -> Outcome {
        if first == 100.0 {
            Outcome::FirstWins
        } else if second == 100.0 {
            Outcome::SecondWins
        } else {
            Outcome::Draw
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::FirstWins => "1st player wins",
            Outcome::SecondWins => "2nd player wins",
            Outcome::Draw => "Draws",
        })
    }
}

/// A `games < below` threshold paired with the multiplier applied under it.
pub type Tier = (u32, f64);

/// Tunable K-factor tiers.
///
/// An agent's own tier is the first entry of `own_tiers` whose bound exceeds its game count,
/// or `established` when none does. The result is then divided by the first matching entry of
/// `opponent_discounts`, looked up with the opponent's game count.
#[derive(Debug, Clone, PartialEq)]
pub struct KSchedule {
    pub base: f64,
    pub own_tiers: Vec<Tier>,
    pub established: f64,
    pub opponent_discounts: Vec<Tier>,
}

impl Default for KSchedule {
    fn default() -> Self {
        KSchedule {
            base: 42.0 * 3.0,
            own_tiers: vec![(20, 2.5), (40, 1.0), (60, 0.5)],
            established: 0.4,
            opponent_discounts: vec![(10, 10.0), (20, 3.0), (40, 2.0)],
        }
    }
}

impl KSchedule {
    /// K factor for `agent` after a game against `opponent`, starting from `base`.
    ///
    /// Game counts must already include the game being rated.
    pub fn k_factor(&self, base: f64, agent: &RatingRecord, opponent: &RatingRecord) -> f64 {
        if agent.fixed {
            return 0.0;
        }
        let own = self
            .own_tiers
            .iter()
            .find(|(below, _)| agent.played < *below)
            .map_or(self.established, |(_, multiplier)| *multiplier);
        let discount = self
            .opponent_discounts
            .iter()
            .find(|(below, _)| opponent.played < *below)
            .map_or(1.0, |(_, divisor)| *divisor);
        base * own / discount
    }
}

/// Applies game results to a pair of rating records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingUpdater {
    pub schedule: KSchedule,
}

impl RatingUpdater {
    pub fn new(schedule: KSchedule) -> RatingUpdater {
        RatingUpdater { schedule }
    }

    /// Records one completed game between `first` and `second`.
    ///
    /// Both game counts go up by one before the K factors are chosen.
    pub fn update(&self, first: &mut RatingRecord, second: &mut RatingRecord, outcome: Outcome) {
        first.played += 1;
        second.played += 1;

        let (base, first_wins) = match outcome {
            Outcome::FirstWins => (self.schedule.base, true),
            Outcome::SecondWins => (self.schedule.base, false),
            Outcome::Draw => (self.schedule.base / 2.0, first.elo < second.elo),
        };

        let k_first = self.schedule.k_factor(base, first, second);
        let k_second = self.schedule.k_factor(base, second, first);
        let (elo_first, elo_second) =
            next_ratings(first.elo, second.elo, k_first, k_second, first_wins);
        first.elo = elo_first;
        second.elo = elo_second;
    }
}

/// Post-game ratings of `a` and `b` given their K factors and whether `a` won.
pub fn next_ratings(rating_a: f64, rating_b: f64, k_a: f64, k_b: f64, a_wins: bool) -> (f64, f64) {
    let pa = expected_score(rating_a, rating_b);
    let pb = expected_score(rating_b, rating_a);
    let (score_a, score_b) = if a_wins { (1.0, 0.0) } else { (0.0, 1.0) };
    (rating_a + k_a * (score_a - pa), rating_b + k_b * (score_b - pb))
}
