//! Pairing strategies used by the evaluator to pick the next game.
//!
//! The evaluator calls [`TournamentStrategy::choose_players`] once per round with the ratings of
//! every agent bound for this run, and stops scheduling when it returns `None`.
//!
//! # Provided Strategy
//! [`ClosenessMatchmaker`] favours agents with few games and opponents of similar strength:
//! 1. the candidates are the agents under the first play-count bucket that has any;
//! 2. the first player is drawn from a bag where each candidate appears `max(1, 50 - played)`
//!    times ([`sample_first_player`]);
//! 3. every other agent is scored by how close the game would be, and the second player is drawn
//!    with weight `200^score` ([`sample_second_player`]);
//! 4. a coin flip decides who moves first.
//!
//! Every sampling function takes the random source as a parameter, so a seeded or stepped RNG
//! gives exact, repeatable pairings.

use std::cmp::Ordering;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, trace};

use crate::elo::expected_score;
use crate::rating::RatingRecord;

/// Default play-count buckets, in increasing order.
pub const CHOOSE_BUCKETS: [u32; 8] = [10, 20, 30, 40, 50, 60, 80, 100];

/// Decides which two agents play next.
pub trait TournamentStrategy {
    /// Picks an ordered pair `(first, second)` of indices into `pool`.
    ///
    /// `None` means no game should be scheduled anymore for this pool.
    fn choose_players<R: Rng + ?Sized>(
        &mut self,
        pool: &[&RatingRecord],
        rng: &mut R,
    ) -> Option<(usize, usize)>;
}

/// Constants of the closeness matchmaker.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchmakingParams {
    /// Increasing play-count thresholds; the first one with an agent under it gives the candidates.
    pub buckets: Vec<u32>,
    /// A candidate appears `max(1, first_weight_base - played)` times in the first-player bag.
    pub first_weight_base: u32,
    /// Second-player weight is `exponential_base ^ score`.
    pub exponential_base: f64,
    /// Smallest closeness exponent.
    pub temperature_floor: f64,
    /// Closeness exponent is `temperature_scale / (played + 1)` when above the floor.
    pub temperature_scale: f64,
}

impl Default for MatchmakingParams {
    fn default() -> Self {
        MatchmakingParams {
            buckets: CHOOSE_BUCKETS.to_vec(),
            first_weight_base: 50,
            exponential_base: 200.0,
            temperature_floor: 2.0,
            temperature_scale: 20.0,
        }
    }
}

/// Pairs under-played agents with opponents of similar rating. See the [module docs](self).
#[derive(Debug, Clone, Default)]
pub struct ClosenessMatchmaker {
    pub params: MatchmakingParams,
}

impl ClosenessMatchmaker {
    pub fn new(params: MatchmakingParams) -> ClosenessMatchmaker {
        ClosenessMatchmaker { params }
    }
}

impl TournamentStrategy for ClosenessMatchmaker {
    fn choose_players<R: Rng + ?Sized>(
        &mut self,
        pool: &[&RatingRecord],
        rng: &mut R,
    ) -> Option<(usize, usize)> {
        choose_players(pool, &self.params, rng)
    }
}

/// Indices of the agents under the first bucket that has any, or `None` once every agent has
/// reached the last bucket.
pub fn candidate_bucket(pool: &[&RatingRecord], buckets: &[u32]) -> Option<Vec<usize>> {
    buckets.iter().find_map(|&bucket| {
        let candidates: Vec<usize> = pool
            .iter()
            .enumerate()
            .filter(|(_, r)| r.played < bucket)
            .map(|(i, _)| i)
            .collect();
        if candidates.is_empty() {
            None
        } else {
            trace!(bucket, candidates = candidates.len());
            Some(candidates)
        }
    })
}

/// Draws the first player among `candidates` (indices into `pool`).
///
/// Each candidate is put `max(1, first_weight_base - played)` times in a bag; the bag is
/// shuffled and one entry popped. `None` only if `candidates` is empty.
pub fn sample_first_player<R: Rng + ?Sized>(
    pool: &[&RatingRecord],
    candidates: &[usize],
    first_weight_base: u32,
    rng: &mut R,
) -> Option<usize> {
    let mut bag = Vec::new();
    for &candidate in candidates {
        let yet_to_play = first_weight_base
            .saturating_sub(pool[candidate].played)
            .max(1);
        bag.extend(std::iter::repeat(candidate).take(yet_to_play as usize));
    }
    bag.shuffle(rng);
    bag.pop()
}

/// How close a game between `agent` and `first` is expected to be, in `[0, 1]`, sharpened by
/// the agent's temperature.
///
/// `1.0` is an even game. The exponent is
/// `max(temperature_floor, temperature_scale / (played + 1))` with `played` taken from `agent`,
/// the opponent being scored, not from `first`. An opponent with few games thus gets a higher
/// exponent, and only near-even pairings keep a weight close to the top; well-established
/// opponents settle on the floor and are scored more leniently.
pub fn closeness(agent: &RatingRecord, first: &RatingRecord, params: &MatchmakingParams) -> f64 {
    let z = 1.0 - 2.0 * (0.5 - expected_score(agent.elo, first.elo)).abs();
    let temperature = params
        .temperature_floor
        .max(params.temperature_scale / (agent.played as f64 + 1.0));
    z.powf(temperature)
}

/// Draws an opponent for `pool[first]` among every other agent.
///
/// Opponents are sorted by descending [`closeness`] and one is picked with weight
/// `exponential_base ^ closeness`, walking the sorted list until the running total exceeds a
/// uniform threshold. Falls back to the least close opponent if rounding leaves the threshold
/// unreached. `None` if `first` is alone in the pool.
pub fn sample_second_player<R: Rng + ?Sized>(
    pool: &[&RatingRecord],
    first: usize,
    params: &MatchmakingParams,
    rng: &mut R,
) -> Option<usize> {
    let mut scored: Vec<(f64, usize)> = pool
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != first)
        .map(|(i, r)| (closeness(r, pool[first], params), i))
        .collect();
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

    let total: f64 = scored
        .iter()
        .map(|(score, _)| params.exponential_base.powf(*score))
        .sum();
    let over_this = rng.gen::<f64>() * total;

    let mut acc = 0.0;
    for &(score, index) in &scored {
        acc += params.exponential_base.powf(score);
        if acc > over_this {
            return Some(index);
        }
    }
    scored.last().map(|&(_, index)| index)
}

/// Picks the next pairing, or `None` when every agent has reached the last bucket (or fewer than
/// two agents are available).
///
/// Returns `(mover, responder)`: which of the two sampled agents goes first is a coin flip.
pub fn choose_players<R: Rng + ?Sized>(
    pool: &[&RatingRecord],
    params: &MatchmakingParams,
    rng: &mut R,
) -> Option<(usize, usize)> {
    let candidates = candidate_bucket(pool, &params.buckets)?;
    let first = sample_first_player(pool, &candidates, params.first_weight_base, rng)?;
    let second = sample_second_player(pool, first, params, rng)?;

    debug!(
        first = %pool[first].name,
        second = %pool[second].name,
        "pairing chosen"
    );

    if rng.gen::<f64>() > 0.5 {
        Some((first, second))
    } else {
        Some((second, first))
    }
}
