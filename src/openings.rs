//! Random opening overrides.

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde::Deserialize;

use crate::game_interface::OpeningBook;

/// Picks one opening out of a fixed list, or none at all with probability `skip_probability`.
///
/// An opening is a space separated list of moves (`"j10 k11"`). Listing the same opening twice
/// makes it twice as likely.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeightedOpenings {
    pub candidates: Vec<String>,
    #[serde(default)]
    pub skip_probability: f64,
}

impl WeightedOpenings {
    pub fn new(candidates: Vec<String>, skip_probability: f64) -> WeightedOpenings {
        WeightedOpenings {
            candidates,
            skip_probability,
        }
    }
}

impl OpeningBook for WeightedOpenings {
    fn opening(&mut self, rng: &mut dyn RngCore) -> Option<Vec<String>> {
        if rng.gen::<f64>() < self.skip_probability {
            return None;
        }
        let chosen = self.candidates.choose(rng)?;
        Some(chosen.split_whitespace().map(str::to_owned).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn opening_is_split_into_moves() {
        let mut book = WeightedOpenings::new(vec!["j10 k11".into()], 0.0);
        let mut rng = StdRng::seed_from_u64(9);
        assert_eq!(
            book.opening(&mut rng),
            Some(vec!["j10".to_string(), "k11".to_string()])
        );
    }

    #[test]
    fn skip_probability_one_never_forces_an_opening() {
        let mut book = WeightedOpenings::new(vec!["ee".into(), "dd".into()], 1.0);
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..50 {
            assert_eq!(book.opening(&mut rng), None);
        }
    }

    #[test]
    fn low_draw_skips_the_opening() {
        let mut book = WeightedOpenings::new(vec!["ee".into()], 0.25);
        assert_eq!(book.opening(&mut StepRng::new(0, 0)), None);
    }

    #[test]
    fn empty_book_gives_nothing() {
        let mut book = WeightedOpenings::new(vec![], 0.0);
        let mut rng = StdRng::seed_from_u64(9);
        assert_eq!(book.opening(&mut rng), None);
    }

    #[test]
    fn every_candidate_can_come_up() {
        let mut book = WeightedOpenings::new(vec!["ee".into(), "dd".into(), "ff".into()], 0.0);
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..300 {
            if let Some(moves) = book.opening(&mut rng) {
                seen.insert(moves.concat());
            }
        }
        assert_eq!(seen.len(), 3);
    }
}
