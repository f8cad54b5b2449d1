//! Random selection helpers shared by the generators.

use rand::Rng;
use rand::seq::SliceRandom;
use rand_distr::{Bernoulli, Distribution};

use crate::db::SeedError;

/// Picks one element uniformly at random, or `None` from an empty slice.
pub fn pick_one<'a, T>(population: &'a [T], rng: &mut impl Rng) -> Option<&'a T> {
    population.choose(rng)
}

/// Picks `k` distinct elements uniformly at random, without replacement.
///
/// Always returns a `Vec`, even for `k == 1`. `k` is clamped to the
/// population size, so an empty population yields an empty `Vec`.
pub fn sample_distinct<T: Clone>(population: &[T], k: usize, rng: &mut impl Rng) -> Vec<T> {
    let amount = k.min(population.len());
    rand::seq::index::sample(rng, population.len(), amount)
        .into_iter()
        .map(|idx| population[idx].clone())
        .collect()
}

/// A weighted two-outcome coin, used for "maybe produce a value" decisions.
#[derive(Debug, Clone, Copy)]
pub struct Coin {
    probability: f64,
    distribution: Bernoulli,
}

impl Coin {
    /// Creates a coin landing heads with the given probability.
    pub fn new(probability: f64) -> Result<Self, SeedError> {
        let distribution =
            Bernoulli::new(probability).map_err(|_| SeedError::InvalidProbability(probability))?;
        Ok(Self {
            probability,
            distribution,
        })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn flip(&self, rng: &mut impl Rng) -> bool {
        self.distribution.sample(rng)
    }

    /// Produces `Some(value(rng))` on heads and `None` on tails.
    pub fn maybe<R: Rng + ?Sized, T>(
        &self,
        rng: &mut R,
        value: impl FnOnce(&mut R) -> T,
    ) -> Option<T> {
        if self.distribution.sample(rng) {
            Some(value(rng))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_pick_one_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        let empty: [i64; 0] = [];
        assert!(pick_one(&empty, &mut rng).is_none());
        assert_eq!(pick_one(&[7], &mut rng), Some(&7));
    }

    #[test]
    fn test_sample_distinct_has_no_duplicates() {
        let mut rng = StdRng::seed_from_u64(2);
        let population: Vec<i64> = (1..=10).collect();

        for k in 0..=12 {
            let picked = sample_distinct(&population, k, &mut rng);
            assert_eq!(picked.len(), k.min(population.len()));

            let unique: HashSet<_> = picked.iter().collect();
            assert_eq!(unique.len(), picked.len());
            assert!(picked.iter().all(|id| population.contains(id)));
        }
    }

    #[test]
    fn test_sample_distinct_single_is_still_a_vec() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(sample_distinct(&[42], 1, &mut rng), vec![42]);
        assert!(sample_distinct::<i64>(&[], 3, &mut rng).is_empty());
    }

    #[test]
    fn test_coin_extremes() {
        let mut rng = StdRng::seed_from_u64(4);
        let never = Coin::new(0.0).unwrap();
        let always = Coin::new(1.0).unwrap();

        for _ in 0..100 {
            assert!(never.maybe(&mut rng, |_| 1).is_none());
            assert_eq!(always.maybe(&mut rng, |r| r.gen_range(5..6)), Some(5));
        }
    }

    #[test]
    fn test_coin_rejects_invalid_probability() {
        assert!(matches!(Coin::new(1.5), Err(SeedError::InvalidProbability(_))));
        assert!(Coin::new(-0.1).is_err());
        assert!(Coin::new(f64::NAN).is_err());
    }

    #[test]
    fn test_fair_coin_is_roughly_fair() {
        let mut rng = StdRng::seed_from_u64(5);
        let coin = Coin::new(0.5).unwrap();
        let heads = (0..1000).filter(|_| coin.flip(&mut rng)).count();

        assert!(heads > 400 && heads < 600, "Expected ~500 heads, got {heads}");
    }
}
