//! Random and weighted random strategy implementations

use rand::Rng;
use crate::{Provider, Result};
use super::weight::CumulativeWeights;
use super::{ensure_non_empty, Strategy};

/// Random strategy - uniformly selects a provider
#[derive(Debug, Default)]
pub struct Random;

impl Random {
    /// Create a new Random strategy
    pub fn new() -> Self {
        Self
    }
}

impl Strategy for Random {
    fn select<'a>(&self, candidates: &'a [Provider], _routing_key: Option<&str>) -> Result<&'a Provider> {
        ensure_non_empty(candidates, self.name())?;

        let idx = rand::thread_rng().gen_range(0..candidates.len());
        Ok(&candidates[idx])
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// Weighted random strategy - selection probability is `weight / sum(weight)`
///
/// Zero weight providers are never selected.
#[derive(Debug, Default)]
pub struct WeightedRandom;

impl WeightedRandom {
    /// Create a new Weighted Random strategy
    pub fn new() -> Self {
        Self
    }
}

impl Strategy for WeightedRandom {
    fn select<'a>(&self, candidates: &'a [Provider], _routing_key: Option<&str>) -> Result<&'a Provider> {
        ensure_non_empty(candidates, self.name())?;

        let weights = CumulativeWeights::build(candidates)?;
        let total = weights.ensure_selectable(self.name())?;

        let pos = rand::thread_rng().gen_range(0..total);
        Ok(&candidates[weights.locate(pos)])
    }

    fn name(&self) -> &'static str {
        "weighted-random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::tests::providers;
    use std::collections::{HashMap, HashSet};

    #[test]
    fn test_random_empty() {
        let strategy = Random::new();
        assert!(strategy.select(&[], None).is_err());
    }

    #[test]
    fn test_random_single() {
        let candidates = providers(1);
        let strategy = Random::new();

        let p = strategy.select(&candidates, None).unwrap();
        assert_eq!(p.port, 10000);
    }

    #[test]
    fn test_random_multiple() {
        let candidates = providers(3);
        let strategy = Random::new();

        let ports: HashSet<u16> = (0..100)
            .map(|_| strategy.select(&candidates, None).unwrap().port)
            .collect();

        // With 100 tries on 3 providers, we should see more than one
        assert!(ports.len() > 1);
    }

    #[test]
    fn test_weighted_random_one_to_three() {
        let candidates = vec![
            Provider::new("a", 1).with_weight(1),
            Provider::new("b", 2).with_weight(3),
        ];
        let strategy = WeightedRandom::new();

        let mut counts: HashMap<&str, u32> = HashMap::new();
        for _ in 0..4000 {
            let p = strategy.select(&candidates, None).unwrap();
            *counts.entry(p.host.as_str()).or_insert(0) += 1;
        }

        let a = counts.get("a").copied().unwrap_or(0);
        let b = counts.get("b").copied().unwrap_or(0);
        println!("a: {}, b: {}", a, b);
        assert_eq!(a + b, 4000);
        assert!((800..=1200).contains(&a), "a selected {} times", a);
        assert!((2800..=3200).contains(&b), "b selected {} times", b);
    }

    #[test]
    fn test_weighted_random_chi_square() {
        let weights = [1, 2, 3, 4];
        let candidates: Vec<Provider> = weights
            .iter()
            .enumerate()
            .map(|(i, &w)| Provider::new("127.0.0.1", 10000 + i as u16).with_weight(w))
            .collect();
        let strategy = WeightedRandom::new();

        let trials = 10_000u32;
        let mut observed = [0u32; 4];
        for _ in 0..trials {
            let p = strategy.select(&candidates, None).unwrap();
            observed[(p.port - 10000) as usize] += 1;
        }

        let total_weight: i32 = weights.iter().sum();
        let chi_square: f64 = weights
            .iter()
            .zip(observed.iter())
            .map(|(&w, &o)| {
                let expected = trials as f64 * w as f64 / total_weight as f64;
                (o as f64 - expected).powi(2) / expected
            })
            .sum();

        // 3 degrees of freedom; 16.27 is the 0.001 critical value
        println!("observed: {:?}, chi-square: {:.3}", observed, chi_square);
        assert!(chi_square < 30.0, "chi-square too large: {}", chi_square);
    }

    #[test]
    fn test_weighted_random_zero_weight_never_selected() {
        let candidates = vec![
            Provider::new("zero", 1).with_weight(0),
            Provider::new("one", 2).with_weight(1),
        ];
        let strategy = WeightedRandom::new();

        for _ in 0..200 {
            assert_eq!(strategy.select(&candidates, None).unwrap().host, "one");
        }
    }

    #[test]
    fn test_weighted_random_rejects_negative() {
        let candidates = vec![
            Provider::new("a", 1).with_weight(5),
            Provider::new("b", 2).with_weight(-1),
        ];
        let err = WeightedRandom::new().select(&candidates, None).unwrap_err();
        assert!(matches!(err, crate::BalanceError::MisconfiguredWeight { weight: -1, .. }));
    }

    #[test]
    fn test_weighted_random_all_zero() {
        let candidates = vec![Provider::new("a", 1).with_weight(0)];
        let err = WeightedRandom::new().select(&candidates, None).unwrap_err();
        assert!(err.is_invalid_input());
    }
}
