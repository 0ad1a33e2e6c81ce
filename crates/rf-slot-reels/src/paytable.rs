//! Paytable: symbol weights and payout multipliers

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::symbols::SymbolId;

/// Smallest match count that pays
pub const MIN_MATCH: usize = 3;

/// Largest match count with a multiplier column
pub const MAX_MATCH: usize = 5;

/// Static symbol weighting and payout table
///
/// Index in every vector is the symbol id. Configured once before any spin
/// and read-only during play.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paytable {
    /// Display names (optional)
    #[serde(default)]
    pub symbol_names: Vec<String>,
    /// Relative selection weight per symbol
    #[serde(default)]
    pub weights: Vec<f64>,
    /// Multiplier for 3 of a kind
    #[serde(default)]
    pub mult3: Vec<f64>,
    /// Multiplier for 4 of a kind
    #[serde(default)]
    pub mult4: Vec<f64>,
    /// Multiplier for 5 of a kind
    #[serde(default)]
    pub mult5: Vec<f64>,
}

impl Paytable {
    /// Create a paytable from weights and multiplier columns
    pub fn new(weights: Vec<f64>, mult3: Vec<f64>, mult4: Vec<f64>, mult5: Vec<f64>) -> Self {
        Self {
            symbol_names: Vec::new(),
            weights,
            mult3,
            mult4,
            mult5,
        }
    }

    /// Attach display names
    pub fn with_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.symbol_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Six-symbol candy table (five gems plus the lollipop premium)
    pub fn classic() -> Self {
        Self::new(
            vec![24.0, 22.0, 20.0, 16.0, 12.0, 6.0],
            vec![2.0, 2.0, 3.0, 4.0, 5.0, 10.0],
            vec![5.0, 5.0, 8.0, 10.0, 15.0, 40.0],
            vec![15.0, 15.0, 25.0, 40.0, 60.0, 200.0],
        )
        .with_names(["blue", "green", "orange", "purple", "red", "lollipop"])
    }

    /// Sum of the first `total_symbols` weights, or `None` when the weights
    /// cannot drive sampling for that many symbols
    pub fn usable_weight_sum(&self, total_symbols: usize) -> Option<f64> {
        if self.weights.len() < total_symbols {
            return None;
        }
        let sum: f64 = self.weights[..total_symbols].iter().sum();
        (sum > 0.0 && sum.is_finite()).then_some(sum)
    }

    /// Sample a symbol id in `[0, total_symbols)` proportionally to its weight
    ///
    /// Falls back to a uniform draw when the weights are missing, too short,
    /// or do not sum to a positive value.
    pub fn pick_weighted<R: Rng + ?Sized>(&self, total_symbols: usize, rng: &mut R) -> SymbolId {
        let total_symbols = total_symbols.max(1);
        let Some(sum) = self.usable_weight_sum(total_symbols) else {
            return pick_uniform(total_symbols, rng);
        };

        let mut r = rng.random_range(0.0..sum);
        for (id, weight) in self.weights[..total_symbols].iter().enumerate() {
            r -= weight;
            if r < 0.0 {
                return id as SymbolId;
            }
        }
        // Floating-point residue
        (total_symbols - 1) as SymbolId
    }

    /// Payout multiplier for `count` matching symbols; 0 when not configured
    pub fn multiplier(&self, symbol: SymbolId, count: usize) -> f64 {
        let column = match count {
            3 => &self.mult3,
            4 => &self.mult4,
            5 => &self.mult5,
            _ => return 0.0,
        };
        column.get(symbol as usize).copied().unwrap_or(0.0)
    }

    /// Display name of a symbol
    pub fn symbol_name(&self, symbol: SymbolId) -> String {
        self.symbol_names
            .get(symbol as usize)
            .filter(|name| !name.is_empty())
            .cloned()
            .unwrap_or_else(|| format!("symbol#{symbol}"))
    }

    /// Reject negative or non-finite weights and multipliers
    pub fn validate(&self) -> Result<(), ConfigError> {
        let columns = [
            ("weights", &self.weights),
            ("mult3", &self.mult3),
            ("mult4", &self.mult4),
            ("mult5", &self.mult5),
        ];
        for (name, values) in columns {
            if let Some((idx, value)) = values
                .iter()
                .enumerate()
                .find(|(_, v)| !v.is_finite() || **v < 0.0)
            {
                return Err(ConfigError::Validation(format!(
                    "{name}[{idx}] must be a finite non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Uniform draw in `[0, total_symbols)`
pub fn pick_uniform<R: Rng + ?Sized>(total_symbols: usize, rng: &mut R) -> SymbolId {
    rng.random_range(0..total_symbols.max(1)) as SymbolId
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn histogram(paytable: &Paytable, total: usize, draws: usize, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut counts = vec![0usize; total];
        for _ in 0..draws {
            let id = paytable.pick_weighted(total, &mut rng) as usize;
            assert!(id < total);
            counts[id] += 1;
        }
        counts.iter().map(|&c| c as f64 / draws as f64).collect()
    }

    #[test]
    fn test_weighted_distribution() {
        let paytable = Paytable::new(vec![1.0, 2.0, 3.0, 4.0], vec![], vec![], vec![]);
        let freq = histogram(&paytable, 4, 200_000, 7);
        for (i, f) in freq.iter().enumerate() {
            assert_abs_diff_eq!(*f, (i + 1) as f64 / 10.0, epsilon = 0.01);
        }
    }

    #[test]
    fn test_zero_weight_never_picked() {
        let paytable = Paytable::new(vec![0.0, 5.0, 0.0], vec![], vec![], vec![]);
        let freq = histogram(&paytable, 3, 10_000, 3);
        assert_eq!(freq[0], 0.0);
        assert_eq!(freq[2], 0.0);
    }

    #[test]
    fn test_short_weights_fall_back_to_uniform() {
        let paytable = Paytable::new(vec![100.0, 1.0], vec![], vec![], vec![]);
        let freq = histogram(&paytable, 5, 100_000, 11);
        for f in freq {
            assert_abs_diff_eq!(f, 0.2, epsilon = 0.01);
        }
    }

    #[test]
    fn test_zero_sum_falls_back_to_uniform() {
        let paytable = Paytable::new(vec![0.0; 4], vec![], vec![], vec![]);
        let freq = histogram(&paytable, 4, 100_000, 13);
        for f in freq {
            assert_abs_diff_eq!(f, 0.25, epsilon = 0.01);
        }
    }

    #[test]
    fn test_only_leading_weights_count() {
        // Trailing weights beyond the symbol count are ignored
        let paytable = Paytable::new(vec![1.0, 1.0, 1000.0], vec![], vec![], vec![]);
        let freq = histogram(&paytable, 2, 50_000, 17);
        assert_abs_diff_eq!(freq[0], 0.5, epsilon = 0.01);
    }

    #[test]
    fn test_multiplier_lookup() {
        let paytable = Paytable::classic();
        assert_eq!(paytable.multiplier(5, 3), 10.0);
        assert_eq!(paytable.multiplier(5, 4), 40.0);
        assert_eq!(paytable.multiplier(5, 5), 200.0);
        assert_eq!(paytable.multiplier(5, 2), 0.0);
        assert_eq!(paytable.multiplier(5, 6), 0.0);
        assert_eq!(paytable.multiplier(42, 3), 0.0);
    }

    #[test]
    fn test_symbol_name_fallback() {
        let paytable = Paytable::classic();
        assert_eq!(paytable.symbol_name(5), "lollipop");
        assert_eq!(paytable.symbol_name(9), "symbol#9");
    }

    #[test]
    fn test_validate_rejects_negative() {
        let mut paytable = Paytable::classic();
        assert!(paytable.validate().is_ok());
        paytable.mult4[2] = -1.0;
        assert!(matches!(paytable.validate(), Err(ConfigError::Validation(_))));
    }
}
