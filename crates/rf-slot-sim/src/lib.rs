//! # rf-slot-sim — Batch spin simulator
//!
//! Runs a game definition through many instant spins and reports
//! return-to-player and hit rate. Spins are split into chunks that run in
//! parallel, each chunk owning a machine seeded with `seed + chunk_index`, so
//! a given seed and chunk count always produce the same report.

use std::collections::BTreeMap;
use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use rf_slot_reels::{GameDefinition, SessionStats, SlotMachine, SymbolId};

/// Configuration for a simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Total spins
    pub spins: u64,
    /// Bet per line for every spin
    pub bet_per_line: f64,
    /// Base seed
    pub seed: u64,
    /// Parallel chunks (0 = one per CPU)
    pub chunks: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            spins: 100_000,
            bet_per_line: 1.0,
            seed: 0,
            chunks: 0,
        }
    }
}

impl SimulationConfig {
    /// Builder: set spin count
    pub fn with_spins(mut self, spins: u64) -> Self {
        self.spins = spins;
        self
    }

    /// Builder: set bet per line
    pub fn with_bet(mut self, bet_per_line: f64) -> Self {
        self.bet_per_line = bet_per_line;
        self
    }

    /// Builder: set seed for reproducibility
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builder: set chunk count
    pub fn with_chunks(mut self, chunks: usize) -> Self {
        self.chunks = chunks;
        self
    }

    fn effective_chunks(&self) -> usize {
        let chunks = if self.chunks == 0 {
            num_cpus::get()
        } else {
            self.chunks
        };
        chunks.clamp(1, self.spins.max(1) as usize)
    }
}

/// Hits for one (symbol, count) combination
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WinBreakdown {
    pub symbol: SymbolId,
    pub symbol_name: String,
    pub count: usize,
    pub hits: u64,
    pub total_win: f64,
}

/// Merged outcome of a simulation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub stats: SessionStats,
    /// RTP in percent
    pub rtp: f64,
    /// Hit rate in percent
    pub hit_rate: f64,
    /// Wins grouped by symbol and match count, ascending
    pub breakdown: Vec<WinBreakdown>,
}

#[derive(Default)]
struct ChunkTally {
    stats: SessionStats,
    hits: BTreeMap<(SymbolId, usize), (u64, f64)>,
}

impl ChunkTally {
    fn merge(mut self, other: ChunkTally) -> Self {
        self.stats.merge(&other.stats);
        for (key, (hits, win)) in other.hits {
            let entry = self.hits.entry(key).or_default();
            entry.0 += hits;
            entry.1 += win;
        }
        self
    }
}

/// Run `config.spins` instant spins of `definition`
pub fn simulate(definition: &GameDefinition, config: &SimulationConfig) -> SimulationReport {
    let chunks = config.effective_chunks();
    let per_chunk = config.spins / chunks as u64;
    let remainder = config.spins % chunks as u64;
    let paytable = definition.paytable.clone().map(Arc::new);

    log::info!(
        "simulating {} spins in {} chunks (seed {})",
        config.spins,
        chunks,
        config.seed
    );

    let tally = (0..chunks)
        .into_par_iter()
        .map(|chunk| {
            let spins = per_chunk + u64::from((chunk as u64) < remainder);
            let rng = ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(chunk as u64));
            let mut machine =
                SlotMachine::with_rng(definition.machine.clone(), paytable.clone(), rng);

            let mut tally = ChunkTally::default();
            for _ in 0..spins {
                let Some(result) = machine.spin_instant(config.bet_per_line) else {
                    break;
                };
                if let Some(win) = &result.outcome.win {
                    let entry = tally.hits.entry((win.symbol, win.count)).or_default();
                    entry.0 += 1;
                    entry.1 += win.payout;
                }
            }
            tally.stats = machine.stats().clone();
            tally
        })
        .collect::<Vec<_>>()
        .into_iter()
        // Merge in chunk order so float totals do not depend on scheduling
        .fold(ChunkTally::default(), ChunkTally::merge);

    let breakdown = tally
        .hits
        .into_iter()
        .map(|((symbol, count), (hits, total_win))| WinBreakdown {
            symbol,
            symbol_name: definition
                .paytable
                .as_ref()
                .map(|p| p.symbol_name(symbol))
                .unwrap_or_default(),
            count,
            hits,
            total_win,
        })
        .collect();

    SimulationReport {
        rtp: tally.stats.rtp(),
        hit_rate: tally.stats.hit_rate(),
        stats: tally.stats,
        breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rf_slot_reels::{MachineConfig, Paytable, TimingConfig};

    fn studio_definition(paytable: Option<Paytable>) -> GameDefinition {
        GameDefinition::new(
            MachineConfig::classic().with_timing(TimingConfig::studio()),
            paytable,
        )
    }

    #[test]
    fn test_default_config() {
        let config = SimulationConfig::default();
        assert_eq!(config.spins, 100_000);
        assert_eq!(config.bet_per_line, 1.0);
    }

    #[test]
    fn test_spin_count_split_across_chunks() {
        let def = studio_definition(Some(Paytable::classic()));
        let report = simulate(&def, &SimulationConfig::default().with_spins(1003).with_chunks(4));
        assert_eq!(report.stats.total_spins, 1003);
        assert_eq!(report.stats.total_bet, 1003.0);
    }

    #[test]
    fn test_reproducibility() {
        let def = studio_definition(Some(Paytable::classic()));
        let config = SimulationConfig::default()
            .with_spins(2000)
            .with_seed(42)
            .with_chunks(3);
        assert_eq!(simulate(&def, &config), simulate(&def, &config));
    }

    #[test]
    fn test_breakdown_sums_to_total() {
        let def = studio_definition(Some(Paytable::classic()));
        let report = simulate(&def, &SimulationConfig::default().with_spins(5000).with_seed(9));
        let hits: u64 = report.breakdown.iter().map(|b| b.hits).sum();
        let win: f64 = report.breakdown.iter().map(|b| b.total_win).sum();
        assert_eq!(hits, report.stats.wins);
        assert!((win - report.stats.total_win).abs() < 1e-6);
        assert!(report.breakdown.iter().all(|b| (3..=5).contains(&b.count)));
    }

    #[test]
    fn test_degraded_definition_pays_nothing() {
        let def = studio_definition(None);
        let report = simulate(&def, &SimulationConfig::default().with_spins(500).with_chunks(2));
        assert_eq!(report.rtp, 0.0);
        assert!(report.breakdown.is_empty());
    }
}
