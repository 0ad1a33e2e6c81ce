//! Spin orchestrator
//!
//! Generates the outcome grid up front, hands every reel a feed that ends on
//! its column of that grid, and evaluates the grid once all reels have
//! reported completion. Reels are stepped cooperatively by [`SlotMachine::tick`];
//! completions fan in through a channel, one message per reel.

use std::sync::Arc;

use crossbeam_channel::{Receiver, unbounded};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{GameDefinition, MachineConfig};
use crate::evaluator::{SpinOutcome, evaluate};
use crate::paytable::{Paytable, pick_uniform};
use crate::reel::{Reel, ReelCallback, ReelEvent};
use crate::symbols::{Grid, ROW_COUNT, ReelWindow, SymbolId};

/// Callback receiving the finished spin
pub type FinishedCallback = Box<dyn FnOnce(&SpinResult) + Send>;

/// Result of one completed spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinResult {
    /// Spin ID
    pub spin_id: String,
    /// Grid the reels landed on
    pub grid: Grid,
    /// Bet per line
    pub bet_per_line: f64,
    /// Evaluation of `grid`
    pub outcome: SpinOutcome,
}

impl SpinResult {
    pub fn is_win(&self) -> bool {
        self.outcome.is_win()
    }

    pub fn total_win(&self) -> f64 {
        self.outcome.total_win
    }
}

/// Output of one tick
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    /// Per-reel step and stop events, in reel order; the first tick of a spin
    /// leads with each reel's starting step
    pub events: Vec<ReelEvent>,
    /// Set on the tick that completes the spin
    pub finished: Option<SpinResult>,
}

/// Session statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_spins: u64,
    pub total_bet: f64,
    pub total_win: f64,
    pub wins: u64,
    pub losses: u64,
    pub max_win: f64,
}

impl SessionStats {
    /// Calculate RTP
    pub fn rtp(&self) -> f64 {
        if self.total_bet > 0.0 {
            (self.total_win / self.total_bet) * 100.0
        } else {
            0.0
        }
    }

    /// Calculate hit rate
    pub fn hit_rate(&self) -> f64 {
        if self.total_spins > 0 {
            (self.wins as f64 / self.total_spins as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Record a finished spin
    pub fn record(&mut self, result: &SpinResult) {
        self.total_spins += 1;
        self.total_bet += result.bet_per_line;
        self.total_win += result.total_win();

        if result.is_win() {
            self.wins += 1;
        } else {
            self.losses += 1;
        }

        if result.total_win() > self.max_win {
            self.max_win = result.total_win();
        }
    }

    /// Fold another session into this one
    pub fn merge(&mut self, other: &SessionStats) {
        self.total_spins += other.total_spins;
        self.total_bet += other.total_bet;
        self.total_win += other.total_win;
        self.wins += other.wins;
        self.losses += other.losses;
        self.max_win = self.max_win.max(other.max_win);
    }
}

/// Spin in flight
struct ActiveSpin {
    spin_id: String,
    grid: Grid,
    bet_per_line: f64,
    completions: Receiver<usize>,
    stopped: usize,
    on_finished: Option<FinishedCallback>,
}

/// Five-reel slot machine
pub struct SlotMachine<R: Rng = StdRng> {
    /// Configuration
    config: MachineConfig,
    /// Paytable; `None` runs the degraded uniform / zero-payout mode
    paytable: Option<Arc<Paytable>>,
    /// Reel state machines, one per column
    reels: Vec<Reel>,
    /// Random number generator
    rng: R,
    /// Spin in flight
    active: Option<ActiveSpin>,
    /// First-step events from `spin`, not yet reported
    pending_events: Vec<ReelEvent>,
    /// Current spin count
    spin_count: u64,
    /// Current session stats
    stats: SessionStats,
}

impl SlotMachine<StdRng> {
    /// Create a machine with an OS-seeded RNG
    pub fn new(config: MachineConfig, paytable: Option<Arc<Paytable>>) -> Self {
        Self::with_rng(config, paytable, StdRng::from_os_rng())
    }

    /// Build from a loaded game definition
    pub fn from_definition(definition: GameDefinition) -> Self {
        Self::new(definition.machine, definition.paytable.map(Arc::new))
    }

    /// Seed RNG for reproducible results
    pub fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

impl<R: Rng> SlotMachine<R> {
    /// Create a machine with an injected random source
    pub fn with_rng(config: MachineConfig, paytable: Option<Arc<Paytable>>, rng: R) -> Self {
        let reel_count = config.reels.max(1) as usize;
        let symbol_count = config.symbol_count.max(1) as usize;

        match &paytable {
            None => log::warn!("no paytable configured, using uniform symbols and zero payouts"),
            Some(p) if p.usable_weight_sum(symbol_count).is_none() => log::warn!(
                "paytable weights unusable for {} symbols, sampling uniformly",
                symbol_count
            ),
            Some(_) => {}
        }

        Self {
            reels: (0..reel_count).map(Reel::new).collect(),
            config,
            paytable,
            rng,
            active: None,
            pending_events: Vec::new(),
            spin_count: 0,
            stats: SessionStats::default(),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ACCESSORS
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn paytable(&self) -> Option<&Paytable> {
        self.paytable.as_deref()
    }

    pub fn reels(&self) -> &[Reel] {
        &self.reels
    }

    /// Is a spin in flight?
    pub fn is_spinning(&self) -> bool {
        self.active.is_some()
    }

    /// Grid of the spin in flight
    pub fn pending_grid(&self) -> Option<&Grid> {
        self.active.as_ref().map(|a| &a.grid)
    }

    /// Get session stats
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Reset session stats
    pub fn reset_stats(&mut self) {
        self.stats = SessionStats::default();
        self.spin_count = 0;
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SPIN EXECUTION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Start a spin
    ///
    /// Returns `false` without calling either callback if a spin is already in
    /// flight. Every reel takes its first step here; those events are reported
    /// by [`SlotMachine::drain_events`] or the next tick. `on_started` runs once
    /// every reel is moving; `on_finished` runs from the tick that completes the
    /// last reel.
    pub fn spin(
        &mut self,
        bet_per_line: f64,
        on_started: impl FnOnce(),
        on_finished: impl FnOnce(&SpinResult) + Send + 'static,
    ) -> bool {
        if self.active.is_some() {
            log::debug!("spin requested while spinning, ignored");
            return false;
        }

        self.spin_count += 1;
        let spin_id = format!("spin-{:06}", self.spin_count);
        if self.paytable.is_none() {
            log::debug!("{spin_id}: no paytable, spin will pay nothing");
        }

        let grid = self.generate_grid();
        let (tx, completions) = unbounded();

        for (col, window) in grid.columns().iter().enumerate() {
            let jitter = self.rng.random_range(0..=self.config.timing.step_jitter);
            let steps = self.config.timing.reel_steps(col, jitter).max(Reel::MIN_STEPS);
            let feed = self.build_feed(steps, *window);

            let tx = tx.clone();
            let on_complete: ReelCallback = Box::new(move |reel: usize| {
                let _ = tx.send(reel);
            });
            self.pending_events
                .extend(self.reels[col].start(steps, feed, *window, Some(on_complete)));
        }

        log::debug!(
            "{spin_id}: started {} reels, bet per line {bet_per_line}",
            self.reels.len()
        );

        self.active = Some(ActiveSpin {
            spin_id,
            grid,
            bet_per_line,
            completions,
            stopped: 0,
            on_finished: Some(Box::new(on_finished)),
        });

        on_started();
        true
    }

    /// Take the starting-step events of the spin in flight, if still unreported
    pub fn drain_events(&mut self) -> Vec<ReelEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Advance every spinning reel by one step
    pub fn tick(&mut self) -> TickReport {
        let mut events = self.drain_events();
        events.extend(self.reels.iter_mut().filter_map(Reel::step));
        let mut report = TickReport {
            events,
            finished: None,
        };

        let Some(active) = self.active.as_mut() else {
            return report;
        };

        while let Ok(reel) = active.completions.try_recv() {
            active.stopped += 1;
            log::trace!(
                "{}: reel {reel} complete ({}/{})",
                active.spin_id,
                active.stopped,
                self.reels.len()
            );
        }

        if active.stopped >= self.reels.len() {
            report.finished = self.finish();
        }
        report
    }

    /// Shorten every reel's remaining unwind; the outcome is unchanged
    pub fn quick_stop(&mut self) {
        for reel in &mut self.reels {
            reel.quick_stop();
        }
    }

    /// Spin and tick to completion without waiting between steps
    ///
    /// Returns `None` if a spin was already in flight.
    pub fn spin_instant(&mut self, bet_per_line: f64) -> Option<SpinResult> {
        if !self.spin(bet_per_line, || {}, |_| {}) {
            return None;
        }
        loop {
            if let Some(result) = self.tick().finished {
                return Some(result);
            }
        }
    }

    fn finish(&mut self) -> Option<SpinResult> {
        let mut active = self.active.take()?;

        let outcome = match &self.paytable {
            Some(paytable) => evaluate(&active.grid, active.bet_per_line, paytable),
            None => SpinOutcome::none(),
        };

        let result = SpinResult {
            spin_id: active.spin_id,
            grid: active.grid,
            bet_per_line: active.bet_per_line,
            outcome,
        };

        match &result.outcome.win {
            Some(win) => log::debug!(
                "{}: {} x{} pays {}",
                result.spin_id,
                self.paytable
                    .as_ref()
                    .map(|p| p.symbol_name(win.symbol))
                    .unwrap_or_default(),
                win.count,
                win.payout
            ),
            None => log::debug!("{}: no win", result.spin_id),
        }

        self.stats.record(&result);
        if let Some(on_finished) = active.on_finished.take() {
            on_finished(&result);
        }
        Some(result)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // GRID GENERATION
    // ═══════════════════════════════════════════════════════════════════════════

    fn symbol_count(&self) -> usize {
        self.config.symbol_count.max(1) as usize
    }

    fn sample_symbol(&mut self) -> SymbolId {
        let n = self.symbol_count();
        match &self.paytable {
            Some(paytable) => paytable.pick_weighted(n, &mut self.rng),
            None => pick_uniform(n, &mut self.rng),
        }
    }

    fn generate_grid(&mut self) -> Grid {
        let columns = (0..self.reels.len())
            .map(|_| {
                let mut rows = [0; ROW_COUNT];
                for row in &mut rows {
                    *row = self.sample_symbol();
                }
                ReelWindow::from(rows)
            })
            .collect();
        Grid::new(columns)
    }

    /// `steps - 3` uniform filler symbols followed by the final window
    fn build_feed(&mut self, steps: u32, window: ReelWindow) -> Vec<SymbolId> {
        let n = self.symbol_count();
        let filler = steps.saturating_sub(Reel::MIN_STEPS) as usize;
        let mut feed = Vec::with_capacity(filler + ROW_COUNT);
        feed.extend((0..filler).map(|_| pick_uniform(n, &mut self.rng)));
        feed.extend(window.to_array());
        feed
    }
}

impl Default for SlotMachine<StdRng> {
    fn default() -> Self {
        Self::from_definition(GameDefinition::classic())
    }
}
