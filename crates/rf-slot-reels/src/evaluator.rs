//! Middle-row payout evaluation

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::paytable::{MIN_MATCH, Paytable};
use crate::symbols::{Grid, SymbolId};

/// The single winning symbol group of a spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinResult {
    /// Occurrences of the symbol on the middle row (3..=5 on a 5-reel grid)
    pub count: usize,
    /// Winning symbol
    pub symbol: SymbolId,
    /// multiplier × bet per line
    pub payout: f64,
    /// Reel indices contributing to the win, ascending
    pub positions: Vec<usize>,
}

/// Evaluation of one grid
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpinOutcome {
    /// Payout of the winning result, or 0
    pub total_win: f64,
    /// Winning result, if any
    pub win: Option<WinResult>,
}

impl SpinOutcome {
    /// No win
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_win(&self) -> bool {
        self.win.is_some()
    }
}

/// Evaluate the middle row of `grid`
///
/// Matches are counted by occurrence, not adjacency. Every symbol seen at
/// least three times with a positive multiplier is a candidate; the candidate
/// with the greatest payout wins, and equal payouts go to the lowest symbol id.
pub fn evaluate(grid: &Grid, bet_per_line: f64, paytable: &Paytable) -> SpinOutcome {
    if grid.is_empty() {
        return SpinOutcome::none();
    }

    let mut positions_by_symbol: BTreeMap<SymbolId, Vec<usize>> = BTreeMap::new();
    for (reel, symbol) in grid.middle_row().enumerate() {
        positions_by_symbol.entry(symbol).or_default().push(reel);
    }

    let mut best: Option<WinResult> = None;
    for (symbol, positions) in positions_by_symbol {
        let count = positions.len();
        if count < MIN_MATCH {
            continue;
        }
        let multiplier = paytable.multiplier(symbol, count);
        if multiplier.is_nan() || multiplier <= 0.0 {
            continue;
        }

        let payout = multiplier * bet_per_line;
        if best.as_ref().is_none_or(|b| payout > b.payout) {
            best = Some(WinResult {
                count,
                symbol,
                payout,
                positions,
            });
        }
    }

    match best {
        Some(win) => SpinOutcome {
            total_win: win.payout,
            win: Some(win),
        },
        None => SpinOutcome::none(),
    }
}
