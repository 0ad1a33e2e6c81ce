//! Symbol identifiers and the spin grid

use serde::{Deserialize, Serialize};

/// Symbol identifier in `[0, N)` where N is the configured symbol count
pub type SymbolId = u32;

/// Visible rows per reel (top, middle, bottom)
pub const ROW_COUNT: usize = 3;

/// Row evaluated for wins
pub const MIDDLE_ROW: usize = 1;

/// Default reel count for the classic layout
pub const DEFAULT_REEL_COUNT: u8 = 5;

/// The three symbols a reel shows once it has stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReelWindow {
    pub top: SymbolId,
    pub middle: SymbolId,
    pub bottom: SymbolId,
}

impl ReelWindow {
    pub fn new(top: SymbolId, middle: SymbolId, bottom: SymbolId) -> Self {
        Self { top, middle, bottom }
    }

    /// Symbols in reveal order (top, middle, bottom)
    pub fn to_array(self) -> [SymbolId; ROW_COUNT] {
        [self.top, self.middle, self.bottom]
    }

    /// Symbol at a row index, if in range
    pub fn row(&self, row: usize) -> Option<SymbolId> {
        match row {
            0 => Some(self.top),
            1 => Some(self.middle),
            2 => Some(self.bottom),
            _ => None,
        }
    }
}

impl From<[SymbolId; ROW_COUNT]> for ReelWindow {
    fn from(rows: [SymbolId; ROW_COUNT]) -> Self {
        Self::new(rows[0], rows[1], rows[2])
    }
}

/// Outcome grid for one spin, stored column-major (one window per reel)
///
/// Generated fresh per spin and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    columns: Vec<ReelWindow>,
}

impl Grid {
    pub fn new(columns: Vec<ReelWindow>) -> Self {
        Self { columns }
    }

    /// Build a grid from raw `[reel][row]` rows
    pub fn from_rows(columns: &[[SymbolId; ROW_COUNT]]) -> Self {
        Self {
            columns: columns.iter().copied().map(ReelWindow::from).collect(),
        }
    }

    /// Number of reels (columns)
    pub fn reel_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Window of a single reel
    pub fn column(&self, reel: usize) -> Option<&ReelWindow> {
        self.columns.get(reel)
    }

    pub fn columns(&self) -> &[ReelWindow] {
        &self.columns
    }

    /// Symbol at (reel, row)
    pub fn get(&self, reel: usize, row: usize) -> Option<SymbolId> {
        self.columns.get(reel).and_then(|w| w.row(row))
    }

    /// The payline: middle-row symbol of every reel, left to right
    pub fn middle_row(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.columns.iter().map(|w| w.middle)
    }
}
