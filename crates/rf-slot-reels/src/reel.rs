//! Reel state machine
//!
//! A reel unwinds one step per tick. Each step commits the next symbol of a
//! predetermined feed as the "entering" symbol; the feed always ends with the
//! reel's final window, so the reel lands on the outcome chosen before the
//! spin started. Motion, easing and the settle bounce are left to whoever
//! consumes the [`ReelEvent`]s.
//!
//! ```text
//!   Idle ──start──▶ Spinning ──(steps exhausted)──▶ Stopped
//!                      │  ▲                            │
//!                      └──┘ step / quick_stop          └──start──▶ Spinning
//! ```

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::symbols::{ROW_COUNT, ReelWindow, SymbolId};

/// Completion callback, invoked once with the reel index
pub type ReelCallback = Box<dyn FnOnce(usize) + Send>;

/// Reel lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReelPhase {
    Idle,
    Spinning,
    Stopped,
}

/// Event emitted by a single reel step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReelEvent {
    /// The reel advanced one position; `entering` is the symbol that becomes
    /// visible (`None` only if the reel was started with an empty feed)
    Step {
        reel: usize,
        entering: Option<SymbolId>,
    },
    /// The reel has committed its final symbol and come to rest
    Stopped { reel: usize },
}

/// One reel's unwind state
pub struct Reel {
    index: usize,
    phase: ReelPhase,
    steps_remaining: u32,
    feed: VecDeque<SymbolId>,
    final_window: Option<ReelWindow>,
    last_committed: Option<SymbolId>,
    recent: VecDeque<SymbolId>,
    committed_count: u32,
    on_complete: Option<ReelCallback>,
}

impl Reel {
    /// Minimum number of steps: enough to place the three visible symbols
    pub const MIN_STEPS: u32 = ROW_COUNT as u32;

    pub fn new(index: usize) -> Self {
        Self {
            index,
            phase: ReelPhase::Idle,
            steps_remaining: 0,
            feed: VecDeque::new(),
            final_window: None,
            last_committed: None,
            recent: VecDeque::with_capacity(ROW_COUNT),
            committed_count: 0,
            on_complete: None,
        }
    }

    /// Start a new unwind and take its first step
    ///
    /// `feed` must end with `final_window` (top, middle, bottom). Returns the
    /// first step's event, or `None` (changing nothing) if the reel is already
    /// spinning. The unwind then needs `max(3, total_steps)` further calls to
    /// [`Reel::step`]; the last of them stops the reel and fires `on_complete`.
    pub fn start(
        &mut self,
        total_steps: u32,
        feed: impl IntoIterator<Item = SymbolId>,
        final_window: ReelWindow,
        on_complete: Option<ReelCallback>,
    ) -> Option<ReelEvent> {
        if self.phase == ReelPhase::Spinning {
            log::debug!("reel {} already spinning, start ignored", self.index);
            return None;
        }

        self.phase = ReelPhase::Spinning;
        self.steps_remaining = total_steps.max(Self::MIN_STEPS);
        self.feed = feed.into_iter().collect();
        self.final_window = Some(final_window);
        self.last_committed = None;
        self.recent.clear();
        self.committed_count = 0;
        self.on_complete = on_complete;
        self.step()
    }

    /// Advance one step; `None` when the reel is not spinning
    pub fn step(&mut self) -> Option<ReelEvent> {
        if self.phase != ReelPhase::Spinning {
            return None;
        }

        if self.steps_remaining == 0 {
            self.phase = ReelPhase::Stopped;
            log::trace!("reel {} stopped after {} steps", self.index, self.committed_count);
            if let Some(callback) = self.on_complete.take() {
                callback(self.index);
            }
            return Some(ReelEvent::Stopped { reel: self.index });
        }

        self.steps_remaining -= 1;
        // An exhausted feed repeats the last committed symbol
        let entering = self.feed.pop_front().or(self.last_committed);
        if let Some(symbol) = entering {
            self.commit(symbol);
        }

        Some(ReelEvent::Step {
            reel: self.index,
            entering,
        })
    }

    /// Cut the unwind short while still landing on the final window
    ///
    /// Leaves at most three steps, fed with the matching tail of the final
    /// window. No-op unless spinning.
    pub fn quick_stop(&mut self) {
        if self.phase != ReelPhase::Spinning {
            return;
        }

        let remaining = self.steps_remaining.min(Self::MIN_STEPS);
        self.steps_remaining = remaining;
        if remaining == 0 {
            return;
        }
        if let Some(window) = self.final_window {
            let rows = window.to_array();
            self.feed = rows[ROW_COUNT - remaining as usize..].iter().copied().collect();
        }
    }

    fn commit(&mut self, symbol: SymbolId) {
        self.last_committed = Some(symbol);
        self.committed_count += 1;
        if self.recent.len() == ROW_COUNT {
            self.recent.pop_front();
        }
        self.recent.push_back(symbol);
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn phase(&self) -> ReelPhase {
        self.phase
    }

    pub fn is_spinning(&self) -> bool {
        self.phase == ReelPhase::Spinning
    }

    pub fn steps_remaining(&self) -> u32 {
        self.steps_remaining
    }

    /// Symbols still queued to enter
    pub fn pending_feed(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.feed.iter().copied()
    }

    /// Window the reel will land on
    pub fn final_window(&self) -> Option<ReelWindow> {
        self.final_window
    }

    /// Number of symbols committed in the current unwind
    pub fn committed_count(&self) -> u32 {
        self.committed_count
    }

    /// Last three committed symbols in commit order, once three exist
    pub fn visible(&self) -> Option<ReelWindow> {
        (self.recent.len() == ROW_COUNT)
            .then(|| ReelWindow::new(self.recent[0], self.recent[1], self.recent[2]))
    }
}

impl std::fmt::Debug for Reel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reel")
            .field("index", &self.index)
            .field("phase", &self.phase)
            .field("steps_remaining", &self.steps_remaining)
            .field("feed_len", &self.feed.len())
            .field("final_window", &self.final_window)
            .finish()
    }
}
