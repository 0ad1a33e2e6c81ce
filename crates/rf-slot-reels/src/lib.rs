//! # rf-slot-reels — Five-reel slot simulation core
//!
//! Decides, for every spin, which symbols land, how many steps each reel
//! unwinds before it stops, and what the middle row pays. Rendering, easing
//! and money bookkeeping stay with the caller; the core hands back plain
//! values and reel events.
//!
//! ## Features
//!
//! - **Weighted Symbols**: Per-symbol weights with uniform fallback
//! - **Reel State Machine**: Step-by-step unwind onto a predetermined window
//! - **Quick Stop**: Shortens the unwind without changing the outcome
//! - **Middle-Row Payouts**: Occurrence-count evaluation, single best win
//! - **Degraded Mode**: No paytable means uniform symbols and zero payouts
//!
//! ## Architecture
//!
//! ```text
//! SlotMachine
//!     │
//!     ├── Paytable (weights, 3/4/5-of-a-kind multipliers)
//!     ├── Grid (generated up front, 5 × 3)
//!     └── Reel × 5 (Idle → Spinning → Stopped)
//!           │   completion ──channel──▶ join
//!           v
//!     evaluate(grid) → SpinResult
//! ```

pub mod config;
pub mod evaluator;
pub mod machine;
pub mod paytable;
pub mod reel;
pub mod symbols;
pub mod ticker;
pub mod timing;

pub use config::*;
pub use evaluator::*;
pub use machine::*;
pub use paytable::*;
pub use reel::*;
pub use symbols::*;
pub use ticker::*;
pub use timing::*;
