//! Real-time spin driver
//!
//! Ticks a shared [`SlotMachine`] on a fixed step interval, the way a frame
//! loop would, and forwards reel events to the presentation side.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::Rng;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{MissedTickBehavior, interval};

use crate::machine::{SlotMachine, SpinResult};
use crate::reel::ReelEvent;

/// Drives spins of a shared machine in real time
pub struct SpinTicker<R: Rng = rand::rngs::StdRng> {
    machine: Arc<Mutex<SlotMachine<R>>>,
    events: Option<UnboundedSender<ReelEvent>>,
}

impl<R: Rng> Clone for SpinTicker<R> {
    fn clone(&self) -> Self {
        Self {
            machine: Arc::clone(&self.machine),
            events: self.events.clone(),
        }
    }
}

impl<R: Rng + Send + 'static> SpinTicker<R> {
    pub fn new(machine: Arc<Mutex<SlotMachine<R>>>) -> Self {
        Self {
            machine,
            events: None,
        }
    }

    /// Forward every reel event to `sender`
    pub fn with_events(mut self, sender: UnboundedSender<ReelEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    pub fn machine(&self) -> &Arc<Mutex<SlotMachine<R>>> {
        &self.machine
    }

    /// Accelerate the spin in flight
    pub fn quick_stop(&self) {
        self.machine.lock().quick_stop();
    }

    /// Run one spin to completion
    ///
    /// Resolves to `None` if the machine was already spinning.
    pub async fn spin(&self, bet_per_line: f64) -> Option<SpinResult> {
        let step_ms = {
            let mut machine = self.machine.lock();
            if !machine.spin(bet_per_line, || {}, |_| {}) {
                return None;
            }
            let starts = machine.drain_events();
            self.forward(starts);
            machine.config().timing.step_duration_ms
        };

        if step_ms > 0.0 {
            let mut ticks = interval(Duration::from_secs_f64(step_ms / 1000.0));
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // First tick completes immediately; the starting step already happened
            ticks.tick().await;
            loop {
                ticks.tick().await;
                if let Some(result) = self.tick_once() {
                    return Some(result);
                }
            }
        } else {
            loop {
                if let Some(result) = self.tick_once() {
                    return Some(result);
                }
                tokio::task::yield_now().await;
            }
        }
    }

    fn tick_once(&self) -> Option<SpinResult> {
        let report = self.machine.lock().tick();
        self.forward(report.events);
        report.finished
    }

    fn forward(&self, events: Vec<ReelEvent>) {
        if let Some(sender) = &self.events {
            for event in events {
                // A dropped receiver just means nobody is watching
                let _ = sender.send(event);
            }
        }
    }
}
