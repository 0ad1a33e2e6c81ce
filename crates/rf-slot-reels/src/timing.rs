//! Reel pacing profiles
//!
//! Timing here is abstract: a reel's unwind is measured in steps, and a step
//! lasts `step_duration_ms` when driven in real time. Easing and motion
//! belong to the presentation layer.

use serde::{Deserialize, Serialize};

/// Timing profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimingProfile {
    /// Normal gameplay timing
    Normal,
    /// Fast/Turbo mode
    Turbo,
    /// Studio mode (instant, for tests and simulation)
    Studio,
    /// Custom values
    Custom,
}

impl Default for TimingProfile {
    fn default() -> Self {
        Self::Normal
    }
}

/// Step counts and step duration for one spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Profile type
    pub profile: TimingProfile,

    /// Steps the leftmost reel unwinds before stopping
    pub base_steps: u32,

    /// Extra steps per reel to the right (staggered stop order)
    pub step_offset_per_reel: u32,

    /// Upper bound of the random extra steps per reel (inclusive)
    pub step_jitter: u32,

    /// Duration of one step (ms); 0 = advance as fast as ticked
    pub step_duration_ms: f64,
}

impl TimingConfig {
    /// Normal gameplay timing
    pub fn normal() -> Self {
        Self {
            profile: TimingProfile::Normal,
            base_steps: 22,
            step_offset_per_reel: 5,
            step_jitter: 2,
            step_duration_ms: 60.0,
        }
    }

    /// Turbo mode
    pub fn turbo() -> Self {
        Self {
            profile: TimingProfile::Turbo,
            base_steps: 12,
            step_offset_per_reel: 3,
            step_jitter: 1,
            step_duration_ms: 40.0,
        }
    }

    /// Studio mode: same step layout as normal, no wall-clock delay
    pub fn studio() -> Self {
        Self {
            profile: TimingProfile::Studio,
            step_duration_ms: 0.0,
            ..Self::normal()
        }
    }

    /// Get config for profile
    pub fn from_profile(profile: TimingProfile) -> Self {
        match profile {
            TimingProfile::Normal => Self::normal(),
            TimingProfile::Turbo => Self::turbo(),
            TimingProfile::Studio => Self::studio(),
            TimingProfile::Custom => Self {
                profile: TimingProfile::Custom,
                ..Self::normal()
            },
        }
    }

    /// Scale step duration by factor (< 1.0 = faster)
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            profile: TimingProfile::Custom,
            step_duration_ms: (self.step_duration_ms * factor).max(0.0),
            ..self.clone()
        }
    }

    /// Step count for a reel, given the jitter already drawn for it
    pub fn reel_steps(&self, reel_index: usize, jitter: u32) -> u32 {
        self.base_steps
            .saturating_add(self.step_offset_per_reel.saturating_mul(reel_index as u32))
            .saturating_add(jitter.min(self.step_jitter))
    }

    /// Worst-case wall-clock duration until the last reel reports completion
    pub fn estimated_spin_duration_ms(&self, reel_count: u8) -> f64 {
        let last = reel_count.saturating_sub(1) as usize;
        // The first step happens at spin start; each remaining one costs a tick
        let ticks = self.reel_steps(last, self.step_jitter).max(3);
        ticks as f64 * self.step_duration_ms
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::normal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_profiles() {
        let normal = TimingConfig::normal();
        let turbo = TimingConfig::turbo();
        let studio = TimingConfig::studio();

        assert!(turbo.step_duration_ms < normal.step_duration_ms);
        assert!(turbo.base_steps < normal.base_steps);
        assert_eq!(studio.step_duration_ms, 0.0);
        assert_eq!(studio.base_steps, normal.base_steps);
    }

    #[test]
    fn test_reel_steps_stagger() {
        let config = TimingConfig::normal();
        assert_eq!(config.reel_steps(0, 0), 22);
        assert_eq!(config.reel_steps(4, 0), 42);
        // Jitter is capped at the configured bound
        assert_eq!(config.reel_steps(1, 9), 29);
    }

    #[test]
    fn test_estimated_duration() {
        let config = TimingConfig::normal();
        // last reel: 22 + 4*5 + 2 = 44 steps
        assert_eq!(config.estimated_spin_duration_ms(5), 44.0 * 60.0);
        assert_eq!(config.estimated_spin_duration_ms(1), 24.0 * 60.0);
        assert_eq!(TimingConfig::studio().estimated_spin_duration_ms(5), 0.0);
    }

    #[test]
    fn test_scaled() {
        let fast = TimingConfig::normal().scaled(0.5);
        assert_eq!(fast.profile, TimingProfile::Custom);
        assert_eq!(fast.step_duration_ms, 30.0);
    }
}
