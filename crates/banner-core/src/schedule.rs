//! Spawn timing: the interval between spawn ticks and the drop duration a new
//! plane gets.

use crate::config::{Acceleration, BannerConfig};

/// Produces successive spawn intervals.
///
/// Without acceleration the interval is constant. With acceleration,
/// `interval_{k+1} = max(interval_k - step, min_interval)`.
#[derive(Clone, Debug)]
pub struct SpawnSchedule {
    current_ms: f64,
    acceleration: Option<Acceleration>,
    initial_drop: f32,
    final_drop: Option<f32>,
    ramp_spawns: u32,
}

impl SpawnSchedule {
    pub fn new(config: &BannerConfig) -> Self {
        Self {
            current_ms: config.spawn_interval_ms,
            acceleration: config.acceleration,
            initial_drop: config.drop_duration,
            final_drop: config.final_drop_duration,
            ramp_spawns: config.ramp_spawns,
        }
    }

    /// Interval until the next tick, without advancing.
    #[inline]
    pub fn current_interval_ms(&self) -> f64 {
        self.current_ms
    }

    /// Return the current interval and step to the next one.
    pub fn next_interval_ms(&mut self) -> f64 {
        let out = self.current_ms;
        if let Some(acc) = self.acceleration {
            self.current_ms = (self.current_ms - acc.step_ms).max(acc.min_interval_ms);
        }
        out
    }

    /// Drop duration for the plane created by the `spawn_count`-th spawn
    /// (0-based). Linear from the initial to the final duration, clamped.
    pub fn drop_duration_for(&self, spawn_count: u64) -> f32 {
        match self.final_drop {
            Some(final_drop) if self.ramp_spawns > 0 => {
                let t = (spawn_count as f32 / self.ramp_spawns as f32).clamp(0.0, 1.0);
                self.initial_drop + (final_drop - self.initial_drop) * t
            }
            Some(final_drop) => final_drop,
            None => self.initial_drop,
        }
    }
}

/// Accumulating repeating timer for hosts without a native timer primitive.
///
/// Each elapsed interval fires one tick; the interval itself comes from the
/// [`SpawnSchedule`], so acceleration is honoured.
#[derive(Clone, Debug)]
pub struct SpawnTimer {
    schedule: SpawnSchedule,
    until_next_ms: f64,
}

impl SpawnTimer {
    pub fn new(mut schedule: SpawnSchedule) -> Self {
        let first = schedule.next_interval_ms();
        Self {
            schedule,
            until_next_ms: first,
        }
    }

    /// Advance by `elapsed_ms`, returning how many ticks fired.
    pub fn advance(&mut self, elapsed_ms: f64) -> usize {
        let mut fired = 0;
        self.until_next_ms -= elapsed_ms;
        while self.until_next_ms <= 0.0 {
            fired += 1;
            self.until_next_ms += self.schedule.next_interval_ms();
        }
        fired
    }

    pub fn until_next_ms(&self) -> f64 {
        self.until_next_ms
    }
}
