use std::time::Duration;

/// Global clock shared by every plane timeline of one mount.
///
/// Timelines sample `now()` minus their birth time, so pausing the clock
/// freezes all of them at once and resuming continues from the same point.
#[derive(Clone, Debug, Default)]
pub struct TweenClock {
    now: f64,
    paused: bool,
}

impl TweenClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds elapsed while running.
    #[inline]
    pub fn now(&self) -> f64 {
        self.now
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Advance by `dt`; ignored while paused.
    pub fn advance(&mut self, dt: Duration) {
        if !self.paused {
            self.now += dt.as_secs_f64();
        }
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paused_clock_does_not_advance() {
        let mut clock = TweenClock::new();
        clock.advance(Duration::from_millis(250));
        clock.pause();
        clock.advance(Duration::from_secs(10));
        assert!((clock.now() - 0.25).abs() < 1e-6);
        clock.resume();
        clock.advance(Duration::from_millis(250));
        assert!((clock.now() - 0.5).abs() < 1e-6);
    }
}
