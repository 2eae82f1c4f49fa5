//! Frame pacing math.
//!
//! The host paints at its own cadence (commonly ~60 Hz) and the frame clock
//! only wants to fire at a lower, configured rate. [`FramePacer`] decides on
//! each paint whether a frame is due and keeps the long-run average rate on
//! target by carrying the remainder of the elapsed time into the next frame.

/// Milliseconds on the host's monotonic clock.
pub type Millis = f64;

/// Decides which host paints turn into frames.
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval_ms: Millis,
    then_ms: Millis,
}

impl FramePacer {
    /// Create a pacer targeting `rate` frames per second, anchored at
    /// `now_ms`. A rate of zero is treated as one frame per second.
    pub fn new(rate: u32, now_ms: Millis) -> Self {
        Self {
            interval_ms: 1000.0 / rate.max(1) as f64,
            then_ms: now_ms,
        }
    }

    /// Re-anchor the reference time without firing.
    pub fn reset(&mut self, now_ms: Millis) {
        self.then_ms = now_ms;
    }

    /// Check whether a frame is due at `now_ms`. When it is, the reference
    /// time moves to `now - (elapsed mod interval)` so the overshoot of this
    /// paint is credited to the next frame.
    pub fn poll(&mut self, now_ms: Millis) -> bool {
        let elapsed = now_ms - self.then_ms;
        if elapsed >= self.interval_ms {
            self.then_ms = now_ms - (elapsed % self.interval_ms);
            true
        } else {
            false
        }
    }

    /// Target interval between frames.
    pub fn interval_ms(&self) -> Millis {
        self.interval_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_from_rate() {
        assert!((FramePacer::new(10, 0.0).interval_ms() - 100.0).abs() < 1e-9);
        assert!((FramePacer::new(0, 0.0).interval_ms() - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_fires_only_after_interval() {
        let mut pacer = FramePacer::new(10, 0.0);
        assert!(!pacer.poll(16.7));
        assert!(!pacer.poll(99.9));
        assert!(pacer.poll(100.0));
        assert!(!pacer.poll(150.0));
    }

    #[test]
    fn test_phase_corrected_reset() {
        let mut pacer = FramePacer::new(10, 0.0);
        // 30ms late: the next frame is due at 200, not 230.
        assert!(pacer.poll(130.0));
        assert!(!pacer.poll(199.0));
        assert!(pacer.poll(200.0));
    }

    #[test]
    fn test_average_rate_converges_under_60hz_paints() {
        let mut pacer = FramePacer::new(24, 0.0);
        let paint = 1000.0 / 60.0;
        let fired = (1..=600)
            .filter(|i| pacer.poll(*i as f64 * paint))
            .count();
        // Ten seconds of paints at 24 fps.
        assert!((239..=240).contains(&fired), "fired {fired}");
    }

    #[test]
    fn test_reset_reanchors() {
        let mut pacer = FramePacer::new(10, 0.0);
        pacer.reset(500.0);
        assert!(!pacer.poll(550.0));
        assert!(pacer.poll(600.0));
    }
}
