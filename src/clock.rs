//! Frame pacing
//!
//! A stopwatch started at the top of every frame. After the frame is
//! presented, [`FrameClock::pace`] sleeps away whatever is left of the frame
//! budget. Slow frames are never made up for.

use std::thread;
use std::time::{Duration, Instant};

use crate::consts::FRAME_BUDGET_MS;

/// Number of frames in the rolling FPS window
const FPS_WINDOW: usize = 20;

#[derive(Debug, Clone)]
pub struct FrameClock {
    budget: Duration,
    started: Option<Instant>,
    /// Elapsed time frozen at the moment of pausing
    paused: Option<Duration>,
    frame_times: [Option<Instant>; FPS_WINDOW],
    frame_index: usize,
    fps: u32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::with_budget(Duration::from_millis(FRAME_BUDGET_MS))
    }
}

impl FrameClock {
    pub fn with_budget(budget: Duration) -> Self {
        Self {
            budget,
            started: None,
            paused: None,
            frame_times: [None; FPS_WINDOW],
            frame_index: 0,
            fps: 0,
        }
    }

    /// A clock that never sleeps (headless runs and tests)
    pub fn unpaced() -> Self {
        Self::with_budget(Duration::ZERO)
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Mark the start of a frame
    pub fn start(&mut self) {
        self.started = Some(Instant::now());
        self.paused = None;
    }

    pub fn stop(&mut self) {
        self.started = None;
        self.paused = None;
    }

    pub fn pause(&mut self) {
        if self.paused.is_none() {
            if let Some(started) = self.started {
                self.paused = Some(started.elapsed());
            }
        }
    }

    pub fn resume(&mut self) {
        if let Some(frozen) = self.paused.take() {
            self.started = Instant::now().checked_sub(frozen);
        }
    }

    pub fn is_started(&self) -> bool {
        self.started.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.paused.is_some()
    }

    /// Time since [`start`](Self::start), excluding paused time
    pub fn elapsed(&self) -> Duration {
        match (self.paused, self.started) {
            (Some(frozen), _) => frozen,
            (None, Some(started)) => started.elapsed(),
            (None, None) => Duration::ZERO,
        }
    }

    /// How long to sleep after a frame that took `elapsed`
    pub fn remaining(&self, elapsed: Duration) -> Option<Duration> {
        self.budget
            .checked_sub(elapsed)
            .filter(|left| !left.is_zero())
    }

    /// Sleep out the rest of the frame budget and record the frame for FPS
    pub fn pace(&mut self) {
        let elapsed = self.elapsed();
        match self.remaining(elapsed) {
            Some(left) => thread::sleep(left),
            None if !self.budget.is_zero() => {
                log::debug!("Frame over budget: {:?} > {:?}", elapsed, self.budget);
            }
            None => {}
        }
        self.record_frame(Instant::now());
    }

    /// Measured frames per second over the last window
    pub fn fps(&self) -> u32 {
        self.fps
    }

    fn record_frame(&mut self, now: Instant) {
        self.frame_times[self.frame_index] = Some(now);
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;

        // The slot after the newest holds the oldest sample
        if let Some(oldest) = self.frame_times[self.frame_index] {
            let elapsed = now.duration_since(oldest).as_secs_f64();
            if elapsed > 0.0 {
                self.fps = ((FPS_WINDOW - 1) as f64 / elapsed).round() as u32;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_budget_is_fifty_ms() {
        assert_eq!(FrameClock::default().budget(), Duration::from_millis(50));
    }

    #[test]
    fn test_remaining_budget() {
        let clock = FrameClock::default();
        assert_eq!(
            clock.remaining(Duration::from_millis(10)),
            Some(Duration::from_millis(40))
        );
        assert_eq!(clock.remaining(Duration::from_millis(50)), None);
        // Over budget: no catch-up
        assert_eq!(clock.remaining(Duration::from_millis(80)), None);
    }

    #[test]
    fn test_unpaced_never_sleeps() {
        let clock = FrameClock::unpaced();
        assert_eq!(clock.remaining(Duration::ZERO), None);
    }

    #[test]
    fn test_unstarted_clock() {
        let clock = FrameClock::default();
        assert!(!clock.is_started());
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_pause_freezes_elapsed() {
        let mut clock = FrameClock::default();
        clock.start();
        thread::sleep(Duration::from_millis(5));
        clock.pause();
        assert!(clock.is_paused());
        let frozen = clock.elapsed();
        thread::sleep(Duration::from_millis(10));
        assert_eq!(clock.elapsed(), frozen);

        clock.resume();
        assert!(!clock.is_paused());
        assert!(clock.elapsed() >= frozen);

        clock.stop();
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_fps_measurement() {
        let mut clock = FrameClock::unpaced();
        let base = Instant::now();
        for i in 0..FPS_WINDOW as u64 * 2 {
            clock.record_frame(base + Duration::from_millis(50 * i));
        }
        assert_eq!(clock.fps(), 20);
    }
}
