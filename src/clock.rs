use std::time::{Duration, Instant};

/// Paces the frame loop.
pub trait Clock {
    /// Returns at the next frame boundary.
    fn tick(&mut self);
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn tick(&mut self) {
        (**self).tick();
    }
}

/// Sleeps out whatever is left of each frame's budget.
#[derive(Debug)]
pub struct FrameClock {
    frame_dur: Duration,
    frame_start: Instant,
}

impl FrameClock {
    pub fn new(fps: u32) -> Self {
        FrameClock {
            frame_dur: Duration::from_secs(1) / fps.max(1),
            frame_start: Instant::now(),
        }
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame_dur
    }
}

impl Clock for FrameClock {
    fn tick(&mut self) {
        let elapsed = self.frame_start.elapsed();
        if elapsed < self.frame_dur {
            std::thread::sleep(self.frame_dur - elapsed);
        }
        self.frame_start = Instant::now();
    }
}

/// Never sleeps; counts frames.
#[derive(Clone, Copy, Debug, Default)]
pub struct ManualClock {
    ticks: u64,
}

impl ManualClock {
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Clock for ManualClock {
    fn tick(&mut self) {
        self.ticks += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirty_fps_budget() {
        assert_eq!(FrameClock::new(30).frame_duration(), Duration::from_nanos(33_333_333));
    }

    #[test]
    fn frame_clock_waits_out_the_budget() {
        let mut c = FrameClock::new(100);
        let start = Instant::now();
        c.tick();
        c.tick();
        assert!(start.elapsed() >= Duration::from_millis(15));
    }

    #[test]
    fn manual_clock_counts() {
        let mut c = ManualClock::default();
        c.tick();
        c.tick();
        assert_eq!(c.ticks(), 2);
    }
}
