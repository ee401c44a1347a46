//! Fixed rate pacing.

use std::time::{Duration, Instant};

/// Releases one frame per `interval`, measured from when pacing started.
///
/// Deadlines advance by whole intervals, so a slow frame is caught up on the following ones
/// instead of shifting the rest of the sequence.
pub struct Timer {
    interval: Duration,
    next: Instant,
}

impl Timer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next: Instant::now(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Block until the next frame is due, then schedule the one after it.
    pub fn wait(&mut self) {
        if let Some(left) = self.next.checked_duration_since(Instant::now()) {
            std::thread::sleep(left);
        }
        self.next += self.interval;
    }

    /// Pace the render loop if `enable` is set, dropping the timer otherwise.
    ///
    /// A changed interval restarts pacing from the current frame.
    pub fn handle_option(timer: &mut Option<Self>, enable: bool, interval: Duration) {
        if !enable {
            *timer = None;
            return;
        }

        match timer {
            Some(timer) if timer.interval == interval => timer.wait(),
            slot => slot.insert(Self::new(interval)).wait(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paces_ticks() {
        let mut timer = None;
        let start = Instant::now();
        for _ in 0..4 {
            Timer::handle_option(&mut timer, true, Duration::from_millis(10));
        }
        // First tick is immediate, the other three wait for 10ms each.
        assert!(start.elapsed() >= Duration::from_millis(30));

        Timer::handle_option(&mut timer, false, Duration::from_millis(10));
        assert!(timer.is_none());
    }

    #[test]
    fn new_interval_restarts() {
        let mut timer = None;
        Timer::handle_option(&mut timer, true, Duration::from_secs(3600));
        assert_eq!(timer.as_ref().map(Timer::interval), Some(Duration::from_secs(3600)));

        // Would block for an hour if the old deadline was kept.
        let start = Instant::now();
        Timer::handle_option(&mut timer, true, Duration::from_millis(1));
        assert!(start.elapsed() < Duration::from_secs(60));
        assert_eq!(timer.as_ref().map(Timer::interval), Some(Duration::from_millis(1)));
    }
}
