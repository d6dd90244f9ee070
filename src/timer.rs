use std::time::{Duration, Instant};

pub const DEFAULT_TICK: Duration = Duration::from_millis(100);

/// A cancellable repeating deadline for a single-threaded event loop.
///
/// The loop asks [`timeout`](Self::timeout) how long it may block on input,
/// then calls [`poll`](Self::poll) to learn whether a tick is due. Missed
/// periods are skipped, not replayed in a burst. After
/// [`cancel`](Self::cancel) no further tick is ever reported.
#[derive(Debug, Clone)]
pub struct RepeatingTimer {
    period: Duration,
    next: Option<Instant>,
}

impl RepeatingTimer {
    /// Start a timer whose first tick is due one period after `now`.
    pub fn start(period: Duration, now: Instant) -> Self {
        let period = period.max(Duration::from_millis(1));
        RepeatingTimer {
            period,
            next: Some(now + period),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_cancelled(&self) -> bool {
        self.next.is_none()
    }

    pub fn cancel(&mut self) {
        self.next = None;
    }

    /// How long until the next tick. `None` once cancelled.
    pub fn timeout(&self, now: Instant) -> Option<Duration> {
        self.next.map(|next| next.saturating_duration_since(now))
    }

    /// Returns true at most once per elapsed deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(next) = self.next else {
            return false;
        };
        if now < next {
            return false;
        }
        let behind = now.duration_since(next);
        let skipped = (behind.as_nanos() / self.period.as_nanos()) as u32;
        self.next = Some(next + self.period * (skipped + 1));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: Duration = Duration::from_millis(100);

    #[test]
    fn fires_once_per_period() {
        let t0 = Instant::now();
        let mut timer = RepeatingTimer::start(P, t0);

        assert!(!timer.poll(t0));
        assert!(!timer.poll(t0 + Duration::from_millis(99)));
        assert!(timer.poll(t0 + P));
        assert!(!timer.poll(t0 + P));
        assert!(timer.poll(t0 + P * 2));
    }

    #[test]
    fn missed_periods_collapse_into_one_tick() {
        let t0 = Instant::now();
        let mut timer = RepeatingTimer::start(P, t0);

        let late = t0 + P * 5 + Duration::from_millis(30);
        assert!(timer.poll(late));
        assert!(!timer.poll(late));
        assert_eq!(timer.timeout(late), Some(Duration::from_millis(70)));
        assert!(timer.poll(t0 + P * 6));
    }

    #[test]
    fn timeout_counts_down() {
        let t0 = Instant::now();
        let timer = RepeatingTimer::start(P, t0);
        assert_eq!(timer.timeout(t0), Some(P));
        assert_eq!(timer.timeout(t0 + Duration::from_millis(40)), Some(Duration::from_millis(60)));
        assert_eq!(timer.timeout(t0 + P * 3), Some(Duration::ZERO));
    }

    #[test]
    fn no_tick_after_cancel() {
        let t0 = Instant::now();
        let mut timer = RepeatingTimer::start(P, t0);
        assert!(timer.poll(t0 + P));

        timer.cancel();
        assert!(timer.is_cancelled());
        assert_eq!(timer.timeout(t0 + P), None);
        for n in 2..20 {
            assert!(!timer.poll(t0 + P * n));
        }
    }

    #[test]
    fn zero_period_is_raised() {
        let t0 = Instant::now();
        let timer = RepeatingTimer::start(Duration::ZERO, t0);
        assert_eq!(timer.period(), Duration::from_millis(1));
    }
}
