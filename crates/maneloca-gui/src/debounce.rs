use std::time::{Duration, Instant};

/// Holds back rapidly changing input until it has been stable for `delay`.
///
/// A settled value is released once; settling again on the value that was
/// released last produces nothing.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
    last_released: Option<T>,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            last_released: None,
        }
    }

    pub fn input(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let changed_at = self.pending.as_ref()?.1;
        if now.duration_since(changed_at) < self.delay {
            return None;
        }
        let (value, _) = self.pending.take()?;
        if self.last_released.as_ref() == Some(&value) {
            return None;
        }
        self.last_released = Some(value.clone());
        Some(value)
    }

    /// Time left until the pending value settles, for scheduling a repaint.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(_, changed_at)| self.delay.saturating_sub(now.duration_since(*changed_at)))
    }

    /// Forgets pending and released values, e.g. after the data set changed.
    pub fn reset(&mut self) {
        self.pending = None;
        self.last_released = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(300);

    #[test]
    fn test_value_released_after_delay() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(DELAY);
        d.input("chr7:1".to_string(), t0);
        assert_eq!(d.poll(t0 + Duration::from_millis(100)), None);
        assert_eq!(
            d.poll(t0 + Duration::from_millis(300)),
            Some("chr7:1".to_string())
        );
        assert_eq!(d.remaining(t0 + Duration::from_millis(300)), None);
    }

    #[test]
    fn test_typing_restarts_the_timer() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(DELAY);
        d.input("c", t0);
        d.input("ch", t0 + Duration::from_millis(200));
        assert_eq!(d.poll(t0 + Duration::from_millis(350)), None);
        assert_eq!(d.poll(t0 + Duration::from_millis(500)), Some("ch"));
    }

    #[test]
    fn test_same_value_is_not_released_twice() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(DELAY);
        d.input(5, t0);
        assert_eq!(d.poll(t0 + DELAY), Some(5));
        d.input(6, t0 + DELAY);
        d.input(5, t0 + DELAY + Duration::from_millis(10));
        assert_eq!(d.poll(t0 + DELAY * 3), None);
    }

    #[test]
    fn test_reset_allows_re_release() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(DELAY);
        d.input(1, t0);
        assert_eq!(d.poll(t0 + DELAY), Some(1));
        d.reset();
        d.input(1, t0 + DELAY);
        assert_eq!(d.poll(t0 + DELAY * 2), Some(1));
    }

    #[test]
    fn test_remaining() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(DELAY);
        assert_eq!(d.remaining(t0), None);
        d.input(1, t0);
        assert_eq!(
            d.remaining(t0 + Duration::from_millis(100)),
            Some(Duration::from_millis(200))
        );
        assert_eq!(d.remaining(t0 + DELAY * 2), Some(Duration::ZERO));
    }
}
