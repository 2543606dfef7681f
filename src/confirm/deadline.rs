use std::time::{Duration, Instant};

/// A cancellable single-shot deadline.
///
/// The deadline is passive: it schedules no work and holds no task. The owner
/// keeps it in an `Option`, polls [`Deadline::is_expired`] from its tick
/// handler, and cancels by dropping the value. Replacing the `Option` on
/// every state change guarantees that a deadline armed for one state can
/// never fire into another.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    armed_at: Instant,
    duration: Duration,
}

impl Deadline {
    /// Arm a deadline at `now` that expires after `duration`.
    pub const fn arm(now: Instant, duration: Duration) -> Self {
        Self {
            armed_at: now,
            duration,
        }
    }

    /// Whether the deadline has expired as of `now`.
    ///
    /// An `now` earlier than the arming instant counts as zero elapsed time.
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.armed_at) >= self.duration
    }

    /// Fraction of the deadline window elapsed as of `now`, clamped to [0, 1].
    ///
    /// A zero-length window is reported as fully elapsed.
    pub fn fraction_elapsed(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.armed_at);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_expired_before_duration() {
        let t0 = Instant::now();
        let deadline = Deadline::arm(t0, Duration::from_millis(3000));
        assert!(!deadline.is_expired(t0));
        assert!(!deadline.is_expired(t0 + Duration::from_millis(2999)));
    }

    #[test]
    fn test_expired_at_and_after_duration() {
        let t0 = Instant::now();
        let deadline = Deadline::arm(t0, Duration::from_millis(3000));
        assert!(deadline.is_expired(t0 + Duration::from_millis(3000)));
        assert!(deadline.is_expired(t0 + Duration::from_secs(60)));
    }

    #[test]
    fn test_fraction_elapsed_is_linear_and_clamped() {
        let t0 = Instant::now();
        let deadline = Deadline::arm(t0, Duration::from_millis(2000));
        assert_eq!(deadline.fraction_elapsed(t0), 0.0);
        let halfway = deadline.fraction_elapsed(t0 + Duration::from_millis(1000));
        assert!((halfway - 0.5).abs() < 1e-9);
        assert_eq!(deadline.fraction_elapsed(t0 + Duration::from_millis(5000)), 1.0);
    }

    #[test]
    fn test_zero_duration_is_immediately_expired() {
        let t0 = Instant::now();
        let deadline = Deadline::arm(t0, Duration::ZERO);
        assert!(deadline.is_expired(t0));
        assert_eq!(deadline.fraction_elapsed(t0), 1.0);
    }
}
