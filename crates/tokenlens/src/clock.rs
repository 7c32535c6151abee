//! Time sources for expiry checks.

use chrono::Utc;

/// Source of the current time, in Unix epoch seconds.
pub trait Clock {
    fn now(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> i64 {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock(1_700_000_000);
        assert_eq!(clock.now(), 1_700_000_000);
        assert_eq!((&clock).now(), 1_700_000_000);
    }

    #[test]
    fn test_system_clock_is_recent() {
        // 2020-09-13
        assert!(SystemClock.now() > 1_600_000_000);
    }
}
