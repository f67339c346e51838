use chrono::{DateTime, Duration, Utc};

/// Source of "now" for session timestamps; fixed in tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// Moves a fixed clock forward. No effect on the system clock.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }

    /// Sessions last touched before this instant count as idle for `ttl`.
    ///
    /// `None` for a negative `ttl` or one reaching past the representable range.
    #[must_use]
    pub fn idle_cutoff(&self, ttl: Duration) -> Option<DateTime<Utc>> {
        if ttl < Duration::zero() {
            return None;
        }
        self.now().checked_sub_signed(ttl)
    }
}

/// Deterministic timestamp for tests (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_advances() {
        let mut clock = fixed_clock();
        clock.advance(Duration::minutes(5));
        assert_eq!(clock.now(), fixed_now() + Duration::minutes(5));
        assert_eq!(clock.idle_cutoff(Duration::minutes(5)), Some(fixed_now()));
    }

    #[test]
    fn idle_cutoff_rejects_negative_and_huge_ttl() {
        let clock = fixed_clock();
        assert_eq!(clock.idle_cutoff(Duration::minutes(-5)), None);
        assert_eq!(clock.idle_cutoff(Duration::days(1_000_000_000)), None);
        assert_eq!(clock.idle_cutoff(Duration::zero()), Some(fixed_now()));
    }
}
