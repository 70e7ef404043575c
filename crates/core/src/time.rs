use chrono::{DateTime, Duration, TimeZone, Utc};

/// A simple clock abstraction so rounds get deterministic timestamps in tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock that uses the current system time.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Returns the current time according to the clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// If this is a fixed clock, advance it by the given duration.
    ///
    /// Has no effect on `Clock::Default`.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }
}

/// Seconds from the Unix epoch back to 0001-01-01T00:00:00Z.
const DISTANT_PAST_TIMESTAMP: i64 = -62_135_596_800;

/// Timestamp used for a best game that was never played.
#[must_use]
pub fn distant_past() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(DISTANT_PAST_TIMESTAMP, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Short day-first date and time, e.g. `14.11.23 22:13`.
pub const DATE_TIME_FORMAT: &str = "%d.%m.%y %H:%M";

/// Formats `at` in the given time zone using [`DATE_TIME_FORMAT`].
#[must_use]
pub fn format_date_time<Tz>(at: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    at.with_timezone(tz).format(DATE_TIME_FORMAT).to_string()
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}
