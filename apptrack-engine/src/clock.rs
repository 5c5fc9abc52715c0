use apptrack_core::models::DateTime;
use time::OffsetDateTime;

/// The source of "now" for pool-day computation and record timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    /// The local wall clock, or UTC where the local offset cannot be determined
    #[default]
    System,
    /// A fixed instant
    Fixed(DateTime),
}

impl Clock {
    /// The current wall-clock time
    pub fn now(&self) -> DateTime {
        match self {
            Clock::System => {
                let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
                DateTime::new(now.date(), now.time())
            }
            Clock::Fixed(at) => *at,
        }
    }
}
