use std::time::{Duration, Instant};

/// Tracks when a host was last touched
///
/// "Touched" covers real fetches and skipped attempts alike, so a burst of
/// candidates for one slow host cannot all slip through on a stale timestamp.
#[derive(Debug, Clone, Default)]
pub struct HostSchedule {
    /// Timestamp of the last fetch attempt to this host
    pub last_fetch_time: Option<Instant>,
}

impl HostSchedule {
    /// Creates a HostSchedule for a host never contacted
    pub fn new() -> Self {
        Self::default()
    }

    /// Time remaining before the host may be fetched again
    ///
    /// Returns `None` if a fetch may happen at `now`. A delay too large to
    /// add to the last touch yields `Duration::MAX`.
    pub fn time_until_next_fetch(&self, delay: Duration, now: Instant) -> Option<Duration> {
        let last = self.last_fetch_time?;
        let Some(ready_at) = last.checked_add(delay) else {
            return Some(Duration::MAX);
        };
        if ready_at <= now {
            None
        } else {
            Some(ready_at - now)
        }
    }

    /// Records a fetch attempt at `at`
    pub fn record_fetch(&mut self, at: Instant) {
        self.last_fetch_time = Some(at);
    }
}
