//! Politeness scheduler
//!
//! This module handles:
//! - Per-host spacing between fetches
//! - Integrating robots.txt crawl delays with the configured default
//! - Skipping hosts whose required wait exceeds the configured ceiling

use crate::state::HostSchedule;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Whether a fetch to a host may proceed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmitDecision {
    /// Fetch now
    Immediate,
    /// Suspend for this long, then fetch
    WaitThen(Duration),
    /// Required wait is above the ceiling; do not fetch
    Reject,
}

/// Per-host admission control
///
/// `admit` reads the host's last touch, decides, and writes the new touch in
/// one `&mut self` call, so no two candidates can both see a stale timestamp.
#[derive(Debug, Default)]
pub struct PolitenessScheduler {
    schedules: HashMap<String, HostSchedule>,
}

impl PolitenessScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decides admission for `host` at the current instant
    ///
    /// See [`PolitenessScheduler::admit_at`].
    pub fn admit(
        &mut self,
        host: &str,
        crawl_delay_hint: Option<Duration>,
        default_delay: Duration,
        max_delay: Duration,
    ) -> AdmitDecision {
        self.admit_at(host, crawl_delay_hint, default_delay, max_delay, Instant::now())
    }

    /// Decides admission for `host` at `now` and records the touch
    ///
    /// # Decision
    ///
    /// | Condition | Decision | Recorded touch |
    /// |-----------|----------|----------------|
    /// | Host never touched | `Immediate` | `now` |
    /// | Remaining wait is zero | `Immediate` | `now` |
    /// | Remaining wait > `max_delay` | `Reject` | `now` |
    /// | `now + wait` not representable | `Reject` | `now` |
    /// | Otherwise | `WaitThen(wait)` | `now + wait` |
    ///
    /// The required spacing is the larger of the robots.txt hint and the
    /// configured default.
    pub fn admit_at(
        &mut self,
        host: &str,
        crawl_delay_hint: Option<Duration>,
        default_delay: Duration,
        max_delay: Duration,
        now: Instant,
    ) -> AdmitDecision {
        let delay = effective_delay(crawl_delay_hint, default_delay);
        let schedule = self
            .schedules
            .entry(host.to_string())
            .or_insert_with(HostSchedule::new);

        match schedule.time_until_next_fetch(delay, now) {
            None => {
                schedule.record_fetch(now);
                AdmitDecision::Immediate
            }
            Some(wait) if wait > max_delay => {
                tracing::debug!(
                    "Host {} needs {:?} wait, above ceiling {:?}",
                    host,
                    wait,
                    max_delay
                );
                schedule.record_fetch(now);
                AdmitDecision::Reject
            }
            Some(wait) => match now.checked_add(wait) {
                Some(fetch_at) => {
                    schedule.record_fetch(fetch_at);
                    AdmitDecision::WaitThen(wait)
                }
                None => {
                    schedule.record_fetch(now);
                    AdmitDecision::Reject
                }
            },
        }
    }

    /// Gets the schedule for a specific host
    pub fn get_host_schedule(&self, host: &str) -> Option<&HostSchedule> {
        self.schedules.get(host)
    }

    /// Number of hosts touched so far
    pub fn host_count(&self) -> usize {
        self.schedules.len()
    }
}

/// Calculates the spacing required between fetches to one host
pub fn effective_delay(crawl_delay_hint: Option<Duration>, default_delay: Duration) -> Duration {
    crawl_delay_hint.map_or(default_delay, |hint| hint.max(default_delay))
}
