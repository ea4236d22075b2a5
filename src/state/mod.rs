//! State module for per-host bookkeeping
//!
//! # Components
//!
//! - `HostSchedule`: when each host was last touched, for politeness spacing
//!
//! Robots.txt state lives with its resolver in [`crate::robots`].

mod host_schedule;

pub use host_schedule::HostSchedule;
