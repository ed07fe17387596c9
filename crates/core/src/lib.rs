//! rsw-core: Core library for the Restic Swarm (rsw) backup agent
//!
//! This crate provides:
//! - The service descriptor and its backup label accessors
//! - Retention policy parsing and restic argument rendering
//! - Cron schedule evaluation
//! - The shared status map read by the query server
//! - ssh/restic command-line construction

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod clock;
pub mod restic;
pub mod retention;
pub mod schedule;
pub mod status;
pub mod workload;

// Re-exports
pub use clock::{Clock, FakeClock, SystemClock};
pub use restic::ResticCommand;
pub use retention::{RetentionError, RetentionPolicy};
pub use schedule::{next_run, ScheduleError};
pub use status::StatusStore;
pub use workload::Workload;
