//! Sitescan Watcher
//!
//! Observes one website-analysis job from submission to a render-ready result.
//!
//! Architecture:
//! - Configuration: [`WatchPolicy`], the poll interval and opt-in guards
//! - Repositories: the two HTTP reads a session performs (status, results)
//! - Scheduler: [`JobStatusTracker`], which polls until the job is terminal
//! - Reconciler: [`ResultReconciler`], which turns the result body into a
//!   [`ResultViewModel`](sitescan_core::domain::view::ResultViewModel)
//! - Session: [`ScanWatcher`], which drives the two in order
//!   (poll* → terminal poll → result fetch → settle) and honours cancellation

pub mod config;
pub mod reconciler;
pub mod repository;
pub mod scheduler;
pub mod session;

#[cfg(test)]
mod testing;

pub use config::WatchPolicy;
pub use reconciler::ResultReconciler;
pub use repository::{HttpScanRepository, ScanRepository};
pub use scheduler::{GuardLimit, JobStatusTracker, PollGuard, TrackOutcome};
pub use session::{ScanWatcher, WatchOutcome};
