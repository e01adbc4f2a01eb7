//! Scheduler layer for the watcher
//!
//! This layer owns the timer-driven part of a session: polling the status
//! endpoint until the job is terminal, and the guard that bounds how long
//! that may take.

pub mod tracker;

pub use tracker::{GuardLimit, JobStatusTracker, PollGuard, TrackOutcome};
